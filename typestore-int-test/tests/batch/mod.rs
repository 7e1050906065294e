mod atomicity_test;
mod clear_test;
mod lifecycle_test;
mod set_test;
mod subcollection_test;
mod update_test;
