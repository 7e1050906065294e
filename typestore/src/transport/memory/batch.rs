use crate::errors::StoreResult;
use crate::transport::memory::InMemoryTransport;
use crate::transport::{DocPointer, SetMode, UpdatePayload, WireMap, WriteBatchHandle};

/// One write staged on an [`InMemoryWriteBatch`].
#[derive(Debug, Clone)]
pub(crate) enum StagedWrite {
    Set {
        pointer: DocPointer,
        data: WireMap,
        mode: SetMode,
    },
    Update {
        pointer: DocPointer,
        data: UpdatePayload,
    },
    Delete {
        pointer: DocPointer,
    },
}

impl StagedWrite {
    pub(crate) fn pointer(&self) -> &DocPointer {
        match self {
            StagedWrite::Set { pointer, .. } => pointer,
            StagedWrite::Update { pointer, .. } => pointer,
            StagedWrite::Delete { pointer } => pointer,
        }
    }
}

/// The atomic batch of an [`InMemoryTransport`]. Writes are kept in staging
/// order and handed to the transport in one piece on commit.
pub struct InMemoryWriteBatch {
    transport: InMemoryTransport,
    writes: Vec<StagedWrite>,
}

impl InMemoryWriteBatch {
    pub(crate) fn new(transport: InMemoryTransport) -> Self {
        InMemoryWriteBatch {
            transport,
            writes: Vec::new(),
        }
    }
}

impl WriteBatchHandle for InMemoryWriteBatch {
    fn stage_set(&mut self, pointer: DocPointer, data: WireMap, mode: SetMode) -> StoreResult<()> {
        self.writes.push(StagedWrite::Set {
            pointer,
            data,
            mode,
        });
        Ok(())
    }

    fn stage_update(&mut self, pointer: DocPointer, data: UpdatePayload) -> StoreResult<()> {
        self.writes.push(StagedWrite::Update { pointer, data });
        Ok(())
    }

    fn stage_delete(&mut self, pointer: DocPointer) -> StoreResult<()> {
        self.writes.push(StagedWrite::Delete { pointer });
        Ok(())
    }

    fn commit(self: Box<Self>) -> StoreResult<()> {
        let InMemoryWriteBatch { transport, writes } = *self;
        transport.apply(writes)
    }
}
