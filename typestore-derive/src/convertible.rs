use proc_macro::TokenStream;
use proc_macro2::{Ident, Span};
use quote::quote;
use syn::punctuated::Punctuated;
use syn::token::Comma;
use syn::{Attribute, DataEnum, DataStruct, DeriveInput, Field, Fields, LitStr, Result};

pub(crate) fn generate_convertible_for_struct(ast: &DeriveInput, data: &DataStruct) -> Result<TokenStream> {
    let ignored_fields = parse_ignored_fields(&ast.attrs)?;

    let fields = match &data.fields {
        Fields::Named(fields) => &fields.named,
        _ => {
            return Err(syn::Error::new_spanned(
                ast,
                "only structs with named fields are supported",
            ))
        }
    };

    let (puts, initializers) = field_conversions(fields, &ignored_fields, false, quote!(obj))?;

    let name = &ast.ident;
    let type_name = name.to_string();
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let gen = quote! {
        impl #impl_generics typestore::common::Convertible for #name #ty_generics #where_clause {
            #[allow(unused_mut)]
            fn to_value(&self) -> typestore::errors::StoreResult<typestore::common::Value> {
                let mut obj = typestore::common::Object::new();
                #(#puts)*
                Ok(typestore::common::Value::Object(obj))
            }

            #[allow(unused_variables)]
            fn from_value(value: &typestore::common::Value) -> typestore::errors::StoreResult<Self> {
                match value {
                    typestore::common::Value::Object(obj) => {
                        let missing = typestore::common::Value::Null;
                        Ok(Self {
                            #(#initializers,)*
                        })
                    }
                    _ => {
                        Err(typestore::errors::StoreError::new(
                            &format!("Value of type {} cannot be read as {}", value.type_name(), #type_name),
                            typestore::errors::ErrorKind::ObjectMappingError,
                        ))
                    }
                }
            }
        }
    };

    Ok(TokenStream::from(gen))
}

pub(crate) fn generate_convertible_for_enum(ast: &DeriveInput, data: &DataEnum) -> Result<TokenStream> {
    let name = &ast.ident;
    let type_name = name.to_string();
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();
    let ignored_fields = parse_ignored_fields(&ast.attrs)?;

    let mut to_value_variants = Vec::with_capacity(data.variants.len());
    let mut from_value_variants = Vec::with_capacity(data.variants.len());

    for variant in &data.variants {
        let variant_ident = &variant.ident;
        let variant_name = variant_ident.to_string();

        match &variant.fields {
            Fields::Named(fields) => {
                let kept_idents: Vec<&Ident> = fields
                    .named
                    .iter()
                    .filter_map(|f| f.ident.as_ref())
                    .filter(|ident| !ignored_fields.contains(&ident.to_string()))
                    .collect();
                let (puts, initializers) =
                    field_conversions(&fields.named, &ignored_fields, true, quote!(fields))?;

                to_value_variants.push(quote! {
                    Self::#variant_ident { #(#kept_idents,)* .. } => {
                        let mut fields = typestore::common::Object::new();
                        #(#puts)*
                        (#variant_name, typestore::common::Value::Object(fields))
                    }
                });

                from_value_variants.push(quote! {
                    #variant_name => match data {
                        typestore::common::Value::Object(fields) => Ok(Self::#variant_ident {
                            #(#initializers,)*
                        }),
                        _ => Err(typestore::errors::StoreError::new(
                            &format!("Variant {} of {} expects an object", #variant_name, #type_name),
                            typestore::errors::ErrorKind::ObjectMappingError,
                        )),
                    }
                });
            }
            Fields::Unnamed(fields) => {
                let field_count = fields.unnamed.len();
                let field_idents: Vec<Ident> = (0..field_count)
                    .map(|i| Ident::new(&format!("field_{}", i), Span::call_site()))
                    .collect();
                let field_types: Vec<_> = fields.unnamed.iter().map(|f| &f.ty).collect();
                let field_indices: Vec<usize> = (0..field_count).collect();

                to_value_variants.push(quote! {
                    Self::#variant_ident(#(#field_idents),*) => {
                        let items = vec![
                            #(typestore::common::Convertible::to_value(#field_idents)?),*
                        ];
                        (#variant_name, typestore::common::Value::Array(items))
                    }
                });

                from_value_variants.push(quote! {
                    #variant_name => match data {
                        typestore::common::Value::Array(items) if items.len() == #field_count => {
                            Ok(Self::#variant_ident(
                                #(<#field_types as typestore::common::Convertible>::from_value(&items[#field_indices])?),*
                            ))
                        }
                        _ => Err(typestore::errors::StoreError::new(
                            &format!(
                                "Variant {} of {} expects an array of {} values",
                                #variant_name, #type_name, #field_count
                            ),
                            typestore::errors::ErrorKind::ObjectMappingError,
                        )),
                    }
                });
            }
            Fields::Unit => {
                to_value_variants.push(quote! {
                    Self::#variant_ident => (#variant_name, typestore::common::Value::Null)
                });

                from_value_variants.push(quote! {
                    #variant_name => Ok(Self::#variant_ident)
                });
            }
        }
    }

    let gen = quote! {
        impl #impl_generics typestore::common::Convertible for #name #ty_generics #where_clause {
            #[allow(unused_mut)]
            fn to_value(&self) -> typestore::errors::StoreResult<typestore::common::Value> {
                let (variant, value) = match self {
                    #(#to_value_variants),*
                };
                let mut obj = typestore::common::Object::new();
                obj.put("variant", typestore::common::Value::from(variant))?;
                obj.put("value", value)?;
                Ok(typestore::common::Value::Object(obj))
            }

            #[allow(unused_variables)]
            fn from_value(value: &typestore::common::Value) -> typestore::errors::StoreResult<Self> {
                let obj = match value {
                    typestore::common::Value::Object(obj) => obj,
                    _ => {
                        return Err(typestore::errors::StoreError::new(
                            &format!("Value of type {} cannot be read as {}", value.type_name(), #type_name),
                            typestore::errors::ErrorKind::ObjectMappingError,
                        ));
                    }
                };

                let variant = match obj.get("variant") {
                    Some(typestore::common::Value::String(variant)) => variant.as_str(),
                    _ => {
                        return Err(typestore::errors::StoreError::new(
                            &format!("Value is not a valid {} variant", #type_name),
                            typestore::errors::ErrorKind::ObjectMappingError,
                        ));
                    }
                };
                let missing = typestore::common::Value::Null;
                let data = obj.get("value").unwrap_or(&missing);

                match variant {
                    #(#from_value_variants,)*
                    other => Err(typestore::errors::StoreError::new(
                        &format!("Unknown variant {} of {}", other, #type_name),
                        typestore::errors::ErrorKind::ObjectMappingError,
                    )),
                }
            }
        }
    };

    Ok(TokenStream::from(gen))
}

/// Builds the `put` statements and the field initializers for a set of
/// named fields. With `bound`, fields are read from pattern bindings of an
/// enum variant instead of `self`. `map` names the object both sides use.
fn field_conversions(
    fields: &Punctuated<Field, Comma>,
    ignored_fields: &[String],
    bound: bool,
    map: proc_macro2::TokenStream,
) -> Result<(Vec<proc_macro2::TokenStream>, Vec<proc_macro2::TokenStream>)> {
    let mut puts = Vec::with_capacity(fields.len());
    let mut initializers = Vec::with_capacity(fields.len());

    for field in fields {
        let ident = match &field.ident {
            Some(ident) => ident,
            None => return Err(syn::Error::new_spanned(field, "field has no name")),
        };
        let ty = &field.ty;

        if ignored_fields.contains(&ident.to_string()) {
            initializers.push(quote! { #ident: ::core::default::Default::default() });
            continue;
        }

        let key = field_key(field, ident)?;
        let access = if bound {
            quote! { #ident }
        } else {
            quote! { &self.#ident }
        };
        puts.push(quote! {
            #map.put(#key, typestore::common::Convertible::to_value(#access)?)?;
        });
        initializers.push(quote! {
            #ident: <#ty as typestore::common::Convertible>::from_value(#map.get(#key).unwrap_or(&missing))?
        });
    }

    Ok((puts, initializers))
}

fn parse_ignored_fields(attrs: &[Attribute]) -> Result<Vec<String>> {
    let mut ignored_fields = vec![];
    for attr in attrs {
        if attr.path().is_ident("converter") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("ignored") {
                    let s: LitStr = meta.value()?.parse()?;
                    ignored_fields.extend(
                        s.value()
                            .split(',')
                            .map(|field| field.trim().to_string())
                            .filter(|field| !field.is_empty()),
                    );
                    Ok(())
                } else {
                    Err(meta.error("expected `ignored = \"...\"`"))
                }
            })?;
        }
    }
    Ok(ignored_fields)
}

fn field_key(field: &Field, ident: &Ident) -> Result<String> {
    let mut key = None;
    for attr in &field.attrs {
        if attr.path().is_ident("converter") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let s: LitStr = meta.value()?.parse()?;
                    if s.value().is_empty() {
                        return Err(meta.error("rename cannot be empty"));
                    }
                    key = Some(s.value());
                    Ok(())
                } else {
                    Err(meta.error("expected `rename = \"...\"`"))
                }
            })?;
        }
    }
    Ok(key.unwrap_or_else(|| ident.to_string()))
}
