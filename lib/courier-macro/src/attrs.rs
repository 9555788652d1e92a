//! Field attribute parsing for `#[derive(Parameters)]`.

use courier_core::FieldDescriptor;
use syn::{Attribute, Field, LitStr, Type};

/// Name of the field attribute carrying the tag.
pub(crate) const TAG_ATTRIBUTE: &str = "http";

/// A named field and its parsed tag.
#[derive(Debug)]
pub(crate) struct TaggedField<'a> {
    pub(crate) ident: &'a syn::Ident,
    pub(crate) ty: &'a Type,
    pub(crate) descriptor: FieldDescriptor,
}

impl<'a> TaggedField<'a> {
    /// Parse the `#[http("...")]` attribute of a named field.
    ///
    /// A field without the attribute is unmapped. Several attributes on the
    /// same field are rejected.
    pub(crate) fn parse(field: &'a Field) -> syn::Result<Option<Self>> {
        let Some(ident) = field.ident.as_ref() else {
            return Ok(None);
        };

        let tag = parse_tag(&field.attrs)?;
        let field_name = ident.to_string();
        let field_name = field_name.strip_prefix("r#").unwrap_or(&field_name);
        let descriptor = FieldDescriptor::parse(tag.as_deref(), field_name);

        Ok(Some(Self {
            ident,
            ty: &field.ty,
            descriptor,
        }))
    }
}

fn parse_tag(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut tag: Option<String> = None;

    for attr in attrs {
        if !attr.path().is_ident(TAG_ATTRIBUTE) {
            continue;
        }
        if tag.is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                "duplicate #[http(...)] attribute on field",
            ));
        }
        let value: LitStr = attr.parse_args()?;
        tag = Some(value.value());
    }

    Ok(tag)
}

/// Check if a type is `Option<T>`.
pub(crate) fn is_option_type(ty: &Type) -> bool {
    matches!(ty, Type::Path(type_path)
        if type_path.qself.is_none()
            && type_path.path.segments.last()
                .is_some_and(|seg| seg.ident == "Option"))
}
