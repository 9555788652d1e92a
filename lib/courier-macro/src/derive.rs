//! `#[derive(Parameters)]` expansion.

use courier_core::{FieldDescriptor, Modifier, ParameterBucket};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{DeriveInput, Fields, parse2};

use crate::attrs::{TaggedField, is_option_type};

/// Expand the `#[derive(Parameters)]` macro.
pub fn expand_parameters_derive(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = parse2(input)?;
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            Fields::Unit => {
                return Ok(quote! {
                    impl #impl_generics ::courier::Decompose for #name #ty_generics #where_clause {
                        fn decompose_into(&self, _sink: &mut ::courier::ParameterSink) {}
                    }
                });
            }
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Parameters derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Parameters derive only supports structs",
            ));
        }
    };

    let mut routes = Vec::new();
    for field in fields {
        if let Some(field) = TaggedField::parse(field)? {
            routes.extend(route_field(&field));
        }
    }

    Ok(quote! {
        impl #impl_generics ::courier::Decompose for #name #ty_generics #where_clause {
            fn decompose_into(&self, sink: &mut ::courier::ParameterSink) {
                #(#routes)*
            }
        }
    })
}

/// Code routing one field into the sink; unmapped fields produce nothing.
fn route_field(field: &TaggedField<'_>) -> Option<TokenStream> {
    let ident = field.ident;
    let descriptor = &field.descriptor;

    match descriptor.bucket() {
        ParameterBucket::Unmapped => None,
        ParameterBucket::Body if is_option_type(field.ty) => Some(quote! {
            if let ::core::option::Option::Some(value) = &self.#ident {
                sink.body(::courier::Payload::new(::core::clone::Clone::clone(value)));
            }
        }),
        ParameterBucket::Body => Some(quote! {
            sink.body(::courier::Payload::new(::core::clone::Clone::clone(&self.#ident)));
        }),
        bucket if descriptor.is_group() => {
            let bucket = bucket_tokens(bucket);
            Some(quote! {
                sink.group(#bucket, &self.#ident);
            })
        }
        _ => {
            let descriptor = descriptor_tokens(descriptor);
            Some(quote! {
                sink.field(&#descriptor, &self.#ident);
            })
        }
    }
}

fn bucket_tokens(bucket: ParameterBucket) -> TokenStream {
    let variant = format_ident!(
        "{}",
        match bucket {
            ParameterBucket::Header => "Header",
            ParameterBucket::Query => "Query",
            ParameterBucket::Path => "Path",
            ParameterBucket::Form => "Form",
            ParameterBucket::Body => "Body",
            ParameterBucket::Unmapped => "Unmapped",
        }
    );
    quote! { ::courier::ParameterBucket::#variant }
}

fn descriptor_tokens(descriptor: &FieldDescriptor) -> TokenStream {
    let target = descriptor.target();
    let bucket = bucket_tokens(descriptor.bucket());
    let modifier = match descriptor.modifier() {
        Some(Modifier::AuthorizationType) => {
            quote! { ::core::option::Option::Some(::courier::Modifier::AuthorizationType) }
        }
        Some(Modifier::Optional) => {
            quote! { ::core::option::Option::Some(::courier::Modifier::Optional) }
        }
        None => quote! { ::core::option::Option::None },
    };
    quote! {
        ::courier::FieldDescriptor::from_static(#target, #bucket, #modifier)
    }
}
