use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Fields, GenericParam, Generics, Ident, parse_macro_input, parse_quote,
    ext::IdentExt,
};

use crate::support::attrs::{RuleAttr, parse_rule_attr};
use crate::support::diag;

pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(input) {
        Ok(ts) => ts,
        Err(e) => diag::to_compile_error(e),
    }
}

/// One field that takes part in validation.
struct RecordField<'a> {
    ident: &'a Ident,
    ty: &'a syn::Type,
    name: String,
    rules: String,
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    let struct_name = &input.ident;

    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            Fields::Unnamed(_) => {
                return Err(diag::error_spanned(
                    &input,
                    "Record derive requires named fields, tuple structs are not supported",
                ));
            }
            Fields::Unit => {
                return Err(diag::error_spanned(
                    &input,
                    "Record derive cannot be applied to unit structs",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new(
                input.ident.span(),
                "Record derive can only be used on structs",
            ));
        }
    };

    let mut fields = Vec::with_capacity(named.len());
    for field in named {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let rules = match parse_rule_attr(&field.attrs)? {
            Some(RuleAttr::Skip) => continue,
            Some(RuleAttr::Rules(lit)) => lit.value(),
            None => String::new(),
        };
        fields.push(RecordField {
            ident,
            ty: &field.ty,
            name: ident.unraw().to_string(),
            rules,
        });
    }

    let generics = add_bounds(input.generics.clone());
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let decls = fields.iter().map(|field| {
        let RecordField { ty, name, rules, .. } = field;
        quote! {
            ::ruletag::FieldDecl::new(#name, #rules, <#ty as ::ruletag::Describe>::shape)
        }
    });

    let views = fields.iter().map(|field| {
        let RecordField {
            ident, name, rules, ..
        } = field;
        quote! {
            ::ruletag::Field::new(#name, #rules, &self.#ident)
        }
    });

    let zero_checks = fields.iter().map(|field| {
        let ident = field.ident;
        quote! { ::ruletag::Inspect::is_zero(&self.#ident) }
    });

    let expanded = quote! {
        impl #impl_generics ::ruletag::Describe for #struct_name #ty_generics #where_clause {
            fn shape() -> ::ruletag::Shape {
                ::ruletag::Shape::record::<Self>(<Self as ::ruletag::Describe>::declared_fields)
            }

            fn declared_fields() -> ::std::vec::Vec<::ruletag::FieldDecl> {
                ::std::vec![#(#decls),*]
            }
        }

        impl #impl_generics ::ruletag::Inspect for #struct_name #ty_generics #where_clause {
            fn kind(&self) -> ::ruletag::Kind {
                ::ruletag::Kind::Record
            }

            fn is_zero(&self) -> bool {
                true #(&& #zero_checks)*
            }

            fn fields(&self) -> ::std::vec::Vec<::ruletag::Field<'_>> {
                ::std::vec![#(#views),*]
            }

            fn shape(&self) -> ::ruletag::Shape {
                <Self as ::ruletag::Describe>::shape()
            }
        }
    };

    Ok(expanded.into())
}

/// Every type parameter must be inspectable and describable.
fn add_bounds(mut generics: Generics) -> Generics {
    for param in &mut generics.params {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!(::ruletag::Inspect));
            ty.bounds.push(parse_quote!(::ruletag::Describe));
        }
    }
    generics
}
