use syn::{
    Attribute, Ident, LitStr, Result,
    parse::{Parse, ParseStream},
};

use crate::support::diag;

/// Parsed `#[rule(...)]` field attribute.
#[derive(Debug, Clone)]
pub enum RuleAttr {
    /// `#[rule("required && email")]`
    Rules(LitStr),
    /// `#[rule(skip)]`
    Skip,
}

impl Parse for RuleAttr {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        if input.peek(LitStr) {
            return Ok(Self::Rules(input.parse()?));
        }

        let ident: Ident = input.parse().map_err(|e| {
            syn::Error::new(e.span(), "expected rule text like `\"required\"` or `skip`")
        })?;
        if ident == "skip" {
            Ok(Self::Skip)
        } else {
            Err(diag::error_spanned(
                &ident,
                format!("unknown rule option `{ident}`, expected rule text or `skip`"),
            ))
        }
    }
}

/// Find the single `#[rule(...)]` attribute of a field, if any.
pub fn parse_rule_attr(attrs: &[Attribute]) -> Result<Option<RuleAttr>> {
    let mut found: Option<RuleAttr> = None;

    for attr in attrs {
        if !attr.path().is_ident("rule") {
            continue;
        }
        if found.is_some() {
            return Err(diag::error_spanned(
                attr,
                "duplicate `#[rule]` attribute, combine the rules with `&&` instead",
            ));
        }
        found = Some(attr.parse_args::<RuleAttr>()?);
    }

    Ok(found)
}
