//! Registers a parameterised rule next to the built-in ones.

use std::sync::LazyLock;

use regex::Regex;
use ruletag::{Context, FieldPath, Record, RuleContext, RuleDescriptor, RuleError, Validator};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static PREFIX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"prefix\(([a-z]+)\)").unwrap());

/// `prefix(abc)`: the text must start with `abc`.
fn prefix(ctx: &RuleContext<'_>, field: &FieldPath<'_>) -> Result<(), RuleError> {
    let expected = ctx
        .captures(&PREFIX_PATTERN)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| RuleError::new("invalid_parameter", "prefix needs a lowercase word"))?;

    let text = field
        .value()
        .and_then(|value| value.resolve())
        .and_then(|value| value.as_text())
        .ok_or_else(|| RuleError::new("prefix", format!("prefix field `{field}` is not text")))?;

    if text.starts_with(expected) {
        Ok(())
    } else {
        Err(
            RuleError::new("prefix", format!("prefix field `{field}` must start with `{expected}`"))
                .with_param("expected", expected.to_owned()),
        )
    }
}

#[derive(Record)]
struct Ticket {
    #[rule("prefix(tkt) && len(8)")]
    id: String,
    #[rule("!prefix(tmp)")]
    label: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let validator = Validator::builder()
        .rule(RuleDescriptor::from_regex("prefix", PREFIX_PATTERN.clone(), prefix).fail_on_absence())
        .build();
    let ctx = Context::background();

    for ticket in [
        Ticket {
            id: "tkt-0001".into(),
            label: "billing".into(),
        },
        Ticket {
            id: "bug-0001".into(),
            label: "billing".into(),
        },
        Ticket {
            id: "tkt-0002".into(),
            label: "tmp-draft".into(),
        },
    ] {
        match validator.validate(&ctx, &ticket) {
            Ok(()) => println!("{}: valid", ticket.id),
            Err(e) => println!("{}: {e}", ticket.id),
        }
    }

    validator.validate_rules(&ctx, "prefix(tkt)", &"tkt-9")?;
    Ok(())
}
