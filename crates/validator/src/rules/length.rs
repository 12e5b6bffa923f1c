//! The `len(N)` rule

use std::sync::LazyLock;

use regex::Regex;

use super::resolved;
use crate::context::RuleContext;
use crate::error::RuleError;
use crate::path::FieldPath;

/// Matches `len(N)` with a positive `N`, capturing `N`.
pub(crate) static PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"len\(([1-9][0-9]*)\)").unwrap());

/// Fails unless the field resolves to text, a sequence or a mapping of
/// exactly `N` elements. Any other kind is reported as `not_measurable`.
///
/// Text length counts Unicode scalar values.
pub fn len(ctx: &RuleContext<'_>, field: &FieldPath<'_>) -> Result<(), RuleError> {
    let expected = expected_length(ctx)?;
    let actual = resolved(field, "len")?.length()?;

    if actual != expected {
        return Err(RuleError::new(
            "len",
            format!("len field `{field}` has length {actual}, but should have length {expected}"),
        )
        .with_param("expected", expected.to_string())
        .with_param("actual", actual.to_string()));
    }

    Ok(())
}

fn expected_length(ctx: &RuleContext<'_>) -> Result<usize, RuleError> {
    let invalid = || {
        RuleError::new(
            "invalid_parameter",
            format!("`{}` does not hold a valid length", ctx.directive()),
        )
        .with_param("directive", ctx.directive().to_owned())
    };

    let captures = ctx.captures(&PATTERN).ok_or_else(invalid)?;
    captures
        .get(1)
        .and_then(|n| n.as_str().parse().ok())
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rstest::rstest;

    use super::*;
    use crate::context::Context;
    use crate::value::Inspect;

    fn check(directive: &str, value: &dyn Inspect) -> Result<(), RuleError> {
        let ctx = Context::background();
        let field = FieldPath::new("field", directive, value, None);
        len(&RuleContext::new(directive, "len", &ctx), &field)
    }

    #[test]
    fn test_measurable_kinds() {
        let text = String::from("0123456789");
        assert!(check("len(10)", &text).is_ok());
        assert!(check("len(10)", &Some(Box::new(text.clone()))).is_ok());

        let map: HashMap<&str, i32> = [("0", 0), ("one", 1), ("II", 2)].into_iter().collect();
        assert!(check("len(3)", &map).is_ok());
        assert!(check("len(3)", &vec!["0", "1", "false"]).is_ok());
        assert!(check("len(2)", &[1_u8, 2]).is_ok());
    }

    #[test]
    fn test_counts_chars() {
        assert!(check("len(5)", &"héllo").is_ok());
    }

    #[test]
    fn test_mismatch_params() {
        let error = check("len(13)", &"1234").unwrap_err();
        assert_eq!(error.code, "len");
        assert_eq!(error.param("expected"), Some("13"));
        assert_eq!(error.param("actual"), Some("4"));
    }

    #[rstest]
    #[case::int(Box::new(1_i32))]
    #[case::unit(Box::new(()))]
    #[case::flag(Box::new(true))]
    fn test_fails_for_unmeasurable_kinds(#[case] value: Box<dyn Inspect>) {
        let error = check("len(1)", &*value).unwrap_err();
        assert_eq!(error.code, "not_measurable");
        assert_eq!(error.param("kind"), Some("primitive"));
    }

    #[test]
    fn test_absent() {
        let error = check("len(1)", &None::<String>).unwrap_err();
        assert!(error.message.contains("absent"));
    }

    #[test]
    fn test_unparsable_directive() {
        let error = check("len(0)", &"x").unwrap_err();
        assert_eq!(error.code, "invalid_parameter");

        let huge = format!("len({}0)", usize::MAX);
        assert_eq!(check(&huge, &"x").unwrap_err().code, "invalid_parameter");
    }
}
