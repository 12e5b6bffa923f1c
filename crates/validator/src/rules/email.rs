//! The `email` rule

use std::sync::LazyLock;

use regex::Regex;

use super::resolved;
use crate::context::RuleContext;
use crate::error::RuleError;
use crate::path::FieldPath;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$"
    ).unwrap()
});

/// Fails unless the field resolves to non-empty text shaped like an email
/// address. The domain needs at least one dot.
pub fn email(_ctx: &RuleContext<'_>, field: &FieldPath<'_>) -> Result<(), RuleError> {
    let value = resolved(field, "email")?;

    let Some(text) = value.as_text() else {
        return Err(RuleError::new(
            "email",
            format!("email field `{field}` cannot be converted to text"),
        )
        .with_param("kind", value.kind().name()));
    };

    if text.is_empty() {
        return Err(RuleError::new(
            "email",
            format!("email field `{field}` has zero value"),
        ));
    }

    if !EMAIL_REGEX.is_match(text) {
        return Err(
            RuleError::new("email", format!("email field `{field}` is not a valid email"))
                .with_help("expected an address like `user@example.com`"),
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::context::Context;
    use crate::value::Inspect;

    fn check(value: &dyn Inspect) -> Result<(), RuleError> {
        let ctx = Context::background();
        let field = FieldPath::new("email", "email", value, None);
        email(&RuleContext::new("email", "email", &ctx), &field)
    }

    #[rstest]
    #[case("test@test.com")]
    #[case("first.last+tag@sub.example.org")]
    #[case("a@b.co")]
    fn test_valid(#[case] input: &str) {
        assert!(check(&input).is_ok());
    }

    #[rstest]
    #[case("123456")]
    #[case("+49123456789")]
    #[case("12345")]
    #[case("test@test..com")]
    #[case("test@@test.com")]
    #[case("test @test.com")]
    #[case("test@ test.com")]
    #[case("a@b")]
    #[case("test@localhost")]
    fn test_invalid(#[case] input: &str) {
        let error = check(&input).unwrap_err();
        assert_eq!(error.code, "email");
        assert!(error.message.contains("not a valid email"));
    }

    #[test]
    fn test_through_pointers() {
        let value = Some(Box::new(String::from("test@test.com")));
        assert!(check(&value).is_ok());

        let missing: Option<String> = None;
        assert!(check(&missing).unwrap_err().message.contains("absent"));
    }

    #[test]
    fn test_empty_text() {
        let error = check(&String::new()).unwrap_err();
        assert!(error.message.contains("zero value"));
    }

    #[test]
    fn test_non_text() {
        let error = check(&42_i32).unwrap_err();
        assert_eq!(error.param("kind"), Some("primitive"));
    }
}
