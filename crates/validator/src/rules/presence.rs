//! Presence rules: `non-nil`, `non-zero` and `required`

use super::resolved;
use crate::context::RuleContext;
use crate::error::RuleError;
use crate::path::FieldPath;

/// Fails if the field's pointer chain ends in an absent link.
pub fn non_nil(_ctx: &RuleContext<'_>, field: &FieldPath<'_>) -> Result<(), RuleError> {
    resolved(field, "non-nil").map(|_| ())
}

/// Fails if the field is absent or holds the zero value of its type.
pub fn non_zero(_ctx: &RuleContext<'_>, field: &FieldPath<'_>) -> Result<(), RuleError> {
    resolved(field, "non-zero")?;

    let is_zero = field.value().is_some_and(|value| value.is_zero());
    if is_zero {
        return Err(
            RuleError::new("non-zero", format!("non-zero field `{field}` has zero value"))
                .with_param("field", field.full_name()),
        );
    }
    Ok(())
}

/// `non-nil` followed by `non-zero`.
pub fn required(ctx: &RuleContext<'_>, field: &FieldPath<'_>) -> Result<(), RuleError> {
    non_nil(ctx, field)?;
    non_zero(ctx, field)
}
