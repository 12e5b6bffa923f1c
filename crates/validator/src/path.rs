//! Field path nodes
//!
//! A [`FieldPath`] identifies the field currently being validated. Nodes are
//! built on the stack by the traversal and link to their parent, so the
//! dotted path is only rendered when an error needs it.

use std::fmt;

use crate::value::Inspect;

// ============================================================================
// FIELD PATH
// ============================================================================

/// One field being validated, linked to the field that contains it.
///
/// # Examples
///
/// ```rust
/// use ruletag::FieldPath;
///
/// let email = String::from("test@test.com");
/// let user = FieldPath::unreachable("user", "required", None);
/// let field = FieldPath::new("email", "email", &email, Some(&user));
///
/// assert_eq!(field.full_name(), "user.email");
/// assert_eq!(field.depth(), 1);
/// ```
#[derive(Clone, Copy)]
pub struct FieldPath<'a> {
    name: &'a str,
    rules: &'a str,
    value: Option<&'a dyn Inspect>,
    parent: Option<&'a FieldPath<'a>>,
}

impl<'a> FieldPath<'a> {
    /// Creates a node for a field whose value exists.
    pub fn new(
        name: &'a str,
        rules: &'a str,
        value: &'a dyn Inspect,
        parent: Option<&'a FieldPath<'a>>,
    ) -> Self {
        Self {
            name,
            rules,
            value: Some(value),
            parent,
        }
    }

    /// Creates a node for a field behind an absent ancestor.
    pub fn unreachable(name: &'a str, rules: &'a str, parent: Option<&'a FieldPath<'a>>) -> Self {
        Self {
            name,
            rules,
            value: None,
            parent,
        }
    }

    /// Creates a detached node for evaluating a rule against a bare value.
    pub(crate) fn detached(rules: &'a str, value: &'a dyn Inspect) -> Self {
        Self::new("", rules, value, None)
    }

    /// The field name, without ancestors.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The raw rule text attached to the field.
    pub fn rules(&self) -> &'a str {
        self.rules
    }

    /// The field's value, or `None` if an ancestor is absent.
    pub fn value(&self) -> Option<&'a dyn Inspect> {
        self.value
    }

    /// The containing field, `None` for top-level fields.
    pub fn parent(&self) -> Option<&'a FieldPath<'a>> {
        self.parent
    }

    /// True when the field's value exists.
    pub fn is_reachable(&self) -> bool {
        self.value.is_some()
    }

    /// Number of ancestors.
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// Ancestors from the direct parent up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = &'a FieldPath<'a>> + use<'a> {
        std::iter::successors(self.parent, |node| node.parent)
    }

    /// The dotted path from the root to this field.
    pub fn full_name(&self) -> String {
        let mut names: Vec<&str> = self.ancestors().map(|node| node.name).collect();
        names.reverse();
        names.push(self.name);
        names.retain(|name| !name.is_empty());
        names.join(".")
    }
}

impl fmt::Display for FieldPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

impl fmt::Debug for FieldPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldPath")
            .field("path", &self.full_name())
            .field("rules", &self.rules)
            .field("kind", &self.value.map(|value| value.kind()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_root_first() {
        let city = "Paris".to_string();
        let user = FieldPath::unreachable("user", "", None);
        let address = FieldPath::unreachable("address", "non-nil", Some(&user));
        let field = FieldPath::new("city", "required", &city, Some(&address));

        assert_eq!(field.full_name(), "user.address.city");
        assert_eq!(field.to_string(), "user.address.city");
        assert_eq!(field.depth(), 2);
        assert_eq!(field.parent().map(FieldPath::name), Some("address"));
    }

    #[test]
    fn test_reachability() {
        let value = 3_u32;
        let reachable = FieldPath::new("count", "", &value, None);
        assert!(reachable.is_reachable());
        assert_eq!(reachable.full_name(), "count");

        let unreachable = FieldPath::unreachable("count", "", None);
        assert!(!unreachable.is_reachable());
        assert!(unreachable.value().is_none());
    }

    #[test]
    fn test_detached_has_empty_name() {
        let value = "x".to_string();
        let node = FieldPath::detached("email", &value);
        assert_eq!(node.full_name(), "");
        assert_eq!(node.depth(), 0);
    }
}
