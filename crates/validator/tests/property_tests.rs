//! Property-based tests for rule text evaluation.

use proptest::prelude::*;
use ruletag::directive::parse;
use ruletag::{Context, FieldPath, RuleContext, RuleDescriptor, RuleError, Validator};

fn pass(_: &RuleContext<'_>, _: &FieldPath<'_>) -> Result<(), RuleError> {
    Ok(())
}

fn fail(ctx: &RuleContext<'_>, _: &FieldPath<'_>) -> Result<(), RuleError> {
    Err(RuleError::new(ctx.rule_id().to_owned(), "always fails"))
}

/// `t` passes and `f` fails.
fn truth_validator() -> Validator {
    Validator::builder()
        .without_builtin_rules()
        .rule(RuleDescriptor::new("t", "^t$", pass).unwrap())
        .rule(RuleDescriptor::new("f", "^f$", fail).unwrap())
        .build()
}

fn eval(validator: &Validator, rules: &str) -> bool {
    validator
        .validate_rules(&Context::background(), rules, &())
        .is_ok()
}

fn atom(ok: bool) -> &'static str {
    if ok { "t" } else { "f" }
}

/// Rule text over `t` and `f` without top-level operators.
fn operand() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![Just("t".to_string()), Just("f".to_string())];
    leaf.prop_recursive(3, 16, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|e| format!("!{e}")),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a} && {b})")),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a} || {b})")),
            (inner.clone(), inner.clone(), inner).prop_map(|(c, t, e)| {
                format!("if({c})then({t})else({e})")
            }),
        ]
    })
}

/// Rule text over real built-in directives.
fn builtin_rule() -> impl Strategy<Value = String> {
    let directive = prop_oneof![
        Just("required"),
        Just("non-zero"),
        Just("non-nil"),
        Just("email"),
        Just("len(4)"),
        Just("len(13)"),
    ];
    prop::collection::vec((directive, any::<bool>(), any::<bool>()), 1..4).prop_map(|parts| {
        parts
            .iter()
            .enumerate()
            .map(|(i, (directive, negate, and))| {
                let op = if *and { " && " } else { " || " };
                let not = if *negate { "!" } else { "" };
                if i == 0 {
                    format!("{not}{directive}")
                } else {
                    format!("{op}{not}{directive}")
                }
            })
            .collect()
    })
}

// ============================================================================
// IDEMPOTENCY: validate(x) == validate(x)
// ============================================================================

proptest! {
    #[test]
    fn validation_is_idempotent(rules in builtin_rule(), value in ".{0,20}") {
        let validator = Validator::new();
        let ctx = Context::background();
        let first = validator.validate_rules(&ctx, &rules, &value);
        let second = validator.validate_rules(&ctx, &rules, &value);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn cached_and_uncached_agree(rules in builtin_rule(), value in ".{0,20}") {
        let ctx = Context::background();
        let plain = Validator::new().validate_rules(&ctx, &rules, &value);
        let cached = Validator::builder()
            .parse_cache_capacity(16)
            .build()
            .validate_rules(&ctx, &rules, &value);
        prop_assert_eq!(plain, cached);
    }
}

// ============================================================================
// OPERATOR LAWS
// ============================================================================

proptest! {
    #[test]
    fn negation_inverts(expr in operand()) {
        let validator = truth_validator();
        prop_assert_eq!(eval(&validator, &format!("!{expr}")), !eval(&validator, &expr));
    }

    #[test]
    fn and_holds_iff_both_hold(a in any::<bool>(), b in any::<bool>()) {
        let validator = truth_validator();
        prop_assert_eq!(eval(&validator, &format!("{} && {}", atom(a), atom(b))), a && b);
    }

    #[test]
    fn or_holds_iff_either_holds(a in any::<bool>(), b in any::<bool>()) {
        let validator = truth_validator();
        prop_assert_eq!(eval(&validator, &format!("{} || {}", atom(a), atom(b))), a || b);
    }

    #[test]
    fn chains_group_to_the_right(
        values in prop::collection::vec(any::<bool>(), 1..6),
        ops in prop::collection::vec(any::<bool>(), 5),
    ) {
        let validator = truth_validator();

        let mut rules = atom(values[0]).to_string();
        for (value, and) in values[1..].iter().zip(&ops) {
            rules.push_str(if *and { " && " } else { " || " });
            rules.push_str(atom(*value));
        }

        // Fold from the right: v0 op0 (v1 op1 (v2 ...)).
        let mut expected = values[values.len() - 1];
        for i in (0..values.len() - 1).rev() {
            expected = if ops[i] { values[i] && expected } else { values[i] || expected };
        }

        prop_assert_eq!(eval(&validator, &rules), expected, "{}", rules);
    }

    #[test]
    fn grouping_is_transparent(expr in operand()) {
        let validator = truth_validator();
        prop_assert_eq!(eval(&validator, &format!("({expr})")), eval(&validator, &expr));
    }
}

// ============================================================================
// WHITESPACE INSENSITIVITY
// ============================================================================

proptest! {
    #[test]
    fn whitespace_is_ignored(
        rules in builtin_rule(),
        value in ".{0,20}",
        padding in prop::collection::vec(prop_oneof![Just(" "), Just("\t"), Just("\n")], 0..8),
    ) {
        let validator = Validator::new();
        let ctx = Context::background();

        let mut padded = String::new();
        for (i, c) in rules.chars().enumerate() {
            if !padding.is_empty() {
                padded.push_str(padding[i % padding.len()]);
            }
            padded.push(c);
        }

        let compact: String = rules.chars().filter(|c| !c.is_whitespace()).collect();
        prop_assert_eq!(
            validator.validate_rules(&ctx, &padded, &value).is_ok(),
            validator.validate_rules(&ctx, &compact, &value).is_ok()
        );
        prop_assert_eq!(parse(&padded).unwrap(), parse(&compact).unwrap());
    }

    #[test]
    fn display_reparses_to_same_tree(expr in operand()) {
        let parsed = parse(&expr).unwrap().unwrap();
        prop_assert_eq!(parse(&parsed.to_string()).unwrap().unwrap(), parsed);
    }
}
