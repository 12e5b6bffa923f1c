//! The validator
//!
//! [`Validator`] owns the rule registry and the optional parse cache, and
//! runs one traversal per [`validate`](Validator::validate) call.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::cache::ParseCache;
use crate::config::ValidatorConfig;
use crate::context::Context;
use crate::error::ValidationResult;
use crate::registry::{RuleDescriptor, RuleRegistry};
use crate::rules;
use crate::traversal::Walker;
use crate::value::Inspect;

// ============================================================================
// VALIDATOR
// ============================================================================

/// Validates records against the rule text attached to their fields.
///
/// Cloning is cheap: clones share the registry and the parse cache.
///
/// # Examples
///
/// ```rust
/// use ruletag::{Context, Record, Validator};
///
/// #[derive(Record)]
/// struct User {
///     #[rule("required && email")]
///     email: String,
/// }
///
/// let validator = Validator::new();
/// let ctx = Context::background();
///
/// assert!(validator.validate(&ctx, &User { email: "test@test.com".into() }).is_ok());
/// assert!(validator.validate(&ctx, &User { email: "1234".into() }).is_err());
/// ```
#[derive(Clone)]
pub struct Validator {
    registry: Arc<RuleRegistry>,
    cache: Option<ParseCache>,
    config: ValidatorConfig,
}

impl Validator {
    /// A validator with the default configuration and the built-in rules.
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    /// A validator without any rules.
    pub fn empty() -> Self {
        Self::builder().without_builtin_rules().build()
    }

    /// A validator built from a configuration.
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// Starts building a validator.
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::default()
    }

    /// Registers a rule, replacing any rule with the same id.
    pub fn register_rule(&self, descriptor: RuleDescriptor) {
        self.registry.register(descriptor);
    }

    /// The rule registry.
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// The configuration this validator was built with.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validates a record, or a pointer chain ending in one.
    ///
    /// Fields are visited in declaration order and the first failure is
    /// returned.
    pub fn validate(&self, ctx: &Context, value: &dyn Inspect) -> ValidationResult<()> {
        self.walker(ctx).validate_root(value)
    }

    /// Evaluates rule text against a single value.
    ///
    /// Errors report an empty field path.
    pub fn validate_rules(
        &self,
        ctx: &Context,
        rules: &str,
        value: &dyn Inspect,
    ) -> ValidationResult<()> {
        self.walker(ctx).validate_value(rules, value)
    }

    /// Drops every cached parse.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
            debug!("Rule parse cache cleared");
        }
    }

    /// Number of cached parses, `None` when caching is disabled.
    pub fn cached_rules(&self) -> Option<u64> {
        self.cache.as_ref().map(ParseCache::len)
    }

    fn walker<'a>(&'a self, ctx: &'a Context) -> Walker<'a> {
        Walker::new(&self.registry, ctx, self.cache.as_ref())
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("rules", &self.registry.ids())
            .field("config", &self.config)
            .finish()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for [`Validator`].
#[derive(Debug, Default)]
pub struct ValidatorBuilder {
    config: ValidatorConfig,
    rules: Vec<RuleDescriptor>,
}

impl ValidatorBuilder {
    /// Replaces the configuration.
    #[must_use = "builder methods must be chained or built"]
    pub fn config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Skips registering the built-in rules.
    #[must_use = "builder methods must be chained or built"]
    pub fn without_builtin_rules(mut self) -> Self {
        self.config.builtin_rules = false;
        self
    }

    /// Caches up to `capacity` parsed rule texts. `0` disables the cache.
    #[must_use = "builder methods must be chained or built"]
    pub fn parse_cache_capacity(mut self, capacity: u64) -> Self {
        self.config.parse_cache_capacity = capacity;
        self
    }

    /// Registers a rule after the built-in rules.
    #[must_use = "builder methods must be chained or built"]
    pub fn rule(mut self, descriptor: RuleDescriptor) -> Self {
        self.rules.push(descriptor);
        self
    }

    /// Builds the validator.
    pub fn build(self) -> Validator {
        let registry = RuleRegistry::new();
        if self.config.builtin_rules {
            rules::register_builtin(&registry);
        }
        for descriptor in self.rules {
            registry.register(descriptor);
        }

        let cache = self
            .config
            .caches_parses()
            .then(|| ParseCache::with_capacity(self.config.parse_cache_capacity));

        debug!(
            rules = registry.len(),
            parse_cache = self.config.parse_cache_capacity,
            "Built validator"
        );

        Validator {
            registry: Arc::new(registry),
            cache,
            config: self.config,
        }
    }
}
