//! Parse cache for rule text
//!
//! Parsed expressions are memoized by their whitespace-stripped text in a
//! `moka` cache. Syntax errors are never cached.

use std::sync::Arc;

use tracing::debug;

use crate::directive::{self, Expr};
use crate::error::SyntaxError;

/// Cached parse result: `None` for rule text without any directive.
type CachedExpr = Option<Arc<Expr>>;

/// Thread-safe cache of parsed rule text.
#[derive(Clone)]
pub(crate) struct ParseCache {
    cache: Arc<moka::sync::Cache<String, CachedExpr>>,
}

impl ParseCache {
    /// Creates a cache holding at most `capacity` entries.
    pub(crate) fn with_capacity(capacity: u64) -> Self {
        debug!(capacity, "Created rule parse cache");
        Self {
            cache: Arc::new(moka::sync::Cache::builder().max_capacity(capacity).build()),
        }
    }

    /// Returns the parsed rule text, parsing and storing it on a miss.
    pub(crate) fn get_or_parse(&self, rule: &str) -> Result<CachedExpr, SyntaxError> {
        let key = directive::strip_whitespace(rule);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        let parsed = directive::parse(&key)?.map(Arc::new);
        self.cache.insert(key, parsed.clone());
        Ok(parsed)
    }

    /// Number of cached entries.
    pub(crate) fn len(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    /// Drops every entry.
    pub(crate) fn clear(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks();
    }
}

/// Parses rule text, going through the cache when there is one.
pub(crate) fn parse(cache: Option<&ParseCache>, rule: &str) -> Result<CachedExpr, SyntaxError> {
    match cache {
        Some(cache) => cache.get_or_parse(rule),
        None => Ok(directive::parse(rule)?.map(Arc::new)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_variants_share_an_entry() {
        let cache = ParseCache::with_capacity(16);
        let first = cache.get_or_parse("email && len(13)").unwrap();
        let second = cache.get_or_parse("email&&len(13)").unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_syntax_errors_are_not_cached() {
        let cache = ParseCache::with_capacity(16);
        assert!(cache.get_or_parse("(email").is_err());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_clear() {
        let cache = ParseCache::with_capacity(16);
        cache.get_or_parse("required").unwrap();
        cache.get_or_parse("").unwrap();
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_parse_without_cache() {
        assert!(parse(None, "required").unwrap().is_some());
        assert!(parse(None, "   ").unwrap().is_none());
    }
}
