//! Call-site filtering via `JULEA_TRACE_FUNCTION`.

use glob::Pattern;

/// A compiled set of glob patterns deciding whether a span/file-op/counter
/// name gets recorded. Read-only once built; absent means accept-all
/// (modeled as `Option<Filter>` at the call site rather than as a variant
/// here, so the common no-filter path costs nothing).
#[derive(Debug)]
pub struct Filter {
    patterns: Vec<Pattern>,
}

impl Filter {
    /// Compile `JULEA_TRACE_FUNCTION`'s comma-separated glob list.
    ///
    /// A pattern that fails to compile is logged and skipped rather than
    /// aborting the whole filter — one bad pattern shouldn't silence
    /// tracing for every other pattern in the list.
    pub fn parse(spec: &str) -> Self {
        let patterns = spec
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| match Pattern::new(s) {
                Ok(p) => Some(p),
                Err(e) => {
                    log::warn!("JULEA_TRACE_FUNCTION: invalid glob {s:?}: {e}");
                    None
                }
            })
            .collect();
        Filter { patterns }
    }

    /// True iff any compiled pattern matches `name` in full.
    pub fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_any_pattern() {
        let f = Filter::parse("foo*,bar");
        assert!(f.matches("foobar"));
        assert!(f.matches("bar"));
        assert!(!f.matches("baz"));
    }

    #[test]
    fn ignores_whitespace_around_commas() {
        let f = Filter::parse(" foo* , bar ");
        assert!(f.matches("foobar"));
        assert!(f.matches("bar"));
    }

    #[test]
    fn skips_invalid_patterns_without_panicking() {
        let f = Filter::parse("a[,bar");
        assert!(f.matches("bar"));
    }

    #[test]
    fn empty_spec_matches_nothing() {
        let f = Filter::parse("");
        assert!(!f.matches("anything"));
    }
}
