//! Key patterns for bulk invalidation.

use regex::Regex;

/// Matcher applied to logical (unprefixed) keys.
#[derive(Debug, Clone)]
pub enum KeyPattern {
    /// Literal substring; regex metacharacters have no special meaning
    Substring(String),
    /// Caller-supplied regular expression
    Regex(Regex),
}

impl KeyPattern {
    /// Returns true if `logical_key` matches.
    pub fn matches(&self, logical_key: &str) -> bool {
        match self {
            KeyPattern::Substring(needle) => logical_key.contains(needle.as_str()),
            KeyPattern::Regex(re) => re.is_match(logical_key),
        }
    }
}

impl From<&str> for KeyPattern {
    fn from(needle: &str) -> Self {
        KeyPattern::Substring(needle.to_string())
    }
}

impl From<Regex> for KeyPattern {
    fn from(re: Regex) -> Self {
        KeyPattern::Regex(re)
    }
}
