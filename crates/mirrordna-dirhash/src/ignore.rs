use serde::{Deserialize, Serialize};
use std::fmt;

/// Patterns excluded from state hashes unless the caller supplies its own list.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[".git", "__pycache__", ".DS_Store", "*.pyc"];

/// A single ignore rule, matched against a file or directory name (never a full path).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnorePattern {
    /// Written as `*<suffix>`; matches names ending in `suffix`.
    Suffix(String),
    /// Any other pattern; matches names containing it.
    Substring(String),
}

impl IgnorePattern {
    /// Parses the textual form: a leading `*` makes a suffix rule.
    pub fn parse(pattern: &str) -> Self {
        match pattern.strip_prefix('*') {
            Some(suffix) => IgnorePattern::Suffix(suffix.to_string()),
            None => IgnorePattern::Substring(pattern.to_string()),
        }
    }

    /// Returns true if `name` is excluded by this rule.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            IgnorePattern::Suffix(suffix) => name.ends_with(suffix.as_str()),
            IgnorePattern::Substring(needle) => name.contains(needle.as_str()),
        }
    }
}

impl fmt::Display for IgnorePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnorePattern::Suffix(suffix) => write!(f, "*{}", suffix),
            IgnorePattern::Substring(needle) => f.write_str(needle),
        }
    }
}

/// Ordered set of ignore rules.
///
/// Caller-supplied patterns replace the defaults; they are never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct IgnoreSet {
    patterns: Vec<IgnorePattern>,
}

impl Default for IgnoreSet {
    fn default() -> Self {
        Self::from_patterns(DEFAULT_IGNORE_PATTERNS.iter().copied())
    }
}

impl IgnoreSet {
    /// Builds a set from textual patterns.
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| IgnorePattern::parse(p.as_ref()))
                .collect(),
        }
    }

    /// A set that ignores nothing.
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Returns true if any rule excludes `name`.
    pub fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(name))
    }

    /// The rules in their textual form.
    pub fn patterns(&self) -> Vec<String> {
        self.patterns.iter().map(ToString::to_string).collect()
    }
}

impl From<Vec<String>> for IgnoreSet {
    fn from(patterns: Vec<String>) -> Self {
        Self::from_patterns(patterns)
    }
}

impl From<IgnoreSet> for Vec<String> {
    fn from(set: IgnoreSet) -> Self {
        set.patterns()
    }
}
