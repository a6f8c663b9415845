use std::{convert::Infallible, fmt, str::FromStr};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
/// Queue class of a preload request.
///
/// Only decides where a request lands in the queue; an admitted load is never preempted.
pub enum Priority {
    /// Needed before the current slide can be shown.
    Critical,
    /// Needed soon (adjacent group).
    High,
    /// Background prefetch.
    #[default]
    Normal,
}

impl Priority {
    /// Numeric rank, lower is served first.
    pub fn rank(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Normal => 2,
        }
    }

    /// Parse a label; anything unrecognised is `Normal`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "critical" => Self::Critical,
            "high" => Self::High,
            _ => Self::Normal,
        }
    }

    /// The next class down, saturating at `Normal`.
    pub fn demoted(self) -> Self {
        match self {
            Self::Critical => Self::High,
            Self::High | Self::Normal => Self::Normal,
        }
    }

    /// Lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Normal => "normal",
        }
    }
}

impl FromStr for Priority {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for Priority {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/priority.rs"]
mod tests;
