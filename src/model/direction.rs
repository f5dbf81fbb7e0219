use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    pub fn all() -> [Direction; 2] {
        [Direction::Horizontal, Direction::Vertical]
    }

    /// Suffix appended to a section's origin to form its label.
    pub fn suffix(&self) -> &'static str {
        match self {
            Direction::Horizontal => "-h",
            Direction::Vertical => "-v",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Horizontal => write!(f, "horizontal"),
            Direction::Vertical => write!(f, "vertical"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix() {
        assert_eq!(Direction::Horizontal.suffix(), "-h");
        assert_eq!(Direction::Vertical.suffix(), "-v");
    }
}
