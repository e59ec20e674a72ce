use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Subject area a question is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Physics,
    Chemistry,
    Biology,
    Mathematics,
    #[serde(rename = "Computer Science")]
    ComputerScience,
    Astronomy,
    Environment,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Physics,
        Category::Chemistry,
        Category::Biology,
        Category::Mathematics,
        Category::ComputerScience,
        Category::Astronomy,
        Category::Environment,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Physics => "Physics",
            Category::Chemistry => "Chemistry",
            Category::Biology => "Biology",
            Category::Mathematics => "Mathematics",
            Category::ComputerScience => "Computer Science",
            Category::Astronomy => "Astronomy",
            Category::Environment => "Environment",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category `{0}`")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Case-insensitive; spaces, dashes and underscores are interchangeable
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        Category::ALL
            .into_iter()
            .find(|c| c.name().replace(' ', "").to_lowercase() == wanted)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_display_name() {
        let json = serde_json::to_string(&Category::ComputerScience).unwrap();
        assert_eq!(json, r#""Computer Science""#);
    }

    #[test]
    fn parses_loosely() {
        assert_eq!("computer-science".parse(), Ok(Category::ComputerScience));
        assert_eq!("ASTRONOMY".parse(), Ok(Category::Astronomy));
        assert!("alchemy".parse::<Category>().is_err());
    }
}
