//! Editing modes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// What a primary click on the canvas does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    /// Select, drag and marquee
    #[default]
    Select,
    /// Create vertices on empty canvas
    Add,
    /// Connect two vertices with an edge
    Join,
    /// Remove vertices
    Delete,
}

impl EditMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditMode::Select => "select",
            EditMode::Add => "add",
            EditMode::Join => "join",
            EditMode::Delete => "delete",
        }
    }

    /// CSS cursor shown on the canvas while the mode is active
    pub fn cursor(&self) -> &'static str {
        match self {
            EditMode::Select => "default",
            EditMode::Add => "crosshair",
            EditMode::Join => "alias",
            EditMode::Delete => "not-allowed",
        }
    }
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown edit mode `{0}`")]
pub struct UnknownMode(pub String);

impl FromStr for EditMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "select" => Ok(EditMode::Select),
            "add" => Ok(EditMode::Add),
            "join" => Ok(EditMode::Join),
            "delete" => Ok(EditMode::Delete),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        for mode in [EditMode::Select, EditMode::Add, EditMode::Join, EditMode::Delete] {
            assert_eq!(mode.as_str().parse::<EditMode>(), Ok(mode));
        }
        assert_eq!("zoom".parse::<EditMode>(), Err(UnknownMode("zoom".to_string())));
        assert_eq!("Select".parse::<EditMode>().ok(), None);
    }
}
