use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Todo,
    InProgress,
    Done,
}

impl Status {
    /// Upper-case badge shown on a task card.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Todo => "TO DO",
            Status::InProgress => "IN PROGRESS",
            Status::Done => "COMPLETED",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Glyph rendered for tasks that carry no flag.
pub const DEFAULT_GLYPH: &str = "👤";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub status: Status,
    pub assignee: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
}

impl Task {
    pub fn glyph(&self) -> &str {
        self.flag.as_deref().unwrap_or(DEFAULT_GLYPH)
    }
}
