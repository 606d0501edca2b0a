//! Fixed data every session starts from.

use chrono::Utc;

use crate::api_key::{ApiKey, LastUsed};
use crate::board::{Column, KanbanView};
use crate::task::{Status, Task};

pub fn seed_keys() -> Vec<ApiKey> {
    let now = Utc::now();
    [
        ("1", "default", "tvly-1234567890abcdefghijklmnopqrstuvwxyz", 24, LastUsed::Today),
        ("2", "tmp1", "tvly-0987654321abcdefghijklmnopqrstuvwxyz", 0, LastUsed::Never),
        ("3", "my-cool-api-key", "tvly-abcdefghijklmnopqrstuvwxyz123456", 0, LastUsed::Never),
        ("4", "hello", "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", 0, LastUsed::Never),
        ("5", "cursor", "tvly-1234567890zyxwvutsrqponmlkjihgfedcba", 0, LastUsed::Never),
    ]
    .into_iter()
    .map(|(id, name, secret, usage, last_used)| ApiKey {
        id: id.into(),
        name: name.into(),
        secret: secret.into(),
        usage,
        created_at: now,
        last_used,
    })
    .collect()
}

pub fn board_columns() -> Vec<Column> {
    vec![
        Column::new(Status::InProgress, "In Progress"),
        Column::new(Status::Done, "Done"),
    ]
}

pub fn board_tasks() -> Vec<Task> {
    vec![
        Task {
            id: "2".into(),
            title: "User Authentication".into(),
            status: Status::InProgress,
            assignee: "Fatima".into(),
            flag: Some("🇵🇰".into()),
        },
        Task {
            id: "3".into(),
            title: "Project Setup".into(),
            status: Status::Done,
            assignee: "Sara".into(),
            flag: Some("🇦🇪".into()),
        },
    ]
}

pub fn landing_board() -> KanbanView {
    KanbanView::new(board_columns(), board_tasks())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn seed_key_ids_are_unique() {
        let keys = seed_keys();
        let ids: HashSet<&str> = keys.iter().map(|k| k.id.as_str()).collect();
        assert_eq!(ids.len(), 5);
        assert_eq!(keys[0].name, "default");
        assert_eq!(keys[0].usage, 24);
    }

    #[test]
    fn landing_board_shows_both_tasks() {
        let board = landing_board();
        let grouped = board.grouped();
        assert_eq!(grouped[0].1.len(), 1);
        assert_eq!(grouped[0].1[0].title, "User Authentication");
        assert_eq!(grouped[1].1.len(), 1);
        assert_eq!(grouped[1].1[0].assignee, "Sara");
    }
}
