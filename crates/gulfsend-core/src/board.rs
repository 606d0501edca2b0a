use serde::Serialize;

use crate::task::{Status, Task};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub id: Status,
    pub title: String,
}

impl Column {
    pub fn new(id: Status, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// Read-only kanban projection: tasks grouped under the column whose id
/// matches their status.
///
/// Tasks whose status has no column are never shown. With the default
/// `in-progress`/`done` columns that hides every `todo` task.
#[derive(Debug, Clone, Default)]
pub struct KanbanView {
    columns: Vec<Column>,
    tasks: Vec<Task>,
}

impl KanbanView {
    pub fn new(columns: Vec<Column>, tasks: Vec<Task>) -> Self {
        Self { columns, tasks }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Tasks rendered under `column`, in seed order.
    pub fn column_tasks(&self, column: &Column) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.status == column.id).collect()
    }

    /// Every column paired with the tasks it displays.
    pub fn grouped(&self) -> Vec<(&Column, Vec<&Task>)> {
        self.columns
            .iter()
            .map(|c| (c, self.column_tasks(c)))
            .collect()
    }

    /// Tasks that match no column and so never appear on the board.
    pub fn hidden_tasks(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| !self.columns.iter().any(|c| c.id == t.status))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, status: Status) -> Task {
        Task {
            id: id.into(),
            title: format!("Task {id}"),
            status,
            assignee: "Fatima".into(),
            flag: None,
        }
    }

    fn view(tasks: Vec<Task>) -> KanbanView {
        KanbanView::new(
            vec![
                Column::new(Status::InProgress, "In Progress"),
                Column::new(Status::Done, "Done"),
            ],
            tasks,
        )
    }

    #[test]
    fn todo_task_appears_in_no_column() {
        let board = view(vec![task("t1", Status::Todo)]);
        for (_, tasks) in board.grouped() {
            assert!(tasks.is_empty());
        }
        assert_eq!(board.hidden_tasks().len(), 1);
        assert_eq!(board.hidden_tasks()[0].id, "t1");
    }

    #[test]
    fn tasks_group_by_status_in_order() {
        let board = view(vec![
            task("a", Status::Done),
            task("b", Status::InProgress),
            task("c", Status::Done),
        ]);
        let grouped = board.grouped();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0.id, Status::InProgress);
        let ids: Vec<&str> = grouped[0].1.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["b"]);
        let ids: Vec<&str> = grouped[1].1.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
        assert!(board.hidden_tasks().is_empty());
    }

    #[test]
    fn empty_board_has_empty_columns() {
        let board = view(vec![]);
        assert!(board.grouped().iter().all(|(_, t)| t.is_empty()));
    }
}
