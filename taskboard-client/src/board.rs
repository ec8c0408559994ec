//! Kanban board
//!
//! Tasks grouped into one column per status, always in the order TODO,
//! IN-PROGRESS, DONE. Moving a card only changes local state; the caller
//! sends the returned [`TaskPatch`] (see `ApiClient::move_card`).

use taskboard_shared::models::task::{TaskStatus, TaskView};
use uuid::Uuid;

use crate::api::TaskPatch;

/// One status column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub status: TaskStatus,
    pub tasks: Vec<TaskView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KanbanBoard {
    columns: Vec<Column>,
}

/// A card that was moved, so it can be put back if the server refuses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub task_id: Uuid,
    pub from: TaskStatus,
    pub to: TaskStatus,
}

impl KanbanBoard {
    /// Groups tasks by status, keeping their relative order
    pub fn new(tasks: impl IntoIterator<Item = TaskView>) -> Self {
        let mut columns: Vec<Column> = TaskStatus::ALL
            .iter()
            .map(|&status| Column {
                status,
                tasks: Vec::new(),
            })
            .collect();

        for task in tasks {
            columns[column_index(task.status)].tasks.push(task);
        }

        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, status: TaskStatus) -> &[TaskView] {
        &self.columns[column_index(status)].tasks
    }

    pub fn find(&self, task_id: Uuid) -> Option<&TaskView> {
        self.columns
            .iter()
            .flat_map(|c| c.tasks.iter())
            .find(|t| t.id == task_id)
    }

    /// Moves a card to the end of the `to` column
    ///
    /// Returns `None` if the task is not on the board or is already in that
    /// column; otherwise the move and the status-only patch to send.
    pub fn move_task(&mut self, task_id: Uuid, to: TaskStatus) -> Option<(Move, TaskPatch)> {
        let from = self.find(task_id)?.status;
        if from == to {
            return None;
        }

        self.relocate(task_id, from, to);

        Some((
            Move { task_id, from, to },
            TaskPatch {
                status: Some(to),
                ..Default::default()
            },
        ))
    }

    /// Reverses a move made by [`move_task`](Self::move_task)
    pub fn undo(&mut self, mv: Move) {
        self.relocate(mv.task_id, mv.to, mv.from);
    }

    /// Replaces a card with the server's copy, moving it if its status differs
    pub fn replace(&mut self, task: TaskView) {
        for column in &mut self.columns {
            column.tasks.retain(|t| t.id != task.id);
        }
        self.columns[column_index(task.status)].tasks.push(task);
    }

    fn relocate(&mut self, task_id: Uuid, from: TaskStatus, to: TaskStatus) {
        let source = &mut self.columns[column_index(from)].tasks;
        if let Some(pos) = source.iter().position(|t| t.id == task_id) {
            let mut task = source.remove(pos);
            task.status = to;
            self.columns[column_index(to)].tasks.push(task);
        }
    }
}

fn column_index(status: TaskStatus) -> usize {
    match status {
        TaskStatus::Todo => 0,
        TaskStatus::InProgress => 1,
        TaskStatus::Done => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(title: &str, status: TaskStatus) -> TaskView {
        TaskView {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: String::new(),
            status,
            assigned_to: None,
            comment: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn titles(tasks: &[TaskView]) -> Vec<&str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn test_columns_are_ordered_and_grouped() {
        let board = KanbanBoard::new(vec![
            task("c", TaskStatus::Done),
            task("a", TaskStatus::Todo),
            task("b", TaskStatus::InProgress),
            task("d", TaskStatus::Todo),
        ]);

        let statuses: Vec<TaskStatus> = board.columns().iter().map(|c| c.status).collect();
        assert_eq!(statuses, TaskStatus::ALL.to_vec());
        assert_eq!(titles(board.column(TaskStatus::Todo)), vec!["a", "d"]);
        assert_eq!(titles(board.column(TaskStatus::InProgress)), vec!["b"]);
        assert_eq!(titles(board.column(TaskStatus::Done)), vec!["c"]);
    }

    #[test]
    fn test_move_emits_status_only_patch() {
        let todo = task("a", TaskStatus::Todo);
        let id = todo.id;
        let mut board = KanbanBoard::new(vec![todo]);

        let (mv, patch) = board.move_task(id, TaskStatus::Done).unwrap();
        assert_eq!(mv.from, TaskStatus::Todo);
        assert_eq!(
            patch,
            TaskPatch {
                status: Some(TaskStatus::Done),
                ..Default::default()
            }
        );
        assert!(board.column(TaskStatus::Todo).is_empty());
        assert_eq!(board.column(TaskStatus::Done)[0].status, TaskStatus::Done);

        board.undo(mv);
        assert_eq!(titles(board.column(TaskStatus::Todo)), vec!["a"]);
        assert_eq!(board.find(id).unwrap().status, TaskStatus::Todo);
    }

    #[test]
    fn test_noop_moves() {
        let todo = task("a", TaskStatus::Todo);
        let id = todo.id;
        let mut board = KanbanBoard::new(vec![todo]);

        assert!(board.move_task(id, TaskStatus::Todo).is_none());
        assert!(board.move_task(Uuid::new_v4(), TaskStatus::Done).is_none());
    }

    #[test]
    fn test_replace_follows_server_status() {
        let mut card = task("a", TaskStatus::Todo);
        let mut board = KanbanBoard::new(vec![card.clone()]);

        card.status = TaskStatus::InProgress;
        card.title = "renamed".to_string();
        board.replace(card);

        assert!(board.column(TaskStatus::Todo).is_empty());
        assert_eq!(titles(board.column(TaskStatus::InProgress)), vec!["renamed"]);
    }
}
