//! Board state: optimistic local mutation plus per-item remote persistence.
//!
//! Structural changes are planned as pure splices over the local tree that
//! also return the exact set of writes the server needs. The store applies
//! the splice first, then fires the writes; the local list is already the
//! desired end state, so there is no rollback, only a reload when a write
//! fails.

use super::{Board, Column, Task, User};
use crate::api::{ApiError, BoardGateway, ColumnCreate, TaskCreate, TaskPatch};

/// One pending task write: which task, what changes.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskWrite {
    pub task_id: String,
    pub patch: TaskPatch,
}

/// Splice a task move into `board` and return the writes that persist it.
///
/// Same-column: every task in the column gets its final index. Cross-column:
/// the moved task gets `{columnId, orderIndex}`, every other destination task
/// and every remaining source task get `{orderIndex}`, leaving both columns
/// dense 0-based. Out-of-range coordinates are a stale reference; the board
/// is left untouched and no writes are returned.
pub fn splice_task_move(
    board: &mut Board,
    from_col: usize,
    from_idx: usize,
    to_col: usize,
    to_idx: usize,
) -> Vec<TaskWrite> {
    if from_col >= board.columns.len() || to_col >= board.columns.len() {
        return Vec::new();
    }
    if from_idx >= board.columns[from_col].tasks.len() {
        return Vec::new();
    }

    let mut writes = Vec::new();

    if from_col == to_col {
        let col = &mut board.columns[from_col];
        let to_idx = to_idx.min(col.tasks.len() - 1);
        if from_idx == to_idx {
            return Vec::new();
        }
        let task = col.tasks.remove(from_idx);
        col.tasks.insert(to_idx, task);
        for (i, task) in col.tasks.iter_mut().enumerate() {
            task.order_index = i as u32;
            writes.push(TaskWrite {
                task_id: task.id.clone(),
                patch: TaskPatch::order(i as u32),
            });
        }
        return writes;
    }

    let mut task = board.columns[from_col].tasks.remove(from_idx);
    let dest_id = board.columns[to_col].id.clone();
    let to_idx = to_idx.min(board.columns[to_col].tasks.len());
    task.column.id = dest_id.clone();
    task.order_index = to_idx as u32;
    let moved_id = task.id.clone();
    board.columns[to_col].tasks.insert(to_idx, task);

    writes.push(TaskWrite {
        task_id: moved_id.clone(),
        patch: TaskPatch::move_to(&dest_id, to_idx as u32),
    });
    for (i, task) in board.columns[to_col].tasks.iter_mut().enumerate() {
        task.order_index = i as u32;
        if task.id == moved_id {
            // Its index rides on the move patch.
            continue;
        }
        writes.push(TaskWrite {
            task_id: task.id.clone(),
            patch: TaskPatch::order(i as u32),
        });
    }
    for (i, task) in board.columns[from_col].tasks.iter_mut().enumerate() {
        task.order_index = i as u32;
        writes.push(TaskWrite {
            task_id: task.id.clone(),
            patch: TaskPatch::order(i as u32),
        });
    }
    writes
}

/// Splice a column move and return the full id list in final order,
/// or `None` for a stale reference.
pub fn splice_column_move(board: &mut Board, from: usize, to: usize) -> Option<Vec<String>> {
    if from >= board.columns.len() || to >= board.columns.len() {
        return None;
    }
    if from != to {
        let col = board.columns.remove(from);
        board.columns.insert(to, col);
        for (i, col) in board.columns.iter_mut().enumerate() {
            col.order_index = i as u32;
        }
    }
    Some(board.columns.iter().map(|c| c.id.clone()).collect())
}

/// Replace the board's copy of a task with the server's authoritative one.
/// Returns whether the task was found; an unknown id changes nothing.
pub fn sync_task_in_board(board: &mut Board, updated: Task) -> bool {
    match board.find_task(&updated.id) {
        Some((col_idx, task_idx)) => {
            board.columns[col_idx].tasks[task_idx] = updated;
            true
        }
        None => false,
    }
}

/// The in-memory board plus the gateway calls that keep the server in step.
pub struct BoardStore {
    pub board: Board,
    /// Active assignee-name filter applied to loads.
    pub assignee_filter: Option<String>,
}

impl BoardStore {
    pub fn new() -> Self {
        Self {
            board: Board::default(),
            assignee_filter: None,
        }
    }

    /// Fetch the full tree. On failure the previous state is kept.
    pub fn load(&mut self, api: &impl BoardGateway) -> Result<(), ApiError> {
        let columns = api.get_board(self.assignee_filter.as_deref())?;
        self.board = Board { columns };
        Ok(())
    }

    /// Set or clear the assignee filter, then reload.
    pub fn filter_by_user(&mut self, api: &impl BoardGateway, user: Option<&User>) -> Result<(), ApiError> {
        self.assignee_filter = user.map(|u| u.label().to_string());
        self.load(api)
    }

    /// Move a task, persisting every affected index. All writes are attempted
    /// even after a failure; the first error is returned and the caller is
    /// expected to reload. Returns false for a stale no-op.
    pub fn move_task(
        &mut self,
        api: &impl BoardGateway,
        from_col: usize,
        from_idx: usize,
        to_col: usize,
        to_idx: usize,
    ) -> Result<bool, ApiError> {
        let writes = splice_task_move(&mut self.board, from_col, from_idx, to_col, to_idx);
        if writes.is_empty() {
            return Ok(false);
        }
        let mut first_err = None;
        for write in writes {
            if let Err(err) = api.update_task(&write.task_id, &write.patch) {
                first_err.get_or_insert(err);
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(true),
        }
    }

    /// Move a column, persisting the new order as one bulk reorder call.
    pub fn move_column(
        &mut self,
        api: &impl BoardGateway,
        from: usize,
        to: usize,
    ) -> Result<bool, ApiError> {
        match splice_column_move(&mut self.board, from, to) {
            Some(ids) => {
                api.reorder_columns(&ids)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Create a task at the end of a column; the returned entity is appended
    /// locally as-is.
    pub fn create_task(
        &mut self,
        api: &impl BoardGateway,
        col_idx: usize,
        title: &str,
    ) -> Result<(), ApiError> {
        let Some(col) = self.board.columns.get(col_idx) else {
            return Ok(());
        };
        let title = if title.trim().is_empty() { "New Task" } else { title.trim() };
        let body = TaskCreate {
            title: title.to_string(),
            description: None,
            order_index: col.tasks.len() as u32,
            column_id: col.id.clone(),
        };
        let task = api.create_task(&body)?;
        self.board.columns[col_idx].tasks.push(task);
        Ok(())
    }

    /// Create a column at the end of the board.
    pub fn create_column(&mut self, api: &impl BoardGateway, title: &str) -> Result<(), ApiError> {
        let title = if title.trim().is_empty() { "New Column" } else { title.trim() };
        let body = ColumnCreate {
            title: title.to_string(),
            order_index: self.board.columns.len() as u32,
        };
        let col = api.create_column(&body)?;
        self.board.columns.push(col);
        Ok(())
    }

    /// PATCH a task, then reconcile the returned entity into the tree.
    /// Returns whether the task was still present locally.
    pub fn update_task(
        &mut self,
        api: &impl BoardGateway,
        task_id: &str,
        patch: &TaskPatch,
    ) -> Result<bool, ApiError> {
        let updated = api.update_task(task_id, patch)?;
        Ok(sync_task_in_board(&mut self.board, updated))
    }

    /// Delete a task, then reload regardless of deletion success so the local
    /// tree re-converges either way.
    pub fn delete_task(&mut self, api: &impl BoardGateway, task_id: &str) -> Result<(), ApiError> {
        let deleted = api.delete_task(task_id);
        let reloaded = self.load(api);
        deleted.and(reloaded)
    }

    /// Delete a column, then reload regardless of deletion success.
    pub fn delete_column(&mut self, api: &impl BoardGateway, column_id: &str) -> Result<(), ApiError> {
        let deleted = api.delete_column(column_id);
        let reloaded = self.load(api);
        deleted.and(reloaded)
    }

    /// Replace a task's assignee set, then reload so filtered views stay
    /// consistent with the server.
    pub fn apply_assignees(
        &mut self,
        api: &impl BoardGateway,
        task_id: &str,
        assignee_ids: Vec<String>,
    ) -> Result<(), ApiError> {
        let patch = TaskPatch {
            assignee_ids: Some(assignee_ids),
            ..TaskPatch::default()
        };
        api.update_task(task_id, &patch)?;
        self.load(api)
    }

    pub fn rename_column(
        &mut self,
        api: &impl BoardGateway,
        col_idx: usize,
        title: &str,
    ) -> Result<(), ApiError> {
        let Some(col) = self.board.columns.get(col_idx) else {
            return Ok(());
        };
        let body = crate::api::ColumnPatch {
            title: Some(title.to_string()),
        };
        let updated = api.update_column(&col.id, &body)?;
        self.board.columns[col_idx].title = updated.title;
        Ok(())
    }
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new()
    }
}
