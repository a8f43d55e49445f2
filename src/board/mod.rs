pub mod store;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A board member. Tasks reference users; they never own them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    /// Display label: name if set, otherwise email.
    pub fn label(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }

    /// Uppercase initials from the first two words of the label.
    pub fn initials(&self) -> String {
        let mut initials = String::new();
        for part in self.label().split_whitespace().take(2) {
            if let Some(c) = part.chars().next() {
                initials.extend(c.to_uppercase());
            }
        }
        initials
    }
}

/// Priority levels for tasks. Absent means unprioritized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Step through none → low → medium → high → none.
    pub fn cycle(current: Option<Priority>) -> Option<Priority> {
        match current {
            None => Some(Self::Low),
            Some(Self::Low) => Some(Self::Medium),
            Some(Self::Medium) => Some(Self::High),
            Some(Self::High) => None,
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown priority '{other}' (use low, medium, high)")),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owning-column reference carried by every task on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRef {
    pub id: String,
}

/// A single kanban task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub order_index: u32,
    pub column: ColumnRef,
    #[serde(default)]
    pub assignees: Vec<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Comma-separated free text, as stored server-side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
}

impl Task {
    /// Labels split out of the comma-separated field, trimmed, non-empty.
    pub fn label_list(&self) -> Vec<&str> {
        self.labels
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect()
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date.is_some_and(|due| due < today)
    }
}

/// A kanban column with its ordered tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    pub title: String,
    pub order_index: u32,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// A comment on a task. Append-only from the client's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub author: Option<User>,
}

/// Server-recorded audit action on a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryAction {
    Create,
    Update,
    Delete,
    Assign,
    Unassign,
    Move,
    /// Actions this client does not know about.
    #[serde(other)]
    Other,
}

impl HistoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Assign => "assign",
            Self::Unassign => "unassign",
            Self::Move => "move",
            Self::Other => "other",
        }
    }
}

/// One read-only audit-trail entry for a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub action: HistoryAction,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub old_value: Option<String>,
    #[serde(default)]
    pub new_value: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub actor: Option<User>,
}

/// The full board: ordered columns, each with ordered tasks.
///
/// Positions are implied by list order. The `order_index` fields mirror what
/// the server last acknowledged and are re-derived after every splice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    pub columns: Vec<Column>,
}

impl Board {
    /// Find which column a task is in and its index there.
    pub fn find_task(&self, task_id: &str) -> Option<(usize, usize)> {
        for (col_idx, col) in self.columns.iter().enumerate() {
            if let Some(task_idx) = col.tasks.iter().position(|t| t.id == task_id) {
                return Some((col_idx, task_idx));
            }
        }
        None
    }

    pub fn column_index(&self, column_id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == column_id)
    }

    /// Every distinct user assigned anywhere on the board, first-seen order.
    pub fn unique_assignees(&self) -> Vec<User> {
        let mut seen = std::collections::HashSet::new();
        let mut users = Vec::new();
        for col in &self.columns {
            for task in &col.tasks {
                for user in &task.assignees {
                    if seen.insert(user.id.clone()) {
                        users.push(user.clone());
                    }
                }
            }
        }
        users
    }
}


#[cfg(test)]
mod tests {
    use super::testutil::{column, task, user};
    use super::*;

    #[test]
    fn find_task_locates_across_columns() {
        let board = Board {
            columns: vec![column("a", 0, &["t1", "t2"]), column("b", 1, &["t3"])],
        };
        assert_eq!(board.find_task("t1"), Some((0, 0)));
        assert_eq!(board.find_task("t3"), Some((1, 0)));
        assert_eq!(board.find_task("nope"), None);
    }

    #[test]
    fn column_index_by_id() {
        let board = Board {
            columns: vec![column("a", 0, &[]), column("b", 1, &[])],
        };
        assert_eq!(board.column_index("b"), Some(1));
        assert_eq!(board.column_index("z"), None);
    }

    #[test]
    fn unique_assignees_dedupes_preserving_first_seen_order() {
        let alice = user("u1", "alice@example.com");
        let bob = user("u2", "bob@example.com");
        let mut t1 = task("t1", "a", 0);
        t1.assignees = vec![alice.clone(), bob.clone()];
        let mut t2 = task("t2", "a", 1);
        t2.assignees = vec![bob.clone()];
        let board = Board {
            columns: vec![Column {
                id: "a".into(),
                title: "A".into(),
                order_index: 0,
                tasks: vec![t1, t2],
            }],
        };
        let users = board.unique_assignees();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id, "u1");
        assert_eq!(users[1].id, "u2");
    }

    #[test]
    fn user_label_prefers_name_over_email() {
        let mut u = user("u1", "alice@example.com");
        assert_eq!(u.label(), "alice@example.com");
        u.name = Some("Alice Smith".into());
        assert_eq!(u.label(), "Alice Smith");
    }

    #[test]
    fn user_blank_name_falls_back_to_email() {
        let mut u = user("u1", "alice@example.com");
        u.name = Some("   ".into());
        assert_eq!(u.label(), "alice@example.com");
    }

    #[test]
    fn initials_from_name_words() {
        let mut u = user("u1", "alice@example.com");
        u.name = Some("Alice Smith".into());
        assert_eq!(u.initials(), "AS");
    }

    #[test]
    fn initials_single_word_label() {
        let u = user("u1", "alice@example.com");
        assert_eq!(u.initials(), "A");
    }

    #[test]
    fn label_list_splits_and_trims() {
        let mut t = task("t1", "a", 0);
        t.labels = Some("bug, ui , , infra".into());
        assert_eq!(t.label_list(), vec!["bug", "ui", "infra"]);
    }

    #[test]
    fn label_list_empty_when_absent() {
        let t = task("t1", "a", 0);
        assert!(t.label_list().is_empty());
    }

    #[test]
    fn overdue_only_for_past_due_dates() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let mut t = task("t1", "a", 0);
        assert!(!t.is_overdue(today));
        t.due_date = Some(today);
        assert!(!t.is_overdue(today));
        t.due_date = today.pred_opt();
        assert!(t.is_overdue(today));
    }

    #[test]
    fn priority_cycle_steps_through_all_and_wraps() {
        assert_eq!(Priority::cycle(None), Some(Priority::Low));
        assert_eq!(Priority::cycle(Some(Priority::Low)), Some(Priority::Medium));
        assert_eq!(Priority::cycle(Some(Priority::Medium)), Some(Priority::High));
        assert_eq!(Priority::cycle(Some(Priority::High)), None);
    }

    #[test]
    fn priority_parse_is_case_insensitive() {
        assert_eq!("HIGH".parse::<Priority>(), Ok(Priority::High));
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn task_deserializes_from_wire_shape() {
        let json = r#"{
            "id": "t-9",
            "title": "Fix login",
            "description": "401 on refresh",
            "orderIndex": 2,
            "column": {"id": "c-1"},
            "assignees": [{"id": "u-1", "email": "a@b.c", "isAdmin": true}],
            "priority": "high",
            "dueDate": "2026-09-01",
            "labels": "bug,auth"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.order_index, 2);
        assert_eq!(task.column.id, "c-1");
        assert_eq!(task.priority, Some(Priority::High));
        assert!(task.assignees[0].is_admin);
        assert_eq!(task.label_list(), vec!["bug", "auth"]);
    }

    #[test]
    fn task_tolerates_missing_optional_fields() {
        let json = r#"{"id": "t", "title": "T", "orderIndex": 0, "column": {"id": "c"}}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(task.description.is_none());
        assert!(task.assignees.is_empty());
        assert!(task.priority.is_none());
        assert!(task.due_date.is_none());
    }

    #[test]
    fn column_deserializes_with_nested_tasks() {
        let json = r#"{
            "id": "c-1",
            "title": "Doing",
            "orderIndex": 0,
            "tasks": [{"id": "t", "title": "T", "orderIndex": 0, "column": {"id": "c-1"}}]
        }"#;
        let col: Column = serde_json::from_str(json).unwrap();
        assert_eq!(col.tasks.len(), 1);
        assert_eq!(col.tasks[0].column.id, "c-1");
    }

    #[test]
    fn history_action_unknown_value_maps_to_other() {
        let entry: HistoryEntry = serde_json::from_str(
            r#"{"id": "h", "action": "archive", "createdAt": "2026-08-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(entry.action, HistoryAction::Other);
    }

    #[test]
    fn history_entry_full_shape() {
        let entry: HistoryEntry = serde_json::from_str(
            r#"{
                "id": "h-1",
                "action": "move",
                "field": "column",
                "oldValue": "Backlog",
                "newValue": "Doing",
                "createdAt": "2026-08-01T10:00:00Z",
                "actor": {"id": "u", "email": "a@b.c", "isAdmin": false}
            }"#,
        )
        .unwrap();
        assert_eq!(entry.action, HistoryAction::Move);
        assert_eq!(entry.field.as_deref(), Some("column"));
        assert_eq!(entry.old_value.as_deref(), Some("Backlog"));
    }

    #[test]
    fn comment_deserializes_without_author() {
        let comment: Comment = serde_json::from_str(
            r#"{"id": "c", "content": "ship it", "createdAt": "2026-08-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert!(comment.author.is_none());
    }
}
