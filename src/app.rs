use std::time::{Duration, Instant};

use crossterm::event::{self, Event};
use ratatui::DefaultTerminal;

use crate::api::{ApiClient, ApiError, TaskPatch};
use crate::board::store::BoardStore;
use crate::board::{Board, Comment, HistoryEntry, Priority, Task, User};
use crate::input::action::Action;
use crate::input::keymap::map_key;
use crate::session::Session;

/// Reusable text editing buffer with cursor.
///
/// `cursor` is a **char index** (not byte index), always in `0..=char_count`.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    pub input: String,
    pub cursor: usize,
}

impl TextBuffer {
    pub fn new(input: String) -> Self {
        let cursor = input.chars().count();
        Self { input, cursor }
    }

    pub fn empty() -> Self {
        Self { input: String::new(), cursor: 0 }
    }

    /// Convert a char index to a byte index.
    fn byte_offset(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    pub fn insert(&mut self, c: char) {
        let byte_idx = self.byte_offset(self.cursor);
        self.input.insert(byte_idx, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let byte_idx = self.byte_offset(self.cursor - 1);
            self.input.remove(byte_idx);
            self.cursor -= 1;
        }
    }

    pub fn delete_word(&mut self) {
        let byte_pos = self.byte_offset(self.cursor);
        let before = &self.input[..byte_pos];
        let trimmed = before.trim_end();
        let start_byte = trimmed
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8()) // byte after the whitespace char
            .unwrap_or(0);
        // Convert start_byte back to char index
        let start_char = self.input[..start_byte].chars().count();
        self.input.drain(start_byte..byte_pos);
        self.cursor = start_char;
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.input.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.input.chars().count();
    }
}

/// Tabs in the task detail overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailTab {
    Overview,
    Comments,
    History,
}

impl DetailTab {
    pub const ALL: [DetailTab; 3] = [Self::Overview, Self::Comments, Self::History];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Comments => "Comments",
            Self::History => "History",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Overview => Self::Comments,
            Self::Comments => Self::History,
            Self::History => Self::Overview,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Overview => Self::History,
            Self::Comments => Self::Overview,
            Self::History => Self::Comments,
        }
    }
}

/// Current interaction mode.
#[derive(Debug, Clone)]
pub enum Mode {
    Normal,
    Goto,
    Space,
    Input {
        prompt: &'static str,
        buf: TextBuffer,
        on_confirm: InputTarget,
    },
    Confirm {
        prompt: &'static str,
        on_confirm: ConfirmTarget,
    },
    Picker {
        title: &'static str,
        items: Vec<String>,
        checked: Vec<bool>,
        selected: usize,
        target: PickerTarget,
    },
    TaskDetail {
        tab: DetailTab,
        scroll: u16,
    },
    Help,
}

#[derive(Debug, Clone)]
pub enum InputTarget {
    NewTaskTitle,
    NewColumnTitle,
    RenameColumn,
    EditTitle,
    EditDescription,
    EditLabels,
    DueDate,
    InviteEmail,
    NewComment,
}

#[derive(Debug, Clone)]
pub enum ConfirmTarget {
    DeleteTask(String),
    DeleteColumn(String),
}

#[derive(Debug, Clone)]
pub enum PickerTarget {
    /// Single-select over the other columns; ids parallel `items` so
    /// duplicate titles still resolve to the right column.
    MoveToColumn {
        column_ids: Vec<String>,
    },
    /// Multi-select over the full user list; indices parallel `items`.
    AssigneeSelect {
        task_id: String,
        users: Vec<User>,
    },
    /// Single-select over users currently assigned on the board.
    AssigneeFilter {
        users: Vec<User>,
    },
}

/// Notification severity for statusbar coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// Global application state.
pub struct AppState {
    pub mode: Mode,
    pub focused_column: usize,
    pub selected_task: usize,
    pub session: Session,
    pub notification: Option<String>,
    pub notification_level: NotificationLevel,
    pub notification_expires: Option<Instant>,
    pub should_quit: bool,
    /// Lazily fetched `/users` list for the assignee picker.
    pub users: Option<Vec<User>>,
    /// Data backing the detail overlay, refreshed when it opens.
    pub detail_comments: Vec<Comment>,
    pub detail_history: Vec<HistoryEntry>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            mode: Mode::Normal,
            focused_column: 0,
            selected_task: 0,
            session,
            notification: None,
            notification_level: NotificationLevel::Info,
            notification_expires: None,
            should_quit: false,
            users: None,
            detail_comments: Vec::new(),
            detail_history: Vec::new(),
        }
    }

    /// Get a reference to the currently selected task.
    pub fn selected_task_ref<'a>(&self, board: &'a Board) -> Option<&'a Task> {
        board
            .columns
            .get(self.focused_column)
            .and_then(|col| col.tasks.get(self.selected_task))
    }

    pub fn is_admin(&self) -> bool {
        self.session.user.is_admin
    }

    /// Show a transient notification.
    pub fn notify(&mut self, msg: impl Into<String>) {
        self.notification = Some(msg.into());
        self.notification_level = NotificationLevel::Info;
        self.notification_expires = Some(Instant::now() + Duration::from_secs(3));
    }

    /// Show a transient error notification (rendered in red).
    pub fn notify_error(&mut self, msg: impl Into<String>) {
        self.notification = Some(msg.into());
        self.notification_level = NotificationLevel::Error;
        self.notification_expires = Some(Instant::now() + Duration::from_secs(5));
    }

    /// Clear expired notifications.
    pub fn tick_notification(&mut self) {
        if let Some(expires) = self.notification_expires {
            if Instant::now() >= expires {
                self.notification = None;
                self.notification_level = NotificationLevel::Info;
                self.notification_expires = None;
            }
        }
    }

    /// Clamp the focus and selection to the board's current shape.
    pub fn clamp_selection(&mut self, board: &Board) {
        if !board.columns.is_empty() && self.focused_column >= board.columns.len() {
            self.focused_column = board.columns.len() - 1;
        }
        if let Some(col) = board.columns.get(self.focused_column) {
            if col.tasks.is_empty() {
                self.selected_task = 0;
            } else if self.selected_task >= col.tasks.len() {
                self.selected_task = col.tasks.len() - 1;
            }
        }
    }
}

/// Surface a gateway error in the status bar. A rejected credential gets an
/// actionable hint instead of the raw status line.
fn notify_api_error(state: &mut AppState, err: &ApiError) {
    match err {
        ApiError::Unauthorized => {
            state.notify_error("Session rejected by server — run `kanri login`");
        }
        other => state.notify_error(other.to_string()),
    }
}

/// Re-converge on server truth after a failed structural mutation.
fn recover_board(store: &mut BoardStore, state: &mut AppState, api: &ApiClient) {
    if let Err(err) = store.load(api) {
        notify_api_error(state, &err);
    }
    state.clamp_selection(&store.board);
}

/// Main TUI application loop.
pub fn run(
    terminal: &mut DefaultTerminal,
    api: &ApiClient,
    store: &mut BoardStore,
    session: Session,
) -> color_eyre::Result<()> {
    let mut state = AppState::new(session);
    state.clamp_selection(&store.board);

    loop {
        state.tick_notification();

        let today = chrono::Local::now().date_naive();
        let filter = store.assignee_filter.clone();
        terminal.draw(|f| crate::ui::render(f, &store.board, &state, filter.as_deref(), today))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                let action = map_key(key, &state.mode);
                process_action(store, &mut state, api, action);

                if state.should_quit {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn process_action(store: &mut BoardStore, state: &mut AppState, api: &ApiClient, action: Action) {
    let was_minor_mode = matches!(state.mode, Mode::Goto | Mode::Space);

    match action {
        Action::None => {
            if was_minor_mode {
                state.mode = Mode::Normal;
            }
        }

        // Navigation
        Action::FocusPrevColumn
        | Action::FocusNextColumn
        | Action::SelectPrevTask
        | Action::SelectNextTask => {
            handle_navigation(&store.board, state, action, was_minor_mode);
        }

        // Goto / Jump
        Action::JumpToColumn(_) | Action::JumpToFirstTask | Action::JumpToLastTask => {
            handle_goto(&store.board, state, action);
        }

        // Task movement & actions
        Action::MoveTaskPrevColumn
        | Action::MoveTaskNextColumn
        | Action::MoveTaskUp
        | Action::MoveTaskDown
        | Action::MoveColumnLeft
        | Action::MoveColumnRight
        | Action::NewTask
        | Action::NewColumn
        | Action::RenameColumn
        | Action::DeleteTask
        | Action::DeleteColumn
        | Action::EditTitle
        | Action::EditDescription
        | Action::EditLabels
        | Action::EditAssignees
        | Action::CyclePriority
        | Action::SetDueDate
        | Action::MoveToColumn
        | Action::OpenTaskDetail
        | Action::ClosePanel
        | Action::DetailScrollDown
        | Action::DetailScrollUp
        | Action::DetailNextTab
        | Action::DetailPrevTab
        | Action::DetailNextTask
        | Action::DetailPrevTask
        | Action::NewComment
        | Action::InviteUser => {
            handle_task_action(store, state, api, action, was_minor_mode);
        }

        // Filter
        Action::FilterByAssignee => {
            handle_filter_start(&store.board, state);
        }
        Action::ClearFilters => {
            if store.assignee_filter.is_some() {
                match store.filter_by_user(api, None) {
                    Ok(()) => state.notify("Filter cleared"),
                    Err(err) => notify_api_error(state, &err),
                }
                state.clamp_selection(&store.board);
            }
        }

        // Text input delegation
        Action::InputChar(_)
        | Action::InputBackspace
        | Action::InputLeft
        | Action::InputRight
        | Action::InputHome
        | Action::InputEnd
        | Action::InputDeleteWord
        | Action::ToggleSelection
        | Action::InputConfirm
        | Action::InputCancel => {
            handle_input(store, state, api, action);
        }

        // Confirmation
        Action::Confirm | Action::Deny => {
            handle_confirm(store, state, api, action);
        }

        // Mode entry
        Action::EnterGotoMode => state.mode = Mode::Goto,
        Action::EnterSpaceMode => state.mode = Mode::Space,

        // Board-level actions
        Action::ReloadBoard => {
            state.mode = Mode::Normal;
            match store.load(api) {
                Ok(()) => state.notify("Board reloaded"),
                Err(err) => notify_api_error(state, &err),
            }
            state.clamp_selection(&store.board);
        }
        Action::ShowHelp => state.mode = Mode::Help,
        Action::Quit => match &state.mode {
            Mode::Normal => state.should_quit = true,
            _ => state.mode = Mode::Normal,
        },
    }
}

// ---------------------------------------------------------------------------
// Handler: Navigation (column focus, task selection)
// ---------------------------------------------------------------------------

fn handle_navigation(board: &Board, state: &mut AppState, action: Action, was_minor_mode: bool) {
    match action {
        Action::FocusPrevColumn => {
            if was_minor_mode {
                state.mode = Mode::Normal;
            }
            if state.focused_column > 0 {
                state.focused_column -= 1;
                state.clamp_selection(board);
            }
        }
        Action::FocusNextColumn => {
            if was_minor_mode {
                state.mode = Mode::Normal;
            }
            if state.focused_column + 1 < board.columns.len() {
                state.focused_column += 1;
                state.clamp_selection(board);
            }
        }
        Action::SelectPrevTask => match &mut state.mode {
            Mode::Picker { selected, .. } => {
                if *selected > 0 {
                    *selected -= 1;
                }
            }
            _ => {
                if was_minor_mode {
                    state.mode = Mode::Normal;
                }
                if state.selected_task > 0 {
                    state.selected_task -= 1;
                }
            }
        },
        Action::SelectNextTask => match &mut state.mode {
            Mode::Picker { selected, items, .. } => {
                if *selected + 1 < items.len() {
                    *selected += 1;
                }
            }
            _ => {
                if was_minor_mode {
                    state.mode = Mode::Normal;
                }
                if let Some(col) = board.columns.get(state.focused_column) {
                    if state.selected_task + 1 < col.tasks.len() {
                        state.selected_task += 1;
                    }
                }
            }
        },
        _ => unreachable!(),
    }
}

// ---------------------------------------------------------------------------
// Handler: Goto / Jump actions
// ---------------------------------------------------------------------------

fn handle_goto(board: &Board, state: &mut AppState, action: Action) {
    state.mode = Mode::Normal;
    match action {
        Action::JumpToColumn(idx) => {
            if idx < board.columns.len() {
                state.focused_column = idx;
                state.selected_task = 0;
                state.clamp_selection(board);
            }
        }
        Action::JumpToFirstTask => {
            state.selected_task = 0;
        }
        Action::JumpToLastTask => {
            if let Some(col) = board.columns.get(state.focused_column) {
                state.selected_task = col.tasks.len().saturating_sub(1);
            }
        }
        _ => unreachable!(),
    }
}

// ---------------------------------------------------------------------------
// Handler: Task and column actions (movement, CRUD, edits, detail view)
// ---------------------------------------------------------------------------

/// Gate column/task creation and invites to admins, as the server will
/// reject them anyway.
fn require_admin(state: &mut AppState) -> bool {
    if state.is_admin() {
        true
    } else {
        state.notify_error("Admin access required");
        false
    }
}

fn handle_task_action(
    store: &mut BoardStore,
    state: &mut AppState,
    api: &ApiClient,
    action: Action,
    was_minor_mode: bool,
) {
    match action {
        Action::MoveTaskPrevColumn => {
            if was_minor_mode {
                state.mode = Mode::Normal;
            }
            if state.focused_column > 0 {
                move_task_to(store, state, api, state.focused_column - 1);
            }
        }
        Action::MoveTaskNextColumn => {
            if was_minor_mode {
                state.mode = Mode::Normal;
            }
            if state.focused_column + 1 < store.board.columns.len() {
                move_task_to(store, state, api, state.focused_column + 1);
            }
        }
        Action::MoveTaskUp => {
            move_task_within(store, state, api, false);
        }
        Action::MoveTaskDown => {
            move_task_within(store, state, api, true);
        }
        Action::MoveColumnLeft => {
            if state.focused_column > 0 {
                move_column(store, state, api, state.focused_column - 1);
            }
        }
        Action::MoveColumnRight => {
            if state.focused_column + 1 < store.board.columns.len() {
                move_column(store, state, api, state.focused_column + 1);
            }
        }
        Action::NewTask => {
            state.mode = Mode::Normal;
            if require_admin(state) && !store.board.columns.is_empty() {
                state.mode = Mode::Input {
                    prompt: "New task",
                    buf: TextBuffer::empty(),
                    on_confirm: InputTarget::NewTaskTitle,
                };
            }
        }
        Action::NewColumn => {
            state.mode = Mode::Normal;
            if require_admin(state) {
                state.mode = Mode::Input {
                    prompt: "New column",
                    buf: TextBuffer::empty(),
                    on_confirm: InputTarget::NewColumnTitle,
                };
            }
        }
        Action::RenameColumn => {
            state.mode = Mode::Normal;
            if let Some(col) = store.board.columns.get(state.focused_column) {
                let current = col.title.clone();
                state.mode = Mode::Input {
                    prompt: "Rename column",
                    buf: TextBuffer::new(current),
                    on_confirm: InputTarget::RenameColumn,
                };
            }
        }
        Action::DeleteTask => {
            state.mode = Mode::Normal;
            if let Some(task) = state.selected_task_ref(&store.board) {
                let id = task.id.clone();
                state.mode = Mode::Confirm {
                    prompt: "Delete task?",
                    on_confirm: ConfirmTarget::DeleteTask(id),
                };
            }
        }
        Action::DeleteColumn => {
            state.mode = Mode::Normal;
            if require_admin(state) {
                if let Some(col) = store.board.columns.get(state.focused_column) {
                    let id = col.id.clone();
                    state.mode = Mode::Confirm {
                        prompt: "Delete column and all its tasks?",
                        on_confirm: ConfirmTarget::DeleteColumn(id),
                    };
                }
            }
        }
        Action::EditTitle => {
            if let Some(task) = state.selected_task_ref(&store.board) {
                let current = task.title.clone();
                state.mode = Mode::Input {
                    prompt: "Title",
                    buf: TextBuffer::new(current),
                    on_confirm: InputTarget::EditTitle,
                };
            } else {
                state.mode = Mode::Normal;
            }
        }
        Action::EditDescription => {
            if let Some(task) = state.selected_task_ref(&store.board) {
                let current = task.description.clone().unwrap_or_default();
                state.mode = Mode::Input {
                    prompt: "Description",
                    buf: TextBuffer::new(current),
                    on_confirm: InputTarget::EditDescription,
                };
            } else {
                state.mode = Mode::Normal;
            }
        }
        Action::EditLabels => {
            if let Some(task) = state.selected_task_ref(&store.board) {
                let current = task.labels.clone().unwrap_or_default();
                state.mode = Mode::Input {
                    prompt: "Labels (comma-separated)",
                    buf: TextBuffer::new(current),
                    on_confirm: InputTarget::EditLabels,
                };
            } else {
                state.mode = Mode::Normal;
            }
        }
        Action::EditAssignees => {
            open_assignee_picker(store, state, api);
        }
        Action::CyclePriority => {
            if was_minor_mode {
                state.mode = Mode::Normal;
            }
            cycle_priority(store, state, api);
        }
        Action::SetDueDate => {
            if let Some(task) = state.selected_task_ref(&store.board) {
                let current = task
                    .due_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                state.mode = Mode::Input {
                    prompt: "Due date (YYYY-MM-DD, empty clears)",
                    buf: TextBuffer::new(current),
                    on_confirm: InputTarget::DueDate,
                };
            } else {
                state.mode = Mode::Normal;
            }
        }
        Action::MoveToColumn => {
            state.mode = Mode::Normal;
            if state.selected_task_ref(&store.board).is_some() {
                let (items, column_ids): (Vec<String>, Vec<String>) = store
                    .board
                    .columns
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != state.focused_column)
                    .map(|(_, col)| (col.title.clone(), col.id.clone()))
                    .unzip();
                if items.is_empty() {
                    state.notify("No other columns");
                } else {
                    let checked = vec![false; items.len()];
                    state.mode = Mode::Picker {
                        title: "move to column",
                        items,
                        checked,
                        selected: 0,
                        target: PickerTarget::MoveToColumn { column_ids },
                    };
                }
            }
        }
        Action::InviteUser => {
            state.mode = Mode::Normal;
            if require_admin(state) {
                state.mode = Mode::Input {
                    prompt: "Invite email",
                    buf: TextBuffer::empty(),
                    on_confirm: InputTarget::InviteEmail,
                };
            }
        }
        Action::OpenTaskDetail => {
            open_detail(store, state, api, DetailTab::Overview);
        }
        Action::ClosePanel => {
            state.mode = Mode::Normal;
        }
        Action::DetailScrollDown => {
            if let Mode::TaskDetail { scroll, .. } = &mut state.mode {
                *scroll = scroll.saturating_add(1);
            }
        }
        Action::DetailScrollUp => {
            if let Mode::TaskDetail { scroll, .. } = &mut state.mode {
                *scroll = scroll.saturating_sub(1);
            }
        }
        Action::DetailNextTab => {
            if let Mode::TaskDetail { tab, scroll } = &mut state.mode {
                *tab = tab.next();
                *scroll = 0;
            }
        }
        Action::DetailPrevTab => {
            if let Mode::TaskDetail { tab, scroll } = &mut state.mode {
                *tab = tab.prev();
                *scroll = 0;
            }
        }
        Action::DetailNextTask => {
            let tab = match &state.mode {
                Mode::TaskDetail { tab, .. } => *tab,
                _ => DetailTab::Overview,
            };
            if let Some(col) = store.board.columns.get(state.focused_column) {
                if state.selected_task + 1 < col.tasks.len() {
                    state.selected_task += 1;
                    open_detail(store, state, api, tab);
                }
            }
        }
        Action::DetailPrevTask => {
            let tab = match &state.mode {
                Mode::TaskDetail { tab, .. } => *tab,
                _ => DetailTab::Overview,
            };
            if state.selected_task > 0 {
                state.selected_task -= 1;
                open_detail(store, state, api, tab);
            }
        }
        Action::NewComment => {
            if state.selected_task_ref(&store.board).is_some() {
                state.mode = Mode::Input {
                    prompt: "Comment",
                    buf: TextBuffer::empty(),
                    on_confirm: InputTarget::NewComment,
                };
            }
        }
        _ => unreachable!(),
    }
}

/// Move the selected task to another column, keeping its row where possible.
fn move_task_to(store: &mut BoardStore, state: &mut AppState, api: &ApiClient, to_col: usize) {
    let from_col = state.focused_column;
    let Some(col) = store.board.columns.get(from_col) else {
        return;
    };
    if col.tasks.is_empty() {
        return;
    }
    let from_idx = state.selected_task.min(col.tasks.len() - 1);
    let to_idx = state
        .selected_task
        .min(store.board.columns[to_col].tasks.len());

    match store.move_task(api, from_col, from_idx, to_col, to_idx) {
        Ok(true) => {
            state.focused_column = to_col;
            state.selected_task = to_idx;
            state.clamp_selection(&store.board);
            state.notify("Task moved");
        }
        Ok(false) => {}
        Err(err) => {
            notify_api_error(state, &err);
            recover_board(store, state, api);
        }
    }
}

/// Move the selected task one slot up or down within its column.
fn move_task_within(store: &mut BoardStore, state: &mut AppState, api: &ApiClient, down: bool) {
    let col_idx = state.focused_column;
    let Some(col) = store.board.columns.get(col_idx) else {
        return;
    };
    if col.tasks.is_empty() {
        return;
    }
    let from_idx = state.selected_task.min(col.tasks.len() - 1);
    let to_idx = if down {
        if from_idx + 1 >= col.tasks.len() {
            return;
        }
        from_idx + 1
    } else {
        if from_idx == 0 {
            return;
        }
        from_idx - 1
    };

    match store.move_task(api, col_idx, from_idx, col_idx, to_idx) {
        Ok(true) => {
            state.selected_task = to_idx;
        }
        Ok(false) => {}
        Err(err) => {
            notify_api_error(state, &err);
            recover_board(store, state, api);
        }
    }
}

fn move_column(store: &mut BoardStore, state: &mut AppState, api: &ApiClient, to: usize) {
    match store.move_column(api, state.focused_column, to) {
        Ok(true) => {
            state.focused_column = to;
            state.notify("Column moved");
        }
        Ok(false) => {}
        Err(err) => {
            notify_api_error(state, &err);
            recover_board(store, state, api);
        }
    }
}

fn cycle_priority(store: &mut BoardStore, state: &mut AppState, api: &ApiClient) {
    let Some(task) = state.selected_task_ref(&store.board) else {
        return;
    };
    let task_id = task.id.clone();
    let next = Priority::cycle(task.priority);
    let patch = TaskPatch {
        priority: Some(next),
        ..TaskPatch::default()
    };
    match store.update_task(api, &task_id, &patch) {
        Ok(true) => {
            let label = next.map(|p| p.to_string()).unwrap_or_else(|| "none".into());
            state.notify(format!("Priority: {label}"));
        }
        Ok(false) => state.notify_error("Task vanished — reload the board"),
        Err(err) => notify_api_error(state, &err),
    }
}

/// Open the multi-select assignee picker, fetching the user list on first use.
fn open_assignee_picker(store: &mut BoardStore, state: &mut AppState, api: &ApiClient) {
    state.mode = Mode::Normal;
    let Some(task) = state.selected_task_ref(&store.board) else {
        return;
    };
    let task_id = task.id.clone();
    let assigned: Vec<String> = task.assignees.iter().map(|u| u.id.clone()).collect();

    if state.users.is_none() {
        match api.list_users() {
            Ok(users) => state.users = Some(users),
            Err(err) => {
                notify_api_error(state, &err);
                return;
            }
        }
    }
    let users = state.users.clone().unwrap_or_default();
    if users.is_empty() {
        state.notify("No users to assign");
        return;
    }
    let items: Vec<String> = users.iter().map(|u| u.label().to_string()).collect();
    let checked: Vec<bool> = users.iter().map(|u| assigned.contains(&u.id)).collect();
    state.mode = Mode::Picker {
        title: "assignees",
        items,
        checked,
        selected: 0,
        target: PickerTarget::AssigneeSelect { task_id, users },
    };
}

/// Refresh detail data and enter the detail overlay on the given tab.
fn open_detail(store: &mut BoardStore, state: &mut AppState, api: &ApiClient, tab: DetailTab) {
    let Some(task) = state.selected_task_ref(&store.board) else {
        return;
    };
    let task_id = task.id.clone();
    match api.list_comments(&task_id) {
        Ok(comments) => state.detail_comments = comments,
        Err(err) => {
            state.detail_comments = Vec::new();
            notify_api_error(state, &err);
        }
    }
    match api.list_history(&task_id) {
        Ok(history) => state.detail_history = history,
        Err(err) => {
            state.detail_history = Vec::new();
            notify_api_error(state, &err);
        }
    }
    state.mode = Mode::TaskDetail { tab, scroll: 0 };
}

// ---------------------------------------------------------------------------
// Handler: Filter start (assignee picker)
// ---------------------------------------------------------------------------

fn handle_filter_start(board: &Board, state: &mut AppState) {
    state.mode = Mode::Normal;
    let users = board.unique_assignees();
    if users.is_empty() {
        state.notify("No assignees on the board");
        return;
    }
    let items: Vec<String> = users.iter().map(|u| u.label().to_string()).collect();
    let checked = vec![false; items.len()];
    state.mode = Mode::Picker {
        title: "filter by assignee",
        items,
        checked,
        selected: 0,
        target: PickerTarget::AssigneeFilter { users },
    };
}

// ---------------------------------------------------------------------------
// Handler: Text input (char entry, cursor movement, confirm, cancel)
// ---------------------------------------------------------------------------

fn handle_input(store: &mut BoardStore, state: &mut AppState, api: &ApiClient, action: Action) {
    match action {
        Action::InputChar(c) => {
            if let Mode::Input { buf, .. } = &mut state.mode {
                buf.insert(c);
            }
        }
        Action::InputBackspace => {
            if let Mode::Input { buf, .. } = &mut state.mode {
                buf.backspace();
            }
        }
        Action::InputLeft => {
            if let Mode::Input { buf, .. } = &mut state.mode {
                buf.move_left();
            }
        }
        Action::InputRight => {
            if let Mode::Input { buf, .. } = &mut state.mode {
                buf.move_right();
            }
        }
        Action::InputHome => {
            if let Mode::Input { buf, .. } = &mut state.mode {
                buf.home();
            }
        }
        Action::InputEnd => {
            if let Mode::Input { buf, .. } = &mut state.mode {
                buf.end();
            }
        }
        Action::InputDeleteWord => {
            if let Mode::Input { buf, .. } = &mut state.mode {
                buf.delete_word();
            }
        }
        Action::ToggleSelection => {
            if let Mode::Picker { checked, selected, target, .. } = &mut state.mode {
                match target {
                    PickerTarget::AssigneeSelect { .. } => {
                        if let Some(flag) = checked.get_mut(*selected) {
                            *flag = !*flag;
                        }
                    }
                    // Single-select pickers have no toggle state.
                    PickerTarget::MoveToColumn { .. } | PickerTarget::AssigneeFilter { .. } => {}
                }
            }
        }
        Action::InputConfirm => {
            handle_input_confirm(store, state, api);
        }
        Action::InputCancel => {
            state.mode = Mode::Normal;
        }
        _ => unreachable!(),
    }
}

/// Process InputConfirm for Input and Picker modes.
fn handle_input_confirm(store: &mut BoardStore, state: &mut AppState, api: &ApiClient) {
    let old_mode = std::mem::replace(&mut state.mode, Mode::Normal);

    match old_mode {
        Mode::Input { buf, on_confirm, .. } => {
            confirm_text_input(store, state, api, on_confirm, buf.input);
        }
        Mode::Picker { checked, selected, target, .. } => match target {
            PickerTarget::MoveToColumn { column_ids } => {
                if let Some(to) = picker_destination(&store.board, &column_ids, selected) {
                    move_task_to(store, state, api, to);
                }
            }
            PickerTarget::AssigneeSelect { task_id, users } => {
                let ids: Vec<String> = users
                    .iter()
                    .zip(checked.iter())
                    .filter(|(_, on)| **on)
                    .map(|(u, _)| u.id.clone())
                    .collect();
                match store.apply_assignees(api, &task_id, ids) {
                    Ok(()) => state.notify("Assignees updated"),
                    Err(err) => notify_api_error(state, &err),
                }
                state.clamp_selection(&store.board);
            }
            PickerTarget::AssigneeFilter { users } => {
                if let Some(user) = users.get(selected) {
                    match store.filter_by_user(api, Some(user)) {
                        Ok(()) => state.notify(format!("Filtering by {}", user.label())),
                        Err(err) => notify_api_error(state, &err),
                    }
                    state.focused_column = 0;
                    state.selected_task = 0;
                    state.clamp_selection(&store.board);
                }
            }
        },
        _ => {}
    }
}

/// Resolve the picked entry to a current column index via the id carried by
/// the picker. Returns None when the entry or the column is gone.
fn picker_destination(board: &Board, column_ids: &[String], selected: usize) -> Option<usize> {
    column_ids
        .get(selected)
        .and_then(|id| board.column_index(id))
}

fn confirm_text_input(
    store: &mut BoardStore,
    state: &mut AppState,
    api: &ApiClient,
    target: InputTarget,
    input: String,
) {
    match target {
        InputTarget::NewTaskTitle => {
            match store.create_task(api, state.focused_column, &input) {
                Ok(()) => state.notify("Task created"),
                Err(err) => notify_api_error(state, &err),
            }
        }
        InputTarget::NewColumnTitle => match store.create_column(api, &input) {
            Ok(()) => state.notify("Column created"),
            Err(err) => notify_api_error(state, &err),
        },
        InputTarget::RenameColumn => {
            let title = input.trim();
            if !title.is_empty() {
                match store.rename_column(api, state.focused_column, title) {
                    Ok(()) => state.notify("Column renamed"),
                    Err(err) => notify_api_error(state, &err),
                }
            }
        }
        InputTarget::EditTitle => {
            let title = input.trim().to_string();
            if !title.is_empty() {
                patch_selected_task(
                    store,
                    state,
                    api,
                    TaskPatch { title: Some(title), ..TaskPatch::default() },
                    "Title updated",
                );
            }
        }
        InputTarget::EditDescription => {
            let description = input.trim().to_string();
            patch_selected_task(
                store,
                state,
                api,
                TaskPatch { description: Some(description), ..TaskPatch::default() },
                "Description updated",
            );
        }
        InputTarget::EditLabels => {
            let labels = input.trim();
            let value = if labels.is_empty() { None } else { Some(labels.to_string()) };
            patch_selected_task(
                store,
                state,
                api,
                TaskPatch { labels: Some(value), ..TaskPatch::default() },
                "Labels updated",
            );
        }
        InputTarget::DueDate => {
            let text = input.trim();
            if text.is_empty() {
                patch_selected_task(
                    store,
                    state,
                    api,
                    TaskPatch { due_date: Some(None), ..TaskPatch::default() },
                    "Due date cleared",
                );
            } else {
                match chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d") {
                    Ok(date) => patch_selected_task(
                        store,
                        state,
                        api,
                        TaskPatch { due_date: Some(Some(date)), ..TaskPatch::default() },
                        "Due date set",
                    ),
                    Err(_) => state.notify_error("Invalid date, expected YYYY-MM-DD"),
                }
            }
        }
        InputTarget::InviteEmail => {
            let email = input.trim();
            if !email.is_empty() {
                match api.create_invite(email) {
                    Ok(invite) => {
                        state.notify(format!("Invited {} (token {})", invite.email, invite.token));
                    }
                    Err(err) => notify_api_error(state, &err),
                }
            }
        }
        InputTarget::NewComment => {
            let content = input.trim();
            let Some(task) = state.selected_task_ref(&store.board) else {
                return;
            };
            let task_id = task.id.clone();
            if !content.is_empty() {
                match api.add_comment(&task_id, content) {
                    Ok(comment) => {
                        state.detail_comments.push(comment);
                        state.notify("Comment added");
                    }
                    Err(err) => notify_api_error(state, &err),
                }
            }
            // Return to the detail overlay the comment was written from.
            state.mode = Mode::TaskDetail { tab: DetailTab::Comments, scroll: 0 };
        }
    }
}

fn patch_selected_task(
    store: &mut BoardStore,
    state: &mut AppState,
    api: &ApiClient,
    patch: TaskPatch,
    success_msg: &str,
) {
    let Some(task) = state.selected_task_ref(&store.board) else {
        return;
    };
    let task_id = task.id.clone();
    match store.update_task(api, &task_id, &patch) {
        Ok(true) => state.notify(success_msg.to_string()),
        Ok(false) => state.notify_error("Task vanished — reload the board"),
        Err(err) => notify_api_error(state, &err),
    }
}

// ---------------------------------------------------------------------------
// Handler: Confirmation (delete task / delete column)
// ---------------------------------------------------------------------------

fn handle_confirm(store: &mut BoardStore, state: &mut AppState, api: &ApiClient, action: Action) {
    match action {
        Action::Confirm => {
            let target = match &state.mode {
                Mode::Confirm { on_confirm, .. } => Some(on_confirm.clone()),
                _ => None,
            };
            state.mode = Mode::Normal;
            match target {
                Some(ConfirmTarget::DeleteTask(id)) => {
                    match store.delete_task(api, &id) {
                        Ok(()) => state.notify("Task deleted"),
                        Err(err) => notify_api_error(state, &err),
                    }
                    state.clamp_selection(&store.board);
                }
                Some(ConfirmTarget::DeleteColumn(id)) => {
                    match store.delete_column(api, &id) {
                        Ok(()) => state.notify("Column deleted"),
                        Err(err) => notify_api_error(state, &err),
                    }
                    state.clamp_selection(&store.board);
                }
                None => {}
            }
        }
        Action::Deny => {
            state.mode = Mode::Normal;
        }
        _ => unreachable!(),
    }
}
