use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::action::Action;
use crate::app::Mode;

/// Map a key event to a semantic action based on current mode.
pub fn map_key(key: KeyEvent, mode: &Mode) -> Action {
    match mode {
        Mode::Normal => map_normal(key),
        Mode::Goto => map_goto(key),
        Mode::Space => map_space(key),
        Mode::Input { .. } => map_input(key),
        Mode::Confirm { .. } => map_confirm(key),
        Mode::Picker { .. } => map_picker(key),
        Mode::Help => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Action::ClosePanel,
            _ => Action::None,
        },
        Mode::TaskDetail { .. } => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Action::ClosePanel,
            KeyCode::Tab => Action::DetailNextTab,
            KeyCode::BackTab => Action::DetailPrevTab,
            KeyCode::Char('j') | KeyCode::Down => Action::DetailNextTask,
            KeyCode::Char('k') | KeyCode::Up => Action::DetailPrevTask,
            KeyCode::Char('J') => Action::DetailScrollDown,
            KeyCode::Char('K') => Action::DetailScrollUp,
            KeyCode::Char('c') => Action::NewComment,
            KeyCode::Char('e') => Action::EditTitle,
            KeyCode::Char('E') => Action::EditDescription,
            KeyCode::Char('t') => Action::EditLabels,
            KeyCode::Char('a') => Action::EditAssignees,
            KeyCode::Char('p') => Action::CyclePriority,
            KeyCode::Char('u') => Action::SetDueDate,
            _ => Action::None,
        },
    }
}

fn map_normal(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => Action::FocusPrevColumn,
        KeyCode::Char('l') | KeyCode::Right => Action::FocusNextColumn,
        KeyCode::Char('j') | KeyCode::Down => Action::SelectNextTask,
        KeyCode::Char('k') | KeyCode::Up => Action::SelectPrevTask,
        KeyCode::Char('H') => Action::MoveTaskPrevColumn,
        KeyCode::Char('L') => Action::MoveTaskNextColumn,
        KeyCode::Char('J') => Action::MoveTaskDown,
        KeyCode::Char('K') => Action::MoveTaskUp,
        KeyCode::Char('[') => Action::MoveColumnLeft,
        KeyCode::Char(']') => Action::MoveColumnRight,
        KeyCode::Enter => Action::OpenTaskDetail,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('f') => Action::FilterByAssignee,
        KeyCode::Char('r') => Action::ReloadBoard,
        KeyCode::Char('g') => Action::EnterGotoMode,
        KeyCode::Char(' ') => Action::EnterSpaceMode,
        KeyCode::Char('?') => Action::ShowHelp,
        KeyCode::Esc => Action::ClearFilters,
        _ => Action::None,
    }
}

fn map_goto(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char(c @ '1'..='9') => Action::JumpToColumn(c as usize - '1' as usize),
        KeyCode::Char('g') => Action::JumpToFirstTask,
        KeyCode::Char('e') => Action::JumpToLastTask,
        KeyCode::Esc => Action::None, // cancel goto mode
        _ => Action::None,
    }
}

fn map_space(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('n') => Action::NewTask,
        KeyCode::Char('N') => Action::NewColumn,
        KeyCode::Char('d') => Action::DeleteTask,
        KeyCode::Char('D') => Action::DeleteColumn,
        KeyCode::Char('R') => Action::RenameColumn,
        KeyCode::Char('e') => Action::EditTitle,
        KeyCode::Char('E') => Action::EditDescription,
        KeyCode::Char('t') => Action::EditLabels,
        KeyCode::Char('a') => Action::EditAssignees,
        KeyCode::Char('p') => Action::CyclePriority,
        KeyCode::Char('u') => Action::SetDueDate,
        KeyCode::Char('m') => Action::MoveToColumn,
        KeyCode::Char('f') => Action::FilterByAssignee,
        KeyCode::Char('i') => Action::InviteUser,
        KeyCode::Char('r') => Action::ReloadBoard,
        KeyCode::Char('?') => Action::ShowHelp,
        KeyCode::Esc => Action::None,
        _ => Action::None,
    }
}

fn map_input(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::InputConfirm,
        KeyCode::Esc => Action::InputCancel,
        KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::InputHome,
        KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::InputEnd,
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Action::InputDeleteWord
        }
        KeyCode::Char(c) => Action::InputChar(c),
        KeyCode::Backspace => Action::InputBackspace,
        KeyCode::Left => Action::InputLeft,
        KeyCode::Right => Action::InputRight,
        KeyCode::Home => Action::InputHome,
        KeyCode::End => Action::InputEnd,
        _ => Action::None,
    }
}

fn map_confirm(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => Action::Confirm,
        KeyCode::Char('n') | KeyCode::Esc => Action::Deny,
        _ => Action::None,
    }
}

fn map_picker(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Action::SelectNextTask,
        KeyCode::Char('k') | KeyCode::Up => Action::SelectPrevTask,
        KeyCode::Char(' ') => Action::ToggleSelection,
        KeyCode::Enter => Action::InputConfirm,
        KeyCode::Esc => Action::InputCancel,
        _ => Action::None,
    }
}

// ---------------------------------------------------------------------------
// Binding registry — single source of truth for keybinding documentation.
// Used by the help overlay and the minor-mode hint popup.
// ---------------------------------------------------------------------------

/// A documented keybinding for display in help/hints.
pub struct Binding {
    pub key: &'static str,
    pub description: &'static str,
}

/// A group of related bindings (one section in help).
pub struct BindingGroup {
    pub name: &'static str,
    pub bindings: &'static [Binding],
}

pub const NORMAL_BINDINGS: &[Binding] = &[
    Binding { key: "h / l", description: "Switch columns" },
    Binding { key: "j / k", description: "Move between tasks" },
    Binding { key: "H / L", description: "Move task left/right" },
    Binding { key: "J / K", description: "Move task down/up" },
    Binding { key: "[ / ]", description: "Move column left/right" },
    Binding { key: "Enter", description: "Open task detail" },
    Binding { key: "f", description: "Filter by assignee" },
    Binding { key: "r", description: "Reload board" },
    Binding { key: "?", description: "Help" },
    Binding { key: "Esc", description: "Clear filter" },
    Binding { key: "q", description: "Quit" },
];

pub const SPACE_BINDINGS: &[Binding] = &[
    Binding { key: "n", description: "New task" },
    Binding { key: "N", description: "New column" },
    Binding { key: "d", description: "Delete task" },
    Binding { key: "D", description: "Delete column" },
    Binding { key: "R", description: "Rename column" },
    Binding { key: "e", description: "Edit title" },
    Binding { key: "E", description: "Edit description" },
    Binding { key: "t", description: "Edit labels" },
    Binding { key: "a", description: "Edit assignees" },
    Binding { key: "p", description: "Cycle priority" },
    Binding { key: "u", description: "Set due date" },
    Binding { key: "m", description: "Move to column" },
    Binding { key: "f", description: "Filter by assignee" },
    Binding { key: "i", description: "Invite user" },
    Binding { key: "r", description: "Reload board" },
    Binding { key: "?", description: "Help" },
];

pub const GOTO_BINDINGS: &[Binding] = &[
    Binding { key: "1-9", description: "Jump to column" },
    Binding { key: "g", description: "First task" },
    Binding { key: "e", description: "Last task" },
];

pub const DETAIL_BINDINGS: &[Binding] = &[
    Binding { key: "Tab", description: "Next tab" },
    Binding { key: "j / k", description: "Next/prev task" },
    Binding { key: "J / K", description: "Scroll content" },
    Binding { key: "c", description: "Add comment" },
    Binding { key: "e / E", description: "Edit title/description" },
    Binding { key: "t", description: "Edit labels" },
    Binding { key: "a", description: "Edit assignees" },
    Binding { key: "p", description: "Cycle priority" },
    Binding { key: "u", description: "Set due date" },
    Binding { key: "Esc", description: "Close" },
];

pub const PICKER_BINDINGS: &[Binding] = &[
    Binding { key: "j / k", description: "Navigate" },
    Binding { key: "Space", description: "Toggle selection" },
    Binding { key: "Enter", description: "Apply" },
    Binding { key: "Esc", description: "Cancel" },
];

/// All binding groups for the help overlay.
pub const HELP_GROUPS: &[BindingGroup] = &[
    BindingGroup { name: "Normal Mode", bindings: NORMAL_BINDINGS },
    BindingGroup { name: "Commands (Space)", bindings: SPACE_BINDINGS },
    BindingGroup { name: "Goto (g)", bindings: GOTO_BINDINGS },
    BindingGroup { name: "Task Detail", bindings: DETAIL_BINDINGS },
    BindingGroup { name: "Picker", bindings: PICKER_BINDINGS },
];

/// Get bindings for a minor mode (for popup and status display).
pub fn mode_bindings(mode: &Mode) -> &'static [Binding] {
    match mode {
        Mode::Goto => GOTO_BINDINGS,
        Mode::Space => SPACE_BINDINGS,
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{ConfirmTarget, DetailTab, InputTarget, PickerTarget, TextBuffer};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn key_ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    fn input_mode() -> Mode {
        Mode::Input {
            prompt: "Title".into(),
            buf: TextBuffer::empty(),
            on_confirm: InputTarget::NewTaskTitle,
        }
    }

    fn detail_mode() -> Mode {
        Mode::TaskDetail { tab: DetailTab::Overview, scroll: 0 }
    }

    // ── Normal mode bindings ──

    #[test]
    fn normal_h_l_switch_columns() {
        assert_eq!(map_key(key(KeyCode::Char('h')), &Mode::Normal), Action::FocusPrevColumn);
        assert_eq!(map_key(key(KeyCode::Left), &Mode::Normal), Action::FocusPrevColumn);
        assert_eq!(map_key(key(KeyCode::Char('l')), &Mode::Normal), Action::FocusNextColumn);
        assert_eq!(map_key(key(KeyCode::Right), &Mode::Normal), Action::FocusNextColumn);
    }

    #[test]
    fn normal_j_k_select_tasks() {
        assert_eq!(map_key(key(KeyCode::Char('j')), &Mode::Normal), Action::SelectNextTask);
        assert_eq!(map_key(key(KeyCode::Char('k')), &Mode::Normal), Action::SelectPrevTask);
    }

    #[test]
    fn normal_shift_h_l_moves_task_across_columns() {
        assert_eq!(map_key(key(KeyCode::Char('H')), &Mode::Normal), Action::MoveTaskPrevColumn);
        assert_eq!(map_key(key(KeyCode::Char('L')), &Mode::Normal), Action::MoveTaskNextColumn);
    }

    #[test]
    fn normal_shift_j_k_moves_task_within_column() {
        assert_eq!(map_key(key(KeyCode::Char('J')), &Mode::Normal), Action::MoveTaskDown);
        assert_eq!(map_key(key(KeyCode::Char('K')), &Mode::Normal), Action::MoveTaskUp);
    }

    #[test]
    fn normal_brackets_move_column() {
        assert_eq!(map_key(key(KeyCode::Char('[')), &Mode::Normal), Action::MoveColumnLeft);
        assert_eq!(map_key(key(KeyCode::Char(']')), &Mode::Normal), Action::MoveColumnRight);
    }

    #[test]
    fn normal_enter_opens_detail() {
        assert_eq!(map_key(key(KeyCode::Enter), &Mode::Normal), Action::OpenTaskDetail);
    }

    #[test]
    fn normal_f_filters_by_assignee() {
        assert_eq!(map_key(key(KeyCode::Char('f')), &Mode::Normal), Action::FilterByAssignee);
    }

    #[test]
    fn normal_esc_clears_filters() {
        assert_eq!(map_key(key(KeyCode::Esc), &Mode::Normal), Action::ClearFilters);
    }

    #[test]
    fn normal_ctrl_c_quits() {
        assert_eq!(map_key(key_ctrl(KeyCode::Char('c')), &Mode::Normal), Action::Quit);
    }

    #[test]
    fn normal_unmapped_key_is_noop() {
        assert_eq!(map_key(key(KeyCode::Char('x')), &Mode::Normal), Action::None);
    }

    // ── Goto mode bindings ──

    #[test]
    fn goto_digit_jumps() {
        assert_eq!(map_key(key(KeyCode::Char('1')), &Mode::Goto), Action::JumpToColumn(0));
        assert_eq!(map_key(key(KeyCode::Char('4')), &Mode::Goto), Action::JumpToColumn(3));
    }

    #[test]
    fn goto_g_e_jump_within_column() {
        assert_eq!(map_key(key(KeyCode::Char('g')), &Mode::Goto), Action::JumpToFirstTask);
        assert_eq!(map_key(key(KeyCode::Char('e')), &Mode::Goto), Action::JumpToLastTask);
    }

    // ── Space mode bindings ──

    #[test]
    fn space_n_new_task_and_shift_n_new_column() {
        assert_eq!(map_key(key(KeyCode::Char('n')), &Mode::Space), Action::NewTask);
        assert_eq!(map_key(key(KeyCode::Char('N')), &Mode::Space), Action::NewColumn);
    }

    #[test]
    fn space_d_deletes_task_and_shift_d_deletes_column() {
        assert_eq!(map_key(key(KeyCode::Char('d')), &Mode::Space), Action::DeleteTask);
        assert_eq!(map_key(key(KeyCode::Char('D')), &Mode::Space), Action::DeleteColumn);
    }

    #[test]
    fn space_a_edits_assignees() {
        assert_eq!(map_key(key(KeyCode::Char('a')), &Mode::Space), Action::EditAssignees);
    }

    #[test]
    fn space_i_invites() {
        assert_eq!(map_key(key(KeyCode::Char('i')), &Mode::Space), Action::InviteUser);
    }

    #[test]
    fn space_m_moves_to_column() {
        assert_eq!(map_key(key(KeyCode::Char('m')), &Mode::Space), Action::MoveToColumn);
    }

    // ── Input mode bindings ──

    #[test]
    fn input_enter_confirms_esc_cancels() {
        assert_eq!(map_key(key(KeyCode::Enter), &input_mode()), Action::InputConfirm);
        assert_eq!(map_key(key(KeyCode::Esc), &input_mode()), Action::InputCancel);
    }

    #[test]
    fn input_readline_chords() {
        assert_eq!(map_key(key_ctrl(KeyCode::Char('a')), &input_mode()), Action::InputHome);
        assert_eq!(map_key(key_ctrl(KeyCode::Char('e')), &input_mode()), Action::InputEnd);
        assert_eq!(map_key(key_ctrl(KeyCode::Char('w')), &input_mode()), Action::InputDeleteWord);
    }

    #[test]
    fn input_char_inserts() {
        assert_eq!(map_key(key(KeyCode::Char('a')), &input_mode()), Action::InputChar('a'));
        assert_eq!(map_key(key(KeyCode::Backspace), &input_mode()), Action::InputBackspace);
    }

    // ── Confirm mode bindings ──

    #[test]
    fn confirm_y_confirms_n_denies() {
        let mode = Mode::Confirm {
            prompt: "Delete?".into(),
            on_confirm: ConfirmTarget::DeleteTask("t1".into()),
        };
        assert_eq!(map_key(key(KeyCode::Char('y')), &mode), Action::Confirm);
        assert_eq!(map_key(key(KeyCode::Enter), &mode), Action::Confirm);
        assert_eq!(map_key(key(KeyCode::Char('n')), &mode), Action::Deny);
        assert_eq!(map_key(key(KeyCode::Esc), &mode), Action::Deny);
    }

    // ── Picker mode bindings ──

    fn picker_mode() -> Mode {
        Mode::Picker {
            title: "Assignees".into(),
            items: vec![],
            checked: vec![],
            selected: 0,
            target: PickerTarget::AssigneeFilter { users: vec![] },
        }
    }

    #[test]
    fn picker_space_toggles_enter_applies() {
        assert_eq!(map_key(key(KeyCode::Char(' ')), &picker_mode()), Action::ToggleSelection);
        assert_eq!(map_key(key(KeyCode::Enter), &picker_mode()), Action::InputConfirm);
        assert_eq!(map_key(key(KeyCode::Esc), &picker_mode()), Action::InputCancel);
    }

    #[test]
    fn picker_j_k_navigates() {
        assert_eq!(map_key(key(KeyCode::Char('j')), &picker_mode()), Action::SelectNextTask);
        assert_eq!(map_key(key(KeyCode::Char('k')), &picker_mode()), Action::SelectPrevTask);
    }

    // ── TaskDetail mode bindings ──

    #[test]
    fn detail_tab_cycles_tabs() {
        assert_eq!(map_key(key(KeyCode::Tab), &detail_mode()), Action::DetailNextTab);
        assert_eq!(map_key(key(KeyCode::BackTab), &detail_mode()), Action::DetailPrevTab);
    }

    #[test]
    fn detail_j_k_navigates_tasks() {
        assert_eq!(map_key(key(KeyCode::Char('j')), &detail_mode()), Action::DetailNextTask);
        assert_eq!(map_key(key(KeyCode::Char('k')), &detail_mode()), Action::DetailPrevTask);
    }

    #[test]
    fn detail_c_adds_comment() {
        assert_eq!(map_key(key(KeyCode::Char('c')), &detail_mode()), Action::NewComment);
    }

    #[test]
    fn detail_esc_closes() {
        assert_eq!(map_key(key(KeyCode::Esc), &detail_mode()), Action::ClosePanel);
    }

    // ── mode_bindings tests ──

    #[test]
    fn mode_bindings_minor_modes_have_hints() {
        assert!(!mode_bindings(&Mode::Goto).is_empty());
        assert!(!mode_bindings(&Mode::Space).is_empty());
        assert!(mode_bindings(&Mode::Normal).is_empty());
    }

    #[test]
    fn help_groups_cover_all_modes() {
        let names: Vec<&str> = HELP_GROUPS.iter().map(|g| g.name).collect();
        assert!(names.contains(&"Normal Mode"));
        assert!(names.contains(&"Commands (Space)"));
        assert!(names.contains(&"Task Detail"));
    }
}
