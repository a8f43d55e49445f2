/// All possible semantic actions in Kanri.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Navigation
    FocusPrevColumn,
    FocusNextColumn,
    SelectPrevTask,
    SelectNextTask,
    JumpToColumn(usize),
    JumpToFirstTask,
    JumpToLastTask,

    // Task movement
    MoveTaskPrevColumn,
    MoveTaskNextColumn,
    MoveTaskUp,
    MoveTaskDown,

    // Column movement
    MoveColumnLeft,
    MoveColumnRight,

    // Task actions
    NewTask,
    DeleteTask,
    EditTitle,
    EditDescription,
    EditLabels,
    EditAssignees,
    CyclePriority,
    SetDueDate,
    MoveToColumn,
    OpenTaskDetail,
    ClosePanel,
    DetailScrollUp,
    DetailScrollDown,
    DetailNextTab,
    DetailPrevTab,
    DetailNextTask,
    DetailPrevTask,
    NewComment,

    // Column actions
    NewColumn,
    RenameColumn,
    DeleteColumn,

    // Filter
    FilterByAssignee,
    ClearFilters,

    // Board
    ReloadBoard,
    InviteUser,
    ShowHelp,
    Quit,

    // Minor mode entry
    EnterGotoMode,
    EnterSpaceMode,

    // Input modal
    InputConfirm,
    InputCancel,
    InputChar(char),
    InputBackspace,
    InputLeft,
    InputRight,
    InputHome,
    InputEnd,
    InputDeleteWord,

    // Picker
    ToggleSelection,

    // Confirmation
    Confirm,
    Deny,

    // No-op
    None,
}
