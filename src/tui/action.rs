use crate::model::{ListSummary, ToDoList};

/// What a view wants to happen, produced from keys and clicks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateList(String),
    DeleteList(String),
    SelectList(String),
    BackToList,
    CreateItem {
        list_id: String,
        label: String,
    },
    DeleteItem {
        list_id: String,
        item_id: String,
    },
    ToggleItem {
        list_id: String,
        item_id: String,
        checked: bool,
    },
    Refresh,
    Quit,
}

/// Network work handed to the worker task, one backend round trip (or a short
/// fixed sequence of them) each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    FetchSummaries,
    CreateList(String),
    DeleteList(String),
    FetchList(String),
    CreateItem {
        list_id: String,
        label: String,
    },
    DeleteItem {
        list_id: String,
        item_id: String,
    },
    SetChecked {
        list_id: String,
        item_id: String,
        checked: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    SummariesLoaded(Vec<ListSummary>),
    SummariesFailed(String),
    ListLoaded(ToDoList),
    ListDeleted { id: String, ok: bool },
    Error(String),
    Status(String),
}
