use crate::tui::action::{AppEvent, Command, Request};
use crate::tui::view::{CollectionView, DetailView, StatusLine, render_alert, render_footer};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};
use tracing::{debug, info, warn};

const HOME_HELP: &str = "a:New | Enter:Open | d:Del | r:Reload | q:Quit";
const DETAIL_HELP: &str = "a:New | Space:Check | d:Del | Esc:Back | q:Quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Home,
    Detail(String),
}

/// Owns the active screen and both views, turns view commands into backend
/// requests, and routes backend events to the view that owns the data.
///
/// Nothing here touches the network: callers feed the returned [`Request`]s to
/// the worker and hand every [`AppEvent`] back through [`RootController::apply_event`].
pub struct RootController {
    screen: Screen,
    collection: CollectionView,
    detail: Option<DetailView>,
    status: StatusLine,
    alert: Option<String>,
    should_quit: bool,
}

impl Default for RootController {
    fn default() -> Self {
        Self::new()
    }
}

impl RootController {
    pub fn new() -> Self {
        Self {
            screen: Screen::Home,
            collection: CollectionView::new(),
            detail: None,
            status: StatusLine::info("Connecting..."),
            alert: None,
            should_quit: false,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }
    pub fn collection(&self) -> &CollectionView {
        &self.collection
    }
    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.as_ref()
    }
    pub fn status(&self) -> &StatusLine {
        &self.status
    }
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Initial activation: the summaries are the only thing fetched up front.
    pub fn start(&mut self) -> Vec<Request> {
        vec![Request::FetchSummaries]
    }

    pub fn create_list(&mut self, name: String) -> Vec<Request> {
        self.status = StatusLine::info("Creating list...");
        vec![Request::CreateList(name)]
    }

    pub fn delete_list(&mut self, id: String) -> Vec<Request> {
        self.status = StatusLine::info("Deleting list...");
        vec![Request::DeleteList(id)]
    }

    pub fn select_list(&mut self, id: String) -> Vec<Request> {
        if self.screen != Screen::Home {
            return vec![];
        }
        info!(list_id = %id, "opening list");
        self.screen = Screen::Detail(id.clone());
        self.detail = Some(DetailView::new(id.clone()));
        vec![Request::FetchList(id)]
    }

    /// Item counts may have drifted while the detail screen was open.
    pub fn back_to_list(&mut self) -> Vec<Request> {
        if self.screen == Screen::Home {
            return vec![];
        }
        info!("back to lists");
        self.screen = Screen::Home;
        self.detail = None;
        vec![Request::FetchSummaries]
    }

    pub fn handle_command(&mut self, command: Command) -> Vec<Request> {
        debug!(?command, "command");
        match command {
            Command::CreateList(name) => self.create_list(name),
            Command::DeleteList(id) => self.delete_list(id),
            Command::SelectList(id) => self.select_list(id),
            Command::BackToList => self.back_to_list(),
            Command::CreateItem { list_id, label } => {
                self.status = StatusLine::info("Adding item...");
                vec![Request::CreateItem { list_id, label }]
            }
            Command::DeleteItem { list_id, item_id } => {
                self.status = StatusLine::info("Deleting item...");
                vec![Request::DeleteItem { list_id, item_id }]
            }
            Command::ToggleItem {
                list_id,
                item_id,
                checked,
            } => {
                self.status = StatusLine::info("Syncing...");
                vec![Request::SetChecked {
                    list_id,
                    item_id,
                    checked,
                }]
            }
            Command::Refresh => match &self.screen {
                Screen::Home => vec![Request::FetchSummaries],
                Screen::Detail(id) => vec![Request::FetchList(id.clone())],
            },
            Command::Quit => {
                self.should_quit = true;
                vec![]
            }
        }
    }

    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SummariesLoaded(summaries) => {
                self.status = StatusLine::info(format!("Lists: {}", summaries.len()));
                self.collection.apply_server_snapshot(summaries);
            }
            AppEvent::SummariesFailed(msg) => {
                // Only the first load is blocking; later failures keep the old snapshot.
                if self.collection.is_loading() {
                    self.alert = Some(format!("Could not load lists: {}", msg));
                    self.status = StatusLine::error("Offline");
                } else {
                    self.status = StatusLine::error(format!("Reload failed: {}", msg));
                }
            }
            AppEvent::ListLoaded(list) => match self.detail.as_mut() {
                Some(detail) if detail.list_id() == list.id => {
                    self.status = StatusLine::info(format!("{}: {} items", list.name, list.items.len()));
                    detail.apply_server_snapshot(list);
                }
                _ => debug!(list_id = %list.id, "discarding snapshot for a list that is not open"),
            },
            AppEvent::ListDeleted { id, ok } => {
                if ok {
                    self.status = StatusLine::info("List deleted.");
                } else {
                    warn!(list_id = %id, "list was not deleted");
                    self.status = StatusLine::error("Could not delete list.");
                }
            }
            AppEvent::Error(msg) => self.status = StatusLine::error(msg),
            AppEvent::Status(msg) => self.status = StatusLine::info(msg),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Request> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return vec![];
        }
        if self.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.alert = None;
            }
            return vec![];
        }
        let command = match self.screen {
            Screen::Home => self.collection.handle_key(key),
            Screen::Detail(_) => self.detail.as_mut().and_then(|d| d.handle_key(key)),
        };
        command
            .map(|c| self.handle_command(c))
            .unwrap_or_default()
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Vec<Request> {
        if self.alert.is_some() {
            return vec![];
        }
        let command = match self.screen {
            Screen::Home => self.collection.handle_mouse(mouse),
            Screen::Detail(_) => self.detail.as_mut().and_then(|d| d.handle_mouse(mouse)),
        };
        command
            .map(|c| self.handle_command(c))
            .unwrap_or_default()
    }

    pub fn draw(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(f.area());

        let help = match (&self.screen, self.detail.as_mut()) {
            (Screen::Detail(_), Some(detail)) => {
                detail.render(f, chunks[0]);
                DETAIL_HELP
            }
            _ => {
                self.collection.render(f, chunks[0]);
                HOME_HELP
            }
        };
        render_footer(f, chunks[1], &self.status, help);

        if let Some(msg) = &self.alert {
            render_alert(f, f.area(), msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Item, ListSummary, ToDoList};
    use crate::tui::view::test_support::screen;
    use ratatui::{Terminal, backend::TestBackend};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn groceries_summary() -> Vec<ListSummary> {
        vec![ListSummary {
            id: "1".to_string(),
            name: "Groceries".to_string(),
            item_count: 2,
        }]
    }

    fn list(id: &str) -> ToDoList {
        ToDoList {
            id: id.to_string(),
            name: "Groceries".to_string(),
            items: vec![Item {
                id: "it-9".to_string(),
                label: "Bread".to_string(),
                checked: false,
            }],
        }
    }

    #[test]
    fn starts_home_and_fetches_summaries() {
        let mut root = RootController::new();
        assert_eq!(root.screen(), &Screen::Home);
        assert_eq!(root.start(), vec![Request::FetchSummaries]);
        assert!(root.collection().is_loading());
    }

    #[test]
    fn select_and_back_transition_the_state_machine() {
        let mut root = RootController::new();
        root.apply_event(AppEvent::SummariesLoaded(groceries_summary()));

        assert_eq!(root.select_list("1".to_string()), vec![Request::FetchList("1".to_string())]);
        assert_eq!(root.screen(), &Screen::Detail("1".to_string()));
        assert!(root.detail().is_some_and(|d| d.is_loading()));

        // already in detail
        assert!(root.select_list("2".to_string()).is_empty());

        assert_eq!(root.back_to_list(), vec![Request::FetchSummaries]);
        assert_eq!(root.screen(), &Screen::Home);
        assert!(root.detail().is_none());
        assert!(root.back_to_list().is_empty());
    }

    #[test]
    fn first_load_failure_raises_blocking_alert() {
        let mut root = RootController::new();
        root.apply_event(AppEvent::SummariesFailed("connection refused".to_string()));
        assert!(root.alert().is_some_and(|a| a.contains("connection refused")));
        assert!(root.collection().is_loading());

        // input is swallowed until dismissed
        assert!(root.handle_key(key(KeyCode::Char('r'))).is_empty());
        assert!(root.alert().is_some());
        root.handle_key(key(KeyCode::Enter));
        assert!(root.alert().is_none());
        assert!(root.collection().is_loading());
    }

    #[test]
    fn later_reload_failure_only_touches_status() {
        let mut root = RootController::new();
        root.apply_event(AppEvent::SummariesLoaded(groceries_summary()));
        root.apply_event(AppEvent::SummariesFailed("timeout".to_string()));
        assert!(root.alert().is_none());
        assert!(root.status().is_error);
        assert_eq!(root.collection().summaries().map(|s| s.len()), Some(1));
    }

    #[test]
    fn snapshot_for_closed_list_is_discarded() {
        let mut root = RootController::new();
        root.apply_event(AppEvent::ListLoaded(list("1")));
        root.select_list("2".to_string());
        root.apply_event(AppEvent::ListLoaded(list("1")));
        assert!(root.detail().is_some_and(|d| d.is_loading()));
        root.apply_event(AppEvent::ListLoaded(list("2")));
        assert_eq!(root.detail().and_then(|d| d.list()), Some(&list("2")));
    }

    #[test]
    fn failed_delete_is_reported_without_alert() {
        let mut root = RootController::new();
        root.apply_event(AppEvent::ListDeleted {
            id: "1".to_string(),
            ok: false,
        });
        assert!(root.status().is_error);
        assert!(root.alert().is_none());
    }

    #[test]
    fn keys_route_to_the_active_view() {
        let mut root = RootController::new();
        root.apply_event(AppEvent::SummariesLoaded(groceries_summary()));
        assert_eq!(
            root.handle_key(key(KeyCode::Enter)),
            vec![Request::FetchList("1".to_string())]
        );
        root.apply_event(AppEvent::ListLoaded(list("1")));
        assert_eq!(
            root.handle_key(key(KeyCode::Char('d'))),
            vec![Request::DeleteItem {
                list_id: "1".to_string(),
                item_id: "it-9".to_string(),
            }]
        );
        assert_eq!(root.handle_key(key(KeyCode::Char('r'))), vec![Request::FetchList("1".to_string())]);
        assert_eq!(root.handle_key(key(KeyCode::Esc)), vec![Request::FetchSummaries]);
        root.handle_key(key(KeyCode::Char('q')));
        assert!(root.should_quit());
    }

    #[test]
    fn ctrl_c_quits_even_while_typing() {
        let mut root = RootController::new();
        root.handle_key(key(KeyCode::Char('a')));
        assert!(root.collection().input().is_focused());
        root.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(root.should_quit());
    }

    #[test]
    fn draw_shows_alert_over_home_screen() {
        let mut root = RootController::new();
        root.apply_event(AppEvent::SummariesFailed("boom".to_string()));
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| root.draw(f)).unwrap();
        let out = screen(terminal.backend().buffer());
        assert!(out.contains(" Error "));
        assert!(out.contains("Press Enter to dismiss."));
        assert!(out.contains(" Status "));
    }
}
