//! State of one filterable/sortable record screen

use crossterm::event::{KeyCode, KeyEvent};

use crate::error::Result;
use crate::models::{cycle_sort, Listing, ScreenFilter};
use crate::records::{OptionSet, Patch, RecordView};
use crate::tui::app::ListState;

/// What the app should do after a list screen handled a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    None,
    /// Show a status bar message
    Status(String),
    /// Open the editor for the record with this id
    Edit(String),
    /// Open the editor for a new record
    Create,
}

/// One management screen: records, filter state, sort and selection
pub struct ListScreen<R: Listing> {
    pub view: RecordView<R>,
    pub filter: R::Filter,
    pub sort: Option<R::Sort>,
    pub selection: ListState,
    /// Filter control that `f` cycles
    pub control: usize,
    /// Typing into the search box
    pub searching: bool,
    /// Record id awaiting delete confirmation
    pub confirm_delete: Option<String>,
    pub loaded: bool,
    pub error: Option<String>,
}

impl<R: Listing> Default for ListScreen<R> {
    fn default() -> Self {
        Self {
            view: RecordView::default(),
            filter: R::Filter::default(),
            sort: R::default_sort(),
            selection: ListState::default(),
            control: 0,
            searching: false,
            confirm_delete: None,
            loaded: false,
            error: None,
        }
    }
}

impl<R: Listing> ListScreen<R> {
    /// Mount the screen with a load result; failures leave it empty
    pub fn load(&mut self, result: Result<Vec<R>>) {
        match result {
            Ok(records) => {
                self.view = RecordView::new(records);
                self.error = None;
            }
            Err(e) => {
                self.view = RecordView::default();
                self.error = Some(e.to_string());
            }
        }
        self.loaded = true;
        self.sync_selection();
    }

    /// Filtered, sorted rows in display order
    pub fn rows(&self) -> Vec<&R> {
        self.view.query(&self.filter, self.sort.as_ref())
    }

    pub fn selected(&self) -> Option<&R> {
        self.rows().get(self.selection.selected).copied()
    }

    pub fn sort_label(&self) -> &'static str {
        self.sort.map_or("Default", |s| s.label())
    }

    /// Whether keys should go straight to this screen
    pub fn captures_input(&self) -> bool {
        self.searching || self.confirm_delete.is_some()
    }

    /// Append a created record
    pub fn insert(&mut self, record: R) {
        self.view.insert(record);
        self.sync_selection();
    }

    /// Merge an edit into the record with `id`
    pub fn update<P: Patch<R>>(&mut self, id: &str, patch: P) -> Result<()> {
        self.view.update(id, patch)?;
        self.sync_selection();
        Ok(())
    }

    fn sync_selection(&mut self) {
        let total = self.rows().len();
        self.selection.total = total;
        if self.selection.selected >= total {
            self.selection.selected = total.saturating_sub(1);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ListAction {
        if self.confirm_delete.is_some() {
            return self.handle_confirm_key(key);
        }
        if self.searching {
            self.handle_search_key(key);
            return ListAction::None;
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.selection.next(),
            KeyCode::Char('k') | KeyCode::Up => self.selection.previous(),
            KeyCode::Char('/') => self.searching = true,
            KeyCode::Char('c') => {
                let count = self.filter.controls().len();
                if count > 0 {
                    self.control = (self.control + 1) % count;
                }
            }
            KeyCode::Char('f') => {
                self.filter.cycle(self.control);
                self.selection.selected = 0;
                self.sync_selection();
            }
            KeyCode::Char('s') => {
                self.sort = cycle_sort(self.sort);
                return ListAction::Status(format!("Sort: {}", self.sort_label()));
            }
            KeyCode::Char('x') => {
                self.filter = R::Filter::default();
                self.sort = R::default_sort();
                self.control = 0;
                self.sync_selection();
                return ListAction::Status("Filters cleared".to_string());
            }
            KeyCode::Char('d') => {
                self.confirm_delete = self.selected().map(|r| r.id().to_string());
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(record) = self.selected() {
                    return ListAction::Edit(record.id().to_string());
                }
            }
            KeyCode::Char('n') => return ListAction::Create,
            _ => {}
        }
        ListAction::None
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.searching = false,
            KeyCode::Backspace => self.filter.search_mut().pop(),
            KeyCode::Char(c) => self.filter.search_mut().push(c),
            _ => return,
        }
        self.selection.selected = 0;
        self.sync_selection();
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> ListAction {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                let Some(id) = self.confirm_delete.take() else {
                    return ListAction::None;
                };
                let result = self.view.remove(&id);
                self.sync_selection();
                match result {
                    Ok(_) => ListAction::Status(format!("Deleted {} {}", R::KIND, id)),
                    Err(e) => ListAction::Status(e.to_string()),
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm_delete = None;
                ListAction::Status("Delete cancelled".to_string())
            }
            _ => ListAction::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataSource;
    use crate::models::{Order, OrderTab, User, UserSort};
    use crossterm::event::KeyModifiers;

    fn press(screen: &mut ListScreen<User>, code: KeyCode) -> ListAction {
        screen.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn users() -> ListScreen<User> {
        let mut screen = ListScreen::default();
        screen.load(DataSource::bundled().users());
        screen
    }

    #[test]
    fn test_search_typing_filters_rows() {
        let mut screen = users();
        let total = screen.rows().len();
        press(&mut screen, KeyCode::Char('/'));
        assert!(screen.captures_input());
        for c in "zzzz-no-match".chars() {
            press(&mut screen, KeyCode::Char(c));
        }
        assert!(screen.rows().is_empty());
        assert_eq!(screen.selection.total, 0);
        press(&mut screen, KeyCode::Enter);
        assert!(!screen.searching);
        press(&mut screen, KeyCode::Char('x'));
        assert_eq!(screen.rows().len(), total);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut screen = users();
        let before = screen.view.len();
        let id = screen.selected().unwrap().id.clone();

        press(&mut screen, KeyCode::Char('d'));
        assert_eq!(screen.confirm_delete.as_deref(), Some(id.as_str()));
        press(&mut screen, KeyCode::Char('n'));
        assert_eq!(screen.view.len(), before);

        press(&mut screen, KeyCode::Char('d'));
        let action = press(&mut screen, KeyCode::Char('y'));
        assert!(matches!(action, ListAction::Status(msg) if msg.contains(&id)));
        assert_eq!(screen.view.len(), before - 1);
        assert!(screen.view.get(&id).is_none());
    }

    #[test]
    fn test_sort_cycles_back_to_default() {
        let mut screen = users();
        for _ in 0..UserSort::options().len() {
            press(&mut screen, KeyCode::Char('s'));
            assert!(screen.sort.is_some());
        }
        press(&mut screen, KeyCode::Char('s'));
        assert_eq!(screen.sort, None);
    }

    #[test]
    fn test_orders_mount_with_default_sort_and_tab_control() {
        let mut screen: ListScreen<Order> = ListScreen::default();
        screen.load(DataSource::bundled().orders());
        assert!(screen.sort.is_some());
        screen.handle_key(KeyEvent::new(KeyCode::Char('f'), KeyModifiers::NONE));
        assert_eq!(screen.filter.tab, OrderTab::Unfulfilled);
        assert!(screen.rows().iter().all(|o| OrderTab::Unfulfilled.matches(o)));
    }

    #[test]
    fn test_failed_load_is_empty_with_error() {
        let mut screen: ListScreen<User> = ListScreen::default();
        screen.load(Err(crate::error::DeskError::NotAuthenticated));
        assert!(screen.loaded);
        assert!(screen.rows().is_empty());
        assert!(screen.error.is_some());
    }
}
