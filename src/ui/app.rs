use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::application::{
    prompt::{Confirmation, Notice},
    todo_service::TodoService,
};
use crate::domain::todo::{Filter, TodoId, MAX_TEXT_LEN};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Insert,
    Confirm(Confirmation),
    Notice(Notice),
}

/// Screen state: the owned todo service plus what the user is doing with it.
pub struct App {
    service: TodoService,
    mode: Mode,
    draft: String,
    selected: usize,
    should_quit: bool,
}

impl App {
    pub fn new(service: TodoService, startup_notice: Option<Notice>) -> Self {
        let mode = startup_notice.map_or(Mode::Browse, Mode::Notice);
        Self { service, mode, draft: String::new(), selected: 0, should_quit: false }
    }

    pub fn service(&self) -> &TodoService { &self.service }

    pub fn into_service(self) -> TodoService { self.service }

    pub fn mode(&self) -> &Mode { &self.mode }

    pub fn draft(&self) -> &str { &self.draft }

    pub fn selected(&self) -> usize { self.selected }

    pub fn should_quit(&self) -> bool { self.should_quit }

    pub fn selected_id(&self) -> Option<TodoId> {
        self.service.store().visible().get(self.selected).map(|t| t.id.clone())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Only act on key presses; ignore repeats and releases to prevent duplicate input
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match self.mode.clone() {
            Mode::Browse => self.browse_key(key.code),
            Mode::Insert => self.insert_key(key),
            Mode::Confirm(confirmation) => self.confirm_key(key.code, confirmation),
            Mode::Notice(notice) => self.dismiss(notice),
        }
    }

    fn browse_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.visible_len() {
                    self.selected += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(id) = self.selected_id() {
                    self.service.toggle(&id);
                    self.clamp_selection();
                }
            }
            KeyCode::Char('a') | KeyCode::Char('n') => self.mode = Mode::Insert,
            KeyCode::Char('d') => {
                if let Some(confirmation) = self.selected_id().and_then(|id| self.service.request_delete(&id)) {
                    self.mode = Mode::Confirm(confirmation);
                }
            }
            KeyCode::Char('c') => {
                self.mode = match self.service.request_clear_completed() {
                    Ok(confirmation) => Mode::Confirm(confirmation),
                    Err(err) => Mode::Notice(err.into()),
                };
            }
            KeyCode::Tab | KeyCode::Char('f') => {
                let next = self.service.store().filter().next();
                self.select_filter(next);
            }
            KeyCode::Char('1') => self.select_filter(Filter::All),
            KeyCode::Char('2') => self.select_filter(Filter::Active),
            KeyCode::Char('3') => self.select_filter(Filter::Completed),
            _ => {}
        }
    }

    fn insert_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.mode = Mode::Browse,
            KeyCode::Enter => match self.service.add(&self.draft) {
                Ok(_) => {
                    self.draft.clear();
                    self.selected = 0;
                    self.mode = Mode::Browse;
                }
                Err(err) => self.mode = Mode::Notice(err.into()),
            },
            KeyCode::Backspace => {
                self.draft.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.draft.chars().count() < MAX_TEXT_LEN {
                    self.draft.push(c);
                }
            }
            _ => {}
        }
    }

    fn confirm_key(&mut self, code: KeyCode, confirmation: Confirmation) {
        match code {
            KeyCode::Char('y') | KeyCode::Enter => {
                self.mode = match self.service.confirm(confirmation) {
                    Ok(()) => Mode::Browse,
                    Err(err) => Mode::Notice(err.into()),
                };
                self.clamp_selection();
            }
            KeyCode::Char('n') | KeyCode::Esc => self.mode = Mode::Browse,
            _ => {}
        }
    }

    fn dismiss(&mut self, notice: Notice) {
        self.mode = match notice {
            Notice::EmptyText | Notice::TextTooLong => Mode::Insert,
            Notice::NothingToClear | Notice::LoadFailed => Mode::Browse,
        };
    }

    fn select_filter(&mut self, filter: Filter) {
        self.service.set_filter(filter);
        self.selected = 0;
    }

    fn visible_len(&self) -> usize { self.service.store().visible().len() }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.visible_len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventState;

    use super::*;
    use crate::application::todo_storage::TodoStorage;
    use crate::domain::todo::Counts;
    use crate::infrastructure::memory_kv::MemoryKeyValueStore;

    fn press(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
    }

    async fn app() -> App {
        let (service, notice) = TodoService::start(TodoStorage::new(MemoryKeyValueStore::new())).await;
        App::new(service, notice)
    }

    async fn app_with(texts: &[&str]) -> App {
        let mut app = app().await;
        for text in texts {
            app.handle_key(press(KeyCode::Char('a')));
            type_text(&mut app, text);
            app.handle_key(press(KeyCode::Enter));
        }
        app
    }

    #[tokio::test]
    async fn adding_through_input_prepends_and_returns_to_browse() {
        let app = app_with(&["first", "second"]).await;
        assert_eq!(app.mode(), &Mode::Browse);
        assert_eq!(app.draft(), "");
        let texts: Vec<_> = app.service().store().todos().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["second", "first"]);
    }

    #[tokio::test]
    async fn blank_input_raises_notice_then_resumes_typing() {
        let mut app = app().await;
        app.handle_key(press(KeyCode::Char('a')));
        type_text(&mut app, "   ");
        app.handle_key(press(KeyCode::Enter));
        assert_eq!(app.mode(), &Mode::Notice(Notice::EmptyText));
        assert_eq!(app.service().store().counts().all, 0);

        app.handle_key(press(KeyCode::Char('x')));
        assert_eq!(app.mode(), &Mode::Insert);
    }

    #[tokio::test]
    async fn typing_stops_at_length_limit() {
        let mut app = app().await;
        app.handle_key(press(KeyCode::Char('a')));
        type_text(&mut app, &"z".repeat(MAX_TEXT_LEN + 20));
        assert_eq!(app.draft().chars().count(), MAX_TEXT_LEN);
        app.handle_key(press(KeyCode::Backspace));
        assert_eq!(app.draft().chars().count(), MAX_TEXT_LEN - 1);
    }

    #[tokio::test]
    async fn toggle_and_navigation_follow_visible_list() {
        let mut app = app_with(&["a", "b", "c"]).await;
        app.handle_key(press(KeyCode::Down));
        app.handle_key(press(KeyCode::Down));
        app.handle_key(press(KeyCode::Down));
        assert_eq!(app.selected(), 2);

        app.handle_key(press(KeyCode::Enter));
        assert!(app.service().store().todos()[2].completed);

        app.handle_key(press(KeyCode::Char('2')));
        assert_eq!(app.service().store().filter(), Filter::Active);
        assert_eq!(app.selected(), 0);
        app.handle_key(press(KeyCode::Char(' ')));
        assert_eq!(app.service().store().counts(), Counts { all: 3, active: 1, completed: 2 });
        assert_eq!(app.selected(), 0);
    }

    #[tokio::test]
    async fn delete_needs_confirmation() {
        let mut app = app_with(&["a", "b"]).await;
        app.handle_key(press(KeyCode::Char('d')));
        assert!(matches!(app.mode(), Mode::Confirm(Confirmation::Delete(_))));

        app.handle_key(press(KeyCode::Esc));
        assert_eq!(app.service().store().counts().all, 2);

        app.handle_key(press(KeyCode::Char('d')));
        app.handle_key(press(KeyCode::Char('y')));
        assert_eq!(app.mode(), &Mode::Browse);
        let texts: Vec<_> = app.service().store().todos().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["a"]);
    }

    #[tokio::test]
    async fn clear_completed_with_nothing_done_shows_notice() {
        let mut app = app_with(&["a"]).await;
        app.handle_key(press(KeyCode::Char('c')));
        assert_eq!(app.mode(), &Mode::Notice(Notice::NothingToClear));
        app.handle_key(press(KeyCode::Enter));
        assert_eq!(app.mode(), &Mode::Browse);

        app.handle_key(press(KeyCode::Enter));
        app.handle_key(press(KeyCode::Char('c')));
        assert_eq!(app.mode(), &Mode::Confirm(Confirmation::ClearCompleted { count: 1 }));
        app.handle_key(press(KeyCode::Enter));
        assert!(app.service().store().todos().is_empty());
    }

    #[tokio::test]
    async fn releases_are_ignored_and_q_quits() {
        let mut app = app().await;
        let release = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        app.handle_key(release);
        assert!(!app.should_quit());
        app.handle_key(press(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn startup_notice_is_shown_first() {
        let (service, _) = TodoService::start(TodoStorage::new(MemoryKeyValueStore::new())).await;
        let mut app = App::new(service, Some(Notice::LoadFailed));
        assert_eq!(app.mode(), &Mode::Notice(Notice::LoadFailed));
        app.handle_key(press(KeyCode::Char('a')));
        assert_eq!(app.mode(), &Mode::Browse);
    }
}
