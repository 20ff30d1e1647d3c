use log::debug;

use super::{Action, Outcome};
use crate::api::SharedApi;
use crate::model::{Board, BoardId, CreateTagForm, State, Tag, User};

/// The signed-in user. Boards are only fetched once this is known.
#[derive(Debug, Default)]
pub struct Session {
    action: Action<User>,
    user: Option<User>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fetch(&mut self, api: &SharedApi) -> bool {
        let api = api.clone();
        self.action.start(move || api.me())
    }

    /// Collect the response. Returns true if state changed.
    pub fn poll(&mut self) -> bool {
        match self.action.poll() {
            Some(outcome) => {
                self.user = outcome.succeeded();
                true
            }
            None => false,
        }
    }

    pub fn wait(&mut self) {
        if let Some(outcome) = self.action.wait() {
            self.user = outcome.succeeded();
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.action.loading
    }

    pub fn error(&self) -> &str {
        &self.action.error
    }
}

/// Boards the user can select
#[derive(Debug, Default)]
pub struct Boards {
    action: Action<Vec<Board>>,
    boards: Vec<Board>,
}

impl Boards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fetch(&mut self, api: &SharedApi) -> bool {
        debug!("fetching boards");
        let api = api.clone();
        self.action.start(move || api.list_boards())
    }

    /// Collect the response. Returns true if state changed.
    pub fn poll(&mut self) -> bool {
        match self.action.poll() {
            Some(outcome) => {
                self.apply(outcome);
                true
            }
            None => false,
        }
    }

    pub fn wait(&mut self) {
        if let Some(outcome) = self.action.wait() {
            self.apply(outcome);
        }
    }

    fn apply(&mut self, outcome: Outcome<Vec<Board>>) {
        if let Outcome::Succeeded(boards) = outcome {
            self.boards = boards;
        }
    }

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub fn get(&self, id: BoardId) -> Option<&Board> {
        self.boards.iter().find(|b| b.id == id)
    }

    pub fn loading(&self) -> bool {
        self.action.loading
    }

    pub fn error(&self) -> &str {
        &self.action.error
    }
}

/// Workflow states and tags of the selected board
#[derive(Debug, Default)]
pub struct BoardDetails {
    board_id: Option<BoardId>,
    action: Action<(Vec<State>, Vec<Tag>)>,
    pub states: Vec<State>,
    pub tags: Vec<Tag>,
}

impl BoardDetails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board_id(&self) -> Option<BoardId> {
        self.board_id
    }

    /// Switch to another board, fetching its states and tags. No-op if unchanged.
    pub fn set_board(&mut self, api: &SharedApi, board_id: Option<BoardId>) {
        if self.board_id == board_id {
            return;
        }
        self.board_id = board_id;
        self.states.clear();
        self.tags.clear();
        // Drop whatever the previous board still had in flight
        self.action = Action::default();
        if let Some(id) = board_id {
            let api = api.clone();
            self.action.start(move || {
                let states = api.list_states(id)?;
                let tags = api.list_tags(id)?;
                Ok((states, tags))
            });
        }
    }

    pub fn poll(&mut self) -> bool {
        match self.action.poll() {
            Some(outcome) => {
                self.apply(outcome);
                true
            }
            None => false,
        }
    }

    pub fn wait(&mut self) {
        if let Some(outcome) = self.action.wait() {
            self.apply(outcome);
        }
    }

    fn apply(&mut self, outcome: Outcome<(Vec<State>, Vec<Tag>)>) {
        if let Outcome::Succeeded((states, tags)) = outcome {
            self.states = states;
            self.tags = tags;
        }
    }

    /// Add a tag created elsewhere to the known list
    pub fn add_tag(&mut self, tag: Tag) {
        if !self.tags.iter().any(|t| t.id == tag.id) {
            self.tags.push(tag);
        }
    }

    pub fn loading(&self) -> bool {
        self.action.loading
    }

    pub fn error(&self) -> &str {
        &self.action.error
    }
}

/// Creates tags from the edit form
#[derive(Debug, Default)]
pub struct CreateTag {
    action: Action<Tag>,
}

impl CreateTag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_tag(&mut self, api: &SharedApi, form: CreateTagForm) -> bool {
        let api = api.clone();
        self.action.start(move || api.create_tag(&form))
    }

    pub fn poll(&mut self) -> Option<Outcome<Tag>> {
        self.action.poll()
    }

    pub fn wait(&mut self) -> Option<Outcome<Tag>> {
        self.action.wait()
    }

    pub fn loading(&self) -> bool {
        self.action.loading
    }

    pub fn error(&self) -> &str {
        &self.action.error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryApi;
    use std::sync::Arc;

    #[test]
    fn session_loads_user() {
        let api: SharedApi = Arc::new(MemoryApi::new().with_user("ada"));
        let mut session = Session::new();
        session.fetch(&api);
        assert!(session.loading());
        session.wait();
        assert_eq!(session.user().map(|u| u.name.as_str()), Some("ada"));
        assert!(!session.loading());
    }

    #[test]
    fn session_without_user_reports_error() {
        let api: SharedApi = Arc::new(MemoryApi::new());
        let mut session = Session::new();
        session.fetch(&api);
        session.wait();
        assert!(session.user().is_none());
        assert_eq!(session.error(), "not signed in");
    }

    #[test]
    fn boards_fetch_and_lookup() {
        let mem = Arc::new(MemoryApi::new());
        let id = mem.add_board("Roadmap", &["Todo"]);
        let api: SharedApi = mem.clone();
        let mut boards = Boards::new();
        boards.fetch(&api);
        boards.wait();
        assert_eq!(boards.boards().len(), 1);
        assert_eq!(boards.get(id).map(|b| b.name.as_str()), Some("Roadmap"));
        assert!(boards.get(id + 100).is_none());
    }

    #[test]
    fn board_details_follow_selected_board() {
        let mem = Arc::new(MemoryApi::new());
        let a = mem.add_board("A", &["Todo", "Done"]);
        let b = mem.add_board("B", &["Open"]);
        let api: SharedApi = mem.clone();

        let mut details = BoardDetails::new();
        details.set_board(&api, Some(a));
        details.wait();
        assert_eq!(details.states.len(), 2);

        details.set_board(&api, Some(b));
        assert!(details.states.is_empty());
        details.wait();
        assert_eq!(details.states[0].name, "Open");

        details.set_board(&api, None);
        assert!(details.states.is_empty());
        assert!(!details.loading());
    }

    #[test]
    fn create_tag_and_inject() {
        let mem = Arc::new(MemoryApi::new());
        let board = mem.add_board("A", &["Todo"]);
        let api: SharedApi = mem.clone();
        let mut details = BoardDetails::new();
        details.set_board(&api, Some(board));
        details.wait();

        let mut create = CreateTag::new();
        create.create_tag(
            &api,
            CreateTagForm {
                board_id: board,
                name: "urgent".into(),
            },
        );
        let tag = create.wait().and_then(Outcome::succeeded).unwrap();
        details.add_tag(tag.clone());
        details.add_tag(tag);
        assert_eq!(details.tags.len(), 1);
    }
}
