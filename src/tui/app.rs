use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::{debug, info};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use crate::api::SharedApi;
use crate::model::{BoardId, ClientConfig, State, StateId, Task, TaskForm};
use crate::ops::filter::{TaskFilter, compile_pattern};
use crate::ops::grouping::order_tasks_by_state;
use crate::router::{MemoryRouter, Navigator};
use crate::store::Outcome;
use crate::store::boards::{BoardDetails, Boards, CreateTag, Session};
use crate::store::tasks::{CreateTask, DeleteTask, EditTask, Tasks};

use super::board_tabs::BoardTabs;
use super::form::{FormPurpose, TaskEditForm};
use super::input;
use super::render;
use super::theme::Theme;

/// Which page the content area shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Board(BoardId),
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Search,
    /// The task form is open
    Form,
    /// Waiting for y/n on a delete
    ConfirmDelete,
}

/// A message for the status row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

/// One column of the board page: a state and its (filtered) tasks
#[derive(Debug, Clone)]
pub struct Column {
    pub state: State,
    pub tasks: Vec<Task>,
}

/// Main application state
pub struct App {
    pub api: SharedApi,
    pub theme: Theme,
    pub show_key_hints: bool,
    pub router: MemoryRouter,
    pub tabs: BoardTabs,
    pub session: Session,
    pub boards: Boards,
    pub details: BoardDetails,
    pub tasks: Tasks,
    pub create_task: CreateTask,
    pub edit_task: EditTask,
    pub delete_task: DeleteTask,
    pub create_tag: CreateTag,
    pub mode: Mode,
    /// Open task form
    pub form: Option<TaskEditForm>,
    /// Cursor on the dashboard's board list
    pub dashboard_cursor: usize,
    /// Focused column on the board page
    pub column_cursor: usize,
    /// Focused task within the column
    pub row_cursor: usize,
    /// Search mode: current query being typed
    pub search_input: String,
    /// Last executed search pattern
    pub last_search: Option<String>,
    pub filter: TaskFilter,
    pub notice: Option<Notice>,
    /// Task awaiting delete confirmation
    pub pending_delete: Option<Task>,
    /// Help overlay visible
    pub show_help: bool,
    pub should_quit: bool,
    /// Tab rectangles from the last render, for mouse clicks
    pub tab_areas: Vec<(Rect, Option<BoardId>)>,
    /// Bumped each time a form opens; identifies the open form
    form_generation: u64,
    /// Form generation that started the in-flight create, edit and tag requests
    pub(super) create_owner: Option<u64>,
    pub(super) edit_owner: Option<u64>,
    pub(super) tag_owner: Option<(u64, BoardId)>,
    boards_requested: bool,
    boards_synced: bool,
}

impl App {
    pub fn new(api: SharedApi, config: &ClientConfig, path: &str) -> Self {
        App {
            api,
            theme: Theme::from_config(&config.ui),
            show_key_hints: config.ui.show_key_hints,
            router: MemoryRouter::new(path),
            tabs: BoardTabs::new(),
            session: Session::new(),
            boards: Boards::new(),
            details: BoardDetails::new(),
            tasks: Tasks::new(),
            create_task: CreateTask::new(),
            edit_task: EditTask::new(),
            delete_task: DeleteTask::new(),
            create_tag: CreateTag::new(),
            mode: Mode::Navigate,
            form: None,
            dashboard_cursor: 0,
            column_cursor: 0,
            row_cursor: 0,
            search_input: String::new(),
            last_search: None,
            filter: TaskFilter::default(),
            notice: None,
            pending_delete: None,
            show_help: false,
            should_quit: false,
            tab_areas: Vec::new(),
            form_generation: 0,
            create_owner: None,
            edit_owner: None,
            tag_owner: None,
            boards_requested: false,
            boards_synced: false,
        }
    }

    /// Start loading: the current user first, boards once it is known
    pub fn mount(&mut self) {
        self.session.fetch(&self.api);
    }

    pub fn view(&self) -> View {
        match self.tabs.current_board_id() {
            Some(id) => View::Board(id),
            None => View::Dashboard,
        }
    }

    /// Any request in flight
    pub fn is_busy(&self) -> bool {
        self.session.loading()
            || self.boards.loading()
            || self.details.loading()
            || self.tasks.loading
            || self.create_task.loading()
            || self.edit_task.loading()
            || self.delete_task.loading()
            || self.create_tag.loading()
    }

    /// Collect finished requests and start the ones the current state calls
    /// for. Runs once per event-loop iteration.
    pub fn tick(&mut self) {
        self.session.poll();
        if !self.boards_requested && self.session.user().is_some() {
            self.boards_requested = true;
            self.boards.fetch(&self.api);
        }

        self.boards.poll();
        if self.boards_requested && !self.boards_synced && !self.boards.loading() {
            self.boards_synced = true;
            if self.boards.error().is_empty() {
                self.tabs.on_boards_loaded(self.boards.boards(), &mut self.router);
                self.dashboard_cursor = self
                    .dashboard_cursor
                    .min(self.boards.boards().len().saturating_sub(1));
            }
        }

        let board = self.tabs.current_board_id();
        self.tasks.set_board(&self.api, board);
        self.details.set_board(&self.api, board);
        self.tasks.poll();
        self.details.poll();

        self.collect_mutations();
        self.clamp_cursors();
    }

    fn collect_mutations(&mut self) {
        if let Some(outcome) = self.create_task.poll() {
            let owner = self.create_owner.take();
            match outcome {
                Outcome::Succeeded(task) => {
                    self.notify(&format!("Created \"{}\"", task.name));
                    self.tasks.upsert(task);
                    self.close_form_of(owner);
                }
                Outcome::Failed => self.submit_failed(owner, self.create_task.error().to_string()),
            }
        }
        if let Some(outcome) = self.edit_task.poll() {
            let owner = self.edit_owner.take();
            match outcome {
                Outcome::Succeeded(task) => {
                    self.notify(&format!("Saved \"{}\"", task.name));
                    self.tasks.upsert(task);
                    self.close_form_of(owner);
                }
                Outcome::Failed => self.submit_failed(owner, self.edit_task.error().to_string()),
            }
        }
        if let Some(outcome) = self.delete_task.poll() {
            match outcome {
                Outcome::Succeeded(id) => {
                    self.tasks.remove(id);
                    self.notify("Task deleted");
                }
                Outcome::Failed => self.notify_error(self.delete_task.error().to_string()),
            }
        }
        if let Some(outcome) = self.create_tag.poll() {
            let owner = self.tag_owner.take();
            let tag = outcome.succeeded();
            match (&tag, owner) {
                (Some(tag), Some((_, board_id))) if self.details.board_id() == Some(board_id) => {
                    self.details.add_tag(tag.clone());
                }
                (Some(tag), _) => self.notify(&format!("Created tag #{}", tag.name)),
                (None, _) => self.notify_error(self.create_tag.error().to_string()),
            }
            if let Some(form) = self.owned_form(owner.map(|(generation, _)| generation)) {
                form.tag_created(tag);
            }
        }
    }

    /// Generation of the open form, if any
    pub fn form_generation(&self) -> Option<u64> {
        self.form.as_ref().map(|_| self.form_generation)
    }

    /// The open form, if it is the one that started a request
    fn owned_form(&mut self, owner: Option<u64>) -> Option<&mut TaskEditForm> {
        if owner.is_some() && owner == self.form_generation() {
            self.form.as_mut()
        } else {
            None
        }
    }

    fn close_form_of(&mut self, owner: Option<u64>) {
        if self.owned_form(owner).is_some() {
            self.close_form();
        }
    }

    fn submit_failed(&mut self, owner: Option<u64>, message: String) {
        if let Some(form) = self.owned_form(owner) {
            form.submit_completed();
        }
        self.notify_error(message);
    }

    pub fn notify(&mut self, text: &str) {
        self.notice = Some(Notice {
            text: text.to_string(),
            is_error: false,
        });
    }

    pub fn notify_error(&mut self, text: String) {
        self.notice = Some(Notice { text, is_error: true });
    }

    /// States and filtered tasks of the current board, in state order
    pub fn columns(&self) -> Vec<Column> {
        let states = &self.details.states;
        let mut grouped = order_tasks_by_state(self.tasks.tasks(), states);
        states
            .iter()
            .map(|state| Column {
                state: state.clone(),
                tasks: grouped
                    .swap_remove(&state.id)
                    .unwrap_or_default()
                    .into_iter()
                    .filter(|t| self.filter.matches(t))
                    .collect(),
            })
            .collect()
    }

    /// Task under the board cursor
    pub fn selected_task(&self) -> Option<Task> {
        let mut columns = self.columns();
        if self.column_cursor >= columns.len() {
            return None;
        }
        let column = columns.swap_remove(self.column_cursor);
        column.tasks.into_iter().nth(self.row_cursor)
    }

    /// State of the focused column
    pub fn focused_state(&self) -> Option<StateId> {
        self.details.states.get(self.column_cursor).map(|s| s.id)
    }

    fn clamp_cursors(&mut self) {
        let columns = self.columns();
        if columns.is_empty() {
            self.column_cursor = 0;
            self.row_cursor = 0;
            return;
        }
        self.column_cursor = self.column_cursor.min(columns.len() - 1);
        let rows = columns[self.column_cursor].tasks.len();
        self.row_cursor = self.row_cursor.min(rows.saturating_sub(1));
    }

    /// Move to another tab
    pub fn select_board(&mut self, board_id: Option<BoardId>) {
        if self.tabs.current_board_id() == board_id {
            return;
        }
        self.tabs.select_board(board_id, &mut self.router);
        self.column_cursor = 0;
        self.row_cursor = 0;
        self.notice = None;
    }

    /// Open the form for a new task in `state_id`
    pub fn open_create_form(&mut self, state_id: StateId) {
        let View::Board(board_id) = self.view() else {
            return;
        };
        let form = TaskEditForm::new(
            FormPurpose::Create { board_id },
            TaskForm::blank(state_id),
            &self.details.states,
            &self.details.tags,
        );
        self.show_form(form);
    }

    /// Open the form on an existing task
    pub fn open_edit_form(&mut self, task: &Task) {
        let form = TaskEditForm::new(
            FormPurpose::Edit,
            TaskForm::from(task),
            &self.details.states,
            &self.details.tags,
        );
        self.show_form(form);
    }

    fn show_form(&mut self, form: TaskEditForm) {
        self.form_generation = self.form_generation.wrapping_add(1);
        self.form = Some(form);
        self.mode = Mode::Form;
    }

    pub fn close_form(&mut self) {
        self.form = None;
        if self.mode == Mode::Form {
            self.mode = Mode::Navigate;
        }
    }

    /// Fetch boards again; tabs re-sync when they arrive
    pub fn reload_boards(&mut self) {
        if self.boards.fetch(&self.api) {
            self.boards_synced = false;
        }
    }

    /// Apply a search pattern to the board page. Empty clears it.
    pub fn set_filter(&mut self, pattern: &str) {
        self.filter.pattern = compile_pattern(pattern);
        self.row_cursor = 0;
    }
}

/// Restore the router path and search from state.json
pub fn restore_ui_state(app: &mut App, state_path: &std::path::Path) {
    use crate::io::state::read_ui_state;

    let Some(ui_state) = read_ui_state(state_path) else {
        return;
    };
    app.router = MemoryRouter::new(&ui_state.path);
    if let Some(pattern) = &ui_state.last_search {
        app.set_filter(pattern);
    }
    app.last_search = ui_state.last_search;
}

/// Save the router path and search to state.json
pub fn save_ui_state(app: &App, state_path: &std::path::Path) {
    use crate::io::state::{UiState, write_ui_state};

    let ui_state = UiState {
        path: app.router.pathname().to_string(),
        last_search: app.last_search.clone(),
    };
    if let Err(e) = write_ui_state(state_path, &ui_state) {
        log::warn!("could not save UI state: {}", e);
    }
}

/// Run the TUI application. Without a `start_path` (e.g. `/42`) the path and
/// search saved from the last session are restored.
pub fn run(
    api: SharedApi,
    config: &ClientConfig,
    start_path: Option<String>,
    state_path: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(api, config, "/");
    match start_path {
        Some(path) => app.router = MemoryRouter::new(&path),
        None => restore_ui_state(&mut app, &state_path),
    }
    info!("starting at {}", app.router.pathname());
    app.mount();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        default_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    save_ui_state(&app, &state_path);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                Event::Resize(w, h) => debug!("resized to {}x{}", w, h),
                _ => {}
            }
        }

        app.tick();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
