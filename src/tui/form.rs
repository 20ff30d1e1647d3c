//! The task edit form: a local draft plus the widgets that edit it.
//!
//! The form never talks to the API. Submitting, cancelling and creating a tag
//! go out through [`TaskFormEvents`]; the owner reports back with
//! [`TaskEditForm::submit_completed`] and [`TaskEditForm::tag_created`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use super::dropdown::{Dropdown, DropdownEvent, DropdownItem};
use super::input_field::{FieldName, InputEvent, InputField};
use crate::model::{BoardId, State, StateId, Tag, TagId, TaskForm, parse_due_date};

/// Callbacks from the form to whoever owns it
pub trait TaskFormEvents {
    /// The draft passed validation. Called once per submission; the form stays
    /// disabled until `submit_completed`.
    fn on_submit(&mut self, draft: TaskForm);
    fn on_cancel(&mut self);
    /// Create a tag with this name; answer with `tag_created`
    fn on_create_tag(&mut self, name: String);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Name,
    Description,
    DueAt,
    Tags,
    State,
    Cancel,
    Save,
}

const FOCUS_ORDER: [FormFocus; 7] = [
    FormFocus::Name,
    FormFocus::Description,
    FormFocus::DueAt,
    FormFocus::Tags,
    FormFocus::State,
    FormFocus::Cancel,
    FormFocus::Save,
];

/// Whether the form makes a new task or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPurpose {
    Create { board_id: BoardId },
    Edit,
}

/// Entries of the tag menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagChoice {
    Tag(TagId),
    New,
}

/// Screen rectangles of the form's controls, recorded by the renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct FormHitAreas {
    pub name: Rect,
    pub description: Rect,
    pub due_at: Rect,
    pub tags: Rect,
    pub state: Rect,
    pub cancel: Rect,
    pub save: Rect,
}

#[derive(Debug, Clone)]
pub struct TaskEditForm {
    pub purpose: FormPurpose,
    draft: TaskForm,
    pub name: InputField,
    pub description: InputField,
    pub due_at: InputField,
    /// Open while a new tag name is being typed
    pub new_tag: Option<InputField>,
    tags: Vec<Tag>,
    states: Vec<State>,
    pub tag_menu: Dropdown<TagChoice>,
    pub state_menu: Dropdown<StateId>,
    pub focus: FormFocus,
    submitting: bool,
    creating_tag: bool,
    /// Validation message shown under the fields
    pub field_error: Option<String>,
    pub hit_areas: FormHitAreas,
}

impl TaskEditForm {
    pub fn new(purpose: FormPurpose, draft: TaskForm, states: &[State], tags: &[Tag]) -> Self {
        let due = draft
            .due_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let mut form = TaskEditForm {
            purpose,
            name: InputField::new(FieldName::Name, "Name", &draft.name).with_placeholder("What needs doing?"),
            description: InputField::new(FieldName::Description, "Description", &draft.description)
                .optional(),
            due_at: InputField::new(FieldName::DueAt, "Due Date", &due)
                .optional()
                .with_placeholder("YYYY-MM-DD")
                .with_icon('◷'),
            new_tag: None,
            tags: tags.to_vec(),
            states: states.to_vec(),
            tag_menu: Dropdown::new(Vec::new())
                .hoverable(true)
                .close_on_content_click(false),
            state_menu: Dropdown::new(Vec::new()),
            focus: FormFocus::Name,
            submitting: false,
            creating_tag: false,
            field_error: None,
            hit_areas: FormHitAreas::default(),
            draft,
        };
        form.refresh_tag_menu();
        form.refresh_state_menu();
        form
    }

    pub fn draft(&self) -> &TaskForm {
        &self.draft
    }

    /// Tags that can be toggled, including ones created from this form
    pub fn available_tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Name of the draft's state
    pub fn state_name(&self) -> Option<&str> {
        self.states
            .iter()
            .find(|s| s.id == self.draft.state_id)
            .map(|s| s.name.as_str())
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_creating_tag(&self) -> bool {
        self.creating_tag
    }

    pub fn title(&self) -> &'static str {
        match self.purpose {
            FormPurpose::Create { .. } => "New Task",
            FormPurpose::Edit => "Edit Task",
        }
    }

    /// Mirror an input change into the draft
    pub fn on_input_change(&mut self, name: FieldName, value: &str) {
        match name {
            FieldName::Name => self.draft.name = value.to_string(),
            FieldName::Description => self.draft.description = value.to_string(),
            // Parsed on submit
            FieldName::DueAt | FieldName::NewTag => {}
        }
        self.field_error = None;
    }

    /// Add or remove a tag from the draft by id
    pub fn toggle_tag(&mut self, tag_id: TagId) {
        if let Some(tag) = self.tags.iter().find(|t| t.id == tag_id).cloned() {
            self.draft.toggle_tag(&tag);
            self.refresh_tag_menu();
        }
    }

    pub fn select_state(&mut self, state_id: StateId) {
        if self.states.iter().any(|s| s.id == state_id) {
            self.draft.state_id = state_id;
        }
    }

    /// Validate and hand the draft to `on_submit`. Refused (false) while a
    /// previous submission or a new tag is still outstanding, or the draft is
    /// invalid.
    pub fn submit(&mut self, events: &mut dyn TaskFormEvents) -> bool {
        if self.submitting || self.creating_tag {
            return false;
        }
        if self.name.is_missing() {
            self.field_error = Some("Name is required".to_string());
            self.focus = FormFocus::Name;
            return false;
        }
        match parse_due_date(self.due_at.value()) {
            Ok(date) => self.draft.set_due_date(date),
            Err(e) => {
                self.field_error = Some(e);
                self.focus = FormFocus::DueAt;
                return false;
            }
        }
        self.draft.name = self.draft.name.trim().to_string();
        self.field_error = None;
        self.submitting = true;
        self.tag_menu.close();
        self.state_menu.close();
        events.on_submit(self.draft.clone());
        true
    }

    /// The owner finished handling a submission; the form accepts input again
    pub fn submit_completed(&mut self) {
        self.submitting = false;
    }

    pub fn cancel(&mut self, events: &mut dyn TaskFormEvents) {
        events.on_cancel();
    }

    /// Show the new-tag input
    pub fn start_tag_creation(&mut self) {
        self.focus = FormFocus::Tags;
        if self.new_tag.is_none() {
            self.new_tag = Some(InputField::new(FieldName::NewTag, "New tag", "").with_placeholder("tag name"));
        }
    }

    /// Ask the owner to create the typed tag
    pub fn create_tag(&mut self, events: &mut dyn TaskFormEvents) -> bool {
        if self.creating_tag {
            return false;
        }
        let Some(input) = &self.new_tag else {
            return false;
        };
        let name = input.value().trim().to_string();
        if name.is_empty() {
            return false;
        }
        self.creating_tag = true;
        events.on_create_tag(name);
        true
    }

    /// Result of `on_create_tag`. A created tag joins the available list; the
    /// form stays open either way.
    pub fn tag_created(&mut self, tag: Option<Tag>) {
        self.creating_tag = false;
        let Some(tag) = tag else {
            return;
        };
        if !self.tags.iter().any(|t| t.id == tag.id) {
            self.tags.push(tag.clone());
        }
        self.new_tag = None;
        self.refresh_tag_menu();
        self.tag_menu.highlight_key(&TagChoice::Tag(tag.id));
    }

    pub fn focus_next(&mut self) {
        self.move_focus(1);
    }

    pub fn focus_prev(&mut self) {
        self.move_focus(FOCUS_ORDER.len() - 1);
    }

    fn move_focus(&mut self, step: usize) {
        self.tag_menu.close();
        self.state_menu.close();
        let idx = FOCUS_ORDER.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = FOCUS_ORDER[(idx + step) % FOCUS_ORDER.len()];
    }

    /// The focused text input, if focus is on one
    pub fn focused_input(&self) -> Option<&InputField> {
        match self.focus {
            FormFocus::Name => Some(&self.name),
            FormFocus::Description => Some(&self.description),
            FormFocus::DueAt => Some(&self.due_at),
            FormFocus::Tags => self.new_tag.as_ref(),
            _ => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, events: &mut dyn TaskFormEvents) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            self.submit(events);
            return;
        }
        match key.code {
            KeyCode::Tab => return self.focus_next(),
            KeyCode::BackTab => return self.focus_prev(),
            _ => {}
        }

        match self.focus {
            FormFocus::Name | FormFocus::Description | FormFocus::DueAt => {
                let field = match self.focus {
                    FormFocus::Name => &mut self.name,
                    FormFocus::Description => &mut self.description,
                    _ => &mut self.due_at,
                };
                match field.handle_key(key) {
                    InputEvent::Changed { name, value } => self.on_input_change(name, &value),
                    InputEvent::Submit => self.focus_next(),
                    InputEvent::Blur => self.cancel(events),
                    InputEvent::Ignored => {}
                }
            }
            FormFocus::Tags => self.tags_key(key, events),
            FormFocus::State => self.state_key(key, events),
            FormFocus::Cancel => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Esc => self.cancel(events),
                _ => {}
            },
            FormFocus::Save => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => {
                    self.submit(events);
                }
                KeyCode::Esc => self.cancel(events),
                _ => {}
            },
        }
    }

    fn tags_key(&mut self, key: KeyEvent, events: &mut dyn TaskFormEvents) {
        if let Some(input) = &mut self.new_tag {
            match input.handle_key(key) {
                InputEvent::Submit => {
                    self.create_tag(events);
                }
                InputEvent::Blur => self.new_tag = None,
                InputEvent::Changed { .. } | InputEvent::Ignored => {}
            }
            return;
        }
        match key.code {
            KeyCode::Esc if self.tag_menu.is_visible() => self.tag_menu.close(),
            KeyCode::Esc => self.cancel(events),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.tag_menu.is_visible() {
                    if let Some(event) = self.tag_menu.click_highlighted() {
                        self.on_tag_menu(event);
                    }
                } else {
                    self.tag_menu.toggle();
                }
            }
            KeyCode::Down | KeyCode::Char('j') => self.tag_menu.move_highlight(1),
            KeyCode::Up | KeyCode::Char('k') => self.tag_menu.move_highlight(-1),
            KeyCode::Char('n') => self.start_tag_creation(),
            _ => {}
        }
    }

    fn state_key(&mut self, key: KeyEvent, events: &mut dyn TaskFormEvents) {
        match key.code {
            KeyCode::Esc if self.state_menu.is_visible() => self.state_menu.close(),
            KeyCode::Esc => self.cancel(events),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.state_menu.is_visible() {
                    if let Some(DropdownEvent::ItemClicked(id)) = self.state_menu.click_highlighted() {
                        self.select_state(id);
                    }
                } else {
                    self.state_menu.highlight_key(&self.draft.state_id);
                    self.state_menu.toggle();
                }
            }
            KeyCode::Down | KeyCode::Char('j') => self.state_menu.move_highlight(1),
            KeyCode::Up | KeyCode::Char('k') => self.state_menu.move_highlight(-1),
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent, events: &mut dyn TaskFormEvents) {
        let pos = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved => {
                self.tag_menu.pointer_moved(pos);
            }
            MouseEventKind::Down(MouseButton::Left) => {
                // Open menus sit on top of the fields
                if self.tag_menu.menu_area().is_some_and(|m| m.contains(pos)) {
                    if let Some(event) = self.tag_menu.pointer_clicked(pos) {
                        self.on_tag_menu(event);
                    }
                    return;
                }
                if self.state_menu.menu_area().is_some_and(|m| m.contains(pos)) {
                    if let Some(DropdownEvent::ItemClicked(id)) = self.state_menu.pointer_clicked(pos) {
                        self.select_state(id);
                    }
                    return;
                }
                let areas = self.hit_areas;
                if areas.tags.contains(pos) {
                    self.focus = FormFocus::Tags;
                    self.state_menu.close();
                    self.tag_menu.toggle();
                } else if areas.state.contains(pos) {
                    self.focus = FormFocus::State;
                    self.tag_menu.close();
                    self.state_menu.highlight_key(&self.draft.state_id);
                    self.state_menu.toggle();
                } else {
                    self.tag_menu.close();
                    self.state_menu.close();
                    if areas.save.contains(pos) {
                        self.submit(events);
                    } else if areas.cancel.contains(pos) {
                        self.cancel(events);
                    } else if areas.name.contains(pos) {
                        self.focus = FormFocus::Name;
                    } else if areas.description.contains(pos) {
                        self.focus = FormFocus::Description;
                    } else if areas.due_at.contains(pos) {
                        self.focus = FormFocus::DueAt;
                    }
                }
            }
            _ => {}
        }
    }

    fn on_tag_menu(&mut self, event: DropdownEvent<TagChoice>) {
        match event {
            DropdownEvent::ItemClicked(TagChoice::Tag(id)) => self.toggle_tag(id),
            DropdownEvent::ItemClicked(TagChoice::New) => {
                self.tag_menu.close();
                self.start_tag_creation();
            }
            DropdownEvent::Toggled { .. } => {}
        }
    }

    fn refresh_tag_menu(&mut self) {
        let mut items: Vec<DropdownItem<TagChoice>> = self
            .tags
            .iter()
            .map(|t| DropdownItem {
                key: TagChoice::Tag(t.id),
                label: format!("[{}] {}", if self.draft.has_tag(t.id) { 'x' } else { ' ' }, t.name),
            })
            .collect();
        items.push(DropdownItem {
            key: TagChoice::New,
            label: "+ New tag".to_string(),
        });
        self.tag_menu.set_items(items);
    }

    fn refresh_state_menu(&mut self) {
        let items = self
            .states
            .iter()
            .map(|s| DropdownItem {
                key: s.id,
                label: s.name.clone(),
            })
            .collect();
        self.state_menu.set_items(items);
    }
}
