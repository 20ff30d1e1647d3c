use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::dropdown::render_dropdown;
use super::helpers::{centered_rect, spans_width};
use crate::tui::app::App;
use crate::tui::form::{FormFocus, TaskEditForm};
use crate::tui::input_field::InputField;
use crate::tui::theme::Theme;
use crate::util::unicode;

const FORM_WIDTH: u16 = 64;
const FORM_HEIGHT: u16 = 12;
const LABEL_WIDTH: usize = 13;

/// Render the task form as a popup over `area`, then any open menu on top
pub fn render_task_form(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = &app.theme;
    let Some(form) = app.form.as_mut() else {
        return;
    };
    let popup = centered_rect(FORM_WIDTH, FORM_HEIGHT, area);
    frame.render_widget(Clear, popup);

    let bg = theme.background;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.selection_border).bg(bg))
        .title(Span::styled(
            format!(" {} ", form.title()),
            Style::default()
                .fg(theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let row = |n: u16| Rect::new(inner.x, inner.y + n, inner.width, 1).intersection(inner);

    let name_focused = form.focus == FormFocus::Name;
    let desc_focused = form.focus == FormFocus::Description;
    let due_focused = form.focus == FormFocus::DueAt;
    form.hit_areas.name = render_input(frame, theme, &form.name, name_focused, row(0));
    form.hit_areas.description = render_input(frame, theme, &form.description, desc_focused, row(1));
    form.hit_areas.due_at = render_input(frame, theme, &form.due_at, due_focused, row(2));

    let tags_label = selected_tags_label(form);
    form.hit_areas.tags = render_trigger(
        frame,
        theme,
        "Tags",
        &tags_label,
        form.focus == FormFocus::Tags && form.new_tag.is_none(),
        row(4),
    );
    if let Some(input) = &form.new_tag {
        render_input(frame, theme, input, form.focus == FormFocus::Tags, row(5));
        if form.is_creating_tag() {
            let hint = Span::styled(" creating\u{2026}", Style::default().fg(theme.dim).bg(bg));
            let r = row(5);
            let x = r.right().saturating_sub(11);
            frame.render_widget(Paragraph::new(Line::from(hint)), Rect::new(x, r.y, 11, 1).intersection(r));
        }
    }

    let state_label = form.state_name().unwrap_or("\u{2014}").to_string();
    form.hit_areas.state = render_trigger(
        frame,
        theme,
        "State",
        &state_label,
        form.focus == FormFocus::State,
        row(6),
    );

    if let Some(error) = &form.field_error {
        let line = Line::from(Span::styled(
            format!(" {}", error),
            Style::default().fg(theme.red).bg(bg),
        ));
        frame.render_widget(Paragraph::new(line), row(8));
    }

    let (cancel, save) = render_buttons(frame, theme, form, row(9));
    form.hit_areas.cancel = cancel;
    form.hit_areas.save = save;

    // Menus follow their triggers; positions only change when these do
    let viewport = frame.area();
    form.tag_menu.observe(form.hit_areas.tags, viewport);
    form.state_menu.observe(form.hit_areas.state, viewport);
    render_dropdown(frame, &form.tag_menu, theme);
    render_dropdown(frame, &form.state_menu, theme);

    // Terminal cursor on the focused text input
    if let Some(input) = form.focused_input() {
        let r = match form.focus {
            FormFocus::Name => form.hit_areas.name,
            FormFocus::Description => form.hit_areas.description,
            FormFocus::DueAt => form.hit_areas.due_at,
            _ => row(5),
        };
        let col = (input_offset(input) + input.cursor_col()) as u16;
        if col < r.width {
            frame.set_cursor_position(Position::new(r.x + col, r.y));
        }
    }
}

/// Columns before the value: label column plus optional icon
fn input_offset(input: &InputField) -> usize {
    LABEL_WIDTH + if input.icon.is_some() { 2 } else { 0 }
}

/// Draw a labelled input on one row; returns the row's rectangle
fn render_input(frame: &mut Frame, theme: &Theme, input: &InputField, focused: bool, area: Rect) -> Rect {
    let bg = theme.background;
    let label_style = if focused {
        Style::default().fg(theme.highlight).bg(bg).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.dim).bg(bg)
    };
    let marker = if input.is_missing() { "*" } else { " " };
    let label = unicode::fit_to_width(&format!(" {}{}", input.label, marker), LABEL_WIDTH);
    let mut spans = vec![Span::styled(label, label_style)];
    if let Some(icon) = input.icon {
        spans.push(Span::styled(format!("{} ", icon), Style::default().fg(theme.cyan).bg(bg)));
    }

    let field_bg = if focused { theme.selection_bg } else { bg };
    let room = (area.width as usize).saturating_sub(spans_width(&spans) + 1);
    if input.value().is_empty() {
        let placeholder = input.placeholder.as_deref().unwrap_or("");
        spans.push(Span::styled(
            unicode::fit_to_width(placeholder, room),
            Style::default().fg(theme.dim).bg(field_bg),
        ));
    } else {
        spans.push(Span::styled(
            unicode::fit_to_width(input.value(), room),
            Style::default().fg(theme.text_bright).bg(field_bg),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
    area
}

/// Draw a labelled menu trigger; returns the trigger's rectangle
fn render_trigger(frame: &mut Frame, theme: &Theme, label: &str, value: &str, focused: bool, area: Rect) -> Rect {
    let bg = theme.background;
    let label_style = if focused {
        Style::default().fg(theme.highlight).bg(bg).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.dim).bg(bg)
    };
    let room = (area.width as usize).saturating_sub(LABEL_WIDTH + 4);
    let text = format!("{} \u{25BE}", unicode::truncate_to_width(value, room));
    let trigger_style = if focused {
        Style::default().fg(theme.text_bright).bg(theme.selection_bg)
    } else {
        Style::default().fg(theme.text).bg(bg)
    };
    let trigger_width = unicode::display_width(&text) as u16;
    let spans = vec![
        Span::styled(unicode::fit_to_width(&format!(" {}", label), LABEL_WIDTH), label_style),
        Span::styled(text, trigger_style),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
    Rect::new(area.x + LABEL_WIDTH as u16, area.y, trigger_width, 1).intersection(area)
}

fn selected_tags_label(form: &TaskEditForm) -> String {
    if form.draft().tags.is_empty() {
        return "none".to_string();
    }
    form.draft()
        .tags
        .iter()
        .map(|t| format!("#{}", t.name))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cancel and Save, right-aligned. Save reads "Saving…" and dims while a
/// submission is outstanding.
fn render_buttons(frame: &mut Frame, theme: &Theme, form: &TaskEditForm, area: Rect) -> (Rect, Rect) {
    let bg = theme.background;
    let button = |focused: bool, enabled: bool| {
        if !enabled {
            Style::default().fg(theme.dim).bg(bg)
        } else if focused {
            Style::default()
                .fg(theme.background)
                .bg(theme.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text).bg(bg)
        }
    };
    let cancel = "[ Cancel ]";
    let save = if form.is_submitting() { "[ Saving\u{2026} ]" } else { "[ Save ]" };
    let cancel_w = unicode::display_width(cancel) as u16;
    let save_w = unicode::display_width(save) as u16;
    let save_x = area.right().saturating_sub(save_w + 1);
    let cancel_x = save_x.saturating_sub(cancel_w + 1);

    let cancel_area = Rect::new(cancel_x, area.y, cancel_w, 1).intersection(area);
    let save_area = Rect::new(save_x, area.y, save_w, 1).intersection(area);
    frame.render_widget(
        Paragraph::new(Span::styled(cancel, button(form.focus == FormFocus::Cancel, true))),
        cancel_area,
    );
    frame.render_widget(
        Paragraph::new(Span::styled(
            save,
            button(
                form.focus == FormFocus::Save,
                !form.is_submitting() && !form.is_creating_tag(),
            ),
        )),
        save_area,
    );
    (cancel_area, save_area)
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

    use super::*;
    use crate::tui::input;
    use crate::tui::render::test_helpers::{TERM_H, TERM_W, demo_app, render_app, render_to_string};

    #[test]
    fn edit_form_shows_fields() {
        let mut app = demo_app("/2");
        let task = app.tasks.tasks()[2].clone();
        app.open_edit_form(&task);
        let output = render_app(&mut app);
        assert!(output.contains("Edit Task"));
        assert!(output.contains("Fix login redirect loop"));
        assert!(output.contains("#bug"));
        assert!(output.contains("In Progress \u{25BE}"));
        assert!(output.contains("[ Save ]"));
    }

    #[test]
    fn empty_required_name_is_marked() {
        let mut app = demo_app("/2");
        let state = app.focused_state().unwrap();
        app.open_create_form(state);
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_task_form(frame, &mut app, area);
        });
        assert!(output.contains("New Task"));
        assert!(output.contains("Name*"));
        assert!(output.contains("What needs doing?"));
    }

    #[test]
    fn save_button_disabled_while_submitting() {
        let mut app = demo_app("/2");
        let task = app.tasks.tasks()[0].clone();
        app.open_edit_form(&task);
        input::form::submit_form(&mut app);
        let output = render_app(&mut app);
        assert!(output.contains("Saving\u{2026}"));
    }

    #[test]
    fn tag_menu_opens_below_its_trigger() {
        let mut app = demo_app("/2");
        let task = app.tasks.tasks()[0].clone();
        app.open_edit_form(&task);
        render_app(&mut app);

        let trigger = app.form.as_ref().unwrap().hit_areas.tags;
        input::handle_mouse(
            &mut app,
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: trigger.x,
                row: trigger.y,
                modifiers: KeyModifiers::NONE,
            },
        );
        let output = render_app(&mut app);
        let form = app.form.as_ref().unwrap();
        assert!(form.tag_menu.is_visible());
        let menu = form.tag_menu.menu_area().unwrap();
        assert_eq!(menu.y, trigger.bottom());
        assert!(output.contains("[x] design"));
        assert!(output.contains("+ New tag"));

        // Toggling from the keyboard keeps the menu open
        input::handle_key(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert!(app.form.as_ref().unwrap().tag_menu.is_visible());
    }
}
