use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::api::MemoryApi;
use crate::model::ClientConfig;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Render the whole app at the default terminal size
pub fn render_app(app: &mut App) -> String {
    render_to_string(TERM_W, TERM_H, |frame, _| super::render(frame, app))
}

/// Tick until no request is in flight
pub fn run_until_idle(app: &mut App) {
    for _ in 0..1000 {
        app.tick();
        if !app.is_busy() {
            return;
        }
        thread::sleep(Duration::from_millis(2));
    }
    panic!("app still busy after waiting");
}

/// A mounted app over the demo data, starting at `path`, with everything loaded
pub fn demo_app(path: &str) -> App {
    let api = Arc::new(MemoryApi::demo());
    let mut app = App::new(api, &ClientConfig::default(), path);
    app.mount();
    run_until_idle(&mut app);
    app
}
