use log::debug;

use crate::model::{Board, BoardId};
use crate::router::{Navigator, board_id_from_path, board_path};

pub const DASHBOARD_LABEL: &str = "Dashboard";

/// One entry of the tab bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabItem {
    pub label: String,
    /// `None` for the dashboard tab
    pub board_id: Option<BoardId>,
    pub selected: bool,
}

/// Keeps the selected board tab and the router path in step.
///
/// Until boards have loaded, the dashboard tab is selected.
#[derive(Debug, Clone, Default)]
pub struct BoardTabs {
    current: Option<BoardId>,
    loaded: bool,
}

impl BoardTabs {
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected board, `None` for the dashboard
    pub fn current_board_id(&self) -> Option<BoardId> {
        self.current
    }

    pub fn has_loaded(&self) -> bool {
        self.loaded
    }

    /// Boards arrived. The first time, a path naming a loaded board selects it
    /// in place; anything else goes back to `/`. Later loads re-navigate to
    /// the selected board, or `/` if it no longer exists.
    pub fn on_boards_loaded(&mut self, boards: &[Board], nav: &mut dyn Navigator) {
        let exists = |id: BoardId| boards.iter().any(|b| b.id == id);
        if !self.loaded {
            self.loaded = true;
            match board_id_from_path(nav.pathname()).filter(|id| exists(*id)) {
                Some(id) => {
                    debug!("restoring board {} from path", id);
                    self.current = Some(id);
                }
                None => {
                    self.current = None;
                    if nav.pathname() != "/" {
                        debug!("path {} names no board, showing dashboard", nav.pathname());
                    }
                    nav.navigate("/");
                }
            }
            return;
        }
        self.current = self.current.filter(|id| exists(*id));
        nav.navigate(&board_path(self.current));
    }

    /// Select a board (or the dashboard) and navigate to it
    pub fn select_board(&mut self, board_id: Option<BoardId>, nav: &mut dyn Navigator) {
        self.current = board_id;
        nav.navigate(&board_path(board_id));
    }

    /// Dashboard first, then one tab per board
    pub fn tabs(&self, boards: &[Board]) -> Vec<TabItem> {
        let mut tabs = vec![TabItem {
            label: DASHBOARD_LABEL.to_string(),
            board_id: None,
            selected: self.current.is_none(),
        }];
        if self.loaded {
            tabs.extend(boards.iter().map(|b| TabItem {
                label: b.name.clone(),
                board_id: Some(b.id),
                selected: self.current == Some(b.id),
            }));
        }
        tabs
    }

    /// Position of the selected tab in `tabs(boards)`
    pub fn selected_index(&self, boards: &[Board]) -> usize {
        self.tabs(boards).iter().position(|t| t.selected).unwrap_or(0)
    }

    /// Select the tab at `index`; out of range is ignored
    pub fn select_index(&mut self, index: usize, boards: &[Board], nav: &mut dyn Navigator) {
        if let Some(tab) = self.tabs(boards).get(index) {
            self.select_board(tab.board_id, nav);
        }
    }

    pub fn select_next(&mut self, boards: &[Board], nav: &mut dyn Navigator) {
        let count = self.tabs(boards).len();
        let next = (self.selected_index(boards) + 1) % count;
        self.select_index(next, boards, nav);
    }

    pub fn select_prev(&mut self, boards: &[Board], nav: &mut dyn Navigator) {
        let count = self.tabs(boards).len();
        let prev = (self.selected_index(boards) + count - 1) % count;
        self.select_index(prev, boards, nav);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::MemoryRouter;

    fn boards() -> Vec<Board> {
        vec![
            Board {
                id: 7,
                name: "Home".into(),
            },
            Board {
                id: 42,
                name: "Product".into(),
            },
        ]
    }

    #[test]
    fn dashboard_until_boards_load() {
        let tabs = BoardTabs::new();
        let items = tabs.tabs(&boards());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "Dashboard");
        assert!(items[0].selected);
        assert_eq!(tabs.current_board_id(), None);
    }

    #[test]
    fn valid_path_selects_board_without_navigating() {
        let mut router = MemoryRouter::new("/42");
        let mut tabs = BoardTabs::new();
        tabs.on_boards_loaded(&boards(), &mut router);
        assert_eq!(tabs.current_board_id(), Some(42));
        assert!(router.history().is_empty());
        assert_eq!(router.pathname(), "/42");
        let selected: Vec<_> = tabs.tabs(&boards()).into_iter().filter(|t| t.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].label, "Product");
    }

    #[test]
    fn root_path_selects_dashboard() {
        let mut router = MemoryRouter::new("/");
        let mut tabs = BoardTabs::new();
        tabs.on_boards_loaded(&boards(), &mut router);
        assert_eq!(tabs.current_board_id(), None);
        assert_eq!(router.pathname(), "/");
    }

    #[test]
    fn invalid_paths_fall_back_to_dashboard() {
        for path in ["/abc", "/0", "/99", "/7x"] {
            let mut router = MemoryRouter::new(path);
            let mut tabs = BoardTabs::new();
            tabs.on_boards_loaded(&boards(), &mut router);
            assert_eq!(tabs.current_board_id(), None, "path {}", path);
            assert_eq!(router.history(), ["/".to_string()], "path {}", path);
        }
    }

    #[test]
    fn later_loads_renavigate_to_selection() {
        let mut router = MemoryRouter::new("/7");
        let mut tabs = BoardTabs::new();
        tabs.on_boards_loaded(&boards(), &mut router);
        tabs.on_boards_loaded(&boards(), &mut router);
        assert_eq!(router.history(), ["/7".to_string()]);

        // Selected board disappeared
        tabs.on_boards_loaded(&boards()[1..], &mut router);
        assert_eq!(tabs.current_board_id(), None);
        assert_eq!(router.pathname(), "/");
    }

    #[test]
    fn selecting_tabs_navigates() {
        let mut router = MemoryRouter::new("/");
        let mut tabs = BoardTabs::new();
        let boards = boards();
        tabs.on_boards_loaded(&boards, &mut router);

        tabs.select_index(2, &boards, &mut router);
        assert_eq!(router.pathname(), "/42");
        tabs.select_next(&boards, &mut router);
        assert_eq!(router.pathname(), "/");
        tabs.select_prev(&boards, &mut router);
        assert_eq!(router.pathname(), "/42");
        tabs.select_index(9, &boards, &mut router);
        assert_eq!(router.pathname(), "/42");
    }
}
