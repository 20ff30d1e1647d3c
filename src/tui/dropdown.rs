//! A generic popover menu anchored below a trigger.
//!
//! The menu's position is derived from the trigger's rectangle. Each render
//! pass reports the trigger and viewport through [`Dropdown::observe`]; the
//! position is recomputed only when either of them changed.

use ratatui::layout::{Position, Rect};

use crate::util::unicode;

/// Most rows shown at once
pub const MAX_VISIBLE: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownItem<K> {
    pub key: K,
    pub label: String,
}

/// What a dropdown interaction produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropdownEvent<K> {
    /// The trigger was activated or hovered; the menu is now open or closed
    Toggled { visible: bool },
    /// An item was activated
    ItemClicked(K),
}

#[derive(Debug, Clone)]
pub struct Dropdown<K> {
    items: Vec<DropdownItem<K>>,
    visible: bool,
    /// Open on pointer enter, close on pointer leave
    pub hoverable: bool,
    /// Close after an item is activated
    pub close_on_content_click: bool,
    highlighted: usize,
    anchor: Option<Rect>,
    viewport: Option<Rect>,
    menu: Option<Rect>,
}

impl<K: Clone + PartialEq> Dropdown<K> {
    pub fn new(items: Vec<DropdownItem<K>>) -> Self {
        Dropdown {
            items,
            visible: false,
            hoverable: false,
            close_on_content_click: true,
            highlighted: 0,
            anchor: None,
            viewport: None,
            menu: None,
        }
    }

    pub fn hoverable(mut self, hoverable: bool) -> Self {
        self.hoverable = hoverable;
        self
    }

    pub fn close_on_content_click(mut self, close: bool) -> Self {
        self.close_on_content_click = close;
        self
    }

    pub fn items(&self) -> &[DropdownItem<K>] {
        &self.items
    }

    /// Replace the items, keeping the highlight on the same key if it survives
    pub fn set_items(&mut self, items: Vec<DropdownItem<K>>) {
        let current = self.items.get(self.highlighted).map(|i| i.key.clone());
        self.items = items;
        self.highlighted = current
            .and_then(|k| self.items.iter().position(|i| i.key == k))
            .unwrap_or(0);
        self.recompute();
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    /// Move the highlight onto `key`, if present
    pub fn highlight_key(&mut self, key: &K) {
        if let Some(idx) = self.items.iter().position(|i| &i.key == key) {
            self.highlighted = idx;
        }
    }

    pub fn move_highlight(&mut self, delta: isize) {
        if self.items.is_empty() {
            return;
        }
        let last = self.items.len() as isize - 1;
        self.highlighted = (self.highlighted as isize + delta).clamp(0, last) as usize;
    }

    /// Trigger activated: flip visibility
    pub fn toggle(&mut self) -> DropdownEvent<K> {
        self.visible = !self.visible;
        DropdownEvent::Toggled {
            visible: self.visible,
        }
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    /// Pointer entered the trigger. Only opens hoverable menus.
    pub fn hover_in(&mut self) -> Option<DropdownEvent<K>> {
        if !self.hoverable || self.visible {
            return None;
        }
        self.visible = true;
        Some(DropdownEvent::Toggled { visible: true })
    }

    /// Pointer left the trigger and the menu. Only closes hoverable menus.
    pub fn hover_out(&mut self) -> Option<DropdownEvent<K>> {
        if !self.hoverable || !self.visible {
            return None;
        }
        self.visible = false;
        Some(DropdownEvent::Toggled { visible: false })
    }

    /// Activate the item at `index`
    pub fn click_item(&mut self, index: usize) -> Option<DropdownEvent<K>> {
        let key = self.items.get(index)?.key.clone();
        self.highlighted = index;
        self.visible = !self.close_on_content_click;
        Some(DropdownEvent::ItemClicked(key))
    }

    pub fn click_highlighted(&mut self) -> Option<DropdownEvent<K>> {
        if !self.visible {
            return None;
        }
        self.click_item(self.highlighted)
    }

    /// Report the trigger's rectangle and the viewport for this layout pass.
    /// Returns true if the menu position was recomputed.
    pub fn observe(&mut self, anchor: Rect, viewport: Rect) -> bool {
        if self.anchor == Some(anchor) && self.viewport == Some(viewport) {
            return false;
        }
        self.anchor = Some(anchor);
        self.viewport = Some(viewport);
        self.recompute();
        true
    }

    pub fn anchor(&self) -> Option<Rect> {
        self.anchor
    }

    /// Where the open menu sits, if it's open and has been laid out
    pub fn menu_area(&self) -> Option<Rect> {
        if self.visible { self.menu } else { None }
    }

    /// First item row shown, so the highlight stays in view
    pub fn scroll_start(&self) -> usize {
        (self.highlighted + 1).saturating_sub(MAX_VISIBLE)
    }

    /// Item index under a screen position inside the open menu
    pub fn item_at(&self, pos: Position) -> Option<usize> {
        let menu = self.menu_area()?;
        if !menu.contains(pos) || pos.y == menu.y || pos.y + 1 >= menu.bottom() {
            return None;
        }
        let idx = self.scroll_start() + (pos.y - menu.y - 1) as usize;
        (idx < self.items.len()).then_some(idx)
    }

    /// Pointer moved to `pos`: hover handling for hoverable menus
    pub fn pointer_moved(&mut self, pos: Position) -> Option<DropdownEvent<K>> {
        let on_trigger = self.anchor.is_some_and(|a| a.contains(pos));
        let on_menu = self.menu_area().is_some_and(|m| m.contains(pos));
        if on_trigger {
            self.hover_in()
        } else if !on_menu {
            self.hover_out()
        } else {
            None
        }
    }

    /// Pointer clicked at `pos`: trigger toggles, items activate
    pub fn pointer_clicked(&mut self, pos: Position) -> Option<DropdownEvent<K>> {
        if self.anchor.is_some_and(|a| a.contains(pos)) {
            return Some(self.toggle());
        }
        let idx = self.item_at(pos)?;
        self.click_item(idx)
    }

    fn recompute(&mut self) {
        let (Some(anchor), Some(viewport)) = (self.anchor, self.viewport) else {
            self.menu = None;
            return;
        };
        let widest = self
            .items
            .iter()
            .map(|i| unicode::display_width(&i.label))
            .max()
            .unwrap_or(0);
        // borders + "▸ " marker + trailing pad
        let width = (widest as u16 + 6).max(anchor.width).min(viewport.width);
        let rows = self.items.len().clamp(1, MAX_VISIBLE) as u16;
        let height = (rows + 2).min(viewport.height);

        let x = anchor
            .x
            .min(viewport.right().saturating_sub(width))
            .max(viewport.x);
        let below = anchor.bottom();
        let y = if below + height <= viewport.bottom() {
            below
        } else {
            anchor.y.saturating_sub(height).max(viewport.y)
        };
        self.menu = Some(Rect::new(x, y, width, height));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<DropdownItem<u64>> {
        (0..n)
            .map(|i| DropdownItem {
                key: i as u64 * 10,
                label: format!("item {}", i),
            })
            .collect()
    }

    const VIEW: Rect = Rect {
        x: 0,
        y: 0,
        width: 80,
        height: 24,
    };

    #[test]
    fn toggle_flips_visibility() {
        let mut dd = Dropdown::new(items(3));
        assert_eq!(dd.toggle(), DropdownEvent::Toggled { visible: true });
        assert!(dd.is_visible());
        assert_eq!(dd.toggle(), DropdownEvent::Toggled { visible: false });
    }

    #[test]
    fn item_click_closes_by_default() {
        let mut dd = Dropdown::new(items(3));
        dd.toggle();
        assert_eq!(dd.click_item(1), Some(DropdownEvent::ItemClicked(10)));
        assert!(!dd.is_visible());
    }

    #[test]
    fn item_click_can_keep_menu_open() {
        let mut dd = Dropdown::new(items(3)).close_on_content_click(false);
        dd.toggle();
        dd.click_item(2);
        assert!(dd.is_visible());
        assert!(dd.click_item(9).is_none());
    }

    #[test]
    fn hover_only_for_hoverable_menus() {
        let mut plain = Dropdown::new(items(2));
        assert!(plain.hover_in().is_none());
        assert!(!plain.is_visible());

        let mut dd = Dropdown::new(items(2)).hoverable(true);
        assert_eq!(dd.hover_in(), Some(DropdownEvent::Toggled { visible: true }));
        assert!(dd.hover_in().is_none());
        assert_eq!(dd.hover_out(), Some(DropdownEvent::Toggled { visible: false }));
    }

    #[test]
    fn menu_sits_below_trigger() {
        let mut dd = Dropdown::new(items(3));
        dd.toggle();
        assert!(dd.observe(Rect::new(10, 5, 20, 1), VIEW));
        let menu = dd.menu_area().unwrap();
        assert_eq!((menu.x, menu.y), (10, 6));
        assert_eq!(menu.height, 5);
        assert_eq!(menu.width, 20);
    }

    #[test]
    fn position_recomputed_only_on_change() {
        let mut dd = Dropdown::new(items(3));
        assert!(dd.observe(Rect::new(10, 5, 20, 1), VIEW));
        assert!(!dd.observe(Rect::new(10, 5, 20, 1), VIEW));
        assert!(dd.observe(Rect::new(12, 5, 20, 1), VIEW));
        assert!(dd.observe(Rect::new(12, 5, 20, 1), Rect::new(0, 0, 100, 30)));
    }

    #[test]
    fn closed_menu_has_no_area() {
        let mut dd = Dropdown::new(items(3));
        dd.observe(Rect::new(10, 5, 20, 1), VIEW);
        assert!(dd.menu_area().is_none());
    }

    #[test]
    fn flips_above_when_no_room_below() {
        let mut dd = Dropdown::new(items(5));
        dd.toggle();
        dd.observe(Rect::new(0, 20, 10, 1), VIEW);
        let menu = dd.menu_area().unwrap();
        assert_eq!(menu.bottom(), 20);
    }

    #[test]
    fn clamped_to_right_edge() {
        let mut dd = Dropdown::new(items(2));
        dd.toggle();
        dd.observe(Rect::new(75, 2, 4, 1), VIEW);
        let menu = dd.menu_area().unwrap();
        assert!(menu.right() <= VIEW.right());
    }

    #[test]
    fn pointer_interactions() {
        let mut dd = Dropdown::new(items(3)).hoverable(true);
        dd.observe(Rect::new(10, 5, 20, 1), VIEW);
        // Entering the trigger opens
        assert!(dd.pointer_moved(Position::new(12, 5)).is_some());
        assert!(dd.is_visible());
        // Moving into the menu keeps it open
        assert!(dd.pointer_moved(Position::new(12, 7)).is_none());
        assert!(dd.is_visible());
        // Row 7 is the first item (row 6 is the border)
        assert_eq!(
            dd.pointer_clicked(Position::new(12, 7)),
            Some(DropdownEvent::ItemClicked(0))
        );
        assert!(!dd.is_visible());
        // Clicking the trigger toggles
        dd.pointer_clicked(Position::new(11, 5));
        assert!(dd.is_visible());
        // Leaving both closes
        assert!(dd.pointer_moved(Position::new(60, 20)).is_some());
        assert!(!dd.is_visible());
    }

    #[test]
    fn highlight_moves_within_bounds_and_survives_item_changes() {
        let mut dd = Dropdown::new(items(3));
        dd.move_highlight(5);
        assert_eq!(dd.highlighted(), 2);
        dd.move_highlight(-9);
        assert_eq!(dd.highlighted(), 0);
        dd.highlight_key(&20);
        assert_eq!(dd.highlighted(), 2);

        let mut more = items(3);
        more.insert(
            0,
            DropdownItem {
                key: 99,
                label: "new".into(),
            },
        );
        dd.set_items(more);
        assert_eq!(dd.items()[dd.highlighted()].key, 20);
    }

    #[test]
    fn scrolls_to_keep_highlight_visible() {
        let mut dd = Dropdown::new(items(12));
        dd.move_highlight(10);
        assert_eq!(dd.scroll_start(), 3);
    }
}
