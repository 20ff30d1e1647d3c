//! Board colors, overridable from `[ui.colors]` and `[ui.tag_colors]`.

use std::collections::HashMap;

use chrono::NaiveDate;
use log::warn;
use ratatui::style::Color;

use crate::model::UiConfig;

/// Accents for tags with no configured color. A tag always hashes to the same one.
const TAG_ACCENTS: [Color; 6] = [
    Color::Rgb(0x39, 0xC5, 0xCF),
    Color::Rgb(0xBC, 0x8C, 0xFF),
    Color::Rgb(0xE3, 0xB3, 0x41),
    Color::Rgb(0x58, 0xA6, 0xFF),
    Color::Rgb(0xF0, 0x88, 0x3E),
    Color::Rgb(0xDB, 0x61, 0xA2),
];

/// Days ahead for which a due date is shown in the normal text color
const DUE_SOON_DAYS: i64 = 3;

#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub purple: Color,
    pub selection_bg: Color,
    pub selection_border: Color,
    pub search_match_bg: Color,
    pub search_match_fg: Color,
    /// Keyed by lowercase tag name
    tag_colors: HashMap<String, Color>,
}

impl Default for Theme {
    fn default() -> Self {
        let background = Color::Rgb(0x16, 0x1B, 0x22);
        let highlight = Color::Rgb(0x2F, 0xBF, 0xA0);
        let red = Color::Rgb(0xF8, 0x51, 0x49);
        let yellow = Color::Rgb(0xE3, 0xB3, 0x41);
        let cyan = Color::Rgb(0x39, 0xC5, 0xCF);
        let purple = Color::Rgb(0xBC, 0x8C, 0xFF);

        let tag_colors = [("bug", red), ("design", purple), ("research", cyan), ("errand", yellow)]
            .into_iter()
            .map(|(name, color)| (name.to_string(), color))
            .collect();

        Theme {
            background,
            text: Color::Rgb(0xC9, 0xD1, 0xD9),
            text_bright: Color::Rgb(0xF0, 0xF6, 0xFC),
            highlight,
            dim: Color::Rgb(0x6E, 0x76, 0x81),
            red,
            yellow,
            green: Color::Rgb(0x3F, 0xB9, 0x50),
            cyan,
            purple,
            selection_bg: Color::Rgb(0x1F, 0x3A, 0x4A),
            selection_border: highlight,
            search_match_bg: yellow,
            search_match_fg: background,
            tag_colors,
        }
    }
}

/// `#RRGGBB` or `#RGB`
fn parse_color(value: &str) -> Option<Color> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Color::Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 0x11);
            Some(Color::Rgb(short(0)?, short(1)?, short(2)?))
        }
        _ => None,
    }
}

impl Theme {
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (name, value) in &ui.colors {
            let Some(color) = parse_color(value) else {
                warn!("ignoring ui.colors.{}: '{}' is not a #RRGGBB color", name, value);
                continue;
            };
            match theme.slot_mut(name) {
                Some(slot) => *slot = color,
                None => warn!("ignoring unknown color ui.colors.{}", name),
            }
        }

        for (tag, value) in &ui.tag_colors {
            match parse_color(value) {
                Some(color) => {
                    theme.tag_colors.insert(tag.trim_start_matches('#').to_lowercase(), color);
                }
                None => warn!("ignoring ui.tag_colors.{}: '{}' is not a #RRGGBB color", tag, value),
            }
        }

        theme
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut Color> {
        Some(match name {
            "background" => &mut self.background,
            "text" => &mut self.text,
            "text_bright" => &mut self.text_bright,
            "highlight" => &mut self.highlight,
            "dim" => &mut self.dim,
            "red" => &mut self.red,
            "yellow" => &mut self.yellow,
            "green" => &mut self.green,
            "cyan" => &mut self.cyan,
            "purple" => &mut self.purple,
            "selection_bg" => &mut self.selection_bg,
            "selection_border" => &mut self.selection_border,
            "search_match_bg" => &mut self.search_match_bg,
            "search_match_fg" => &mut self.search_match_fg,
            _ => return None,
        })
    }

    /// Configured color of a tag, else a stable accent picked from its name
    pub fn tag_color(&self, tag: &str) -> Color {
        let key = tag.to_lowercase();
        if let Some(color) = self.tag_colors.get(&key) {
            return *color;
        }
        let hash = key
            .bytes()
            .fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(u32::from(b)));
        TAG_ACCENTS[hash as usize % TAG_ACCENTS.len()]
    }

    /// Header color of state column `index` out of `count`.
    /// The last state of a board reads as finished work.
    pub fn state_color(&self, index: usize, count: usize) -> Color {
        if count > 1 && index + 1 == count {
            return self.green;
        }
        let accents = [self.cyan, self.purple, self.yellow];
        accents[index % accents.len()]
    }

    pub fn due_color(&self, due: NaiveDate, today: NaiveDate) -> Color {
        match (due - today).num_days() {
            days if days < 0 => self.red,
            0 => self.yellow,
            days if days <= DUE_SOON_DAYS => self.text,
            _ => self.dim,
        }
    }
}
