//! Paints a [`GridFrame`] as terminal text.
//!
//! Pixel widths are mapped to character cells. Sticky cells are drawn at the
//! leading edge; the remaining cells scroll horizontally behind them.

use fixgrid::layout::{FilterContent, Placement};
use fixgrid::prelude::*;
use fixgrid::{Rgb, extract_text};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const SEPARATOR: char = '│';
const SHADOW_SEPARATOR: char = '┃';
const RULE: char = '─';

/// Text rendering settings.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPainter {
    /// Pixels per character cell.
    pub char_width: f64,
    /// Horizontal scroll of the non-sticky columns, in characters.
    pub scroll_x: u16,
    /// Visible width in characters. `None` paints the full table.
    pub viewport: Option<u16>,
    /// Emit 24-bit ANSI colors.
    pub color: bool,
}

impl Default for TextPainter {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            scroll_x: 0,
            viewport: None,
            color: false,
        }
    }
}

type Colors = (Rgb, Option<Rgb>);

struct Slot<'a> {
    placement: &'a Placement,
    text: String,
    colors: Option<Colors>,
}

impl<'a> Slot<'a> {
    fn new(placement: &'a Placement, text: impl Into<String>) -> Self {
        Self {
            placement,
            text: text.into(),
            colors: None,
        }
    }

    fn colored(mut self, background: Rgb, foreground: Option<Rgb>) -> Self {
        self.colors = Some((background, foreground));
        self
    }
}

impl TextPainter {
    /// Paint the whole frame, one line per toolbar, header, filter row and
    /// body row.
    pub fn paint(&self, frame: &GridFrame) -> String {
        let mut lines = Vec::new();

        if let Some(toolbar) = &frame.toolbar {
            let action = if toolbar.download_enabled {
                "[download csv]"
            } else {
                "[download csv: select rows first]"
            };
            lines.push(format!("{}  {}", toolbar.summary, action));
        }
        if frame.loading.is_some() {
            lines.push("Loading…".to_string());
        }

        let (header, width) = self.paint_line(header_slots(frame), true);
        lines.push(header);
        lines.push(self.paint_line(filter_slots(frame), false).0);
        lines.push(RULE.to_string().repeat(width));

        if frame.rows.is_empty() {
            lines.push("No rows".to_string());
        }
        for row in &frame.rows {
            lines.push(self.paint_line(row_slots(row), false).0);
        }

        lines.join("\n")
    }

    /// Character cells taken by a pixel width.
    pub fn columns(&self, width: f64) -> u16 {
        let cells = (width / self.char_width).round();
        cells.clamp(1.0, u16::MAX as f64) as u16
    }

    fn paint_line(&self, slots: Vec<Slot<'_>>, bold: bool) -> (String, usize) {
        let mut out = String::new();
        let mut painted = 0usize;
        let mut sticky_width: u16 = 0;

        let (sticky, scrolling): (Vec<_>, Vec<_>) =
            slots.into_iter().partition(|s| s.placement.is_sticky());

        for slot in &sticky {
            let width = self.columns(slot.placement.width);
            let room = match self.viewport {
                Some(viewport) => viewport.saturating_sub(sticky_width).min(width),
                None => width,
            };
            if room == 0 {
                break;
            }
            let text = clip(&cell_text(slot, width), room as usize);
            out.push_str(&self.styled(&text, slot.colors, bold));
            painted += room as usize;
            sticky_width += room;
        }

        let region = self.viewport.map(|v| v.saturating_sub(sticky_width));
        let mut x: u16 = 0;
        for slot in &scrolling {
            let width = self.columns(slot.placement.width);
            let col_start = x;
            x = x.saturating_add(width);
            if x <= self.scroll_x {
                continue;
            }

            let rel_x = col_start.saturating_sub(self.scroll_x);
            if region.is_some_and(|region| rel_x >= region) {
                break;
            }

            let visible_start = self.scroll_x.saturating_sub(col_start);
            let mut visible_width = width - visible_start;
            if let Some(region) = region {
                visible_width = visible_width.min(region - rel_x);
            }

            let text = cell_text(slot, width);
            let shown = clip(&skip_columns(&text, visible_start as usize), visible_width as usize);
            out.push_str(&self.styled(&shown, slot.colors, bold));
            painted += visible_width as usize;
        }

        (out, painted)
    }

    fn styled(&self, text: &str, colors: Option<Colors>, bold: bool) -> String {
        if !self.color || (colors.is_none() && !bold) {
            return text.to_string();
        }
        let mut codes = String::new();
        if bold {
            codes.push_str("\x1b[1m");
        }
        if let Some((bg, fg)) = colors {
            codes.push_str(&format!("\x1b[48;2;{};{};{}m", bg.r, bg.g, bg.b));
            let fg = fg.unwrap_or(Rgb::hex(0x111827));
            codes.push_str(&format!("\x1b[38;2;{};{};{}m", fg.r, fg.g, fg.b));
        }
        format!("{codes}{text}\x1b[0m")
    }
}

fn header_slots(frame: &GridFrame) -> Vec<Slot<'_>> {
    let mut slots = Vec::new();
    if let Some(checkbox) = &frame.header.checkbox {
        let mark = match checkbox.state {
            HeaderCheck::Unchecked => "[ ]",
            HeaderCheck::Checked => "[x]",
            HeaderCheck::Indeterminate => "[-]",
        };
        slots.push(Slot::new(&checkbox.placement, mark));
    }
    for cell in &frame.header.cells {
        let label = match cell.sort {
            Some(SortDirection::Ascending) => format!("{} ▲", cell.label),
            Some(SortDirection::Descending) => format!("{} ▼", cell.label),
            None => cell.label.clone(),
        };
        slots.push(Slot::new(&cell.placement, label));
    }
    slots
}

fn filter_slots(frame: &GridFrame) -> Vec<Slot<'_>> {
    let mut slots = Vec::new();
    if let Some(spacer) = &frame.filter.spacer {
        slots.push(Slot::new(spacer, ""));
    }
    for cell in &frame.filter.cells {
        let text = match &cell.content {
            FilterContent::Input { value, clearable } if *clearable => format!("/{value} ×"),
            FilterContent::Input { .. } => "/".to_string(),
            FilterContent::Total(total) => format!("= {total}"),
            FilterContent::Blank => String::new(),
        };
        slots.push(Slot::new(&cell.placement, text));
    }
    slots
}

fn row_slots(row: &fixgrid::layout::BodyRow) -> Vec<Slot<'_>> {
    let mut slots = Vec::new();
    if let Some(checkbox) = &row.checkbox {
        let mark = if checkbox.checked { "[x]" } else { "[ ]" };
        slots.push(Slot::new(&checkbox.placement, mark).colored(checkbox.background, row.foreground));
    }
    for cell in &row.cells {
        slots.push(
            Slot::new(&cell.placement, extract_text(&cell.value))
                .colored(cell.background, cell.foreground),
        );
    }
    slots
}

/// Cell content fitted to `width - 1` columns plus its trailing separator.
fn cell_text(slot: &Slot<'_>, width: u16) -> String {
    let separator = if slot.placement.shadow {
        SHADOW_SEPARATOR
    } else {
        SEPARATOR
    };
    let flat: String = slot
        .text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let mut text = fit(&flat, width.saturating_sub(1) as usize);
    text.push(separator);
    text
}

/// Pad or truncate to exactly `width` columns, marking truncation with `…`.
pub fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return pad(text.to_string(), width);
    }
    if width == 0 {
        return String::new();
    }
    let mut out = clip(text, width - 1);
    out = out.trim_end().to_string();
    out.push('…');
    pad(out, width)
}

/// Truncate to at most `width` columns without a marker, then pad.
fn clip(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    pad(out, width)
}

/// Drop the first `n` columns. A wide character cut in half becomes spaces.
fn skip_columns(text: &str, n: usize) -> String {
    let mut out = String::new();
    let mut pos = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if pos >= n {
            out.push(c);
        } else if pos + w > n {
            out.push_str(&" ".repeat(pos + w - n));
        }
        pos += w;
    }
    out
}

fn pad(mut text: String, width: usize) -> String {
    let used = text.width();
    if used < width {
        text.push_str(&" ".repeat(width - used));
    }
    text
}
