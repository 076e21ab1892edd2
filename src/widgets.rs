//! Reusable clickable UI components.
//!
//! Each component encapsulates both rendering and click target registration,
//! keeping visual output and interactive behaviour co-located.
//!
//! # Components
//!
//! - [`ClickableList`] — lines paired with click actions; targets are
//!   registered at whatever rows the lines end up on.
//! - [`meter_line`] — a labeled resource bar (energy, level progress).

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::style::{Color, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Paragraph, Wrap};

use crate::input::ClickState;

/// A builder that pairs rendered [`Line`]s with click actions.
///
/// Instead of manually calculating row offsets for click targets, annotate
/// lines as clickable when adding them, then call
/// [`register_targets`](ClickableList::register_targets) once after layout to
/// register every target at the correct row automatically.
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line_index, action_id)` pairs — line_index is the index into `lines`.
    actions: Vec<(u16, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Add a non-clickable line.
    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    /// Add a clickable line with a semantic action ID.
    ///
    /// The action is bound to whatever row this line ends up on — if lines
    /// are inserted or removed before it, the target moves automatically.
    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        let idx = self.lines.len() as u16;
        self.actions.push((idx, action_id));
        self.lines.push(line);
    }

    /// Blank spacer line.
    pub fn push_blank(&mut self) {
        self.lines.push(Line::default());
    }

    /// Total number of logical lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Visual rows this list occupies when wrapped to `inner_width`.
    ///
    /// Uses `Paragraph::line_count` (ratatui's rendered-line-info API) so the
    /// estimate matches what the widget actually renders.
    pub fn visual_height(&self, inner_width: u16) -> u16 {
        if inner_width == 0 {
            return self.lines.len() as u16;
        }
        Paragraph::new(self.lines.clone())
            .wrap(Wrap { trim: false })
            .line_count(inner_width) as u16
    }

    /// Consume the builder, returning the lines for rendering.
    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register click targets for all clickable lines.
    ///
    /// * `area` — the widget area (including borders).
    /// * `cs` — shared click state.
    /// * `top_offset` / `bottom_offset` — rows before/after content (borders).
    /// * `scroll` — vertical scroll offset in visual rows.
    /// * `inner_width` — content width for wrap calculation; pass `0` when the
    ///   widget does **not** wrap, in which case each logical line is assumed
    ///   to occupy exactly one visual row.
    pub fn register_targets(
        &self,
        area: Rect,
        cs: &mut ClickState,
        top_offset: u16,
        bottom_offset: u16,
        scroll: u16,
        inner_width: u16,
    ) {
        let content_y = area.y + top_offset;
        let content_end = area.y + area.height.saturating_sub(bottom_offset);

        if inner_width == 0 {
            // 1 logical line = 1 visual row (no wrapping).
            for &(line_idx, action_id) in &self.actions {
                if line_idx < scroll {
                    continue;
                }
                let row = content_y + (line_idx - scroll);
                if row >= content_end {
                    continue;
                }
                cs.add_row_target(area, row, action_id);
            }
            return;
        }

        // Wrap-aware path: compute the visual row offset for each logical line.
        let w = inner_width as usize;
        let mut visual_starts: Vec<u16> = Vec::with_capacity(self.lines.len());
        let mut visual_heights: Vec<u16> = Vec::with_capacity(self.lines.len());
        let mut cumulative: u16 = 0;
        for line in &self.lines {
            visual_starts.push(cumulative);
            let lw = line.width();
            let h = if lw <= w { 1 } else { lw.div_ceil(w) as u16 };
            visual_heights.push(h);
            cumulative += h;
        }

        for &(line_idx, action_id) in &self.actions {
            let li = line_idx as usize;
            if li >= self.lines.len() {
                continue;
            }
            let vstart = visual_starts[li];
            let vheight = visual_heights[li];

            // Register a click target for every visual row this line spans.
            for r in 0..vheight {
                let vr = vstart + r;
                if vr < scroll {
                    continue;
                }
                let screen_row = content_y + (vr - scroll);
                if screen_row >= content_end {
                    break;
                }
                cs.add_row_target(area, screen_row, action_id);
            }
        }
    }
}

/// A labeled resource bar: `ЭНЕРГИЯ [██████░░░░] 37/100`.
pub fn meter_line(label: &str, current: u32, max: u32, bar_width: u16, color: Color) -> Line<'static> {
    let max = max.max(1);
    let filled = ((current.min(max) as u64 * bar_width as u64) / max as u64) as u16;
    let empty = bar_width - filled;

    Line::from(vec![
        Span::styled(format!("{label} "), Style::default().fg(Color::White)),
        Span::styled("█".repeat(filled as usize), Style::default().fg(color)),
        Span::styled("░".repeat(empty as usize), Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!(" {current}/{max}"),
            Style::default().fg(Color::Gray),
        ),
    ])
}
