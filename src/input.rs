//! Shared input handling: coordinate conversion, click targets, key events.
//!
//! The render pass registers rectangular click targets with semantic action
//! IDs as it draws; the mouse handler converts browser pixel coordinates to
//! terminal cells and hit-tests them. Pure logic, unit tested on the host;
//! DOM access stays in `main.rs`.

use ratzilla::ratatui::layout::Rect;

/// Key presses normalized away from the backend's key-code type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Left,
    Right,
    Esc,
}

/// A region on screen that can be tapped/clicked to trigger an action.
#[derive(Debug, Clone)]
pub struct ClickTarget {
    /// The rectangular region (in terminal cell coordinates) for hit testing.
    pub rect: Rect,
    /// Semantic action ID (see `app::actions`).
    pub action_id: u16,
}

/// Shared state between the render loop and the click handler.
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    /// Register a click target with a rectangular hit region.
    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        self.targets.push(ClickTarget { rect, action_id });
    }

    /// Convenience: register a full-row click target at the given row within
    /// an area. Rows outside the area are ignored.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.targets.push(ClickTarget {
                rect: Rect::new(area.x, row, area.width, 1),
                action_id,
            });
        }
    }

    /// Hit-test a terminal cell coordinate against all registered targets.
    /// Later-registered (topmost) targets win when regions overlap, matching
    /// typical UI layering where overlays are drawn last.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets.iter().rev().find_map(|t| {
            let r = &t.rect;
            if col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height {
                Some(t.action_id)
            } else {
                None
            }
        })
    }
}

/// Convert a pixel Y coordinate to a terminal row index.
///
/// `click_y` is relative to the grid container's top edge; `grid_height` is
/// the container's pixel height. `None` if the click falls outside the grid
/// or the inputs are degenerate.
pub fn pixel_y_to_row(click_y: f64, grid_height: f64, terminal_rows: u16) -> Option<u16> {
    if grid_height <= 0.0 || terminal_rows == 0 || click_y < 0.0 {
        return None;
    }

    let cell_height = grid_height / terminal_rows as f64;
    let row = (click_y / cell_height) as u16;

    if row >= terminal_rows {
        return None;
    }

    Some(row)
}

/// Convert a pixel X coordinate to a terminal column index.
pub fn pixel_x_to_col(click_x: f64, grid_width: f64, terminal_cols: u16) -> Option<u16> {
    if grid_width <= 0.0 || terminal_cols == 0 || click_x < 0.0 {
        return None;
    }
    let cell_width = grid_width / terminal_cols as f64;
    let col = (click_x / cell_width) as u16;
    if col >= terminal_cols {
        None
    } else {
        Some(col)
    }
}

/// Map a column to a percentage of the usable width; the mini-game basket
/// position is tracked in percent space.
pub fn col_to_percent(col: u16, cols: u16) -> f64 {
    if cols <= 1 {
        return 50.0;
    }
    (col as f64 / (cols - 1) as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── hit_test tests ──────────────────────────────────────────────

    #[test]
    fn hit_test_basic() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 10, 80, 1), 1);
        cs.add_click_target(Rect::new(0, 11, 80, 1), 2);

        assert_eq!(cs.hit_test(5, 10), Some(1));
        assert_eq!(cs.hit_test(5, 11), Some(2));
    }

    #[test]
    fn hit_test_miss_returns_none() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 10, 80, 1), 1);

        assert_eq!(cs.hit_test(5, 9), None);
        assert_eq!(cs.hit_test(5, 11), None);
    }

    #[test]
    fn hit_test_multi_row_rect() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 5, 40, 3), 42);

        assert_eq!(cs.hit_test(10, 4), None);
        assert_eq!(cs.hit_test(10, 5), Some(42));
        assert_eq!(cs.hit_test(10, 6), Some(42));
        assert_eq!(cs.hit_test(10, 7), Some(42));
        assert_eq!(cs.hit_test(10, 8), None);
    }

    #[test]
    fn hit_test_column_precision() {
        let mut cs = ClickState::new();
        // Two targets side by side on the same row
        cs.add_click_target(Rect::new(0, 5, 10, 1), 1);
        cs.add_click_target(Rect::new(10, 5, 10, 1), 2);

        assert_eq!(cs.hit_test(3, 5), Some(1));
        assert_eq!(cs.hit_test(9, 5), Some(1));
        assert_eq!(cs.hit_test(10, 5), Some(2));
        assert_eq!(cs.hit_test(15, 5), Some(2));
        assert_eq!(cs.hit_test(20, 5), None);
    }

    #[test]
    fn hit_test_overlap_last_wins() {
        let mut cs = ClickState::new();
        // Screen-wide target first (e.g. the mini-game field)
        cs.add_click_target(Rect::new(0, 0, 80, 30), 1);
        // Overlay button registered later (on top)
        cs.add_click_target(Rect::new(30, 10, 20, 1), 2);

        assert_eq!(cs.hit_test(35, 10), Some(2));
        assert_eq!(cs.hit_test(0, 10), Some(1));
        assert_eq!(cs.hit_test(35, 11), Some(1));
    }

    #[test]
    fn hit_test_empty() {
        let cs = ClickState::new();
        assert_eq!(cs.hit_test(0, 0), None);
    }

    // ── add_row_target tests ────────────────────────────────────────

    #[test]
    fn add_row_target_within_area() {
        let mut cs = ClickState::new();
        let area = Rect::new(5, 10, 30, 5);
        cs.add_row_target(area, 12, 99);

        assert_eq!(cs.targets.len(), 1);
        assert_eq!(cs.hit_test(15, 12), Some(99));
    }

    #[test]
    fn add_row_target_outside_area_ignored() {
        let mut cs = ClickState::new();
        let area = Rect::new(5, 10, 30, 5);
        cs.add_row_target(area, 9, 99); // before area
        cs.add_row_target(area, 15, 98); // after area

        assert_eq!(cs.targets.len(), 0);
    }

    // ── ClickState management tests ─────────────────────────────────

    #[test]
    fn click_state_clear() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 1, 80, 1), 1);
        cs.add_click_target(Rect::new(0, 2, 80, 1), 2);
        assert_eq!(cs.targets.len(), 2);

        cs.clear_targets();
        assert_eq!(cs.targets.len(), 0);
        assert_eq!(cs.hit_test(0, 1), None);
    }

    // ── pixel coordinate conversion tests ───────────────────────────

    #[test]
    fn pixel_to_row_basic() {
        assert_eq!(pixel_y_to_row(0.0, 450.0, 30), Some(0));
        assert_eq!(pixel_y_to_row(14.0, 450.0, 30), Some(0));
        assert_eq!(pixel_y_to_row(15.0, 450.0, 30), Some(1));
        assert_eq!(pixel_y_to_row(29.0, 450.0, 30), Some(1));
        assert_eq!(pixel_y_to_row(449.0, 450.0, 30), Some(29));
    }

    #[test]
    fn pixel_to_row_out_of_bounds() {
        assert_eq!(pixel_y_to_row(450.0, 450.0, 30), None);
        assert_eq!(pixel_y_to_row(500.0, 450.0, 30), None);
    }

    #[test]
    fn pixel_to_row_negative_y() {
        assert_eq!(pixel_y_to_row(-1.0, 450.0, 30), None);
    }

    #[test]
    fn pixel_to_row_zero_height() {
        assert_eq!(pixel_y_to_row(10.0, 0.0, 30), None);
    }

    #[test]
    fn pixel_to_row_zero_rows() {
        assert_eq!(pixel_y_to_row(10.0, 450.0, 0), None);
    }

    #[test]
    fn pixel_to_row_fractional_cell_height() {
        assert_eq!(pixel_y_to_row(0.0, 400.0, 24), Some(0));
        assert_eq!(pixel_y_to_row(16.0, 400.0, 24), Some(0));
        assert_eq!(pixel_y_to_row(17.0, 400.0, 24), Some(1));
        assert_eq!(pixel_y_to_row(399.0, 400.0, 24), Some(23));
    }

    #[test]
    fn pixel_x_to_col_basic() {
        assert_eq!(pixel_x_to_col(0.0, 800.0, 80), Some(0));
        assert_eq!(pixel_x_to_col(10.0, 800.0, 80), Some(1));
        assert_eq!(pixel_x_to_col(799.0, 800.0, 80), Some(79));
    }

    #[test]
    fn pixel_x_to_col_out_of_bounds() {
        assert_eq!(pixel_x_to_col(800.0, 800.0, 80), None);
        assert_eq!(pixel_x_to_col(-1.0, 800.0, 80), None);
    }

    #[test]
    fn col_to_percent_spans_field() {
        assert_eq!(col_to_percent(0, 80), 0.0);
        assert_eq!(col_to_percent(79, 80), 100.0);
        let mid = col_to_percent(40, 80);
        assert!((mid - 50.0).abs() < 1.0);
    }

    #[test]
    fn col_to_percent_degenerate_width() {
        assert_eq!(col_to_percent(0, 0), 50.0);
        assert_eq!(col_to_percent(0, 1), 50.0);
    }

    // ── Integration-style pipeline test ─────────────────────────────

    #[test]
    fn full_click_pipeline() {
        let mut cs = ClickState::new();
        cs.terminal_cols = 80;
        cs.terminal_rows = 30;

        cs.add_click_target(Rect::new(20, 8, 40, 10), 1); // tap area
        for row in 27..30 {
            cs.add_click_target(Rect::new(0, row, 80, 1), 99); // footer
        }

        let grid_height = 450.0;
        let grid_width = 800.0;
        let cell_height = grid_height / 30.0;
        let cell_width = grid_width / 80.0;

        // Click inside the tap area
        let row = pixel_y_to_row(12.0 * cell_height + 7.0, grid_height, 30).unwrap();
        let col = pixel_x_to_col(40.0 * cell_width + 3.0, grid_width, 80).unwrap();
        assert_eq!(cs.hit_test(col, row), Some(1));

        // Click on the footer
        let row = pixel_y_to_row(28.0 * cell_height + 10.0, grid_height, 30).unwrap();
        assert_eq!(cs.hit_test(5, row), Some(99));

        // Click on empty space
        let row = pixel_y_to_row(2.0 * cell_height, grid_height, 30).unwrap();
        assert_eq!(cs.hit_test(5, row), None);
    }
}
