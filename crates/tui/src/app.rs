//! Application state.

use ratatui::layout::Rect;
use tfplan_core::Forest;

use crate::navigator::Navigator;
use crate::theme::Theme;

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Cursor, viewport and search state over the plan forest.
    pub navigator: Navigator,
    /// Resolved colors, fixed for the whole session.
    pub theme: Theme,
    /// Shown next to the logo in the header bar.
    pub title: String,
    /// Whether the help overlay is open.
    pub show_help: bool,
    /// Area of the plan panel (for mouse hit testing)
    pub plan_area: Rect,
    /// Visible index of every terminal line drawn in the plan panel
    pub row_map: Vec<usize>,
}

impl App {
    /// Create a new application for a built forest and a terminal of the
    /// given size.
    pub fn new(forest: Forest, theme: Theme, title: impl Into<String>, width: u16, height: u16) -> Self {
        // Header and status bars take one row each.
        let plan_height = usize::from(height.saturating_sub(2));
        Self {
            navigator: Navigator::new(forest, plan_height, usize::from(width)),
            theme,
            title: title.into(),
            show_help: false,
            plan_area: Rect::default(),
            row_map: Vec::new(),
        }
    }

    /// Visible index under a terminal position inside the plan panel.
    pub(crate) fn row_at(&self, x: u16, y: u16) -> Option<usize> {
        let area = self.plan_area;
        if x < area.x || x >= area.x + area.width || y < area.y || y >= area.y + area.height {
            return None;
        }
        self.row_map.get(usize::from(y - area.y)).copied()
    }
}
