//! Cursor, viewport and search state over the visible part of a plan forest.
//!
//! The navigator owns the forest. Every structural change recomputes the
//! visible flattening and re-establishes the viewport invariant
//! `window_top <= cursor < window_top + window_height`.

use tfplan_core::{Forest, NodeId, NodeKind};

/// Largest horizontal scroll offset, in columns.
pub const MAX_HORIZONTAL_OFFSET: usize = 500;

/// Input mode of the navigator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Typing a query after `/`.
    SearchInput,
    /// Cycling through the matches of a confirmed query.
    SearchActive,
}

#[derive(Debug)]
pub struct Navigator {
    forest: Forest,
    /// Cached flattening of nodes reachable through expanded ancestors.
    visible: Vec<NodeId>,
    cursor: usize,
    window_top: usize,
    window_height: usize,
    width: usize,
    horizontal_offset: usize,
    mode: Mode,
    search_query: String,
    /// Indices into `visible` whose text contains the query.
    search_matches: Vec<usize>,
    search_index: usize,
}

impl Navigator {
    pub fn new(forest: Forest, window_height: usize, width: usize) -> Self {
        let visible = forest.visible();
        Self {
            forest,
            visible,
            cursor: 0,
            window_top: 0,
            window_height: window_height.max(1),
            width,
            horizontal_offset: 0,
            mode: Mode::Normal,
            search_query: String::new(),
            search_matches: Vec::new(),
            search_index: 0,
        }
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn visible(&self) -> &[NodeId] {
        &self.visible
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn window_top(&self) -> usize {
        self.window_top
    }

    pub fn window_height(&self) -> usize {
        self.window_height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn horizontal_offset(&self) -> usize {
        self.horizontal_offset
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn search_matches(&self) -> &[usize] {
        &self.search_matches
    }

    pub fn search_index(&self) -> usize {
        self.search_index
    }

    /// The node under the cursor.
    pub fn selected(&self) -> Option<NodeId> {
        self.visible.get(self.cursor).copied()
    }

    /// Visible rows currently inside the viewport, with their visible index.
    pub fn window(&self) -> impl Iterator<Item = (usize, NodeId)> + '_ {
        self.visible
            .iter()
            .copied()
            .enumerate()
            .skip(self.window_top)
            .take(self.window_height)
    }

    // Movement

    pub fn move_up(&mut self) {
        self.select_index(self.cursor.saturating_sub(1));
    }

    pub fn move_down(&mut self) {
        self.select_index(self.cursor.saturating_add(1));
    }

    pub fn page_up(&mut self) {
        self.select_index(self.cursor.saturating_sub(self.window_height));
    }

    pub fn page_down(&mut self) {
        self.select_index(self.cursor.saturating_add(self.window_height));
    }

    pub fn go_top(&mut self) {
        self.horizontal_offset = 0;
        self.select_index(0);
    }

    pub fn go_bottom(&mut self) {
        self.horizontal_offset = 0;
        self.select_index(self.visible.len().saturating_sub(1));
    }

    /// Put the cursor on a visible index, clamped to the last row.
    pub fn select_index(&mut self, index: usize) {
        self.cursor = index.min(self.visible.len().saturating_sub(1));
        self.scroll_to_cursor();
    }

    /// Jump to the next resource root after the cursor, wrapping around.
    pub fn next_root(&mut self) {
        let roots = self.resource_root_rows();
        let target = roots
            .iter()
            .find(|&&row| row > self.cursor)
            .or_else(|| roots.first());
        if let Some(&row) = target {
            self.select_index(row);
        }
    }

    /// Jump to the previous resource root before the cursor, wrapping around.
    pub fn prev_root(&mut self) {
        let roots = self.resource_root_rows();
        let target = roots
            .iter()
            .rev()
            .find(|&&row| row < self.cursor)
            .or_else(|| roots.last());
        if let Some(&row) = target {
            self.select_index(row);
        }
    }

    fn resource_root_rows(&self) -> Vec<usize> {
        self.visible
            .iter()
            .enumerate()
            .filter(|(_, &id)| {
                let node = self.forest.node(id);
                node.is_root() && node.kind == NodeKind::Resource
            })
            .map(|(row, _)| row)
            .collect()
    }

    // Expansion

    fn toggleable_selection(&self) -> Option<NodeId> {
        self.selected()
            .filter(|&id| self.forest.node(id).can_toggle())
    }

    /// Expand the selected node. Already expanded nodes are left alone.
    pub fn expand(&mut self) {
        if let Some(id) = self.toggleable_selection() {
            if !self.forest.node(id).expanded {
                self.forest.set_expanded(id, true);
                self.refresh();
            }
        }
    }

    /// On an expanded node collapse everything below it; on a collapsed
    /// node expand it together with all of its descendants.
    pub fn toggle_children(&mut self) {
        if let Some(id) = self.toggleable_selection() {
            if self.forest.node(id).expanded {
                self.forest.collapse_descendants(id);
            } else {
                self.forest.expand_subtree(id);
            }
            self.refresh();
        }
    }

    /// Flip the selected node's own expansion.
    pub fn toggle(&mut self) {
        if let Some(id) = self.toggleable_selection() {
            let expanded = self.forest.node(id).expanded;
            self.forest.set_expanded(id, !expanded);
            self.refresh();
        }
    }

    /// Collapse the selected node, or move to its parent if it is already
    /// collapsed or cannot be collapsed.
    pub fn collapse_or_parent(&mut self) {
        self.horizontal_offset = 0;
        let Some(id) = self.selected() else {
            return;
        };
        let node = self.forest.node(id);
        if node.can_toggle() && node.expanded {
            self.forest.set_expanded(id, false);
            self.refresh();
        } else if let Some(parent) = node.parent() {
            if let Some(row) = self.visible.iter().position(|&v| v == parent) {
                self.select_index(row);
            }
        }
    }

    pub fn expand_all(&mut self) {
        self.forest.expand_all();
        self.refresh();
    }

    /// Collapse everything below the roots. The cursor lands on the nearest
    /// ancestor that is still visible.
    pub fn collapse_all(&mut self) {
        self.forest.collapse_all();
        self.refresh();
    }

    // Viewport

    /// Update the window size, keeping the selected node selected.
    pub fn resize(&mut self, window_height: usize, width: usize) {
        self.window_height = window_height.max(1);
        self.width = width;
        self.scroll_to_cursor();
    }

    pub fn scroll_right(&mut self, columns: usize) {
        self.horizontal_offset = self
            .horizontal_offset
            .saturating_add(columns)
            .min(MAX_HORIZONTAL_OFFSET);
    }

    pub fn scroll_left(&mut self, columns: usize) {
        self.horizontal_offset = self.horizontal_offset.saturating_sub(columns);
    }

    /// Recompute the visible rows after an expansion change and keep the
    /// cursor on the same node, or on its closest visible ancestor.
    fn refresh(&mut self) {
        let selected = self.selected();
        self.visible = self.forest.visible();
        if let Some(id) = selected {
            let target = std::iter::once(id)
                .chain(self.forest.ancestors(id))
                .find_map(|candidate| self.visible.iter().position(|&v| v == candidate));
            if let Some(row) = target {
                self.cursor = row;
            }
        }
        self.select_index(self.cursor);
    }

    fn scroll_to_cursor(&mut self) {
        if self.cursor < self.window_top {
            self.window_top = self.cursor;
        } else if self.cursor >= self.window_top + self.window_height {
            self.window_top = self.cursor + 1 - self.window_height;
        }
        let max_top = self.visible.len().saturating_sub(self.window_height);
        self.window_top = self.window_top.min(max_top);
    }

    // Search

    pub fn start_search(&mut self) {
        self.mode = Mode::SearchInput;
        self.search_query.clear();
        self.search_matches.clear();
        self.search_index = 0;
    }

    pub fn push_search_char(&mut self, c: char) {
        if self.mode == Mode::SearchInput {
            self.search_query.push(c);
        }
    }

    pub fn pop_search_char(&mut self) {
        if self.mode == Mode::SearchInput {
            self.search_query.pop();
        }
    }

    /// Confirm the typed query. An empty query returns to normal mode;
    /// otherwise the whole forest is expanded and the cursor jumps to the
    /// first matching row.
    pub fn confirm_search(&mut self) {
        if self.search_query.is_empty() {
            self.mode = Mode::Normal;
            return;
        }
        self.forest.expand_all();
        self.refresh();
        self.search_matches = self
            .visible
            .iter()
            .enumerate()
            .filter(|(_, &id)| self.forest.node(id).text.contains(&self.search_query))
            .map(|(row, _)| row)
            .collect();
        self.search_index = 0;
        self.mode = Mode::SearchActive;
        tracing::debug!(query = %self.search_query, matches = self.search_matches.len(), "search");
        if let Some(&row) = self.search_matches.first() {
            self.select_index(row);
        }
    }

    /// Leave either search mode and forget the query.
    pub fn cancel_search(&mut self) {
        self.mode = Mode::Normal;
        self.search_query.clear();
        self.search_matches.clear();
        self.search_index = 0;
    }

    pub fn next_match(&mut self) {
        if !self.search_matches.is_empty() {
            self.search_index = (self.search_index + 1) % self.search_matches.len();
            self.select_index(self.search_matches[self.search_index]);
        }
    }

    pub fn prev_match(&mut self) {
        if !self.search_matches.is_empty() {
            let len = self.search_matches.len();
            self.search_index = (self.search_index + len - 1) % len;
            self.select_index(self.search_matches[self.search_index]);
        }
    }
}
