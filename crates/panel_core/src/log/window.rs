//! Bounded, scrollable log window.

use super::LogItem;
use std::collections::VecDeque;

/// Scroll container for log items.
///
/// The window shows `viewport` rows starting at `scroll_top`. A reader who
/// sits at the bottom follows new items; a reader who scrolled up keeps
/// looking at the same items while new ones arrive below.
#[derive(Debug, Clone)]
pub struct LogWindow {
    items: VecDeque<LogItem>,
    capacity: usize,
    viewport: usize,
    scroll_top: usize,
}

impl LogWindow {
    /// Creates an empty window holding at most `capacity` items.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::new(),
            capacity: capacity.max(1),
            viewport: 0,
            scroll_top: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = &LogItem> {
        self.items.iter()
    }

    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    fn max_scroll(&self) -> usize {
        self.items.len().saturating_sub(self.viewport)
    }

    /// Whether the newest item is inside the viewport.
    pub fn is_at_bottom(&self) -> bool {
        self.scroll_top >= self.max_scroll()
    }

    /// Appends an item, following it only when already at the bottom.
    pub fn append(&mut self, item: impl Into<LogItem>) {
        let follow = self.is_at_bottom();
        self.items.push_back(item.into());

        if self.items.len() > self.capacity {
            self.items.pop_front();
            self.scroll_top = self.scroll_top.saturating_sub(1);
        }

        if follow {
            self.scroll_to_bottom();
        }
    }

    /// Items currently inside the viewport.
    pub fn visible(&self) -> impl Iterator<Item = &LogItem> {
        self.items.iter().skip(self.scroll_top).take(self.viewport)
    }

    /// Changes the number of visible rows, keeping the bottom pinned if it was.
    pub fn set_viewport(&mut self, rows: usize) {
        let follow = self.is_at_bottom();
        self.viewport = rows;
        if follow {
            self.scroll_to_bottom();
        } else {
            self.scroll_top = self.scroll_top.min(self.max_scroll());
        }
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.scroll_top = self.scroll_top.saturating_sub(rows);
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.scroll_top = (self.scroll_top + rows).min(self.max_scroll());
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_top = self.max_scroll();
    }
}
