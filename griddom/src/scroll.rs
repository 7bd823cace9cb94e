use std::collections::HashMap;

/// Scroll offset for a scroll container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollOffset {
    pub x: u32,
    pub y: u32,
}

impl ScrollOffset {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Horizontal geometry of a scroll container, named after the DOM properties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollMetrics {
    pub scroll_left: u32,
    pub scroll_width: u32,
    pub client_width: u32,
}

impl ScrollMetrics {
    /// Distance left to scroll before the right edge is reached.
    pub fn remaining_right(&self) -> u32 {
        self.max_scroll_left().saturating_sub(self.scroll_left)
    }

    pub fn max_scroll_left(&self) -> u32 {
        self.scroll_width.saturating_sub(self.client_width)
    }
}

/// Tracks scroll offsets, viewport and content sizes per scroll container.
/// User-managed state that persists across layout passes.
#[derive(Debug, Default)]
pub struct ScrollState {
    offsets: HashMap<String, ScrollOffset>,
    /// Viewport sizes (container id -> (width, height))
    viewports: HashMap<String, (u32, u32)>,
    /// Content sizes computed during layout (container id -> (width, height))
    content_sizes: HashMap<String, (u32, u32)>,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the scroll offset for a container.
    pub fn get(&self, id: &str) -> ScrollOffset {
        self.offsets.get(id).copied().unwrap_or_default()
    }

    /// Set the scroll offset for a container, clamped to the scrollable range.
    pub fn set(&mut self, id: &str, x: u32, y: u32) {
        let (max_x, max_y) = self.max_offset(id);
        self.offsets
            .insert(id.to_string(), ScrollOffset::new(x.min(max_x), y.min(max_y)));
    }

    /// Scroll a container by a delta amount.
    /// Returns true if the scroll offset changed.
    pub fn scroll_by(&mut self, id: &str, dx: i32, dy: i32) -> bool {
        let current = self.get(id);
        let (max_x, max_y) = self.max_offset(id);
        let new_x = (current.x as i64 + dx as i64).clamp(0, max_x as i64) as u32;
        let new_y = (current.y as i64 + dy as i64).clamp(0, max_y as i64) as u32;

        if new_x != current.x || new_y != current.y {
            self.offsets
                .insert(id.to_string(), ScrollOffset::new(new_x, new_y));
            true
        } else {
            false
        }
    }

    pub fn set_viewport(&mut self, id: &str, width: u32, height: u32) {
        self.viewports.insert(id.to_string(), (width, height));
        self.clamp(id);
    }

    /// Record content size after layout and clamp the offset to it.
    pub fn set_content_size(&mut self, id: &str, width: u32, height: u32) {
        self.content_sizes.insert(id.to_string(), (width, height));
        self.clamp(id);
    }

    pub fn viewport(&self, id: &str) -> Option<(u32, u32)> {
        self.viewports.get(id).copied()
    }

    pub fn content_size(&self, id: &str) -> Option<(u32, u32)> {
        self.content_sizes.get(id).copied()
    }

    pub fn metrics(&self, id: &str) -> ScrollMetrics {
        let (client_width, _) = self.viewport(id).unwrap_or_default();
        let (content_width, _) = self.content_size(id).unwrap_or_default();
        ScrollMetrics {
            scroll_left: self.get(id).x,
            scroll_width: content_width.max(client_width),
            client_width,
        }
    }

    /// Copy the horizontal offset of `source` onto every target.
    /// Returns the ids whose offset changed.
    pub fn sync_x(&mut self, source: &str, targets: &[&str]) -> Vec<String> {
        let x = self.get(source).x;
        let mut changed = Vec::new();
        for target in targets.iter().filter(|t| **t != source) {
            let current = self.get(target);
            if current.x != x {
                self.offsets
                    .insert(target.to_string(), ScrollOffset::new(x, current.y));
                changed.push(target.to_string());
            }
        }
        changed
    }

    fn max_offset(&self, id: &str) -> (u32, u32) {
        match (self.viewport(id), self.content_size(id)) {
            (Some((vw, vh)), Some((cw, ch))) => (cw.saturating_sub(vw), ch.saturating_sub(vh)),
            // Nothing measured yet, nothing to clamp against
            _ => (u32::MAX, u32::MAX),
        }
    }

    fn clamp(&mut self, id: &str) {
        let (max_x, max_y) = self.max_offset(id);
        if let Some(offset) = self.offsets.get_mut(id) {
            offset.x = offset.x.min(max_x);
            offset.y = offset.y.min(max_y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_by_clamps_to_content() {
        let mut state = ScrollState::new();
        state.set_viewport("body", 100, 50);
        state.set_content_size("body", 300, 50);

        assert!(state.scroll_by("body", 150, 0));
        assert!(state.scroll_by("body", 150, 0));
        assert_eq!(state.get("body").x, 200);
        assert!(!state.scroll_by("body", 10, 0));
        assert!(state.scroll_by("body", -500, 0));
        assert_eq!(state.get("body").x, 0);
    }

    #[test]
    fn test_shrinking_content_clamps_offset() {
        let mut state = ScrollState::new();
        state.set_viewport("body", 100, 50);
        state.set_content_size("body", 300, 50);
        state.set("body", 200, 0);
        state.set_content_size("body", 150, 50);
        assert_eq!(state.get("body").x, 50);
    }

    #[test]
    fn test_metrics_remaining_right() {
        let mut state = ScrollState::new();
        state.set_viewport("body", 100, 50);
        state.set_content_size("body", 300, 50);
        state.set("body", 150, 0);
        let metrics = state.metrics("body");
        assert_eq!(metrics.scroll_width, 300);
        assert_eq!(metrics.remaining_right(), 50);
    }

    #[test]
    fn test_sync_x_copies_offset() {
        let mut state = ScrollState::new();
        state.set("body", 40, 7);
        let changed = state.sync_x("body", &["header", "body", "footer"]);
        assert_eq!(changed, vec!["header".to_string(), "footer".to_string()]);
        assert_eq!(state.get("header").x, 40);
        assert_eq!(state.get("body").y, 7);
    }
}
