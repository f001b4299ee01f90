//! Visible-range tracking for the host viewport.

use crate::{host::TextViewer, position::Position};

/// Inclusive document-offset range covered by the visible lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRange {
    /// Offset of the first character of the first (possibly partially)
    /// visible line.
    pub start_offset: usize,
    /// Offset of the end of the last (possibly partially) visible line.
    pub end_offset: usize,
}

/// Tracks the visible document-offset range, recomputed on every
/// scroll/viewport-change notification.
///
/// The range starts absent: the first computation is deferred until the
/// manager's viewport watch loop runs, so the viewer is never queried before
/// layout exists. While the range is absent (or the viewer is disposed),
/// visibility checks are conservatively `false`.
#[derive(Debug, Default)]
pub struct ViewportTracker {
    range: Option<VisibleRange>,
}

impl ViewportTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the visible range from the viewer's line-index APIs.
    ///
    /// O(1) relative to line count. Any unavailable query (disposed viewer,
    /// no layout yet) clears the range.
    pub fn refresh(&mut self, viewer: &dyn TextViewer) {
        self.range = Self::compute(viewer);
    }

    /// Drop the tracked range; used on uninstall.
    pub fn clear(&mut self) {
        self.range = None;
    }

    pub fn visible_range(&self) -> Option<VisibleRange> {
        self.range
    }

    /// Whether `position` starts within the visible lines.
    ///
    /// Both boundaries are inclusive: an annotation anchored exactly at the
    /// start of the first visible line or at the end of the last one counts
    /// as visible.
    pub fn is_in_visible_lines(&self, position: Position) -> bool {
        match self.range {
            Some(range) => {
                range.start_offset <= position.offset && position.offset <= range.end_offset
            }
            None => false,
        }
    }

    fn compute(viewer: &dyn TextViewer) -> Option<VisibleRange> {
        if viewer.is_disposed() {
            return None;
        }
        let (first, last) = viewer.visible_line_range()?;
        let start_offset = viewer.line_start_offset(first)?;
        let end_offset = viewer.line_end_offset(last)?;
        Some(VisibleRange {
            start_offset,
            end_offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::MockViewer;

    #[test]
    fn no_range_before_first_refresh() {
        let tracker = ViewportTracker::new();
        assert!(tracker.visible_range().is_none());
        assert!(!tracker.is_in_visible_lines(Position::new(0, 0)));
    }

    #[test]
    fn refresh_computes_offsets_from_visible_lines() {
        let viewer = MockViewer::with_lines(&["fn main() {", "    body();", "}"]);
        viewer.set_visible_lines(0, 2);

        let mut tracker = ViewportTracker::new();
        tracker.refresh(&viewer);

        let range = tracker.visible_range().expect("range after refresh");
        assert_eq!(range.start_offset, 0);
        // "fn main() {\n    body();\n}" -- end of line 2 is the full text length.
        assert_eq!(range.end_offset, 25);
    }

    #[test]
    fn boundaries_are_inclusive_inclusive() {
        let viewer = MockViewer::with_lines(&["aaaa", "bbbb", "cccc", "dddd"]);
        viewer.set_visible_lines(1, 2);

        let mut tracker = ViewportTracker::new();
        tracker.refresh(&viewer);

        let range = tracker.visible_range().expect("range after refresh");
        assert!(tracker.is_in_visible_lines(Position::new(range.start_offset, 0)));
        assert!(tracker.is_in_visible_lines(Position::new(range.end_offset, 0)));
        assert!(!tracker.is_in_visible_lines(Position::new(range.start_offset - 1, 0)));
        assert!(!tracker.is_in_visible_lines(Position::new(range.end_offset + 1, 0)));
    }

    #[test]
    fn disposed_viewer_clears_range() {
        let viewer = MockViewer::with_lines(&["aaaa"]);
        viewer.set_visible_lines(0, 0);

        let mut tracker = ViewportTracker::new();
        tracker.refresh(&viewer);
        assert!(tracker.visible_range().is_some());

        viewer.dispose();
        tracker.refresh(&viewer);
        assert!(tracker.visible_range().is_none());
        assert!(!tracker.is_in_visible_lines(Position::new(0, 0)));
    }
}
