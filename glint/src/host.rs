//! Injected host contracts.
//!
//! Glint owns no widget tree, document model, or painting backend. The
//! hosting editor supplies them through these traits, wired once at
//! composition time (no registry lookup). Production hosts adapt their text
//! viewer and annotation overlay; tests use the mocks in [`crate::test`].

use crate::{annotation::SharedAnnotation, position::Position};
use async_channel::Receiver;

/// Viewport-change notification emitted by the host viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportEvent {
    Scrolled,
    Resized,
}

/// Read-only view of the host's text viewer.
///
/// All line queries return `None` when the viewer is disposed or has not
/// laid out yet; callers treat that as "nothing visible".
pub trait TextViewer: Send + Sync {
    fn is_disposed(&self) -> bool;

    /// Inclusive `(first, last)` range of (possibly partially) visible lines.
    fn visible_line_range(&self) -> Option<(u32, u32)>;

    /// Document offset of the first character of `line`.
    fn line_start_offset(&self, line: u32) -> Option<usize>;

    /// Document offset of the end of `line` (past its last character,
    /// excluding the line delimiter).
    fn line_end_offset(&self, line: u32) -> Option<usize>;

    /// Subscribe to scroll/resize notifications. The channel closes when the
    /// viewer is disposed, which ends the manager's viewport watch loop.
    fn viewport_events(&self) -> Receiver<ViewportEvent>;
}

/// The host's annotation overlay.
///
/// The overlay owns annotation visibility: [`reconcile`](Self::reconcile) has
/// replace-all semantics, so annotations absent from the handed-over set are
/// removed (and deleted) by the host.
pub trait AnnotationHost: Send + Sync {
    /// Whether the backing document and viewer still exist. Checked at render
    /// time; a `false` mid-cycle is an expected race during editor close.
    fn is_available(&self) -> bool;

    /// Look up a live annotation anchored at exactly `position`.
    fn find_annotation_at(&self, position: Position) -> Option<SharedAnnotation>;

    /// Replace the overlay's annotation set with `current`.
    fn reconcile(&self, current: Vec<SharedAnnotation>);

    /// Escalation point of a finished redraw chain: every mining of the
    /// annotation at `position` is resolved and the host should repaint it.
    fn request_redraw(&self, position: Position);
}

/// Draw target handed to [`CodeMiningAnnotation::draw`](crate::CodeMiningAnnotation::draw).
///
/// The host decides how labels and separators are actually painted; the
/// annotation only dictates order and which entries contribute.
pub trait MiningPainter {
    fn draw_label(&mut self, label: &str);

    /// Painted between two contributed labels, never before the first.
    fn draw_separator(&mut self);
}
