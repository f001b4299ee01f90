//! Glint: asynchronous code-mining annotations for text editors.
//!
//! Providers compute position-anchored minings for the visible viewport;
//! the [`CodeMiningManager`] groups them by position, reconciles them against
//! the host's annotation overlay, and drives resolve-then-redraw chains with
//! cooperative per-cycle cancellation. The hosting editor (viewer, overlay,
//! painter, executor) is injected through the traits in [`host`].

pub mod annotation;
pub mod grouping;
pub mod host;
pub mod manager;
pub mod mining;
pub mod position;
pub mod progress;
pub mod settings;
pub mod viewport;

#[cfg(any(test, feature = "test-support"))]
pub mod test;

pub use annotation::{AnnotationState, CodeMiningAnnotation, SharedAnnotation};
pub use grouping::{group_by_position, GroupMinings, MiningGroup};
pub use host::{AnnotationHost, MiningPainter, TextViewer, ViewportEvent};
pub use manager::CodeMiningManager;
pub use mining::{CodeMining, CodeMiningProvider, MiningAction, MiningError, MiningState};
pub use position::Position;
pub use progress::ProgressToken;
pub use settings::CodeMiningSettings;
pub use viewport::{ViewportTracker, VisibleRange};
