//! Mining and provider contracts.
//!
//! A mining is an opaque unit of computed information anchored to a document
//! position. Providers produce minings for the current viewport; minings
//! resolve their renderable label asynchronously and may never resolve if the
//! owning cycle is canceled.
//!
//! Both traits enable dependency injection: production hosts wire real
//! providers, tests use the mocks in [`crate::test`].

use crate::{host::TextViewer, position::Position, progress::ProgressToken};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Error produced while resolving a mining's content.
#[derive(Debug, Error)]
pub enum MiningError {
    /// The provider failed to compute the mining's label. The mining
    /// transitions to [`MiningState::Errored`] and is rendered from its
    /// last-good cached label, if any.
    #[error("mining resolution failed: {0}")]
    Resolution(String),

    /// The viewer went away mid-resolution. Expected during editor close.
    #[error("text viewer is disposed")]
    ViewerDisposed,
}

/// Resolution state of a mining.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiningState {
    /// Created but not yet resolved; carries no label.
    Unresolved,
    /// Resolved successfully; [`CodeMining::label`] is non-empty.
    Resolved,
    /// Resolution completed with an error; no label of its own.
    Errored,
}

/// Optional click callback attached to a resolved mining.
pub type MiningAction = Arc<dyn Fn() + Send + Sync>;

/// A computed, position-anchored piece of information displayed inline with
/// source text.
///
/// Minings are shared between the producing provider, the grouping pass, and
/// the owning annotation; interior mutability is the implementor's concern
/// ([`resolve`](Self::resolve) takes `&self`). The disposal hook is called
/// exactly once, by whichever owner removes the mining from its live list.
#[async_trait]
pub trait CodeMining: Send + Sync {
    /// Document position this mining is anchored to.
    fn position(&self) -> Position;

    fn state(&self) -> MiningState;

    /// Renderable label. `None` until the first successful resolution.
    fn label(&self) -> Option<String>;

    /// Compute the label. Implementations must check `token` before applying
    /// results; a canceled resolution may leave the mining unresolved forever.
    async fn resolve(
        &self,
        viewer: &dyn TextViewer,
        token: &ProgressToken,
    ) -> Result<(), MiningError>;

    /// Disposal hook, called once when the mining leaves its owner's live
    /// list (superseded generation or deleted annotation).
    fn dispose(&self) {}

    /// Click callback, if this mining is actionable.
    fn action(&self) -> Option<MiningAction> {
        None
    }
}

/// External collaborator producing minings for a given viewport on request.
#[async_trait]
pub trait CodeMiningProvider: Send + Sync {
    /// Provider name, used in log output only.
    fn name(&self) -> &str {
        "unnamed"
    }

    /// Collect minings for the viewport.
    ///
    /// Returns `Ok(None)` to opt out of this cycle (distinct from
    /// `Ok(Some(vec![]))`, which explicitly contributes nothing). An `Err` is
    /// filtered by the manager; the cycle continues with remaining providers.
    async fn provide_minings(
        &self,
        viewer: &dyn TextViewer,
        token: &ProgressToken,
    ) -> anyhow::Result<Option<Vec<Arc<dyn CodeMining>>>>;
}
