//! Annotation lifecycle: a stateful, redrawable group of minings at one
//! document position.
//!
//! An annotation owns the "current generation" of minings at its position
//! plus a parallel resolved cache holding the last successfully resolved
//! label per slot. The cache survives refresh cycles so a flickering provider
//! doesn't blank content that was already on screen.

use crate::{
    grouping::GroupMinings,
    host::{AnnotationHost, MiningPainter, TextViewer},
    mining::{CodeMining, MiningState},
    position::Position,
    progress::ProgressToken,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Annotations are shared between the manager, the host overlay, and redraw
/// chains; locks are never held across an await point.
pub type SharedAnnotation = Arc<Mutex<CodeMiningAnnotation>>;

/// Observable lifecycle state, derived from the current generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationState {
    /// No minings held (freshly created, not yet updated).
    Empty,
    /// All current minings are still unresolved.
    Pending,
    /// Some, but not all, current minings have finished resolving.
    PartiallyResolved,
    /// Every current mining is resolved (successfully or with an error).
    Resolved,
    /// Terminal: removed from the overlay, minings disposed.
    Deleted,
}

pub struct CodeMiningAnnotation {
    position: Position,
    /// Current generation, ordered per the grouping pass.
    minings: GroupMinings,
    /// Last successfully resolved label per slot of the current generation.
    /// Invariant: `resolved_cache.len() == minings.len()` after every update.
    resolved_cache: Vec<Option<String>>,
    token: ProgressToken,
    deleted: bool,
}

impl CodeMiningAnnotation {
    pub fn new(position: Position, token: ProgressToken) -> Self {
        Self {
            position,
            minings: GroupMinings::new(),
            resolved_cache: Vec::new(),
            token,
            deleted: false,
        }
    }

    pub fn into_shared(self) -> SharedAnnotation {
        Arc::new(Mutex::new(self))
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn token(&self) -> &ProgressToken {
        &self.token
    }

    pub fn minings(&self) -> &[Arc<dyn CodeMining>] {
        &self.minings
    }

    /// Last-good labels, indexed by slot in the current generation. A slot is
    /// `Some` only once its mining has resolved successfully at least once.
    pub fn resolved_cache(&self) -> &[Option<String>] {
        &self.resolved_cache
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn state(&self) -> AnnotationState {
        if self.deleted {
            return AnnotationState::Deleted;
        }
        if self.minings.is_empty() {
            return AnnotationState::Empty;
        }
        let unresolved = self
            .minings
            .iter()
            .filter(|m| m.state() == MiningState::Unresolved)
            .count();
        if unresolved == self.minings.len() {
            AnnotationState::Pending
        } else if unresolved == 0 {
            AnnotationState::Resolved
        } else {
            AnnotationState::PartiallyResolved
        }
    }

    /// Replace the current generation.
    ///
    /// When the generation size is unchanged, labels that already resolved in
    /// the old generation are copied forward into the cache at the same slot
    /// before the old minings are disposed. A size change reallocates the
    /// cache, clearing it: index alignment with prior generations is lost, so
    /// stale labels must not survive.
    ///
    /// No-op after [`mark_deleted`](Self::mark_deleted).
    pub fn update(&mut self, minings: GroupMinings, token: ProgressToken) {
        if self.deleted {
            return;
        }

        if minings.len() == self.resolved_cache.len() {
            for (slot, old) in self.resolved_cache.iter_mut().zip(&self.minings) {
                if let Some(label) = old.label() {
                    *slot = Some(label);
                }
            }
        } else {
            self.resolved_cache = vec![None; minings.len()];
        }

        let old = std::mem::replace(&mut self.minings, minings);
        for mining in old {
            mining.dispose();
        }
        self.token = token;
    }

    /// Render the current generation into `painter`.
    ///
    /// Resolved minings contribute their label (stored back into the cache);
    /// unresolved and errored minings fall back to the cached last-good label
    /// for their slot. Slots with no label at all are skipped entirely: they
    /// contribute no width and no separator. Separators go between
    /// consecutive contributed entries only.
    ///
    /// Returns `true` when at least one mining is still unresolved, in which
    /// case the caller should schedule a single
    /// [`redraw`](Self::redraw) chain (one per draw pass, regardless of how
    /// many minings are unresolved).
    pub fn draw(&mut self, painter: &mut dyn MiningPainter) -> bool {
        if self.deleted {
            return false;
        }

        let mut needs_resolution = false;
        let mut contributed = false;
        for (index, mining) in self.minings.iter().enumerate() {
            let label = match mining.label() {
                Some(label) => {
                    self.resolved_cache[index] = Some(label.clone());
                    Some(label)
                }
                None => {
                    if mining.state() == MiningState::Unresolved {
                        needs_resolution = true;
                    }
                    self.resolved_cache[index].clone()
                }
            };
            if let Some(label) = label {
                if contributed {
                    painter.draw_separator();
                }
                painter.draw_label(&label);
                contributed = true;
            }
        }
        needs_resolution
    }

    /// Resolve every unresolved mining of the current generation, then
    /// escalate to the host painter.
    ///
    /// Minings resolve one at a time, bounding concurrent resolution to one
    /// chain per annotation and preventing partial draws: the host redraw is
    /// requested only once no unresolved mining remains. The chain stops
    /// silently when the annotation's token is canceled or the annotation was
    /// deleted mid-flight. A resolution future that completes without moving
    /// its mining out of the unresolved state ends the chain; the manager
    /// holds no further obligation for that mining.
    pub async fn redraw(
        annotation: &SharedAnnotation,
        viewer: &Arc<dyn TextViewer>,
        host: &Arc<dyn AnnotationHost>,
    ) {
        let mut last_attempt: Option<Arc<dyn CodeMining>> = None;
        loop {
            let (next, token, position) = {
                let guard = annotation.lock();
                if guard.deleted || guard.token.is_canceled() {
                    return;
                }
                (guard.first_unresolved(), guard.token.clone(), guard.position)
            };

            let Some(mining) = next else {
                host.request_redraw(position);
                return;
            };

            if last_attempt
                .as_ref()
                .is_some_and(|prior| Arc::ptr_eq(prior, &mining))
            {
                tracing::warn!(
                    offset = position.offset,
                    "mining resolution completed without a result"
                );
                return;
            }

            if let Err(error) = mining.resolve(viewer.as_ref(), &token).await {
                tracing::warn!(%error, offset = position.offset, "mining resolution failed");
            }
            if token.is_canceled() {
                return;
            }
            last_attempt = Some(mining);
        }
    }

    /// Dispose all current minings, clear the cache, and transition to the
    /// terminal deleted state. Further `update` calls are no-ops.
    pub fn mark_deleted(&mut self) {
        if self.deleted {
            return;
        }
        self.deleted = true;
        let old = std::mem::take(&mut self.minings);
        for mining in old {
            mining.dispose();
        }
        self.resolved_cache = Vec::new();
    }

    /// Vertical space this annotation takes when rendered as a line header.
    ///
    /// Zero until at least one cached label is non-empty: collapsed
    /// annotations take no space while their minings are still resolving, so
    /// layout doesn't jitter.
    pub fn effective_height(&self, line_height: u32) -> u32 {
        let has_content = self
            .resolved_cache
            .iter()
            .any(|slot| slot.as_deref().is_some_and(|label| !label.is_empty()));
        if has_content {
            line_height
        } else {
            0
        }
    }

    fn first_unresolved(&self) -> Option<Arc<dyn CodeMining>> {
        self.minings
            .iter()
            .find(|m| m.state() == MiningState::Unresolved)
            .cloned()
    }
}
