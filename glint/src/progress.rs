//! Cooperative cancellation for collection-and-render cycles.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Cancelable flag scoped to one collection-and-render cycle.
///
/// The manager issues a fresh token per [`run`](crate::CodeMiningManager::run)
/// and cancels the previous one. Cancellation is advisory: in-flight provider
/// futures are not forcibly killed, but every continuation must check the
/// token before mutating shared state. Cloning shares the underlying flag.
#[derive(Debug, Clone, Default)]
pub struct ProgressToken {
    canceled: Arc<AtomicBool>,
}

impl ProgressToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark this cycle as superseded. Never fails, safe to call repeatedly.
    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::SeqCst);
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_live() {
        let token = ProgressToken::new();
        assert!(!token.is_canceled());
    }

    #[test]
    fn cancellation_is_shared_across_clones() {
        let token = ProgressToken::new();
        let clone = token.clone();
        token.cancel();
        assert!(clone.is_canceled());
    }

    #[test]
    fn cancel_is_idempotent() {
        let token = ProgressToken::new();
        token.cancel();
        token.cancel();
        assert!(token.is_canceled());
    }
}
