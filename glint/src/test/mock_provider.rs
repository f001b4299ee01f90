//! Programmable mining provider for tests.

use crate::{
    host::TextViewer,
    mining::{CodeMining, CodeMiningProvider},
    progress::ProgressToken,
};
use anyhow::anyhow;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

/// One scripted answer to a collection request.
pub enum ProviderResponse {
    /// Contribute these minings.
    Minings(Vec<Arc<dyn CodeMining>>),
    /// Park on the channel until the test releases it, then contribute.
    /// Lets tests interleave two cycles to exercise cancellation races.
    GatedMinings(async_channel::Receiver<()>, Vec<Arc<dyn CodeMining>>),
    /// Opt out of this cycle (`Ok(None)`).
    OptOut,
    /// Fail collection with the given message.
    Fail(String),
}

/// A [`CodeMiningProvider`] answering from a scripted response queue.
///
/// Responses are consumed front to back; once the queue is empty the provider
/// opts out. Every collection call records the token it was handed, so tests
/// can assert a superseded cycle's token was canceled.
pub struct MockProvider {
    name: String,
    responses: Mutex<VecDeque<ProviderResponse>>,
    received_tokens: Mutex<Vec<ProgressToken>>,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            responses: Mutex::new(VecDeque::new()),
            received_tokens: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Provider answering `minings` to its first request.
    pub fn with_minings(name: &str, minings: Vec<Arc<dyn CodeMining>>) -> Self {
        let provider = Self::new(name);
        provider.push_response(ProviderResponse::Minings(minings));
        provider
    }

    pub fn push_response(&self, response: ProviderResponse) {
        self.responses.lock().push_back(response);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Tokens received so far, in request order.
    pub fn received_tokens(&self) -> Vec<ProgressToken> {
        self.received_tokens.lock().clone()
    }
}

#[async_trait]
impl CodeMiningProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn provide_minings(
        &self,
        _viewer: &dyn TextViewer,
        token: &ProgressToken,
    ) -> anyhow::Result<Option<Vec<Arc<dyn CodeMining>>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received_tokens.lock().push(token.clone());

        let response = self.responses.lock().pop_front();
        match response {
            Some(ProviderResponse::Minings(minings)) => Ok(Some(minings)),
            Some(ProviderResponse::GatedMinings(gate, minings)) => {
                // Park here until the test opens the gate.
                let _ = gate.recv().await;
                Ok(Some(minings))
            }
            Some(ProviderResponse::OptOut) | None => Ok(None),
            Some(ProviderResponse::Fail(message)) => Err(anyhow!(message)),
        }
    }
}
