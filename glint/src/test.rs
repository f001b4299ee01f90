//! Mock implementations of the host and provider contracts.
//!
//! Enables fast, deterministic tests without a real editor host: programmable
//! minings and providers, an in-memory annotation overlay, and a recording
//! painter. Available to downstream crates through the `test-support`
//! feature.

mod mock_provider;

pub use mock_host::{MockHost, MockViewer, RecordingPainter};
pub use mock_mining::MockMining;
pub use mock_provider::{MockProvider, ProviderResponse};
