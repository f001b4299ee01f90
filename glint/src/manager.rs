//! Orchestration of collection-resolve-render cycles.

use crate::{
    annotation::{CodeMiningAnnotation, SharedAnnotation},
    grouping::{group_by_position, MiningGroup},
    host::{AnnotationHost, TextViewer},
    mining::{CodeMining, CodeMiningProvider},
    progress::ProgressToken,
    settings::CodeMiningSettings,
    viewport::ViewportTracker,
};
use futures::future::join_all;
use parking_lot::Mutex;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tracing::{debug, trace, warn};

/// Drives one collection-resolve-render cycle at a time and supersedes any
/// prior in-flight cycle.
///
/// The manager exclusively owns the active [`ProgressToken`] and the provider
/// list; the host overlay owns annotation visibility. All annotation mutation
/// happens on the host's owning thread: the async boundaries are provider
/// collection and mining resolution only, and cancellation is cooperative --
/// the token is checked immediately before every mutation of shared state.
pub struct CodeMiningManager {
    viewer: Arc<dyn TextViewer>,
    host: Arc<dyn AnnotationHost>,
    settings: CodeMiningSettings,
    providers: Mutex<Vec<Arc<dyn CodeMiningProvider>>>,
    tracker: Mutex<ViewportTracker>,
    token: Mutex<Option<ProgressToken>>,
    /// Copy of the set last handed to the overlay, kept for action routing.
    current_annotations: Mutex<Vec<SharedAnnotation>>,
    uninstalled: AtomicBool,
}

impl CodeMiningManager {
    /// Providers are resolved at composition time and passed in here; their
    /// index in `providers` is the rank used to order minings within a group.
    pub fn new(
        viewer: Arc<dyn TextViewer>,
        host: Arc<dyn AnnotationHost>,
        providers: Vec<Arc<dyn CodeMiningProvider>>,
        settings: CodeMiningSettings,
    ) -> Self {
        Self {
            viewer,
            host,
            settings,
            providers: Mutex::new(providers),
            tracker: Mutex::new(ViewportTracker::new()),
            token: Mutex::new(None),
            current_annotations: Mutex::new(Vec::new()),
            uninstalled: AtomicBool::new(false),
        }
    }

    pub fn settings(&self) -> &CodeMiningSettings {
        &self.settings
    }

    /// Start a new collection-resolve-render cycle.
    ///
    /// Cancels the previous cycle's token first; cancellation is advisory, so
    /// an in-flight cycle keeps running but refuses to mutate annotations
    /// once it observes the canceled flag. No-op when uninstalled, when no
    /// providers are registered, or when the host is unavailable. Never
    /// returns an error: a wholly-failed cycle renders nothing this cycle.
    pub async fn run(&self) {
        if self.uninstalled.load(Ordering::SeqCst) {
            return;
        }
        if !self.settings.enabled {
            // Toggling minings off also clears any pending cycle.
            self.cancel_in_flight();
            return;
        }
        let providers = self.providers.lock().clone();
        if providers.is_empty() || !self.host.is_available() || self.viewer.is_disposed() {
            return;
        }

        let token = {
            let mut slot = self.token.lock();
            if let Some(previous) = slot.take() {
                previous.cancel();
            }
            let token = ProgressToken::new();
            *slot = Some(token.clone());
            token
        };

        trace!(providers = providers.len(), "starting code mining cycle");
        self.update_code_minings(providers, token).await;
    }

    /// Replace the provider list. Does not cancel or restart an in-flight
    /// cycle; call [`run`](Self::run) for an immediate refresh.
    pub fn set_providers(&self, providers: Vec<Arc<dyn CodeMiningProvider>>) {
        *self.providers.lock() = providers;
    }

    /// Cancel the active cycle and detach the viewport listener. Idempotent.
    pub fn uninstall(&self) {
        self.uninstalled.store(true, Ordering::SeqCst);
        self.cancel_in_flight();
        self.tracker.lock().clear();
    }

    /// Recompute the tracked visible range from the viewer.
    pub fn refresh_viewport(&self) {
        self.tracker.lock().refresh(self.viewer.as_ref());
    }

    /// Consume the viewer's scroll notifications, refreshing the visible
    /// range per event. The host spawns this once on its executor; it ends
    /// when the viewer closes its event channel or the manager is
    /// uninstalled. Performs the deferred first computation of the visible
    /// range, so the viewer is not queried before layout exists.
    pub async fn watch_viewport(&self) {
        let events = self.viewer.viewport_events();
        self.refresh_viewport();
        while let Ok(event) = events.recv().await {
            if self.uninstalled.load(Ordering::SeqCst) {
                break;
            }
            trace!(?event, "viewport changed");
            self.refresh_viewport();
        }
    }

    /// The mining whose anchored range contains `offset`, for routing click
    /// events to mining actions. Only actionable minings are returned.
    pub fn mining_at(&self, offset: usize) -> Option<Arc<dyn CodeMining>> {
        let current = self.current_annotations.lock();
        for annotation in current.iter() {
            let guard = annotation.lock();
            if !guard.position().contains(offset) {
                continue;
            }
            return guard
                .minings()
                .iter()
                .find(|mining| mining.action().is_some())
                .cloned();
        }
        None
    }

    fn cancel_in_flight(&self) {
        if let Some(token) = self.token.lock().take() {
            token.cancel();
        }
    }

    /// Fan out to every provider, flatten the results, group, render.
    ///
    /// A provider that fails or opts out is filtered, not fatal; the cycle
    /// continues with the remaining providers' minings.
    async fn update_code_minings(
        &self,
        providers: Vec<Arc<dyn CodeMiningProvider>>,
        token: ProgressToken,
    ) {
        let collections = providers.iter().enumerate().map(|(rank, provider)| {
            let token = token.clone();
            let viewer = Arc::clone(&self.viewer);
            async move {
                match provider.provide_minings(viewer.as_ref(), &token).await {
                    Ok(Some(minings)) => Some((rank, minings)),
                    Ok(None) => {
                        trace!(provider = provider.name(), "provider opted out this cycle");
                        None
                    }
                    Err(error) => {
                        warn!(provider = provider.name(), %error, "mining collection failed");
                        None
                    }
                }
            }
        });

        let ranked: Vec<(usize, Arc<dyn CodeMining>)> = join_all(collections)
            .await
            .into_iter()
            .flatten()
            .flat_map(|(rank, minings)| minings.into_iter().map(move |mining| (rank, mining)))
            .collect();

        let groups = group_by_position(ranked);
        self.render_code_minings(groups, &token).await;
    }

    /// Reconcile one cycle's groups against the host's existing annotations.
    ///
    /// Aborts silently when the document or viewer vanished mid-flight
    /// (expected race during editor close) or when the token was superseded.
    /// The token is re-checked at each group and immediately before the
    /// overlay handover, so a late-arriving stale cycle never mutates
    /// annotation state.
    async fn render_code_minings(&self, groups: Vec<MiningGroup>, token: &ProgressToken) {
        if !self.host.is_available() || self.viewer.is_disposed() {
            debug!("document or viewer went away mid-cycle; dropping results");
            return;
        }
        if token.is_canceled() {
            debug!("cycle superseded before render; dropping results");
            return;
        }

        let mut current: Vec<SharedAnnotation> = Vec::with_capacity(groups.len());
        let mut flagged_for_redraw: Vec<SharedAnnotation> = Vec::new();

        for group in groups {
            if token.is_canceled() {
                debug!("cycle superseded during render; dropping remaining groups");
                return;
            }

            let annotation = match self.host.find_annotation_at(group.position) {
                Some(existing) => {
                    // Content may have changed even though the position did
                    // not; visible annotations get a forced redraw.
                    if self.tracker.lock().is_in_visible_lines(group.position) {
                        flagged_for_redraw.push(Arc::clone(&existing));
                    }
                    existing
                }
                None => CodeMiningAnnotation::new(group.position, token.clone()).into_shared(),
            };

            annotation.lock().update(group.minings, token.clone());
            current.push(annotation);
        }

        if token.is_canceled() {
            debug!("cycle superseded before overlay handover; dropping results");
            return;
        }

        *self.current_annotations.lock() = current.clone();
        // Replace-all: annotations absent from `current` are removed by the host.
        self.host.reconcile(current);

        for annotation in flagged_for_redraw {
            CodeMiningAnnotation::redraw(&annotation, &self.viewer, &self.host).await;
        }
    }
}
