use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use foldiff_diff::DiffProvider;
use foldiff_regions::{from_diffs, transfer_state, UnchangedRegion};
use foldiff_text::TextModel;
use foldiff_types::{DiffOptions, DocumentDiff};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::state::{SessionState, Transaction};

/// Live comparison between an original and a modified document.
///
/// The session owns the published [`SessionState`]. Every input change
/// (either document's version, the diff options, or the provider's own
/// option signal) calls [`recompute`](Self::recompute), which:
///
/// 1. marks the state outdated immediately;
/// 2. cancels the previous recomputation, if any, and opens a new
///    cancellation scope;
/// 3. waits out the debounce interval;
/// 4. calls the diff provider;
/// 5. drops the result if the scope was cancelled meanwhile, if either
///    document's version moved since the call started, or if the diff does
///    not fit the documents it was computed on;
/// 6. otherwise derives regions, carries fold state over from the previous
///    regions, and publishes diff, regions, and `is_up_to_date = true` as
///    one update.
///
/// At most one scope is live at a time. A failed provider call publishes
/// nothing; the next input change is the retry.
pub struct DiffSession {
    original: Arc<dyn TextModel>,
    modified: Arc<dyn TextModel>,
    provider: Arc<dyn DiffProvider>,
    debounce: Duration,
    options_tx: watch::Sender<DiffOptions>,
    state: Mutex<SessionState>,
    /// Ticks once per committed state change.
    revision_tx: watch::Sender<u64>,
    /// Scope of the live recomputation.
    active: Mutex<Option<CancellationToken>>,
    /// Parent of every recomputation scope; cancelled on dispose.
    lifetime: CancellationToken,
    started: AtomicBool,
    publishes: AtomicU64,
}

/// Document versions and line counts a diff was computed against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct InputSnapshot {
    original_version: u64,
    modified_version: u64,
    original_lines: usize,
    modified_lines: usize,
}

impl InputSnapshot {
    /// Versions are read first, so an edit landing between the reads shows
    /// up as a version change at publish time.
    fn take(original: &dyn TextModel, modified: &dyn TextModel) -> Self {
        let original_version = original.version();
        let modified_version = modified.version();
        Self {
            original_version,
            modified_version,
            original_lines: original.line_count(),
            modified_lines: modified.line_count(),
        }
    }

    fn is_current(&self, original: &dyn TextModel, modified: &dyn TextModel) -> bool {
        original.version() == self.original_version && modified.version() == self.modified_version
    }
}

impl DiffSession {
    /// Create an idle session. Call [`start`](Self::start) to begin
    /// observing the inputs.
    pub fn new(
        original: Arc<dyn TextModel>,
        modified: Arc<dyn TextModel>,
        provider: Arc<dyn DiffProvider>,
        config: SessionConfig,
    ) -> Arc<Self> {
        let (options_tx, _) = watch::channel(config.diff);
        let (revision_tx, _) = watch::channel(0);
        Arc::new(Self {
            original,
            modified,
            provider,
            debounce: config.debounce,
            options_tx,
            state: Mutex::new(SessionState::default()),
            revision_tx,
            active: Mutex::new(None),
            lifetime: CancellationToken::new(),
            started: AtomicBool::new(false),
            publishes: AtomicU64::new(0),
        })
    }

    /// Subscribe to the inputs and run the first recomputation.
    ///
    /// Must be called from within a tokio runtime. Calling it again is a
    /// no-op.
    pub fn start(self: &Arc<Self>) -> SessionResult<()> {
        if self.lifetime.is_cancelled() {
            return Err(SessionError::Disposed);
        }
        if self.started.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let listener = Listener {
            original: self.original.subscribe_version(),
            modified: self.modified.subscribe_version(),
            options: self.options_tx.subscribe(),
            provider: self.provider.options_changed(),
        };
        tokio::spawn(listener.run(Arc::downgrade(self), self.lifetime.clone()));

        info!(debounce_ms = self.debounce.as_millis() as u64, "diff session started");
        self.recompute();
        Ok(())
    }

    /// Start a new recomputation, superseding any in flight.
    ///
    /// Must be called from within a tokio runtime. Does nothing once the
    /// session is disposed.
    pub fn recompute(self: &Arc<Self>) {
        if self.lifetime.is_cancelled() {
            debug!("recompute on disposed session ignored");
            return;
        }

        let token = self.lifetime.child_token();
        if let Some(previous) = self
            .active
            .lock()
            .expect("lock poisoned")
            .replace(token.clone())
        {
            previous.cancel();
        }
        self.mark_outdated();

        let session = Arc::clone(self);
        tokio::spawn(async move { session.run(token).await });
    }

    async fn run(self: Arc<Self>, token: CancellationToken) {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!("recomputation superseded during debounce");
                return;
            }
            _ = tokio::time::sleep(self.debounce) => {}
        }

        let options = self.options_tx.borrow().clone();
        let inputs = InputSnapshot::take(&*self.original, &*self.modified);
        debug!(
            original_version = inputs.original_version,
            modified_version = inputs.modified_version,
            ignore_trim_whitespace = options.ignore_trim_whitespace,
            max_computation_time_ms = options.max_computation_time.as_millis() as u64,
            "computing diff"
        );

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!("recomputation superseded during provider call");
                return;
            }
            result = self.provider.compute_diff(&*self.original, &*self.modified, &options) => result,
        };

        match result {
            Ok(diff) => self.publish(&token, inputs, diff),
            Err(err) => warn!(error = %err, "diff computation failed, state stays outdated"),
        }
    }

    fn publish(&self, token: &CancellationToken, inputs: InputSnapshot, diff: DocumentDiff) {
        if let Err(err) = diff.validate(inputs.original_lines, inputs.modified_lines) {
            warn!(error = %err, "diff provider returned an invalid diff, state stays outdated");
            return;
        }
        let mut regions = from_diffs(&diff.changes, inputs.original_lines, inputs.modified_lines);

        {
            let mut state = self.state.lock().expect("lock poisoned");
            // Checked under the state lock so a newer trigger cannot slip in
            // between the check and the write.
            if token.is_cancelled() {
                debug!("stale diff result dropped");
                return;
            }
            // An edit may land before the listener gets to cancel the scope.
            if !inputs.is_current(&*self.original, &*self.modified) {
                debug!("documents changed during diff, result dropped");
                return;
            }

            let previous = state
                .region_set
                .resolve_previous(&*self.original, &*self.modified);
            let carried = transfer_state(&mut regions, &previous);
            let region_set = state
                .region_set
                .rebind(regions, &*self.original, &*self.modified);

            info!(
                changes = diff.changes.len(),
                regions = region_set.len(),
                carried,
                quit_early = diff.quit_early,
                "diff published"
            );

            state.diff = Some(diff);
            state.is_up_to_date = true;
            state.region_set = region_set;
        }

        self.publishes.fetch_add(1, Ordering::SeqCst);
        self.notify();
    }

    fn mark_outdated(&self) {
        let changed = {
            let mut state = self.state.lock().expect("lock poisoned");
            std::mem::replace(&mut state.is_up_to_date, false)
        };
        if changed {
            self.notify();
        }
    }

    fn notify(&self) {
        self.revision_tx.send_modify(|revision| *revision += 1);
    }

    /// Run `f` against the state as one atomic update.
    ///
    /// Subscribers are notified once afterwards if anything was mutated.
    pub fn transaction<R>(&self, f: impl FnOnce(&mut Transaction<'_>) -> R) -> R {
        let (result, changed) = {
            let mut tx = Transaction::new(self.state.lock().expect("lock poisoned"));
            let result = f(&mut tx);
            (result, tx.changed())
        };
        if changed {
            self.notify();
        }
        result
    }

    /// Receiver that observes one tick per state change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision_tx.subscribe()
    }

    /// Consistent copy of the published state.
    pub fn snapshot(&self) -> SessionState {
        self.state.lock().expect("lock poisoned").clone()
    }

    pub fn is_up_to_date(&self) -> bool {
        self.state.lock().expect("lock poisoned").is_up_to_date
    }

    pub fn diff(&self) -> Option<DocumentDiff> {
        self.state.lock().expect("lock poisoned").diff.clone()
    }

    pub fn unchanged_regions(&self) -> Vec<UnchangedRegion> {
        self.state
            .lock()
            .expect("lock poisoned")
            .regions()
            .to_vec()
    }

    /// Wait for the next state that is up to date.
    ///
    /// Returns [`SessionError::Disposed`] if the session is disposed first.
    pub async fn wait_until_up_to_date(&self) -> SessionResult<SessionState> {
        let mut revisions = self.subscribe();
        loop {
            if self.lifetime.is_cancelled() {
                return Err(SessionError::Disposed);
            }
            let state = self.snapshot();
            if state.is_up_to_date {
                return Ok(state);
            }
            tokio::select! {
                _ = self.lifetime.cancelled() => return Err(SessionError::Disposed),
                changed = revisions.changed() => {
                    if changed.is_err() {
                        return Err(SessionError::Disposed);
                    }
                }
            }
        }
    }

    pub fn options(&self) -> DiffOptions {
        self.options_tx.borrow().clone()
    }

    /// Replace the diff options. Triggers a recomputation if they differ.
    pub fn set_options(&self, options: DiffOptions) {
        self.options_tx.send_if_modified(|current| {
            if *current == options {
                return false;
            }
            *current = options;
            true
        });
    }

    pub fn set_ignore_trim_whitespace(&self, ignore: bool) {
        self.options_tx.send_if_modified(|current| {
            let changed = current.ignore_trim_whitespace != ignore;
            current.ignore_trim_whitespace = ignore;
            changed
        });
    }

    pub fn set_max_computation_time(&self, budget: Duration) {
        self.options_tx.send_if_modified(|current| {
            let changed = current.max_computation_time != budget;
            current.max_computation_time = budget;
            changed
        });
    }

    /// Cancel any in-flight recomputation, stop observing the inputs, and
    /// release the tracked ranges. Idempotent.
    pub fn dispose(&self) {
        if self.lifetime.is_cancelled() {
            return;
        }
        self.lifetime.cancel();
        self.active.lock().expect("lock poisoned").take();
        self.state
            .lock()
            .expect("lock poisoned")
            .region_set
            .release(&*self.original, &*self.modified);
        info!("diff session disposed");
    }

    /// Number of diffs published since the session was created.
    pub fn publish_count(&self) -> u64 {
        self.publishes.load(Ordering::SeqCst)
    }

    pub fn is_disposed(&self) -> bool {
        self.lifetime.is_cancelled()
    }
}

impl Drop for DiffSession {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for DiffSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiffSession")
            .field("debounce", &self.debounce)
            .field("is_up_to_date", &self.is_up_to_date())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Input signals that trigger a recomputation.
struct Listener {
    original: watch::Receiver<u64>,
    modified: watch::Receiver<u64>,
    options: watch::Receiver<DiffOptions>,
    provider: Option<watch::Receiver<u64>>,
}

impl Listener {
    /// Holds the session weakly so an abandoned session can drop.
    async fn run(mut self, session: Weak<DiffSession>, lifetime: CancellationToken) {
        loop {
            let source = tokio::select! {
                biased;
                _ = lifetime.cancelled() => break,
                changed = self.original.changed() => match changed {
                    Ok(()) => "original",
                    Err(_) => break,
                },
                changed = self.modified.changed() => match changed {
                    Ok(()) => "modified",
                    Err(_) => break,
                },
                changed = self.options.changed() => match changed {
                    Ok(()) => "options",
                    Err(_) => break,
                },
                changed = provider_changed(&mut self.provider) => match changed {
                    Ok(()) => "provider",
                    Err(_) => {
                        self.provider = None;
                        continue;
                    }
                },
            };

            let Some(session) = session.upgrade() else {
                break;
            };
            debug!(source, "diff input changed");
            session.recompute();
        }
        debug!("diff session listener stopped");
    }
}

async fn provider_changed(
    rx: &mut Option<watch::Receiver<u64>>,
) -> Result<(), watch::error::RecvError> {
    match rx {
        Some(rx) => rx.changed().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use foldiff_diff::{diff_lines, DiffError, DiffResult};
    use foldiff_text::InMemoryDocument;
    use foldiff_types::{LineRange, LineRangeMapping};

    use super::*;

    /// Provider that diffs with `diff_lines` after an optional delay and
    /// records every call.
    #[derive(Default)]
    struct ScriptedProvider {
        calls: AtomicUsize,
        delay: Duration,
        fail: AtomicBool,
        seen: Mutex<Vec<(usize, usize, DiffOptions)>>,
        /// Run once, after the inputs were read and before returning.
        during_call: Mutex<Option<Box<dyn FnOnce() + Send>>>,
        /// Returned instead of the real diff when set.
        canned: Mutex<Option<DocumentDiff>>,
    }

    impl ScriptedProvider {
        fn with_delay(delay: Duration) -> Self {
            Self {
                delay,
                ..Default::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DiffProvider for ScriptedProvider {
        async fn compute_diff(
            &self,
            original: &dyn TextModel,
            modified: &dyn TextModel,
            options: &DiffOptions,
        ) -> DiffResult<DocumentDiff> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (old, new) = (original.lines(), modified.lines());
            self.seen
                .lock()
                .unwrap()
                .push((old.len(), new.len(), options.clone()));

            let hook = self.during_call.lock().unwrap().take();
            if let Some(hook) = hook {
                hook();
            }
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(DiffError::Provider("scripted failure".into()));
            }
            if let Some(diff) = self.canned.lock().unwrap().clone() {
                return Ok(diff);
            }
            Ok(diff_lines(&old, &new, options))
        }
    }

    fn numbered(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("line {i}")).collect()
    }

    struct Fixture {
        original: Arc<InMemoryDocument>,
        modified: Arc<InMemoryDocument>,
        provider: Arc<ScriptedProvider>,
        session: Arc<DiffSession>,
    }

    /// 100-line documents differing at line 50, with a 1 s debounce.
    fn fixture(provider: ScriptedProvider) -> Fixture {
        let original = Arc::new(InMemoryDocument::from_lines(numbered(100)));
        let mut changed = numbered(100);
        changed[49] = "changed".into();
        let modified = Arc::new(InMemoryDocument::from_lines(changed));
        let provider = Arc::new(provider);
        let session = DiffSession::new(
            original.clone(),
            modified.clone(),
            provider.clone(),
            SessionConfig::default(),
        );
        Fixture {
            original,
            modified,
            provider,
            session,
        }
    }

    /// Let woken tasks (the listener in particular) run.
    async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_publish_waits_for_debounce() {
        let f = fixture(ScriptedProvider::default());
        f.session.start().unwrap();
        assert!(!f.session.is_up_to_date());

        tokio::time::sleep(Duration::from_millis(900)).await;
        assert_eq!(f.provider.calls(), 0);

        let state = f.session.wait_until_up_to_date().await.unwrap();
        assert_eq!(f.provider.calls(), 1);
        assert_eq!(state.diff.as_ref().unwrap().changes.len(), 1);
        let bounds: Vec<LineRange> = state.regions().iter().map(|r| r.original_range()).collect();
        assert_eq!(bounds, vec![LineRange::new(1, 47), LineRange::new(54, 101)]);
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_edits_calls_provider_once() {
        let f = fixture(ScriptedProvider::default());
        f.session.start().unwrap();
        f.session.wait_until_up_to_date().await.unwrap();
        assert_eq!(f.provider.calls(), 1);
        assert_eq!(f.session.publish_count(), 1);

        f.modified.insert_lines(10, vec!["first".into()]).unwrap();
        settle().await;
        assert!(!f.session.is_up_to_date());

        tokio::time::sleep(Duration::from_millis(100)).await;
        f.modified.insert_lines(10, vec!["second".into()]).unwrap();
        settle().await;

        let state = f.session.wait_until_up_to_date().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(f.provider.calls(), 2);
        assert_eq!(f.session.publish_count(), 2);
        {
            let seen = f.provider.seen.lock().unwrap();
            // The provider ran once, on the content after the second edit.
            assert_eq!(seen[1].1, 102);
        }
        // The single publish carries that content: line 50 moved to 52.
        let changes = &state.diff.as_ref().unwrap().changes;
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].modified, LineRange::new(10, 12));
        assert_eq!(changes[1].modified, LineRange::new(52, 53));
    }

    #[tokio::test(start_paused = true)]
    async fn edit_during_provider_call_discards_result() {
        let f = fixture(ScriptedProvider::default());
        let modified = f.modified.clone();
        *f.provider.during_call.lock().unwrap() = Some(Box::new(move || {
            modified.delete_lines(LineRange::new(41, 101)).unwrap();
        }));
        f.session.start().unwrap();

        let state = f.session.wait_until_up_to_date().await.unwrap();
        assert_eq!(f.provider.calls(), 2);
        assert_eq!(f.session.publish_count(), 1);
        {
            let seen = f.provider.seen.lock().unwrap();
            assert_eq!(seen[0].1, 100);
            assert_eq!(seen[1].1, 40);
        }

        // Only the diff of the 40-line content was published.
        let diff = state.diff.as_ref().unwrap();
        assert!(diff.validate(100, 40).is_ok());
        assert_eq!(
            diff.changes,
            vec![LineRangeMapping::new(LineRange::new(41, 101), LineRange::new(41, 41))]
        );
        assert_eq!(state.regions().len(), 1);
        assert!(state
            .regions()
            .iter()
            .all(|r| r.modified_range().end_exclusive <= 41));
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_diff_is_not_published() {
        let f = fixture(ScriptedProvider::default());
        // Original side runs past the 100-line document.
        *f.provider.canned.lock().unwrap() = Some(DocumentDiff::from_changes(vec![
            LineRangeMapping::new(LineRange::new(90, 120), LineRange::new(90, 91)),
        ]));
        f.session.start().unwrap();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(f.provider.calls(), 1);
        assert_eq!(f.session.publish_count(), 0);
        assert!(!f.session.is_up_to_date());
        assert!(f.session.diff().is_none());
        assert!(f.session.unchanged_regions().is_empty());

        // Overlapping changes are rejected too.
        *f.provider.canned.lock().unwrap() = Some(DocumentDiff::from_changes(vec![
            LineRangeMapping::new(LineRange::new(10, 20), LineRange::new(10, 20)),
            LineRangeMapping::new(LineRange::new(15, 16), LineRange::new(15, 16)),
        ]));
        f.session.recompute();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(f.provider.calls(), 2);
        assert_eq!(f.session.publish_count(), 0);
        assert!(!f.session.is_up_to_date());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_result_is_never_published() {
        let f = fixture(ScriptedProvider::with_delay(Duration::from_secs(3)));
        f.session.start().unwrap();

        // Provider call in flight from t=1s to t=4s.
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(f.provider.calls(), 1);

        f.modified
            .replace_lines(LineRange::new(50, 51), vec!["line 50".into()])
            .unwrap();
        settle().await;

        let state = f.session.wait_until_up_to_date().await.unwrap();
        assert_eq!(f.provider.calls(), 2);
        // Only the second computation, on identical content, was published.
        assert!(state.diff.as_ref().unwrap().identical);

        let revisions = f.session.subscribe();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(!revisions.has_changed().unwrap());
        assert!(f.session.diff().unwrap().identical);
    }

    #[tokio::test(start_paused = true)]
    async fn provider_failure_leaves_state_outdated() {
        let f = fixture(ScriptedProvider::default());
        f.provider.fail.store(true, Ordering::SeqCst);
        f.session.start().unwrap();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(f.provider.calls(), 1);
        assert!(!f.session.is_up_to_date());
        assert!(f.session.diff().is_none());

        // The next input change is the retry.
        f.provider.fail.store(false, Ordering::SeqCst);
        f.original.insert_lines(1, vec!["retry".into()]).unwrap();
        settle().await;
        f.session.wait_until_up_to_date().await.unwrap();
        assert_eq!(f.provider.calls(), 2);
        assert!(f.session.diff().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn fold_state_survives_shifting_edit() {
        let f = fixture(ScriptedProvider::default());
        f.session.start().unwrap();
        f.session.wait_until_up_to_date().await.unwrap();

        f.session.transaction(|tx| {
            tx.regions_mut()[1].show_more_above(5);
        });
        assert_eq!(f.session.unchanged_regions()[1].visible_top(), 5);

        // Same two lines added at the top of both documents.
        let header = vec!["header a".to_string(), "header b".to_string()];
        f.original.insert_lines(1, header.clone()).unwrap();
        f.modified.insert_lines(1, header).unwrap();
        settle().await;

        let state = f.session.wait_until_up_to_date().await.unwrap();
        let regions = state.regions();
        assert_eq!(regions[1].original_range(), LineRange::new(56, 103));
        assert_eq!(regions[1].visible_top(), 5);
        assert_eq!(regions[0].visible_top(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn reveal_line_in_modified_unfolds_region() {
        let f = fixture(ScriptedProvider::default());
        f.session.start().unwrap();
        f.session.wait_until_up_to_date().await.unwrap();

        let mut revisions = f.session.subscribe();
        let revealed = f.session.transaction(|tx| tx.reveal_line_in_modified(70));
        assert!(revealed);
        assert!(revisions.has_changed().unwrap());
        revisions.borrow_and_update();

        let region = f.session.unchanged_regions()[1].clone();
        assert_eq!(region.visible_bottom(), region.line_count() - region.visible_top());

        // Line 50 is the change itself: nothing to reveal, no notification.
        assert!(!f.session.transaction(|tx| tx.reveal_line_in_modified(50)));
        assert!(!revisions.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn option_change_triggers_recompute() {
        let f = fixture(ScriptedProvider::default());
        f.session.start().unwrap();
        f.session.wait_until_up_to_date().await.unwrap();

        // Setting the same value is not a change.
        f.session.set_ignore_trim_whitespace(true);
        settle().await;
        assert!(f.session.is_up_to_date());

        f.session.set_ignore_trim_whitespace(false);
        settle().await;
        assert!(!f.session.is_up_to_date());

        f.session.wait_until_up_to_date().await.unwrap();
        let seen = f.provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(!seen[1].2.ignore_trim_whitespace);
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_cancels_in_flight_work() {
        let f = fixture(ScriptedProvider::default());
        f.session.start().unwrap();

        tokio::time::sleep(Duration::from_millis(500)).await;
        f.session.dispose();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(f.provider.calls(), 0);
        assert!(!f.session.is_up_to_date());
        assert!(matches!(
            f.session.wait_until_up_to_date().await,
            Err(SessionError::Disposed)
        ));
        assert!(matches!(f.session.start(), Err(SessionError::Disposed)));

        // Inputs are no longer observed.
        f.original.insert_lines(1, vec!["late".into()]).unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(f.provider.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_releases_tracked_ranges() {
        let f = fixture(ScriptedProvider::default());
        f.session.start().unwrap();
        f.session.wait_until_up_to_date().await.unwrap();
        assert_eq!(f.original.tracked_count(), 2);
        assert_eq!(f.modified.tracked_count(), 2);

        f.session.dispose();
        assert_eq!(f.original.tracked_count(), 0);
        assert_eq!(f.modified.tracked_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn transaction_notifies_once() {
        let f = fixture(ScriptedProvider::default());
        f.session.start().unwrap();
        f.session.wait_until_up_to_date().await.unwrap();

        let mut revisions = f.session.subscribe();
        let before = *revisions.borrow_and_update();
        f.session.transaction(|tx| {
            tx.regions_mut()[0].show_more_below(2);
            tx.regions_mut()[1].show_more_above(2);
        });
        assert_eq!(*revisions.borrow_and_update(), before + 1);

        // A read-only transaction does not notify.
        f.session.transaction(|tx| tx.regions().len());
        assert!(!revisions.has_changed().unwrap());
    }
}
