//! Stream sessions.
//!
//! A [`StreamSession`] owns one logical stream at a time. Supplying
//! identifying parameters opens a transport and spawns a decode loop on the
//! tokio runtime; the loop feeds chunks through a [`FrameDecoder`], classifies
//! every frame and applies the result to the shared session record.
//!
//! All mutation of the record happens under one lock, and the loop re-checks
//! the run id and state before every write. Cancelling flips the state under
//! that same lock, so once `cancel()` returns no further line can be appended,
//! whatever the transport delivers afterwards.
//!
//! # Module structure
//! - `state` - SessionState, snapshots and change notifications
//! - `variant` - VariantSpec (finite flag, address builder, status labels)
//! - `provision`, `deployment`, `tail` - the three stream kinds

pub mod deployment;
pub mod provision;
pub mod state;
pub mod tail;
pub mod variant;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use futures_util::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::config::StreamConfig;
use crate::error::StreamError;
use crate::sse::{parse_frame, FrameDecoder, StreamEvent};
use crate::traits::{CredentialsProvider, Headers, HttpClient};

pub use deployment::{DeploymentParams, DeploymentStream, DEPLOYMENT, DEPLOYMENT_STATUSES};
pub use provision::{ProvisionParams, ProvisionStream, PROVISION, PROVISION_STATUSES};
pub use state::{SessionSnapshot, SessionState, SessionUpdate, TailSnapshot};
pub use tail::{LogTail, TailParams, TAIL};
pub use variant::VariantSpec;

/// Bounds every identifying-parameter type satisfies.
pub trait SessionParams: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {}

impl<T> SessionParams for T where T: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {}

/// Mutable record shared between the session handle and its decode loop.
#[derive(Debug)]
struct Record {
    /// Incremented on every open; writes from older runs are ignored
    run_id: u64,
    state: SessionState,
    lines: Vec<String>,
}

/// Outcome of applying one chunk's worth of events.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

struct Shared {
    record: Mutex<Record>,
    updates: watch::Sender<SessionUpdate>,
}

impl Shared {
    fn new() -> Self {
        let (updates, _) = watch::channel(SessionUpdate {
            state: SessionState::Idle,
            line_count: 0,
        });
        Self {
            record: Mutex::new(Record {
                run_id: 0,
                state: SessionState::Idle,
                lines: Vec::new(),
            }),
            updates,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Record> {
        self.record.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Publish while the lock is held so notifications keep mutation order.
    fn publish(&self, record: &Record) {
        self.updates.send_replace(SessionUpdate {
            state: record.state.clone(),
            line_count: record.lines.len(),
        });
    }

    /// Reset the record for a fresh run and return its id.
    fn begin_run(&self) -> u64 {
        let mut record = self.lock();
        record.run_id += 1;
        record.lines.clear();
        record.state = SessionState::Opening;
        self.publish(&record);
        record.run_id
    }

    /// Move an active run to `next`. Returns false if the run is stale or settled.
    fn transition(&self, run_id: u64, next: SessionState) -> bool {
        let mut record = self.lock();
        if record.run_id != run_id || !record.state.is_active() {
            return false;
        }
        record.state = next;
        self.publish(&record);
        true
    }

    /// Settle an active run as cancelled.
    fn cancel(&self, run_id: u64) -> bool {
        self.transition(run_id, SessionState::Cancelled)
    }

    /// Settle an active run after a fault, unless the fault is a cancellation.
    fn fail(&self, run_id: u64, cancel: &CancellationToken, err: StreamError) {
        if err.is_cancellation() || cancel.is_cancelled() {
            debug!("Stream fault after cancellation suppressed: {}", err);
            self.cancel(run_id);
            return;
        }
        if self.transition(run_id, SessionState::Failed(err.to_string())) {
            warn!(code = err.error_code(), "Stream failed: {}", err);
        }
    }

    fn apply_events(&self, run_id: u64, spec_finite: bool, events: Vec<StreamEvent>) -> Flow {
        let mut record = self.lock();
        if record.run_id != run_id || !record.state.is_active() {
            return Flow::Stop;
        }

        let before = record.lines.len();
        let mut flow = Flow::Continue;
        for event in events {
            match event {
                StreamEvent::Line(line) => record.lines.push(line),
                StreamEvent::Terminal(status) if spec_finite => {
                    record.state = SessionState::Completed(status);
                    flow = Flow::Stop;
                    break;
                }
                StreamEvent::Terminal(_) => {
                    trace!("Ignoring terminal frame on unbounded stream");
                }
                StreamEvent::Malformed => {
                    debug!("Dropping malformed frame");
                }
            }
        }

        if flow == Flow::Stop || record.lines.len() != before {
            self.publish(&record);
        }
        flow
    }

    fn snapshot(&self) -> SessionSnapshot {
        let record = self.lock();
        SessionSnapshot::new(&record.state, record.lines.clone())
    }
}

/// Everything the decode loop needs, moved into the spawned task.
struct RunContext {
    variant: &'static str,
    finite: bool,
    statuses: &'static [&'static str],
    url: String,
    headers: Headers,
    client: Arc<dyn HttpClient>,
    shared: Arc<Shared>,
    run_id: u64,
    cancel: CancellationToken,
}

/// Handle to the task of the currently open run.
struct ActiveRun {
    run_id: u64,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Cloneable trigger for the caller's own cancellation signal.
///
/// Bound to the run that was active when it was created; it has no effect on
/// later runs of the same session.
#[derive(Clone)]
pub struct CancelHandle {
    shared: Arc<Shared>,
    run_id: u64,
    cancel: CancellationToken,
}

impl CancelHandle {
    /// Cancel the bound run if it is still opening or streaming.
    pub fn cancel(&self) {
        if self.shared.cancel(self.run_id) {
            info!(run_id = self.run_id, "Stream cancelled by caller");
        }
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelHandle")
            .field("run_id", &self.run_id)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

/// One logical stream, reconfigurable by supplying new identifying parameters.
///
/// # Example
///
/// ```ignore
/// use opstream::StreamClient;
/// use opstream::session::ProvisionParams;
///
/// let client = StreamClient::from_config(StreamConfig::from_env());
/// let mut session = client.provision();
/// session.set_params(Some(ProvisionParams::new("srv-1", token)));
/// let snapshot = session.wait_until_settled().await;
/// println!("{:?} after {} lines", snapshot.status, snapshot.lines.len());
/// ```
pub struct StreamSession<P: SessionParams> {
    spec: VariantSpec<P>,
    client: Arc<dyn HttpClient>,
    credentials: Arc<dyn CredentialsProvider>,
    config: StreamConfig,
    shared: Arc<Shared>,
    params: Option<P>,
    active: Option<ActiveRun>,
}

impl<P: SessionParams> StreamSession<P> {
    /// Create an idle session.
    pub fn new(
        spec: VariantSpec<P>,
        client: Arc<dyn HttpClient>,
        credentials: Arc<dyn CredentialsProvider>,
        config: StreamConfig,
    ) -> Self {
        Self {
            spec,
            client,
            credentials,
            config,
            shared: Arc::new(Shared::new()),
            params: None,
            active: None,
        }
    }

    /// Supply identifying parameters.
    ///
    /// Identical parameters are a no-op. Anything else retires the current
    /// run first. `Some` then resets the record and opens a new transport;
    /// `None` leaves an active run `Cancelled` and a settled run untouched.
    ///
    /// Must be called from within a tokio runtime to open a stream.
    pub fn set_params(&mut self, params: Option<P>) {
        if self.params == params {
            return;
        }
        self.retire();
        self.params = params.clone();
        if let Some(params) = params {
            self.open(params);
        }
    }

    /// Withdraw interest: equivalent to `set_params(None)`.
    pub fn withdraw(&mut self) {
        self.set_params(None);
    }

    /// Retire the current run and open it again with the same parameters.
    pub fn restart(&mut self) {
        self.retire();
        if let Some(params) = self.params.clone() {
            self.open(params);
        }
    }

    /// Cancel the current run, keeping its parameters and lines.
    pub fn cancel(&mut self) {
        self.retire();
    }

    /// Handle that cancels the current run from elsewhere.
    ///
    /// Returns `None` when nothing has been opened yet.
    pub fn cancel_handle(&self) -> Option<CancelHandle> {
        self.active.as_ref().map(|run| CancelHandle {
            shared: Arc::clone(&self.shared),
            run_id: run.run_id,
            cancel: run.cancel.clone(),
        })
    }

    /// Empty the line log without touching the open connection.
    pub fn clear(&self) {
        let mut record = self.shared.lock();
        record.lines.clear();
        self.shared.publish(&record);
    }

    /// Current identifying parameters.
    pub fn params(&self) -> Option<&P> {
        self.params.as_ref()
    }

    pub fn spec(&self) -> &VariantSpec<P> {
        &self.spec
    }

    pub fn state(&self) -> SessionState {
        self.shared.lock().state.clone()
    }

    pub fn is_streaming(&self) -> bool {
        self.shared.lock().state.is_active()
    }

    pub fn lines(&self) -> Vec<String> {
        self.shared.lock().lines.clone()
    }

    /// Current observable record.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.snapshot()
    }

    /// Receiver notified on every state change or appended batch of lines.
    pub fn subscribe(&self) -> watch::Receiver<SessionUpdate> {
        self.shared.updates.subscribe()
    }

    /// Wait until the session is neither opening nor streaming.
    ///
    /// Never resolves for a healthy tail; pair it with a timeout or a cancel.
    pub async fn wait_until_settled(&self) -> SessionSnapshot {
        let mut updates = self.subscribe();
        loop {
            if !updates.borrow_and_update().state.is_active() {
                break;
            }
            if updates.changed().await.is_err() {
                break;
            }
        }
        self.snapshot()
    }

    fn open(&mut self, params: P) {
        let run_id = self.shared.begin_run();
        let url = self.spec.address_for(&self.config, &params);
        let headers = self.credentials.auth_headers();
        let cancel = CancellationToken::new();

        info!(
            variant = self.spec.name,
            run_id,
            "Opening stream for {:?}",
            params
        );

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                self.shared.fail(
                    run_id,
                    &cancel,
                    StreamError::Transport {
                        message: format!("no async runtime available: {}", e),
                    },
                );
                return;
            }
        };

        let context = RunContext {
            variant: self.spec.name,
            finite: self.spec.finite,
            statuses: self.spec.statuses,
            url,
            headers,
            client: Arc::clone(&self.client),
            shared: Arc::clone(&self.shared),
            run_id,
            cancel: cancel.clone(),
        };
        let handle = runtime.spawn(run_stream(context));

        self.active = Some(ActiveRun {
            run_id,
            cancel,
            handle,
        });
    }

    /// Cancel and close the current run, if any.
    fn retire(&mut self) {
        if let Some(run) = self.active.take() {
            if self.shared.cancel(run.run_id) {
                info!(variant = self.spec.name, run_id = run.run_id, "Stream cancelled");
            }
            run.cancel.cancel();
            run.handle.abort();
        }
    }
}

impl<P: SessionParams> Drop for StreamSession<P> {
    fn drop(&mut self) {
        self.retire();
    }
}

impl<P: SessionParams> fmt::Debug for StreamSession<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamSession")
            .field("variant", &self.spec.name)
            .field("params", &self.params)
            .field("state", &self.state())
            .finish()
    }
}

/// Decode loop for one run.
async fn run_stream(ctx: RunContext) {
    let RunContext {
        variant,
        finite,
        statuses,
        url,
        headers,
        client,
        shared,
        run_id,
        cancel,
    } = ctx;

    let opened = tokio::select! {
        biased;
        _ = cancel.cancelled() => return,
        result = client.get_stream(&url, &headers) => result,
    };

    let response = match opened {
        Ok(response) => response,
        Err(e) => {
            shared.fail(run_id, &cancel, e.into());
            return;
        }
    };

    if !response.is_success() {
        let reason = reqwest::StatusCode::from_u16(response.status)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or_default();
        shared.fail(run_id, &cancel, StreamError::http_status(response.status, reason));
        return;
    }

    let Some(mut body) = response.body else {
        shared.fail(run_id, &cancel, StreamError::MissingBody);
        return;
    };

    if !shared.transition(run_id, SessionState::Streaming) {
        return;
    }
    debug!(variant, run_id, "Stream open: {}", url);

    let mut decoder = FrameDecoder::new();
    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(variant, run_id, "Read aborted by cancellation");
                return;
            }
            next = body.next() => next,
        };

        match next {
            Some(Ok(chunk)) => {
                trace!(variant, run_id, bytes = chunk.len(), "Chunk received");
                let events: Vec<StreamEvent> =
                    decoder.feed(&chunk).iter().map(parse_frame).collect();

                for event in &events {
                    if let StreamEvent::Terminal(Some(status)) = event {
                        if finite && !statuses.contains(&status.as_str()) {
                            debug!(variant, "Unrecognised terminal status: {}", status);
                        }
                    }
                }

                if shared.apply_events(run_id, finite, events) == Flow::Stop {
                    let state = shared.lock().state.clone();
                    info!(variant, run_id, "Stream finished: {:?}", state);
                    return;
                }
            }
            Some(Err(e)) => {
                shared.fail(run_id, &cancel, e.into());
                return;
            }
            None => {
                if let Some(tail) = decoder.finish() {
                    debug!(
                        variant,
                        run_id,
                        "Discarding {} bytes of unterminated frame",
                        tail.len()
                    );
                }
                if shared.transition(run_id, SessionState::Completed(None)) {
                    info!(variant, run_id, "Stream closed by server without terminal frame");
                }
                return;
            }
        }
    }
}
