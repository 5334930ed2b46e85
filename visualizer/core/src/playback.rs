//! Playback Controller
//!
//! Drives one step producer at a time, pacing each step with a fixed delay
//! and delivering it to the [`Renderer`].
//!
//! # State Machine
//!
//! ```text
//!            start                 producer exhausted
//!   Idle ───────────► Running ──────────────────────► Completed
//!    ▲  ▲              │   ▲                              │
//!    │  │        pause │   │ resume                       │ start
//!    │  │              ▼   │                              ▼
//!    │  └─ cancel ─── Paused                           Running
//!    └──── cancel / invariant failure (from any non-Idle state)
//! ```
//!
//! # Pull Loop
//!
//! Each run is a tokio task. Every iteration takes the controller lock,
//! checks that its run is still current and not paused, pulls exactly one
//! step and hands it to the renderer, then releases the lock and sleeps for
//! the pacing delay. Because the check, the pull and the render happen under
//! one lock:
//!
//! - once [`PlaybackController::pause`] returns, no further step is pulled
//! - once [`PlaybackController::cancel`] returns, the renderer is never
//!   called by the cancelled run again
//!
//! The end of a run is recorded under the lock, but `on_finished` and
//! `on_error` are delivered after it is released, so those callbacks may
//! query or restart the controller.
//!
//! A paused loop waits on a [`Notify`], which stores at most one permit.
//! The loop re-checks the state after every wake-up, so a permit left over
//! from an earlier resume cannot release a later pause.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::algorithms::{Algorithm, StepProducer};
use crate::error::PlaybackError;
use crate::renderer::Renderer;
use crate::sequence::{is_permutation_of, is_sorted, Step, Value};

/// Default wait between two delivered steps
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(100);

// ============================================================================
// Identifiers and States
// ============================================================================

/// Identifier of one run, increasing per controller
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunId(pub u64);

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Playback state, owned by the controller
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No run
    #[default]
    Idle,
    /// A run is pulling and rendering steps
    Running,
    /// A run is suspended before its next pull
    Paused,
    /// The last run delivered all of its steps
    Completed,
}

impl PlaybackState {
    /// Human-readable label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Running => "Running",
            Self::Paused => "Paused",
            Self::Completed => "Completed",
        }
    }

    /// Whether a run currently owns the controller
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// How a run ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// All steps delivered and the final state validated
    Completed,
    /// Stopped by [`PlaybackController::cancel`]
    Cancelled,
    /// Aborted on an algorithm invariant violation
    Failed,
}

/// Summary of the most recently ended run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Which run
    pub run: RunId,
    /// Algorithm it executed
    pub algorithm: Algorithm,
    /// Steps delivered to the renderer
    pub steps: usize,
    /// How it ended
    pub outcome: RunOutcome,
}

// ============================================================================
// Configuration
// ============================================================================

/// Controller configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaybackConfig {
    /// Wait after each delivered step
    pub step_delay: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            step_delay: DEFAULT_STEP_DELAY,
        }
    }
}

impl PlaybackConfig {
    /// Set the pacing delay
    #[must_use]
    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }
}

/// Step budget for an input of `len` values
///
/// Comfortably above the quadratic worst case of the slowest algorithms; a
/// producer that exceeds it is treated as non-terminating.
#[must_use]
pub fn step_limit(len: usize) -> usize {
    len.saturating_mul(len).saturating_mul(4).saturating_add(64)
}

/// Check that a run's final state is an ascending permutation of its input
fn validate_final(input: &[Value], final_state: &[Value]) -> Result<(), &'static str> {
    if !is_permutation_of(final_state, input) {
        return Err("final state is not a permutation of the input");
    }
    if !is_sorted(final_state) {
        return Err("final state is not sorted ascending");
    }
    Ok(())
}

// ============================================================================
// Shared State
// ============================================================================

struct ActiveRun {
    id: RunId,
    algorithm: Algorithm,
    steps: usize,
    task: Option<JoinHandle<()>>,
}

impl ActiveRun {
    fn report(&self, outcome: RunOutcome) -> RunReport {
        RunReport {
            run: self.id,
            algorithm: self.algorithm,
            steps: self.steps,
            outcome,
        }
    }
}

#[derive(Default)]
struct Slot {
    state: PlaybackState,
    active: Option<ActiveRun>,
    last_id: u64,
    last_report: Option<RunReport>,
}

struct Shared {
    slot: Mutex<Slot>,
    resume: Notify,
    state_tx: watch::Sender<PlaybackState>,
    renderer: Arc<dyn Renderer>,
}

/// Result of one locked iteration of the pull loop
enum Advance {
    /// The run was cancelled or superseded
    Stale,
    /// Wait for a resume, then try again
    Paused,
    /// A step was rendered; sleep before the next
    Delivered,
    /// The run ended; the renderer is told after the lock is released
    Finished(Ending),
}

/// How a run ended
enum Ending {
    Completed,
    Failed(PlaybackError),
}

impl Shared {
    fn transition(&self, slot: &mut Slot, to: PlaybackState) {
        if slot.state != to {
            debug!(from = %slot.state, to = %to, "Playback state change");
            slot.state = to;
            self.state_tx.send_replace(to);
        }
    }

    fn advance(
        &self,
        id: RunId,
        producer: &mut StepProducer,
        input: &[Value],
        last: &mut Option<Step>,
    ) -> Advance {
        let mut guard = self.slot.lock();
        let slot = &mut *guard;

        let Some(active) = slot.active.as_mut().filter(|run| run.id == id) else {
            return Advance::Stale;
        };
        match slot.state {
            PlaybackState::Running => {}
            PlaybackState::Paused => return Advance::Paused,
            PlaybackState::Idle | PlaybackState::Completed => return Advance::Stale,
        }

        let Some(step) = producer.next() else {
            let final_state = last.as_ref().map_or(input, |step| step.values());
            let ending = match validate_final(input, final_state) {
                Ok(()) => {
                    self.complete(slot);
                    Ending::Completed
                }
                Err(reason) => {
                    let err = PlaybackError::InvariantViolation {
                        run: id,
                        algorithm: active.algorithm,
                        reason: reason.to_string(),
                    };
                    self.fail(slot, &err);
                    Ending::Failed(err)
                }
            };
            return Advance::Finished(ending);
        };

        let limit = step_limit(input.len());
        if active.steps >= limit {
            let err = PlaybackError::StepLimitExceeded {
                run: id,
                algorithm: active.algorithm,
                limit,
            };
            self.fail(slot, &err);
            return Advance::Finished(Ending::Failed(err));
        }

        active.steps += 1;
        debug!(run = %id, step = active.steps, "Delivering step");
        self.renderer.on_step(&step);
        *last = Some(step);
        Advance::Delivered
    }

    fn complete(&self, slot: &mut Slot) {
        if let Some(active) = slot.active.take() {
            info!(
                run = %active.id,
                algorithm = %active.algorithm,
                steps = active.steps,
                "Run completed"
            );
            slot.last_report = Some(active.report(RunOutcome::Completed));
        }
        self.transition(slot, PlaybackState::Completed);
    }

    fn fail(&self, slot: &mut Slot, err: &PlaybackError) {
        if let Some(active) = slot.active.take() {
            slot.last_report = Some(active.report(RunOutcome::Failed));
        }
        error!(error = %err, "Run aborted");
        self.transition(slot, PlaybackState::Idle);
    }
}

async fn pull_loop(
    shared: Arc<Shared>,
    id: RunId,
    mut producer: StepProducer,
    input: Vec<Value>,
    delay: Duration,
) {
    let mut last: Option<Step> = None;

    loop {
        // Created before the check so a resume in between is not missed
        let resumed = shared.resume.notified();

        match shared.advance(id, &mut producer, &input, &mut last) {
            Advance::Stale => return,
            Advance::Finished(Ending::Completed) => {
                shared.renderer.on_finished();
                return;
            }
            Advance::Finished(Ending::Failed(err)) => {
                shared.renderer.on_error(&err);
                return;
            }
            Advance::Paused => resumed.await,
            Advance::Delivered => tokio::time::sleep(delay).await,
        }
    }
}

// ============================================================================
// Controller
// ============================================================================

/// Paces a step producer and reports its steps to a renderer
///
/// Cloning yields another handle to the same controller. `start` spawns a
/// tokio task and must be called from within a runtime.
#[derive(Clone)]
pub struct PlaybackController {
    shared: Arc<Shared>,
    config: PlaybackConfig,
}

impl PlaybackController {
    /// Create an idle controller
    #[must_use]
    pub fn new(config: PlaybackConfig, renderer: Arc<dyn Renderer>) -> Self {
        let (state_tx, _) = watch::channel(PlaybackState::Idle);
        Self {
            shared: Arc::new(Shared {
                slot: Mutex::new(Slot::default()),
                resume: Notify::new(),
                state_tx,
                renderer,
            }),
            config,
        }
    }

    /// Controller configuration
    #[must_use]
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// The renderer steps are delivered to
    #[must_use]
    pub fn renderer(&self) -> Arc<dyn Renderer> {
        Arc::clone(&self.shared.renderer)
    }

    /// Start sorting a private copy of `sequence`
    ///
    /// Valid from `Idle` or `Completed`. While a run is active the call is
    /// ignored with a warning and `None` is returned.
    pub fn start(&self, sequence: &[Value], algorithm: Algorithm) -> Option<RunId> {
        let mut slot = self.shared.slot.lock();

        if slot.state.is_active() {
            warn!(
                state = %slot.state,
                %algorithm,
                "Ignoring start: a run is already active"
            );
            return None;
        }

        slot.last_id += 1;
        let id = RunId(slot.last_id);
        let producer = algorithm.steps(sequence);

        slot.active = Some(ActiveRun {
            id,
            algorithm,
            steps: 0,
            task: None,
        });
        self.shared.transition(&mut slot, PlaybackState::Running);

        // The task cannot observe the slot before the lock is released
        let task = tokio::spawn(pull_loop(
            Arc::clone(&self.shared),
            id,
            producer,
            sequence.to_vec(),
            self.config.step_delay,
        ));
        if let Some(active) = slot.active.as_mut() {
            active.task = Some(task);
        }

        info!(run = %id, %algorithm, len = sequence.len(), "Run started");
        Some(id)
    }

    /// Suspend the active run before its next pull
    ///
    /// Returns `false` (and logs a warning) unless the controller is
    /// `Running`.
    pub fn pause(&self) -> bool {
        let mut slot = self.shared.slot.lock();
        if slot.state != PlaybackState::Running {
            warn!(state = %slot.state, "Ignoring pause: nothing is running");
            return false;
        }
        self.shared.transition(&mut slot, PlaybackState::Paused);
        true
    }

    /// Release a paused run
    ///
    /// Returns `false` (and logs a warning) unless the controller is
    /// `Paused`.
    pub fn resume(&self) -> bool {
        let mut slot = self.shared.slot.lock();
        if slot.state != PlaybackState::Paused {
            warn!(state = %slot.state, "Ignoring resume without a matching pause");
            return false;
        }
        self.shared.transition(&mut slot, PlaybackState::Running);
        self.shared.resume.notify_one();
        true
    }

    /// Pause when running, resume when paused
    pub fn toggle_pause(&self) -> bool {
        match self.state() {
            PlaybackState::Running => self.pause(),
            PlaybackState::Paused => self.resume(),
            state => {
                warn!(%state, "Ignoring pause toggle: no active run");
                false
            }
        }
    }

    /// Discard the active run and return to `Idle`
    ///
    /// Aborts the pull loop task, dropping its producer and any pending
    /// pacing timer. `on_finished` is not called. Returns `false` when the
    /// controller was already idle.
    pub fn cancel(&self) -> bool {
        let mut slot = self.shared.slot.lock();
        if slot.state == PlaybackState::Idle {
            debug!("Cancel ignored: controller is idle");
            return false;
        }

        if let Some(active) = slot.active.take() {
            if let Some(task) = &active.task {
                task.abort();
            }
            info!(run = %active.id, steps = active.steps, "Run cancelled");
            slot.last_report = Some(active.report(RunOutcome::Cancelled));
        }
        self.shared.transition(&mut slot, PlaybackState::Idle);
        true
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.shared.slot.lock().state
    }

    /// Watch state changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.shared.state_tx.subscribe()
    }

    /// Identifier of the active run, if any
    #[must_use]
    pub fn active_run(&self) -> Option<RunId> {
        self.shared.slot.lock().active.as_ref().map(|run| run.id)
    }

    /// Summary of the most recently ended run
    #[must_use]
    pub fn last_report(&self) -> Option<RunReport> {
        self.shared.slot.lock().last_report.clone()
    }

    /// Wait until no run is active (`Idle` or `Completed`)
    pub async fn settled(&self) -> PlaybackState {
        let mut rx = self.subscribe();
        let settled = rx.wait_for(|state| !state.is_active()).await;
        settled.map_or(PlaybackState::Idle, |state| *state)
    }
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("state", &self.state())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RenderEvent;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;
    use tokio::time::{timeout, Instant};

    fn controller() -> (PlaybackController, mpsc::UnboundedReceiver<RenderEvent>) {
        let (tx, rx) = mpsc::unbounded_channel::<RenderEvent>();
        (
            PlaybackController::new(PlaybackConfig::default(), Arc::new(tx)),
            rx,
        )
    }

    fn expected(algorithm: Algorithm, input: &[Value]) -> Vec<Step> {
        algorithm.steps(input).collect()
    }

    /// Collect steps until the run ends; returns the steps and the final event
    async fn drain(rx: &mut mpsc::UnboundedReceiver<RenderEvent>) -> (Vec<Step>, RenderEvent) {
        let mut steps = Vec::new();
        while let Some(event) = rx.recv().await {
            match event {
                RenderEvent::Step { values } => steps.push(values),
                other => return (steps, other),
            }
        }
        panic!("renderer channel closed");
    }

    async fn next_step(rx: &mut mpsc::UnboundedReceiver<RenderEvent>) -> Step {
        match rx.recv().await {
            Some(RenderEvent::Step { values }) => values,
            other => panic!("expected a step, got {other:?}"),
        }
    }

    async fn assert_silent(rx: &mut mpsc::UnboundedReceiver<RenderEvent>) {
        let waited = timeout(Duration::from_secs(10), rx.recv()).await;
        assert!(waited.is_err(), "unexpected event: {waited:?}");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(PlaybackConfig::default().step_delay, Duration::from_millis(100));
        assert_eq!(PlaybackState::default(), PlaybackState::Idle);
        assert_eq!(RunId(7).to_string(), "#7");
    }

    #[test]
    fn test_state_labels_and_activity() {
        let states = [
            PlaybackState::Idle,
            PlaybackState::Running,
            PlaybackState::Paused,
            PlaybackState::Completed,
        ];
        assert_eq!(
            states.map(PlaybackState::label),
            ["Idle", "Running", "Paused", "Completed"]
        );
        assert_eq!(
            states.map(PlaybackState::is_active),
            [false, true, true, false]
        );
        assert_eq!(PlaybackState::Paused.to_string(), "Paused");
    }

    #[test]
    fn test_step_limit_grows_quadratically() {
        assert_eq!(step_limit(0), 64);
        assert_eq!(step_limit(10), 464);
        assert_eq!(step_limit(usize::MAX), usize::MAX);
    }

    #[test]
    fn test_validate_final() {
        assert!(validate_final(&[3, 1, 2], &[1, 2, 3]).is_ok());
        assert!(validate_final(&[], &[]).is_ok());
        assert_eq!(
            validate_final(&[3, 1, 2], &[2, 1, 3]),
            Err("final state is not sorted ascending")
        );
        assert_eq!(
            validate_final(&[3, 1, 2], &[1, 2, 2]),
            Err("final state is not a permutation of the input")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_delivers_every_step_then_finishes() {
        let (ctl, mut rx) = controller();
        let input = [5, 3, 8, 1];

        let run = ctl.start(&input, Algorithm::Bubble).unwrap();
        assert_eq!(ctl.state(), PlaybackState::Running);
        assert_eq!(ctl.active_run(), Some(run));

        let (steps, end) = drain(&mut rx).await;
        assert_eq!(steps, expected(Algorithm::Bubble, &input));
        assert_eq!(end, RenderEvent::Finished);
        assert_eq!(ctl.state(), PlaybackState::Completed);
        assert_eq!(ctl.active_run(), None);
        assert_eq!(
            ctl.last_report(),
            Some(RunReport {
                run,
                algorithm: Algorithm::Bubble,
                steps: 4,
                outcome: RunOutcome::Completed,
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_steps_are_paced() {
        let (ctl, mut rx) = controller();
        let started = Instant::now();

        ctl.start(&[5, 3, 8, 1], Algorithm::Bubble).unwrap();
        let (steps, _) = drain(&mut rx).await;

        assert!(started.elapsed() >= DEFAULT_STEP_DELAY * u32::try_from(steps.len()).unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_algorithm_completes_through_controller() {
        let input = [170, 45, 75, 90, 802, 24, 2, 66];
        for algorithm in Algorithm::ALL {
            let (ctl, mut rx) = controller();
            ctl.start(&input, algorithm).unwrap();
            let (steps, end) = drain(&mut rx).await;
            assert_eq!(end, RenderEvent::Finished, "{algorithm}");
            assert_eq!(steps, expected(algorithm, &input), "{algorithm}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_input_completes_immediately() {
        for algorithm in Algorithm::ALL {
            let (ctl, mut rx) = controller();
            ctl.start(&[], algorithm).unwrap();
            let (steps, end) = drain(&mut rx).await;
            assert!(steps.len() <= 1);
            assert_eq!(end, RenderEvent::Finished);
            assert_eq!(ctl.settled().await, PlaybackState::Completed);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_redundant_start_is_ignored() {
        let (ctl, mut rx) = controller();
        let first = ctl.start(&[4, 3, 2, 1], Algorithm::Insertion);
        assert!(first.is_some());
        assert_eq!(ctl.start(&[9, 8], Algorithm::Bubble), None);

        let (steps, end) = drain(&mut rx).await;
        assert_eq!(steps, expected(Algorithm::Insertion, &[4, 3, 2, 1]));
        assert_eq!(end, RenderEvent::Finished);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_completion() {
        let (ctl, mut rx) = controller();
        let first = ctl.start(&[2, 1], Algorithm::Selection).unwrap();
        drain(&mut rx).await;

        let second = ctl.start(&[2, 1], Algorithm::Heap).unwrap();
        assert!(second > first);
        let (_, end) = drain(&mut rx).await;
        assert_eq!(end, RenderEvent::Finished);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_blocks_before_next_pull() {
        let (ctl, mut rx) = controller();
        let input = [9, 7, 5, 3, 1];
        ctl.start(&input, Algorithm::Insertion).unwrap();

        let first = next_step(&mut rx).await;
        assert!(ctl.pause());
        assert_eq!(ctl.state(), PlaybackState::Paused);
        assert_silent(&mut rx).await;
        assert_eq!(ctl.state(), PlaybackState::Paused);

        assert!(ctl.resume());
        let (mut rest, end) = drain(&mut rx).await;
        assert_eq!(end, RenderEvent::Finished);

        rest.insert(0, first);
        assert_eq!(rest, expected(Algorithm::Insertion, &input));
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_pause_resume_keeps_step_sequence() {
        let (ctl, mut rx) = controller();
        let input = [31, 4, 15, 9, 26, 5, 35, 8];
        ctl.start(&input, Algorithm::Merge).unwrap();

        let mut seen = Vec::new();
        loop {
            match rx.recv().await.unwrap() {
                RenderEvent::Step { values } => {
                    seen.push(values);
                    if seen.len() % 3 == 0 && ctl.pause() {
                        tokio::time::sleep(Duration::from_secs(1)).await;
                        assert!(ctl.resume());
                    }
                }
                RenderEvent::Finished => break,
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(seen, expected(Algorithm::Merge, &input));
    }

    #[tokio::test(start_paused = true)]
    async fn test_protocol_violations_are_noops() {
        let (ctl, _rx) = controller();
        assert!(!ctl.resume());
        assert!(!ctl.pause());
        assert!(!ctl.toggle_pause());
        assert!(!ctl.cancel());
        assert_eq!(ctl.state(), PlaybackState::Idle);

        ctl.start(&[3, 2, 1], Algorithm::Shell).unwrap();
        assert!(!ctl.resume());
        assert_eq!(ctl.state(), PlaybackState::Running);
        assert!(ctl.pause());
        assert!(!ctl.pause());
        assert_eq!(ctl.state(), PlaybackState::Paused);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stray_resume_does_not_release_later_pause() {
        let (ctl, mut rx) = controller();
        ctl.start(&[6, 5, 4, 3, 2, 1], Algorithm::Insertion).unwrap();
        next_step(&mut rx).await;

        // Resume while the loop is sleeping leaves a stored permit behind
        assert!(ctl.pause());
        assert!(ctl.resume());
        assert!(ctl.pause());

        // The stored permit must not let the loop pull another step
        assert_silent(&mut rx).await;
        assert_eq!(ctl.state(), PlaybackState::Paused);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_pause() {
        let (ctl, mut rx) = controller();
        ctl.start(&[3, 1, 2], Algorithm::Insertion).unwrap();
        next_step(&mut rx).await;

        assert!(ctl.toggle_pause());
        assert_eq!(ctl.state(), PlaybackState::Paused);
        assert!(ctl.toggle_pause());
        assert_eq!(ctl.state(), PlaybackState::Running);

        let (_, end) = drain(&mut rx).await;
        assert_eq!(end, RenderEvent::Finished);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_while_running() {
        let (ctl, mut rx) = controller();
        let run = ctl.start(&[9, 8, 7, 6, 5, 4], Algorithm::Insertion).unwrap();
        next_step(&mut rx).await;

        assert!(ctl.cancel());
        assert_eq!(ctl.state(), PlaybackState::Idle);
        assert_silent(&mut rx).await;

        let report = ctl.last_report().unwrap();
        assert_eq!(report.run, run);
        assert_eq!(report.outcome, RunOutcome::Cancelled);
        assert_eq!(report.steps, 1);

        assert!(ctl.start(&[2, 1], Algorithm::Bubble).is_some());
        let (_, end) = drain(&mut rx).await;
        assert_eq!(end, RenderEvent::Finished);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_unblocks_pause() {
        let (ctl, mut rx) = controller();
        ctl.start(&[4, 3, 2, 1], Algorithm::Heap).unwrap();
        next_step(&mut rx).await;
        assert!(ctl.pause());

        assert!(ctl.cancel());
        assert_eq!(ctl.state(), PlaybackState::Idle);
        assert!(!ctl.resume());
        assert_silent(&mut rx).await;

        assert!(ctl.start(&[1], Algorithm::Quick).is_some());
        let (steps, end) = drain(&mut rx).await;
        assert!(steps.is_empty());
        assert_eq!(end, RenderEvent::Finished);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_first_pull_renders_nothing() {
        let (ctl, mut rx) = controller();
        ctl.start(&[5, 4, 3], Algorithm::Bubble).unwrap();
        assert!(ctl.cancel());
        assert_silent(&mut rx).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_from_completed_returns_to_idle() {
        let (ctl, mut rx) = controller();
        ctl.start(&[2, 1], Algorithm::Radix).unwrap();
        drain(&mut rx).await;
        assert_eq!(ctl.state(), PlaybackState::Completed);

        assert!(ctl.cancel());
        assert_eq!(ctl.state(), PlaybackState::Idle);
        // The completed run's report is kept
        assert_eq!(ctl.last_report().unwrap().outcome, RunOutcome::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_observe_transitions() {
        let (ctl, mut rx) = controller();
        let mut states = ctl.subscribe();
        assert_eq!(*states.borrow(), PlaybackState::Idle);

        ctl.start(&[3, 2, 1], Algorithm::Selection).unwrap();
        states.changed().await.unwrap();
        assert_eq!(*states.borrow_and_update(), PlaybackState::Running);

        drain(&mut rx).await;
        assert_eq!(ctl.settled().await, PlaybackState::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_waits_for_run_end() {
        let (ctl, mut rx) = controller();
        ctl.start(&[2, 1], Algorithm::Bubble).unwrap();

        let mut settled = tokio_test::task::spawn(ctl.settled());
        tokio_test::assert_pending!(settled.poll());

        drain(&mut rx).await;
        assert!(settled.is_woken());
        assert_eq!(
            tokio_test::assert_ready!(settled.poll()),
            PlaybackState::Completed
        );
    }

    /// Restarts the controller from inside `on_finished`, once
    struct Restarting {
        ctl: Mutex<Option<PlaybackController>>,
        seen: mpsc::UnboundedSender<(PlaybackState, Option<RunId>)>,
    }

    impl Renderer for Restarting {
        fn on_input(&self, _input: &crate::sequence::Sequence) {}

        fn on_step(&self, _step: &Step) {}

        fn on_finished(&self) {
            let Some(ctl) = self.ctl.lock().take() else {
                return;
            };
            let state = ctl.state();
            let next = ctl.start(&[2, 1], Algorithm::Bubble);
            let _ = self.seen.send((state, next));
        }

        fn on_error(&self, _error: &PlaybackError) {}
    }

    #[tokio::test(start_paused = true)]
    async fn test_on_finished_can_restart_the_controller() {
        let (seen_tx, mut seen_rx) = mpsc::unbounded_channel();
        let renderer = Arc::new(Restarting {
            ctl: Mutex::new(None),
            seen: seen_tx,
        });
        let ctl = PlaybackController::new(PlaybackConfig::default(), renderer.clone());
        *renderer.ctl.lock() = Some(ctl.clone());

        let first = ctl.start(&[3, 1, 2], Algorithm::Insertion).unwrap();
        let (state, next) = timeout(Duration::from_secs(60), seen_rx.recv())
            .await
            .expect("on_finished never returned")
            .unwrap();
        assert_eq!(state, PlaybackState::Completed);

        let next = next.unwrap();
        assert!(next > first);
        assert_eq!(ctl.settled().await, PlaybackState::Completed);
        assert_eq!(ctl.last_report().map(|r| r.run), Some(next));
    }
}
