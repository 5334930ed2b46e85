//! Visualizer Session
//!
//! Ties the pieces together for an interactive surface: one
//! [`PlaybackController`], the [`RunConfiguration`] that owns the current
//! input, and a [`Debouncer`] that turns bursts of size requests into a
//! single regeneration.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::algorithms::Algorithm;
use crate::config::VisualizerConfig;
use crate::debounce::Debouncer;
use crate::playback::{PlaybackController, PlaybackState, RunId};
use crate::renderer::Renderer;
use crate::run_config::RunConfiguration;
use crate::sequence::Sequence;

/// An interactive sorting session
pub struct Visualizer {
    controller: PlaybackController,
    run_config: Arc<Mutex<RunConfiguration>>,
    resize: Debouncer<i64>,
}

impl Visualizer {
    /// Build a session and render its initial input
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: &VisualizerConfig, renderer: Arc<dyn Renderer>) -> Self {
        let controller = PlaybackController::new(config.playback.clone(), renderer);
        let run_config = Arc::new(Mutex::new(RunConfiguration::new(
            config.limits,
            config.initial_bars,
            config.seed,
            controller.clone(),
        )));

        let target = Arc::clone(&run_config);
        let resize = Debouncer::new(config.debounce, move |requested: i64| {
            target.lock().set_size(requested);
        });

        Self {
            controller,
            run_config,
            resize,
        }
    }

    /// Ask for a new bar count; only the last request of a burst applies
    pub fn request_size(&self, requested: i64) {
        debug!(requested, "Size change requested");
        self.resize.push(requested);
    }

    /// Debounced resize from raw user text
    ///
    /// See [`InputLimits::parse_size`](crate::run_config::InputLimits::parse_size).
    pub fn request_size_from_input(&self, text: &str) {
        let requested = self.run_config.lock().limits().parse_size(text);
        self.request_size(requested);
    }

    /// Resize immediately, bypassing the debounce. Returns the clamped size.
    pub fn set_size_now(&self, requested: i64) -> usize {
        self.run_config.lock().set_size(requested)
    }

    /// Regenerate the input at its current size
    pub fn shuffle(&self) {
        self.run_config.lock().regenerate();
    }

    /// Sort the current input with `algorithm`
    pub fn start(&self, algorithm: Algorithm) -> Option<RunId> {
        self.run_config.lock().start(algorithm)
    }

    /// Sort the current input with the algorithm called `name`
    ///
    /// Unknown names fall back to bubble sort.
    pub fn start_named(&self, name: &str) -> Option<RunId> {
        self.start(Algorithm::from_name_or_default(name))
    }

    /// See [`PlaybackController::pause`]
    pub fn pause(&self) -> bool {
        self.controller.pause()
    }

    /// See [`PlaybackController::resume`]
    pub fn resume(&self) -> bool {
        self.controller.resume()
    }

    /// See [`PlaybackController::toggle_pause`]
    pub fn toggle_pause(&self) -> bool {
        self.controller.toggle_pause()
    }

    /// See [`PlaybackController::cancel`]
    pub fn cancel(&self) -> bool {
        self.controller.cancel()
    }

    /// Current playback state
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.controller.state()
    }

    /// Copy of the current input
    #[must_use]
    pub fn input(&self) -> Sequence {
        self.run_config.lock().input().clone()
    }

    /// Current number of bars
    #[must_use]
    pub fn size(&self) -> usize {
        self.run_config.lock().size()
    }

    /// The underlying controller
    #[must_use]
    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }
}

impl std::fmt::Debug for Visualizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Visualizer")
            .field("controller", &self.controller)
            .field("run_config", &*self.run_config.lock())
            .finish_non_exhaustive()
    }
}
