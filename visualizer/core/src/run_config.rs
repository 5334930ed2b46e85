//! Run Configuration
//!
//! Owns the current input (its size and value range) and regenerates it when
//! the size changes. Regeneration always cancels the controller first, so a
//! stale run can never paint over freshly generated bars.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::algorithms::Algorithm;
use crate::playback::{PlaybackController, RunId};
use crate::renderer::Renderer;
use crate::sequence::{Sequence, Value};

/// Bounds for generated inputs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputLimits {
    /// Smallest allowed number of bars
    pub min_bars: usize,
    /// Largest allowed number of bars
    pub max_bars: usize,
    /// Smallest generated value
    pub min_value: Value,
    /// Largest generated value
    pub max_value: Value,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            min_bars: 5,
            max_bars: 50,
            min_value: 5,
            max_value: 1000,
        }
    }
}

impl InputLimits {
    /// Clamp a requested size into `[min_bars, max_bars]`
    #[must_use]
    pub fn clamp_size(&self, requested: i64) -> usize {
        let min = i64::try_from(self.min_bars).unwrap_or(i64::MAX);
        let max = i64::try_from(self.max_bars).unwrap_or(i64::MAX);
        let clamped = requested.max(min).min(max);
        usize::try_from(clamped).unwrap_or(self.min_bars)
    }

    /// Read a requested size from raw user text (not yet clamped)
    ///
    /// Text that is not a non-zero integer falls back to `max_bars`.
    #[must_use]
    pub fn parse_size(&self, text: &str) -> i64 {
        match text.trim().parse::<i64>() {
            Ok(n) if n != 0 => n,
            _ => {
                warn!(input = text, "Unreadable bar count, using the maximum");
                i64::try_from(self.max_bars).unwrap_or(i64::MAX)
            }
        }
    }
}

/// Current input plus the rules for regenerating it
pub struct RunConfiguration {
    limits: InputLimits,
    size: usize,
    input: Sequence,
    rng: StdRng,
    controller: PlaybackController,
    renderer: Arc<dyn Renderer>,
}

impl RunConfiguration {
    /// Create a configuration with `initial_size` bars (clamped)
    ///
    /// The initial input is generated and rendered immediately. A `seed`
    /// makes every generated input reproducible.
    pub fn new(
        limits: InputLimits,
        initial_size: usize,
        seed: Option<u64>,
        controller: PlaybackController,
    ) -> Self {
        let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let size = limits.clamp_size(i64::try_from(initial_size).unwrap_or(i64::MAX));
        let input = Sequence::random(size, limits.min_value, limits.max_value, &mut rng);
        let renderer = controller.renderer();

        renderer.on_input(&input);

        Self {
            limits,
            size,
            input,
            rng,
            controller,
            renderer,
        }
    }

    /// Change the number of bars
    ///
    /// Clamps `requested`, cancels any run, regenerates the input and renders
    /// it. Returns the size that took effect.
    pub fn set_size(&mut self, requested: i64) -> usize {
        let size = self.limits.clamp_size(requested);
        if i64::try_from(size).ok() != Some(requested) {
            warn!(
                requested,
                clamped = size,
                min = self.limits.min_bars,
                max = self.limits.max_bars,
                "Bar count out of range, clamped"
            );
        }

        self.size = size;
        self.regenerate();
        info!(size, "Input resized");
        size
    }

    /// Change the number of bars from raw user text
    ///
    /// See [`InputLimits::parse_size`] for how the text is read.
    pub fn set_size_from_input(&mut self, text: &str) -> usize {
        let requested = self.limits.parse_size(text);
        self.set_size(requested)
    }

    /// Generate a fresh input of the current size and render it
    ///
    /// Cancels any run first.
    pub fn regenerate(&mut self) {
        if self.controller.cancel() {
            debug!("Cancelled run before regenerating input");
        }
        self.input = Sequence::random(
            self.size,
            self.limits.min_value,
            self.limits.max_value,
            &mut self.rng,
        );
        self.renderer.on_input(&self.input);
    }

    /// Start sorting the current input
    ///
    /// Returns `None` when a run is already active.
    pub fn start(&self, algorithm: Algorithm) -> Option<RunId> {
        self.controller.start(&self.input, algorithm)
    }

    /// The current input
    #[must_use]
    pub fn input(&self) -> &Sequence {
        &self.input
    }

    /// Current number of bars
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Bounds in effect
    #[must_use]
    pub fn limits(&self) -> &InputLimits {
        &self.limits
    }

    /// Controller this configuration coordinates with
    #[must_use]
    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }
}

impl std::fmt::Debug for RunConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunConfiguration")
            .field("limits", &self.limits)
            .field("size", &self.size)
            .field("input", &self.input)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::{PlaybackConfig, PlaybackState, RunOutcome};
    use crate::renderer::RenderEvent;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn setup(seed: u64) -> (RunConfiguration, mpsc::UnboundedReceiver<RenderEvent>) {
        let (tx, rx) = mpsc::unbounded_channel::<RenderEvent>();
        let controller = PlaybackController::new(PlaybackConfig::default(), Arc::new(tx));
        let config = RunConfiguration::new(InputLimits::default(), 50, Some(seed), controller);
        (config, rx)
    }

    fn expect_input(rx: &mut mpsc::UnboundedReceiver<RenderEvent>) -> Sequence {
        match rx.try_recv() {
            Ok(RenderEvent::Input { values }) => values,
            other => panic!("expected input, got {other:?}"),
        }
    }

    #[test]
    fn test_clamp_size() {
        let limits = InputLimits::default();
        assert_eq!(limits.clamp_size(1), 5);
        assert_eq!(limits.clamp_size(-3), 5);
        assert_eq!(limits.clamp_size(5), 5);
        assert_eq!(limits.clamp_size(23), 23);
        assert_eq!(limits.clamp_size(50), 50);
        assert_eq!(limits.clamp_size(51), 50);
        assert_eq!(limits.clamp_size(i64::MAX), 50);
    }

    #[test]
    fn test_parse_size() {
        let limits = InputLimits::default();
        assert_eq!(limits.parse_size("12"), 12);
        assert_eq!(limits.parse_size("-2"), -2);
        assert_eq!(limits.parse_size(""), 50);
        assert_eq!(limits.parse_size("0"), 50);
        assert_eq!(limits.parse_size("4.5"), 50);
    }

    #[tokio::test]
    async fn test_initial_input_is_rendered() {
        let (config, mut rx) = setup(1);
        let rendered = expect_input(&mut rx);
        assert_eq!(&rendered, config.input());
        assert_eq!(config.size(), 50);
        assert!(config.input().iter().all(|v| (5..=1000).contains(v)));
    }

    #[tokio::test]
    async fn test_set_size_clamps_and_regenerates() {
        let (mut config, mut rx) = setup(2);
        expect_input(&mut rx);

        assert_eq!(config.set_size(3), 5);
        assert_eq!(expect_input(&mut rx).len(), 5);

        assert_eq!(config.set_size(80), 50);
        assert_eq!(expect_input(&mut rx).len(), 50);

        assert_eq!(config.set_size(17), 17);
        assert_eq!(config.input().len(), 17);
        assert_eq!(expect_input(&mut rx), *config.input());
    }

    #[tokio::test]
    async fn test_set_size_from_text() {
        let (mut config, _rx) = setup(3);
        assert_eq!(config.set_size_from_input("12"), 12);
        assert_eq!(config.set_size_from_input(" 7 "), 7);
        assert_eq!(config.set_size_from_input("lots"), 50);
        assert_eq!(config.set_size_from_input("0"), 50);
        assert_eq!(config.set_size_from_input("-4"), 5);
    }

    #[tokio::test]
    async fn test_seeded_inputs_are_reproducible() {
        let (a, _rx_a) = setup(11);
        let (b, _rx_b) = setup(11);
        assert_eq!(a.input(), b.input());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_cancels_active_run() {
        let (mut config, mut rx) = setup(4);
        expect_input(&mut rx);

        let run = config.start(Algorithm::Insertion).unwrap();
        match rx.recv().await {
            Some(RenderEvent::Step { .. }) => {}
            other => panic!("expected a step, got {other:?}"),
        }

        config.set_size(10);
        assert_eq!(config.controller().state(), PlaybackState::Idle);
        let report = config.controller().last_report().unwrap();
        assert_eq!(report.run, run);
        assert_eq!(report.outcome, RunOutcome::Cancelled);

        // Only the regenerated input follows; the stale run stays silent
        assert_eq!(expect_input(&mut rx).len(), 10);
        let waited = tokio::time::timeout(Duration::from_secs(10), rx.recv()).await;
        assert!(waited.is_err());

        // A new run starts immediately on the new input
        assert!(config.start(Algorithm::Bubble).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_while_paused() {
        let (mut config, mut rx) = setup(5);
        expect_input(&mut rx);

        config.start(Algorithm::Shell).unwrap();
        rx.recv().await;
        assert!(config.controller().pause());

        config.set_size(6);
        assert_eq!(config.controller().state(), PlaybackState::Idle);
        assert_eq!(expect_input(&mut rx).len(), 6);
    }

    #[tokio::test]
    async fn test_start_uses_current_input() {
        let (config, _rx) = setup(6);
        assert!(config.start(Algorithm::Radix).is_some());
        assert_eq!(config.start(Algorithm::Radix), None);
    }
}
