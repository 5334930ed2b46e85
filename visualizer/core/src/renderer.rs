//! Renderer Boundary
//!
//! The engine never paints anything. It pushes inputs, steps and run outcomes
//! to a [`Renderer`], which may draw bars, forward to a UI thread, or record
//! what it sees for tests.
//!
//! `on_step` is invoked while the playback controller holds its internal
//! lock, so it must return quickly and must not call back into the
//! controller. `on_finished` and `on_error` run after the lock is released
//! and may query or restart the controller. A channel-backed renderer ([`RenderEvent`] over an unbounded
//! mpsc sender) is provided for surfaces that do real work per frame.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::PlaybackError;
use crate::sequence::{Sequence, Step};

/// Receiver of everything a visualisation surface needs to paint
pub trait Renderer: Send + Sync + 'static {
    /// A freshly generated, unsorted input
    fn on_input(&self, input: &Sequence);

    /// The next intermediate state of the running sort
    fn on_step(&self, step: &Step);

    /// The run delivered its last step and passed validation
    fn on_finished(&self);

    /// The run was aborted because the algorithm misbehaved
    fn on_error(&self, error: &PlaybackError);
}

/// Renderer callbacks as a message, for channel-based surfaces
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RenderEvent {
    /// See [`Renderer::on_input`]
    Input {
        /// The new input
        values: Sequence,
    },
    /// See [`Renderer::on_step`]
    Step {
        /// The intermediate state
        values: Step,
    },
    /// See [`Renderer::on_finished`]
    Finished,
    /// See [`Renderer::on_error`]
    Failed {
        /// Human-readable failure
        error: String,
    },
}

impl Renderer for mpsc::UnboundedSender<RenderEvent> {
    fn on_input(&self, input: &Sequence) {
        // A closed receiver means the surface went away; nothing to paint
        let _ = self.send(RenderEvent::Input {
            values: input.clone(),
        });
    }

    fn on_step(&self, step: &Step) {
        let _ = self.send(RenderEvent::Step {
            values: step.clone(),
        });
    }

    fn on_finished(&self) {
        let _ = self.send(RenderEvent::Finished);
    }

    fn on_error(&self, error: &PlaybackError) {
        let _ = self.send(RenderEvent::Failed {
            error: error.to_string(),
        });
    }
}

/// Renderer that discards everything (headless runs)
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn on_input(&self, _input: &Sequence) {}

    fn on_step(&self, _step: &Step) {}

    fn on_finished(&self) {}

    fn on_error(&self, _error: &PlaybackError) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_renderer_forwards_events() {
        let (tx, mut rx) = mpsc::unbounded_channel::<RenderEvent>();
        tx.on_input(&Sequence::new(vec![2, 1]));
        tx.on_step(&Step::from(vec![1, 2]));
        tx.on_finished();

        assert_eq!(
            rx.try_recv().unwrap(),
            RenderEvent::Input {
                values: Sequence::new(vec![2, 1])
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            RenderEvent::Step {
                values: Step::from(vec![1, 2])
            }
        );
        assert_eq!(rx.try_recv().unwrap(), RenderEvent::Finished);
    }

    #[test]
    fn test_channel_renderer_ignores_closed_receiver() {
        let (tx, rx) = mpsc::unbounded_channel::<RenderEvent>();
        drop(rx);
        tx.on_finished();
    }

    #[test]
    fn test_render_event_json_shape() {
        let json = serde_json::to_string(&RenderEvent::Step {
            values: Step::from(vec![3, 4]),
        })
        .unwrap();
        assert_eq!(json, r#"{"event":"step","values":[3,4]}"#);
    }
}
