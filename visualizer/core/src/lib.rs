//! Sortviz Core - Headless Stepwise Sorting Engine
//!
//! This crate turns sorting algorithms into paced streams of intermediate
//! states that any surface can paint as bars. It has no terminal or GUI
//! dependencies: a surface implements [`Renderer`] (or listens on a
//! [`RenderEvent`] channel) and drives the engine through [`Visualizer`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Surfaces                               │
//! │   ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐  │
//! │   │ Terminal bars│   │  JSON lines  │   │  Tests / headless│  │
//! │   └──────┬───────┘   └──────┬───────┘   └────────┬─────────┘  │
//! │          └──────────────────┼────────────────────┘            │
//! │               Renderer callbacks / RenderEvent                │
//! └─────────────────────────────┼─────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────┼─────────────────────────────────┐
//! │                      SORTVIZ CORE                             │
//! │   ┌─────────────────────────┴───────────────────────────┐     │
//! │   │                    Visualizer                        │     │
//! │   │  ┌───────────────┐ ┌────────────────┐ ┌───────────┐  │     │
//! │   │  │ RunConfig     │ │ Playback       │ │ Debouncer │  │     │
//! │   │  │ (input, size) │ │ Controller     │ │ (resize)  │  │     │
//! │   │  └───────────────┘ └───────┬────────┘ └───────────┘  │     │
//! │   └────────────────────────────┼─────────────────────────┘     │
//! │                   ┌────────────┴────────────┐                  │
//! │                   │  StepProducer (8 algos) │                  │
//! │                   └─────────────────────────┘                  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Algorithm`]: The closed set of supported sorts
//! - [`StepProducer`]: Lazy iterator of [`Step`]s for one run
//! - [`PlaybackController`]: Paces a producer, with pause/resume/cancel
//! - [`RunConfiguration`]: Owns the input and regenerates it on resize
//! - [`Visualizer`]: Session facade with a debounced resize
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use sortviz_core::{Algorithm, Visualizer, VisualizerConfig, RenderEvent};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (tx, mut rx) = mpsc::unbounded_channel::<RenderEvent>();
//!     let viz = Visualizer::new(&VisualizerConfig::default(), Arc::new(tx));
//!
//!     viz.start(Algorithm::Quick);
//!     while let Some(event) = rx.recv().await {
//!         // Paint the event
//!         if matches!(event, RenderEvent::Finished | RenderEvent::Failed { .. }) {
//!             break;
//!         }
//!     }
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`algorithms`]: Stepwise producers for every supported sort
//! - [`sequence`]: Input and step value types, ordering checks
//! - [`playback`]: Controller state machine and the pull loop
//! - [`run_config`]: Input size clamping and regeneration
//! - [`debounce`]: Trailing-edge debouncing of rapid input
//! - [`visualizer`]: Session facade
//! - [`renderer`]: The surface boundary
//! - [`config`]: TOML, environment and CLI configuration
//! - [`error`]: Error types

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod algorithms;
pub mod config;
pub mod debounce;
pub mod error;
pub mod playback;
pub mod renderer;
pub mod run_config;
pub mod sequence;
pub mod visualizer;

pub use algorithms::{Algorithm, StepProducer};
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigError, ConfigOverrides,
    ConfigSource, VisualizerConfig,
};
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use error::{PlaybackError, UnknownAlgorithm};
pub use playback::{
    PlaybackConfig, PlaybackController, PlaybackState, RunId, RunOutcome, RunReport,
    DEFAULT_STEP_DELAY,
};
pub use renderer::{NullRenderer, RenderEvent, Renderer};
pub use run_config::{InputLimits, RunConfiguration};
pub use sequence::{Sequence, Step, Value};
pub use visualizer::Visualizer;
