//! Terminal output for render events
//!
//! Each event becomes one line: a row of block glyphs whose heights follow
//! the values, or the event itself as JSON.

use anyhow::Result;
use sortviz_core::{InputLimits, RenderEvent, Value};

const GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Height of `value` as a percentage of the `[min, max]` range
pub fn normalize(value: Value, min: Value, max: Value) -> f64 {
    if max <= min {
        return 100.0;
    }
    // Wide ranges overflow i64
    let offset = i128::from(value) - i128::from(min);
    let span = i128::from(max) - i128::from(min);
    #[allow(clippy::cast_precision_loss)]
    let percent = offset as f64 / span as f64 * 100.0;
    percent.clamp(0.0, 100.0)
}

fn glyph(percent: f64) -> char {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = (percent / 100.0 * (GLYPHS.len() - 1) as f64).round() as usize;
    GLYPHS[index.min(GLYPHS.len() - 1)]
}

/// Formats render events for a terminal
#[derive(Clone, Copy, Debug)]
pub struct LinePrinter {
    limits: InputLimits,
    json: bool,
}

impl LinePrinter {
    pub fn new(limits: InputLimits, json: bool) -> Self {
        Self { limits, json }
    }

    /// One row of bars
    pub fn bars(&self, values: &[Value]) -> String {
        values
            .iter()
            .map(|&v| glyph(normalize(v, self.limits.min_value, self.limits.max_value)))
            .collect()
    }

    /// The output line for `event`
    pub fn line(&self, event: &RenderEvent) -> Result<String> {
        if self.json {
            return Ok(serde_json::to_string(event)?);
        }
        Ok(match event {
            RenderEvent::Input { values } => format!("input {}", self.bars(values)),
            RenderEvent::Step { values } => format!("      {}", self.bars(values)),
            RenderEvent::Finished => "done".to_string(),
            RenderEvent::Failed { error } => format!("failed: {error}"),
        })
    }
}
