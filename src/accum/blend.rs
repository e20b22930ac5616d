use rayon::prelude::*;

use crate::foundation::core::{ImageF32, Rgba};
use crate::foundation::error::{ProgressaError, ProgressaResult};
use crate::frame::AccumFrame;

/// `(history, new)` weights for a frame; they always sum to one.
pub fn blend_weights(frame: AccumFrame) -> (f32, f32) {
    match frame {
        AccumFrame::Index(0) => (0.0, 1.0),
        AccumFrame::Index(k) => {
            let k = k as f32;
            (k / (k + 1.0), 1.0 / (k + 1.0))
        }
        AccumFrame::Converged => (1.0, 0.0),
    }
}

fn mix(history: Rgba, new: Rgba, (wh, wn): (f32, f32)) -> Rgba {
    [
        history[0] * wh + new[0] * wn,
        history[1] * wh + new[1] * wn,
        history[2] * wh + new[2] * wn,
        history[3] * wh + new[3] * wn,
    ]
}

/// Running-average blend of `new` into `history`.
///
/// Frame 0 returns `new` unchanged and a converged frame returns `history` unchanged.
pub fn blend(new: &ImageF32, history: &ImageF32, frame: AccumFrame) -> ProgressaResult<ImageF32> {
    if !new.same_size(history) {
        return Err(ProgressaError::validation(format!(
            "blend expects equal-size images ({}x{} vs {}x{})",
            new.width, new.height, history.width, history.height
        )));
    }
    match frame {
        AccumFrame::Index(0) => Ok(new.clone()),
        AccumFrame::Converged => Ok(history.clone()),
        AccumFrame::Index(_) => {
            let w = blend_weights(frame);
            let data = history
                .data
                .par_iter()
                .zip(new.data.par_iter())
                .map(|(&h, &n)| mix(h, n, w))
                .collect();
            ImageF32::from_pixels(new.width, new.height, data)
        }
    }
}

/// Persisted history image owned by the blend stage.
#[derive(Clone, Debug, Default)]
pub struct AccumulationBuffer {
    history: Option<ImageF32>,
}

impl AccumulationBuffer {
    /// Empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Blend `new` into the history in place and return the result.
    ///
    /// A missing or differently sized history is replaced outright, whatever the frame.
    pub fn accumulate(&mut self, new: &ImageF32, frame: AccumFrame) -> &ImageF32 {
        let history = match self.history.take() {
            Some(h) if h.same_size(new) && frame != AccumFrame::Index(0) => {
                let mut h = h;
                if frame != AccumFrame::Converged {
                    let w = blend_weights(frame);
                    h.data
                        .par_iter_mut()
                        .zip(new.data.par_iter())
                        .for_each(|(h, &n)| *h = mix(*h, n, w));
                }
                h
            }
            _ => new.clone(),
        };
        self.history.insert(history)
    }

    /// Current history, if any frame was accumulated since the last clear.
    pub fn history(&self) -> Option<&ImageF32> {
        self.history.as_ref()
    }

    /// Drop the history, e.g. after a resize.
    pub fn clear(&mut self) {
        self.history = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/accum/blend.rs"]
mod tests;
