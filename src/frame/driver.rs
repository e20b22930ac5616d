use crate::kernel::SampleKernel;

/// Counters for one progressive sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FrameState {
    /// Accumulation index, saturating at `max_frames`.
    pub frame: u32,
    /// Accumulation budget.
    pub max_frames: u32,
    /// Paints since the last reset; never saturates.
    pub sample: u64,
}

impl FrameState {
    /// Return `true` once the budget is exhausted.
    pub fn is_converged(&self) -> bool {
        self.frame >= self.max_frames
    }
}

/// Frame index as seen by the blend stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccumFrame {
    /// Blend with weight `1 / (k + 1)`; `0` replaces history.
    Index(u32),
    /// Budget exhausted; new frames carry no weight.
    Converged,
}

/// Owns [`FrameState`] for the render loop.
#[derive(Clone, Debug)]
pub struct FrameDriver {
    state: FrameState,
}

impl FrameDriver {
    /// Fresh driver at frame 0. `max_frames` is clamped to at least 1.
    pub fn new(max_frames: u32) -> Self {
        Self {
            state: FrameState {
                frame: 0,
                max_frames: max_frames.max(1),
                sample: 0,
            },
        }
    }

    /// Current counters.
    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Accumulation index.
    pub fn frame(&self) -> u32 {
        self.state.frame
    }

    /// Running sample index used for kernel lookups.
    pub fn sample_index(&self) -> u64 {
        self.state.sample
    }

    /// Change the budget; a frame past the new budget is pulled back onto it.
    pub fn set_max_frames(&mut self, max_frames: u32) {
        self.state.max_frames = max_frames.max(1);
        self.state.frame = self.state.frame.min(self.state.max_frames);
    }

    /// Step after a frame has been rendered and blended.
    ///
    /// `frame` stops at `max_frames`; `sample` keeps counting.
    pub fn advance(&mut self) -> FrameState {
        if self.state.frame < self.state.max_frames {
            self.state.frame += 1;
        }
        self.state.sample = self.state.sample.wrapping_add(1);
        self.state
    }

    /// Restart the sequence.
    pub fn reset(&mut self) {
        if self.state.frame != 0 || self.state.sample != 0 {
            tracing::debug!(frame = self.state.frame, "accumulation reset");
        }
        self.state.frame = 0;
        self.state.sample = 0;
    }

    /// What the blend stage should do with the frame about to be rendered.
    pub fn accumulation_frame(&self) -> AccumFrame {
        if self.state.is_converged() {
            AccumFrame::Converged
        } else {
            AccumFrame::Index(self.state.frame)
        }
    }

    /// Kernel slot for the current sample (`sample mod len`); `None` for an empty kernel.
    pub fn kernel_slot(&self, kernel: &SampleKernel) -> Option<usize> {
        kernel.slot(self.state.sample)
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(128)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/driver.rs"]
mod tests;
