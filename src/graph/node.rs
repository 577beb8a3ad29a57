/// Context passed to graph nodes during rendering
///
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - time: Audio time of the first sample in the block, in seconds
///
/// Automation is scheduled in absolute audio time, so nodes evaluate their
/// parameters at `time_at(i)` for sample `i` of the block.
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub time: f64,
}

impl RenderCtx {
    pub fn new(sample_rate: f32, time: f64) -> Self {
        Self { sample_rate, time }
    }

    /// Audio time of sample `index` within the current block.
    #[inline]
    pub fn time_at(&self, index: usize) -> f64 {
        self.time + index as f64 / self.sample_rate as f64
    }

    /// Context for the block that starts `frames` samples later.
    pub fn advanced(&self, frames: usize) -> Self {
        Self {
            sample_rate: self.sample_rate,
            time: self.time_at(frames),
        }
    }
}

/// Core trait for audio processing graph nodes
///
/// A node either generates a signal (oscillators, noise) or transforms the
/// signal already in `out` in place (filters, gain stages, delays).
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Triggered when the node starts sounding
    ///
    /// Nodes with their own fixed schedule (drum sweeps, noise bursts) arm
    /// their automation here, relative to `ctx.time`.
    fn note_on(&mut self, _ctx: &RenderCtx) {
        // Default: do nothing
    }

    /// Check if this node is still producing sound
    ///
    /// Used by voice management to know when a voice can be freed.
    fn is_active(&self) -> bool {
        true
    }
}

/// Allow boxed graph nodes to be used as graph nodes (for dynamic dispatch)
impl GraphNode for Box<dyn GraphNode> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render_block(out, ctx)
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        (**self).note_on(ctx)
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_at_steps_by_sample_period() {
        let ctx = RenderCtx::new(1_000.0, 2.0);
        assert!((ctx.time_at(0) - 2.0).abs() < 1e-12);
        assert!((ctx.time_at(500) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn advanced_moves_block_start() {
        let ctx = RenderCtx::new(48_000.0, 0.0).advanced(480);
        assert!((ctx.time - 0.01).abs() < 1e-12);
    }
}
