use crate::graph::node::{GraphNode, RenderCtx};

/*
Serial Signal Chain (Through)
=============================

Through connects two nodes in series, passing the output of the first (source)
into the second (effect). This is the fundamental building block for creating
signal processing chains like: noise → high-pass → gain.

How It Works:
-------------
1. Render the source into the output buffer
2. Pass that buffer through the effect (in-place processing)

  Source renders:  [0.5, 0.8, -0.3, 0.9, ...]
  Effect processes in-place (e.g., filter)
  Final output:    [0.4, 0.6, -0.2, 0.7, ...]  (filtered result)

Common Use Cases:
-----------------

  // Snare body: 200 ms of noise with the lows removed
  let snare = NoiseNode::burst(0.2, seed)
      .through(FilterNode::highpass(1_000.0));

  // Two 12dB filters = 24dB/octave rolloff
  let steep = source
      .through(FilterNode::lowpass(2000.0))
      .through(FilterNode::lowpass(2000.0));

Signal Flow Diagram:
--------------------
  Through: [Source] ──→ [Effect] ──→ output

A chain is active while its source is: a noise burst feeding a filter
keeps the voice alive until the burst ends.
*/

pub struct Through<S, F> {
    source: S,
    filter: F,
}

impl<S, F> Through<S, F> {
    pub fn new(source: S, filter: F) -> Self {
        Self { source, filter }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }
}

impl<S: GraphNode, F: GraphNode> GraphNode for Through<S, F> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.filter.render_block(out, ctx);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.source.note_on(ctx);
        self.filter.note_on(ctx);
    }

    fn is_active(&self) -> bool {
        self.source.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{
        extensions::NodeExt, filter::FilterNode, gain::GainNode, noise::NoiseNode,
        oscillator::OscNode,
    };

    fn ctx() -> RenderCtx {
        RenderCtx::new(48_000.0, 0.0)
    }

    #[test]
    fn renders_source_then_filter() {
        let mut node = OscNode::sine(440.0).through(GainNode::new(0.5));
        let mut buffer = vec![1.0; 128];
        node.render_block(&mut buffer, &ctx());

        assert!(buffer.iter().all(|&s| s.abs() <= 0.5 + 1e-6));
        assert!(buffer.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn forwards_note_on_to_source() {
        let mut node = NoiseNode::burst(0.01, 3).through(FilterNode::highpass(1_000.0));
        assert!(!node.is_active());
        node.note_on(&ctx());
        assert!(node.is_active(), "burst should be armed by note_on");
    }

    #[test]
    fn goes_idle_when_source_finishes() {
        let mut node = NoiseNode::burst(0.001, 3).through(FilterNode::highpass(1_000.0));
        node.note_on(&ctx());
        let mut buffer = vec![0.0; 128];
        node.render_block(&mut buffer, &ctx());
        assert!(!node.is_active());
    }
}
