use crate::dsp::distortion::{fill_drive_curve, shape_buffer, CURVE_LEN};
use crate::graph::node::{GraphNode, RenderCtx};

/*
Distortion Node
===============

Adds harmonics and grit by passing the signal through a transfer curve.
The curve is a lookup table regenerated whenever the drive changes:

  f(x) = (π + k)·x / (π + k·|x|),   k = 10 × drive

Drive (0.0 - 1.0):
  0.0 = clean (identity curve)
  0.3 = warm saturation
  1.0 = heavy compression toward ±1

  out
   1 ┤          ___----‾‾‾‾   drive 1.0
     │      _-‾‾   __--‾‾‾‾   drive 0.3
     │    /  _--‾‾
   0 ┼───/─/────────────→ in
     │  //
  -1 ┤ /
     -1        0        1

The table is allocated once; changing drive rewrites it in place.
*/

pub struct DistortionNode {
    curve: Box<[f32]>,
    drive: f32,
}

impl DistortionNode {
    pub fn new(drive: f32) -> Self {
        let drive = drive.clamp(0.0, 1.0);
        let mut curve = vec![0.0f32; CURVE_LEN].into_boxed_slice();
        fill_drive_curve(&mut curve, drive);
        Self { curve, drive }
    }

    pub fn drive(&self) -> f32 {
        self.drive
    }

    /// Regenerate the curve for a new drive amount.
    pub fn set_drive(&mut self, drive: f32) {
        let drive = drive.clamp(0.0, 1.0);
        if drive != self.drive {
            self.drive = drive;
            fill_drive_curve(&mut self.curve, drive);
        }
    }

    pub fn curve(&self) -> &[f32] {
        &self.curve
    }
}

impl GraphNode for DistortionNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        shape_buffer(out, &self.curve);
    }
}
