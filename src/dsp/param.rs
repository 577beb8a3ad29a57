/*
Automatable Parameters
======================

Every knob the control side can turn (oscillator frequency, voice gain,
filter cutoff, delay time, master volume) is an `AudioParam`. Instead of
jumping to a new value, the control side schedules *events* on a small
timeline and the render side evaluates the timeline at audio time.

Events
------

  Set           value jumps at `time`
  Linear        straight line from the previous event to (`time`, value)
  Exponential   constant-ratio curve from the previous event to (`time`, value)
  Target        first-order approach toward a value, starting at `time`,
                with time constant tau. Stays active until a later event
                starts. This is what "smoothing" means everywhere in the
                engine: portamento, filter sweeps, master volume.

  value
    1.0 ┐        ╱‾‾‾‾‾‾‾╲
        │       ╱         ╲_
        │      ╱            ‾‾--__
    0.0 └─────╱─────────────────────→ time
          Set  Linear   Exponential

Exponential ramps cannot cross or touch zero (the ratio is undefined), so
envelopes ramp toward a small floor such as 0.001 instead of 0.0.

The timeline has a fixed capacity reserved at construction. Scheduling never
allocates, which keeps it safe to call from the render thread.
*/

const DEFAULT_CAPACITY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ParamEvent {
    Set { time: f64, value: f32 },
    Linear { time: f64, value: f32 },
    Exponential { time: f64, value: f32 },
    Target { time: f64, value: f32, tau: f32 },
}

impl ParamEvent {
    fn time(&self) -> f64 {
        match *self {
            ParamEvent::Set { time, .. }
            | ParamEvent::Linear { time, .. }
            | ParamEvent::Exponential { time, .. }
            | ParamEvent::Target { time, .. } => time,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AudioParam {
    value: f32,
    min: f32,
    max: f32,
    // Start point of the segment currently being rendered
    anchor_time: f64,
    anchor_value: f32,
    // Active first-order approach: (target, tau)
    target: Option<(f32, f32)>,
    events: Vec<ParamEvent>,
}

impl AudioParam {
    pub fn new(value: f32) -> Self {
        Self::with_range(value, f32::MIN, f32::MAX)
    }

    pub fn with_range(value: f32, min: f32, max: f32) -> Self {
        let value = value.clamp(min, max);
        Self {
            value,
            min,
            max,
            anchor_time: 0.0,
            anchor_value: value,
            target: None,
            events: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Current value (the last one produced by `advance`).
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Jump immediately, discarding every scheduled event.
    pub fn set_value(&mut self, value: f32) {
        self.events.clear();
        self.target = None;
        self.value = value.clamp(self.min, self.max);
        self.anchor_value = self.value;
    }

    pub fn set_value_at(&mut self, value: f32, time: f64) {
        self.insert(ParamEvent::Set { time, value });
    }

    pub fn linear_ramp_to(&mut self, value: f32, end_time: f64) {
        self.insert(ParamEvent::Linear {
            time: end_time,
            value,
        });
    }

    pub fn exponential_ramp_to(&mut self, value: f32, end_time: f64) {
        self.insert(ParamEvent::Exponential {
            time: end_time,
            value,
        });
    }

    /// Approach `value` exponentially from `start_time` with time constant `tau`.
    pub fn set_target_at(&mut self, value: f32, start_time: f64, tau: f32) {
        self.insert(ParamEvent::Target {
            time: start_time,
            value,
            tau: tau.max(crate::MIN_TIME),
        });
    }

    /// Drop all pending automation and hold the last rendered value from `time`.
    pub fn cancel_and_hold(&mut self, time: f64) {
        self.events.clear();
        self.target = None;
        self.anchor_time = time;
        self.anchor_value = self.value;
    }

    /// True when no ramp or approach is in flight.
    pub fn is_settled(&self) -> bool {
        self.events.is_empty() && self.target.is_none()
    }

    fn insert(&mut self, event: ParamEvent) {
        if self.events.len() >= DEFAULT_CAPACITY {
            // Full timeline: the newest event wins over the oldest pending one
            self.events.remove(0);
        }
        let idx = self
            .events
            .iter()
            .position(|e| e.time() > event.time())
            .unwrap_or(self.events.len());
        self.events.insert(idx, event);
    }

    /// Evaluate the timeline at time `t` (seconds) and return the value.
    pub fn advance(&mut self, t: f64) -> f32 {
        while let Some(&event) = self.events.first() {
            match event {
                ParamEvent::Set { time, value } => {
                    if time > t {
                        break;
                    }
                    self.events.remove(0);
                    self.target = None;
                    self.anchor_time = time;
                    self.anchor_value = value;
                    self.value = value;
                }
                ParamEvent::Target { time, value, tau } => {
                    if time > t {
                        break;
                    }
                    self.events.remove(0);
                    self.anchor_time = time;
                    self.anchor_value = self.value;
                    self.target = Some((value, tau));
                }
                ParamEvent::Linear { time, value } | ParamEvent::Exponential { time, value } => {
                    if self.target.take().is_some() {
                        // Ramp out of an approach from wherever it got to
                        self.anchor_time = t;
                        self.anchor_value = self.value;
                    }

                    if time <= t {
                        self.events.remove(0);
                        self.anchor_time = time;
                        self.anchor_value = value;
                        self.value = value;
                        continue;
                    }

                    let span = time - self.anchor_time;
                    let progress = if span > 0.0 {
                        ((t - self.anchor_time) / span).clamp(0.0, 1.0) as f32
                    } else {
                        1.0
                    };
                    let start = self.anchor_value;
                    self.value = if matches!(event, ParamEvent::Linear { .. }) {
                        start + (value - start) * progress
                    } else if start * value > 0.0 {
                        start * (value / start).powf(progress)
                    } else {
                        start
                    };
                    self.value = self.value.clamp(self.min, self.max);
                    return self.value;
                }
            }
        }

        if let Some((target, tau)) = self.target {
            let elapsed = (t - self.anchor_time).max(0.0) as f32;
            let decay = (-elapsed / tau).exp();
            self.value = target + (self.anchor_value - target) * decay;
        }

        self.value = self.value.clamp(self.min, self.max);
        self.value
    }
}
