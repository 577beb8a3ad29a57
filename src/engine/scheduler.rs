use crate::synth::voice::{NoteId, VoiceKey};

/// Work the control context defers to a later audio time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Deferred {
    /// Remove a released voice once its release ramp has run out.
    Teardown { id: NoteId, key: VoiceKey },
}

impl Deferred {
    fn key(&self) -> VoiceKey {
        match *self {
            Deferred::Teardown { key, .. } => key,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    due: f64,
    action: Deferred,
}

/// Audio-time timeline of deferred actions.
///
/// At most one action is pending per voice: enqueueing for a voice that
/// already has one replaces it.
#[derive(Debug, Default)]
pub struct Scheduler {
    pending: Vec<Scheduled>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, due: f64, action: Deferred) {
        let key = action.key();
        self.pending.retain(|s| s.action.key() != key);
        let idx = self
            .pending
            .iter()
            .position(|s| s.due > due)
            .unwrap_or(self.pending.len());
        self.pending.insert(idx, Scheduled { due, action });
    }

    /// Drop whatever is pending for `key`.
    pub fn cancel(&mut self, key: VoiceKey) {
        self.pending.retain(|s| s.action.key() != key);
    }

    /// Take every action due at or before `now`, earliest first.
    pub fn tick(&mut self, now: f64) -> Vec<Deferred> {
        let due = self.pending.iter().take_while(|s| s.due <= now).count();
        self.pending.drain(..due).map(|s| s.action).collect()
    }

    pub fn next_due(&self) -> Option<f64> {
        self.pending.first().map(|s| s.due)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
