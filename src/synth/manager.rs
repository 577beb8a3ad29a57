use std::collections::HashMap;

use crate::synth::voice::{NoteId, VoiceKey};
use crate::voices::{DrumKind, Family};

/// Control-side record of a sounding note.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveNote {
    pub id: NoteId,
    pub key: VoiceKey,
    pub family: Family,
    pub drum: Option<DrumKind>,
    pub frequency: f32,
    pub mod_x: f32,
    pub mod_y: f32,
    /// Audio time of note-off, once released.
    pub released_at: Option<f64>,
    /// Release length captured when the voice was built.
    pub release: Option<f32>,
}

impl ActiveNote {
    pub fn is_released(&self) -> bool {
        self.released_at.is_some()
    }

    pub fn is_drum(&self) -> bool {
        matches!(self.family, Family::Drums)
    }
}

/// Note id → voice table. Holds at most one voice per id.
#[derive(Debug, Default)]
pub struct VoiceManager {
    notes: HashMap<NoteId, ActiveNote>,
    next_key: u64,
}

impl VoiceManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            notes: HashMap::with_capacity(capacity),
            next_key: 0,
        }
    }

    /// Reserve a key for a voice about to be built.
    pub fn next_key(&mut self) -> VoiceKey {
        self.next_key += 1;
        VoiceKey(self.next_key)
    }

    /// Store `note`, returning the note it replaced for the same id.
    pub fn insert(&mut self, note: ActiveNote) -> Option<ActiveNote> {
        self.notes.insert(note.id, note)
    }

    pub fn get(&self, id: NoteId) -> Option<&ActiveNote> {
        self.notes.get(&id)
    }

    pub fn get_mut(&mut self, id: NoteId) -> Option<&mut ActiveNote> {
        self.notes.get_mut(&id)
    }

    pub fn remove(&mut self, id: NoteId) -> Option<ActiveNote> {
        self.notes.remove(&id)
    }

    /// Remove the note only if it is still the voice `key`; a newer voice
    /// for the same id stays.
    pub fn remove_if(&mut self, id: NoteId, key: VoiceKey) -> Option<ActiveNote> {
        match self.notes.get(&id) {
            Some(note) if note.key == key => self.notes.remove(&id),
            _ => None,
        }
    }

    /// Mark the note released at `time`. Returns the note the first time only.
    pub fn mark_released(&mut self, id: NoteId, time: f64) -> Option<&ActiveNote> {
        let note = self.notes.get_mut(&id)?;
        if note.released_at.is_some() {
            return None;
        }
        note.released_at = Some(time);
        Some(note)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::OscillatorWaveform;

    fn note(manager: &mut VoiceManager, id: NoteId) -> ActiveNote {
        ActiveNote {
            id,
            key: manager.next_key(),
            family: Family::Tonal(OscillatorWaveform::Sine),
            drum: None,
            frequency: 440.0,
            mod_x: 0.0,
            mod_y: 0.0,
            released_at: None,
            release: Some(0.3),
        }
    }

    #[test]
    fn one_voice_per_id() {
        let mut manager = VoiceManager::new();
        let first = note(&mut manager, 3);
        let second = note(&mut manager, 3);
        let first_key = first.key;

        assert!(manager.insert(first).is_none());
        let retired = manager.insert(second);

        assert_eq!(retired.map(|n| n.key), Some(first_key));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn stale_removal_keeps_newer_voice() {
        let mut manager = VoiceManager::new();
        let old = note(&mut manager, 1);
        let old_key = old.key;
        manager.insert(old);
        let new = note(&mut manager, 1);
        let new_key = new.key;
        manager.insert(new);

        assert!(manager.remove_if(1, old_key).is_none());
        assert_eq!(manager.get(1).map(|n| n.key), Some(new_key));
        assert!(manager.remove_if(1, new_key).is_some());
        assert!(manager.is_empty());
    }

    #[test]
    fn release_is_marked_once() {
        let mut manager = VoiceManager::new();
        let n = note(&mut manager, 4);
        manager.insert(n);

        assert!(manager.mark_released(4, 1.0).is_some());
        assert!(manager.mark_released(4, 2.0).is_none());
        assert_eq!(manager.get(4).and_then(|n| n.released_at), Some(1.0));
        assert!(manager.mark_released(99, 1.0).is_none());
    }

    #[test]
    fn keys_are_unique() {
        let mut manager = VoiceManager::new();
        let a = manager.next_key();
        let b = manager.next_key();
        assert_ne!(a, b);
    }
}
