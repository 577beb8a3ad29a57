//! Bus summing primitives.

/*
Summing Busses
==============

Every voice renders into its own scratch buffer and is then ADDED onto a
shared bus. Loops are added onto the master bus the same way, and the delay
branch is added back onto the filtered signal.

    voice 1 ──┐
    voice 2 ──┼──(+)──→ bus
    voice 3 ──┘

Summing never normalizes: three voices that each peak at 0.8 can reach 2.4.
Per-voice envelope peaks (0.6 to 1.0) and the master gain keep the typical
touch gesture in range; the distortion stage compresses whatever gets past.


Phase Relationships
-------------------

Two voices on the same frequency with the same starting phase add
constructively (up to 2×); out of phase they cancel. Touch-driven voices
start at different instants and drift with portamento, so in practice the
sum behaves like uncorrelated signals (power adds, not amplitude).
*/

/// Add signal B into signal A in-place.
#[inline]
pub fn sum_in_place(a: &mut [f32], b: &[f32]) {
    debug_assert_eq!(a.len(), b.len());

    for (sa, &sb) in a.iter_mut().zip(b.iter()) {
        *sa += sb;
    }
}

/// Add `gain × b` into `a` in-place.
#[inline]
pub fn sum_scaled_in_place(a: &mut [f32], b: &[f32], gain: f32) {
    debug_assert_eq!(a.len(), b.len());

    for (sa, &sb) in a.iter_mut().zip(b.iter()) {
        *sa += sb * gain;
    }
}
