//! Signal multiplication primitives.

/*
Gain Stages
===========

Every voice ends in a gain stage whose value is the envelope. Multiplying
sample-by-sample is all it takes:

    Source:     [ 0.8, -0.6,  0.9, -0.7, ...]  (audio, full amplitude)
    Gain:       [ 0.2,  0.5,  0.8,  0.8, ...]  (envelope, ramping up)
    Output:     [0.16, -0.3, 0.72, -0.56, ...]

Level changes in decibels:

    dB = 20 × log₁₀(amplitude_ratio)

    ×1.0   =   0 dB
    ×0.5   =  -6 dB
    ×0.01  = -40 dB
    ×0.001 = -60 dB  (the release floor: inaudible, but not zero)
*/

/// Multiply a signal by a constant gain factor (in-place).
#[inline]
pub fn apply_gain(signal: &mut [f32], gain: f32) {
    for sample in signal.iter_mut() {
        *sample *= gain;
    }
}
