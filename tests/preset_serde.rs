#![cfg(feature = "serde")]

use touch_synth::{EngineConfig, InstrumentPreset, PresetPatch, Waveform};

#[test]
fn preset_reads_camel_case_json() {
    let json = r#"{
        "name": "Nylon",
        "waveform": "guitar",
        "filterCutoff": 3200,
        "attack": 0.005,
        "release": 1.2,
        "delayFeedback": 0.45,
        "damping": 0.8
    }"#;
    let preset: InstrumentPreset = serde_json::from_str(json).expect("valid preset");

    assert_eq!(preset.name, "Nylon");
    assert_eq!(preset.waveform, Waveform::Guitar);
    assert_eq!(preset.filter_cutoff, 3200.0);
    assert_eq!(preset.delay_feedback, 0.45);
    // Missing fields take their defaults
    assert_eq!(preset.sustain, InstrumentPreset::default().sustain);
}

#[test]
fn every_waveform_has_a_lowercase_name() {
    for waveform in Waveform::ALL {
        let json = serde_json::to_string(&waveform).expect("serialize");
        assert_eq!(json, format!("\"{}\"", waveform.name()));
        let back: Waveform = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, waveform);
    }
}

#[test]
fn patch_from_json_only_touches_present_fields() {
    let patch: PresetPatch =
        serde_json::from_str(r#"{"waveform":"drums","delayFeedback":3.0}"#).expect("valid patch");
    assert_eq!(patch.filter_cutoff, None);

    let mut preset = InstrumentPreset::default();
    preset.apply(&patch);
    assert_eq!(preset.waveform, Waveform::Drums);
    assert_eq!(preset.delay_feedback, 0.9);
    assert_eq!(preset.filter_cutoff, InstrumentPreset::default().filter_cutoff);
}

#[test]
fn config_defaults_fill_gaps() {
    let config: EngineConfig =
        serde_json::from_str(r#"{"max_voices": 16}"#).expect("valid config");
    assert_eq!(config.max_voices, 16);
    assert_eq!(config.command_capacity, EngineConfig::default().command_capacity);
}
