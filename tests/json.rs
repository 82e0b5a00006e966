#![cfg(feature = "serde")]

mod common;

use common::scale_fixture;
use musicbox_svg::{note, prelude::*};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

#[test]
fn dump_skips_raw_timing() {
    let file = MidiFile::parse(&scale_fixture()).unwrap();
    let value = serde_json::to_value(&file).unwrap();

    let header = &value["header"];
    assert_eq!(header["format"], json!("Simultaneous"));
    assert_eq!(header["num_tracks"], json!(2));
    assert_eq!(header["timing"], json!({ "TicksPerQuarterNote": 192 }));
    assert_eq!(header.get("raw_division"), None);

    let events = value["tracks"][1]["events"].as_array().unwrap();
    assert_eq!(events.len(), 17);
    assert_eq!(events[2]["absolute_time_seconds"], json!(0.5));
}

#[test]
fn profile_round_trip() {
    let json = r#"{
        "name": "Custom",
        "paperWidthMm": 41,
        "contentWidthMm": 29,
        "holeDiameterMm": 1.8,
        "minNoteGapMm": 4,
        "millimetersPerSecond": 20,
        "supportedNotes": [60, 62, 64]
    }"#;
    let profile: MusicBoxProfile = serde_json::from_str(json).unwrap();
    assert_eq!(
        profile.supported_notes,
        [note!(C, 4), note!(D, 4), note!(E, 4)]
    );

    let out_of_range: Result<MusicBoxProfile, _> =
        serde_json::from_str(&json.replace("64]", "200]"));
    assert!(out_of_range.is_err());

    let options: SvgFormatOptions =
        serde_json::from_str(r#"{ "pageWidthMm": 150, "loopMode": true }"#).unwrap();
    assert_eq!(
        options,
        SvgFormatOptions {
            page_width_mm: 150.,
            loop_mode: true,
            ..Default::default()
        }
    );
    assert_eq!(serde_json::to_value(&options).unwrap()["jigsawJoiners"], Value::Bool(true));
}
