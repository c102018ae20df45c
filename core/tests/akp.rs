use akai_core::akp::Program;
use akai_core::chunk::*;
use akai_core::error::CodecError;
use serde_json::json;

fn chunk(tag: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut v = tag.to_vec();
    v.extend_from_slice(&(body.len() as u32).to_le_bytes());
    v.extend_from_slice(body);
    v
}

fn zone(name: &str, low_velocity: u8, high_velocity: u8) -> Vec<u8> {
    let mut body = vec![0u8; 48];
    body[0] = 1;
    body[1] = name.len() as u8;
    body[2 .. 2 + name.len()].copy_from_slice(name.as_bytes());
    body[34] = low_velocity;
    body[35] = high_velocity;
    chunk(b"zone", &body)
}

/// A single-keygroup program equivalent to the BASS.AKP fixture
fn bass_akp() -> Vec<u8> {
    let mut tune = vec![0u8; 24];
    tune[0] = 1;
    tune[15] = 2; // pitch bend up
    tune[16] = 2; // pitch bend down

    let mut mods = vec![0u8; 38];
    mods[..5].copy_from_slice(&[1, 0, 17, 0, 17]);
    mods[5] = 6; // amp mod 1 source: velocity
    mods[7] = 3;
    mods[9] = 8;
    mods[15] = 6;

    let mut kgrp = vec![];
    kgrp.extend(chunk(b"kloc", &[1, 3, 1, 4, 21, 127, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]));
    kgrp.extend(chunk(b"env ", &[1, 0, 0, 50, 15, 0, 0, 100, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]));
    kgrp.extend(chunk(b"env ", &[1, 0, 0, 50, 15, 0, 0, 100, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]));
    kgrp.extend(chunk(b"env ", &[1, 0, 50, 50, 15, 100, 100, 100, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]));
    kgrp.extend(chunk(b"filt", &[1, 0, 100, 0, 0, 0, 0, 0, 0, 0]));
    kgrp.extend(zone("BASS", 0, 127));
    kgrp.extend(zone("", 0, 127));
    kgrp.extend(zone("", 0, 127));
    kgrp.extend(zone("", 0, 127));
    assert_eq!(kgrp.len(), 344);

    let mut buf = b"RIFF\0\0\0\0APRG".to_vec();
    buf.extend(chunk(b"prg ", &[1, 0, 1, 0, 0, 0]));
    buf.extend(chunk(b"out ", &[1, 80, 0, 0, 0, 0, 0, 25]));
    buf.extend(chunk(b"tune", &tune));
    buf.extend(chunk(b"lfo ", &[1, 1, 43, 0, 0, 0, 1, 15, 0, 0, 0, 0, 0, 0]));
    buf.extend(chunk(b"lfo ", &[1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]));
    buf.extend(chunk(b"mods", &mods));
    buf.extend(chunk(b"kgrp", &kgrp));
    buf
}

#[test]
fn bass_fixture_values() {
    let p = Program::from_buffer(&bass_akp()).unwrap();

    assert_eq!(p.program_number(), 0);
    assert_eq!(p.keygroup_count(), 1);
    assert_eq!(p.output().loudness, 80);
    assert_eq!(p.output().velocity_sensitivity, 25);
    assert_eq!(p.tune().pitch_bend_up, 2);
    assert_eq!(p.lfo1().rate, 43);
    assert_eq!(p.lfo1().modwheel, 15);
    assert_eq!(p.mods().amp_mod1_source, 6);

    let kg = &p.keygroups()[0];
    assert_eq!(kg.kloc.low_note, 21);
    assert_eq!(kg.kloc.high_note, 127);
    assert_eq!(kg.amp_envelope.sustain, 100);
    assert_eq!(kg.filter.cutoff, 100);
    assert_eq!(kg.zone1.sample_name, "BASS");
    assert_eq!(kg.zone2.sample_name, "");
    assert_eq!(kg.zone1.high_velocity, 127);
}

#[test]
fn bass_fixture_round_trips_byte_for_byte() {
    let bytes = bass_akp();
    let p = Program::from_buffer(&bytes).unwrap();
    assert_eq!(p.byte_length(), bytes.len());
    assert_eq!(p.to_bytes().unwrap(), bytes);
}

#[test]
fn apply_touches_only_patched_bytes() {
    let bytes = bass_akp();
    let mut p = Program::from_buffer(&bytes).unwrap();

    p.apply(&json!({})).unwrap();
    assert_eq!(p.to_bytes().unwrap(), bytes);

    p.apply(&json!({ "output": { "loudness": 90 } })).unwrap();
    let patched = p.to_bytes().unwrap();
    let diff = bytes.iter().zip(patched.iter())
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(i, _)| i)
        .collect::<Vec<_>>();
    // header 12, prg chunk 14, out tag/length 8, pad byte 1
    assert_eq!(diff, vec![12 + 14 + 8 + 1]);
    assert_eq!(patched[diff[0]], 90);
}

#[test]
fn apply_adds_keygroups_with_inherited_layout() {
    let bytes = bass_akp();
    let mut p = Program::from_buffer(&bytes).unwrap();
    p.apply(&json!({
        "keygroupCount": 2,
        "keygroups": [{}, { "kloc": { "lowNote": 40, "highNote": 60 }, "zone1": { "sampleName": "BASS-2" } }]
    })).unwrap();

    let out = p.to_bytes().unwrap();
    assert_eq!(out.len(), bytes.len() + 352);
    // apart from keygroupCount, the original program is unchanged, padding included
    let mut expected = bytes.clone();
    expected[12 + 8 + 2] = 2;
    assert_eq!(&out[.. bytes.len()], expected.as_slice());

    let again = Program::from_buffer(&out).unwrap();
    assert_eq!(again.keygroups().len(), 2);
    assert_eq!(again.keygroups()[1].kloc.low_note, 40);
    assert_eq!(again.keygroups()[1].zone1.sample_name, "BASS-2");
    assert_eq!(again.keygroups()[1].amp_envelope.sustain, 100);
}

#[test]
fn json_model_round_trip() {
    let p = Program::from_buffer(&bass_akp()).unwrap();
    let json = p.to_json().unwrap();
    assert_eq!(json["output"]["loudness"], 80);
    assert_eq!(json["keygroups"][0]["zone1"]["sampleName"], "BASS");

    let q = Program::from_json(&json.to_string()).unwrap();
    assert_eq!(q.keygroups().len(), 1);
    assert_eq!(q.to_json().unwrap(), json);
}

#[test]
fn wrong_tag_reports_offset() {
    let mut bytes = bass_akp();
    // corrupt the "out " tag
    bytes[12 + 14] = b'x';
    let err = Program::from_buffer(&bytes).unwrap_err();
    assert_eq!(err, CodecError::TagMismatch { expected: *b"out ", actual: b"xut ".to_vec(), offset: 26 });
}

#[test]
fn truncated_program_fails() {
    let bytes = bass_akp();
    let err = Program::from_buffer(&bytes[.. bytes.len() - 10]).unwrap_err();
    assert!(matches!(err, CodecError::Truncated { .. }));
}

#[test]
fn chunk_from_bytes_at_offset() {
    let bytes = bass_akp();
    let out = OutputChunk::from_bytes(&bytes, 26).unwrap();
    assert_eq!(out.loudness, 80);
    assert_eq!(out.to_bytes().unwrap(), bytes[26 .. 26 + 16].to_vec());
}
