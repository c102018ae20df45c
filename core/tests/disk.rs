use akai_core::disk::*;
use akai_core::header::*;
use akai_core::util::{nibbles_to_u8_vec, u8_to_nibbles_vec};
use tempfile::tempdir;

/// A raw-volume program file with `groups` keygroups
fn program_file(groups: u8) -> Vec<u8> {
    let total = KEYGROUP1_START_OFFSET + KEYGROUP_LENGTH * groups as usize;
    let mut nibbles = vec![0u8; total];

    // block identifier byte ahead of the header
    nibbles[0] = 1;
    let header = ProgramHeader {
        PRNAME: "TEST PROGRAM".into(),
        GROUPS: groups,
        PRGNUM: 4,
        ..Default::default()
    };
    header.encode(&mut nibbles, PROGRAM_HEADER_OFFSET).unwrap();

    for i in 0 .. groups {
        let kg = KeygroupHeader {
            KGIDENT: 2,
            LONOTE: 21 + i * 12,
            HINOTE: 32 + i * 12,
            SNAME1: format!("SAMPLE {}", i),
            HIVEL1: 127,
            ..Default::default()
        };
        let start = KEYGROUP1_START_OFFSET + KEYGROUP_LENGTH * i as usize;
        let kn = kg.to_nibbles().unwrap();
        let n = kn.len().min(total - start);
        nibbles[start .. start + n].copy_from_slice(&kn[.. n]);
    }

    nibbles_to_u8_vec(&nibbles)
}

#[test]
fn program_header_fixture() {
    let nibbles = u8_to_nibbles_vec(&program_file(3));
    let file = AkaiProgramFile::from_nibbles(&nibbles).unwrap();

    assert_eq!(file.program.header.PRNAME, "TEST PROGRAM");
    assert_eq!(file.program.header.GROUPS, 3);
    assert_eq!(file.program.header.PRGNUM, 4);
    assert_eq!(file.keygroups.len(), file.program.header.GROUPS as usize);
}

#[test]
fn keygroups_sit_at_fixed_offsets() {
    let bytes = program_file(3);
    let nibbles = u8_to_nibbles_vec(&bytes);
    let file = AkaiProgramFile::from_nibbles(&nibbles).unwrap();

    for (i, kg) in file.keygroups.iter().enumerate() {
        let byte = (KEYGROUP1_START_OFFSET + KEYGROUP_LENGTH * i) / 2;
        assert_eq!(bytes[byte], 2, "keygroup {} identifier", i);
        assert_eq!(kg.header.KGIDENT, 2);
        assert_eq!(kg.header.LONOTE, 21 + 12 * i as u8);
        assert_eq!(kg.header.HINOTE, 32 + 12 * i as u8);
        assert_eq!(kg.header.SNAME1, format!("SAMPLE {}    ", i));
        assert_eq!(kg.header.HIVEL1, 127);
    }
}

#[test]
fn unpatched_file_writes_back_unchanged() {
    let bytes = program_file(2);
    let file = AkaiProgramFile::from_nibbles(&u8_to_nibbles_vec(&bytes)).unwrap();
    assert_eq!(file.to_bytes(), bytes);
}

#[test]
fn read_patch_write() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("test.a3p");
    let dst = dir.path().join("renamed.a3p");
    let bytes = program_file(2);
    std::fs::write(&src, &bytes).unwrap();

    let mut file = read_akai_program(&src).unwrap();
    file.program.set_name("renamed").unwrap();
    file.keygroups[1].set_note_range(48, 60).unwrap();
    write_akai_program(&dst, &file).unwrap();

    let written = std::fs::read(&dst).unwrap();
    assert_eq!(written.len(), bytes.len());

    let again = read_akai_program(&dst).unwrap();
    assert_eq!(again.program.header.PRNAME, "RENAMED     ");
    assert_eq!(again.program.header.GROUPS, 2);
    assert_eq!(again.keygroups[0].header, file.keygroups[0].header);
    assert_eq!(again.keygroups[1].header.LONOTE, 48);
    assert_eq!(again.keygroups[1].header.HINOTE, 60);

    // only the name and the note range changed
    let name_at = PROGRAM_HEADER_OFFSET + ProgramHeader::offset_of("PRNAME").unwrap();
    let kg1 = (KEYGROUP1_START_OFFSET + KEYGROUP_LENGTH) / 2;
    let lonote_at = kg1 + KeygroupHeader::offset_of("LONOTE").unwrap();
    let changed = bytes.iter().zip(written.iter())
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(i, _)| i)
        .collect::<Vec<_>>();
    assert!(changed.iter().all(|i| (name_at .. name_at + 12).contains(i) || (lonote_at .. lonote_at + 2).contains(i)),
            "unexpected changes at {:?}", changed);
}

#[test]
fn add_keygroup_copies_the_last_one() {
    let bytes = program_file(2);
    let mut file = AkaiProgramFile::from_nibbles(&u8_to_nibbles_vec(&bytes)).unwrap();
    let last = file.keygroups[1].header.clone();

    file.add_keygroup().unwrap();
    assert_eq!(file.program.header.GROUPS, 3);

    let out = file.to_bytes();
    assert_eq!(out.len(), bytes.len() + KEYGROUP_LENGTH / 2);

    let again = AkaiProgramFile::from_nibbles(&u8_to_nibbles_vec(&out)).unwrap();
    assert_eq!(again.keygroups.len(), 3);
    assert_eq!(again.keygroups[2].header, last);
    assert_eq!(again.keygroups[1].header.LONOTE, last.LONOTE);
}

#[test]
fn add_keygroup_needs_a_prototype() {
    let bytes = program_file(0);
    let mut file = AkaiProgramFile::from_nibbles(&u8_to_nibbles_vec(&bytes)).unwrap();
    assert!(file.add_keygroup().is_err());
    assert_eq!(file.program.header.GROUPS, 0);
}

#[test]
fn sample_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sine.a3s");

    let header = SampleHeader { SHIDENT: 3, SHNAME: "SINE".into(), SPITCH: 60, SSRATE: 44100, ..Default::default() };
    let mut bytes = nibbles_to_u8_vec(&header.to_nibbles().unwrap());
    // sample data follows the header
    bytes.extend_from_slice(&[0x7f; 64]);
    std::fs::write(&path, &bytes).unwrap();

    let sample = read_akai_sample(&path).unwrap();
    assert_eq!(sample.header.SHNAME, "SINE        ");
    assert_eq!(sample.header.SPITCH, 60);
    assert_eq!(sample.header.SSRATE, 44100);
    assert_eq!(sample.nibbles().len(), bytes.len() * 2);
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    assert!(read_akai_program(dir.path().join("nope.a3p")).is_err());
}

#[test]
fn decode_trace_reports_field_offsets() {
    struct Collect(Vec<(&'static str, usize)>);
    impl DecodeTrace for Collect {
        fn field(&mut self, _header: &'static str, name: &'static str, offset: usize, _value: &dyn std::fmt::Debug) {
            self.0.push((name, offset));
        }
    }

    let nibbles = u8_to_nibbles_vec(&program_file(1));
    let mut trace = Collect(vec![]);
    let mut header = ProgramHeader::default();
    let len = header.parse(&nibbles, PROGRAM_HEADER_OFFSET, &mut trace).unwrap();

    assert_eq!(len, ProgramHeader::length());
    assert_eq!(trace.0.len(), ProgramHeader::fields().len());
    assert_eq!(trace.0[0], ("KGRP1", 0));
    assert_eq!(trace.0[1], ("PRNAME", 2));
    assert_eq!(trace.0[2], ("PRGNUM", 14));
}
