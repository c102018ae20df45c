use log::*;
use serde::{Deserialize, Serialize};

use crate::error::{check_len, CodecError, CodecResult};

/// Tag plus little-endian body length
pub const CHUNK_HEADER_LENGTH: usize = 8;

/// One byte position of a chunk body
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Field {
    Pad,
    Value(&'static str),
}

pub trait Chunk: Default {
    const TAG: [u8; 4];
    /// Body length in bytes, not counting the chunk header
    const LENGTH: usize;

    /// Body layout, one entry per byte
    fn fields() -> &'static [Field];

    /// Parse the chunk starting at `offset`, returning the number of bytes consumed
    fn parse(&mut self, buf: &[u8], offset: usize) -> CodecResult<usize>;

    /// Write the chunk at `offset`, returning the number of bytes written
    fn write(&self, buf: &mut [u8], offset: usize) -> CodecResult<usize>;

    fn from_bytes(buf: &[u8], offset: usize) -> CodecResult<Self> {
        let mut chunk = Self::default();
        chunk.parse(buf, offset)?;
        Ok(chunk)
    }

    fn to_bytes(&self) -> CodecResult<Vec<u8>> {
        let mut buf = vec![0u8; CHUNK_HEADER_LENGTH + Self::LENGTH];
        self.write(&mut buf, 0)?;
        Ok(buf)
    }
}

pub fn tag_str(tag: &[u8; 4]) -> String {
    String::from_utf8_lossy(tag).into_owned()
}

pub(crate) fn check_tag(buf: &[u8], offset: usize, tag: &[u8; 4]) -> CodecResult<()> {
    check_len(offset, tag.len(), buf.len())?;
    let actual = &buf[offset .. offset + tag.len()];
    if actual != tag {
        return Err(CodecError::TagMismatch { expected: *tag, actual: actual.to_vec(), offset });
    }
    Ok(())
}

/// Verify the tag, check that the body fits and return it
pub(crate) fn read_chunk_header<'a>(buf: &'a [u8], offset: usize, tag: &[u8; 4], length: usize) -> CodecResult<&'a [u8]> {
    check_len(offset, CHUNK_HEADER_LENGTH, buf.len())?;
    check_tag(buf, offset, tag)?;
    let stored = i32::from_le_bytes(*array_ref!(buf, offset + 4, 4));
    if stored as i64 != length as i64 {
        warn!("Chunk {:?} at offset {} declares length {}, expected {}",
            tag_str(tag), offset, stored, length);
    }

    let start = offset + CHUNK_HEADER_LENGTH;
    check_len(start, length, buf.len())?;
    Ok(&buf[start .. start + length])
}

/// Write the chunk header and return the body slice to fill in
pub(crate) fn write_chunk_header<'a>(buf: &'a mut [u8], offset: usize, tag: &[u8; 4], length: usize) -> CodecResult<&'a mut [u8]> {
    check_len(offset, CHUNK_HEADER_LENGTH + length, buf.len())?;
    buf[offset .. offset + 4].copy_from_slice(tag);
    buf[offset + 4 .. offset + 8].copy_from_slice(&(length as i32).to_le_bytes());

    let start = offset + CHUNK_HEADER_LENGTH;
    Ok(&mut buf[start .. start + length])
}

macro_rules! chunk_field {
    (@spec _) => { Field::Pad };
    (@spec $f:ident) => { Field::Value(stringify!($f)) };

    (@read $s:ident, $body:ident, _) => { $s.padding.push($body.next().unwrap_or(0)) };
    (@read $s:ident, $body:ident, $f:ident) => { $s.$f = $body.next().unwrap_or(0) as i8 };

    (@write $s:ident, $pad:ident, _) => { $pad.next().unwrap_or(0) };
    (@write $s:ident, $pad:ident, $f:ident) => { $s.$f as u8 };
}

macro_rules! chunk_struct {
    ($(#[$m:meta])* $name:ident [$($done:ident)*]) => {
        $(#[$m])*
        #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase", default)]
        pub struct $name {
            $(pub $done: i8,)*
            #[serde(skip)]
            padding: Vec<u8>,
        }

        impl $name {
            pub(crate) fn inherit_padding(&mut self, other: &Self) {
                self.padding = other.padding.clone();
            }
        }
    };
    ($(#[$m:meta])* $name:ident [$($done:ident)*] _ $(, $rest:tt)*) => {
        chunk_struct!($(#[$m])* $name [$($done)*] $($rest),*);
    };
    ($(#[$m:meta])* $name:ident [$($done:ident)*] $f:ident $(, $rest:tt)*) => {
        chunk_struct!($(#[$m])* $name [$($done)* $f] $($rest),*);
    };
}

/// Declare a flat chunk: one byte per field, `_` for padding.
macro_rules! chunk {
    ($(#[$m:meta])* $name:ident($tag:literal, $len:literal) { $($f:tt),* $(,)? }) => {
        chunk_struct!($(#[$m])* $name [] $($f),*);

        impl Chunk for $name {
            const TAG: [u8; 4] = *$tag;
            const LENGTH: usize = $len;

            fn fields() -> &'static [Field] {
                const FIELDS: &[Field] = &[$(chunk_field!(@spec $f)),*];
                FIELDS
            }

            fn parse(&mut self, buf: &[u8], offset: usize) -> CodecResult<usize> {
                let mut body = read_chunk_header(buf, offset, &Self::TAG, Self::LENGTH)?
                    .iter().copied();
                self.padding.clear();
                $( chunk_field!(@read self, body, $f); )*
                // all-zero padding is not kept, so that parsed and freshly built chunks compare equal
                if self.padding.iter().all(|b| *b == 0) {
                    self.padding.clear();
                }
                Ok(CHUNK_HEADER_LENGTH + Self::LENGTH)
            }

            fn write(&self, buf: &mut [u8], offset: usize) -> CodecResult<usize> {
                let body = write_chunk_header(buf, offset, &Self::TAG, Self::LENGTH)?;
                let mut pad = self.padding.iter().copied();
                let values = [$(chunk_field!(@write self, pad, $f)),*];
                body.copy_from_slice(&values);
                Ok(CHUNK_HEADER_LENGTH + Self::LENGTH)
            }
        }
    };
}

chunk! {
    ProgramChunk(b"prg ", 6) {
        _, program_number, keygroup_count, _, _, _
    }
}

chunk! {
    OutputChunk(b"out ", 8) {
        _, loudness, amp_mod1, amp_mod2, pan_mod1, pan_mod2, pan_mod3, velocity_sensitivity
    }
}

chunk! {
    /// Program tuning and per-note detune of the user temperament
    TuneChunk(b"tune", 24) {
        _, semi_tone_tune, fine_tune,
        detune_c, detune_c_sharp, detune_d, detune_e_flat, detune_e, detune_f,
        detune_f_sharp, detune_g, detune_g_sharp, detune_a, detune_b_flat, detune_b,
        pitch_bend_up, pitch_bend_down, bend_mode, aftertouch,
        _, _, _, _, _
    }
}

chunk! {
    Lfo1Chunk(b"lfo ", 14) {
        _, waveform, rate, delay, depth, sync, _, modwheel, aftertouch,
        rate_mod, delay_mod, depth_mod, _, _
    }
}

chunk! {
    Lfo2Chunk(b"lfo ", 14) {
        _, waveform, rate, delay, depth, _, retrigger, _, _,
        rate_mod, delay_mod, depth_mod, _, _
    }
}

chunk! {
    /// Modulation sources; every source is followed by a spare byte
    ModsChunk(b"mods", 38) {
        _, _, _, _, _,
        amp_mod1_source, _, amp_mod2_source, _,
        pan_mod1_source, _, pan_mod2_source, _, pan_mod3_source, _,
        lfo1_rate_mod_source, _, lfo1_delay_mod_source, _, lfo1_depth_mod_source, _,
        lfo2_rate_mod_source, _, lfo2_delay_mod_source, _, lfo2_depth_mod_source, _,
        pitch_mod1_source, _, pitch_mod2_source, _, amp_mod_source, _,
        filter_mod_input1, _, filter_mod_input2, _, filter_mod_input3
    }
}

chunk! {
    /// Keygroup location: key range and per-keygroup tuning
    KlocChunk(b"kloc", 16) {
        _, _, _, _,
        low_note, high_note, semi_tone_tune, fine_tune, override_fx, fx_send_level,
        pitch_mod1, pitch_mod2, amp_mod, zone_x_fade, mute_group,
        _
    }
}

chunk! {
    AmpEnvelopeChunk(b"env ", 18) {
        _, attack, _, decay, release, _, _, sustain, _, _,
        velocity2_attack, _, keyscale, _, on_velocity2_release, _, off_velocity2_release, _
    }
}

chunk! {
    FilterEnvelopeChunk(b"env ", 18) {
        _, attack, _, decay, release, _, _, sustain, _, depth,
        velocity2_attack, _, keyscale, _, on_velocity2_release, off_velocity2_release, _, _
    }
}

chunk! {
    AuxEnvelopeChunk(b"env ", 18) {
        _, rate1, rate2, rate3, rate4, level1, level2, level3, level4, _,
        velocity2_rate1, _, keyboard2_rate2and4, _, velocity2_rate4, off_velocity2_rate4,
        velocity2_out_level, _
    }
}

chunk! {
    FilterChunk(b"filt", 10) {
        _, mode, cutoff, resonance, keyboard_track, mod_input1, mod_input2, mod_input3, headroom, _
    }
}

pub const SAMPLE_NAME_LENGTH: usize = 20;

const ZONE_NAME_OFFSET: usize = 2;
const ZONE_VALUES_OFFSET: usize = 34;

/// A velocity zone. The sample name is stored as a length byte followed by
/// 20 raw characters; `sample_name` is derived from both.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZoneChunk {
    pub sample_name: String,
    pub sample_name_length: i8,
    pub low_velocity: i8,
    pub high_velocity: i8,
    pub fine_tune: i8,
    pub semi_tone_tune: i8,
    pub filter: i8,
    pub pan_balance: i8,
    pub playback: i8,
    pub output: i8,
    pub level: i8,
    pub keyboard_track: i8,
    pub velocity2_start_lsb: i8,
    pub velocity2_start_msb: i8,
    #[serde(skip)]
    name_chars: [u8; SAMPLE_NAME_LENGTH],
    #[serde(skip)]
    padding: Vec<u8>,
}

impl ZoneChunk {
    const PADDING: [usize; 15] = [0, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, 33, 46, 47];

    pub fn set_sample_name(&mut self, name: &str) {
        let chars = name.chars()
            .filter(|c| c.is_ascii() && *c != '\0')
            .take(SAMPLE_NAME_LENGTH)
            .collect::<String>();
        self.name_chars = [0u8; SAMPLE_NAME_LENGTH];
        self.name_chars[.. chars.len()].copy_from_slice(chars.as_bytes());
        self.sample_name_length = chars.len() as i8;
        self.sample_name = chars;
    }

    /// Re-derive the stored name bytes from `sample_name`
    pub(crate) fn sync_sample_name(&mut self) {
        let name = std::mem::take(&mut self.sample_name);
        self.set_sample_name(&name);
    }

    pub(crate) fn inherit_padding(&mut self, other: &Self) {
        self.padding = other.padding.clone();
    }

    fn assemble_sample_name(&mut self) {
        let len = (self.sample_name_length.max(0) as usize).min(SAMPLE_NAME_LENGTH);
        self.sample_name = self.name_chars[.. len].iter()
            .filter(|c| **c != 0)
            .map(|c| *c as char)
            .collect();
    }

    fn values(&self) -> [i8; 12] {
        [
            self.low_velocity, self.high_velocity, self.fine_tune, self.semi_tone_tune,
            self.filter, self.pan_balance, self.playback, self.output, self.level,
            self.keyboard_track, self.velocity2_start_lsb, self.velocity2_start_msb
        ]
    }

    fn set_values(&mut self, v: &[i8; 12]) {
        [
            self.low_velocity, self.high_velocity, self.fine_tune, self.semi_tone_tune,
            self.filter, self.pan_balance, self.playback, self.output, self.level,
            self.keyboard_track, self.velocity2_start_lsb, self.velocity2_start_msb
        ] = *v;
    }
}

impl Chunk for ZoneChunk {
    const TAG: [u8; 4] = *b"zone";
    const LENGTH: usize = 48;

    fn fields() -> &'static [Field] {
        const FIELDS: &[Field] = &[
            Field::Pad, Field::Value("sample_name_length"),
            Field::Value("c0"), Field::Value("c1"), Field::Value("c2"), Field::Value("c3"),
            Field::Value("c4"), Field::Value("c5"), Field::Value("c6"), Field::Value("c7"),
            Field::Value("c8"), Field::Value("c9"), Field::Value("c10"), Field::Value("c11"),
            Field::Value("c12"), Field::Value("c13"), Field::Value("c14"), Field::Value("c15"),
            Field::Value("c16"), Field::Value("c17"), Field::Value("c18"), Field::Value("c19"),
            Field::Pad, Field::Pad, Field::Pad, Field::Pad, Field::Pad, Field::Pad,
            Field::Pad, Field::Pad, Field::Pad, Field::Pad, Field::Pad, Field::Pad,
            Field::Value("low_velocity"), Field::Value("high_velocity"),
            Field::Value("fine_tune"), Field::Value("semi_tone_tune"),
            Field::Value("filter"), Field::Value("pan_balance"),
            Field::Value("playback"), Field::Value("output"),
            Field::Value("level"), Field::Value("keyboard_track"),
            Field::Value("velocity2_start_lsb"), Field::Value("velocity2_start_msb"),
            Field::Pad, Field::Pad,
        ];
        FIELDS
    }

    fn parse(&mut self, buf: &[u8], offset: usize) -> CodecResult<usize> {
        let body = read_chunk_header(buf, offset, &Self::TAG, Self::LENGTH)?;

        self.sample_name_length = body[1] as i8;
        self.name_chars.copy_from_slice(&body[ZONE_NAME_OFFSET .. ZONE_NAME_OFFSET + SAMPLE_NAME_LENGTH]);
        let values = array_ref!(body, ZONE_VALUES_OFFSET, 12);
        self.set_values(&(*values).map(|b| b as i8));
        self.padding = Self::PADDING.iter().map(|i| body[*i]).collect();
        if self.padding.iter().all(|b| *b == 0) {
            self.padding.clear();
        }
        self.assemble_sample_name();

        Ok(CHUNK_HEADER_LENGTH + Self::LENGTH)
    }

    fn write(&self, buf: &mut [u8], offset: usize) -> CodecResult<usize> {
        let body = write_chunk_header(buf, offset, &Self::TAG, Self::LENGTH)?;

        for (n, i) in Self::PADDING.iter().enumerate() {
            body[*i] = self.padding.get(n).copied().unwrap_or(0);
        }
        body[1] = self.sample_name_length as u8;
        body[ZONE_NAME_OFFSET .. ZONE_NAME_OFFSET + SAMPLE_NAME_LENGTH].copy_from_slice(&self.name_chars);
        let values = self.values().map(|v| v as u8);
        body[ZONE_VALUES_OFFSET .. ZONE_VALUES_OFFSET + 12].copy_from_slice(&values);

        Ok(CHUNK_HEADER_LENGTH + Self::LENGTH)
    }
}

/// A keygroup: kloc, three envelopes, filter and four zones, concatenated
/// without any further wrapping.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeygroupChunk {
    pub kloc: KlocChunk,
    pub amp_envelope: AmpEnvelopeChunk,
    pub filter_envelope: FilterEnvelopeChunk,
    pub aux_envelope: AuxEnvelopeChunk,
    pub filter: FilterChunk,
    pub zone1: ZoneChunk,
    pub zone2: ZoneChunk,
    pub zone3: ZoneChunk,
    pub zone4: ZoneChunk,
}

impl KeygroupChunk {
    pub fn zones(&self) -> [&ZoneChunk; 4] {
        [&self.zone1, &self.zone2, &self.zone3, &self.zone4]
    }

    pub fn zones_mut(&mut self) -> [&mut ZoneChunk; 4] {
        [&mut self.zone1, &mut self.zone2, &mut self.zone3, &mut self.zone4]
    }

    pub(crate) fn inherit_padding(&mut self, other: &Self) {
        self.kloc.inherit_padding(&other.kloc);
        self.amp_envelope.inherit_padding(&other.amp_envelope);
        self.filter_envelope.inherit_padding(&other.filter_envelope);
        self.aux_envelope.inherit_padding(&other.aux_envelope);
        self.filter.inherit_padding(&other.filter);
        for (zone, other) in self.zones_mut().into_iter().zip(other.zones()) {
            zone.inherit_padding(other);
        }
    }
}

impl Chunk for KeygroupChunk {
    const TAG: [u8; 4] = *b"kgrp";
    const LENGTH: usize = 344;

    fn fields() -> &'static [Field] {
        // sub-chunks carry their own layouts
        &[]
    }

    fn parse(&mut self, buf: &[u8], offset: usize) -> CodecResult<usize> {
        read_chunk_header(buf, offset, &Self::TAG, Self::LENGTH)?;

        let mut pos = offset + CHUNK_HEADER_LENGTH;
        pos += self.kloc.parse(buf, pos)?;
        pos += self.amp_envelope.parse(buf, pos)?;
        pos += self.filter_envelope.parse(buf, pos)?;
        pos += self.aux_envelope.parse(buf, pos)?;
        pos += self.filter.parse(buf, pos)?;
        for zone in self.zones_mut() {
            pos += zone.parse(buf, pos)?;
        }

        Ok(pos - offset)
    }

    fn write(&self, buf: &mut [u8], offset: usize) -> CodecResult<usize> {
        write_chunk_header(buf, offset, &Self::TAG, Self::LENGTH)?;

        let mut pos = offset + CHUNK_HEADER_LENGTH;
        pos += self.kloc.write(buf, pos)?;
        pos += self.amp_envelope.write(buf, pos)?;
        pos += self.filter_envelope.write(buf, pos)?;
        pos += self.aux_envelope.write(buf, pos)?;
        pos += self.filter.write(buf, pos)?;
        for zone in self.zones() {
            pos += zone.write(buf, pos)?;
        }

        Ok(pos - offset)
    }
}

/// The file signature: `RIFF`, a zero length and the `APRG` form type
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeaderChunk;

impl HeaderChunk {
    pub const RIFF: [u8; 4] = *b"RIFF";
    pub const LENGTH: [u8; 4] = [0x00, 0x00, 0x00, 0x00];
    pub const APRG: [u8; 4] = *b"APRG";
    pub const SIZE: usize = 12;

    pub fn parse(&mut self, buf: &[u8], offset: usize) -> CodecResult<usize> {
        check_tag(buf, offset, &Self::RIFF)?;
        check_tag(buf, offset + 4, &Self::LENGTH)?;
        check_tag(buf, offset + 8, &Self::APRG)?;
        Ok(Self::SIZE)
    }

    pub fn write(&self, buf: &mut [u8], offset: usize) -> CodecResult<usize> {
        check_len(offset, Self::SIZE, buf.len())?;
        buf[offset .. offset + 4].copy_from_slice(&Self::RIFF);
        buf[offset + 4 .. offset + 8].copy_from_slice(&Self::LENGTH);
        buf[offset + 8 .. offset + 12].copy_from_slice(&Self::APRG);
        Ok(Self::SIZE)
    }
}
