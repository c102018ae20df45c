use anyhow::Result;
use log::*;

use crate::error::{check_len, CodecResult};
use crate::header::*;

/// Number of leading slots in a raw buffer before the header data. A raw
/// buffer is laid out like a legacy SysEx data message: F0, 47, channel,
/// opcode, device id and a two-byte item number, followed by nibbles.
pub const RAW_LEADER: usize = 7;

/// A parsed header together with the nibble buffer it was parsed from.
/// Field setters patch the buffer in place so that bytes the header
/// doesn't cover survive untouched. The buffer is owned by the record and
/// never shared.
#[derive(Clone, Debug, PartialEq)]
pub struct RawRecord<H: Header> {
    pub header: H,
    raw: Vec<u8>,
    byte_offset: usize,
}

impl<H: Header> RawRecord<H> {
    /// Parse a header at byte `byte_offset` of `nibbles`; the record keeps
    /// a copy of `nibbles` prefixed with a zero leader.
    pub fn parse(nibbles: &[u8], byte_offset: usize) -> CodecResult<Self> {
        Self::parse_with_trace(nibbles, byte_offset, &mut NoTrace)
    }

    pub fn parse_with_trace(nibbles: &[u8], byte_offset: usize, trace: &mut dyn DecodeTrace) -> CodecResult<Self> {
        let mut header = H::default();
        header.parse(nibbles, byte_offset, trace)?;

        let mut raw = vec![0u8; RAW_LEADER];
        raw.extend_from_slice(nibbles);
        Ok(RawRecord { header, raw, byte_offset })
    }

    /// Parse a legacy SysEx data message (PDATA/KDATA/SDATA). The message
    /// prefix takes the place of the leader and the trailing F7 is dropped.
    pub fn from_sysex(message: &[u8]) -> CodecResult<Self> {
        check_len(0, RAW_LEADER, message.len())?;
        let end = match message.last() {
            Some(0xf7) => message.len() - 1,
            _ => message.len()
        };
        let mut header = H::default();
        header.parse(&message[RAW_LEADER .. end], 0, &mut NoTrace)?;

        Ok(RawRecord { header, raw: message[.. end].to_vec(), byte_offset: 0 })
    }

    /// Build a record from a header alone, encoding it into fresh nibbles
    pub fn from_header(header: H) -> CodecResult<Self> {
        let mut raw = vec![0u8; RAW_LEADER + H::length() * 2];
        header.encode(&mut raw[RAW_LEADER ..], 0)?;
        Ok(RawRecord { header, raw, byte_offset: 0 })
    }

    /// The raw buffer including the leader
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// The nibbles following the leader
    pub fn nibbles(&self) -> &[u8] {
        &self.raw[RAW_LEADER ..]
    }

    /// Byte offset of the header within `nibbles()`
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Set a header field and patch it into the raw buffer
    pub fn set_field<V: Into<HeaderValue>>(&mut self, name: &str, value: V) -> Result<()> {
        let value = value.into();
        info!("set {}.{} = {}", H::NAME, name, value);

        let mut header = self.header.clone();
        header.set_field(name, value)?;
        let patched = header.encode_field(name, &mut self.raw[RAW_LEADER ..], self.byte_offset)?;
        if !patched {
            bail!("Unknown field {}.{}", H::NAME, name);
        }
        self.header = header;
        Ok(())
    }

    pub fn field(&self, name: &str) -> Option<HeaderValue> {
        self.header.field(name)
    }

    /// Re-encode the whole header into the raw buffer
    pub fn sync(&mut self) -> CodecResult<()> {
        self.header.encode(&mut self.raw[RAW_LEADER ..], self.byte_offset)?;
        Ok(())
    }

    /// The raw buffer with the leader replaced by `prefix` and an F7
    /// appended, ready to be sent as a legacy SysEx message
    pub fn to_sysex(&self, prefix: &[u8; RAW_LEADER]) -> Vec<u8> {
        let mut message = self.raw.clone();
        message[.. RAW_LEADER].copy_from_slice(prefix);
        message.push(0xf7);
        message
    }
}

impl RawRecord<ProgramHeader> {
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.set_field("PRNAME", name)
    }

    pub fn set_keygroup_count(&mut self, count: u8) -> Result<()> {
        self.set_field("GROUPS", count)
    }
}

impl RawRecord<KeygroupHeader> {
    pub fn set_note_range(&mut self, low: u8, high: u8) -> Result<()> {
        self.set_field("LONOTE", low)?;
        self.set_field("HINOTE", high)
    }

    fn check_zone(zone: usize) -> Result<()> {
        if !(1 ..= 4).contains(&zone) {
            bail!("Velocity zone {} out of range 1..4", zone);
        }
        Ok(())
    }

    /// Assign a sample to velocity zone `zone` (1-4)
    pub fn set_zone_sample(&mut self, zone: usize, name: &str) -> Result<()> {
        Self::check_zone(zone)?;
        self.set_field(&format!("SNAME{}", zone), name)
    }

    pub fn set_zone_high_velocity(&mut self, zone: usize, velocity: u8) -> Result<()> {
        Self::check_zone(zone)?;
        self.set_field(&format!("HIVEL{}", zone), velocity)
    }

    /// Constant pitch flag of velocity zone `zone`
    pub fn set_constant_pitch(&mut self, zone: usize, enable: bool) -> Result<()> {
        Self::check_zone(zone)?;
        self.set_field(&format!("CP{}", zone), enable as u8)
    }
}

impl RawRecord<SampleHeader> {
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.set_field("SHNAME", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::str_encoder::StrEncoder;
    use crate::util::u8_to_nibbles_vec;

    #[test]
    fn set_field_patches_only_that_field() {
        let mut bytes = vec![0x55u8; 200];
        bytes[0] = 1;
        let nibbles = u8_to_nibbles_vec(&bytes);
        let mut rec = RawRecord::<ProgramHeader>::parse(&nibbles, 1).unwrap();
        assert_eq!(rec.raw().len(), RAW_LEADER + nibbles.len());

        rec.set_name("test program").unwrap();
        assert_eq!(rec.header.PRNAME, "TEST PROGRAM");

        let name_at = RAW_LEADER + (1 + ProgramHeader::offset_of("PRNAME").unwrap()) * 2;
        let expected = u8_to_nibbles_vec(&StrEncoder::default().str_to_bytes("TEST PROGRAM").unwrap());
        assert_eq!(&rec.raw()[name_at .. name_at + 24], expected.as_slice());

        // everything else is untouched
        let mut other = rec.raw().to_vec();
        other[name_at .. name_at + 24].copy_from_slice(&nibbles[name_at - RAW_LEADER .. name_at - RAW_LEADER + 24]);
        assert_eq!(&other[RAW_LEADER ..], nibbles.as_slice());
    }

    #[test]
    fn failed_set_leaves_record_unchanged() {
        let nibbles = vec![0u8; 400];
        let mut rec = RawRecord::<KeygroupHeader>::parse(&nibbles, 0).unwrap();
        let before = rec.clone();
        assert!(rec.set_field("LONOTE", 300u16).is_err());
        assert!(rec.set_field("NOPE", 1u8).is_err());
        assert!(rec.set_zone_sample(5, "X").is_err());
        assert_eq!(rec, before);
    }

    #[test]
    fn keygroup_patchers() {
        let nibbles = vec![0u8; 400];
        let mut rec = RawRecord::<KeygroupHeader>::parse(&nibbles, 0).unwrap();
        rec.set_note_range(60, 61).unwrap();
        rec.set_zone_sample(2, "KICK-R").unwrap();
        rec.set_zone_high_velocity(2, 127).unwrap();
        rec.set_constant_pitch(1, true).unwrap();

        let reparsed = KeygroupHeader::from_nibbles(rec.nibbles(), 0).unwrap();
        assert_eq!(reparsed, rec.header);
        assert_eq!(reparsed.LONOTE, 60);
        assert_eq!(reparsed.HINOTE, 61);
        assert_eq!(reparsed.SNAME2, "KICK-R      ");
        assert_eq!(reparsed.HIVEL2, 127);
        assert_eq!(reparsed.CP1, 1);
    }

    #[test]
    fn sysex_framing() {
        let header = SampleHeader { SHIDENT: 3, SHNAME: "SINE".into(), ..Default::default() };
        let rec = RawRecord::from_header(header).unwrap();
        let message = rec.to_sysex(&[0xf0, 0x47, 0x00, 0x0b, 0x48, 0x02, 0x00]);
        assert_eq!(message.len(), RAW_LEADER + SampleHeader::length() * 2 + 1);
        assert_eq!(message.last(), Some(&0xf7));

        let back = RawRecord::<SampleHeader>::from_sysex(&message).unwrap();
        assert_eq!(back.header.SHIDENT, 3);
        assert_eq!(back.header.SHNAME, "SINE        ");
        assert_eq!(&back.raw()[.. 4], &[0xf0, 0x47, 0x00, 0x0b]);
    }
}
