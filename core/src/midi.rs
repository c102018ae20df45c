use anyhow::{Context, Result};

use crate::raw::{RawRecord, RAW_LEADER};
use crate::header::*;
use crate::str_encoder::{str_from_akai_bytes, NAME_LENGTH};
use crate::util::{u16_from_7bit_le, u16_to_7bit_le};

pub const SYSEX_START: u8 = 0xf0;
pub const SYSEX_END: u8 = 0xf7;
pub const AKAI_ID: u8 = 0x47;
/// Device id of the S1000 family in legacy messages
pub const S1000_ID: u8 = 0x48;

/// Legacy (S1000/S3000) exclusive function codes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    /// Request status
    Rstat = 0x00,
    Stat = 0x01,
    /// Request list of resident program names
    Rplist = 0x02,
    Plist = 0x03,
    /// Request list of resident sample names
    Rslist = 0x04,
    Slist = 0x05,
    /// Request program common data
    Rpdata = 0x06,
    Pdata = 0x07,
    /// Request keygroup data
    Rkdata = 0x08,
    Kdata = 0x09,
    /// Request sample header data
    Rsdata = 0x0a,
    Sdata = 0x0b,
    /// Request sample data packets
    Rspack = 0x0c,
    /// Accept sample data packets
    Aspack = 0x0d,
    /// Request drum settings
    Rddata = 0x0e,
    Ddata = 0x0f,
    /// Request miscellaneous data
    Rmdata = 0x10,
    Mdata = 0x11,
    /// Delete program and its keygroups
    Delp = 0x12,
    /// Delete keygroup
    Delk = 0x13,
    /// Delete sample header and data
    Dels = 0x14,
    /// Set exclusive channel
    Setex = 0x15,
    /// Command reply (error or ok)
    Reply = 0x16,
    /// Corrected ASPACK
    Caspack = 0x1d,
}

impl Opcode {
    pub fn from_u8(b: u8) -> Option<Self> {
        let op = match b {
            0x00 => Opcode::Rstat,
            0x01 => Opcode::Stat,
            0x02 => Opcode::Rplist,
            0x03 => Opcode::Plist,
            0x04 => Opcode::Rslist,
            0x05 => Opcode::Slist,
            0x06 => Opcode::Rpdata,
            0x07 => Opcode::Pdata,
            0x08 => Opcode::Rkdata,
            0x09 => Opcode::Kdata,
            0x0a => Opcode::Rsdata,
            0x0b => Opcode::Sdata,
            0x0c => Opcode::Rspack,
            0x0d => Opcode::Aspack,
            0x0e => Opcode::Rddata,
            0x0f => Opcode::Ddata,
            0x10 => Opcode::Rmdata,
            0x11 => Opcode::Mdata,
            0x12 => Opcode::Delp,
            0x13 => Opcode::Delk,
            0x14 => Opcode::Dels,
            0x15 => Opcode::Setex,
            0x16 => Opcode::Reply,
            0x1d => Opcode::Caspack,
            _ => return None
        };
        Some(op)
    }
}

/// `F0 47 cc op 48`
pub fn frame_prefix(channel: u8, opcode: Opcode) -> [u8; 5] {
    [SYSEX_START, AKAI_ID, channel, opcode as u8, S1000_ID]
}

/// The leader of a data message: frame prefix plus the item number
pub fn data_prefix(channel: u8, opcode: Opcode, number: u16) -> [u8; RAW_LEADER] {
    let p = frame_prefix(channel, opcode);
    let n = u16_to_7bit_le(number);
    [p[0], p[1], p[2], p[3], p[4], n[0], n[1]]
}

#[derive(Clone, Debug)]
pub enum MidiMessage {
    StatusRequest { channel: u8 },
    ProgramListRequest { channel: u8 },
    SampleListRequest { channel: u8 },
    ProgramRequest { channel: u8, program: u16 },
    KeygroupRequest { channel: u8, program: u16, keygroup: u8 },
    SampleHeaderRequest { channel: u8, sample: u16 },
    DeleteProgram { channel: u8, program: u16 },
    DeleteKeygroup { channel: u8, program: u16, keygroup: u8 },
    DeleteSample { channel: u8, sample: u16 },
    SetExclusiveChannel { channel: u8, new_channel: u8 },
    ProgramData { channel: u8, program: u16, record: RawRecord<ProgramHeader> },
    KeygroupData { channel: u8, program: u16, keygroup: u8, record: RawRecord<KeygroupHeader> },
    SampleHeaderData { channel: u8, sample: u16, record: RawRecord<SampleHeader> },
}

impl MidiMessage {
    pub fn opcode(&self) -> Opcode {
        match self {
            MidiMessage::StatusRequest { .. } => Opcode::Rstat,
            MidiMessage::ProgramListRequest { .. } => Opcode::Rplist,
            MidiMessage::SampleListRequest { .. } => Opcode::Rslist,
            MidiMessage::ProgramRequest { .. } => Opcode::Rpdata,
            MidiMessage::KeygroupRequest { .. } => Opcode::Rkdata,
            MidiMessage::SampleHeaderRequest { .. } => Opcode::Rsdata,
            MidiMessage::DeleteProgram { .. } => Opcode::Delp,
            MidiMessage::DeleteKeygroup { .. } => Opcode::Delk,
            MidiMessage::DeleteSample { .. } => Opcode::Dels,
            MidiMessage::SetExclusiveChannel { .. } => Opcode::Setex,
            MidiMessage::ProgramData { .. } => Opcode::Pdata,
            MidiMessage::KeygroupData { .. } => Opcode::Kdata,
            MidiMessage::SampleHeaderData { .. } => Opcode::Sdata,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let op = self.opcode();
        let simple = |channel: u8, data: &[u8]| {
            let mut v = frame_prefix(channel, op).to_vec();
            v.extend_from_slice(data);
            v.push(SYSEX_END);
            v
        };
        let num = u16_to_7bit_le;

        match self {
            MidiMessage::StatusRequest { channel } |
            MidiMessage::ProgramListRequest { channel } |
            MidiMessage::SampleListRequest { channel } =>
                simple(*channel, &[]),
            MidiMessage::ProgramRequest { channel, program } |
            MidiMessage::DeleteProgram { channel, program } =>
                simple(*channel, &num(*program)),
            MidiMessage::KeygroupRequest { channel, program, keygroup } |
            MidiMessage::DeleteKeygroup { channel, program, keygroup } => {
                let p = num(*program);
                simple(*channel, &[p[0], p[1], *keygroup])
            }
            MidiMessage::SampleHeaderRequest { channel, sample } |
            MidiMessage::DeleteSample { channel, sample } =>
                simple(*channel, &num(*sample)),
            MidiMessage::SetExclusiveChannel { channel, new_channel } =>
                simple(*channel, &[*new_channel]),
            MidiMessage::ProgramData { channel, program, record } =>
                record.to_sysex(&data_prefix(*channel, op, *program)),
            MidiMessage::KeygroupData { channel, program, keygroup, record } => {
                // the keygroup number follows the program number
                let mut v = record.to_sysex(&data_prefix(*channel, op, *program));
                v.insert(RAW_LEADER, *keygroup);
                v
            }
            MidiMessage::SampleHeaderData { channel, sample, record } =>
                record.to_sysex(&data_prefix(*channel, op, *sample)),
        }
    }
}

#[derive(Clone, Debug)]
pub enum MidiResponse {
    Status { channel: u8, data: Vec<u8> },
    ProgramList { channel: u8, names: Vec<String> },
    SampleList { channel: u8, names: Vec<String> },
    ProgramData { channel: u8, program: u16, record: RawRecord<ProgramHeader> },
    KeygroupData { channel: u8, program: u16, keygroup: u8, record: RawRecord<KeygroupHeader> },
    SampleHeaderData { channel: u8, sample: u16, record: RawRecord<SampleHeader> },
    /// `REPLY`: 0 is OK, anything else an error
    Reply { channel: u8, code: u8 },
    Other { channel: u8, opcode: Opcode, data: Vec<u8> },
}

impl MidiResponse {
    pub fn channel(&self) -> u8 {
        match self {
            MidiResponse::Status { channel, .. } |
            MidiResponse::ProgramList { channel, .. } |
            MidiResponse::SampleList { channel, .. } |
            MidiResponse::ProgramData { channel, .. } |
            MidiResponse::KeygroupData { channel, .. } |
            MidiResponse::SampleHeaderData { channel, .. } |
            MidiResponse::Reply { channel, .. } |
            MidiResponse::Other { channel, .. } => *channel
        }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let len = bytes.len();
        if len < 6 {
            bail!("Legacy SysEx message too short: {} byte(s)", len);
        }
        if bytes[0] != SYSEX_START || bytes[len - 1] != SYSEX_END {
            bail!("Not a SysEx message");
        }
        if bytes[1] != AKAI_ID {
            bail!("Not an Akai SysEx message: manufacturer id {:02x}", bytes[1]);
        }
        if bytes[4] != S1000_ID {
            bail!("Unexpected device id {:02x}", bytes[4]);
        }

        let channel = bytes[2];
        let opcode = Opcode::from_u8(bytes[3])
            .with_context(|| format!("Unknown opcode {:02x}", bytes[3]))?;
        let data = &bytes[5 .. len - 1];

        let number = |data: &[u8]| -> Result<u16> {
            let n = data.get(.. 2)
                .with_context(|| format!("{:?} message without an item number", opcode))?;
            Ok(u16_from_7bit_le(array_ref!(n, 0, 2)))
        };

        let r = match opcode {
            Opcode::Stat => MidiResponse::Status { channel, data: data.to_vec() },
            Opcode::Plist => MidiResponse::ProgramList { channel, names: name_list(data)? },
            Opcode::Slist => MidiResponse::SampleList { channel, names: name_list(data)? },
            Opcode::Pdata => MidiResponse::ProgramData {
                channel,
                program: number(data)?,
                record: RawRecord::from_sysex(&bytes)?
            },
            Opcode::Kdata => {
                let program = number(data)?;
                let keygroup = *data.get(2)
                    .context("KDATA message without a keygroup number")?;
                // drop the keygroup number so that the data lines up with the leader
                let mut message = bytes.clone();
                message.remove(RAW_LEADER);
                MidiResponse::KeygroupData {
                    channel, program, keygroup,
                    record: RawRecord::from_sysex(&message)?
                }
            }
            Opcode::Sdata => MidiResponse::SampleHeaderData {
                channel,
                sample: number(data)?,
                record: RawRecord::from_sysex(&bytes)?
            },
            Opcode::Reply => MidiResponse::Reply { channel, code: data.first().copied().unwrap_or(0) },
            _ => MidiResponse::Other { channel, opcode, data: data.to_vec() }
        };
        Ok(r)
    }
}

/// A 7-bit LSB-first count followed by 12-byte alphabet names
fn name_list(data: &[u8]) -> Result<Vec<String>> {
    let count_bytes = data.get(.. 2).context("Name list without a count")?;
    let count = u16_from_7bit_le(array_ref!(count_bytes, 0, 2)) as usize;
    let names = &data[2 ..];
    if names.len() < count * NAME_LENGTH {
        bail!("Name list truncated: {} name(s) announced, {} byte(s) of names", count, names.len());
    }
    Ok(names.chunks_exact(NAME_LENGTH)
        .take(count)
        .map(|n| str_from_akai_bytes(n).trim_end().to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::str_encoder::StrEncoder;

    #[test]
    fn request_framing() {
        assert_eq!(MidiMessage::SampleListRequest { channel: 0 }.to_bytes(),
                   vec![0xf0, 0x47, 0x00, 0x04, 0x48, 0xf7]);
        assert_eq!(MidiMessage::SampleHeaderRequest { channel: 1, sample: 200 }.to_bytes(),
                   vec![0xf0, 0x47, 0x01, 0x0a, 0x48, 72, 1, 0xf7]);
        assert_eq!(MidiMessage::KeygroupRequest { channel: 0, program: 2, keygroup: 3 }.to_bytes(),
                   vec![0xf0, 0x47, 0x00, 0x08, 0x48, 2, 0, 3, 0xf7]);
        assert_eq!(MidiMessage::DeleteSample { channel: 0, sample: 5 }.to_bytes(),
                   vec![0xf0, 0x47, 0x00, 0x14, 0x48, 5, 0, 0xf7]);
    }

    #[test]
    fn sample_list() {
        let enc = StrEncoder::default();
        let mut msg = vec![0xf0, 0x47, 0x00, 0x05, 0x48, 2, 0];
        msg.extend(enc.str_to_bytes("KICK").unwrap());
        msg.extend(enc.str_to_bytes("SNARE 2").unwrap());
        msg.push(0xf7);

        match MidiResponse::from_bytes(msg).unwrap() {
            MidiResponse::SampleList { channel: 0, names } =>
                assert_eq!(names, vec!["KICK".to_string(), "SNARE 2".to_string()]),
            r => panic!("unexpected response {:?}", r)
        }
    }

    #[test]
    fn sample_header_data_round_trip() {
        let header = SampleHeader { SHIDENT: 3, SHNAME: "SINE".into(), SSRATE: 44100, ..Default::default() };
        let record = RawRecord::from_header(header).unwrap();
        let bytes = MidiMessage::SampleHeaderData { channel: 0, sample: 7, record }.to_bytes();
        assert_eq!(&bytes[.. 7], &[0xf0, 0x47, 0x00, 0x0b, 0x48, 7, 0]);

        match MidiResponse::from_bytes(bytes).unwrap() {
            MidiResponse::SampleHeaderData { sample, record, .. } => {
                assert_eq!(sample, 7);
                assert_eq!(record.header.SHNAME, "SINE        ");
                assert_eq!(record.header.SSRATE, 44100);
            }
            r => panic!("unexpected response {:?}", r)
        }
    }

    #[test]
    fn keygroup_data_round_trip() {
        let header = KeygroupHeader { KGIDENT: 2, LONOTE: 21, HINOTE: 127, ..Default::default() };
        let record = RawRecord::from_header(header).unwrap();
        let bytes = MidiMessage::KeygroupData { channel: 0, program: 1, keygroup: 4, record }.to_bytes();
        assert_eq!(&bytes[.. 8], &[0xf0, 0x47, 0x00, 0x09, 0x48, 1, 0, 4]);

        match MidiResponse::from_bytes(bytes).unwrap() {
            MidiResponse::KeygroupData { program: 1, keygroup: 4, record, .. } => {
                assert_eq!(record.header.LONOTE, 21);
                assert_eq!(record.header.HINOTE, 127);
            }
            r => panic!("unexpected response {:?}", r)
        }
    }

    #[test]
    fn rejects_foreign_messages() {
        assert!(MidiResponse::from_bytes(vec![0xf0, 0x41, 0x00, 0x05, 0x48, 0xf7]).is_err());
        assert!(MidiResponse::from_bytes(vec![0xf0, 0x47, 0x00, 0x7f, 0x48, 0xf7]).is_err());
        assert!(MidiResponse::from_bytes(vec![0xb0, 0x07, 0x7f]).is_err());
        match MidiResponse::from_bytes(vec![0xf0, 0x47, 0x00, 0x16, 0x48, 0x00, 0xf7]).unwrap() {
            MidiResponse::Reply { code: 0, .. } => {}
            r => panic!("unexpected response {:?}", r)
        }
    }
}
