//! S5000/S6000 section/item SysEx protocol.
//!
//! A control message is `F0 47 5E <device id> <user ref> <section> <item> <data..> F7`.
//! Responses come back as `F0 47 5E <device id> <user ref> <status> ... F7`, where
//! `REPLY` frames carry the section and item they answer before the data.

use std::fmt;
use log::*;

use crate::midi::{AKAI_ID, SYSEX_END, SYSEX_START};
use crate::util::bytes_to_number_be;

/// Product id of the S5000/S6000 family
pub const S56K_ID: u8 = 0x5e;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Section {
    SysexConfig = 0x00,
    SystemSetup = 0x02,
    MidiConfig = 0x04,
    KeygroupZone = 0x06,
    Keygroup = 0x08,
    Program = 0x0a,
    Multi = 0x0c,
    SampleTools = 0x0e,
    DiskTools = 0x10,
    Fx = 0x12,
    Scenelist = 0x14,
    Songfile = 0x16,
    FrontPanel = 0x20,
    AltProgram = 0x2a,
    AltMulti = 0x2c,
    AltSample = 0x2e,
    AltFx = 0x32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SysexItem {
    Query = 0x00,
}

/// Items of the program section. Every "set" item sits 8 below its
/// "get" counterpart, except for the LFO block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ProgramItem {
    GetProgramCount = 0x10,
    GetId = 0x11,
    GetIndex = 0x12,
    GetName = 0x13,
    GetKeygroupCount = 0x14,
    GetKeygroupCrossfade = 0x15,

    // output
    SetLoudness = 0x20,
    SetVelocitySensitivity = 0x21,
    SetAmpModSource = 0x22,
    SetAmpModValue = 0x23,
    SetPanModSource = 0x24,
    SetPanModValue = 0x25,
    GetLoudness = 0x28,
    GetVelocitySensitivity = 0x29,
    /// DATA1: amp mod 1 | 2
    GetAmpModSource = 0x2a,
    GetAmpModValue = 0x2b,
    /// DATA1: pan mod 1 | 2 | 3
    GetPanModSource = 0x2c,
    GetPanModValue = 0x2d,

    // midi/tune
    SetSemitoneTune = 0x30,
    SetFineTune = 0x31,
    SetTuneTemplate = 0x32,
    SetUserTuneTemplate = 0x33,
    SetKey = 0x34,
    GetSemitoneTune = 0x38,
    GetFineTune = 0x39,
    GetTuneTemplate = 0x3a,
    GetUserTuneTemplate = 0x3b,
    GetKey = 0x3c,

    // pitch bend
    SetPitchBendUp = 0x40,
    SetPitchBendDown = 0x41,
    SetPitchBendMode = 0x42,
    SetAftertouchMod = 0x43,
    SetAftertouchValue = 0x44,
    SetPortamentoEnable = 0x45,
    SetPortamentoMode = 0x46,
    SetPortamentoTime = 0x47,
    GetPitchBendUp = 0x48,
    GetPitchBendDown = 0x49,
    GetPitchBendMode = 0x4a,
    GetAftertouchMod = 0x4b,
    GetAftertouchValue = 0x4c,
    GetPortamentoEnable = 0x4d,
    GetPortamentoMode = 0x4e,
    GetPortamentoTime = 0x4f,

    // lfo, DATA1: lfo 1 | 2
    SetLfoRate = 0x50,
    SetLfoDelay = 0x51,
    SetLfoDepth = 0x52,
    GetLfoRate = 0x60,
    GetLfoDelay = 0x61,
    GetLfoDepth = 0x62,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlMessage {
    pub section: Section,
    pub item: u8,
    pub data: Vec<u8>,
}

impl ControlMessage {
    pub fn new(section: Section, item: u8, data: &[u8]) -> Self {
        ControlMessage { section, item, data: data.to_vec() }
    }

    pub fn program(item: ProgramItem, data: &[u8]) -> Self {
        Self::new(Section::Program, item as u8, data)
    }

    pub fn query() -> Self {
        Self::new(Section::SysexConfig, SysexItem::Query as u8, &[])
    }

    pub fn to_bytes(&self, device_id: u8, user_ref: u8) -> Vec<u8> {
        let mut v = vec![SYSEX_START, AKAI_ID, S56K_ID, device_id, user_ref,
                         self.section as u8, self.item];
        v.extend_from_slice(&self.data);
        v.push(SYSEX_END);
        v
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseStatus {
    /// Acknowledgement only, more frames follow
    Ok,
    Done,
    Reply,
    Error,
    Unknown(u8),
}

impl ResponseStatus {
    pub fn from_u8(b: u8) -> Self {
        match b {
            b'O' => ResponseStatus::Ok,
            b'D' => ResponseStatus::Done,
            b'R' => ResponseStatus::Reply,
            b'E' => ResponseStatus::Error,
            b => ResponseStatus::Unknown(b)
        }
    }

    pub fn to_u8(&self) -> u8 {
        match self {
            ResponseStatus::Ok => b'O',
            ResponseStatus::Done => b'D',
            ResponseStatus::Reply => b'R',
            ResponseStatus::Error => b'E',
            ResponseStatus::Unknown(b) => *b
        }
    }

    pub fn is_terminal(&self) -> bool {
        *self != ResponseStatus::Ok
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseStatus::Ok => write!(f, "Ok"),
            ResponseStatus::Done => write!(f, "Done"),
            ResponseStatus::Reply => write!(f, "Reply"),
            ResponseStatus::Error => write!(f, "Error"),
            ResponseStatus::Unknown(b) => write!(f, "Unknown ({})", b),
        }
    }
}

pub fn error_message(code: i32) -> &'static str {
    match code {
        0 => "Error: Not supported",
        1 => "Error: Invalid message format",
        2 => "Error: Parameter out of range",
        3 => "Error: Device: Unknown error",
        4 => "Error: Not found",
        5 => "Error: Unable to create new element",
        6 => "Error: Unable to delete item",
        129 => "Error: Checksum invalid",
        257 => "Disk error: Selected disk invalid",
        258 => "Disk error: Error during load",
        259 => "Disk error: Item not found",
        260 => "Disk error: Unable to create",
        261 => "Disk error: Folder not empty",
        262 => "Disk error: Unable to delete",
        263 => "Disk error: Unknown error",
        264 => "Disk error: Error during save",
        265 => "Disk error: Insufficient space",
        266 => "Disk error: Media is write protected",
        267 => "Disk error: Name not unique",
        268 => "Disk error: Invalid disk handle",
        269 => "Disk error: Disk is empty",
        270 => "Disk error: Aborted",
        271 => "Disk error: Failed on open",
        272 => "Disk error: Read error",
        273 => "Disk error: Disk not ready",
        274 => "Disk error: SCSI error",
        385 => "Program error: Requested keygroup does not exist",
        _ => "Error code unknown"
    }
}

/// A classified section/item response. Frames too short to classify turn
/// into an `Error` response with code -1, never into a failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SysexResponse {
    pub product_id: u8,
    pub device_id: u8,
    pub user_ref: u8,
    pub status: ResponseStatus,
    pub error_code: i32,
    pub message: String,
    /// Only set for `REPLY` frames
    pub section: Option<u8>,
    pub item: Option<u8>,
    pub data: Vec<u8>,
}

impl SysexResponse {
    fn unknown() -> Self {
        SysexResponse {
            product_id: 0,
            device_id: 0,
            user_ref: 0,
            status: ResponseStatus::Error,
            error_code: -1,
            message: "Unknown".into(),
            section: None,
            item: None,
            data: vec![],
        }
    }

    /// Classify a full SysEx frame (`F0 47 ... F7`)
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let body = match bytes {
            [SYSEX_START, AKAI_ID, body @ .., SYSEX_END] => body,
            _ => {
                warn!("Not an Akai SysEx frame: {:02x?}", bytes);
                return Self::unknown();
            }
        };
        if body.len() < 6 {
            warn!("SysEx frame too short: {:02x?}", bytes);
            return Self::unknown();
        }

        let status = ResponseStatus::from_u8(body[3]);
        let (section, item, data) = match status {
            ResponseStatus::Reply => (Some(body[4]), Some(body[5]), &body[6 ..]),
            _ => (None, None, &body[4 ..])
        };
        let (error_code, message) = match status {
            ResponseStatus::Error => {
                let code = body[4] as i32 * 128 + body[5] as i32;
                (code, error_message(code).to_string())
            }
            _ => (-1, status.to_string())
        };

        SysexResponse {
            product_id: body[0],
            device_id: body[1],
            user_ref: body[2],
            status,
            error_code,
            message,
            section,
            item,
            data: data.to_vec(),
        }
    }

    pub fn is_reply(&self) -> bool {
        self.status == ResponseStatus::Reply
    }
}

/// A protocol-level result: `data` is only meaningful when `errors` is empty
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SysexResult<T> {
    pub errors: Vec<String>,
    pub data: T,
}

pub type NumberResult = SysexResult<i64>;
pub type StringResult = SysexResult<String>;
pub type ByteArrayResult = SysexResult<Vec<u8>>;
pub type BooleanResult = SysexResult<bool>;

impl<T> SysexResult<T> {
    pub fn ok(data: T) -> Self {
        SysexResult { errors: vec![], data }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> SysexResult<U> {
        SysexResult { errors: self.errors, data: f(self.data) }
    }
}

impl<T: Default> SysexResult<T> {
    pub fn error(message: String) -> Self {
        SysexResult { errors: vec![message], data: T::default() }
    }
}

fn malformed(kind: &str, res: &SysexResponse) -> String {
    format!("Malformed REPLY message for {}: {}: {}", kind, res.status.to_u8(), res.message)
}

/// Big-endian number of `width` bytes. Signed numbers carry a sign flag
/// (1 = negative) in the first byte followed by `width - 1` magnitude bytes.
pub fn number_result(res: &SysexResponse, width: usize, signed: bool) -> NumberResult {
    if signed && width < 2 {
        return NumberResult::error(
            format!("Signed NumberResult needs at least two bytes, got width {}", width));
    }
    if !res.is_reply() || res.data.len() < width {
        return NumberResult::error(malformed("NumberResult", res));
    }

    let (offset, length) = if signed { (1, width - 1) } else { (0, width) };
    let magnitude = bytes_to_number_be(&res.data[offset .. offset + length]) as i64;
    let value = if signed && res.data[0] != 0 { -magnitude } else { magnitude };
    NumberResult::ok(value)
}

/// Data bytes as character codes, zero bytes skipped
pub fn string_result(res: &SysexResponse) -> StringResult {
    if !res.is_reply() || res.data.is_empty() {
        return StringResult::error(malformed("StringResult", res));
    }
    StringResult::ok(res.data.iter()
        .filter(|b| **b != 0)
        .map(|b| *b as char)
        .collect())
}

pub fn byte_array_result(res: &SysexResponse, count: usize) -> ByteArrayResult {
    if !res.is_reply() || res.data.len() < count {
        return ByteArrayResult::error(malformed("ByteArrayResult", res));
    }
    ByteArrayResult::ok(res.data[.. count].to_vec())
}

pub fn boolean_result(res: &SysexResponse) -> BooleanResult {
    number_result(res, 1, false).map(|n| n != 0)
}

/// Outcome of a "set" request: anything but `ERROR` counts as success
pub fn status_result(res: &SysexResponse) -> SysexResult<()> {
    match res.status {
        ResponseStatus::Error => SysexResult::error(
            format!("{} (code {})", res.message, res.error_code)),
        _ => SysexResult::ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(body: &[u8]) -> Vec<u8> {
        let mut v = vec![0xf0, 0x47];
        v.extend_from_slice(body);
        v.push(0xf7);
        v
    }

    #[test]
    fn control_message_framing() {
        let msg = ControlMessage::program(ProgramItem::GetKeygroupCount, &[]);
        assert_eq!(msg.to_bytes(0, 0), vec![0xf0, 0x47, 0x5e, 0x00, 0x00, 0x0a, 0x14, 0xf7]);
        let msg = ControlMessage::program(ProgramItem::GetAmpModSource, &[2]);
        assert_eq!(msg.to_bytes(1, 3), vec![0xf0, 0x47, 0x5e, 0x01, 0x03, 0x0a, 0x2a, 0x02, 0xf7]);
    }

    #[test]
    fn reply_keygroup_count() {
        let res = SysexResponse::from_bytes(&frame(&[0x5e, 0, 0, b'R', 0x0a, 0x14, 0x00, 0x01]));
        assert_eq!(res.status, ResponseStatus::Reply);
        assert_eq!(res.section, Some(0x0a));
        assert_eq!(res.item, Some(0x14));
        assert_eq!(res.data, vec![0x00, 0x01]);

        assert_eq!(number_result(&res, 2, false), NumberResult { errors: vec![], data: 1 });
    }

    #[test]
    fn error_reply() {
        let res = SysexResponse::from_bytes(&frame(&[0x5e, 0, 0, b'E', 0x00, 0x00]));
        assert_eq!(res.status, ResponseStatus::Error);
        assert_eq!(res.error_code, 0);
        assert_eq!(res.message, "Error: Not supported");
        assert_eq!(res.section, None);

        let n = number_result(&res, 1, false);
        assert_eq!(n.errors.len(), 1);
        assert_eq!(n.data, 0);
        assert!(n.errors[0].starts_with("Malformed REPLY message for NumberResult: 69: Error: Not supported"));

        let res = SysexResponse::from_bytes(&frame(&[0x5e, 0, 0, b'E', 0x03, 0x01]));
        assert_eq!(res.error_code, 385);
        assert_eq!(res.message, "Program error: Requested keygroup does not exist");
    }

    #[test]
    fn signed_numbers() {
        let res = SysexResponse::from_bytes(&frame(&[0x5e, 0, 0, b'R', 0x0a, 0x29, 1, 5]));
        assert_eq!(number_result(&res, 2, true).data, -5);
        let res = SysexResponse::from_bytes(&frame(&[0x5e, 0, 0, b'R', 0x0a, 0x29, 0, 5]));
        assert_eq!(number_result(&res, 2, true).data, 5);
        assert!(!number_result(&res, 1, true).is_ok());
    }

    #[test]
    fn short_frames_degrade_to_errors() {
        let res = SysexResponse::from_bytes(&frame(&[0x5e, 0, 0]));
        assert_eq!(res.status, ResponseStatus::Error);
        assert_eq!(res.error_code, -1);
        assert_eq!(res.message, "Unknown");
        assert!(!string_result(&res).is_ok());

        let res = SysexResponse::from_bytes(&[0x90, 0x40, 0x7f]);
        assert_eq!(res.error_code, -1);
    }

    #[test]
    fn strings_bytes_and_booleans() {
        let res = SysexResponse::from_bytes(&frame(&[0x5e, 0, 0, b'R', 0x0a, 0x13, b'P', b'I', b'A', b'N', b'O', 0]));
        assert_eq!(string_result(&res).data, "PIANO");
        assert_eq!(byte_array_result(&res, 2).data, vec![b'P', b'I']);
        assert!(!byte_array_result(&res, 20).is_ok());

        let res = SysexResponse::from_bytes(&frame(&[0x5e, 0, 0, b'R', 0x0a, 0x4d, 1]));
        assert_eq!(boolean_result(&res), BooleanResult { errors: vec![], data: true });

        // DONE frames are terminal but carry no reply data
        let res = SysexResponse::from_bytes(&frame(&[0x5e, 0, 0, b'D', 0x0a, 0x20]));
        assert!(res.status.is_terminal());
        assert!(!boolean_result(&res).is_ok());
        assert!(status_result(&res).is_ok());

        let res = SysexResponse::from_bytes(&frame(&[0x5e, 0, 0, b'E', 0x00, 0x02]));
        assert_eq!(status_result(&res).errors, vec!["Error: Parameter out of range (code 2)".to_string()]);
    }
}
