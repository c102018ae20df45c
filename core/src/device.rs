use anyhow::Result;
use log::*;
use serde::Serialize;

use crate::driver::{LegacyDriver, SysexDriver};
use crate::header::*;
use crate::midi::{MidiMessage, MidiResponse};
use crate::raw::RawRecord;
use crate::sysex::*;

/// Per-kind plumbing for `device_object!` fields:
/// `uint8` is one unsigned byte, `int8sign` a sign flag followed by the
/// magnitude, `bool` a single 0/1 byte.
macro_rules! device_field {
    (@type uint8) => (NumberResult);
    (@type int8sign) => (NumberResult);
    (@type bool) => (BooleanResult);

    (@arg uint8) => (u8);
    (@arg int8sign) => (i8);
    (@arg bool) => (bool);

    (@decode uint8, $res:expr) => (number_result($res, 1, false));
    (@decode int8sign, $res:expr) => (number_result($res, 2, true));
    (@decode bool, $res:expr) => (boolean_result($res));

    (@encode uint8, $v:expr) => ([$v]);
    (@encode int8sign, $v:expr) => ([($v < 0) as u8, $v.unsigned_abs()]);
    (@encode bool, $v:expr) => ([$v as u8]);
}

/// Generate a device object with a typed getter/setter pair per table row:
///
/// ```ignore
/// getter, setter: kind = GetItem, SetItem;
/// ```
///
/// Every request carries the object's `prefix` bytes (e.g. the LFO number)
/// ahead of the argument bytes.
macro_rules! device_object {
    (
        $(#[$meta:meta])*
        pub struct $name:ident($section:expr, $items:ident) {
            $(
                $(#[$fmeta:meta])*
                $getter:ident, $setter:ident: $kind:ident = $get:ident, $set:ident;
            )*
        }
    ) => {
        $(#[$meta])*
        pub struct $name<'a> {
            driver: &'a SysexDriver,
            prefix: Vec<u8>,
        }

        impl<'a> $name<'a> {
            pub fn with_prefix(driver: &'a SysexDriver, prefix: &[u8]) -> Self {
                $name { driver, prefix: prefix.to_vec() }
            }

            async fn request(&self, item: $items, args: &[u8]) -> Result<SysexResponse> {
                let mut data = self.prefix.clone();
                data.extend_from_slice(args);
                self.driver.request(&ControlMessage::new($section, item as u8, &data)).await
            }

            $(
                $(#[$fmeta])*
                pub async fn $getter(&self) -> Result<device_field!(@type $kind)> {
                    let res = self.request($items::$get, &[]).await?;
                    Ok(device_field!(@decode $kind, &res))
                }

                pub async fn $setter(&self, value: device_field!(@arg $kind)) -> Result<SysexResult<()>> {
                    let res = self.request($items::$set, &device_field!(@encode $kind, value)).await?;
                    Ok(status_result(&res))
                }
            )*
        }
    }
}

device_object! {
    /// Program output settings
    pub struct ProgramOutput(Section::Program, ProgramItem) {
        loudness, set_loudness: uint8 = GetLoudness, SetLoudness;
        velocity_sensitivity, set_velocity_sensitivity: int8sign = GetVelocitySensitivity, SetVelocitySensitivity;
    }
}

impl<'a> ProgramOutput<'a> {
    pub fn new(driver: &'a SysexDriver) -> Self {
        Self::with_prefix(driver, &[])
    }

    /// Source of amp mod 1 or 2
    pub async fn amp_mod_source(&self, amp_mod: u8) -> Result<NumberResult> {
        let res = self.request(ProgramItem::GetAmpModSource, &[amp_mod]).await?;
        Ok(byte_array_result(&res, 1).map(|b| b.first().copied().unwrap_or_default() as i64))
    }

    pub async fn amp_mod_value(&self, amp_mod: u8) -> Result<NumberResult> {
        let res = self.request(ProgramItem::GetAmpModValue, &[amp_mod]).await?;
        Ok(number_result(&res, 2, true))
    }

    /// Source of pan mod 1, 2 or 3
    pub async fn pan_mod_source(&self, pan_mod: u8) -> Result<NumberResult> {
        let res = self.request(ProgramItem::GetPanModSource, &[pan_mod]).await?;
        Ok(number_result(&res, 1, false))
    }

    pub async fn pan_mod_value(&self, pan_mod: u8) -> Result<NumberResult> {
        let res = self.request(ProgramItem::GetPanModValue, &[pan_mod]).await?;
        Ok(number_result(&res, 2, true))
    }
}

device_object! {
    /// Program MIDI and tuning settings
    pub struct ProgramMidiTune(Section::Program, ProgramItem) {
        semitone_tune, set_semitone_tune: int8sign = GetSemitoneTune, SetSemitoneTune;
        fine_tune, set_fine_tune: int8sign = GetFineTune, SetFineTune;
        tune_template, set_tune_template: uint8 = GetTuneTemplate, SetTuneTemplate;
        user_tune_template, set_user_tune_template: uint8 = GetUserTuneTemplate, SetUserTuneTemplate;
        key, set_key: uint8 = GetKey, SetKey;
    }
}

device_object! {
    /// Program pitch bend, aftertouch and portamento settings
    pub struct ProgramPitchBend(Section::Program, ProgramItem) {
        pitch_bend_up, set_pitch_bend_up: uint8 = GetPitchBendUp, SetPitchBendUp;
        pitch_bend_down, set_pitch_bend_down: uint8 = GetPitchBendDown, SetPitchBendDown;
        pitch_bend_mode, set_pitch_bend_mode: uint8 = GetPitchBendMode, SetPitchBendMode;
        aftertouch_mod, set_aftertouch_mod: int8sign = GetAftertouchMod, SetAftertouchMod;
        aftertouch_value, set_aftertouch_value: uint8 = GetAftertouchValue, SetAftertouchValue;
        portamento_enable, set_portamento_enable: bool = GetPortamentoEnable, SetPortamentoEnable;
        portamento_mode, set_portamento_mode: uint8 = GetPortamentoMode, SetPortamentoMode;
        portamento_time, set_portamento_time: uint8 = GetPortamentoTime, SetPortamentoTime;
    }
}

device_object! {
    /// One of the two program LFOs
    pub struct ProgramLfo(Section::Program, ProgramItem) {
        rate, set_rate: uint8 = GetLfoRate, SetLfoRate;
        delay, set_delay: uint8 = GetLfoDelay, SetLfoDelay;
        depth, set_depth: uint8 = GetLfoDepth, SetLfoDepth;
    }
}

impl<'a> ProgramMidiTune<'a> {
    pub fn new(driver: &'a SysexDriver) -> Self {
        Self::with_prefix(driver, &[])
    }
}

impl<'a> ProgramPitchBend<'a> {
    pub fn new(driver: &'a SysexDriver) -> Self {
        Self::with_prefix(driver, &[])
    }
}

impl<'a> ProgramLfo<'a> {
    /// `lfo` is 1 or 2
    pub fn new(driver: &'a SysexDriver, lfo: u8) -> Self {
        Self::with_prefix(driver, &[lfo])
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramInfo {
    pub name: String,
    pub id: i64,
    pub index: i64,
    pub keygroup_count: i64,
    pub loudness: i64,
    pub velocity_sensitivity: i64,
    pub amp_mod1_source: i64,
    pub amp_mod2_source: i64,
}

/// The program currently selected on an S5000/S6000
pub struct S56kProgram<'a> {
    driver: &'a SysexDriver,
}

impl<'a> S56kProgram<'a> {
    async fn request(&self, item: ProgramItem) -> Result<SysexResponse> {
        self.driver.request(&ControlMessage::program(item, &[])).await
    }

    pub async fn name(&self) -> Result<StringResult> {
        Ok(string_result(&self.request(ProgramItem::GetName).await?))
    }

    pub async fn id(&self) -> Result<NumberResult> {
        Ok(number_result(&self.request(ProgramItem::GetId).await?, 2, false))
    }

    pub async fn index(&self) -> Result<NumberResult> {
        Ok(number_result(&self.request(ProgramItem::GetIndex).await?, 2, false))
    }

    pub async fn keygroup_count(&self) -> Result<NumberResult> {
        Ok(number_result(&self.request(ProgramItem::GetKeygroupCount).await?, 1, false))
    }

    pub fn output(&self) -> ProgramOutput<'a> {
        ProgramOutput::new(self.driver)
    }

    pub fn midi_tune(&self) -> ProgramMidiTune<'a> {
        ProgramMidiTune::new(self.driver)
    }

    pub fn pitch_bend(&self) -> ProgramPitchBend<'a> {
        ProgramPitchBend::new(self.driver)
    }

    pub fn lfo(&self, lfo: u8) -> ProgramLfo<'a> {
        ProgramLfo::new(self.driver, lfo)
    }

    /// Fetch the program summary, collecting the errors of every fetch
    pub async fn info(&self) -> Result<SysexResult<ProgramInfo>> {
        let output = self.output();

        let id = self.id().await?;
        let index = self.index().await?;
        let keygroup_count = self.keygroup_count().await?;
        let name = self.name().await?;
        let loudness = output.loudness().await?;
        let velocity_sensitivity = output.velocity_sensitivity().await?;
        let amp_mod1_source = output.amp_mod_source(1).await?;
        let amp_mod2_source = output.amp_mod_source(2).await?;

        let errors = [
            &id.errors, &index.errors, &keygroup_count.errors, &name.errors, &loudness.errors,
            &velocity_sensitivity.errors, &amp_mod1_source.errors, &amp_mod2_source.errors
        ].into_iter().flatten().cloned().collect::<Vec<_>>();
        if !errors.is_empty() {
            warn!("Program info: {} error(s)", errors.len());
        }

        Ok(SysexResult {
            errors,
            data: ProgramInfo {
                name: name.data,
                id: id.data,
                index: index.data,
                keygroup_count: keygroup_count.data,
                loudness: loudness.data,
                velocity_sensitivity: velocity_sensitivity.data,
                amp_mod1_source: amp_mod1_source.data,
                amp_mod2_source: amp_mod2_source.data,
            }
        })
    }
}

/// S5000/S6000 over the section/item protocol
pub struct S56kDevice {
    driver: SysexDriver,
}

impl S56kDevice {
    pub fn new(driver: SysexDriver) -> Self {
        S56kDevice { driver }
    }

    pub fn driver(&self) -> &SysexDriver {
        &self.driver
    }

    pub async fn ping(&self) -> Result<SysexResponse> {
        self.driver.request(&ControlMessage::query()).await
    }

    pub async fn program_count(&self) -> Result<NumberResult> {
        let res = self.driver.request(&ControlMessage::program(ProgramItem::GetProgramCount, &[])).await?;
        Ok(number_result(&res, 2, false))
    }

    pub fn current_program(&self) -> S56kProgram<'_> {
        S56kProgram { driver: &self.driver }
    }
}

/// S1000/S3000XL over the legacy opcode protocol
pub struct S3000xlDevice {
    driver: LegacyDriver,
}

impl S3000xlDevice {
    pub fn new(driver: LegacyDriver) -> Self {
        S3000xlDevice { driver }
    }

    pub fn driver(&self) -> &LegacyDriver {
        &self.driver
    }

    fn channel(&self) -> u8 {
        self.driver.channel()
    }

    pub async fn status(&self) -> Result<Vec<u8>> {
        match self.driver.request(&MidiMessage::StatusRequest { channel: self.channel() }).await? {
            MidiResponse::Status { data, .. } => Ok(data),
            r => bail!("Unexpected response to RSTAT: {:?}", r)
        }
    }

    pub async fn sample_names(&self) -> Result<Vec<String>> {
        match self.driver.request(&MidiMessage::SampleListRequest { channel: self.channel() }).await? {
            MidiResponse::SampleList { names, .. } => {
                info!("{} resident sample(s)", names.len());
                Ok(names)
            }
            r => bail!("Unexpected response to RSLIST: {:?}", r)
        }
    }

    pub async fn program_names(&self) -> Result<Vec<String>> {
        match self.driver.request(&MidiMessage::ProgramListRequest { channel: self.channel() }).await? {
            MidiResponse::ProgramList { names, .. } => {
                info!("{} resident program(s)", names.len());
                Ok(names)
            }
            r => bail!("Unexpected response to RPLIST: {:?}", r)
        }
    }

    pub async fn program_header(&self, program: u16) -> Result<RawRecord<ProgramHeader>> {
        let msg = MidiMessage::ProgramRequest { channel: self.channel(), program };
        match self.driver.request(&msg).await? {
            MidiResponse::ProgramData { record, .. } => Ok(record),
            r => bail!("Unexpected response to RPDATA: {:?}", r)
        }
    }

    pub async fn keygroup_header(&self, program: u16, keygroup: u8) -> Result<RawRecord<KeygroupHeader>> {
        let msg = MidiMessage::KeygroupRequest { channel: self.channel(), program, keygroup };
        match self.driver.request(&msg).await? {
            MidiResponse::KeygroupData { record, .. } => Ok(record),
            r => bail!("Unexpected response to RKDATA: {:?}", r)
        }
    }

    pub async fn sample_header(&self, sample: u16) -> Result<RawRecord<SampleHeader>> {
        let msg = MidiMessage::SampleHeaderRequest { channel: self.channel(), sample };
        match self.driver.request(&msg).await? {
            MidiResponse::SampleHeaderData { record, .. } => Ok(record),
            r => bail!("Unexpected response to RSDATA: {:?}", r)
        }
    }

    pub async fn send_program_header(&self, program: u16, record: &RawRecord<ProgramHeader>) -> Result<()> {
        self.driver.send(&MidiMessage::ProgramData {
            channel: self.channel(), program, record: record.clone()
        }).await
    }

    pub async fn send_keygroup_header(&self, program: u16, keygroup: u8, record: &RawRecord<KeygroupHeader>) -> Result<()> {
        self.driver.send(&MidiMessage::KeygroupData {
            channel: self.channel(), program, keygroup, record: record.clone()
        }).await
    }

    pub async fn send_sample_header(&self, sample: u16, record: &RawRecord<SampleHeader>) -> Result<()> {
        self.driver.send(&MidiMessage::SampleHeaderData {
            channel: self.channel(), sample, record: record.clone()
        }).await
    }

    async fn command(&self, msg: MidiMessage) -> Result<()> {
        let opcode = msg.opcode();
        match self.driver.request(&msg).await? {
            MidiResponse::Reply { code: 0, .. } => Ok(()),
            MidiResponse::Reply { code, .. } => bail!("{:?} failed with reply code {}", opcode, code),
            r => bail!("Unexpected response to {:?}: {:?}", opcode, r)
        }
    }

    pub async fn delete_program(&self, program: u16) -> Result<()> {
        self.command(MidiMessage::DeleteProgram { channel: self.channel(), program }).await
    }

    pub async fn delete_keygroup(&self, program: u16, keygroup: u8) -> Result<()> {
        self.command(MidiMessage::DeleteKeygroup { channel: self.channel(), program, keygroup }).await
    }

    pub async fn delete_sample(&self, sample: u16) -> Result<()> {
        self.command(MidiMessage::DeleteSample { channel: self.channel(), sample }).await
    }

    /// Move the device to another exclusive channel. Requests keep using
    /// the channel the driver was configured with.
    pub async fn set_exclusive_channel(&self, new_channel: u8) -> Result<()> {
        self.driver.send(&MidiMessage::SetExclusiveChannel { channel: self.channel(), new_channel }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DriverConfig;
    use crate::midi_io::{box_midi_in, box_midi_out, channel_ports};
    use tokio::sync::mpsc;

    /// A fake S6000 answering every request from `answer`
    fn s56k<F>(answer: F) -> (S56kDevice, mpsc::UnboundedReceiver<Vec<u8>>)
        where F: Fn(u8, &[u8]) -> Vec<u8> + Send + 'static
    {
        let (midi_in, midi_out, in_tx, mut out_rx) = channel_ports("s6000");
        let (seen_tx, seen_rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while let Some(req) = out_rx.recv().await {
                let item = req[6];
                let body = answer(item, &req[7 .. req.len() - 1]);
                let mut frame = vec![0xf0, 0x47];
                frame.extend(body);
                frame.push(0xf7);
                let _ = seen_tx.send(req);
                if in_tx.send(frame).is_err() {
                    break;
                }
            }
        });
        let driver = SysexDriver::new(box_midi_in(midi_in), box_midi_out(midi_out), DriverConfig::s56k());
        (S56kDevice::new(driver), seen_rx)
    }

    fn reply(item: u8, data: &[u8]) -> Vec<u8> {
        let mut v = vec![0x5e, 0x00, 0x00, b'R', 0x0a, item];
        v.extend_from_slice(data);
        v
    }

    #[tokio::test]
    async fn generated_getters_and_setters() {
        let (device, mut seen) = s56k(|item, data| match item {
            0x28 => reply(item, &[85]),
            0x38 => reply(item, &[1, 12]),
            0x4d => reply(item, &[1]),
            0x60 => reply(item, &[data[0] * 10]),
            _ => vec![0x5e, 0x00, 0x00, b'D', 0x0a, item],
        });
        let program = device.current_program();

        assert_eq!(program.output().loudness().await.unwrap().data, 85);
        assert_eq!(program.midi_tune().semitone_tune().await.unwrap().data, -12);
        assert!(program.pitch_bend().portamento_enable().await.unwrap().data);
        assert_eq!(program.lfo(2).rate().await.unwrap().data, 20);

        assert!(program.midi_tune().set_fine_tune(-7).await.unwrap().is_ok());
        assert!(program.lfo(1).set_depth(99).await.unwrap().is_ok());

        let sent = (0 .. 6).map(|_| seen.try_recv().unwrap()).collect::<Vec<_>>();
        assert_eq!(&sent[3][5 .. 8], &[0x0a, 0x60, 2]);
        assert_eq!(&sent[4][5 .. 9], &[0x0a, 0x31, 1, 7]);
        assert_eq!(&sent[5][5 .. 9], &[0x0a, 0x52, 1, 99]);
    }

    #[tokio::test]
    async fn info_collects_every_error() {
        let (device, _seen) = s56k(|item, data| match item {
            0x11 => reply(item, &[0, 3]),
            0x12 => reply(item, &[0, 7]),
            0x13 => reply(item, b"BASS\0"),
            0x28 => reply(item, &[80]),
            0x29 => reply(item, &[0, 25]),
            0x2a if data == [1] => reply(item, &[6]),
            // keygroup count and amp mod 2 fail
            _ => vec![0x5e, 0x00, 0x00, b'E', 0x00, 0x04],
        });

        let info = device.current_program().info().await.unwrap();
        assert_eq!(info.errors.len(), 2);
        assert_eq!(info.data.name, "BASS");
        assert_eq!(info.data.id, 3);
        assert_eq!(info.data.index, 7);
        assert_eq!(info.data.keygroup_count, 0);
        assert_eq!(info.data.loudness, 80);
        assert_eq!(info.data.velocity_sensitivity, 25);
        assert_eq!(info.data.amp_mod1_source, 6);
        assert!(info.errors.iter().all(|e| e.contains("Error: Not found")));
    }

    #[tokio::test]
    async fn ping_and_program_count() {
        let (device, _seen) = s56k(|item, _| match item {
            0x00 => vec![0x5e, 0x00, 0x00, b'D', 0x00, 0x00],
            _ => reply(item, &[0x01, 0x02]),
        });
        assert_eq!(device.ping().await.unwrap().status, ResponseStatus::Done);
        assert_eq!(device.program_count().await.unwrap().data, 258);
    }
}
