use anyhow::{Context, Result};
use log::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chunk::*;
use crate::error::CodecResult;

/// An S5000/S6000 `.AKP` program
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Program {
    #[serde(skip)]
    pub header: HeaderChunk,
    #[serde(flatten)]
    pub program: ProgramChunk,
    pub output: OutputChunk,
    pub tune: TuneChunk,
    pub lfo1: Lfo1Chunk,
    pub lfo2: Lfo2Chunk,
    pub mods: ModsChunk,
    pub keygroups: Vec<KeygroupChunk>,
}

impl Program {
    pub fn new() -> Self {
        let mut p = Program::default();
        p.program.keygroup_count = 1;
        p.keygroups.push(KeygroupChunk::default());
        p
    }

    pub fn from_buffer(buf: &[u8]) -> CodecResult<Self> {
        let mut p = Program::default();
        p.parse(buf, 0)?;
        Ok(p)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .context("Failed to parse program JSON")?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let explicit_count = value.get("keygroupCount").is_some();
        let mut p: Program = serde_json::from_value(value)
            .context("Program JSON does not match the program model")?;
        if !explicit_count {
            p.program.keygroup_count = p.keygroups.len() as i8;
        }
        p.normalize();
        Ok(p)
    }

    pub fn to_json(&self) -> Result<Value> {
        serde_json::to_value(self).context("Failed to serialize program")
    }

    /// Parse header, program, output, tune, both LFOs, mods and then
    /// `keygroup_count` keygroups. Returns the number of bytes consumed.
    pub fn parse(&mut self, buf: &[u8], offset: usize) -> CodecResult<usize> {
        let mut pos = offset;
        pos += self.header.parse(buf, pos)?;
        pos += self.program.parse(buf, pos)?;
        pos += self.output.parse(buf, pos)?;
        pos += self.tune.parse(buf, pos)?;
        pos += self.lfo1.parse(buf, pos)?;
        pos += self.lfo2.parse(buf, pos)?;
        pos += self.mods.parse(buf, pos)?;

        self.keygroups.clear();
        for _ in 0 .. self.keygroup_count() {
            let mut kg = KeygroupChunk::default();
            pos += kg.parse(buf, pos)?;
            self.keygroups.push(kg);
        }
        debug!("Parsed program {} with {} keygroup(s), {} bytes",
            self.program.program_number, self.keygroups.len(), pos - offset);

        Ok(pos - offset)
    }

    /// Number of bytes `write_to_buffer` produces
    pub fn byte_length(&self) -> usize {
        HeaderChunk::SIZE +
            [
                ProgramChunk::LENGTH, OutputChunk::LENGTH, TuneChunk::LENGTH,
                Lfo1Chunk::LENGTH, Lfo2Chunk::LENGTH, ModsChunk::LENGTH
            ].iter().map(|l| l + CHUNK_HEADER_LENGTH).sum::<usize>() +
            self.keygroups.len() * (KeygroupChunk::LENGTH + CHUNK_HEADER_LENGTH)
    }

    pub fn write_to_buffer(&self, buf: &mut [u8], offset: usize) -> CodecResult<usize> {
        let mut pos = offset;
        pos += self.header.write(buf, pos)?;
        pos += self.program.write(buf, pos)?;
        pos += self.output.write(buf, pos)?;
        pos += self.tune.write(buf, pos)?;
        pos += self.lfo1.write(buf, pos)?;
        pos += self.lfo2.write(buf, pos)?;
        pos += self.mods.write(buf, pos)?;
        for kg in &self.keygroups {
            pos += kg.write(buf, pos)?;
        }

        Ok(pos - offset)
    }

    pub fn to_bytes(&self) -> CodecResult<Vec<u8>> {
        let mut buf = vec![0u8; self.byte_length()];
        self.write_to_buffer(&mut buf, 0)?;
        Ok(buf)
    }

    /// Deep-merge a partial JSON object over this program. Objects merge
    /// key by key, arrays element by element, anything else is replaced.
    /// When the patch changes `keygroupCount`, keygroups are appended as
    /// copies of the last one or dropped from the end.
    pub fn apply(&mut self, patch: &Value) -> Result<()> {
        if !patch.is_object() {
            bail!("Program patch must be a JSON object, got {}", patch);
        }

        let mut value = self.to_json()?;
        merge_json(&mut value, patch);
        let mut updated: Program = serde_json::from_value(value)
            .context("Patched program does not match the program model")?;

        updated.header = self.header.clone();
        updated.program.inherit_padding(&self.program);
        updated.output.inherit_padding(&self.output);
        updated.tune.inherit_padding(&self.tune);
        updated.lfo1.inherit_padding(&self.lfo1);
        updated.lfo2.inherit_padding(&self.lfo2);
        updated.mods.inherit_padding(&self.mods);
        for (i, kg) in updated.keygroups.iter_mut().enumerate() {
            if let Some(old) = self.keygroups.get(i).or(self.keygroups.last()) {
                kg.inherit_padding(old);
            }
        }

        if patch.get("keygroupCount").is_none() && patch.get("keygroups").is_some() {
            updated.program.keygroup_count = updated.keygroups.len() as i8;
        }
        updated.normalize();

        *self = updated;
        Ok(())
    }

    /// Bring the keygroup list in line with `keygroup_count` and re-derive
    /// the stored zone names.
    fn normalize(&mut self) {
        let count = self.keygroup_count();
        if self.keygroups.len() < count {
            let proto = self.keygroups.last().cloned().unwrap_or_default();
            info!("Adding {} keygroup(s)", count - self.keygroups.len());
            self.keygroups.resize(count, proto);
        } else if self.keygroups.len() > count {
            info!("Dropping {} keygroup(s)", self.keygroups.len() - count);
            self.keygroups.truncate(count);
        }

        for kg in self.keygroups.iter_mut() {
            for zone in kg.zones_mut() {
                zone.sync_sample_name();
            }
        }
    }

    pub fn program_number(&self) -> i8 {
        self.program.program_number
    }

    pub fn keygroup_count(&self) -> usize {
        self.program.keygroup_count.max(0) as usize
    }

    pub fn output(&self) -> &OutputChunk {
        &self.output
    }

    pub fn tune(&self) -> &TuneChunk {
        &self.tune
    }

    pub fn lfo1(&self) -> &Lfo1Chunk {
        &self.lfo1
    }

    pub fn lfo2(&self) -> &Lfo2Chunk {
        &self.lfo2
    }

    pub fn mods(&self) -> &ModsChunk {
        &self.mods
    }

    pub fn keygroups(&self) -> &[KeygroupChunk] {
        &self.keygroups
    }
}

pub fn merge_json(base: &mut Value, patch: &Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (k, v) in patch {
                match base.get_mut(k) {
                    Some(b) => merge_json(b, v),
                    None => { base.insert(k.clone(), v.clone()); }
                }
            }
        }
        (Value::Array(base), Value::Array(patch)) => {
            for (i, v) in patch.iter().enumerate() {
                match base.get_mut(i) {
                    Some(b) => merge_json(b, v),
                    None => {
                        // new elements start from the last existing one
                        let mut item = base.last().cloned().unwrap_or(Value::Null);
                        merge_json(&mut item, v);
                        base.push(item);
                    }
                }
            }
        }
        (base, patch) => *base = patch.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_program_round_trips() {
        let p = Program::new();
        let bytes = p.to_bytes().unwrap();
        assert_eq!(bytes.len(), p.byte_length());
        assert_eq!(&bytes[.. 4], b"RIFF");
        assert_eq!(Program::from_buffer(&bytes).unwrap(), p);
    }

    #[test]
    fn json_uses_camel_case() {
        let mut p = Program::new();
        p.output.loudness = 80;
        p.keygroups[0].kloc.low_note = 21;
        p.keygroups[0].zone1.set_sample_name("BASS");

        let v = p.to_json().unwrap();
        assert_eq!(v["keygroupCount"], 1);
        assert_eq!(v["programNumber"], 0);
        assert_eq!(v["output"]["loudness"], 80);
        assert_eq!(v["keygroups"][0]["kloc"]["lowNote"], 21);
        assert_eq!(v["keygroups"][0]["zone1"]["sampleName"], "BASS");
        assert!(v["mods"].get("ampMod1Source").is_some());

        assert_eq!(Program::from_value(v).unwrap(), p);
    }

    #[test]
    fn apply_grows_keygroups_from_the_last_one() {
        let mut p = Program::new();
        p.keygroups[0].amp_envelope.attack = 7;

        p.apply(&json!({
            "keygroupCount": 3,
            "keygroups": [
                { "kloc": { "lowNote": 60, "highNote": 60 }, "zone1": { "sampleName": "KICK" } },
                {},
                { "kloc": { "lowNote": 62 } }
            ]
        })).unwrap();

        assert_eq!(p.keygroups.len(), 3);
        assert_eq!(p.keygroup_count(), 3);
        assert_eq!(p.keygroups[0].kloc.low_note, 60);
        assert_eq!(p.keygroups[0].zone1.sample_name, "KICK");
        assert_eq!(p.keygroups[0].zone1.sample_name_length, 4);
        assert_eq!(p.keygroups[1].zone1.sample_name, "KICK");
        assert_eq!(p.keygroups[2].kloc.low_note, 62);
        assert_eq!(p.keygroups[2].amp_envelope.attack, 7);
    }

    #[test]
    fn apply_shrinks_keygroups() {
        let mut p = Program::new();
        p.apply(&json!({ "keygroupCount": 4 })).unwrap();
        assert_eq!(p.keygroups.len(), 4);
        p.apply(&json!({ "keygroupCount": 2, "output": { "loudness": 70 } })).unwrap();
        assert_eq!(p.keygroups.len(), 2);
        assert_eq!(p.output.loudness, 70);
    }

    #[test]
    fn apply_rejects_non_objects() {
        let mut p = Program::new();
        assert!(p.apply(&json!([1, 2])).is_err());
        assert!(p.apply(&json!({ "output": { "loudness": "loud" } })).is_err());
        assert_eq!(p, Program::new());
    }

    #[test]
    fn merge_replaces_scalars_and_merges_objects() {
        let mut base = json!({ "a": 1, "b": { "c": 2, "d": 3 }, "e": [1, 2] });
        merge_json(&mut base, &json!({ "b": { "c": 5 }, "e": [9], "f": true }));
        assert_eq!(base, json!({ "a": 1, "b": { "c": 5, "d": 3 }, "e": [9, 2], "f": true }));
    }
}
