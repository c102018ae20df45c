use anyhow::{Context, Result};
use log::*;
use std::path::Path;

use crate::error::CodecResult;
use crate::header::*;
use crate::raw::RawRecord;
use crate::util::{nibbles_to_u8_vec, u8_to_nibbles_vec};

/// Nibble index of the first keygroup in a program file
pub const KEYGROUP1_START_OFFSET: usize = 384;
pub const KEYGROUP2_START_OFFSET: usize = 768;
/// Nibble stride between consecutive keygroups
pub const KEYGROUP_LENGTH: usize = KEYGROUP2_START_OFFSET - KEYGROUP1_START_OFFSET;
/// Byte offset of the program header in a program file
pub const PROGRAM_HEADER_OFFSET: usize = 1;

/// Read a file and unpack every byte into a low/high nibble pair
pub fn read_akai_data<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {:?}", path))?;
    debug!("Read {} byte(s) from {:?}", bytes.len(), path);
    Ok(u8_to_nibbles_vec(&bytes))
}

/// A program file (`.a3p`) from a raw Akai volume: the program header plus
/// its keygroups, each backed by its own copy of the nibble data.
#[derive(Clone, Debug, PartialEq)]
pub struct AkaiProgramFile {
    pub program: RawRecord<ProgramHeader>,
    pub keygroups: Vec<RawRecord<KeygroupHeader>>,
}

impl AkaiProgramFile {
    pub fn from_nibbles(nibbles: &[u8]) -> CodecResult<Self> {
        let program = RawRecord::<ProgramHeader>::parse(nibbles, PROGRAM_HEADER_OFFSET)?;

        let count = program.header.GROUPS as usize;
        let mut keygroups = Vec::with_capacity(count);
        for i in 0 .. count {
            let start = KEYGROUP1_START_OFFSET + KEYGROUP_LENGTH * i;
            keygroups.push(Self::keygroup_at(nibbles, start)?);
        }
        info!("Loaded program {:?} with {} keygroup(s)", program.header.PRNAME, keygroups.len());

        Ok(AkaiProgramFile { program, keygroups })
    }

    /// The keygroup table is two bytes longer than the keygroup stride, so
    /// the last keygroup of a file may run past its end. Missing bytes read
    /// as zero.
    fn keygroup_at(nibbles: &[u8], start: usize) -> CodecResult<RawRecord<KeygroupHeader>> {
        let len = (KeygroupHeader::length() * 2).max(KEYGROUP_LENGTH);
        let mut data = nibbles.get(start ..).unwrap_or(&[]).to_vec();
        data.truncate(len);
        if data.len() < len {
            trace!("Keygroup at {} padded from {} to {} nibble(s)", start, data.len(), len);
            data.resize(len, 0);
        }
        RawRecord::parse(&data, 0)
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let nibbles = read_akai_data(path.as_ref())?;
        Self::from_nibbles(&nibbles)
            .with_context(|| format!("Failed to parse program file {:?}", path.as_ref()))
    }

    /// Append a copy of the last keygroup and bump `GROUPS`
    pub fn add_keygroup(&mut self) -> Result<()> {
        let proto = self.keygroups.last().cloned()
            .ok_or_else(|| anyhow!("Program {:?} has no keygroup to copy", self.program.header.PRNAME))?;
        let count = u8::try_from(self.keygroups.len() + 1)
            .map_err(|_| anyhow!("Too many keygroups"))?;

        self.program.set_keygroup_count(count)?;
        self.keygroups.push(proto);
        Ok(())
    }

    /// Reassemble the file: the program's nibbles with every keygroup laid
    /// over its slot. Keygroups are written in order, so the two trailing
    /// bytes a keygroup shares with the next one come from the later one.
    pub fn to_nibbles(&self) -> Vec<u8> {
        let mut nibbles = self.program.nibbles().to_vec();
        let needed = KEYGROUP1_START_OFFSET + KEYGROUP_LENGTH * self.keygroups.len();
        if nibbles.len() < needed {
            nibbles.resize(needed, 0);
        }
        let total = nibbles.len();

        for (i, kg) in self.keygroups.iter().enumerate() {
            let start = KEYGROUP1_START_OFFSET + KEYGROUP_LENGTH * i;
            let data = kg.nibbles();
            let n = data.len().min(total - start);
            nibbles[start .. start + n].copy_from_slice(&data[.. n]);
        }

        nibbles
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        nibbles_to_u8_vec(&self.to_nibbles())
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_akai_program(path, self)
    }
}

pub fn read_akai_program<P: AsRef<Path>>(path: P) -> Result<AkaiProgramFile> {
    AkaiProgramFile::read(path)
}

pub fn write_akai_program<P: AsRef<Path>>(path: P, program: &AkaiProgramFile) -> Result<()> {
    let path = path.as_ref();
    let bytes = program.to_bytes();
    std::fs::write(path, &bytes)
        .with_context(|| format!("Failed to write {:?}", path))?;
    debug!("Wrote {} byte(s) to {:?}", bytes.len(), path);
    Ok(())
}

/// Read a sample file (`.a3s`); the sample header starts at the first byte
pub fn read_akai_sample<P: AsRef<Path>>(path: P) -> Result<RawRecord<SampleHeader>> {
    let nibbles = read_akai_data(path.as_ref())?;
    RawRecord::parse(&nibbles, 0)
        .with_context(|| format!("Failed to parse sample file {:?}", path.as_ref()))
}
