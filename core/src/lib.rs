extern crate serde;
extern crate midir;

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate arrayref;

pub mod util;
pub mod error;
pub mod str_encoder;

pub mod chunk;
pub mod akp;
pub mod header;
pub mod raw;
pub mod disk;

pub mod midi;
pub mod sysex;
pub mod midi_io;
pub mod driver;
pub mod device;
pub mod config;
