use anyhow::{Context, Result};
use log::*;
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::config::DriverConfig;
use crate::midi::{MidiMessage, MidiResponse, SYSEX_START};
use crate::midi_io::{BoxedMidiIn, BoxedMidiOut};
use crate::sysex::{ControlMessage, ResponseStatus, SysexResponse};

struct Ports {
    midi_in: BoxedMidiIn,
    midi_out: BoxedMidiOut,
}

impl Ports {
    /// Next SysEx frame from the input; other MIDI traffic is skipped
    async fn next_sysex(&mut self) -> Result<Vec<u8>> {
        loop {
            let bytes = self.midi_in.recv().await
                .with_context(|| format!("MIDI input {:?} closed while waiting for a response", self.midi_in.name()))?;
            if bytes.first() == Some(&SYSEX_START) {
                return Ok(bytes);
            }
            trace!("Skipping non-SysEx message {:02x?}", bytes);
        }
    }

    fn close(&mut self) {
        self.midi_in.close();
        self.midi_out.close();
    }
}

async fn with_timeout<T, F>(timeout: Option<Duration>, what: impl FnOnce() -> String, f: F) -> Result<T>
    where F: Future<Output = Result<T>>
{
    match timeout {
        Some(d) => tokio::time::timeout(d, f).await
            .map_err(|_| anyhow!("Timed out after {:?} waiting for a response to {}", d, what()))?,
        None => f.await
    }
}

/// Section/item protocol driver. One request is in flight at a time:
/// concurrent callers queue up on the port lock.
pub struct SysexDriver {
    ports: Mutex<Ports>,
    config: DriverConfig,
}

impl SysexDriver {
    pub fn new(midi_in: BoxedMidiIn, midi_out: BoxedMidiOut, config: DriverConfig) -> Self {
        debug!("S5000/S6000 driver on {:?} -> {:?}", midi_in.name(), midi_out.name());
        SysexDriver { ports: Mutex::new(Ports { midi_in, midi_out }), config }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Send `message` and wait for the first frame that is not an `OK`
    /// acknowledgement.
    pub async fn request(&self, message: &ControlMessage) -> Result<SysexResponse> {
        let mut ports = self.ports.lock().await;
        let bytes = message.to_bytes(self.config.device_id, self.config.user_ref);
        debug!("Request {:?} item {:02x} data {:02x?}", message.section, message.item, message.data);
        ports.midi_out.send(&bytes)?;

        let recv = async {
            let mut count = 0;
            loop {
                let frame = ports.next_sysex().await?;
                let res = SysexResponse::from_bytes(&frame);
                if res.status == ResponseStatus::Ok {
                    debug!("Response {}: OK", count);
                    count += 1;
                    continue;
                }
                debug!("Response {}: {}", count, res.message);
                return Ok(res);
            }
        };
        with_timeout(self.config.timeout,
                     || format!("{:?} item {:02x}", message.section, message.item),
                     recv).await
    }

    pub async fn close(&self) {
        self.ports.lock().await.close();
    }
}

/// Legacy opcode protocol driver. A request resolves on the next SysEx
/// frame and fails if none arrives within the configured timeout.
pub struct LegacyDriver {
    ports: Mutex<Ports>,
    config: DriverConfig,
}

impl LegacyDriver {
    pub fn new(midi_in: BoxedMidiIn, midi_out: BoxedMidiOut, config: DriverConfig) -> Self {
        debug!("S1000/S3000 driver on {:?} -> {:?}", midi_in.name(), midi_out.name());
        LegacyDriver { ports: Mutex::new(Ports { midi_in, midi_out }), config }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn channel(&self) -> u8 {
        self.config.channel
    }

    pub async fn request(&self, message: &MidiMessage) -> Result<MidiResponse> {
        let mut ports = self.ports.lock().await;
        let opcode = message.opcode();
        debug!("Request {:?}", opcode);
        ports.midi_out.send(&message.to_bytes())?;

        let recv = async {
            let frame = ports.next_sysex().await?;
            MidiResponse::from_bytes(frame)
        };
        let res = with_timeout(self.config.timeout, || format!("{:?}", opcode), recv).await;
        if res.is_err() {
            // a late reply would be mistaken for the answer to the next request
            warn!("{:?} failed, closing ports", opcode);
            ports.close();
        }
        res
    }

    /// Send a message that the device does not answer
    pub async fn send(&self, message: &MidiMessage) -> Result<()> {
        let mut ports = self.ports.lock().await;
        debug!("Send {:?}", message.opcode());
        ports.midi_out.send(&message.to_bytes())
    }

    pub async fn close(&self) {
        self.ports.lock().await.close();
    }
}
