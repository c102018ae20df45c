use midir::*;
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;
use async_trait::async_trait;
use log::*;
use result::prelude::*;
use tokio::sync::mpsc;

static PORT_N_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());
static PORT_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+:\d+").unwrap());

#[async_trait]
pub trait MidiIn {
    fn name(&self) -> String;
    async fn recv(&mut self) -> Option<Vec<u8>>;
    fn close(&mut self);
}

#[async_trait]
pub trait MidiOut {
    fn name(&self) -> String;
    fn send(&mut self, bytes: &[u8]) -> Result<()>;
    fn close(&mut self);
}

pub type BoxedMidiIn = Box<dyn MidiIn + Send>;
pub type BoxedMidiOut = Box<dyn MidiOut + Send>;

pub fn box_midi_in<T: MidiIn + Send + 'static>(x: T) -> BoxedMidiIn {
    Box::new(x)
}

pub fn box_midi_out<T: MidiOut + Send + 'static>(x: T) -> BoxedMidiOut {
    Box::new(x)
}

pub struct MidiInPort {
    name: String,
    conn: Option<MidiInputConnection<()>>,
    rx: mpsc::UnboundedReceiver<Vec<u8>>
}

impl MidiInPort {
    fn _new() -> Result<MidiInput> {
        let mut midi_in = MidiInput::new("akai midi in")?;
        midi_in.ignore(Ignore::None);

        for (i, port) in midi_in.ports().iter().enumerate() {
            debug!("midi in {}: {:?}", i, midi_in.port_name(port)?);
        }

        Ok(midi_in)
    }

    pub fn _new_for_port(midi_in: MidiInput, port: MidiInputPort) -> Result<Self> {
        let name = midi_in.port_name(&port)
            .map_err(|e| anyhow!("Failed to get MIDI input port name: {}", e))?;

        let (tx, rx) = mpsc::unbounded_channel();

        let n = name.clone();
        let conn = midi_in.connect(&port, "akai midi in conn", move |ts, data, _| {
            trace!("<< {:02x?} len={} ts={}", data, data.len(), ts);
            tx.send(Vec::from(data))
                .unwrap_or_else(|_| {
                    error!("midi input ({}): failed to send data to the application", n);
                });
        }, ())
            .map_err(|e| anyhow!("Midi connection error: {:?}", e))?;

        Ok(MidiInPort { name, conn: Some(conn), rx })
    }
}

#[async_trait]
impl MidiIn for MidiInPort {
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn recv(&mut self) -> Option<Vec<u8>> {
        self.rx.recv().await
    }

    fn close(&mut self) {
        self.conn.take().map(|conn| {
            debug!("closing in");
            conn.close();
            debug!("closed in");
        });
        self.rx.close();
    }
}

impl Drop for MidiInPort {
    fn drop(&mut self) {
        self.close();
    }
}


pub struct MidiOutPort {
    name: String,
    conn: Option<MidiOutputConnection>,
}

impl MidiOutPort {
    fn _new() -> Result<MidiOutput> {
        let midi_out = MidiOutput::new("akai midi out")?;

        for (i, port) in midi_out.ports().iter().enumerate() {
            debug!("midi out {}: {:?}", i, midi_out.port_name(port)?);
        }

        Ok(midi_out)
    }

    fn _new_for_port(midi_out: MidiOutput, port: MidiOutputPort) -> Result<Self> {
        let name = midi_out.port_name(&port)
            .map_err(|e| anyhow!("Failed to get MIDI output port name: {}", e))?;
        let conn = midi_out.connect(&port, "akai midi out conn")
            .map_err(|e| anyhow!("Midi connection error: {:?}", e))?;

        Ok(MidiOutPort { name, conn: Some(conn) })
    }
}

#[async_trait]
impl MidiOut for MidiOutPort {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        trace!(">> {:02x?} len={}", bytes, bytes.len());
        if let Some(conn) = self.conn.as_mut() {
            conn.send(bytes)
                .map_err(|e| anyhow!("Midi send error: {:?}", e))
        } else {
            Err(anyhow!("Send error: connection already closed"))
        }
    }

    fn close(&mut self) {
        self.conn.take().map(|conn| {
            debug!("closing out");
            conn.close();
            debug!("closed out");
        });
    }
}

impl Drop for MidiOutPort {
    fn drop(&mut self) {
        self.close()
    }
}


pub trait  MidiOpen {
    type Class: MidiIO<Port = Self::Port>;
    type Port;
    type Out;
    const DIR: &'static str;

    fn _new() -> Result<Self::Class>;
    fn _new_for_port(class: Self::Class, port: Self::Port) -> Result<Self::Out>;

    fn new(port_idx: Option<usize>) -> Result<Self::Out> {
        let class = Self::_new()?;

        let port_n: usize = port_idx.unwrap_or(0);
        let port = class.ports().into_iter().nth(port_n)
            .with_context(|| format!("MIDI {} port {} not found", Self::DIR, port_n))?;

        Self::_new_for_port(class, port)
    }

    fn new_for_address(port_addr: &str) -> Result<Self::Out> {
        let class = Self::_new()?;

        let mut found = None;
        if PORT_ID_RE.is_match(&port_addr) {
            for port in class.ports().into_iter() {
                let name = class.port_name(&port)?;
                if name.ends_with(&port_addr) {
                    found = Some(port);
                }
            }
        } else if PORT_N_RE.is_match(&port_addr) {
            let n = Some(usize::from_str(&port_addr)).invert()
                .with_context(|| format!("Unrecognized MIDI port index {:?}", port_addr))?;
            return Self::new(n);
        } else {
            bail!("Unrecognized MIDI port address {:?}", port_addr);
        }

        let port = found
            .with_context(|| format!("MIDI {} port for address {:?} not found!", Self::DIR, port_addr))?;
        Self::_new_for_port(class, port)
    }

    fn new_for_name(port_name: &str) -> Result<Self::Out> {
        let class = Self::_new()?;

        let mut found = None;
        for port in class.ports().into_iter() {
            let name = class.port_name(&port)?;
            if name == port_name {
                found = Some(port);
            }
        }
        let port = found
            .with_context(|| format!("MIDI {} port for name {:?} not found!", Self::DIR, port_name))?;
        Self::_new_for_port(class, port)
    }
}

impl MidiOpen for MidiInPort {
    type Class = MidiInput;
    type Port = MidiInputPort;
    type Out = MidiInPort;
    const DIR: &'static str = "input";

    fn _new() -> Result<Self::Class> {
        MidiInPort::_new()
    }

    fn _new_for_port(class: Self::Class, port: Self::Port) -> Result<Self::Out> {
        MidiInPort::_new_for_port(class, port)
    }
}

impl MidiOpen for MidiOutPort {
    type Class = MidiOutput;
    type Port = MidiOutputPort;
    type Out = MidiOutPort;
    const DIR: &'static str = "output";

    fn _new() -> Result<Self::Class> {
        MidiOutPort::_new()
    }

    fn _new_for_port(class: Self::Class, port: Self::Port) -> Result<Self::Out> {
        MidiOutPort::_new_for_port(class, port)
    }
}


pub trait MidiPorts {
    fn all_ports() -> Result<Vec<String>>;
    fn ports() -> Result<Vec<String>>;
}

impl MidiPorts for MidiInPort {
    fn all_ports() -> Result<Vec<String>> {
        let midi = MidiInPort::_new()?;
        list_ports(midi)
    }

    fn ports() -> Result<Vec<String>> {
        Self::all_ports()
            .map(|v| v.into_iter()
                .filter(|name| !name.starts_with("akai midi out:"))
                .collect()
            )
    }
}

impl MidiPorts for MidiOutPort {
    fn all_ports() -> Result<Vec<String>> {
        let midi = MidiOutPort::_new()?;
        list_ports(midi)
    }

    fn ports() -> Result<Vec<String>> {
        Self::all_ports()
            .map(|v| v.into_iter()
                .filter(|name| !name.starts_with("akai midi in:"))
                .collect()
            )
    }
}

fn list_ports<T: MidiIO>(midi: T) -> Result<Vec<String>> {
    let port_names: Result<Vec<_>, _> =
        midi.ports().iter()
            .map(|port| midi.port_name(port))
            .collect::<Result<Vec<_>, _>>();
    port_names.map_err(|err| anyhow!("Error getting port names: {}", err))
}

/// In-memory MIDI input fed from an unbounded channel
pub struct ChannelMidiIn {
    name: String,
    rx: mpsc::UnboundedReceiver<Vec<u8>>,
}

/// In-memory MIDI output writing every message to an unbounded channel
pub struct ChannelMidiOut {
    name: String,
    tx: Option<mpsc::UnboundedSender<Vec<u8>>>,
}

/// An in-memory input/output pair. The returned sender feeds the input,
/// the returned receiver sees everything sent to the output.
pub fn channel_ports(name: &str) -> (ChannelMidiIn, ChannelMidiOut,
                                     mpsc::UnboundedSender<Vec<u8>>, mpsc::UnboundedReceiver<Vec<u8>>) {
    let (in_tx, in_rx) = mpsc::unbounded_channel();
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    (
        ChannelMidiIn { name: name.to_string(), rx: in_rx },
        ChannelMidiOut { name: name.to_string(), tx: Some(out_tx) },
        in_tx,
        out_rx
    )
}

#[async_trait]
impl MidiIn for ChannelMidiIn {
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn recv(&mut self) -> Option<Vec<u8>> {
        let bytes = self.rx.recv().await;
        if let Some(bytes) = bytes.as_ref() {
            trace!("<< {:02x?} len={}", bytes, bytes.len());
        }
        bytes
    }

    fn close(&mut self) {
        self.rx.close();
    }
}

#[async_trait]
impl MidiOut for ChannelMidiOut {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        trace!(">> {:02x?} len={}", bytes, bytes.len());
        match self.tx.as_ref() {
            Some(tx) => tx.send(bytes.to_vec())
                .map_err(|_| anyhow!("Send error: receiver dropped")),
            None => Err(anyhow!("Send error: connection already closed"))
        }
    }

    fn close(&mut self) {
        self.tx.take();
    }
}
