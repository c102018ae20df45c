pub mod opts;

use akai_core::akp::Program;
use akai_core::config::{config_for_name, configs, DriverConfig, Protocol};
use akai_core::device::{S3000xlDevice, S56kDevice};
use akai_core::disk::*;
use akai_core::driver::{LegacyDriver, SysexDriver};
use akai_core::header::{Header, LogTrace, ProgramHeader};
use akai_core::midi_io::*;
use akai_core::raw::RawRecord;
use akai_core::sysex::SysexResult;

use anyhow::{bail, Context, Result};
use log::*;
use serde_json::{json, Value};
use std::path::Path;

use opts::*;

fn log_level(verbose: u64) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace
    }
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report_errors<T>(result: &SysexResult<T>) -> Result<()> {
    for e in result.errors.iter() {
        error!("{}", e);
    }
    if !result.is_ok() {
        bail!("Device reported {} error(s)", result.errors.len());
    }
    Ok(())
}

fn open_in(port: &Option<String>) -> Result<BoxedMidiIn> {
    let midi_in = match port {
        None => MidiInPort::new(None),
        Some(p) => MidiInPort::new_for_address(p)
            .or_else(|_| MidiInPort::new_for_name(p))
    }.context("Failed to open MIDI input")?;
    Ok(box_midi_in(midi_in))
}

fn open_out(port: &Option<String>) -> Result<BoxedMidiOut> {
    let midi_out = match port {
        None => MidiOutPort::new(None),
        Some(p) => MidiOutPort::new_for_address(p)
            .or_else(|_| MidiOutPort::new_for_name(p))
    }.context("Failed to open MIDI output")?;
    Ok(box_midi_out(midi_out))
}

enum Device {
    S56k(S56kDevice),
    S3000xl(S3000xlDevice),
}

fn open_device(opts: &Opts) -> Result<Device> {
    let config = config_for_name(&opts.device)
        .with_context(|| {
            let names = configs().iter().map(|c| c.name.as_str()).collect::<Vec<_>>();
            format!("Unknown device {:?}, expected one of {}", opts.device, names.join(", "))
        })?;
    let driver_config = DriverConfig::for_device(config).with_channel(opts.channel);
    let midi_in = open_in(&opts.input)?;
    let midi_out = open_out(&opts.output)?;
    info!("Talking to {} on {:?} -> {:?}", config.name, midi_out.name(), midi_in.name());

    Ok(match config.protocol {
        Protocol::SectionItem =>
            Device::S56k(S56kDevice::new(SysexDriver::new(midi_in, midi_out, driver_config))),
        Protocol::Legacy =>
            Device::S3000xl(S3000xlDevice::new(LegacyDriver::new(midi_in, midi_out, driver_config)))
    })
}

fn akp(cmd: &AkpCommand) -> Result<()> {
    match cmd {
        AkpCommand::Dump { file } => {
            let program = read_akp(file)?;
            print_json(&program.to_json()?)
        }
        AkpCommand::Apply { file, patch, dest } => {
            let mut program = read_akp(file)?;
            let patch = std::fs::read_to_string(patch)
                .with_context(|| format!("Failed to read {:?}", patch))?;
            let patch: Value = serde_json::from_str(&patch)
                .context("Patch is not valid JSON")?;
            program.apply(&patch)?;

            let dest = dest.as_ref().unwrap_or(file);
            std::fs::write(dest, program.to_bytes()?)
                .with_context(|| format!("Failed to write {:?}", dest))?;
            info!("Wrote {} keygroup(s) to {:?}", program.keygroup_count(), dest);
            Ok(())
        }
    }
}

fn read_akp(file: &Path) -> Result<Program> {
    let bytes = std::fs::read(file)
        .with_context(|| format!("Failed to read {:?}", file))?;
    Program::from_buffer(&bytes)
        .with_context(|| format!("Failed to parse {:?}", file))
}

fn a3p(cmd: &A3pCommand) -> Result<()> {
    match cmd {
        A3pCommand::Dump { file, trace } => {
            let nibbles = read_akai_data(file)?;
            if *trace {
                RawRecord::<ProgramHeader>::parse_with_trace(&nibbles, PROGRAM_HEADER_OFFSET, &mut LogTrace)?;
            }
            let program = AkaiProgramFile::from_nibbles(&nibbles)?;
            let keygroups = program.keygroups.iter()
                .map(|kg| kg.header.to_json())
                .collect::<Vec<_>>();
            print_json(&json!({
                "program": program.program.header.to_json(),
                "keygroups": keygroups
            }))
        }
        A3pCommand::Patch { file, name, add_keygroups, dest } => {
            let mut program = read_akai_program(file)?;
            if let Some(name) = name {
                program.program.set_name(name)?;
            }
            for _ in 0 .. *add_keygroups {
                program.add_keygroup()?;
            }
            write_akai_program(dest.as_ref().unwrap_or(file), &program)
        }
    }
}

fn a3s(cmd: &A3sCommand) -> Result<()> {
    match cmd {
        A3sCommand::Dump { file } => {
            let sample = read_akai_sample(file)?;
            print_json(&sample.header.to_json())
        }
    }
}

fn ports() -> Result<()> {
    println!("MIDI inputs:");
    for (i, name) in MidiInPort::ports()?.iter().enumerate() {
        println!("  [{}] {}", i, name);
    }
    println!("MIDI outputs:");
    for (i, name) in MidiOutPort::ports()?.iter().enumerate() {
        println!("  [{}] {}", i, name);
    }
    Ok(())
}

async fn ping(device: &Device) -> Result<()> {
    match device {
        Device::S56k(d) => {
            let res = d.ping().await?;
            println!("{}: {}", res.status, res.message);
        }
        Device::S3000xl(d) => {
            let status = d.status().await?;
            println!("Status: {:02x?}", status);
        }
    }
    Ok(())
}

async fn programs(device: &Device) -> Result<()> {
    match device {
        Device::S56k(d) => {
            let count = d.program_count().await?;
            report_errors(&count)?;
            println!("{} program(s) in memory", count.data);
            let name = d.current_program().name().await?;
            report_errors(&name)?;
            println!("Current: {}", name.data);
        }
        Device::S3000xl(d) => {
            for (i, name) in d.program_names().await?.iter().enumerate() {
                println!("{:3} {}", i, name);
            }
        }
    }
    Ok(())
}

async fn program_info(device: &Device, program: u16) -> Result<()> {
    match device {
        Device::S56k(d) => {
            let info = d.current_program().info().await?;
            report_errors(&info)?;
            print_json(&serde_json::to_value(&info.data)?)
        }
        Device::S3000xl(d) => {
            let header = d.program_header(program).await?;
            print_json(&header.header.to_json())
        }
    }
}

async fn close(device: Device) {
    match device {
        Device::S56k(d) => d.driver().close().await,
        Device::S3000xl(d) => d.driver().close().await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let opts: Opts = Opts::parse();
    simple_logger::SimpleLogger::new()
        .with_level(log_level(opts.verbose))
        .env()
        .init()?;

    match &opts.command {
        Command::Akp(cmd) => return akp(cmd),
        Command::A3p(cmd) => return a3p(cmd),
        Command::A3s(cmd) => return a3s(cmd),
        Command::Ports => return ports(),
        _ => {}
    }

    let device = open_device(&opts)?;
    let res = match &opts.command {
        Command::Ping => ping(&device).await,
        Command::Programs => programs(&device).await,
        Command::Info { program } => program_info(&device, *program).await,
        _ => Ok(())
    };
    close(device).await;
    res
}
