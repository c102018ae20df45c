pub use clap::Parser;
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[clap(name = "akai", version, about = "Akai sampler program tool")]
pub struct Opts {
    /// More output per occurrence
    #[clap(short, long, parse(from_occurrences))]
    pub verbose: u64,

    /// MIDI input port: index, `client:port` address or name
    #[clap(short, long)]
    pub input: Option<String>,

    /// MIDI output port: index, `client:port` address or name
    #[clap(short, long)]
    pub output: Option<String>,

    /// Device model, e.g. S3000XL or S5000
    #[clap(short, long, default_value = "S5000")]
    pub device: String,

    /// Legacy exclusive channel
    #[clap(short, long, default_value_t = 0)]
    pub channel: u8,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// S5000/S6000 program files
    #[clap(subcommand)]
    Akp(AkpCommand),

    /// S1000/S3000 program files from a raw volume
    #[clap(subcommand)]
    A3p(A3pCommand),

    /// S1000/S3000 sample files from a raw volume
    #[clap(subcommand)]
    A3s(A3sCommand),

    /// List MIDI ports
    Ports,

    /// Check that the device answers
    Ping,

    /// List the programs in device memory
    Programs,

    /// Show a program in device memory
    Info {
        /// Program number (legacy devices only)
        #[clap(default_value_t = 0)]
        program: u16,
    },
}

#[derive(Subcommand)]
pub enum AkpCommand {
    /// Print a program as JSON
    Dump { file: PathBuf },

    /// Merge a JSON patch into a program
    Apply {
        file: PathBuf,
        patch: PathBuf,
        /// Where to write the result, defaults to `file`
        dest: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum A3pCommand {
    /// Print the program and keygroup headers as JSON
    Dump {
        file: PathBuf,
        /// Log every decoded field
        #[clap(long)]
        trace: bool,
    },

    /// Rename a program and/or append keygroups
    Patch {
        file: PathBuf,
        #[clap(long)]
        name: Option<String>,
        /// Number of keygroups to append
        #[clap(long, default_value_t = 0)]
        add_keygroups: u8,
        /// Where to write the result, defaults to `file`
        dest: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum A3sCommand {
    /// Print the sample header as JSON
    Dump { file: PathBuf },
}
