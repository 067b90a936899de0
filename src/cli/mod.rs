use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

mod config;
mod convert;
#[cfg(feature = "server")]
mod serve;

pub use config::Config;

/// exiftags - ExifTool tag definitions as JSON
#[derive(Parser)]
#[command(name = "exiftags")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides for the command that prints the -listx XML
#[derive(clap::Args, Debug, Default)]
pub struct CommandArgs {
    /// Program to run instead of `exiftool`
    #[arg(long, value_name = "PROGRAM")]
    program: Option<String>,

    /// Argument passed to the program (repeatable, replaces `-listx`)
    #[arg(long = "arg", value_name = "ARG", allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert -listx XML to the JSON tags document
    Convert {
        /// Read a captured -listx dump instead of running the command ("-" for stdin)
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Write the JSON to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        #[command(flatten)]
        command: CommandArgs,
    },

    /// Serve the JSON tags document over HTTP
    #[cfg(feature = "server")]
    Serve {
        /// Address to listen on (default: 127.0.0.1:8080)
        #[arg(short, long, value_name = "ADDR")]
        bind: Option<SocketAddr>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        #[command(flatten)]
        command: CommandArgs,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert {
            input,
            output,
            config,
            command,
        } => {
            let config = Config::load(config.as_deref())?;
            convert::run(input, output, config.listx_command(&command), config.conversion_config())
        }
        #[cfg(feature = "server")]
        Commands::Serve {
            bind,
            config,
            command,
        } => {
            let config = Config::load(config.as_deref())?;
            serve::run(config.server_config(bind, &command), config.conversion_config())
        }
    }
}
