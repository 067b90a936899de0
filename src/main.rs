//! # exiftags
//!
//! Command-line front end for converting `exiftool -listx` output to JSON.
//!
//! ## Usage
//!
//! ```bash
//! # Run exiftool -listx and print the JSON document
//! exiftags convert
//!
//! # Convert a captured dump into a file
//! exiftags convert --input listx.xml --output tags.json
//!
//! # Serve the document over HTTP
//! exiftags serve --bind 0.0.0.0:8080
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::{dispatch, init_logging, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    dispatch(cli)
}
