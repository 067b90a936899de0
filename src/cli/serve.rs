use anyhow::{Context, Result};

use exiftags::listx::{ConversionConfig, TagConverter};
use exiftags::server::{serve, ServerConfig};

/// Serve the JSON document over HTTP until Ctrl-C
pub fn run(config: ServerConfig, conversion: ConversionConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime
        .block_on(serve(config, TagConverter::with_config(conversion)))
        .context("HTTP server failed")
}
