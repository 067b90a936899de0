use anyhow::{Context, Result};
use log::info;
use std::io::Write;
use std::path::{Path, PathBuf};

use exiftags::listx::{ConversionConfig, ConversionStats, TagConverter};
use exiftags::source::{InputSource, ListxCommand};

/// Convert -listx XML to JSON in one shot
pub fn run(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    command: ListxCommand,
    config: ConversionConfig,
) -> Result<()> {
    let source = match input {
        None => InputSource::Command(command),
        Some(path) if path.as_os_str() == "-" => InputSource::Stdin,
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Input file does not exist: {}", path.display());
            }
            InputSource::File(path)
        }
    };

    info!("exiftags - -listx to JSON");
    info!("Input:  {}", source);
    match &output {
        Some(path) => info!("Output: {}", path.display()),
        None => info!("Output: <stdout>"),
    }

    let reader = source
        .open()
        .with_context(|| format!("Failed to read XML from {}", source))?;
    let converter = TagConverter::with_config(config);

    let stats = match &output {
        Some(path) => convert_to_file(&converter, reader, path)?,
        None => {
            let stdout = std::io::stdout();
            converter
                .convert(reader, stdout.lock())
                .context("Conversion failed")?
        }
    };

    info!("Conversion complete!");
    info!("  Tables: {}", stats.tables);
    info!("  Tags:   {}", stats.tags);
    info!("  Bytes:  {}", stats.bytes_written);

    Ok(())
}

/// Write into a temporary file next to `path` and move it into place on success
///
/// A failed conversion leaves no truncated JSON file behind.
fn convert_to_file(
    converter: &TagConverter,
    reader: Box<dyn std::io::BufRead>,
    path: &Path,
) -> Result<ConversionStats> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;

    let stats = converter
        .convert(reader, tmp.as_file_mut())
        .context("Conversion failed")?;
    tmp.as_file_mut().flush()?;

    tmp.persist(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(stats)
}
