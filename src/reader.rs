// WHY: Async file access for the CLI; the segmentation core never touches the filesystem

use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs::{self, File};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};

/// Buffer size for line-oriented reads
pub const READ_BUFFER_SIZE: usize = 8192;

/// Read a whole UTF-8 file
pub async fn read_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    info!("Loaded {} ({} bytes)", path.display(), text.len());
    Ok(text)
}

/// Read a sentence-per-line file; line terminators are dropped
pub async fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let file = File::open(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut lines = BufReader::with_capacity(READ_BUFFER_SIZE, file).lines();
    let mut collected = Vec::new();
    while let Some(line) = lines
        .next_line()
        .await
        .with_context(|| format!("Failed to read line from {}", path.display()))?
    {
        collected.push(line);
    }

    debug!("Read {} lines from {}", collected.len(), path.display());
    Ok(collected)
}

/// Write `text`, creating parent directories when needed
pub async fn write_text<P: AsRef<Path>>(path: P, text: &str) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let mut file = File::create(path)
        .await
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(text.as_bytes()).await?;
    file.flush().await?;
    info!("Written results to {}", path.display());
    Ok(())
}
