//! Line-oriented record inspector
//!
//! Reads one item per line: a JSON record is encoded to its wire hex, anything
//! else is treated as hex and decoded to JSON. Blank lines and `#` comments are
//! skipped. A line that fails produces an `error: ...` line and the loop keeps
//! going; only I/O errors end it.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::protocol::{DecodeError, PlayerLocationRecord};

/// Result of handling a single input line
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutput {
    /// Hex input decoded into a record, rendered as JSON
    Decoded(String),
    /// JSON input encoded into wire hex
    Encoded(String),
}

/// Per-line inspection errors
#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    #[error("Invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Invalid record JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Counters reported when the inspector stops
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InspectStats {
    pub lines: u64,
    pub decoded: u64,
    pub encoded: u64,
    pub failed: u64,
}

/// Handle one input line. Returns `None` for blank lines and comments.
pub fn process_line(line: &str, config: &Config) -> Result<Option<LineOutput>, InspectError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    if line.starts_with('{') {
        let record: PlayerLocationRecord = serde_json::from_str(line)?;
        return Ok(Some(LineOutput::Encoded(hex::encode(record.encode()))));
    }

    let compact: String = line.split_whitespace().collect();
    let data = hex::decode(compact)?;
    let record = PlayerLocationRecord::decode(&data, config.record_offset)?;
    debug!(player_id = record.player_id, "Decoded location record");

    let json = if config.output_pretty {
        serde_json::to_string_pretty(&record)?
    } else {
        serde_json::to_string(&record)?
    };
    Ok(Some(LineOutput::Decoded(json)))
}

/// Run the inspector until `reader` reaches EOF
pub async fn run<R, W>(reader: R, mut writer: W, config: &Config) -> std::io::Result<InspectStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut stats = InspectStats::default();
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        stats.lines += 1;

        let output = match process_line(&line, config) {
            Ok(None) => continue,
            Ok(Some(LineOutput::Decoded(json))) => {
                stats.decoded += 1;
                json
            }
            Ok(Some(LineOutput::Encoded(hex))) => {
                stats.encoded += 1;
                hex
            }
            Err(e) => {
                stats.failed += 1;
                warn!(line = stats.lines, "Failed to inspect line: {}", e);
                format!("error: {}", e)
            }
        };

        writer.write_all(output.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    info!(
        lines = stats.lines,
        decoded = stats.decoded,
        encoded = stats.encoded,
        failed = stats.failed,
        "Input finished"
    );

    Ok(stats)
}
