//! Media splitting via ffmpeg.

use crate::error::TranscribeError;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Cut `source` into `seconds`-long WAV chunks inside `work_dir`, named
/// `000.wav`, `001.wav`, … in playback order.
///
/// Chunks are re-encoded, never stream-copied: cutting compressed formats on
/// time boundaries without re-encoding can corrupt frames, and every chunk
/// must be an independently valid file. Timestamps reset per chunk so each
/// one starts at zero.
pub async fn split_media(
    source: &Path,
    work_dir: &Path,
    seconds: u32,
) -> Result<Vec<PathBuf>, TranscribeError> {
    let pattern = work_dir.join("%03d.wav");

    debug!(source = %source.display(), seconds, "splitting media");

    let result = Command::new("ffmpeg")
        .arg("-i").arg(source)
        .arg("-f").arg("segment")
        .arg("-segment_time").arg(seconds.to_string())
        .arg("-reset_timestamps").arg("1")
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(&pattern)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    let output = match result {
        Ok(output) => output,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(TranscribeError::ToolNotFound("ffmpeg".to_string()));
        }
        Err(e) => {
            return Err(TranscribeError::Split(format!("ffmpeg execution failed: {e}")));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TranscribeError::Split(format!("ffmpeg failed: {stderr}")));
    }

    let mut chunks: Vec<PathBuf> = std::fs::read_dir(work_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "wav"))
        .collect();
    chunks.sort();

    if chunks.is_empty() {
        return Err(TranscribeError::Split(
            "ffmpeg produced no chunks".to_string(),
        ));
    }

    Ok(chunks)
}
