//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools are available before starting operations
//! that would otherwise fail midway.

use crate::error::{Result, ShunbunError};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// The full pipeline needs ffmpeg for media splitting.
    Run,
    /// Crawling only needs the network.
    Crawl,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Run => {
            check_tool("ffmpeg")?;
        }
        Operation::Crawl => {}
    }
    Ok(())
}

/// Check if an external tool is available.
pub fn check_tool(name: &str) -> Result<()> {
    // ffmpeg uses -version (single dash), most others use --version
    let version_arg = match name {
        "ffmpeg" | "ffprobe" => "-version",
        _ => "--version",
    };
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(ShunbunError::Config(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ShunbunError::Config(format!(
            "{} not found. Please install it and ensure it's in your PATH.",
            name
        ))),
        Err(e) => Err(ShunbunError::Config(format!("{}: {}", name, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crawl_has_no_requirements() {
        assert!(check(Operation::Crawl).is_ok());
    }
}
