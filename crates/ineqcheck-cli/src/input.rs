use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

/// Display name used for standard input.
pub const STDIN_NAME: &str = "<stdin>";

/// One input document, read fully into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub source: String,
    pub text: String,
}

/// Read every path in order; no paths means stdin, as does `-`.
///
/// # Errors
///
/// Returns an error naming the path if any input cannot be read.
pub fn read_inputs(paths: &[PathBuf]) -> Result<Vec<Input>> {
    if paths.is_empty() {
        return Ok(vec![read_stdin()?]);
    }
    paths
        .iter()
        .map(|path| {
            if is_stdin(path) {
                read_stdin()
            } else {
                read_file(path)
            }
        })
        .collect()
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn read_stdin() -> Result<Input> {
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("failed to read standard input")?;
    debug!(bytes = text.len(), "read stdin");
    Ok(Input {
        source: STDIN_NAME.to_string(),
        text,
    })
}

fn read_file(path: &Path) -> Result<Input> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    debug!(path = %path.display(), bytes = text.len(), "read input file");
    Ok(Input {
        source: path.display().to_string(),
        text,
    })
}
