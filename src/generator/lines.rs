use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use rand::Rng;
use rand::seq::SliceRandom;

pub const DEFAULT_SOURCE: &str = "/etc/dictionaries-common/words";

/// Reads the practice lines from `path`, one per line.
pub fn load_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let lines = parse_lines(&content);
    if lines.is_empty() {
        bail!("No lines in file.");
    }
    Ok(lines)
}

/// Splits text into lines, dropping blank ones and CRLF endings.
pub fn parse_lines(content: &str) -> Vec<String> {
    content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn shuffle<R: Rng + ?Sized>(lines: &mut [String], rng: &mut R) {
    lines.shuffle(rng);
}
