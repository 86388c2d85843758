use anyhow::{Context, Result};
use std::path::Path;

use minasm::MemoryImage;

/// Parse an image rendered as text (one bit string per line) or as JSON.
///
/// Text images carry no segment bounds, so the whole image is treated as text.
pub fn parse_image(text: &str, width: u32) -> Result<MemoryImage> {
    if text.trim_start().starts_with('{') {
        let img: MemoryImage = serde_json::from_str(text)?;
        return Ok(img);
    }
    anyhow::ensure!((1..=32).contains(&width), "--width must be within 1..=32");
    let mut words = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        anyhow::ensure!(
            line.len() == width as usize,
            "line {}: expected {} bits, found {}",
            i + 1,
            width,
            line.len()
        );
        let word = u32::from_str_radix(line, 2).with_context(|| format!("line {}: not a bit string", i + 1))?;
        words.push(word);
    }
    let depth = words.len() as u32;
    Ok(MemoryImage { width, words, text_end: depth, data_start: depth })
}

pub fn load_image(path: &Path, width: u32) -> Result<MemoryImage> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_image(&text, width)
}
