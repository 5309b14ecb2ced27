//! Target character resolution (made by FontLab https://www.fontlab.com/)

use std::ffi::OsStr;
use std::fmt;

use anyhow::{anyhow, Result};
use log::warn;

/// Prefixes that mark an argument as a hexadecimal code point.
const HEX_PREFIXES: [&str; 4] = ["0x", "0X", "U+", "u+"];

/// The character being searched for, plus its `U+XXXX` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetChar {
    ch: char,
}

impl TargetChar {
    pub fn new(ch: char) -> Result<Self> {
        if ch == '\0' {
            return Err(anyhow!("glyph result was U+0000"));
        }
        Ok(Self { ch })
    }

    pub fn char(&self) -> char {
        self.ch
    }

    pub fn codepoint(&self) -> u32 {
        self.ch as u32
    }

    /// `U+%04X` inside the BMP, `U+%08X` above it.
    pub fn label(&self) -> String {
        format_codepoint(self.codepoint())
    }
}

impl fmt::Display for TargetChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

pub fn format_codepoint(cp: u32) -> String {
    if cp <= 0xFFFF {
        format!("U+{cp:04X}")
    } else {
        format!("U+{cp:08X}")
    }
}

/// Resolve a raw command-line argument.
///
/// Arguments arrive as locale-encoded bytes; only UTF-8 locales are
/// understood, anything else is rejected rather than guessed at.
pub fn parse_os_character(raw: &OsStr) -> Result<TargetChar> {
    let text = raw.to_str().ok_or_else(|| {
        anyhow!(
            "failed to convert character encoding: {} is not valid UTF-8",
            raw.to_string_lossy()
        )
    })?;
    parse_character(text)
}

/// Accepts `0x1F600`, `U+00E9` or a literal character such as `é`.
pub fn parse_character(input: &str) -> Result<TargetChar> {
    if input.is_empty() {
        return Err(anyhow!("must supply a character value"));
    }

    if let Some(digits) = strip_hex_prefix(input) {
        return parse_hex(input, digits);
    }

    let mut chars = input.chars();
    let first = chars.next().ok_or_else(|| anyhow!("must supply a character value"))?;
    if chars.next().is_some() {
        warn!(
            "'{input}' holds more than one character; using {}",
            format_codepoint(first as u32)
        );
    }
    TargetChar::new(first)
}

fn strip_hex_prefix(input: &str) -> Option<&str> {
    HEX_PREFIXES
        .iter()
        .find_map(|prefix| input.strip_prefix(prefix))
}

fn parse_hex(input: &str, digits: &str) -> Result<TargetChar> {
    let cp = u32::from_str_radix(digits.trim(), 16)
        .map_err(|_| anyhow!("invalid codepoint: {input}"))?;
    let ch = char::from_u32(cp).ok_or_else(|| anyhow!("invalid Unicode scalar: U+{cp:04X}"))?;
    TargetChar::new(ch)
}
