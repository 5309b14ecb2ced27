//! Text output helpers (made by FontLab https://www.fontlab.com/)

use std::io::Write;

use anyhow::Result;

use crate::fontset::FontPattern;
use crate::unicode::CharInfo;

/// `Name: ...` or the lookup failure notice.
pub fn write_name(info: &CharInfo, mut w: impl Write) -> Result<()> {
    match &info.name {
        Some(name) => writeln!(w, "Name: {name}")?,
        None => writeln!(w, "Name lookup failed.")?,
    }
    Ok(())
}

/// The annotation text or the lookup failure notice.
pub fn write_annotation(info: &CharInfo, mut w: impl Write) -> Result<()> {
    match &info.annotation {
        Some(annotation) => writeln!(w, "{annotation}")?,
        None => writeln!(w, "Annotation lookup failed.")?,
    }
    Ok(())
}

/// One family name per font, in font set order.
pub fn write_families(fonts: &[FontPattern], mut w: impl Write) -> Result<()> {
    for font in fonts {
        writeln!(w, "{}", font.family)?;
    }
    Ok(())
}

/// Write fonts as prettified JSON array.
pub fn write_json_pretty(fonts: &[FontPattern], mut w: impl Write) -> Result<()> {
    let json = serde_json::to_string_pretty(fonts)?;
    w.write_all(json.as_bytes())?;
    w.write_all(b"\n")?;
    Ok(())
}

/// Write fonts as newline-delimited JSON (NDJSON).
pub fn write_ndjson(fonts: &[FontPattern], mut w: impl Write) -> Result<()> {
    for item in fonts {
        let line = serde_json::to_string(item)?;
        w.write_all(line.as_bytes())?;
        w.write_all(b"\n")?;
    }
    Ok(())
}
