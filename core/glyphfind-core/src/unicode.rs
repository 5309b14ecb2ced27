//! Unicode character name and annotation lookup (made by FontLab https://www.fontlab.com/)

use icu_properties::props::{GeneralCategory, Script};
use icu_properties::{CodePointMapData, PropertyNamesLong, PropertyNamesShort};

/// Name and annotation of a character, each absent when the database has nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharInfo {
    pub name: Option<String>,
    pub annotation: Option<String>,
}

impl CharInfo {
    pub fn lookup(ch: char) -> Self {
        Self {
            name: unicode_names2::name(ch).map(|name| name.to_string()),
            annotation: annotate(ch),
        }
    }
}

/// Category, script and encoded forms, one fact per line.
fn annotate(ch: char) -> Option<String> {
    let category = CodePointMapData::<GeneralCategory>::new().get(ch);
    if category == GeneralCategory::Unassigned {
        return None;
    }

    let mut lines = Vec::new();

    let long = PropertyNamesLong::<GeneralCategory>::new().get(category);
    let short = PropertyNamesShort::<GeneralCategory>::new().get(category);
    if let (Some(long), Some(short)) = (long, short) {
        lines.push(format!(
            "General category: {} ({short})",
            long.replace('_', " ")
        ));
    }

    let script = CodePointMapData::<Script>::new().get(ch);
    if let Some(name) = PropertyNamesLong::<Script>::new().get(script) {
        lines.push(format!("Script: {}", name.replace('_', " ")));
    }

    lines.push(format!("UTF-8: {}", utf8_hex(ch)));
    lines.push(format!("UTF-16: {}", utf16_hex(ch)));

    Some(lines.join("\n"))
}

fn utf8_hex(ch: char) -> String {
    let mut buf = [0u8; 4];
    ch.encode_utf8(&mut buf)
        .bytes()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn utf16_hex(ch: char) -> String {
    let mut buf = [0u16; 2];
    ch.encode_utf16(&mut buf)
        .iter()
        .map(|unit| format!("{unit:04X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_latin_capital_a() {
        let info = CharInfo::lookup('A');
        assert_eq!(info.name.as_deref(), Some("LATIN CAPITAL LETTER A"));
    }

    #[test]
    fn annotation_lists_category_script_and_encodings() {
        let info = CharInfo::lookup('é');
        let annotation = info.annotation.expect("annotation");

        assert!(annotation.contains("General category: Lowercase Letter (Ll)"));
        assert!(annotation.contains("Script: Latin"));
        assert!(annotation.contains("UTF-8: C3 A9"));
        assert!(annotation.contains("UTF-16: 00E9"));
    }

    #[test]
    fn astral_characters_encode_as_surrogate_pairs() {
        assert_eq!(utf16_hex('\u{1F600}'), "D83D DE00");
        assert_eq!(utf8_hex('\u{1F600}'), "F0 9F 98 80");
    }

    #[test]
    fn unassigned_code_points_have_no_annotation() {
        let info = CharInfo::lookup('\u{0378}');
        assert!(info.name.is_none());
        assert!(info.annotation.is_none());
    }
}
