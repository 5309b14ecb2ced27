//! Charset-constrained font set queries (made by FontLab https://www.fontlab.com/)

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use read_fonts::types::Tag;
use read_fonts::{FileRef, FontRef};
use serde::{Deserialize, Serialize};
use skrifa::string::StringId;
use skrifa::MetadataProvider;

use crate::discovery::{FontDiscovery, PathDiscovery};

/// Tables that make a face freely scalable: outlines or color bitmaps.
const SCALABLE_TABLES: [Tag; 5] = [
    Tag::new(b"glyf"),
    Tag::new(b"CFF "),
    Tag::new(b"CFF2"),
    Tag::new(b"CBDT"),
    Tag::new(b"sbix"),
];

/// Character a face must map to be used for labels.
pub const LABEL_PROBE: char = 'A';

/// One face of one font file, as returned by a font set query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontPattern {
    pub family: String,
    pub style: String,
    pub file: PathBuf,
    #[serde(default)]
    pub index: Option<u32>,
    pub scalable: bool,
}

impl FontPattern {
    /// Render the path, appending `#<index>` for TTC/OTC collections.
    pub fn file_with_index(&self) -> String {
        if let Some(idx) = self.index {
            format!("{}#{idx}", self.file.display())
        } else {
            self.file.display().to_string()
        }
    }
}

/// What the loader learned about a face before filtering.
#[derive(Debug, Clone)]
pub struct FaceInfo {
    pub pattern: FontPattern,
    pub has_glyph: bool,
    /// Whether the face maps [`LABEL_PROBE`].
    pub covers_latin: bool,
}

impl FaceInfo {
    pub fn is_label_candidate(&self) -> bool {
        self.covers_latin && self.pattern.scalable
    }
}

/// "Contains this code point" plus an optional "is scalable" constraint.
#[derive(Debug, Clone, Copy)]
pub struct CharsetQuery {
    codepoint: char,
    scalable_only: bool,
}

impl CharsetQuery {
    pub fn new(codepoint: char) -> Self {
        Self {
            codepoint,
            scalable_only: true,
        }
    }

    pub fn require_scalable(mut self, yes: bool) -> Self {
        self.scalable_only = yes;
        self
    }

    pub fn codepoint(&self) -> char {
        self.codepoint
    }

    pub fn matches(&self, face: &FaceInfo) -> bool {
        if !face.has_glyph {
            return false;
        }
        !self.scalable_only || face.pattern.scalable
    }
}

#[derive(Debug, Default, Clone)]
pub struct SearchOptions {
    pub follow_symlinks: bool,
    pub jobs: Option<usize>,
}

/// Ordered, de-duplicated collection of matching faces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontSet {
    patterns: Vec<FontPattern>,
}

impl FontSet {
    pub fn from_patterns(mut patterns: Vec<FontPattern>) -> Self {
        patterns.sort_by(compare_patterns);
        patterns.dedup_by(|a, b| a.family == b.family && a.style == b.style && a.file == b.file);
        Self { patterns }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn patterns(&self) -> &[FontPattern] {
        &self.patterns
    }

    /// The first `max` patterns; `0` means no limit.
    pub fn limited(&self, max: usize) -> &[FontPattern] {
        if max > 0 && max < self.patterns.len() {
            &self.patterns[..max]
        } else {
            &self.patterns
        }
    }
}

/// Query result plus the faces that can spell Latin labels.
#[derive(Debug, Clone, Default)]
pub struct FontScan {
    pub fonts: FontSet,
    /// Scalable faces mapping [`LABEL_PROBE`], gathered in the same pass.
    pub label_candidates: FontSet,
}

/// Walk `roots` and return every face that satisfies `query`.
pub fn query_font_set(
    roots: &[PathBuf],
    query: &CharsetQuery,
    opts: &SearchOptions,
) -> Result<FontSet> {
    scan_font_set(roots, query, opts).map(|scan| scan.fonts)
}

/// Like [`query_font_set`], also collecting label font candidates.
///
/// Every file is read once; a face lands in `fonts`, in
/// `label_candidates`, in both or in neither.
pub fn scan_font_set(
    roots: &[PathBuf],
    query: &CharsetQuery,
    opts: &SearchOptions,
) -> Result<FontScan> {
    let discovery = PathDiscovery::new(roots.iter().cloned()).follow_symlinks(opts.follow_symlinks);
    let candidates = discovery.discover()?;

    let run_query = || -> Vec<FaceInfo> {
        candidates
            .par_iter()
            .flat_map_iter(|loc| match load_faces(&loc.path, query.codepoint()) {
                Ok(faces) => faces,
                Err(err) => {
                    warn!("skipping {}: {err:#}", loc.path.display());
                    Vec::new()
                }
            })
            .filter(|face| query.matches(face) || face.is_label_candidate())
            .collect()
    };

    let faces = if let Some(jobs) = opts.jobs {
        let pool = ThreadPoolBuilder::new().num_threads(jobs).build()?;
        pool.install(run_query)
    } else {
        run_query()
    };

    let mut fonts = Vec::new();
    let mut labels = Vec::new();
    for face in faces {
        if face.is_label_candidate() {
            labels.push(face.pattern.clone());
        }
        if query.matches(&face) {
            fonts.push(face.pattern);
        }
    }

    let scan = FontScan {
        fonts: FontSet::from_patterns(fonts),
        label_candidates: FontSet::from_patterns(labels),
    };
    debug!(
        "{} faces contain {}, {} can draw labels",
        scan.fonts.len(),
        crate::codepoint::format_codepoint(query.codepoint() as u32),
        scan.label_candidates.len()
    );
    Ok(scan)
}

/// Read every face in `path` and report whether it maps `codepoint`.
///
/// Files that do not parse as a font or collection are an error.
pub fn load_faces(path: &Path, codepoint: char) -> Result<Vec<FaceInfo>> {
    let data = fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
    let file = FileRef::new(&data).with_context(|| format!("parsing font {}", path.display()))?;
    let mut faces = Vec::new();

    for font in file.fonts() {
        let font = font.with_context(|| format!("parsing face in {}", path.display()))?;
        let index = font.ttc_index();
        let charmap = font.charmap();
        let maps = |ch: char| charmap.map(ch).is_some_and(|gid| gid.to_u32() != 0);

        faces.push(FaceInfo {
            has_glyph: maps(codepoint),
            covers_latin: maps(LABEL_PROBE),
            pattern: FontPattern {
                family: family_name(&font, path),
                style: style_name(&font),
                file: path.to_path_buf(),
                index,
                scalable: is_scalable(&font),
            },
        });
    }

    Ok(faces)
}

fn is_scalable(font: &FontRef) -> bool {
    font.table_directory
        .table_records()
        .iter()
        .any(|rec| SCALABLE_TABLES.contains(&rec.tag()))
}

fn family_name(font: &FontRef, path: &Path) -> String {
    first_name(font, &[StringId::TYPOGRAPHIC_FAMILY_NAME, StringId::FAMILY_NAME]).unwrap_or_else(
        || {
            path.file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string())
        },
    )
}

fn style_name(font: &FontRef) -> String {
    first_name(
        font,
        &[StringId::TYPOGRAPHIC_SUBFAMILY_NAME, StringId::SUBFAMILY_NAME],
    )
    .unwrap_or_else(|| "Regular".to_string())
}

fn first_name(font: &FontRef, ids: &[StringId]) -> Option<String> {
    ids.iter().find_map(|id| {
        font.localized_strings(*id)
            .english_or_first()
            .map(|s| s.to_string().trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

fn compare_patterns(a: &FontPattern, b: &FontPattern) -> Ordering {
    a.family
        .to_lowercase()
        .cmp(&b.family.to_lowercase())
        .then_with(|| a.family.cmp(&b.family))
        .then_with(|| a.style.cmp(&b.style))
        .then_with(|| a.file.cmp(&b.file))
        .then_with(|| a.index.cmp(&b.index))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(family: &str, style: &str, file: &str) -> FontPattern {
        FontPattern {
            family: family.to_string(),
            style: style.to_string(),
            file: PathBuf::from(file),
            index: None,
            scalable: true,
        }
    }

    #[test]
    fn font_set_sorts_case_insensitively_and_dedups() {
        let set = FontSet::from_patterns(vec![
            pattern("noto Sans", "Bold", "/f/b.ttf"),
            pattern("DejaVu Sans", "Book", "/f/a.ttf"),
            pattern("DejaVu Sans", "Book", "/f/a.ttf"),
        ]);

        let families: Vec<&str> = set.patterns().iter().map(|p| p.family.as_str()).collect();
        assert_eq!(families, vec!["DejaVu Sans", "noto Sans"]);
    }

    #[test]
    fn limited_treats_zero_as_unbounded() {
        let set = FontSet::from_patterns(vec![
            pattern("A", "Regular", "/f/a.ttf"),
            pattern("B", "Regular", "/f/b.ttf"),
            pattern("C", "Regular", "/f/c.ttf"),
        ]);

        assert_eq!(set.limited(0).len(), 3);
        assert_eq!(set.limited(2).len(), 2);
        assert_eq!(set.limited(10).len(), 3);
    }

    #[test]
    fn label_candidates_must_be_scalable_and_latin() {
        let face = |covers_latin, scalable| FaceInfo {
            pattern: FontPattern {
                scalable,
                ..pattern("A", "Regular", "/f/a.ttf")
            },
            has_glyph: false,
            covers_latin,
        };

        assert!(face(true, true).is_label_candidate());
        assert!(!face(true, false).is_label_candidate());
        assert!(!face(false, true).is_label_candidate());
    }

    #[test]
    fn malformed_files_are_errors() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("broken.ttf");
        fs::write(&path, b"not a font").expect("write");

        let err = load_faces(&path, 'A').expect_err("not a font");
        assert!(format!("{err:#}").contains("broken.ttf"));
    }

    #[test]
    fn file_with_index_marks_collections() {
        let mut p = pattern("A", "Regular", "/f/a.ttc");
        p.index = Some(3);
        assert_eq!(p.file_with_index(), "/f/a.ttc#3");
    }
}
