/// glyphfind-core: who on this machine can draw that character?
///
/// You have a character in hand, maybe a stubborn `☃` or an obscure `U+1F9A4`,
/// and you want to know which installed fonts will actually draw it. This
/// crate walks the font directories, asks every face whether its character
/// map knows the code point, and then lines the volunteers up in a grid so
/// you can compare them side by side.
///
/// ## The Pipeline
///
/// **Resolve**: turn `é`, `0xE9` or `U+00E9` into one Unicode scalar
/// - Hex prefixes `0x`, `0X`, `U+` and `u+` are understood
/// - Literal arguments take their first character
///
/// **Query**: build the font set
/// - Every face of every TTF, OTF, TTC and OTC file is inspected in parallel
/// - Faces must map the code point, and by default must be scalable
/// - Results come back ordered by family, style and file
///
/// **Preview**: draw the glyph grid
/// - Rows and columns follow the aspect ratio of the canvas
/// - Family names are shrunk until the longest one fits its strip
/// - Outlines come from skrifa and are filled by tiny-skia
///
/// **Report**: tell the terminal what we found
/// - Unicode name and an annotation of category, script and encodings
/// - Family names, or the full font set as JSON
///
/// ## A Sample Conversation
///
/// ```rust,no_run
/// use glyphfind_core::codepoint::parse_character;
/// use glyphfind_core::discovery::system_font_roots;
/// use glyphfind_core::fontset::{query_font_set, CharsetQuery, SearchOptions};
///
/// let target = parse_character("U+2603")?;
/// let query = CharsetQuery::new(target.char());
/// let fonts = query_font_set(&system_font_roots()?, &query, &SearchOptions::default())?;
///
/// for font in fonts.limited(10) {
///     println!("{} {} ({})", font.family, font.style, font.file_with_index());
/// }
/// # Ok::<(), anyhow::Error>(())
/// ```
///
/// ---
///
/// Crafted with care at FontLab https://www.fontlab.com/

pub mod codepoint;
pub mod discovery;
pub mod events;
pub mod fontset;
pub mod layout;
pub mod output;
pub mod preview;
pub mod render;
pub mod unicode;
