//! glyphfind CLI (made by FontLab https://www.fontlab.com/)

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{ArgAction, Parser, ValueHint};
use log::{debug, LevelFilter};

use glyphfind_core::codepoint::{parse_os_character, TargetChar};
use glyphfind_core::discovery::system_font_roots;
use glyphfind_core::fontset::{scan_font_set, CharsetQuery, FontSet, SearchOptions};
use glyphfind_core::output::{
    write_annotation, write_families, write_json_pretty, write_name, write_ndjson,
};
use glyphfind_core::preview::{choose_label_font, render_png, PreviewModel};
use glyphfind_core::unicode::CharInfo;

#[cfg(feature = "display")]
mod viewer;

/// CLI entrypoint for glyphfind.
#[derive(Debug, Parser)]
#[command(
    name = "glyphfind",
    version,
    about = "Find and preview fonts that contain a glyph (made by FontLab https://www.fontlab.com/)"
)]
pub struct Cli {
    /// Hex codepoint (0x2603, U+2603) or a literal character
    #[arg(value_name = "CHARACTER", value_hint = ValueHint::Other)]
    character: OsString,

    /// Don't display found glyphs
    #[arg(short = 'N', long = "nodisplay", action = ArgAction::SetTrue)]
    nodisplay: bool,

    /// Maximum number of fonts to return/show (0 = all)
    #[arg(short = 'm', long = "maxfonts", default_value_t = 0)]
    maxfonts: usize,

    /// Print debugging information
    #[arg(short = 'd', long = "debug", action = ArgAction::SetTrue)]
    debug: bool,

    /// Print unicode character name
    #[arg(short = 'n', long = "name", action = ArgAction::SetTrue)]
    name: bool,

    /// Print unicode character annotation string
    #[arg(short = 'a', long = "annotation", action = ArgAction::SetTrue)]
    annotation: bool,

    /// Print list of fonts with character
    #[arg(short = 'p', long = "print", action = ArgAction::SetTrue)]
    print: bool,

    /// Include fixed-size fonts
    #[arg(short = 'f', long = "fixed", action = ArgAction::SetTrue)]
    fixed: bool,

    /// Search these directories instead of the system font directories
    #[arg(long = "font-dir", value_hint = ValueHint::DirPath)]
    font_dirs: Vec<PathBuf>,

    /// Follow symlinks while walking font directories
    #[arg(long = "follow-symlinks", action = ArgAction::SetTrue)]
    follow_symlinks: bool,

    /// Number of threads used to scan fonts
    #[arg(short = 'j', long = "jobs")]
    jobs: Option<usize>,

    /// Emit the matching fonts as a single JSON array
    #[arg(long = "json", action = ArgAction::SetTrue, conflicts_with = "ndjson")]
    json: bool,

    /// Emit the matching fonts as newline-delimited JSON
    #[arg(long = "ndjson", action = ArgAction::SetTrue)]
    ndjson: bool,

    /// Render the preview grid into a PNG file
    #[arg(long = "png", value_hint = ValueHint::FilePath)]
    png: Option<PathBuf>,

    /// Canvas size for the window and the PNG
    #[arg(long = "size", default_value = "800x600", value_parser = parse_size)]
    size: (u32, u32),
}

/// Parse CLI args and execute the pipeline.
///
/// Usage errors exit with status 1 like every other failure; `--help` and
/// `--version` exit 0.
pub fn run() -> Result<()> {
    let cli = Cli::try_parse().unwrap_or_else(|err| {
        if err.use_stderr() {
            let _ = err.print();
            process::exit(1);
        }
        err.exit()
    });
    init_logging(cli.debug);
    run_cli(cli)
}

/// Warnings for everyone; `--debug` only raises glyphfind's own modules.
fn logger_builder(debug: bool) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Warn);
    if debug {
        builder
            .filter_module("glyphfind_core", LevelFilter::Debug)
            .filter_module("glyphfind_cli", LevelFilter::Debug);
    }
    builder
}

fn init_logging(debug: bool) {
    let _ = logger_builder(debug).parse_default_env().try_init();
}

fn run_cli(cli: Cli) -> Result<()> {
    let target = parse_os_character(&cli.character)?;
    let info = CharInfo::lookup(target.char());
    let roots = font_roots(&cli.font_dirs)?;
    let opts = SearchOptions {
        follow_symlinks: cli.follow_symlinks,
        jobs: cli.jobs,
    };

    let query = build_query(&cli, target);
    let scan = scan_font_set(&roots, &query, &opts)?;
    let fonts = scan.fonts;
    debug!("{} fonts contain {target}", fonts.len());

    if cli.png.is_some() || !cli.nodisplay {
        let model = PreviewModel {
            target,
            name: info.name.clone(),
            fonts: fonts.limited(cli.maxfonts).to_vec(),
            label_font: choose_label_font(scan.label_candidates.patterns()),
        };
        let (width, height) = cli.size;

        if let Some(path) = &cli.png {
            render_png(model.clone(), width, height, path)?;
        }
        if !cli.nodisplay {
            show_preview(model, width, height)?;
        }
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_report(&cli, &info, &fonts, &mut handle)?;
    handle.flush()?;

    Ok(())
}

fn build_query(cli: &Cli, target: TargetChar) -> CharsetQuery {
    CharsetQuery::new(target.char()).require_scalable(!cli.fixed)
}

fn font_roots(explicit: &[PathBuf]) -> Result<Vec<PathBuf>> {
    if explicit.is_empty() {
        system_font_roots()
    } else {
        Ok(explicit.to_vec())
    }
}

fn write_report(cli: &Cli, info: &CharInfo, fonts: &FontSet, mut w: impl Write) -> Result<()> {
    if cli.name {
        write_name(info, &mut w)?;
    }
    if cli.annotation {
        write_annotation(info, &mut w)?;
    }

    let shown = fonts.limited(cli.maxfonts);
    if cli.print {
        write_families(shown, &mut w)?;
    }
    if cli.ndjson {
        write_ndjson(shown, &mut w)?;
    } else if cli.json {
        write_json_pretty(shown, &mut w)?;
    }
    Ok(())
}

fn parse_size(raw: &str) -> Result<(u32, u32), String> {
    let (w, h) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {raw}"))?;
    let width: u32 = w.trim().parse().map_err(|_| format!("invalid width: {w}"))?;
    let height: u32 = h.trim().parse().map_err(|_| format!("invalid height: {h}"))?;
    if width == 0 || height == 0 {
        return Err("size must be non-zero".to_string());
    }
    Ok((width, height))
}

#[cfg(feature = "display")]
fn show_preview(model: PreviewModel, width: u32, height: u32) -> Result<()> {
    viewer::run(model, width, height)
}

#[cfg(not(feature = "display"))]
fn show_preview(_model: PreviewModel, _width: u32, _height: u32) -> Result<()> {
    Err(anyhow::anyhow!(
        "glyphfind was built without the display feature; rerun with --nodisplay"
    ))
}
