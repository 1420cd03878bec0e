mod manifest;
mod report;

use clap::Parser;
use gmap_rs::{GmapError, ImgFile, TdbFile};
use log::{info, LevelFilter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Converts a Garmin MapSource map set (one TDB file plus a collection of
/// IMG containers) into the .gmapi directory structure used on macOS.
#[derive(Debug, Parser)]
#[command(name = "gmapi-builder", version, about)]
struct Cli {
    /// The map set's TDB file.
    #[arg(short, long)]
    tdbfile: PathBuf,

    /// The map set's base image.
    #[arg(short, long)]
    baseimg: PathBuf,

    /// Output directory for the .gmapi folder.
    #[arg(short, long, default_value = "./")]
    output: PathBuf,

    /// An optional style file (TYP) to bundle.
    #[arg(short, long)]
    style: Option<PathBuf>,

    /// Decode and validate everything without writing any output.
    #[arg(short, long)]
    dry_run: bool,

    /// Increase verbosity (-v shows per-map info, -vv per-file detail).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// IMG container files to extract.
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

/// Directories of a prepared .gmapi tree.
struct OutputLayout {
    gmap_dir: PathBuf,
    tiles_dir: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), GmapError> {
    if !cli.baseimg.is_file() {
        return Err(not_found("base image", &cli.baseimg));
    }
    if let Some(style) = &cli.style {
        if !style.is_file() {
            return Err(not_found("style file", style));
        }
    }

    let tdb = TdbFile::open(&cli.tdbfile)?;
    report::print_tdb(&tdb);

    let layout = if cli.dry_run {
        None
    } else {
        let layout = prepare_output(&tdb, cli)?;
        manifest::write_info_xml(&tdb, cli, &layout.gmap_dir)?;
        copy_mapset_files(cli, &layout)?;
        Some(layout)
    };

    // Each container is an independent all-or-nothing decode and extract;
    // the first failure aborts the whole conversion.
    for image in &cli.images {
        let mut img = ImgFile::open(image)?;
        report::print_img(&img);
        if let Some(layout) = &layout {
            img.extract_to(&layout.tiles_dir)?;
        }
    }
    Ok(())
}

fn not_found(what: &str, path: &Path) -> GmapError {
    GmapError::Io(io::Error::new(
        io::ErrorKind::NotFound,
        format!("{what} '{}' not found", path.display()),
    ))
}

/// Creates `<output>/<series>.gmapi/<series>.gmap/OSMTiles/`, removing a
/// pre-existing `.gmapi` tree first.
fn prepare_output(tdb: &TdbFile, cli: &Cli) -> Result<OutputLayout, GmapError> {
    let header = tdb.header.as_ref().ok_or_else(|| {
        GmapError::FormatMismatch(format!(
            "'{}' contains no header block",
            cli.tdbfile.display()
        ))
    })?;
    if !cli.output.is_dir() {
        return Err(not_found("output directory", &cli.output));
    }

    let gmapi_dir = cli.output.join(format!("{}.gmapi", header.map_series));
    if gmapi_dir.exists() {
        info!("Removing existing '{}' recursively", gmapi_dir.display());
        if gmapi_dir.is_dir() {
            fs::remove_dir_all(&gmapi_dir)?;
        } else {
            fs::remove_file(&gmapi_dir)?;
        }
    }

    let gmap_dir = gmapi_dir.join(format!("{}.gmap", header.map_series));
    let tiles_dir = gmap_dir.join(manifest::TILES_DIR);
    fs::create_dir(&gmapi_dir)?;
    fs::create_dir(&gmap_dir)?;
    fs::create_dir(&tiles_dir)?;
    Ok(OutputLayout {
        gmap_dir,
        tiles_dir,
    })
}

/// Copies the TDB (and optional TYP) into the prepared tree, with the
/// upper-cased names the Windows converter produces.
fn copy_mapset_files(cli: &Cli, layout: &OutputLayout) -> Result<(), GmapError> {
    let tdb_name = upper_file_name(&cli.tdbfile);
    fs::copy(&cli.tdbfile, layout.tiles_dir.join(tdb_name))?;
    if let Some(style) = &cli.style {
        fs::copy(style, layout.gmap_dir.join(upper_file_name(style)))?;
    }
    Ok(())
}

fn upper_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_uppercase())
        .unwrap_or_default()
}
