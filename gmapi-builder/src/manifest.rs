use gmap_rs::{GmapError, TdbFile};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::Cli;

/// Subdirectory of the .gmap tree that holds the extracted tiles.
pub const TILES_DIR: &str = "OSMTiles";

/// Writes the `Info.xml` manifest that replaces the Windows registry
/// entries, in the `MapProduct` schema the Garmin converter emits.
pub fn write_info_xml(tdb: &TdbFile, cli: &Cli, gmap_dir: &Path) -> Result<(), GmapError> {
    let header = tdb.header.as_ref().ok_or_else(|| {
        GmapError::FormatMismatch(format!(
            "'{}' contains no header block",
            cli.tdbfile.display()
        ))
    })?;

    let mut f = File::create(gmap_dir.join("Info.xml"))?;
    writeln!(f, r#"<?xml version="1.0" encoding="UTF-8" standalone="no" ?>"#)?;
    writeln!(
        f,
        r#"<MapProduct xmlns="http://www.garmin.com/xmlschemas/MapProduct/v1">"#
    )?;
    writeln!(f)?;
    write_field(&mut f, "Name", &header.map_family, 1)?;
    writeln!(f)?;
    write_field(
        &mut f,
        "DataVersion",
        &format!(
            "{}{:02}",
            header.product_version.major, header.product_version.minor
        ),
        1,
    )?;
    writeln!(f)?;
    write_field(&mut f, "DataFormat", "Original", 1)?;
    writeln!(f)?;
    // The Windows converter omits a zero family ID, so this does too.
    if header.family_id > 0 {
        write_field(&mut f, "ID", &header.family_id.to_string(), 1)?;
        writeln!(f)?;
    }
    if let Some(style) = &cli.style {
        write_field(&mut f, "TYP", &crate::upper_file_name(style), 1)?;
        writeln!(f)?;
    }
    writeln!(f, "    <SubProduct>")?;
    write_field(&mut f, "Name", &header.map_series, 2)?;
    write_field(&mut f, "ID", &header.product_id.to_string(), 2)?;
    write_field(&mut f, "BaseMap", &base_name(&cli.baseimg), 2)?;
    write_field(&mut f, "TDB", &crate::upper_file_name(&cli.tdbfile), 2)?;
    write_field(&mut f, "Directory", TILES_DIR, 2)?;
    writeln!(f, "    </SubProduct>")?;
    writeln!(f, "</MapProduct>")?;
    Ok(())
}

fn write_field(f: &mut File, field: &str, value: &str, indent: usize) -> std::io::Result<()> {
    writeln!(f, "{}<{field}>{value}</{field}>", "    ".repeat(indent))
}

fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
