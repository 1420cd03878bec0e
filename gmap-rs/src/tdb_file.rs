use crate::coords::MapBounds;
use crate::error::GmapError;
use crate::ext::io_ext::ReadExt;
use crate::tdb_block::{Block, BlockKind};
use byteorder::{LittleEndian, ReadBytesExt};
use log::debug;
use std::fmt;
use std::fs::File;
use std::io;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

/// A TDB version number packed as `major * 100 + minor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedVersion {
    pub major: u16,
    pub minor: u16,
}

impl PackedVersion {
    pub fn from_packed(value: u16) -> PackedVersion {
        PackedVersion {
            major: value / 100,
            minor: value % 100,
        }
    }
}

impl fmt::Display for PackedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.major, self.minor)
    }
}

/// Decoded header block (tag 0x50).
#[derive(Debug, Clone)]
pub struct HeaderBlock {
    pub product_id: u16,
    pub family_id: u16,
    pub tdb_version: PackedVersion,
    pub map_series: String,
    pub product_version: PackedVersion,
    pub map_family: String,
}

/// One record of the copyright block (tag 0x44).
///
/// Category codes other than 0x00, 0x06 and 0x07 are preserved as
/// `Unknown` records rather than discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyrightRecord {
    /// Category 0x00: source attribution.
    Source(String),
    /// Category 0x06: copyright text.
    Text(String),
    /// Category 0x07: a bitmap reference with a scale factor.
    Bitmap { path: String, scale: i16 },
    Unknown { code: u8, text: String, extra: i16 },
}

/// Decoded overview block (tag 0x42): the bounding box of the whole map set.
#[derive(Debug, Clone)]
pub struct OverviewBlock {
    pub map_number: u32,
    pub parent_map: u32,
    pub bounds: MapBounds,
    pub description: String,
}

/// Decoded detail block (tag 0x4C): one map tile.
#[derive(Debug, Clone)]
pub struct DetailBlock {
    pub map_number: u32,
    pub parent_map: u32,
    pub bounds: MapBounds,
    pub description: String,
    pub rgn_size: u32,
    pub tre_size: u32,
    pub lbl_size: u32,
}

/// A block with a tag outside the known set, kept for diagnostics.
#[derive(Debug, Clone)]
pub struct UnknownBlock {
    pub tag: u8,
    pub data: Vec<u8>,
}

/// A decoded TDB metadata file.
///
/// A TDB file is a sequence of typed, length-prefixed blocks. Any block
/// type may be absent; a field left at `None` (or an empty detail list) is
/// a valid, if incomplete, result rather than an error.
#[derive(Debug, Default)]
pub struct TdbFile {
    pub header: Option<HeaderBlock>,
    pub copyrights: Option<Vec<CopyrightRecord>>,
    pub overview: Option<OverviewBlock>,
    pub trademark: Option<String>,
    pub details: Vec<DetailBlock>,
    pub unknown_blocks: Vec<UnknownBlock>,
}

impl TdbFile {
    /// Opens and fully decodes a TDB file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<TdbFile, GmapError> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);
        TdbFile::from_reader(&mut reader, &path.display().to_string())
    }

    /// Decodes a TDB file from any seekable byte source.
    ///
    /// `source` names the input in error messages. Detail blocks append to
    /// the tile list; every other known block overwrites its single field.
    pub fn from_reader<R: Read + Seek>(reader: &mut R, source: &str) -> Result<TdbFile, GmapError> {
        let mut tdb = TdbFile::default();
        while let Some(block) = Block::read(reader).map_err(|e| GmapError::from_read(e, source))? {
            let mut data = Cursor::new(block.data.as_slice());
            match block.kind {
                BlockKind::Header => {
                    tdb.header = Some(
                        parse_header(&mut data).map_err(|e| GmapError::from_read(e, source))?,
                    );
                }
                BlockKind::Copyright => {
                    tdb.copyrights = Some(
                        parse_copyright(&mut data).map_err(|e| GmapError::from_read(e, source))?,
                    );
                }
                BlockKind::Overview => {
                    tdb.overview = Some(
                        parse_overview(&mut data).map_err(|e| GmapError::from_read(e, source))?,
                    );
                }
                BlockKind::Detail => {
                    tdb.details.push(
                        parse_detail(&mut data).map_err(|e| GmapError::from_read(e, source))?,
                    );
                }
                BlockKind::Trademark => {
                    tdb.trademark = Some(
                        parse_trademark(&mut data).map_err(|e| GmapError::from_read(e, source))?,
                    );
                }
                BlockKind::Unknown(tag) => {
                    debug!(
                        "Unknown block: {tag:02X}, length: {}, {:02X?}",
                        block.data.len(),
                        block.data
                    );
                    tdb.unknown_blocks.push(UnknownBlock {
                        tag,
                        data: block.data,
                    });
                }
            }
        }
        Ok(tdb)
    }
}

fn parse_header(data: &mut Cursor<&[u8]>) -> io::Result<HeaderBlock> {
    let product_id = data.read_u16::<LittleEndian>()?;
    let family_id = data.read_u16::<LittleEndian>()?;
    let tdb_version = PackedVersion::from_packed(data.read_u16::<LittleEndian>()?);
    let map_series = data.read_cstr()?;
    let product_version = PackedVersion::from_packed(data.read_u16::<LittleEndian>()?);
    let map_family = data.read_cstr()?;
    Ok(HeaderBlock {
        product_id,
        family_id,
        tdb_version,
        map_series,
        product_version,
        map_family,
    })
}

fn parse_copyright(data: &mut Cursor<&[u8]>) -> io::Result<Vec<CopyrightRecord>> {
    let end = data.get_ref().len() as u64;
    let mut records = Vec::new();
    while data.position() < end {
        let code = data.read_u8()?;
        let _where_code = data.read_u8()?;
        let extra = data.read_i16::<LittleEndian>()?;
        let text = data.read_cstr()?;
        records.push(match code {
            0x00 => CopyrightRecord::Source(text),
            0x06 => CopyrightRecord::Text(text),
            0x07 => CopyrightRecord::Bitmap {
                path: text,
                scale: extra,
            },
            other => CopyrightRecord::Unknown {
                code: other,
                text,
                extra,
            },
        });
    }
    Ok(records)
}

fn parse_overview(data: &mut Cursor<&[u8]>) -> io::Result<OverviewBlock> {
    Ok(OverviewBlock {
        map_number: data.read_u32::<LittleEndian>()?,
        parent_map: data.read_u32::<LittleEndian>()?,
        bounds: MapBounds::read(data)?,
        description: data.read_cstr()?,
    })
}

fn parse_detail(data: &mut Cursor<&[u8]>) -> io::Result<DetailBlock> {
    let map_number = data.read_u32::<LittleEndian>()?;
    let parent_map = data.read_u32::<LittleEndian>()?;
    let bounds = MapBounds::read(data)?;
    let description = data.read_cstr()?;
    // 4 reserved bytes before the segment sizes.
    data.seek(SeekFrom::Current(4))?;
    Ok(DetailBlock {
        map_number,
        parent_map,
        bounds,
        description,
        rgn_size: data.read_u32::<LittleEndian>()?,
        tre_size: data.read_u32::<LittleEndian>()?,
        lbl_size: data.read_u32::<LittleEndian>()?,
    })
}

fn parse_trademark(data: &mut Cursor<&[u8]>) -> io::Result<String> {
    data.seek(SeekFrom::Current(1))?;
    data.read_cstr()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_version_splits_and_formats() {
        let v = PackedVersion::from_packed(407);
        assert_eq!(v.major, 4);
        assert_eq!(v.minor, 7);
        assert_eq!(v.to_string(), "4.07");
        assert_eq!(PackedVersion::from_packed(100).to_string(), "1.00");
    }

    #[test]
    fn copyright_categories_are_mapped() {
        let mut payload = Vec::new();
        // Category 0x00 with where-code and extra, then a category this
        // decoder has never seen.
        payload.extend_from_slice(&[0x00, 0x01, 0x00, 0x00]);
        payload.extend_from_slice(b"OpenStreetMap\0");
        payload.extend_from_slice(&[0x03, 0x00, 0x05, 0x00]);
        payload.extend_from_slice(b"mystery\0");
        let records = parse_copyright(&mut Cursor::new(payload.as_slice())).unwrap();
        assert_eq!(
            records,
            vec![
                CopyrightRecord::Source("OpenStreetMap".to_string()),
                CopyrightRecord::Unknown {
                    code: 0x03,
                    text: "mystery".to_string(),
                    extra: 5,
                },
            ]
        );
    }
}
