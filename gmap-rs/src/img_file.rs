use crate::error::GmapError;
use crate::ext::io_ext::ReadExt;
use crate::fat_entry::{FatEntry, FAT_ENTRY_SIZE, FAT_OFFSET};
use crate::sub_file::SubFile;
use byteorder::ReadBytesExt;
use log::{trace, warn};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// An open IMG map container with its sector table fully decoded.
///
/// The container is a small disk image: subfile bytes live in fixed-size
/// sectors, and a FAT at a fixed offset maps each named subfile to its
/// sector list. Opening validates the signature, scans the table, and
/// merges multi-part subfiles; `extract_to` then streams the bytes out.
#[derive(Debug)]
pub struct ImgFile<R: Read + Seek> {
    reader: R,
    base_name: String,
    sector_size: u32,
    /// Subfiles keyed by their full `name.extension`.
    pub files: BTreeMap<String, SubFile>,
}

impl ImgFile<File> {
    /// Opens an IMG container from disk and decodes its file table.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<ImgFile<File>, GmapError> {
        let path = path.as_ref();
        let base_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file = File::open(path)?;
        ImgFile::from_reader(file, &path.display().to_string(), base_name)
    }
}

impl<R: Read + Seek> ImgFile<R> {
    /// Decodes an IMG container from any seekable byte source.
    ///
    /// `source` names the input in error messages; `base_name` names the
    /// output directory created by `extract_to`.
    pub fn from_reader(
        mut reader: R,
        source: &str,
        base_name: String,
    ) -> Result<ImgFile<R>, GmapError> {
        check_signature(&mut reader, source)?;
        let sector_size = read_sector_size(&mut reader, source)?;
        let entries = scan_fat(&mut reader, source)?;
        let files = group_entries(entries)?;
        Ok(ImgFile {
            reader,
            base_name,
            sector_size,
            files,
        })
    }

    /// The container's base filename, without its extension.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// The sector size computed from the container's exponent pair.
    pub fn sector_size(&self) -> u32 {
        self.sector_size
    }

    /// The declared size of every subfile, for listings and manifests.
    pub fn file_sizes(&self) -> impl Iterator<Item = (String, u32)> + '_ {
        self.files.values().map(|sub| (sub.full_name(), sub.size))
    }

    /// Extracts every subfile into `<base_dir>/<base_name>/`.
    ///
    /// Sectors are copied in merged order and the output truncated to the
    /// declared size, since the last sector is generally padded. A failure
    /// leaves the directory partially written; callers should treat it as
    /// invalid and remove it.
    pub fn extract_to(&mut self, base_dir: &Path) -> Result<(), GmapError> {
        let output_dir = base_dir.join(&self.base_name);
        fs::create_dir_all(&output_dir)?;
        let sector_size = u64::from(self.sector_size);
        let ImgFile { reader, files, .. } = self;
        for sub in files.values() {
            let path = output_dir.join(sub.full_name());
            let mut out = File::create(&path)?;
            for &sector in sub.sectors() {
                reader.seek(SeekFrom::Start(u64::from(sector) * sector_size))?;
                let copied = io::copy(&mut (&mut *reader).take(sector_size), &mut out)?;
                if copied < sector_size {
                    warn!(
                        "Short read of sector {sector} in {}: {copied} of {sector_size} bytes",
                        sub.full_name()
                    );
                }
            }
            out.set_len(u64::from(sub.size))?;
            trace!("Wrote: {}", path.display());
        }
        Ok(())
    }
}

/// Validates the three signature fields before touching the file table:
/// a zero lead byte (non-zero means an encrypted or foreign file), then
/// the `DSKIMG` and `GARMIN` markers.
fn check_signature<R: Read + Seek>(reader: &mut R, source: &str) -> Result<(), GmapError> {
    reader.seek(SeekFrom::Start(0))?;
    let lead = reader
        .read_u8()
        .map_err(|e| GmapError::from_read(e, source))?;
    if lead != 0 {
        return Err(GmapError::FormatMismatch(format!(
            "'{source}' is not a valid or unencrypted IMG file"
        )));
    }
    for (offset, marker) in [(0x10, "DSKIMG"), (0x41, "GARMIN")] {
        reader.seek(SeekFrom::Start(offset))?;
        let found = reader
            .read_cstr()
            .map_err(|e| GmapError::from_read(e, source))?;
        if found != marker {
            return Err(GmapError::FormatMismatch(format!(
                "'{source}' is not an IMG file, or is an unsupported version (expected '{marker}')"
            )));
        }
    }
    Ok(())
}

/// Computes the sector size `1 << (e1 + e2)` from the exponent pair at
/// offset 0x61. An exponent sum that would overflow the shift cannot come
/// from a well-formed container and is rejected as unsupported.
fn read_sector_size<R: Read + Seek>(reader: &mut R, source: &str) -> Result<u32, GmapError> {
    reader.seek(SeekFrom::Start(0x61))?;
    let e1 = reader.read_u8().map_err(|e| GmapError::from_read(e, source))?;
    let e2 = reader.read_u8().map_err(|e| GmapError::from_read(e, source))?;
    let exponent = u32::from(e1) + u32::from(e2);
    if exponent >= 32 {
        return Err(GmapError::FormatMismatch(format!(
            "'{source}' declares an unsupported sector size exponent {exponent}"
        )));
    }
    Ok(1u32 << exponent)
}

/// Scans the FAT from its fixed offset, one 512-byte entry at a time,
/// until the terminator entry.
fn scan_fat<R: Read + Seek>(reader: &mut R, source: &str) -> Result<Vec<FatEntry>, GmapError> {
    let mut entries = Vec::new();
    for index in 0.. {
        reader.seek(SeekFrom::Start(FAT_OFFSET + index * FAT_ENTRY_SIZE))?;
        match FatEntry::read(reader).map_err(|e| GmapError::from_read(e, source))? {
            Some(entry) => entries.push(entry),
            None => break,
        }
    }
    Ok(entries)
}

/// Groups raw table entries into subfiles by full name, assigns the
/// declared size from each part-0 entry, and merges the part lists.
fn group_entries(entries: Vec<FatEntry>) -> Result<BTreeMap<String, SubFile>, GmapError> {
    let mut files = BTreeMap::new();
    for entry in entries {
        let sub = files
            .entry(format!("{}.{}", entry.name, entry.extension))
            .or_insert_with(|| SubFile::new(entry.name.clone(), entry.extension.clone()));
        if entry.part == 0 {
            sub.size = entry.size;
        }
        sub.add_part(entry.part, entry.sectors);
    }
    for sub in files.values_mut() {
        sub.merge_parts()?;
    }
    Ok(files)
}
