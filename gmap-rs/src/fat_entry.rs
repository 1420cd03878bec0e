use crate::ext::io_ext::ReadExt;
use byteorder::{LittleEndian, ReadBytesExt};
use std::io;
use std::io::{Read, Seek, SeekFrom};

/// Offset of the first FAT entry in an IMG container.
pub(crate) const FAT_OFFSET: u64 = 0x600;
/// Every FAT entry occupies exactly 512 bytes, padded if necessary.
pub(crate) const FAT_ENTRY_SIZE: u64 = 512;

/// Number of sector slots per entry; larger subfiles span multiple parts.
const SECTOR_SLOTS: usize = 240;
/// Sentinel marking an unused sector slot, compared unsigned.
const UNUSED_SECTOR: u16 = 0xFFFF;

/// One raw entry of the IMG file-allocation table.
///
/// `size` is only meaningful on the part-0 entry of a subfile; the grouping
/// step assigns it from there.
#[derive(Debug)]
pub(crate) struct FatEntry {
    pub name: String,
    pub extension: String,
    pub size: u32,
    pub part: u8,
    pub sectors: Vec<u16>,
}

impl FatEntry {
    /// Reads one entry at the current position, or `None` at the
    /// terminator entry (lead byte zero).
    pub fn read<R: Read + Seek>(reader: &mut R) -> io::Result<Option<FatEntry>> {
        if reader.read_u8()? == 0 {
            return Ok(None);
        }
        let name = reader.read_fixed_str(8)?;
        let extension = reader.read_fixed_str(3)?;
        let size = reader.read_u32::<LittleEndian>()?;
        reader.seek(SeekFrom::Current(1))?;
        let part = reader.read_u8()?;
        reader.seek(SeekFrom::Current(14))?;
        let mut sectors = Vec::new();
        for _ in 0..SECTOR_SLOTS {
            let sector = reader.read_u16::<LittleEndian>()?;
            if sector != UNUSED_SECTOR {
                sectors.push(sector);
            }
        }
        Ok(Some(FatEntry {
            name,
            extension,
            size,
            part,
            sectors,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn raw_entry(name: &[u8; 8], ext: &[u8; 3], size: u32, part: u8, sectors: &[u16]) -> Vec<u8> {
        let mut raw = vec![0u8; FAT_ENTRY_SIZE as usize];
        raw[0] = 1;
        raw[1..9].copy_from_slice(name);
        raw[9..12].copy_from_slice(ext);
        raw[12..16].copy_from_slice(&size.to_le_bytes());
        raw[17] = part;
        for slot in 0..SECTOR_SLOTS {
            let sector = sectors.get(slot).copied().unwrap_or(UNUSED_SECTOR);
            raw[32 + slot * 2..34 + slot * 2].copy_from_slice(&sector.to_le_bytes());
        }
        raw
    }

    #[test]
    fn decodes_name_size_part_and_sectors() {
        let raw = raw_entry(b"GMAPSUPP", b"TRE", 4096, 0, &[3, 4, 7]);
        let entry = FatEntry::read(&mut Cursor::new(raw)).unwrap().unwrap();
        assert_eq!(entry.name, "GMAPSUPP");
        assert_eq!(entry.extension, "TRE");
        assert_eq!(entry.size, 4096);
        assert_eq!(entry.part, 0);
        assert_eq!(entry.sectors, vec![3, 4, 7]);
    }

    #[test]
    fn zero_lead_byte_terminates_the_table() {
        let raw = vec![0u8; FAT_ENTRY_SIZE as usize];
        assert!(FatEntry::read(&mut Cursor::new(raw)).unwrap().is_none());
    }

    #[test]
    fn unused_slots_are_skipped_mid_list() {
        let mut raw = raw_entry(b"GMAPSUPP", b"RGN", 0, 1, &[]);
        // Slots: 9, unused, 11; the sentinel must not truncate the list.
        raw[32..34].copy_from_slice(&9u16.to_le_bytes());
        raw[34..36].copy_from_slice(&UNUSED_SECTOR.to_le_bytes());
        raw[36..38].copy_from_slice(&11u16.to_le_bytes());
        let entry = FatEntry::read(&mut Cursor::new(raw)).unwrap().unwrap();
        assert_eq!(entry.sectors, vec![9, 11]);
    }
}
