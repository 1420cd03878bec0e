use crate::ext::io_ext::ReadExt;
use byteorder::{LittleEndian, ReadBytesExt};
use std::io;
use std::io::{Read, Seek};

/// The block types a TDB file is known to contain.
///
/// Dispatch over blocks is an exhaustive match on this enum; tags outside
/// the known set land in `Unknown` and are preserved rather than rejected,
/// so newer TDB revisions still decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Header,
    Copyright,
    Overview,
    Detail,
    Trademark,
    Unknown(u8),
}

impl BlockKind {
    pub fn from_tag(tag: u8) -> BlockKind {
        match tag {
            0x50 => BlockKind::Header,
            0x44 => BlockKind::Copyright,
            0x42 => BlockKind::Overview,
            0x4C => BlockKind::Detail,
            0x52 => BlockKind::Trademark,
            other => BlockKind::Unknown(other),
        }
    }
}

/// One record of the TDB block stream: a 1-byte tag, a 2-byte declared
/// payload length, and exactly that many payload bytes.
#[derive(Debug)]
pub struct Block {
    pub kind: BlockKind,
    pub tag: u8,
    pub data: Vec<u8>,
}

impl Block {
    /// Reads the next block, or `None` at the end of the stream.
    ///
    /// A payload shorter than the declared length is an `UnexpectedEof`
    /// error; the metadata file is truncated and unusable.
    pub fn read<R: Read + Seek>(reader: &mut R) -> io::Result<Option<Block>> {
        if reader.peek_byte()?.is_none() {
            return Ok(None);
        }
        let tag = reader.read_u8()?;
        let length = reader.read_u16::<LittleEndian>()?;
        let mut data = vec![0u8; usize::from(length)];
        reader.read_exact(&mut data)?;
        Ok(Some(Block {
            kind: BlockKind::from_tag(tag),
            tag,
            data,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn known_tags_map_to_their_kind() {
        assert_eq!(BlockKind::from_tag(0x50), BlockKind::Header);
        assert_eq!(BlockKind::from_tag(0x44), BlockKind::Copyright);
        assert_eq!(BlockKind::from_tag(0x42), BlockKind::Overview);
        assert_eq!(BlockKind::from_tag(0x4C), BlockKind::Detail);
        assert_eq!(BlockKind::from_tag(0x52), BlockKind::Trademark);
        assert_eq!(BlockKind::from_tag(0x99), BlockKind::Unknown(0x99));
    }

    #[test]
    fn reads_tag_length_and_payload() {
        let mut cur = Cursor::new(vec![0x42, 0x03, 0x00, 0xAA, 0xBB, 0xCC]);
        let block = Block::read(&mut cur).unwrap().unwrap();
        assert_eq!(block.tag, 0x42);
        assert_eq!(block.kind, BlockKind::Overview);
        assert_eq!(block.data, vec![0xAA, 0xBB, 0xCC]);
        assert!(Block::read(&mut cur).unwrap().is_none());
    }

    #[test]
    fn short_payload_is_eof() {
        let mut cur = Cursor::new(vec![0x42, 0x0A, 0x00, 0xAA]);
        let err = Block::read(&mut cur).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
