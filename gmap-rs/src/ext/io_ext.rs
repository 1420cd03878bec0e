use std::io;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;

/// String and peek primitives shared by the TDB and IMG decoders.
///
/// All multi-byte integers in both formats are read through
/// `byteorder::ReadBytesExt` directly; this trait only covers what
/// `byteorder` does not: the two string conventions and stream-end probing.
pub trait ReadExt: Read + Seek {
    /// Reads bytes up to (and consuming, but excluding) a zero terminator.
    ///
    /// Reaching the end of the stream before the terminator is an
    /// `UnexpectedEof` error; a missing terminator means truncated input.
    fn read_cstr(&mut self) -> io::Result<String>;

    /// Reads exactly `count` bytes as a fixed-width string.
    fn read_fixed_str(&mut self, count: usize) -> io::Result<String>;

    /// Peeks a single byte without advancing, `None` at end of stream.
    fn peek_byte(&mut self) -> io::Result<Option<u8>>;
}

impl<T> ReadExt for T
where
    T: Read + Seek,
{
    fn read_cstr(&mut self) -> io::Result<String> {
        let mut bytes = Vec::new();
        let mut buf = [0u8; 1];
        loop {
            self.read_exact(&mut buf)?;
            if buf[0] == 0 {
                break;
            }
            bytes.push(buf[0]);
        }
        Ok(latin1_to_string(&bytes))
    }

    fn read_fixed_str(&mut self, count: usize) -> io::Result<String> {
        let mut bytes = vec![0u8; count];
        self.read_exact(&mut bytes)?;
        Ok(latin1_to_string(&bytes))
    }

    fn peek_byte(&mut self) -> io::Result<Option<u8>> {
        let pos = self.stream_position()?;
        let mut buf = [0u8; 1];
        let n = self.read(&mut buf)?;
        self.seek(SeekFrom::Start(pos))?;
        if n == 0 {
            Ok(None)
        } else {
            Ok(Some(buf[0]))
        }
    }
}

/// Both formats store strings as Latin-1; every byte maps to the Unicode
/// code point of the same value.
fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_cstr_stops_at_terminator() {
        let mut cur = Cursor::new(&b"OSM Map\0trailing"[..]);
        assert_eq!(cur.read_cstr().unwrap(), "OSM Map");
        assert_eq!(cur.position(), 8);
    }

    #[test]
    fn read_cstr_without_terminator_is_eof() {
        let mut cur = Cursor::new(&b"no terminator"[..]);
        let err = cur.read_cstr().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn read_fixed_str_decodes_latin1() {
        let mut cur = Cursor::new(&[0x4Du8, 0xFC, 0x6E][..]);
        assert_eq!(cur.read_fixed_str(3).unwrap(), "Mün");
    }

    #[test]
    fn read_fixed_str_short_input_is_eof() {
        let mut cur = Cursor::new(&b"ab"[..]);
        let err = cur.read_fixed_str(3).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn peek_byte_does_not_advance() {
        let mut cur = Cursor::new(&[0x42u8][..]);
        assert_eq!(cur.peek_byte().unwrap(), Some(0x42));
        assert_eq!(cur.position(), 0);
        cur.seek(SeekFrom::Start(1)).unwrap();
        assert_eq!(cur.peek_byte().unwrap(), None);
    }
}
