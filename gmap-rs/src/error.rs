use std::io;

/// Represents all possible errors that can occur while decoding TDB and IMG files.
///
/// Every variant is fatal for the file being decoded: the inputs are static
/// map data, so a failure always means malformed or unsupported input, never
/// a transient condition worth retrying.
#[derive(Debug)]
pub enum GmapError {
    /// The source ended before a field could be fully read.
    EndOfData(String),
    /// A signature or marker check failed; the file is not a supported TDB/IMG file.
    FormatMismatch(String),
    /// A subfile's part indices do not form a contiguous sequence from zero.
    MissingPart { file: String, part: usize },
    /// Represents an error that occurs during I/O operations.
    Io(io::Error),
}

impl std::fmt::Display for GmapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GmapError::EndOfData(source) => write!(f, "End of data reached on '{source}'"),
            GmapError::FormatMismatch(msg) => write!(f, "Format mismatch: {msg}"),
            GmapError::MissingPart { file, part } => {
                write!(f, "Missing part {part} of {file} in IMG file")
            }
            GmapError::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for GmapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GmapError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for GmapError {
    fn from(error: io::Error) -> Self {
        GmapError::Io(error)
    }
}

impl GmapError {
    /// Maps a read failure to `EndOfData` naming the source, keeping every
    /// other I/O failure as `Io`.
    pub(crate) fn from_read(error: io::Error, source: &str) -> Self {
        if error.kind() == io::ErrorKind::UnexpectedEof {
            GmapError::EndOfData(source.to_string())
        } else {
            GmapError::Io(error)
        }
    }
}
