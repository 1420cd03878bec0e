//! # gmap-rs
//!
//! `gmap-rs` is a pure Rust reader for two binary formats used by Garmin
//! MapSource map sets: the TDB metadata file (a stream of typed,
//! length-prefixed blocks) and the IMG map container (a disk-image-like
//! file holding named subfiles addressed through a FAT-style sector table).
//! It enables decoding map-set metadata and extracting the subfiles of an
//! IMG container as plain files.
//!
//! ## Features
//! - Decode TDB header, copyright, overview, detail and trademark blocks
//! - Forward-compatible handling of unknown block types
//! - Reconstruct subfiles from an IMG container's sector table
//! - Extract subfiles byte-exact, truncated to their declared size
//!
//! ## Usage
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! gmap-rs = "0.1"
//! ```
//!
//! ### Example: Decoding a map set
//! ```no_run
//! use gmap_rs::{ImgFile, TdbFile};
//!
//! // Decode the map set's TDB metadata file
//! let tdb = TdbFile::open("path/to/mapset.tdb").unwrap();
//! if let Some(header) = &tdb.header {
//!     println!("Map series: {}", header.map_series);
//! }
//!
//! // Open an IMG container and extract its subfiles
//! let mut img = ImgFile::open("path/to/tile.img").unwrap();
//! for (name, size) in img.file_sizes() {
//!     println!("Subfile: {name} ({size} bytes)");
//! }
//! img.extract_to("output/dir".as_ref()).unwrap();
//! ```

mod coords;
mod error;
mod ext;
mod fat_entry;
mod img_file;
mod sub_file;
mod tdb_block;
mod tdb_file;

pub use coords::{semicircles_to_degrees, MapBounds};
pub use error::GmapError;
pub use img_file::ImgFile;
pub use sub_file::SubFile;
pub use tdb_block::{Block, BlockKind};
pub use tdb_file::{
    CopyrightRecord, DetailBlock, HeaderBlock, OverviewBlock, PackedVersion, TdbFile, UnknownBlock,
};
