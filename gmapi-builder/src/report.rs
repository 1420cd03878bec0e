use gmap_rs::{CopyrightRecord, ImgFile, TdbFile};
use log::{debug, info, trace, warn};
use std::fs::File;

/// Prints a human-readable summary of a decoded TDB file: the header,
/// copyright and trademark at info, the overview map at debug, and the
/// per-tile detail at trace.
pub fn print_tdb(tdb: &TdbFile) {
    match &tdb.header {
        Some(header) => {
            info!("{:<20}{}", "TDB Version:", header.tdb_version);
            info!("{:<20}{}", "Product ID:", header.product_id);
            info!("{:<20}{}", "Family ID:", header.family_id);
            info!("{:<20}{}", "Map Series:", header.map_series);
            info!("{:<20}{}", "Map Family:", header.map_family);
            info!("{:<20}{}", "Product Version:", header.product_version);
        }
        None => warn!("TDB file contains no header block."),
    }

    match &tdb.copyrights {
        Some(records) => {
            for record in records {
                match record {
                    CopyrightRecord::Source(text) => info!("{:<20}{text}", "Source:"),
                    CopyrightRecord::Text(text) => info!("{:<20}{text}", "Copyright:"),
                    CopyrightRecord::Bitmap { path, scale } => {
                        info!("{:<20}{path} (scale factor {scale})", "Bitmap:")
                    }
                    CopyrightRecord::Unknown { code, text, extra } => {
                        info!("{:<20}{text} (extra {extra})", format!("Unknown ({code:02X}):"))
                    }
                }
            }
        }
        None => debug!("TDB file contains no copyright block."),
    }

    match &tdb.trademark {
        Some(trademark) => info!("{:<20}{trademark}", "Trademark:"),
        None => debug!("TDB file contains no trademark block."),
    }

    match &tdb.overview {
        Some(overview) => {
            debug!("Overview map:");
            debug!("    {:<20}{}", "Map Number:", overview.map_number);
            debug!("    {:<20}{}", "Parent Map:", overview.parent_map);
            debug!("    {:<20}{}", "Description:", overview.description);
            debug!(
                "    N: {:7.4}, S: {:7.4}, W: {:7.4}, E: {:7.4}",
                overview.bounds.north, overview.bounds.south, overview.bounds.west,
                overview.bounds.east
            );
        }
        None => warn!("TDB file contains no overview map."),
    }

    if tdb.details.is_empty() {
        warn!("TDB file contains no detail blocks.");
    } else {
        trace!("Detailed maps:");
        for detail in &tdb.details {
            trace!("   {:<20}{}", "Map Number:", detail.map_number);
            trace!("   {:<20}{}", "Parent Map:", detail.parent_map);
            trace!("   {:<20}{}", "Description:", detail.description);
            trace!(
                "   N: {:7.4}, S: {:7.4}, W: {:7.4}, E: {:7.4}",
                detail.bounds.north,
                detail.bounds.south,
                detail.bounds.west,
                detail.bounds.east
            );
            trace!(
                "   RGN: {}, TRE: {}, LBL: {}",
                detail.rgn_size,
                detail.tre_size,
                detail.lbl_size
            );
        }
    }
}

/// Lists the subfiles of an opened IMG container with their declared sizes.
pub fn print_img(img: &ImgFile<File>) {
    trace!("Contents of {}:", img.base_name());
    for (name, size) in img.file_sizes() {
        trace!("    {name}: Size: {size}");
    }
}
