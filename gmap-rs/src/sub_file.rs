use crate::error::GmapError;

/// One logical file reconstructed from an IMG container's sector table.
///
/// A subfile larger than one FAT entry's slot capacity is split into
/// numbered parts; `merge_parts` joins them back into one flat sector
/// sequence in part order.
#[derive(Debug)]
pub struct SubFile {
    pub name: String,
    pub extension: String,
    /// Declared byte size, taken from the part-0 entry.
    pub size: u32,
    parts: Vec<(u8, Vec<u16>)>,
    sectors: Vec<u16>,
}

impl SubFile {
    pub(crate) fn new(name: String, extension: String) -> SubFile {
        SubFile {
            name,
            extension,
            size: 0,
            parts: Vec::new(),
            sectors: Vec::new(),
        }
    }

    /// The subfile's identity within the container, `name.extension`.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.name, self.extension)
    }

    /// The merged sector sequence; extraction must read these in order.
    pub fn sectors(&self) -> &[u16] {
        &self.sectors
    }

    pub(crate) fn add_part(&mut self, part: u8, sectors: Vec<u16>) {
        self.parts.push((part, sectors));
    }

    /// Sorts the collected parts by index, requires them to form the exact
    /// sequence `0..N`, and concatenates their sector lists.
    pub(crate) fn merge_parts(&mut self) -> Result<(), GmapError> {
        self.parts.sort_by_key(|(part, _)| *part);
        for (expected, (part, _)) in self.parts.iter().enumerate() {
            if usize::from(*part) != expected {
                return Err(GmapError::MissingPart {
                    file: self.full_name(),
                    part: expected,
                });
            }
        }
        self.sectors = self
            .parts
            .drain(..)
            .flat_map(|(_, sectors)| sectors)
            .collect();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts_merge_in_index_order() {
        let mut sub = SubFile::new("GMAPSUPP".to_string(), "RGN".to_string());
        sub.add_part(1, vec![30, 31]);
        sub.add_part(0, vec![10, 11, 12]);
        sub.merge_parts().unwrap();
        assert_eq!(sub.sectors(), &[10, 11, 12, 30, 31]);
    }

    #[test]
    fn gap_in_parts_names_first_missing_index() {
        let mut sub = SubFile::new("GMAPSUPP".to_string(), "LBL".to_string());
        sub.add_part(2, vec![40]);
        match sub.merge_parts().unwrap_err() {
            GmapError::MissingPart { file, part } => {
                assert_eq!(file, "GMAPSUPP.LBL");
                assert_eq!(part, 0);
            }
            other => panic!("expected MissingPart, got {other:?}"),
        }
    }

    #[test]
    fn hole_after_part_zero_is_reported() {
        let mut sub = SubFile::new("GMAPSUPP".to_string(), "TRE".to_string());
        sub.add_part(0, vec![5]);
        sub.add_part(2, vec![6]);
        match sub.merge_parts().unwrap_err() {
            GmapError::MissingPart { part, .. } => assert_eq!(part, 1),
            other => panic!("expected MissingPart, got {other:?}"),
        }
    }
}
