use byteorder::{LittleEndian, ReadBytesExt};
use std::io;
use std::io::Read;

/// Converts a signed 32-bit semicircle value to degrees.
///
/// The TDB format stores coordinates as fractions of a full rotation:
/// `degrees = raw * 360 / 2^32`, so `i32::MIN` maps to -180.0 and the
/// mapping is exact for powers of two.
pub fn semicircles_to_degrees(raw: i32) -> f64 {
    f64::from(raw) * 360.0 / 4_294_967_296.0
}

/// Geographic bounding box of an overview or detail map, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub north: f64,
    pub east: f64,
    pub south: f64,
    pub west: f64,
}

impl MapBounds {
    /// Reads the four bounding-box edges in file order (N, E, S, W).
    pub(crate) fn read<R: Read>(reader: &mut R) -> io::Result<MapBounds> {
        Ok(MapBounds {
            north: semicircles_to_degrees(reader.read_i32::<LittleEndian>()?),
            east: semicircles_to_degrees(reader.read_i32::<LittleEndian>()?),
            south: semicircles_to_degrees(reader.read_i32::<LittleEndian>()?),
            west: semicircles_to_degrees(reader.read_i32::<LittleEndian>()?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_zero_degrees() {
        assert_eq!(semicircles_to_degrees(0), 0.0);
    }

    #[test]
    fn half_rotation_is_180_degrees() {
        assert_eq!(semicircles_to_degrees(i32::MIN), -180.0);
        assert_eq!(semicircles_to_degrees(1 << 30), 90.0);
        assert_eq!(semicircles_to_degrees(-(1 << 30)), -90.0);
    }

    #[test]
    fn max_raw_stays_below_180_degrees() {
        let max = semicircles_to_degrees(i32::MAX);
        assert!(max > 179.999 && max < 180.0);
    }

    #[test]
    fn conversion_is_monotonic() {
        let samples = [i32::MIN, -(1 << 30), -1, 0, 1, 1 << 20, 1 << 30, i32::MAX];
        for pair in samples.windows(2) {
            assert!(semicircles_to_degrees(pair[0]) < semicircles_to_degrees(pair[1]));
        }
    }
}
