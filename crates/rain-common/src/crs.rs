//! Coordinate reference system identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A coordinate reference system identified by EPSG code.
///
/// The pipeline works exclusively in geographic WGS84 coordinates; other
/// codes are carried through untouched for raster metadata round-trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crs {
    pub epsg: u32,
}

impl Crs {
    /// Geographic WGS84 (EPSG:4326).
    pub fn wgs84() -> Self {
        Self { epsg: 4326 }
    }

    /// PROJ4 definition string for this CRS.
    ///
    /// Only WGS84 has a concrete definition here; other codes fall back to
    /// an EPSG init string.
    pub fn proj4_string(&self) -> String {
        match self.epsg {
            4326 => "+proj=longlat +datum=WGS84 +no_defs".to_string(),
            code => format!("+init=epsg:{}", code),
        }
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg)
    }
}
