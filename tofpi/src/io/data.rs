use std::fmt::{Display, Formatter};

/// Number of zones (sub-sensors) per row and column of a multizone ToF sensor.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// 4x4 zones: ranging up to 60Hz.
    X4,
    /// 8x8 zones: ranging up to 15Hz.
    #[default]
    X8,
}

impl Resolution {
    /// Zones per row (and per column).
    pub fn side(&self) -> usize {
        match self {
            Resolution::X4 => 4,
            Resolution::X8 => 8,
        }
    }

    /// Total number of zones.
    pub fn zones(&self) -> usize {
        self.side() * self.side()
    }

    /// Highest ranging frequency the sensor supports at this resolution.
    pub fn max_frequency_hz(&self) -> u8 {
        match self {
            Resolution::X4 => 60,
            Resolution::X8 => 15,
        }
    }
}

impl Display for Resolution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.side(), self.side())
    }
}

/// One ranging result as the driver hands it out: flat buffers, one value per zone (and possibly
/// per target, in which case the buffers are longer than the zone count).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawFrame {
    /// Measured distance in mm.
    pub distance_mm: Vec<i16>,
    /// Estimated target reflectance in percent.
    pub reflectance: Vec<u8>,
    /// Measurement validity status, see the sensor datasheet.
    pub target_status: Vec<u8>,
    /// Estimated range noise (sigma) in mm.
    pub range_sigma_mm: Vec<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution() {
        assert_eq!(Resolution::default(), Resolution::X8);

        assert_eq!(Resolution::X4.side(), 4);
        assert_eq!(Resolution::X4.zones(), 16);
        assert_eq!(Resolution::X4.max_frequency_hz(), 60);
        assert_eq!(Resolution::X4.to_string(), "4x4");

        assert_eq!(Resolution::X8.side(), 8);
        assert_eq!(Resolution::X8.zones(), 64);
        assert_eq!(Resolution::X8.max_frequency_hz(), 15);
        assert_eq!(Resolution::X8.to_string(), "8x8");
    }
}
