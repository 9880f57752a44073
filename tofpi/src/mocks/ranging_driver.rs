use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;

use crate::errors::{Error, SensorError};
use crate::io::{RangingDriver, RawFrame, Resolution};

/// Inner state of a [`MockRangingDriver`]: shared between all its clones.
#[derive(Debug, Default)]
pub struct MockRangingData {
    pub resolution: Resolution,
    pub frequency: u8,
    pub sharpener: u8,
    pub ranging: bool,
    /// Frames waiting to be read (oldest first).
    pub pending: VecDeque<RawFrame>,
    /// Number of frames read so far.
    pub reads: usize,
    /// Makes every driver call fail when set.
    pub failing: bool,
    /// Generates frames at the configured frequency instead of using `pending`.
    pub simulated: bool,
    pub last_frame: Option<Instant>,
}

/// Mock implementation of [`RangingDriver`].
///
/// Clones share the same inner data, so a test can keep a clone to inspect what the device did
/// with the driver.
#[derive(Clone, Debug, Default)]
pub struct MockRangingDriver {
    pub data: Arc<RwLock<MockRangingData>>,
}

impl MockRangingDriver {
    /// A driver that produces a new synthetic frame every `1 / frequency` seconds while ranging.
    pub fn simulated() -> Self {
        let driver = Self::default();
        driver.data.write().simulated = true;
        driver
    }

    /// Queues a frame to be served by the next `get_ranging_data()`.
    pub fn push_frame(&self, frame: RawFrame) {
        self.data.write().pending.push_back(frame);
    }

    /// Builds a frame where each zone holds `offset + zone index` (distance) for the resolution.
    pub fn ramp_frame(resolution: Resolution, offset: i16) -> RawFrame {
        let zones = resolution.zones();
        RawFrame {
            distance_mm: (0..zones).map(|zone| offset + zone as i16).collect(),
            reflectance: (0..zones).map(|zone| (zone % 100) as u8).collect(),
            target_status: vec![5; zones],
            range_sigma_mm: (0..zones).map(|zone| (zone / 4) as u16).collect(),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.data.write().failing = failing;
    }

    pub fn is_ranging(&self) -> bool {
        self.data.read().ranging
    }

    pub fn reads(&self) -> usize {
        self.data.read().reads
    }

    fn check(&self) -> Result<(), Error> {
        match self.data.read().failing {
            true => Err(SensorError::DriverException {
                info: "mock driver failure".to_string(),
            }
            .into()),
            false => Ok(()),
        }
    }
}

impl RangingDriver for MockRangingDriver {
    fn set_resolution(&mut self, resolution: Resolution) -> Result<(), Error> {
        self.check()?;
        self.data.write().resolution = resolution;
        Ok(())
    }

    fn set_ranging_frequency_hz(&mut self, frequency: u8) -> Result<(), Error> {
        self.check()?;
        self.data.write().frequency = frequency;
        Ok(())
    }

    fn set_sharpener_percent(&mut self, sharpener: u8) -> Result<(), Error> {
        self.check()?;
        self.data.write().sharpener = sharpener;
        Ok(())
    }

    fn start_ranging(&mut self) -> Result<(), Error> {
        self.check()?;
        self.data.write().ranging = true;
        Ok(())
    }

    fn stop_ranging(&mut self) -> Result<(), Error> {
        self.check()?;
        self.data.write().ranging = false;
        Ok(())
    }

    fn is_data_ready(&mut self) -> Result<bool, Error> {
        self.check()?;
        let data = self.data.read();
        if !data.ranging {
            return Ok(false);
        }
        match data.simulated {
            true => {
                let period = 1000 / u128::from(data.frequency.max(1));
                Ok(data
                    .last_frame
                    .map_or(true, |last| last.elapsed().as_millis() >= period))
            }
            false => Ok(!data.pending.is_empty()),
        }
    }

    fn get_ranging_data(&mut self) -> Result<RawFrame, Error> {
        self.check()?;
        let mut data = self.data.write();
        let frame = match data.simulated {
            true => {
                data.last_frame = Some(Instant::now());
                Self::ramp_frame(data.resolution, (data.reads % 1000) as i16 * 10)
            }
            false => data.pending.pop_front().ok_or(SensorError::DriverException {
                info: "no frame available".to_string(),
            })?,
        };
        data.reads += 1;
        Ok(frame)
    }
}
