use std::fmt::{Display, Formatter};
use std::sync::Arc;

use log::{debug, error, trace};
use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;

use crate::errors::{ConfigError, Error};
use crate::io::{RangingDriver, RawFrame, Resolution};
use crate::pause;
use crate::utils::{task, Grid, TaskHandler};

type SharedDriver = Arc<Mutex<Box<dyn RangingDriver>>>;
type FrameSlot = Option<Arc<SensorFrame>>;

/// One full reading of the sensor, reshaped into grids of `resolution.side()` rows.
///
/// Row 0 is the top of the field of view. A frame is never modified: the sensor publishes a new
/// one on every reading.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorFrame {
    resolution: Resolution,
    /// Distance per zone in mm.
    distance: Grid,
    /// Reflectance per zone in percent.
    reflectance: Grid,
    /// Target status per zone (5 and 9 mean a valid measurement).
    status: Grid,
    /// Estimated range noise (sigma) per zone in mm.
    noise: Grid,
}

impl SensorFrame {
    /// Reshapes a raw driver frame into grids.
    ///
    /// # Errors
    /// * `BufferTooShort`: one of the raw buffers has fewer values than the resolution has zones.
    pub fn from_raw(raw: &RawFrame, resolution: Resolution) -> Result<Self, Error> {
        Ok(Self {
            resolution,
            distance: Grid::from_flat("distance_mm", &raw.distance_mm, resolution)?,
            reflectance: Grid::from_flat("reflectance", &raw.reflectance, resolution)?,
            status: Grid::from_flat("target_status", &raw.target_status, resolution)?,
            noise: Grid::from_flat("range_sigma_mm", &raw.range_sigma_mm, resolution)?,
        })
    }

    pub fn get_resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn distance(&self) -> &Grid {
        &self.distance
    }

    pub fn reflectance(&self) -> &Grid {
        &self.reflectance
    }

    pub fn status(&self) -> &Grid {
        &self.status
    }

    pub fn noise(&self) -> &Grid {
        &self.noise
    }
}

impl Display for SensorFrame {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "FRAME ({})", self.resolution)?;
        writeln!(f, "distance (mm):\n{}", self.distance)?;
        writeln!(f, "reflectance (%):\n{}", self.reflectance)?;
        writeln!(f, "status:\n{}", self.status)?;
        write!(f, "noise (mm):\n{}", self.noise)
    }
}

/// Represents a multizone time-of-flight sensor (VL53L5CX or compatible) read in the background.
///
/// Once started, a polling task waits for the driver to signal a new frame, reads it, reshapes it
/// into a [`SensorFrame`] and publishes it into a single slot: only the latest frame is kept.
/// The user side picks it up with [`Self::update_data`].
///
/// Clones share the driver, the polling task, the ranging state and the frames. Settings
/// (frequency, sharpener, poll interval) belong to each handle: they reach the driver when that
/// handle calls [`Self::start`].
#[derive(Clone, Debug)]
pub struct ToFSensor {
    // ########################################
    // # Settings
    /// Number of zones per row/column: fixed at creation.
    resolution: Resolution,
    /// Frames per second (default: 15Hz).
    frequency: u8,
    /// Sharpener in percent (default: 5%).
    sharpener: u8,
    /// Delay in ms between two "data ready" checks (default: 5ms).
    poll_interval: u64,

    // ########################################
    // # Volatile utility data.
    driver: SharedDriver,
    ranging: Arc<RwLock<bool>>,
    /// Writing side of the frame slot: only the polling task publishes.
    frames: Arc<watch::Sender<FrameSlot>>,
    /// Reading side of the frame slot: remembers the last frame consumed.
    receiver: Arc<Mutex<watch::Receiver<FrameSlot>>>,
    /// Frame picked by the last successful `update_data()`.
    current: Arc<RwLock<FrameSlot>>,
    /// Inner handler to the polling task.
    handler: Arc<RwLock<Option<TaskHandler>>>,
}

impl ToFSensor {
    pub const DEFAULT_FREQUENCY: u8 = 15;
    pub const DEFAULT_SHARPENER: u8 = 5;
    pub const DEFAULT_POLL_INTERVAL: u64 = 5;

    /// Creates a ToF sensor over the given driver and sets its resolution.
    ///
    /// # Errors
    /// * any error the driver raises while setting the resolution.
    pub fn new<D: RangingDriver + 'static>(driver: D, resolution: Resolution) -> Result<Self, Error> {
        let mut driver: Box<dyn RangingDriver> = Box::new(driver);
        driver.set_resolution(resolution)?;

        let (sender, receiver) = watch::channel(None);
        Ok(Self {
            resolution,
            frequency: Self::DEFAULT_FREQUENCY.min(resolution.max_frequency_hz()),
            sharpener: Self::DEFAULT_SHARPENER,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            driver: Arc::new(Mutex::new(driver)),
            ranging: Arc::new(RwLock::new(false)),
            frames: Arc::new(sender),
            receiver: Arc::new(Mutex::new(receiver)),
            current: Arc::new(RwLock::new(None)),
            handler: Arc::new(RwLock::new(None)),
        })
    }

    /// Configures the driver (frequency, sharpener), starts ranging and starts the polling task.
    ///
    /// Can be called again after [`Self::pause`] to apply new frequency or sharpener settings.
    /// Calling it while already polling only re-applies the settings.
    ///
    /// # Errors
    /// * `RuntimeError`: not called from within a tokio runtime.
    /// * any error the driver raises during configuration.
    pub fn start(&self) -> Result<(), Error> {
        {
            let mut driver = self.driver.lock();
            driver.set_ranging_frequency_hz(self.frequency)?;
            driver.set_sharpener_percent(self.sharpener)?;
            let mut ranging = self.ranging.write();
            if !*ranging {
                driver.start_ranging()?;
                *ranging = true;
            }
        }

        if self.is_polling() {
            return Ok(());
        }

        let driver = self.driver.clone();
        let frames = self.frames.clone();
        let resolution = self.resolution;
        let poll_interval = self.poll_interval;
        let handler = task::run(async move {
            let result = poll(driver, frames, resolution, poll_interval).await;
            if let Err(err) = &result {
                error!("ToF polling stopped: {}", err);
            }
            result
        })?;
        *self.handler.write() = Some(handler);

        trace!("ToF started: {}", self);
        Ok(())
    }

    /// Halts the polling task but keeps the sensor ranging: [`Self::start`] resumes.
    pub fn pause(&self) {
        if let Some(handler) = self.handler.write().take() {
            handler.abort();
            trace!("ToF polling paused");
        }
    }

    /// Halts the polling task and stops ranging.
    ///
    /// # Errors
    /// * any error the driver raises while stopping.
    pub fn stop(&self) -> Result<(), Error> {
        self.pause();
        let mut driver = self.driver.lock();
        let mut ranging = self.ranging.write();
        if *ranging {
            driver.stop_ranging()?;
            *ranging = false;
            trace!("ToF ranging stopped");
        }
        Ok(())
    }

    /// Makes the latest published frame the current one.
    ///
    /// Returns `true` if a frame newer than the current one was available, `false` otherwise (the
    /// current frame is then left untouched).
    pub fn update_data(&self) -> bool {
        let mut receiver = self.receiver.lock();
        if !receiver.has_changed().unwrap_or(false) {
            return false;
        }
        let frame = receiver.borrow_and_update().clone();
        match frame {
            Some(frame) => {
                *self.current.write() = Some(frame);
                true
            }
            None => false,
        }
    }

    /// Returns the frame picked by the last successful [`Self::update_data`], if any.
    pub fn get_current_data(&self) -> Option<Arc<SensorFrame>> {
        self.current.read().clone()
    }

    /// Checks if a frame newer than the current one has been published.
    pub fn has_new_data(&self) -> bool {
        self.receiver.lock().has_changed().unwrap_or(false)
    }

    /// Checks if the polling task is running.
    pub fn is_polling(&self) -> bool {
        self.handler
            .read()
            .as_ref()
            .is_some_and(|handler| !handler.is_finished())
    }

    /// Checks if the sensor is ranging.
    pub fn is_ranging(&self) -> bool {
        *self.ranging.read()
    }

    // ########################################
    // Setters and Getters.

    /// Returns the sensor resolution.
    pub fn get_resolution(&self) -> Resolution {
        self.resolution
    }

    /// Returns the ranging frequency in Hz.
    pub fn get_frequency(&self) -> u8 {
        self.frequency
    }

    /// Sets the ranging frequency in Hz: applied on next [`Self::start`].
    ///
    /// # Errors
    /// * `InvalidSetting`: the frequency is 0 or above the resolution maximum (60Hz in 4x4, 15Hz
    ///   in 8x8).
    pub fn set_frequency(mut self, frequency: u8) -> Result<Self, Error> {
        let max = self.resolution.max_frequency_hz();
        if !(1..=max).contains(&frequency) {
            return Err(ConfigError::InvalidSetting {
                name: "frequency",
                value: format!("{}Hz", frequency),
                context: match self.resolution {
                    Resolution::X4 => "must be within 1-60Hz for a 4x4 resolution",
                    Resolution::X8 => "must be within 1-15Hz for an 8x8 resolution",
                },
            }
            .into());
        }
        self.frequency = frequency;
        Ok(self)
    }

    /// Returns the sharpener in percent.
    pub fn get_sharpener(&self) -> u8 {
        self.sharpener
    }

    /// Sets the sharpener in percent: applied on next [`Self::start`].
    ///
    /// # Errors
    /// * `InvalidSetting`: the sharpener is above 100%.
    pub fn set_sharpener(mut self, sharpener: u8) -> Result<Self, Error> {
        if sharpener > 100 {
            return Err(ConfigError::InvalidSetting {
                name: "sharpener",
                value: format!("{}%", sharpener),
                context: "must be within 0-100%",
            }
            .into());
        }
        self.sharpener = sharpener;
        Ok(self)
    }

    /// Returns the delay (in ms) between two "data ready" checks.
    pub fn get_poll_interval(&self) -> u64 {
        self.poll_interval
    }

    /// Sets the delay (in ms) between two "data ready" checks: applied on next [`Self::start`]
    /// when not polling.
    pub fn set_poll_interval(mut self, poll_interval: u64) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

impl Display for ToFSensor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ToF (resolution={}) [frequency={}Hz, sharpener={}%, polling={}]",
            self.resolution,
            self.frequency,
            self.sharpener,
            self.is_polling()
        )
    }
}

/// Polling loop: runs until aborted or until the driver fails.
async fn poll(
    driver: SharedDriver,
    frames: Arc<watch::Sender<FrameSlot>>,
    resolution: Resolution,
    poll_interval: u64,
) -> Result<(), Error> {
    loop {
        // The driver lock must be released before pausing.
        let raw = {
            let mut driver = driver.lock();
            match driver.is_data_ready()? {
                true => Some(driver.get_ranging_data()?),
                false => None,
            }
        };

        if let Some(raw) = raw {
            let frame = SensorFrame::from_raw(&raw, resolution)?;
            debug!("ToF frame received ({})", resolution);
            frames.send_replace(Some(Arc::new(frame)));
        }

        pause!(poll_interval);
    }
}
