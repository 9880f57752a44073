//! Defines the hardware seams: the ranging sensor driver and the PWM output driver.

mod data;
#[cfg(feature = "rpi")]
mod rpi;

use std::fmt::Debug;

use crate::errors::Error;
pub use data::*;
#[cfg(feature = "rpi")]
pub use rpi::RpiPwm;

/// A multizone time-of-flight sensor driver (VL53L5CX or compatible).
///
/// Implementations wrap the vendor driver: they are expected to be blocking and cheap to poll.
pub trait RangingDriver: Debug + Send {
    /// Sets the number of zones used by the sensor.
    fn set_resolution(&mut self, resolution: Resolution) -> Result<(), Error>;

    /// Sets how many frames per second the sensor produces.
    fn set_ranging_frequency_hz(&mut self, frequency: u8) -> Result<(), Error>;

    /// Sets the sharpener (percent of signal removed around targets to reduce zone bleeding).
    fn set_sharpener_percent(&mut self, sharpener: u8) -> Result<(), Error>;

    /// Starts a ranging session.
    fn start_ranging(&mut self) -> Result<(), Error>;

    /// Stops the current ranging session.
    fn stop_ranging(&mut self) -> Result<(), Error>;

    /// Checks if a new frame is ready to be read.
    fn is_data_ready(&mut self) -> Result<bool, Error>;

    /// Reads the latest frame.
    fn get_ranging_data(&mut self) -> Result<RawFrame, Error>;
}

/// A PWM capable output pin.
pub trait PwmOutput: Debug + Send {
    /// Starts (or updates) the PWM signal.
    ///
    /// # Parameters
    /// * `frequency`: signal frequency in Hz
    /// * `duty_cycle`: percent of each period the signal is held high (0.0 to 100.0)
    fn set_pwm(&mut self, frequency: f64, duty_cycle: f64) -> Result<(), Error>;

    /// Stops the PWM signal: the pin is left low and free for other uses.
    fn clear_pwm(&mut self) -> Result<(), Error>;
}
