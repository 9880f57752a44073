use log::error;
use snafu::Snafu;

pub use crate::errors::Error::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Runtime error: Are you sure your code runs inside a tokio runtime?
    RuntimeError,
    /// Hardware error: {source}.
    HardwareError { source: HardwareError },
    /// Sensor error: {source}.
    SensorError { source: SensorError },
    /// Config error: {source}.
    ConfigError { source: ConfigError },
    /// Unknown error: {info}.
    Unknown { info: String },
}

impl From<HardwareError> for Error {
    fn from(value: HardwareError) -> Self {
        Self::HardwareError { source: value }
    }
}

impl From<SensorError> for Error {
    fn from(value: SensorError) -> Self {
        Self::SensorError { source: value }
    }
}

impl From<ConfigError> for Error {
    fn from(value: ConfigError) -> Self {
        Self::ConfigError { source: value }
    }
}

#[cfg(feature = "rpi")]
impl From<rppal::gpio::Error> for Error {
    fn from(error: rppal::gpio::Error) -> Self {
        error!("rppal gpio error {:?}", error);
        Self::HardwareError {
            source: HardwareError::GpioException {
                info: error.to_string(),
            },
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        error!("std::io error {:?}", error);
        Self::Unknown {
            info: error.to_string(),
        }
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum HardwareError {
    /// {info}
    GpioException { info: String },
    /// PWM output has not been started
    PwmNotStarted,
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SensorError {
    /// {info}
    DriverException { info: String },
    /// Buffer '{name}' too short - expected {expected} values, {received} received
    BufferTooShort {
        name: &'static str,
        expected: usize,
        received: usize,
    },
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConfigError {
    /// Invalid {name} ({value}) - {context}
    InvalidSetting {
        name: &'static str,
        value: String,
        context: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use std::io;

    use crate::errors::ConfigError::InvalidSetting;
    use crate::errors::HardwareError::{GpioException, PwmNotStarted};
    use crate::errors::SensorError::{BufferTooShort, DriverException};

    use super::*;

    #[test]
    fn test_error_display() {
        let runtime_error = RuntimeError;
        assert_eq!(
            format!("{}", runtime_error),
            "Runtime error: Are you sure your code runs inside a tokio runtime?"
        );

        let hardware_error = Error::from(GpioException {
            info: "GPIO error message".to_string(),
        });
        assert_eq!(
            format!("{}", hardware_error),
            "Hardware error: GPIO error message."
        );

        let sensor_error = Error::from(BufferTooShort {
            name: "distance_mm",
            expected: 64,
            received: 16,
        });
        assert_eq!(
            format!("{}", sensor_error),
            "Sensor error: Buffer 'distance_mm' too short - expected 64 values, 16 received."
        );

        let config_error = Error::from(InvalidSetting {
            name: "frequency",
            value: "61".to_string(),
            context: "must be within 1-60Hz for a 4x4 resolution",
        });
        assert_eq!(
            format!("{}", config_error),
            "Config error: Invalid frequency (61) - must be within 1-60Hz for a 4x4 resolution."
        );

        let unknown_error = Unknown {
            info: "Some unknown error".to_string(),
        };
        assert_eq!(
            format!("{}", unknown_error),
            "Unknown error: Some unknown error."
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "i2c bus not found");
        let error: Error = io_error.into();
        assert_eq!(format!("{}", error), "Unknown error: i2c bus not found.");
    }

    #[test]
    fn test_from_hardware_error() {
        let error: Error = PwmNotStarted.into();
        assert_eq!(
            format!("{}", error),
            "Hardware error: PWM output has not been started."
        );
    }

    #[test]
    fn test_from_sensor_error() {
        let error: Error = DriverException {
            info: "no ack from device".to_string(),
        }
        .into();
        assert_eq!(format!("{}", error), "Sensor error: no ack from device.");
    }
}
