use std::fmt::{Display, Formatter};
use std::sync::Arc;

use log::trace;
use parking_lot::{Mutex, RwLock};

use crate::errors::{ConfigError, Error};
use crate::io::PwmOutput;
use crate::utils::{Range, Scalable};

/// The kind of device driven: both are commanded the same way, only their pulse widths differ.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServoType {
    /// Hobby servo: 0.5ms to 2.5ms pulses.
    #[default]
    Standard,
    /// Brushless motor through an ESC: 1ms to 2ms pulses.
    Brushless,
}

impl ServoType {
    /// Recommended pulse width range (in ms) for this kind of device.
    pub fn pulse_range(&self) -> Range<f64> {
        match self {
            ServoType::Standard => Range::from([0.5, 2.5]),
            ServoType::Brushless => Range::from([1.0, 2.0]),
        }
    }
}

/// The duty cycles (in percent) matching the minimum and maximum pulse widths of a servo at a
/// given refresh frequency.
///
/// Always holds `0 <= min <= max <= 100`.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ServoRange {
    min: f64,
    max: f64,
}

impl ServoRange {
    /// Creates a range from its duty cycles (in percent).
    ///
    /// # Errors
    /// * `InvalidSetting`: the bounds are reversed or outside 0-100 (NaN included).
    pub fn new(min: f64, max: f64) -> Result<Self, Error> {
        if !(0.0 <= min && min <= max && max <= 100.0) {
            return Err(ConfigError::InvalidSetting {
                name: "duty range",
                value: format!("{}-{}%", min, max),
                context: "must be ordered and within 0-100%",
            }
            .into());
        }
        Ok(Self { min, max })
    }

    /// Computes the duty cycle range from the pulse widths (in ms) and the refresh frequency (in Hz).
    ///
    /// # Errors
    /// * `InvalidSetting`: the frequency is not strictly positive, the pulse range is reversed or
    ///   negative, or the longest pulse does not fit in one period.
    pub fn from_pulse(frequency: f64, pulse_range: Range<f64>) -> Result<Self, Error> {
        if !(frequency.is_finite() && frequency > 0.0) {
            return Err(ConfigError::InvalidSetting {
                name: "frequency",
                value: format!("{}Hz", frequency),
                context: "must be strictly positive",
            }
            .into());
        }

        let period = 1000.0 / frequency;
        let Range { start, end } = pulse_range;
        if !(0.0 <= start && start <= end && end <= period) {
            return Err(ConfigError::InvalidSetting {
                name: "pulse range",
                value: format!("{}-{}ms", start, end),
                context: "must be ordered and fit within one PWM period",
            }
            .into());
        }

        Self::new(start / period * 100.0, end / period * 100.0)
    }

    /// Duty cycle (in percent) of the minimum position.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Duty cycle (in percent) of the maximum position.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Maps a position (percent of the servo course) to its duty cycle.
    ///
    /// The position is clamped into 0-100 first; NaN counts as 0.
    pub fn duty_cycle(&self, angle: f64) -> f64 {
        clamp_angle(angle).scale(0.0, 100.0, self.min, self.max)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ServoRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct Bounds {
            min: f64,
            max: f64,
        }

        let bounds = <Bounds as serde::Deserialize>::deserialize(deserializer)?;
        ServoRange::new(bounds.min, bounds.max).map_err(serde::de::Error::custom)
    }
}

fn clamp_angle(angle: f64) -> f64 {
    match angle.is_nan() {
        true => 0.0,
        false => angle.clamp(0.0, 100.0),
    }
}

/// Represents a servo (or a brushless motor ESC) driven by a PWM output.
///
/// Positions are given in percent of the servo course: 0 is the minimum angle, 100 the maximum.
#[derive(Clone, Debug)]
pub struct Servo {
    // ########################################
    // # Settings
    /// The servo type (default: ServoType::Standard).
    servo_type: ServoType,
    /// The PWM refresh frequency in Hz (default: 50Hz).
    frequency: f64,
    /// The pulse widths in ms matching the 0 and 100 positions.
    pulse_range: Range<f64>,
    /// Duty cycles derived from `pulse_range` and `frequency`.
    duty_range: ServoRange,

    // ########################################
    // # Volatile utility data.
    /// Last position requested (after clamping).
    state: Arc<RwLock<Option<f64>>>,
    output: Arc<Mutex<Box<dyn PwmOutput>>>,
    running: Arc<RwLock<bool>>,
}

impl Servo {
    pub const DEFAULT_FREQUENCY: f64 = 50.0;

    /// Creates a standard servo (0.5ms-2.5ms pulses) refreshed at `frequency` Hz.
    ///
    /// The PWM signal only starts with the first move.
    ///
    /// # Errors
    /// * `InvalidSetting`: the frequency is too high for the pulse widths (or not positive).
    pub fn new<O: PwmOutput + 'static>(output: O, frequency: f64) -> Result<Self, Error> {
        Self::create(output, frequency, ServoType::Standard)
    }

    /// Creates a brushless motor (1ms-2ms pulses) refreshed at `frequency` Hz.
    ///
    /// # Errors
    /// * `InvalidSetting`: the frequency is too high for the pulse widths (or not positive).
    pub fn new_brushless<O: PwmOutput + 'static>(output: O, frequency: f64) -> Result<Self, Error> {
        Self::create(output, frequency, ServoType::Brushless)
    }

    /// Inner helper.
    fn create<O: PwmOutput + 'static>(
        output: O,
        frequency: f64,
        servo_type: ServoType,
    ) -> Result<Self, Error> {
        let pulse_range = servo_type.pulse_range();
        let duty_range = ServoRange::from_pulse(frequency, pulse_range)?;
        Ok(Self {
            servo_type,
            frequency,
            pulse_range,
            duty_range,
            state: Arc::new(RwLock::new(None)),
            output: Arc::new(Mutex::new(Box::new(output))),
            running: Arc::new(RwLock::new(false)),
        })
    }

    /// Moves the servo to the requested position (percent of its course, clamped into 0-100).
    ///
    /// # Errors
    /// * any error the PWM output raises.
    pub fn to(&mut self, angle: f64) -> Result<&Self, Error> {
        let angle = clamp_angle(angle);
        let duty_cycle = self.duty_range.duty_cycle(angle);

        self.output.lock().set_pwm(self.frequency, duty_cycle)?;
        *self.running.write() = true;
        *self.state.write() = Some(angle);

        trace!("Servo moved to {} (duty cycle {:.2}%)", angle, duty_cycle);
        Ok(self)
    }

    /// Stops the PWM signal: the servo is released. A later move starts it again.
    ///
    /// # Errors
    /// * any error the PWM output raises.
    pub fn stop(&mut self) -> Result<(), Error> {
        let mut running = self.running.write();
        if *running {
            self.output.lock().clear_pwm()?;
            *running = false;
            trace!("Servo stopped");
        }
        Ok(())
    }

    // ########################################
    // Setters and Getters.

    /// Returns the servo type.
    pub fn get_type(&self) -> ServoType {
        self.servo_type
    }

    /// Returns the PWM refresh frequency in Hz.
    pub fn get_frequency(&self) -> f64 {
        self.frequency
    }

    /// Returns the pulse widths (in ms) matching the 0 and 100 positions.
    pub fn get_pulse_range(&self) -> Range<f64> {
        self.pulse_range
    }

    /// Sets the pulse widths (in ms) matching the 0 and 100 positions, for servos that do not
    /// follow the recommended values of their type. Applies from the next move.
    ///
    /// # Errors
    /// * `InvalidSetting`: the range is reversed, negative or longer than one PWM period.
    pub fn set_pulse_range<R: Into<Range<f64>>>(mut self, pulse_range: R) -> Result<Self, Error> {
        let pulse_range = pulse_range.into();
        self.duty_range = ServoRange::from_pulse(self.frequency, pulse_range)?;
        self.pulse_range = pulse_range;
        Ok(self)
    }

    /// Returns the duty cycle range derived from the pulse range and frequency.
    pub fn get_duty_range(&self) -> ServoRange {
        self.duty_range
    }

    /// Returns the last position requested, if the servo ever moved.
    pub fn get_state(&self) -> Option<f64> {
        *self.state.read()
    }

    /// Checks if the PWM signal is currently emitted.
    pub fn is_running(&self) -> bool {
        *self.running.read()
    }
}

impl Display for Servo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = match self.get_state() {
            Some(angle) => angle.to_string(),
            None => String::from("-"),
        };
        write!(
            f,
            "SERVO [state={}, duty={:.2}-{:.2}%, frequency={}Hz]",
            state,
            self.duty_range.min,
            self.duty_range.max,
            self.frequency
        )
    }
}
