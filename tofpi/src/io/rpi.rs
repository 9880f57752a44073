use log::trace;
use rppal::gpio::{Gpio, OutputPin};

use crate::errors::Error;
use crate::io::PwmOutput;

/// Software PWM on a Raspberry Pi GPIO pin (any BCM pin, driven by `rppal`).
///
/// The pin is configured as an output when created. PWM is cleared and the pin released when
/// the value is dropped.
#[derive(Debug)]
pub struct RpiPwm {
    pin: OutputPin,
}

impl RpiPwm {
    /// Configures BCM `pin` as a low output ready to drive a PWM signal.
    ///
    /// # Errors
    /// * `GpioException`: the GPIO peripheral is not accessible or the pin is already in use.
    pub fn new(pin: u8) -> Result<Self, Error> {
        let pin = Gpio::new()?.get(pin)?.into_output_low();
        trace!("GPIO {} configured as output", pin.pin());
        Ok(Self { pin })
    }

    /// Returns the BCM pin number.
    pub fn get_pin(&self) -> u8 {
        self.pin.pin()
    }
}

impl PwmOutput for RpiPwm {
    fn set_pwm(&mut self, frequency: f64, duty_cycle: f64) -> Result<(), Error> {
        // rppal expects a fraction of the period.
        let fraction = (duty_cycle / 100.0).clamp(0.0, 1.0);
        self.pin.set_pwm_frequency(frequency, fraction)?;
        Ok(())
    }

    fn clear_pwm(&mut self) -> Result<(), Error> {
        self.pin.clear_pwm()?;
        self.pin.set_low();
        Ok(())
    }
}
