use std::sync::Arc;

use parking_lot::RwLock;

use crate::errors::{Error, HardwareError};
use crate::io::PwmOutput;

/// Inner state of a [`MockPwm`]: shared between all its clones.
#[derive(Debug, Default)]
pub struct MockPwmData {
    pub running: bool,
    pub frequency: f64,
    pub duty_cycle: f64,
    /// Every duty cycle ever written, in order.
    pub history: Vec<f64>,
    pub failing: bool,
}

/// Mock implementation of [`PwmOutput`].
#[derive(Clone, Debug, Default)]
pub struct MockPwm {
    pub data: Arc<RwLock<MockPwmData>>,
}

impl MockPwm {
    pub fn is_running(&self) -> bool {
        self.data.read().running
    }

    pub fn duty_cycle(&self) -> f64 {
        self.data.read().duty_cycle
    }

    pub fn frequency(&self) -> f64 {
        self.data.read().frequency
    }

    pub fn history(&self) -> Vec<f64> {
        self.data.read().history.clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.data.write().failing = failing;
    }
}

impl PwmOutput for MockPwm {
    fn set_pwm(&mut self, frequency: f64, duty_cycle: f64) -> Result<(), Error> {
        let mut data = self.data.write();
        if data.failing {
            return Err(HardwareError::GpioException {
                info: "mock pwm failure".to_string(),
            }
            .into());
        }
        data.running = true;
        data.frequency = frequency;
        data.duty_cycle = duty_cycle;
        data.history.push(duty_cycle);
        Ok(())
    }

    fn clear_pwm(&mut self) -> Result<(), Error> {
        let mut data = self.data.write();
        if !data.running {
            return Err(HardwareError::PwmNotStarted.into());
        }
        data.running = false;
        Ok(())
    }
}
