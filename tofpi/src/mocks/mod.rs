//! Mocked hardware: lets devices run without a Raspberry Pi (tests, simulations).

pub mod pwm;
pub mod ranging_driver;

pub use pwm::MockPwm;
pub use ranging_driver::MockRangingDriver;
