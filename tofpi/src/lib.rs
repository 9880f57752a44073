#![doc(html_root_url = "https://docs.rs/tofpi/0.1.0")]

//! <h1 align="center">TOFPI - Depth sensing and servo control for the Raspberry Pi</h1>
//!
//! # Features
//!
//! **tofpi** is a small Rust library gluing a Raspberry Pi to two kinds of hardware:
//!
//! - a multizone time-of-flight sensor (VL53L5CX or compatible): a [`ToFSensor`](devices::ToFSensor)
//!   polls the sensor in the background and hands out the latest reading as a
//!   [`SensorFrame`](devices::SensorFrame) of 4x4 or 8x8 grids (distance, reflectance, status, noise);
//! - servos and brushless motors: a [`Servo`](devices::Servo) turns a 0-100 position into the
//!   matching PWM duty cycle.
//!
//! The hardware itself is reached through two traits: [`RangingDriver`](io::RangingDriver) (the
//! vendor sensor driver) and [`PwmOutput`](io::PwmOutput) (implemented by [`RpiPwm`](io::RpiPwm)
//! over the Raspberry Pi GPIO).
//!
//! # Getting Started
//!
//! The following code moves a servo plugged on BCM GPIO 17 to its middle position.
//! ```no_run
//! use tofpi::devices::Servo;
//! use tofpi::io::RpiPwm;
//!
//! fn main() -> Result<(), tofpi::errors::Error> {
//!     let mut servo = Servo::new(RpiPwm::new(17)?, Servo::DEFAULT_FREQUENCY)?;
//!     servo.to(50.0)?;
//!     servo.stop()
//! }
//! ```
//!
//! Reading the ToF sensor requires a tokio runtime for the polling task:
//! ```ignore
//! use tofpi::devices::ToFSensor;
//! use tofpi::io::Resolution;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tofpi::errors::Error> {
//!     let sensor = ToFSensor::new(MyVl53l5cxDriver::new()?, Resolution::X8)?
//!         .set_frequency(15)?
//!         .set_sharpener(5)?;
//!     sensor.start()?;
//!
//!     loop {
//!         if sensor.update_data() {
//!             println!("{}", sensor.get_current_data().unwrap());
//!         }
//!         tofpi::pause!(100);
//!     }
//! }
//! ```
//!
//! # Feature flags
//!
//! - **rpi** -- (enabled by default) Provides [`RpiPwm`](io::RpiPwm) through the `rppal` crate.
//! - **serde** -- Enables serialize/deserialize capabilities for configuration types.
//! - **mocks** -- Provides mocked hardware (useful for tests and simulations mostly).

pub mod devices;
pub mod errors;
pub mod io;
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
pub mod utils;
