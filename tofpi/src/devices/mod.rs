//! Defines the devices that can be attached to a Raspberry Pi.

pub use crate::devices::servo::{Servo, ServoRange, ServoType};
pub use crate::devices::tof::{SensorFrame, ToFSensor};

mod servo;
mod tof;
