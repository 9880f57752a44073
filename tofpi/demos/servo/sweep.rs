//! Sweeps a servo plugged on BCM GPIO 17 from its minimum to its maximum position and back.

use tofpi::devices::Servo;
use tofpi::errors::Error;
use tofpi::io::RpiPwm;
use tofpi::pause_sync;

fn main() -> Result<(), Error> {
    env_logger::init();

    let mut servo = Servo::new(RpiPwm::new(17)?, Servo::DEFAULT_FREQUENCY)?;
    println!("{}", servo);

    for angle in (0..=100).step_by(10).chain((0..100).step_by(10).rev()) {
        servo.to(angle as f64)?;
        pause_sync!(200);
    }

    servo.to(50.0)?;
    pause_sync!(500);
    servo.stop()
}
