//! Demonstrates the background polling of a ToF sensor: a new frame is only shown when asked.
//! Uses a simulated 8x8 sensor: swap the mock for your VL53L5CX driver on real hardware.

use std::io::{self, BufRead, Write};

use tofpi::devices::ToFSensor;
use tofpi::errors::Error;
use tofpi::io::Resolution;
use tofpi::mocks::MockRangingDriver;

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let sensor = ToFSensor::new(MockRangingDriver::simulated(), Resolution::X8)?
        .set_frequency(15)?
        .set_sharpener(5)?;
    sensor.start()?;
    println!("{}", sensor);

    let stdin = io::stdin();
    loop {
        match sensor.get_current_data() {
            Some(frame) => println!("{}", frame),
            None => println!("No data yet"),
        }

        print!("Print new data? y/n ");
        io::stdout().flush()?;
        let mut answer = String::new();
        stdin.lock().read_line(&mut answer)?;
        if answer.trim() != "y" {
            break;
        }
        if !sensor.update_data() {
            println!("No new frame since last time");
        }
    }

    sensor.stop()
}
