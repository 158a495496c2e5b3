// Copyright (c) 2018 The rust-gpio-cdev Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use gpio_sysfs::{Gpio, Level, Mode, PinTable, SysfsOptions};
use quicli::prelude::*;
use std::path::PathBuf;
use std::thread::sleep;
use std::time::{Duration, Instant};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
struct Cli {
    /// Physical header pin on a Raspberry Pi 40-pin header
    pin: usize,
    /// Period in milliseconds
    period_ms: u64,
    /// Duration over which to blink in milliseconds
    duration_ms: u64,
    /// The sysfs GPIO class directory
    #[structopt(long, default_value = "/sys/class/gpio", parse(from_os_str))]
    root: PathBuf,
}

fn do_main(args: Cli) -> anyhow::Result<()> {
    let sysfs = SysfsOptions::new().with_root(args.root).open()?;
    let gpio = Gpio::initialize(PinTable::raspberry_pi(), sysfs)?;

    gpio.set_mode(args.pin, Mode::Output)?;

    let mut level = Level::Low;
    let period = Duration::from_millis(args.period_ms);
    let duration = Duration::from_millis(args.duration_ms);
    let start_time = Instant::now();
    while start_time.elapsed() < duration {
        level = !level;
        gpio.write(args.pin, level)?;
        sleep(period);
    }
    gpio.write(args.pin, Level::Low)?;

    let teardown = gpio.destroy();
    if !teardown.is_clean() {
        anyhow::bail!("{} pin(s) could not be released", teardown.failures().len());
    }
    Ok(())
}

fn main() -> CliResult {
    let args = Cli::from_args();
    do_main(args).or_else(|e| {
        error!("{:?}", e);
        Ok(())
    })
}
