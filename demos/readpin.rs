// Copyright (c) 2018 The rust-gpio-cdev Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Sample a pin a number of times and print the levels seen

use gpio_sysfs::{GpioDev, Mode, PinTable, Sysfs};
use quicli::prelude::*;
use std::thread::sleep;
use std::time::Duration;
use structopt::StructOpt;

static GPIO: GpioDev = GpioDev::new();

#[derive(Debug, StructOpt)]
struct Cli {
    /// Physical header pin on a Raspberry Pi 40-pin header
    pin: usize,
    /// Number of samples to take
    #[structopt(short, long, default_value = "10")]
    count: usize,
    /// Interval between samples in milliseconds
    #[structopt(short, long, default_value = "100")]
    interval_ms: u64,
}

fn do_main(args: &Cli) -> anyhow::Result<()> {
    GPIO.initialize(PinTable::raspberry_pi(), Sysfs::open()?)?;
    GPIO.set_mode(args.pin, Mode::Input)?;

    for sample in 0..args.count {
        let level = GPIO.read(args.pin)?;
        println!("{sample:>4}: {level:?}");
        sleep(Duration::from_millis(args.interval_ms));
    }
    Ok(())
}

fn main() -> CliResult {
    let args = Cli::from_args();
    let res = do_main(&args);

    for e in GPIO.destroy().failures() {
        warn!("{}", e);
    }
    res.or_else(|e| {
        error!("{:?}", e);
        Ok(())
    })
}
