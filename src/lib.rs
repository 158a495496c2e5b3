// Copyright (c) 2018 The rust-gpio-cdev Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `gpio-sysfs` crate provides cached access to GPIOs through the legacy
//! [sysfs GPIO interface](https://www.kernel.org/doc/Documentation/gpio/sysfs.txt)
//! (`/sys/class/gpio`).
//!
//! Control loops that toggle or sample pins at a high rate should not pay
//! for building paths, opening files and permission checks on every access.
//! This crate exports every usable GPIO once, keeps its `direction` and
//! `value` attributes open, and performs each access as a single read or
//! write on the cached descriptor.
//!
//! Pins are addressed by a logical index into a [`PinTable`], which maps the
//! index to the kernel GPIO number. A table for the Raspberry Pi 40-pin
//! header, indexed by physical pin, is provided.
//!
//! # Examples
//!
//! Mirror the state of header pin 11 onto header pin 13 on a Raspberry Pi:
//!
//! ```no_run
//! use gpio_sysfs::{Gpio, Mode, PinTable, Sysfs};
//!
//! fn mirror(input: usize, output: usize) -> Result<(), Box<dyn std::error::Error>> {
//!     let gpio = Gpio::initialize(PinTable::raspberry_pi(), Sysfs::open()?)?;
//!
//!     gpio.set_mode(input, Mode::Input)?;
//!     gpio.set_mode(output, Mode::Output)?;
//!     for _ in 0..1000 {
//!         gpio.write(output, gpio.read(input)?)?;
//!     }
//!
//!     for err in gpio.destroy().failures() {
//!         eprintln!("{err}");
//!     }
//!     Ok(())
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! #     mirror(11, 13)
//! # }
//! ```
//!
//! Pins without a controllable GPIO behind them, such as power and ground,
//! are rejected without any OS access:
//!
//! ```no_run
//! use gpio_sysfs::{ErrorKind, Gpio, Level, PinTable, Sysfs};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let gpio = Gpio::initialize(PinTable::raspberry_pi(), Sysfs::open()?)?;
//! let err = gpio.write(6, Level::High).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Configuration);
//! # Ok(()) }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

mod errors;

pub mod backend;

pub mod dev;

pub mod gpio;

pub mod pin;

pub mod status;

pub mod sysfs;

pub mod table;

#[cfg(test)]
mod mock;

pub use dev::GpioDev;
pub use errors::{Error, ErrorKind, Operation, OsFailure};
pub use gpio::{Gpio, Teardown};
pub use pin::{Level, Mode};
pub use sysfs::{Sysfs, SysfsOptions};
pub use table::PinTable;
