//! The pin cache: exported GPIOs with their attribute handles held open.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{
    backend::{Attribute, AttributeHandle, Backend},
    errors::{Error, Operation, Result},
    pin::{Level, Mode},
    table::PinTable,
};

/// Cached state of one exported pin
struct Slot<H> {
    gpio: u32,
    direction: H,
    value: H,
    mode: Option<Mode>,
    level: Option<Level>,
}

/// A set of exported GPIOs with their `direction` and `value` attributes
/// held open.
///
/// Every controllable pin of the [`PinTable`] is exported and opened by
/// [`Gpio::initialize`], and released again by [`Gpio::destroy`] or on drop.
/// Access operations only go through the cached handles.
///
/// Operations on different pins may run concurrently; operations on the
/// same pin are serialized.
pub struct Gpio<B: Backend> {
    backend: B,
    table: PinTable,
    pins: Vec<Option<Mutex<Slot<B::Handle>>>>,
}

impl<B: Backend> Gpio<B> {
    /// Export and open every controllable pin of `table`.
    ///
    /// If any pin fails, everything acquired so far is closed and unexported
    /// again before the error is returned.
    pub fn initialize(table: PinTable, backend: B) -> Result<Self> {
        let usable: Vec<_> = table.usable().collect();
        let mut this = Self {
            pins: std::iter::repeat_with(|| None).take(table.len()).collect(),
            backend,
            table,
        };

        for (pin, gpio) in usable {
            match this.acquire(gpio) {
                Ok(slot) => this.pins[pin] = Some(Mutex::new(slot)),
                Err(e) => {
                    log::error!("failed to acquire pin {pin}: {e}");
                    let _ = this.release();
                    return Err(e);
                }
            }
        }

        Ok(this)
    }

    fn acquire(&self, gpio: u32) -> Result<Slot<B::Handle>> {
        self.backend
            .export(gpio)
            .map_err(|e| Error::os(Operation::Export, gpio, e))?;
        log::debug!("exported GPIO {gpio}");

        let slot = self.open(gpio, Attribute::Direction).and_then(|direction| {
            let value = self.open(gpio, Attribute::Value)?;
            Ok(Slot {
                gpio,
                direction,
                value,
                mode: None,
                level: None,
            })
        });

        if slot.is_err() {
            if let Err(e) = self.backend.unexport(gpio) {
                log::warn!("failed to unexport GPIO {gpio} during rollback: {e}");
            }
        }

        slot
    }

    fn open(&self, gpio: u32, attr: Attribute) -> Result<B::Handle> {
        self.backend
            .open(gpio, attr)
            .map_err(|e| Error::os(Operation::Open(attr), gpio, e))
    }

    /// Close and unexport every acquired pin
    fn release(&mut self) -> Teardown {
        let mut failures = Vec::new();

        for slot in std::mem::take(&mut self.pins).into_iter().flatten() {
            let slot = slot.into_inner().unwrap_or_else(PoisonError::into_inner);
            let gpio = slot.gpio;
            drop(slot);

            match self.backend.unexport(gpio) {
                Ok(()) => log::debug!("unexported GPIO {gpio}"),
                Err(e) => failures.push(Error::os(Operation::Unexport, gpio, e)),
            }
        }

        let teardown = Teardown { failures };
        if !teardown.is_clean() {
            for e in teardown.failures() {
                log::warn!("{e}");
            }
            log::warn!(
                "GPIO teardown finished with {} failure(s)",
                teardown.failures().len()
            );
        }
        teardown
    }

    /// Close and unexport every pin.
    ///
    /// Cleanup is best effort: a failed unexport does not stop the remaining
    /// pins from being released, and is collected in the returned report.
    pub fn destroy(mut self) -> Teardown {
        self.release()
    }

    pub fn table(&self) -> &PinTable {
        &self.table
    }

    /// The kernel GPIO number behind a logical pin
    pub fn gpio_number(&self, pin: usize) -> Result<u32> {
        self.table.resolve(pin)
    }

    fn slot(&self, pin: usize) -> Result<MutexGuard<'_, Slot<B::Handle>>> {
        self.table.resolve(pin)?;
        let slot = self
            .pins
            .get(pin)
            .and_then(Option::as_ref)
            .ok_or(Error::NotControllable(pin))?;
        Ok(slot.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Set the direction of a pin.
    ///
    /// The cached level is forgotten whenever the OS-level direction
    /// changes.
    pub fn set_mode(&self, pin: usize, mode: Mode) -> Result<()> {
        let mut slot = self.slot(pin)?;
        let gpio = slot.gpio;

        slot.direction
            .store(mode.as_sysfs())
            .map_err(|e| Error::os(Operation::Store(Attribute::Direction), gpio, e))?;

        if slot.mode.map(Mode::is_output) != Some(mode.is_output()) {
            slot.level = None;
        }
        slot.mode = Some(mode);
        Ok(())
    }

    /// Drive a pin configured as [`Mode::Output`] or [`Mode::InOut`]
    pub fn write(&self, pin: usize, level: Level) -> Result<()> {
        let mut slot = self.slot(pin)?;

        match slot.mode {
            None => return Err(Error::ModeUnset(pin)),
            Some(Mode::Input) => return Err(Error::InputMode(pin)),
            Some(Mode::Output | Mode::InOut) => {}
        }

        let gpio = slot.gpio;
        slot.value
            .store(level.as_sysfs())
            .map_err(|e| Error::os(Operation::Store(Attribute::Value), gpio, e))?;
        slot.level = Some(level);
        Ok(())
    }

    /// Sample a pin in any mode
    pub fn read(&self, pin: usize) -> Result<Level> {
        let mut slot = self.slot(pin)?;
        let gpio = slot.gpio;

        let mut buf = [0; 8];
        let n = slot
            .value
            .load(&mut buf)
            .map_err(|e| Error::os(Operation::Load(Attribute::Value), gpio, e))?;
        let content = &buf[..n.min(buf.len())];

        // A full buffer means the attribute may hold more than we saw
        let level = Some(content)
            .filter(|c| c.len() < buf.len())
            .and_then(Level::parse)
            .ok_or_else(|| Error::CorruptRead {
                pin,
                content: content.into(),
            })?;
        slot.level = Some(level);
        Ok(level)
    }

    /// The mode last set on a pin, if any
    pub fn mode(&self, pin: usize) -> Result<Option<Mode>> {
        Ok(self.slot(pin)?.mode)
    }

    /// The level last read from or written to a pin, if still valid
    pub fn cached_level(&self, pin: usize) -> Result<Option<Level>> {
        Ok(self.slot(pin)?.level)
    }
}

impl<B: Backend> std::fmt::Debug for Gpio<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gpio")
            .field("table", &self.table)
            .field("exported", &self.pins.iter().flatten().count())
            .finish()
    }
}

impl<B: Backend> Drop for Gpio<B> {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

/// Outcome of releasing a [`Gpio`]
#[derive(Debug, Default)]
#[must_use]
pub struct Teardown {
    failures: Vec<Error>,
}

impl Teardown {
    /// True if every pin was unexported
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[Error] {
        &self.failures
    }
}
