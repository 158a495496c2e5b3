use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    backend::Backend,
    errors::{Error, Result},
    gpio::{Gpio, Teardown},
    pin::{Level, Mode},
    sysfs::Sysfs,
    table::PinTable,
};

/// Owner of a [`Gpio`] with an explicit uninitialized/initialized lifecycle.
///
/// Access operations on an uninitialized `GpioDev` fail with
/// [`Error::NotInitialized`] for every pin. Initialization and teardown are
/// serialized against all access operations, so a `GpioDev` can live in a
/// `static` shared by every worker of a control loop.
///
/// ```no_run
/// use gpio_sysfs::{GpioDev, Level, Mode, PinTable, Sysfs};
///
/// static GPIO: GpioDev = GpioDev::new();
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// GPIO.initialize(PinTable::raspberry_pi(), Sysfs::open()?)?;
/// GPIO.set_mode(11, Mode::Output)?;
/// GPIO.write(11, Level::High)?;
/// let teardown = GPIO.destroy();
/// assert!(teardown.is_clean());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GpioDev<B: Backend = Sysfs> {
    inner: RwLock<Option<Gpio<B>>>,
}

impl<B: Backend> GpioDev<B> {
    pub const fn new() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    fn read_lock(&self) -> RwLockReadGuard<'_, Option<Gpio<B>>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, Option<Gpio<B>>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Export and open every controllable pin of `table`.
    ///
    /// Fails with [`Error::AlreadyInitialized`] without touching the OS if
    /// already initialized. Any other failure leaves the subsystem
    /// uninitialized with nothing exported.
    pub fn initialize(&self, table: PinTable, backend: B) -> Result<()> {
        let mut inner = self.write_lock();
        if inner.is_some() {
            return Err(Error::AlreadyInitialized);
        }
        *inner = Some(Gpio::initialize(table, backend)?);
        Ok(())
    }

    /// Release every pin. Does nothing if not initialized.
    pub fn destroy(&self) -> Teardown {
        self.write_lock()
            .take()
            .map(Gpio::destroy)
            .unwrap_or_default()
    }

    pub fn is_initialized(&self) -> bool {
        self.read_lock().is_some()
    }

    fn with<T>(&self, f: impl FnOnce(&Gpio<B>) -> Result<T>) -> Result<T> {
        let inner = self.read_lock();
        let gpio = inner.as_ref().ok_or(Error::NotInitialized)?;
        f(gpio)
    }

    pub fn set_mode(&self, pin: usize, mode: Mode) -> Result<()> {
        self.with(|gpio| gpio.set_mode(pin, mode))
    }

    pub fn write(&self, pin: usize, level: Level) -> Result<()> {
        self.with(|gpio| gpio.write(pin, level))
    }

    pub fn read(&self, pin: usize) -> Result<Level> {
        self.with(|gpio| gpio.read(pin))
    }

    pub fn mode(&self, pin: usize) -> Result<Option<Mode>> {
        self.with(|gpio| gpio.mode(pin))
    }

    pub fn cached_level(&self, pin: usize) -> Result<Option<Level>> {
        self.with(|gpio| gpio.cached_level(pin))
    }
}

impl<B: Backend> Default for GpioDev<B> {
    fn default() -> Self {
        Self::new()
    }
}
