//! The Linux sysfs GPIO interface (`/sys/class/gpio`).
//!
//! A GPIO is exported by writing its number to `export`, which makes the
//! kernel create `gpioN/` with `direction` and `value` attributes. The
//! attribute files are opened once and reused; every access goes through
//! `pread`/`pwrite` at offset 0 so a cached descriptor never needs a seek.
//!
//! The sysfs interface is deprecated upstream in favour of the GPIO
//! character device, but it is still the only interface on many older
//! kernels and board images.

use std::{
    fmt::Write as _,
    fs::{File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use crate::backend::{Attribute, AttributeHandle, Backend};

pub const SYSFS_GPIO_ROOT: &str = "/sys/class/gpio";

const DEFAULT_SETTLE_TIMEOUT: Duration = Duration::from_millis(100);
const SETTLE_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Options for opening the sysfs backend
#[derive(Debug, Clone)]
pub struct SysfsOptions {
    root: Option<PathBuf>,
    settle_timeout: Duration,
}

impl SysfsOptions {
    pub const fn new() -> Self {
        Self {
            root: None,
            settle_timeout: DEFAULT_SETTLE_TIMEOUT,
        }
    }

    /// Use a GPIO class directory other than `/sys/class/gpio`
    pub fn with_root(self, root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            ..self
        }
    }

    /// How long to keep retrying to open the attributes of a freshly
    /// exported GPIO.
    ///
    /// The kernel creates `gpioN/` on export, but udev may still be
    /// adjusting its ownership for a short while after.
    pub fn with_settle_timeout(self, settle_timeout: Duration) -> Self {
        Self {
            settle_timeout,
            ..self
        }
    }

    /// Open the `export` and `unexport` control files
    pub fn open(self) -> io::Result<Sysfs> {
        let root = self.root.unwrap_or_else(|| PathBuf::from(SYSFS_GPIO_ROOT));
        let export = OpenOptions::new().write(true).open(root.join("export"))?;
        let unexport = OpenOptions::new().write(true).open(root.join("unexport"))?;

        Ok(Sysfs {
            root,
            export,
            unexport,
            settle_timeout: self.settle_timeout,
        })
    }
}

impl Default for SysfsOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// The sysfs GPIO backend, holding the export control files open
#[derive(Debug)]
pub struct Sysfs {
    root: PathBuf,
    export: File,
    unexport: File,
    settle_timeout: Duration,
}

impl Sysfs {
    /// Open `/sys/class/gpio` with default options
    pub fn open() -> io::Result<Self> {
        SysfsOptions::new().open()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn attribute_path(&self, gpio: u32, attr: Attribute) -> PathBuf {
        self.root.join(format!("gpio{gpio}")).join(attr.name())
    }

    fn control(mut file: &File, gpio: u32) -> io::Result<()> {
        // u32::MAX has 10 digits
        let mut line: heapless::String<12> = heapless::String::new();
        writeln!(line, "{gpio}")
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "GPIO number too long"))?;
        file.write_all(line.as_bytes())
    }
}

impl Backend for Sysfs {
    type Handle = SysfsAttribute;

    fn export(&self, gpio: u32) -> io::Result<()> {
        Self::control(&self.export, gpio)
    }

    fn unexport(&self, gpio: u32) -> io::Result<()> {
        Self::control(&self.unexport, gpio)
    }

    fn open(&self, gpio: u32, attr: Attribute) -> io::Result<SysfsAttribute> {
        let path = self.attribute_path(gpio, attr);
        let start = Instant::now();

        loop {
            match OpenOptions::new().read(true).write(true).open(&path) {
                Ok(file) => {
                    log::debug!("opened {}", path.display());
                    return Ok(SysfsAttribute { file });
                }
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
                    ) && start.elapsed() < self.settle_timeout =>
                {
                    std::thread::sleep(SETTLE_POLL_INTERVAL);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// An open `direction` or `value` attribute file
#[derive(Debug)]
pub struct SysfsAttribute {
    file: File,
}

impl AttributeHandle for SysfsAttribute {
    fn store(&mut self, buf: &[u8]) -> io::Result<()> {
        let written = nix::sys::uio::pwrite(&self.file, buf, 0)?;
        if written != buf.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("short write: {written} of {} bytes", buf.len()),
            ));
        }
        Ok(())
    }

    fn load(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(nix::sys::uio::pread(&self.file, buf, 0)?)
    }
}
