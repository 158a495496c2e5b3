//! The boundary between the pin cache and the OS GPIO interface.
//!
//! [`Sysfs`](crate::sysfs::Sysfs) is the production backend. The cache only
//! ever talks to the OS through these two traits, which keeps the lifecycle
//! logic testable without real hardware.

use std::io::Result;

/// A per-GPIO attribute file exposed once a GPIO is exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attribute {
    /// Accepts `in` / `out`
    Direction,
    /// Accepts and reports `0` / `1`
    Value,
}

impl Attribute {
    pub const fn name(self) -> &'static str {
        match self {
            Attribute::Direction => "direction",
            Attribute::Value => "value",
        }
    }
}

/// An open handle to a single attribute of an exported GPIO.
///
/// Dropping the handle closes it.
pub trait AttributeHandle {
    /// Replace the attribute content with `buf`
    fn store(&mut self, buf: &[u8]) -> Result<()>;

    /// Read the attribute content from its start into `buf`, returning the
    /// number of bytes read
    fn load(&mut self, buf: &mut [u8]) -> Result<usize>;
}

pub trait Backend {
    type Handle: AttributeHandle;

    /// Ask the OS to expose `gpio` as a controllable resource
    fn export(&self, gpio: u32) -> Result<()>;

    /// Ask the OS to stop exposing `gpio`
    fn unexport(&self, gpio: u32) -> Result<()>;

    /// Open an attribute of an exported GPIO
    fn open(&self, gpio: u32, attr: Attribute) -> Result<Self::Handle>;
}
