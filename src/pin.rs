use bstr::ByteSlice;

use crate::errors::Error;

/// Direction of a pin as requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Input,
    Output,
    /// Declared bidirectional use. sysfs only knows a binary direction, so
    /// the pin is driven as an output, which stays readable.
    InOut,
}

impl Mode {
    /// True if the pin is driven by us at the OS level
    pub const fn is_output(self) -> bool {
        matches!(self, Mode::Output | Mode::InOut)
    }

    pub(crate) const fn as_sysfs(self) -> &'static [u8] {
        if self.is_output() {
            b"out"
        } else {
            b"in"
        }
    }
}

impl TryFrom<i32> for Mode {
    type Error = Error;

    fn try_from(mode: i32) -> Result<Self, Self::Error> {
        match mode {
            0 => Ok(Mode::Input),
            1 => Ok(Mode::Output),
            2 => Ok(Mode::InOut),
            _ => Err(Error::InvalidMode(mode)),
        }
    }
}

impl From<Mode> for i32 {
    fn from(mode: Mode) -> i32 {
        match mode {
            Mode::Input => 0,
            Mode::Output => 1,
            Mode::InOut => 2,
        }
    }
}

/// Logical level of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub const fn new(is_high: bool) -> Self {
        if is_high {
            Self::High
        } else {
            Self::Low
        }
    }

    pub const fn is_high(&self) -> bool {
        matches!(self, Level::High)
    }

    pub(crate) const fn as_sysfs(self) -> &'static [u8] {
        match self {
            Level::Low => b"0",
            Level::High => b"1",
        }
    }

    /// Parse the content of a value attribute. Anything but a single `0` or
    /// `1`, surrounded by optional whitespace, is rejected.
    pub(crate) fn parse(content: &[u8]) -> Option<Self> {
        match content.trim() {
            b"0" => Some(Level::Low),
            b"1" => Some(Level::High),
            _ => None,
        }
    }
}

impl std::ops::Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        Level::new(!self.is_high())
    }
}

impl From<bool> for Level {
    fn from(is_high: bool) -> Self {
        Level::new(is_high)
    }
}

impl From<Level> for bool {
    fn from(level: Level) -> bool {
        level.is_high()
    }
}

impl TryFrom<i32> for Level {
    type Error = Error;

    fn try_from(level: i32) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Level::Low),
            1 => Ok(Level::High),
            _ => Err(Error::InvalidLevel(level)),
        }
    }
}

impl From<Level> for i32 {
    fn from(level: Level) -> i32 {
        i32::from(level.is_high())
    }
}
