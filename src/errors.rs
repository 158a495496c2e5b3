use std::fmt;
use std::io::Error as IOError;

use bstr::BString;

use crate::backend::Attribute;

pub(crate) type Result<T> = std::result::Result<T, Error>;

/// The broad category an [`Error`] belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The pin table does not allow the request (out of range, no GPIO
    /// behind the pin, duplicate GPIO numbers) or an argument was invalid
    Configuration,
    /// The subsystem or the pin is not in a state that allows the request
    State,
    /// The OS GPIO interface rejected an export, unexport, open, read or write
    OsAccess,
    /// The value attribute reported something other than `0` or `1`
    CorruptRead,
}

impl ErrorKind {
    /// Negative status code used at the sign-encoded boundary
    pub const fn status(self) -> i32 {
        match self {
            ErrorKind::Configuration => -1,
            ErrorKind::State => -2,
            ErrorKind::OsAccess => -3,
            ErrorKind::CorruptRead => -4,
        }
    }
}

/// Why the OS refused a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFailure {
    PermissionDenied,
    /// The GPIO is already exported, usually by another process
    Busy,
    /// Out of file descriptors or kernel memory
    ResourceLimit,
    NotFound,
    Other,
}

impl OsFailure {
    pub fn classify(err: &IOError) -> Self {
        match err.raw_os_error() {
            Some(libc::EACCES | libc::EPERM) => OsFailure::PermissionDenied,
            Some(libc::EBUSY) => OsFailure::Busy,
            Some(libc::EMFILE | libc::ENFILE | libc::ENOMEM | libc::ENOSPC) => {
                OsFailure::ResourceLimit
            }
            Some(libc::ENOENT | libc::ENODEV | libc::ENXIO) => OsFailure::NotFound,
            Some(_) => OsFailure::Other,
            None => match err.kind() {
                std::io::ErrorKind::PermissionDenied => OsFailure::PermissionDenied,
                std::io::ErrorKind::NotFound => OsFailure::NotFound,
                std::io::ErrorKind::OutOfMemory => OsFailure::ResourceLimit,
                _ => OsFailure::Other,
            },
        }
    }
}

impl fmt::Display for OsFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            OsFailure::PermissionDenied => "permission denied",
            OsFailure::Busy => "already in use",
            OsFailure::ResourceLimit => "resource limit reached",
            OsFailure::NotFound => "not found",
            OsFailure::Other => "os error",
        };
        f.write_str(s)
    }
}

/// The OS request that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Export,
    Unexport,
    Open(Attribute),
    Load(Attribute),
    Store(Attribute),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operation::Export => f.write_str("export"),
            Operation::Unexport => f.write_str("unexport"),
            Operation::Open(attr) => write!(f, "open {}", attr.name()),
            Operation::Load(attr) => write!(f, "read {}", attr.name()),
            Operation::Store(attr) => write!(f, "write {}", attr.name()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Pin {0} is out of range")]
    OutOfRange(usize),
    #[error("Pin {0} has no controllable GPIO")]
    NotControllable(usize),
    #[error("GPIO {gpio} is mapped by both pin {first} and pin {second}")]
    DuplicateGpio { gpio: u32, first: usize, second: usize },
    #[error("Invalid pin mode: {0}")]
    InvalidMode(i32),
    #[error("Invalid pin level: {0}")]
    InvalidLevel(i32),
    #[error("GPIO subsystem is not initialized")]
    NotInitialized,
    #[error("GPIO subsystem is already initialized")]
    AlreadyInitialized,
    #[error("Pin {0} has no direction set")]
    ModeUnset(usize),
    #[error("Pin {0} is configured as an input")]
    InputMode(usize),
    #[error("Failed to {op} for GPIO {gpio} ({failure})")]
    Os {
        op: Operation,
        gpio: u32,
        failure: OsFailure,
        #[source]
        source: IOError,
    },
    #[error("Pin {pin} read {content:?}, expected \"0\" or \"1\"")]
    CorruptRead { pin: usize, content: BString },
}

impl Error {
    pub(crate) fn os(op: Operation, gpio: u32, source: IOError) -> Self {
        Error::Os {
            op,
            gpio,
            failure: OsFailure::classify(&source),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::OutOfRange(_)
            | Error::NotControllable(_)
            | Error::DuplicateGpio { .. }
            | Error::InvalidMode(_)
            | Error::InvalidLevel(_) => ErrorKind::Configuration,
            Error::NotInitialized
            | Error::AlreadyInitialized
            | Error::ModeUnset(_)
            | Error::InputMode(_) => ErrorKind::State,
            Error::Os { .. } => ErrorKind::OsAccess,
            Error::CorruptRead { .. } => ErrorKind::CorruptRead,
        }
    }

    /// The OS failure class, if this error came from the OS GPIO interface
    pub fn os_failure(&self) -> Option<OsFailure> {
        match self {
            Error::Os { failure, .. } => Some(*failure),
            _ => None,
        }
    }

    /// Negative status code for callers that only understand signed results
    pub fn status(&self) -> i32 {
        self.kind().status()
    }
}
