//! Error types of the SYS layer.
//!
//! Internally every call reports a typed [SysError]. The VM boundary has no room for error details,
//! so errors collapse to the legacy numeric codes (see [SysError::legacy_code]) only when a handler
//! returns to the caller.

use core::fmt::{self, Display};

/// Why a SYS call did not produce a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SysError {
    /// No handler is installed for the call ID.
    NoHandler,
    /// No descriptor matches the requested coordinates, or no provider is installed.
    DeviceNotFound,
    /// The call addresses a device kind the handler does not drive.
    WrongKind,
    /// The handler's HAL has not been installed.
    NoHal,
}

impl SysError {
    /// Value reported to the VM for this error.
    ///
    /// `-1` means "no handler"; every handler-level failure is `0` and indistinguishable from the
    /// caller's side.
    pub const fn legacy_code(self) -> i32 {
        match self {
            SysError::NoHandler => -1,
            SysError::DeviceNotFound | SysError::WrongKind | SysError::NoHal => 0,
        }
    }
}

impl Display for SysError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SysError::NoHandler => "no handler registered",
            SysError::DeviceNotFound => "device not found",
            SysError::WrongKind => "wrong device kind",
            SysError::NoHal => "no HAL installed",
        })
    }
}
