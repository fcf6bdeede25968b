//! V4 standard hardware layer.
//!
//! Bytecode running on the V4 VM reaches hardware through numbered SYS calls carrying exactly three
//! integer arguments. This crate maps those calls to handlers ([registry]), resolves logical device
//! coordinates through the [ddt] table, and implements the standard handler sets on top.
//!
//! Nothing here is global: a [SysRuntime] (or hand-assembled parts) is created and owned by whoever
//! embeds the VM.

#![no_std]
extern crate alloc;

#[macro_use]
pub mod macros;
pub mod error;
pub mod registry;
mod runtime;

#[cfg(feature = "cap")]
pub mod cap;
#[cfg(feature = "led")]
pub mod led;

pub use ddt;
pub use error::SysError;
pub use registry::{HandlerRegistry, SysHandler};
pub use runtime::{SysInfo, SysRuntime};
pub use sys_ids;

#[doc(hidden)]
pub use log as __log;

#[cfg(any(feature = "led", feature = "cap"))]
use ddt::{DeviceDescriptor, DeviceKind, DeviceRole, DeviceTable};

/// Resolve raw call arguments to a descriptor.
///
/// Kind and role values that are not known enum values never match anything, so they report
/// [SysError::DeviceNotFound] like any other miss. Only the low byte of `index` is significant:
/// `256` addresses index `0` and `-1` addresses index `255`.
#[cfg(any(feature = "led", feature = "cap"))]
pub(crate) fn find_raw(
    table: &DeviceTable,
    kind: i32,
    role: i32,
    index: i32,
) -> Result<&'static DeviceDescriptor, SysError> {
    let kind = u8::try_from(kind)
        .ok()
        .and_then(|kind| DeviceKind::try_from(kind).ok())
        .ok_or(SysError::DeviceNotFound)?;
    let role = u8::try_from(role)
        .ok()
        .and_then(|role| DeviceRole::try_from(role).ok())
        .ok_or(SysError::DeviceNotFound)?;
    let index = index as u8;
    table
        .find_device(kind, role, index)
        .ok_or(SysError::DeviceNotFound)
}
