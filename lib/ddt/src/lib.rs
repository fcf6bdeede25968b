//! Device Descriptor Table.
//!
//! Bytecode addresses hardware by logical `(kind, role, index)` coordinates. A platform supplies the
//! concrete list of devices through a [DeviceProvider]; the [DeviceTable] resolves coordinates
//! against whichever provider is currently installed.

#![no_std]
extern crate alloc;

mod desc;
mod provider;
mod table;

pub use desc::*;
pub use provider::*;
pub use table::*;
