use crate::DeviceDescriptor;

/// Source of the device list of a platform.
///
/// Implementations must be `Sync` so one provider can back lookups from any context. The returned
/// slice is read-only and keeps its order; lookups rely on that order for tie-breaking.
pub trait DeviceProvider: Sync {
    fn get_devices(&self) -> &[DeviceDescriptor];
}

/// Provider over a constant descriptor slice, usable in `static` items.
///
/// ```
/// use ddt::{DeviceDescriptor, DeviceFlags, DeviceKind, DeviceRole, StaticProvider};
///
/// static BOARD: StaticProvider = StaticProvider::new(&[
///     DeviceDescriptor::new(DeviceKind::Led, DeviceRole::Status, 0, DeviceFlags::empty(), 7),
/// ]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StaticProvider {
    devices: &'static [DeviceDescriptor],
}

impl StaticProvider {
    pub const fn new(devices: &'static [DeviceDescriptor]) -> StaticProvider {
        StaticProvider { devices }
    }
}

impl DeviceProvider for StaticProvider {
    fn get_devices(&self) -> &[DeviceDescriptor] {
        self.devices
    }
}
