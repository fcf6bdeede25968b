//! Device lookup over the installed provider.
//!
//! Ownership and concurrency notes:
//! - The table never owns the provider; it keeps a `&'static dyn DeviceProvider`, so the provider
//!   has to live for the rest of the program.
//! - The reference sits behind a [RwLock] so holders of a shared table (e.g. installed SYS
//!   handlers) see a provider swapped in later. Swapping while lookups run on another thread is
//!   not a supported pattern; the embedding VM serializes both.
//! - **Returned descriptors are `&'static` references into the provider's slice.**
use crate::{DeviceDescriptor, DeviceKind, DeviceProvider, DeviceRole};
use log::trace;
use spin::RwLock;

pub struct DeviceTable {
    provider: RwLock<Option<&'static dyn DeviceProvider>>,
}

impl DeviceTable {
    /// Create a table with no provider, i.e. no known devices.
    pub const fn new() -> DeviceTable {
        DeviceTable {
            provider: RwLock::new(None),
        }
    }

    pub fn with_provider(provider: &'static dyn DeviceProvider) -> DeviceTable {
        DeviceTable {
            provider: RwLock::new(Some(provider)),
        }
    }

    /// Install `provider`, replacing the previous one. [None] models "no devices known".
    pub fn set_provider(&self, provider: Option<&'static dyn DeviceProvider>) {
        trace!("DDT provider {}.", if provider.is_some() { "installed" } else { "cleared" });
        *self.provider.write() = provider;
    }

    pub fn has_provider(&self) -> bool {
        self.provider.read().is_some()
    }

    fn devices(&self) -> &'static [DeviceDescriptor] {
        match *self.provider.read() {
            Some(provider) => provider.get_devices(),
            None => &[],
        }
    }

    /// Find the first device matching all three coordinates.
    ///
    /// Duplicated coordinates are not rejected; the first one in provider order wins.
    pub fn find_device(
        &self,
        kind: DeviceKind,
        role: DeviceRole,
        index: u8,
    ) -> Option<&'static DeviceDescriptor> {
        self.devices().iter().find(|dev| dev.matches(kind, role, index))
    }

    /// Same as [DeviceTable::find_device] with index 0.
    pub fn find_default_device(
        &self,
        kind: DeviceKind,
        role: DeviceRole,
    ) -> Option<&'static DeviceDescriptor> {
        self.find_device(kind, role, 0)
    }

    pub fn count_devices(&self, kind: DeviceKind) -> usize {
        self.devices().iter().filter(|dev| dev.kind == kind).count()
    }

    /// Every descriptor of the installed provider, empty without one.
    pub fn get_all_devices(&self) -> &'static [DeviceDescriptor] {
        self.devices()
    }
}

impl Default for DeviceTable {
    fn default() -> Self {
        Self::new()
    }
}
