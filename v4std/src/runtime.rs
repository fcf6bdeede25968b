use crate::registry::HandlerRegistry;
use alloc::sync::Arc;
use ddt::{DeviceProvider, DeviceTable};

#[cfg(feature = "led")]
use crate::led::{LedHal, LedSys};

/// Static facts about the running platform, reported through SYS_PLATFORM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SysInfo {
    pub platform_id: i32,
}

/// Everything the VM needs to dispatch SYS calls, assembled in one place.
///
/// Two runtimes share nothing, so tests can each build their own.
pub struct SysRuntime {
    info: SysInfo,
    table: Arc<DeviceTable>,
    #[cfg(feature = "led")]
    led: Arc<LedSys>,
    registry: HandlerRegistry,
}

impl SysRuntime {
    pub fn new(info: SysInfo) -> SysRuntime {
        let table = Arc::new(DeviceTable::new());
        SysRuntime {
            info,
            #[cfg(feature = "led")]
            led: Arc::new(LedSys::new(table.clone())),
            table,
            registry: HandlerRegistry::new(),
        }
    }

    pub fn info(&self) -> SysInfo {
        self.info
    }

    pub fn set_provider(&self, provider: Option<&'static dyn DeviceProvider>) {
        self.table.set_provider(provider);
    }

    #[cfg(feature = "led")]
    pub fn set_led_hal(&self, hal: Option<&'static dyn LedHal>) {
        self.led.set_led_hal(hal);
    }

    /// Install every handler set enabled at build time.
    pub fn register_std_handlers(&mut self) {
        #[cfg(feature = "led")]
        crate::led::register_led_sys_handlers(&mut self.registry, &self.led);
        #[cfg(feature = "cap")]
        crate::cap::register_cap_sys_handlers(&mut self.registry, &self.table, self.info);
    }

    pub fn table(&self) -> &Arc<DeviceTable> {
        &self.table
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut HandlerRegistry {
        &mut self.registry
    }

    /// VM entry point; see [HandlerRegistry::invoke].
    pub fn invoke(&self, sys_id: u16, arg0: i32, arg1: i32, arg2: i32) -> i32 {
        self.registry.invoke(sys_id, arg0, arg1, arg2)
    }
}
