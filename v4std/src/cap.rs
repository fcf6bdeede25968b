//! Capability and system introspection SYS calls.
//!
//! Lets bytecode probe which devices a board has before driving them. Lookups that miss return
//! `0` for CAP_EXISTS and CAP_COUNT and `-1` for CAP_FLAGS and CAP_HANDLE, since `0` is a valid
//! flags byte and a valid handle.
use crate::{find_raw, registry::HandlerRegistry, runtime::SysInfo};
use alloc::sync::Arc;
use ddt::{DeviceKind, DeviceTable};
use sys_ids::{CAP_COUNT, CAP_EXISTS, CAP_FLAGS, CAP_HANDLE, SYS_PLATFORM, SYS_VERSION};

/// Crate version as `(major << 16) | (minor << 8) | patch`.
pub fn version_code() -> i32 {
    let part = |s: &str| s.parse::<i32>().unwrap_or(0) & 0xFF;
    (part(env!("CARGO_PKG_VERSION_MAJOR")) << 16)
        | (part(env!("CARGO_PKG_VERSION_MINOR")) << 8)
        | part(env!("CARGO_PKG_VERSION_PATCH"))
}

fn count(table: &DeviceTable, kind: i32) -> i32 {
    let kind = u8::try_from(kind).ok().and_then(|kind| DeviceKind::try_from(kind).ok());
    match kind {
        Some(kind) => table.count_devices(kind) as i32,
        None => 0,
    }
}

pub fn register_cap_sys_handlers(registry: &mut HandlerRegistry, table: &Arc<DeviceTable>, info: SysInfo) {
    debug_ex!("Registering capability SYS handlers...");

    let t = table.clone();
    registry.register_fn(CAP_COUNT, move |_, kind, _, _| count(&t, kind));

    let t = table.clone();
    registry.register_fn(CAP_EXISTS, move |_, kind, role, index| {
        find_raw(&t, kind, role, index).is_ok() as i32
    });

    let t = table.clone();
    registry.register_fn(CAP_FLAGS, move |_, kind, role, index| {
        find_raw(&t, kind, role, index).map_or(-1, |dev| i32::from(dev.flags.bits()))
    });

    let t = table.clone();
    registry.register_fn(CAP_HANDLE, move |_, kind, role, index| {
        find_raw(&t, kind, role, index).map_or(-1, |dev| dev.handle as i32)
    });

    let version = version_code();
    registry.register_fn(SYS_VERSION, move |_, _, _, _| version);
    registry.register_fn(SYS_PLATFORM, move |_, _, _, _| info.platform_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddt::{DeviceDescriptor, DeviceFlags, DeviceRole, StaticProvider};

    static BOARD: StaticProvider = StaticProvider::new(&[
        DeviceDescriptor::new(DeviceKind::Led, DeviceRole::Status, 0, DeviceFlags::empty(), 7),
        DeviceDescriptor::new(DeviceKind::Led, DeviceRole::User, 1, DeviceFlags::ACTIVE_LOW, 10),
        DeviceDescriptor::new(DeviceKind::Storage, DeviceRole::None, 0, DeviceFlags::empty(), 0xFFFF_FFFE),
    ]);

    const LED: i32 = DeviceKind::Led as i32;
    const USER: i32 = DeviceRole::User as i32;

    fn setup() -> (Arc<DeviceTable>, HandlerRegistry) {
        let table = Arc::new(DeviceTable::with_provider(&BOARD));
        let mut registry = HandlerRegistry::new();
        register_cap_sys_handlers(&mut registry, &table, SysInfo { platform_id: 0x6C6 });
        (table, registry)
    }

    #[test]
    fn counts_and_existence() {
        let (table, registry) = setup();
        assert_eq!(registry.invoke(CAP_COUNT, LED, 0, 0), 2);
        assert_eq!(registry.invoke(CAP_COUNT, DeviceKind::Uart as i32, 0, 0), 0);
        assert_eq!(registry.invoke(CAP_COUNT, 200, 0, 0), 0);
        assert_eq!(registry.invoke(CAP_EXISTS, LED, USER, 1), 1);
        assert_eq!(registry.invoke(CAP_EXISTS, LED, USER, 0), 0);

        table.set_provider(None);
        assert_eq!(registry.invoke(CAP_COUNT, LED, 0, 0), 0);
        assert_eq!(registry.invoke(CAP_EXISTS, LED, USER, 1), 0);
    }

    #[test]
    fn flags_and_handles() {
        let (_, registry) = setup();
        assert_eq!(registry.invoke(CAP_FLAGS, LED, USER, 1), 1);
        assert_eq!(registry.invoke(CAP_FLAGS, LED, DeviceRole::Status as i32, 0), 0);
        assert_eq!(registry.invoke(CAP_FLAGS, LED, USER, 7), -1);
        assert_eq!(registry.invoke(CAP_HANDLE, LED, USER, 1), 10);
        assert_eq!(registry.invoke(CAP_HANDLE, DeviceKind::Storage as i32, 0, 0), -2);
        assert_eq!(registry.invoke(CAP_HANDLE, LED, USER, 7), -1);
    }

    #[test]
    fn system_info() {
        let (_, registry) = setup();
        assert_eq!(registry.invoke(SYS_PLATFORM, 0, 0, 0), 0x6C6);
        assert_eq!(registry.invoke(SYS_VERSION, 0, 0, 0), version_code());
        assert_eq!(version_code(), 0x00_01_00);
    }
}
