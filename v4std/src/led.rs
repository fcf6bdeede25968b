//! LED SYS calls: ON, OFF, TOGGLE, SET and GET.
//!
//! Every call resolves a `(kind, role, index)` triple through the [DeviceTable] and drives the
//! device through the installed [LedHal]. States are always *logical*; the HAL receives the
//! descriptor's active-low flag and applies the inversion itself.
//!
//! Results at the VM boundary: `1` on success, `0` on any failure (no HAL, wrong kind, device not
//! found, HAL error). GET returns the observed logical state, `0` or `1`.
use crate::{error::SysError, find_raw, registry::HandlerRegistry, registry::SysHandler};
use alloc::sync::Arc;
use ddt::{DeviceDescriptor, DeviceKind, DeviceTable};
use log::trace;
use spin::RwLock;
use sys_ids::{LED_GET, LED_OFF, LED_ON, LED_SET, LED_TOGGLE};

/// Platform LED control.
pub trait LedHal: Sync {
    /// Drive the LED at `handle` to the logical `state`. Return `false` on a hardware error.
    fn set_led(&self, handle: u32, state: bool, active_low: bool) -> bool;
    /// Read the logical state of the LED at `handle`.
    fn get_led(&self, handle: u32, active_low: bool) -> bool;
}

/// Logical coordinates as they arrive from the VM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedTarget {
    pub kind: i32,
    pub role: i32,
    pub index: i32,
}

impl LedTarget {
    pub const fn new(kind: i32, role: i32, index: i32) -> LedTarget {
        LedTarget { kind, role, index }
    }
}

/// Arguments of LED SET.
///
/// SET needs four values but a SYS call carries three, so `arg2` holds both the index and the
/// state: `arg2 = (index << 16) | state`, index in bits 16..24, state in the low 16 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedSetArgs {
    pub target: LedTarget,
    pub state: bool,
}

impl LedSetArgs {
    pub fn unpack(arg0: i32, arg1: i32, arg2: i32) -> LedSetArgs {
        LedSetArgs {
            target: LedTarget::new(arg0, arg1, (arg2 >> 16) & 0xFF),
            state: (arg2 & 0xFFFF) != 0,
        }
    }

    /// Build the packed `arg2` for `index` and `state`.
    pub const fn pack(index: u8, state: bool) -> i32 {
        ((index as i32) << 16) | state as i32
    }
}

/// LED handler context: the device table plus the installed HAL.
pub struct LedSys {
    table: Arc<DeviceTable>,
    hal: RwLock<Option<&'static dyn LedHal>>,
}

impl LedSys {
    pub fn new(table: Arc<DeviceTable>) -> LedSys {
        LedSys {
            table,
            hal: RwLock::new(None),
        }
    }

    /// Install (or clear, with [None]) the LED HAL.
    pub fn set_led_hal(&self, hal: Option<&'static dyn LedHal>) {
        debug_ex!("LED HAL {}.", if hal.is_some() { "installed" } else { "cleared" });
        *self.hal.write() = hal;
    }

    fn hal(&self) -> Result<&'static dyn LedHal, SysError> {
        (*self.hal.read()).ok_or(SysError::NoHal)
    }

    /// HAL first, then kind, then lookup.
    fn resolve(&self, target: LedTarget) -> Result<(&'static dyn LedHal, &'static DeviceDescriptor), SysError> {
        let hal = self.hal()?;
        if target.kind != i32::from(u8::from(DeviceKind::Led)) {
            return Err(SysError::WrongKind);
        }
        let led = find_raw(&self.table, target.kind, target.role, target.index)?;
        Ok((hal, led))
    }

    pub fn on(&self, target: LedTarget) -> Result<bool, SysError> {
        self.set(LedSetArgs { target, state: true })
    }

    pub fn off(&self, target: LedTarget) -> Result<bool, SysError> {
        self.set(LedSetArgs { target, state: false })
    }

    /// Read the state and write back its negation.
    ///
    /// The two HAL calls are not atomic; callers that run LED calls from several threads must
    /// serialize them.
    pub fn toggle(&self, target: LedTarget) -> Result<bool, SysError> {
        let (hal, led) = self.resolve(target)?;
        let active_low = led.is_active_low();
        let current = hal.get_led(led.handle, active_low);
        Ok(hal.set_led(led.handle, !current, active_low))
    }

    pub fn set(&self, args: LedSetArgs) -> Result<bool, SysError> {
        let (hal, led) = self.resolve(args.target)?;
        Ok(hal.set_led(led.handle, args.state, led.is_active_low()))
    }

    pub fn get(&self, target: LedTarget) -> Result<bool, SysError> {
        let (hal, led) = self.resolve(target)?;
        Ok(hal.get_led(led.handle, led.is_active_low()))
    }
}

type LedOp = fn(&LedSys, i32, i32, i32) -> Result<bool, SysError>;

fn led_handler(led: &Arc<LedSys>, op: LedOp) -> SysHandler {
    let led = led.clone();
    Arc::new(move |sys_id: u16, arg0: i32, arg1: i32, arg2: i32| match op(&led, arg0, arg1, arg2) {
        Ok(res) => res as i32,
        Err(err) => {
            trace!("LED SYS {:#06x} ({}, {}, {:#x}) failed: {}.", sys_id, arg0, arg1, arg2, err);
            err.legacy_code()
        }
    })
}

/// Install the five LED handlers into `registry`.
///
/// Calls only succeed once both a provider and a HAL are installed in `led`, but registering
/// earlier is fine.
pub fn register_led_sys_handlers(registry: &mut HandlerRegistry, led: &Arc<LedSys>) {
    debug_ex!("Registering LED SYS handlers...");
    let handlers: [(u16, LedOp); 5] = [
        (LED_ON, |led, kind, role, index| led.on(LedTarget::new(kind, role, index))),
        (LED_OFF, |led, kind, role, index| led.off(LedTarget::new(kind, role, index))),
        (LED_TOGGLE, |led, kind, role, index| led.toggle(LedTarget::new(kind, role, index))),
        (LED_SET, |led, kind, role, packed| led.set(LedSetArgs::unpack(kind, role, packed))),
        (LED_GET, |led, kind, role, index| led.get(LedTarget::new(kind, role, index))),
    ];
    for (sys_id, op) in handlers {
        registry.register(sys_id, Some(led_handler(led, op)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{boxed::Box, collections::btree_map::BTreeMap};
    use ddt::{DeviceFlags, DeviceRole, StaticProvider};
    use spin::Mutex;

    const LED: i32 = DeviceKind::Led as i32;
    const STATUS: i32 = DeviceRole::Status as i32;
    const USER: i32 = DeviceRole::User as i32;

    static BOARD: StaticProvider = StaticProvider::new(&[
        DeviceDescriptor::new(DeviceKind::Led, DeviceRole::Status, 0, DeviceFlags::empty(), 7),
        DeviceDescriptor::new(DeviceKind::Led, DeviceRole::User, 1, DeviceFlags::ACTIVE_LOW, 10),
        DeviceDescriptor::new(DeviceKind::Button, DeviceRole::User, 0, DeviceFlags::empty(), 9),
    ]);

    /// Pin levels by handle; applies the active-low inversion like real hardware glue does.
    #[derive(Default)]
    struct Pins {
        levels: Mutex<BTreeMap<u32, bool>>,
        fail_writes: bool,
    }

    impl Pins {
        fn leak(fail_writes: bool) -> &'static Pins {
            Box::leak(Box::new(Pins {
                fail_writes,
                ..Pins::default()
            }))
        }

        fn level(&self, handle: u32) -> Option<bool> {
            self.levels.lock().get(&handle).copied()
        }
    }

    impl LedHal for Pins {
        fn set_led(&self, handle: u32, state: bool, active_low: bool) -> bool {
            if self.fail_writes {
                return false;
            }
            self.levels.lock().insert(handle, state != active_low);
            true
        }

        fn get_led(&self, handle: u32, active_low: bool) -> bool {
            self.level(handle).unwrap_or(false) != active_low
        }
    }

    fn setup(fail_writes: bool) -> (&'static Pins, Arc<LedSys>, HandlerRegistry) {
        let pins = Pins::leak(fail_writes);
        let led = Arc::new(LedSys::new(Arc::new(DeviceTable::with_provider(&BOARD))));
        led.set_led_hal(Some(pins));
        let mut registry = HandlerRegistry::new();
        register_led_sys_handlers(&mut registry, &led);
        (pins, led, registry)
    }

    #[test]
    fn installs_five_handlers() {
        let (_, _, registry) = setup(false);
        assert_eq!(registry.count(), 5);
        for id in [LED_ON, LED_OFF, LED_TOGGLE, LED_SET, LED_GET] {
            assert!(registry.lookup(id).is_some());
        }
    }

    #[test]
    fn set_packing() {
        assert_eq!(LedSetArgs::pack(0, true), 1);
        assert_eq!(LedSetArgs::pack(3, false), 0x0003_0000);
        let args = LedSetArgs::unpack(LED, USER, LedSetArgs::pack(1, true));
        assert_eq!(args.target, LedTarget::new(LED, USER, 1));
        assert!(args.state);
        // Any non-zero low half means "on"; bits above the index byte are ignored.
        let args = LedSetArgs::unpack(LED, USER, 0x7F01_0100);
        assert_eq!(args.target.index, 1);
        assert!(args.state);
    }

    #[test]
    fn typed_errors() {
        let (_, led, _) = setup(false);
        assert_eq!(led.on(LedTarget::new(LED, STATUS, 0)), Ok(true));
        assert_eq!(
            led.on(LedTarget::new(DeviceKind::Button as i32, USER, 0)),
            Err(SysError::WrongKind)
        );
        assert_eq!(led.on(LedTarget::new(LED, STATUS, 99)), Err(SysError::DeviceNotFound));
        assert_eq!(led.on(LedTarget::new(LED, STATUS, -1)), Err(SysError::DeviceNotFound));
        assert_eq!(led.on(LedTarget::new(LED, -1, 0)), Err(SysError::DeviceNotFound));

        led.set_led_hal(None);
        assert_eq!(led.on(LedTarget::new(LED, STATUS, 0)), Err(SysError::NoHal));
        assert_eq!(
            led.on(LedTarget::new(DeviceKind::Button as i32, USER, 0)),
            Err(SysError::NoHal)
        );
    }

    #[test]
    fn index_uses_low_byte_only() {
        let (pins, led, registry) = setup(false);
        assert_eq!(led.on(LedTarget::new(LED, STATUS, 256)), Ok(true));
        assert_eq!(pins.level(7), Some(true));
        assert_eq!(registry.invoke(LED_OFF, LED, USER, 0x0101), 1);
        assert_eq!(pins.level(10), Some(true));
        assert_eq!(registry.invoke(LED_GET, LED, USER, 0x7F01), 0);
        // Role is not truncated: 258 is not USER.
        assert_eq!(led.on(LedTarget::new(LED, 256 + USER, 1)), Err(SysError::DeviceNotFound));
    }

    #[test]
    fn hal_checked_before_kind() {
        let led = LedSys::new(Arc::new(DeviceTable::new()));
        assert_eq!(led.get(LedTarget::new(0, 0, 0)), Err(SysError::NoHal));
        led.set_led_hal(Some(Pins::leak(false)));
        assert_eq!(led.get(LedTarget::new(0, 0, 0)), Err(SysError::WrongKind));
        assert_eq!(led.get(LedTarget::new(LED, STATUS, 0)), Err(SysError::DeviceNotFound));
    }

    #[test]
    fn hal_write_failure_reports_zero() {
        let (pins, _, registry) = setup(true);
        assert_eq!(registry.invoke(LED_ON, LED, STATUS, 0), 0);
        assert_eq!(registry.invoke(LED_TOGGLE, LED, STATUS, 0), 0);
        assert_eq!(pins.level(7), None);
    }

    #[test]
    fn toggle_flips_logical_state() {
        let (pins, led, _) = setup(false);
        let user = LedTarget::new(LED, USER, 1);
        assert_eq!(led.off(user), Ok(true));
        assert_eq!(pins.level(10), Some(true));
        assert_eq!(led.toggle(user), Ok(true));
        assert_eq!(led.get(user), Ok(true));
        assert_eq!(pins.level(10), Some(false));
    }
}
