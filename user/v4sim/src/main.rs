//! Host simulator for the V4 standard layer.
//!
//! Builds a board from a packed descriptor image, backs its LEDs with simulated GPIO pins and
//! replays a short SYS call script the way the VM's dispatch loop would.
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{error, info, warn};
use v4std::ddt::{DeviceKind, DeviceRole, StaticProvider, decode_table};
use v4std::led::{LedHal, LedSetArgs};
use v4std::sys_ids::{self, *};
use v4std::{SysInfo, SysRuntime};

mod logging;

/// Platform identifier reported by SYS_PLATFORM ("V4" in ASCII).
const PLATFORM_ID: i32 = 0x5634;

const GPIO_COUNT: usize = 32;

/// Packed board image: `kind, role, index, flags, handle (LE)` per device.
#[rustfmt::skip]
const BOARD_IMAGE: [u8; 40] = [
    1, 1, 0, 0, 7, 0, 0, 0,    // LED STATUS #0 on GPIO7
    1, 2, 0, 0, 8, 0, 0, 0,    // LED USER #0 on GPIO8
    1, 2, 1, 1, 10, 0, 0, 0,   // LED USER #1 on GPIO10, active-low
    2, 2, 0, 1, 9, 0, 0, 0,    // BUTTON USER #0 on GPIO9, active-low
    5, 4, 0, 0, 0, 0, 0, 0,    // UART CONSOLE #0
];

/// Simulated GPIO bank; stores physical pin levels.
struct Gpio {
    pins: [AtomicBool; GPIO_COUNT],
}

impl Gpio {
    fn new() -> Gpio {
        Gpio {
            pins: std::array::from_fn(|_| AtomicBool::new(false)),
        }
    }

    fn pin(&self, handle: u32) -> Option<&AtomicBool> {
        self.pins.get(usize::try_from(handle).ok()?)
    }
}

impl LedHal for Gpio {
    fn set_led(&self, handle: u32, state: bool, active_low: bool) -> bool {
        let Some(pin) = self.pin(handle) else {
            warn!("GPIO{} does not exist.", handle);
            return false;
        };
        let level = state != active_low;
        pin.store(level, Ordering::Relaxed);
        info!("GPIO{} <- {}", handle, if level { "HIGH" } else { "LOW" });
        true
    }

    fn get_led(&self, handle: u32, active_low: bool) -> bool {
        self.pin(handle)
            .map(|pin| pin.load(Ordering::Relaxed))
            .unwrap_or(false)
            != active_low
    }
}

fn script() -> Vec<(u16, i32, i32, i32)> {
    let led = u8::from(DeviceKind::Led) as i32;
    let status = u8::from(DeviceRole::Status) as i32;
    let user = u8::from(DeviceRole::User) as i32;
    vec![
        (SYS_PLATFORM, 0, 0, 0),
        (SYS_VERSION, 0, 0, 0),
        (CAP_COUNT, led, 0, 0),
        (CAP_EXISTS, led, user, 1),
        (LED_ON, led, status, 0),
        (LED_GET, led, status, 0),
        (LED_SET, led, user, LedSetArgs::pack(1, true)),
        (LED_TOGGLE, led, user, 0),
        (LED_TOGGLE, led, user, 0),
        (LED_OFF, led, status, 0),
        (LED_ON, u8::from(DeviceKind::Button) as i32, user, 0),
        (LED_ON, led, status, 3),
        (BUTTON_READ, u8::from(DeviceKind::Button) as i32, user, 0),
    ]
}

fn main() -> ExitCode {
    logging::init();

    let devices = match decode_table(&BOARD_IMAGE) {
        Ok(devices) => devices,
        Err(err) => {
            error!("Invalid board image: {}.", err);
            return ExitCode::FAILURE;
        }
    };
    info!("Board has {} devices.", devices.len());
    let board: &'static StaticProvider =
        Box::leak(Box::new(StaticProvider::new(Box::leak(devices.into_boxed_slice()))));
    let gpio: &'static Gpio = Box::leak(Box::new(Gpio::new()));

    let mut rt = SysRuntime::new(SysInfo { platform_id: PLATFORM_ID });
    rt.set_provider(Some(board));
    rt.set_led_hal(Some(gpio));
    rt.register_std_handlers();
    info!("{} SYS handlers registered.", rt.registry().count());

    for (sys_id, arg0, arg1, arg2) in script() {
        let res = rt.invoke(sys_id, arg0, arg1, arg2);
        info!(
            "{:<14} ({}, {}, {:#x}) -> {}",
            sys_ids::sys_name(sys_id).unwrap_or("?"),
            arg0,
            arg1,
            arg2,
            res
        );
    }
    ExitCode::SUCCESS
}
