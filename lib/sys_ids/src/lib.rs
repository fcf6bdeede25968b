//! Numeric SYS call identifiers shared by the VM and the standard handlers.
//!
//! The constants are generated at build time from `sys_ids.json`. The 16-bit ID space is split
//! into fixed ranges by device category, see [SysCategory].

#![no_std]

use core::ops::RangeInclusive;

/// One entry of the generated definition list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SysIdInfo {
    /// Numeric ID.
    pub id: u16,
    /// Symbolic name, e.g. `LED_ON`.
    pub name: &'static str,
    /// Human readable description.
    pub description: &'static str,
}

include!(concat!(env!("OUT_DIR"), "/sys_ids.rs"));

/// Reserved ID ranges, one per device category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SysCategory {
    Led,
    Button,
    Timer,
    Uart,
    I2c,
    Spi,
    Adc,
    Pwm,
    Storage,
    Display,
    Rng,
    /// Capability and system introspection.
    System,
}

impl SysCategory {
    /// All categories in ascending ID order.
    pub const ALL: [SysCategory; 12] = [
        SysCategory::Led,
        SysCategory::Button,
        SysCategory::Timer,
        SysCategory::Uart,
        SysCategory::I2c,
        SysCategory::Spi,
        SysCategory::Adc,
        SysCategory::Pwm,
        SysCategory::Storage,
        SysCategory::Display,
        SysCategory::Rng,
        SysCategory::System,
    ];

    const fn prefix(self) -> u16 {
        match self {
            SysCategory::Led => 0x01,
            SysCategory::Button => 0x02,
            SysCategory::Timer => 0x03,
            SysCategory::Uart => 0x04,
            SysCategory::I2c => 0x05,
            SysCategory::Spi => 0x06,
            SysCategory::Adc => 0x07,
            SysCategory::Pwm => 0x08,
            SysCategory::Storage => 0x09,
            SysCategory::Display => 0x0A,
            SysCategory::Rng => 0x0B,
            SysCategory::System => 0x0F,
        }
    }

    /// The inclusive ID range reserved for this category.
    pub const fn range(self) -> RangeInclusive<u16> {
        let start = self.prefix() << 8;
        start..=(start | 0xFF)
    }

    /// Category owning `id`, or [None] for IDs outside every reserved range.
    pub fn of(id: u16) -> Option<SysCategory> {
        let prefix = id >> 8;
        Self::ALL.into_iter().find(|cat| cat.prefix() == prefix)
    }
}

/// Look up the definition entry of `id`.
pub fn sys_info(id: u16) -> Option<&'static SysIdInfo> {
    SYS_ID_TABLE.iter().find(|info| info.id == id)
}

/// Symbolic name of `id`, mostly for logging.
pub fn sys_name(id: u16) -> Option<&'static str> {
    sys_info(id).map(|info| info.name)
}
