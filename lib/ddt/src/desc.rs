//! Descriptor POD types and their 8-byte wire form.
use alloc::vec::Vec;
use bitflags::bitflags;
use core::fmt::{self, Display};
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Functional category of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum DeviceKind {
    /// Undefined/invalid device.
    None = 0,
    /// Digital output.
    Led = 1,
    /// Digital input.
    Button = 2,
    /// PWM driven buzzer.
    Buzzer = 3,
    Timer = 4,
    Uart = 5,
    I2c = 6,
    Spi = 7,
    /// Analog input.
    Adc = 8,
    Pwm = 9,
    /// Key-value store.
    Storage = 10,
    Display = 11,
    /// Random number generator.
    Rng = 12,
}

/// Purpose of a device, distinguishing devices of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum DeviceRole {
    None = 0,
    /// Status indicator, e.g. the board's status LED.
    Status = 1,
    /// User interaction, e.g. a user button.
    User = 2,
    Power = 3,
    /// Console communication, e.g. the console UART.
    Console = 4,
    Debug = 5,
}

bitflags! {
    /// Descriptor configuration bits.
    pub struct DeviceFlags: u8 {
        /// Signal polarity is inverted: physical LOW means logical ON.
        const ACTIVE_LOW = 1 << 0;
    }
}

/// Size of one encoded descriptor.
pub const DESC_SIZE: usize = 8;

/// One physical device.
///
/// Descriptors are constant data owned by the provider; the table only hands out references into
/// the provider's slice. `handle` is opaque to everything except the platform HAL.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub kind: DeviceKind,
    pub role: DeviceRole,
    /// 0-based index within the `(kind, role)` pair.
    pub index: u8,
    pub flags: DeviceFlags,
    /// Platform-specific handle (GPIO number, bus id, ...).
    pub handle: u32,
}

impl DeviceDescriptor {
    pub const fn new(
        kind: DeviceKind,
        role: DeviceRole,
        index: u8,
        flags: DeviceFlags,
        handle: u32,
    ) -> DeviceDescriptor {
        DeviceDescriptor {
            kind,
            role,
            index,
            flags,
            handle,
        }
    }

    pub fn is_active_low(&self) -> bool {
        self.flags.contains(DeviceFlags::ACTIVE_LOW)
    }

    /// Whether this descriptor sits at the given logical coordinates.
    pub fn matches(&self, kind: DeviceKind, role: DeviceRole, index: u8) -> bool {
        self.kind == kind && self.role == role && self.index == index
    }

    /// Encode as `kind, role, index, flags, handle (little-endian)`.
    pub fn to_bytes(&self) -> [u8; DESC_SIZE] {
        let handle = self.handle.to_le_bytes();
        [
            self.kind.into(),
            self.role.into(),
            self.index,
            self.flags.bits(),
            handle[0],
            handle[1],
            handle[2],
            handle[3],
        ]
    }

    /// Decode the first [DESC_SIZE] bytes of `bytes`.
    ///
    /// Unknown flag bits are kept; unknown kinds and roles are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<DeviceDescriptor, DescriptorError> {
        if bytes.len() < DESC_SIZE {
            return Err(DescriptorError::TooShort { len: bytes.len() });
        }
        let kind = DeviceKind::try_from(bytes[0]).map_err(|_| DescriptorError::UnknownKind(bytes[0]))?;
        let role = DeviceRole::try_from(bytes[1]).map_err(|_| DescriptorError::UnknownRole(bytes[1]))?;
        Ok(DeviceDescriptor {
            kind,
            role,
            index: bytes[2],
            flags: flags_keeping_unknown(bytes[3]),
            handle: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        })
    }
}

fn flags_keeping_unknown(bits: u8) -> DeviceFlags {
    // SAFETY: DeviceFlags is a plain u8 wrapper; bits outside the known set only round-trip.
    unsafe { DeviceFlags::from_bits_unchecked(bits) }
}

/// Decode a packed table image made of consecutive 8-byte descriptors.
pub fn decode_table(bytes: &[u8]) -> Result<Vec<DeviceDescriptor>, DescriptorError> {
    if bytes.len() % DESC_SIZE != 0 {
        return Err(DescriptorError::TrailingBytes { len: bytes.len() });
    }
    bytes.chunks_exact(DESC_SIZE).map(DeviceDescriptor::from_bytes).collect()
}

// region: Error Types

/// Errors returned when decoding descriptors from raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorError {
    /// Fewer than [DESC_SIZE] bytes were supplied.
    TooShort { len: usize },
    /// A table image whose length is not a multiple of [DESC_SIZE].
    TrailingBytes { len: usize },
    UnknownKind(u8),
    UnknownRole(u8),
}

impl Display for DescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorError::TooShort { len } => {
                write!(f, "descriptor needs {} bytes, got {}", DESC_SIZE, len)
            }
            DescriptorError::TrailingBytes { len } => {
                write!(f, "table image of {} bytes is not a multiple of {}", len, DESC_SIZE)
            }
            DescriptorError::UnknownKind(kind) => write!(f, "unknown device kind {}", kind),
            DescriptorError::UnknownRole(role) => write!(f, "unknown device role {}", role),
        }
    }
}

// endregion
