//! Byte level packing and unpacking of the MCP4725 wire formats.
//!
//! ```ignore
//! fast write     [0 0 PD1 PD0 D11 D10 D9 D8] [D7 D6 D5 D4 D3 D2 D1 D0]
//! eeprom write   [0 1 1 X X PD1 PD0 X] [D11 .. D4] [D3 D2 D1 D0 X X X X]
//! read           [RDY POR X X X PD1 PD0 X] [D11 .. D4] [D3 D2 D1 D0 X X X X]
//!                [X PD1 PD0 X D11 D10 D9 D8] [D7 .. D0]
//! ```
//!
//! The first three read bytes are the volatile DAC register, the last two the EEPROM.

use crate::mcp4725::PowerMode;

/// Largest value the 12-bit DAC register holds.
pub const MAX_VALUE: u16 = 0x0fff;

/// Length of a status/register read.
pub const READ_LEN: usize = 5;

/// Broadcast address every compliant device on the bus listens to.
pub const GENERAL_CALL_ADDRESS: u8 = 0x00;
pub const GENERAL_CALL_RESET: u8 = 0x06;
pub const GENERAL_CALL_WAKE_UP: u8 = 0x09;

/// C2 C1 C0 = 011, write DAC register and EEPROM.
const COMMAND_WRITE_EEPROM: u8 = 0b0110_0000;

const STATUS_READY: u8 = 0b1000_0000;
const STATUS_POR: u8 = 0b0100_0000;

const FAST_PD_SHIFT: u8 = 4;
const EEPROM_WRITE_PD_SHIFT: u8 = 1;
const DAC_READ_PD_SHIFT: u8 = 1;
const EEPROM_READ_PD_SHIFT: u8 = 5;

/// 2-byte fast mode write of the volatile DAC register.
pub fn fast_write(mode: PowerMode, value: u16) -> [u8; 2] {
    let value = value & MAX_VALUE;
    [
        (mode.bits() << FAST_PD_SHIFT) | (value >> 8) as u8,
        (value & 0xff) as u8,
    ]
}

/// 3-byte write of both the DAC register and the EEPROM.
pub fn eeprom_write(mode: PowerMode, value: u16) -> [u8; 3] {
    let value = value & MAX_VALUE;
    [
        COMMAND_WRITE_EEPROM | (mode.bits() << EEPROM_WRITE_PD_SHIFT),
        (value >> 4) as u8,
        ((value << 4) & 0xf0) as u8,
    ]
}

/// Whether the device has finished any EEPROM write in progress.
pub fn is_ready(buf: &[u8; READ_LEN]) -> bool {
    buf[0] & STATUS_READY != 0
}

/// Everything one read from the device reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    /// `false` while an EEPROM write is in progress.
    pub ready: bool,
    /// Power on reset flag, set once the supply is above the reset threshold.
    pub power_on_reset: bool,
    /// Current power mode in the DAC register.
    pub power_mode: PowerMode,
    /// Current 12-bit value in the DAC register.
    pub value: u16,
    /// Power mode loaded at power on.
    pub eeprom_power_mode: PowerMode,
    /// 12-bit value loaded at power on.
    pub eeprom_value: u16,
}

impl Registers {
    pub fn decode(buf: &[u8; READ_LEN]) -> Self {
        let (power_mode, value) = decode_dac(buf);
        let (eeprom_power_mode, eeprom_value) = decode_eeprom(buf);
        Registers {
            ready: is_ready(buf),
            power_on_reset: buf[0] & STATUS_POR != 0,
            power_mode,
            value,
            eeprom_power_mode,
            eeprom_value,
        }
    }
}

/// Power mode and value of the volatile DAC register.
pub fn decode_dac(buf: &[u8; READ_LEN]) -> (PowerMode, u16) {
    let mode = PowerMode::from_bits(buf[0] >> DAC_READ_PD_SHIFT);
    let value = ((buf[1] as u16) << 4) | ((buf[2] as u16) >> 4);
    (mode, value)
}

/// Power mode and value stored in EEPROM.
pub fn decode_eeprom(buf: &[u8; READ_LEN]) -> (PowerMode, u16) {
    let mode = PowerMode::from_bits(buf[3] >> EEPROM_READ_PD_SHIFT);
    let value = (((buf[3] as u16) << 8) & MAX_VALUE) | buf[4] as u16;
    (mode, value)
}
