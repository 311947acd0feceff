//! Driver for the MCP4725 single channel 12-bit I2C DAC, on top of the
//! [embedded-hal](https://github.com/rust-embedded/embedded-hal) blocking I2C traits.
//!
//! ```ignore
//! use mcp4725::{Address, Mcp4725, PowerMode};
//!
//! let mut dac = Mcp4725::new(i2c, Address::A0);
//!
//! if dac.open() {
//!     // NB. general calls go to every device on the bus.
//!     dac.wakeup()?;
//!     dac.write(0.5)?;
//!
//!     // power on with the output grounded through 500k
//!     dac.write_eeprom(PowerMode::ShutdownPullDown500k, 0)?;
//! }
//! ```
//!
//! Bounded EEPROM polling is set up with the builder.
//!
//! ```ignore
//! let mut dac = mcp4725::builder()
//!     .address(Address::A1)
//!     .poll(Poll::Attempts(100))
//!     .build(i2c);
//! ```
#![cfg_attr(not(test), no_std)]

#[macro_use]
extern crate log;

mod error;
mod frame;
mod lock;
mod mcp4725;

#[cfg(test)]
mod fake;

pub use crate::error::Error;
pub use crate::frame::Registers;
pub use crate::lock::{Lock, LockGuard};
pub use crate::mcp4725::{builder, Address, Builder, Mcp4725, Poll, PowerMode};
