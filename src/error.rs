//! Wrapper for all the errors.

use core::fmt;

/// Errors from the driver. `E` is the error type of the underlying I2C bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// The bus transaction failed.
    I2C(E),
    /// A bounded EEPROM poll ran out of attempts before the device reported ready.
    Timeout,
}

impl<E> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Error::I2C(e)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::I2C(e) => write!(f, "i2c error: {:?}", e),
            Error::Timeout => write!(f, "timed out waiting for eeprom"),
        }
    }
}
