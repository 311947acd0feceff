//! Driver for MCP4725 single channel 12-bit DAC.
//! Datasheet here: <https://ww1.microchip.com/downloads/en/DeviceDoc/22039d.pdf>

use embedded_hal::blocking::i2c::{Read, Write};

use crate::error::Error;
use crate::frame::{self, Registers, MAX_VALUE, READ_LEN};

/// 7 bit address, set by the A0 pin and the two factory programmed bits A2 A1.
///
/// The upper bits are always `1100`, so the possible addresses are `0x60` to `0x67`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Address {
    /// A2 A1 A0 = 000, the common default.
    A0 = 0b1100_000,
    A1 = 0b1100_001,
    A2 = 0b1100_010,
    A3 = 0b1100_011,
    A4 = 0b1100_100,
    A5 = 0b1100_101,
    A6 = 0b1100_110,
    A7 = 0b1100_111,
}

impl Address {
    /// The 7 bit address as used by the embedded-hal bus traits.
    pub fn addr(self) -> u8 {
        self as u8
    }

    /// The address pre-shifted into the upper 7 bits, for buses that take 8 bit addresses.
    pub fn shifted(self) -> u8 {
        (self as u8) << 1
    }
}

impl Default for Address {
    fn default() -> Self {
        Address::A0
    }
}

/// Power mode, bits PD1 PD0.
///
/// In the shutdown modes the output amplifier is off and the output pin is
/// pulled to ground through the given resistor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerMode {
    Normal = 0b00,
    ShutdownPullDown1k = 0b01,
    ShutdownPullDown100k = 0b10,
    ShutdownPullDown500k = 0b11,
}

impl PowerMode {
    pub(crate) fn bits(self) -> u8 {
        self as u8
    }

    /// Decode the two lowest bits. Every pattern is a valid mode.
    pub(crate) fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => PowerMode::Normal,
            0b01 => PowerMode::ShutdownPullDown1k,
            0b10 => PowerMode::ShutdownPullDown100k,
            _ => PowerMode::ShutdownPullDown500k,
        }
    }

    pub fn is_shutdown(self) -> bool {
        self != PowerMode::Normal
    }
}

impl Default for PowerMode {
    fn default() -> Self {
        PowerMode::Normal
    }
}

/// How to wait for the EEPROM to become ready before touching it.
///
/// An EEPROM write takes up to 50ms, during which the device ignores further
/// EEPROM commands. The ready bit is polled with full 5 byte reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// Keep reading until the device reports ready. Blocks forever if it never does.
    Forever,
    /// Give up with [`Error::Timeout`] after this many status reads. `0` counts as `1`.
    Attempts(u32),
}

impl Default for Poll {
    fn default() -> Self {
        Poll::Forever
    }
}

pub fn builder() -> Builder {
    Builder {
        ..Default::default()
    }
}

#[derive(Debug, Default)]
pub struct Builder {
    /// Defaults to [`Address::A0`].
    address: Address,
    /// Defaults to [`Poll::Forever`].
    poll: Poll,
}

impl Builder {
    pub fn address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }

    pub fn poll(mut self, poll: Poll) -> Self {
        self.poll = poll;
        self
    }

    /// Create the driver. Nothing is sent on the bus.
    pub fn build<I>(self, i2c: I) -> Mcp4725<I> {
        Mcp4725 {
            i2c,
            addr: self.address,
            poll: self.poll,
            mode: PowerMode::Normal,
            value: 0,
        }
    }
}

/// MCP4725 on one address of an I2C bus.
///
/// The driver remembers the last power mode and value it read or wrote, so that
/// changing one of them leaves the other as it was.
///
/// A poll-then-write sequence must not be interleaved with other traffic to the
/// device. To share the driver, put the whole instance behind a
/// [`Lock`](crate::Lock) rather than locking each transaction.
pub struct Mcp4725<I> {
    i2c: I,
    addr: Address,
    poll: Poll,
    mode: PowerMode,
    value: u16,
}

impl<I> Mcp4725<I> {
    /// The output code for full scale, `VDD * 4095/4096`.
    pub const FULL_SCALE: u16 = MAX_VALUE;

    pub fn address(&self) -> Address {
        self.addr
    }

    /// Power mode as last read or written. No bus traffic.
    pub fn cached_power_mode(&self) -> PowerMode {
        self.mode
    }

    /// 12-bit value as last read or written. No bus traffic.
    pub fn cached_value(&self) -> u16 {
        self.value
    }

    /// Destroy the driver and hand back the bus.
    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I, E> Mcp4725<I>
where
    I: Write<Error = E>,
    I: Read<Error = E>,
{
    pub fn new(i2c: I, address: Address) -> Self {
        builder().address(address).build(i2c)
    }

    /// Probe for a device on the address with a zero length write.
    ///
    /// This only tells that something acknowledges the address, not that it is an MCP4725.
    pub fn open(&mut self) -> bool {
        let present = self.i2c.write(self.addr.addr(), &[]).is_ok();
        debug!("open {:?}: {}", self.addr, present);
        present
    }

    /// General call reset. The device reloads power mode and value from EEPROM.
    ///
    /// This is a broadcast to address `0x00`. Every device on the bus that
    /// implements general call will reset, not just this one.
    pub fn reset(&mut self) -> Result<(), Error<E>> {
        self.general_call(frame::GENERAL_CALL_RESET)
    }

    /// General call wake-up. Clears the power down bits and sets [`PowerMode::Normal`].
    ///
    /// This is a broadcast to address `0x00`. Every device on the bus that
    /// implements general call will wake up, not just this one.
    pub fn wakeup(&mut self) -> Result<(), Error<E>> {
        self.general_call(frame::GENERAL_CALL_WAKE_UP)
    }

    /// Read the current power mode. Also refreshes the cached value.
    pub fn power_mode(&mut self) -> Result<PowerMode, Error<E>> {
        self.read_dac()?;
        Ok(self.mode)
    }

    /// Set the power mode, keeping the last value.
    pub fn set_power_mode(&mut self, mode: PowerMode) -> Result<(), Error<E>> {
        debug!("set_power_mode: {:?}", mode);
        self.write_dac(mode, self.value)
    }

    /// Read the output as a fraction of full scale, `0.0` to `1.0`.
    pub fn read(&mut self) -> Result<f32, Error<E>> {
        self.read_dac()?;
        Ok(self.value as f32 / Self::FULL_SCALE as f32)
    }

    /// Set the output as a fraction of full scale.
    ///
    /// The value is clamped to `0.0..=1.0` and truncated to the 12-bit code
    /// below it. `NaN` gives `0`.
    pub fn write(&mut self, value: f32) -> Result<(), Error<E>> {
        let value = if value < 0.0 {
            0.0
        } else if value > 1.0 {
            1.0
        } else {
            value
        };
        let code = (value * Self::FULL_SCALE as f32) as u16;
        debug!("write: {} -> {}", value, code);
        self.write_dac(self.mode, code)
    }

    /// Set the raw 12-bit output code.
    ///
    /// Unlike [`write`](Self::write) there is no clamping. A value above `0x0fff`
    /// is masked to its lowest 12 bits, so `0x1000` writes `0`.
    pub fn write_u12(&mut self, value: u16) -> Result<(), Error<E>> {
        debug!("write_u12: {}", value);
        self.write_dac(self.mode, value)
    }

    /// Read the power on defaults from EEPROM, waiting for any write in progress.
    pub fn read_eeprom(&mut self) -> Result<(PowerMode, u16), Error<E>> {
        let buf = self.wait_ready()?;
        Ok(frame::decode_eeprom(&buf))
    }

    /// Store power on defaults in EEPROM, waiting for any write in progress first.
    ///
    /// The same command also loads the DAC register, so the output changes right away.
    /// The value is masked to 12 bits.
    pub fn write_eeprom(&mut self, mode: PowerMode, value: u16) -> Result<(), Error<E>> {
        debug!("write_eeprom: {:?} {}", mode, value);
        self.wait_ready()?;

        let value = value & MAX_VALUE;
        self.i2c
            .write(self.addr.addr(), &frame::eeprom_write(mode, value))?;

        self.mode = mode;
        self.value = value;
        Ok(())
    }

    /// Read and decode everything the device reports, without waiting for the EEPROM.
    pub fn registers(&mut self) -> Result<Registers, Error<E>> {
        let buf = self.read_frame()?;
        let regs = Registers::decode(&buf);
        self.mode = regs.power_mode;
        self.value = regs.value;
        Ok(regs)
    }

    /// Whether an EEPROM write is still in progress.
    pub fn is_busy(&mut self) -> Result<bool, Error<E>> {
        let buf = self.read_frame()?;
        Ok(!frame::is_ready(&buf))
    }

    fn general_call(&mut self, command: u8) -> Result<(), Error<E>> {
        info!("general call 0x{:02x}", command);
        self.i2c.write(frame::GENERAL_CALL_ADDRESS, &[command])?;
        Ok(())
    }

    fn read_frame(&mut self) -> Result<[u8; READ_LEN], Error<E>> {
        let mut buf = [0; READ_LEN];
        self.i2c.read(self.addr.addr(), &mut buf)?;
        Ok(buf)
    }

    fn read_dac(&mut self) -> Result<(), Error<E>> {
        let buf = self.read_frame()?;
        let (mode, value) = frame::decode_dac(&buf);
        self.mode = mode;
        self.value = value;
        Ok(())
    }

    fn write_dac(&mut self, mode: PowerMode, value: u16) -> Result<(), Error<E>> {
        let value = value & MAX_VALUE;
        self.i2c
            .write(self.addr.addr(), &frame::fast_write(mode, value))?;

        self.mode = mode;
        self.value = value;
        Ok(())
    }

    /// Read status until the ready bit is set, returning the read that saw it.
    fn wait_ready(&mut self) -> Result<[u8; READ_LEN], Error<E>> {
        let mut attempts: u32 = 0;

        loop {
            let buf = self.read_frame()?;
            attempts = attempts.wrapping_add(1);

            if frame::is_ready(&buf) {
                return Ok(buf);
            }

            trace!("eeprom busy, attempt {}", attempts);

            if let Poll::Attempts(max) = self.poll {
                if attempts >= max.max(1) {
                    warn!("eeprom still busy after {} reads", attempts);
                    return Err(Error::Timeout);
                }
            }
        }
    }
}
