//! In-memory MCP4725 that answers like the chip, for tests.

extern crate std;

use embedded_hal::blocking::i2c::{Read, Write};
use std::vec::Vec;

use crate::mcp4725::Address;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nack;

/// Bus traffic as the device saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Address and whether the ready bit was set in the answer.
    Read(u8, bool),
    Write(u8, Vec<u8>),
}

pub struct Fake {
    addr: u8,
    /// PD bits and value of the DAC register.
    pub dac: (u8, u16),
    /// PD bits and value of the EEPROM.
    pub eeprom: (u8, u16),
    /// Reads left that report busy.
    pub busy_reads: u32,
    /// Busy reads following each EEPROM write.
    pub write_busy: u32,
    pub ops: Vec<Op>,
}

impl Fake {
    pub fn new(address: Address) -> Self {
        Fake {
            addr: address.addr(),
            dac: (0, 0),
            eeprom: (0, 0),
            busy_reads: 0,
            write_busy: 0,
            ops: Vec::new(),
        }
    }
}

impl Write for Fake {
    type Error = Nack;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Nack> {
        self.ops.push(Op::Write(address, bytes.to_vec()));

        if address == 0x00 {
            match bytes {
                [0x06] => self.dac = self.eeprom,
                [0x09] => self.dac.0 = 0,
                _ => {}
            }
            return Ok(());
        }

        if address != self.addr {
            return Err(Nack);
        }

        match *bytes {
            [] => {}
            [b0, b1] if b0 & 0xc0 == 0 => {
                self.dac = ((b0 >> 4) & 0b11, ((b0 as u16 & 0x0f) << 8) | b1 as u16);
            }
            [b0, b1, b2] if b0 & 0xe0 == 0x60 => {
                let stored = ((b0 >> 1) & 0b11, (b1 as u16) << 4 | (b2 as u16) >> 4);
                self.dac = stored;
                self.eeprom = stored;
                self.busy_reads = self.write_busy;
            }
            _ => return Err(Nack),
        }

        Ok(())
    }
}

impl Read for Fake {
    type Error = Nack;

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Nack> {
        if address != self.addr {
            return Err(Nack);
        }

        let ready = self.busy_reads == 0;
        self.busy_reads = self.busy_reads.saturating_sub(1);
        self.ops.push(Op::Read(address, ready));

        let status = if ready { 0xc0 } else { 0x40 };
        let frame = [
            status | self.dac.0 << 1,
            (self.dac.1 >> 4) as u8,
            (self.dac.1 << 4) as u8,
            self.eeprom.0 << 5 | (self.eeprom.1 >> 8) as u8,
            self.eeprom.1 as u8,
        ];

        for (b, f) in buffer.iter_mut().zip(frame.iter()) {
            *b = *f;
        }

        Ok(())
    }
}
