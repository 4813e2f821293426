use embedded_hal::blocking::spi::{Transfer, Write};
use embedded_hal::digital::v2::OutputPin;
use std::fmt::Debug;
use thiserror::Error;

use crate::bus::{Bus, BusKind};
use crate::regs;

/// Either the transfer or the chip-select line failed.
#[derive(Debug, Error)]
pub enum SpiBusError<SE: Debug, PE: Debug> {
    #[error("SPI transfer error: {0:?}")]
    Spi(SE),
    #[error("chip-select error: {0:?}")]
    ChipSelect(PE),
}

/// The sensor on an SPI bus.
///
/// The peripheral must be configured for mode 0, MSB first, at
/// [`SPI_CLOCK_SPEED_HZ`](crate::SPI_CLOCK_SPEED_HZ). Chip-select is driven
/// here, active low, once per transaction. `cs_pin` is only reported back
/// through [`Bus::kind`], it is not used to address anything.
pub struct SpiBus<SPI, CS> {
    spi: SPI,
    cs: CS,
    cs_pin: u8,
}

impl<SPI, CS, SE, PE> SpiBus<SPI, CS>
where
    SPI: Transfer<u8, Error = SE> + Write<u8, Error = SE>,
    CS: OutputPin<Error = PE>,
    SE: Debug,
    PE: Debug,
{
    pub fn new(spi: SPI, cs: CS, cs_pin: u8) -> Self {
        SpiBus { spi, cs, cs_pin }
    }

    pub fn chip_select(&self) -> u8 {
        self.cs_pin
    }

    /// Gives back the peripheral and the chip-select pin.
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }

    /// Runs `f` with chip-select asserted. The line is released again even
    /// when `f` fails.
    fn transaction<T, F>(&mut self, f: F) -> Result<T, SpiBusError<SE, PE>>
    where
        F: FnOnce(&mut SPI) -> Result<T, SE>,
    {
        self.cs.set_low().map_err(SpiBusError::ChipSelect)?;
        let res = f(&mut self.spi).map_err(SpiBusError::Spi);
        let released = self.cs.set_high().map_err(SpiBusError::ChipSelect);
        let val = res?;
        released?;
        Ok(val)
    }
}

impl<SPI, CS, SE, PE> Bus for SpiBus<SPI, CS>
where
    SPI: Transfer<u8, Error = SE> + Write<u8, Error = SE>,
    CS: OutputPin<Error = PE>,
    SE: Debug,
    PE: Debug,
{
    type Error = SpiBusError<SE, PE>;

    fn kind(&self) -> BusKind {
        BusKind::Spi {
            chip_select: self.cs_pin,
        }
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        debug!("SPI cs {} write: {:#04X}", self.cs_pin, byte);
        self.transaction(|spi| spi.write(&[byte]))
    }

    fn write_register_byte(&mut self, reg: u8, value: u8) -> Result<(), Self::Error> {
        debug!("SPI cs {} write: {:#04X} {:#04X}", self.cs_pin, reg, value);
        self.transaction(|spi| spi.write(&[reg, value]))
    }

    fn read_register_word(&mut self, reg: u8) -> Result<u16, Self::Error> {
        let mut buff = [reg | regs::spi::READ_FLAG, 0, 0];
        let word = self.transaction(|spi| {
            let resp = spi.transfer(&mut buff)?;
            Ok([resp[1], resp[2]])
        })?;
        debug!("SPI cs {} read {:#04X}: {:?}", self.cs_pin, reg, word);
        Ok(u16::from_le_bytes(word))
    }

    /// SPI has no acknowledge, so this only proves the chip-select line can
    /// be driven.
    fn ping(&mut self) -> Result<(), Self::Error> {
        self.transaction(|_| Ok(()))
    }
}
