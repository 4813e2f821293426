//! The transport capabilities the sensor needs.
//!
//! [`SoilMoisture`](crate::SoilMoisture) never talks to a peripheral directly. It goes
//! through a [`Bus`], which is implemented for I2C by [`I2cBus`](crate::I2cBus) and
//! for SPI by [`SpiBus`](crate::SpiBus). Anything else that can move these few
//! bytes around (a multiplexer channel, a bit-banged bus, a test double) can
//! implement it too.

use std::fmt::Debug;

/// Which transport a bus is, without its identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusType {
    I2c,
    Spi,
}

/// Which transport a bus is, together with the identifier the sensor is
/// reachable under on that transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusKind {
    /// 7-bit I2C address of the sensor.
    I2c { address: u8 },
    /// Number of the GPIO driving the sensor's chip-select line.
    Spi { chip_select: u8 },
}

impl BusKind {
    pub fn bus_type(&self) -> BusType {
        match self {
            BusKind::I2c { .. } => BusType::I2c,
            BusKind::Spi { .. } => BusType::Spi,
        }
    }
}

pub trait Bus {
    type Error: Debug;

    /// Transport type and sensor identifier.
    fn kind(&self) -> BusKind;

    fn bus_type(&self) -> BusType {
        self.kind().bus_type()
    }

    /// Send a single raw byte, no register framing.
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Send a command byte followed by one data byte.
    fn write_register_byte(&mut self, reg: u8, value: u8) -> Result<(), Self::Error>;

    /// Send a command byte and read back a 16 bit word.
    fn read_register_word(&mut self, reg: u8) -> Result<u16, Self::Error>;

    /// Check that something answers on the other end.
    fn ping(&mut self) -> Result<(), Self::Error>;
}

impl<B: Bus + ?Sized> Bus for &mut B {
    type Error = B::Error;

    fn kind(&self) -> BusKind {
        (**self).kind()
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        (**self).write_byte(byte)
    }

    fn write_register_byte(&mut self, reg: u8, value: u8) -> Result<(), Self::Error> {
        (**self).write_register_byte(reg, value)
    }

    fn read_register_word(&mut self, reg: u8) -> Result<u16, Self::Error> {
        (**self).read_register_word(reg)
    }

    fn ping(&mut self) -> Result<(), Self::Error> {
        (**self).ping()
    }
}
