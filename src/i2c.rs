use embedded_hal::blocking::i2c::{Write, WriteRead};
use std::fmt::Debug;

use crate::bus::{Bus, BusKind};
use crate::regs;

/// The sensor on an I2C bus.
///
/// Works with any `embedded_hal` I2C peripheral. On a Raspberry Pi that is
/// `rppal::i2c::I2c`, see [`SoilMoistureSensor::init`](crate::SoilMoistureSensor::init).
pub struct I2cBus<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C, E> I2cBus<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
{
    pub fn new(i2c: I2C, address: u8) -> Self {
        I2cBus { i2c, address }
    }

    /// Talks to the sensor on its factory address.
    pub fn new_default(i2c: I2C) -> Self {
        Self::new(i2c, regs::address::DEFAULT_I2C_ADDRESS)
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Point the bus at a different address. Needed after the sensor has been
    /// given a new one with [`SoilMoisture::set_address`](crate::SoilMoisture::set_address).
    pub fn set_address(&mut self, address: u8) {
        debug!("I2C address {:#X} -> {:#X}", self.address, address);
        self.address = address;
    }

    /// Gives back the underlying peripheral.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> Bus for I2cBus<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
    E: Debug,
{
    type Error = E;

    fn kind(&self) -> BusKind {
        BusKind::I2c {
            address: self.address,
        }
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), E> {
        debug!("I2C {:#X} write: {:#04X}", self.address, byte);
        self.i2c.write(self.address, &[byte])
    }

    fn write_register_byte(&mut self, reg: u8, value: u8) -> Result<(), E> {
        debug!("I2C {:#X} write: {:#04X} {:#04X}", self.address, reg, value);
        self.i2c.write(self.address, &[reg, value])
    }

    fn read_register_word(&mut self, reg: u8) -> Result<u16, E> {
        let mut buff = [0u8; 2];
        self.i2c.write_read(self.address, &[reg], &mut buff)?;
        debug!("I2C {:#X} read {:#04X}: {:?}", self.address, reg, buff);
        // Low byte comes first on the wire.
        Ok(u16::from_le_bytes(buff))
    }

    fn ping(&mut self) -> Result<(), E> {
        // An empty write only succeeds if the address is acked.
        self.i2c.write(self.address, &[])
    }
}
