//! Library for driving the SparkFun Qwiic Soil Moisture Sensor.
//!
//! The sensor is a resistive probe with a small microcontroller on board. It answers a
//! handful of single-byte commands: read the moisture value, switch the on-board LED and
//! change its bus address. It can be wired over I2C or SPI; both are handled by the same
//! [`SoilMoisture`] device, parameterized over a [`Bus`].
//!
//! The readings are a 10-bit resistance proxy where **0 is wet and 1023 is dry**. The
//! derived ratio and percentage are inverted: 1.0 (100%) is wet, 0.0 (0%) is dry.
//!
//! ## Example
//!
//! ```rust, ignore
//! pub fn main(interval_ms: u64) {
//!    use sparkfun_soil_moisture::SoilMoistureSensor;
//!    use std::{thread, time::Duration};
//!
//!    let mut sensor = SoilMoistureSensor::init().unwrap();
//!
//!    loop {
//!        sensor.led_on().unwrap();
//!        let raw = sensor.read_moisture_value();
//!        let pct = sensor.read_moisture_percentage();
//!        sensor.led_off().unwrap();
//!        println!("The raw value is: {}", raw);
//!        println!("The moisture is: {:.01}%", pct);
//!        thread::sleep(Duration::from_millis(interval_ms));
//!    }
//!}
//! ```
//!
//! Any `embedded_hal` peripheral works as well:
//!
//! ```rust, ignore
//! use sparkfun_soil_moisture::{I2cBus, SoilMoisture, DEFAULT_I2C_ADDRESS};
//!
//! let mut bus = I2cBus::new(i2c, DEFAULT_I2C_ADDRESS);
//! let mut sensor = SoilMoisture::new();
//! sensor.begin(&mut bus)?;
//! ```
//!
//! ## Debugging
//!
//! Every bus transaction is logged with `debug!`. Attaching a logger and setting
//! `RUST_LOG=debug` will show what goes over the wire.
//!
#[macro_use]
extern crate log;
use std::fmt::Debug;
use thiserror::Error;

mod bus;
mod i2c;
mod regs;
#[cfg(feature = "rpi")]
mod rpi;
mod spi;

pub use crate::bus::{Bus, BusKind, BusType};
pub use crate::i2c::I2cBus;
pub use crate::regs::address::{DEFAULT_I2C_ADDRESS, MAX_ADDRESS, MIN_ADDRESS};
pub use crate::regs::spi::CLOCK_SPEED_HZ as SPI_CLOCK_SPEED_HZ;
#[cfg(feature = "rpi")]
pub use crate::rpi::{RpiError, SoilMoistureSensor, SpiSoilMoistureSensor};
pub use crate::spi::{SpiBus, SpiBusError};

/// Highest raw reading, a fully dry probe. 2^10 - 1.
pub const MAX_VALUE: u16 = 1023;

/// SPI mode the sensor expects. Bits go MSB first.
pub const SPI_MODE: embedded_hal::spi::Mode = embedded_hal::spi::MODE_0;

pub type Result<T, E> = std::result::Result<T, SoilMoistureError<E>>;

/// A soil moisture sensor on some bus.
///
/// Created unbound; [`begin`](SoilMoisture::begin) binds it to a bus. `B` can be an
/// owned bus or `&mut` to one the caller keeps.
pub struct SoilMoisture<B: Bus> {
    bus: Option<B>,
}

impl<B: Bus> Default for SoilMoisture<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Bus> SoilMoisture<B> {
    /// An unbound device. Everything except `begin` fails or returns its
    /// fallback value until a bus is bound.
    pub fn new() -> Self {
        SoilMoisture { bus: None }
    }

    /// Binds the device to `bus` and checks that the sensor answers.
    ///
    /// The bus stays bound even when the ping fails, so the device can be
    /// retried with [`is_connected`](SoilMoisture::is_connected). Binding again
    /// replaces the previous bus.
    pub fn begin(&mut self, bus: B) -> Result<(), B::Error> {
        debug!("Binding sensor on {:?}", bus.kind());
        self.bus.insert(bus).ping().map_err(|e| {
            debug!("Sensor did not answer: {:?}", e);
            SoilMoistureError::Bus(e)
        })
    }

    pub fn is_bound(&self) -> bool {
        self.bus.is_some()
    }

    /// Pings the sensor. `false` if nothing is bound.
    pub fn is_connected(&mut self) -> bool {
        match self.bus.as_mut() {
            Some(bus) => bus.ping().is_ok(),
            None => false,
        }
    }

    pub fn led_off(&mut self) -> Result<(), B::Error> {
        self.bus()?
            .write_byte(regs::COMMAND_LED_OFF)
            .map_err(SoilMoistureError::Bus)
    }

    pub fn led_on(&mut self) -> Result<(), B::Error> {
        self.bus()?
            .write_byte(regs::COMMAND_LED_ON)
            .map_err(SoilMoistureError::Bus)
    }

    /// Reads the raw moisture value, 0 (wet) to 1023 (dry).
    ///
    /// # Errors
    /// `BusNotInitialized` before `begin`, otherwise whatever the bus reports.
    pub fn try_read_moisture_value(&mut self) -> Result<u16, B::Error> {
        let val = self
            .bus()?
            .read_register_word(regs::COMMAND_GET_VALUE)
            .map_err(SoilMoistureError::Bus)?;
        debug!("Moisture value: {}", val);
        Ok(val)
    }

    /// Reads the raw moisture value, 0 (wet) to 1023 (dry).
    ///
    /// On any error this returns 0, which is indistinguishable from a fully wet
    /// probe. Use [`try_read_moisture_value`](SoilMoisture::try_read_moisture_value)
    /// to tell the two apart.
    pub fn read_moisture_value(&mut self) -> u16 {
        match self.try_read_moisture_value() {
            Ok(val) => val,
            Err(e) => {
                warn!("Moisture read failed, reporting 0: {}", e);
                0
            }
        }
    }

    /// Moisture as a ratio, 0.0 (dry) to 1.0 (wet).
    ///
    /// 0.0 when nothing is bound. A failed read on a bound bus comes through as a
    /// raw 0 and therefore as 1.0.
    pub fn read_moisture_ratio(&mut self) -> f32 {
        if !self.is_bound() {
            return 0.0;
        }
        ratio_from_raw(self.read_moisture_value())
    }

    /// Moisture in percent, 0.0 (dry) to 100.0 (wet). Same fallbacks as
    /// [`read_moisture_ratio`](SoilMoisture::read_moisture_ratio).
    pub fn read_moisture_percentage(&mut self) -> f32 {
        self.read_moisture_ratio() * 100.0
    }

    /// Gives the sensor a new address. The sensor stores it persistently.
    ///
    /// The address must be within [`MIN_ADDRESS`]..=[`MAX_ADDRESS`]. Asking an I2C
    /// sensor for the address it already has does nothing.
    ///
    /// The sensor resets its bus interface as soon as it takes the command, so the
    /// transfer itself usually reports an error. That error is dropped and this
    /// returns `Ok` once the command has been sent. On I2C the bus has to be moved
    /// to the new address afterwards, see [`I2cBus::set_address`].
    pub fn set_address(&mut self, new_address: u8) -> Result<(), B::Error> {
        let bus = self.bus()?;

        if !(MIN_ADDRESS..=MAX_ADDRESS).contains(&new_address) {
            return Err(SoilMoistureError::InvalidAddress(new_address));
        }

        if bus.kind() == (BusKind::I2c { address: new_address }) {
            debug!("Sensor already at {:#X}", new_address);
            return Ok(());
        }

        debug!("Changing sensor address to {:#X}", new_address);
        if let Err(e) = bus.write_register_byte(regs::COMMAND_CHANGE_ADDRESS, new_address) {
            debug!("Ignoring error from address change: {:?}", e);
        }
        Ok(())
    }

    /// The I2C address of the sensor, or the chip-select pin on SPI. 0 when
    /// nothing is bound.
    pub fn address(&self) -> u8 {
        match self.bus.as_ref().map(Bus::kind) {
            Some(BusKind::I2c { address }) => address,
            Some(BusKind::Spi { chip_select }) => chip_select,
            None => 0,
        }
    }

    pub fn bus_type(&self) -> Option<BusType> {
        self.bus.as_ref().map(Bus::bus_type)
    }

    /// Access to the bound bus, e.g. to follow an address change.
    pub fn bus_mut(&mut self) -> Option<&mut B> {
        self.bus.as_mut()
    }

    /// Unbinds and returns the bus.
    pub fn release(self) -> Option<B> {
        self.bus
    }

    fn bus(&mut self) -> Result<&mut B, B::Error> {
        self.bus.as_mut().ok_or(SoilMoistureError::BusNotInitialized)
    }
}

/// Converts a raw reading to a ratio, 0.0 (dry) to 1.0 (wet). Readings above
/// [`MAX_VALUE`] count as dry.
pub fn ratio_from_raw(raw: u16) -> f32 {
    f32::from(MAX_VALUE.saturating_sub(raw)) / f32::from(MAX_VALUE)
}

/// Converts a raw reading to percent, 0.0 (dry) to 100.0 (wet).
pub fn percentage_from_raw(raw: u16) -> f32 {
    ratio_from_raw(raw) * 100.0
}

#[derive(Debug, Error)]
pub enum SoilMoistureError<E: Debug> {
    #[error("No bus bound to the sensor. Call begin first.")]
    BusNotInitialized,
    #[error("Invalid address: {0:#X}. Must be between 0x07 and 0x78.")]
    InvalidAddress(u8),
    #[error("Bus error. {0:?}")]
    Bus(E),
}
