//! Ready-made sensors for a Raspberry Pi, using `rppal`.
use rppal::gpio::{self, Gpio, OutputPin};
use rppal::i2c::{self, I2c};
use rppal::spi::{self, Bus as SpiBusId, Mode, SlaveSelect, Spi};
use thiserror::Error;

use crate::{I2cBus, SoilMoisture, SpiBus, DEFAULT_I2C_ADDRESS, SPI_CLOCK_SPEED_HZ};

/// The sensor on the Pi's I2C bus.
pub type SoilMoistureSensor = SoilMoisture<I2cBus<I2c>>;

/// The sensor on one of the Pi's SPI buses, chip-select driven from a GPIO.
pub type SpiSoilMoistureSensor = SoilMoisture<SpiBus<Spi, OutputPin>>;

impl SoilMoisture<I2cBus<I2c>> {
    /// Opens the default I2C bus and connects to the sensor on its factory
    /// address.
    pub fn init() -> Result<Self, RpiError> {
        Self::init_with_address(DEFAULT_I2C_ADDRESS)
    }

    /// Opens the default I2C bus and connects to the sensor on `address`.
    pub fn init_with_address(address: u8) -> Result<Self, RpiError> {
        let channel = I2c::new()?;
        Self::init_with_channel(channel, address)
    }

    /// Creates an instance from a pre-set channel. Useful if the sensor sits
    /// behind a multiplexer or on a bus other than the default one.
    ///
    /// This still checks that the sensor answers.
    pub fn init_with_channel(channel: I2c, address: u8) -> Result<Self, RpiError> {
        debug!("Connecting to adr: {:#X}", address);
        let mut sensor = SoilMoisture::new();
        sensor.begin(I2cBus::new(channel, address)).map_err(|e| {
            debug!("No answer from {:#X}: {}", address, e);
            RpiError::HwNotFound
        })?;
        Ok(sensor)
    }
}

impl SoilMoisture<SpiBus<Spi, OutputPin>> {
    /// Opens `bus` at 100 kHz, mode 0, and drives chip-select from GPIO `cs_pin`.
    ///
    /// The kernel also toggles the line belonging to `slave_select`. That line
    /// must not be wired to the sensor.
    pub fn init_spi(bus: SpiBusId, slave_select: SlaveSelect, cs_pin: u8) -> Result<Self, RpiError> {
        let spi = Spi::new(bus, slave_select, SPI_CLOCK_SPEED_HZ, Mode::Mode0)?;
        let mut cs = Gpio::new()?.get(cs_pin)?.into_output();
        cs.set_high();

        debug!("Connecting to SPI sensor, cs: {}", cs_pin);
        let mut sensor = SoilMoisture::new();
        sensor.begin(SpiBus::new(spi, cs, cs_pin)).map_err(|e| {
            debug!("Chip-select {} unusable: {}", cs_pin, e);
            RpiError::HwNotFound
        })?;
        Ok(sensor)
    }
}

#[derive(Debug, Error)]
pub enum RpiError {
    #[error("Couldn't connect to the sensor.")]
    HwNotFound,
    #[error("I2C connection error. {source}")]
    I2C {
        #[from]
        source: i2c::Error,
    },
    #[error("SPI connection error. {source}")]
    Spi {
        #[from]
        source: spi::Error,
    },
    #[error("GPIO error. {source}")]
    Gpio {
        #[from]
        source: gpio::Error,
    },
}
