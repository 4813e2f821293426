//! Commands understood by the sensor firmware.
//!
//! The sensor has no real register map. Every transaction starts with a single
//! command byte; some commands carry one data byte, one answers with a word.

/// Turn the on-board LED off. Sent as a raw byte.
pub const COMMAND_LED_OFF: u8 = 0x00;
/// Turn the on-board LED on. Sent as a raw byte.
pub const COMMAND_LED_ON: u8 = 0x01;
/// Change the device address. Followed by the new address byte.
pub const COMMAND_CHANGE_ADDRESS: u8 = 0x03;
/// Answers with the 10-bit moisture value as a little-endian word.
pub const COMMAND_GET_VALUE: u8 = 0x05;
/// Sensor-side "nothing new" marker. Never sent by the driver.
#[allow(dead_code)]
pub const COMMAND_NOTHING_NEW: u8 = 0x99;

pub mod address {
    //! Addressing limits
    /// Address the sensor ships with.
    pub const DEFAULT_I2C_ADDRESS: u8 = 0x28;
    /// Lowest address the sensor accepts on reassignment.
    pub const MIN_ADDRESS: u8 = 0x07;
    /// Highest address the sensor accepts on reassignment.
    pub const MAX_ADDRESS: u8 = 0x78;
}

pub mod spi {
    //! SPI framing
    /// Set on the command byte of every SPI read.
    pub const READ_FLAG: u8 = 0x80;
    /// Clock the sensor is specified for.
    pub const CLOCK_SPEED_HZ: u32 = 100_000;
}
