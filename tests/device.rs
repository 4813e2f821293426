use sparkfun_soil_moisture::{
    Bus, BusKind, BusType, SoilMoisture, SoilMoistureError, DEFAULT_I2C_ADDRESS,
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Call {
    WriteByte(u8),
    WriteRegisterByte(u8, u8),
    ReadRegisterWord(u8),
    Ping,
}

#[derive(Debug, PartialEq)]
struct Nack;

/// Bus double that records every call and answers from canned values.
struct RecordingBus {
    kind: BusKind,
    calls: Vec<Call>,
    reachable: bool,
    fail_writes: bool,
    value: Option<u16>,
}

impl RecordingBus {
    fn i2c(address: u8) -> Self {
        RecordingBus {
            kind: BusKind::I2c { address },
            calls: Vec::new(),
            reachable: true,
            fail_writes: false,
            value: Some(512),
        }
    }

    fn spi(chip_select: u8) -> Self {
        RecordingBus {
            kind: BusKind::Spi { chip_select },
            ..Self::i2c(0)
        }
    }

    fn writes(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::WriteByte(_) | Call::WriteRegisterByte(..)))
            .count()
    }
}

impl Bus for RecordingBus {
    type Error = Nack;

    fn kind(&self) -> BusKind {
        self.kind
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Nack> {
        self.calls.push(Call::WriteByte(byte));
        if self.fail_writes {
            Err(Nack)
        } else {
            Ok(())
        }
    }

    fn write_register_byte(&mut self, reg: u8, value: u8) -> Result<(), Nack> {
        self.calls.push(Call::WriteRegisterByte(reg, value));
        if self.fail_writes {
            Err(Nack)
        } else {
            Ok(())
        }
    }

    fn read_register_word(&mut self, reg: u8) -> Result<u16, Nack> {
        self.calls.push(Call::ReadRegisterWord(reg));
        self.value.ok_or(Nack)
    }

    fn ping(&mut self) -> Result<(), Nack> {
        self.calls.push(Call::Ping);
        if self.reachable {
            Ok(())
        } else {
            Err(Nack)
        }
    }
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn begin_succeeds_when_ping_answers() {
    init_logger();
    let mut bus = RecordingBus::i2c(DEFAULT_I2C_ADDRESS);
    let mut sensor = SoilMoisture::new();
    assert!(sensor.begin(&mut bus).is_ok());
    assert!(sensor.is_connected());
    drop(sensor);
    assert_eq!(bus.calls, vec![Call::Ping, Call::Ping]);
}

#[test]
fn begin_fails_when_ping_fails() {
    init_logger();
    let mut bus = RecordingBus::i2c(DEFAULT_I2C_ADDRESS);
    bus.reachable = false;
    let mut sensor = SoilMoisture::new();
    assert_eq!(
        sensor.begin(&mut bus).map_err(|e| matches!(e, SoilMoistureError::Bus(Nack))),
        Err(true)
    );
    assert!(!sensor.is_connected());
    assert!(sensor.is_bound());
}

#[test]
fn nothing_reaches_the_bus_before_begin() {
    init_logger();
    let mut sensor: SoilMoisture<RecordingBus> = SoilMoisture::new();
    assert!(matches!(sensor.led_on(), Err(SoilMoistureError::BusNotInitialized)));
    assert!(matches!(sensor.led_off(), Err(SoilMoistureError::BusNotInitialized)));
    assert!(matches!(
        sensor.set_address(0x30),
        Err(SoilMoistureError::BusNotInitialized)
    ));
    assert!(matches!(
        sensor.try_read_moisture_value(),
        Err(SoilMoistureError::BusNotInitialized)
    ));
    assert_eq!(sensor.read_moisture_value(), 0);
    assert_eq!(sensor.read_moisture_ratio(), 0.0);
    assert_eq!(sensor.read_moisture_percentage(), 0.0);
    assert_eq!(sensor.address(), 0);
    assert!(!sensor.is_connected());
    assert!(sensor.release().is_none());
}

#[test]
fn led_commands_are_single_raw_bytes() {
    init_logger();
    let mut bus = RecordingBus::i2c(DEFAULT_I2C_ADDRESS);
    let mut sensor = SoilMoisture::new();
    sensor.begin(&mut bus).unwrap();
    sensor.led_on().unwrap();
    sensor.led_off().unwrap();
    drop(sensor);
    assert_eq!(
        bus.calls,
        vec![Call::Ping, Call::WriteByte(0x01), Call::WriteByte(0x00)]
    );
}

#[test]
fn led_errors_are_propagated() {
    init_logger();
    let mut bus = RecordingBus::spi(5);
    bus.fail_writes = true;
    let mut sensor = SoilMoisture::new();
    sensor.begin(&mut bus).unwrap();
    assert!(matches!(sensor.led_on(), Err(SoilMoistureError::Bus(Nack))));
}

#[test]
fn moisture_reads_use_get_value_command() {
    init_logger();
    let mut bus = RecordingBus::i2c(DEFAULT_I2C_ADDRESS);
    bus.value = Some(0);
    let mut sensor = SoilMoisture::new();
    sensor.begin(&mut bus).unwrap();
    assert_eq!(sensor.read_moisture_value(), 0);
    assert_eq!(sensor.read_moisture_ratio(), 1.0);
    assert_eq!(sensor.read_moisture_percentage(), 100.0);

    sensor.bus_mut().unwrap().value = Some(1023);
    assert_eq!(sensor.read_moisture_percentage(), 0.0);

    let calls = sensor.release().unwrap().calls.clone();
    assert_eq!(
        calls,
        vec![
            Call::Ping,
            Call::ReadRegisterWord(0x05),
            Call::ReadRegisterWord(0x05),
            Call::ReadRegisterWord(0x05),
            Call::ReadRegisterWord(0x05),
        ]
    );
}

#[test]
fn failed_read_collapses_to_zero() {
    init_logger();
    let mut bus = RecordingBus::i2c(DEFAULT_I2C_ADDRESS);
    bus.value = None;
    let mut sensor = SoilMoisture::new();
    sensor.begin(&mut bus).unwrap();
    assert_eq!(sensor.read_moisture_value(), 0);
    assert_eq!(sensor.read_moisture_percentage(), 100.0);
    assert!(matches!(
        sensor.try_read_moisture_value(),
        Err(SoilMoistureError::Bus(Nack))
    ));
}

#[test]
fn set_address_bounds() {
    init_logger();
    let mut bus = RecordingBus::i2c(DEFAULT_I2C_ADDRESS);
    let mut sensor = SoilMoisture::new();
    sensor.begin(&mut bus).unwrap();

    assert!(matches!(
        sensor.set_address(0x06),
        Err(SoilMoistureError::InvalidAddress(0x06))
    ));
    assert!(matches!(
        sensor.set_address(0x79),
        Err(SoilMoistureError::InvalidAddress(0x79))
    ));
    assert!(sensor.set_address(0x07).is_ok());
    assert!(sensor.set_address(0x78).is_ok());
    drop(sensor);

    assert_eq!(
        bus.calls,
        vec![
            Call::Ping,
            Call::WriteRegisterByte(0x03, 0x07),
            Call::WriteRegisterByte(0x03, 0x78),
        ]
    );
}

#[test]
fn set_address_to_current_i2c_address_is_noop() {
    init_logger();
    let mut bus = RecordingBus::i2c(0x30);
    let mut sensor = SoilMoisture::new();
    sensor.begin(&mut bus).unwrap();
    assert!(sensor.set_address(0x30).is_ok());
    drop(sensor);
    assert_eq!(bus.writes(), 0);
}

/// On SPI the "address" is a pin number, so a matching value is not a no-op.
#[test]
fn set_address_on_spi_always_writes() {
    init_logger();
    let mut bus = RecordingBus::spi(0x30);
    let mut sensor = SoilMoisture::new();
    sensor.begin(&mut bus).unwrap();
    assert!(sensor.set_address(0x30).is_ok());
    drop(sensor);
    assert_eq!(bus.writes(), 1);
}

#[test]
fn set_address_masks_transfer_error() {
    init_logger();
    let mut bus = RecordingBus::i2c(DEFAULT_I2C_ADDRESS);
    bus.fail_writes = true;
    let mut sensor = SoilMoisture::new();
    sensor.begin(&mut bus).unwrap();
    assert!(sensor.set_address(0x42).is_ok());
    drop(sensor);
    assert_eq!(bus.writes(), 1);
}

#[test]
fn address_depends_on_bus_type() {
    init_logger();
    let mut sensor = SoilMoisture::new();
    sensor.begin(RecordingBus::i2c(0x28)).unwrap();
    assert_eq!(sensor.address(), 0x28);
    assert_eq!(sensor.bus_type(), Some(BusType::I2c));

    let mut sensor = SoilMoisture::new();
    sensor.begin(RecordingBus::spi(17)).unwrap();
    assert_eq!(sensor.address(), 17);
    assert_eq!(sensor.bus_type(), Some(BusType::Spi));
}
