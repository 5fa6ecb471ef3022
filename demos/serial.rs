use std::env;

use goodwe_et::{Inverter, ObservationRange, RtuTransport, SessionConfig};
use inquire::Select;
use serialport::SerialPort;

// Configuration constants - adjust these for your setup
const BAUD_RATE: u32 = 9600;
// Large blocks take a while at 9600 baud.
const SERIAL_TIMEOUT_MS: u64 = 1000;
const MODBUS_UNIT_ID: u8 = 0xF7;

pub struct PortWrapper(Box<dyn SerialPort>);

#[derive(Debug)]
pub struct IoError(std::io::Error);

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl embedded_io::Error for IoError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self.0.kind() {
            std::io::ErrorKind::NotFound => embedded_io::ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => embedded_io::ErrorKind::PermissionDenied,
            std::io::ErrorKind::BrokenPipe => embedded_io::ErrorKind::BrokenPipe,
            std::io::ErrorKind::InvalidInput => embedded_io::ErrorKind::InvalidInput,
            std::io::ErrorKind::InvalidData => embedded_io::ErrorKind::InvalidData,
            std::io::ErrorKind::TimedOut => embedded_io::ErrorKind::TimedOut,
            std::io::ErrorKind::Interrupted => embedded_io::ErrorKind::Interrupted,
            std::io::ErrorKind::Unsupported => embedded_io::ErrorKind::Unsupported,
            _ => embedded_io::ErrorKind::Other,
        }
    }
}

impl embedded_io::ErrorType for PortWrapper {
    type Error = IoError;
}

impl embedded_io::Read for PortWrapper {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        std::io::Read::read(&mut self.0, buf).map_err(IoError)
    }
}

impl embedded_io::Write for PortWrapper {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        std::io::Write::write(&mut self.0, buf).map_err(IoError)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        std::io::Write::flush(&mut self.0).map_err(IoError)
    }
}

fn main() {
    simple_logger::init_with_level(log::Level::Debug).expect("Failed to set up logging");

    // Get serial port from command line arg or interactive selection
    let port_name = env::args().nth(1).unwrap_or_else(|| {
        let ports = serialport::available_ports().expect("Failed to enumerate serial ports");

        if ports.is_empty() {
            eprintln!("No serial ports found!");
            std::process::exit(1);
        }

        let port_names: Vec<String> = ports.iter().map(|p| p.port_name.clone()).collect();

        Select::new("Select a serial port:", port_names)
            .prompt()
            .expect("Failed to select port")
    });

    println!("Using port: {}", port_name);

    let port = serialport::new(&port_name, BAUD_RATE)
        .timeout(std::time::Duration::from_millis(SERIAL_TIMEOUT_MS))
        .open()
        .expect("Failed to open serial port");

    let transport: RtuTransport<PortWrapper> = RtuTransport::new(PortWrapper(port));
    let config = SessionConfig::new()
        .with_unit_id(MODBUS_UNIT_ID)
        .observe(ObservationRange::R55xxx);
    let mut inverter = Inverter::with_config(transport, config);

    let identity = inverter.identify().unwrap();
    println!("{:#?}", identity);
    println!("Topology: {}", inverter.topology());
    println!("Operation modes: {:?}", inverter.operation_modes(true));

    println!("\n--- Sensors ---");
    for sensor in inverter.list_sensors().unwrap() {
        println!("{:<40} {:>6}  {}", sensor.id, sensor.offset, sensor.label);
    }

    println!("\n--- Poll ---");
    let snapshot = inverter.poll().unwrap();
    for (id, value) in &snapshot {
        println!("{:<40} {}", id, value);
    }

    println!("\n--- Settings ---");
    let settings = inverter.read_all_settings().unwrap();
    for (id, value) in &settings {
        match value {
            Some(value) => println!("{:<40} {}", id, value),
            None => println!("{:<40} -", id),
        }
    }

    println!("\nOperation mode: {:?}", inverter.get_operation_mode().unwrap());

    if inverter.topology() == goodwe_et::Topology::Coordinator {
        let discovery = inverter.discover_members().unwrap();
        println!("\n--- Members ({} expected) ---", discovery.expected);
        for (unit, member) in &discovery.members {
            println!("{:>3}  {}  {}", unit, member.serial_number, member.display_prefix);
        }
    }
}
