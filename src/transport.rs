//! The register I/O seam between the session logic and the wire.
//!
//! Everything above this module only ever sees [`Transport`]: a strict
//! command/response channel which either returns register bytes, reports an
//! explicit device rejection ([`Error::Rejected`]) or fails to deliver a usable
//! response at all.

use embedded_io::Error as _;

use crate::error::{Error, Result};

/// Modbus function codes we frame ourselves when measuring responses.
const FN_READ_HOLDINGS: u8 = 0x03;
/// Exception responses have the high bit of the function code set.
const EXCEPTION_FLAG: u8 = 0x80;

/// Register level access to one physical link.
///
/// Every call is addressed to a unit id, so the same link can reach the members
/// of a multi-unit system.
pub trait Transport {
    type Error: embedded_io::Error;

    /// Largest number of registers a single read may request.
    const MAX_REGISTERS_PER_READ: u16 = 125;

    /// Read `count` holding registers from `address`, returning the raw big endian bytes.
    fn read_registers(
        &mut self,
        unit_id: u8,
        address: u16,
        count: u16,
    ) -> Result<Vec<u8>, Self::Error>;

    /// Write a single holding register.
    fn write_register(&mut self, unit_id: u8, address: u16, value: u16)
    -> Result<(), Self::Error>;

    /// Write multiple, sequential holding registers.
    fn write_registers(
        &mut self,
        unit_id: u8,
        address: u16,
        values: &[u16],
    ) -> Result<(), Self::Error>;
}

/// Modbus RTU over any interface which implements [embedded_io::Read] & [embedded_io::Write].
///
/// `L` bounds the frame buffers, the default fits a full 125 register response.
pub struct RtuTransport<S: embedded_io::Read + embedded_io::Write, const L: usize = 256> {
    interface: S,
}

impl<S: embedded_io::Read + embedded_io::Write, const L: usize> RtuTransport<S, L> {
    pub fn new(interface: S) -> Self {
        Self { interface }
    }

    /// Give back the wrapped interface.
    pub fn into_inner(self) -> S {
        self.interface
    }

    /// Send a request frame and collect exactly one response frame.
    fn exchange(
        &mut self,
        request: &[u8],
        response: &mut heapless::Vec<u8, L>,
    ) -> Result<(), S::Error> {
        self.interface
            .write_all(request)
            .map_err(Error::SerialError)?;

        response.clear();
        let mut temp_buf = [0u8; 32];
        loop {
            let wanted = match expected_frame_len(response) {
                Some(total) if response.len() >= total => break,
                Some(total) => total - response.len(),
                None => 3 - response.len(),
            };
            let chunk = wanted.min(temp_buf.len());
            match self.interface.read(&mut temp_buf[..chunk]) {
                Ok(0) => return Err(Error::Timeout),
                Ok(bytes_read) => {
                    if response.extend_from_slice(&temp_buf[..bytes_read]).is_err() {
                        return Err(Error::BufferError);
                    }
                }
                Err(e) => {
                    let kind = e.kind();
                    // A stalled partial frame still goes to the parser, which reports it.
                    if matches!(
                        kind,
                        embedded_io::ErrorKind::Other | embedded_io::ErrorKind::TimedOut
                    ) && !response.is_empty()
                    {
                        break;
                    }
                    if kind == embedded_io::ErrorKind::TimedOut {
                        return Err(Error::Timeout);
                    }
                    return Err(Error::SerialError(e));
                }
            }
        }
        Ok(())
    }
}

/// Total length of the RTU response frame in `buf`, once enough of it is known.
fn expected_frame_len(buf: &[u8]) -> Option<usize> {
    if buf.len() < 3 {
        return None;
    }
    let function = buf[1];
    if function & EXCEPTION_FLAG != 0 {
        // unit + function + exception code + crc
        Some(5)
    } else if function == FN_READ_HOLDINGS {
        // unit + function + byte count + data + crc
        Some(3 + buf[2] as usize + 2)
    } else {
        // Write responses echo unit, function, address, value/count and crc.
        Some(8)
    }
}

impl<S: embedded_io::Read + embedded_io::Write, const L: usize> Transport for RtuTransport<S, L> {
    type Error = S::Error;

    fn read_registers(
        &mut self,
        unit_id: u8,
        address: u16,
        count: u16,
    ) -> Result<Vec<u8>, S::Error> {
        let mut buff: heapless::Vec<u8, L> = heapless::Vec::new();
        let mut req = rmodbus::client::ModbusRequest::new(unit_id, rmodbus::ModbusProto::Rtu);
        req.generate_get_holdings(address, count, &mut buff)?;

        let request = buff.clone();
        self.exchange(&request, &mut buff)?;

        let mut parsed_data: heapless::Vec<u16, 128> = heapless::Vec::new();
        req.parse_u16(&buff, &mut parsed_data)?;
        if parsed_data.len() != count as usize {
            return Err(Error::InvalidResponse);
        }

        Ok(parsed_data.iter().flat_map(|word| word.to_be_bytes()).collect())
    }

    fn write_register(&mut self, unit_id: u8, address: u16, value: u16) -> Result<(), S::Error> {
        let mut buff: heapless::Vec<u8, L> = heapless::Vec::new();
        let mut req = rmodbus::client::ModbusRequest::new(unit_id, rmodbus::ModbusProto::Rtu);
        req.generate_set_holding(address, value, &mut buff)?;

        let request = buff.clone();
        self.exchange(&request, &mut buff)?;
        req.parse_ok(&buff)?;
        Ok(())
    }

    fn write_registers(
        &mut self,
        unit_id: u8,
        address: u16,
        values: &[u16],
    ) -> Result<(), S::Error> {
        let mut buff: heapless::Vec<u8, L> = heapless::Vec::new();
        let mut req = rmodbus::client::ModbusRequest::new(unit_id, rmodbus::ModbusProto::Rtu);
        req.generate_set_holdings_bulk(address, values, &mut buff)?;

        let request = buff.clone();
        self.exchange(&request, &mut buff)?;
        req.parse_ok(&buff)?;
        Ok(())
    }
}
