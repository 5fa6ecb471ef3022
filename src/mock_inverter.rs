//! A register map fake of an ET inverter, used by unit tests in place of a real link.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    error::{Error, Result},
    mock_serial::MockSerialError,
    transport::Transport,
};

/// Default Modbus address of the inverter.
pub const UNIT: u8 = 0xF7;

/// One request as seen by the fake device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Read { unit: u8, address: u16, count: u16 },
    WriteSingle { unit: u8, address: u16, value: u16 },
    Write { unit: u8, address: u16, values: Vec<u16> },
}

impl Request {
    pub fn address(&self) -> u16 {
        match self {
            Request::Read { address, .. }
            | Request::WriteSingle { address, .. }
            | Request::Write { address, .. } => *address,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Fault {
    IllegalAddress,
    Busy,
    Timeout,
}

/// Registers read back as 0 unless set. Units never added time out.
#[derive(Debug, Default)]
pub struct MockInverter {
    units: BTreeSet<u8>,
    registers: BTreeMap<(u8, u16), u16>,
    faults: Vec<(u16, u16, Fault)>,
    requests: Vec<Request>,
}

impl MockInverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A standalone ET inverter answering on [`UNIT`].
    pub fn et(serial_number: &str, rated_power: u16) -> Self {
        let mut inverter = Self::new();
        inverter.units.insert(UNIT);
        inverter.set_register(35000, 1);
        inverter.set_register(35001, rated_power);
        inverter.set_register(35002, 1);
        inverter.set_ascii(UNIT, 35003, serial_number);
        inverter.set_ascii(UNIT, 35011, "GW-ET");
        inverter.set_register(35019, 22);
        inverter.set_ascii(UNIT, 35021, "04029-22-S11");
        inverter.set_ascii(UNIT, 35027, "02041-22-S00");
        inverter.set_register(10400, 1);
        inverter
    }

    /// Another unit of a multi-unit system on the same link.
    pub fn add_member(&mut self, unit: u8, serial_number: &str) {
        self.units.insert(unit);
        self.set_ascii(unit, 35003, serial_number);
    }

    pub fn set_register(&mut self, address: u16, value: u16) {
        self.registers.insert((UNIT, address), value);
    }

    pub fn set_registers(&mut self, address: u16, values: &[u16]) {
        for (i, value) in values.iter().enumerate() {
            self.set_register(address + i as u16, *value);
        }
    }

    pub fn set_i32(&mut self, address: u16, value: i32) {
        let raw = value as u32;
        self.set_registers(address, &[(raw >> 16) as u16, raw as u16]);
    }

    pub fn set_ascii(&mut self, unit: u8, address: u16, text: &str) {
        for (i, pair) in text.as_bytes().chunks(2).enumerate() {
            let word = u16::from_be_bytes([pair[0], pair.get(1).copied().unwrap_or(0)]);
            self.registers.insert((unit, address + i as u16), word);
        }
    }

    pub fn register(&self, address: u16) -> u16 {
        self.registers.get(&(UNIT, address)).copied().unwrap_or(0)
    }

    /// Answer requests touching `first..=last` with an illegal data address exception.
    pub fn reject_range(&mut self, first: u16, last: u16) {
        self.faults.push((first, last, Fault::IllegalAddress));
    }

    /// Answer requests touching `first..=last` with a device busy exception.
    pub fn busy_range(&mut self, first: u16, last: u16) {
        self.faults.push((first, last, Fault::Busy));
    }

    /// Let requests touching `first..=last` time out.
    pub fn fail_range(&mut self, first: u16, last: u16) {
        self.faults.push((first, last, Fault::Timeout));
    }

    /// Forget every fault, e.g. to model a firmware update between sessions.
    pub fn clear_faults(&mut self) {
        self.faults.clear();
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    pub fn clear_requests(&mut self) {
        self.requests.clear();
    }

    /// Reads issued to `address` so far.
    pub fn reads_at(&self, address: u16) -> usize {
        self.requests
            .iter()
            .filter(|request| matches!(request, Request::Read { address: a, .. } if *a == address))
            .count()
    }

    fn check(&self, unit: u8, address: u16, count: u16) -> Result<(), MockSerialError> {
        if !self.units.contains(&unit) {
            return Err(Error::Timeout);
        }
        let last = address.saturating_add(count.saturating_sub(1));
        let fault = self
            .faults
            .iter()
            .find(|(first, end, _)| address <= *end && last >= *first)
            .map(|(_, _, fault)| *fault);
        match fault {
            Some(Fault::IllegalAddress) => {
                Err(Error::Rejected(rmodbus::ErrorKind::IllegalDataAddress))
            }
            Some(Fault::Busy) => Err(Error::Rejected(rmodbus::ErrorKind::SlaveDeviceBusy)),
            Some(Fault::Timeout) => Err(Error::SerialError(MockSerialError::Timeout)),
            None => Ok(()),
        }
    }
}

impl Transport for MockInverter {
    type Error = MockSerialError;

    fn read_registers(
        &mut self,
        unit_id: u8,
        address: u16,
        count: u16,
    ) -> Result<Vec<u8>, MockSerialError> {
        self.requests.push(Request::Read {
            unit: unit_id,
            address,
            count,
        });
        self.check(unit_id, address, count)?;
        Ok((address..address + count)
            .flat_map(|at| {
                self.registers
                    .get(&(unit_id, at))
                    .copied()
                    .unwrap_or(0)
                    .to_be_bytes()
            })
            .collect())
    }

    fn write_register(
        &mut self,
        unit_id: u8,
        address: u16,
        value: u16,
    ) -> Result<(), MockSerialError> {
        self.requests.push(Request::WriteSingle {
            unit: unit_id,
            address,
            value,
        });
        self.check(unit_id, address, 1)?;
        self.registers.insert((unit_id, address), value);
        Ok(())
    }

    fn write_registers(
        &mut self,
        unit_id: u8,
        address: u16,
        values: &[u16],
    ) -> Result<(), MockSerialError> {
        self.requests.push(Request::Write {
            unit: unit_id,
            address,
            values: values.to_vec(),
        });
        self.check(unit_id, address, values.len() as u16)?;
        for (i, value) in values.iter().enumerate() {
            self.registers.insert((unit_id, address + i as u16), *value);
        }
        Ok(())
    }
}
