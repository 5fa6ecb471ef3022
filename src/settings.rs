//! Reading and writing individual settings.
//!
//! Setting ids are looked up by the caller, this module works on the
//! descriptors. Raw registers can be addressed as `modbus.<address>`.

use std::collections::BTreeMap;

use crate::{
    capability::{CapabilityFlags, Topology},
    catalog,
    error::{Error, Result},
    register::{Descriptor, RegisterBlock},
    transport::Transport,
    types::Value,
};

/// Prefix of raw register ids, e.g. `modbus.47510`.
pub const RAW_PREFIX: &str = "modbus.";

/// Every effective setting, `None` where the read failed.
pub type SettingsDump = BTreeMap<String, Option<Value>>;

/// Address of a raw register id.
pub fn parse_raw_id(id: &str) -> Option<u16> {
    id.strip_prefix(RAW_PREFIX)?.parse().ok()
}

/// The session state settings access works on.
pub struct SettingAccess<'a> {
    pub unit_id: u8,
    pub topology: Topology,
    pub flags: &'a mut CapabilityFlags,
}

impl SettingAccess<'_> {
    /// Members never answer the coordinator's registers, don't bother asking.
    fn check_topology<I: embedded_io::Error>(&self, address: u16) -> Result<(), I> {
        if self.topology == Topology::Member && catalog::is_coordinator_only(address) {
            log::debug!("Register {address} is only available on the coordinator");
            return Err(Error::Rejected(rmodbus::ErrorKind::IllegalDataAddress));
        }
        Ok(())
    }

    /// Read and decode one setting.
    ///
    /// A setting the device rejects with an illegal address is remembered as
    /// unsupported and reported as unknown.
    pub fn read<T: Transport>(
        &mut self,
        transport: &mut T,
        setting: &'static Descriptor,
    ) -> Result<Value, T::Error> {
        if setting.rule.is_derived() {
            return Err(Error::UnknownSetting(setting.id.into()));
        }
        self.check_topology(setting.offset)?;
        let data =
            match transport.read_registers(self.unit_id, setting.offset, setting.register_count()) {
                Ok(data) => data,
                Err(err) if err.is_illegal_address() => {
                    log::debug!("Setting {} not supported by the device", setting.id);
                    self.flags.mark_setting_unsupported(setting.id);
                    return Err(Error::UnknownSetting(setting.id.into()));
                }
                Err(err) => return Err(err),
            };
        setting
            .decode(&RegisterBlock::new(setting.offset, data))
            .ok_or(Error::InvalidResponse)
    }

    /// Encode and write one setting.
    ///
    /// Values are validated before anything is sent. Settings living in one
    /// byte of a register read the register first to keep the other byte.
    pub fn write<T: Transport>(
        &mut self,
        transport: &mut T,
        setting: &Descriptor,
        value: &Value,
    ) -> Result<(), T::Error> {
        let words = if setting.rule.is_sub_register() {
            // Validate against a blank register before the read.
            setting.encode::<T::Error>(value, Some(0))?;
            self.check_topology(setting.offset)?;
            let data = transport.read_registers(self.unit_id, setting.offset, 1)?;
            let current = RegisterBlock::new(setting.offset, data)
                .u16_at(setting.offset)
                .ok_or(Error::InvalidResponse)?;
            setting.encode(value, Some(current))?
        } else {
            let words = setting.encode(value, None)?;
            self.check_topology(setting.offset)?;
            words
        };

        log::debug!("Writing {} = {value} to {}", setting.id, setting.offset);
        match words.as_slice() {
            [word] => transport.write_register(self.unit_id, setting.offset, *word),
            _ => transport.write_registers(self.unit_id, setting.offset, &words),
        }
    }

    /// Read one raw register as a signed value.
    pub fn read_raw<T: Transport>(
        &mut self,
        transport: &mut T,
        address: u16,
    ) -> Result<Value, T::Error> {
        self.check_topology(address)?;
        let data = transport.read_registers(self.unit_id, address, 1)?;
        let value = RegisterBlock::new(address, data)
            .i16_at(address)
            .ok_or(Error::InvalidResponse)?;
        Ok(Value::Integer(value as i64))
    }

    /// Write one raw register. Negative values are sent as two's complement.
    pub fn write_raw<T: Transport>(
        &mut self,
        transport: &mut T,
        address: u16,
        value: &Value,
    ) -> Result<(), T::Error> {
        let id = format!("{RAW_PREFIX}{address}");
        let raw = value
            .as_i64()
            .ok_or_else(|| Error::invalid_value(&id, "expected an integer"))?;
        let word = match raw {
            0..=0xFFFF => raw as u16,
            -0x8000..0 => raw as i16 as u16,
            _ => return Err(Error::invalid_value(&id, "does not fit one register")),
        };
        self.write_words(transport, address, &[word])
    }

    /// Write raw words outside the catalog, one word as a single register write.
    pub fn write_words<T: Transport>(
        &mut self,
        transport: &mut T,
        address: u16,
        words: &[u16],
    ) -> Result<(), T::Error> {
        self.check_topology(address)?;
        match words {
            [word] => transport.write_register(self.unit_id, address, *word),
            _ => transport.write_registers(self.unit_id, address, words),
        }
    }

    /// Read every setting in `settings`, carrying on past failures.
    pub fn read_all<T: Transport>(
        &mut self,
        transport: &mut T,
        settings: &[&'static Descriptor],
    ) -> SettingsDump {
        let mut dump = SettingsDump::new();
        for &setting in settings {
            let value = match self.read(transport, setting) {
                Ok(value) => Some(value),
                Err(err) => {
                    log::warn!("Failed to read setting {}: {err}", setting.id);
                    None
                }
            };
            dump.insert(setting.id.to_string(), value);
        }
        dump
    }
}
