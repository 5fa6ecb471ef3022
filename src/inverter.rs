use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::{
    capability::{CapabilityFlags, Feature, Topology},
    config::SessionConfig,
    discovery::{self, Discovery},
    error::{Error, Result},
    filter::{self, EffectiveCatalog},
    poll::{PollSession, Snapshot},
    prober,
    register::{Descriptor, RegisterBlock},
    settings::{self, SettingAccess, SettingsDump},
    tou::EcoModeGroup,
    transport::Transport,
    types::{DeviceIdentity, Value},
};

/// EMS mode and power, written together to switch the inverter on or off grid.
const EMS_MODE_REGISTER: u16 = 47511;
/// Writing 1 clears the eco mode battery parameters.
const CLEAR_BATTERY_PARAMS_REGISTER: u16 = 47533;

/// The inverter operation modes.
///
/// Eco charge and eco discharge are emulated: eco mode with the first eco mode
/// group charging or discharging around the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperationMode {
    General,
    #[strum(to_string = "Off-grid")]
    OffGrid,
    Backup,
    Eco,
    #[strum(to_string = "Peak shaving")]
    PeakShaving,
    #[strum(to_string = "Self-use")]
    SelfUse,
    #[strum(to_string = "Eco charge")]
    EcoCharge,
    #[strum(to_string = "Eco discharge")]
    EcoDischarge,
}

impl OperationMode {
    /// The `work_mode` value selecting this mode.
    pub const fn raw(&self) -> u16 {
        match self {
            OperationMode::General => 0,
            OperationMode::OffGrid => 1,
            OperationMode::Backup => 2,
            OperationMode::Eco | OperationMode::EcoCharge | OperationMode::EcoDischarge => 3,
            OperationMode::PeakShaving => 4,
            OperationMode::SelfUse => 5,
        }
    }

    pub const fn is_emulated(&self) -> bool {
        matches!(self, OperationMode::EcoCharge | OperationMode::EcoDischarge)
    }

    /// The mode a `work_mode` value selects, never an emulated one.
    pub fn from_raw(raw: u16) -> Option<Self> {
        Self::iter()
            .filter(|mode| !mode.is_emulated())
            .find(|mode| mode.raw() == raw)
    }
}

/// A session with one ET inverter over any [`Transport`].
///
/// Call [`Inverter::identify`] first, everything else fails with
/// [`Error::NotIdentified`] until then. Capabilities learnt while polling or
/// accessing settings stay with the session.
pub struct Inverter<T: Transport> {
    transport: T,
    config: SessionConfig,
    identity: Option<DeviceIdentity>,
    flags: CapabilityFlags,
    topology: Topology,
    unit_count: u16,
    catalog: EffectiveCatalog,
}

impl<T: Transport> Inverter<T> {
    /// Create a new session talking to the default unit id.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, SessionConfig::default())
    }

    pub fn with_config(transport: T, config: SessionConfig) -> Self {
        Self {
            transport,
            config,
            identity: None,
            flags: CapabilityFlags::new(),
            topology: Topology::default(),
            unit_count: 0,
            catalog: EffectiveCatalog::new(),
        }
    }

    /// Give back the transport, ending the session.
    pub fn into_inner(self) -> T {
        self.transport
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn identity(&self) -> Option<&DeviceIdentity> {
        self.identity.as_ref()
    }

    pub fn flags(&self) -> &CapabilityFlags {
        &self.flags
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Units reported by a coordinator, 0 when unknown.
    pub fn unit_count(&self) -> u16 {
        self.unit_count
    }

    fn require_identity(&self) -> Result<&DeviceIdentity, T::Error> {
        self.identity.as_ref().ok_or(Error::NotIdentified)
    }

    fn setting_access(&mut self) -> (SettingAccess<'_>, &mut T) {
        (
            SettingAccess {
                unit_id: self.config.unit_id,
                topology: self.topology,
                flags: &mut self.flags,
            },
            &mut self.transport,
        )
    }

    fn refresh_catalog(&mut self) {
        self.catalog.refresh(&self.flags, self.topology, &self.config.observe);
    }

    /// Identify the device and learn its capabilities.
    ///
    /// Running it again starts over with a fresh set of capabilities.
    pub fn identify(&mut self) -> Result<&DeviceIdentity, T::Error> {
        let identification = prober::identify(&mut self.transport, self.config.unit_id)?;
        self.flags = identification.flags;
        self.topology = identification.topology;
        self.unit_count = identification.unit_count;
        self.catalog = EffectiveCatalog::new();
        self.refresh_catalog();
        Ok(&*self.identity.insert(identification.identity))
    }

    /// Read one telemetry snapshot.
    pub fn poll(&mut self) -> Result<Snapshot, T::Error> {
        let serial_number = self.require_identity()?.serial_number.clone();
        let result = PollSession {
            unit_id: self.config.unit_id,
            config: &self.config,
            flags: &mut self.flags,
            topology: self.topology,
            serial_number: &serial_number,
        }
        .poll(&mut self.transport);
        self.refresh_catalog();
        result
    }

    /// The sensors a poll currently produces, in catalog order.
    pub fn list_sensors(&self) -> Result<&[&'static Descriptor], T::Error> {
        self.require_identity()?;
        Ok(self.catalog.sensors())
    }

    /// The settings currently accessible, in catalog order.
    pub fn list_settings(&self) -> Result<&[&'static Descriptor], T::Error> {
        self.require_identity()?;
        Ok(self.catalog.settings())
    }

    /// Read a single sensor without a full poll.
    ///
    /// Sensors computed from a whole block can only be had from [`Inverter::poll`].
    pub fn read_sensor(&mut self, id: &str) -> Result<Value, T::Error> {
        self.require_identity()?;
        if let Some(address) = settings::parse_raw_id(id) {
            let (mut access, transport) = self.setting_access();
            return access.read_raw(transport, address);
        }
        let sensor = self
            .catalog
            .sensor(id)
            .filter(|sensor| !sensor.rule.is_derived())
            .ok_or_else(|| Error::UnknownSensor(id.into()))?;
        let data = match self.transport.read_registers(
            self.config.unit_id,
            sensor.offset,
            sensor.register_count(),
        ) {
            Ok(data) => data,
            Err(err) if err.is_illegal_address() => {
                log::debug!("Sensor {id} not supported by the device");
                return Err(Error::UnknownSensor(id.into()));
            }
            Err(err) => return Err(err),
        };
        sensor
            .decode(&RegisterBlock::new(sensor.offset, data))
            .ok_or(Error::InvalidResponse)
    }

    /// Read a setting by id, or a raw register as `modbus.<address>`.
    pub fn get_setting(&mut self, id: &str) -> Result<Value, T::Error> {
        self.require_identity()?;
        let result = if let Some(address) = settings::parse_raw_id(id) {
            let (mut access, transport) = self.setting_access();
            access.read_raw(transport, address)
        } else {
            let setting = filter::find_setting(id, &self.flags)
                .ok_or_else(|| Error::UnknownSetting(id.into()))?;
            let (mut access, transport) = self.setting_access();
            access.read(transport, setting)
        };
        self.refresh_catalog();
        result
    }

    /// Write a setting by id, or a raw register as `modbus.<address>`.
    pub fn set_setting(&mut self, id: &str, value: &Value) -> Result<(), T::Error> {
        self.require_identity()?;
        if let Some(address) = settings::parse_raw_id(id) {
            let (mut access, transport) = self.setting_access();
            return access.write_raw(transport, address, value);
        }
        let setting = filter::find_setting(id, &self.flags)
            .ok_or_else(|| Error::UnknownSetting(id.into()))?;
        let (mut access, transport) = self.setting_access();
        access.write(transport, setting, value)
    }

    /// Read every accessible setting, `None` for those which failed.
    pub fn read_all_settings(&mut self) -> Result<SettingsDump, T::Error> {
        self.require_identity()?;
        let settings = self.catalog.settings().to_vec();
        let (mut access, transport) = self.setting_access();
        let dump = access.read_all(transport, &settings);
        self.refresh_catalog();
        Ok(dump)
    }

    /// Find the members of the multi-unit system this inverter coordinates.
    pub fn discover_members(&mut self) -> Result<Discovery, T::Error> {
        self.require_identity()?;
        discovery::discover_members(&mut self.transport, self.config.unit_id, self.topology)
    }

    /// Operation modes this inverter supports, optionally with the emulated ones.
    pub fn operation_modes(&self, include_emulated: bool) -> Vec<OperationMode> {
        OperationMode::iter()
            .filter(|mode| match mode {
                OperationMode::PeakShaving => self.flags.is_enabled(Feature::PeakShaving),
                OperationMode::SelfUse => self.flags.platform.is_745(),
                OperationMode::EcoCharge | OperationMode::EcoDischarge => include_emulated,
                _ => true,
            })
            .collect()
    }

    /// The current operation mode, `None` for a `work_mode` value we don't know.
    ///
    /// In eco mode the first eco mode group tells the emulated modes apart.
    pub fn get_operation_mode(&mut self) -> Result<Option<OperationMode>, T::Error> {
        let raw = self.get_setting("work_mode")?;
        let mode = raw
            .as_i64()
            .and_then(|raw| u16::try_from(raw).ok())
            .and_then(OperationMode::from_raw);
        if mode.is_none() {
            log::debug!("Unknown work_mode value {raw}");
        }
        if mode != Some(OperationMode::Eco) {
            return Ok(mode);
        }
        Ok(Some(match self.get_setting("eco_mode_1")? {
            Value::EcoMode(group) if group.is_eco_charge_mode() => OperationMode::EcoCharge,
            Value::EcoMode(group) if group.is_eco_discharge_mode() => OperationMode::EcoDischarge,
            _ => OperationMode::Eco,
        }))
    }

    /// Switch operation mode. The emulated eco modes run at full power.
    pub fn set_operation_mode(&mut self, mode: OperationMode) -> Result<(), T::Error> {
        self.set_operation_mode_with(mode, 100, 100)
    }

    /// Switch operation mode, with the battery power and SoC in % for the
    /// emulated eco modes. The other modes ignore both.
    pub fn set_operation_mode_with(
        &mut self,
        mode: OperationMode,
        power: i64,
        soc: i64,
    ) -> Result<(), T::Error> {
        self.require_identity()?;
        if !self.operation_modes(true).contains(&mode) {
            return Err(Error::invalid_value(
                "work_mode",
                "operation mode not supported by this inverter",
            ));
        }
        if mode.is_emulated() {
            return self.set_eco_schedule(mode, power, soc);
        }
        log::debug!("Switching to {mode} mode");
        self.set_setting("work_mode", &Value::Integer(mode.raw() as i64))?;
        let offline = if mode == OperationMode::OffGrid { 7 } else { 1 };
        let (mut access, transport) = self.setting_access();
        access.write_words(transport, EMS_MODE_REGISTER, &[offline, 0])?;
        if mode == OperationMode::OffGrid {
            self.set_setting("backup_supply", &Value::Integer(1))?;
            self.set_setting("cold_start", &Value::Integer(4))?;
        }
        if mode != OperationMode::Eco {
            let (mut access, transport) = self.setting_access();
            access.write_words(transport, CLEAR_BATTERY_PARAMS_REGISTER, &[1])?;
        }
        Ok(())
    }

    /// Eco mode with the first group charging or discharging all day and the other groups off.
    ///
    /// The eco mode groups have no SoC target, `soc` is only validated.
    fn set_eco_schedule(
        &mut self,
        mode: OperationMode,
        power: i64,
        soc: i64,
    ) -> Result<(), T::Error> {
        let power = u8::try_from(power)
            .ok()
            .filter(|power| *power <= 100)
            .ok_or_else(|| Error::invalid_value("eco_mode_1", "power must be 0-100 %"))?;
        if !(0..=100).contains(&soc) {
            return Err(Error::invalid_value("eco_mode_1", "SoC must be 0-100 %"));
        }
        let group = if mode == OperationMode::EcoCharge {
            EcoModeGroup::charge(power)
        } else {
            EcoModeGroup::discharge(power)
        };
        log::debug!("Switching to {mode} mode at {power} %");
        self.set_setting("eco_mode_1", &Value::EcoMode(group))?;
        for id in ["eco_mode_2_switch", "eco_mode_3_switch", "eco_mode_4_switch"] {
            self.set_setting(id, &Value::Integer(0))?;
        }
        self.set_setting("work_mode", &Value::Integer(mode.raw() as i64))?;
        let (mut access, transport) = self.setting_access();
        access.write_words(transport, EMS_MODE_REGISTER, &[1, 0])
    }

    /// Grid export limit in W.
    pub fn get_grid_export_limit(&mut self) -> Result<i64, T::Error> {
        self.get_setting("grid_export_limit")?
            .as_i64()
            .ok_or(Error::InvalidResponse)
    }

    pub fn set_grid_export_limit(&mut self, watts: i64) -> Result<(), T::Error> {
        if watts < 0 {
            return Err(Error::invalid_value("grid_export_limit", "must not be negative"));
        }
        self.set_setting("grid_export_limit", &Value::Integer(watts))
    }

    /// Depth of discharge on grid in %, stored by the inverter as the remaining charge.
    pub fn get_ongrid_battery_dod(&mut self) -> Result<i64, T::Error> {
        let depth = self
            .get_setting("battery_discharge_depth")?
            .as_i64()
            .ok_or(Error::InvalidResponse)?;
        Ok(100 - depth)
    }

    pub fn set_ongrid_battery_dod(&mut self, dod: i64) -> Result<(), T::Error> {
        if !(0..=100).contains(&dod) {
            return Err(Error::invalid_value("battery_discharge_depth", "must be 0-100 %"));
        }
        self.set_setting("battery_discharge_depth", &Value::Integer(100 - dod))
    }

    /// `GW` plus the last four serial number characters, to tell units of one system apart.
    pub fn sensor_name_prefix(&self) -> Result<String, T::Error> {
        Ok(self.require_identity()?.sensor_name_prefix())
    }
}
