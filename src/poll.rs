//! One telemetry refresh: the block reads implied by the current capabilities,
//! stepping blocks down or out when the device rejects them.

use std::collections::BTreeMap;

use crate::{
    capability::{CapabilityFlags, MeterTier, Topology},
    catalog::{self, Block},
    config::SessionConfig,
    error::{Error, Result},
    filter,
    register::{RegisterBlock, round_to},
    transport::Transport,
    types::Value,
};

/// Decoded values of one poll, keyed by sensor id.
pub type Snapshot = BTreeMap<String, Value>;

/// Battery mode register of the running data block, 0 when no battery is connected.
const BATTERY_MODE: u16 = 35184;

/// Per phase meter current derived from multi-unit meter power and grid voltage.
const PARALLEL_CURRENTS: [(&str, &str, &str); 3] = [
    ("parallel_meter_current_l1_calc", "parallel_meter_active_power_r", "vgrid"),
    ("parallel_meter_current_l2_calc", "parallel_meter_active_power_s", "vgrid2"),
    ("parallel_meter_current_l3_calc", "parallel_meter_active_power_t", "vgrid3"),
];

/// The session state a poll works on.
pub struct PollSession<'a> {
    pub unit_id: u8,
    pub config: &'a SessionConfig,
    pub flags: &'a mut CapabilityFlags,
    pub topology: Topology,
    pub serial_number: &'a str,
}

impl PollSession<'_> {
    /// Read the effective part of `block`. `Ok(None)` when nothing of it is effective.
    fn read_block<T: Transport>(
        &self,
        transport: &mut T,
        block: &Block,
    ) -> Result<Option<RegisterBlock>, T::Error> {
        let Some((start, count)) = filter::block_window(block, self.flags, self.topology) else {
            return Ok(None);
        };
        let data = transport.read_registers(self.unit_id, start, count)?;
        Ok(Some(RegisterBlock::new(start, data)))
    }

    fn decode_into(&self, snapshot: &mut Snapshot, block: &Block, data: &RegisterBlock) {
        for descriptor in block
            .sensors
            .iter()
            .filter(|descriptor| filter::admits(descriptor, self.flags, self.topology))
        {
            if let Some(value) = descriptor.decode(data) {
                snapshot.insert(descriptor.id.to_string(), value);
            }
        }
    }

    /// Read an optional block, disabling its feature when the device rejects the address.
    fn read_optional<T: Transport>(
        &mut self,
        transport: &mut T,
        block: &Block,
        snapshot: &mut Snapshot,
    ) -> Result<bool, T::Error> {
        match self.read_block(transport, block) {
            Ok(Some(data)) => {
                self.decode_into(snapshot, block, &data);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(err) if err.is_illegal_address() => {
                log::info!("{} values not supported, disabling further attempts", block.name);
                if let Some(feature) = block.feature {
                    self.flags.disable(feature);
                }
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Meter block at the assumed tier, falling back one tier per rejection.
    fn read_meter<T: Transport>(
        &mut self,
        transport: &mut T,
        snapshot: &mut Snapshot,
    ) -> Result<(), T::Error> {
        loop {
            let tier = self.flags.meter_tier();
            if tier == MeterTier::Absent {
                return Ok(());
            }
            match self.read_block(transport, &catalog::METER) {
                Ok(Some(data)) => {
                    self.decode_into(snapshot, &catalog::METER, &data);
                    return Ok(());
                }
                Ok(None) => return Ok(()),
                Err(err) if err.is_illegal_address() => {
                    let next = self.flags.downgrade_meter();
                    if next == MeterTier::Absent {
                        log::info!("Meter values not supported, disabling further attempts");
                    } else {
                        log::info!("{tier} meter values not supported, falling back to {next}");
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Best effort sweeps of the configured observation ranges.
    ///
    /// A rejected chunk ends the sweep of its range for this poll, registers read
    /// before it are still decoded.
    fn read_observations<T: Transport>(
        &self,
        transport: &mut T,
        snapshot: &mut Snapshot,
    ) -> Result<(), T::Error> {
        let max_registers = self.config.registers_per_read(T::MAX_REGISTERS_PER_READ);
        for &range in &self.config.observe {
            let mut data = Vec::new();
            for (address, count) in range.chunks(max_registers) {
                match transport.read_registers(self.unit_id, address, count) {
                    Ok(chunk) => data.extend_from_slice(&chunk),
                    Err(err) if err.is_rejection() => {
                        log::debug!(
                            "Observation {range} read at {address} rejected ({err}), will retry on next poll"
                        );
                        break;
                    }
                    Err(err) => return Err(err),
                }
            }
            let block = RegisterBlock::new(range.bounds().0, data);
            for descriptor in catalog::observation_sensors(range) {
                if let Some(value) = descriptor.decode(&block) {
                    snapshot.insert(descriptor.id.to_string(), value);
                }
            }
        }
        Ok(())
    }

    /// Run one poll.
    ///
    /// Only a failed primary read or a failure to talk to the device aborts it,
    /// missing optional blocks are absorbed into the capability flags.
    pub fn poll<T: Transport>(&mut self, transport: &mut T) -> Result<Snapshot, T::Error> {
        let mut snapshot = Snapshot::new();

        let primary = self
            .read_block(transport, &catalog::PRIMARY)?
            .ok_or(Error::InvalidResponse)?;
        self.decode_into(&mut snapshot, &catalog::PRIMARY, &primary);

        if primary.u16_at(BATTERY_MODE).is_some_and(|mode| mode != 0) {
            self.read_optional(transport, &catalog::BATTERY, &mut snapshot)?;
        } else {
            log::debug!("No battery connected, skipping battery values");
        }
        self.read_optional(transport, &catalog::BATTERY2, &mut snapshot)?;
        self.read_meter(transport, &mut snapshot)?;
        self.read_optional(transport, &catalog::MPPT, &mut snapshot)?;
        if self.read_optional(transport, &catalog::PARALLEL, &mut snapshot)? {
            for (id, power, voltage) in PARALLEL_CURRENTS {
                let current = parallel_current(&snapshot, power, voltage);
                snapshot.insert(id.to_string(), Value::Decimal(current));
            }
        }

        self.read_observations(transport, &mut snapshot)?;

        snapshot.insert(
            "serial_number".to_string(),
            Value::Text(self.serial_number.to_string()),
        );
        Ok(snapshot)
    }
}

fn parallel_current(snapshot: &Snapshot, power: &str, voltage: &str) -> f64 {
    let number = |id: &str| snapshot.get(id).and_then(Value::as_f64).unwrap_or(0.0);
    let voltage = number(voltage);
    if voltage > 0.0 {
        round_to(number(power) / voltage, 2)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        capability::{Feature, FeatureState},
        config::ObservationRange,
        mock_inverter::{MockInverter, Request, UNIT},
        mock_serial::MockSerialError,
        prober,
    };

    const SMALL: (&str, u16) = ("9010KETU218W0004", 10000);
    const LARGE: (&str, u16) = ("929K9ETT231W0159", 29900);

    struct Harness {
        inverter: MockInverter,
        flags: CapabilityFlags,
        topology: Topology,
        serial_number: String,
        config: SessionConfig,
    }

    impl Harness {
        fn new(mut inverter: MockInverter) -> Self {
            let identification = prober::identify(&mut inverter, UNIT).unwrap();
            inverter.clear_requests();
            Self {
                inverter,
                flags: identification.flags,
                topology: identification.topology,
                serial_number: identification.identity.serial_number,
                config: SessionConfig::new(),
            }
        }

        fn poll(&mut self) -> Result<Snapshot, MockSerialError> {
            PollSession {
                unit_id: UNIT,
                config: &self.config,
                flags: &mut self.flags,
                topology: self.topology,
                serial_number: &self.serial_number,
            }
            .poll(&mut self.inverter)
        }
    }

    fn meter_reads(inverter: &MockInverter) -> Vec<u16> {
        inverter
            .requests()
            .iter()
            .filter_map(|request| match request {
                Request::Read { address: 36000, count, .. } => Some(*count),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn primary_values_and_serial() {
        let mut inverter = MockInverter::et(SMALL.0, SMALL.1);
        inverter.set_register(35121, 2305);
        let mut harness = Harness::new(inverter);
        let snapshot = harness.poll().unwrap();
        assert_eq!(snapshot.get("vgrid"), Some(&Value::Decimal(230.5)));
        assert_eq!(
            snapshot.get("serial_number"),
            Some(&Value::Text(SMALL.0.into()))
        );
    }

    #[test]
    fn battery_block_follows_battery_mode() {
        let mut harness = Harness::new(MockInverter::et(SMALL.0, SMALL.1));
        let snapshot = harness.poll().unwrap();
        assert_eq!(harness.inverter.reads_at(37000), 0);
        assert!(!snapshot.contains_key("battery_soc"));
        // Still enabled, battery mode is only a per poll signal.
        assert!(harness.flags.is_enabled(Feature::Battery));

        harness.inverter.set_register(35184, 2);
        harness.inverter.set_register(37007, 87);
        let snapshot = harness.poll().unwrap();
        assert_eq!(harness.inverter.reads_at(37000), 1);
        assert_eq!(snapshot.get("battery_soc"), Some(&Value::Integer(87)));
    }

    #[test]
    fn rejected_battery2_is_isolated() {
        let mut inverter = MockInverter::et(LARGE.0, LARGE.1);
        inverter.reject_range(39000, 39021);
        inverter.set_register(36014, 5001);
        inverter.set_i32(35301, 12000);
        let mut harness = Harness::new(inverter);

        let snapshot = harness.poll().unwrap();
        assert_eq!(harness.flags.state(Feature::Battery2), FeatureState::Disabled);
        assert!(snapshot.contains_key("vgrid"));
        assert_eq!(snapshot.get("meter_freq"), Some(&Value::Decimal(50.01)));
        assert_eq!(snapshot.get("ppv_total"), Some(&Value::Integer(12000)));
        assert!(!snapshot.keys().any(|id| id.starts_with("battery2_")));

        harness.poll().unwrap();
        assert_eq!(harness.inverter.reads_at(39000), 1);
    }

    #[test]
    fn disabled_block_stays_off_when_device_recovers() {
        let mut inverter = MockInverter::et(LARGE.0, LARGE.1);
        inverter.reject_range(39000, 39074);
        let mut harness = Harness::new(inverter);

        harness.poll().unwrap();
        assert_eq!(harness.flags.state(Feature::Battery2), FeatureState::Disabled);

        harness.inverter.clear_faults();
        let snapshot = harness.poll().unwrap();
        assert_eq!(harness.inverter.reads_at(39000), 1);
        assert_eq!(harness.flags.state(Feature::Battery2), FeatureState::Disabled);
        assert!(!snapshot.keys().any(|id| id.starts_with("battery2_")));
    }

    #[test]
    fn meter_steps_down_once_per_tier() {
        let mut inverter = MockInverter::et(LARGE.0, LARGE.1);
        inverter.reject_range(36045, 36124);
        inverter.set_register(36044, 7);
        let mut harness = Harness::new(inverter);

        let snapshot = harness.poll().unwrap();
        assert_eq!(meter_reads(&harness.inverter), vec![125, 58, 45]);
        assert_eq!(harness.flags.meter_tier(), MeterTier::Base);
        assert_eq!(snapshot.get("meter_sw_version"), Some(&Value::Integer(7)));
        assert!(!snapshot.contains_key("meter_voltage1"));
        assert!(!snapshot.contains_key("meter_e_total_exp_l1"));

        harness.inverter.clear_requests();
        harness.poll().unwrap();
        assert_eq!(meter_reads(&harness.inverter), vec![45]);
    }

    #[test]
    fn full_meter_rejection_then_base_tier() {
        let mut inverter = MockInverter::et(LARGE.0, LARGE.1);
        inverter.reject_range(36058, 36124);
        let mut harness = Harness::new(inverter);

        let snapshot = harness.poll().unwrap();
        assert_eq!(meter_reads(&harness.inverter), vec![125, 58]);
        assert_eq!(harness.flags.meter_tier(), MeterTier::Extended);
        assert!(snapshot.contains_key("meter_voltage1"));
        assert!(!snapshot.contains_key("meter_e_total_imp_sum"));
    }

    #[test]
    fn missing_meter_is_disabled() {
        let mut inverter = MockInverter::et(LARGE.0, LARGE.1);
        inverter.reject_range(36000, 36149);
        let mut harness = Harness::new(inverter);

        let snapshot = harness.poll().unwrap();
        assert_eq!(meter_reads(&harness.inverter), vec![125, 58, 45]);
        assert_eq!(harness.flags.state(Feature::Meter), FeatureState::Disabled);
        assert!(snapshot.contains_key("vgrid"));

        harness.inverter.clear_requests();
        harness.poll().unwrap();
        assert!(meter_reads(&harness.inverter).is_empty());
    }

    #[test]
    fn transport_failure_propagates() {
        let mut inverter = MockInverter::et(LARGE.0, LARGE.1);
        inverter.fail_range(35301, 35365);
        let mut harness = Harness::new(inverter);

        let result = harness.poll();
        assert!(result.is_err_and(|err| err.is_transport_failure()));
        assert!(harness.flags.is_enabled(Feature::Mppt));
    }

    #[test]
    fn other_rejection_propagates() {
        let mut inverter = MockInverter::et(LARGE.0, LARGE.1);
        inverter.busy_range(35301, 35365);
        let mut harness = Harness::new(inverter);

        assert!(matches!(
            harness.poll(),
            Err(Error::Rejected(rmodbus::ErrorKind::SlaveDeviceBusy))
        ));
        assert!(harness.flags.is_enabled(Feature::Mppt));
    }

    #[test]
    fn primary_failure_aborts() {
        let mut inverter = MockInverter::et(SMALL.0, SMALL.1);
        inverter.fail_range(35100, 35224);
        let mut harness = Harness::new(inverter);
        assert!(harness.poll().is_err());
        assert_eq!(harness.inverter.requests().len(), 1);
    }

    #[test]
    fn parallel_currents() {
        let mut inverter = MockInverter::et(SMALL.0, SMALL.1);
        inverter.set_register(10400, 2);
        inverter.set_register(35121, 2300);
        inverter.set_i32(10481, 2300);
        inverter.set_i32(10483, 1000);
        let mut harness = Harness::new(inverter);
        assert_eq!(harness.topology, Topology::Coordinator);

        let snapshot = harness.poll().unwrap();
        assert_eq!(
            snapshot.get("parallel_meter_current_l1_calc"),
            Some(&Value::Decimal(10.0))
        );
        // No voltage on L2
        assert_eq!(
            snapshot.get("parallel_meter_current_l2_calc"),
            Some(&Value::Decimal(0.0))
        );
        assert_eq!(
            snapshot.get("parallel_inverter_quantity"),
            Some(&Value::Integer(2))
        );
    }

    #[test]
    fn member_skips_coordinator_blocks() {
        let mut inverter = MockInverter::et(SMALL.0, SMALL.1);
        inverter.reject_range(10400, 10411);
        inverter.set_register(35184, 1);
        let mut harness = Harness::new(inverter);
        assert_eq!(harness.topology, Topology::Member);

        let snapshot = harness.poll().unwrap();
        assert!(meter_reads(&harness.inverter).is_empty());
        assert_eq!(harness.inverter.reads_at(37000), 0);
        assert_eq!(harness.inverter.reads_at(10412), 1);
        assert!(snapshot.contains_key("parallel_pv_total_power"));
        assert!(!snapshot.contains_key("parallel_inverter_quantity"));
    }

    #[test]
    fn observation_rejection_is_absorbed() {
        let mut inverter = MockInverter::et(SMALL.0, SMALL.1);
        inverter.set_register(33001, 42);
        inverter.reject_range(33250, 33374);
        let mut harness = Harness::new(inverter);
        harness.config = SessionConfig::new().observe(ObservationRange::R33xxx);

        let snapshot = harness.poll().unwrap();
        assert_eq!(snapshot.get("obs_33001"), Some(&Value::Integer(42)));
        assert_eq!(snapshot.get("obs_33079"), Some(&Value::Integer(0)));
        assert!(!snapshot.contains_key("obs_33288"));
        assert!(!snapshot.contains_key("obs_33500"));
        assert_eq!(harness.inverter.reads_at(33375), 0);
    }

    #[test]
    fn observation_values_are_typed() {
        let mut inverter = MockInverter::et(SMALL.0, SMALL.1);
        inverter.set_i32(48000, 70000);
        inverter.set_register(48013, 87);
        inverter.set_i32(55252, 123456);
        let mut harness = Harness::new(inverter);
        harness.config = SessionConfig::new()
            .observe(ObservationRange::R48xxx)
            .observe(ObservationRange::R55xxx);

        let snapshot = harness.poll().unwrap();
        assert_eq!(snapshot.get("obs_48000"), Some(&Value::Integer(70000)));
        assert_eq!(snapshot.get("obs_battery_soc_48013"), Some(&Value::Integer(87)));
        assert_eq!(snapshot.get("obs_55252"), Some(&Value::Integer(123456)));
        // Registers the catalog does not name are not reported.
        assert!(!snapshot.contains_key("obs_48500"));
        assert!(!snapshot.keys().any(|id| id.starts_with("obs_33")));
    }

    #[test]
    fn observation_chunks_follow_limit() {
        let mut harness = Harness::new(MockInverter::et(SMALL.0, SMALL.1));
        harness.config = SessionConfig::new()
            .observe(ObservationRange::R55xxx)
            .with_max_registers_per_read(100);

        let snapshot = harness.poll().unwrap();
        let sweeps = harness
            .inverter
            .requests()
            .iter()
            .filter(|request| request.address() >= 55000)
            .count();
        assert_eq!(sweeps, 5);
        assert!(snapshot.contains_key("obs_55402"));
    }
}
