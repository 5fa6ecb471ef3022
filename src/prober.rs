//! Identification of a freshly connected inverter.
//!
//! Reads the version info block, derives the static traits from the serial
//! number, then probes the firmware gated setting groups and the multi-unit
//! topology.

use crate::{
    capability::{CapabilityFlags, Feature, MeterTier, Topology},
    catalog,
    error::{Error, Result},
    model,
    transport::Transport,
    types::DeviceIdentity,
};

/// Result of a speculative read of a firmware gated register block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The registers answered.
    Supported,
    /// The device rejected the address, the firmware lacks the feature.
    Unsupported,
    /// Rejected for another reason, or no usable response at all.
    Indeterminate,
}

/// Everything learnt about the device during identification.
#[derive(Debug, Clone)]
pub struct Identification {
    pub identity: DeviceIdentity,
    pub flags: CapabilityFlags,
    pub topology: Topology,
    /// Unit count reported by the coordinator, 0 when it could not be read.
    pub unit_count: u16,
}

/// Capabilities which follow from the serial number and rated power alone.
pub fn static_flags(identity: &DeviceIdentity) -> CapabilityFlags {
    let serial_number = identity.serial_number.as_str();
    let mut flags = CapabilityFlags::new();
    flags.single_phase = model::is_single_phase(serial_number);
    flags.pv_layout = model::pv_layout(serial_number, identity.rated_power);
    flags.platform = model::platform(serial_number);

    flags.resolve(Feature::Battery, true);
    if model::is_2_battery(serial_number) {
        log::debug!("Model has 2 battery inputs");
        flags.resolve(Feature::Battery2, true);
    } else {
        if model::is_1_battery(serial_number) {
            log::debug!("Model has 1 battery input");
        }
        flags.resolve(Feature::Battery2, false);
    }

    let large = flags.platform.is_745() || identity.rated_power >= 15000;
    flags.resolve(Feature::Mppt, large);
    flags.resolve_meter(if large {
        MeterTier::FullExtended
    } else {
        MeterTier::Base
    });
    flags
}

/// Attempt the probe read of a firmware gated feature and settle its flag.
pub fn probe_feature<T: Transport>(
    transport: &mut T,
    unit_id: u8,
    flags: &mut CapabilityFlags,
    feature: Feature,
    (address, count): (u16, u16),
) -> ProbeOutcome {
    match transport.read_registers(unit_id, address, count) {
        Ok(_) => {
            flags.resolve(feature, true);
            ProbeOutcome::Supported
        }
        Err(err) if err.is_illegal_address() => {
            log::debug!("{feature} settings not supported, disabling them");
            flags.resolve(feature, false);
            ProbeOutcome::Unsupported
        }
        Err(err) => {
            log::debug!("Cannot read {feature} settings ({err}), disabling them");
            flags.resolve(feature, false);
            ProbeOutcome::Indeterminate
        }
    }
}

/// Classify the device within a possible multi-unit system by its unit count register.
///
/// Only the coordinator answers the register, so an illegal address rejection
/// marks a member. A transport failure falls back to standalone.
pub fn probe_topology<T: Transport>(
    transport: &mut T,
    unit_id: u8,
) -> Result<(Topology, u16), T::Error> {
    match transport.read_registers(unit_id, catalog::UNIT_COUNT_REGISTER, 1) {
        Ok(data) => {
            let count = match data.as_slice() {
                [high, low, ..] => u16::from_be_bytes([*high, *low]),
                _ => return Err(Error::InvalidResponse),
            };
            let topology = match count {
                0 => {
                    log::warn!("Unexpected inverter quantity 0, treating as standalone");
                    Topology::Standalone
                }
                1 => {
                    log::info!("Detected standalone inverter");
                    Topology::Standalone
                }
                _ => {
                    log::info!("Detected coordinator of a multi-unit system with {count} inverters");
                    Topology::Coordinator
                }
            };
            Ok((topology, count))
        }
        Err(err) if err.is_illegal_address() => {
            log::info!(
                "Inverter quantity not accessible, detected member of a multi-unit system"
            );
            Ok((Topology::Member, 0))
        }
        Err(err) if err.is_rejection() => Err(err),
        Err(err) => {
            log::debug!("Cannot determine multi-unit topology ({err}), assuming standalone");
            Ok((Topology::Standalone, 0))
        }
    }
}

/// Run the complete identification sequence.
///
/// Only a failed read of the version info block is fatal.
pub fn identify<T: Transport>(transport: &mut T, unit_id: u8) -> Result<Identification, T::Error> {
    let data = transport.read_registers(
        unit_id,
        catalog::IDENTITY_START,
        DeviceIdentity::REGISTER_COUNT,
    )?;
    let identity = DeviceIdentity::from_bytes(&data).ok_or(Error::InvalidResponse)?;
    log::debug!(
        "Identified {} ({}), {} W, ARM firmware {}",
        identity.model_name,
        identity.serial_number,
        identity.rated_power,
        identity.arm_version
    );

    let mut flags = static_flags(&identity);
    probe_feature(
        transport,
        unit_id,
        &mut flags,
        Feature::EcoModeV2,
        catalog::ECO_MODE_V2_PROBE,
    );
    probe_feature(
        transport,
        unit_id,
        &mut flags,
        Feature::PeakShaving,
        catalog::PEAK_SHAVING_PROBE,
    );

    let (topology, unit_count) = probe_topology(transport, unit_id)?;
    flags.resolve(Feature::Parallel, topology != Topology::Standalone);

    Ok(Identification {
        identity,
        flags,
        topology,
        unit_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{capability::FeatureState, mock_inverter::MockInverter};

    const UNIT: u8 = 0xF7;

    #[test]
    fn probe_outcomes() {
        let mut inverter = MockInverter::et("9010KETU218W0004", 10000);
        let mut flags = CapabilityFlags::new();
        assert_eq!(
            probe_feature(&mut inverter, UNIT, &mut flags, Feature::EcoModeV2, (47547, 6)),
            ProbeOutcome::Supported
        );
        assert!(flags.is_enabled(Feature::EcoModeV2));

        inverter.reject_range(47589, 47594);
        assert_eq!(
            probe_feature(&mut inverter, UNIT, &mut flags, Feature::PeakShaving, (47589, 6)),
            ProbeOutcome::Unsupported
        );
        assert_eq!(flags.state(Feature::PeakShaving), FeatureState::Disabled);
    }

    #[test]
    fn indeterminate_probe_disables() {
        let mut inverter = MockInverter::et("9010KETU218W0004", 10000);
        inverter.fail_range(47547, 47552);
        let mut flags = CapabilityFlags::new();
        assert_eq!(
            probe_feature(&mut inverter, UNIT, &mut flags, Feature::EcoModeV2, (47547, 6)),
            ProbeOutcome::Indeterminate
        );
        assert_eq!(flags.state(Feature::EcoModeV2), FeatureState::Disabled);

        inverter.busy_range(47589, 47594);
        assert_eq!(
            probe_feature(&mut inverter, UNIT, &mut flags, Feature::PeakShaving, (47589, 6)),
            ProbeOutcome::Indeterminate
        );
        assert!(!flags.is_enabled(Feature::PeakShaving));
    }

    #[test]
    fn small_three_phase_unit() {
        let mut inverter = MockInverter::et("9010KETU218W0004", 10000);
        let result = identify(&mut inverter, UNIT).unwrap();
        assert_eq!(result.identity.serial_number, "9010KETU218W0004");
        assert_eq!(result.topology, Topology::Standalone);
        assert_eq!(result.unit_count, 1);
        let flags = &result.flags;
        assert!(!flags.single_phase);
        assert!(flags.is_enabled(Feature::Battery));
        assert!(!flags.is_enabled(Feature::Battery2));
        assert!(!flags.is_enabled(Feature::Mppt));
        assert!(!flags.is_enabled(Feature::Parallel));
        assert!(flags.is_enabled(Feature::EcoModeV2));
        assert!(flags.is_enabled(Feature::PeakShaving));
        assert_eq!(flags.meter_tier(), MeterTier::Base);
    }

    #[test]
    fn large_unit_assumes_full_meter() {
        let mut inverter = MockInverter::et("929K9ETT231W0159", 29900);
        let flags = identify(&mut inverter, UNIT).unwrap().flags;
        assert!(flags.is_enabled(Feature::Battery2));
        assert!(flags.is_enabled(Feature::Mppt));
        assert_eq!(flags.meter_tier(), MeterTier::FullExtended);
    }

    #[test]
    fn coordinator_detection() {
        let mut inverter = MockInverter::et("9010KETU218W0004", 10000);
        inverter.set_register(10400, 3);
        let result = identify(&mut inverter, UNIT).unwrap();
        assert_eq!(result.topology, Topology::Coordinator);
        assert_eq!(result.unit_count, 3);
        assert!(result.flags.is_enabled(Feature::Parallel));
    }

    #[test]
    fn member_detection() {
        let mut inverter = MockInverter::et("9010KETU218W0004", 10000);
        inverter.reject_range(10400, 10411);
        let result = identify(&mut inverter, UNIT).unwrap();
        assert_eq!(result.topology, Topology::Member);
        assert!(result.flags.is_enabled(Feature::Parallel));
    }

    #[test]
    fn zero_units_is_standalone() {
        let mut inverter = MockInverter::et("9010KETU218W0004", 10000);
        inverter.set_register(10400, 0);
        let result = identify(&mut inverter, UNIT).unwrap();
        assert_eq!(result.topology, Topology::Standalone);
        assert!(!result.flags.is_enabled(Feature::Parallel));
    }

    #[test]
    fn unit_count_transport_failure_is_standalone() {
        let mut inverter = MockInverter::et("9010KETU218W0004", 10000);
        inverter.set_register(10400, 3);
        inverter.fail_range(10400, 10400);
        let result = identify(&mut inverter, UNIT).unwrap();
        assert_eq!(result.topology, Topology::Standalone);
        assert_eq!(result.flags.state(Feature::Parallel), FeatureState::Disabled);
    }

    #[test]
    fn unit_count_other_rejection_propagates() {
        let mut inverter = MockInverter::et("9010KETU218W0004", 10000);
        inverter.busy_range(10400, 10400);
        assert!(matches!(
            identify(&mut inverter, UNIT),
            Err(Error::Rejected(rmodbus::ErrorKind::SlaveDeviceBusy))
        ));
    }

    #[test]
    fn identity_failure_is_fatal() {
        let mut inverter = MockInverter::et("9010KETU218W0004", 10000);
        inverter.fail_range(35000, 35032);
        let result = identify(&mut inverter, UNIT);
        assert!(result.is_err_and(|err| err.is_transport_failure()));
        // Nothing else was attempted.
        assert_eq!(inverter.requests().len(), 1);
    }
}
