//! Finding the members of a multi-unit system from its coordinator.
//!
//! Members share the coordinator's link on low unit addresses, so they are
//! found by asking each candidate address for its serial number.

use std::collections::BTreeMap;

use crate::{
    capability::Topology,
    catalog,
    error::{Error, Result},
    transport::Transport,
    types::{decode_ascii, display_prefix},
};

/// Shortest serial number accepted as a real answer.
const MIN_SERIAL_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemberInfo {
    pub serial_number: String,
    pub role: Topology,
    /// Prefix for the member's sensor names, e.g. `GW0007_`.
    pub display_prefix: String,
}

/// Members found on the link, by unit address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    pub members: BTreeMap<u8, MemberInfo>,
    /// Members the coordinator reported, itself excluded.
    pub expected: u16,
}

impl Discovery {
    pub fn is_complete(&self) -> bool {
        self.members.len() >= self.expected as usize
    }
}

/// Scan the member addresses for inverters answering with a serial number.
///
/// Only a coordinator knows how many units to look for, anything else fails
/// without touching the link. The scan stops once all expected members
/// answered.
pub fn discover_members<T: Transport>(
    transport: &mut T,
    coordinator_unit: u8,
    topology: Topology,
) -> Result<Discovery, T::Error> {
    if topology != Topology::Coordinator {
        return Err(Error::NotCoordinator(topology));
    }

    let data = transport.read_registers(coordinator_unit, catalog::UNIT_COUNT_REGISTER, 1)?;
    let total = match data.as_slice() {
        [high, low, ..] => u16::from_be_bytes([*high, *low]),
        _ => return Err(Error::InvalidResponse),
    };
    let mut discovery = Discovery::default();
    if total <= 1 {
        log::warn!("Coordinator reports {total} inverters, no members to discover");
        return Ok(discovery);
    }
    discovery.expected = total - 1;

    for unit in catalog::MEMBER_UNIT_IDS {
        if discovery.is_complete() {
            break;
        }
        if unit == coordinator_unit {
            continue;
        }
        let serial_number = match transport.read_registers(
            unit,
            catalog::SERIAL_NUMBER_START,
            catalog::SERIAL_NUMBER_COUNT,
        ) {
            Ok(data) => decode_ascii(&data),
            Err(err) => {
                log::debug!("No inverter at unit {unit} ({err})");
                continue;
            }
        };
        if serial_number.len() < MIN_SERIAL_LEN {
            log::debug!("Ignoring unit {unit} with serial number {serial_number:?}");
            continue;
        }
        log::info!("Found multi-unit member {serial_number} at unit {unit}");
        discovery.members.insert(
            unit,
            MemberInfo {
                display_prefix: display_prefix(&serial_number),
                serial_number,
                role: Topology::Member,
            },
        );
    }

    if !discovery.is_complete() {
        log::warn!(
            "Found {} of {} expected multi-unit members",
            discovery.members.len(),
            discovery.expected
        );
    }
    Ok(discovery)
}
