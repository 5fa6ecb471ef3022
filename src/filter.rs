//! Derives the effective sensor and setting catalogs of a session.
//!
//! Everything here is a pure function of [`CapabilityFlags`] and [`Topology`],
//! so it can be recomputed whenever the flags change.

use crate::{
    capability::{CapabilityFlags, Feature, Topology},
    catalog::{self, Block},
    config::ObservationRange,
    register::{Descriptor, Phase},
};

/// Whether a catalog entry is valid for the given session state.
///
/// Rules apply in order: topology, optional blocks, single phase trimming,
/// PV inputs present.
pub fn admits(descriptor: &Descriptor, flags: &CapabilityFlags, topology: Topology) -> bool {
    if topology == Topology::Member && catalog::is_coordinator_only(descriptor.offset) {
        return false;
    }
    if let Some(feature) = descriptor.feature {
        if !flags.is_enabled(feature) {
            return false;
        }
        if feature == Feature::Meter && !flags.meter_tier().covers(descriptor.offset) {
            return false;
        }
    }
    if flags.single_phase
        && descriptor.pv_channel.is_none()
        && matches!(descriptor.phase, Some(Phase::L2 | Phase::L3))
    {
        return false;
    }
    if let Some(channel) = descriptor.pv_channel {
        if !flags.pv_layout.allows(channel) {
            return false;
        }
    }
    true
}

pub fn effective_sensors(flags: &CapabilityFlags, topology: Topology) -> Vec<&'static Descriptor> {
    catalog::all_sensors()
        .filter(|descriptor| admits(descriptor, flags, topology))
        .collect()
}

/// Like [`effective_sensors`], also dropping settings the device refused to read.
pub fn effective_settings(flags: &CapabilityFlags, topology: Topology) -> Vec<&'static Descriptor> {
    catalog::all_settings()
        .filter(|descriptor| admits(descriptor, flags, topology))
        .filter(|descriptor| !flags.is_setting_unsupported(descriptor.id))
        .collect()
}

/// Look up a setting by id for direct access.
///
/// Unlike [`effective_settings`] the topology is not applied, so a member can
/// tell a coordinator-only setting from one that does not exist at all.
pub fn find_setting(id: &str, flags: &CapabilityFlags) -> Option<&'static Descriptor> {
    catalog::all_settings()
        .find(|descriptor| descriptor.id == id)
        .filter(|descriptor| admits(descriptor, flags, Topology::Standalone))
        .filter(|descriptor| !flags.is_setting_unsupported(descriptor.id))
}

/// The registers to read for `block`: from its first effective descriptor to
/// the end of the block, the meter block ending at its current tier.
///
/// `None` when nothing of the block is effective.
pub fn block_window(
    block: &Block,
    flags: &CapabilityFlags,
    topology: Topology,
) -> Option<(u16, u16)> {
    if let Some(feature) = block.feature {
        if !flags.is_enabled(feature) {
            return None;
        }
    }
    let end = if block.feature == Some(Feature::Meter) {
        block.start + flags.meter_tier().register_count()
    } else {
        block.end()
    };
    let start = block
        .sensors
        .iter()
        .filter(|descriptor| admits(descriptor, flags, topology))
        .map(|descriptor| descriptor.offset)
        .min()?;
    (start < end).then_some((start, end - start))
}

/// The effective catalogs, recomputed only when the session state changed.
///
/// Sensors of observed ranges follow the regular sensors.
#[derive(Debug, Default)]
pub struct EffectiveCatalog {
    key: Option<(u32, Topology, Vec<ObservationRange>)>,
    sensors: Vec<&'static Descriptor>,
    settings: Vec<&'static Descriptor>,
}

impl EffectiveCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the catalogs up to date with `flags`, `topology` and the observed ranges.
    pub fn refresh(
        &mut self,
        flags: &CapabilityFlags,
        topology: Topology,
        observe: &[ObservationRange],
    ) {
        let generation = flags.generation();
        if self.key.as_ref().is_some_and(|(cached, cached_topology, cached_observe)| {
            *cached == generation && *cached_topology == topology && cached_observe == observe
        }) {
            return;
        }
        log::debug!("Recomputing effective catalog (generation {generation})");
        self.sensors = effective_sensors(flags, topology);
        self.sensors.extend(
            observe
                .iter()
                .flat_map(|&range| catalog::observation_sensors(range).iter()),
        );
        self.settings = effective_settings(flags, topology);
        self.key = Some((generation, topology, observe.to_vec()));
    }

    pub fn sensors(&self) -> &[&'static Descriptor] {
        &self.sensors
    }

    pub fn settings(&self) -> &[&'static Descriptor] {
        &self.settings
    }

    pub fn sensor(&self, id: &str) -> Option<&'static Descriptor> {
        self.sensors.iter().copied().find(|descriptor| descriptor.id == id)
    }

    pub fn setting(&self, id: &str) -> Option<&'static Descriptor> {
        self.settings.iter().copied().find(|descriptor| descriptor.id == id)
    }
}
