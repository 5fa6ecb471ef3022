//! Per session knowledge about what the connected inverter supports.

use std::collections::BTreeSet;

use strum::EnumCount;
use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter};

/// Optional register blocks and firmware gated setting groups.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, EnumCountMacro,
)]
pub enum Feature {
    /// Battery detail block, 37000.
    Battery,
    /// Second battery input, 39000.
    Battery2,
    /// Smart meter block, 36000. Its size is tracked separately as a [`MeterTier`].
    Meter,
    /// MPPT expansion block, 35301.
    Mppt,
    /// Multi-unit system block, 10400.
    Parallel,
    /// TOU and load control settings of ARM firmware 19.
    EcoModeV2,
    /// Peak shaving settings of ARM firmware 22.
    PeakShaving,
}

/// Lifecycle of one feature within a session.
///
/// `Untried` resolves once at identification, `Enabled` may later fall to
/// `Disabled`, nothing ever leaves `Disabled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum FeatureState {
    #[default]
    Untried,
    Enabled,
    Disabled,
}

/// How much of the meter block the inverter answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumIter)]
pub enum MeterTier {
    Absent,
    /// 36000-36044.
    Base,
    /// 36000-36057, later ARM firmware.
    Extended,
    /// 36000-36124, per phase energy counters.
    FullExtended,
}

impl MeterTier {
    /// Registers to read from 36000 for this tier.
    pub const fn register_count(&self) -> u16 {
        match self {
            MeterTier::Absent => 0,
            MeterTier::Base => 45,
            MeterTier::Extended => 58,
            MeterTier::FullExtended => 125,
        }
    }

    /// The next smaller tier.
    pub const fn step_down(&self) -> Self {
        match self {
            MeterTier::FullExtended => MeterTier::Extended,
            MeterTier::Extended => MeterTier::Base,
            MeterTier::Base | MeterTier::Absent => MeterTier::Absent,
        }
    }

    /// Whether a meter register at `offset` is part of this tier.
    pub const fn covers(&self, offset: u16) -> bool {
        offset < 36000 + self.register_count()
    }
}

/// Hardware platform, derived from the serial number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum Platform {
    P205,
    P745Lv,
    P745Hv,
    P753,
    #[default]
    Unknown,
}

impl Platform {
    pub const fn is_745(&self) -> bool {
        matches!(self, Platform::P745Lv | Platform::P745Hv)
    }
}

/// Which PV inputs the inverter actually has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum PvLayout {
    /// Small units: PV1 and PV2 only.
    TwoInputs,
    /// Three MPPT: PV1-PV6.
    ThreeMppt,
    /// Four MPPT: PV1-PV8.
    FourMppt,
    #[default]
    Unrestricted,
}

impl PvLayout {
    pub const fn allows(&self, channel: u8) -> bool {
        match self {
            PvLayout::TwoInputs => !matches!(channel, 3 | 4),
            PvLayout::ThreeMppt => channel <= 6,
            PvLayout::FourMppt => channel <= 8,
            PvLayout::Unrestricted => true,
        }
    }
}

/// The inverter's role in a possible multi-unit installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Topology {
    #[default]
    Standalone,
    /// Master of a multi-unit system.
    Coordinator,
    /// Subordinate unit of a multi-unit system.
    Member,
}

/// Capability flags of one session.
///
/// Every change bumps [`CapabilityFlags::generation`] so derived catalogs know to refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityFlags {
    states: [FeatureState; Feature::COUNT],
    meter_tier: MeterTier,
    pub single_phase: bool,
    pub pv_layout: PvLayout,
    pub platform: Platform,
    unsupported_settings: BTreeSet<&'static str>,
    generation: u32,
}

impl Default for CapabilityFlags {
    fn default() -> Self {
        Self {
            states: [FeatureState::Untried; Feature::COUNT],
            meter_tier: MeterTier::Base,
            single_phase: false,
            pv_layout: PvLayout::default(),
            platform: Platform::default(),
            unsupported_settings: BTreeSet::new(),
            generation: 0,
        }
    }
}

impl CapabilityFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, feature: Feature) -> FeatureState {
        self.states[feature as usize]
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.state(feature) == FeatureState::Enabled
    }

    /// Settle an untried feature. Features already resolved are left alone.
    pub fn resolve(&mut self, feature: Feature, present: bool) -> bool {
        if self.state(feature) != FeatureState::Untried {
            return false;
        }
        self.states[feature as usize] = if present {
            FeatureState::Enabled
        } else {
            FeatureState::Disabled
        };
        self.generation += 1;
        true
    }

    /// Permanently disable a feature. Returns whether anything changed.
    pub fn disable(&mut self, feature: Feature) -> bool {
        if self.state(feature) == FeatureState::Disabled {
            return false;
        }
        self.states[feature as usize] = FeatureState::Disabled;
        if feature == Feature::Meter {
            self.meter_tier = MeterTier::Absent;
        }
        self.generation += 1;
        true
    }

    /// The meter tier currently assumed, [`MeterTier::Absent`] unless the meter is enabled.
    pub fn meter_tier(&self) -> MeterTier {
        if self.is_enabled(Feature::Meter) {
            self.meter_tier
        } else {
            MeterTier::Absent
        }
    }

    /// Set the starting tier of the meter. Only effective while the meter is untried.
    pub fn resolve_meter(&mut self, tier: MeterTier) -> bool {
        if self.state(Feature::Meter) != FeatureState::Untried {
            return false;
        }
        self.meter_tier = tier;
        self.resolve(Feature::Meter, tier != MeterTier::Absent)
    }

    /// Step the meter down one tier after a rejection, disabling it below the base tier.
    pub fn downgrade_meter(&mut self) -> MeterTier {
        if !self.is_enabled(Feature::Meter) {
            return MeterTier::Absent;
        }
        let next = self.meter_tier.step_down();
        if next == MeterTier::Absent {
            self.disable(Feature::Meter);
        } else {
            self.meter_tier = next;
            self.generation += 1;
        }
        next
    }

    /// Drop a single setting the inverter rejected.
    pub fn mark_setting_unsupported(&mut self, id: &'static str) -> bool {
        let inserted = self.unsupported_settings.insert(id);
        if inserted {
            self.generation += 1;
        }
        inserted
    }

    pub fn is_setting_unsupported(&self, id: &str) -> bool {
        self.unsupported_settings.contains(id)
    }

    /// Changes whenever anything that shapes the effective catalog changes.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}
