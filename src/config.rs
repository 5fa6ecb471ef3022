//! Session options: defaults plus chained `with_*` calls.

use strum_macros::{Display, EnumIter};

/// Default Modbus address of ET inverters.
pub const DEFAULT_UNIT_ID: u8 = 0xF7;

/// Undocumented register ranges which can be swept during a poll for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObservationRange {
    #[strum(to_string = "33xxx")]
    R33xxx,
    #[strum(to_string = "38xxx")]
    R38xxx,
    #[strum(to_string = "48xxx")]
    R48xxx,
    #[strum(to_string = "55xxx")]
    R55xxx,
}

impl ObservationRange {
    /// First and last register of the range.
    pub const fn bounds(&self) -> (u16, u16) {
        match self {
            ObservationRange::R33xxx => (33000, 33501),
            ObservationRange::R38xxx => (38000, 38463),
            ObservationRange::R48xxx => (48000, 48806),
            ObservationRange::R55xxx => (55000, 55402),
        }
    }

    /// `(address, count)` reads covering the range, at most `max_registers` each.
    pub fn chunks(&self, max_registers: u16) -> Vec<(u16, u16)> {
        let (first, last) = self.bounds();
        let max_registers = max_registers.max(1);
        let mut chunks = Vec::new();
        let mut address = first;
        while address <= last {
            let count = max_registers.min(last - address + 1);
            chunks.push((address, count));
            address += count;
        }
        chunks
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    pub unit_id: u8,
    /// Observation sweeps to run on each poll, none by default.
    pub observe: Vec<ObservationRange>,
    /// Overrides the transport's own limit when set.
    pub max_registers_per_read: Option<u16>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            unit_id: DEFAULT_UNIT_ID,
            observe: Vec::new(),
            max_registers_per_read: None,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unit_id(mut self, unit_id: u8) -> Self {
        self.unit_id = unit_id;
        self
    }

    /// Turn on an observation sweep.
    pub fn observe(mut self, range: ObservationRange) -> Self {
        if !self.observe.contains(&range) {
            self.observe.push(range);
            self.observe.sort();
        }
        self
    }

    pub fn with_max_registers_per_read(mut self, max_registers: u16) -> Self {
        self.max_registers_per_read = Some(max_registers);
        self
    }

    pub fn is_observed(&self, range: ObservationRange) -> bool {
        self.observe.contains(&range)
    }

    /// Registers per read, never above `transport_limit`.
    pub fn registers_per_read(&self, transport_limit: u16) -> u16 {
        self.max_registers_per_read
            .map_or(transport_limit, |max| max.min(transport_limit))
            .max(1)
    }
}
