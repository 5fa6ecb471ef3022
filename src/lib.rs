//! This crate provides an interface for reading and configuring GoodWe ET series hybrid inverters.
//!
//! On connect the inverter is identified and probed for its optional register
//! blocks: second battery, meter tiers, MPPT expansion, multi-unit membership
//! and firmware gated setting groups. The sensors and settings exposed by a
//! session always follow what the device turned out to support, and blocks the
//! device rejects during a poll are dropped for the rest of the session.
//!
//! Example inverter models which this should work with:
//! * GW5K-ET, GW8K-ET, GW10K-ET
//! * GW15K-ET, GW20K-ET, GW25K-ET, GW29.9K-ET, GW30K-ET
//! * GW5K-BT, GW10K-BT
//! * 745 and 753 platform ET/EH variants
//!
//! It uses Modbus RTU under the hood through [`transport::RtuTransport`], and is
//! suitable for interfacing with the inverters over RS485. Other links can be
//! used by implementing [`transport::Transport`].
//!
//! The serial port used for inverter comms should be configured like so:
//! * Default baud rate: 9600
//! * Data bits: 8
//! * Stop bits: 1
//! * Parity: None
//!
//! The inverter answers on unit id `0xF7` by default.

pub mod capability;
pub mod catalog;
pub mod config;
pub mod discovery;
pub mod error;
pub mod filter;
pub mod inverter;
pub mod labels;
pub mod model;
pub mod poll;
pub mod prober;
pub mod register;
pub mod settings;
pub mod tou;
pub mod transport;
pub mod types;

pub use capability::{CapabilityFlags, Feature, MeterTier, Topology};
pub use config::{ObservationRange, SessionConfig};
pub use error::{Error, Result};
pub use inverter::{Inverter, OperationMode};
pub use poll::Snapshot;
pub use register::Descriptor;
pub use transport::{RtuTransport, Transport};
pub use types::{DeviceIdentity, Value};

#[cfg(test)]
mod mock_inverter;
#[cfg(test)]
mod mock_serial;
