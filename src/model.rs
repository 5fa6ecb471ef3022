//! Serial number tags identifying the hardware variant of an ET family inverter.
//!
//! Every check is a substring match against the serial number, e.g. `9010KETU218W0004`
//! contains both `10KET` (10 kW, 3 MPPT) and `ETU` (platform 205).

use crate::capability::{Platform, PvLayout};

pub const PLATFORM_205_MODELS: &[&str] = &["ETU", "ETL", "ETR", "BHN", "EHU", "BHU", "EHR", "BTU"];
pub const PLATFORM_745_LV_MODELS: &[&str] = &[
    "ESN", "EBN", "EMN", "SPN", "ERN", "ESC", "HLB", "HMB", "HBB", "EOA",
];
pub const PLATFORM_745_HV_MODELS: &[&str] = &[
    "ETT", "HTA", "HUB", "AEB", "SPB", "CUB", "EUB", "HEB", "ERB", "BTT", "ETF", "ARB", "URB", "EBR",
];
pub const PLATFORM_753_MODELS: &[&str] = &["AES", "HHI", "ABP", "EHB", "HSB", "HUA", "CUA"];

pub const SINGLE_PHASE_MODELS: &[&str] = &[
    // DT
    "DSN", "DST", "NSU", "SSN", "SST", "SSX", "SSY", "MSU", "MST", "PSB", "PSC", "MSC",
    // ET
    "EHU", "EHR", "HSB",
    // ES gen 2
    "ESN", "EMN", "ERN", "EBN", "HLB", "HMB", "HBB", "SPN",
];

/// Three MPPT inputs: PV1-PV6.
pub const MPPT3_MODELS: &[&str] = &[
    "MSU", "MST", "PSC", "MSC", "10KET", "12KET", "15KET", "25KET", "29K9ET", "25KMT", "40KET",
];
/// Four MPPT inputs: PV1-PV8.
pub const MPPT4_MODELS: &[&str] = &["HSB", "50KET"];

pub const BAT_1_MODELS: &[&str] = &[
    "6000ET", "8000ET", "10KET", "12KET", "15KET", "20KET", "40KET", "50KET",
];
/// ET 25-30 kW, the only models with a second battery input.
pub const BAT_2_MODELS: &[&str] = &["25KET", "29K9ET"];

fn matches_any(serial_number: &str, tags: &[&str]) -> bool {
    tags.iter().any(|tag| serial_number.contains(tag))
}

pub fn is_single_phase(serial_number: &str) -> bool {
    matches_any(serial_number, SINGLE_PHASE_MODELS)
}

pub fn is_3_mppt(serial_number: &str) -> bool {
    matches_any(serial_number, MPPT3_MODELS)
}

pub fn is_4_mppt(serial_number: &str) -> bool {
    matches_any(serial_number, MPPT4_MODELS)
}

pub fn is_1_battery(serial_number: &str) -> bool {
    matches_any(serial_number, BAT_1_MODELS)
}

pub fn is_2_battery(serial_number: &str) -> bool {
    matches_any(serial_number, BAT_2_MODELS)
}

pub fn platform(serial_number: &str) -> Platform {
    if matches_any(serial_number, PLATFORM_745_LV_MODELS) {
        Platform::P745Lv
    } else if matches_any(serial_number, PLATFORM_745_HV_MODELS) {
        Platform::P745Hv
    } else if matches_any(serial_number, PLATFORM_753_MODELS) {
        Platform::P753
    } else if matches_any(serial_number, PLATFORM_205_MODELS) {
        Platform::P205
    } else {
        Platform::Unknown
    }
}

/// PV inputs present on the inverter. Units below 15 kW without an MPPT tag only have PV1 and PV2.
pub fn pv_layout(serial_number: &str, rated_power: u16) -> PvLayout {
    if is_3_mppt(serial_number) {
        PvLayout::ThreeMppt
    } else if is_4_mppt(serial_number) {
        PvLayout::FourMppt
    } else if rated_power < 15000 {
        PvLayout::TwoInputs
    } else {
        PvLayout::Unrestricted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn et_10k() {
        let serial = "9010KETU218W0004";
        assert_eq!(platform(serial), Platform::P205);
        assert!(is_3_mppt(serial));
        assert!(!is_4_mppt(serial));
        assert!(is_1_battery(serial));
        assert!(!is_2_battery(serial));
        assert!(!is_single_phase(serial));
        assert_eq!(pv_layout(serial, 10000), PvLayout::ThreeMppt);
    }

    #[test]
    fn et_29k9_has_two_batteries() {
        let serial = "929K9ETT231W0159";
        assert!(is_2_battery(serial));
        assert_eq!(platform(serial), Platform::P745Hv);
        assert!(platform(serial).is_745());
    }

    #[test]
    fn single_phase_eh() {
        let serial = "95000EHU222W0001";
        assert!(is_single_phase(serial));
        assert_eq!(pv_layout(serial, 5000), PvLayout::TwoInputs);
    }

    #[test]
    fn large_units_keep_every_input() {
        assert_eq!(pv_layout("9020KETF00CW0000", 20000), PvLayout::Unrestricted);
        assert_eq!(pv_layout("9050KETF00CW0000", 50000), PvLayout::FourMppt);
    }

    #[test]
    fn unknown_platform() {
        assert_eq!(platform("1234567890"), Platform::Unknown);
        assert_eq!(platform("9008KEHB231W0001"), Platform::P753);
    }
}
