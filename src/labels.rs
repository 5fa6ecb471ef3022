//! Lookup tables for enum and bitmap registers.

use crate::register::{BitTable, EnumTable};

pub const GRID_MODES: EnumTable = &[
    (0, "Not connected to grid"),
    (1, "Connected to grid"),
    (2, "Fault"),
];

pub const GRID_IN_OUT_MODES: EnumTable = &[(0, "Idle"), (1, "Exporting"), (2, "Importing")];

pub const BATTERY_MODES: EnumTable = &[
    (0, "No battery"),
    (1, "Standby"),
    (2, "Discharge"),
    (3, "Charge"),
    (4, "To be charged"),
    (5, "To be discharged"),
];

pub const PV_MODES: EnumTable = &[
    (0, "PV panels not connected"),
    (1, "PV panels connected, no power"),
    (2, "PV panels connected, producing power"),
];

pub const WORK_MODES_ET: EnumTable = &[
    (0, "Wait Mode"),
    (1, "Normal (On-Grid)"),
    (2, "Normal (Off-Grid)"),
    (3, "Fault Mode"),
    (4, "Flash Mode"),
    (5, "Check Mode"),
];

pub const SAFETY_COUNTRIES: EnumTable = &[
    (0, "Italy"),
    (1, "Czech"),
    (2, "Germany"),
    (3, "Spain"),
    (4, "Greece"),
    (5, "Denmark"),
    (6, "Belgium"),
    (7, "Romania"),
    (8, "G83/G59"),
    (9, "Australia"),
    (10, "France"),
    (11, "China"),
    (13, "Poland"),
    (14, "South Africa"),
    (15, "Australia L"),
    (16, "Brazil"),
    (17, "Thailand MEA"),
    (18, "Thailand PEA"),
    (19, "Mauritius"),
    (20, "Holland"),
    (21, "Northern Ireland"),
    (22, "China Higher"),
    (23, "French 50Hz"),
    (24, "French 60Hz"),
    (25, "Australia Ergon"),
    (26, "Australia Energex"),
    (27, "Holland 16/20A"),
    (28, "Korea"),
    (29, "China Station"),
    (30, "Austria"),
    (31, "India"),
    (32, "50Hz Grid Default"),
    (33, "Warehouse"),
    (34, "Philippines"),
    (35, "Ireland"),
    (36, "Taiwan"),
    (37, "Bulgaria"),
    (38, "Barbados"),
    (39, "China Highest"),
    (40, "G59/3"),
    (41, "Sweden"),
    (42, "Chile"),
    (43, "Brazil LV"),
    (44, "New Zealand"),
    (45, "IEEE1547 208VAC"),
    (46, "IEEE1547 220VAC"),
    (47, "IEEE1547 240VAC"),
    (48, "60Hz LV Default"),
    (49, "50Hz LV Default"),
    (50, "AU_WAPN"),
    (51, "AU_MicroGrid"),
    (52, "JP_50Hz"),
    (53, "JP_60Hz"),
    (54, "India Higher"),
    (55, "DEWA LV"),
    (56, "DEWA MV"),
    (57, "Slovakia"),
    (58, "GreenGrid"),
    (59, "Hungary"),
    (60, "Sri Lanka"),
    (61, "Spain Islands"),
    (62, "Ergon30K"),
    (63, "Energex30K"),
    (64, "IEEE1547 230/400V"),
    (65, "IEC61727 60Hz"),
    (66, "Switzerland"),
    (67, "CEI-016"),
    (68, "AU_Horizon"),
    (69, "Cyprus"),
    (70, "AU_SAPN"),
    (71, "AU_Ausgrid"),
    (72, "AU_Essential"),
    (73, "AU_Pwcore&CitiPW"),
    (74, "Hong Kong"),
    (75, "Poland MV"),
    (76, "Holland MV"),
    (77, "Sweden MV"),
    (78, "VDE4110"),
];

pub const ERROR_CODES: BitTable = &[
    (31, "Internal Communication Failure"),
    (30, "EEPROM R/W Failure"),
    (29, "Fac Failure"),
    (28, "DSP communication failure"),
    (27, "PhaseAngleFailure"),
    (25, "Relay Check Failure"),
    (23, "Vac Consistency Failure"),
    (22, "Fac Consistency Failure"),
    (20, "Back-Up Over Load"),
    (19, "DC Injection High"),
    (18, "Isolation Failure"),
    (17, "Vac Failure"),
    (16, "External Fan Failure"),
    (15, "PV Over Voltage"),
    (14, "Utility Loss"),
    (13, "Over Temperature"),
    (12, "Inverter Disconnected"),
    (11, "Ground I Failure"),
    (10, "Bus Voltage Failure"),
    (9, "Arc Fault"),
    (8, "DCI Consistency Failure"),
    (7, "LLC Bus Over Voltage"),
    (6, "BMS Communication Failure"),
    (5, "Backup Over Voltage"),
    (4, "GFCI Failure"),
    (3, "Battery Over Voltage"),
    (2, "PV Reverse Connection"),
    (1, "DSP Version Mismatch"),
    (0, "SPI Failure"),
];

pub const DIAG_STATUS_CODES: BitTable = &[
    (0, "Battery voltage low"),
    (1, "Battery SOC low"),
    (2, "Battery SOC in back"),
    (3, "BMS: Discharge disabled"),
    (4, "Discharge time on"),
    (5, "Charge time on"),
    (6, "Discharge Driver On"),
    (7, "BMS: Discharge current low"),
    (8, "APP: Discharge current too low"),
    (9, "Meter communication failure"),
    (10, "Meter connection reversed"),
    (11, "Self-use load light"),
    (12, "EMS: discharge current is zero"),
    (13, "Discharge BUS high PV voltage"),
    (14, "Battery Disconnected"),
    (15, "Battery Overcharged"),
    (16, "BMS: Temperature too high"),
    (17, "BMS: Charge too high"),
    (18, "BMS: Charge disabled"),
    (19, "Self-use off"),
    (20, "SOC delta too volatile"),
    (21, "Battery self discharge too high"),
    (22, "Battery SOC low (off-grid)"),
    (23, "Grid wave unstable"),
    (24, "Export power limit set"),
    (25, "PF value set"),
    (26, "Real power limit set"),
    (27, "DC output on"),
    (28, "SOC protect off"),
    (29, "BMS: Emergency charging"),
];

pub const BMS_ALARM_CODES: BitTable = &[
    (0, "Charging over-voltage 2"),
    (1, "Discharging under-voltage 2"),
    (2, "Cell temperature high 2"),
    (3, "Cell temperature low 2"),
    (4, "Charging over-current 2"),
    (5, "Discharging over-current 2"),
    (6, "Precharge fault"),
    (7, "DC bus fault"),
    (8, "Battery break"),
    (9, "Battery Lock"),
    (10, "Discharge circuit Fault"),
    (11, "Charging circuit Failure"),
    (12, "Communication failure 2"),
    (13, "Cell high temperature 3"),
    (14, "Discharging under-voltage 3"),
    (15, "Charging over-voltage 3"),
];

pub const BMS_WARNING_CODES: BitTable = &[
    (0, "Charging over-voltage 1"),
    (1, "Discharging under-voltage 1"),
    (2, "Cell temperature high 1"),
    (3, "Cell temperature low 1"),
    (4, "Charging over-current 1"),
    (5, "Discharging over-current 1"),
    (6, "Communication failure 1"),
    (7, "System Reboot"),
    (8, "Cell imbalance"),
    (9, "System low temperature 1"),
    (10, "System low temperature 2"),
    (11, "System high temperature"),
];
