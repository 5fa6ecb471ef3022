//! The static register catalog of the ET family (platforms 205, 745 and 753).
//!
//! Sensors are grouped in [`Block`]s, one per register run read during a poll.
//! Settings are grouped by the firmware feature which introduced them.

use crate::{
    capability::Feature,
    config::ObservationRange,
    labels::*,
    register::{Descriptor, RegisterBlock, Rule, SensorKind as Kind, tagged},
    types::Value,
};

/// Version info block, see [`DeviceIdentity`](crate::types::DeviceIdentity).
pub const IDENTITY_START: u16 = 35000;
/// Serial number inside the version info block, 8 registers of ASCII.
pub const SERIAL_NUMBER_START: u16 = 35003;
pub const SERIAL_NUMBER_COUNT: u16 = 8;

/// Number of inverters of a multi-unit system. Only the coordinator answers it.
pub const UNIT_COUNT_REGISTER: u16 = 10400;

/// Probe for the TOU settings of ARM firmware 19.
pub const ECO_MODE_V2_PROBE: (u16, u16) = (47547, 6);
/// Probe for the peak shaving settings of ARM firmware 22.
pub const PEAK_SHAVING_PROBE: (u16, u16) = (47589, 6);

/// Unit ids scanned for members of a multi-unit system.
pub const MEMBER_UNIT_IDS: core::ops::RangeInclusive<u8> = 1..=15;

/// Register runs which are only reachable through the coordinator of a multi-unit system.
pub const COORDINATOR_ONLY_RANGES: &[(u16, u16)] = &[
    // Meter data
    (36000, 36149),
    // Battery info
    (36995, 37074),
    // Battery 2 info
    (39000, 39074),
    // Battery settings
    (47500, 47546),
    // EMS and TOU
    (47547, 47650),
    // Global multi-unit system data
    (10400, 10411),
];

/// Addresses inside the coordinator ranges which members answer anyway.
pub const MEMBER_ACCESSIBLE: &[u16] = &[
    // battery_charge_current
    45353,
    // battery_discharge_current
    45355,
    // tou_slot8_param1, peak shaving power
    47592,
    // tou_slot8_param2, peak shaving SoC
    47593,
];

pub fn is_coordinator_only(offset: u16) -> bool {
    !MEMBER_ACCESSIBLE.contains(&offset)
        && COORDINATOR_ONLY_RANGES
            .iter()
            .any(|(first, last)| (*first..=*last).contains(&offset))
}

/// A run of registers read in one request during a poll.
#[derive(Debug)]
pub struct Block {
    pub name: &'static str,
    pub start: u16,
    /// Register count of the largest variant of the block.
    pub count: u16,
    /// Capability the block depends on, `None` for the primary block.
    pub feature: Option<Feature>,
    pub sensors: &'static [Descriptor],
}

impl Block {
    /// Address one past the last register of the block.
    pub const fn end(&self) -> u16 {
        self.start + self.count
    }
}

const fn voltage(id: &'static str, offset: u16, label: &'static str) -> Descriptor {
    Descriptor::new(id, offset, Rule::U16 { divisor: 10 }, label, "V")
}

const fn current(id: &'static str, offset: u16, label: &'static str) -> Descriptor {
    Descriptor::new(id, offset, Rule::U16 { divisor: 10 }, label, "A")
}

const fn current_s(id: &'static str, offset: u16, label: &'static str) -> Descriptor {
    Descriptor::new(id, offset, Rule::I16 { divisor: 10 }, label, "A")
}

const fn power(id: &'static str, offset: u16, label: &'static str) -> Descriptor {
    Descriptor::new(id, offset, Rule::U16 { divisor: 1 }, label, "W")
}

const fn power_s(id: &'static str, offset: u16, label: &'static str) -> Descriptor {
    Descriptor::new(id, offset, Rule::I16 { divisor: 1 }, label, "W")
}

const fn power4(id: &'static str, offset: u16, label: &'static str) -> Descriptor {
    Descriptor::new(id, offset, Rule::U32 { divisor: 1 }, label, "W")
}

const fn power4_s(id: &'static str, offset: u16, label: &'static str) -> Descriptor {
    Descriptor::new(id, offset, Rule::I32 { divisor: 1 }, label, "W")
}

const fn frequency(id: &'static str, offset: u16, label: &'static str) -> Descriptor {
    Descriptor::new(id, offset, Rule::U16 { divisor: 100 }, label, "Hz")
}

const fn temp(id: &'static str, offset: u16, label: &'static str) -> Descriptor {
    Descriptor::new(id, offset, Rule::I16 { divisor: 10 }, label, "°C")
}

const fn energy(id: &'static str, offset: u16, label: &'static str) -> Descriptor {
    Descriptor::new(id, offset, Rule::U16 { divisor: 10 }, label, "kWh")
}

const fn energy4(id: &'static str, offset: u16, label: &'static str) -> Descriptor {
    Descriptor::new(id, offset, Rule::U32 { divisor: 10 }, label, "kWh")
}

const fn energy4w(id: &'static str, offset: u16, label: &'static str) -> Descriptor {
    Descriptor::new(id, offset, Rule::U32 { divisor: 1000 }, label, "kWh")
}

const fn energy8(id: &'static str, offset: u16, label: &'static str) -> Descriptor {
    Descriptor::new(id, offset, Rule::U64 { divisor: 100 }, label, "kWh")
}

const fn reactive(id: &'static str, offset: u16, label: &'static str) -> Descriptor {
    Descriptor::new(id, offset, Rule::I16 { divisor: 1 }, label, "var")
}

const fn reactive4(id: &'static str, offset: u16, label: &'static str) -> Descriptor {
    Descriptor::new(id, offset, Rule::I32 { divisor: 1 }, label, "var")
}

const fn apparent(id: &'static str, offset: u16, label: &'static str) -> Descriptor {
    Descriptor::new(id, offset, Rule::I16 { divisor: 1 }, label, "VA")
}

const fn apparent4(id: &'static str, offset: u16, label: &'static str) -> Descriptor {
    Descriptor::new(id, offset, Rule::I32 { divisor: 1 }, label, "VA")
}

const fn cell_voltage(id: &'static str, offset: u16, label: &'static str) -> Descriptor {
    Descriptor::new(id, offset, Rule::U16 { divisor: 1000 }, label, "V")
}

const fn decimal(
    id: &'static str,
    offset: u16,
    divisor: u32,
    label: &'static str,
    unit: &'static str,
) -> Descriptor {
    Descriptor::new(id, offset, Rule::I16 { divisor }, label, unit)
}

const fn float(
    id: &'static str,
    offset: u16,
    divisor: u32,
    label: &'static str,
    unit: &'static str,
) -> Descriptor {
    Descriptor::new(id, offset, Rule::F32 { divisor }, label, unit)
}

const fn integer(id: &'static str, offset: u16, label: &'static str, unit: &'static str) -> Descriptor {
    Descriptor::new(id, offset, Rule::U16 { divisor: 1 }, label, unit)
}

const fn integer_s(
    id: &'static str,
    offset: u16,
    label: &'static str,
    unit: &'static str,
) -> Descriptor {
    Descriptor::new(id, offset, Rule::I16 { divisor: 1 }, label, unit)
}

const fn long(id: &'static str, offset: u16, label: &'static str, unit: &'static str) -> Descriptor {
    Descriptor::new(id, offset, Rule::U32 { divisor: 1 }, label, unit)
}

const fn long_s(id: &'static str, offset: u16, label: &'static str, unit: &'static str) -> Descriptor {
    Descriptor::new(id, offset, Rule::I32 { divisor: 1 }, label, unit)
}

const fn percent(id: &'static str, offset: u16, label: &'static str) -> Descriptor {
    integer(id, offset, label, "%").range(0, 100)
}

/// PV1-PV4 power, negative readings count as zero.
fn pv_power(block: &RegisterBlock) -> Option<Value> {
    let mut total = 0i64;
    for address in [35105, 35109, 35113, 35117] {
        total += (block.i32_at(address)? as i64).max(0);
    }
    Some(Value::Integer(total))
}

/// PV power plus battery power minus what flows to the grid.
fn house_consumption(block: &RegisterBlock) -> Option<Value> {
    let mut total = 0i64;
    for address in [35105, 35109, 35113, 35117] {
        total += block.i32_at(address)? as i64;
    }
    total += block.i32_at(35182)? as i64;
    total -= block.i16_at(35140)? as i64;
    Some(Value::Integer(total))
}

/// 0 idle, 1 exporting, 2 importing, with a 90 W dead band.
fn grid_in_out_code(block: &RegisterBlock) -> Option<u16> {
    let active_power = block.i16_at(35140)?;
    Some(if active_power < -90 {
        2
    } else if active_power >= 90 {
        1
    } else {
        0
    })
}

fn grid_in_out(block: &RegisterBlock) -> Option<Value> {
    grid_in_out_code(block).map(|code| Value::Integer(code as i64))
}

fn grid_in_out_label(block: &RegisterBlock) -> Option<Value> {
    let code = grid_in_out_code(block)?;
    GRID_IN_OUT_MODES
        .iter()
        .find(|(raw, _)| *raw == code)
        .map(|(_, label)| Value::Label(label))
}

/// Running data, 35100-35224.
pub const PRIMARY_SENSORS: &[Descriptor] = &[
    Descriptor::new("timestamp", 35100, Rule::Timestamp, "Timestamp", ""),
    voltage("vpv1", 35103, "PV1 Voltage").kind(Kind::Pv).pv(1),
    current("ipv1", 35104, "PV1 Current").kind(Kind::Pv).pv(1),
    power4("ppv1", 35105, "PV1 Power").kind(Kind::Pv).pv(1),
    voltage("vpv2", 35107, "PV2 Voltage").kind(Kind::Pv).pv(2),
    current("ipv2", 35108, "PV2 Current").kind(Kind::Pv).pv(2),
    power4("ppv2", 35109, "PV2 Power").kind(Kind::Pv).pv(2),
    voltage("vpv3", 35111, "PV3 Voltage").kind(Kind::Pv).pv(3),
    current("ipv3", 35112, "PV3 Current").kind(Kind::Pv).pv(3),
    power4("ppv3", 35113, "PV3 Power").kind(Kind::Pv).pv(3),
    voltage("vpv4", 35115, "PV4 Voltage").kind(Kind::Pv).pv(4),
    current("ipv4", 35116, "PV4 Current").kind(Kind::Pv).pv(4),
    power4("ppv4", 35117, "PV4 Power").kind(Kind::Pv).pv(4),
    Descriptor::new("ppv", 35105, Rule::Calculated(pv_power), "PV Power", "W").kind(Kind::Pv),
    Descriptor::new("pv4_mode", 35119, Rule::ByteH, "PV4 Mode code", "").kind(Kind::Pv).pv(4),
    Descriptor::new("pv4_mode_label", 35119, Rule::EnumH(PV_MODES), "PV4 Mode", "")
        .kind(Kind::Pv)
        .pv(4),
    Descriptor::new("pv3_mode", 35119, Rule::ByteL, "PV3 Mode code", "").kind(Kind::Pv).pv(3),
    Descriptor::new("pv3_mode_label", 35119, Rule::EnumL(PV_MODES), "PV3 Mode", "")
        .kind(Kind::Pv)
        .pv(3),
    Descriptor::new("pv2_mode", 35120, Rule::ByteH, "PV2 Mode code", "").kind(Kind::Pv).pv(2),
    Descriptor::new("pv2_mode_label", 35120, Rule::EnumH(PV_MODES), "PV2 Mode", "")
        .kind(Kind::Pv)
        .pv(2),
    Descriptor::new("pv1_mode", 35120, Rule::ByteL, "PV1 Mode code", "").kind(Kind::Pv).pv(1),
    Descriptor::new("pv1_mode_label", 35120, Rule::EnumL(PV_MODES), "PV1 Mode", "")
        .kind(Kind::Pv)
        .pv(1),
    voltage("vgrid", 35121, "On-grid L1 Voltage").kind(Kind::Ac),
    current("igrid", 35122, "On-grid L1 Current").kind(Kind::Ac),
    frequency("fgrid", 35123, "On-grid L1 Frequency").kind(Kind::Ac),
    power_s("pgrid", 35125, "On-grid L1 Power").kind(Kind::Ac),
    voltage("vgrid2", 35126, "On-grid L2 Voltage").kind(Kind::Ac).l2(),
    current("igrid2", 35127, "On-grid L2 Current").kind(Kind::Ac).l2(),
    frequency("fgrid2", 35128, "On-grid L2 Frequency").kind(Kind::Ac).l2(),
    power_s("pgrid2", 35130, "On-grid L2 Power").kind(Kind::Ac).l2(),
    voltage("vgrid3", 35131, "On-grid L3 Voltage").kind(Kind::Ac).l3(),
    current("igrid3", 35132, "On-grid L3 Current").kind(Kind::Ac).l3(),
    frequency("fgrid3", 35133, "On-grid L3 Frequency").kind(Kind::Ac).l3(),
    power_s("pgrid3", 35135, "On-grid L3 Power").kind(Kind::Ac).l3(),
    integer("grid_mode", 35136, "Grid Mode code", "").kind(Kind::Pv),
    Descriptor::new("grid_mode_label", 35136, Rule::Enum16(GRID_MODES), "Grid Mode", "")
        .kind(Kind::Pv),
    power_s("total_inverter_power", 35138, "Total Power").kind(Kind::Ac),
    power_s("active_power", 35140, "Active Power").kind(Kind::Grid),
    Descriptor::new("grid_in_out", 35140, Rule::Calculated(grid_in_out), "On-grid Mode code", "")
        .kind(Kind::Grid),
    Descriptor::new(
        "grid_in_out_label",
        35140,
        Rule::Calculated(grid_in_out_label),
        "On-grid Mode",
        "",
    )
    .kind(Kind::Grid),
    reactive("reactive_power", 35142, "Reactive Power").kind(Kind::Grid),
    apparent("apparent_power", 35144, "Apparent Power").kind(Kind::Grid),
    voltage("backup_v1", 35145, "Back-up L1 Voltage").kind(Kind::Ups),
    current("backup_i1", 35146, "Back-up L1 Current").kind(Kind::Ups),
    frequency("backup_f1", 35147, "Back-up L1 Frequency").kind(Kind::Ups),
    integer("load_mode1", 35148, "Load Mode L1", ""),
    power_s("backup_p1", 35150, "Back-up L1 Power").kind(Kind::Ups),
    voltage("backup_v2", 35151, "Back-up L2 Voltage").kind(Kind::Ups).l2(),
    current("backup_i2", 35152, "Back-up L2 Current").kind(Kind::Ups).l2(),
    frequency("backup_f2", 35153, "Back-up L2 Frequency").kind(Kind::Ups).l2(),
    integer("load_mode2", 35154, "Load Mode L2", "").l2(),
    power_s("backup_p2", 35156, "Back-up L2 Power").kind(Kind::Ups).l2(),
    voltage("backup_v3", 35157, "Back-up L3 Voltage").kind(Kind::Ups).l3(),
    current("backup_i3", 35158, "Back-up L3 Current").kind(Kind::Ups).l3(),
    frequency("backup_f3", 35159, "Back-up L3 Frequency").kind(Kind::Ups).l3(),
    integer("load_mode3", 35160, "Load Mode L3", "").l3(),
    power_s("backup_p3", 35162, "Back-up L3 Power").kind(Kind::Ups).l3(),
    power_s("load_p1", 35164, "Load L1").kind(Kind::Ac),
    power_s("load_p2", 35166, "Load L2").kind(Kind::Ac).l2(),
    power_s("load_p3", 35168, "Load L3").kind(Kind::Ac).l3(),
    power_s("backup_ptotal", 35170, "Back-up Load").kind(Kind::Ups),
    power_s("load_ptotal", 35172, "Load").kind(Kind::Ac),
    integer("ups_load", 35173, "Ups Load", "%").kind(Kind::Ups),
    temp("temperature_air", 35174, "Inverter Temperature (Air)").kind(Kind::Ac),
    temp("temperature_module", 35175, "Inverter Temperature (Module)"),
    temp("temperature", 35176, "Inverter Temperature (Radiator)").kind(Kind::Ac),
    integer("function_bit", 35177, "Function Bit", ""),
    voltage("bus_voltage", 35178, "Bus Voltage"),
    voltage("nbus_voltage", 35179, "NBus Voltage"),
    voltage("vbattery1", 35180, "Battery Voltage").kind(Kind::Bat),
    current_s("ibattery1", 35181, "Battery Current").kind(Kind::Bat),
    power4_s("pbattery1", 35182, "Battery Power").kind(Kind::Bat),
    integer("battery_mode", 35184, "Battery Mode code", "").kind(Kind::Bat),
    Descriptor::new("battery_mode_label", 35184, Rule::Enum16(BATTERY_MODES), "Battery Mode", "")
        .kind(Kind::Bat),
    integer("warning_code", 35185, "Warning code", ""),
    integer("safety_country", 35186, "Safety Country code", "").kind(Kind::Ac),
    Descriptor::new(
        "safety_country_label",
        35186,
        Rule::Enum16(SAFETY_COUNTRIES),
        "Safety Country",
        "",
    )
    .kind(Kind::Ac),
    integer("work_mode", 35187, "Work Mode code", ""),
    Descriptor::new("work_mode_label", 35187, Rule::Enum16(WORK_MODES_ET), "Work Mode", ""),
    integer("operation_mode", 35188, "Operation Mode code", ""),
    long("error_codes", 35189, "Error Codes", ""),
    Descriptor::new("errors", 35189, Rule::Bitmap32(ERROR_CODES), "Errors", ""),
    energy4("e_total", 35191, "Total PV Generation").kind(Kind::Pv),
    energy4("e_day", 35193, "Today's PV Generation").kind(Kind::Pv),
    energy4("e_total_exp", 35195, "Total Energy (export)").kind(Kind::Ac),
    Descriptor::new("h_total", 35197, Rule::Hours32, "Hours Total", "h").kind(Kind::Pv),
    energy("e_day_exp", 35199, "Today Energy (export)").kind(Kind::Ac),
    energy4("e_total_imp", 35200, "Total Energy (import)").kind(Kind::Ac),
    energy("e_day_imp", 35202, "Today Energy (import)").kind(Kind::Ac),
    energy4("e_load_total", 35203, "Total Load").kind(Kind::Ac),
    energy("e_load_day", 35205, "Today Load").kind(Kind::Ac),
    energy4("e_bat_charge_total", 35206, "Total Battery Charge").kind(Kind::Bat),
    energy("e_bat_charge_day", 35208, "Today Battery Charge").kind(Kind::Bat),
    energy4("e_bat_discharge_total", 35209, "Total Battery Discharge").kind(Kind::Bat),
    energy("e_bat_discharge_day", 35211, "Today Battery Discharge").kind(Kind::Bat),
    long("diagnose_result", 35220, "Diag Status Code", ""),
    Descriptor::new(
        "diagnose_result_label",
        35220,
        Rule::Bitmap32(DIAG_STATUS_CODES),
        "Diag Status",
        "",
    ),
    Descriptor::new(
        "house_consumption",
        35105,
        Rule::Calculated(house_consumption),
        "House Consumption",
        "W",
    )
    .kind(Kind::Ac),
];

/// Battery details, 37000-37023.
pub const BATTERY_SENSORS: &[Descriptor] = &tagged(
    Feature::Battery,
    [
        integer("battery_bms", 37000, "Battery BMS", "").kind(Kind::Bat),
        integer("battery_index", 37001, "Battery Index", "").kind(Kind::Bat),
        integer("battery_status", 37002, "Battery Status", "").kind(Kind::Bat),
        temp("battery_temperature", 37003, "Battery Temperature").kind(Kind::Bat),
        integer("battery_charge_limit", 37004, "Battery Charge Limit", "A").kind(Kind::Bat),
        integer("battery_discharge_limit", 37005, "Battery Discharge Limit", "A").kind(Kind::Bat),
        integer("battery_error_l", 37006, "Battery Error L", "").kind(Kind::Bat),
        integer("battery_soc", 37007, "Battery State of Charge", "%").kind(Kind::Bat),
        integer("battery_soh", 37008, "Battery State of Health", "%").kind(Kind::Bat),
        integer("battery_modules", 37009, "Battery Modules", "").kind(Kind::Bat),
        integer("battery_warning_l", 37010, "Battery Warning L", "").kind(Kind::Bat),
        integer("battery_protocol", 37011, "Battery Protocol", "").kind(Kind::Bat),
        integer("battery_error_h", 37012, "Battery Error H", "").kind(Kind::Bat),
        Descriptor::new(
            "battery_error",
            37012,
            Rule::Bitmap22 { low: 37006, table: BMS_ALARM_CODES },
            "Battery Error",
            "",
        )
        .kind(Kind::Bat),
        integer("battery_warning_h", 37013, "Battery Warning H", "").kind(Kind::Bat),
        Descriptor::new(
            "battery_warning",
            37013,
            Rule::Bitmap22 { low: 37010, table: BMS_WARNING_CODES },
            "Battery Warning",
            "",
        )
        .kind(Kind::Bat),
        integer("battery_sw_version", 37014, "Battery Software Version", "").kind(Kind::Bat),
        integer("battery_hw_version", 37015, "Battery Hardware Version", "").kind(Kind::Bat),
        integer("battery_max_cell_temp_id", 37016, "Battery Max Cell Temperature ID", "")
            .kind(Kind::Bat),
        integer("battery_min_cell_temp_id", 37017, "Battery Min Cell Temperature ID", "")
            .kind(Kind::Bat),
        integer("battery_max_cell_voltage_id", 37018, "Battery Max Cell Voltage ID", "")
            .kind(Kind::Bat),
        integer("battery_min_cell_voltage_id", 37019, "Battery Min Cell Voltage ID", "")
            .kind(Kind::Bat),
        temp("battery_max_cell_temp", 37020, "Battery Max Cell Temperature").kind(Kind::Bat),
        temp("battery_min_cell_temp", 37021, "Battery Min Cell Temperature").kind(Kind::Bat),
        cell_voltage("battery_max_cell_voltage", 37022, "Battery Max Cell Voltage").kind(Kind::Bat),
        cell_voltage("battery_min_cell_voltage", 37023, "Battery Min Cell Voltage").kind(Kind::Bat),
    ],
);

/// Second battery input, 39000-39021.
pub const BATTERY2_SENSORS: &[Descriptor] = &tagged(
    Feature::Battery2,
    [
        integer("battery2_status", 39000, "Battery 2 Status", "").kind(Kind::Bat),
        temp("battery2_temperature", 39001, "Battery 2 Temperature").kind(Kind::Bat),
        integer("battery2_charge_limit", 39002, "Battery 2 Charge Limit", "A").kind(Kind::Bat),
        integer("battery2_discharge_limit", 39003, "Battery 2 Discharge Limit", "A")
            .kind(Kind::Bat),
        integer("battery2_error_l", 39004, "Battery 2 Error L", "").kind(Kind::Bat),
        integer("battery2_soc", 39005, "Battery 2 State of Charge", "%").kind(Kind::Bat),
        integer("battery2_soh", 39006, "Battery 2 State of Health", "%").kind(Kind::Bat),
        integer("battery2_modules", 39007, "Battery 2 Modules", "").kind(Kind::Bat),
        integer("battery2_warning_l", 39008, "Battery 2 Warning L", "").kind(Kind::Bat),
        integer("battery2_protocol", 39009, "Battery 2 Protocol", "").kind(Kind::Bat),
        integer("battery2_error_h", 39010, "Battery 2 Error H", "").kind(Kind::Bat),
        Descriptor::new(
            "battery2_error",
            39010,
            Rule::Bitmap22 { low: 39004, table: BMS_ALARM_CODES },
            "Battery 2 Error",
            "",
        )
        .kind(Kind::Bat),
        integer("battery2_warning_h", 39011, "Battery 2 Warning H", "").kind(Kind::Bat),
        Descriptor::new(
            "battery2_warning",
            39011,
            Rule::Bitmap22 { low: 39008, table: BMS_WARNING_CODES },
            "Battery 2 Warning",
            "",
        )
        .kind(Kind::Bat),
        integer("battery2_sw_version", 39012, "Battery 2 Software Version", "").kind(Kind::Bat),
        integer("battery2_hw_version", 39013, "Battery 2 Hardware Version", "").kind(Kind::Bat),
        integer("battery2_max_cell_temp_id", 39014, "Battery 2 Max Cell Temperature ID", "")
            .kind(Kind::Bat),
        integer("battery2_min_cell_temp_id", 39015, "Battery 2 Min Cell Temperature ID", "")
            .kind(Kind::Bat),
        integer("battery2_max_cell_voltage_id", 39016, "Battery 2 Max Cell Voltage ID", "")
            .kind(Kind::Bat),
        integer("battery2_min_cell_voltage_id", 39017, "Battery 2 Min Cell Voltage ID", "")
            .kind(Kind::Bat),
        temp("battery2_max_cell_temp", 39018, "Battery 2 Max Cell Temperature").kind(Kind::Bat),
        temp("battery2_min_cell_temp", 39019, "Battery 2 Min Cell Temperature").kind(Kind::Bat),
        cell_voltage("battery2_max_cell_voltage", 39020, "Battery 2 Max Cell Voltage")
            .kind(Kind::Bat),
        cell_voltage("battery2_min_cell_voltage", 39021, "Battery 2 Min Cell Voltage")
            .kind(Kind::Bat),
    ],
);

/// Smart meter, 36000-36123. How much of it exists depends on the [`MeterTier`](crate::capability::MeterTier).
pub const METER_SENSORS: &[Descriptor] = &tagged(
    Feature::Meter,
    [
        integer("commode", 36000, "Commode", ""),
        integer("rssi", 36001, "RSSI", ""),
        integer("manufacture_code", 36002, "Manufacture Code", ""),
        // 1 correct, 2 reverse, 3 incorrect, 0 not checked
        integer("meter_test_status", 36003, "Meter Test Status", ""),
        integer("meter_comm_status", 36004, "Meter Communication Status", ""),
        power_s("active_power1", 36005, "Active Power L1").kind(Kind::Grid),
        power_s("active_power2", 36006, "Active Power L2").kind(Kind::Grid).l2(),
        power_s("active_power3", 36007, "Active Power L3").kind(Kind::Grid).l3(),
        power_s("active_power_total", 36008, "Active Power Total").kind(Kind::Grid),
        reactive("reactive_power_total", 36009, "Reactive Power Total").kind(Kind::Grid),
        decimal("meter_power_factor1", 36010, 1000, "Meter Power Factor L1", "").kind(Kind::Grid),
        decimal("meter_power_factor2", 36011, 1000, "Meter Power Factor L2", "")
            .kind(Kind::Grid)
            .l2(),
        decimal("meter_power_factor3", 36012, 1000, "Meter Power Factor L3", "")
            .kind(Kind::Grid)
            .l3(),
        decimal("meter_power_factor", 36013, 1000, "Meter Power Factor", "").kind(Kind::Grid),
        frequency("meter_freq", 36014, "Meter Frequency").kind(Kind::Grid),
        float("meter_e_total_exp", 36015, 1000, "Meter Total Energy (export)", "kWh")
            .kind(Kind::Grid),
        float("meter_e_total_imp", 36017, 1000, "Meter Total Energy (import)", "kWh")
            .kind(Kind::Grid),
        power4_s("meter_active_power1", 36019, "Meter Active Power L1").kind(Kind::Grid),
        power4_s("meter_active_power2", 36021, "Meter Active Power L2").kind(Kind::Grid).l2(),
        power4_s("meter_active_power3", 36023, "Meter Active Power L3").kind(Kind::Grid).l3(),
        power4_s("meter_active_power_total", 36025, "Meter Active Power Total").kind(Kind::Grid),
        reactive4("meter_reactive_power1", 36027, "Meter Reactive Power L1").kind(Kind::Grid),
        reactive4("meter_reactive_power2", 36029, "Meter Reactive Power L2")
            .kind(Kind::Grid)
            .l2(),
        reactive4("meter_reactive_power3", 36031, "Meter Reactive Power L3")
            .kind(Kind::Grid)
            .l3(),
        reactive4("meter_reactive_power_total", 36033, "Meter Reactive Power Total")
            .kind(Kind::Grid),
        apparent4("meter_apparent_power1", 36035, "Meter Apparent Power L1").kind(Kind::Grid),
        apparent4("meter_apparent_power2", 36037, "Meter Apparent Power L2")
            .kind(Kind::Grid)
            .l2(),
        apparent4("meter_apparent_power3", 36039, "Meter Apparent Power L3")
            .kind(Kind::Grid)
            .l3(),
        apparent4("meter_apparent_power_total", 36041, "Meter Apparent Power Total")
            .kind(Kind::Grid),
        // 0 single phase, 1 3P3W, 2 3P4W, 3 HomeKit
        integer("meter_type", 36043, "Meter Type", "").kind(Kind::Grid),
        integer("meter_sw_version", 36044, "Meter Software Version", "").kind(Kind::Grid),
        // Extended tier
        power4_s("meter2_active_power", 36045, "Meter 2 Active Power").kind(Kind::Grid),
        float("meter2_e_total_exp", 36047, 1000, "Meter 2 Total Energy (export)", "kWh")
            .kind(Kind::Grid),
        float("meter2_e_total_imp", 36049, 1000, "Meter 2 Total Energy (import)", "kWh")
            .kind(Kind::Grid),
        integer("meter2_comm_status", 36051, "Meter 2 Communication Status", ""),
        voltage("meter_voltage1", 36052, "Meter L1 Voltage").kind(Kind::Grid),
        voltage("meter_voltage2", 36053, "Meter L2 Voltage").kind(Kind::Grid).l2(),
        voltage("meter_voltage3", 36054, "Meter L3 Voltage").kind(Kind::Grid).l3(),
        current("meter_current1", 36055, "Meter L1 Current").kind(Kind::Grid),
        current("meter_current2", 36056, "Meter L2 Current").kind(Kind::Grid).l2(),
        current("meter_current3", 36057, "Meter L3 Current").kind(Kind::Grid).l3(),
        // Full extended tier
        energy8("meter_e_total_exp_l1", 36092, "Meter Total Energy (export) L1").kind(Kind::Grid),
        energy8("meter_e_total_exp_l2", 36096, "Meter Total Energy (export) L2")
            .kind(Kind::Grid)
            .l2(),
        energy8("meter_e_total_exp_l3", 36100, "Meter Total Energy (export) L3")
            .kind(Kind::Grid)
            .l3(),
        energy8("meter_e_total_exp_sum", 36104, "Meter Total Energy (export) Sum")
            .kind(Kind::Grid),
        energy8("meter_e_total_imp_l1", 36108, "Meter Total Energy (import) L1").kind(Kind::Grid),
        energy8("meter_e_total_imp_l2", 36112, "Meter Total Energy (import) L2")
            .kind(Kind::Grid)
            .l2(),
        energy8("meter_e_total_imp_l3", 36116, "Meter Total Energy (import) L3")
            .kind(Kind::Grid)
            .l3(),
        energy8("meter_e_total_imp_sum", 36120, "Meter Total Energy (import) Sum")
            .kind(Kind::Grid),
    ],
);

/// MPPT expansion, 35301-35364.
pub const MPPT_SENSORS: &[Descriptor] = &tagged(
    Feature::Mppt,
    [
        power4("ppv_total", 35301, "PV Power Total").kind(Kind::Pv),
        integer("pv_channel", 35303, "PV Channel", "").kind(Kind::Pv),
        voltage("vpv5", 35304, "PV5 Voltage").kind(Kind::Pv).pv(5),
        current("ipv5", 35305, "PV5 Current").kind(Kind::Pv).pv(5),
        voltage("vpv6", 35306, "PV6 Voltage").kind(Kind::Pv).pv(6),
        current("ipv6", 35307, "PV6 Current").kind(Kind::Pv).pv(6),
        voltage("vpv7", 35308, "PV7 Voltage").kind(Kind::Pv).pv(7),
        current("ipv7", 35309, "PV7 Current").kind(Kind::Pv).pv(7),
        voltage("vpv8", 35310, "PV8 Voltage").kind(Kind::Pv).pv(8),
        current("ipv8", 35311, "PV8 Current").kind(Kind::Pv).pv(8),
        voltage("vpv9", 35312, "PV9 Voltage").kind(Kind::Pv).pv(9),
        current("ipv9", 35313, "PV9 Current").kind(Kind::Pv).pv(9),
        voltage("vpv10", 35314, "PV10 Voltage").kind(Kind::Pv).pv(10),
        current("ipv10", 35315, "PV10 Current").kind(Kind::Pv).pv(10),
        voltage("vpv11", 35316, "PV11 Voltage").kind(Kind::Pv).pv(11),
        current("ipv11", 35317, "PV11 Current").kind(Kind::Pv).pv(11),
        voltage("vpv12", 35318, "PV12 Voltage").kind(Kind::Pv).pv(12),
        current("ipv12", 35319, "PV12 Current").kind(Kind::Pv).pv(12),
        voltage("vpv13", 35320, "PV13 Voltage").kind(Kind::Pv).pv(13),
        current("ipv13", 35321, "PV13 Current").kind(Kind::Pv).pv(13),
        voltage("vpv14", 35322, "PV14 Voltage").kind(Kind::Pv).pv(14),
        current("ipv14", 35323, "PV14 Current").kind(Kind::Pv).pv(14),
        voltage("vpv15", 35324, "PV15 Voltage").kind(Kind::Pv).pv(15),
        current("ipv15", 35325, "PV15 Current").kind(Kind::Pv).pv(15),
        voltage("vpv16", 35326, "PV16 Voltage").kind(Kind::Pv).pv(16),
        current("ipv16", 35327, "PV16 Current").kind(Kind::Pv).pv(16),
        power("pmppt1", 35337, "MPPT1 Power").kind(Kind::Pv),
        power("pmppt2", 35338, "MPPT2 Power").kind(Kind::Pv),
        power("pmppt3", 35339, "MPPT3 Power").kind(Kind::Pv),
        power("pmppt4", 35340, "MPPT4 Power").kind(Kind::Pv),
        power("pmppt5", 35341, "MPPT5 Power").kind(Kind::Pv),
        power("pmppt6", 35342, "MPPT6 Power").kind(Kind::Pv),
        power("pmppt7", 35343, "MPPT7 Power").kind(Kind::Pv),
        power("pmppt8", 35344, "MPPT8 Power").kind(Kind::Pv),
        current("imppt1", 35345, "MPPT1 Current").kind(Kind::Pv),
        current("imppt2", 35346, "MPPT2 Current").kind(Kind::Pv),
        current("imppt3", 35347, "MPPT3 Current").kind(Kind::Pv),
        current("imppt4", 35348, "MPPT4 Current").kind(Kind::Pv),
        current("imppt5", 35349, "MPPT5 Current").kind(Kind::Pv),
        current("imppt6", 35350, "MPPT6 Current").kind(Kind::Pv),
        current("imppt7", 35351, "MPPT7 Current").kind(Kind::Pv),
        current("imppt8", 35352, "MPPT8 Current").kind(Kind::Pv),
        reactive4("reactive_power1", 35353, "Reactive Power L1").kind(Kind::Grid),
        reactive4("reactive_power2", 35355, "Reactive Power L2").kind(Kind::Grid).l2(),
        reactive4("reactive_power3", 35357, "Reactive Power L3").kind(Kind::Grid).l3(),
        apparent4("apparent_power1", 35359, "Apparent Power L1").kind(Kind::Grid),
        apparent4("apparent_power2", 35361, "Apparent Power L2").kind(Kind::Grid).l2(),
        apparent4("apparent_power3", 35363, "Apparent Power L3").kind(Kind::Grid).l3(),
    ],
);

/// Multi-unit system data, 10400-10486. Members only answer from 10412 on.
pub const PARALLEL_SENSORS: &[Descriptor] = &tagged(
    Feature::Parallel,
    [
        integer("parallel_inverter_quantity", 10400, "Inverter Quantity", "").kind(Kind::Ac),
        integer("parallel_firmware_version_arm", 10401, "Firmware Version ARM", "").kind(Kind::Ac),
        integer("parallel_firmware_version_dsp_master", 10402, "Firmware Version DSP Master", "")
            .kind(Kind::Ac),
        integer("parallel_firmware_version_dsp_slave", 10403, "Firmware Version DSP Slave", "")
            .kind(Kind::Ac),
        integer("parallel_online_quantity", 10404, "Online Quantity", "").kind(Kind::Ac),
        integer("parallel_app_mode", 10405, "APP Mode", "").kind(Kind::Ac),
        integer("parallel_safety_country", 10406, "Safety Country", "").kind(Kind::Ac),
        integer("parallel_work_mode", 10407, "Work Mode", "").kind(Kind::Ac),
        integer("parallel_meter_comm_status", 10408, "Meter Comm Status", "").kind(Kind::Grid),
        integer("parallel_backup_enable", 10409, "BackUp Enable", "").kind(Kind::Ups),
        integer("parallel_controller_status_code", 10410, "Controller Status Code", "")
            .kind(Kind::Ac),
        power4("parallel_pv_total_power", 10412, "PV Total Power").kind(Kind::Pv),
        power4_s("parallel_battery_total_power", 10414, "Battery Total Power").kind(Kind::Bat),
        power4_s("parallel_total_backup_load_power", 10416, "Total Back-Up Load Power")
            .kind(Kind::Ups),
        power4_s("parallel_meter_power", 10418, "Meter Power").kind(Kind::Grid),
        power4_s("parallel_total_inverter_power", 10420, "Total Inverter Power").kind(Kind::Ac),
        power4_s("parallel_l1_inverter_power", 10422, "L1 Inverter Power").kind(Kind::Ac),
        power4_s("parallel_l2_inverter_power", 10424, "L2 Inverter Power").kind(Kind::Ac),
        power4_s("parallel_l3_inverter_power", 10426, "L3 Inverter Power").kind(Kind::Ac),
        power4_s("parallel_backup_active_power_r", 10428, "Back-Up Active Power R")
            .kind(Kind::Ups),
        power4_s("parallel_backup_active_power_s", 10430, "Back-Up Active Power S")
            .kind(Kind::Ups),
        power4_s("parallel_backup_active_power_t", 10432, "Back-Up Active Power T")
            .kind(Kind::Ups),
        decimal("parallel_meter_frequency", 10434, 100, "Meter Frequency", "Hz").kind(Kind::Grid),
        integer("parallel_battery_mode", 10435, "Battery Mode", "").kind(Kind::Bat),
        decimal("parallel_battery_voltage_1", 10436, 10, "Battery Voltage 1", "V").kind(Kind::Bat),
        decimal("parallel_battery_voltage_2", 10437, 10, "Battery Voltage 2", "V").kind(Kind::Bat),
        power4("parallel_total_inverter_power_rated", 10438, "Total Inverter Power (rated)")
            .kind(Kind::Ac),
        integer("parallel_meter_check_value", 10470, "Meter Check Value", "").kind(Kind::Grid),
        integer("parallel_meter_connect_check_flag", 10471, "Meter Connect Check Flag", "")
            .kind(Kind::Grid),
        integer("parallel_soc", 10472, "System SOC", "%").kind(Kind::Bat),
        integer("parallel_battery_capacity", 10473, "Battery Capacity", "Ah").kind(Kind::Bat),
        integer("parallel_battery_communication", 10474, "Battery Communication Status", "")
            .kind(Kind::Bat),
        energy4w("parallel_battery_charge_allow_kwh", 10476, "Battery Charge Allow kWh")
            .kind(Kind::Bat),
        energy4w("parallel_battery_discharge_allow_kwh", 10478, "Battery Discharge Allow kWh")
            .kind(Kind::Bat),
        integer("parallel_able_balance_flag", 10480, "Able Balance Flag", "").kind(Kind::Bat),
        power4_s("parallel_meter_active_power_r", 10481, "Meter Active Power L1").kind(Kind::Grid),
        power4_s("parallel_meter_active_power_s", 10483, "Meter Active Power L2").kind(Kind::Grid),
        power4_s("parallel_meter_active_power_t", 10485, "Meter Active Power L3").kind(Kind::Grid),
    ],
);

pub const PRIMARY: Block = Block {
    name: "running data",
    start: 35100,
    count: 125,
    feature: None,
    sensors: PRIMARY_SENSORS,
};

pub const METER: Block = Block {
    name: "meter",
    start: 36000,
    count: 125,
    feature: Some(Feature::Meter),
    sensors: METER_SENSORS,
};

pub const BATTERY: Block = Block {
    name: "battery",
    start: 37000,
    count: 24,
    feature: Some(Feature::Battery),
    sensors: BATTERY_SENSORS,
};

pub const BATTERY2: Block = Block {
    name: "battery 2",
    start: 39000,
    count: 22,
    feature: Some(Feature::Battery2),
    sensors: BATTERY2_SENSORS,
};

pub const MPPT: Block = Block {
    name: "mppt",
    start: 35301,
    count: 65,
    feature: Some(Feature::Mppt),
    sensors: MPPT_SENSORS,
};

pub const PARALLEL: Block = Block {
    name: "multi-unit system",
    start: 10400,
    count: 87,
    feature: Some(Feature::Parallel),
    sensors: PARALLEL_SENSORS,
};

/// Every sensor block, in catalog order.
pub const SENSOR_BLOCKS: &[&Block] = &[&PRIMARY, &METER, &BATTERY, &BATTERY2, &MPPT, &PARALLEL];

/// Named registers first, then plain 16 bit registers labelled by address.
macro_rules! observation_block {
    ($kind:expr; [$($named:expr),* $(,)?]; [$($address:literal),* $(,)?]) => {
        [
            $($named.kind($kind),)*
            $(
                integer(concat!("obs_", $address), $address, concat!("Obs ", $address), "")
                    .kind($kind),
            )*
        ]
    };
}

/// Battery data of the 48xxx range, members answer these as well.
pub const OBSERVATION_48XXX_SENSORS: &[Descriptor] = &observation_block!(
    Kind::Bat;
    [
        long("obs_48000", 48000, "Obs 48000 (Battery Info)", ""),
        long("obs_48002", 48002, "Obs 48002 (Battery Energy?)", ""),
        integer("obs_48004", 48004, "Obs 48004 (Unknown)", ""),
        long("obs_48005", 48005, "Obs 48005 (Capacity?)", ""),
        integer("obs_48007", 48007, "Obs 48007 (Unknown)", ""),
        long("obs_48008", 48008, "Obs 48008 (Energy?)", ""),
        long("obs_48010", 48010, "Obs 48010 (Energy?)", ""),
        integer("obs_battery_discharge_limit", 48011, "Obs Battery Discharge Current Limit", "A"),
        integer("obs_battery_charge_limit", 48012, "Obs Battery Charge Current Limit", "A"),
        integer("obs_battery_soc_48013", 48013, "Obs Battery SOC (Member)", "%"),
        integer("obs_48014", 48014, "Obs 48014 (Voltage?)", ""),
        integer("obs_48015", 48015, "Obs 48015 (Voltage?)", ""),
        integer("obs_48016", 48016, "Obs 48016 (Voltage?)", ""),
        integer("obs_48017", 48017, "Obs 48017 (Status?)", ""),
        long("obs_48018", 48018, "Obs 48018 (Power?)", ""),
        long("obs_48020", 48020, "Obs 48020 (Power?)", ""),
        integer("obs_48022", 48022, "Obs 48022 (Voltage?)", ""),
        integer("obs_48023", 48023, "Obs 48023 (Voltage?)", ""),
        integer("obs_48024", 48024, "Obs 48024 (Voltage?)", ""),
        integer("obs_48025", 48025, "Obs 48025 (Unknown)", ""),
        integer("obs_48026", 48026, "Obs 48026 (Unknown)", ""),
        long("obs_48046", 48046, "Obs 48046 (Power?)", ""),
        long("obs_48048", 48048, "Obs 48048 (Power?)", ""),
        long("obs_48050", 48050, "Obs 48050 (Power?)", ""),
        long("obs_48052", 48052, "Obs 48052 (Power?)", ""),
        long("obs_48054", 48054, "Obs 48054 (Energy?)", ""),
        long("obs_48056", 48056, "Obs 48056 (Energy?)", ""),
        long("obs_48058", 48058, "Obs 48058 (Energy?)", ""),
        long("obs_48060", 48060, "Obs 48060 (Energy?)", ""),
        integer("obs_48064", 48064, "Obs 48064 (Status?)", ""),
        integer("obs_48065", 48065, "Obs 48065 (Unknown)", ""),
        integer("obs_48066", 48066, "Obs 48066 (Capacity?)", ""),
    ];
    [
        48001, 48003, 48006, 48009, 48019, 48021, 48027, 48028, 48029, 48030,
        48031, 48032, 48033, 48034, 48035, 48036, 48037, 48038, 48039, 48040,
        48041, 48042, 48043, 48044, 48045, 48047, 48049, 48051, 48053, 48055,
        48057, 48059, 48061, 48062, 48063, 48067, 48068, 48069, 48070, 48071,
        48072, 48073, 48074, 48075, 48076, 48077, 48078, 48079, 48080, 48081,
        48082, 48083, 48084, 48085, 48086, 48087, 48088, 48089, 48090, 48091,
        48092, 48093, 48094, 48095, 48096, 48097, 48098, 48099, 48131, 48132,
        48133, 48134, 48135, 48136, 48140, 48141, 48142, 48143, 48144, 48145,
        48146, 48147, 48148, 48149, 48150, 48151, 48152, 48153, 48154, 48155,
        48156, 48157, 48158, 48159, 48160, 48161, 48162, 48163, 48164, 48165,
        48166, 48167, 48168, 48169, 48170, 48171, 48172, 48173, 48174, 48175,
        48176, 48177, 48178, 48179, 48180, 48181, 48182, 48183, 48184, 48185,
        48186, 48187, 48188, 48189, 48190, 48191, 48192, 48193, 48194, 48195,
        48196, 48197, 48198, 48199, 48200, 48201, 48202, 48203, 48204, 48205,
        48206, 48207, 48208, 48209, 48210, 48211, 48212, 48213, 48214, 48215,
        48216, 48217, 48218, 48219, 48220, 48221, 48222, 48223, 48224, 48225,
        48226, 48227, 48228, 48229, 48230, 48231, 48232, 48233, 48234, 48235,
        48236, 48237, 48238, 48239, 48240, 48241, 48242, 48243, 48244, 48245,
        48246, 48247, 48248, 48249, 48250, 48251, 48252, 48253, 48254, 48255,
        48256, 48257, 48258, 48259, 48260, 48261, 48262, 48263, 48264, 48265,
        48266, 48267, 48268, 48269, 48270, 48271, 48272, 48273, 48274, 48275,
        48276, 48277, 48278, 48279, 48280, 48281, 48282, 48283, 48284, 48285,
        48286, 48287, 48288, 48289, 48290, 48291, 48292, 48293, 48294, 48295,
        48296, 48297, 48298, 48299, 48500, 48501, 48502, 48503, 48504, 48505,
        48506, 48507, 48508, 48509, 48510, 48511, 48512, 48513, 48514, 48515,
        48516, 48517, 48518, 48519, 48520, 48521, 48522, 48800, 48801, 48802,
        48803, 48804, 48805, 48806,
    ]
);

/// Grid limits of the 33xxx range.
pub const OBSERVATION_33XXX_SENSORS: &[Descriptor] = &observation_block!(
    Kind::Grid;
    [
        integer("obs_33002", 33002, "Obs 33002 (Limit?)", ""),
        integer("obs_33005", 33005, "Obs 33005 (Limit?)", ""),
        integer("obs_33007", 33007, "Obs 33007 (Limit?)", ""),
        integer("obs_33010", 33010, "Obs 33010 (Power?)", ""),
        integer("obs_33012", 33012, "Obs 33012 (Power?)", ""),
        integer("obs_33015", 33015, "Obs 33015 (Unknown)", ""),
        integer("obs_33017", 33017, "Obs 33017 (Limit?)", ""),
        integer("obs_33050", 33050, "Obs 33050 (Power?)", ""),
        integer("obs_33052", 33052, "Obs 33052 (Power?)", ""),
        integer("obs_33054", 33054, "Obs 33054 (Power?)", ""),
        integer("obs_33071", 33071, "Obs 33071 (Unknown)", ""),
        integer("obs_33072", 33072, "Obs 33072 (Unknown)", ""),
        integer("obs_33073", 33073, "Obs 33073 (Unknown)", ""),
        integer("obs_33074", 33074, "Obs 33074 (Unknown)", ""),
        integer("obs_33079", 33079, "Obs 33079 (Unknown)", ""),
        integer("obs_33075", 33075, "Obs 33075 (Unknown)", ""),
        integer("obs_33076", 33076, "Obs 33076 (Unknown)", ""),
        integer("obs_33077", 33077, "Obs 33077 (Unknown)", ""),
        integer("obs_33078", 33078, "Obs 33078 (Unknown)", ""),
    ];
    [
        33000, 33001, 33003, 33004, 33006, 33008, 33009, 33011, 33013, 33014,
        33016, 33018, 33019, 33020, 33021, 33022, 33023, 33024, 33025, 33026,
        33027, 33028, 33029, 33030, 33031, 33032, 33033, 33034, 33035, 33036,
        33037, 33038, 33039, 33040, 33041, 33042, 33043, 33044, 33045, 33046,
        33047, 33048, 33049, 33051, 33053, 33055, 33056, 33057, 33058, 33059,
        33060, 33061, 33062, 33063, 33064, 33065, 33066, 33067, 33068, 33069,
        33070, 33080, 33081, 33082, 33083, 33084, 33085, 33086, 33087, 33088,
        33089, 33090, 33091, 33092, 33093, 33094, 33095, 33096, 33097, 33098,
        33099, 33288, 33289, 33290, 33291, 33292, 33293, 33294, 33295, 33500,
        33501,
    ]
);

/// Grid phase settings of the 38xxx range.
pub const OBSERVATION_38XXX_SENSORS: &[Descriptor] = &observation_block!(
    Kind::Grid;
    [
        integer("obs_38001", 38001, "Obs 38001 (Unknown)", ""),
        integer("obs_38002", 38002, "Obs 38002 (Unknown)", ""),
        integer("obs_38009", 38009, "Obs 38009 (Voltage?)", ""),
        integer("obs_38029", 38029, "Obs 38029 (Voltage?)", ""),
        integer("obs_38049", 38049, "Obs 38049 (Voltage?)", ""),
        integer("obs_38051", 38051, "Obs 38051 (Unknown)", ""),
        integer("obs_38451", 38451, "Obs 38451 (Unknown)", ""),
        integer("obs_38452", 38452, "Obs 38452 (Unknown)", ""),
        integer("obs_38453", 38453, "Obs 38453 (Unknown)", ""),
        integer("obs_38458", 38458, "Obs 38458 (Unknown)", ""),
    ];
    [
        38000, 38003, 38004, 38005, 38006, 38007, 38008, 38010, 38011, 38012,
        38013, 38014, 38015, 38016, 38017, 38018, 38019, 38020, 38021, 38022,
        38023, 38024, 38025, 38026, 38027, 38028, 38030, 38031, 38032, 38033,
        38034, 38035, 38036, 38037, 38038, 38039, 38040, 38041, 38042, 38043,
        38044, 38045, 38046, 38047, 38048, 38050, 38052, 38053, 38054, 38055,
        38056, 38057, 38058, 38059, 38060, 38061, 38062, 38063, 38064, 38065,
        38066, 38067, 38068, 38069, 38070, 38071, 38072, 38073, 38074, 38075,
        38076, 38077, 38078, 38079, 38080, 38081, 38082, 38083, 38084, 38085,
        38086, 38087, 38088, 38089, 38090, 38091, 38092, 38093, 38094, 38095,
        38096, 38097, 38098, 38099, 38450, 38454, 38455, 38456, 38457, 38459,
        38460, 38461, 38462, 38463,
    ]
);

/// Energy counters of the 55xxx range.
pub const OBSERVATION_55XXX_SENSORS: &[Descriptor] = &observation_block!(
    Kind::Ac;
    [
        long("obs_55252", 55252, "Obs 55252 (Energy?)", ""),
        long("obs_55256", 55256, "Obs 55256 (Energy?)", ""),
        long("obs_55260", 55260, "Obs 55260 (Energy?)", ""),
        long("obs_55264", 55264, "Obs 55264 (Energy?)", ""),
        long("obs_55268", 55268, "Obs 55268 (Energy?)", ""),
        long("obs_55272", 55272, "Obs 55272 (Energy?)", ""),
        long("obs_55276", 55276, "Obs 55276 (Energy?)", ""),
        long("obs_55280", 55280, "Obs 55280 (Energy?)", ""),
    ];
    [
        55000, 55250, 55251, 55253, 55254, 55255, 55257, 55258, 55259, 55261,
        55262, 55263, 55265, 55266, 55267, 55269, 55270, 55271, 55273, 55274,
        55275, 55277, 55278, 55279, 55281, 55282, 55283, 55284, 55285, 55286,
        55287, 55288, 55289, 55290, 55291, 55292, 55293, 55294, 55295, 55296,
        55297, 55298, 55299, 55300, 55301, 55302, 55303, 55304, 55305, 55306,
        55307, 55308, 55309, 55310, 55311, 55312, 55313, 55314, 55315, 55316,
        55400, 55401, 55402,
    ]
);

/// Undocumented sensors decoded by an observation sweep.
pub const fn observation_sensors(range: ObservationRange) -> &'static [Descriptor] {
    match range {
        ObservationRange::R33xxx => OBSERVATION_33XXX_SENSORS,
        ObservationRange::R38xxx => OBSERVATION_38XXX_SENSORS,
        ObservationRange::R48xxx => OBSERVATION_48XXX_SENSORS,
        ObservationRange::R55xxx => OBSERVATION_55XXX_SENSORS,
    }
}

/// Settings present on every firmware.
pub const BASE_SETTINGS: &[Descriptor] = &[
    integer("comm_address", 45127, "Communication Address", ""),
    long("modbus_baud_rate", 45132, "Modbus Baud rate", ""),
    Descriptor::new("time", 45200, Rule::Timestamp, "Inverter time", ""),
    integer("sensitivity_check", 45246, "Sensitivity Check Mode", "").kind(Kind::Ac),
    integer("cold_start", 45248, "Cold Start", "").kind(Kind::Ac),
    integer("shadow_scan", 45251, "Shadow Scan", "").kind(Kind::Pv),
    integer("backup_supply", 45252, "Backup Supply", "").kind(Kind::Ups),
    integer("unbalanced_output", 45264, "Unbalanced Output", "").kind(Kind::Ac),
    integer("pen_relay", 45288, "PE-N Relay", "").kind(Kind::Ac),
    integer("battery_capacity", 45350, "Battery Capacity", "Ah").kind(Kind::Bat),
    integer("battery_modules", 45351, "Battery Modules", "").kind(Kind::Bat),
    voltage("battery_charge_voltage", 45352, "Battery Charge Voltage").kind(Kind::Bat),
    current("battery_charge_current", 45353, "Battery Charge Current").kind(Kind::Bat),
    voltage("battery_discharge_voltage", 45354, "Battery Discharge Voltage").kind(Kind::Bat),
    current("battery_discharge_current", 45355, "Battery Discharge Current").kind(Kind::Bat),
    percent("battery_discharge_depth", 45356, "Battery Discharge Depth").kind(Kind::Bat),
    voltage(
        "battery_discharge_voltage_offline",
        45357,
        "Battery Discharge Voltage (off-line)",
    )
    .kind(Kind::Bat),
    percent("battery_discharge_depth_offline", 45358, "Battery Discharge Depth (off-line)")
        .kind(Kind::Bat),
    decimal("power_factor", 45482, 100, "Power Factor", ""),
    integer_s("fixed_reactive_power", 45483, "Fixed Reactive Power", "‰").kind(Kind::Grid),
    integer("fixed_power_factor_enable", 45539, "Fixed Power Factor Enable", "").kind(Kind::Grid),
    integer("fixed_q_power_flag", 45542, "Fixed Q Power Flag", "").kind(Kind::Grid),
    integer("work_mode", 47000, "Work Mode", "").kind(Kind::Ac),
    integer("dred", 47010, "DRED/Remote Shutdown", "").kind(Kind::Ac),
    integer("meter_target_power_offset", 47120, "Meter Target Power Offset", "W").kind(Kind::Ac),
    integer("battery_soc_protection", 47500, "Battery SoC Protection", "").kind(Kind::Bat),
    integer("grid_export", 47509, "Grid Export Limit Enabled", "").kind(Kind::Grid),
    integer("grid_export_limit", 47510, "Grid Export Limit", "W").kind(Kind::Grid),
    integer("ems_power_mode", 47511, "EMS Power Mode", "").kind(Kind::Bat),
    integer("ems_power", 47512, "EMS Power", "W").kind(Kind::Bat),
    integer("battery_protocol_code", 47514, "Battery Protocol Code", "").kind(Kind::Bat),
    // The switch is the on/off byte of its group
    Descriptor::new("eco_mode_1", 47515, Rule::EcoMode, "Eco Mode Group 1", "").kind(Kind::Bat),
    Descriptor::new("eco_mode_1_switch", 47518, Rule::ByteH, "Eco Mode Group 1 Switch", ""),
    Descriptor::new("eco_mode_2", 47519, Rule::EcoMode, "Eco Mode Group 2", "").kind(Kind::Bat),
    Descriptor::new("eco_mode_2_switch", 47522, Rule::ByteH, "Eco Mode Group 2 Switch", ""),
    Descriptor::new("eco_mode_3", 47523, Rule::EcoMode, "Eco Mode Group 3", "").kind(Kind::Bat),
    Descriptor::new("eco_mode_3_switch", 47526, Rule::ByteH, "Eco Mode Group 3 Switch", ""),
    Descriptor::new("eco_mode_4", 47527, Rule::EcoMode, "Eco Mode Group 4", "").kind(Kind::Bat),
    Descriptor::new("eco_mode_4_switch", 47530, Rule::ByteH, "Eco Mode Group 4 Switch", ""),
    percent("force_charge_soc_start", 47531, "Force Charge Start SoC").kind(Kind::Bat),
    percent("force_charge_soc_stop", 47532, "Force Charge Stop SoC").kind(Kind::Bat),
    integer("clear_eco_time", 47533, "Clear ECO Time Settings", "").kind(Kind::Bat),
    integer("wifi_reset", 47539, "WiFi Reset", "").kind(Kind::Ac),
    integer("wifi_reload", 47541, "WiFi Reload", "").kind(Kind::Ac),
    // BMS values as seen by the EMS
    integer("bms_version", 47900, "BMS Version", ""),
    integer("bms_bat_modules", 47901, "BMS Battery Modules", ""),
    voltage("bms_bat_charge_v_max", 47902, "BMS Battery Charge Voltage (max)").kind(Kind::Bms),
    current("bms_bat_charge_i_max", 47903, "BMS Battery Charge Current (max)").kind(Kind::Bms),
    voltage("bms_bat_discharge_v_min", 47904, "BMS Battery Discharge Voltage (min)")
        .kind(Kind::Bms),
    current("bms_bat_discharge_i_max", 47905, "BMS Battery Discharge Current (max)")
        .kind(Kind::Bms),
    voltage("bms_bat_voltage", 47906, "BMS Battery Voltage").kind(Kind::Bms),
    current("bms_bat_current", 47907, "BMS Battery Current").kind(Kind::Bms),
    integer("bms_bat_soc", 47908, "BMS Battery State of Charge", "%").kind(Kind::Bms),
    integer("bms_bat_soh", 47909, "BMS Battery State of Health", "%").kind(Kind::Bms),
    temp("bms_bat_temperature", 47910, "BMS Battery Temperature").kind(Kind::Bms),
    long("bms_bat_warning_code", 47911, "BMS Battery Warning Code", ""),
    long("bms_bat_alarm_code", 47913, "BMS Battery Alarm Code", ""),
    integer("bms_status", 47915, "BMS Status", ""),
    integer("bms_comm_loss_disable", 47916, "BMS Communication Loss Disable", ""),
    integer("bms_battery_string_rate_v", 47917, "BMS Battery String Rate Voltage", ""),
    integer("bms2_version", 47918, "BMS2 Version", ""),
    integer("bms2_bat_modules", 47919, "BMS2 Battery Modules", ""),
    voltage("bms2_bat_charge_v_max", 47920, "BMS2 Battery Charge Voltage (max)").kind(Kind::Bms),
    current("bms2_bat_charge_i_max", 47921, "BMS2 Battery Charge Current (max)").kind(Kind::Bms),
    voltage("bms2_bat_discharge_v_min", 47922, "BMS2 Battery Discharge Voltage (min)")
        .kind(Kind::Bms),
    current("bms2_bat_discharge_i_max", 47923, "BMS2 Battery Discharge Current (max)")
        .kind(Kind::Bms),
    voltage("bms2_bat_voltage", 47924, "BMS2 Battery Voltage").kind(Kind::Bms),
    current("bms2_bat_current", 47925, "BMS2 Battery Current").kind(Kind::Bms),
    integer("bms2_bat_soc", 47926, "BMS2 Battery State of Charge", "%").kind(Kind::Bms),
    integer("bms2_bat_soh", 47927, "BMS2 Battery State of Health", "%").kind(Kind::Bms),
    temp("bms2_bat_temperature", 47928, "BMS2 Battery Temperature").kind(Kind::Bms),
    long("bms2_bat_warning_code", 47929, "BMS2 Battery Warning Code", ""),
    long("bms2_bat_alarm_code", 47931, "BMS2 Battery Alarm Code", ""),
    integer("bms2_status", 47933, "BMS2 Status", ""),
    integer("bms2_comm_loss_disable", 47934, "BMS2 Communication Loss Disable", ""),
    integer("bms2_battery_string_rate_v", 47935, "BMS2 Battery String Rate Voltage", ""),
];

/// Six registers per time-of-use slot: start, end, work week, two parameters and months.
macro_rules! tou_slots {
    ($($slot:literal => $start:literal),* $(,)?) => {
        [$(
            Descriptor::new(
                concat!("tou_slot", $slot, "_start_time"),
                $start,
                Rule::TimeOfDay,
                concat!("TOU Slot ", $slot, " Start Time"),
                "",
            )
            .kind(Kind::Bat),
            Descriptor::new(
                concat!("tou_slot", $slot, "_end_time"),
                $start + 1,
                Rule::TimeOfDay,
                concat!("TOU Slot ", $slot, " End Time"),
                "",
            )
            .kind(Kind::Bat),
            Descriptor::new(
                concat!("tou_slot", $slot, "_work_week"),
                $start + 2,
                Rule::WorkWeek,
                concat!("TOU Slot ", $slot, " Work Week"),
                "",
            )
            .kind(Kind::Bat),
            integer(
                concat!("tou_slot", $slot, "_param1"),
                $start + 3,
                concat!("TOU Slot ", $slot, " Parameter 1"),
                "",
            )
            .kind(Kind::Bat),
            integer(
                concat!("tou_slot", $slot, "_param2"),
                $start + 4,
                concat!("TOU Slot ", $slot, " Parameter 2"),
                "",
            )
            .kind(Kind::Bat),
            Descriptor::new(
                concat!("tou_slot", $slot, "_months"),
                $start + 5,
                Rule::MonthMask,
                concat!("TOU Slot ", $slot, " Months"),
                "",
            )
            .kind(Kind::Bat),
        )*]
    };
}

/// Five registers per export schedule slot: start, signed limit and period.
macro_rules! feed_power_slots {
    ($($slot:literal => $start:literal),* $(,)?) => {
        [$(
            Descriptor::new(
                concat!("feed_power_start_time_", $slot),
                $start,
                Rule::Seconds32,
                concat!("Feed Power Start Time ", $slot),
                "s",
            )
            .kind(Kind::Grid),
            long_s(
                concat!("feed_power_limit_", $slot),
                $start + 2,
                concat!("Feed Power Limit ", $slot),
                "W",
            )
            .kind(Kind::Grid),
            Descriptor::new(
                concat!("feed_power_period_", $slot),
                $start + 4,
                Rule::Seconds16,
                concat!("Feed Power Period ", $slot),
                "s",
            )
            .kind(Kind::Grid),
        )*]
    };
}

/// Fast charging, ARM firmware 19.
pub const FAST_CHARGING_SETTINGS: &[Descriptor] = &tagged(
    Feature::EcoModeV2,
    [
        integer("fast_charging", 47545, "Fast Charging Enabled", "").kind(Kind::Bat),
        percent("fast_charging_soc", 47546, "Fast Charging SoC").kind(Kind::Bat),
    ],
);

/// TOU slots 1-4, ARM firmware 19.
pub const TOU_SETTINGS: &[Descriptor] = &tagged(
    Feature::EcoModeV2,
    tou_slots!(1 => 47547, 2 => 47553, 3 => 47559, 4 => 47565),
);

/// Load control and EMS tuning, ARM firmware 19.
pub const LOAD_CONTROL_SETTINGS: &[Descriptor] = &tagged(
    Feature::EcoModeV2,
    [
        integer("load_control_mode", 47595, "Load Control Mode", "").kind(Kind::Ac),
        integer("load_control_switch", 47596, "Load Control Switch", "").kind(Kind::Ac),
        percent("load_control_soc", 47597, "Load Control SoC").kind(Kind::Ac),
        integer("hardware_feed_power", 47599, "Hardware Feed Power", ""),
        integer("pcs_powersave_mode", 47600, "PCS Powersave Mode", "").kind(Kind::Bat),
        integer("old_meter_protocol", 47601, "Old Meter Protocol", "").kind(Kind::Grid),
        percent("fast_charging_power", 47603, "Fast Charging Power").kind(Kind::Bat),
        integer("load_regulation_generator_flag", 47604, "Load Regulation or Generator Flag", "")
            .kind(Kind::Ac),
        integer("pv_sell_first", 47613, "PV Sell First", "").kind(Kind::Pv),
        integer("bat_feedpower_offset", 47614, "Battery FeedPower Offset", "W").kind(Kind::Bat),
        percent("battery_current_coff", 47615, "Battery Current Coefficient").kind(Kind::Bat),
        integer("parallel_strong_charge_power", 47616, "Strong Charge Power", "‰")
            .kind(Kind::Bat),
        integer("battery2_protocol_code", 47618, "Battery2 Protocol Code", "").kind(Kind::Bat),
    ],
);

/// Export power schedule, 24 slots, ARM firmware 19.
pub const FEED_POWER_SETTINGS: &[Descriptor] = &tagged(
    Feature::EcoModeV2,
    feed_power_slots!(
        1 => 47619, 2 => 47624, 3 => 47629, 4 => 47634, 5 => 47639, 6 => 47644,
        7 => 47649, 8 => 47654, 9 => 47659, 10 => 47664, 11 => 47669, 12 => 47674,
        13 => 47679, 14 => 47684, 15 => 47689, 16 => 47694, 17 => 47699, 18 => 47704,
        19 => 47709, 20 => 47714, 21 => 47719, 22 => 47724, 23 => 47729, 24 => 47734,
    ),
);

/// South Australian grid ramp settings, ARM firmware 19.
pub const GRID_RAMP_SETTINGS: &[Descriptor] = &tagged(
    Feature::EcoModeV2,
    [
        integer("sapn_up_rate", 47739, "SAPN Up Rate", "%Pn/min").kind(Kind::Grid),
        integer("sapn_down_rate", 47740, "SAPN Down Rate", "%Pn/min").kind(Kind::Grid),
        long_s("sapn_feed_power_preset", 47741, "SAPN Feed Power Preset", "W").kind(Kind::Grid),
        integer("single_battery_paral_enable", 47743, "Single Battery Parallel Enable", "")
            .kind(Kind::Bat),
        integer("battery_busbar_mode", 47744, "Battery Busbar Mode", "").kind(Kind::Bat),
    ],
);

/// Peak shaving, ARM firmware 22.
pub const PEAK_SHAVING_SETTINGS: &[Descriptor] = &tagged(
    Feature::PeakShaving,
    [
        long("peak_shaving_power_limit", 47542, "Peak Shaving Power Limit", "W"),
        percent("peak_shaving_soc", 47544, "Peak Shaving SoC"),
        // Shares its register with the slot 8 work week
        Descriptor::new(
            "peak_shaving_enabled",
            47591,
            Rule::Switch { on: 0xFC00, off: 0x0300 },
            "Peak Shaving Enabled",
            "",
        )
        .kind(Kind::Bat),
    ],
);

/// TOU slots 5-8, ARM firmware 22.
pub const EXTENDED_TOU_SETTINGS: &[Descriptor] = &tagged(
    Feature::PeakShaving,
    tou_slots!(5 => 47571, 6 => 47577, 7 => 47583, 8 => 47589),
);

/// Mode switches, ARM firmware 22.
pub const MODE_SWITCH_SETTINGS: &[Descriptor] = &tagged(
    Feature::PeakShaving,
    [
        integer("dod_holding", 47602, "DoD Holding", "").kind(Kind::Bat),
        integer("backup_mode_enable", 47605, "Backup Mode Switch", ""),
        integer("max_charge_power", 47606, "Max Charge Power", ""),
        integer("smart_charging_enable", 47609, "Smart Charging Mode Switch", ""),
        integer("eco_mode_enable", 47612, "Eco Mode Switch", ""),
    ],
);

/// Every setting group, in catalog order.
pub const SETTING_GROUPS: &[&[Descriptor]] = &[
    BASE_SETTINGS,
    FAST_CHARGING_SETTINGS,
    TOU_SETTINGS,
    LOAD_CONTROL_SETTINGS,
    FEED_POWER_SETTINGS,
    GRID_RAMP_SETTINGS,
    PEAK_SHAVING_SETTINGS,
    EXTENDED_TOU_SETTINGS,
    MODE_SWITCH_SETTINGS,
];

/// The full, unfiltered sensor catalog.
pub fn all_sensors() -> impl Iterator<Item = &'static Descriptor> {
    SENSOR_BLOCKS.iter().flat_map(|block| block.sensors.iter())
}

/// The full, unfiltered setting catalog.
pub fn all_settings() -> impl Iterator<Item = &'static Descriptor> {
    SETTING_GROUPS.iter().flat_map(|group| group.iter())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use strum::IntoEnumIterator;

    use super::*;

    fn words(start: u16, count: u16, values: &[(u16, u16)]) -> RegisterBlock {
        let mut data = vec![0u8; count as usize * 2];
        for (address, value) in values {
            let at = (address - start) as usize * 2;
            data[at..at + 2].copy_from_slice(&value.to_be_bytes());
        }
        RegisterBlock::new(start, data)
    }

    #[test]
    fn ids_are_unique() {
        let mut seen = BTreeSet::new();
        for descriptor in all_sensors() {
            assert!(seen.insert(descriptor.id), "duplicate sensor {}", descriptor.id);
        }
        let mut seen = BTreeSet::new();
        for descriptor in all_settings() {
            assert!(seen.insert(descriptor.id), "duplicate setting {}", descriptor.id);
        }
    }

    #[test]
    fn sensors_fit_their_block() {
        for block in SENSOR_BLOCKS {
            for descriptor in block.sensors {
                assert_eq!(descriptor.feature, block.feature, "{}", descriptor.id);
                assert!(descriptor.offset >= block.start, "{}", descriptor.id);
                assert!(
                    descriptor.offset + descriptor.register_count() <= block.end(),
                    "{} overruns {}",
                    descriptor.id,
                    block.name
                );
            }
            assert!(block.count <= 125);
        }
    }

    #[test]
    fn observation_sensors_fit_their_range() {
        let regular: BTreeSet<_> = all_sensors().map(|descriptor| descriptor.id).collect();
        let mut seen = BTreeSet::new();
        for range in ObservationRange::iter() {
            let (first, last) = range.bounds();
            for descriptor in observation_sensors(range) {
                assert!(seen.insert(descriptor.id), "duplicate {}", descriptor.id);
                assert!(!regular.contains(descriptor.id), "{}", descriptor.id);
                assert!(descriptor.offset >= first, "{}", descriptor.id);
                assert!(
                    descriptor.offset + descriptor.register_count() - 1 <= last,
                    "{} overruns {range}",
                    descriptor.id
                );
                assert_eq!(descriptor.feature, None);
            }
        }
        assert_eq!(OBSERVATION_48XXX_SENSORS[0].id, "obs_48000");
        assert_eq!(OBSERVATION_48XXX_SENSORS[0].register_count(), 2);
        let plain = OBSERVATION_33XXX_SENSORS
            .iter()
            .find(|descriptor| descriptor.offset == 33501)
            .unwrap();
        assert_eq!(plain.id, "obs_33501");
        assert_eq!(plain.label, "Obs 33501");
    }

    #[test]
    fn generated_slots() {
        assert_eq!(TOU_SETTINGS.len(), 24);
        assert_eq!(TOU_SETTINGS[0].id, "tou_slot1_start_time");
        assert_eq!(TOU_SETTINGS[23].id, "tou_slot4_months");
        assert_eq!(TOU_SETTINGS[23].offset, 47570);
        assert_eq!(EXTENDED_TOU_SETTINGS[21].id, "tou_slot8_param1");
        assert_eq!(EXTENDED_TOU_SETTINGS[22].id, "tou_slot8_param2");
        assert_eq!(EXTENDED_TOU_SETTINGS[22].offset, 47593);

        assert_eq!(FEED_POWER_SETTINGS.len(), 72);
        let last = &FEED_POWER_SETTINGS[71];
        assert_eq!(last.id, "feed_power_period_24");
        assert_eq!(last.offset, 47738);
        assert_eq!(last.label, "Feed Power Period 24");
    }

    #[test]
    fn setting_groups_are_tagged() {
        assert!(BASE_SETTINGS.iter().all(|s| s.feature.is_none()));
        assert!(TOU_SETTINGS.iter().all(|s| s.feature == Some(Feature::EcoModeV2)));
        assert!(
            PEAK_SHAVING_SETTINGS
                .iter()
                .all(|s| s.feature == Some(Feature::PeakShaving))
        );
    }

    #[test]
    fn coordinator_only_ranges() {
        assert!(is_coordinator_only(10400));
        assert!(is_coordinator_only(10411));
        assert!(!is_coordinator_only(10412));
        assert!(is_coordinator_only(36000));
        assert!(is_coordinator_only(37000));
        assert!(is_coordinator_only(47510));
        assert!(is_coordinator_only(47591));
        assert!(!is_coordinator_only(47592));
        assert!(!is_coordinator_only(47593));
        assert!(is_coordinator_only(47594));
        assert!(!is_coordinator_only(45353));
        assert!(!is_coordinator_only(35100));
        assert!(is_coordinator_only(39000));
    }

    #[test]
    fn calculated_pv_and_house_power() {
        let block = words(
            35100,
            125,
            &[
                (35106, 1500),
                (35110, 700),
                // ppv3 reads -5
                (35113, 0xFFFF),
                (35114, 0xFFFB),
                (35183, 200),
                (35140, (-300i16) as u16),
            ],
        );
        let ppv = PRIMARY_SENSORS.iter().find(|s| s.id == "ppv").unwrap();
        assert_eq!(ppv.decode(&block), Some(Value::Integer(2200)));

        let house = PRIMARY_SENSORS
            .iter()
            .find(|s| s.id == "house_consumption")
            .unwrap();
        assert_eq!(house.decode(&block), Some(Value::Integer(1500 + 700 - 5 + 200 + 300)));
    }

    #[test]
    fn grid_direction() {
        let find = |id| PRIMARY_SENSORS.iter().find(|s| s.id == id).unwrap();
        let importing = words(35100, 125, &[(35140, (-300i16) as u16)]);
        let exporting = words(35100, 125, &[(35140, 90)]);
        let idle = words(35100, 125, &[(35140, (-90i16) as u16)]);

        assert_eq!(find("grid_in_out").decode(&importing), Some(Value::Integer(2)));
        assert_eq!(find("grid_in_out").decode(&exporting), Some(Value::Integer(1)));
        assert_eq!(find("grid_in_out").decode(&idle), Some(Value::Integer(0)));
        assert_eq!(
            find("grid_in_out_label").decode(&exporting),
            Some(Value::Label("Exporting"))
        );
    }
}
