// Metric catalogue - the closed set of telemetry channels shown per device
use crate::error::MonitorError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "&'static str")]
pub enum Metric {
    Ethylene,
    Co2,
    SupplyTemperature,
    ReturnAirTemperature,
    RelativeHumidity,
    HoursCounter,
    Airflow,
    CompressorCoil,
    EvaporatorCoil,
    AmbientAir,
    DefrostFlag,
    ProcessState,
    ControlMode,
    CargoTemperature1,
    CargoTemperature2,
}

impl Metric {
    /// Card order on the dashboard.
    pub const ALL: [Metric; 15] = [
        Metric::Ethylene,
        Metric::Co2,
        Metric::SupplyTemperature,
        Metric::ReturnAirTemperature,
        Metric::RelativeHumidity,
        Metric::HoursCounter,
        Metric::Airflow,
        Metric::CompressorCoil,
        Metric::EvaporatorCoil,
        Metric::AmbientAir,
        Metric::DefrostFlag,
        Metric::ProcessState,
        Metric::ControlMode,
        Metric::CargoTemperature1,
        Metric::CargoTemperature2,
    ];

    /// Field name in the backend's live-data records. Also the name trends are keyed by.
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Ethylene => "ethylene",
            Self::Co2 => "co2_reading",
            Self::SupplyTemperature => "temp_supply",
            Self::ReturnAirTemperature => "return_air",
            Self::RelativeHumidity => "relative_humidity",
            Self::HoursCounter => "ripener_prueba",
            Self::Airflow => "avl",
            Self::CompressorCoil => "compress_coil_1",
            Self::EvaporatorCoil => "evaporation_coil",
            Self::AmbientAir => "ambient_air",
            Self::DefrostFlag => "defrost_prueba",
            Self::ProcessState => "stateProcess",
            Self::ControlMode => "controlling_mode",
            Self::CargoTemperature1 => "cargo_1_temp",
            Self::CargoTemperature2 => "cargo_2_temp",
        }
    }

    /// Field the displayed value is read from. Only supply temperature differs
    /// from `field_name`: the card shows sensor 1 while the trend follows the
    /// aggregate reading.
    pub fn display_field(self) -> &'static str {
        match self {
            Self::SupplyTemperature => "temp_supply_1",
            other => other.field_name(),
        }
    }

    pub fn element_prefix(self) -> &'static str {
        match self {
            Self::Ethylene => "ethyleno",
            Self::Co2 => "co2",
            Self::SupplyTemperature => "supply",
            Self::ReturnAirTemperature => "return",
            Self::RelativeHumidity => "humidity",
            Self::HoursCounter => "i_hours",
            Self::Airflow => "avl",
            Self::CompressorCoil => "compressor",
            Self::EvaporatorCoil => "evaporator",
            Self::AmbientAir => "ambient_air",
            Self::DefrostFlag => "pwd",
            Self::ProcessState => "proceso",
            Self::ControlMode => "c_mode",
            Self::CargoTemperature1 => "usda_1",
            Self::CargoTemperature2 => "usda_2",
        }
    }

    pub fn icon_prefix(self) -> &'static str {
        match self {
            Self::Ethylene => "eti_icon",
            Self::Co2 => "co2_icon",
            Self::SupplyTemperature => "supply_icon",
            Self::ReturnAirTemperature => "return_icon",
            Self::RelativeHumidity => "humidity_icon",
            Self::HoursCounter => "i_hours_icon",
            Self::Airflow => "avl_icon",
            Self::CompressorCoil => "compressor_icon",
            Self::EvaporatorCoil => "evaporator_icon",
            Self::AmbientAir => "ambient_air_icon",
            Self::DefrostFlag => "pwd_icon",
            Self::ProcessState => "proceso_icon",
            Self::ControlMode => "c_mode_icon",
            Self::CargoTemperature1 => "usda_1_icon",
            Self::CargoTemperature2 => "usda_2_icon",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Ethylene => "ppm",
            Self::Co2 | Self::RelativeHumidity => "%",
            Self::Airflow => "CFM",
            Self::SupplyTemperature
            | Self::ReturnAirTemperature
            | Self::CompressorCoil
            | Self::EvaporatorCoil
            | Self::AmbientAir
            | Self::CargoTemperature1
            | Self::CargoTemperature2 => "F°",
            Self::HoursCounter | Self::DefrostFlag | Self::ProcessState | Self::ControlMode => "",
        }
    }

    /// Range a displayed value must fall in, if the metric has one.
    pub fn display_range(self) -> Option<(f64, f64)> {
        match self {
            Self::Co2 => Some((0.0, 30.0)),
            _ => None,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl From<Metric> for &'static str {
    fn from(metric: Metric) -> Self {
        metric.field_name()
    }
}

impl FromStr for Metric {
    type Err = MonitorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.field_name() == s)
            .ok_or_else(|| MonitorError::InvalidMetricName(s.to_string()))
    }
}
