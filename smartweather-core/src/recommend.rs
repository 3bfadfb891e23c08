//! Threshold rules turning temperature, humidity and rainfall into suggested actions.
//!
//! All comparisons are strict and evaluated top to bottom; the first match wins.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HvacAction {
    IncreaseCooling,
    IncreaseHeating,
    ActivateDehumidifier,
    MaintainSettings,
}

impl HvacAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            HvacAction::IncreaseCooling => "Increase AC cooling",
            HvacAction::IncreaseHeating => "Increase heating",
            HvacAction::ActivateDehumidifier => "Activate dehumidifier",
            HvacAction::MaintainSettings => "Maintain current settings",
        }
    }
}

impl std::fmt::Display for HvacAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IrrigationAction {
    NoIrrigationRainSufficient,
    IrrigateImmediately,
    MonitorSoilMoisture,
    NoIrrigationHumiditySufficient,
}

impl IrrigationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            IrrigationAction::NoIrrigationRainSufficient => {
                "No irrigation needed (Rainfall sufficient)"
            }
            IrrigationAction::IrrigateImmediately => {
                "Irrigate immediately (Dry conditions detected)"
            }
            IrrigationAction::MonitorSoilMoisture => {
                "Monitor soil moisture (Irrigation may be required soon)"
            }
            IrrigationAction::NoIrrigationHumiditySufficient => {
                "No irrigation needed (Humidity sufficient)"
            }
        }
    }
}

impl std::fmt::Display for IrrigationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

pub fn optimize_hvac(temperature_c: f64, humidity_pct: u8) -> HvacAction {
    if temperature_c > 32.0 {
        HvacAction::IncreaseCooling
    } else if temperature_c < 18.0 {
        HvacAction::IncreaseHeating
    } else if humidity_pct > 70 {
        HvacAction::ActivateDehumidifier
    } else {
        HvacAction::MaintainSettings
    }
}

pub fn irrigation_decision(rainfall_mm: f64, humidity_pct: u8) -> IrrigationAction {
    if rainfall_mm > 5.0 {
        IrrigationAction::NoIrrigationRainSufficient
    } else if humidity_pct < 40 {
        IrrigationAction::IrrigateImmediately
    } else if humidity_pct < 60 {
        IrrigationAction::MonitorSoilMoisture
    } else {
        IrrigationAction::NoIrrigationHumiditySufficient
    }
}

/// Both actions derived from one record. Never stored apart from that record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub hvac: HvacAction,
    pub irrigation: IrrigationAction,
}

impl Recommendation {
    pub fn for_conditions(temperature_c: f64, humidity_pct: u8, rainfall_mm: f64) -> Self {
        Self {
            hvac: optimize_hvac(temperature_c, humidity_pct),
            irrigation: irrigation_decision(rainfall_mm, humidity_pct),
        }
    }
}

pub fn recommend(
    temperature_c: f64,
    humidity_pct: u8,
    rainfall_mm: f64,
) -> (HvacAction, IrrigationAction) {
    let r = Recommendation::for_conditions(temperature_c, humidity_pct, rainfall_mm);
    (r.hvac, r.irrigation)
}
