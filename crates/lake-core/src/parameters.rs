//! Water-quality parameter catalog
//!
//! The set of parameters is closed. Each parameter carries its display
//! label, unit and the direction in which a change counts as better.

use serde::{Deserialize, Serialize};
use std::fmt;

/// pH value treated as ideal when judging pH trends
pub const IDEAL_PH: f64 = 7.5;

/// Parameters whose trends are reported, in output order
pub const TRACKED_PARAMETERS: [Parameter; 7] = [
    Parameter::Ph,
    Parameter::DissolvedOxygen,
    Parameter::Bod,
    Parameter::Cod,
    Parameter::Turbidity,
    Parameter::Temperature,
    Parameter::TotalColiform,
];

/// Which way a parameter should move to count as an improvement
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Polarity {
    HigherIsBetter,
    LowerIsBetter,
    /// Closer to the target value is better
    Target(f64),
    /// No judgment, only increasing/decreasing
    Neutral,
}

/// Measured water-quality parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Parameter {
    // Physical
    Temperature,
    Turbidity,
    Conductivity,
    Tds,
    Tss,

    // Chemical
    #[serde(rename = "pH")]
    Ph,
    #[serde(rename = "do")]
    DissolvedOxygen,
    Bod,
    Cod,

    // Nutrients
    NitrateN,
    NitriteN,
    AmmoniaN,
    Phosphate,
    Tkn,

    // Major ions
    Chloride,
    Sulphate,
    Sodium,
    Calcium,
    Magnesium,
    Potassium,
    Fluoride,
    Boron,
    Hardness,
    TotalAlkalinity,
    PhenolphthaleinAlkalinity,

    // Microbiological
    FecalColiform,
    TotalColiform,
    FecalStreptococci,

    // Metals
    Arsenic,
    Cadmium,
    Copper,
    Lead,
    Chromium,
    Nickel,
    Zinc,
    Iron,

    // Indices
    SaprobityIndex,
    DiversityIndex,
    SodiumPercentage,
    Sar,
    PrRatio,
}

impl Parameter {
    pub const ALL: [Parameter; 41] = [
        Parameter::Temperature,
        Parameter::Turbidity,
        Parameter::Conductivity,
        Parameter::Tds,
        Parameter::Tss,
        Parameter::Ph,
        Parameter::DissolvedOxygen,
        Parameter::Bod,
        Parameter::Cod,
        Parameter::NitrateN,
        Parameter::NitriteN,
        Parameter::AmmoniaN,
        Parameter::Phosphate,
        Parameter::Tkn,
        Parameter::Chloride,
        Parameter::Sulphate,
        Parameter::Sodium,
        Parameter::Calcium,
        Parameter::Magnesium,
        Parameter::Potassium,
        Parameter::Fluoride,
        Parameter::Boron,
        Parameter::Hardness,
        Parameter::TotalAlkalinity,
        Parameter::PhenolphthaleinAlkalinity,
        Parameter::FecalColiform,
        Parameter::TotalColiform,
        Parameter::FecalStreptococci,
        Parameter::Arsenic,
        Parameter::Cadmium,
        Parameter::Copper,
        Parameter::Lead,
        Parameter::Chromium,
        Parameter::Nickel,
        Parameter::Zinc,
        Parameter::Iron,
        Parameter::SaprobityIndex,
        Parameter::DiversityIndex,
        Parameter::SodiumPercentage,
        Parameter::Sar,
        Parameter::PrRatio,
    ];

    /// Serialized key, e.g. `"do"` for dissolved oxygen
    pub fn key(self) -> &'static str {
        match self {
            Parameter::Temperature => "temperature",
            Parameter::Turbidity => "turbidity",
            Parameter::Conductivity => "conductivity",
            Parameter::Tds => "tds",
            Parameter::Tss => "tss",
            Parameter::Ph => "pH",
            Parameter::DissolvedOxygen => "do",
            Parameter::Bod => "bod",
            Parameter::Cod => "cod",
            Parameter::NitrateN => "nitrateN",
            Parameter::NitriteN => "nitriteN",
            Parameter::AmmoniaN => "ammoniaN",
            Parameter::Phosphate => "phosphate",
            Parameter::Tkn => "tkn",
            Parameter::Chloride => "chloride",
            Parameter::Sulphate => "sulphate",
            Parameter::Sodium => "sodium",
            Parameter::Calcium => "calcium",
            Parameter::Magnesium => "magnesium",
            Parameter::Potassium => "potassium",
            Parameter::Fluoride => "fluoride",
            Parameter::Boron => "boron",
            Parameter::Hardness => "hardness",
            Parameter::TotalAlkalinity => "totalAlkalinity",
            Parameter::PhenolphthaleinAlkalinity => "phenolphthaleinAlkalinity",
            Parameter::FecalColiform => "fecalColiform",
            Parameter::TotalColiform => "totalColiform",
            Parameter::FecalStreptococci => "fecalStreptococci",
            Parameter::Arsenic => "arsenic",
            Parameter::Cadmium => "cadmium",
            Parameter::Copper => "copper",
            Parameter::Lead => "lead",
            Parameter::Chromium => "chromium",
            Parameter::Nickel => "nickel",
            Parameter::Zinc => "zinc",
            Parameter::Iron => "iron",
            Parameter::SaprobityIndex => "saprobityIndex",
            Parameter::DiversityIndex => "diversityIndex",
            Parameter::SodiumPercentage => "sodiumPercentage",
            Parameter::Sar => "sar",
            Parameter::PrRatio => "prRatio",
        }
    }

    /// Human-readable name used in trend output
    pub fn label(self) -> &'static str {
        match self {
            Parameter::Temperature => "Temperature",
            Parameter::Turbidity => "Turbidity",
            Parameter::Conductivity => "Conductivity",
            Parameter::Tds => "Total Dissolved Solids",
            Parameter::Tss => "Total Suspended Solids",
            Parameter::Ph => "pH Level",
            Parameter::DissolvedOxygen => "Dissolved Oxygen",
            Parameter::Bod => "BOD",
            Parameter::Cod => "COD",
            Parameter::NitrateN => "Nitrate-N",
            Parameter::NitriteN => "Nitrite-N",
            Parameter::AmmoniaN => "Ammonia-N",
            Parameter::Phosphate => "Phosphate",
            Parameter::Tkn => "TKN",
            Parameter::Chloride => "Chloride",
            Parameter::Sulphate => "Sulphate",
            Parameter::Sodium => "Sodium",
            Parameter::Calcium => "Calcium",
            Parameter::Magnesium => "Magnesium",
            Parameter::Potassium => "Potassium",
            Parameter::Fluoride => "Fluoride",
            Parameter::Boron => "Boron",
            Parameter::Hardness => "Hardness",
            Parameter::TotalAlkalinity => "Total Alkalinity",
            Parameter::PhenolphthaleinAlkalinity => "Phenolphthalein Alkalinity",
            Parameter::FecalColiform => "Fecal Coliform",
            Parameter::TotalColiform => "Total Coliform",
            Parameter::FecalStreptococci => "Fecal Streptococci",
            Parameter::Arsenic => "Arsenic",
            Parameter::Cadmium => "Cadmium",
            Parameter::Copper => "Copper",
            Parameter::Lead => "Lead",
            Parameter::Chromium => "Total Chromium",
            Parameter::Nickel => "Nickel",
            Parameter::Zinc => "Zinc",
            Parameter::Iron => "Iron",
            Parameter::SaprobityIndex => "Saprobity Index",
            Parameter::DiversityIndex => "Diversity Index",
            Parameter::SodiumPercentage => "Sodium %",
            Parameter::Sar => "SAR",
            Parameter::PrRatio => "P/R Ratio",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Parameter::Temperature => "°C",
            Parameter::Turbidity => "NTU",
            Parameter::Conductivity => "µS/cm",
            Parameter::FecalColiform
            | Parameter::TotalColiform
            | Parameter::FecalStreptococci => "MPN/100ml",
            Parameter::SodiumPercentage => "%",
            Parameter::Ph
            | Parameter::SaprobityIndex
            | Parameter::DiversityIndex
            | Parameter::Sar
            | Parameter::PrRatio => "",
            _ => "mg/L",
        }
    }

    pub fn polarity(self) -> Polarity {
        match self {
            Parameter::DissolvedOxygen => Polarity::HigherIsBetter,
            Parameter::Bod | Parameter::Cod | Parameter::Turbidity | Parameter::TotalColiform => {
                Polarity::LowerIsBetter
            }
            Parameter::Ph => Polarity::Target(IDEAL_PH),
            _ => Polarity::Neutral,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
