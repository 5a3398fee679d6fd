//! Defines the numeric measurement variables recorded by the solar monitoring stations,
//! together with the column names they use in the input files.

use crate::validation::ValidationError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A numeric measurement column of the observation table.
///
/// The *core* variables are present in every station export and are imputed by default.
/// The *extended* variables only appear in some exports (gust and direction sensors,
/// rain gauges, module thermometers); they are carried when present but are not
/// imputation targets unless requested explicitly through [`crate::LoadOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Variable {
    /// Global horizontal irradiance (W/m²).
    #[serde(rename = "GHI")]
    Ghi,
    /// Direct normal irradiance (W/m²).
    #[serde(rename = "DNI")]
    Dni,
    /// Diffuse horizontal irradiance (W/m²).
    #[serde(rename = "DHI")]
    Dhi,
    /// Irradiance measured by module A (W/m²).
    #[serde(rename = "ModA")]
    ModA,
    /// Irradiance measured by module B (W/m²).
    #[serde(rename = "ModB")]
    ModB,
    /// Ambient temperature (°C).
    #[serde(rename = "Tamb")]
    Tamb,
    /// Relative humidity (%).
    #[serde(rename = "RH")]
    Rh,
    /// Wind speed (m/s).
    #[serde(rename = "WS")]
    Ws,
    /// Barometric pressure (hPa).
    #[serde(rename = "BP")]
    Bp,
    /// Maximum wind gust (m/s).
    #[serde(rename = "WSgust")]
    WsGust,
    /// Standard deviation of the wind speed (m/s).
    #[serde(rename = "WSstdev")]
    WsStdev,
    /// Wind direction (° from north).
    #[serde(rename = "WD")]
    Wd,
    /// Standard deviation of the wind direction (°).
    #[serde(rename = "WDstdev")]
    WdStdev,
    /// Precipitation (mm/min).
    #[serde(rename = "Precipitation")]
    Precipitation,
    /// Back-of-module temperature, module A (°C).
    #[serde(rename = "TModA")]
    TModA,
    /// Back-of-module temperature, module B (°C).
    #[serde(rename = "TModB")]
    TModB,
}

impl Variable {
    /// Variables present in every export; the default imputation targets.
    pub const CORE: [Variable; 9] = [
        Variable::Ghi,
        Variable::Dni,
        Variable::Dhi,
        Variable::Tamb,
        Variable::ModA,
        Variable::ModB,
        Variable::Ws,
        Variable::Rh,
        Variable::Bp,
    ];

    /// Every known variable, in canonical column order.
    pub const ALL: [Variable; 16] = [
        Variable::Ghi,
        Variable::Dni,
        Variable::Dhi,
        Variable::ModA,
        Variable::ModB,
        Variable::Tamb,
        Variable::Rh,
        Variable::Ws,
        Variable::WsGust,
        Variable::WsStdev,
        Variable::Wd,
        Variable::WdStdev,
        Variable::Bp,
        Variable::Precipitation,
        Variable::TModA,
        Variable::TModB,
    ];

    /// Column header used for this variable in the input files and the canonical table.
    pub fn column_name(&self) -> &'static str {
        match self {
            Variable::Ghi => "GHI",
            Variable::Dni => "DNI",
            Variable::Dhi => "DHI",
            Variable::ModA => "ModA",
            Variable::ModB => "ModB",
            Variable::Tamb => "Tamb",
            Variable::Rh => "RH",
            Variable::Ws => "WS",
            Variable::Bp => "BP",
            Variable::WsGust => "WSgust",
            Variable::WsStdev => "WSstdev",
            Variable::Wd => "WD",
            Variable::WdStdev => "WDstdev",
            Variable::Precipitation => "Precipitation",
            Variable::TModA => "TModA",
            Variable::TModB => "TModB",
        }
    }

    pub fn is_core(&self) -> bool {
        Variable::CORE.contains(self)
    }

    /// Looks up a variable by its column header. Matching is exact.
    pub fn from_column_name(name: &str) -> Option<Variable> {
        Variable::ALL
            .iter()
            .copied()
            .find(|variable| variable.column_name() == name)
    }
}

/// Formats a `Variable` as its column header.
///
/// # Examples
///
/// ```
/// use solarscope::Variable;
///
/// assert_eq!(Variable::Ghi.to_string(), "GHI");
/// assert_eq!(format!("{}", Variable::WsGust), "WSgust");
/// ```
impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

impl FromStr for Variable {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variable::from_column_name(s).ok_or_else(|| ValidationError::UnknownVariable(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names_round_trip() {
        for variable in Variable::ALL {
            assert_eq!(
                Variable::from_column_name(variable.column_name()),
                Some(variable)
            );
        }
    }

    #[test]
    fn test_core_variables_are_known() {
        assert!(Variable::CORE.iter().all(|v| Variable::ALL.contains(v)));
        assert!(Variable::Bp.is_core());
        assert!(!Variable::WsGust.is_core());
    }

    #[test]
    fn test_parse_unknown_variable() {
        let err = "Irradiance".parse::<Variable>().unwrap_err();
        assert!(matches!(err, ValidationError::UnknownVariable(ref name) if name == "Irradiance"));
        assert_eq!("GHI".parse::<Variable>().unwrap(), Variable::Ghi);
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("ghi".parse::<Variable>().is_err());
    }
}
