// Closed vocabularies for the API surface.
//
// Device kinds, device actions and sensor kinds are parsed and validated
// here, before any request path is built from them.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::error::Error;

// ── Devices ─────────────────────────────────────────────────────────

/// A controllable device exposed by the API.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DeviceKind {
    AirConditioner,
    FireSystem,
    Lamp,
}

impl DeviceKind {
    /// Suffix the API uses for this device in status and control paths.
    pub const fn path_suffix(self) -> &'static str {
        match self {
            Self::AirConditioner => "ar-condicionado",
            Self::FireSystem => "sistema-incendio",
            Self::Lamp => "lampada",
        }
    }

    /// `/api/status-{suffix}`
    pub fn status_endpoint(self) -> String {
        format!("/api/status-{}", self.path_suffix())
    }

    /// `/api/{action}-{suffix}`
    pub fn control_endpoint(self, action: DeviceAction) -> String {
        format!("/api/{}-{}", action.path_segment(), self.path_suffix())
    }
}

impl FromStr for DeviceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "air-conditioner" | "ac" | "ar-condicionado" => Ok(Self::AirConditioner),
            "fire-system" | "fire" | "sistema-incendio" => Ok(Self::FireSystem),
            "lamp" | "light" | "lampada" => Ok(Self::Lamp),
            _ => Err(Error::InvalidDevice(s.to_owned())),
        }
    }
}

/// A control action. The API only knows switching on and off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DeviceAction {
    TurnOn,
    TurnOff,
}

impl DeviceAction {
    /// Path segment interpolated into control endpoints.
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::TurnOn => "ligar",
            Self::TurnOff => "desligar",
        }
    }
}

impl FromStr for DeviceAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" | "turn-on" | "ligar" => Ok(Self::TurnOn),
            "off" | "turn-off" | "desligar" => Ok(Self::TurnOff),
            _ => Err(Error::InvalidAction(s.to_owned())),
        }
    }
}

// ── Sensors ─────────────────────────────────────────────────────────

/// A sensor whose readings are charted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SensorKind {
    Temperature,
    Smoke,
    Luminosity,
}

impl SensorKind {
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Temperature => "/api/temperatura",
            Self::Smoke => "/api/detecao-fumaca",
            Self::Luminosity => "/api/luminosidade",
        }
    }

    /// Name of the JSON field that carries this sensor's reading, when the
    /// server wraps it in an object.
    pub const fn reading_field(self) -> &'static str {
        match self {
            Self::Temperature => "temperatura",
            Self::Smoke => "fumaca",
            Self::Luminosity => "luminosidade",
        }
    }

    /// Display unit for readings.
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Temperature => "°C",
            Self::Smoke => "%",
            Self::Luminosity => " lx",
        }
    }
}

impl FromStr for SensorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "temperature" | "temp" | "temperatura" => Ok(Self::Temperature),
            "smoke" | "fumaca" | "detecao-fumaca" => Ok(Self::Smoke),
            "luminosity" | "light-level" | "luminosidade" => Ok(Self::Luminosity),
            _ => Err(Error::InvalidSensor(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn control_endpoints() {
        assert_eq!(
            DeviceKind::AirConditioner.control_endpoint(DeviceAction::TurnOn),
            "/api/ligar-ar-condicionado"
        );
        assert_eq!(
            DeviceKind::FireSystem.control_endpoint(DeviceAction::TurnOff),
            "/api/desligar-sistema-incendio"
        );
        assert_eq!(
            DeviceKind::Lamp.control_endpoint(DeviceAction::TurnOn),
            "/api/ligar-lampada"
        );
    }

    #[test]
    fn status_endpoints() {
        let paths: Vec<String> = DeviceKind::iter().map(DeviceKind::status_endpoint).collect();
        assert_eq!(
            paths,
            [
                "/api/status-ar-condicionado",
                "/api/status-sistema-incendio",
                "/api/status-lampada",
            ]
        );
    }

    #[test]
    fn parse_actions() {
        assert_eq!("on".parse::<DeviceAction>().unwrap(), DeviceAction::TurnOn);
        assert_eq!(" OFF ".parse::<DeviceAction>().unwrap(), DeviceAction::TurnOff);
        assert_eq!("ligar".parse::<DeviceAction>().unwrap(), DeviceAction::TurnOn);
        assert!(matches!(
            "on-ar-condicionado/../x".parse::<DeviceAction>(),
            Err(Error::InvalidAction(_))
        ));
    }

    #[test]
    fn parse_devices_and_sensors() {
        assert_eq!("ac".parse::<DeviceKind>().unwrap(), DeviceKind::AirConditioner);
        assert_eq!("lampada".parse::<DeviceKind>().unwrap(), DeviceKind::Lamp);
        assert!("toaster".parse::<DeviceKind>().is_err());

        assert_eq!("temp".parse::<SensorKind>().unwrap(), SensorKind::Temperature);
        assert!("humidity".parse::<SensorKind>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for kind in DeviceKind::iter() {
            assert_eq!(kind.to_string().parse::<DeviceKind>().unwrap(), kind);
        }
        for kind in SensorKind::iter() {
            assert_eq!(kind.to_string().parse::<SensorKind>().unwrap(), kind);
        }
    }
}
