// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Measurement classification for normalized records.

/// The downstream measurement a record belongs to.
///
/// Time-series stores group records by measurement name; the normalizer
/// classifies every device record into one of the first three kinds, and the
/// relay's variable path uses [`Measurement::VariableChanges`].
///
/// # Examples
///
/// ```
/// use deltacast::types::Measurement;
///
/// assert_eq!(Measurement::ThermostatChanges.as_str(), "thermostat_changes");
/// assert_eq!(Measurement::parse("weather_changes"), Some(Measurement::WeatherChanges));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Measurement {
    /// A generic device update.
    #[default]
    DeviceChanges,
    /// An update from a device with a heat setpoint state.
    ThermostatChanges,
    /// An update from a weather station device.
    WeatherChanges,
    /// A host variable update.
    VariableChanges,
}

impl Measurement {
    /// Returns the measurement name used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DeviceChanges => "device_changes",
            Self::ThermostatChanges => "thermostat_changes",
            Self::WeatherChanges => "weather_changes",
            Self::VariableChanges => "variable_changes",
        }
    }

    /// Parses a wire measurement name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "device_changes" => Some(Self::DeviceChanges),
            "thermostat_changes" => Some(Self::ThermostatChanges),
            "weather_changes" => Some(Self::WeatherChanges),
            "variable_changes" => Some(Self::VariableChanges),
            _ => None,
        }
    }
}

impl std::fmt::Display for Measurement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl serde::Serialize for Measurement {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
