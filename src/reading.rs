//! Reading — one record from the `/history` endpoint.
//!
//! DESIGN
//! ======
//! The server stores one row per telemetry ingest and returns them newest
//! first. Only `temperature` is required; every other column is nullable
//! server-side and deserializes to `None` when absent. Decisions arrive as
//! `COMMAND:STATE` strings and are parsed lazily for presentation only;
//! change detection always compares the raw string.

use std::fmt;

use serde::Deserialize;

/// Temperature at or above which the room counts as hot.
pub const TEMPERATURE_THRESHOLD_C: f64 = 30.0;

// =============================================================================
// READING
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Reading {
    /// Raw decision string, e.g. `GREEN_ON:RECOVERY_MODE`.
    pub decision: Option<String>,
    pub temperature: f64,
    /// Human-facing explanation shown as the call to action.
    pub human_notes: Option<String>,
    pub id: Option<i64>,
    pub timestamp: Option<String>,
    pub humidity: Option<f64>,
    pub prediction_30: Option<f64>,
    pub prediction_60: Option<f64>,
}

impl Reading {
    /// Temperature text as shown on the dashboard.
    #[must_use]
    pub fn temperature_label(&self) -> String {
        format!("{}°C", self.temperature)
    }

    #[must_use]
    pub fn notes(&self) -> &str {
        self.human_notes.as_deref().unwrap_or("")
    }

    #[must_use]
    pub fn band(&self) -> TemperatureBand {
        TemperatureBand::classify(self.temperature)
    }

    /// Secondary line: humidity, forecasts and update time, whichever are present.
    #[must_use]
    pub fn outlook_label(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(humidity) = self.humidity {
            parts.push(format!("humidity {humidity}%"));
        }
        if let Some(p30) = self.prediction_30 {
            parts.push(format!("30m {p30:.1}°C"));
        }
        if let Some(p60) = self.prediction_60 {
            parts.push(format!("60m {p60:.1}°C"));
        }
        if let Some(timestamp) = &self.timestamp {
            parts.push(format!("updated {timestamp}"));
        }
        if parts.is_empty() { None } else { Some(parts.join(" · ")) }
    }

    /// Parsed decision, or `None` when the record carries no decision.
    #[must_use]
    pub fn parsed_decision(&self) -> Option<Decision> {
        self.decision.as_deref().map(Decision::parse)
    }
}

// =============================================================================
// DECISION
// =============================================================================

/// LED command half of a decision string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedCommand {
    /// System idle, saving energy.
    RedOn,
    /// AI predicts a change; warning.
    YellowBlink,
    /// Cooling active.
    GreenOn,
    Other(String),
}

impl LedCommand {
    fn parse(raw: &str) -> Self {
        match raw {
            "RED_ON" => Self::RedOn,
            "YELLOW_BLINK" => Self::YellowBlink,
            "GREEN_ON" => Self::GreenOn,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Card class for this command, if it maps to a known LED color.
    #[must_use]
    pub fn card_class(&self) -> Option<&'static str> {
        match self {
            Self::RedOn => Some("led-red"),
            Self::YellowBlink => Some("led-yellow"),
            Self::GreenOn => Some("led-green"),
            Self::Other(_) => None,
        }
    }

    #[must_use]
    pub fn meaning(&self) -> &'static str {
        match self {
            Self::RedOn => "idle",
            Self::YellowBlink => "AI warning",
            Self::GreenOn => "cooling active",
            Self::Other(_) => "unknown",
        }
    }
}

impl fmt::Display for LedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RedOn => f.write_str("RED_ON"),
            Self::YellowBlink => f.write_str("YELLOW_BLINK"),
            Self::GreenOn => f.write_str("GREEN_ON"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub command: LedCommand,
    pub state: Option<String>,
}

impl Decision {
    /// Split `COMMAND:STATE` on the first colon. A bare command has no state.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let (command, state) = match raw.split_once(':') {
            Some((command, state)) => (command, Some(state)),
            None => (raw, None),
        };
        Self {
            command: LedCommand::parse(command.trim()),
            state: state
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned),
        }
    }

    /// Display form, e.g. `GREEN_ON · RECOVERY_MODE (cooling active)`.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.state {
            Some(state) => format!("{} · {state} ({})", self.command, self.command.meaning()),
            None => format!("{} ({})", self.command, self.command.meaning()),
        }
    }
}

// =============================================================================
// TEMPERATURE BAND
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureBand {
    Comfortable,
    Hot,
}

impl TemperatureBand {
    #[must_use]
    pub fn classify(temperature: f64) -> Self {
        if temperature >= TEMPERATURE_THRESHOLD_C {
            Self::Hot
        } else {
            Self::Comfortable
        }
    }

    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Comfortable => "comfortable",
            Self::Hot => "hot",
        }
    }
}

#[cfg(test)]
#[path = "reading_test.rs"]
mod tests;
