use std::fmt;

use serde_json::{Map, Value};

/// The device's status document, passed through untouched.
pub type Status = Map<String, Value>;

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum RelayState {
    On,
    Off,
}

impl RelayState {
    pub fn is_on(self) -> bool {
        self == RelayState::On
    }
}

impl From<bool> for RelayState {
    fn from(ison: bool) -> Self {
        if ison {
            RelayState::On
        } else {
            RelayState::Off
        }
    }
}

impl From<RelayState> for bool {
    fn from(state: RelayState) -> Self {
        state.is_on()
    }
}

impl fmt::Display for RelayState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RelayState::On => f.write_str("on"),
            RelayState::Off => f.write_str("off"),
        }
    }
}

/// Value of the `turn` parameter of `/relay/{id}`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Turn {
    On,
    Off,
    Toggle,
}

impl Turn {
    pub fn as_str(self) -> &'static str {
        match self {
            Turn::On => "on",
            Turn::Off => "off",
            Turn::Toggle => "toggle",
        }
    }
}

impl From<bool> for Turn {
    fn from(on: bool) -> Self {
        if on {
            Turn::On
        } else {
            Turn::Off
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RelaysStatus {
    #[serde(default)]
    pub relays: Vec<RelayStatus>,
}

impl RelaysStatus {
    pub fn from_status(status: Status) -> serde_json::Result<Self> {
        serde_json::from_value(Value::Object(status))
    }

    /// Relay states keyed by channel index.
    pub fn states(&self) -> Vec<(u32, RelayState)> {
        (0..).zip(self.relays.iter().map(RelayStatus::state)).collect()
    }

    pub fn state_of(&self, relay: u32) -> Option<RelayState> {
        self.relays.get(relay as usize).map(RelayStatus::state)
    }
}

/// One entry of `relays` in `/status`, also the body of `/relay/{id}`.
#[derive(Debug, Deserialize, Clone)]
pub struct RelayStatus {
    pub ison: bool,
    pub has_timer: Option<bool>,
    pub overpower: Option<bool>,
    pub source: Option<String>,
}

impl RelayStatus {
    pub fn from_status(status: Status) -> serde_json::Result<Self> {
        serde_json::from_value(Value::Object(status))
    }

    pub fn state(&self) -> RelayState {
        RelayState::from(self.ison)
    }
}
