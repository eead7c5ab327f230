use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::{
    datatypes::{RelayState, RelayStatus, RelaysStatus, Status, Turn},
    error::{Error, ProtocolError, Result},
    protocol,
};

pub trait DeviceActions {
    /// Send a GET to a device URL and return its parsed response
    fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T>;

    fn base_url(&self) -> &Url;

    fn status(&self) -> Result<Status> {
        self.get(protocol::status_url(self.base_url()))
    }
}

pub trait Relay: DeviceActions {
    fn turn(&self, relay: u32, turn: Turn) -> Result<Status> {
        self.get(protocol::relay_url(self.base_url(), relay, turn))
    }

    /// Switch `relay` on or off; the device echoes the resulting state.
    fn power(&self, relay: u32, on: bool) -> Result<Status> {
        self.turn(relay, Turn::from(on))
    }

    fn toggle(&self, relay: u32) -> Result<Status> {
        self.turn(relay, Turn::Toggle)
    }

    fn switch_on(&self, relay: u32) -> Result<RelayState> {
        Ok(RelayStatus::from_status(self.power(relay, true)?)?.state())
    }

    fn switch_off(&self, relay: u32) -> Result<RelayState> {
        Ok(RelayStatus::from_status(self.power(relay, false)?)?.state())
    }

    fn relays(&self) -> Result<Vec<(u32, RelayState)>> {
        Ok(RelaysStatus::from_status(self.status()?)?.states())
    }

    fn relay_state(&self, relay: u32) -> Result<RelayState> {
        RelaysStatus::from_status(self.status()?)?
            .state_of(relay)
            .ok_or_else(|| Error::from(ProtocolError::MissingRelay(relay)))
    }
}
