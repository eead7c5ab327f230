use log::{debug, trace};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::{
    datatypes::{RelayState, RelaysStatus, Status, Turn},
    devices::Config,
    error::{Error, ProtocolError, Result},
    protocol::{self, Response},
};

/// Shelly 1 driven through async requests
///
/// Same endpoints and error semantics as [`crate::devices::Shelly1`].
#[derive(Clone)]
pub struct Shelly1 {
    base: Url,
    client: Client,
}

impl Shelly1 {
    pub fn new(host: &str) -> Result<Self> {
        Self::with_config(Config::with_host(host))
    }

    pub fn factory_default() -> Result<Self> {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(Self {
            base: protocol::base_url(&config.host)?,
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        trace!("response: {} {}", status, body);

        Response { status, body }.decode()
    }

    pub async fn status(&self) -> Result<Status> {
        self.get(protocol::status_url(&self.base)).await
    }

    pub async fn turn(&self, relay: u32, turn: Turn) -> Result<Status> {
        self.get(protocol::relay_url(&self.base, relay, turn)).await
    }

    pub async fn power(&self, relay: u32, on: bool) -> Result<Status> {
        self.turn(relay, Turn::from(on)).await
    }

    pub async fn toggle(&self, relay: u32) -> Result<Status> {
        self.turn(relay, Turn::Toggle).await
    }

    pub async fn relays(&self) -> Result<Vec<(u32, RelayState)>> {
        Ok(RelaysStatus::from_status(self.status().await?)?.states())
    }

    pub async fn relay_state(&self, relay: u32) -> Result<RelayState> {
        RelaysStatus::from_status(self.status().await?)?
            .state_of(relay)
            .ok_or_else(|| Error::from(ProtocolError::MissingRelay(relay)))
    }
}
