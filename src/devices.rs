use std::time::Duration;

use log::trace;
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::{
    capabilities::{DeviceActions, Relay},
    error::Result,
    protocol::{self, HttpTransport, Transport, DEFAULT_HOST, DEFAULT_TIMEOUT},
};

/// Where the device lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `host`, `host:port` or `http://host:port`
    pub host: String,
    /// Applied to connecting and to the whole request
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: String::from(DEFAULT_HOST),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    pub fn with_host(host: &str) -> Self {
        Self {
            host: host.to_string(),
            ..Self::default()
        }
    }
}

// DEVICES

pub struct RawDevice {
    base: Url,
    transport: Box<dyn Transport>,
}

impl RawDevice {
    pub fn new(host: &str) -> Result<RawDevice> {
        Self::with_config(Config::with_host(host))
    }

    /// Only the address is checked here, the device is not contacted.
    pub fn with_config(config: Config) -> Result<RawDevice> {
        Ok(Self {
            base: protocol::base_url(&config.host)?,
            transport: Box::new(HttpTransport::new(config.timeout)?),
        })
    }

    pub fn with_transport<T: Transport + 'static>(host: &str, transport: T) -> Result<RawDevice> {
        Ok(Self {
            base: protocol::base_url(host)?,
            transport: Box::new(transport),
        })
    }
}

impl DeviceActions for RawDevice {
    fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.transport.get(&url)?;
        trace!("{} answered HTTP {}", url, response.status);
        response.decode()
    }

    fn base_url(&self) -> &Url {
        &self.base
    }
}

/// Shelly 1, a single channel relay.
///
/// Holds no mutable state: it is `Send + Sync` and may be shared between
/// threads, but concurrent calls are independent requests with no ordering
/// guarantee between them.
pub struct Shelly1 {
    raw: RawDevice,
}

impl Shelly1 {
    pub fn new(host: &str) -> Result<Self> {
        Ok(Self {
            raw: RawDevice::new(host)?,
        })
    }

    /// Device reached through its own access point at 192.168.33.1
    pub fn factory_default() -> Result<Self> {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self {
            raw: RawDevice::with_config(config)?,
        })
    }

    pub fn with_transport<T: Transport + 'static>(host: &str, transport: T) -> Result<Self> {
        Ok(Self {
            raw: RawDevice::with_transport(host, transport)?,
        })
    }
}

impl DeviceActions for Shelly1 {
    fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        self.raw.get(url)
    }

    fn base_url(&self) -> &Url {
        self.raw.base_url()
    }
}

impl Relay for Shelly1 {}
