//! HTTP plumbing shared by the blocking and async clients
use std::{net::Ipv6Addr, sync::Arc, time::Duration};

use log::{debug, trace};
use reqwest::{blocking, Url};
use serde::de::DeserializeOwned;

use crate::{
    datatypes::Turn,
    error::{Error, ProtocolError, Result},
};

#[cfg(test)]
use std::sync::Mutex;

/// Address of a Shelly serving its own access point.
pub const DEFAULT_HOST: &str = "192.168.33.1";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Parse `host`, `host:port` or `http://host:port` into the device base URL.
///
/// Bare IPv6 literals are bracketed; use `[addr]:port` to give a port.
pub fn base_url(host: &str) -> Result<Url> {
    let host = host.trim();
    let invalid = |reason: String| Error::InvalidAddress {
        host: host.to_string(),
        reason,
    };

    let url = if host.contains("://") {
        Url::parse(host)
    } else if host.parse::<Ipv6Addr>().is_ok() {
        Url::parse(&format!("http://[{}]", host))
    } else {
        Url::parse(&format!("http://{}", host))
    }
    .map_err(|err| invalid(err.to_string()))?;

    if url.scheme() != "http" {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid(String::from("missing host")));
    }

    Ok(url)
}

pub fn status_url(base: &Url) -> Url {
    let mut url = base.clone();
    url.set_path("/status");
    url.set_query(None);
    url
}

pub fn relay_url(base: &Url, relay: u32, turn: Turn) -> Url {
    let mut url = base.clone();
    url.set_path(&format!("/relay/{}", relay));
    url.set_query(None);
    url.query_pairs_mut().append_pair("turn", turn.as_str());
    url
}

/// Raw answer of the device before decoding
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Reject non-2xx answers, then parse the body as JSON.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        if !self.is_success() {
            return Err(ProtocolError::Status {
                status: self.status,
                body: self.body,
            }
            .into());
        }
        Ok(serde_json::from_str::<T>(&self.body)?)
    }
}

pub trait Transport: Send + Sync {
    fn get(&self, url: &Url) -> Result<Response>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn get(&self, url: &Url) -> Result<Response> {
        (**self).get(url)
    }
}

/// Blocking HTTP transport. Idle connections are not kept between requests.
pub struct HttpTransport {
    client: blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<HttpTransport> {
        let client = blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()?;
        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &Url) -> Result<Response> {
        debug!("GET {}", url);
        let response = self.client.get(url.clone()).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        trace!("response: {} {}", status, body);

        Ok(Response { status, body })
    }
}

/// In-memory Shelly answering `/status` and `/relay/{id}` like the firmware does.
#[cfg(test)]
pub struct SimulatedDevice {
    relays: Mutex<Vec<bool>>,
    requests: Mutex<Vec<String>>,
    canned: Mutex<Option<Response>>,
}

#[cfg(test)]
impl SimulatedDevice {
    pub fn new(relays: &[bool]) -> SimulatedDevice {
        SimulatedDevice {
            relays: Mutex::new(relays.to_vec()),
            requests: Mutex::new(vec![]),
            canned: Mutex::new(None),
        }
    }

    /// Answer every following request with this response instead.
    pub fn respond_with(&self, status: u16, body: &str) {
        *self.canned.lock().unwrap() = Some(Response {
            status,
            body: body.to_string(),
        });
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn relays(&self) -> Vec<bool> {
        self.relays.lock().unwrap().clone()
    }

    fn not_found() -> Response {
        Response {
            status: 404,
            body: String::from("Not Found"),
        }
    }

    fn json(value: serde_json::Value) -> Response {
        Response {
            status: 200,
            body: value.to_string(),
        }
    }
}

#[cfg(test)]
impl Transport for SimulatedDevice {
    fn get(&self, url: &Url) -> Result<Response> {
        let request = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        self.requests.lock().unwrap().push(request);

        if let Some(response) = self.canned.lock().unwrap().clone() {
            return Ok(response);
        }

        let mut relays = self.relays.lock().unwrap();
        if url.path() == "/status" {
            let relays: Vec<_> = relays
                .iter()
                .map(|ison| serde_json::json!({ "ison": ison }))
                .collect();
            return Ok(Self::json(serde_json::json!({ "relays": relays })));
        }

        let index = url
            .path()
            .strip_prefix("/relay/")
            .and_then(|id| id.parse::<usize>().ok())
            .filter(|id| *id < relays.len());
        let index = match index {
            Some(index) => index,
            None => return Ok(Self::not_found()),
        };

        let turn = url
            .query_pairs()
            .find(|(key, _)| key == "turn")
            .map(|(_, value)| value.into_owned());
        match turn.as_deref() {
            Some("on") => relays[index] = true,
            Some("off") => relays[index] = false,
            Some("toggle") => relays[index] = !relays[index],
            Some(_) => {
                return Ok(Response {
                    status: 400,
                    body: String::from("Bad turn!"),
                })
            }
            None => (),
        }

        Ok(Self::json(serde_json::json!({ "ison": relays[index] })))
    }
}
