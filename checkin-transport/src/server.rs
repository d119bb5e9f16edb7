use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Upper bound on any single request to an external service
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

const fn dev_port() -> u16 {
    if let Some(port) = option_env!("CHECKIN_DEV_PORT") {
        const_str::parse!(port, u16)
    } else {
        5000
    }
}

const fn prod_url() -> &'static str {
    if let Some(url) = option_env!("CHECKIN_PROD_URL") {
        url
    } else {
        "https://react-world-map.herokuapp.com"
    }
}

const fn geolocation_url() -> &'static str {
    if let Some(url) = option_env!("CHECKIN_GEOLOCATION_URL") {
        url
    } else {
        "https://ipapi.co/json"
    }
}

const DEV_PORT: u16 = dev_port();

/// Message service used when running against `localhost`
pub const DEV_URL: &str = const_str::concat!("http://localhost:", DEV_PORT);
/// Message service used everywhere else
pub const PROD_URL: &str = prod_url();
/// IP geolocation lookup used when the sensor is unavailable
pub const GEOLOCATION_URL: &str = geolocation_url();
/// Where messages live under the base URL
pub const MESSAGES_PATH: &str = "/api/v1/messages";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// The external services a session talks to
pub struct Endpoints {
    pub base_url: String,
    pub geolocation_url: String,
}

impl Endpoints {
    /// Pick the message service based on the host the front end is served from
    pub fn for_hostname(hostname: &str) -> Self {
        let base_url = if hostname == "localhost" {
            DEV_URL
        } else {
            PROD_URL
        };
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            geolocation_url: GEOLOCATION_URL.to_string(),
        }
    }

    pub fn messages_url(&self) -> String {
        format!("{}{MESSAGES_PATH}", self.base_url.trim_end_matches('/'))
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::for_hostname("localhost")
    }
}
