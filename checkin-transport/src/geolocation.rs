use checkin_logic::{Coordinate, LocationService, prelude::*};
use log::debug;
use serde::Deserialize;

use crate::server::{Endpoints, REQUEST_TIMEOUT};

/// Only the fields we use, the lookup service sends many more
#[derive(Debug, Deserialize)]
struct IpLookup {
    latitude: f64,
    longitude: f64,
}

/// Approximate location from the caller's IP address
pub struct IpGeolocation {
    client: reqwest::Client,
    url: String,
}

impl IpGeolocation {
    pub fn new(endpoints: &Endpoints) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            url: endpoints.geolocation_url.clone(),
        })
    }
}

impl LocationService for IpGeolocation {
    async fn get_loc(&self) -> Result<Coordinate> {
        debug!("Looking up location from {}", self.url);
        let lookup: IpLookup = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("Could not send request")?
            .error_for_status()
            .context("Lookup service returned error")?
            .json()
            .await
            .context("Lookup service did not return a location")?;
        Ok(Coordinate::new(lookup.latitude, lookup.longitude))
    }
}
