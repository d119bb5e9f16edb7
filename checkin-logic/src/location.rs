use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::{error::ErrorKind, prelude::*};

/// A point on the globe in degrees, no bounds are enforced
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// The location established for the current user
pub struct ResolvedLocation {
    pub coordinate: Coordinate,
    /// True when it came from the device sensor, false for the network fallback
    pub precise: bool,
}

/// Something that can tell us where the user is, either a device sensor or a network lookup.
/// An `Err` means the source refused or failed, the resolver decides what happens next.
pub trait LocationService: Send + Sync {
    fn get_loc(&self) -> impl Future<Output = Result<Coordinate>> + Send;
}

/// Resolves the user's location once per session, preferring the sensor and falling back to a
/// network lookup only after the sensor has failed.
pub struct LocationResolver<P: LocationService, F: LocationService> {
    sensor: P,
    fallback: F,
    resolved: RwLock<Option<ResolvedLocation>>,
}

impl<P: LocationService, F: LocationService> LocationResolver<P, F> {
    pub fn new(sensor: P, fallback: F) -> Self {
        Self {
            sensor,
            fallback,
            resolved: RwLock::new(None),
        }
    }

    /// The resolved location, `None` until [Self::resolve] succeeds
    pub async fn current(&self) -> Option<ResolvedLocation> {
        *self.resolved.read().await
    }

    /// Try the sensor, then the fallback. Once a location is stored it is never replaced, so
    /// later calls return it without touching either source.
    ///
    /// On [ErrorKind::LocationUnavailable] nothing is stored and the session stays unresolved.
    pub async fn resolve(&self) -> Result<ResolvedLocation, ErrorKind> {
        if let Some(resolved) = self.current().await {
            return Ok(resolved);
        }

        let resolved = match self.sensor.get_loc().await {
            Ok(coordinate) => {
                debug!("Sensor location: {coordinate:?}");
                ResolvedLocation {
                    coordinate,
                    precise: true,
                }
            }
            Err(why) => {
                warn!("Sensor did not provide a location, trying network lookup: {why:#}");
                match self.fallback.get_loc().await {
                    Ok(coordinate) => ResolvedLocation {
                        coordinate,
                        precise: false,
                    },
                    Err(why) => {
                        warn!("Network location lookup failed: {why:#}");
                        return Err(ErrorKind::LocationUnavailable);
                    }
                }
            }
        };

        let mut slot = self.resolved.write().await;
        let resolved = *slot.get_or_insert(resolved);
        info!(
            "Resolved location to {:?} (precise: {})",
            resolved.coordinate, resolved.precise
        );
        Ok(resolved)
    }
}
