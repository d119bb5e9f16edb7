use anyhow::anyhow;
use checkin_logic::{Coordinate, LocationService, prelude::*};

/// Stands in for a device location sensor, `None` behaves like a denied permission
pub struct FixedSensor(Option<Coordinate>);

impl FixedSensor {
    pub fn new(coordinate: Option<Coordinate>) -> Self {
        Self(coordinate)
    }
}

impl LocationService for FixedSensor {
    async fn get_loc(&self) -> Result<Coordinate> {
        self.0
            .ok_or_else(|| anyhow!("No coordinates given, treating the sensor as denied"))
    }
}
