use std::collections::{HashMap, hash_map::Entry};

use serde::{Deserialize, Serialize};

use crate::{location::Coordinate, message::Message};

/// Scale that keeps 3 decimal places when grouping coordinates
const KEY_PRECISION: f64 = 1000.0;

/// A coordinate rounded to 3 decimal places, stored as thousandths of a degree so equality is
/// exact and `-0.000` equals `0.000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClusterKey {
    lat: i64,
    long: i64,
}

/// Round the stored value to thousandths. Formatting works on the exact double, so 34.5475
/// (stored as 34.54749999...) gives 34547 where `(v * 1000.0).round()` would give 34548.
fn round_component(v: f64) -> i64 {
    let magnitude = v.abs();

    // A double is exactly halfway between two thousandths only when it is an odd multiple of
    // 1/16. Those ties go away from zero, everything else follows the formatter.
    let sixteenths = magnitude * 16.0;
    let thousandths = if sixteenths.fract() == 0.0 && sixteenths % 2.0 == 1.0 {
        Some((magnitude * KEY_PRECISION).ceil() as i64)
    } else {
        format!("{magnitude:.3}").replace('.', "").parse::<i64>().ok()
    };

    // Only non-finite or absurdly large values fail to parse
    let thousandths = thousandths.unwrap_or_else(|| (magnitude * KEY_PRECISION).round() as i64);

    if v.is_sign_negative() {
        -thousandths
    } else {
        thousandths
    }
}

impl ClusterKey {
    pub fn of(coordinate: &Coordinate) -> Self {
        Self {
            lat: round_component(coordinate.latitude),
            long: round_component(coordinate.longitude),
        }
    }

    /// The rounded coordinate this key stands for
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(
            self.lat as f64 / KEY_PRECISION,
            self.long as f64 / KEY_PRECISION,
        )
    }
}

/// Messages sharing a rounded coordinate, shown as one marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageCluster {
    /// First message seen at this spot
    pub primary: Message,
    /// Later messages at the same spot, in arrival order
    pub overflow: Vec<Message>,
}

impl MessageCluster {
    fn new(primary: Message) -> Self {
        Self {
            primary,
            overflow: Vec::new(),
        }
    }

    pub fn key(&self) -> ClusterKey {
        ClusterKey::of(&self.primary.coordinate)
    }

    /// Primary first, then the overflow
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        std::iter::once(&self.primary).chain(self.overflow.iter())
    }
}

/// Group messages by rounded coordinate in a single pass. Clusters come out in the order their
/// primary was first seen.
pub fn cluster(messages: impl IntoIterator<Item = Message>) -> Vec<MessageCluster> {
    let mut seen = HashMap::<ClusterKey, usize>::new();
    let mut clusters = Vec::<MessageCluster>::new();

    for message in messages {
        match seen.entry(ClusterKey::of(&message.coordinate)) {
            Entry::Occupied(idx) => clusters[*idx.get()].overflow.push(message),
            Entry::Vacant(slot) => {
                slot.insert(clusters.len());
                clusters.push(MessageCluster::new(message));
            }
        }
    }

    clusters
}
