use serde::{Deserialize, Serialize};

use crate::{
    cluster::MessageCluster,
    location::{Coordinate, ResolvedLocation},
    message::{Message, MessageId},
    submission::{SubmissionSnapshot, SubmissionState},
};

/// Where the map points before the user is located
pub const DEFAULT_CENTER: Coordinate = Coordinate::new(51.505, -0.09);
/// World-ish zoom used until the user is located
pub const DEFAULT_ZOOM: f64 = 2.5;
/// Street-level zoom once the user is located
pub const LOCATED_ZOOM: f64 = 14.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: f64,
    /// Where to draw the "you are here" marker
    pub user_marker: Option<Coordinate>,
}

impl MapView {
    fn new(location: Option<&ResolvedLocation>) -> Self {
        match location {
            Some(loc) => Self {
                center: loc.coordinate,
                zoom: LOCATED_ZOOM,
                user_marker: Some(loc.coordinate),
            },
            None => Self {
                center: DEFAULT_CENTER,
                zoom: DEFAULT_ZOOM,
                user_marker: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopupLine {
    pub id: MessageId,
    pub name: String,
    pub message: String,
}

impl From<&Message> for PopupLine {
    fn from(m: &Message) -> Self {
        Self {
            id: m.id.clone(),
            name: m.name.clone(),
            message: m.message.clone(),
        }
    }
}

/// One map marker per cluster, placed at its primary message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerView {
    pub id: MessageId,
    pub position: Coordinate,
    pub popup: Vec<PopupLine>,
}

impl From<&MessageCluster> for MarkerView {
    fn from(cluster: &MessageCluster) -> Self {
        Self {
            id: cluster.primary.id.clone(),
            position: cluster.primary.coordinate,
            popup: cluster.iter().map(PopupLine::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FormPanel {
    /// Show the form
    Compose {
        submit_enabled: bool,
        error: Option<String>,
    },
    /// Show a spinner, either locating the user or sending
    Waiting,
    /// Thank the user
    Thanks,
}

impl FormPanel {
    fn new(located: bool, submission: &SubmissionSnapshot) -> Self {
        match submission.state {
            SubmissionState::Sent => Self::Thanks,
            SubmissionState::Sending => Self::Waiting,
            SubmissionState::Composing if !located => Self::Waiting,
            SubmissionState::Composing => Self::Compose {
                submit_enabled: submission.draft_valid,
                error: submission.error.as_ref().map(ToString::to_string),
            },
        }
    }
}

/// Snapshot of everything on screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInView {
    pub map: MapView,
    pub markers: Vec<MarkerView>,
    pub form: FormPanel,
    /// Problems worth mentioning that don't block anything
    pub notices: Vec<String>,
}

impl CheckInView {
    pub fn build(
        location: Option<&ResolvedLocation>,
        clusters: &[MessageCluster],
        submission: &SubmissionSnapshot,
        notices: Vec<String>,
    ) -> Self {
        Self {
            map: MapView::new(location),
            markers: clusters.iter().map(MarkerView::from).collect(),
            form: FormPanel::new(location.is_some(), submission),
            notices,
        }
    }
}
