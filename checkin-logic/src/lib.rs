mod cluster;
mod draft;
mod error;
mod location;
mod message;
mod session;
mod settings;
mod submission;
#[cfg(test)]
mod tests;
mod view;

pub use cluster::{ClusterKey, MessageCluster, cluster};
pub use draft::{DraftField, DraftProblem, LengthRule, MAX_FIELD_LEN, MessageDraft, validate};
pub use error::ErrorKind;
pub use location::{Coordinate, LocationResolver, LocationService, ResolvedLocation};
pub use message::{Message, MessageId, MessageRepository, MessageService, NewMessage};
pub use session::Session;
pub use settings::SessionSettings;
pub use submission::{StateUpdateSender, SubmissionController, SubmissionSnapshot, SubmissionState};
pub use view::{
    CheckInView, DEFAULT_CENTER, DEFAULT_ZOOM, FormPanel, LOCATED_ZOOM, MapView, MarkerView,
    PopupLine,
};

pub mod prelude {
    use anyhow::Error as AnyhowError;
    use std::result::Result as StdResult;
    pub type Result<T = (), E = AnyhowError> = StdResult<T, E>;
    pub use anyhow::Context;
}
