use std::fmt;

use checkin_logic::{CheckInView, Coordinate, FormPanel};

struct Coord<'a>(&'a Coordinate);

impl fmt::Display for Coord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.0.latitude, self.0.longitude)
    }
}

/// Plain text version of the page
pub struct TextView<'a>(pub &'a CheckInView);

impl fmt::Display for TextView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;

        writeln!(
            f,
            "Map centered on {} (zoom {})",
            Coord(&view.map.center),
            view.map.zoom
        )?;

        match &view.map.user_marker {
            Some(c) => writeln!(f, "You are here: {}", Coord(c))?,
            None => writeln!(f, "Locating you...")?,
        }

        writeln!(f, "\n{} message marker(s)", view.markers.len())?;
        for marker in view.markers.iter() {
            writeln!(f, "  [{}]", Coord(&marker.position))?;
            for line in marker.popup.iter() {
                writeln!(f, "    {}: {}", line.name, line.message)?;
            }
        }

        writeln!(f)?;
        match &view.form {
            FormPanel::Compose {
                submit_enabled,
                error,
            } => {
                if let Some(error) = error {
                    writeln!(f, "Could not post: {error}")?;
                }
                if *submit_enabled {
                    writeln!(f, "Ready to post.")?;
                } else {
                    writeln!(
                        f,
                        "Leave a message with your location! (post --name .. --message ..)"
                    )?;
                }
            }
            FormPanel::Waiting => writeln!(f, "Please wait...")?,
            FormPanel::Thanks => writeln!(f, "Thanks for sharing a message!")?,
        }

        for notice in view.notices.iter() {
            writeln!(f, "Note: {notice}")?;
        }

        Ok(())
    }
}
