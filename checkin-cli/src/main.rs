mod render;
mod sensor;

use std::sync::Arc;

use anyhow::{Context, bail};
use checkin_logic::{
    Coordinate, Session, SessionSettings, StateUpdateSender, SubmissionState, validate,
};
use checkin_transport::{Endpoints, HttpMessageService, IpGeolocation};
use clap::{Parser, Subcommand};
use log::info;
use tokio::sync::mpsc;

use sensor::FixedSensor;

type Result<T = (), E = anyhow::Error> = std::result::Result<T, E>;

#[derive(Parser)]
#[command(version, about = "See the messages left around the world, and leave your own")]
struct Cli {
    /// Hostname the app is served from, `localhost` talks to the development service
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Message service base URL, overrides the one picked from --host
    #[arg(long)]
    base_url: Option<String>,

    /// IP geolocation endpoint used when no coordinates are given
    #[arg(long)]
    geolocation_url: Option<String>,

    /// Your latitude, as a location sensor would report it
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Your longitude, as a location sensor would report it
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lng: Option<f64>,

    /// Seconds between the service storing your message and the thank-you
    #[arg(long, default_value_t = SessionSettings::default().finish_delay_seconds)]
    finish_delay: u64,

    /// Seconds to wait for the service to store your message
    #[arg(long, default_value_t = SessionSettings::default().response_timeout_seconds)]
    timeout: u64,

    /// Print the view as JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the map of messages
    Show,
    /// Leave a message at your location
    Post {
        /// Your name
        #[arg(long)]
        name: String,
        /// What you want to say
        #[arg(long)]
        message: String,
    },
}

impl Cli {
    fn endpoints(&self) -> Endpoints {
        let mut endpoints = match &self.base_url {
            Some(url) => Endpoints::with_base_url(url.clone()),
            None => Endpoints::for_hostname(&self.host),
        };
        if let Some(url) = &self.geolocation_url {
            endpoints.geolocation_url = url.clone();
        }
        endpoints
    }

    fn sensor(&self) -> FixedSensor {
        let coordinate = self
            .lat
            .zip(self.lng)
            .map(|(lat, lng)| Coordinate::new(lat, lng));
        FixedSensor::new(coordinate)
    }

    fn settings(&self) -> SessionSettings {
        SessionSettings {
            finish_delay_seconds: self.finish_delay,
            response_timeout_seconds: self.timeout,
        }
    }
}

struct UpdateSender(mpsc::UnboundedSender<()>);

impl StateUpdateSender for UpdateSender {
    fn send_update(&self) {
        // The receiver only goes away on exit
        self.0.send(()).ok();
    }
}

type CliSession = Session<FixedSensor, IpGeolocation, HttpMessageService, UpdateSender>;

async fn post(
    session: &CliSession,
    updates: &mut mpsc::UnboundedReceiver<()>,
    name: &str,
    message: &str,
) -> Result {
    session.set_name(name).await;
    session.set_message(message).await;

    validate(&session.submission().draft().await)?;

    if !session.submit().await {
        match session.location_error().await {
            Some(why) => bail!("Can't post: {why}"),
            None => bail!("Can't post right now"),
        }
    }

    info!("Posting your message");

    while updates.recv().await.is_some() {
        match session.submission_state().await {
            SubmissionState::Sent => return Ok(()),
            SubmissionState::Composing => {
                if let Some(why) = session.submission().last_error().await {
                    bail!(why);
                }
            }
            SubmissionState::Sending => {}
        }
    }

    bail!("Session stopped before the message was sent")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    colog::init();

    let cli = Cli::parse();

    let endpoints = cli.endpoints();
    info!("Using message service at {}", endpoints.base_url);

    let service = Arc::new(
        HttpMessageService::new(&endpoints).context("Failed to set up message service")?,
    );
    let fallback = IpGeolocation::new(&endpoints).context("Failed to set up location lookup")?;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let session = Session::new(
        cli.sensor(),
        fallback,
        service,
        UpdateSender(tx),
        cli.settings(),
    );

    session.start().await;

    let res = match &cli.command {
        Commands::Show => Ok(()),
        Commands::Post { name, message } => post(&session, &mut rx, name, message).await,
    };

    let view = session.view().await;
    session.shutdown();

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&view).context("Failed to encode view")?
        );
    } else {
        print!("{}", render::TextView(&view));
    }

    res
}
