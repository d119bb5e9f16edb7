mod geolocation;
mod http;
mod server;
#[cfg(test)]
mod test_server;

pub use geolocation::IpGeolocation;
pub use http::HttpMessageService;
pub use server::{DEV_URL, Endpoints, GEOLOCATION_URL, MESSAGES_PATH, PROD_URL};
