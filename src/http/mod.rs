//! REST client, response record and network-error notification.

mod client;
mod events;
mod response;
mod status;

pub use client::{CLIENT_VERSION, CLIENT_VERSION_HEADER, RestClient};
pub use events::NetworkErrorListener;
pub use response::RestResponse;
pub use status::{ConnectionStatus, classify_error};
