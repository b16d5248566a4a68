pub mod api;
pub mod config;
pub mod http;
pub mod query;

pub use api::{RestApi, fetch_json, submit_json};
pub use config::Config;
pub use http::{ConnectionStatus, NetworkErrorListener, RestClient, RestResponse};
