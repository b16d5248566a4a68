//! Transport-level outcome of a request and its classification from reqwest errors.

use std::error::Error as StdError;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How far a request got before it completed or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConnectionStatus {
    /// The server replied with a success status
    #[default]
    Success,
    /// The server replied, but with a non-2xx status
    ProtocolError,
    /// The host name could not be resolved
    NameResolutionFailure,
    /// No connection could be established
    ConnectFailure,
    /// The request did not complete in time
    Timeout,
    /// Sending the request (headers or body) failed
    SendFailure,
    /// Reading the response failed
    ReceiveFailure,
    /// Anything that happened outside the transport
    UnknownError,
}

impl ConnectionStatus {
    /// True when a response was received from the server.
    pub fn reached_server(self) -> bool {
        matches!(self, ConnectionStatus::Success | ConnectionStatus::ProtocolError)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionStatus::Success => "Success",
            ConnectionStatus::ProtocolError => "ProtocolError",
            ConnectionStatus::NameResolutionFailure => "NameResolutionFailure",
            ConnectionStatus::ConnectFailure => "ConnectFailure",
            ConnectionStatus::Timeout => "Timeout",
            ConnectionStatus::SendFailure => "SendFailure",
            ConnectionStatus::ReceiveFailure => "ReceiveFailure",
            ConnectionStatus::UnknownError => "UnknownError",
        };
        f.write_str(name)
    }
}

/// Maps a reqwest error onto the connection status it represents.
pub fn classify_error(error: &reqwest::Error) -> ConnectionStatus {
    if error.is_timeout() {
        return ConnectionStatus::Timeout;
    }

    // DNS failures surface from the connector, so check them before is_connect()
    if is_dns_error(error) {
        return ConnectionStatus::NameResolutionFailure;
    }

    if error.is_connect() {
        return ConnectionStatus::ConnectFailure;
    }

    if error.is_body() || error.is_decode() {
        return ConnectionStatus::ReceiveFailure;
    }

    if error.is_request() || error.is_redirect() {
        return ConnectionStatus::SendFailure;
    }

    ConnectionStatus::UnknownError
}

fn is_dns_error(error: &reqwest::Error) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = error.source();
    while let Some(err) = source {
        let msg = err.to_string().to_lowercase();
        if msg.contains("dns error") || msg.contains("failed to lookup address") {
            return true;
        }
        source = err.source();
    }
    false
}
