//! Network-error notification.

use std::sync::Arc;

use super::response::RestResponse;

/// Receives responses that failed below the HTTP protocol level.
#[cfg_attr(test, mockall::automock)]
pub trait NetworkErrorListener: Send + Sync {
    fn on_network_error(&self, response: &RestResponse);
}

impl<F> NetworkErrorListener for F
where
    F: Fn(&RestResponse) + Send + Sync,
{
    fn on_network_error(&self, response: &RestResponse) {
        self(response)
    }
}

/// Registered listeners, invoked in registration order.
#[derive(Clone, Default)]
pub(crate) struct Listeners {
    listeners: Vec<Arc<dyn NetworkErrorListener>>,
}

impl Listeners {
    pub(crate) fn add(&mut self, listener: Arc<dyn NetworkErrorListener>) {
        self.listeners.push(listener);
    }

    pub(crate) fn notify(&self, response: &RestResponse) {
        for listener in &self.listeners {
            listener.on_network_error(response);
        }
    }
}
