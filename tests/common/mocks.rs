use std::sync::Mutex;

use reqwest::Url;
use spotilook::{Transport, TransportError};

/// Mock transport for testing lookups without actual network calls
pub struct MockHttpTransport {
    response: Response,
    request_log: Mutex<Vec<String>>,
}

enum Response {
    Success(Vec<u8>),
    Status(u16),
}

impl MockHttpTransport {
    pub fn with_success(body: &[u8]) -> Self {
        Self {
            response: Response::Success(body.to_vec()),
            request_log: Mutex::new(Vec::new()),
        }
    }

    pub fn with_status(status: u16) -> Self {
        Self {
            response: Response::Status(status),
            request_log: Mutex::new(Vec::new()),
        }
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.request_log.lock().unwrap().clone()
    }
}

impl Transport for MockHttpTransport {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, TransportError> {
        self.request_log.lock().unwrap().push(url.to_string());
        match &self.response {
            Response::Success(body) => Ok(body.clone()),
            Response::Status(status) => Err(TransportError::HttpStatus {
                url: url.to_string(),
                status: *status,
                message: format!("HTTP {status}"),
            }),
        }
    }
}
