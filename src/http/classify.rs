//! Coarse classification of HTTP status codes.
//!
//! This says nothing about retrying; see [`super::is_retryable_status`] for
//! the narrower retry set.

/// Coarse class of an HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 2xx
    Success,
    /// 4xx
    ClientError,
    /// 5xx
    ServerError,
    /// 1xx, 3xx and anything outside 100..=599
    Other,
}

impl StatusClass {
    pub fn of(status: u16) -> Self {
        match status {
            200..=299 => StatusClass::Success,
            400..=499 => StatusClass::ClientError,
            500..=599 => StatusClass::ServerError,
            _ => StatusClass::Other,
        }
    }

    pub fn is_success(status: u16) -> bool {
        Self::of(status) == StatusClass::Success
    }

    pub fn is_client_error(status: u16) -> bool {
        Self::of(status) == StatusClass::ClientError
    }

    pub fn is_server_error(status: u16) -> bool {
        Self::of(status) == StatusClass::ServerError
    }
}
