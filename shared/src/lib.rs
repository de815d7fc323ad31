#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod capabilities;
pub mod config;
pub mod event;
pub mod geo;
pub mod model;
pub mod notifier;
pub mod recipients;
pub mod trip;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use app::{App, TripStatus, ViewModel};
pub use capabilities::{Capabilities, Effect};
pub use config::{ConfigError, FeedConfig, TrackerConfig};
pub use crux_core::App as CruxApp;
pub use event::{CheckReason, Event};
pub use geo::{Coordinate, CoordinateError};
pub use model::{FeedState, Model, ToastKind, ToastMessage};
pub use recipients::{PhoneNumber, PhoneNumberError, RecipientList};
pub use trip::{TripError, TripId, TripState, ARRIVAL_RADIUS_M};

pub const APP_TITLE: &str = "Trip Tracker";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    PermissionDenied,
    Validation,
    GeocodeLookup,
    Send,
    InvalidState,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::Validation => "VALIDATION_ERROR",
            Self::GeocodeLookup => "GEOCODE_LOOKUP_FAILED",
            Self::Send => "SEND_ERROR",
            Self::InvalidState => "INVALID_STATE",
        }
    }
}

/// A recovered failure, reduced to what the user is shown plus log context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    pub context: BTreeMap<String, String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::PermissionDenied => "Location & SMS permission required".into(),
            ErrorKind::Validation => "Set destination & select contacts".into(),
            ErrorKind::Send => format!("SMS failed: {}", self.message),
            ErrorKind::GeocodeLookup | ErrorKind::InvalidState => self.message.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)
    }
}

impl std::error::Error for AppError {}

impl From<TripError> for AppError {
    fn from(e: TripError) -> Self {
        let kind = if e.is_validation() {
            ErrorKind::Validation
        } else {
            ErrorKind::PermissionDenied
        };
        AppError::new(kind, e.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::new(ErrorKind::InvalidState, format!("Configuration rejected: {e}"))
    }
}

#[must_use]
pub fn format_distance(meters: f64) -> String {
    format!("Distance: {meters:.2} meters")
}
