use crux_core::capability::{CapabilityContext, Operation};
use crux_core::macros::Capability;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::Coordinate;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", content = "data")]
pub enum GeocodeOperation {
    Reverse {
        latitude: f64,
        longitude: f64,
        max_results: u32,
    },
}

impl Operation for GeocodeOperation {
    type Output = GeocodeResult;
}

/// One reverse-lookup candidate, as formatted address lines.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub lines: Vec<String>,
}

impl Address {
    #[must_use]
    pub fn new(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// First non-blank address line.
    #[must_use]
    pub fn first_line(&self) -> Option<&str> {
        self.lines
            .first()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
    }
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum GeocodeError {
    #[error("geocoder not available on this device")]
    NotAvailable,

    #[error("lookup timed out")]
    Timeout,

    #[error("lookup failed: {message}")]
    Io { message: String },
}

pub type GeocodeResult = Result<Vec<Address>, GeocodeError>;

#[derive(Capability)]
pub struct Geocoder<Ev> {
    context: CapabilityContext<GeocodeOperation, Ev>,
}

impl<Ev> Geocoder<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<GeocodeOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn reverse<F>(&self, coordinate: Coordinate, max_results: u32, callback: F)
    where
        F: FnOnce(GeocodeResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context
                .request_from_shell(GeocodeOperation::Reverse {
                    latitude: coordinate.lat(),
                    longitude: coordinate.lng(),
                    max_results,
                })
                .await;
            context.update_app(callback(result));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line_skips_blank() {
        assert_eq!(Address::new(["1 Main St", "Springfield"]).first_line(), Some("1 Main St"));
        assert_eq!(Address::new(["   "]).first_line(), None);
        assert_eq!(Address::default().first_line(), None);
    }

    #[test]
    fn test_error_result_roundtrips() {
        let result: GeocodeResult = Err(GeocodeError::Io {
            message: "grpc failed".into(),
        });
        let json = serde_json::to_string(&result).unwrap();
        let back: GeocodeResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
    }
}
