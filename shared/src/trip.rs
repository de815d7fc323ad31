//! Trip lifecycle: `Idle -> Active -> Completed`.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::geo::{Coordinate, CoordinateError};
use crate::recipients::{PhoneNumber, RecipientList};

/// Inclusive arrival radius around the destination.
pub const ARRIVAL_RADIUS_M: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TripId(Uuid);

impl TripId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TripError {
    #[error("invalid destination: {0}")]
    InvalidDestination(#[from] CoordinateError),
    #[error("no contacts selected")]
    NoRecipients,
    #[error("location and SMS permissions are required")]
    PermissionDenied,
}

impl TripError {
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidDestination(_) | Self::NoRecipients)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveTrip {
    pub id: TripId,
    pub destination: Coordinate,
    pub recipients: Vec<PhoneNumber>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedTrip {
    pub id: TripId,
    pub destination: Coordinate,
    pub recipients: Vec<PhoneNumber>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum TripState {
    #[default]
    Idle,
    Active(ActiveTrip),
    Completed(CompletedTrip),
}

/// Everything the notifier needs once a trip has arrived.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrival {
    pub trip: TripId,
    pub destination: Coordinate,
    pub recipients: Vec<PhoneNumber>,
    pub distance_m: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FixOutcome {
    /// No active trip; the fix only updates the live position.
    Ignored,
    Approaching { distance_m: f64 },
    Arrived(Arrival),
}

#[must_use]
pub fn is_arrival(distance_m: f64) -> bool {
    distance_m <= ARRIVAL_RADIUS_M
}

impl TripState {
    /// Validates the entered destination and recipients and arms a new trip.
    ///
    /// Leaves `self` untouched on error. A trip that is already active is
    /// replaced.
    pub fn start(
        &mut self,
        latitude: &str,
        longitude: &str,
        recipients: &RecipientList,
    ) -> Result<TripId, TripError> {
        let destination = Coordinate::parse(latitude, longitude)?;
        if recipients.is_empty() {
            return Err(TripError::NoRecipients);
        }

        let id = TripId::generate();
        info!(trip = %id, recipients = recipients.len(), "trip started");
        *self = Self::Active(ActiveTrip {
            id,
            destination,
            recipients: recipients.to_vec(),
        });
        Ok(id)
    }

    pub fn on_fix(&mut self, position: Coordinate) -> FixOutcome {
        let distance_m = match self {
            Self::Active(trip) => trip.destination.distance_to(position),
            Self::Idle | Self::Completed(_) => return FixOutcome::Ignored,
        };
        self.on_distance(distance_m)
    }

    fn on_distance(&mut self, distance_m: f64) -> FixOutcome {
        let trip = match std::mem::take(self) {
            Self::Active(trip) => trip,
            other => {
                *self = other;
                return FixOutcome::Ignored;
            }
        };

        if !is_arrival(distance_m) {
            debug!(trip = %trip.id, distance_m, "approaching destination");
            *self = Self::Active(trip);
            return FixOutcome::Approaching { distance_m };
        }

        info!(trip = %trip.id, distance_m, "arrived");
        let arrival = Arrival {
            trip: trip.id,
            destination: trip.destination,
            recipients: trip.recipients.clone(),
            distance_m,
        };
        *self = Self::Completed(CompletedTrip {
            id: trip.id,
            destination: trip.destination,
            recipients: trip.recipients,
        });
        FixOutcome::Arrived(arrival)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }
}
