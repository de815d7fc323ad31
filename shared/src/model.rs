use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::capabilities::{LocationFix, PermissionGrants, SubscriptionId};
use crate::config::TrackerConfig;
use crate::notifier::DeliveryReport;
use crate::recipients::RecipientList;
use crate::trip::{Arrival, TripId, TripState};

/// Whether a position subscription is currently held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedState {
    #[default]
    Stopped,
    Running(SubscriptionId),
}

impl FeedState {
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running(_))
    }

    #[must_use]
    pub fn accepts(self, subscription: SubscriptionId) -> bool {
        self == Self::Running(subscription)
    }
}

/// Latest position sample plus the last computed distance to the destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveFix {
    pub latitude: f64,
    pub longitude: f64,
    pub distance_m: f64,
}

impl LiveFix {
    pub fn update_position(&mut self, fix: &LocationFix) {
        self.latitude = fix.latitude;
        self.longitude = fix.longitude;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    /// Platform toast lengths: short for confirmations, long for problems.
    #[must_use]
    pub const fn default_duration_ms(self) -> u64 {
        match self {
            Self::Info | Self::Success => 2000,
            Self::Warning | Self::Error => 3500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToastMessage {
    pub message: String,
    pub kind: ToastKind,
    pub duration_ms: u64,
}

impl ToastMessage {
    #[must_use]
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
            duration_ms: kind.default_duration_ms(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Model {
    pub config: TrackerConfig,

    // Permission gate
    pub grants: PermissionGrants,
    pub permission_warning: Option<String>,

    // Location feed
    pub feed: FeedState,
    pub last_subscription: SubscriptionId,
    pub live_fix: LiveFix,

    // Destination text fields, parsed only on "start trip"
    pub latitude_input: String,
    pub longitude_input: String,

    pub recipients: RecipientList,
    pub trip: TripState,
    /// Arrivals waiting for the destination name before messages go out.
    pub pending_arrivals: BTreeMap<TripId, Arrival>,
    /// Reports with sends in flight, plus the latest one once settled.
    pub deliveries: BTreeMap<TripId, DeliveryReport>,
    pub shown_delivery: Option<TripId>,

    pub active_toast: Option<ToastMessage>,
}

impl Model {
    pub fn show_toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.active_toast = Some(ToastMessage::new(message, kind));
    }

    pub fn clear_toast(&mut self) {
        self.active_toast = None;
    }

    /// Tracks a freshly dispatched notification and makes it the one shown.
    pub fn begin_delivery(&mut self, report: DeliveryReport) {
        if let Some(previous) = self.shown_delivery.replace(report.trip) {
            if self
                .deliveries
                .get(&previous)
                .is_some_and(DeliveryReport::is_complete)
            {
                self.deliveries.remove(&previous);
            }
        }
        self.deliveries.insert(report.trip, report);
    }

    /// Drops a settled report unless it is still the one on screen.
    pub fn settle_delivery(&mut self, trip: TripId) {
        if self.shown_delivery != Some(trip) {
            self.deliveries.remove(&trip);
        }
    }

    #[must_use]
    pub fn latest_delivery(&self) -> Option<&DeliveryReport> {
        self.shown_delivery.and_then(|trip| self.deliveries.get(&trip))
    }

    /// Allocates the id for the next position subscription.
    pub fn next_subscription(&mut self) -> SubscriptionId {
        self.last_subscription = self.last_subscription.next();
        self.last_subscription
    }
}
