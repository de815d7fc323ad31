use serde::{Deserialize, Serialize};

use crate::capabilities::{
    GeocodeResult, LocationFix, PermissionGrants, PickedContact, SmsResult, SubscriptionId,
};
use crate::config::TrackerConfig;
use crate::recipients::PhoneNumber;
use crate::trip::TripId;

/// Why a non-interactive permission check was issued.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CheckReason {
    /// First launch: missing permissions get an interactive prompt.
    Launch,
    /// Back in the foreground: only restart the feed, never prompt.
    Resume,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    // Screen lifecycle
    AppStarted,
    AppForegrounded,
    AppBackgrounded,
    ConfigurationChanged(Box<TrackerConfig>),

    // Permission gate
    PermissionsChecked {
        grants: PermissionGrants,
        reason: CheckReason,
    },
    PermissionsRequested {
        grants: PermissionGrants,
    },

    // User intents
    PickContactRequested,
    DestinationLatitudeChanged(String),
    DestinationLongitudeChanged(String),
    StartTripRequested,
    ToastDismissed,

    // Platform results
    ContactPicked(Option<PickedContact>),
    FixReceived {
        subscription: SubscriptionId,
        fix: LocationFix,
    },
    DestinationNameResolved {
        trip: TripId,
        result: GeocodeResult,
    },
    MessageSent {
        trip: TripId,
        recipient: PhoneNumber,
        result: SmsResult,
    },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AppStarted => "app_started",
            Self::AppForegrounded => "app_foregrounded",
            Self::AppBackgrounded => "app_backgrounded",
            Self::ConfigurationChanged(_) => "configuration_changed",
            Self::PermissionsChecked { .. } => "permissions_checked",
            Self::PermissionsRequested { .. } => "permissions_requested",
            Self::PickContactRequested => "pick_contact_requested",
            Self::DestinationLatitudeChanged(_) => "destination_latitude_changed",
            Self::DestinationLongitudeChanged(_) => "destination_longitude_changed",
            Self::StartTripRequested => "start_trip_requested",
            Self::ToastDismissed => "toast_dismissed",
            Self::ContactPicked(_) => "contact_picked",
            Self::FixReceived { .. } => "fix_received",
            Self::DestinationNameResolved { .. } => "destination_name_resolved",
            Self::MessageSent { .. } => "message_sent",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::PickContactRequested
                | Self::DestinationLatitudeChanged(_)
                | Self::DestinationLongitudeChanged(_)
                | Self::StartTripRequested
                | Self::ToastDismissed
        )
    }
}
