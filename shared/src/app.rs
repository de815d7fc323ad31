use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::capabilities::{
    Capabilities, GeocodeResult, LocationFix, Permission, PermissionGrants, PickedContact,
    SmsResult, SubscriptionId,
};
use crate::event::{CheckReason, Event};
use crate::geo::Coordinate;
use crate::model::{FeedState, Model, ToastKind, ToastMessage};
use crate::notifier::{self, DeliveryReport, RecipientDelivery};
use crate::recipients::PhoneNumber;
use crate::trip::{Arrival, FixOutcome, TripError, TripId, TripState};
use crate::{format_distance, AppError, ErrorKind, TrackerConfig, APP_TITLE};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    #[default]
    Idle,
    Active,
    Completed,
}

impl From<&TripState> for TripStatus {
    fn from(state: &TripState) -> Self {
        match state {
            TripState::Idle => Self::Idle,
            TripState::Active(_) => Self::Active,
            TripState::Completed(_) => Self::Completed,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub title: String,
    pub latitude_text: String,
    pub longitude_text: String,
    pub distance_text: String,
    pub latitude_input: String,
    pub longitude_input: String,
    pub select_contacts_label: String,
    pub recipients: Vec<String>,
    pub recipient_count: usize,
    pub trip_status: TripStatus,
    pub feed_running: bool,
    /// Per-recipient outcome of the last arrival message.
    pub deliveries: Vec<RecipientDelivery>,
    pub permission_warning: Option<String>,
    pub toast: Option<ToastMessage>,
}

#[derive(Default)]
pub struct App;

impl App {
    fn start_feed(model: &mut Model, caps: &Capabilities) {
        if model.feed.is_running() {
            return;
        }
        if !model.grants.is_granted(Permission::Location) {
            debug!("location not granted, feed stays stopped");
            return;
        }

        let subscription = model.next_subscription();
        model.feed = FeedState::Running(subscription);
        info!(subscription = subscription.0, "location feed started");
        caps.location.watch(
            subscription,
            model.config.feed.clone(),
            |subscription, fix| Event::FixReceived { subscription, fix },
        );
    }

    fn stop_feed(model: &mut Model, caps: &Capabilities) {
        if let FeedState::Running(subscription) = model.feed {
            caps.location.stop(subscription);
            model.feed = FeedState::Stopped;
            info!(subscription = subscription.0, "location feed stopped");
        }
    }

    fn deny_permissions(model: &mut Model) {
        let error = AppError::new(ErrorKind::PermissionDenied, "capability refused")
            .with_context("missing", format!("{:?}", model.grants.missing()));
        warn!(code = error.code(), %error, "permissions not granted");

        let message = error.user_facing_message();
        model.permission_warning = Some(message.clone());
        model.show_toast(message, ToastKind::Warning);
    }

    fn on_permissions_checked(
        model: &mut Model,
        caps: &Capabilities,
        grants: &PermissionGrants,
        reason: CheckReason,
    ) {
        model.grants.merge(grants);

        match reason {
            CheckReason::Launch if model.grants.has_all_required() => {
                model.permission_warning = None;
                Self::start_feed(model, caps);
            }
            CheckReason::Launch => {
                caps.permissions.request(model.grants.missing(), |grants| {
                    Event::PermissionsRequested { grants }
                });
            }
            CheckReason::Resume => {
                if model.grants.has_all_required() {
                    model.permission_warning = None;
                }
                Self::start_feed(model, caps);
            }
        }
    }

    fn on_permissions_requested(model: &mut Model, caps: &Capabilities, grants: &PermissionGrants) {
        model.grants.merge(grants);

        if model.grants.has_all_required() {
            info!("permissions granted");
            model.permission_warning = None;
            Self::start_feed(model, caps);
        } else {
            Self::deny_permissions(model);
        }
    }

    fn on_contact_picked(model: &mut Model, picked: Option<PickedContact>) {
        let Some(contact) = picked else {
            debug!("contact picker cancelled");
            return;
        };

        match PhoneNumber::parse(&contact.phone_number) {
            Ok(number) => {
                if model.recipients.insert(number) {
                    info!(recipients = model.recipients.len(), "recipient added");
                } else {
                    debug!("recipient already selected");
                }
            }
            Err(e) => warn!(error = %e, "picked contact has no usable number"),
        }
    }

    fn start_trip(model: &mut Model, caps: &Capabilities) -> Result<TripId, TripError> {
        if !model.grants.has_all_required() {
            return Err(TripError::PermissionDenied);
        }

        let trip = model.trip.start(
            &model.latitude_input,
            &model.longitude_input,
            &model.recipients,
        )?;
        model.live_fix.distance_m = 0.0;
        model.show_toast("Trip Started", ToastKind::Info);
        Self::start_feed(model, caps);
        Ok(trip)
    }

    #[instrument(skip_all, fields(subscription = subscription.0))]
    fn on_fix(model: &mut Model, caps: &Capabilities, subscription: SubscriptionId, fix: &LocationFix) {
        if !model.feed.accepts(subscription) {
            debug!("dropping fix from inactive subscription");
            return;
        }

        let position = match Coordinate::new(fix.latitude, fix.longitude) {
            Ok(position) => position,
            Err(e) => {
                warn!(error = %e, "platform delivered an invalid fix");
                return;
            }
        };
        model.live_fix.update_position(fix);

        match model.trip.on_fix(position) {
            FixOutcome::Ignored => {}
            FixOutcome::Approaching { distance_m } => {
                model.live_fix.distance_m = distance_m;
            }
            FixOutcome::Arrived(arrival) => {
                model.live_fix.distance_m = arrival.distance_m;
                Self::stop_feed(model, caps);
                model.show_toast("Trip Ended", ToastKind::Info);
                Self::resolve_destination_name(model, caps, arrival);
            }
        }
    }

    fn resolve_destination_name(model: &mut Model, caps: &Capabilities, arrival: Arrival) {
        let trip = arrival.trip;
        caps.geocoder.reverse(
            arrival.destination,
            model.config.geocode_max_results,
            move |result| Event::DestinationNameResolved { trip, result },
        );
        model.pending_arrivals.insert(trip, arrival);
    }

    #[instrument(skip_all, fields(trip = %trip))]
    fn on_destination_name(
        model: &mut Model,
        caps: &Capabilities,
        trip: TripId,
        result: &GeocodeResult,
    ) {
        let Some(arrival) = model.pending_arrivals.remove(&trip) else {
            debug!("no pending arrival for this trip");
            return;
        };

        if let Err(e) = result {
            let error = AppError::new(ErrorKind::GeocodeLookup, e.to_string());
            warn!(code = error.code(), %error, "reverse lookup failed, using fallback name");
        }
        let name = notifier::destination_name(result, &model.config.fallback_destination_name);
        let message = notifier::arrival_message(&name);

        info!(recipients = arrival.recipients.len(), "sending arrival message");
        for recipient in &arrival.recipients {
            let for_event = recipient.clone();
            caps.sms.send(recipient.clone(), message.clone(), move |result| {
                Event::MessageSent {
                    trip,
                    recipient: for_event,
                    result,
                }
            });
        }
        model.begin_delivery(DeliveryReport::new(trip, message, &arrival.recipients));
    }

    fn on_message_sent(model: &mut Model, trip: TripId, recipient: &PhoneNumber, result: &SmsResult) {
        let Some(report) = model.deliveries.get_mut(&trip) else {
            debug!(trip = %trip, "send result for an unknown delivery");
            return;
        };
        if !report.record(recipient, result) {
            debug!(trip = %trip, "duplicate or unknown send result");
            return;
        }
        if let Err(e) = result {
            warn!(trip = %trip, error = %e, "arrival message not delivered to one recipient");
        }

        let Some(summary) = report.summary() else {
            return;
        };
        let sent = report.sent_count();
        if summary.is_success() {
            info!(trip = %trip, sent, "arrival message delivered");
            model.show_toast(summary.toast_text(), ToastKind::Success);
        } else {
            let error = AppError::new(ErrorKind::Send, summary.toast_text())
                .with_context("sent", sent.to_string());
            warn!(code = error.code(), %error, "arrival message partially failed");
            model.show_toast(summary.toast_text(), ToastKind::Error);
        }
        model.settle_delivery(trip);
    }

    fn apply_config(model: &mut Model, caps: &Capabilities, config: TrackerConfig) {
        if let Err(e) = config.validate() {
            let error = AppError::from(e);
            warn!(code = error.code(), %error, "keeping previous configuration");
            model.show_toast(error.user_facing_message(), ToastKind::Warning);
            return;
        }

        let feed_changed = config.feed != model.config.feed;
        model.config = config;
        if feed_changed && model.feed.is_running() {
            Self::stop_feed(model, caps);
            Self::start_feed(model, caps);
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        debug!(
            event = event.name(),
            user = event.is_user_initiated(),
            "handling event"
        );

        match event {
            Event::AppStarted => {
                caps.permissions.check(Permission::required(), |grants| {
                    Event::PermissionsChecked {
                        grants,
                        reason: CheckReason::Launch,
                    }
                });
            }

            Event::AppForegrounded => {
                caps.permissions.check(Permission::required(), |grants| {
                    Event::PermissionsChecked {
                        grants,
                        reason: CheckReason::Resume,
                    }
                });
            }

            Event::AppBackgrounded => {
                Self::stop_feed(model, caps);
                caps.render.render();
            }

            Event::ConfigurationChanged(config) => {
                Self::apply_config(model, caps, *config);
                caps.render.render();
            }

            Event::PermissionsChecked { grants, reason } => {
                Self::on_permissions_checked(model, caps, &grants, reason);
                caps.render.render();
            }

            Event::PermissionsRequested { grants } => {
                Self::on_permissions_requested(model, caps, &grants);
                caps.render.render();
            }

            Event::PickContactRequested => {
                caps.contacts.pick_phone_number(Event::ContactPicked);
            }

            Event::ContactPicked(picked) => {
                Self::on_contact_picked(model, picked);
                caps.render.render();
            }

            Event::DestinationLatitudeChanged(text) => {
                model.latitude_input = text;
                caps.render.render();
            }

            Event::DestinationLongitudeChanged(text) => {
                model.longitude_input = text;
                caps.render.render();
            }

            Event::StartTripRequested => {
                if let Err(e) = Self::start_trip(model, caps) {
                    let error = AppError::from(e);
                    warn!(code = error.code(), %error, "trip not started");
                    if error.kind == ErrorKind::PermissionDenied {
                        Self::deny_permissions(model);
                    } else {
                        model.show_toast(error.user_facing_message(), ToastKind::Warning);
                    }
                }
                caps.render.render();
            }

            Event::ToastDismissed => {
                model.clear_toast();
                caps.render.render();
            }

            Event::FixReceived { subscription, fix } => {
                Self::on_fix(model, caps, subscription, &fix);
                caps.render.render();
            }

            Event::DestinationNameResolved { trip, result } => {
                Self::on_destination_name(model, caps, trip, &result);
                caps.render.render();
            }

            Event::MessageSent {
                trip,
                recipient,
                result,
            } => {
                Self::on_message_sent(model, trip, &recipient, &result);
                caps.render.render();
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        let recipients: Vec<String> = model.recipients.iter().map(ToString::to_string).collect();

        ViewModel {
            title: APP_TITLE.to_string(),
            latitude_text: format!("Lat: {:?}", model.live_fix.latitude),
            longitude_text: format!("Lng: {:?}", model.live_fix.longitude),
            distance_text: format_distance(model.live_fix.distance_m),
            latitude_input: model.latitude_input.clone(),
            longitude_input: model.longitude_input.clone(),
            select_contacts_label: format!("SELECT CONTACTS ({})", recipients.len()),
            recipient_count: recipients.len(),
            recipients,
            trip_status: TripStatus::from(&model.trip),
            feed_running: model.feed.is_running(),
            deliveries: model
                .latest_delivery()
                .map(|report| report.deliveries.clone())
                .unwrap_or_default(),
            permission_warning: model.permission_warning.clone(),
            toast: model.active_toast.clone(),
        }
    }
}
