mod common;

use assert_matches::assert_matches;
use common::*;

use shared::capabilities::{Permission, PermissionGrants, PermissionOperation};
use shared::{Event, FeedState, ToastKind, TripState, TripStatus};

#[test]
fn launch_with_grants_starts_feed_without_prompting() {
    let mut harness = Harness::default();
    let mut effects = harness.send(Event::AppStarted);

    let mut checks = take_permissions(&mut effects);
    assert_eq!(checks.len(), 1);
    assert_eq!(
        checks[0].operation,
        PermissionOperation::Check(Permission::required())
    );

    let mut effects = harness.resolve(&mut checks[0], PermissionGrants::all_granted());
    assert!(take_permissions(&mut effects).is_empty());
    assert_eq!(take_location(&mut effects).len(), 1);
    assert!(has_render(&effects));

    let view = harness.view();
    assert!(view.feed_running);
    assert_eq!(view.permission_warning, None);
}

#[test]
fn launch_requests_only_missing_permissions() {
    let mut harness = Harness::default();
    let mut effects = harness.send(Event::AppStarted);
    let mut check = take_permissions(&mut effects).remove(0);

    let partial = PermissionGrants::new([(Permission::Location, true), (Permission::SendSms, false)]);
    let mut effects = harness.resolve(&mut check, partial);

    let requests = take_permissions(&mut effects);
    assert_eq!(requests.len(), 1);
    assert_matches!(
        &requests[0].operation,
        PermissionOperation::Request(set) if set.len() == 1 && set.contains(&Permission::SendSms)
    );
    assert!(!harness.model.feed.is_running());
}

#[test]
fn denial_never_starts_feed_or_trip() {
    let mut harness = Harness::default();
    let mut effects = harness.send(Event::AppStarted);
    let mut check = take_permissions(&mut effects).remove(0);
    let mut effects = harness.resolve(&mut check, PermissionGrants::none_granted());
    let mut request = take_permissions(&mut effects).remove(0);

    let mut effects = harness.resolve(&mut request, PermissionGrants::none_granted());
    assert!(take_location(&mut effects).is_empty());

    let view = harness.view();
    assert_eq!(
        view.permission_warning.as_deref(),
        Some("Location & SMS permission required")
    );
    let toast = view.toast.unwrap();
    assert_eq!(toast.kind, ToastKind::Warning);
    assert_eq!(toast.duration_ms, 3500);

    harness.pick(RECIPIENT);
    let mut effects = harness.enter_destination("37.0", "-122.0");
    assert!(take_location(&mut effects).is_empty());
    assert_eq!(harness.model.trip, TripState::Idle);
    assert_eq!(harness.model.feed, FeedState::Stopped);
    assert_eq!(harness.view().trip_status, TripStatus::Idle);
}

#[test]
fn location_only_grant_tracks_but_cannot_start_trip() {
    let mut harness = Harness::default();
    let mut effects = harness.send(Event::AppStarted);
    let mut check = take_permissions(&mut effects).remove(0);
    let mut effects = harness.resolve(&mut check, PermissionGrants::none_granted());
    let mut request = take_permissions(&mut effects).remove(0);

    let location_only =
        PermissionGrants::new([(Permission::Location, true), (Permission::SendSms, false)]);
    let mut effects = harness.resolve(&mut request, location_only);
    assert!(take_location(&mut effects).is_empty());
    assert!(harness.view().permission_warning.is_some());

    harness.pick(RECIPIENT);
    harness.enter_destination("37.0", "-122.0");
    assert_eq!(harness.model.trip, TripState::Idle);
}

#[test]
fn resume_rechecks_without_prompting() {
    let mut harness = Harness::default();
    let mut effects = harness.send(Event::AppStarted);
    let mut check = take_permissions(&mut effects).remove(0);
    let mut effects = harness.resolve(&mut check, PermissionGrants::none_granted());
    let mut request = take_permissions(&mut effects).remove(0);
    harness.resolve(&mut request, PermissionGrants::none_granted());

    // still denied on resume: no new prompt, no feed
    let mut effects = harness.send(Event::AppForegrounded);
    let mut recheck = take_permissions(&mut effects).remove(0);
    assert_matches!(recheck.operation, PermissionOperation::Check(_));
    let mut effects = harness.resolve(&mut recheck, PermissionGrants::none_granted());
    assert!(take_permissions(&mut effects).is_empty());
    assert!(take_location(&mut effects).is_empty());

    // granted from system settings while away
    let mut effects = harness.send(Event::AppForegrounded);
    let mut recheck = take_permissions(&mut effects).remove(0);
    let mut effects = harness.resolve(&mut recheck, PermissionGrants::all_granted());
    assert_eq!(take_location(&mut effects).len(), 1);
    assert_eq!(harness.view().permission_warning, None);

    harness.pick(RECIPIENT);
    harness.enter_destination("37.0", "-122.0");
    assert!(harness.model.trip.is_active());
}

#[test]
fn dismissing_toast_clears_it() {
    let mut harness = Harness::default();
    harness.launch_granted();
    harness.enter_destination("", "");
    assert!(harness.view().toast.is_some());

    let effects = harness.send(Event::ToastDismissed);
    assert!(has_render(&effects));
    assert_eq!(harness.view().toast, None);
}
