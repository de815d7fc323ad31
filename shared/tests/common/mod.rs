#![allow(dead_code)]

use crux_core::capability::Operation;
use crux_core::testing::AppTester;
use crux_core::Request;

use shared::capabilities::{
    ContactsOperation, GeocodeOperation, LocationFix, LocationOperation, PermissionGrants,
    PermissionOperation, SmsOperation,
};
use shared::geo::EARTH_RADIUS_M;
use shared::{App, Effect, Event, Model, ViewModel};

pub const DEST_LAT: f64 = 37.0;
pub const DEST_LNG: f64 = -122.0;
pub const RECIPIENT: &str = "+15551234567";

/// Drives the core like a shell would, feeding produced events straight back in.
pub struct Harness {
    pub app: AppTester<App, Effect>,
    pub model: Model,
}

impl Default for Harness {
    fn default() -> Self {
        Self {
            app: AppTester::default(),
            model: Model::default(),
        }
    }
}

impl Harness {
    pub fn send(&mut self, event: Event) -> Vec<Effect> {
        let update = self.app.update(event, &mut self.model);
        let mut effects = update.effects;
        for event in update.events {
            effects.extend(self.send(event));
        }
        effects
    }

    pub fn resolve<Op: Operation>(
        &mut self,
        request: &mut Request<Op>,
        output: Op::Output,
    ) -> Vec<Effect> {
        let update = self
            .app
            .resolve(request, output)
            .expect("request should resolve");
        let mut effects = update.effects;
        for event in update.events {
            effects.extend(self.send(event));
        }
        effects
    }

    pub fn view(&self) -> ViewModel {
        self.app.view(&self.model)
    }

    /// Launches with both permissions granted; returns the live location watch.
    pub fn launch_granted(&mut self) -> Request<LocationOperation> {
        let mut effects = self.send(Event::AppStarted);
        let mut check = take_permissions(&mut effects).remove(0);
        let mut effects = self.resolve(&mut check, PermissionGrants::all_granted());
        take_location(&mut effects).remove(0)
    }

    /// Picks one contact through the picker round trip.
    pub fn pick(&mut self, raw_number: &str) {
        let mut effects = self.send(Event::PickContactRequested);
        let mut picker = take_contacts(&mut effects).remove(0);
        self.resolve(
            &mut picker,
            Some(shared::capabilities::PickedContact {
                phone_number: raw_number.to_string(),
            }),
        );
    }

    pub fn enter_destination(&mut self, lat: &str, lng: &str) -> Vec<Effect> {
        self.send(Event::DestinationLatitudeChanged(lat.to_string()));
        self.send(Event::DestinationLongitudeChanged(lng.to_string()));
        self.send(Event::StartTripRequested)
    }
}

/// A fix `meters` due north of the destination.
pub fn fix_north_of_destination(meters: f64) -> LocationFix {
    let meters_per_degree = EARTH_RADIUS_M.to_radians();
    LocationFix::new(DEST_LAT + meters / meters_per_degree, DEST_LNG)
}

macro_rules! take_requests {
    ($name:ident, $variant:ident, $op:ty) => {
        pub fn $name(effects: &mut Vec<Effect>) -> Vec<Request<$op>> {
            let mut taken = Vec::new();
            let mut rest = Vec::new();
            for effect in effects.drain(..) {
                match effect {
                    Effect::$variant(request) => taken.push(request),
                    other => rest.push(other),
                }
            }
            *effects = rest;
            taken
        }
    };
}

take_requests!(take_permissions, Permissions, PermissionOperation);
take_requests!(take_contacts, Contacts, ContactsOperation);
take_requests!(take_location, Location, LocationOperation);
take_requests!(take_geocoder, Geocoder, GeocodeOperation);
take_requests!(take_sms, Sms, SmsOperation);

pub fn has_render(effects: &[Effect]) -> bool {
    effects.iter().any(|e| matches!(e, Effect::Render(_)))
}
