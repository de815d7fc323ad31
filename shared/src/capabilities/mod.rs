//! Platform services the core asks the shell for.
//!
//! Render is Crux's built-in capability; everything else is defined here
//! because no stock Crux capability covers it.

mod contacts;
mod geocoder;
mod location;
mod permissions;
mod sms;

pub use self::contacts::{Contacts, ContactsOperation, PickedContact};
pub use self::geocoder::{Address, GeocodeError, GeocodeOperation, GeocodeResult, Geocoder};
pub use self::location::{Location, LocationFix, LocationOperation, SubscriptionId};
pub use self::permissions::{Permission, PermissionGrants, PermissionOperation, Permissions};
pub use self::sms::{Sms, SmsError, SmsOperation, SmsResult};

pub use crux_core::render::Render;

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub permissions: Permissions<Event>,
    pub contacts: Contacts<Event>,
    pub location: Location<Event>,
    pub geocoder: Geocoder<Event>,
    pub sms: Sms<Event>,
    pub render: Render<Event>,
}
