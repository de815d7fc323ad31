use crux_core::capability::{CapabilityContext, Operation};
use crux_core::macros::Capability;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op")]
pub enum ContactsOperation {
    /// Opens the address-book picker for a single phone number.
    PickPhoneNumber,
}

impl Operation for ContactsOperation {
    type Output = Option<PickedContact>;
}

/// What the picker hands back; `phone_number` is the raw stored string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PickedContact {
    pub phone_number: String,
}

#[derive(Capability)]
pub struct Contacts<Ev> {
    context: CapabilityContext<ContactsOperation, Ev>,
}

impl<Ev> Contacts<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<ContactsOperation, Ev>) -> Self {
        Self { context }
    }

    /// Resolves to `None` when the user backs out of the picker.
    pub fn pick_phone_number<F>(&self, callback: F)
    where
        F: FnOnce(Option<PickedContact>) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let picked = context
                .request_from_shell(ContactsOperation::PickPhoneNumber)
                .await;
            context.update_app(callback(picked));
        });
    }
}
