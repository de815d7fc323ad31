use crux_core::capability::{CapabilityContext, Operation};
use crux_core::macros::Capability;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::recipients::PhoneNumber;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "data")]
pub enum SmsOperation {
    Send { recipient: PhoneNumber, body: String },
}

impl Operation for SmsOperation {
    type Output = SmsResult;
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum SmsError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("no service")]
    NoService,

    #[error("invalid destination address")]
    InvalidRecipient,

    #[error("{message}")]
    Platform { message: String },
}

pub type SmsResult = Result<(), SmsError>;

#[derive(Capability)]
pub struct Sms<Ev> {
    context: CapabilityContext<SmsOperation, Ev>,
}

impl<Ev> Sms<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<SmsOperation, Ev>) -> Self {
        Self { context }
    }

    /// Sends one message to one recipient; no retry.
    pub fn send<F>(&self, recipient: PhoneNumber, body: String, callback: F)
    where
        F: FnOnce(SmsResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context
                .request_from_shell(SmsOperation::Send { recipient, body })
                .await;
            context.update_app(callback(result));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_operation_shape() {
        let op = SmsOperation::Send {
            recipient: PhoneNumber::parse("+15551234567").unwrap(),
            body: "I reached home".into(),
        };
        let json = serde_json::to_string(&op).unwrap();
        assert_eq!(
            json,
            r#"{"op":"Send","data":{"recipient":"+15551234567","body":"I reached home"}}"#
        );
    }
}
