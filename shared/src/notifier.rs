//! Arrival message composition and per-recipient delivery tracking.

use serde::{Deserialize, Serialize};

use crate::capabilities::{GeocodeResult, SmsResult};
use crate::recipients::PhoneNumber;
use crate::trip::TripId;

/// Picks the display name for the destination from a reverse lookup.
///
/// Errors, empty candidate lists and blank first lines all yield `fallback`.
/// Logging the error is left to the caller.
#[must_use]
pub fn destination_name(result: &GeocodeResult, fallback: &str) -> String {
    match result {
        Ok(addresses) => addresses
            .first()
            .and_then(|address| address.first_line())
            .map_or_else(|| fallback.to_string(), str::to_string),
        Err(_) => fallback.to_string(),
    }
}

#[must_use]
pub fn arrival_message(destination_name: &str) -> String {
    format!("I reached {destination_name}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryStatus {
    Pending,
    Sent,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientDelivery {
    pub recipient: PhoneNumber,
    pub status: DeliveryStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliverySummary {
    AllSent { total: usize },
    SomeFailed { failed: usize, total: usize, first_reason: String },
}

impl DeliverySummary {
    #[must_use]
    pub fn toast_text(&self) -> String {
        match self {
            Self::AllSent { total } => format!("SMS sent to {total} contacts"),
            Self::SomeFailed {
                failed,
                total,
                first_reason,
            } => format!("SMS failed for {failed} of {total} contacts: {first_reason}"),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::AllSent { .. })
    }
}

/// Outcome of one arrival notification, one entry per recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub trip: TripId,
    pub message: String,
    pub deliveries: Vec<RecipientDelivery>,
}

impl DeliveryReport {
    #[must_use]
    pub fn new(trip: TripId, message: String, recipients: &[PhoneNumber]) -> Self {
        Self {
            trip,
            message,
            deliveries: recipients
                .iter()
                .map(|recipient| RecipientDelivery {
                    recipient: recipient.clone(),
                    status: DeliveryStatus::Pending,
                })
                .collect(),
        }
    }

    /// Stores the send outcome for `recipient`.
    ///
    /// Returns `false` for unknown recipients and for ones already settled.
    pub fn record(&mut self, recipient: &PhoneNumber, result: &SmsResult) -> bool {
        let Some(delivery) = self
            .deliveries
            .iter_mut()
            .find(|d| &d.recipient == recipient && d.status == DeliveryStatus::Pending)
        else {
            return false;
        };
        delivery.status = match result {
            Ok(()) => DeliveryStatus::Sent,
            Err(e) => DeliveryStatus::Failed {
                reason: e.to_string(),
            },
        };
        true
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.deliveries
            .iter()
            .all(|d| d.status != DeliveryStatus::Pending)
    }

    #[must_use]
    pub fn sent_count(&self) -> usize {
        self.deliveries
            .iter()
            .filter(|d| d.status == DeliveryStatus::Sent)
            .count()
    }

    /// `None` while any send is still outstanding.
    #[must_use]
    pub fn summary(&self) -> Option<DeliverySummary> {
        if !self.is_complete() {
            return None;
        }
        let total = self.deliveries.len();
        let mut failures = self.deliveries.iter().filter_map(|d| match &d.status {
            DeliveryStatus::Failed { reason } => Some(reason),
            _ => None,
        });
        let Some(first_reason) = failures.next() else {
            return Some(DeliverySummary::AllSent { total });
        };
        Some(DeliverySummary::SomeFailed {
            failed: 1 + failures.count(),
            total,
            first_reason: first_reason.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{Address, GeocodeError, SmsError};

    fn numbers(raw: &[&str]) -> Vec<PhoneNumber> {
        raw.iter().map(|n| PhoneNumber::parse(n).unwrap()).collect()
    }

    #[test]
    fn test_destination_name_uses_first_line() {
        let result = Ok(vec![
            Address::new(["1 Infinite Loop", "Cupertino"]),
            Address::new(["elsewhere"]),
        ]);
        assert_eq!(destination_name(&result, "the destination"), "1 Infinite Loop");
    }

    #[test]
    fn test_destination_name_fallbacks() {
        let fallback = "the destination";
        assert_eq!(destination_name(&Ok(vec![]), fallback), fallback);
        assert_eq!(destination_name(&Ok(vec![Address::default()]), fallback), fallback);
        assert_eq!(destination_name(&Err(GeocodeError::Timeout), fallback), fallback);
        assert_eq!(
            destination_name(&Err(GeocodeError::Io { message: "offline".into() }), fallback),
            fallback
        );
    }

    #[test]
    fn test_arrival_message() {
        assert_eq!(arrival_message("the destination"), "I reached the destination");
    }

    #[test]
    fn test_report_all_sent() {
        let recipients = numbers(&["1", "2"]);
        let mut report = DeliveryReport::new(TripId::generate(), "hi".into(), &recipients);
        assert_eq!(report.summary(), None);

        assert!(report.record(&recipients[1], &Ok(())));
        assert!(!report.is_complete());
        assert!(report.record(&recipients[0], &Ok(())));

        let summary = report.summary().unwrap();
        assert_eq!(summary, DeliverySummary::AllSent { total: 2 });
        assert_eq!(summary.toast_text(), "SMS sent to 2 contacts");
    }

    #[test]
    fn test_report_partial_failure_keeps_other_outcomes() {
        let recipients = numbers(&["1", "2", "3"]);
        let mut report = DeliveryReport::new(TripId::generate(), "hi".into(), &recipients);
        report.record(&recipients[0], &Err(SmsError::NoService));
        report.record(&recipients[1], &Ok(()));
        report.record(&recipients[2], &Err(SmsError::InvalidRecipient));

        assert_eq!(report.sent_count(), 1);
        let summary = report.summary().unwrap();
        assert!(!summary.is_success());
        assert_eq!(summary.toast_text(), "SMS failed for 2 of 3 contacts: no service");
    }

    #[test]
    fn test_report_ignores_unknown_and_repeated() {
        let recipients = numbers(&["1"]);
        let mut report = DeliveryReport::new(TripId::generate(), "hi".into(), &recipients);
        assert!(!report.record(&PhoneNumber::parse("9").unwrap(), &Ok(())));
        assert!(report.record(&recipients[0], &Err(SmsError::NoService)));
        assert!(!report.record(&recipients[0], &Ok(())));
        assert_eq!(report.sent_count(), 0);
    }
}
