use crux_core::capability::{CapabilityContext, Operation};
use crux_core::macros::Capability;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::config::FeedConfig;

/// Core-assigned handle for one position subscription.
///
/// Increments on every start so fixes from an earlier subscription that the
/// shell delivers after a stop can be told apart and dropped.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

impl SubscriptionId {
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "data")]
pub enum LocationOperation {
    Watch {
        subscription: SubscriptionId,
        config: FeedConfig,
    },
    Stop {
        subscription: SubscriptionId,
    },
}

impl Operation for LocationOperation {
    type Output = LocationFix;
}

/// One position sample from the platform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub accuracy_m: Option<f64>,
}

impl LocationFix {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_m: None,
        }
    }
}

#[derive(Capability)]
pub struct Location<Ev> {
    context: CapabilityContext<LocationOperation, Ev>,
}

impl<Ev> Location<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<LocationOperation, Ev>) -> Self {
        Self { context }
    }

    /// Subscribes to periodic fixes; `callback` runs once per delivered fix.
    pub fn watch<F>(&self, subscription: SubscriptionId, config: FeedConfig, callback: F)
    where
        F: Fn(SubscriptionId, LocationFix) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let mut fixes = context.stream_from_shell(LocationOperation::Watch {
                subscription,
                config,
            });
            while let Some(fix) = fixes.next().await {
                context.update_app(callback(subscription, fix));
            }
        });
    }

    pub fn stop(&self, subscription: SubscriptionId) {
        let context = self.context.clone();
        self.context.spawn(async move {
            context
                .notify_shell(LocationOperation::Stop { subscription })
                .await;
        });
    }
}
