use std::collections::{BTreeMap, BTreeSet};

use crux_core::capability::{CapabilityContext, Operation};
use crux_core::macros::Capability;
use serde::{Deserialize, Serialize};

/// Runtime capabilities the tracker needs from the platform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Continuous fine location.
    Location,
    /// Sending text messages.
    SendSms,
}

impl Permission {
    pub const REQUIRED: [Self; 2] = [Self::Location, Self::SendSms];

    #[must_use]
    pub fn required() -> BTreeSet<Self> {
        Self::REQUIRED.into_iter().collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "data")]
pub enum PermissionOperation {
    /// Non-interactive status query.
    Check(BTreeSet<Permission>),
    /// One combined interactive prompt for every listed permission.
    Request(BTreeSet<Permission>),
}

impl Operation for PermissionOperation {
    type Output = PermissionGrants;
}

/// Per-permission grant answer from the platform.
///
/// A permission absent from the map counts as not granted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionGrants(pub BTreeMap<Permission, bool>);

impl PermissionGrants {
    #[must_use]
    pub fn new(grants: impl IntoIterator<Item = (Permission, bool)>) -> Self {
        Self(grants.into_iter().collect())
    }

    #[must_use]
    pub fn all_granted() -> Self {
        Self::new(Permission::REQUIRED.map(|p| (p, true)))
    }

    #[must_use]
    pub fn none_granted() -> Self {
        Self::new(Permission::REQUIRED.map(|p| (p, false)))
    }

    #[must_use]
    pub fn is_granted(&self, permission: Permission) -> bool {
        self.0.get(&permission).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn missing(&self) -> BTreeSet<Permission> {
        Permission::REQUIRED
            .into_iter()
            .filter(|p| !self.is_granted(*p))
            .collect()
    }

    #[must_use]
    pub fn has_all_required(&self) -> bool {
        self.missing().is_empty()
    }

    /// Overlays newer answers on top of what is already known.
    pub fn merge(&mut self, newer: &Self) {
        for (permission, granted) in &newer.0 {
            self.0.insert(*permission, *granted);
        }
    }
}

#[derive(Capability)]
pub struct Permissions<Ev> {
    context: CapabilityContext<PermissionOperation, Ev>,
}

impl<Ev> Permissions<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<PermissionOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn check<F>(&self, permissions: BTreeSet<Permission>, callback: F)
    where
        F: FnOnce(PermissionGrants) -> Ev + Send + 'static,
    {
        self.run(PermissionOperation::Check(permissions), callback);
    }

    pub fn request<F>(&self, permissions: BTreeSet<Permission>, callback: F)
    where
        F: FnOnce(PermissionGrants) -> Ev + Send + 'static,
    {
        self.run(PermissionOperation::Request(permissions), callback);
    }

    fn run<F>(&self, operation: PermissionOperation, callback: F)
    where
        F: FnOnce(PermissionGrants) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let grants = context.request_from_shell(operation).await;
            context.update_app(callback(grants));
        });
    }
}
