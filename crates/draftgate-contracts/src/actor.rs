//! Caller identity, permission and entitlement types.
//!
//! The engine never reads permissions or feature flags from ambient state.
//! Every gated call receives an explicit `Actor` describing who is asking and
//! what they are entitled to.

use std::borrow::Borrow;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A namespaced permission string, e.g. "ai.workflows.approve" or "rfqs.write".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission(pub String);

impl Permission {
    /// Construct a permission from any string-like value.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

// Lets `PermissionSet` look permissions up by name.
impl Borrow<str> for Permission {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// An explicit set of permissions held by a caller.
///
/// An empty set means "this caller comes from a role-based system" and makes
/// the capability gate fall back to the role allow-list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    inner: HashSet<Permission>,
}

impl PermissionSet {
    /// Build a set from string-like names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        for name in names {
            set.grant(Permission::new(name));
        }
        set
    }

    /// Grant a permission to this set.
    pub fn grant(&mut self, permission: Permission) {
        self.inner.insert(permission);
    }

    /// Return true if the set contains the permission named `name`.
    pub fn has(&self, name: &str) -> bool {
        self.inner.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Return an iterator over all granted permissions.
    pub fn all(&self) -> impl Iterator<Item = &Permission> {
        self.inner.iter()
    }
}

/// The caller on whose behalf a gated operation runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Stable user identifier, recorded on every transition the actor makes.
    pub user_id: String,
    /// Coarse role from a role-based system (e.g. "buyer_admin").
    pub role: Option<String>,
    /// Platform administrator flag; honoured only by the role fallback.
    #[serde(default)]
    pub is_admin: bool,
    /// Explicit permission scope. Takes precedence over `role` when non-empty.
    #[serde(default)]
    pub permissions: PermissionSet,
    /// Feature entitlements of the caller's organisation (e.g. "ai.actions").
    #[serde(default)]
    pub features: HashSet<String>,
}

impl Actor {
    /// An actor with only a user id; add role, permissions and features with
    /// the builder methods below.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    pub fn with_permissions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = PermissionSet::from_names(names);
        self
    }

    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.insert(feature.into());
        self
    }

    /// Return true if the caller's organisation holds `feature`.
    pub fn is_entitled(&self, feature: &str) -> bool {
        self.features.contains(feature)
    }
}
