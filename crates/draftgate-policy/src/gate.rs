//! Scoped capability gate.
//!
//! `ScopedCapabilityGate` implements the `CapabilityGate` trait from
//! draftgate-core.
//!
//! Evaluation algorithm for `denial_reason(actor, action_type)`:
//!
//! 1. If a required feature is configured and the actor lacks it → deny.
//! 2. If the actor carries any explicit permission, the permission tier
//!    decides alone:
//!    a. the approve permission must be present, and
//!    b. if `action_type` has a scope, that scope permission must be present.
//! 3. Otherwise the role tier decides: the admin flag or a role from the
//!    fallback list allows; anything else → deny.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use draftgate_contracts::actor::Actor;
use draftgate_core::traits::CapabilityGate;

/// Gate settings, the `[gate]` section of the engine configuration.
///
/// Example:
/// ```toml
/// [gate]
/// required_feature = "ai.actions"
/// approve_permission = "ai.workflows.approve"
/// fallback_roles = ["owner", "buyer_admin", "finance", "platform_super"]
///
/// [gate.action_scopes]
/// compare_quotes = "rfqs.write"
/// po_draft = "orders.write"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Feature flag every actor needs. An empty string disables the check.
    pub required_feature: String,

    /// Permission required of every actor judged by the permission tier.
    pub approve_permission: String,

    /// Roles allowed by the role tier.
    pub fallback_roles: Vec<String>,

    /// Extra permission needed per action type. Action types not listed need
    /// only `approve_permission`.
    pub action_scopes: HashMap<String, String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            required_feature: "ai.actions".to_string(),
            approve_permission: "ai.workflows.approve".to_string(),
            fallback_roles: ["owner", "buyer_admin", "finance", "platform_super"]
                .into_iter()
                .map(String::from)
                .collect(),
            action_scopes: [("compare_quotes", "rfqs.write"), ("po_draft", "orders.write")]
                .into_iter()
                .map(|(action, scope)| (action.to_string(), scope.to_string()))
                .collect(),
        }
    }
}

/// A `CapabilityGate` driven by a [`GateConfig`].
#[derive(Debug, Clone, Default)]
pub struct ScopedCapabilityGate {
    config: GateConfig,
}

impl ScopedCapabilityGate {
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    fn permission_denial(&self, actor: &Actor, action_type: &str) -> Option<String> {
        let approve = &self.config.approve_permission;
        if !actor.permissions.has(approve) {
            return Some(format!(
                "user '{}' lacks permission '{}'",
                actor.user_id, approve
            ));
        }
        match self.config.action_scopes.get(action_type) {
            Some(scope) if !actor.permissions.has(scope) => Some(format!(
                "user '{}' lacks permission '{}' required for '{}'",
                actor.user_id, scope, action_type
            )),
            _ => None,
        }
    }

    fn role_denial(&self, actor: &Actor, action_type: &str) -> Option<String> {
        if actor.is_admin {
            return None;
        }
        let allowed = actor
            .role
            .as_deref()
            .is_some_and(|role| self.config.fallback_roles.iter().any(|r| r == role));
        if allowed {
            None
        } else {
            Some(format!(
                "role '{}' of user '{}' may not resolve '{}'",
                actor.role.as_deref().unwrap_or("none"),
                actor.user_id,
                action_type
            ))
        }
    }
}

impl CapabilityGate for ScopedCapabilityGate {
    fn denial_reason(&self, actor: &Actor, action_type: &str) -> Option<String> {
        if let Some(reason) = self.entitlement_denial(actor) {
            return Some(reason);
        }

        // Permission tier takes precedence whenever the actor has any permission.
        let (tier, denial) = if actor.permissions.is_empty() {
            ("role", self.role_denial(actor, action_type))
        } else {
            ("permission", self.permission_denial(actor, action_type))
        };

        debug!(
            user = %actor.user_id,
            action_type = %action_type,
            tier,
            allowed = denial.is_none(),
            "gate evaluated"
        );
        denial
    }

    fn entitlement_denial(&self, actor: &Actor) -> Option<String> {
        let feature = self.config.required_feature.as_str();
        if feature.is_empty() || actor.is_entitled(feature) {
            None
        } else {
            Some(format!(
                "feature '{}' is not enabled for user '{}'",
                feature, actor.user_id
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use draftgate_contracts::actor::Actor;
    use draftgate_core::traits::CapabilityGate;

    use super::{GateConfig, ScopedCapabilityGate};

    fn gate() -> ScopedCapabilityGate {
        ScopedCapabilityGate::default()
    }

    fn entitled(user: &str) -> Actor {
        Actor::new(user).with_feature("ai.actions")
    }

    // ── Entitlement ───────────────────────────────────────────────────────────

    #[test]
    fn test_missing_feature_denies_everyone() {
        let owner = Actor::new("u-1").with_role("owner").with_admin(true);
        assert!(!gate().can_resolve(&owner, "compare_quotes"));
        assert!(!gate().can_plan(&owner));

        let reason = gate().denial_reason(&owner, "compare_quotes").unwrap();
        assert!(reason.contains("ai.actions"), "unexpected reason: {reason}");
    }

    #[test]
    fn test_blank_required_feature_disables_entitlement() {
        let gate = ScopedCapabilityGate::new(GateConfig {
            required_feature: String::new(),
            ..GateConfig::default()
        });
        let owner = Actor::new("u-1").with_role("owner");
        assert!(gate.can_plan(&owner));
        assert!(gate.can_resolve(&owner, "po_draft"));
    }

    // ── Permission tier ───────────────────────────────────────────────────────

    #[test]
    fn test_permission_tier_requires_approve_and_scope() {
        let buyer = entitled("u-2").with_permissions(["ai.workflows.approve", "rfqs.write"]);
        assert!(gate().can_resolve(&buyer, "compare_quotes"));
        assert!(!gate().can_resolve(&buyer, "po_draft"));
        // Unscoped action types need only the approve permission.
        assert!(gate().can_resolve(&buyer, "notify_supplier"));

        let scoped_only = entitled("u-3").with_permissions(["orders.write"]);
        assert!(!gate().can_resolve(&scoped_only, "po_draft"));
    }

    #[test]
    fn test_permissions_override_role() {
        // An owner with an unrelated explicit permission is judged by permissions.
        let owner = entitled("u-4")
            .with_role("owner")
            .with_admin(true)
            .with_permissions(["reports.read"]);
        assert!(!gate().can_resolve(&owner, "compare_quotes"));
    }

    // ── Role tier ─────────────────────────────────────────────────────────────

    #[test]
    fn test_role_tier() {
        for role in ["owner", "buyer_admin", "finance", "platform_super"] {
            let actor = entitled("u-5").with_role(role);
            assert!(gate().can_resolve(&actor, "po_draft"), "role {role} should be allowed");
        }

        let viewer = entitled("u-6").with_role("viewer");
        assert!(!gate().can_resolve(&viewer, "po_draft"));

        let roleless = entitled("u-7");
        assert!(!gate().can_resolve(&roleless, "po_draft"));

        let admin = entitled("u-8").with_role("viewer").with_admin(true);
        assert!(gate().can_resolve(&admin, "po_draft"));
    }

    #[test]
    fn test_denial_reasons_name_the_missing_piece() {
        let buyer = entitled("u-2").with_permissions(["ai.workflows.approve"]);
        let reason = gate().denial_reason(&buyer, "po_draft").unwrap();
        assert!(reason.contains("orders.write"), "unexpected reason: {reason}");

        let viewer = entitled("u-6").with_role("viewer");
        let reason = gate().denial_reason(&viewer, "compare_quotes").unwrap();
        assert!(reason.contains("viewer"), "unexpected reason: {reason}");
    }
}
