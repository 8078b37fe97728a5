// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Admission policy applied to every value before it is forwarded into a batch.
///
/// A policy is fixed when a gate is constructed and never changes afterwards. The default
/// ([`strict`](GatePolicy::strict)) policy rejects missing values and blank text;
/// [`permissive`](GatePolicy::permissive) admits everything.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct GatePolicy {
    #[serde(default)]
    allow_empty: bool,
}

impl GatePolicy {
    /// Policy rejecting missing and blank values. This is the default.
    pub fn strict() -> Self {
        Self { allow_empty: false }
    }

    /// Policy admitting every value, including missing and blank ones.
    pub fn permissive() -> Self {
        Self { allow_empty: true }
    }

    /// Whether missing and blank values are admitted.
    pub fn allows_empty(&self) -> bool {
        self.allow_empty
    }

    /// Checks whether `value` passes this policy.
    ///
    /// This is a pure predicate: it never fails with an error and never counts anything.
    pub fn admits<V: Value>(&self, value: &V) -> bool {
        if self.allow_empty {
            return true;
        }
        !(value.is_missing() || value.is_blank())
    }
}

#[cfg(test)]
mod tests {
    use super::GatePolicy;

    #[test]
    fn strict_rejects_missing_and_blank() {
        let policy = GatePolicy::strict();

        assert!(policy.admits(&"penguin"));
        assert!(!policy.admits(&""));
        assert!(!policy.admits(&"  \t"));
        assert!(!policy.admits(&None::<&str>));
        assert!(policy.admits(&Some("penguin")));
    }

    #[test]
    fn permissive_admits_everything() {
        let policy = GatePolicy::permissive();

        assert!(policy.admits(&""));
        assert!(policy.admits(&None::<&str>));
    }

    #[test]
    fn policy_from_config_snippet() {
        let policy: GatePolicy =
            serde_json::from_str(r#"{"allow_empty":true}"#).expect("not fail");
        assert!(policy.allows_empty());

        // Omitted flag falls back to the strict default.
        let policy: GatePolicy = serde_json::from_str("{}").expect("not fail");
        assert_eq!(policy, GatePolicy::strict());
    }
}
