//! Per-route operation policies.
//!
//! Declared once at startup and resolved by the admission middleware with a
//! longest-prefix match, so required roles and onboarding exemptions live in
//! one table instead of being scattered through handlers.

use campuserp_auth::Role;
use campuserp_pipeline::{Method, OperationPolicy};

struct PolicyEntry {
    /// None matches any verb.
    method: Option<Method>,
    prefix: &'static str,
    policy: OperationPolicy,
}

pub struct PolicyTable {
    entries: Vec<PolicyEntry>,
    fallback: OperationPolicy,
}

impl PolicyTable {
    /// The deployed route policies.
    pub fn standard() -> Self {
        let entries = vec![
            PolicyEntry {
                method: None,
                prefix: "/auth",
                policy: OperationPolicy::open().exempt(),
            },
            PolicyEntry {
                method: Some(Method::Get),
                prefix: "/onboarding/status",
                policy: OperationPolicy::open().exempt(),
            },
            PolicyEntry {
                method: None,
                prefix: "/onboarding",
                policy: OperationPolicy::require([Role::UniversityAdmin]).exempt(),
            },
            PolicyEntry {
                method: Some(Method::Post),
                prefix: "/students",
                policy: OperationPolicy::require([
                    Role::UniversityAdmin,
                    Role::DepartmentHead,
                    Role::Staff,
                ]),
            },
            PolicyEntry {
                method: Some(Method::Get),
                prefix: "/fees",
                policy: OperationPolicy::require([Role::Staff]),
            },
            PolicyEntry {
                method: Some(Method::Post),
                prefix: "/fees",
                policy: OperationPolicy::require([Role::UniversityAdmin]),
            },
            PolicyEntry {
                method: Some(Method::Get),
                prefix: "/audit",
                policy: OperationPolicy::require([Role::UniversityAdmin]),
            },
        ];

        Self {
            entries,
            fallback: OperationPolicy::open(),
        }
    }

    /// Resolve the policy for one request: longest matching prefix wins;
    /// among equal prefixes a verb-specific entry beats a catch-all.
    pub fn lookup(&self, method: Method, path: &str) -> &OperationPolicy {
        self.entries
            .iter()
            .filter(|e| path.starts_with(e.prefix))
            .filter(|e| e.method.is_none() || e.method == Some(method))
            .max_by_key(|e| (e.prefix.len(), e.method.is_some()))
            .map(|e| &e.policy)
            .unwrap_or(&self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_prefix_wins() {
        let table = PolicyTable::standard();

        // /onboarding/status is open even though /onboarding requires admin.
        let status = table.lookup(Method::Get, "/onboarding/status");
        assert!(status.required_roles.is_empty());
        assert!(status.onboarding_exempt);

        let submit = table.lookup(Method::Post, "/onboarding/stages/2");
        assert_eq!(submit.required_roles, vec![Role::UniversityAdmin]);
        assert!(submit.onboarding_exempt);
    }

    #[test]
    fn verbs_are_distinguished() {
        let table = PolicyTable::standard();
        assert!(table.lookup(Method::Get, "/students").required_roles.is_empty());
        assert!(!table.lookup(Method::Post, "/students").required_roles.is_empty());
    }

    #[test]
    fn unknown_routes_fall_back_to_open() {
        let table = PolicyTable::standard();
        let policy = table.lookup(Method::Get, "/library/books");
        assert!(policy.required_roles.is_empty());
        assert!(!policy.onboarding_exempt);
    }
}
