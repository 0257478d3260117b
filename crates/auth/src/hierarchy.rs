//! Ranked role hierarchy.
//!
//! The rank table is the single source of truth for "is role X at least as
//! privileged as role Y". It is an immutable value object built once at
//! process start and injected wherever privilege checks happen, so tests can
//! swap it without touching global state.

use std::collections::BTreeMap;

use crate::Role;

/// Immutable role → rank mapping.
///
/// An operation declares a *set* of acceptable roles; the caller passes if
/// its rank is at least the rank of any member of that set (a disjunctive
/// minimum-rank check, not a conjunction).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleHierarchy {
    ranks: BTreeMap<Role, u16>,
}

impl RoleHierarchy {
    /// Build a hierarchy from explicit `(role, rank)` pairs.
    pub fn new(ranks: impl IntoIterator<Item = (Role, u16)>) -> Self {
        Self {
            ranks: ranks.into_iter().collect(),
        }
    }

    /// The deploy-time rank assignment.
    pub fn standard() -> Self {
        Self::new([
            (Role::SuperAdmin, 100),
            (Role::UniversityAdmin, 80),
            (Role::DepartmentHead, 60),
            (Role::Faculty, 40),
            (Role::Staff, 30),
            (Role::Student, 10),
        ])
    }

    /// Rank of a role. A role absent from the table ranks 0, i.e. lowest
    /// privilege, rather than failing (deliberate fail-low default).
    pub fn rank(&self, role: Role) -> u16 {
        self.ranks.get(&role).copied().unwrap_or(0)
    }

    /// Disjunctive minimum-rank check.
    ///
    /// An empty requirement means the operation is open to any authenticated
    /// principal; whether a principal exists at all is the resolver's concern.
    ///
    /// - No IO
    /// - No panics
    /// - No business logic (pure policy check)
    pub fn permits(&self, caller: Role, required: &[Role]) -> bool {
        if required.is_empty() {
            return true;
        }

        let caller_rank = self.rank(caller);
        required.iter().any(|r| caller_rank >= self.rank(*r))
    }
}

impl Default for RoleHierarchy {
    fn default() -> Self {
        Self::standard()
    }
}
