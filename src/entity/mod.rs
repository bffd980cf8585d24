//! Role and principal entities.
//!
//! Entities are plain values: cloning shares nothing, serde support makes
//! them storable, and all ability grants flow through [`AbilitySet`].
//! The [`HasAbilities`] trait is the single seam the gate decides through.

mod principal;
mod role;

pub use principal::Principal;
pub use role::{Role, RoleId};

use std::borrow::Cow;

use crate::ability::AbilitySet;

/// Anything that carries an effective ability set
///
/// Implemented by [`Role`] (its own set, borrowed) and [`Principal`] (its own
/// set unioned with every held role's set, built per call). Both checks and
/// derived views go through this trait, so guards accept either entity.
pub trait HasAbilities {
    /// The effective ability set
    ///
    /// Recomputed on demand; implementations must not cache it across
    /// mutations.
    fn effective_abilities(&self) -> Cow<'_, AbilitySet>;

    /// Hierarchical membership over the effective set
    fn has_ability(&self, ability: &str) -> bool {
        self.effective_abilities().contains(ability)
    }
}

#[cfg(test)]
mod entity_tests {
    use super::*;

    #[test]
    fn test_trait_objects_dispatch() {
        let mut role = Role::new("auditor");
        role.add_abilities(["audit"]);

        let principal = Principal::from(role.clone());

        let entities: Vec<&dyn HasAbilities> = vec![&role, &principal];
        for entity in entities {
            assert!(entity.has_ability("audit.read"));
            assert!(!entity.has_ability("user"));
        }
    }

    #[test]
    fn test_effective_set_view_matches_membership() {
        let mut role = Role::new("editor");
        role.add_abilities(["docs.edit"]);

        let mut principal = Principal::from(role);
        principal.add_abilities(["docs.read"]);

        let effective = principal.effective_abilities();
        assert!(effective.contains_exact("docs.edit"));
        assert!(effective.contains_exact("docs.read"));
        assert_eq!(effective.len(), 2);
    }
}
