//! In-memory role registry
//!
//! The registry is the reference role store: a thread-safe name-to-role map
//! with find-or-create semantics. Hosts with a real store can implement
//! [`RoleLookup`](crate::RoleLookup) directly and skip it.

use std::sync::Arc;

use dashmap::DashMap;

use crate::ability::is_blank;
use crate::entity::Role;
use crate::error::{PermitError, Result};
use crate::gate::RoleLookup;

/// Thread-safe role store keyed by lower-cased name
///
/// Reads hand out clones; mutation is re-insertion of a changed clone.
/// Clones of the registry share storage, so one handle can feed a gate while
/// another serves administration. Consistency is per call: sequences of
/// calls that must be atomic are the caller's to serialize.
///
/// # Examples
///
/// ```rust
/// use permits::RoleRegistry;
///
/// let registry = RoleRegistry::new();
/// let mut moderator = registry.create("Moderator").unwrap();
///
/// moderator.add_abilities(["user.abilities.set"]);
/// registry.insert(moderator).unwrap();
///
/// let stored = registry.find("MODERATOR").unwrap();
/// assert_eq!(stored.name(), Some("moderator"));
/// assert!(stored.abilities().contains_exact("user.abilities.set"));
/// ```
#[derive(Debug, Clone)]
pub struct RoleRegistry {
    /// Thread-safe storage for stored roles
    roles: Arc<DashMap<String, Role>>,
}

impl RoleRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self {
            roles: Arc::new(DashMap::new()),
        }
    }

    /// Finds or creates a role by name
    ///
    /// When the (lower-cased) name is already registered the existing role is
    /// returned, identity intact; otherwise a fresh role is stored and
    /// returned. Names are unique per registry by construction.
    ///
    /// # Errors
    ///
    /// [`PermitError::UnnamedRole`] when the name is blank; a blank name is
    /// an unset name and cannot key an entry.
    pub fn create(&self, name: &str) -> Result<Role> {
        if is_blank(name) {
            return Err(PermitError::UnnamedRole);
        }

        let key = name.to_lowercase();
        let entry = self.roles.entry(key).or_insert_with(|| {
            tracing::debug!("creating role '{}'", name.to_lowercase());
            Role::new(name)
        });
        Ok(entry.value().clone())
    }

    /// Inserts a role, replacing any role stored under the same name
    ///
    /// This is the write half of the mutation flow: `find`, change the clone,
    /// `insert` it back.
    ///
    /// # Errors
    ///
    /// [`PermitError::UnnamedRole`] when the role has no name to key by.
    pub fn insert(&self, role: Role) -> Result<()> {
        let Some(name) = role.name() else {
            return Err(PermitError::UnnamedRole);
        };

        let key = name.to_string();
        self.roles.insert(key, role);
        Ok(())
    }

    /// Finds a role by name, case-insensitively
    pub fn find(&self, name: &str) -> Option<Role> {
        self.roles
            .get(name.to_lowercase().as_str())
            .map(|entry| entry.value().clone())
    }

    /// Removes a role by name, returning it when it was present
    pub fn remove(&self, name: &str) -> Option<Role> {
        let removed = self.roles.remove(name.to_lowercase().as_str());
        if let Some((key, _)) = &removed {
            tracing::debug!("removed role '{}'", key);
        }
        removed.map(|(_, role)| role)
    }

    /// Returns the registered names, in no particular order
    pub fn names(&self) -> Vec<String> {
        self.roles.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Returns the number of registered roles
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Checks if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleLookup for RoleRegistry {
    fn find_role(&self, name: &str) -> Option<Role> {
        self.find(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_create_is_find_or_create() {
        let registry = RoleRegistry::new();

        let first = registry.create("Admin").unwrap();
        let second = registry.create("ADMIN").unwrap();

        assert_eq!(first, second); // Same stored entity
        assert_eq!(registry.len(), 1);
        assert_eq!(first.name(), Some("admin"));
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let registry = RoleRegistry::new();
        let created = registry.create("Moderator").unwrap();

        assert_eq!(registry.find("moderator"), Some(created.clone()));
        assert_eq!(registry.find("MODERATOR"), Some(created));
        assert_eq!(registry.find("missing"), None);
    }

    #[test]
    fn test_mutation_flow_round_trips() {
        let registry = RoleRegistry::new();
        let mut role = registry.create("moderator").unwrap();

        role.add_abilities(["user.abilities.set"]);
        registry.insert(role.clone()).unwrap();

        let stored = registry.find("moderator").unwrap();
        assert_eq!(stored, role);
        assert!(stored.abilities().contains_exact("user.abilities.set"));
    }

    #[test]
    fn test_insert_unnamed_is_an_error() {
        let registry = RoleRegistry::new();
        let result = registry.insert(Role::unnamed());
        assert_eq!(result, Err(PermitError::UnnamedRole));

        // A blank name is an unset name
        let result = registry.insert(Role::new("  "));
        assert_eq!(result, Err(PermitError::UnnamedRole));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_create_rejects_blank_names() {
        let registry = RoleRegistry::new();

        assert_eq!(registry.create(""), Err(PermitError::UnnamedRole));
        assert_eq!(registry.create("   "), Err(PermitError::UnnamedRole));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove() {
        let registry = RoleRegistry::new();
        let role = registry.create("temp").unwrap();

        assert_eq!(registry.remove("TEMP"), Some(role));
        assert_eq!(registry.remove("temp"), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_names_and_len() {
        let registry = RoleRegistry::new();
        registry.create("admin").unwrap();
        registry.create("moderator").unwrap();

        let mut names = registry.names();
        names.sort();
        assert_eq!(names, vec!["admin", "moderator"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_clones_share_storage() {
        let registry = RoleRegistry::new();
        let handle = registry.clone();

        registry.create("admin").unwrap();
        assert!(handle.find("admin").is_some());
    }

    #[test]
    fn test_lookup_returns_clone_not_view() {
        let registry = RoleRegistry::new();
        let mut role = registry.create("editor").unwrap();

        role.add_abilities(["docs.edit"]);
        // Not inserted back yet: the store still has the old clone
        let stored = registry.find("editor").unwrap();
        assert!(!stored.abilities().contains_exact("docs.edit"));
        assert_eq!(stored, role);
    }

    #[test]
    fn test_concurrent_access() {
        let registry = RoleRegistry::new();
        let names = ["admin", "moderator", "auditor", "viewer"];

        let mut handles = vec![];
        for i in 0..8 {
            let registry = registry.clone();
            let name = names[i % names.len()];

            handles.push(thread::spawn(move || {
                let role = registry.create(name).unwrap();
                assert_eq!(role.name(), Some(name));
                assert!(registry.find(name).is_some());
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        // Find-or-create never duplicated a name
        assert_eq!(registry.len(), names.len());
    }
}
