//! Role entity with identity semantics

use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::HasAbilities;
use crate::ability::{is_blank, AbilitySet};

static NEXT_ROLE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity handle of a stored role
///
/// Fresh ids are process-unique; deserialized roles keep the id they were
/// serialized with. Identity is only meaningful within a single role source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(u64);

impl RoleId {
    fn next() -> Self {
        RoleId(NEXT_ROLE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named grant bundle principals can hold
///
/// The name is normalized to lower-case at construction (deserialization
/// included) and immutable afterwards; a blank name counts as unset. Name
/// uniqueness is the store's concern. Abilities are mutable through the
/// usual set operations.
///
/// Equality compares identity, not structure: two handles are equal iff they
/// refer to the same stored role, clones included. Two roles constructed with
/// the same name are distinct entities.
///
/// # Examples
///
/// ```rust
/// use permits::{HasAbilities, Role};
///
/// let mut moderator = Role::new("Moderator");
/// moderator.add_abilities(["user.abilities.set"]);
///
/// assert_eq!(moderator.name(), Some("moderator"));
/// assert!(moderator.has_ability("user.abilities.set"));
/// assert_eq!(moderator.clone(), moderator);
/// assert_ne!(Role::new("moderator"), moderator);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Role {
    id: RoleId,
    name: Option<String>,
    abilities: AbilitySet,
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RoleFields {
            id: RoleId,
            name: Option<String>,
            #[serde(default)]
            abilities: AbilitySet,
        }

        let fields = RoleFields::deserialize(deserializer)?;
        Ok(Role {
            id: fields.id,
            name: fields
                .name
                .filter(|name| !is_blank(name))
                .map(|name| name.to_lowercase()),
            abilities: fields.abilities,
        })
    }
}

impl Role {
    /// Creates a role with a lower-cased name and no abilities
    ///
    /// A blank name (empty or whitespace-only) is treated as unset, exactly
    /// as for [`Role::unnamed`].
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: RoleId::next(),
            name: (!is_blank(&name)).then(|| name.to_lowercase()),
            abilities: AbilitySet::new(),
        }
    }

    /// Creates a role without a name
    ///
    /// Unnamed roles carry grants and identity like any other but cannot be
    /// registered in a name-keyed store.
    pub fn unnamed() -> Self {
        Self {
            id: RoleId::next(),
            name: None,
            abilities: AbilitySet::new(),
        }
    }

    /// Returns the identity handle
    pub fn id(&self) -> RoleId {
        self.id
    }

    /// Returns the normalized name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the abilities granted directly by this role
    pub fn abilities(&self) -> &AbilitySet {
        &self.abilities
    }

    /// Adds abilities, filtering blank tokens
    pub fn add_abilities<I, S>(&mut self, abilities: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.abilities.add(abilities);
    }

    /// Removes abilities; exact matches only
    pub fn remove_abilities<I, S>(&mut self, abilities: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.abilities.remove(abilities);
    }

    /// Replaces the whole ability set
    pub fn set_abilities<I, S>(&mut self, abilities: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.abilities.replace(abilities);
    }
}

impl PartialEq for Role {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Role {}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "role#{}", self.id),
        }
    }
}

impl HasAbilities for Role {
    fn effective_abilities(&self) -> Cow<'_, AbilitySet> {
        Cow::Borrowed(&self.abilities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_lower_cased() {
        let role = Role::new("Admin");
        assert_eq!(role.name(), Some("admin"));

        let role = Role::new("SUPER_USER");
        assert_eq!(role.name(), Some("super_user"));
    }

    #[test]
    fn test_blank_name_is_unset() {
        assert_eq!(Role::new("").name(), None);
        assert_eq!(Role::new("   ").name(), None);
        assert_eq!(Role::new("\t").name(), None);
    }

    #[test]
    fn test_identity_not_name_equality() {
        let a = Role::new("admin");
        let b = Role::new("admin");
        assert_ne!(a, b); // Same name, distinct entities
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_clone_tracks_same_entity() {
        let mut original = Role::new("editor");
        let snapshot = original.clone();

        original.add_abilities(["docs.edit"]);

        // Still the same stored role, even though the snapshot is stale
        assert_eq!(original, snapshot);
        assert!(original.has_ability("docs.edit"));
        assert!(!snapshot.has_ability("docs.edit"));
    }

    #[test]
    fn test_ability_mutation() {
        let mut role = Role::new("moderator");
        role.add_abilities(["user.list", "user.abilities.set", ""]);
        assert_eq!(role.abilities().len(), 2);

        role.remove_abilities(["user.list"]);
        assert!(!role.has_ability("user.list"));
        assert!(role.has_ability("user.abilities.set"));

        role.set_abilities(["roles"]);
        assert!(role.has_ability("roles.delete"));
        assert!(!role.has_ability("user.abilities.set"));
    }

    #[test]
    fn test_display() {
        let named = Role::new("Moderator");
        assert_eq!(named.to_string(), "moderator");

        let unnamed = Role::unnamed();
        assert_eq!(unnamed.to_string(), format!("role#{}", unnamed.id()));
    }

    #[test]
    fn test_serde_preserves_identity() {
        let mut role = Role::new("auditor");
        role.add_abilities(["audit.read"]);

        let json = serde_json::to_string(&role).unwrap();
        let back: Role = serde_json::from_str(&json).unwrap();

        assert_eq!(back, role);
        assert_eq!(back.name(), Some("auditor"));
        assert!(back.has_ability("audit.read.reports"));
    }

    #[test]
    fn test_deserialize_normalizes_name() {
        let role: Role =
            serde_json::from_str(r#"{"id": 900, "name": "Admin", "abilities": ["roles"]}"#)
                .unwrap();

        assert_eq!(role.name(), Some("admin"));
        assert!(role.has_ability("roles.delete"));
    }

    #[test]
    fn test_deserialize_blank_name_is_unset() {
        let role: Role = serde_json::from_str(r#"{"id": 901, "name": "  "}"#).unwrap();

        assert_eq!(role.name(), None);
        assert!(role.abilities().is_empty());
    }

    #[test]
    fn test_effective_set_is_own_set() {
        let mut role = Role::new("viewer");
        role.add_abilities(["docs.read"]);

        let effective = role.effective_abilities();
        assert!(matches!(effective, Cow::Borrowed(_)));
        assert!(effective.contains("docs.read.shared"));
    }
}
