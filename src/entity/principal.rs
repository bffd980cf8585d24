//! Principal entity: the authenticated subject checks run against

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{HasAbilities, Role};
use crate::ability::AbilitySet;
use crate::error::{PermitError, Result};

/// An authenticated subject holding its own abilities plus role handles
///
/// Held roles are clones of stored roles, referenced by identity; each role
/// appears at most once. The effective ability set is the union of the own
/// set and every held role's set, rebuilt on every check so ability and role
/// mutations take effect immediately.
///
/// A role deleted from its store lives on in any principal still holding a
/// clone; those grants keep counting until the host refreshes the principal.
///
/// # Examples
///
/// ```rust
/// use permits::{HasAbilities, Principal, Role};
///
/// let mut moderator = Role::new("moderator");
/// moderator.add_abilities(["user.abilities.set"]);
///
/// let mut principal = Principal::from(moderator);
/// principal.add_abilities(["user.list", "roles"]);
///
/// assert!(principal.has_ability("roles.delete.bulk"));
/// assert!(principal.has_ability("user.abilities.set"));
/// assert!(!principal.has_ability("user.update"));
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct Principal {
    abilities: AbilitySet,
    roles: Vec<Role>,
}

// Deserialization funnels roles through `with_roles` so held roles stay
// deduplicated by identity on the serde path too.
impl<'de> Deserialize<'de> for Principal {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct PrincipalFields {
            #[serde(default)]
            abilities: AbilitySet,
            #[serde(default)]
            roles: Vec<Role>,
        }

        let fields = PrincipalFields::deserialize(deserializer)?;
        let mut principal = Principal::with_roles(fields.roles);
        principal.abilities = fields.abilities;
        Ok(principal)
    }
}

impl Principal {
    /// Creates a principal with no abilities and no roles
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a principal holding the given roles, deduplicated by identity
    pub fn with_roles<I>(roles: I) -> Self
    where
        I: IntoIterator<Item = Role>,
    {
        let mut principal = Principal::new();
        for role in roles {
            if !principal.has_role(&role) {
                principal.roles.push(role);
            }
        }
        principal
    }

    /// Builds a principal from a dynamic roles value
    ///
    /// This is the boundary for hosts handing roles through untyped data:
    /// `null` means no roles, a single role object means one, an array of
    /// role objects means many. Any other shape (a bare role name string, a
    /// number, an array with non-role members) is an
    /// [`InvalidRoles`](PermitError::InvalidRoles) error, not a lookup.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permits::Principal;
    /// use serde_json::json;
    ///
    /// let principal = Principal::from_roles_value(&json!(null)).unwrap();
    /// assert!(principal.roles().is_empty());
    ///
    /// let err = Principal::from_roles_value(&json!("admin")).unwrap_err();
    /// assert!(!err.is_forbidden());
    /// ```
    pub fn from_roles_value(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Principal::new()),
            Value::Object(_) => {
                let role = parse_role(value)?;
                Ok(Principal::with_roles([role]))
            }
            Value::Array(items) => {
                let mut roles = Vec::with_capacity(items.len());
                for item in items {
                    roles.push(parse_role(item)?);
                }
                Ok(Principal::with_roles(roles))
            }
            other => Err(PermitError::InvalidRoles {
                reason: format!(
                    "expected a role object, an array of roles, or null, got {}",
                    json_type(other)
                ),
            }),
        }
    }

    /// Adds roles the principal does not already hold
    ///
    /// Duplicates (by identity) are skipped, so re-adding is a no-op.
    pub fn add_roles(&mut self, roles: &[Role]) {
        for role in roles {
            if !self.has_role(role) {
                self.roles.push(role.clone());
            }
        }
    }

    /// Removes the given roles, matching by identity
    ///
    /// Roles the principal does not hold are ignored.
    pub fn remove_roles(&mut self, roles: &[Role]) {
        self.roles.retain(|held| !roles.contains(held));
    }

    /// Checks whether the principal holds a role, by identity
    ///
    /// A distinct role with the same name does not count.
    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    /// Returns the held roles in insertion order
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Returns the abilities granted directly, excluding role grants
    pub fn abilities(&self) -> &AbilitySet {
        &self.abilities
    }

    /// Adds own abilities, filtering blank tokens
    pub fn add_abilities<I, S>(&mut self, abilities: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.abilities.add(abilities);
    }

    /// Removes own abilities; exact matches only
    pub fn remove_abilities<I, S>(&mut self, abilities: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.abilities.remove(abilities);
    }

    /// Replaces the own ability set
    pub fn set_abilities<I, S>(&mut self, abilities: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.abilities.replace(abilities);
    }
}

impl From<Role> for Principal {
    fn from(role: Role) -> Self {
        Principal::with_roles([role])
    }
}

impl FromIterator<Role> for Principal {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        Principal::with_roles(iter)
    }
}

impl HasAbilities for Principal {
    fn effective_abilities(&self) -> Cow<'_, AbilitySet> {
        if self.roles.is_empty() {
            return Cow::Borrowed(&self.abilities);
        }

        let mut effective = self.abilities.clone();
        for role in &self.roles {
            effective.merge(role.abilities());
        }
        Cow::Owned(effective)
    }

    // Checks own and role sets in turn instead of materializing the union;
    // equivalent because hierarchical membership distributes over union.
    fn has_ability(&self, ability: &str) -> bool {
        self.abilities.contains(ability)
            || self.roles.iter().any(|role| role.abilities().contains(ability))
    }
}

fn parse_role(value: &Value) -> Result<Role> {
    serde_json::from_value(value.clone()).map_err(|err| PermitError::InvalidRoles {
        reason: err.to_string(),
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
