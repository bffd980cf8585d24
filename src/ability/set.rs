//! Ability sets with hierarchical membership

use indexmap::IndexSet;
use serde::{Deserialize, Deserializer, Serialize};

use super::path;

/// The distinct ability paths granted directly to one entity
///
/// Membership is hierarchical: holding an ancestor path grants every path
/// beneath it. Holding `"roles"` satisfies `"roles"`, `"roles.delete"` and
/// `"roles.delete.bulk"`, but never the unrelated `"role"`. The reverse does
/// not hold: `"user.update.self"` does not satisfy `"user.update"`.
///
/// Normalization filters blank tokens (empty or whitespace-only) on every
/// mutation path; kept tokens are stored verbatim and matched
/// case-sensitively. Iteration order is insertion order; equality ignores
/// order.
///
/// # Examples
///
/// ```rust
/// use permits::AbilitySet;
///
/// let mut abilities = AbilitySet::new();
/// abilities.add(["user.list", "roles"]);
/// assert!(abilities.contains("roles.delete.bulk"));
/// assert!(!abilities.contains("user.update"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AbilitySet {
    abilities: IndexSet<String>,
}

// Deserialization funnels through `add` so the no-blank invariant holds for
// sets coming out of host storage too.
impl<'de> Deserialize<'de> for AbilitySet {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let abilities = Vec::<String>::deserialize(deserializer)?;
        Ok(abilities.into_iter().collect())
    }
}

impl AbilitySet {
    /// Creates an empty ability set
    pub fn new() -> Self {
        Self {
            abilities: IndexSet::new(),
        }
    }

    /// Adds abilities to the set, filtering blank tokens
    ///
    /// Adding an ability that is already present is a no-op.
    pub fn add<I, S>(&mut self, abilities: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for ability in abilities {
            let ability = ability.into();
            if path::is_blank(&ability) {
                continue;
            }
            self.abilities.insert(ability);
        }
    }

    /// Removes abilities from the set
    ///
    /// Removing an ability that is not present is a no-op. Removal is exact:
    /// removing `"user"` does not remove `"user.list"`.
    pub fn remove<I, S>(&mut self, abilities: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for ability in abilities {
            self.abilities.shift_remove(ability.as_ref());
        }
    }

    /// Replaces the whole set, with the same normalization as [`add`]
    ///
    /// [`add`]: AbilitySet::add
    pub fn replace<I, S>(&mut self, abilities: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.abilities.clear();
        self.add(abilities);
    }

    /// Checks hierarchical membership
    ///
    /// True iff the set contains the path itself or any of its ancestors
    /// verbatim.
    pub fn contains(&self, ability: &str) -> bool {
        path::ancestors(ability).any(|candidate| self.abilities.contains(candidate))
    }

    /// Checks exact membership, ignoring hierarchy
    pub fn contains_exact(&self, ability: &str) -> bool {
        self.abilities.contains(ability)
    }

    /// Unions another set into this one in place
    pub fn merge(&mut self, other: &AbilitySet) {
        for ability in &other.abilities {
            self.abilities.insert(ability.clone());
        }
    }

    /// Iterates the abilities in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.abilities.iter().map(String::as_str)
    }

    /// Returns the number of abilities in the set
    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    /// Checks if the set is empty
    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }

    /// Parses the newline-joined storage form
    ///
    /// A convenience for hosts that persist abilities as one flat text
    /// column. Blank lines are filtered here regardless of how the host
    /// joined them. Hosts are free to use any other delimiter and feed
    /// [`add`] directly; the engine only assumes `.` inside a path.
    ///
    /// [`add`]: AbilitySet::add
    pub fn from_lines(text: &str) -> Self {
        text.lines().collect()
    }

    /// Renders the newline-joined storage form
    pub fn to_lines(&self) -> String {
        self.abilities
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<S: Into<String>> FromIterator<S> for AbilitySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = AbilitySet::new();
        set.add(iter);
        set
    }
}

impl<S: Into<String>> Extend<S> for AbilitySet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.add(iter);
    }
}
