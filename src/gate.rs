//! The authorization gate: decisions over principals, abilities, and roles

use std::fmt;
use std::sync::Arc;

use crate::ability::owner_suffix;
use crate::entity::{HasAbilities, Principal, Role};
use crate::error::{Denial, PermitError, Result};

/// Resolves the current principal, typically from ambient request state
///
/// Returning `None` means nobody is authenticated; every check then denies
/// with [`Denial::NoPrincipal`]. Providers are called once per check and
/// usually hand out a fresh snapshot each time.
pub type PrincipalProvider = dyn Fn() -> Option<Principal> + Send + Sync;

/// Resolves role names to stored roles
///
/// Names are handed in lower-cased. Implemented by
/// [`RoleRegistry`](crate::RoleRegistry) and by any matching closure.
pub trait RoleLookup: Send + Sync {
    /// Finds a role by name, `None` when no such role exists
    fn find_role(&self, name: &str) -> Option<Role>;
}

impl<F> RoleLookup for F
where
    F: Fn(&str) -> Option<Role> + Send + Sync,
{
    fn find_role(&self, name: &str) -> Option<Role> {
        self(name)
    }
}

/// The decision engine
///
/// A gate owns no entities; it is wired with a principal provider and a role
/// lookup and derives every decision from what they return at check time.
/// Clones share the wiring, so one gate can serve many threads.
///
/// `require_*` return `Ok(())` or a [`Forbidden`](PermitError::Forbidden)
/// error; `check_*` fold denials into `Ok(false)` while configuration faults
/// still propagate. The `guard*` combinators run a closure only when the
/// check allows.
///
/// # Examples
///
/// ```rust
/// use permits::{Gate, Principal, RoleRegistry};
///
/// let registry = RoleRegistry::new();
/// let moderator = registry.create("moderator").unwrap();
///
/// let user = Principal::from(moderator);
/// let gate = Gate::builder()
///     .principal_provider(move || Some(user.clone()))
///     .role_lookup(registry.clone())
///     .build();
///
/// assert!(gate.require_role("Moderator").is_ok());
/// assert!(gate.require_role("admin").unwrap_err().is_forbidden());
/// ```
#[derive(Clone)]
pub struct Gate {
    provider: Option<Arc<PrincipalProvider>>,
    roles: Option<Arc<dyn RoleLookup>>,
}

impl Gate {
    /// Creates a fully wired gate
    pub fn new<P, L>(provider: P, roles: L) -> Self
    where
        P: Fn() -> Option<Principal> + Send + Sync + 'static,
        L: RoleLookup + 'static,
    {
        Self {
            provider: Some(Arc::new(provider)),
            roles: Some(Arc::new(roles)),
        }
    }

    /// Starts building a gate with optional wiring
    pub fn builder() -> GateBuilder {
        GateBuilder::default()
    }

    /// Requires the principal to hold an ability, hierarchically
    ///
    /// The check allows when the principal's effective abilities contain
    /// `desired` or any of its ancestors. When `desired` ends in a decimal
    /// segment (`"user.update.7"`) and `owner` carries that same number, the
    /// ownership form `"user.update.self"` also allows.
    ///
    /// # Errors
    ///
    /// [`PermitError::MissingProvider`] when no provider is wired;
    /// [`PermitError::Forbidden`] when nobody is authenticated or the
    /// ability is not held.
    pub fn require_ability(&self, desired: &str, owner: Option<u64>) -> Result<()> {
        let Some(principal) = self.current_principal()? else {
            tracing::debug!("denied '{}': no authenticated principal", desired);
            return Err(PermitError::Forbidden(Denial::NoPrincipal));
        };

        if principal.has_ability(desired) {
            tracing::trace!("allowed '{}'", desired);
            return Ok(());
        }

        if let (Some(owner), Some((prefix, target))) = (owner, owner_suffix(desired)) {
            if owner == target && principal.has_ability(&format!("{}.self", prefix)) {
                tracing::trace!("allowed '{}' for owner {}", desired, owner);
                return Ok(());
            }
        }

        tracing::debug!("denied '{}': missing ability", desired);
        Err(PermitError::Forbidden(Denial::MissingAbility {
            ability: desired.to_string(),
        }))
    }

    /// Requires the principal to hold the named role
    ///
    /// The name is matched case-insensitively against stored (lower-cased)
    /// names. A name the lookup cannot resolve denies exactly like a role
    /// the principal does not hold.
    ///
    /// # Errors
    ///
    /// Same shape as [`require_ability`](Gate::require_ability).
    pub fn require_role(&self, name: &str) -> Result<()> {
        let Some(principal) = self.current_principal()? else {
            tracing::debug!("denied role '{}': no authenticated principal", name);
            return Err(PermitError::Forbidden(Denial::NoPrincipal));
        };

        let desired = name.to_lowercase();
        let held = self
            .roles
            .as_ref()
            .and_then(|lookup| lookup.find_role(&desired))
            .is_some_and(|role| principal.has_role(&role));

        if held {
            tracing::trace!("allowed role '{}'", desired);
            Ok(())
        } else {
            tracing::debug!("denied role '{}': not held", desired);
            Err(PermitError::Forbidden(Denial::MissingRole { role: desired }))
        }
    }

    /// Like [`require_ability`](Gate::require_ability), folding denials into
    /// `Ok(false)`
    ///
    /// Configuration faults still propagate; a missing provider is never a
    /// decision.
    pub fn check_ability(&self, desired: &str, owner: Option<u64>) -> Result<bool> {
        match self.require_ability(desired, owner) {
            Ok(()) => Ok(true),
            Err(err) if err.is_forbidden() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Like [`require_role`](Gate::require_role), folding denials into
    /// `Ok(false)`
    pub fn check_role(&self, name: &str) -> Result<bool> {
        match self.require_role(name) {
            Ok(()) => Ok(true),
            Err(err) if err.is_forbidden() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Runs `op` only when [`require_ability`](Gate::require_ability) allows
    ///
    /// On allow the closure's value passes through unchanged; on deny the
    /// closure never runs and the denial propagates.
    pub fn guard<T, F>(&self, desired: &str, owner: Option<u64>, op: F) -> Result<T>
    where
        F: FnOnce() -> T,
    {
        self.require_ability(desired, owner)?;
        Ok(op())
    }

    /// Runs `op` only when [`require_role`](Gate::require_role) allows
    pub fn guard_role<T, F>(&self, name: &str, op: F) -> Result<T>
    where
        F: FnOnce() -> T,
    {
        self.require_role(name)?;
        Ok(op())
    }

    fn current_principal(&self) -> Result<Option<Principal>> {
        let provider = self.provider.as_ref().ok_or(PermitError::MissingProvider)?;
        Ok(provider())
    }
}

impl fmt::Debug for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gate")
            .field("provider", &self.provider.is_some())
            .field("roles", &self.roles.is_some())
            .finish()
    }
}

/// Builder for wiring a [`Gate`]
///
/// Both collaborators are optional: an unwired provider makes every check a
/// [`MissingProvider`](PermitError::MissingProvider) fault, an unwired role
/// lookup makes every role name unknown (deny).
#[derive(Default)]
pub struct GateBuilder {
    provider: Option<Arc<PrincipalProvider>>,
    roles: Option<Arc<dyn RoleLookup>>,
}

impl GateBuilder {
    /// Wires the principal provider
    pub fn principal_provider<P>(mut self, provider: P) -> Self
    where
        P: Fn() -> Option<Principal> + Send + Sync + 'static,
    {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Wires the role lookup
    pub fn role_lookup<L>(mut self, lookup: L) -> Self
    where
        L: RoleLookup + 'static,
    {
        self.roles = Some(Arc::new(lookup));
        self
    }

    /// Builds the gate
    pub fn build(self) -> Gate {
        Gate {
            provider: self.provider,
            roles: self.roles,
        }
    }
}
