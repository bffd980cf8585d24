//! # Permits
//!
//! Role and ability based authorization engine with support for:
//! - Hierarchical dot-separated ability paths (an ancestor grants its subtree)
//! - Roles as named grant bundles with identity semantics
//! - Principals combining own abilities with held roles
//! - The `self` ownership special case for per-owner abilities
//! - A gate with injected principal and role sources
//! - Thread-safe in-memory role registry
//!
//! ## Example
//!
//! ```rust
//! use permits::{Gate, Principal, RoleRegistry};
//!
//! let registry = RoleRegistry::new();
//! let mut moderator = registry.create("moderator")?;
//! moderator.add_abilities(["user.abilities.set"]);
//! registry.insert(moderator.clone())?;
//!
//! let mut user = Principal::from(moderator);
//! user.add_abilities(["user.list", "roles", "user.update.self"]);
//!
//! let gate = Gate::builder()
//!     .principal_provider(move || Some(user.clone()))
//!     .role_lookup(registry.clone())
//!     .build();
//!
//! gate.require_ability("roles.delete", None)?;
//! gate.require_ability("user.update.7", Some(7))?;
//! gate.require_role("moderator")?;
//!
//! assert!(gate.require_ability("user.update", None).unwrap_err().is_forbidden());
//! # Ok::<(), permits::PermitError>(())
//! ```

pub mod ability;
pub mod entity;
pub mod error;
pub mod gate;
pub mod registry;

pub use ability::AbilitySet;
pub use entity::{HasAbilities, Principal, Role, RoleId};
pub use error::{Denial, PermitError, Result};
pub use gate::{Gate, GateBuilder, RoleLookup};
pub use registry::RoleRegistry;
