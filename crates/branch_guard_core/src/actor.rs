//! Resolution of allowance actors to node ids.
//!
//! GitHub answers allowance actors as a `Team | User | App` union. The wire
//! type keeps one slot per member; this module turns it into a tagged
//! [`Actor`] and then into the id the mutations expect.

use github_client::{Allowance, AllowanceActor};
use tracing::warn;

use crate::errors::{ProtectionError, ProtectionResult};

#[cfg(test)]
#[path = "actor_tests.rs"]
mod tests;

/// An allowance actor after decoding the union.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Actor {
    Team { id: String },
    User { id: String },
    /// A union member that cannot be managed, e.g. `App`
    Unsupported { typename: String },
}

impl Actor {
    /// The node id, if the actor kind carries one.
    pub fn id(&self) -> Option<&str> {
        match self {
            Actor::Team { id } | Actor::User { id } => Some(id),
            Actor::Unsupported { .. } => None,
        }
    }
}

impl TryFrom<&AllowanceActor> for Actor {
    type Error = ProtectionError;

    fn try_from(actor: &AllowanceActor) -> Result<Self, Self::Error> {
        let team_id = populated(&actor.team_id);
        let user_id = populated(&actor.user_id);

        match (team_id, user_id) {
            (Some(team_id), Some(user_id)) => Err(ProtectionError::ActorConflict {
                team_id: team_id.to_string(),
                user_id: user_id.to_string(),
            }),
            (Some(id), None) => Ok(Actor::Team { id: id.to_string() }),
            (None, Some(id)) => Ok(Actor::User { id: id.to_string() }),
            (None, None) => Ok(Actor::Unsupported {
                typename: actor.typename.clone(),
            }),
        }
    }
}

fn populated(slot: &Option<String>) -> Option<&str> {
    slot.as_deref().filter(|id| !id.is_empty())
}

/// Resolves one actor to its id.
///
/// Returns `Ok(None)` for actors that carry no id. Those are logged at `warn`
/// since they will disappear from the configuration on the next write.
///
/// # Errors
///
/// `ProtectionError::ActorConflict` if both the team and the user slot are set.
pub fn resolve_actor(actor: &AllowanceActor) -> ProtectionResult<Option<String>> {
    match Actor::try_from(actor)? {
        Actor::Unsupported { typename } => {
            warn!(
                actor_type = typename.as_str(),
                "Skipping allowance actor without a team or user id"
            );
            Ok(None)
        }
        resolved => Ok(resolved.id().map(str::to_string)),
    }
}

/// Resolves a list of allowances to actor ids, keeping the list order.
///
/// Allowances whose actor is hidden (`null`) or unsupported are skipped.
///
/// # Errors
///
/// Fails on the first actor with conflicting slots.
pub fn resolve_actor_ids(allowances: &[Allowance]) -> ProtectionResult<Vec<String>> {
    let mut ids = Vec::with_capacity(allowances.len());
    for allowance in allowances {
        let Some(actor) = &allowance.actor else {
            continue;
        };
        if let Some(id) = resolve_actor(actor)? {
            ids.push(id);
        }
    }
    Ok(ids)
}
