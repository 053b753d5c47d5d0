//! Ownership policy: who may mutate a resource.

use thiserror::Error;

use crate::{
    auth::AuthUser,
    models::{CommentOwnership, User},
};

/// The acting user does not own the resource it tried to mutate.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("user {acting} may not modify a resource owned by user {owner}")]
pub struct PermissionDenied {
    pub acting: i64,
    pub owner: i64,
}

/// A resource that belongs to exactly one user.
pub trait ResourceOwner {
    fn owner_id(&self) -> i64;
}

impl ResourceOwner for CommentOwnership {
    fn owner_id(&self) -> i64 {
        self.user_id
    }
}

impl ResourceOwner for User {
    fn owner_id(&self) -> i64 {
        self.id
    }
}

/// A user record addressed only by its id, as in `/api/user/{id}`. A user owns
/// its own record, so the target id is the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserTarget(pub i64);

impl ResourceOwner for UserTarget {
    fn owner_id(&self) -> i64 {
        self.0
    }
}

/// authorize
///
/// Equality check between the authenticated identity and the resource's owner.
/// Must run after authentication and before any store mutation.
pub fn authorize<R: ResourceOwner + ?Sized>(
    acting: &AuthUser,
    resource: &R,
) -> Result<(), PermissionDenied> {
    let owner = resource.owner_id();
    if acting.id == owner {
        Ok(())
    } else {
        Err(PermissionDenied {
            acting: acting.id,
            owner,
        })
    }
}
