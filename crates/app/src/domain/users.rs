//! Users

use crate::uuids::TypedUuid;

/// Cart owner. Users live in an external directory; only their identifier is stored.
#[derive(Debug)]
pub struct User;

/// User UUID
pub type UserUuid = TypedUuid<User>;
