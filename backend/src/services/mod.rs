//! Business logic services
//!
//! Services hold the surface logic behind the HTTP routes. They read and
//! write the domain store through [`AppState`] and never hold the store
//! lock across an AI call.

pub mod admin;
pub mod member;
pub mod session;

pub use admin::AdminService;
pub use member::MemberService;
pub use session::SessionService;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::store::DomainStore;
use fitpulse_shared::{Role, User};

/// Look up a member account by id; admins do not count
pub(crate) fn find_member<'a>(store: &'a DomainStore, id: &str) -> ApiResult<&'a User> {
    store
        .user(id)
        .filter(|u| u.role == Role::Member)
        .ok_or_else(|| ApiError::NotFound(format!("Member {} not found", id)))
}

/// Apply `f` to a copy of the member and write the copy back.
///
/// Nothing is written when `f` fails.
pub(crate) async fn modify_member<T, F>(state: &AppState, id: &str, f: F) -> ApiResult<(User, T)>
where
    F: FnOnce(&mut User) -> ApiResult<T>,
{
    let mut store = state.store().write().await;
    let mut member = find_member(&store, id)?.clone();
    let output = f(&mut member)?;
    store.update_member(member.clone());
    Ok((member, output))
}

/// Clone the member out of the store and release the lock
pub(crate) async fn member_snapshot(state: &AppState, id: &str) -> ApiResult<User> {
    let store = state.store().read().await;
    find_member(&store, id).cloned()
}
