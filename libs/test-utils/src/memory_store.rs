use std::sync::{
    Mutex, MutexGuard,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use chrono::Utc;
use user_dao::AccountStore;
use user_errors::ApiUserError;
use user_models::{ApiUser, NewUser, User};

#[derive(Debug, Default)]
struct State {
    users: Vec<User>,
    api_users: Vec<ApiUser>,
}

/// In-memory [`AccountStore`] for handler tests.
///
/// `create_api_user` stages both rows and only publishes them once both
/// succeeded, matching the all-or-nothing behaviour of the Postgres DAO.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    state: Mutex<State>,
    fail_api_user_insert: AtomicBool,
}

impl MemoryAccountStore {
    pub fn new() -> Self { Self::default() }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Seeds a regular account and returns it
    pub fn add_user(&self, username: &str, email: &str) -> User {
        let mut state = self.state();
        let user = User {
            id: state.users.len() as i64 + 1,
            username: username.to_string(),
            email: email.to_string(),
            password: String::new(),
            date_joined: Utc::now(),
        };
        state.users.push(user.clone());
        user
    }

    /// Seeds an account that was itself created through the provisioner
    pub fn add_api_user(
        &self, username: &str, email: &str, created_by: &User,
    ) -> User {
        let user = self.add_user(username, email);
        let mut state = self.state();
        let api_user = ApiUser {
            id: state.api_users.len() as i64 + 1,
            user_id: user.id,
            created_by_id: created_by.id,
            created_at: Utc::now(),
        };
        state.api_users.push(api_user);
        user
    }

    /// Makes the next API user link insert fail
    pub fn fail_next_api_user_insert(&self) {
        self.fail_api_user_insert.store(true, Ordering::SeqCst);
    }

    pub fn user_count(&self) -> usize { self.state().users.len() }

    pub fn api_user_count(&self) -> usize { self.state().api_users.len() }

    pub fn users(&self) -> Vec<User> { self.state().users.clone() }

    pub fn api_users(&self) -> Vec<ApiUser> { self.state().api_users.clone() }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn username_exists(
        &self, username: &str,
    ) -> Result<bool, ApiUserError> {
        Ok(self.state().users.iter().any(|u| u.username == username))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, ApiUserError> {
        Ok(self.state().users.iter().any(|u| u.email == email))
    }

    async fn api_usernames(&self) -> Result<Vec<String>, ApiUserError> {
        let state = self.state();
        Ok(state
            .api_users
            .iter()
            .filter_map(|api_user| {
                state.users.iter().find(|u| u.id == api_user.user_id)
            })
            .map(|u| u.username.clone())
            .collect())
    }

    async fn find_by_username(
        &self, username: &str,
    ) -> Result<Option<User>, ApiUserError> {
        Ok(self
            .state()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_api_user(
        &self, new_user: NewUser, creator: &User,
    ) -> Result<(User, ApiUser), ApiUserError> {
        let mut state = self.state();

        if state.users.iter().any(|u| u.username == new_user.username) {
            return Err(ApiUserError::DuplicateUsername {
                username: new_user.username,
            });
        }
        if state.users.iter().any(|u| u.email == new_user.email) {
            return Err(ApiUserError::DuplicateEmail {
                email: new_user.email,
            });
        }

        let now = Utc::now();
        let user = User {
            id: state.users.len() as i64 + 1,
            username: new_user.username,
            email: new_user.email,
            password: new_user.password_hash,
            date_joined: now,
        };

        if self.fail_api_user_insert.swap(false, Ordering::SeqCst) {
            return Err(ApiUserError::InternalError(
                "api user insert failed".to_string(),
            ));
        }
        if !state.users.iter().any(|u| u.id == creator.id) {
            return Err(ApiUserError::InternalError(format!(
                "creator {} does not exist",
                creator.id
            )));
        }

        let api_user = ApiUser {
            id: state.api_users.len() as i64 + 1,
            user_id: user.id,
            created_by_id: creator.id,
            created_at: now,
        };

        state.users.push(user.clone());
        state.api_users.push(api_user.clone());

        Ok((user, api_user))
    }
}
