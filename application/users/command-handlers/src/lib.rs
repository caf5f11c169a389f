use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use sql_connection::SqlConnect;
use tracing::{info, instrument};
use user_commands::ProvisionApiUserCommand;
use user_dao::{AccountStore, UserDao};
use user_errors::ApiUserError;
use user_models::{ApiUser, NewUser, User};

/// Credential every provisioned API account starts with
pub const API_USER_PASSWORD: &str = "password123";

#[derive(Debug, Clone)]
pub struct ProvisionedApiUser {
    pub user: User,
    pub api_user: ApiUser,
    pub creator: User,
}

impl ProvisionedApiUser {
    pub fn success_message(&self) -> String {
        format!(
            "API user {} created successfully!",
            self.user.username.to_uppercase()
        )
    }
}

fn hash_password(password: &str) -> Result<String, ApiUserError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiUserError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

#[derive(Clone)]
pub struct ProvisionApiUserHandler<S = UserDao> {
    store: S,
}

impl ProvisionApiUserHandler<UserDao> {
    pub fn new(db: SqlConnect) -> Self {
        Self {
            store: UserDao::new(db),
        }
    }
}

impl<S> ProvisionApiUserHandler<S>
where
    S: AccountStore,
{
    pub fn with_store(store: S) -> Self { Self { store } }

    /// Validates the request and creates the account plus its API user
    /// link.
    ///
    /// Checks run in a fixed order and the first failing one wins: the
    /// username and the email must be unused, the creator must not itself
    /// be an API user, and the creator must exist. Nothing is written unless
    /// every check passes.
    #[instrument(skip(self))]
    pub async fn execute(
        &self, command: ProvisionApiUserCommand,
    ) -> Result<ProvisionedApiUser, ApiUserError> {
        if self.store.username_exists(&command.username).await? {
            return Err(ApiUserError::DuplicateUsername {
                username: command.username,
            });
        }

        if self.store.email_exists(&command.email).await? {
            return Err(ApiUserError::DuplicateEmail {
                email: command.email,
            });
        }

        let api_usernames = self.store.api_usernames().await?;
        if api_usernames.contains(&command.creator_username) {
            return Err(ApiUserError::CreatorNotPermitted {
                creator: command.creator_username,
            });
        }

        let creator = self
            .store
            .find_by_username(&command.creator_username)
            .await?
            .ok_or_else(|| {
                ApiUserError::UnknownCreator {
                    creator: command.creator_username.clone(),
                }
            })?;

        let new_user = NewUser {
            username: command.username,
            email: command.email,
            password_hash: hash_password(API_USER_PASSWORD)?,
        };

        let (user, api_user) =
            self.store.create_api_user(new_user, &creator).await?;

        info!(
            user.id = user.id,
            user.username = %user.username,
            creator.id = creator.id,
            "API user provisioned"
        );

        Ok(ProvisionedApiUser {
            user,
            api_user,
            creator,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use argon2::{PasswordHash, PasswordVerifier};
    use test_utils::MemoryAccountStore;

    use super::*;

    fn setup() -> (Arc<MemoryAccountStore>, ProvisionApiUserHandler<Arc<MemoryAccountStore>>) {
        let store = Arc::new(MemoryAccountStore::new());
        store.add_user("admin", "admin@example.com");
        let handler = ProvisionApiUserHandler::with_store(store.clone());
        (store, handler)
    }

    #[tokio::test]
    async fn test_provision_creates_user_and_link() {
        let (store, handler) = setup();

        let result = handler
            .execute(ProvisionApiUserCommand::new("bob", "bob@x.com", "admin"))
            .await
            .unwrap();

        assert_eq!(store.user_count(), 2);
        assert_eq!(store.api_user_count(), 1);
        assert_eq!(result.user.username, "bob");
        assert_eq!(result.api_user.user_id, result.user.id);
        assert_eq!(result.api_user.created_by_id, result.creator.id);
        assert_eq!(result.creator.username, "admin");
        assert!(result.success_message().contains("BOB"));
        assert_eq!(
            result.success_message(),
            "API user BOB created successfully!"
        );
    }

    #[tokio::test]
    async fn test_provision_stores_hashed_placeholder_password() {
        let (_store, handler) = setup();

        let result = handler
            .execute(ProvisionApiUserCommand::new("bob", "bob@x.com", "admin"))
            .await
            .unwrap();

        assert_ne!(result.user.password, API_USER_PASSWORD);
        let parsed = PasswordHash::new(&result.user.password).unwrap();
        assert!(
            Argon2::default()
                .verify_password(API_USER_PASSWORD.as_bytes(), &parsed)
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected() {
        let (store, handler) = setup();
        store.add_user("bob", "other@x.com");

        let result = handler
            .execute(ProvisionApiUserCommand::new("bob", "bob@x.com", "admin"))
            .await;

        assert!(matches!(
            result,
            Err(ApiUserError::DuplicateUsername { ref username }) if username == "bob"
        ));
        assert_eq!(store.user_count(), 2);
        assert_eq!(store.api_user_count(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let (store, handler) = setup();

        let result = handler
            .execute(ProvisionApiUserCommand::new(
                "bob",
                "admin@example.com",
                "admin",
            ))
            .await;

        assert!(matches!(result, Err(ApiUserError::DuplicateEmail { .. })));
        assert_eq!(store.user_count(), 1);
        assert_eq!(store.api_user_count(), 0);
    }

    #[tokio::test]
    async fn test_username_check_runs_before_email_check() {
        let (_store, handler) = setup();

        let result = handler
            .execute(ProvisionApiUserCommand::new(
                "admin",
                "admin@example.com",
                "admin",
            ))
            .await;

        assert!(matches!(result, Err(ApiUserError::DuplicateUsername { .. })));
    }

    #[tokio::test]
    async fn test_api_user_cannot_create_api_users() {
        let (store, handler) = setup();
        let admin = store.users()[0].clone();
        store.add_api_user("robot", "robot@x.com", &admin);

        let result = handler
            .execute(ProvisionApiUserCommand::new("bob", "bob@x.com", "robot"))
            .await;

        assert!(matches!(
            result,
            Err(ApiUserError::CreatorNotPermitted { ref creator }) if creator == "robot"
        ));
        assert_eq!(store.user_count(), 2);
        assert_eq!(store.api_user_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_creator_is_rejected() {
        let (store, handler) = setup();

        let result = handler
            .execute(ProvisionApiUserCommand::new("bob", "bob@x.com", "ghost"))
            .await;

        assert!(matches!(
            result,
            Err(ApiUserError::UnknownCreator { ref creator }) if creator == "ghost"
        ));
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_link_leaves_no_orphaned_account() {
        let (store, handler) = setup();
        store.fail_next_api_user_insert();

        let result = handler
            .execute(ProvisionApiUserCommand::new("bob", "bob@x.com", "admin"))
            .await;

        assert!(result.is_err());
        assert_eq!(store.user_count(), 1);
        assert_eq!(store.api_user_count(), 0);
    }

    #[tokio::test]
    async fn test_provisioned_user_cannot_mint_further_accounts() {
        let (_store, handler) = setup();

        handler
            .execute(ProvisionApiUserCommand::new("bob", "bob@x.com", "admin"))
            .await
            .unwrap();
        let result = handler
            .execute(ProvisionApiUserCommand::new(
                "carol",
                "carol@x.com",
                "bob",
            ))
            .await;

        assert!(matches!(
            result,
            Err(ApiUserError::CreatorNotPermitted { .. })
        ));
    }
}
