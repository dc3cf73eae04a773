//! User registration and profile management.

use common::UserId;
use store::{NewUser, Store, UnitOfWork, User, UserPatch, UserQuery};

use crate::{error::DomainError, page::Page};

#[derive(Clone)]
pub struct UserService<S: Store> {
    store: S,
}

/// Emails are stored and looked up trimmed and lowercased.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl<S: Store> UserService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Registers a user. A live user with the same email is a conflict.
    #[tracing::instrument(skip(self, user), fields(email = %user.email))]
    pub async fn register(&self, mut user: NewUser) -> Result<User, DomainError> {
        user.email = normalize_email(&user.email);

        let mut tx = self.store.begin().await?;
        let user = tx.insert_user(user).await?;
        tx.commit().await?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// The caller's own account.
    pub async fn profile(&self, user_id: UserId) -> Result<User, DomainError> {
        self.get(user_id).await
    }

    /// Applies the present fields of `patch` to the caller's locked row.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update(&self, user_id: UserId, patch: UserPatch) -> Result<User, DomainError> {
        let mut tx = self.store.begin().await?;
        let mut user = tx
            .find_user_for_update(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;
        patch.apply(&mut user);
        tx.save_user(&user).await?;
        tx.commit().await?;

        tracing::info!("user profile updated");
        Ok(user)
    }

    pub async fn list(&self, page: Page) -> Result<Vec<User>, DomainError> {
        Ok(self.store.list_users(page.apply_users(UserQuery::new())).await?)
    }

    pub async fn get(&self, user_id: UserId) -> Result<User, DomainError> {
        self.store
            .user(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<User, DomainError> {
        let email = normalize_email(email);
        self.store
            .user_by_email(&email)
            .await?
            .ok_or(DomainError::UserEmailNotFound(email))
    }

    /// Soft-deletes a user that owns no cart.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, user_id: UserId) -> Result<(), DomainError> {
        let mut tx = self.store.begin().await?;
        if tx.find_user_for_update(user_id).await?.is_none() {
            return Err(DomainError::UserNotFound(user_id));
        }
        if tx.user_in_use(user_id).await? {
            return Err(DomainError::UserInUse(user_id));
        }
        tx.soft_delete_user(user_id).await?;
        tx.commit().await?;

        tracing::info!("user deleted");
        Ok(())
    }
}
