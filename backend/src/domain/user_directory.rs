//! Account administration operations over the user repository port.
//!
//! Credential and OAuth sign-in live outside this service; accounts arrive
//! here already provisioned by the external flow or are created directly by
//! staff at the front desk.

use std::sync::Arc;

use super::error::Error;
use super::ports::{Clock, UserRepository};
use super::repair_service::map_user_store_error;
use super::role::Role;
use super::user::{Email, Fullname, User, UserId};

/// Validated account-creation request.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique sign-in address.
    pub email: Email,
    /// Display name.
    pub fullname: Fullname,
    /// Opaque credential hash from the external sign-in flow.
    pub password: Option<String>,
    /// Role assigned at creation; defaults to customer.
    pub role: Role,
}

/// Profile fields a user may edit on their own account.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// New display name.
    pub fullname: Option<Fullname>,
    /// WhatsApp contact number.
    pub whatsapp: Option<String>,
    /// Country of residence.
    pub country: Option<String>,
    /// State or province.
    pub state: Option<String>,
    /// City or locality.
    pub locality: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Postal code.
    pub postalcode: Option<String>,
}

/// User store operations: listing, lookups, creation, profile edits.
pub struct UserDirectory {
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl UserDirectory {
    /// Wire the directory to its collaborators.
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }

    /// Every account, in storage order.
    pub async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.users.list().await.map_err(map_user_store_error)
    }

    /// Fetch one account by identifier.
    pub async fn get_user(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_store_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }

    /// Resolve an email to the owning account's identifier.
    pub async fn find_id_by_email(&self, email: &Email) -> Result<UserId, Error> {
        self.users
            .find_by_email(email)
            .await
            .map_err(map_user_store_error)?
            .map(|user| user.id)
            .ok_or_else(|| Error::not_found("User not found"))
    }

    /// Create an account; the email must be unused.
    pub async fn create_user(&self, request: NewUser) -> Result<User, Error> {
        let mut user = User::new(
            request.email,
            request.fullname,
            request.role,
            self.clock.now(),
        );
        user.password = request.password;
        self.users
            .insert(&user)
            .await
            .map_err(map_user_store_error)?;
        Ok(user)
    }

    /// Apply a profile edit; role and email are not editable here.
    pub async fn update_profile(
        &self,
        id: &UserId,
        update: ProfileUpdate,
    ) -> Result<User, Error> {
        let mut user = self.get_user(id).await?;

        if let Some(fullname) = update.fullname {
            user.fullname = fullname;
        }
        if let Some(whatsapp) = update.whatsapp {
            user.whatsapp = whatsapp;
        }
        if let Some(country) = update.country {
            user.country = country;
        }
        if let Some(state) = update.state {
            user.state = state;
        }
        if let Some(locality) = update.locality {
            user.locality = locality;
        }
        if let Some(address) = update.address {
            user.address = address;
        }
        if let Some(postalcode) = update.postalcode {
            user.postalcode = postalcode;
        }
        user.updated_at = self.clock.now();

        self.users
            .update(&user)
            .await
            .map_err(map_user_store_error)?;
        Ok(user)
    }
}
