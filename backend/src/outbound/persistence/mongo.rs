//! MongoDB repository adapters.
//!
//! Documents are stored under the same camelCase field names the collections
//! have always used, so an existing `repairs`/`users` database keeps working.
//! Uniqueness checks are performed with read-before-write queries; the store
//! offers no serialization guarantee across concurrent writers beyond the
//! version-token check on updates.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{Document, doc};
use mongodb::{Client, Collection, Database};

use crate::domain::ports::{
    RepairFilter, RepairRepository, RepairStoreError, UserRepository, UserStoreError,
};
use crate::domain::repair::{Repair, RepairCode};
use crate::domain::user::{Email, User, UserId};

/// Connect to a MongoDB deployment and select the application database.
pub async fn connect(uri: &str, database: &str) -> Result<Database, mongodb::error::Error> {
    let client = Client::with_uri_str(uri).await?;
    Ok(client.database(database))
}

fn repair_store_error(err: &mongodb::error::Error) -> RepairStoreError {
    RepairStoreError::query(err.to_string())
}

fn user_store_error(err: &mongodb::error::Error) -> UserStoreError {
    UserStoreError::query(err.to_string())
}

/// Repair store backed by the `repairs` collection.
#[derive(Debug, Clone)]
pub struct MongoRepairRepository {
    repairs: Collection<Repair>,
}

impl MongoRepairRepository {
    /// Bind the adapter to its collection.
    #[must_use]
    pub fn new(database: &Database) -> Self {
        Self {
            repairs: database.collection("repairs"),
        }
    }
}

fn filter_document(filter: &RepairFilter) -> Document {
    let mut document = Document::new();
    if let Some(status) = filter.status {
        document.insert("status", status.as_str());
    }
    if let Some(priority) = filter.priority {
        document.insert("priority", priority.as_str());
    }
    if let Some(technician) = filter.technician {
        document.insert("technician", technician.to_string());
    }
    if let Some(customer) = filter.customer {
        document.insert("customer", customer.to_string());
    }
    if let Some(code) = &filter.repair_code {
        document.insert("repairCode", code.as_str());
    }
    document
}

#[async_trait]
impl RepairRepository for MongoRepairRepository {
    async fn count(&self) -> Result<u64, RepairStoreError> {
        self.repairs
            .count_documents(None, None)
            .await
            .map_err(|err| repair_store_error(&err))
    }

    async fn insert(&self, repair: &Repair) -> Result<(), RepairStoreError> {
        let code_taken = self
            .repairs
            .find_one(doc! { "repairCode": repair.repair_code.as_str() }, None)
            .await
            .map_err(|err| repair_store_error(&err))?;
        if code_taken.is_some() {
            return Err(RepairStoreError::DuplicateCode {
                code: repair.repair_code.to_string(),
            });
        }

        if let Some(serial) = &repair.device.serial_number {
            let serial_taken = self
                .repairs
                .find_one(doc! { "device.serialNumber": serial }, None)
                .await
                .map_err(|err| repair_store_error(&err))?;
            if serial_taken.is_some() {
                return Err(RepairStoreError::DuplicateSerial {
                    serial: serial.clone(),
                });
            }
        }

        self.repairs
            .insert_one(repair, None)
            .await
            .map_err(|err| repair_store_error(&err))?;
        Ok(())
    }

    async fn find_by_code(&self, code: &RepairCode) -> Result<Option<Repair>, RepairStoreError> {
        self.repairs
            .find_one(doc! { "repairCode": code.as_str() }, None)
            .await
            .map_err(|err| repair_store_error(&err))
    }

    async fn update(
        &self,
        repair: &Repair,
        expected_version: u64,
    ) -> Result<(), RepairStoreError> {
        let filter = doc! {
            "repairCode": repair.repair_code.as_str(),
            "version": expected_version as i64,
        };
        let result = self
            .repairs
            .replace_one(filter, repair, None)
            .await
            .map_err(|err| repair_store_error(&err))?;
        if result.matched_count == 0 {
            let exists = self.find_by_code(&repair.repair_code).await?.is_some();
            if exists {
                return Err(RepairStoreError::VersionConflict {
                    code: repair.repair_code.to_string(),
                });
            }
            return Err(RepairStoreError::Missing {
                code: repair.repair_code.to_string(),
            });
        }
        Ok(())
    }

    async fn list(&self, filter: &RepairFilter) -> Result<Vec<Repair>, RepairStoreError> {
        let cursor = self
            .repairs
            .find(filter_document(filter), None)
            .await
            .map_err(|err| repair_store_error(&err))?;
        cursor
            .try_collect()
            .await
            .map_err(|err| repair_store_error(&err))
    }

    async fn delete_by_codes(&self, codes: &[RepairCode]) -> Result<u64, RepairStoreError> {
        let codes: Vec<&str> = codes.iter().map(RepairCode::as_str).collect();
        let result = self
            .repairs
            .delete_many(doc! { "repairCode": { "$in": codes } }, None)
            .await
            .map_err(|err| repair_store_error(&err))?;
        Ok(result.deleted_count)
    }
}

/// User store backed by the `users` collection.
#[derive(Debug, Clone)]
pub struct MongoUserRepository {
    users: Collection<User>,
}

impl MongoUserRepository {
    /// Bind the adapter to its collection.
    #[must_use]
    pub fn new(database: &Database) -> Self {
        Self {
            users: database.collection("users"),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError> {
        self.users
            .find_one(doc! { "id": id.to_string() }, None)
            .await
            .map_err(|err| user_store_error(&err))
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserStoreError> {
        self.users
            .find_one(doc! { "email": email.as_str() }, None)
            .await
            .map_err(|err| user_store_error(&err))
    }

    async fn list(&self) -> Result<Vec<User>, UserStoreError> {
        let cursor = self
            .users
            .find(None, None)
            .await
            .map_err(|err| user_store_error(&err))?;
        cursor
            .try_collect()
            .await
            .map_err(|err| user_store_error(&err))
    }

    async fn insert(&self, user: &User) -> Result<(), UserStoreError> {
        let email_taken = self.find_by_email(&user.email).await?;
        if email_taken.is_some() {
            return Err(UserStoreError::DuplicateEmail {
                email: user.email.to_string(),
            });
        }
        self.users
            .insert_one(user, None)
            .await
            .map_err(|err| user_store_error(&err))?;
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserStoreError> {
        let result = self
            .users
            .replace_one(doc! { "id": user.id.to_string() }, user, None)
            .await
            .map_err(|err| user_store_error(&err))?;
        if result.matched_count == 0 {
            return Err(UserStoreError::Missing {
                id: user.id.to_string(),
            });
        }
        Ok(())
    }
}
