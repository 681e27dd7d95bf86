//! In-memory repository adapters.
//!
//! Used by the test suites and by dev deployments running without a MongoDB
//! instance. Documents live in a `tokio::sync::RwLock`-guarded vector so
//! listing preserves creation order, matching the document store's natural
//! ordering.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{
    RepairFilter, RepairRepository, RepairStoreError, UserRepository, UserStoreError,
};
use crate::domain::repair::{Repair, RepairCode};
use crate::domain::user::{Email, User, UserId};

/// Volatile repair store.
#[derive(Debug, Default)]
pub struct InMemoryRepairRepository {
    repairs: RwLock<Vec<Repair>>,
}

impl InMemoryRepairRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(repair: &Repair, filter: &RepairFilter) -> bool {
    if let Some(status) = filter.status {
        if repair.status != status {
            return false;
        }
    }
    if let Some(priority) = filter.priority {
        if repair.priority != priority {
            return false;
        }
    }
    if let Some(technician) = filter.technician {
        if repair.technician != Some(technician) {
            return false;
        }
    }
    if let Some(customer) = filter.customer {
        if repair.customer != customer {
            return false;
        }
    }
    if let Some(code) = &filter.repair_code {
        if &repair.repair_code != code {
            return false;
        }
    }
    true
}

#[async_trait]
impl RepairRepository for InMemoryRepairRepository {
    async fn count(&self) -> Result<u64, RepairStoreError> {
        Ok(self.repairs.read().await.len() as u64)
    }

    async fn insert(&self, repair: &Repair) -> Result<(), RepairStoreError> {
        let mut repairs = self.repairs.write().await;
        if repairs
            .iter()
            .any(|stored| stored.repair_code == repair.repair_code)
        {
            return Err(RepairStoreError::DuplicateCode {
                code: repair.repair_code.to_string(),
            });
        }
        if let Some(serial) = &repair.device.serial_number {
            if repairs
                .iter()
                .any(|stored| stored.device.serial_number.as_deref() == Some(serial))
            {
                return Err(RepairStoreError::DuplicateSerial {
                    serial: serial.clone(),
                });
            }
        }
        repairs.push(repair.clone());
        Ok(())
    }

    async fn find_by_code(&self, code: &RepairCode) -> Result<Option<Repair>, RepairStoreError> {
        let repairs = self.repairs.read().await;
        Ok(repairs
            .iter()
            .find(|stored| &stored.repair_code == code)
            .cloned())
    }

    async fn update(
        &self,
        repair: &Repair,
        expected_version: u64,
    ) -> Result<(), RepairStoreError> {
        let mut repairs = self.repairs.write().await;
        let Some(stored) = repairs
            .iter_mut()
            .find(|stored| stored.repair_code == repair.repair_code)
        else {
            return Err(RepairStoreError::Missing {
                code: repair.repair_code.to_string(),
            });
        };
        if stored.version != expected_version {
            return Err(RepairStoreError::VersionConflict {
                code: repair.repair_code.to_string(),
            });
        }
        *stored = repair.clone();
        Ok(())
    }

    async fn list(&self, filter: &RepairFilter) -> Result<Vec<Repair>, RepairStoreError> {
        let repairs = self.repairs.read().await;
        Ok(repairs
            .iter()
            .filter(|stored| matches(stored, filter))
            .cloned()
            .collect())
    }

    async fn delete_by_codes(&self, codes: &[RepairCode]) -> Result<u64, RepairStoreError> {
        let mut repairs = self.repairs.write().await;
        let before = repairs.len();
        repairs.retain(|stored| !codes.contains(&stored.repair_code));
        Ok((before - repairs.len()) as u64)
    }
}

/// Volatile user store.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|stored| &stored.id == id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserStoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|stored| &stored.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserStoreError> {
        Ok(self.users.read().await.clone())
    }

    async fn insert(&self, user: &User) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|stored| stored.email == user.email) {
            return Err(UserStoreError::DuplicateEmail {
                email: user.email.to_string(),
            });
        }
        users.push(user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;
        let Some(stored) = users.iter_mut().find(|stored| stored.id == user.id) else {
            return Err(UserStoreError::Missing {
                id: user.id.to_string(),
            });
        };
        *stored = user.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::domain::repair::{Device, IntakeDetails};
    use crate::domain::role::Role;
    use crate::domain::status::{Priority, RepairStatus};
    use crate::domain::user::Fullname;

    use super::*;

    fn device(serial: Option<&str>) -> Device {
        Device {
            kind: "Notebook".to_owned(),
            brand: "Lenovo".to_owned(),
            model: "ThinkBook 14".to_owned(),
            serial_number: serial.map(str::to_owned),
            physical_condition: "Golpeado".to_owned(),
            flaw: "No carga".to_owned(),
            password_or_pattern: None,
            notes: None,
        }
    }

    fn repair(count: u64, serial: Option<&str>) -> Repair {
        Repair::intake(
            RepairCode::allocate(count),
            IntakeDetails {
                title: "Revisión general".to_owned(),
                priority: Priority::Normal,
                customer: UserId::random(),
                received_by: UserId::random(),
                received_by_role: Role::Reception,
                device: device(serial),
                estimated_completion: None,
            },
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_codes_and_serials() {
        let store = InMemoryRepairRepository::new();
        store.insert(&repair(0, Some("SN1234567890"))).await.expect("first insert");

        let same_code = repair(0, None);
        assert!(matches!(
            store.insert(&same_code).await,
            Err(RepairStoreError::DuplicateCode { .. })
        ));

        let same_serial = repair(1, Some("SN1234567890"));
        assert!(matches!(
            store.insert(&same_serial).await,
            Err(RepairStoreError::DuplicateSerial { .. })
        ));
    }

    #[tokio::test]
    async fn update_enforces_the_version_token() {
        let store = InMemoryRepairRepository::new();
        let stored = repair(0, None);
        store.insert(&stored).await.expect("insert");

        let mut next = stored.clone();
        next.status = RepairStatus::UnderReview;
        next.version = 1;
        store.update(&next, 0).await.expect("matching token");

        let mut stale = stored.clone();
        stale.status = RepairStatus::Diagnosed;
        stale.version = 1;
        assert!(matches!(
            store.update(&stale, 0).await,
            Err(RepairStoreError::VersionConflict { .. })
        ));
    }

    #[tokio::test]
    async fn list_applies_all_filters_conjunctively() {
        let store = InMemoryRepairRepository::new();
        let mut urgent = repair(0, None);
        urgent.priority = Priority::Urgent;
        let normal = repair(1, None);
        store.insert(&urgent).await.expect("insert");
        store.insert(&normal).await.expect("insert");

        let filter = RepairFilter {
            priority: Some(Priority::Urgent),
            status: Some(RepairStatus::Received),
            ..RepairFilter::default()
        };
        let listed = store.list(&filter).await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].repair_code, urgent.repair_code);
    }

    #[tokio::test]
    async fn delete_removes_exactly_the_given_codes() {
        let store = InMemoryRepairRepository::new();
        let first = repair(0, None);
        let second = repair(1, None);
        let third = repair(2, None);
        for r in [&first, &second, &third] {
            store.insert(r).await.expect("insert");
        }

        let deleted = store
            .delete_by_codes(&[first.repair_code.clone(), third.repair_code.clone()])
            .await
            .expect("delete");
        assert_eq!(deleted, 2);

        let remaining = store.list(&RepairFilter::default()).await.expect("list");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].repair_code, second.repair_code);
    }

    #[tokio::test]
    async fn user_store_enforces_unique_emails() {
        let store = InMemoryUserRepository::new();
        let user = User::new(
            Email::new("ada@example.com").expect("valid email"),
            Fullname::new("Ada Lovelace").expect("valid name"),
            Role::User,
            Utc::now(),
        );
        store.insert(&user).await.expect("insert");

        let duplicate = User::new(
            Email::new("ada@example.com").expect("valid email"),
            Fullname::new("Ada Byron").expect("valid name"),
            Role::User,
            Utc::now(),
        );
        assert!(matches!(
            store.insert(&duplicate).await,
            Err(UserStoreError::DuplicateEmail { .. })
        ));
    }
}
