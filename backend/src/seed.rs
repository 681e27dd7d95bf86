//! Startup seeding: replay a deterministic example-data set through the
//! domain services so every seeded repair carries a real timeline.
//!
//! Only compiled with the `example-data` feature. Seeding goes through the
//! same services the HTTP surface uses; it never writes documents directly.

use example_data::{ExampleDataSet, GenerationConfig, generate};
use std::collections::HashMap;
use tracing::info;

use crate::domain::{
    Email, Error, Fullname, NewRepair, NewUser, ProfileUpdate, RepairService, StatusChange,
    UserDirectory, UserId,
};
use crate::domain::repair::Device;

fn data_error(context: &str, detail: impl std::fmt::Display) -> Error {
    Error::internal(format!("example data {context}: {detail}"))
}

/// Generate and apply a data set with the given seed.
pub async fn seed_example_data(
    seed: u64,
    users: &UserDirectory,
    repairs: &RepairService,
) -> Result<(), Error> {
    let config = GenerationConfig {
        seed,
        ..GenerationConfig::default()
    };
    let data = generate(&config);
    apply(&data, users, repairs).await
}

/// Replay a data set through the directory and the timeline engine.
pub async fn apply(
    data: &ExampleDataSet,
    users: &UserDirectory,
    repairs: &RepairService,
) -> Result<(), Error> {
    let mut ids: HashMap<&str, UserId> = HashMap::new();

    for account in data.staff.iter().chain(data.customers.iter()) {
        let user = users
            .create_user(NewUser {
                email: Email::new(&account.email)
                    .map_err(|err| data_error("account email", err))?,
                fullname: Fullname::new(&account.fullname)
                    .map_err(|err| data_error("account fullname", err))?,
                password: None,
                role: account
                    .role
                    .parse()
                    .map_err(|err| data_error("account role", err))?,
            })
            .await?;
        users
            .update_profile(
                &user.id,
                ProfileUpdate {
                    whatsapp: Some(account.whatsapp.clone()),
                    ..ProfileUpdate::default()
                },
            )
            .await?;
        ids.insert(account.email.as_str(), user.id);
    }

    let staff_id = |role: &str| -> Result<UserId, Error> {
        data.staff
            .iter()
            .find(|account| account.role == role)
            .and_then(|account| ids.get(account.email.as_str()).copied())
            .ok_or_else(|| data_error("staff", format!("no {role} account")))
    };
    let reception = staff_id("reception")?;
    let technician = staff_id("technician")?;

    for plan in &data.repairs {
        let customer = ids
            .get(plan.customer_email.as_str())
            .copied()
            .ok_or_else(|| data_error("repair", format!("unknown customer {}", plan.customer_email)))?;

        let created = repairs
            .create_repair(NewRepair {
                title: plan.title.clone(),
                priority: plan
                    .priority
                    .parse()
                    .map_err(|err| data_error("repair priority", err))?,
                customer,
                received_by: reception,
                device: Device {
                    kind: plan.device.kind.clone(),
                    brand: plan.device.brand.clone(),
                    model: plan.device.model.clone(),
                    serial_number: None,
                    physical_condition: plan.device.physical_condition.clone(),
                    flaw: plan.device.flaw.clone(),
                    password_or_pattern: None,
                    notes: None,
                },
                estimated_completion: None,
            })
            .await?;

        for status in &plan.status_path {
            repairs
                .transition_status(
                    &created.repair_code,
                    StatusChange {
                        status: status
                            .parse()
                            .map_err(|err| data_error("repair status", err))?,
                        note: None,
                        changed_by: technician,
                    },
                )
                .await?;
        }
    }

    info!(
        accounts = data.staff.len() + data.customers.len(),
        repairs = data.repairs.len(),
        "example data seeded"
    );
    Ok(())
}
