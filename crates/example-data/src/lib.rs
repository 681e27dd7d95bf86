//! Deterministic demo data for the repair-shop backend.
//!
//! Generates believable, reproducible accounts and repair plans from a
//! numeric seed. The crate is independent of the backend's domain types to
//! avoid circular dependencies: everything is plain strings in the canonical
//! wire vocabulary, and the backend replays the plans through its own
//! services so every invariant still holds.

pub mod catalog;

use fake::Fake;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::CellNumber;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use catalog::{DEVICE_CATALOG, PHYSICAL_CONDITIONS, STATUS_PATHS};

/// Staff roles seeded alongside the demo customers.
pub const STAFF: &[(&str, &str, &str)] = &[
    ("reception", "desk@taller.example", "Mesa de Entrada"),
    ("technician", "tecnico@taller.example", "Tecnico de Turno"),
    ("admin", "admin@taller.example", "Administracion Taller"),
];

/// One demo account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleUser {
    /// Unique sign-in address.
    pub email: String,
    /// Display name.
    pub fullname: String,
    /// Role in the backend's lowercase wire form.
    pub role: String,
    /// WhatsApp contact number.
    pub whatsapp: String,
}

/// Device snapshot for a demo intake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleDevice {
    /// Category name.
    pub kind: String,
    /// Manufacturer.
    pub brand: String,
    /// Model name.
    pub model: String,
    /// Cosmetic state.
    pub physical_condition: String,
    /// Reported flaw.
    pub flaw: String,
}

/// One demo repair: an intake plus the status walk to replay through the
/// backend's transition engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleRepair {
    /// Listing title.
    pub title: String,
    /// Priority in the canonical wire form.
    pub priority: String,
    /// Email of the owning demo customer.
    pub customer_email: String,
    /// Device snapshot.
    pub device: ExampleDevice,
    /// Canonical status strings to apply after intake, in order.
    pub status_path: Vec<String>,
}

/// Full generated data set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleDataSet {
    /// Staff accounts (reception, technician, admin).
    pub staff: Vec<ExampleUser>,
    /// Demo customers.
    pub customers: Vec<ExampleUser>,
    /// Demo repairs owned by the customers.
    pub repairs: Vec<ExampleRepair>,
}

/// Generation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Seed for the deterministic generator.
    pub seed: u64,
    /// Number of demo customers.
    pub customers: usize,
    /// Number of demo repairs.
    pub repairs: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            customers: 8,
            repairs: 12,
        }
    }
}

fn email_slug(fullname: &str) -> String {
    fullname
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

fn pick<'a, T>(rng: &mut ChaCha8Rng, items: &'a [T]) -> &'a T {
    &items[rng.random_range(0..items.len())]
}

fn priority(rng: &mut ChaCha8Rng) -> &'static str {
    match rng.random_range(0..10_u8) {
        0 => "Urgente",
        1..=3 => "Alta",
        _ => "Normal",
    }
}

/// Generate a deterministic data set: same config, same output.
///
/// # Panics
/// Panics when asked for repairs without any customers to own them.
#[must_use]
pub fn generate(config: &GenerationConfig) -> ExampleDataSet {
    assert!(
        config.customers > 0 || config.repairs == 0,
        "repairs need at least one customer"
    );
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    let staff = STAFF
        .iter()
        .map(|(role, email, fullname)| ExampleUser {
            email: (*email).to_owned(),
            fullname: (*fullname).to_owned(),
            role: (*role).to_owned(),
            whatsapp: CellNumber().fake_with_rng(&mut rng),
        })
        .collect();

    let customers: Vec<ExampleUser> = (0..config.customers)
        .map(|index| {
            let fullname: String = Name().fake_with_rng(&mut rng);
            let email = format!("{}{index}@cliente.example", email_slug(&fullname));
            ExampleUser {
                email,
                fullname,
                role: "user".to_owned(),
                whatsapp: CellNumber().fake_with_rng(&mut rng),
            }
        })
        .collect();

    let repairs = (0..config.repairs)
        .map(|_| {
            let category = pick(&mut rng, DEVICE_CATALOG);
            let (brand, model) = *pick(&mut rng, category.models);
            let flaw = *pick(&mut rng, category.flaws);
            let customer = pick(&mut rng, &customers);
            let status_path = pick(&mut rng, STATUS_PATHS);

            ExampleRepair {
                title: format!("{} {brand} - {flaw}", category.kind),
                priority: priority(&mut rng).to_owned(),
                customer_email: customer.email.clone(),
                device: ExampleDevice {
                    kind: category.kind.to_owned(),
                    brand: brand.to_owned(),
                    model: model.to_owned(),
                    physical_condition: (*pick(&mut rng, PHYSICAL_CONDITIONS)).to_owned(),
                    flaw: flaw.to_owned(),
                },
                status_path: status_path.iter().map(|s| (*s).to_owned()).collect(),
            }
        })
        .collect();

    ExampleDataSet {
        staff,
        customers,
        repairs,
    }
}
