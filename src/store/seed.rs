//! The per-session store container and its demo dataset. Seeding mirrors
//! what the product ships with so a fresh launch has something to show on
//! every view; the exact rows double as fixtures in tests.

use chrono::{Duration, NaiveDate};

use crate::metrics::age_from_birth_date;
use crate::models::{Animal, AnimalKind, ProductionRecord, RevenueCalculation, Sex};
use crate::store::RecordStore;

/// All three domain stores for one interactive session. Each view borrows
/// the store it renders from this container rather than holding ambient
/// state of its own; the container is created at session start and simply
/// dropped at exit, since nothing persists.
pub struct Stores {
    pub production: RecordStore<ProductionRecord>,
    pub herd: RecordStore<Animal>,
    pub revenue: RecordStore<RevenueCalculation>,
}

impl Stores {
    /// Blank stores, used by tests that build their own records.
    pub fn empty() -> Self {
        Self {
            production: RecordStore::new(),
            herd: RecordStore::new(),
            revenue: RecordStore::new(),
        }
    }

    /// Stores preloaded with the demo dataset. `today` anchors the relative
    /// dates so the seeded calf always shows a 20-day age on first launch.
    pub fn seeded(today: NaiveDate) -> Self {
        let mut stores = Self::empty();

        // Three recent production days, oldest appended first so the
        // newest-first ordering comes out right.
        for (days_ago, morning, afternoon) in [(2, 130.0, 110.0), (1, 115.0, 120.0), (0, 120.0, 125.0)] {
            let id = stores.production.alloc_id();
            let date = today - Duration::days(days_ago);
            stores
                .production
                .append(ProductionRecord::new(id, date, morning, afternoon));
        }

        let mut seed_animal =
            |name: &str, kind: AnimalKind, sex: Sex, days_old: i64, mother: Option<&str>| {
                let id = stores.herd.alloc_id();
                let birth_date = today - Duration::days(days_old);
                stores.herd.append(Animal {
                    id,
                    name: name.to_string(),
                    kind,
                    sex,
                    birth_date,
                    mother_name: mother.map(str::to_string),
                    age: age_from_birth_date(birth_date, today),
                });
            };

        seed_animal("Mimosa", AnimalKind::Cow, Sex::Female, 4 * 365 + 60, None);
        seed_animal("Touro Rex", AnimalKind::Bull, Sex::Male, 5 * 365 + 30, None);
        seed_animal(
            "Pequenina",
            AnimalKind::FemaleCalf,
            Sex::Female,
            20,
            Some("Mimosa"),
        );

        for (period, liters, price, date) in [
            (
                "Dezembro 2023",
                6850.0,
                1.45,
                NaiveDate::from_ymd_opt(2023, 12, 31).unwrap_or(today),
            ),
            (
                "Janeiro 2024",
                7200.0,
                1.50,
                NaiveDate::from_ymd_opt(2024, 1, 31).unwrap_or(today),
            ),
        ] {
            let id = stores.revenue.alloc_id();
            stores
                .revenue
                .append(RevenueCalculation::new(id, period.to_string(), liters, price, date));
        }

        log::info!(
            "seeded session stores: {} production, {} animals, {} calculations",
            stores.production.len(),
            stores.herd.len(),
            stores.revenue.len()
        );

        stores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_stores_carry_the_demo_dataset() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 30).unwrap();
        let stores = Stores::seeded(today);

        assert_eq!(stores.production.len(), 3);
        assert_eq!(stores.herd.len(), 3);
        assert_eq!(stores.revenue.len(), 2);

        // Newest production day first, with the derived total intact.
        let latest = stores.production.latest().unwrap();
        assert_eq!(latest.date, today);
        assert_eq!(latest.total, 245.0);

        // The seeded calf is 20 days old relative to the anchor date.
        let calf = stores.herd.latest().unwrap();
        assert_eq!(calf.name, "Pequenina");
        assert_eq!(calf.age, "20 dias");
        assert_eq!(calf.mother_name.as_deref(), Some("Mimosa"));
    }
}
