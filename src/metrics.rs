//! Pure aggregate functions computed on demand from store snapshots. Every
//! figure the views display comes through here and is recomputed from the
//! full record list on each render; nothing in this module caches or
//! mutates. That keeps the arithmetic unit-testable without a UI harness
//! and guarantees a render always reflects the latest append.

use chrono::NaiveDate;

use crate::models::{Animal, ProductionRecord, RevenueCalculation};

/// Days per month and per year used by the age buckets. Calendar-naive on
/// purpose: ages are coarse display strings, not durations.
const DAYS_PER_MONTH: i64 = 30;
const DAYS_PER_YEAR: i64 = 365;

/// The summable field of a record kind. Window sums and averages are defined
/// over this quantity so they work identically for liters and currency.
pub trait Quantity {
    fn quantity(&self) -> f64;
}

impl Quantity for ProductionRecord {
    fn quantity(&self) -> f64 {
        self.total
    }
}

impl Quantity for RevenueCalculation {
    fn quantity(&self) -> f64 {
        self.total_revenue
    }
}

/// Sum the quantities of the first `window` records (stores keep newest
/// first, so this is a rolling "latest N" total). Records beyond the window
/// never influence the result; an empty slice sums to zero.
pub fn total_over_window<T: Quantity>(records: &[T], window: usize) -> f64 {
    records
        .iter()
        .take(window)
        .map(Quantity::quantity)
        .sum()
}

/// Average quantity over the same window. Divides by the number of records
/// actually present, and returns `0.0` rather than NaN for an empty slice.
pub fn average_over_window<T: Quantity>(records: &[T], window: usize) -> f64 {
    let count = records.len().min(window);
    if count == 0 {
        return 0.0;
    }
    total_over_window(records, window) / count as f64
}

/// Derive the Portuguese age string for a birth date as of `today`.
///
/// Buckets by whole elapsed days: under 30 days reads in days, under a year
/// in 30-day months, beyond that in 365-day years, with singular wording for
/// exactly one month or year. The caller supplies `today` so the result can
/// be a creation-time snapshot or a live value, whichever freshness the
/// call site needs.
pub fn age_from_birth_date(birth: NaiveDate, today: NaiveDate) -> String {
    let days = (today - birth).num_days().abs();

    if days < DAYS_PER_MONTH {
        format!("{days} dias")
    } else if days < DAYS_PER_YEAR {
        let months = days / DAYS_PER_MONTH;
        let unit = if months == 1 { "mês" } else { "meses" };
        format!("{months} {unit}")
    } else {
        let years = days / DAYS_PER_YEAR;
        let unit = if years == 1 { "ano" } else { "anos" };
        format!("{years} {unit}")
    }
}

/// Project revenue for a period: daily liters times price times days. No
/// rounding here; the two-decimal currency display is applied at render
/// time only.
pub fn revenue_projection(daily_liters: f64, price_per_liter: f64, days_in_period: f64) -> f64 {
    daily_liters * price_per_liter * days_in_period
}

/// Lazily yield the records matching `predicate`, preserving store order.
/// The iterator borrows the slice, so callers can restart it by calling
/// again with the same arguments.
pub fn filter_by_predicate<'a, T, P>(records: &'a [T], predicate: P) -> impl Iterator<Item = &'a T>
where
    P: Fn(&T) -> bool + 'a,
{
    records.iter().filter(move |record| predicate(record))
}

/// Read a hand-typed quantity. Empty or non-numeric input reads as zero;
/// parse failures never propagate. This permissive policy is deliberate, so
/// the form layer can show a live total while the user is still typing.
pub fn parse_quantity(input: &str) -> f64 {
    input.trim().parse::<f64>().unwrap_or(0.0)
}

/// Counts backing the livestock header cards.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct HerdStats {
    pub total: usize,
    pub cows: usize,
    pub bulls: usize,
    pub calves: usize,
}

/// Tally the herd by kind. Calves of both sexes share one bucket.
pub fn herd_stats(animals: &[Animal]) -> HerdStats {
    use crate::models::AnimalKind;

    HerdStats {
        total: animals.len(),
        cows: filter_by_predicate(animals, |a| a.kind == AnimalKind::Cow).count(),
        bulls: filter_by_predicate(animals, |a| a.kind == AnimalKind::Bull).count(),
        calves: filter_by_predicate(animals, |a| a.kind.is_calf()).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnimalKind, Sex};
    use chrono::Duration;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, n).unwrap()
    }

    fn production(id: u64, morning: f64, afternoon: f64) -> ProductionRecord {
        ProductionRecord::new(id, day(id as u32), morning, afternoon)
    }

    #[test]
    fn window_total_ignores_records_beyond_the_window() {
        let records = vec![
            production(1, 120.0, 125.0),
            production(2, 115.0, 120.0),
            production(3, 130.0, 110.0),
        ];
        assert_eq!(total_over_window(&records, 2), 245.0 + 235.0);
        // Same first-two sum no matter how much history follows.
        let mut longer = records.clone();
        longer.push(production(4, 90.0, 90.0));
        assert_eq!(
            total_over_window(&longer, 2),
            total_over_window(&records, 2)
        );
    }

    #[test]
    fn window_total_of_empty_store_is_zero() {
        let records: Vec<ProductionRecord> = Vec::new();
        assert_eq!(total_over_window(&records, 7), 0.0);
    }

    #[test]
    fn average_divides_by_records_present_not_window_size() {
        let records = vec![production(1, 120.0, 125.0), production(2, 115.0, 120.0)];
        assert_eq!(average_over_window(&records, 7), (245.0 + 235.0) / 2.0);
    }

    #[test]
    fn average_of_empty_store_is_zero_not_nan() {
        let records: Vec<ProductionRecord> = Vec::new();
        assert_eq!(average_over_window(&records, 7), 0.0);
    }

    #[test]
    fn age_bucket_boundaries() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let days_ago = |n: i64| today - Duration::days(n);

        assert_eq!(age_from_birth_date(days_ago(20), today), "20 dias");
        assert_eq!(age_from_birth_date(days_ago(29), today), "29 dias");
        assert_eq!(age_from_birth_date(days_ago(30), today), "1 mês");
        assert_eq!(age_from_birth_date(days_ago(61), today), "2 meses");
        assert_eq!(age_from_birth_date(days_ago(364), today), "12 meses");
        assert_eq!(age_from_birth_date(days_ago(365), today), "1 ano");
        assert_eq!(age_from_birth_date(days_ago(366), today), "1 ano");
        assert_eq!(age_from_birth_date(days_ago(730), today), "2 anos");
    }

    #[test]
    fn projection_is_plain_multiplication() {
        assert_eq!(revenue_projection(200.0, 1.50, 30.0), 9000.0);
    }

    #[test]
    fn filtering_an_empty_store_yields_nothing() {
        let animals: Vec<Animal> = Vec::new();
        assert_eq!(filter_by_predicate(&animals, |a| a.kind.is_calf()).count(), 0);
    }

    #[test]
    fn quantity_parsing_clamps_invalid_input_to_zero() {
        assert_eq!(parse_quantity("120"), 120.0);
        assert_eq!(parse_quantity(" 1.5 "), 1.5);
        assert_eq!(parse_quantity(""), 0.0);
        assert_eq!(parse_quantity("abc"), 0.0);
    }

    #[test]
    fn herd_stats_counts_each_kind() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let animal = |id, name: &str, kind, sex| Animal {
            id,
            name: name.to_string(),
            kind,
            sex,
            birth_date: today,
            mother_name: None,
            age: age_from_birth_date(today, today),
        };

        let herd = vec![
            animal(1, "Mimosa", AnimalKind::Cow, Sex::Female),
            animal(2, "Touro Rex", AnimalKind::Bull, Sex::Male),
            animal(3, "Pequenina", AnimalKind::FemaleCalf, Sex::Female),
            animal(4, "Valente", AnimalKind::MaleCalf, Sex::Male),
        ];

        assert_eq!(
            herd_stats(&herd),
            HerdStats {
                total: 4,
                cows: 1,
                bulls: 1,
                calves: 2,
            }
        );
    }
}
