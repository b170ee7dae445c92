//! Domain records that flow between the forms, the session stores, and the
//! TUI. The intent is that these types stay light-weight data holders whose
//! constructors enforce the arithmetic invariants (totals are always the sum
//! or product of their parts), so other layers can focus on presentation and
//! aggregation logic. Keeping the commentary here means later refactors can
//! reconstruct the assumptions even if other context is lost.

use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

/// Raised when a hand-typed date cannot be read as `YYYY-MM-DD`. Dates are
/// the one input we parse strictly; numeric fields clamp to zero instead
/// (see `metrics::parse_quantity`).
#[derive(Debug, Error)]
#[error("Data inválida: '{0}' (use AAAA-MM-DD).")]
pub struct InvalidDate(pub String);

/// Parse a user-entered date. Trims first so trailing whitespace from a
/// pasted value does not reject an otherwise fine input.
pub fn parse_date(input: &str) -> Result<NaiveDate, InvalidDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| InvalidDate(trimmed.to_string()))
}

#[derive(Debug, Clone)]
/// One day of milk production. `total` is derived once in [`Self::new`] and
/// never recomputed, so the invariant `total == morning + afternoon` holds
/// for the lifetime of the record.
pub struct ProductionRecord {
    /// Store-assigned identifier. Kept even though the UI only needs display
    /// information, so list renderers have a stable key.
    pub id: u64,
    /// Calendar day the milk was collected.
    pub date: NaiveDate,
    /// Morning milking volume in liters.
    pub morning: f64,
    /// Afternoon milking volume in liters.
    pub afternoon: f64,
    /// `morning + afternoon`, fixed at construction.
    pub total: f64,
}

impl ProductionRecord {
    /// Build a record with the total derived from its parts. This is the only
    /// constructor on purpose: nothing else may decide what `total` is.
    pub fn new(id: u64, date: NaiveDate, morning: f64, afternoon: f64) -> Self {
        Self {
            id,
            date,
            morning,
            afternoon,
            total: morning + afternoon,
        }
    }

    /// Compose the `120L + 125L` breakdown shown beneath history rows.
    pub fn breakdown(&self) -> String {
        format!("{}L + {}L", self.morning, self.afternoon)
    }
}

/// The four kinds of animal the registry tracks.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AnimalKind {
    Cow,
    Bull,
    MaleCalf,
    FemaleCalf,
}

impl AnimalKind {
    /// All kinds in the order the select field cycles through them.
    pub const ALL: [AnimalKind; 4] = [
        AnimalKind::Cow,
        AnimalKind::Bull,
        AnimalKind::MaleCalf,
        AnimalKind::FemaleCalf,
    ];

    /// Portuguese label used everywhere the kind is displayed.
    pub fn label(&self) -> &'static str {
        match self {
            AnimalKind::Cow => "Vaca",
            AnimalKind::Bull => "Touro",
            AnimalKind::MaleCalf => "Bezerro",
            AnimalKind::FemaleCalf => "Bezerra",
        }
    }

    /// Whether this kind counts toward the "Filhotes" statistic and the
    /// recent-births panel.
    pub fn is_calf(&self) -> bool {
        matches!(self, AnimalKind::MaleCalf | AnimalKind::FemaleCalf)
    }
}

impl fmt::Display for AnimalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Registered sex of an animal. Tracked independently from the kind, even
/// where one implies the other, so both stay explicit on the record.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub const ALL: [Sex; 2] = [Sex::Male, Sex::Female];

    pub fn label(&self) -> &'static str {
        match self {
            Sex::Male => "Macho",
            Sex::Female => "Fêmea",
        }
    }

    /// Compact glyph for card corners.
    pub fn symbol(&self) -> &'static str {
        match self {
            Sex::Male => "♂",
            Sex::Female => "♀",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone)]
/// One animal in the herd registry.
pub struct Animal {
    pub id: u64,
    /// Display name, required at the form layer.
    pub name: String,
    pub kind: AnimalKind,
    pub sex: Sex,
    pub birth_date: NaiveDate,
    /// Free-text reference to the mother's name. Not a foreign key: no
    /// existence check is made against the rest of the herd.
    pub mother_name: Option<String>,
    /// Age string derived from `birth_date` when the record was created. A
    /// deliberate point-in-time snapshot; callers wanting a live age should
    /// call `metrics::age_from_birth_date` with the current date instead.
    pub age: String,
}

impl Animal {
    /// Compose the `Vaca • Fêmea` subtitle used on herd cards.
    pub fn describe(&self) -> String {
        format!("{} • {}", self.kind.label(), self.sex.label())
    }
}

#[derive(Debug, Clone)]
/// A saved revenue calculation. Like production records the derived field is
/// fixed at construction: `total_revenue == total_liters * price_per_liter`.
pub struct RevenueCalculation {
    pub id: u64,
    /// Free-text period label, e.g. "Janeiro 2024" or "Quinzena 1 - Fev".
    pub period: String,
    pub total_liters: f64,
    pub price_per_liter: f64,
    /// `total_liters * price_per_liter`, unrounded. Formatting to two
    /// decimals happens only at render time.
    pub total_revenue: f64,
    /// Day the calculation was saved, not the period it covers.
    pub date: NaiveDate,
}

impl RevenueCalculation {
    /// Build a calculation with the revenue derived from its parts.
    pub fn new(
        id: u64,
        period: String,
        total_liters: f64,
        price_per_liter: f64,
        date: NaiveDate,
    ) -> Self {
        Self {
            id,
            period,
            total_liters,
            price_per_liter,
            total_revenue: total_liters * price_per_liter,
            date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_total_is_sum_of_parts() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 30).unwrap();
        let record = ProductionRecord::new(1, date, 120.0, 125.0);
        assert_eq!(record.total, 245.0);
        assert_eq!(record.breakdown(), "120L + 125L");
    }

    #[test]
    fn revenue_total_is_product_of_parts() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let calc = RevenueCalculation::new(1, "Janeiro 2024".into(), 7200.0, 1.5, date);
        assert_eq!(calc.total_revenue, 10_800.0);
    }

    #[test]
    fn parse_date_accepts_iso_and_rejects_garbage() {
        assert_eq!(
            parse_date(" 2024-01-30 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 30).unwrap()
        );
        assert!(parse_date("30/01/2024").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn calf_kinds_are_flagged() {
        assert!(AnimalKind::FemaleCalf.is_calf());
        assert!(AnimalKind::MaleCalf.is_calf());
        assert!(!AnimalKind::Cow.is_calf());
        assert!(!AnimalKind::Bull.is_calf());
    }
}
