use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::metrics::parse_quantity;
use crate::models::{parse_date, AnimalKind, Sex};

/// Render one `Label: value` form row, highlighting the active field and
/// dimming placeholders. Shared by all three forms so they style identically.
fn field_line(
    field_name: &str,
    value: &str,
    placeholder: &str,
    is_active: bool,
) -> Line<'static> {
    let display = if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    };

    let style = if is_active {
        Style::default().fg(Color::Yellow)
    } else if value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(format!("{field_name}: ")),
        Span::styled(display, style),
    ])
}

/// Push a character into a quantity field: digits plus at most one decimal
/// point. Anything else is rejected so `parse_quantity` only ever sees
/// plausible numbers (it still clamps the rest to zero).
fn push_quantity_char(value: &mut String, ch: char) -> bool {
    if ch.is_ascii_digit() || (ch == '.' && !value.contains('.')) {
        value.push(ch);
        true
    } else {
        false
    }
}

/// Push a character into a date field: digits and the ISO separator.
fn push_date_char(value: &mut String, ch: char) -> bool {
    if ch.is_ascii_digit() || ch == '-' {
        value.push(ch);
        true
    } else {
        false
    }
}

/// Fields available within the production form.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum ProductionField {
    #[default]
    Date,
    Morning,
    Afternoon,
}

/// Internal representation of the "register production" form. The form walks
/// Empty -> Partial -> Submittable as fields fill in; `is_submittable` is the
/// explicit predicate the submit key is gated on.
#[derive(Default, Clone)]
pub(crate) struct ProductionForm {
    pub(crate) date: String,
    pub(crate) morning: String,
    pub(crate) afternoon: String,
    pub(crate) active: ProductionField,
    pub(crate) error: Option<String>,
}

impl ProductionForm {
    /// Seed the form with today's date, matching the product default of the
    /// date picker starting on the current day.
    pub(crate) fn for_today(today: NaiveDate) -> Self {
        Self {
            date: today.format("%Y-%m-%d").to_string(),
            ..Self::default()
        }
    }

    /// Cycle focus across the three fields.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            ProductionField::Date => ProductionField::Morning,
            ProductionField::Morning => ProductionField::Afternoon,
            ProductionField::Afternoon => ProductionField::Date,
        };
    }

    /// Append a character to the active field, validating allowed input.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            ProductionField::Date => push_date_char(&mut self.date, ch),
            ProductionField::Morning => push_quantity_char(&mut self.morning, ch),
            ProductionField::Afternoon => push_quantity_char(&mut self.afternoon, ch),
        }
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            ProductionField::Date => {
                self.date.pop();
            }
            ProductionField::Morning => {
                self.morning.pop();
            }
            ProductionField::Afternoon => {
                self.afternoon.pop();
            }
        }
    }

    /// Required fields present: a date plus at least one milking volume.
    /// While this is false the submit key is simply ignored.
    pub(crate) fn is_submittable(&self) -> bool {
        !self.date.trim().is_empty()
            && (!self.morning.trim().is_empty() || !self.afternoon.trim().is_empty())
    }

    /// The running "Total do Dia" preview while the user types. Unparseable
    /// partial input counts as zero by policy.
    pub(crate) fn live_total(&self) -> f64 {
        parse_quantity(&self.morning) + parse_quantity(&self.afternoon)
    }

    /// Validate the inputs and return typed values ready for the store.
    pub(crate) fn parse_inputs(&self) -> Result<(NaiveDate, f64, f64)> {
        let date = parse_date(&self.date)?;
        Ok((
            date,
            parse_quantity(&self.morning),
            parse_quantity(&self.afternoon),
        ))
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field_name: &str, field: ProductionField) -> Line<'static> {
        let (value, placeholder) = match field {
            ProductionField::Date => (&self.date, "<AAAA-MM-DD>"),
            ProductionField::Morning => (&self.morning, "0"),
            ProductionField::Afternoon => (&self.afternoon, "0"),
        };
        field_line(field_name, value, placeholder, self.active == field)
    }

    /// Return the character count for the requested field.
    pub(crate) fn value_len(&self, field: ProductionField) -> usize {
        match field {
            ProductionField::Date => self.date.chars().count(),
            ProductionField::Morning => self.morning.chars().count(),
            ProductionField::Afternoon => self.afternoon.chars().count(),
        }
    }
}

/// Fields available within the animal form.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum AnimalField {
    #[default]
    Name,
    Kind,
    Sex,
    BirthDate,
    MotherName,
}

/// Form state for registering an animal. Kind and sex are cycled selects
/// rather than free text so only valid variants can ever be submitted.
#[derive(Default, Clone)]
pub(crate) struct AnimalForm {
    pub(crate) name: String,
    pub(crate) kind: Option<AnimalKind>,
    pub(crate) sex: Option<Sex>,
    pub(crate) birth_date: String,
    pub(crate) mother_name: String,
    pub(crate) active: AnimalField,
    pub(crate) error: Option<String>,
}

impl AnimalForm {
    /// Seed the birth date with today, the most common case for newborn
    /// calves being registered on the day.
    pub(crate) fn for_today(today: NaiveDate) -> Self {
        Self {
            birth_date: today.format("%Y-%m-%d").to_string(),
            ..Self::default()
        }
    }

    /// Cycle focus across the five fields.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            AnimalField::Name => AnimalField::Kind,
            AnimalField::Kind => AnimalField::Sex,
            AnimalField::Sex => AnimalField::BirthDate,
            AnimalField::BirthDate => AnimalField::MotherName,
            AnimalField::MotherName => AnimalField::Name,
        };
    }

    /// Whether the active field is one of the cycled selects.
    pub(crate) fn on_select_field(&self) -> bool {
        matches!(self.active, AnimalField::Kind | AnimalField::Sex)
    }

    /// Advance the active select through its variants, wrapping at the ends.
    /// No-op on text fields.
    pub(crate) fn cycle_selection(&mut self, offset: isize) {
        fn advance<T: Copy + PartialEq>(current: Option<T>, all: &[T], offset: isize) -> Option<T> {
            let len = all.len() as isize;
            let position = current
                .and_then(|value| all.iter().position(|v| *v == value))
                .map(|idx| idx as isize)
                .unwrap_or(-1);
            let next = if position < 0 && offset < 0 {
                len - 1
            } else {
                (position + offset).rem_euclid(len)
            };
            Some(all[next as usize])
        }

        match self.active {
            AnimalField::Kind => self.kind = advance(self.kind, &AnimalKind::ALL, offset),
            AnimalField::Sex => self.sex = advance(self.sex, &Sex::ALL, offset),
            _ => {}
        }
    }

    /// Append a character to the active text field. Select fields reject
    /// typed characters entirely.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            AnimalField::Name => {
                if !ch.is_control() {
                    self.name.push(ch);
                    true
                } else {
                    false
                }
            }
            AnimalField::BirthDate => push_date_char(&mut self.birth_date, ch),
            AnimalField::MotherName => {
                if !ch.is_control() {
                    self.mother_name.push(ch);
                    true
                } else {
                    false
                }
            }
            AnimalField::Kind | AnimalField::Sex => false,
        }
    }

    /// Remove a character from the active text field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            AnimalField::Name => {
                self.name.pop();
            }
            AnimalField::BirthDate => {
                self.birth_date.pop();
            }
            AnimalField::MotherName => {
                self.mother_name.pop();
            }
            AnimalField::Kind | AnimalField::Sex => {}
        }
    }

    /// Required fields present: name, kind, sex, and a birth date. The
    /// mother's name stays optional.
    pub(crate) fn is_submittable(&self) -> bool {
        !self.name.trim().is_empty()
            && self.kind.is_some()
            && self.sex.is_some()
            && !self.birth_date.trim().is_empty()
    }

    /// Validate and normalize form inputs before the record is built.
    #[allow(clippy::type_complexity)]
    pub(crate) fn parse_inputs(
        &self,
    ) -> Result<(String, AnimalKind, Sex, NaiveDate, Option<String>)> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(anyhow!("Nome do animal é obrigatório."));
        }
        let kind = self.kind.ok_or_else(|| anyhow!("Tipo é obrigatório."))?;
        let sex = self.sex.ok_or_else(|| anyhow!("Sexo é obrigatório."))?;
        let birth_date = parse_date(&self.birth_date)?;

        let mother = self.mother_name.trim();
        let mother_name = if mother.is_empty() {
            None
        } else {
            Some(mother.to_string())
        };

        Ok((name.to_string(), kind, sex, birth_date, mother_name))
    }

    /// Render a single line for the form widget. Select fields show their
    /// current variant with cycle arrows when focused.
    pub(crate) fn build_line(&self, field_name: &str, field: AnimalField) -> Line<'static> {
        let is_active = self.active == field;
        match field {
            AnimalField::Name => field_line(field_name, &self.name, "<obrigatório>", is_active),
            AnimalField::BirthDate => {
                field_line(field_name, &self.birth_date, "<AAAA-MM-DD>", is_active)
            }
            AnimalField::MotherName => {
                field_line(field_name, &self.mother_name, "<opcional>", is_active)
            }
            AnimalField::Kind => {
                let value = self.kind.map(|k| k.label().to_string()).unwrap_or_default();
                Self::select_line(field_name, value, is_active)
            }
            AnimalField::Sex => {
                let value = self.sex.map(|s| s.label().to_string()).unwrap_or_default();
                Self::select_line(field_name, value, is_active)
            }
        }
    }

    fn select_line(field_name: &str, value: String, is_active: bool) -> Line<'static> {
        if value.is_empty() {
            return field_line(field_name, "", "<selecione>", is_active);
        }
        let display = if is_active {
            format!("‹ {value} ›")
        } else {
            value
        };
        field_line(field_name, &display, "", is_active)
    }

    /// Character length of the requested field, used for cursor placement on
    /// text fields.
    pub(crate) fn value_len(&self, field: AnimalField) -> usize {
        match field {
            AnimalField::Name => self.name.chars().count(),
            AnimalField::BirthDate => self.birth_date.chars().count(),
            AnimalField::MotherName => self.mother_name.chars().count(),
            AnimalField::Kind | AnimalField::Sex => 0,
        }
    }
}

/// Fields available within the revenue form.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum RevenueField {
    #[default]
    Period,
    Liters,
    Price,
}

/// Form state for saving a revenue calculation. The price field comes
/// pre-filled with the current price so a quick calculation only needs a
/// period and a volume.
#[derive(Default, Clone)]
pub(crate) struct RevenueForm {
    pub(crate) period: String,
    pub(crate) total_liters: String,
    pub(crate) price_per_liter: String,
    pub(crate) active: RevenueField,
    pub(crate) error: Option<String>,
}

impl RevenueForm {
    /// Seed the form with the current per-liter price.
    pub(crate) fn with_price(price: f64) -> Self {
        Self {
            price_per_liter: format!("{price:.2}"),
            ..Self::default()
        }
    }

    /// Cycle focus across the three fields.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            RevenueField::Period => RevenueField::Liters,
            RevenueField::Liters => RevenueField::Price,
            RevenueField::Price => RevenueField::Period,
        };
    }

    /// Append a character to the active field, validating allowed input.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            RevenueField::Period => {
                if !ch.is_control() {
                    self.period.push(ch);
                    true
                } else {
                    false
                }
            }
            RevenueField::Liters => push_quantity_char(&mut self.total_liters, ch),
            RevenueField::Price => push_quantity_char(&mut self.price_per_liter, ch),
        }
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            RevenueField::Period => {
                self.period.pop();
            }
            RevenueField::Liters => {
                self.total_liters.pop();
            }
            RevenueField::Price => {
                self.price_per_liter.pop();
            }
        }
    }

    /// Required fields present: period label, volume, and price.
    pub(crate) fn is_submittable(&self) -> bool {
        !self.period.trim().is_empty()
            && !self.total_liters.trim().is_empty()
            && !self.price_per_liter.trim().is_empty()
    }

    /// The live "Receita Calculada" preview: volume times price with the
    /// usual clamp-to-zero reading of partial input.
    pub(crate) fn live_revenue(&self) -> f64 {
        parse_quantity(&self.total_liters) * parse_quantity(&self.price_per_liter)
    }

    /// Validate the inputs and return typed values ready for the store.
    pub(crate) fn parse_inputs(&self) -> Result<(String, f64, f64)> {
        let period = self.period.trim();
        if period.is_empty() {
            return Err(anyhow!("Período é obrigatório."));
        }
        Ok((
            period.to_string(),
            parse_quantity(&self.total_liters),
            parse_quantity(&self.price_per_liter),
        ))
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field_name: &str, field: RevenueField) -> Line<'static> {
        let (value, placeholder) = match field {
            RevenueField::Period => (&self.period, "<ex: Fevereiro 2024>"),
            RevenueField::Liters => (&self.total_liters, "0"),
            RevenueField::Price => (&self.price_per_liter, "1.50"),
        };
        field_line(field_name, value, placeholder, self.active == field)
    }

    /// Return the character count for the requested field.
    pub(crate) fn value_len(&self, field: RevenueField) -> usize {
        match field {
            RevenueField::Period => self.period.chars().count(),
            RevenueField::Liters => self.total_liters.chars().count(),
            RevenueField::Price => self.price_per_liter.chars().count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_form_walks_empty_partial_submittable() {
        let mut form = ProductionForm::default();
        assert!(!form.is_submittable());

        for ch in "2024-01-30".chars() {
            form.push_char(ch);
        }
        // Date alone is still Partial.
        assert!(!form.is_submittable());

        form.toggle_field();
        form.push_char('1');
        form.push_char('2');
        form.push_char('0');
        assert!(form.is_submittable());

        let (date, morning, afternoon) = form.parse_inputs().unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 30).unwrap());
        assert_eq!(morning, 120.0);
        assert_eq!(afternoon, 0.0);
    }

    #[test]
    fn one_milking_volume_is_enough_to_submit() {
        let mut form = ProductionForm::for_today(NaiveDate::from_ymd_opt(2024, 1, 30).unwrap());
        form.active = ProductionField::Afternoon;
        form.push_char('9');
        form.push_char('5');
        assert!(form.is_submittable());
    }

    #[test]
    fn quantity_fields_reject_letters_and_second_decimal_point() {
        let mut form = ProductionForm::default();
        form.active = ProductionField::Morning;
        assert!(form.push_char('1'));
        assert!(form.push_char('.'));
        assert!(!form.push_char('.'));
        assert!(!form.push_char('x'));
        assert_eq!(form.morning, "1.");
    }

    #[test]
    fn production_form_rejects_malformed_date_at_submit() {
        let mut form = ProductionForm::default();
        form.date = "2024-13".to_string();
        form.morning = "120".to_string();
        assert!(form.is_submittable());
        assert!(form.parse_inputs().is_err());
    }

    #[test]
    fn animal_form_requires_both_selects() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 30).unwrap();
        let mut form = AnimalForm::for_today(today);
        for ch in "Pequenina".chars() {
            form.push_char(ch);
        }
        assert!(!form.is_submittable());

        form.active = AnimalField::Kind;
        form.cycle_selection(1); // Vaca
        assert!(!form.is_submittable());

        form.active = AnimalField::Sex;
        form.cycle_selection(-1); // wraps to Fêmea
        assert!(form.is_submittable());

        let (name, kind, sex, birth, mother) = form.parse_inputs().unwrap();
        assert_eq!(name, "Pequenina");
        assert_eq!(kind, AnimalKind::Cow);
        assert_eq!(sex, Sex::Female);
        assert_eq!(birth, today);
        assert_eq!(mother, None);
    }

    #[test]
    fn animal_form_keeps_mother_name_verbatim() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 30).unwrap();
        let mut form = AnimalForm::for_today(today);
        form.name = "Pequenina".to_string();
        form.kind = Some(AnimalKind::FemaleCalf);
        form.sex = Some(Sex::Female);
        form.mother_name = " Mimosa ".to_string();

        let (_, _, _, _, mother) = form.parse_inputs().unwrap();
        assert_eq!(mother.as_deref(), Some("Mimosa"));
    }

    #[test]
    fn select_fields_ignore_typed_characters() {
        let mut form = AnimalForm::default();
        form.active = AnimalField::Kind;
        assert!(!form.push_char('v'));
        assert!(form.kind.is_none());
    }

    #[test]
    fn revenue_form_needs_all_three_fields() {
        let mut form = RevenueForm::with_price(1.50);
        assert!(!form.is_submittable());

        form.active = RevenueField::Liters;
        for ch in "7200".chars() {
            form.push_char(ch);
        }
        assert!(!form.is_submittable());

        form.active = RevenueField::Period;
        for ch in "Fevereiro 2024".chars() {
            form.push_char(ch);
        }
        assert!(form.is_submittable());
        assert_eq!(form.live_revenue(), 10_800.0);

        let (period, liters, price) = form.parse_inputs().unwrap();
        assert_eq!(period, "Fevereiro 2024");
        assert_eq!(liters, 7200.0);
        assert_eq!(price, 1.5);
    }

    #[test]
    fn live_previews_clamp_unparsed_input_to_zero() {
        let mut production = ProductionForm::default();
        production.morning = "12".to_string();
        production.afternoon = ".".to_string();
        assert_eq!(production.live_total(), 12.0);

        let mut revenue = RevenueForm::default();
        revenue.total_liters = "100".to_string();
        revenue.price_per_liter = String::new();
        assert_eq!(revenue.live_revenue(), 0.0);
    }
}
