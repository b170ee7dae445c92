use std::mem;

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::metrics::{
    age_from_birth_date, average_over_window, filter_by_predicate, herd_stats,
    revenue_projection, total_over_window,
};
use crate::models::{Animal, AnimalKind, ProductionRecord, RevenueCalculation, Sex};
use crate::store::Stores;

use super::forms::{AnimalField, AnimalForm, ProductionField, ProductionForm, RevenueField, RevenueForm};
use super::helpers::{centered_rect, format_currency, format_date, format_liters, surface_error};
use super::screens::{ListCursor, SupportScreen, CONTACTS, FAQS, GETTING_STARTED, TUTORIALS};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height of the navigation tab bar.
const TAB_HEIGHT: u16 = 3;
/// Rolling window for the weekly production summary, in records. The stores
/// keep one record per day in practice, so seven records read as one week.
const PRODUCTION_WINDOW: usize = 7;
/// How many entries the "recent" side panels show.
const RECENT_LIMIT: usize = 5;
/// Per-liter price assumed before any calculation has been saved.
const DEFAULT_PRICE: f64 = 1.50;
/// Daily volumes offered by the quick projection panel.
const PROJECTION_VOLUMES: [f64; 4] = [200.0, 250.0, 300.0, 350.0];
/// Price ladder for the side-by-side comparison panel.
const COMPARISON_PRICES: [f64; 5] = [1.30, 1.40, 1.50, 1.60, 1.70];
/// Days assumed per billing month in projections.
const DAYS_PER_BILLING_MONTH: f64 = 30.0;

/// Navigation labels in tab order.
const VIEW_LABELS: [&str; 5] = [
    "Painel",
    "Produção Leiteira",
    "Rebanho",
    "Receitas",
    "Suporte",
];
const VIEW_COUNT: usize = VIEW_LABELS.len();

/// High-level navigation states. Keeping this explicit makes it easy to
/// reason about which rendering path runs and what keyboard shortcuts do.
enum Screen {
    Dashboard,
    Production(ListCursor),
    Livestock(ListCursor),
    Revenue(ListCursor),
    Support(SupportScreen),
}

/// Modal form state layered over the current screen. While a form is open
/// all keys feed the form; `Normal` routes them to navigation instead.
enum Mode {
    Normal,
    AddingProduction(ProductionForm),
    AddingAnimal(AnimalForm),
    AddingRevenue(RevenueForm),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI. Owns the session stores
/// and the date the session started on; every derived figure on screen is
/// recomputed from the stores during [`Self::draw`].
pub struct App {
    stores: Stores,
    today: NaiveDate,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(stores: Stores, today: NaiveDate) -> Self {
        Self {
            stores,
            today,
            screen: Screen::Dashboard,
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingProduction(form) => self.handle_add_production(code, form)?,
            Mode::AddingAnimal(form) => self.handle_add_animal(code, form)?,
            Mode::AddingRevenue(form) => self.handle_add_revenue(code, form)?,
        };

        self.mode = mode;
        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') => {
                *exit = true;
                return Ok(Mode::Normal);
            }
            KeyCode::Char(ch @ '1'..='5') => {
                self.clear_status();
                self.switch_to(ch as usize - '1' as usize);
                return Ok(Mode::Normal);
            }
            KeyCode::Tab => {
                self.clear_status();
                self.switch_to((self.view_index() + 1) % VIEW_COUNT);
                return Ok(Mode::Normal);
            }
            KeyCode::BackTab => {
                self.clear_status();
                self.switch_to((self.view_index() + VIEW_COUNT - 1) % VIEW_COUNT);
                return Ok(Mode::Normal);
            }
            KeyCode::Esc => {
                if matches!(self.screen, Screen::Dashboard) {
                    *exit = true;
                } else {
                    self.clear_status();
                    self.switch_to(0);
                }
                return Ok(Mode::Normal);
            }
            KeyCode::Char('+') => return Ok(self.open_add_form()),
            _ => {}
        }

        let mut status_to_set: Option<(String, StatusKind)> = None;

        match &mut self.screen {
            Screen::Dashboard => {}
            Screen::Production(cursor) => {
                let len = self.stores.production.len();
                move_cursor(cursor, code, len);
            }
            Screen::Livestock(cursor) => {
                let len = self.stores.herd.len();
                move_cursor(cursor, code, len);
            }
            Screen::Revenue(cursor) => {
                let len = self.stores.revenue.len();
                move_cursor(cursor, code, len);
            }
            Screen::Support(support) => match code {
                KeyCode::Up => support.contact.move_selection(-1, CONTACTS.len()),
                KeyCode::Down => support.contact.move_selection(1, CONTACTS.len()),
                KeyCode::PageUp => support.scroll_by(-3),
                KeyCode::PageDown => support.scroll_by(3),
                KeyCode::Enter => {
                    let contact = support.current_contact();
                    match open_link(contact.target) {
                        Ok(()) => {
                            status_to_set =
                                Some((format!("Abrindo {}.", contact.label), StatusKind::Info));
                        }
                        Err(err) => {
                            status_to_set = Some((
                                format!("Falha ao abrir contato: {err}"),
                                StatusKind::Error,
                            ));
                        }
                    }
                }
                _ => {}
            },
        }

        if let Some((text, kind)) = status_to_set {
            self.set_status(text, kind);
        }

        Ok(Mode::Normal)
    }

    /// Open the add form of the current view. Views without an add action
    /// surface an error status instead.
    fn open_add_form(&mut self) -> Mode {
        self.clear_status();
        match self.screen {
            Screen::Production(_) => Mode::AddingProduction(ProductionForm::for_today(self.today)),
            Screen::Livestock(_) => Mode::AddingAnimal(AnimalForm::for_today(self.today)),
            Screen::Revenue(_) => Mode::AddingRevenue(RevenueForm::with_price(self.current_price())),
            Screen::Dashboard | Screen::Support(_) => {
                self.set_status("Nada para adicionar nesta tela.", StatusKind::Error);
                Mode::Normal
            }
        }
    }

    fn handle_add_production(&mut self, code: KeyCode, mut form: ProductionForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Registro cancelado.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                // The submit control stays inert until required fields exist;
                // no error is shown for an incomplete form.
                if !form.is_submittable() {
                    return Ok(Mode::AddingProduction(form));
                }
                match form.parse_inputs() {
                    Ok((date, morning, afternoon)) => {
                        self.register_production(date, morning, afternoon);
                        return Ok(Mode::Normal);
                    }
                    Err(err) => {
                        let message = surface_error(&err);
                        form.error = Some(message.clone());
                        self.set_status(message, StatusKind::Error);
                    }
                }
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Ok(Mode::AddingProduction(form))
    }

    fn handle_add_animal(&mut self, code: KeyCode, mut form: AnimalForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Cadastro cancelado.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Left => form.cycle_selection(-1),
            KeyCode::Right => form.cycle_selection(1),
            KeyCode::Char(' ') if form.on_select_field() => form.cycle_selection(1),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                if !form.is_submittable() {
                    return Ok(Mode::AddingAnimal(form));
                }
                match form.parse_inputs() {
                    Ok((name, kind, sex, birth_date, mother_name)) => {
                        self.register_animal(name, kind, sex, birth_date, mother_name);
                        return Ok(Mode::Normal);
                    }
                    Err(err) => {
                        let message = surface_error(&err);
                        form.error = Some(message.clone());
                        self.set_status(message, StatusKind::Error);
                    }
                }
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Ok(Mode::AddingAnimal(form))
    }

    fn handle_add_revenue(&mut self, code: KeyCode, mut form: RevenueForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Cálculo cancelado.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                if !form.is_submittable() {
                    return Ok(Mode::AddingRevenue(form));
                }
                match form.parse_inputs() {
                    Ok((period, total_liters, price_per_liter)) => {
                        self.register_revenue(period, total_liters, price_per_liter);
                        return Ok(Mode::Normal);
                    }
                    Err(err) => {
                        let message = surface_error(&err);
                        form.error = Some(message.clone());
                        self.set_status(message, StatusKind::Error);
                    }
                }
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Ok(Mode::AddingRevenue(form))
    }

    fn register_production(&mut self, date: NaiveDate, morning: f64, afternoon: f64) {
        let id = self.stores.production.alloc_id();
        let record = ProductionRecord::new(id, date, morning, afternoon);
        log::debug!("production registered for {}: {} L", record.date, record.total);
        self.set_status(
            format!(
                "Produção de {} registrada: {}.",
                format_date(date),
                format_liters(record.total)
            ),
            StatusKind::Info,
        );
        self.stores.production.append(record);
        if let Screen::Production(cursor) = &mut self.screen {
            cursor.ensure_in_bounds(self.stores.production.len());
        }
    }

    fn register_animal(
        &mut self,
        name: String,
        kind: AnimalKind,
        sex: Sex,
        birth_date: NaiveDate,
        mother_name: Option<String>,
    ) {
        let id = self.stores.herd.alloc_id();
        // The age string is a snapshot of the session date; it is stored on
        // the record and not re-derived on later renders.
        let age = age_from_birth_date(birth_date, self.today);
        let animal = Animal {
            id,
            name,
            kind,
            sex,
            birth_date,
            mother_name,
            age,
        };
        log::debug!("animal registered: {} ({})", animal.name, animal.kind);
        self.set_status(
            format!("{} adicionado ao rebanho.", animal.name),
            StatusKind::Info,
        );
        self.stores.herd.append(animal);
        if let Screen::Livestock(cursor) = &mut self.screen {
            cursor.ensure_in_bounds(self.stores.herd.len());
        }
    }

    fn register_revenue(&mut self, period: String, total_liters: f64, price_per_liter: f64) {
        let id = self.stores.revenue.alloc_id();
        let calc = RevenueCalculation::new(id, period, total_liters, price_per_liter, self.today);
        log::debug!(
            "revenue calculation saved for '{}': {}",
            calc.period,
            calc.total_revenue
        );
        self.set_status(
            format!(
                "Cálculo de {} salvo: {}.",
                calc.period,
                format_currency(calc.total_revenue)
            ),
            StatusKind::Info,
        );
        self.stores.revenue.append(calc);
        if let Screen::Revenue(cursor) = &mut self.screen {
            cursor.ensure_in_bounds(self.stores.revenue.len());
        }
    }

    /// The per-liter price currently in effect: the newest saved calculation
    /// wins, with a product default before any exists.
    fn current_price(&self) -> f64 {
        self.stores
            .revenue
            .latest()
            .map(|calc| calc.price_per_liter)
            .unwrap_or(DEFAULT_PRICE)
    }

    fn view_index(&self) -> usize {
        match self.screen {
            Screen::Dashboard => 0,
            Screen::Production(_) => 1,
            Screen::Livestock(_) => 2,
            Screen::Revenue(_) => 3,
            Screen::Support(_) => 4,
        }
    }

    /// Replace the active screen with a fresh instance of the requested view.
    /// Selection state deliberately resets on navigation.
    fn switch_to(&mut self, index: usize) {
        self.screen = match index {
            1 => Screen::Production(ListCursor::new()),
            2 => Screen::Livestock(ListCursor::new()),
            3 => Screen::Revenue(ListCursor::new()),
            4 => Screen::Support(SupportScreen::new()),
            _ => Screen::Dashboard,
        };
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(TAB_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(frame.area());

        self.draw_tabs(frame, chunks[0]);
        match &self.screen {
            Screen::Dashboard => self.draw_dashboard(frame, chunks[1]),
            Screen::Production(cursor) => self.draw_production(frame, chunks[1], cursor),
            Screen::Livestock(cursor) => self.draw_livestock(frame, chunks[1], cursor),
            Screen::Revenue(cursor) => self.draw_revenue(frame, chunks[1], cursor),
            Screen::Support(support) => self.draw_support(frame, chunks[1], support),
        }
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::Normal => {}
            Mode::AddingProduction(form) => self.draw_production_form(frame, chunks[1], form),
            Mode::AddingAnimal(form) => self.draw_animal_form(frame, chunks[1], form),
            Mode::AddingRevenue(form) => self.draw_revenue_form(frame, chunks[1], form),
        }
    }

    fn draw_tabs(&self, frame: &mut Frame, area: Rect) {
        let active = self.view_index();
        let mut spans = vec![Span::styled(
            " FarManage ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )];
        for (idx, label) in VIEW_LABELS.iter().enumerate() {
            spans.push(Span::raw("  "));
            let style = if idx == active {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(format!("[{}] {label}", idx + 1), style));
        }

        let paragraph =
            Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(paragraph, area);
    }

    fn draw_dashboard(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);

        let cards = split_columns(rows[0], 4);
        let latest_production = self
            .stores
            .production
            .latest()
            .map(|record| format_liters(record.total))
            .unwrap_or_else(|| "—".to_string());
        let herd = herd_stats(self.stores.herd.records());
        let monthly_average =
            average_over_window(self.stores.revenue.records(), self.stores.revenue.len());

        draw_stat_card(frame, cards[0], "Produção Recente", latest_production);
        draw_stat_card(frame, cards[1], "Total do Rebanho", herd.total.to_string());
        draw_stat_card(frame, cards[2], "Média Mensal", format_currency(monthly_average));
        draw_stat_card(frame, cards[3], "Hoje", format_date(self.today));

        let panels = split_columns(rows[1], 2);

        let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let actions = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("[2]", key_style),
                Span::raw(" Registrar Produção de Leite"),
            ]),
            Line::from(vec![
                Span::styled("[3]", key_style),
                Span::raw(" Adicionar Animal ao Rebanho"),
            ]),
            Line::from(vec![
                Span::styled("[4]", key_style),
                Span::raw(" Calcular Receitas"),
            ]),
            Line::from(vec![
                Span::styled("[5]", key_style),
                Span::raw(" Central de Suporte"),
            ]),
        ];
        let actions = Paragraph::new(actions)
            .block(Block::default().borders(Borders::ALL).title("Ações Rápidas"));
        frame.render_widget(actions, panels[0]);

        let production = self.stores.production.records();
        let week_total = total_over_window(production, PRODUCTION_WINDOW);
        let week_average = average_over_window(production, PRODUCTION_WINDOW);
        let week_revenue = week_total * self.current_price();
        let calves = filter_by_predicate(self.stores.herd.records(), |a| a.kind.is_calf()).count();

        let label = Style::default().fg(Color::Gray);
        let summary = vec![
            Line::from(""),
            summary_line("Produção Total", format_liters(week_total), label),
            summary_line("Média Diária", format_liters(week_average), label),
            summary_line("Receita Estimada", format_currency(week_revenue), label),
            summary_line("Filhotes no Rebanho", calves.to_string(), label),
        ];
        let summary = Paragraph::new(summary).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Resumo da Semana"),
        );
        frame.render_widget(summary, panels[1]);
    }

    fn draw_production(&self, frame: &mut Frame, area: Rect, cursor: &ListCursor) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);

        let records = self.stores.production.records();
        let cards = split_columns(rows[0], 2);
        draw_stat_card(
            frame,
            cards[0],
            "Total da Semana",
            format_liters(total_over_window(records, PRODUCTION_WINDOW)),
        );
        draw_stat_card(
            frame,
            cards[1],
            "Média Diária",
            format_liters(average_over_window(records, PRODUCTION_WINDOW)),
        );

        let panels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[1]);

        if records.is_empty() {
            let message = Paragraph::new("Nenhum registro ainda. Pressione '+' para registrar.")
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Histórico de Produção"),
                );
            frame.render_widget(message, panels[0]);
        } else {
            let items: Vec<ListItem> = records
                .iter()
                .map(|record| {
                    ListItem::new(format!(
                        "{}  {}  = {}",
                        format_date(record.date),
                        record.breakdown(),
                        format_liters(record.total)
                    ))
                })
                .collect();
            render_selectable_list(
                frame,
                panels[0],
                "Histórico de Produção",
                items,
                cursor.selected,
            );
        }

        let recent: Vec<Line> = records
            .iter()
            .take(RECENT_LIMIT)
            .map(|record| {
                Line::from(vec![
                    Span::raw(format!("{} — ", format_date(record.date))),
                    Span::styled(
                        format_liters(record.total),
                        Style::default().fg(Color::Green),
                    ),
                    Span::styled(
                        format!(" ({})", record.breakdown()),
                        Style::default().fg(Color::Gray),
                    ),
                ])
            })
            .collect();
        let recent = Paragraph::new(recent).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Últimos Registros"),
        );
        frame.render_widget(recent, panels[1]);
    }

    fn draw_livestock(&self, frame: &mut Frame, area: Rect, cursor: &ListCursor) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);

        let animals = self.stores.herd.records();
        let stats = herd_stats(animals);
        let cards = split_columns(rows[0], 4);
        draw_stat_card(frame, cards[0], "Total de Animais", stats.total.to_string());
        draw_stat_card(frame, cards[1], "Vacas", stats.cows.to_string());
        draw_stat_card(frame, cards[2], "Touros", stats.bulls.to_string());
        draw_stat_card(frame, cards[3], "Filhotes", stats.calves.to_string());

        let panels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[1]);

        if animals.is_empty() {
            let message = Paragraph::new("Nenhum animal cadastrado. Pressione '+' para adicionar.")
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Rebanho Completo"),
                );
            frame.render_widget(message, panels[0]);
        } else {
            let items: Vec<ListItem> = animals
                .iter()
                .map(|animal| {
                    let mut subtitle = format!("{} • {}", animal.describe(), animal.age);
                    if let Some(mother) = &animal.mother_name {
                        subtitle.push_str(&format!(" • Mãe: {mother}"));
                    }
                    ListItem::new(vec![
                        Line::from(vec![
                            Span::styled(
                                animal.name.clone(),
                                Style::default().add_modifier(Modifier::BOLD),
                            ),
                            Span::raw(format!(" {}", animal.sex.symbol())),
                        ]),
                        Line::from(Span::styled(subtitle, Style::default().fg(Color::Gray))),
                    ])
                })
                .collect();
            render_selectable_list(frame, panels[0], "Rebanho Completo", items, cursor.selected);
        }

        // Recomputed from the live store each frame, so a freshly registered
        // calf appears immediately.
        let births: Vec<&Animal> = filter_by_predicate(animals, |a| a.kind.is_calf())
            .take(RECENT_LIMIT)
            .collect();
        let lines: Vec<Line> = if births.is_empty() {
            vec![Line::from(Span::styled(
                "Nenhum nascimento registrado.",
                Style::default().fg(Color::Gray),
            ))]
        } else {
            births
                .iter()
                .map(|calf| {
                    let lineage = match &calf.mother_name {
                        Some(mother) => format!("Filhote de {mother} • {}", calf.age),
                        None => calf.age.clone(),
                    };
                    Line::from(vec![
                        Span::styled(
                            calf.name.clone(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(format!(" {} — ", calf.sex.symbol())),
                        Span::styled(lineage, Style::default().fg(Color::Gray)),
                    ])
                })
                .collect()
        };
        let births = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Nascimentos Recentes"),
        );
        frame.render_widget(births, panels[1]);
    }

    fn draw_revenue(&self, frame: &mut Frame, area: Rect, cursor: &ListCursor) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(7),
                Constraint::Min(0),
            ])
            .split(area);

        let calculations = self.stores.revenue.records();
        let price = self.current_price();
        let year = self.today.year();
        let year_total: f64 = filter_by_predicate(calculations, |calc| calc.date.year() == year)
            .map(|calc| calc.total_revenue)
            .sum();
        let monthly_average = average_over_window(calculations, calculations.len());

        let cards = split_columns(rows[0], 3);
        draw_stat_card(
            frame,
            cards[0],
            &format!("Receita Total ({year})"),
            format_currency(year_total),
        );
        draw_stat_card(frame, cards[1], "Média Mensal", format_currency(monthly_average));
        draw_stat_card(frame, cards[2], "Preço Atual/L", format_currency(price));

        let panels = split_columns(rows[1], 2);

        let mut projections = vec![Line::from(Span::styled(
            format!("Projeções com preço atual ({}/L)", format_currency(price)),
            Style::default().fg(Color::Gray),
        ))];
        for volume in PROJECTION_VOLUMES {
            let projected = revenue_projection(volume, price, DAYS_PER_BILLING_MONTH);
            projections.push(Line::from(vec![
                Span::raw(format!("{volume:>4.0} L/dia → ")),
                Span::styled(
                    format!("{}/mês", format_currency(projected)),
                    Style::default().fg(Color::Green),
                ),
            ]));
        }
        let projections = Paragraph::new(projections).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Simulações Rápidas"),
        );
        frame.render_widget(projections, panels[0]);

        let comparison: Vec<Line> = match self.stores.revenue.latest() {
            Some(latest) => {
                let mut lines = vec![Line::from(Span::styled(
                    format!("Para {} do último período", format_liters(latest.total_liters)),
                    Style::default().fg(Color::Gray),
                ))];
                for price in COMPARISON_PRICES {
                    lines.push(Line::from(vec![
                        Span::raw(format!("R$ {price:.2}/L → ")),
                        Span::styled(
                            format_currency(latest.total_liters * price),
                            Style::default().fg(Color::Green),
                        ),
                    ]));
                }
                lines
            }
            None => vec![Line::from(Span::styled(
                "Salve um cálculo para comparar preços.",
                Style::default().fg(Color::Gray),
            ))],
        };
        let comparison = Paragraph::new(comparison).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Comparação de Preços"),
        );
        frame.render_widget(comparison, panels[1]);

        if calculations.is_empty() {
            let message = Paragraph::new("Nenhum cálculo salvo. Pressione '+' para calcular.")
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Histórico de Receitas"),
                );
            frame.render_widget(message, rows[2]);
        } else {
            let items: Vec<ListItem> = calculations
                .iter()
                .map(|calc| {
                    ListItem::new(format!(
                        "{}  {} × {} = {}",
                        calc.period,
                        format_liters(calc.total_liters),
                        format_currency(calc.price_per_liter),
                        format_currency(calc.total_revenue)
                    ))
                })
                .collect();
            render_selectable_list(
                frame,
                rows[2],
                "Histórico de Receitas",
                items,
                cursor.selected,
            );
        }
    }

    fn draw_support(&self, frame: &mut Frame, area: Rect, support: &SupportScreen) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(CONTACTS.len() as u16 + 2),
            ])
            .split(area);

        let title_style = Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD);
        let dim = Style::default().fg(Color::Gray);

        let mut lines = vec![
            Line::from(Span::styled("Central de Suporte FarManage", title_style)),
            Line::from(Span::styled(
                "Encontre tutoriais, guias e respostas para suas dúvidas sobre o sistema",
                dim,
            )),
            Line::from(""),
            Line::from(Span::styled("Tutoriais e Guias", title_style)),
        ];
        for tutorial in TUTORIALS {
            lines.push(Line::from(format!(
                "• {} ({})",
                tutorial.title, tutorial.duration
            )));
            lines.push(Line::from(Span::styled(
                format!("  {}", tutorial.description),
                dim,
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Perguntas Frequentes", title_style)));
        for faq in FAQS {
            lines.push(Line::from(format!("P: {}", faq.question)));
            lines.push(Line::from(Span::styled(format!("R: {}", faq.answer), dim)));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Primeiros Passos", title_style)));
        for (step, (title, description)) in GETTING_STARTED.iter().enumerate() {
            lines.push(Line::from(format!("{}. {title}", step + 1)));
            lines.push(Line::from(Span::styled(format!("   {description}"), dim)));
        }

        let content = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((support.scroll, 0))
            .block(Block::default().borders(Borders::ALL).title("Suporte"));
        frame.render_widget(content, rows[0]);

        let items: Vec<ListItem> = CONTACTS
            .iter()
            .map(|contact| ListItem::new(contact.label))
            .collect();
        render_selectable_list(
            frame,
            rows[1],
            "Contato Direto",
            items,
            support.contact.selected,
        );
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match (&self.screen, &self.mode) {
            (_, Mode::AddingAnimal(_)) => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Campo   "),
                Span::styled("[Espaço/←→]", key_style),
                Span::raw(" Seleção   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Salvar   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancelar"),
            ]),
            (_, Mode::AddingProduction(_)) | (_, Mode::AddingRevenue(_)) => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Campo   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Salvar   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancelar"),
            ]),
            (Screen::Support(_), _) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Contato   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Abrir   "),
                Span::styled("[PgUp/PgDn]", key_style),
                Span::raw(" Rolar   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Painel   "),
                Span::styled("[q]", key_style),
                Span::raw(" Sair"),
            ]),
            (Screen::Dashboard, _) => Line::from(vec![
                Span::styled("[1-5]", key_style),
                Span::raw(" Telas   "),
                Span::styled("[Tab]", key_style),
                Span::raw(" Próxima   "),
                Span::styled("[q]", key_style),
                Span::raw(" Sair"),
            ]),
            _ => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Navegar   "),
                Span::styled("[+]", key_style),
                Span::raw(" Adicionar   "),
                Span::styled("[1-5]", key_style),
                Span::raw(" Telas   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Painel   "),
                Span::styled("[q]", key_style),
                Span::raw(" Sair"),
            ]),
        }
    }

    fn draw_production_form(&self, frame: &mut Frame, area: Rect, form: &ProductionForm) {
        let popup_area = centered_rect(60, 45, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Registrar Produção")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("Data", ProductionField::Date),
            form.build_line("Manhã (L)", ProductionField::Morning),
            form.build_line("Tarde (L)", ProductionField::Afternoon),
            Line::from(""),
            Line::from(vec![
                Span::raw("Total do Dia: "),
                Span::styled(
                    format_liters(form.live_total()),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
        ];
        lines.push(form_hint_line(
            form.error.as_deref(),
            form.is_submittable(),
            "Enter salva • Tab alterna campo • Esc cancela",
            "Preencha a data e ao menos um turno para salvar",
        ));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (label, row) = match form.active {
            ProductionField::Date => ("Data", 0),
            ProductionField::Morning => ("Manhã (L)", 1),
            ProductionField::Afternoon => ("Tarde (L)", 2),
        };
        set_field_cursor(frame, inner, label, form.value_len(form.active), row);
    }

    fn draw_animal_form(&self, frame: &mut Frame, area: Rect, form: &AnimalForm) {
        let popup_area = centered_rect(70, 55, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Adicionar Animal")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("Nome", AnimalField::Name),
            form.build_line("Tipo", AnimalField::Kind),
            form.build_line("Sexo", AnimalField::Sex),
            form.build_line("Nascimento", AnimalField::BirthDate),
            form.build_line("Nome da Mãe", AnimalField::MotherName),
            Line::from(""),
        ];
        lines.push(form_hint_line(
            form.error.as_deref(),
            form.is_submittable(),
            "Enter salva • Tab alterna campo • Espaço altera seleção • Esc cancela",
            "Preencha nome, tipo, sexo e nascimento para salvar",
        ));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        // Cursor only makes sense on the typed fields; the selects have no
        // insertion point.
        let cursor = match form.active {
            AnimalField::Name => Some(("Nome", 0)),
            AnimalField::BirthDate => Some(("Nascimento", 3)),
            AnimalField::MotherName => Some(("Nome da Mãe", 4)),
            AnimalField::Kind | AnimalField::Sex => None,
        };
        if let Some((label, row)) = cursor {
            set_field_cursor(frame, inner, label, form.value_len(form.active), row);
        }
    }

    fn draw_revenue_form(&self, frame: &mut Frame, area: Rect, form: &RevenueForm) {
        let popup_area = centered_rect(65, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Calculadora de Receitas")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("Período", RevenueField::Period),
            form.build_line("Total de Litros", RevenueField::Liters),
            form.build_line("Preço por Litro (R$)", RevenueField::Price),
            Line::from(""),
            Line::from(vec![
                Span::raw("Receita Calculada: "),
                Span::styled(
                    format_currency(form.live_revenue()),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];
        if !form.total_liters.trim().is_empty() {
            lines.push(Line::from(Span::styled(
                format!(
                    "{} L × R$ {}",
                    form.total_liters.trim(),
                    form.price_per_liter.trim()
                ),
                Style::default().fg(Color::Gray),
            )));
        }
        lines.push(Line::from(""));
        lines.push(form_hint_line(
            form.error.as_deref(),
            form.is_submittable(),
            "Enter salva • Tab alterna campo • Esc cancela",
            "Preencha período, litros e preço para salvar",
        ));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (label, row) = match form.active {
            RevenueField::Period => ("Período", 0),
            RevenueField::Liters => ("Total de Litros", 1),
            RevenueField::Price => ("Preço por Litro (R$)", 2),
        };
        set_field_cursor(frame, inner, label, form.value_len(form.active), row);
    }
}

/// Move a list cursor for the standard navigation keys. The arrow keys step,
/// page keys jump, Home/End pin to the edges.
fn move_cursor(cursor: &mut ListCursor, code: KeyCode, len: usize) {
    match code {
        KeyCode::Up => cursor.move_selection(-1, len),
        KeyCode::Down => cursor.move_selection(1, len),
        KeyCode::PageUp => cursor.move_selection(-5, len),
        KeyCode::PageDown => cursor.move_selection(5, len),
        KeyCode::Home => cursor.select_first(),
        KeyCode::End => cursor.select_last(len),
        _ => {}
    }
}

/// Split `area` into `count` equal columns.
fn split_columns(area: Rect, count: usize) -> Vec<Rect> {
    let percent = (100 / count.max(1) as u16).max(1);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(percent); count.max(1)])
        .split(area)
        .iter()
        .cloned()
        .collect()
}

/// Render one bordered stat card: dim title on top, bold value beneath.
fn draw_stat_card(frame: &mut Frame, area: Rect, title: &str, value: String) {
    let lines = vec![
        Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            value,
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

/// One `Label: value` summary row for the dashboard panels.
fn summary_line(label: &str, value: String, label_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}: "), label_style),
        Span::raw(value),
    ])
}

/// Render a bordered list with the shared highlight styling and selection.
fn render_selectable_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    items: Vec<ListItem>,
    selected: usize,
) {
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string()),
        )
        .highlight_style(Style::default().fg(Color::Yellow))
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    state.select(Some(selected));
    frame.render_stateful_widget(list, area, &mut state);
}

/// The last line of a form modal: an error if one is pending, otherwise the
/// shortcut hint. The hint renders dimmed while required fields are missing,
/// which is the disabled-submit affordance.
fn form_hint_line(
    error: Option<&str>,
    submittable: bool,
    hint: &'static str,
    missing: &'static str,
) -> Line<'static> {
    match (error, submittable) {
        (Some(error), _) => Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )),
        (None, true) => Line::from(Span::styled(hint, Style::default().fg(Color::Gray))),
        (None, false) => Line::from(Span::styled(missing, Style::default().fg(Color::DarkGray))),
    }
}

/// Place the terminal cursor at the end of the active field's value. Labels
/// may contain accented characters, so the offset counts chars, not bytes.
fn set_field_cursor(frame: &mut Frame, inner: Rect, label: &str, value_len: usize, row: u16) {
    let prefix = label.chars().count() as u16 + 2;
    frame.set_cursor_position((inner.x + prefix + value_len as u16, inner.y + row));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let today = NaiveDate::from_ymd_opt(2024, 1, 30).unwrap();
        App::new(Stores::seeded(today), today)
    }

    fn type_str(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    #[test]
    fn quit_key_exits() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }

    #[test]
    fn esc_returns_to_dashboard_before_exiting() {
        let mut app = app();
        app.handle_key(KeyCode::Char('3')).unwrap();
        assert!(!app.handle_key(KeyCode::Esc).unwrap());
        assert!(matches!(app.screen, Screen::Dashboard));
        assert!(app.handle_key(KeyCode::Esc).unwrap());
    }

    #[test]
    fn tab_cycles_through_all_views() {
        let mut app = app();
        for _ in 0..VIEW_COUNT {
            app.handle_key(KeyCode::Tab).unwrap();
        }
        assert!(matches!(app.screen, Screen::Dashboard));
    }

    #[test]
    fn add_is_unavailable_on_the_dashboard() {
        let mut app = app();
        app.handle_key(KeyCode::Char('+')).unwrap();
        assert!(matches!(app.mode, Mode::Normal));
        assert!(matches!(
            app.status,
            Some(StatusMessage {
                kind: StatusKind::Error,
                ..
            })
        ));
    }

    #[test]
    fn incomplete_production_form_ignores_enter() {
        let mut app = app();
        app.handle_key(KeyCode::Char('2')).unwrap();
        app.handle_key(KeyCode::Char('+')).unwrap();
        // Clear the prefilled date so no required field is present.
        for _ in 0.."2024-01-30".len() {
            app.handle_key(KeyCode::Backspace).unwrap();
        }
        app.handle_key(KeyCode::Enter).unwrap();
        assert!(matches!(app.mode, Mode::AddingProduction(_)));
        assert_eq!(app.stores.production.len(), 3);
    }

    #[test]
    fn submitting_the_production_form_prepends_a_record() {
        let mut app = app();
        app.handle_key(KeyCode::Char('2')).unwrap();
        app.handle_key(KeyCode::Char('+')).unwrap();
        app.handle_key(KeyCode::Tab).unwrap();
        type_str(&mut app, "120");
        app.handle_key(KeyCode::Tab).unwrap();
        type_str(&mut app, "125");
        app.handle_key(KeyCode::Enter).unwrap();

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.stores.production.len(), 4);
        assert_eq!(app.stores.production.latest().unwrap().total, 245.0);
    }

    #[test]
    fn malformed_date_keeps_the_form_open_with_an_error() {
        let mut app = app();
        app.handle_key(KeyCode::Char('2')).unwrap();
        app.handle_key(KeyCode::Char('+')).unwrap();
        app.handle_key(KeyCode::Backspace).unwrap();
        app.handle_key(KeyCode::Tab).unwrap();
        type_str(&mut app, "120");
        app.handle_key(KeyCode::Enter).unwrap();

        match &app.mode {
            Mode::AddingProduction(form) => assert!(form.error.is_some()),
            _ => panic!("form should stay open"),
        }
        assert_eq!(app.stores.production.len(), 3);
    }

    #[test]
    fn escape_cancels_a_form_without_saving() {
        let mut app = app();
        app.handle_key(KeyCode::Char('4')).unwrap();
        app.handle_key(KeyCode::Char('+')).unwrap();
        type_str(&mut app, "Fevereiro 2024");
        app.handle_key(KeyCode::Esc).unwrap();

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.stores.revenue.len(), 2);
    }

    #[test]
    fn registering_an_animal_snapshots_its_age() {
        let mut app = app();
        app.handle_key(KeyCode::Char('3')).unwrap();
        app.handle_key(KeyCode::Char('+')).unwrap();
        type_str(&mut app, "Valente");
        app.handle_key(KeyCode::Tab).unwrap();
        app.handle_key(KeyCode::Right).unwrap();
        app.handle_key(KeyCode::Right).unwrap();
        app.handle_key(KeyCode::Right).unwrap();
        app.handle_key(KeyCode::Tab).unwrap();
        app.handle_key(KeyCode::Char(' ')).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();

        assert!(matches!(app.mode, Mode::Normal));
        let animal = app.stores.herd.latest().unwrap();
        assert_eq!(animal.name, "Valente");
        assert_eq!(animal.kind, AnimalKind::MaleCalf);
        assert_eq!(animal.sex, Sex::Male);
        // Birth date defaults to today, so the snapshot reads zero days.
        assert_eq!(animal.age, "0 dias");
    }

    #[test]
    fn saved_calculation_becomes_the_current_price() {
        let mut app = app();
        assert_eq!(app.current_price(), 1.50);

        app.handle_key(KeyCode::Char('4')).unwrap();
        app.handle_key(KeyCode::Char('+')).unwrap();
        type_str(&mut app, "Fevereiro 2024");
        app.handle_key(KeyCode::Tab).unwrap();
        type_str(&mut app, "7000");
        app.handle_key(KeyCode::Tab).unwrap();
        for _ in 0..4 {
            app.handle_key(KeyCode::Backspace).unwrap();
        }
        type_str(&mut app, "1.60");
        app.handle_key(KeyCode::Enter).unwrap();

        assert_eq!(app.current_price(), 1.60);
        assert_eq!(app.stores.revenue.latest().unwrap().total_revenue, 11_200.0);
    }
}
