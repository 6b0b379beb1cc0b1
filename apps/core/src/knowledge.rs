//! In-memory knowledge base: schedules, events, majors, procedures,
//! services and class suspensions, plus the shared store that publishes a
//! new base atomically on reload.
//!
//! Keys are lower-cased at insertion so every lookup is case-insensitive.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Weekday a service operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Spanish display label, as rendered in replies.
    pub fn label(&self) -> &'static str {
        match self {
            Weekday::Monday => "lunes",
            Weekday::Tuesday => "martes",
            Weekday::Wednesday => "miércoles",
            Weekday::Thursday => "jueves",
            Weekday::Friday => "viernes",
            Weekday::Saturday => "sábado",
            Weekday::Sunday => "domingo",
        }
    }
}

/// Spanish month names, indexed by month number - 1.
const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Upper-case the first character, lower-case the rest. Used for day
/// labels and for the lower-cased lookup keys when they show in replies.
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

/// Opening hours of one campus service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub service: String,
    pub days: Vec<Weekday>,
    pub opens: NaiveTime,
    pub closes: NaiveTime,
    pub notes: String,
}

impl Schedule {
    pub fn is_open(&self, day: Weekday, at: NaiveTime) -> bool {
        self.days.contains(&day) && self.opens <= at && at <= self.closes
    }

    /// Formatted block for one schedule. The notes line only appears when
    /// notes are non-empty.
    pub fn render(&self) -> String {
        let days: Vec<String> = self.days.iter().map(|d| capitalize(d.label())).collect();
        let mut out = format!("📅 *{}*\n", self.service);
        out.push_str(&format!("🕐 {}\n", days.join(", ")));
        out.push_str(&format!(
            "⏰ {} - {}\n",
            self.opens.format("%H:%M"),
            self.closes.format("%H:%M")
        ));
        if !self.notes.trim().is_empty() {
            out.push_str(&format!("ℹ️ {}\n", self.notes));
        }
        out
    }
}

/// One academic-calendar event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub description: String,
    pub starts: NaiveDate,
    pub ends: NaiveDate,
    pub location: String,
    pub category: String,
}

impl Event {
    /// Whole days until the event starts; negative once it has passed.
    pub fn days_until(&self, today: NaiveDate) -> i64 {
        (self.starts - today).num_days()
    }

    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.starts <= today && today <= self.ends
    }

    /// Formatted block with a day-countdown marker. Renders past events
    /// too, even though the horizon query never returns one.
    pub fn render(&self, today: NaiveDate) -> String {
        let mut out = format!("🎓 *{}*\n", self.name);
        out.push_str(&format!("📝 {}\n", self.description));
        if self.starts == self.ends {
            out.push_str(&format!("📅 {}\n", self.starts.format("%d/%m/%Y")));
        } else {
            out.push_str(&format!(
                "📅 Del {} al {}\n",
                self.starts.format("%d/%m/%Y"),
                self.ends.format("%d/%m/%Y")
            ));
        }
        if !self.location.trim().is_empty() {
            out.push_str(&format!("📍 {}\n", self.location));
        }
        let days = self.days_until(today);
        if days > 0 {
            out.push_str(&format!("⏳ Faltan {} días\n", days));
        } else if days == 0 {
            out.push_str("🔔 ¡Es hoy!\n");
        } else {
            out.push_str("✅ Evento pasado\n");
        }
        out
    }
}

/// One degree program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Major {
    pub name: String,
    pub terms: u32,
    pub description: String,
    pub coordinator: String,
}

impl Major {
    /// Formatted block. Description and coordinator lines only appear when
    /// the fields are non-empty.
    pub fn render(&self) -> String {
        let rule = "=".repeat(50);
        let mut out = format!("🎓 *{}*\n{}\n\n", self.name.to_uppercase(), rule);
        if !self.description.trim().is_empty() {
            out.push_str(&format!("📚 *DESCRIPCIÓN:*\n{}\n\n", self.description));
        }
        out.push_str(&format!("⏱️ *DURACIÓN:*\n{} semestres\n\n", self.terms));
        if !self.coordinator.trim().is_empty() {
            out.push_str(&format!("👤 *COORDINADOR:*\n{}\n\n", self.coordinator));
        }
        out.push_str(&format!("{}\n¿Necesitas más información? 😊", rule));
        out
    }
}

/// One campus service record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    pub description: String,
    pub payment: String,
    pub days: String,
    pub location: String,
}

impl Service {
    pub fn render(&self) -> String {
        let rule = "=".repeat(50);
        let mut out = format!("📋 *{}*\n{}\n\n", self.name.to_uppercase(), rule);
        if !self.description.trim().is_empty() {
            out.push_str(&format!("{}\n\n", self.description));
        }
        if !self.payment.trim().is_empty() {
            out.push_str(&format!("💳 *Pagos:* {}\n", self.payment));
        }
        if !self.days.trim().is_empty() {
            out.push_str(&format!("📅 *Días:* {}\n", self.days));
        }
        if !self.location.trim().is_empty() {
            out.push_str(&format!("📍 *Lugar:* {}\n", self.location));
        }
        if self.payment.is_empty() && self.days.is_empty() && self.location.is_empty() {
            out.push_str("ℹ️ Sin información adicional disponible\n");
        }
        out.push_str(&format!("\n{}\n¿Necesitas más información? 😊", rule));
        out
    }
}

/// One class-suspension notice, keyed by a Spanish date label such as
/// "25 de diciembre".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suspension {
    pub date_label: String,
    pub description: String,
}

impl Suspension {
    pub fn render(&self) -> String {
        format!("📅 {}\n{}", self.date_label, self.description)
    }
}

/// The knowledge base itself: an immutable-once-published snapshot.
#[derive(Debug, Clone, Default)]
pub struct Knowledge {
    schedules: BTreeMap<String, Schedule>,
    events: Vec<Event>,
    majors: BTreeMap<String, Major>,
    procedures: BTreeMap<String, String>,
    services: BTreeMap<String, Service>,
    suspensions: Vec<Suspension>,
}

impl Knowledge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_schedule(&mut self, schedule: Schedule) {
        self.schedules.insert(schedule.service.to_lowercase(), schedule);
    }

    pub fn add_event(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn add_major(&mut self, major: Major) {
        self.majors.insert(major.name.to_lowercase(), major);
    }

    pub fn add_procedure(&mut self, name: &str, description: &str) {
        self.procedures.insert(name.to_lowercase(), description.to_string());
    }

    pub fn add_service(&mut self, service: Service) {
        self.services.insert(service.name.to_lowercase(), service);
    }

    pub fn add_suspension(&mut self, suspension: Suspension) {
        self.suspensions.push(suspension);
    }

    pub fn find_schedule(&self, service: &str) -> Option<&Schedule> {
        self.schedules.get(&service.to_lowercase())
    }

    pub fn schedules(&self) -> impl Iterator<Item = &Schedule> {
        self.schedules.values()
    }

    pub fn schedule_names(&self) -> impl Iterator<Item = &String> {
        self.schedules.keys()
    }

    pub fn has_schedules(&self) -> bool {
        !self.schedules.is_empty()
    }

    /// Events starting within `0..=max_days` days of `today`, ascending by
    /// start date. Never returns an event that already started.
    pub fn upcoming_events(&self, max_days: i64, today: NaiveDate) -> Vec<&Event> {
        let mut upcoming: Vec<&Event> = self
            .events
            .iter()
            .filter(|e| {
                let days = e.days_until(today);
                (0..=max_days).contains(&days)
            })
            .collect();
        upcoming.sort_by_key(|e| e.starts);
        upcoming
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn find_major(&self, name: &str) -> Option<&Major> {
        self.majors.get(&name.to_lowercase())
    }

    pub fn major_names(&self) -> impl Iterator<Item = &String> {
        self.majors.keys()
    }

    pub fn majors(&self) -> impl Iterator<Item = &Major> {
        self.majors.values()
    }

    pub fn has_majors(&self) -> bool {
        !self.majors.is_empty()
    }

    pub fn find_procedure(&self, name: &str) -> Option<&str> {
        self.procedures.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn procedures(&self) -> impl Iterator<Item = (&String, &String)> {
        self.procedures.iter()
    }

    pub fn has_procedures(&self) -> bool {
        !self.procedures.is_empty()
    }

    pub fn find_service(&self, name: &str) -> Option<&Service> {
        self.services.get(&name.to_lowercase())
    }

    /// Suspension notice whose date label matches today ("30 de agosto").
    pub fn today_suspension(&self, today: NaiveDate) -> Option<&str> {
        use chrono::Datelike;
        let label = format!("{} de {}", today.day(), MONTHS[today.month0() as usize]);
        self.suspensions
            .iter()
            .find(|s| s.date_label.trim().to_lowercase() == label)
            .map(|s| s.description.as_str())
    }

    pub fn counts(&self) -> KnowledgeCounts {
        KnowledgeCounts {
            schedules: self.schedules.len(),
            events: self.events.len(),
            majors: self.majors.len(),
            procedures: self.procedures.len(),
            services: self.services.len(),
            suspensions: self.suspensions.len(),
        }
    }
}

/// Entry counts per section, exposed on the health endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KnowledgeCounts {
    pub schedules: usize,
    pub events: usize,
    pub majors: usize,
    pub procedures: usize,
    pub services: usize,
    pub suspensions: usize,
}

/// Shared, process-wide holder of the current knowledge snapshot.
///
/// A reload builds the replacement base entirely off to the side and
/// publishes it with a single `Arc` swap, so concurrent readers see either
/// the fully-old or the fully-new base, never a partially-cleared one.
#[derive(Debug, Default)]
pub struct KnowledgeStore {
    current: RwLock<Arc<Knowledge>>,
}

impl KnowledgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current complete snapshot. Holding it keeps that base alive even
    /// across a concurrent reload.
    pub fn snapshot(&self) -> Arc<Knowledge> {
        Arc::clone(&self.current.read().unwrap())
    }

    /// Publish a freshly built base, replacing the old one wholesale.
    pub fn replace(&self, knowledge: Knowledge) {
        *self.current.write().unwrap() = Arc::new(knowledge);
    }
}
