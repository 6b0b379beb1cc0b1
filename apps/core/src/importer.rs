//! Builds a fresh [`Knowledge`] base from spreadsheet rows.
//!
//! Rows come in as JSON objects keyed by the sheet header (one map per data
//! row). Parsing is lenient the way the source sheets demand: day lists can
//! be a "lunes a viernes" span or individual mentions, times are `HH:MM`
//! with defaults, and event dates are guessed between `%d/%m/%Y` and
//! `%Y-%m-%d`. Rows that cannot be parsed are skipped with a warning, never
//! aborting the whole import.

use chrono::{NaiveDate, NaiveTime};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::knowledge::{Event, Knowledge, Major, Schedule, Service, Suspension, Weekday};

/// One spreadsheet data row: header name -> cell value.
pub type Row = Map<String, Value>;

/// All sheet tabs an import consumes. Missing tabs import as empty.
#[derive(Debug, Default, Clone)]
pub struct SheetRows {
    pub schedules: Vec<Row>,
    pub events: Vec<Row>,
    pub majors: Vec<Row>,
    pub procedures: Vec<Row>,
    pub services: Vec<Row>,
    pub suspensions: Vec<Row>,
}

impl SheetRows {
    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
            && self.events.is_empty()
            && self.majors.is_empty()
            && self.procedures.is_empty()
            && self.services.is_empty()
            && self.suspensions.is_empty()
    }
}

/// Cell accessor: string cells pass through, numeric cells are stringified,
/// missing cells become the empty string. Always trimmed.
fn cell(row: &Row, key: &str) -> String {
    match row.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Like [`cell`] but tolerates header variants ("Descripción " with a
/// trailing space exists in the deployed sheet).
fn cell_any(row: &Row, keys: &[&str]) -> String {
    keys.iter()
        .map(|k| cell(row, k))
        .find(|v| !v.is_empty())
        .unwrap_or_default()
}

/// Expand a free-text day list into weekdays. "lunes a viernes" (both ends
/// mentioned) expands to the whole working week; otherwise each mentioned
/// day is included. An unparseable list defaults to Monday.
fn parse_days(raw: &str) -> Vec<Weekday> {
    let text = raw.to_lowercase();
    let mut days = Vec::new();

    if text.contains("lunes") && text.contains("viernes") {
        return vec![
            Weekday::Monday,
            Weekday::Tuesday,
            Weekday::Wednesday,
            Weekday::Thursday,
            Weekday::Friday,
        ];
    }

    let mentions: [(&str, Weekday); 8] = [
        ("lunes", Weekday::Monday),
        ("martes", Weekday::Tuesday),
        ("miercoles", Weekday::Wednesday),
        ("miércoles", Weekday::Wednesday),
        ("jueves", Weekday::Thursday),
        ("viernes", Weekday::Friday),
        ("sabado", Weekday::Saturday),
        ("sábado", Weekday::Saturday),
    ];
    for (name, day) in mentions {
        if text.contains(name) && !days.contains(&day) {
            days.push(day);
        }
    }
    if text.contains("domingo") {
        days.push(Weekday::Sunday);
    }

    if days.is_empty() {
        days.push(Weekday::Monday);
    }
    days
}

/// Parse an `HH:MM` (or bare `HH`) cell, falling back to the given default.
fn parse_time(raw: &str, default: NaiveTime) -> NaiveTime {
    let mut parts = raw.split(':');
    let hour = parts.next().and_then(|p| p.trim().parse::<u32>().ok());
    let minute = parts
        .next()
        .and_then(|p| p.trim().parse::<u32>().ok())
        .unwrap_or(0);
    match hour {
        Some(h) => NaiveTime::from_hms_opt(h, minute, 0).unwrap_or(default),
        None => default,
    }
}

/// Guess the date format from the cell itself: slash means day-first.
fn parse_flex_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.contains('/') {
        NaiveDate::parse_from_str(raw, "%d/%m/%Y").ok()
    } else {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }
}

/// Build a complete knowledge base from sheet rows. The result replaces the
/// previous base wholesale; this function never touches shared state.
pub fn build_knowledge(rows: &SheetRows) -> Knowledge {
    let mut kb = Knowledge::new();

    for row in &rows.schedules {
        // A nameless row still imports, under the generic name.
        let service = match cell(row, "Servicio") {
            s if s.is_empty() => "Servicio".to_string(),
            s => s,
        };
        kb.add_schedule(Schedule {
            days: parse_days(&cell(row, "Dias")),
            opens: parse_time(
                &cell(row, "Hora_Inicio"),
                NaiveTime::from_hms_opt(8, 0, 0).expect("valid default time"),
            ),
            closes: parse_time(
                &cell(row, "Hora_Fin"),
                NaiveTime::from_hms_opt(20, 0, 0).expect("valid default time"),
            ),
            notes: cell(row, "Notas"),
            service,
        });
    }

    for row in &rows.events {
        let raw_start = cell(row, "Fecha_Inicio");
        let Some(starts) = parse_flex_date(&raw_start) else {
            warn!(date = %raw_start, "skipping event row with unparseable start date");
            continue;
        };
        let ends = parse_flex_date(&cell(row, "Fecha_Fin")).unwrap_or(starts);
        let name = cell(row, "Nombre");
        kb.add_event(Event {
            name: if name.is_empty() { "Evento".to_string() } else { name },
            description: cell(row, "Descripcion"),
            starts,
            ends,
            location: cell(row, "Lugar"),
            category: {
                let c = cell(row, "Categoria");
                if c.is_empty() { "General".to_string() } else { c }
            },
        });
    }

    for row in &rows.majors {
        let name = cell(row, "Nombre");
        if name.is_empty() {
            continue;
        }
        kb.add_major(Major {
            name,
            terms: cell(row, "Duracion_Semestres").parse().unwrap_or(8),
            description: cell_any(row, &["Descripción", "Descripción ", "Descripcion"]),
            coordinator: cell(row, "Coordinador"),
        });
    }

    for row in &rows.procedures {
        let name = cell(row, "Nombre");
        if !name.is_empty() {
            kb.add_procedure(&name, &cell_any(row, &["Descripción", "Descripcion"]));
        }
    }

    for row in &rows.services {
        let name = cell(row, "Nombre");
        if name.is_empty() {
            continue;
        }
        kb.add_service(Service {
            name,
            description: cell_any(row, &["Descripción", "Descripcion"]),
            payment: cell(row, "Pagos"),
            days: cell(row, "Dias"),
            location: cell(row, "Lugar"),
        });
    }

    for row in &rows.suspensions {
        let date_label = cell(row, "Fecha");
        if date_label.is_empty() {
            continue;
        }
        kb.add_suspension(Suspension {
            date_label,
            description: cell_any(row, &["Suspension", "Suspensión"]),
        });
    }

    let counts = kb.counts();
    info!(
        schedules = counts.schedules,
        events = counts.events,
        majors = counts.majors,
        procedures = counts.procedures,
        services = counts.services,
        suspensions = counts.suspensions,
        "knowledge base built"
    );
    kb
}
