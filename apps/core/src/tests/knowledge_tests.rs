//! Knowledge Base Tests
//!
//! Snapshot semantics, event horizon filtering, entity rendering and the
//! atomic replace guarantee of the shared store.

use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;
use std::thread;

use crate::knowledge::{
    Event, Knowledge, KnowledgeStore, Major, Schedule, Service, Suspension, Weekday,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn event(name: &str, starts: NaiveDate, ends: NaiveDate) -> Event {
    Event {
        name: name.to_string(),
        description: "desc".to_string(),
        starts,
        ends,
        location: String::new(),
        category: "General".to_string(),
    }
}

#[test]
fn test_upcoming_events_horizon_and_order() {
    let mut kb = Knowledge::new();
    let today = date(2026, 3, 1);
    // Inserted out of order, some outside the horizon.
    kb.add_event(event("far", date(2026, 5, 15), date(2026, 5, 15)));
    kb.add_event(event("soon", date(2026, 3, 3), date(2026, 3, 3)));
    kb.add_event(event("today", today, today));
    kb.add_event(event("past", date(2026, 2, 20), date(2026, 2, 20)));
    kb.add_event(event("edge", date(2026, 3, 31), date(2026, 3, 31)));

    let upcoming = kb.upcoming_events(30, today);
    let names: Vec<&str> = upcoming.iter().map(|e| e.name.as_str()).collect();

    assert_eq!(names, vec!["today", "soon", "edge"]);
    for e in &upcoming {
        assert!(e.days_until(today) >= 0);
        assert!(e.days_until(today) <= 30);
    }
}

#[test]
fn test_event_render_markers() {
    let today = date(2026, 3, 1);

    let single = event("Examen", date(2026, 3, 4), date(2026, 3, 4));
    let rendered = single.render(today);
    assert!(rendered.contains("📅 04/03/2026"));
    assert!(rendered.contains("⏳ Faltan 3 días"));

    let mut ranged = event("Inscripciones", today, date(2026, 3, 10));
    ranged.location = "Edificio A".to_string();
    let rendered = ranged.render(today);
    assert!(rendered.contains("📅 Del 01/03/2026 al 10/03/2026"));
    assert!(rendered.contains("📍 Edificio A"));
    assert!(rendered.contains("🔔 ¡Es hoy!"));
    assert!(ranged.is_active(today));
    assert!(ranged.is_active(date(2026, 3, 10)));
    assert!(!ranged.is_active(date(2026, 3, 11)));

    let past = event("Pasado", date(2026, 2, 1), date(2026, 2, 1));
    assert!(past.render(today).contains("✅ Evento pasado"));
}

#[test]
fn test_schedule_render_notes_line() {
    let mut schedule = Schedule {
        service: "Biblioteca".to_string(),
        days: vec![Weekday::Monday, Weekday::Saturday],
        opens: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        closes: NaiveTime::from_hms_opt(20, 30, 0).unwrap(),
        notes: String::new(),
    };

    let rendered = schedule.render();
    assert!(rendered.contains("📅 *Biblioteca*"));
    assert!(rendered.contains("🕐 Lunes, Sábado"));
    assert!(rendered.contains("⏰ 08:00 - 20:30"));
    assert!(!rendered.contains("ℹ️"));

    schedule.notes = "Cerrado en feriados".to_string();
    assert!(schedule.render().contains("ℹ️ Cerrado en feriados"));
}

#[test]
fn test_major_render_optional_lines() {
    let full = Major {
        name: "Ingenieria Mecatronica".to_string(),
        terms: 9,
        description: "Robótica y automatización".to_string(),
        coordinator: "Dra. Pérez".to_string(),
    };
    let rendered = full.render();
    assert!(rendered.contains("🎓 *INGENIERIA MECATRONICA*"));
    assert!(rendered.contains("📚 *DESCRIPCIÓN:*\nRobótica y automatización"));
    assert!(rendered.contains("⏱️ *DURACIÓN:*\n9 semestres"));
    assert!(rendered.contains("👤 *COORDINADOR:*\nDra. Pérez"));

    let bare = Major {
        name: "Civil".to_string(),
        terms: 8,
        description: String::new(),
        coordinator: String::new(),
    };
    let rendered = bare.render();
    assert!(!rendered.contains("DESCRIPCIÓN"));
    assert!(!rendered.contains("COORDINADOR"));
    assert!(rendered.contains("8 semestres"));
}

#[test]
fn test_service_render_fallback_line() {
    let empty = Service {
        name: "Becas".to_string(),
        description: String::new(),
        payment: String::new(),
        days: String::new(),
        location: String::new(),
    };
    assert!(empty.render().contains("ℹ️ Sin información adicional disponible"));

    let full = Service {
        name: "Caja".to_string(),
        description: "Pagos de colegiatura".to_string(),
        payment: "Efectivo y tarjeta".to_string(),
        days: "Lunes a viernes".to_string(),
        location: "Edificio B".to_string(),
    };
    let rendered = full.render();
    assert!(rendered.contains("💳 *Pagos:* Efectivo y tarjeta"));
    assert!(rendered.contains("📅 *Días:* Lunes a viernes"));
    assert!(rendered.contains("📍 *Lugar:* Edificio B"));
    assert!(!rendered.contains("Sin información adicional"));
}

#[test]
fn test_procedure_and_service_lookup() {
    let mut kb = Knowledge::new();
    kb.add_procedure("Constancia de Estudios", "Solicitar en ventanilla 3");
    kb.add_service(Service {
        name: "Fotocopiado".to_string(),
        description: "Copias e impresiones".to_string(),
        payment: String::new(),
        days: String::new(),
        location: String::new(),
    });

    assert_eq!(
        kb.find_procedure("CONSTANCIA DE ESTUDIOS"),
        Some("Solicitar en ventanilla 3")
    );
    assert!(kb.find_service("fotocopiado").is_some());
    assert!(kb.has_procedures());
    assert_eq!(kb.procedures().count(), 1);
}

#[test]
fn test_counts_track_every_section() {
    let mut kb = Knowledge::new();
    kb.add_schedule(Schedule {
        service: "Biblioteca".to_string(),
        days: vec![Weekday::Monday],
        opens: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        closes: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
        notes: String::new(),
    });
    kb.add_event(event("e", date(2026, 1, 1), date(2026, 1, 1)));
    kb.add_major(Major {
        name: "Sistemas".to_string(),
        terms: 8,
        description: String::new(),
        coordinator: String::new(),
    });
    kb.add_procedure("credencial", "ventanilla 1");
    kb.add_suspension(Suspension {
        date_label: "1 de mayo".to_string(),
        description: "Día del trabajo".to_string(),
    });

    let counts = kb.counts();
    assert_eq!(counts.schedules, 1);
    assert_eq!(counts.events, 1);
    assert_eq!(counts.majors, 1);
    assert_eq!(counts.procedures, 1);
    assert_eq!(counts.services, 0);
    assert_eq!(counts.suspensions, 1);
    assert_eq!(kb.events().len(), 1);
}

/// Readers must always observe a complete base: either all of the old one
/// or all of the new one, never a mix.
#[test]
fn test_store_replace_is_atomic() {
    fn base_with(n: usize) -> Knowledge {
        let mut kb = Knowledge::new();
        for i in 0..n {
            kb.add_procedure(&format!("tramite {i}"), "desc");
            kb.add_suspension(Suspension {
                date_label: format!("{} de enero", i + 1),
                description: "sin clases".to_string(),
            });
        }
        kb
    }

    let store = Arc::new(KnowledgeStore::new());
    store.replace(base_with(3));

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for _ in 0..200 {
                store.replace(base_with(3));
                store.replace(base_with(7));
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..500 {
                    let snapshot = store.snapshot();
                    let counts = snapshot.counts();
                    // Sections of one base always agree in size.
                    assert_eq!(counts.procedures, counts.suspensions);
                    assert!(counts.procedures == 3 || counts.procedures == 7);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}
