//! Response dispatcher: one classified message in, one formatted reply out.
//!
//! Eight strategies keyed by [`Intent`], each a pure function of the
//! extracted entities, the current knowledge snapshot and (where relevant)
//! the wall clock. The clock and the randomness source are parameters so
//! tests can pin them.

use chrono::{DateTime, Local, Timelike};
use rand::Rng;

use crate::brain::{Intent, MajorKind, MessageAnalysis, MessageAnalyzer, ServiceKind};
use crate::knowledge::{capitalize, Knowledge};

/// The three fixed farewell replies; one is picked uniformly at random.
const FAREWELL_REPLIES: [&str; 3] = [
    "¡Hasta pronto! 👋 Estoy aquí cuando me necesites.",
    "¡Adiós! 😊 Que tengas un excelente día.",
    "¡Nos vemos! 🎓 Mucho éxito en tus estudios.",
];

/// Capability menu appended to greetings and fallback replies.
const CAPABILITIES: &str = "📚 Horarios de biblioteca, laboratorios y comedor\n\
                            🎉 Eventos del ciclo escolar\n\
                            🎓 Información sobre carreras\n\
                            📋 Trámites administrativos\n";

/// At most this many events are rendered per reply.
const MAX_EVENTS_SHOWN: usize = 5;

/// Builds replies from the analysis of one message and a knowledge snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResponseEngine {
    analyzer: MessageAnalyzer,
    /// Horizon window for the event strategy, in days.
    event_horizon_days: i64,
}

impl ResponseEngine {
    pub fn new(event_horizon_days: i64) -> Self {
        Self {
            analyzer: MessageAnalyzer::new(),
            event_horizon_days,
        }
    }

    /// Generate a reply using the real clock and thread-local randomness.
    /// Always returns a non-empty string.
    pub fn generate(&self, raw_text: &str, kb: &Knowledge) -> (String, Intent) {
        self.generate_at(raw_text, kb, Local::now(), &mut rand::thread_rng())
    }

    /// Deterministic variant: the caller supplies the clock and the rng.
    pub fn generate_at(
        &self,
        raw_text: &str,
        kb: &Knowledge,
        now: DateTime<Local>,
        rng: &mut impl Rng,
    ) -> (String, Intent) {
        let analysis = self.analyzer.analyze(raw_text);
        let reply = self.dispatch(&analysis, kb, now, rng);
        (reply, analysis.intent)
    }

    fn dispatch(
        &self,
        analysis: &MessageAnalysis,
        kb: &Knowledge,
        now: DateTime<Local>,
        rng: &mut impl Rng,
    ) -> String {
        match analysis.intent {
            Intent::Greeting => greeting_reply(now),
            Intent::Farewell => farewell_reply(rng),
            Intent::ScheduleQuery => schedule_reply(analysis.service, kb),
            Intent::EventQuery => events_reply(kb, now, self.event_horizon_days),
            Intent::MajorQuery => major_reply(analysis.major, kb),
            Intent::ProcedureQuery => procedures_reply(kb),
            Intent::ServiceQuery | Intent::SuspensionQuery | Intent::Unclassified => {
                fallback_reply()
            }
        }
    }
}

/// Time-of-day greeting plus the capability menu.
fn greeting_reply(now: DateTime<Local>) -> String {
    let salute = match now.hour() {
        5..=11 => "¡Buenos días! 🌅",
        12..=18 => "¡Buenas tardes! ☀️",
        _ => "¡Buenas noches! 🌙",
    };

    format!(
        "{salute}\n\n\
         Soy tu asistente virtual universitario. 🎓\n\n\
         Puedo ayudarte con:\n{CAPABILITIES}\n\
         ¿En qué puedo ayudarte hoy?"
    )
}

/// Uniform pick among the three fixed farewell strings.
fn farewell_reply(rng: &mut impl Rng) -> String {
    FAREWELL_REPLIES[rng.gen_range(0..FAREWELL_REPLIES.len())].to_string()
}

fn schedule_reply(service: Option<ServiceKind>, kb: &Knowledge) -> String {
    let Some(service) = service else {
        // No specific service mentioned: render every schedule.
        if !kb.has_schedules() {
            return "Lo siento, no tengo información de horarios disponible. 😔".to_string();
        }
        let mut reply = "📅 *HORARIOS DE SERVICIOS*\n\n".to_string();
        for schedule in kb.schedules() {
            reply.push_str(&schedule.render());
            reply.push('\n');
        }
        return reply;
    };

    match kb.find_schedule(service.key()) {
        Some(schedule) => schedule.render(),
        None => {
            let mut reply = format!(
                "Lo siento, no encontré información sobre '{}'. 😔\n\nServicios disponibles:\n",
                service.key()
            );
            for name in kb.schedule_names() {
                reply.push_str(&format!("• {}\n", capitalize(name)));
            }
            reply
        }
    }
}

fn events_reply(kb: &Knowledge, now: DateTime<Local>, horizon_days: i64) -> String {
    let today = now.date_naive();
    let upcoming = kb.upcoming_events(horizon_days, today);

    if upcoming.is_empty() {
        return "No hay eventos próximos registrados en este momento. 📅".to_string();
    }

    let mut reply = "🎉 *PRÓXIMOS EVENTOS*\n\n".to_string();
    for event in upcoming.iter().take(MAX_EVENTS_SHOWN) {
        reply.push_str(&event.render(today));
        reply.push('\n');
    }
    if upcoming.len() > MAX_EVENTS_SHOWN {
        reply.push_str(&format!(
            "\n_Y {} eventos más..._",
            upcoming.len() - MAX_EVENTS_SHOWN
        ));
    }
    reply
}

fn major_reply(major: Option<MajorKind>, kb: &Knowledge) -> String {
    let Some(major) = major else {
        if !kb.has_majors() {
            return "Lo siento, no tengo información de carreras disponible. 😔".to_string();
        }
        let mut reply = "🎓 *CARRERAS DISPONIBLES*\n\n".to_string();
        for name in kb.major_names() {
            reply.push_str(&format!("• {}\n", capitalize(name)));
        }
        reply.push_str("\n¿Sobre cuál te gustaría saber más?");
        return reply;
    };

    match kb.find_major(major.key()) {
        Some(record) => record.render(),
        None => {
            let mut reply = format!(
                "No encontré información sobre la carrera '{}'. 😔\n\nCarreras disponibles:\n",
                major.key()
            );
            for name in kb.major_names() {
                reply.push_str(&format!("• {}\n", capitalize(name)));
            }
            reply
        }
    }
}

fn procedures_reply(kb: &Knowledge) -> String {
    if !kb.has_procedures() {
        return "Lo siento, no tengo información de trámites disponible. 😔".to_string();
    }

    let mut reply = "📋 *TRÁMITES DISPONIBLES*\n\n".to_string();
    for (name, description) in kb.procedures() {
        reply.push_str(&format!("*{}*\n{}\n\n", name.to_uppercase(), description));
    }
    reply
}

fn fallback_reply() -> String {
    format!(
        "Lo siento, no entendí tu pregunta. 🤔\n\n\
         Puedo ayudarte con:\n{CAPABILITIES}\n\
         ¿Podrías reformular tu pregunta?"
    )
}
