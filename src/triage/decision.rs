//! Threshold and override policy turning scores into an escalation
//! decision with an auditable rationale.

use serde::Serialize;

use super::lexicon::Lexicon;
use super::scorer::{CueTrail, ScoreRecord};

/// Sarcasm at or above this level counts as implicit complaint.
pub const SARCASM_FLOOR: f64 = 0.4;
/// Complaint added when sarcasm reaches the floor.
pub const SARCASM_COMPLAINT_BONUS: f64 = 0.8;
/// Complaint threshold when sarcasm is present.
pub const SOFT_THRESHOLD: f64 = 1.0;
/// Complaint threshold for plain messages.
pub const DEFAULT_THRESHOLD: f64 = 1.3;

const PRIORITY_NOTE: &str = "el reclamo prima sobre la cortesia";

const ESCALATION_REPLY: &str = "Entendido, escalaré tu caso para que un asesor te contacte y \
revise tu solicitud. Un representante verificará el pedido o la facturación en breve.";
const CLARIFYING_REPLY: &str = "¿Podrías especificar qué producto o información necesitas?";

/// Outcome of triaging one message. Derived value, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct EscalationDecision {
    pub escalate: bool,
    pub response_text: String,
    pub rationale: Rationale,
}

/// Rounded score snapshot plus the cue trail that produced it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Rationale {
    pub complaint: f64,
    pub sarcasm: f64,
    pub politeness: f64,
    pub threshold_used: f64,
    pub cues: CueTrail,
    pub priority: &'static str,
}

impl EscalationDecision {
    /// Degenerate decision for empty input; the pipeline is not invoked.
    pub fn empty() -> Self {
        Self {
            escalate: false,
            response_text: String::new(),
            rationale: Rationale {
                priority: PRIORITY_NOTE,
                ..Rationale::default()
            },
        }
    }
}

/// Apply the decision policy. Overrides run before the threshold
/// comparison; that order is authoritative.
pub fn decide(record: ScoreRecord, normalized: &str, lexicon: &Lexicon) -> EscalationDecision {
    let ScoreRecord {
        mut complaint,
        sarcasm,
        politeness,
        mut cues,
    } = record;

    // Sarcasm counts as implicit complaint before thresholding.
    if sarcasm >= SARCASM_FLOOR {
        complaint += SARCASM_COMPLAINT_BONUS;
        cues.complaint.push("sarcasmo_implicito".to_string());
    }

    let threshold_used = if sarcasm >= SARCASM_FLOOR {
        SOFT_THRESHOLD
    } else {
        DEFAULT_THRESHOLD
    };

    let override_hit = (sarcasm >= 1.0 && sarcasm >= politeness)
        || lexicon.has_frustration_symbol(normalized);

    let escalate = override_hit || complaint >= threshold_used;

    let response_text = if escalate {
        ESCALATION_REPLY.to_string()
    } else {
        CLARIFYING_REPLY.to_string()
    };

    EscalationDecision {
        escalate,
        response_text,
        rationale: Rationale {
            complaint: round2(complaint),
            sarcasm: round2(sarcasm),
            politeness: round2(politeness),
            threshold_used,
            cues,
            priority: PRIORITY_NOTE,
        },
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
