//! Rule-based triage of customer messages.
//!
//! The pipeline is a pure function over one message and the static
//! lexicon: normalize, score, decide. Nothing is cached between calls
//! and the lexicon is the only shared (read-only) state, so any number
//! of callers may triage concurrently.

pub mod decision;
pub mod fuzzy;
pub mod lexicon;
pub mod normalizer;
pub mod scorer;

pub use decision::{EscalationDecision, Rationale};
pub use lexicon::{Lexicon, LexiconError};
pub use scorer::{CueTrail, ScoreRecord};

/// Triage one raw customer message. Empty or whitespace-only input
/// short-circuits to an inert decision without running the pipeline.
pub fn evaluate(raw: &str) -> EscalationDecision {
    let lexicon = Lexicon::global();

    if raw.trim().is_empty() {
        return EscalationDecision::empty();
    }

    let original_lower = raw.to_lowercase();
    let normalized = normalizer::normalize(raw, lexicon);
    let record = scorer::score(&normalized, &original_lower, lexicon);
    decision::decide(record, &normalized, lexicon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_inert_decision() {
        for raw in ["", "   ", "\n\t"] {
            let decision = evaluate(raw);
            assert!(!decision.escalate);
            assert!(decision.response_text.is_empty());
        }
    }

    #[test]
    fn frustration_symbol_alone_escalates() {
        let decision = evaluate("🙃");
        assert!(decision.escalate);
    }

    #[test]
    fn single_exact_root_does_not_escalate() {
        let decision = evaluate("pedido incompleto");
        assert!(!decision.escalate);
        assert_eq!(decision.rationale.complaint, 1.0);
    }

    #[test]
    fn sarcastic_waiting_message_escalates() {
        let decision = evaluate("perfecto, llevo 3 horas esperando");
        assert!(decision.escalate);
        assert!(decision.rationale.sarcasm >= 2.0);
        assert!(decision.rationale.complaint >= 1.8);
    }

    #[test]
    fn pure_courtesy_does_not_escalate() {
        let decision = evaluate("muchas gracias, todo perfecto");
        assert!(!decision.escalate);
        assert!(decision.rationale.politeness > 0.0);
        assert_eq!(decision.rationale.sarcasm, 0.0);
    }
}
