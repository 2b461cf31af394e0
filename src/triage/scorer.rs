//! Multi-signal scoring of a normalized customer message.
//!
//! Three independent non-negative signals (complaint, sarcasm,
//! politeness) are accumulated by an ordered list of rules. Rules only
//! add — the single exception is the documented politeness suppression
//! when an emoji-marked sarcastic compliment is detected. Every
//! increment appends a cue so a decision can be audited after the fact.
//!
//! Each rule is a pure function taking the record by value and returning
//! a new snapshot, so rules can be tested in isolation and reordered
//! without hidden shared state.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use super::fuzzy;
use super::lexicon::Lexicon;

/// Weight of an exact complaint-root hit.
pub const WEIGHT_EXACT: f64 = 1.0;
/// Weight of a fuzzy complaint-root hit.
pub const WEIGHT_FUZZY: f64 = 0.8;
/// Weight of a whole-word negation hit.
pub const WEIGHT_NEGATION: f64 = 0.5;
/// Weight added once when any frustration symbol is present.
pub const WEIGHT_EMOJI: f64 = 1.0;
/// Weight of a glossary (foreign-term) hit.
pub const WEIGHT_GLOSSARY: f64 = 0.9;
/// Politeness increment per phrase occurrence.
pub const WEIGHT_POLITENESS: f64 = 0.25;

/// Ordered record of every rule that contributed to a signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CueTrail {
    pub complaint: Vec<String>,
    pub sarcasm: Vec<String>,
    pub politeness: Vec<String>,
}

/// Scores for one message. Created fresh per message, immutable once
/// returned from [`score`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreRecord {
    pub complaint: f64,
    pub sarcasm: f64,
    pub politeness: f64,
    pub cues: CueTrail,
}

impl ScoreRecord {
    fn add_complaint(mut self, weight: f64, cue: impl Into<String>) -> Self {
        self.complaint += weight;
        self.cues.complaint.push(cue.into());
        self
    }

    fn add_sarcasm(mut self, weight: f64, cue: impl Into<String>) -> Self {
        self.sarcasm += weight;
        self.cues.sarcasm.push(cue.into());
        self
    }

    fn add_politeness(mut self, weight: f64, cue: impl Into<String>) -> Self {
        self.politeness += weight;
        self.cues.politeness.push(cue.into());
        self
    }

    /// Raise sarcasm to at least `floor`; never lowers.
    fn floor_sarcasm(mut self, floor: f64, cue: impl Into<String>) -> Self {
        if self.sarcasm < floor {
            self.sarcasm = floor;
            self.cues.sarcasm.push(cue.into());
        }
        self
    }

    /// The only decreasing adjustment: politeness drops by `amount`,
    /// floored at zero.
    fn suppress_politeness(mut self, amount: f64, cue: impl Into<String>) -> Self {
        if self.politeness > 0.0 {
            self.politeness = (self.politeness - amount).max(0.0);
            self.cues.politeness.push(cue.into());
        }
        self
    }
}

/// Everything a rule may look at: the normalized text, the original
/// lowercase text (for glossary hits), and the lexicon.
pub struct MessageContext<'a> {
    pub normalized: &'a str,
    pub original_lower: &'a str,
    pub lexicon: &'static Lexicon,
}

impl<'a> MessageContext<'a> {
    pub fn new(normalized: &'a str, original_lower: &'a str, lexicon: &'static Lexicon) -> Self {
        Self {
            normalized,
            original_lower,
            lexicon,
        }
    }

    fn contains(&self, phrase: &str) -> bool {
        fuzzy::contains_phrase(self.normalized, phrase)
    }

    fn contains_any(&self, phrases: &[&str]) -> bool {
        phrases.iter().any(|phrase| self.contains(phrase))
    }

    fn positions_of_any(&self, phrases: &[&str]) -> Vec<usize> {
        let mut positions = Vec::new();
        for phrase in phrases {
            positions.extend(fuzzy::phrase_positions(self.normalized, phrase));
        }
        positions
    }

    /// True when some phrase of `first` is followed, within `window`
    /// chars, by some phrase of `second`.
    fn followed_within(&self, first: &[&str], second: &[&str], window: usize) -> bool {
        let starts = self.positions_of_any(first);
        let ends = self.positions_of_any(second);
        starts
            .iter()
            .any(|a| ends.iter().any(|b| b >= a && b - a <= window))
    }

    /// True when phrases of the two sets occur within `window` chars of
    /// each other, in either order.
    fn near_within(&self, left: &[&str], right: &[&str], window: usize) -> bool {
        let lhs = self.positions_of_any(left);
        let rhs = self.positions_of_any(right);
        lhs.iter()
            .any(|a| rhs.iter().any(|b| a.abs_diff(*b) <= window))
    }

    fn has_frustration_symbol(&self) -> bool {
        self.lexicon.has_frustration_symbol(self.normalized)
    }

    fn wait_or_time_word(&self) -> bool {
        self.contains_any(self.lexicon.wait_words) || self.contains_any(self.lexicon.time_words)
    }
}

/// Score one message. `normalized` comes from the normalizer;
/// `original_lower` is the raw message lowercased (glossary hits are
/// scored against it independently of normalization).
pub fn score(normalized: &str, original_lower: &str, lexicon: &'static Lexicon) -> ScoreRecord {
    let ctx = MessageContext::new(normalized, original_lower, lexicon);

    let record = ScoreRecord::default();
    let record = politeness_phrases(record, &ctx);
    let record = complaint_roots(record, &ctx);
    let record = negation_words(record, &ctx);
    let record = frustration_symbol(record, &ctx);
    let record = glossary_hits(record, &ctx);
    sarcasm_rules(record, &ctx)
}

/// Each politeness phrase occurrence adds a fixed increment; no cap.
pub fn politeness_phrases(record: ScoreRecord, ctx: &MessageContext<'_>) -> ScoreRecord {
    let mut record = record;
    for phrase in ctx.lexicon.politeness {
        for _ in fuzzy::phrase_positions(ctx.normalized, phrase) {
            record = record.add_politeness(WEIGHT_POLITENESS, *phrase);
        }
    }
    record
}

/// Exact roots score full weight, plural forms included; misspelled
/// roots score the fuzzy weight and are tagged with a `~` prefix.
pub fn complaint_roots(record: ScoreRecord, ctx: &MessageContext<'_>) -> ScoreRecord {
    let mut record = record;
    for root in ctx.lexicon.complaint_roots {
        if fuzzy::contains_root(ctx.normalized, root) {
            record = record.add_complaint(WEIGHT_EXACT, *root);
        } else if fuzzy::fuzzy_contains(ctx.normalized, root) {
            record = record.add_complaint(WEIGHT_FUZZY, format!("~{root}"));
        }
    }
    record
}

pub fn negation_words(record: ScoreRecord, ctx: &MessageContext<'_>) -> ScoreRecord {
    let mut record = record;
    for word in ctx.lexicon.negation_words {
        if ctx.contains(word) {
            record = record.add_complaint(WEIGHT_NEGATION, format!("neg:{word}"));
        }
    }
    record
}

/// Any frustration symbol adds the emoji weight once.
pub fn frustration_symbol(record: ScoreRecord, ctx: &MessageContext<'_>) -> ScoreRecord {
    if ctx.has_frustration_symbol() {
        record.add_complaint(WEIGHT_EMOJI, "emoji")
    } else {
        record
    }
}

/// Glossary hits are taken from the original lowercase text so a foreign
/// term still counts after normalization rewrote it.
pub fn glossary_hits(record: ScoreRecord, ctx: &MessageContext<'_>) -> ScoreRecord {
    let mut record = record;
    for (term, root) in ctx.lexicon.glossary {
        if ctx.original_lower.contains(term) {
            record = record.add_complaint(WEIGHT_GLOSSARY, *root);
        }
    }
    record
}

/// The ordered sarcasm rule chain. Rules are cumulative and
/// non-exclusive except the documented pos+neg / pos+espera pair.
pub fn sarcasm_rules(record: ScoreRecord, ctx: &MessageContext<'_>) -> ScoreRecord {
    let record = positive_marker_combo(record, ctx);
    let record = contrastive_connector(record, ctx);
    let record = compliment_near_wait(record, ctx);
    let record = ironic_politeness(record, ctx);
    let record = courteous_but_frustrated(record, ctx);
    let record = frustration_symbol_sarcasm(record, ctx);
    let record = suppress_fake_courtesy(record, ctx);
    let record = waiting_failsafe(record, ctx);
    let record = indirect_irony(record, ctx);
    let record = gratitude_then_contrast(record, ctx);
    let record = resignation(record, ctx);
    let record = ironic_delight(record, ctx);
    let record = delight_with_negation(record, ctx);
    let record = absent_quality_compliment(record, ctx);
    let record = dry_irony(record, ctx);
    hyperbolic_time(record, ctx)
}

/// Positive marker next to a negation or complaint root; otherwise a
/// positive marker next to waiting/cold-food vocabulary.
pub fn positive_marker_combo(record: ScoreRecord, ctx: &MessageContext<'_>) -> ScoreRecord {
    if !ctx.contains_any(ctx.lexicon.positive_markers) {
        return record;
    }

    let negated = ctx.contains_any(ctx.lexicon.negation_words)
        || ctx
            .lexicon
            .complaint_roots
            .iter()
            .any(|root| fuzzy::contains_root(ctx.normalized, root));

    if negated {
        record.add_sarcasm(1.4, "pos+neg")
    } else if ctx.contains_any(ctx.lexicon.wait_words) {
        record.add_sarcasm(1.26, "pos+espera")
    } else {
        record
    }
}

/// Contrastive connector within a short window of a resolution verb.
pub fn contrastive_connector(record: ScoreRecord, ctx: &MessageContext<'_>) -> ScoreRecord {
    if ctx.near_within(ctx.lexicon.contrast_connectors, ctx.lexicon.resolution_verbs, 20) {
        record.add_sarcasm(1.0, "contraste")
    } else {
        record
    }
}

/// Compliment word near waiting/absence vocabulary.
pub fn compliment_near_wait(record: ScoreRecord, ctx: &MessageContext<'_>) -> ScoreRecord {
    if ctx.near_within(ctx.lexicon.compliment_words, ctx.lexicon.wait_words, 80) {
        record
            .add_sarcasm(1.5, "sarcasmo_contraste")
            .add_complaint(0.5, "sarcasmo_contraste")
    } else {
        record
    }
}

/// "ah/muy/tan" + superlative together with a nothing/error/failure word.
pub fn ironic_politeness(record: ScoreRecord, ctx: &MessageContext<'_>) -> ScoreRecord {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"\b(ah|muy|tan) (pesimo|malisimo|excelente|perfecto|perfecta|eficiente|rapidisimo)\b")
            .expect("ironic politeness pattern compiles")
    });

    if pattern.is_match(ctx.normalized) && ctx.contains_any(ctx.lexicon.failure_words) {
        record.add_sarcasm(1.0, "ironia_cortes")
    } else {
        record
    }
}

/// Compliment word followed by duration/waiting vocabulary.
pub fn courteous_but_frustrated(record: ScoreRecord, ctx: &MessageContext<'_>) -> ScoreRecord {
    let trailing: Vec<&str> = ctx
        .lexicon
        .time_words
        .iter()
        .chain(ctx.lexicon.wait_words.iter())
        .copied()
        .collect();

    if ctx.followed_within(ctx.lexicon.compliment_words, &trailing, 150) {
        record
            .add_sarcasm(2.0, "sarcasmo_cortesia_frustrada")
            .add_complaint(1.0, "sarcasmo_cortesia_frustrada")
    } else {
        record
    }
}

/// Frustration symbols read as sarcasm on their own; combined with
/// waiting vocabulary the sarcasm signal is raised to at least 1.0.
pub fn frustration_symbol_sarcasm(record: ScoreRecord, ctx: &MessageContext<'_>) -> ScoreRecord {
    if !ctx.has_frustration_symbol() {
        return record;
    }

    let record = record.add_sarcasm(0.8, "emoji");
    if ctx.contains_any(ctx.lexicon.wait_words) {
        record.floor_sarcasm(1.0, "emoji+espera")
    } else {
        record
    }
}

/// An emoji-marked sarcastic compliment should not register as genuine
/// courtesy: the single politeness-decreasing rule.
pub fn suppress_fake_courtesy(record: ScoreRecord, ctx: &MessageContext<'_>) -> ScoreRecord {
    if record.sarcasm >= 0.8 && ctx.has_frustration_symbol() {
        record.suppress_politeness(1.0, "cortesia_suprimida")
    } else {
        record
    }
}

/// Failsafe: strong sarcasm plus waiting vocabulary is a complaint even
/// if no root matched.
pub fn waiting_failsafe(record: ScoreRecord, ctx: &MessageContext<'_>) -> ScoreRecord {
    if record.sarcasm >= 1.0 && ctx.wait_or_time_word() {
        record.add_complaint(1.0, "espera+sarcasmo")
    } else {
        record
    }
}

pub fn indirect_irony(record: ScoreRecord, ctx: &MessageContext<'_>) -> ScoreRecord {
    if ctx.contains_any(ctx.lexicon.irony_connectors) {
        record.add_sarcasm(1.0, "ironia_indirecta")
    } else {
        record
    }
}

/// Gratitude or compliment immediately contradicted.
pub fn gratitude_then_contrast(record: ScoreRecord, ctx: &MessageContext<'_>) -> ScoreRecord {
    if ctx.followed_within(ctx.lexicon.compliment_words, ctx.lexicon.contrast_words, 30) {
        record
            .add_sarcasm(1.2, "gracias+contraste")
            .add_complaint(0.8, "gracias+contraste")
    } else {
        record
    }
}

/// Resignation markers, including the explicit "llevo N horas" shape.
pub fn resignation(record: ScoreRecord, ctx: &MessageContext<'_>) -> ScoreRecord {
    static COUNTING: OnceLock<Regex> = OnceLock::new();
    let counting = COUNTING.get_or_init(|| {
        Regex::new(r"\b(llevo \d+ (horas?|dias?|semanas?)|\d+ horas? y (contando|nada|sigo))\b")
            .expect("resignation pattern compiles")
    });

    if ctx.contains_any(ctx.lexicon.resignation_markers) || counting.is_match(ctx.normalized) {
        record
            .add_sarcasm(1.0, "resignacion")
            .add_complaint(0.5, "resignacion")
    } else {
        record
    }
}

pub fn ironic_delight(record: ScoreRecord, ctx: &MessageContext<'_>) -> ScoreRecord {
    if ctx.contains_any(ctx.lexicon.delight_phrases) {
        record
            .add_sarcasm(1.5, "gusto_ironico")
            .add_complaint(0.7, "gusto_ironico")
    } else {
        record
    }
}

pub fn delight_with_negation(record: ScoreRecord, ctx: &MessageContext<'_>) -> ScoreRecord {
    if ctx.contains_any(ctx.lexicon.delight_negation_phrases) {
        record
            .add_sarcasm(1.3, "gusto_negado")
            .add_complaint(0.6, "gusto_negado")
    } else {
        record
    }
}

/// A compliment aimed at a quality the message itself declares absent.
pub fn absent_quality_compliment(record: ScoreRecord, ctx: &MessageContext<'_>) -> ScoreRecord {
    if ctx.contains_any(ctx.lexicon.absent_quality_phrases)
        && ctx.contains_any(ctx.lexicon.absence_words)
    {
        record
            .add_sarcasm(1.4, "eficiencia_inexistente")
            .add_complaint(0.6, "eficiencia_inexistente")
    } else {
        record
    }
}

pub fn dry_irony(record: ScoreRecord, ctx: &MessageContext<'_>) -> ScoreRecord {
    if ctx.contains_any(ctx.lexicon.dry_irony_markers) {
        record
            .add_sarcasm(1.0, "ironia_seca")
            .add_complaint(0.5, "ironia_seca")
    } else {
        record
    }
}

pub fn hyperbolic_time(record: ScoreRecord, ctx: &MessageContext<'_>) -> ScoreRecord {
    if ctx.contains_any(ctx.lexicon.hyperbolic_time_markers) {
        record
            .add_sarcasm(1.3, "tiempo_hiperbolico")
            .add_complaint(0.6, "tiempo_hiperbolico")
    } else {
        record
    }
}
