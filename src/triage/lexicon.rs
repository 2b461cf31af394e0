//! Immutable phrase tables backing the triage engine.
//!
//! Every entry is stored lowercase and diacritic-free (`ñ` is allowed)
//! because the normalizer strips accents before any lookup. The tables are
//! plain `'static` data; [`validate`] runs once at startup and refuses to
//! serve if an edit ever breaks the invariants.

use thiserror::Error;

/// Politeness phrases; each occurrence adds a fixed courtesy increment.
const POLITENESS: &[&str] = &[
    "hola",
    "buenos dias",
    "buenas tardes",
    "buenas noches",
    "gracias",
    "muchas gracias",
    "muy amable",
    "te agradezco",
    "por favor",
    "de acuerdo",
    "entendido",
    "vale",
];

/// Complaint roots: logistical, financial and quality grievances.
const COMPLAINT_ROOTS: &[&str] = &[
    "reclamo",
    "queja",
    "problema",
    "error",
    "equivocado",
    "defectuoso",
    "confusion",
    "dañado",
    "vencido",
    "podrido",
    "roto",
    "en mal estado",
    "pedido incorrecto",
    "producto equivocado",
    "pedido incompleto",
    "entrega incompleta",
    "faltante",
    "demora",
    "retraso",
    "no ha llegado",
    "todavia no llega",
    "no me llego",
    "mal despachado",
    "cobro incorrecto",
    "cobro duplicado",
    "sobreprecio",
    "precio distinto",
    "precio equivocado",
    "factura mal",
    "esperando",
    "sin respuesta",
];

/// Exaggerated-positivity markers used to detect ironic complaints.
const POSITIVE_MARKERS: &[&str] = &[
    "perfecto",
    "genial",
    "excelente",
    "maravilloso",
    "fantastico",
    "increible",
    "estupendo",
    "buenisimo",
    "me encanta",
    "que bien",
    "super",
];

/// Negation words counted as whole words only.
const NEGATION_WORDS: &[&str] = &["no", "nunca", "jamas", "ni", "sin", "tampoco"];

/// Symbols that survive normalization and mark frustration on their own.
pub const FRUSTRATION_SYMBOLS: &[char] = &['🙃', '🙄', '😒', '😡', '😤', '😑', '💢', '🤬'];

/// Foreign-term glossary: English terms rewritten to canonical Spanish
/// roots during normalization, and scored as glossary hits against the
/// original lowercase text. Terms are chosen so none is a substring of a
/// common Spanish word.
const GLOSSARY: &[(&str, &str)] = &[
    ("delay", "demora"),
    ("refund", "reembolso"),
    ("complaint", "reclamo"),
    ("wrong order", "pedido incorrecto"),
    ("missing items", "faltante"),
    ("not delivered", "no ha llegado"),
    ("damaged", "dañado"),
    ("overcharged", "cobro incorrecto"),
];

/// Common misspellings rewritten before scoring.
const CORRECTIONS: &[(&str, &str)] = &[
    ("grasias", "gracias"),
    ("qeja", "queja"),
    ("pedidio", "pedido"),
    ("entrga", "entrega"),
    ("porfavor", "por favor"),
    ("demorra", "demora"),
];

/// Waiting / delay / cold-food vocabulary for the sarcasm rules.
const WAIT_WORDS: &[&str] = &[
    "esperando",
    "espera",
    "esperar",
    "demora",
    "retraso",
    "tarde",
    "sin respuesta",
    "no llega",
    "todavia",
    "frio",
    "fria",
];

/// Duration words, matched as whole words (so "hora" never fires inside
/// "ahora"). Deliberately excludes "dia"/"dias" ("buenos dias") and
/// "tiempo" ("tiempo de entrega" is a routine FAQ).
const TIME_WORDS: &[&str] = &[
    "hora", "horas", "minuto", "minutos", "semana", "semanas", "meses", "rato",
];

/// Compliment vocabulary shared by the contrast-based sarcasm rules.
const COMPLIMENT_WORDS: &[&str] = &[
    "gracias",
    "perfecto",
    "excelente",
    "genial",
    "amable",
    "maravilloso",
    "fantastico",
];

/// Contrastive connectors checked near a resolution verb.
const CONTRAST_CONNECTORS: &[&str] = &["pero", "aunque", "si al menos", "ojala"];

const RESOLUTION_VERBS: &[&str] = &[
    "resuelvan",
    "resolver",
    "solucionen",
    "solucionar",
    "arreglen",
    "arreglar",
    "respondan",
    "atiendan",
    "entreguen",
];

/// Contrast words for the gratitude-then-contrast rule.
const CONTRAST_WORDS: &[&str] = &["pero", "aunque", "nada", "sin"];

/// Indirect-irony connectors.
const IRONY_CONNECTORS: &[&str] = &["aunque", "otra vez", "por lo visto", "sigan asi"];

/// Resignation markers (the "N horas y contando" shape is a regex in the
/// scorer).
const RESIGNATION_MARKERS: &[&str] = &["algun dia", "paciencia", "sigue igual", "sigo esperando"];

/// Ironic-delight phrasings.
const DELIGHT_PHRASES: &[&str] = &[
    "me encanta esperar",
    "me encanta el servicio lento",
    "me fascina esperar",
    "que delicia esperar",
];

/// Ironic delight negated by absence.
const DELIGHT_NEGATION_PHRASES: &[&str] = &[
    "que alegria no recibir",
    "que gusto no tener",
    "que maravilla no recibir",
];

/// Compliment-of-an-absent-quality phrasings.
const ABSENT_QUALITY_PHRASES: &[&str] = &["que placer", "tanta eficiencia", "tanta amabilidad"];
const ABSENCE_WORDS: &[&str] = &["inexistente", "por su ausencia", "que no existe"];

/// Dry irony without a direct compliment.
const DRY_IRONY_MARKERS: &[&str] = &[
    "que sorpresa",
    "nada nuevo",
    "como siempre",
    "lo de siempre",
    "para variar",
];

/// Hyperbolic-time markers.
const HYPERBOLIC_TIME_MARKERS: &[&str] = &[
    "a este paso",
    "para navidad",
    "antes de navidad",
    "en otra vida",
    "el año que viene",
];

/// Superlatives and failure words for the ironic-politeness pattern.
const SUPERLATIVES: &[&str] = &[
    "pesimo",
    "malisimo",
    "excelente",
    "perfecto",
    "perfecta",
    "eficiente",
    "rapidisimo",
];
const FAILURE_WORDS: &[&str] = &["nada", "error", "fallo", "falla", "fracaso"];

/// Process-wide, read-only phrase tables.
#[derive(Debug)]
pub struct Lexicon {
    pub politeness: &'static [&'static str],
    pub complaint_roots: &'static [&'static str],
    pub positive_markers: &'static [&'static str],
    pub negation_words: &'static [&'static str],
    pub frustration_symbols: &'static [char],
    pub glossary: &'static [(&'static str, &'static str)],
    pub corrections: &'static [(&'static str, &'static str)],
    pub wait_words: &'static [&'static str],
    pub time_words: &'static [&'static str],
    pub compliment_words: &'static [&'static str],
    pub contrast_connectors: &'static [&'static str],
    pub resolution_verbs: &'static [&'static str],
    pub contrast_words: &'static [&'static str],
    pub irony_connectors: &'static [&'static str],
    pub resignation_markers: &'static [&'static str],
    pub delight_phrases: &'static [&'static str],
    pub delight_negation_phrases: &'static [&'static str],
    pub absent_quality_phrases: &'static [&'static str],
    pub absence_words: &'static [&'static str],
    pub dry_irony_markers: &'static [&'static str],
    pub hyperbolic_time_markers: &'static [&'static str],
    pub superlatives: &'static [&'static str],
    pub failure_words: &'static [&'static str],
}

static LEXICON: Lexicon = Lexicon {
    politeness: POLITENESS,
    complaint_roots: COMPLAINT_ROOTS,
    positive_markers: POSITIVE_MARKERS,
    negation_words: NEGATION_WORDS,
    frustration_symbols: FRUSTRATION_SYMBOLS,
    glossary: GLOSSARY,
    corrections: CORRECTIONS,
    wait_words: WAIT_WORDS,
    time_words: TIME_WORDS,
    compliment_words: COMPLIMENT_WORDS,
    contrast_connectors: CONTRAST_CONNECTORS,
    resolution_verbs: RESOLUTION_VERBS,
    contrast_words: CONTRAST_WORDS,
    irony_connectors: IRONY_CONNECTORS,
    resignation_markers: RESIGNATION_MARKERS,
    delight_phrases: DELIGHT_PHRASES,
    delight_negation_phrases: DELIGHT_NEGATION_PHRASES,
    absent_quality_phrases: ABSENT_QUALITY_PHRASES,
    absence_words: ABSENCE_WORDS,
    dry_irony_markers: DRY_IRONY_MARKERS,
    hyperbolic_time_markers: HYPERBOLIC_TIME_MARKERS,
    superlatives: SUPERLATIVES,
    failure_words: FAILURE_WORDS,
};

impl Lexicon {
    /// The process-wide table set. Callers that need the startup guarantee
    /// go through [`Lexicon::load`] instead.
    pub fn global() -> &'static Lexicon {
        &LEXICON
    }

    /// Validate and return the global tables. Startup refuses to serve
    /// when validation fails.
    pub fn load() -> Result<&'static Lexicon, LexiconError> {
        validate(&LEXICON)?;
        Ok(&LEXICON)
    }

    pub fn has_frustration_symbol(&self, text: &str) -> bool {
        text.chars().any(|c| self.frustration_symbols.contains(&c))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LexiconError {
    #[error("lexicon entry '{0}' is not lowercase")]
    NotLowercase(String),
    #[error("lexicon entry '{0}' contains a diacritic; store entries accent-free")]
    Diacritic(String),
    #[error("lexicon entry is empty")]
    Empty,
    #[error("rewrite '{term}' -> '{replacement}' is cyclic")]
    CyclicRewrite { term: String, replacement: String },
}

/// Check the table invariants: non-empty lowercase diacritic-free entries,
/// and rewrite tables whose outputs can never be rewritten again.
pub fn validate(lexicon: &Lexicon) -> Result<(), LexiconError> {
    let phrase_tables: &[&[&str]] = &[
        lexicon.politeness,
        lexicon.complaint_roots,
        lexicon.positive_markers,
        lexicon.negation_words,
        lexicon.wait_words,
        lexicon.time_words,
        lexicon.compliment_words,
        lexicon.contrast_connectors,
        lexicon.resolution_verbs,
        lexicon.contrast_words,
        lexicon.irony_connectors,
        lexicon.resignation_markers,
        lexicon.delight_phrases,
        lexicon.delight_negation_phrases,
        lexicon.absent_quality_phrases,
        lexicon.absence_words,
        lexicon.dry_irony_markers,
        lexicon.hyperbolic_time_markers,
        lexicon.superlatives,
        lexicon.failure_words,
    ];

    for table in phrase_tables {
        for entry in *table {
            check_entry(entry)?;
        }
    }

    for table in [lexicon.glossary, lexicon.corrections] {
        for (term, replacement) in table {
            check_entry(term)?;
            check_entry(replacement)?;
        }
        // A replacement that still contains any term of the same table
        // would make normalization non-idempotent.
        for (_, replacement) in table {
            if let Some((term, _)) = table.iter().find(|(term, _)| replacement.contains(term)) {
                return Err(LexiconError::CyclicRewrite {
                    term: (*term).to_string(),
                    replacement: (*replacement).to_string(),
                });
            }
        }
    }

    Ok(())
}

fn check_entry(entry: &str) -> Result<(), LexiconError> {
    if entry.is_empty() {
        return Err(LexiconError::Empty);
    }
    if entry.chars().any(|c| c.is_uppercase()) {
        return Err(LexiconError::NotLowercase(entry.to_string()));
    }
    if entry.chars().any(|c| "áéíóú".contains(c)) {
        return Err(LexiconError::Diacritic(entry.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_tables_pass_validation() {
        Lexicon::load().expect("shipped lexicon is valid");
    }

    #[test]
    fn rewrite_tables_are_acyclic() {
        let lexicon = Lexicon::global();
        for table in [lexicon.glossary, lexicon.corrections] {
            for (_, replacement) in table {
                assert!(
                    !table.iter().any(|(term, _)| replacement.contains(term)),
                    "replacement '{replacement}' is itself rewritable"
                );
            }
        }
    }

    #[test]
    fn validation_rejects_accented_entry() {
        assert_eq!(
            check_entry("demoró"),
            Err(LexiconError::Diacritic("demoró".to_string()))
        );
    }

    #[test]
    fn validation_rejects_uppercase_entry() {
        assert!(matches!(
            check_entry("Reclamo"),
            Err(LexiconError::NotLowercase(_))
        ));
    }

    #[test]
    fn frustration_symbols_are_detected() {
        let lexicon = Lexicon::global();
        assert!(lexicon.has_frustration_symbol("todo bien 🙃"));
        assert!(!lexicon.has_frustration_symbol("todo bien"));
    }

    #[test]
    fn eñe_is_a_legal_entry_character() {
        check_entry("dañado").expect("ñ is allowed");
    }
}
