//! Keyword- and regex-based intent detection for the sales agent.
//!
//! All detectors work on folded text (lowercase, accents stripped) so
//! "Envían a Bogotá?" and "envian a bogota" resolve identically.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Top-level routing intent for a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneralIntent {
    Quote,
    Faq,
    Other,
}

/// How close the customer is to placing an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseIntent {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogisticsSubtype {
    Weekend,
    TimeWindow,
    Coverage,
    DeliveryTime,
    CityDelivery,
    Generic,
}

/// A logistics question, typed and optionally pinned to a city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogisticsIntent {
    pub subtype: LogisticsSubtype,
    pub city: Option<String>,
}

/// Secondary flags that adjust the reply without changing the route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AdditionalIntents {
    pub faq: bool,
    pub discount_info: bool,
}

const QUOTE_KEYWORDS: &[&str] = &["precio", "cuanto", "cotiza", "total", "cuenta"];
const FAQ_ROUTE_KEYWORDS: &[&str] = &[
    "tiempo",
    "entrega",
    "minimo",
    "pago",
    "invima",
    "certificado",
];

const HIGH_INTENT: &[&str] = &[
    "enviame",
    "hazme la cuenta",
    "quiero pedir",
    "cotizame",
    "necesito para",
    "urgente",
    "mandame la cotizacion",
    "como te pago",
    "cuanto me sale",
    "ya tengo pedido",
];

const MEDIUM_INTENT: &[&str] = &[
    "me interesa",
    "cuanto vale",
    "que precio tiene",
    "pueden enviar",
    "cuanto demora",
    "quiero saber si tienen",
    "podrian cotizarme",
    "estoy mirando precios",
];

const FAQ_KEYWORDS: &[&str] = &[
    "minimo",
    "minimos",
    "compra minima",
    "pedido minimo",
    "forma de pago",
    "formas de pago",
    "pago",
    "pagos",
    "contraentrega",
    "efectivo",
    "tarjeta",
    "credito",
    "debito",
    "devolucion",
    "devoluciones",
    "cambio",
    "cambios",
    "reembolso",
    "reembolsos",
    "disponibilidad",
    "stock",
    "existencias",
    "combinar",
    "mezclar",
    "mismo pedido",
    "certificado",
    "invima",
    "iva",
];

const DISCOUNT_KEYWORDS: &[&str] = &[
    "promocion",
    "oferta",
    "descuento",
    "descuentos",
    "rebaja",
    "promo",
    "en oferta",
];

/// Informational topics that must never be mistaken for a complaint.
const SAFE_KEYWORDS: &[&str] = &[
    "invima",
    "certificado invima",
    "iva",
    "descuento",
    "promocion",
    "oferta",
    "certificado",
];

/// Route the message: pricing question, FAQ topic, or anything else.
pub fn detect_intent(text: &str) -> GeneralIntent {
    let folded = fold(text);
    if contains_any(&folded, QUOTE_KEYWORDS) {
        GeneralIntent::Quote
    } else if contains_any(&folded, FAQ_ROUTE_KEYWORDS) {
        GeneralIntent::Faq
    } else {
        GeneralIntent::Other
    }
}

/// Classify buying readiness. Bulk-order phrasing promotes any message
/// to high intent.
pub fn detect_purchase_intent(text: &str) -> PurchaseIntent {
    let folded = fold(text);

    if contains_any(&folded, HIGH_INTENT) || bulk_order_regex().is_match(&folded) {
        return PurchaseIntent::High;
    }
    if contains_any(&folded, MEDIUM_INTENT) {
        return PurchaseIntent::Medium;
    }
    PurchaseIntent::Low
}

/// Detect a logistics question and classify it. The subtype checks run
/// in priority order; a city mention upgrades a generic question to
/// `CityDelivery`.
pub fn detect_logistics_intent(text: &str) -> Option<LogisticsIntent> {
    if text.trim().is_empty() {
        return None;
    }

    let folded = fold(text);
    let patterns = logistics_patterns();

    if !patterns.keywords.iter().any(|p| p.is_match(&folded)) {
        return None;
    }

    let mut subtype = if patterns.weekend.is_match(&folded) {
        LogisticsSubtype::Weekend
    } else if patterns.time_window.is_match(&folded) {
        LogisticsSubtype::TimeWindow
    } else if patterns.coverage.is_match(&folded) {
        LogisticsSubtype::Coverage
    } else if patterns.delivery_time.is_match(&folded) {
        LogisticsSubtype::DeliveryTime
    } else {
        LogisticsSubtype::Generic
    };

    let city = patterns
        .city
        .captures(&folded)
        .and_then(|captures| captures.get(2))
        .map(|m| title_case(m.as_str()));

    if city.is_some() && subtype == LogisticsSubtype::Generic {
        subtype = LogisticsSubtype::CityDelivery;
    }

    Some(LogisticsIntent { subtype, city })
}

/// Detect FAQ and discount flags. Safe informational topics force the
/// FAQ route so certificate or tax questions never read as complaints.
pub fn detect_additional_intents(text: &str) -> AdditionalIntents {
    let folded = fold(text);

    let mut intents = AdditionalIntents {
        faq: contains_any(&folded, FAQ_KEYWORDS),
        discount_info: contains_any(&folded, DISCOUNT_KEYWORDS),
    };

    if contains_any(&folded, SAFE_KEYWORDS) {
        intents.faq = true;
    }

    intents
}

struct LogisticsPatterns {
    keywords: Vec<Regex>,
    weekend: Regex,
    time_window: Regex,
    coverage: Regex,
    delivery_time: Regex,
    city: Regex,
}

fn logistics_patterns() -> &'static LogisticsPatterns {
    static PATTERNS: OnceLock<LogisticsPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| LogisticsPatterns {
        keywords: [
            r"\b(entrega|entregan|entregar|entregado|entregas)\b",
            r"\b(envio|envian|enviar|enviarlo|envios)\b",
            r"\b(despacho|despachos|despachan|despachar)\b",
            r"\b(reparto|repartos|domicilio|domicilios|mensajeria|repartidor)\b",
            r"\b(cobertura|cubren|alcance)\b",
            r"\b(horario|hora|horas|mañana|tarde|noche|noches|fines?\s+de\s+semana|sabados?|domingos?)\b",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("logistics keyword pattern compiles"))
        .collect(),
        weekend: Regex::new(r"\b(fines?\s+de\s+semana|sabados?|domingos?)\b")
            .expect("weekend pattern compiles"),
        time_window: Regex::new(r"\b(horario|hora|horas|mañana|tarde|noche|noches)\b")
            .expect("time window pattern compiles"),
        coverage: Regex::new(r"\b(cobertura|cubren|alcance|otras?\s+ciudades|fuera|nacional|envian\s+a)\b")
            .expect("coverage pattern compiles"),
        delivery_time: Regex::new(r"\b(cuanto\s+tardan?|tiempos?\s+de\s+entrega|plazo)\b")
            .expect("delivery time pattern compiles"),
        city: Regex::new(
            r"\b(en|a)\s+(bogota|medellin|cali|barranquilla|cartagena|bucaramanga|pereira|manizales|cucuta)\b",
        )
        .expect("city pattern compiles"),
    })
}

fn bulk_order_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"\b\d+\s*(unidades?|cajas?|bultos?|litros?|kilos?|sacos?)\b|\bpedido grande\b|\ben cantidad\b",
        )
        .expect("bulk order pattern compiles")
    })
}

fn contains_any(folded: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| folded.contains(k))
}

fn fold(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' => 'u',
            other => other,
        })
        .collect()
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_questions_route_to_quote() {
        assert_eq!(detect_intent("¿Cuánto vale la leche?"), GeneralIntent::Quote);
        assert_eq!(detect_intent("hazme la cuenta"), GeneralIntent::Quote);
    }

    #[test]
    fn delivery_and_payment_route_to_faq() {
        assert_eq!(detect_intent("tiempo de entrega?"), GeneralIntent::Faq);
        assert_eq!(detect_intent("formas de pago"), GeneralIntent::Faq);
    }

    #[test]
    fn unrelated_text_routes_to_other() {
        assert_eq!(detect_intent("hola buenas"), GeneralIntent::Other);
    }

    #[test]
    fn explicit_order_phrasing_is_high_intent() {
        assert_eq!(
            detect_purchase_intent("envíame 2 yogures por favor"),
            PurchaseIntent::High
        );
        assert_eq!(
            detect_purchase_intent("¿cómo te pago?"),
            PurchaseIntent::High
        );
    }

    #[test]
    fn bulk_quantities_promote_to_high_intent() {
        assert_eq!(
            detect_purchase_intent("me interesa, serían 30 cajas"),
            PurchaseIntent::High
        );
        assert_eq!(
            detect_purchase_intent("necesito un pedido grande"),
            PurchaseIntent::High
        );
    }

    #[test]
    fn browsing_phrasing_is_medium_intent() {
        assert_eq!(
            detect_purchase_intent("estoy mirando precios"),
            PurchaseIntent::Medium
        );
    }

    #[test]
    fn everything_else_is_low_intent() {
        assert_eq!(detect_purchase_intent("hola"), PurchaseIntent::Low);
    }

    #[test]
    fn weekend_delivery_question_is_typed() {
        let intent = detect_logistics_intent("¿Entregan los sábados?").expect("logistics");
        assert_eq!(intent.subtype, LogisticsSubtype::Weekend);
        assert_eq!(intent.city, None);
    }

    #[test]
    fn city_mention_upgrades_generic_logistics() {
        let intent = detect_logistics_intent("¿Hacen envío a Medellín?").expect("logistics");
        assert_eq!(intent.subtype, LogisticsSubtype::CityDelivery);
        assert_eq!(intent.city.as_deref(), Some("Medellin"));
    }

    #[test]
    fn coverage_question_is_typed() {
        let intent = detect_logistics_intent("¿Tienen cobertura nacional?").expect("logistics");
        assert_eq!(intent.subtype, LogisticsSubtype::Coverage);
    }

    #[test]
    fn non_logistics_text_yields_none() {
        assert!(detect_logistics_intent("quiero 3 yogures").is_none());
        assert!(detect_logistics_intent("   ").is_none());
    }

    #[test]
    fn discount_and_faq_flags_are_detected() {
        let intents = detect_additional_intents("¿tienen alguna promoción en lácteos?");
        assert!(intents.discount_info);

        let intents = detect_additional_intents("¿cuál es el pedido mínimo?");
        assert!(intents.faq);
    }

    #[test]
    fn safe_topics_force_the_faq_route() {
        let intents = detect_additional_intents("¿el certificado invima está vigente?");
        assert!(intents.faq);
        assert!(!intents.discount_info);
    }

    #[test]
    fn delivery_questions_do_not_trip_the_faq_flag() {
        let intents = detect_additional_intents("¿entregan los domingos?");
        assert!(!intents.faq);
    }
}
