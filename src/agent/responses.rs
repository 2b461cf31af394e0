//! Reply assembly: merges the triage decision with intent detection and
//! catalog lookups into a single customer-facing answer.

use crate::triage::EscalationDecision;

use super::catalog::Catalog;
use super::intents::{self, LogisticsSubtype};
use super::pricing;

/// Final agent answer for one message.
#[derive(Debug, Clone)]
pub struct AgentReply {
    pub text: String,
    pub escalate: bool,
}

const GREETINGS: &[&str] = &["hola", "buenos dias", "buenas tardes", "buenas noches"];
const THANKS: &[&str] = &["gracias", "muy amable", "te agradezco", "muchas gracias"];
const CLOSINGS: &[&str] = &["listo", "perfecto", "de acuerdo", "vale", "ok", "entendido"];

const DAMAGED_TERMS: &[&str] = &["dañado", "mal olor", "defectuoso", "vencido", "en mal estado"];

const FAQ_REPLY: &str = "Pedidos mínimos: 4 unidades (Congelados), 5 (Lácteos), 12 (Bebidas) o \
$200.000 COP mixto.\n\
Tiempos de entrega: 2–3 días hábiles principales / 4–6 regionales.\n\
Formas de pago: transferencia, tarjeta o contraentrega (zonas urbanas).\n\
Devoluciones: máximo 24h con evidencia.\n\
¿Quieres que te gestione una cotización o más información?";

const DAMAGED_REPLY: &str = "Lamentamos el inconveniente. Si un producto llegó dañado o en mal \
estado, puedes solicitar una devolución o cambio dentro de las 48 horas siguientes. \
¿Deseas que te envíe las instrucciones?";

const FALLBACK_REPLY: &str = "¿Podrías especificar qué producto o información necesitas?";

/// Build the reply for one message. The escalation decision always wins:
/// once triage says escalate, no later branch can demote the flag or
/// replace the hand-off text.
pub fn build_reply(raw: &str, decision: &EscalationDecision, catalog: &Catalog) -> AgentReply {
    if decision.escalate {
        return AgentReply {
            text: decision.response_text.clone(),
            escalate: true,
        };
    }

    let folded = fold(raw);

    if let Some(text) = courtesy_reply(&folded) {
        return AgentReply {
            text,
            escalate: false,
        };
    }

    if DAMAGED_TERMS.iter().any(|t| folded.contains(t)) {
        return AgentReply {
            text: DAMAGED_REPLY.to_string(),
            escalate: false,
        };
    }

    let additional = intents::detect_additional_intents(raw);

    if additional.discount_info {
        return AgentReply {
            text: discount_reply(&folded),
            escalate: false,
        };
    }

    if additional.faq {
        return AgentReply {
            text: FAQ_REPLY.to_string(),
            escalate: false,
        };
    }

    if let Some(logistics) = intents::detect_logistics_intent(raw) {
        return AgentReply {
            text: logistics_reply(logistics.subtype, logistics.city.as_deref()),
            escalate: false,
        };
    }

    let mentions = catalog.extract_mentions(raw);
    if !mentions.is_empty() {
        return AgentReply {
            text: quote_reply(catalog, &mentions),
            escalate: false,
        };
    }

    AgentReply {
        text: FALLBACK_REPLY.to_string(),
        escalate: false,
    }
}

/// One-line exchange summary for the wire response and the interaction
/// log, both sides truncated.
pub fn build_summary(message: &str, reply: &str) -> String {
    format!(
        "Cliente: {} | Agente: {}",
        truncate(message.trim(), 120),
        truncate(reply, 120)
    )
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{cut}…")
    }
}

/// Greeting, thanks, or closing pleasantry. Saves the customer from the
/// clarifying fallback on small talk.
fn courtesy_reply(folded: &str) -> Option<String> {
    if GREETINGS.iter().any(|k| folded.contains(k)) {
        Some("¡Hola! 😊 ¿En qué puedo ayudarte hoy?".to_string())
    } else if THANKS.iter().any(|k| folded.contains(k)) {
        Some("¡Con gusto! Si necesitas algo más, estoy aquí para ayudarte. 🙌".to_string())
    } else if CLOSINGS.iter().any(|k| folded.contains(k)) {
        Some("Excelente 👍. Quedo atento por si deseas continuar con tu pedido o consulta.".to_string())
    } else {
        None
    }
}

fn discount_reply(folded: &str) -> String {
    if ["bebida", "jugo", "agua", "gaseosa"].iter().any(|k| folded.contains(k)) {
        "Actualmente tenemos 10% de descuento en bebidas y jugos seleccionados.".to_string()
    } else if ["lacteo", "queso", "yogurt", "leche"].iter().any(|k| folded.contains(k)) {
        "Tenemos 8% de descuento en lácteos esta semana.".to_string()
    } else if ["congelado", "carne", "pollo", "pescado"].iter().any(|k| folded.contains(k)) {
        "Promoción del 12% en congelados hasta el domingo.".to_string()
    } else {
        "Tenemos promociones activas en varias categorías. ¿Te gustaría conocer las ofertas actuales?"
            .to_string()
    }
}

fn logistics_reply(subtype: LogisticsSubtype, city: Option<&str>) -> String {
    match subtype {
        LogisticsSubtype::Weekend => "Realizamos entregas de lunes a sábado. Los domingos están \
            sujetos a disponibilidad del operador logístico. ¿Deseas que te confirme si tu zona \
            tiene cobertura en fin de semana?"
            .to_string(),
        LogisticsSubtype::TimeWindow => "Nuestros repartos se programan por franjas horarias: \
            mañana (8–12), tarde (12–17) y noche (17–20), según cobertura. ¿Deseas que te \
            confirme la franja disponible para tu zona?"
            .to_string(),
        LogisticsSubtype::Coverage => "Realizamos envíos a nivel nacional. Cobertura directa en \
            ciudades principales y vía transportadora para zonas regionales. ¿Deseas que valide \
            si llegamos a tu municipio?"
            .to_string(),
        LogisticsSubtype::CityDelivery => {
            if let Some(text) = city.and_then(city_delivery_text) {
                format!("{text} ¿Deseas que te confirme el tiempo exacto de entrega en esa zona?")
            } else {
                generic_logistics_reply()
            }
        }
        LogisticsSubtype::DeliveryTime | LogisticsSubtype::Generic => generic_logistics_reply(),
    }
}

fn generic_logistics_reply() -> String {
    "Los tiempos de entrega son de 2 a 3 días hábiles en ciudades principales y de 4 a 6 días en \
     regionales. ¿Deseas que te confirme la disponibilidad para tu zona?"
        .to_string()
}

fn city_delivery_text(city: &str) -> Option<&'static str> {
    match city.to_lowercase().as_str() {
        "bogota" => Some("Para Bogotá: entrega en 2–3 días hábiles."),
        "medellin" => Some("Para Medellín: entrega en 2–3 días hábiles."),
        "cali" => Some("Para Cali: entrega en 3–4 días hábiles."),
        "barranquilla" => Some("Para Barranquilla: entrega en 3–5 días hábiles."),
        "cartagena" => Some("Para Cartagena: entrega en 3–5 días hábiles."),
        "bucaramanga" => Some("Para Bucaramanga: entrega en 3–5 días hábiles."),
        "pereira" => Some("Para Pereira: entrega en 3–4 días hábiles."),
        "manizales" => Some("Para Manizales: entrega en 3–4 días hábiles."),
        "cucuta" => Some("Para Cúcuta (zona regional): entrega en 4–6 días hábiles."),
        _ => None,
    }
}

/// Itemized quote for every priced mention, or a clarifying line when no
/// mentioned product has a usable price.
fn quote_reply(catalog: &Catalog, mentions: &[super::catalog::ProductMention]) -> String {
    let mut lines = Vec::new();
    let mut total = 0.0;

    for mention in mentions {
        if let Some(product) = catalog.find(&mention.nombre) {
            if let (Some(line), Some(subtotal)) = (
                pricing::quote_line(product, mention.cantidad),
                pricing::line_total(product, mention.cantidad),
            ) {
                lines.push(line);
                total += subtotal;
            }
        }
    }

    if lines.is_empty() {
        return FALLBACK_REPLY.to_string();
    }

    lines.push(pricing::total_line(total));
    format!(
        "{}\n¿Deseas que te envíe la cotización detallada?",
        lines.join("\n")
    )
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triage;
    use std::io::Cursor;

    const SAMPLE: &str = "\
Producto,Categoria,Formato,PrecioLista
papas congeladas,Congelados,bolsa 2.5kg,18500
yogurt,Lacteos,pack x6,12900
jugo de naranja,Bebidas,botella 1L,6500
queso,Lacteos,bloque 500g,no-definido
";

    fn catalog() -> Catalog {
        Catalog::from_reader(Cursor::new(SAMPLE)).expect("sample catalog parses")
    }

    fn reply(raw: &str) -> AgentReply {
        let decision = triage::evaluate(raw);
        build_reply(raw, &decision, &catalog())
    }

    #[test]
    fn escalation_wins_over_every_other_branch() {
        let reply = reply("perfecto, llevo 3 horas esperando y tienen promoción?");
        assert!(reply.escalate);
        assert!(reply.text.contains("escalaré tu caso"));
    }

    #[test]
    fn greeting_gets_a_courtesy_reply() {
        let reply = reply("Hola, buenos días");
        assert!(!reply.escalate);
        assert!(reply.text.contains("¿En qué puedo ayudarte"));
    }

    #[test]
    fn thanks_get_a_courtesy_reply() {
        let reply = reply("muchas gracias, muy amable");
        assert!(!reply.escalate);
        assert!(reply.text.contains("Con gusto"));
    }

    #[test]
    fn discount_question_is_answered_by_category() {
        let reply = reply("¿tienen descuento en jugos?");
        assert!(!reply.escalate);
        assert!(reply.text.contains("10% de descuento en bebidas"));
    }

    #[test]
    fn faq_topic_gets_the_faq_reply() {
        let reply = reply("¿cuál es el pedido mínimo y las formas de pago?");
        assert!(!reply.escalate);
        assert!(reply.text.contains("Pedidos mínimos"));
    }

    #[test]
    fn logistics_question_is_typed_and_answered() {
        let weekend = reply("¿entregan los domingos?");
        assert!(!weekend.escalate);
        assert!(weekend.text.contains("lunes a sábado"));

        let city = reply("¿hacen envío a Cali?");
        assert!(city.text.contains("Para Cali"));
    }

    #[test]
    fn product_mentions_produce_an_itemized_quote() {
        let reply = reply("quiero 3 yogures y un jugo de naranja");
        assert!(!reply.escalate);
        assert!(reply.text.contains("3 × yogurt (pack x6) = $38,700 COP"));
        assert!(reply.text.contains("1 × jugo de naranja (botella 1L) = $6,500 COP"));
        assert!(reply.text.contains("Total estimado: $45,200 COP"));
    }

    #[test]
    fn unpriced_product_degrades_to_clarifying_reply() {
        let reply = reply("quiero 2 quesos");
        assert!(!reply.escalate);
        assert_eq!(reply.text, FALLBACK_REPLY);
    }

    #[test]
    fn unknown_message_falls_back_to_clarifying_reply() {
        let reply = reply("xyzzy");
        assert!(!reply.escalate);
        assert_eq!(reply.text, FALLBACK_REPLY);
    }

    #[test]
    fn summary_quotes_both_sides_of_the_exchange() {
        let summary = build_summary("  hola  ", "¡Hola! 😊 ¿En qué puedo ayudarte hoy?");
        assert_eq!(
            summary,
            "Cliente: hola | Agente: ¡Hola! 😊 ¿En qué puedo ayudarte hoy?"
        );
    }

    #[test]
    fn summary_truncates_long_messages_on_char_boundaries() {
        let long_message = "ñ".repeat(300);
        let summary = build_summary(&long_message, "respuesta");
        let quoted: String = "ñ".repeat(120) + "…";
        assert!(summary.starts_with(&format!("Cliente: {quoted}")));
        assert!(summary.ends_with("Agente: respuesta"));
    }
}
