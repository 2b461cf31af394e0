//! Quote formatting in Colombian pesos.

use super::catalog::Product;

/// Units at which a volume discount applies.
pub const VOLUME_DISCOUNT_UNITS: u32 = 12;
/// Discount rate for volume orders.
pub const VOLUME_DISCOUNT_RATE: f64 = 0.08;

/// One quoted line plus the estimated total, matching the format
/// `N × nombre (formato) = $X COP`. Returns `None` when the catalog has
/// no usable price so the caller can degrade to a clarifying reply.
pub fn quote_line(product: &Product, cantidad: u32) -> Option<String> {
    let precio = product.precio_lista?;
    let subtotal = precio * f64::from(cantidad);

    let (total, discount_note) = if cantidad >= VOLUME_DISCOUNT_UNITS {
        (
            subtotal * (1.0 - VOLUME_DISCOUNT_RATE),
            format!(
                " (incluye {}% de descuento por volumen)",
                (VOLUME_DISCOUNT_RATE * 100.0).round() as u32
            ),
        )
    } else {
        (subtotal, String::new())
    };

    Some(format!(
        "{} × {} ({}) = ${} COP{}",
        cantidad,
        product.nombre,
        product.formato,
        format_cop(total),
        discount_note
    ))
}

/// Total line for a multi-item quote.
pub fn total_line(total: f64) -> String {
    format!(
        "Total estimado: ${} COP (sujeto a confirmación de ventas)",
        format_cop(total)
    )
}

/// Subtotal for one line, discount applied. `None` when the price is
/// missing.
pub fn line_total(product: &Product, cantidad: u32) -> Option<f64> {
    let subtotal = product.precio_lista? * f64::from(cantidad);
    if cantidad >= VOLUME_DISCOUNT_UNITS {
        Some(subtotal * (1.0 - VOLUME_DISCOUNT_RATE))
    } else {
        Some(subtotal)
    }
}

/// Rounded to whole pesos with thousands separators.
fn format_cop(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if rounded < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(nombre: &str, formato: &str, precio: Option<f64>) -> Product {
        Product {
            nombre: nombre.to_string(),
            categoria: "Lacteos".to_string(),
            formato: formato.to_string(),
            precio_lista: precio,
        }
    }

    #[test]
    fn formats_a_quote_line() {
        let yogurt = product("yogurt", "pack x6", Some(12900.0));
        assert_eq!(
            quote_line(&yogurt, 3).as_deref(),
            Some("3 × yogurt (pack x6) = $38,700 COP")
        );
    }

    #[test]
    fn volume_orders_get_the_discount() {
        let leche = product("leche", "caja 1L", Some(4000.0));
        let line = quote_line(&leche, 12).expect("priced");
        // 48,000 minus 8% = 44,160
        assert!(line.contains("$44,160 COP"));
        assert!(line.contains("descuento por volumen"));
        assert_eq!(line_total(&leche, 12), Some(44160.0));
    }

    #[test]
    fn missing_price_degrades_to_none() {
        let queso = product("queso", "bloque 500g", None);
        assert_eq!(quote_line(&queso, 2), None);
        assert_eq!(line_total(&queso, 2), None);
    }

    #[test]
    fn cop_grouping_handles_small_and_large_amounts() {
        assert_eq!(format_cop(950.0), "950");
        assert_eq!(format_cop(1500.4), "1,500");
        assert_eq!(format_cop(1234567.0), "1,234,567");
    }

    #[test]
    fn total_line_mentions_confirmation() {
        assert_eq!(
            total_line(38700.0),
            "Total estimado: $38,700 COP (sujeto a confirmación de ventas)"
        );
    }
}
