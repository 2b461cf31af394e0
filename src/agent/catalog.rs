//! CSV-backed product catalog with synonym-based product extraction.

use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("catalog has no products")]
    Empty,
}

/// One catalog entry. A malformed price is kept as `None` so a lookup
/// never fails; pricing degrades instead.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub nombre: String,
    pub categoria: String,
    pub formato: String,
    pub precio_lista: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Producto")]
    producto: String,
    #[serde(rename = "Categoria", default)]
    categoria: String,
    #[serde(rename = "Formato", default)]
    formato: String,
    #[serde(rename = "PrecioLista", default)]
    precio_lista: String,
}

/// Read-only product table, loaded once at startup.
#[derive(Debug)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut products = Vec::new();
        for row in csv_reader.deserialize::<CatalogRow>() {
            let row = row?;
            products.push(Product {
                nombre: row.producto,
                categoria: row.categoria,
                formato: row.formato,
                precio_lista: row.precio_lista.replace(',', ".").parse::<f64>().ok(),
            });
        }

        if products.is_empty() {
            return Err(CatalogError::Empty);
        }

        Ok(Self { products })
    }

    /// Case- and accent-insensitive lookup by canonical name. A miss is
    /// "no match", never an error.
    pub fn find(&self, name: &str) -> Option<&Product> {
        let wanted = fold(name);
        self.products
            .iter()
            .find(|product| fold(&product.nombre) == wanted)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// All products mentioned in a message, with quantities. A product
    /// mentioned without a number counts as one unit.
    pub fn extract_mentions(&self, text: &str) -> Vec<ProductMention> {
        let folded = fold(text);
        let mut mentions = Vec::new();

        for matcher in synonym_matchers() {
            if self.find(&matcher.canonical).is_none() {
                continue;
            }

            // Saturating: absurd quantities must not panic the chat path.
            let mut cantidad = 0u32;
            for captures in matcher.quantified.captures_iter(&folded) {
                let number = captures
                    .get(1)
                    .or_else(|| captures.get(2))
                    .and_then(|m| m.as_str().parse::<u32>().ok());
                if let Some(n) = number {
                    cantidad = cantidad.saturating_add(n);
                }
            }

            if cantidad == 0 && matcher.presence.is_match(&folded) {
                cantidad = 1;
            }

            if cantidad > 0 {
                mentions.push(ProductMention {
                    nombre: matcher.canonical.clone(),
                    cantidad,
                });
            }
        }

        mentions
    }
}

/// A product mention resolved to its canonical catalog name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductMention {
    pub nombre: String,
    pub cantidad: u32,
}

/// Canonical product names and the colloquial variants customers use.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("papas congeladas", &["papas", "papa congelada", "papas a la francesa"]),
    ("yogurt", &["yogur", "yogurt griego"]),
    ("leche", &["leche entera", "leche deslactosada"]),
    ("queso", &["queso campesino", "queso doble crema"]),
    ("jugo de naranja", &["jugo", "zumo"]),
    ("agua", &["agua en botella", "botellon de agua"]),
    ("gaseosa", &["refresco", "bebida gaseosa"]),
    ("pollo", &["pechuga", "pollo entero"]),
    ("carne de res", &["carne", "res"]),
    ("pescado", &["tilapia", "filete de pescado"]),
];

struct SynonymMatcher {
    canonical: String,
    /// "3 papas" or "papas x 3" style, tolerating plural s/es.
    quantified: Regex,
    presence: Regex,
}

fn synonym_matchers() -> &'static [SynonymMatcher] {
    static MATCHERS: OnceLock<Vec<SynonymMatcher>> = OnceLock::new();
    MATCHERS.get_or_init(|| {
        SYNONYMS
            .iter()
            .map(|(canonical, variants)| {
                let alternatives: Vec<String> = std::iter::once(*canonical)
                    .chain(variants.iter().copied())
                    .map(variant_pattern)
                    .collect();
                let group = format!("(?:{})", alternatives.join("|"));

                let quantified = Regex::new(&format!(
                    r"\b(\d+)\s+(?:de\s+)?{group}\b|\b{group}\b\s*(?:x\s*)?(\d+)\b"
                ))
                .expect("quantified synonym pattern compiles");
                let presence = Regex::new(&format!(r"\b{group}\b"))
                    .expect("presence synonym pattern compiles");

                SynonymMatcher {
                    canonical: (*canonical).to_string(),
                    quantified,
                    presence,
                }
            })
            .collect()
    })
}

/// Each word of the variant tolerates a plural suffix; spaces match any
/// whitespace run.
fn variant_pattern(variant: &str) -> String {
    variant
        .split_whitespace()
        .map(|word| format!("{}(?:s|es)?", regex::escape(word)))
        .collect::<Vec<_>>()
        .join(r"\s+")
}

/// Lowercase and fold the five accented vowels, mirroring the triage
/// normalizer's handling so catalog lookups agree with scored text.
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

    #[test]
    fn parses_rows_and_prices() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 4);
        let papas = catalog.find("papas congeladas").expect("present");
        assert_eq!(papas.precio_lista, Some(18500.0));
    }

    #[test]
    fn malformed_price_degrades_to_none() {
        let catalog = catalog();
        let queso = catalog.find("queso").expect("present");
        assert_eq!(queso.precio_lista, None);
    }

    #[test]
    fn lookup_ignores_case_and_accents() {
        assert!(catalog().find("Papas Congeladas").is_some());
        assert!(catalog().find("YOGURT").is_some());
        assert!(catalog().find("arepas").is_none());
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let error = Catalog::from_reader(Cursor::new("Producto,Categoria,Formato,PrecioLista\n"))
            .expect_err("empty catalog is fatal");
        assert!(matches!(error, CatalogError::Empty));
    }

    #[test]
    fn extracts_products_with_quantities() {
        let mentions = catalog().extract_mentions("Envíame 3 papas congeladas y 2 yogures");
        assert!(mentions.contains(&ProductMention {
            nombre: "papas congeladas".to_string(),
            cantidad: 3,
        }));
        assert!(mentions.contains(&ProductMention {
            nombre: "yogurt".to_string(),
            cantidad: 2,
        }));
    }

    #[test]
    fn bare_mention_counts_as_one() {
        let mentions = catalog().extract_mentions("¿tienen jugo de naranja?");
        assert_eq!(
            mentions,
            vec![ProductMention {
                nombre: "jugo de naranja".to_string(),
                cantidad: 1,
            }]
        );
    }

    #[test]
    fn repeated_oversized_quantities_saturate_instead_of_overflowing() {
        let mentions = catalog()
            .extract_mentions("4000000000 papas y tambien 4000000000 papas congeladas");
        assert_eq!(
            mentions,
            vec![ProductMention {
                nombre: "papas congeladas".to_string(),
                cantidad: u32::MAX,
            }]
        );
    }

    #[test]
    fn products_missing_from_catalog_are_skipped() {
        // "pollo" has a synonym entry but is not in the sample CSV.
        let mentions = catalog().extract_mentions("quiero 5 pollos");
        assert!(mentions.is_empty());
    }
}
