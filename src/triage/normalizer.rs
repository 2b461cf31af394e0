//! Canonicalizes raw customer text before scoring.
//!
//! The steps run in a fixed order over the whole string: lowercase,
//! glossary rewrite, vowel-accent strip, misspelling rewrite, character
//! whitelist, whitespace collapse. Output depends only on the input and
//! the static lexicon tables.

use super::lexicon::Lexicon;

pub fn normalize(raw: &str, lexicon: &Lexicon) -> String {
    let mut text = raw.to_lowercase();

    // Glossary pairs are independent passes; each rewrites every
    // occurrence of its term.
    for (term, root) in lexicon.glossary {
        if text.contains(term) {
            text = text.replace(term, root);
        }
    }

    let text = strip_vowel_accents(&text);

    let mut text = text;
    for (term, correction) in lexicon.corrections {
        if text.contains(term) {
            text = text.replace(term, correction);
        }
    }

    // Anything outside the whitelist becomes a space, then runs of
    // whitespace collapse to one.
    let whitelisted: String = text
        .chars()
        .map(|c| if keep_char(c, lexicon) { c } else { ' ' })
        .collect();

    whitelisted.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Only the five accented Latin vowels are folded; no other accent
/// handling is attempted.
fn strip_vowel_accents(text: &str) -> String {
    text.chars()
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

fn keep_char(c: char, lexicon: &Lexicon) -> bool {
    c.is_ascii_lowercase()
        || c.is_ascii_digit()
        || c.is_whitespace()
        || c == 'ñ'
        || lexicon.frustration_symbols.contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> &'static Lexicon {
        Lexicon::global()
    }

    #[test]
    fn lowercases_and_collapses_whitespace() {
        assert_eq!(
            normalize("  Hola,   BUENOS   días!! ", lexicon()),
            "hola buenos dias"
        );
    }

    #[test]
    fn strips_vowel_accents_only() {
        assert_eq!(
            normalize("el pedido llegó dañado", lexicon()),
            "el pedido llego dañado"
        );
    }

    #[test]
    fn applies_glossary_rewrites() {
        assert_eq!(
            normalize("hay un delay con mi orden", lexicon()),
            "hay un demora con mi orden"
        );
    }

    #[test]
    fn applies_misspelling_corrections() {
        assert_eq!(
            normalize("grasias, porfavor revisen", lexicon()),
            "gracias por favor revisen"
        );
    }

    #[test]
    fn keeps_frustration_symbols() {
        assert_eq!(normalize("¿¿nada?? 🙃", lexicon()), "nada 🙃");
    }

    #[test]
    fn drops_punctuation_to_single_spaces() {
        assert_eq!(
            normalize("pedido #42 --- incompleto...", lexicon()),
            "pedido 42 incompleto"
        );
    }

    #[test]
    fn normalize_is_idempotent_on_shipped_tables() {
        let samples = [
            "Grasias!! el pedido llegó con delay 🙄",
            "¿Podrían revisar mi qeja? porfavor",
            "todo perfecto, nada que decir",
            "",
        ];
        for sample in samples {
            let once = normalize(sample, lexicon());
            let twice = normalize(&once, lexicon());
            assert_eq!(once, twice, "normalize must be idempotent for {sample:?}");
        }
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize("", lexicon()), "");
        assert_eq!(normalize("   ", lexicon()), "");
    }
}
