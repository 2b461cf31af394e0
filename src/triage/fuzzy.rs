//! Approximate phrase containment for typo-tolerant complaint matching.

/// Similarity floor for a token to count as an approximate hit.
pub const DEFAULT_THRESHOLD: f64 = 0.82;

/// Word characters are ASCII alphanumerics plus `ñ`; everything else is a
/// token boundary.
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == 'ñ'
}

/// Split text into alphanumeric runs.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| !is_word_char(c))
        .filter(|token| !token.is_empty())
        .collect()
}

/// True when any token of `text` is close enough to `root`: either the
/// token contains `root` literally, or its normalized similarity reaches
/// the threshold.
pub fn fuzzy_contains(text: &str, root: &str) -> bool {
    fuzzy_contains_with(text, root, DEFAULT_THRESHOLD)
}

pub fn fuzzy_contains_with(text: &str, root: &str, threshold: f64) -> bool {
    tokenize(text)
        .into_iter()
        .any(|token| token.contains(root) || strsim::normalized_levenshtein(token, root) >= threshold)
}

/// Exact membership used by the scorer: `phrase` occurs in `text` and is
/// not embedded inside a longer alphanumeric run. This keeps "reclamoo"
/// out of the exact path so the fuzzy weight applies instead.
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    first_phrase_position(text, phrase).is_some()
}

/// Complaint-root membership: like [`contains_phrase`] but a trailing
/// plural suffix (`s`/`es`) also counts as a boundary, so "reclamos" and
/// "errores" score as exact roots while longer embeddings ("reclamoo")
/// still fall to the fuzzy path. Not used for the short function words
/// (negations, connectors) where "no"+"s" would false-positive on "nos".
pub fn contains_root(text: &str, root: &str) -> bool {
    if root.is_empty() {
        return false;
    }

    for (byte_idx, _) in text.match_indices(root) {
        let before_ok = text[..byte_idx]
            .chars()
            .next_back()
            .map_or(true, |c| !is_word_char(c));
        if before_ok && plural_boundary_after(&text[byte_idx + root.len()..]) {
            return true;
        }
    }
    false
}

fn plural_boundary_after(rest: &str) -> bool {
    ["", "s", "es"].iter().any(|suffix| {
        rest.strip_prefix(suffix)
            .is_some_and(|tail| tail.chars().next().map_or(true, |c| !is_word_char(c)))
    })
}

/// Char offset of the first boundary-respecting occurrence of `phrase`.
pub fn first_phrase_position(text: &str, phrase: &str) -> Option<usize> {
    phrase_positions(text, phrase).into_iter().next()
}

/// Char offsets of every boundary-respecting occurrence of `phrase`.
pub fn phrase_positions(text: &str, phrase: &str) -> Vec<usize> {
    if phrase.is_empty() {
        return Vec::new();
    }

    let mut positions = Vec::new();
    for (byte_idx, _) in text.match_indices(phrase) {
        let before_ok = text[..byte_idx]
            .chars()
            .next_back()
            .map_or(true, |c| !is_word_char(c));
        let after_ok = text[byte_idx + phrase.len()..]
            .chars()
            .next()
            .map_or(true, |c| !is_word_char(c));
        if before_ok && after_ok {
            positions.push(text[..byte_idx].chars().count());
        }
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_on_punctuation_and_whitespace() {
        assert_eq!(
            tokenize("hola, pedido #42: dañado!"),
            vec!["hola", "pedido", "42", "dañado"]
        );
    }

    #[test]
    fn exact_substring_of_a_token_matches() {
        assert!(fuzzy_contains("tengo reclamos pendientes", "reclamo"));
    }

    #[test]
    fn close_misspelling_matches() {
        // normalized levenshtein("reclamoo", "reclamo") = 0.875
        assert!(fuzzy_contains("tengo un reclamoo", "reclamo"));
    }

    #[test]
    fn distant_words_do_not_match() {
        assert!(!fuzzy_contains("quiero una cotizacion", "reclamo"));
    }

    #[test]
    fn threshold_is_honored() {
        // "queja" vs "qeja" = 0.8: below the default floor, above 0.75.
        assert!(!fuzzy_contains_with("tengo una qeja", "queja", 0.82));
        assert!(fuzzy_contains_with("tengo una qeja", "queja", 0.75));
    }

    #[test]
    fn phrase_containment_respects_word_boundaries() {
        assert!(contains_phrase("tengo un reclamo urgente", "reclamo"));
        assert!(contains_phrase("pedido incompleto", "pedido incompleto"));
        assert!(!contains_phrase("tengo un reclamoo", "reclamo"));
        assert!(!contains_phrase("ahora mismo", "hora"));
    }

    #[test]
    fn root_containment_tolerates_plural_suffixes_only() {
        assert!(contains_root("tengo varios reclamos pendientes", "reclamo"));
        assert!(contains_root("demasiados errores en la factura", "error"));
        assert!(contains_root("tengo un reclamo", "reclamo"));
        // Longer embeddings still miss the exact path.
        assert!(!contains_root("tengo un reclamoo", "reclamo"));
        assert!(!contains_root("reclamonazo", "reclamo"));
        // Short function words keep strict boundaries elsewhere.
        assert!(!contains_phrase("nos vemos", "no"));
    }

    #[test]
    fn phrase_positions_are_char_offsets() {
        assert_eq!(phrase_positions("ñoño y hora", "hora"), vec![7]);
        assert_eq!(
            phrase_positions("espera y mas espera", "espera"),
            vec![0, 13]
        );
    }
}
