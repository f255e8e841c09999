//! Text normalization and tokenization
//!
//! All dictionary keys and catalog match fields go through [`normalize`]
//! so that lookups are case- and accent-insensitive. Tokenization adds a
//! deterministic PT/ES singularization heuristic and stop-word removal.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use unicode_segmentation::UnicodeSegmentation;

/// PT/ES stop-words removed during tokenization
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // Portuguese
        "a", "o", "as", "os", "um", "uma", "uns", "umas", "de", "da", "do", "das", "dos", "em",
        "no", "na", "nos", "nas", "e", "ou", "que", "com", "para", "pra", "por", "se", "eu",
        "voce", "me", "meu", "minha", "teu", "tua", "seu", "sua", "quero", "queria", "gostaria",
        "preciso", "procuro", "procurando", "buscando", "tem", "ter", "algum", "alguma", "ver",
        "mostrar", "mostra", "ai", "la", "aqui", "isso", "esse", "essa", "este", "esta",
        // Spanish
        "el", "la", "los", "las", "un", "una", "unos", "unas", "del", "al", "y", "u", "quiero",
        "querria", "necesito", "busco", "buscando", "tienes", "tiene", "hay", "algo", "alguna",
        "mi", "tu", "su", "ese", "esa", "esto", "eso",
    ]
    .into_iter()
    .collect()
});

/// Strip PT/ES diacritics from a single character
fn strip_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        _ => c,
    }
}

/// Lowercase, strip diacritics, drop punctuation, collapse whitespace
///
/// Idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_space = true;

    for c in text.chars().flat_map(char::to_lowercase) {
        let c = strip_diacritic(c);
        if c.is_alphanumeric() {
            out.push(c);
            last_space = false;
        } else if !last_space {
            out.push(' ');
            last_space = true;
        }
    }

    while out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Lowercase and strip diacritics only, keeping punctuation and symbols
///
/// Used by the price extractor, which needs currency signs and separators
/// that [`normalize`] would discard.
pub fn fold(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(strip_diacritic)
        .collect()
}

/// Deterministic PT/ES singularization heuristic
///
/// Operates on already-normalized (accent-free) tokens, so the classic
/// `-ões → -ão` rule appears here as `-oes → -ao`.
pub fn singularize(token: &str) -> String {
    let n = token.chars().count();

    if token.ends_with("oes") || token.ends_with("aes") {
        // cartoes -> cartao, paes -> pao
        return format!("{}ao", &token[..token.len() - 3]);
    }
    if n > 3 && token.ends_with("is") {
        // papeis -> papel, aneis -> anel
        return format!("{}l", &token[..token.len() - 2]);
    }
    if token.ends_with("ns") {
        // viagens -> viagem
        return format!("{}m", &token[..token.len() - 2]);
    }
    if n > 4 && token.ends_with("es") {
        // celulares -> celular
        return token[..token.len() - 2].to_string();
    }
    if n > 3 && token.ends_with('s') {
        // capas -> capa
        return token[..token.len() - 1].to_string();
    }
    token.to_string()
}

/// Normalize, split on Unicode word boundaries, singularize, drop stop-words
///
/// Empty input yields an empty list; no errors are raised.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .unicode_words()
        .map(singularize)
        .filter(|t| !t.is_empty() && !STOP_WORDS.contains(t.as_str()))
        .collect()
}
