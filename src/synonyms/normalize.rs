//! Text normalization for synonym matching
//!
//! Two forms are used:
//! - [`table_key`]: case fold only, the key space of the synonym table
//! - [`normalize`]: case fold, Vietnamese tone/diacritic fold, `_` to space,
//!   used on both sides of every fuzzy comparison

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Key under which a surface form is stored in the synonym table.
///
/// # Examples
///
/// ```
/// use entity_synonyms::synonyms::normalize::table_key;
///
/// assert_eq!(table_key("Áo Dài"), "áo dài");
/// ```
pub fn table_key(s: &str) -> String {
    s.to_lowercase()
}

/// Normalize text for fuzzy comparison.
///
/// Performs:
/// - Unicode NFC composition (decomposed tone marks fold like precomposed ones)
/// - Lowercase conversion
/// - Vietnamese vowel and `đ` folding to the base Latin letter
/// - Underscore to space
///
/// The function is idempotent.
///
/// # Examples
///
/// ```
/// use entity_synonyms::synonyms::normalize::normalize;
///
/// assert_eq!(normalize("Áo Dài"), "ao dai");
/// assert_eq!(normalize("quần_đùi"), "quan dui");
/// ```
pub fn normalize(s: &str) -> String {
    let composed: String = s.nfc().collect::<String>().to_lowercase().nfc().collect();

    let mut out = String::with_capacity(composed.len());
    let mut after_fold = false;
    for c in composed.chars() {
        // Marks left dangling by a fold would recompose on a second pass
        if after_fold && is_combining_mark(c) {
            continue;
        }
        match fold_char(c) {
            Some(base) => {
                out.push(base);
                after_fold = true;
            }
            None => {
                out.push(if c == '_' { ' ' } else { c });
                after_fold = false;
            }
        }
    }
    out
}

/// Map a lowercase Vietnamese letter to its base letter
fn fold_char(c: char) -> Option<char> {
    let base = match c {
        'à' | 'á' | 'ả' | 'ã' | 'ạ' | 'ă' | 'ắ' | 'ằ' | 'ẵ' | 'ặ' | 'ẳ' | 'â' | 'ầ' | 'ấ' | 'ậ'
        | 'ẫ' | 'ẩ' => 'a',
        'đ' => 'd',
        'è' | 'é' | 'ẻ' | 'ẽ' | 'ẹ' | 'ê' | 'ề' | 'ế' | 'ể' | 'ễ' | 'ệ' => 'e',
        'ì' | 'í' | 'ỉ' | 'ĩ' | 'ị' => 'i',
        'ò' | 'ó' | 'ỏ' | 'õ' | 'ọ' | 'ô' | 'ồ' | 'ố' | 'ổ' | 'ỗ' | 'ộ' | 'ơ' | 'ờ' | 'ớ' | 'ở'
        | 'ỡ' | 'ợ' => 'o',
        'ù' | 'ú' | 'ủ' | 'ũ' | 'ụ' | 'ư' | 'ừ' | 'ứ' | 'ử' | 'ữ' | 'ự' => 'u',
        'ỳ' | 'ý' | 'ỷ' | 'ỹ' | 'ỵ' => 'y',
        _ => return None,
    };
    Some(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_table_key_is_case_fold_only() {
        assert_eq!(table_key("Áo Dài"), "áo dài");
        assert_eq!(table_key("SET_DO"), "set_do");
    }

    #[test]
    fn test_vietnamese_folding() {
        assert_eq!(normalize("Áo Dài"), "ao dai");
        assert_eq!(normalize("ĐẦM"), "dam");
        assert_eq!(normalize("quần jean"), "quan jean");
        assert_eq!(normalize("váy ngủ"), "vay ngu");
        assert_eq!(normalize("bộ đồ"), "bo do");
        assert_eq!(normalize("Mỹ Tho"), "my tho");
        assert_eq!(normalize("khuyến mãi"), "khuyen mai");
    }

    #[test]
    fn test_underscore_becomes_space() {
        assert_eq!(normalize("ao_so_mi"), "ao so mi");
    }

    #[test]
    fn test_decomposed_input() {
        // "á" written as "a" + COMBINING ACUTE ACCENT
        assert_eq!(normalize("a\u{0301}o"), "ao");
        // "ộ" written as "o" + COMBINING DOT BELOW + COMBINING CIRCUMFLEX
        assert_eq!(normalize("bo\u{0323}\u{0302}"), "bo");
    }

    #[test]
    fn test_dangling_mark_dropped() {
        assert_eq!(normalize("ấ\u{0301}"), "a");
    }

    #[test]
    fn test_non_vietnamese_untouched() {
        assert_eq!(normalize("xyz123"), "xyz123");
        assert_eq!(normalize(""), "");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(s in "[a-zA-Z0-9_ àáảãạăắằẵặẳâầấậẫẩđĐèéẻẽẹêềếểễệìíỉĩịòóỏõọôồốổỗộơờớởỡợùúủũụưừứửữựỳýỷỹỵÁÀẠÔƠƯ\u{0300}\u{0301}\u{0303}\u{0309}\u{0323}\u{0302}\u{0306}\u{031B}]{0,24}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn normalize_is_idempotent_for_any_text(s in "\\PC{0,16}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }
    }
}
