//! Canonical form for city names used as airport keys.

use unicode_normalization::UnicodeNormalization;

/// Turkish letterforms that do not decompose into an ASCII base letter.
fn fold_turkish(c: char) -> char {
    match c {
        'ğ' => 'g',
        'ü' => 'u',
        'ş' => 's',
        'ı' => 'i',
        'ö' => 'o',
        'ç' => 'c',
        'Ğ' => 'G',
        'Ü' => 'U',
        'Ş' => 'S',
        'İ' => 'I',
        'Ö' => 'O',
        'Ç' => 'C',
        other => other,
    }
}

/// Uppercases, folds diacritics to ASCII, trims and joins words with `_`.
///
/// Every airport lookup and creation goes through this, so `"İstanbul"`,
/// `"istanbul"` and `"ISTANBUL"` all resolve to the same airport.
pub fn normalize_city(input: &str) -> String {
    let folded: String = input.chars().map(fold_turkish).collect::<String>().to_uppercase();

    let ascii: String = folded
        .nfd()
        .map(fold_turkish)
        .filter(|c| c.is_ascii())
        .collect();

    ascii
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turkish_capital_i() {
        assert_eq!(normalize_city("İstanbul"), "ISTANBUL");
        assert_eq!(normalize_city("ISTANBUL"), "ISTANBUL");
        assert_eq!(normalize_city("istanbul"), "ISTANBUL");
        assert_eq!(normalize_city("ıstanbul"), "ISTANBUL");
    }

    #[test]
    fn test_folds_all_turkish_letters() {
        assert_eq!(normalize_city("Şanlıurfa"), "SANLIURFA");
        assert_eq!(normalize_city("Gümüşhane"), "GUMUSHANE");
        assert_eq!(normalize_city("Çanakkale"), "CANAKKALE");
        assert_eq!(normalize_city("Muğla"), "MUGLA");
        assert_eq!(normalize_city("Kütahya"), "KUTAHYA");
    }

    #[test]
    fn test_strips_other_combining_marks() {
        assert_eq!(normalize_city("São Paulo"), "SAO_PAULO");
        assert_eq!(normalize_city("Zürich"), "ZURICH");
        assert_eq!(normalize_city("Málaga"), "MALAGA");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize_city("  new   york \t city "), "NEW_YORK_CITY");
        assert_eq!(normalize_city("İçel (Mersin)"), "ICEL_(MERSIN)");
    }

    #[test]
    fn test_idempotent() {
        for s in ["İstanbul", "  rio de   janeiro", "Köln", "ÅLESUND", "", "a_b c", "Ağrı"] {
            let once = normalize_city(s);
            assert_eq!(normalize_city(&once), once, "input {:?}", s);
        }
    }

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(normalize_city(""), "");
        assert_eq!(normalize_city("   "), "");
    }
}
