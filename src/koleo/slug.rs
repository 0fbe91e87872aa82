//! Station name → URL slug.

/// True when `input` is already in canonical slug form: it contains a
/// hyphen and has no uppercase characters.
pub fn looks_like_slug(input: &str) -> bool {
    input.contains('-')
        && input.chars().any(char::is_lowercase)
        && !input.chars().any(char::is_uppercase)
}

/// Canonical identifier the API expects for a station.
///
/// Slugs pass through untouched; anything else goes through [`name_to_slug`].
pub fn resolve_slug(input: &str) -> String {
    if looks_like_slug(input) {
        input.to_string()
    } else {
        name_to_slug(input)
    }
}

/// Lowercase, fold diacritics to ASCII and hyphenate a display name.
///
/// `"Kraków Główny"` becomes `"krakow-glowny"`.
pub fn name_to_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars().flat_map(char::to_lowercase) {
        match fold(c) {
            Some(folded) => slug.push_str(folded),
            None if c.is_ascii_alphanumeric() => slug.push(c),
            None if c.is_whitespace() || matches!(c, '-' | '_' | '/' | '.') => {
                if !slug.is_empty() && !slug.ends_with('-') {
                    slug.push('-');
                }
            }
            None => {}
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

fn fold(c: char) -> Option<&'static str> {
    let folded = match c {
        'ą' | 'á' | 'à' | 'â' | 'ã' | 'ä' => "a",
        'ć' | 'č' | 'ç' => "c",
        'ď' => "d",
        'ę' | 'é' | 'è' | 'ê' | 'ě' | 'ë' => "e",
        'í' | 'ì' | 'î' | 'ï' => "i",
        'ł' | 'ľ' | 'ĺ' => "l",
        'ń' | 'ň' | 'ñ' => "n",
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => "o",
        'ř' => "r",
        'ś' | 'š' => "s",
        'ß' => "ss",
        'ť' => "t",
        'ú' | 'ù' | 'û' | 'ů' | 'ü' => "u",
        'ý' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(folded)
}
