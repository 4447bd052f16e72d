//! Category slugs.

/// Lower-case `name` and collapse every run of characters outside `[a-z0-9]`
/// into one `-`. Leading and trailing dashes are dropped.
///
/// ```
/// use dondra_core::slug::slugify;
///
/// assert_eq!(slugify("Dry Fish"), "dry-fish");
/// assert_eq!(slugify("  Prawns & Shrimp!! "), "prawns-shrimp");
/// ```
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Turn a URL slug back into a display name: `"dry-fish"` becomes `"Dry Fish"`.
///
/// Used to match products by category name, which is stored free-form.
#[must_use]
pub fn category_from_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("Maldive Fish -- Chips"), "maldive-fish-chips");
        assert_eq!(slugify("Sprats 500g"), "sprats-500g");
    }

    #[test]
    fn test_slugify_drops_non_ascii() {
        assert_eq!(slugify("Karavala (කරවල)"), "karavala");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_category_from_slug() {
        assert_eq!(category_from_slug("dry-fish"), "Dry Fish");
        assert_eq!(category_from_slug("prawns"), "Prawns");
        assert_eq!(category_from_slug("--sea--food-"), "Sea Food");
    }
}
