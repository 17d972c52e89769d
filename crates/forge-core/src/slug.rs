//! Slug normalization for catalog keys.

/// Canonicalize free text into a slug.
///
/// Trims surrounding whitespace, lowercases, turns underscores and spaces into
/// hyphens, and collapses runs of hyphens into one. Other punctuation is left
/// alone; length limits are the caller's job. Idempotent.
pub fn normalize(value: &str) -> String {
    let lowered = value.trim().to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    for ch in lowered.chars() {
        let ch = match ch {
            '_' | ' ' => '-',
            other => other,
        };
        if ch == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(ch);
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spellings_of_iron_ore_agree() {
        for input in ["Iron  Ore", "iron_ore", "iron---ore", "IRON-ORE", "  Iron Ore  "] {
            assert_eq!(normalize(input), "iron-ore", "input: {input:?}");
        }
    }

    #[test]
    fn mixed_separators_collapse() {
        assert_eq!(normalize("a _- b"), "a-b");
    }

    #[test]
    fn keeps_other_punctuation() {
        assert_eq!(normalize("Mk.2 Plate!"), "mk.2-plate!");
    }

    #[test]
    fn edge_hyphens_are_kept() {
        assert_eq!(normalize("_ore_"), "-ore-");
    }

    #[test]
    fn blank_becomes_empty() {
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn idempotent_on_examples() {
        for input in ["Heavy Modular__Frame", "--x--", "ÀB_c"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once);
        }
    }
}
