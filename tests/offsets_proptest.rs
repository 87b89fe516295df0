//! Offset bounds hold for arbitrary text and cursor positions.

use oa_autoreplace::{get_matches, get_offsets};
use proptest::prelude::*;
use regex::Regex;

fn patterns() -> (Regex, Regex) {
    (
        Regex::new(r"(\S+)$").expect("pattern should compile"),
        Regex::new(r"^(\S*)").expect("pattern should compile"),
    )
}

proptest! {
    #[test]
    fn offsets_stay_inside_text(text in "[a-z* é-]{0,16}", cursor in 0usize..20) {
        let (before, after) = patterns();
        let len = text.chars().count();
        let o = cursor.min(len);

        for (b, a) in [
            (Some(&before), Some(&after)),
            (Some(&before), None),
            (None, Some(&after)),
        ] {
            if let Some(m) = get_matches(&text, o, b, a) {
                let off = get_offsets(&m, o);
                prop_assert!(off.start <= o);
                prop_assert!(o <= off.end);
                prop_assert!(off.end <= len);
            }
        }
    }

    #[test]
    fn one_sided_rules_keep_the_other_bound(text in "[a-z -]{0,16}", cursor in 0usize..20) {
        let (before, after) = patterns();
        let o = cursor.min(text.chars().count());

        if let Some(m) = get_matches(&text, o, None, Some(&after)) {
            prop_assert_eq!(get_offsets(&m, o).start, o);
        }
        if let Some(m) = get_matches(&text, o, Some(&before), None) {
            prop_assert_eq!(get_offsets(&m, o).end, o);
        }
    }

    #[test]
    fn both_sided_match_needs_both(text in "[a-z -]{0,16}", cursor in 0usize..20) {
        let (before, after) = patterns();
        let o = cursor.min(text.chars().count());

        if let Some(m) = get_matches(&text, o, Some(&before), Some(&after)) {
            prop_assert!(m.before.is_some());
            prop_assert!(m.after.is_some());
        }
    }
}
