// tests/rule_properties.rs

use pollrun::watch::filter::{evaluate, EntryView};
use pollrun::watch::rules::{default_extensions, normalize_extensions, parse_extensions};
use pollrun::watch::FilterStage;
use pollrun_test_utils::builders::WatchRulesBuilder;
use proptest::prelude::*;

fn ext() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,5}"
}

fn file<'a>(rel_path: &'a str, name: &'a str) -> EntryView<'a> {
    EntryView {
        rel_path,
        name,
        is_dir: false,
    }
}

proptest! {
    #[test]
    fn leading_dot_is_optional(exts in prop::collection::vec(ext(), 0..6)) {
        let bare = normalize_extensions(&exts);
        let dotted = normalize_extensions(exts.iter().map(|e| format!(".{e}")));
        prop_assert_eq!(&bare, &dotted);
        prop_assert!(bare.iter().all(|e| e.starts_with('.')));
    }

    #[test]
    fn append_prefix_is_a_superset_of_defaults(exts in prop::collection::vec(ext(), 1..6)) {
        let appended = parse_extensions(&format!("+ {}", exts.join(" ")));
        let replaced = parse_extensions(&exts.join(" "));

        prop_assert!(default_extensions().is_subset(&appended));
        prop_assert!(replaced.is_subset(&appended));
    }

    #[test]
    fn skip_glob_wins_over_watch_glob(dir in "[a-z]{1,8}", stem in "[a-z]{1,8}") {
        let rules = WatchRulesBuilder::new()
            .no_skip_patterns()
            .skip(&format!("{dir}/*"))
            .watch(&format!("{dir}/*"))
            .build();
        let rel = format!("{dir}/{stem}.rs");
        let name = format!("{stem}.rs");

        let decision = evaluate(&rules, &file(&rel, &name));
        prop_assert!(decision.is_skipped());
        prop_assert_eq!(decision.decided_by, Some(FilterStage::SkipGlob));
    }

    #[test]
    fn watch_glob_cannot_rescue_excluded_extension(stem in "[a-z]{1,8}") {
        let rules = WatchRulesBuilder::new()
            .only_exts(&[".rs"])
            .watch("*.txt")
            .build();
        let name = format!("{stem}.txt");

        let decision = evaluate(&rules, &file(&name, &name));
        prop_assert!(decision.is_skipped());
        prop_assert_eq!(decision.decided_by, Some(FilterStage::Extension));
    }
}
