// End-to-end scenarios through the public API: casing, affixing,
// compounding, forbidden words and the suggestion pipeline, using small
// English-like dictionaries built from inline sources.

use orto::Dictionary;

fn dict(aff: &str, dic: &str) -> Dictionary {
    Dictionary::from_slices(aff, dic).expect("fixture dictionary must load")
}

#[test]
fn plain_stem_and_its_casings() {
    let d = dict("", "1\nwork\n");
    assert!(d.spell("work"));
    assert!(d.spell("Work"));
    assert!(d.spell("WORK"));
    assert!(!d.spell("wark"));
}

#[test]
fn suffixed_forms_follow_the_flag() {
    let aff = "\
SFX S Y 1
SFX S 0 s .
";
    let d = dict(aff, "1\nwork/S\n");
    assert!(d.spell("work"));
    assert!(d.spell("works"));
    assert!(!d.spell("worked"));
}

#[test]
fn cross_product_prefix_and_suffix() {
    let aff = "\
PFX A Y 1
PFX A 0 un .
SFX B Y 1
SFX B 0 d .
";
    let d = dict(aff, "1\nhouse/AB\n");
    assert!(d.spell("house"));
    assert!(d.spell("unhouse"));
    assert!(d.spell("housed"));
    assert!(d.spell("unhoused"));
    assert!(!d.spell("unhoused-ly"));
}

#[test]
fn forbidden_word_is_rejected_and_never_suggested() {
    let aff = "FORBIDDENWORD !\nTRY d\n";
    let d = dict(aff, "2\nbad/!\nban\n");
    assert!(!d.spell("bad"));
    assert!(d.spell("ban"));
    let sugs = d.suggest("ba");
    assert!(!sugs.contains(&"bad".to_string()));
}

#[test]
fn compounds_from_flagged_stems() {
    let aff = "COMPOUNDFLAG C\nCOMPOUNDMIN 3\n";
    let d = dict(aff, "2\nfoot/C\nball/C\n");
    assert!(d.spell("football"));
    assert!(!d.spell("balls"));
}

#[test]
fn duplicate_compound_parts_can_be_forbidden() {
    let aff = "COMPOUNDFLAG C\nCOMPOUNDMIN 2\nCHECKCOMPOUNDDUP\n";
    let d = dict(aff, "1\nha/C\n");
    assert!(!d.spell("haha"));
}

#[test]
fn whole_word_replacement_leads_the_suggestions() {
    let aff = "\
REP 1
REP ^teh$ the
";
    let d = dict(aff, "1\nthe\n");
    let sugs = d.suggest("teh");
    assert_eq!(sugs.first().map(String::as_str), Some("the"));
}

#[test]
fn phonetic_suggestion_maps_back_to_lower_case() {
    let aff = "\
PHONE 1
PHONE PH F
";
    let d = dict(aff, "1\nfone\n");
    assert!(d.suggest("PHONE".to_lowercase().as_str())
        .contains(&"fone".to_string()));
}

#[test]
fn spelling_is_deterministic() {
    let aff = "\
PFX A Y 1
PFX A 0 un .
SFX B Y 1
SFX B 0 d .
COMPOUNDFLAG C
";
    let d = dict(aff, "3\nhouse/AB\nfoot/C\nball/C\n");
    for word in ["unhoused", "football", "footballs", "unfoot"] {
        let first = d.spell(word);
        for _ in 0..3 {
            assert_eq!(d.spell(word), first, "unstable result for {word:?}");
        }
    }
}

#[test]
fn suggestions_are_stable_and_deduplicated() {
    let aff = "TRY od\n";
    let d = dict(aff, "2\nword\nwood\n");
    let first = d.suggest("wod");
    let second = d.suggest("wod");
    assert_eq!(first, second);
    let mut sorted = first.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), first.len(), "duplicate suggestions returned");
}

#[test]
fn breaks_and_compounds_interact() {
    let aff = "COMPOUNDFLAG C\n";
    let d = dict(aff, "3\nfoot/C\nball/C\nnote\n");
    assert!(d.spell("football-note"));
    assert!(!d.spell("football-nite"));
}

#[test]
fn keep_case_stems_reject_recased_forms() {
    let aff = "KEEPCASE k\n";
    let d = dict(aff, "1\nrfc/k\n");
    assert!(d.spell("rfc"));
    assert!(!d.spell("Rfc"));
    assert!(!d.spell("RFC"));
}

#[test]
fn sharp_s_words_accept_double_s_capitals() {
    let aff = "CHECKSHARPS\n";
    let d = dict(aff, "1\nstra\u{00DF}e\n");
    assert!(d.spell("stra\u{00DF}e"));
    assert!(d.spell("Stra\u{00DF}e"));
    assert!(d.spell("STRASSE"));
}

#[test]
fn compound_rules_build_number_like_words() {
    let aff = "\
COMPOUNDMIN 1
COMPOUNDRULE 1
COMPOUNDRULE N*M
";
    let d = dict(aff, "2\n10/N\nth/M\n");
    assert!(d.spell("10th"));
    assert!(!d.spell("th10"));
}
