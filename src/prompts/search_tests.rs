use super::*;
use crate::prompts::PlacementMode;
use chrono::{Duration, Utc};

fn prompt(title: &str, score: f64) -> Prompt {
    let mut p = Prompt::new(title, format!("{} body", title));
    p.frecency_score = score;
    p
}

fn titles(results: &[&Prompt]) -> Vec<String> {
    results.iter().map(|p| p.title.clone()).collect()
}

/// A(ops, 5), B(chat, 9), C(archived, 99)
fn sample() -> Vec<Prompt> {
    let a = prompt("Deploy script", 5.0).with_tags(["ops"]);
    let b = prompt("Greeting", 9.0).with_tags(["chat"]);
    let mut c = prompt("Old", 99.0);
    c.is_archived = true;
    vec![a, b, c]
}

#[test]
fn empty_query_smart_orders_by_frecency() {
    let prompts = sample();
    let results = filter(&prompts, "", SortMode::Smart);
    assert_eq!(titles(&results), vec!["Greeting", "Deploy script"]);
}

#[test]
fn tag_query_matches_only_tagged_prompts() {
    let prompts = sample();
    let results = filter(&prompts, "#ops", SortMode::Smart);
    assert_eq!(titles(&results), vec!["Deploy script"]);
}

#[test]
fn archived_prompts_never_match() {
    let prompts = sample();
    for query in ["", "old", "#", "mode:cursor", "category:none", "body"] {
        for sort in [SortMode::Smart, SortMode::Manual] {
            let results = filter(&prompts, query, sort);
            assert!(
                results.iter().all(|p| !p.is_archived),
                "archived prompt returned for {:?}",
                query
            );
        }
    }
}

#[test]
fn manual_sort_is_stable_by_display_order() {
    let mut prompts = vec![
        prompt("first", 1.0),
        prompt("second", 2.0),
        prompt("third", 3.0),
        prompt("fourth", 4.0),
    ];
    prompts[0].display_order = 2;
    prompts[1].display_order = 1;
    prompts[2].display_order = 2;
    prompts[3].display_order = 0;

    let results = filter(&prompts, "", SortMode::Manual);
    assert_eq!(titles(&results), vec!["fourth", "second", "first", "third"]);
}

#[test]
fn text_query_ignores_manual_sort() {
    let mut prompts = vec![prompt("alpha note", 1.0), prompt("beta note", 8.0)];
    prompts[0].display_order = 0;
    prompts[1].display_order = 1;

    let results = filter(&prompts, "note", SortMode::Manual);
    assert_eq!(titles(&results), vec!["beta note", "alpha note"]);
}

#[test]
fn tag_query_is_case_insensitive_substring() {
    let prompts = vec![
        prompt("one", 1.0).with_tags(["Homework"]),
        prompt("two", 2.0).with_tags(["personal"]),
        prompt("three", 3.0).with_tags(["WORK", "misc"]),
    ];
    let results = filter(&prompts, "#work", SortMode::Smart);
    assert_eq!(titles(&results), vec!["three", "one"]);
}

#[test]
fn text_query_searches_title_content_and_tags() {
    let mut by_content = prompt("a", 1.0);
    by_content.content = "Please REVIEW this".to_string();
    let by_tag = prompt("b", 2.0).with_tags(["review"]);
    let by_title = prompt("Review checklist", 3.0);
    let none = prompt("unrelated", 4.0);
    let prompts = vec![by_content, by_tag, by_title, none];

    let results = filter(&prompts, "review", SortMode::Smart);
    assert_eq!(titles(&results), vec!["Review checklist", "b", "a"]);
}

#[test]
fn category_none_matches_uncategorized_only() {
    let prompts = vec![
        prompt("filed", 1.0).with_category("Work"),
        prompt("loose", 2.0),
        prompt("blank", 3.0).with_category("  "),
    ];
    let none = filter(&prompts, "category:none", SortMode::Smart);
    assert_eq!(titles(&none), vec!["blank", "loose"]);
    let uncategorized = filter(&prompts, "category:Uncategorized", SortMode::Smart);
    assert_eq!(titles(&uncategorized), vec!["blank", "loose"]);

    let work = filter(&prompts, "category:wor", SortMode::Smart);
    assert_eq!(titles(&work), vec!["filed"]);
}

#[test]
fn mode_query_matches_placement_mode_name() {
    let mut append = prompt("append me", 1.0);
    append.placement_mode = PlacementMode::Append;
    let cursor = prompt("cursor me", 2.0);
    let prompts = vec![append, cursor];

    assert_eq!(titles(&filter(&prompts, "mode:APP", SortMode::Smart)), vec!["append me"]);
    assert_eq!(titles(&filter(&prompts, "mode:cur", SortMode::Smart)), vec!["cursor me"]);
}

#[test]
fn tag_prefix_takes_precedence_over_text() {
    let prompts = vec![prompt("#ops in title", 1.0), prompt("tagged", 2.0).with_tags(["ops"])];
    let results = filter(&prompts, "#ops", SortMode::Smart);
    assert_eq!(titles(&results), vec!["tagged"]);
}

#[test]
fn bounded_filter_truncates() {
    let prompts: Vec<Prompt> = (0..80).map(|i| prompt(&format!("p{}", i), i as f64)).collect();
    assert_eq!(filter_default_bounded(&prompts, "", SortMode::Smart).len(), 50);
    let top = filter_bounded(&prompts, "p", SortMode::Smart, 3);
    assert_eq!(titles(&top), vec!["p79", "p78", "p77"]);
}

#[test]
fn favorites_sorted_by_title() {
    let mut prompts = vec![prompt("zeta", 1.0), prompt("Alpha", 1.0), prompt("mid", 1.0)];
    prompts[0].is_favorite = true;
    prompts[1].is_favorite = true;
    assert_eq!(titles(&favorites(&prompts)), vec!["Alpha", "zeta"]);
}

#[test]
fn recent_takes_five_most_recent() {
    let now = Utc::now();
    let mut prompts: Vec<Prompt> = (0..7).map(|i| prompt(&format!("p{}", i), 0.0)).collect();
    for (i, p) in prompts.iter_mut().enumerate().take(6) {
        p.last_used = Some(now - Duration::minutes(i as i64));
    }
    let results = recent(&prompts);
    assert_eq!(titles(&results), vec!["p0", "p1", "p2", "p3", "p4"]);
}

#[test]
fn quick_slot_collision_last_writer_wins() {
    let mut prompts = vec![prompt("first", 0.0), prompt("second", 0.0), prompt("third", 0.0)];
    prompts[0].quick_slot = Some(3);
    prompts[1].quick_slot = Some(3);
    prompts[2].quick_slot = Some(12);

    let map = quick_slot_map(&prompts);
    assert_eq!(map.len(), 1);
    assert_eq!(map[&3].title, "second");
    assert_eq!(prompt_for_slot(&prompts, 3).map(|p| p.title.as_str()), Some("second"));
    assert!(prompt_for_slot(&prompts, 1).is_none());
}

#[test]
fn quick_slot_map_skips_archived() {
    let mut prompts = vec![prompt("live", 0.0), prompt("archived", 0.0)];
    prompts[0].quick_slot = Some(1);
    prompts[1].quick_slot = Some(1);
    prompts[1].is_archived = true;
    assert_eq!(quick_slot_map(&prompts)[&1].title, "live");
}

#[test]
fn prompts_in_category_by_display_order() {
    let mut prompts = vec![
        prompt("w2", 0.0).with_category("Work"),
        prompt("p", 0.0).with_category("Personal"),
        prompt("w1", 0.0).with_category("Work"),
        prompt("loose", 0.0),
    ];
    prompts[0].display_order = 5;
    prompts[2].display_order = 1;

    assert_eq!(titles(&prompts_in_category(&prompts, Some("Work"))), vec!["w1", "w2"]);
    assert_eq!(titles(&prompts_in_category(&prompts, Some("work"))), Vec::<String>::new());
    assert_eq!(titles(&prompts_in_category(&prompts, None)), vec!["loose"]);
}

#[test]
fn tag_suggestions_exclude_exact_match() {
    let prompts = vec![
        prompt("a", 0.0).with_tags(["work", "workflow"]),
        prompt("b", 0.0).with_tags(["homework", "work"]),
    ];
    assert_eq!(suggestions(&prompts, "#work"), vec!["homework", "workflow"]);
}

#[test]
fn category_suggestions() {
    let prompts = vec![
        prompt("a", 0.0).with_category("Work"),
        prompt("b", 0.0).with_category("Workshop"),
        prompt("c", 0.0).with_category("Personal"),
    ];
    assert_eq!(suggestions(&prompts, "category:wor"), vec!["Work", "Workshop"]);
    assert_eq!(suggestions(&prompts, "category:work"), vec!["Workshop"]);
}

#[test]
fn title_suggestions_are_capped_and_sorted() {
    let prompts: Vec<Prompt> = ["delta", "alpha", "beta", "alpha", "gamma", "epsilon", "zeta"]
        .iter()
        .map(|t| prompt(&format!("{} note", t), 0.0))
        .collect();
    assert_eq!(
        suggestions(&prompts, "note"),
        vec!["alpha note", "beta note", "delta note", "epsilon note", "gamma note"]
    );
    assert!(suggestions(&prompts, "   ").is_empty());
}

#[test]
fn query_parsing() {
    assert_eq!(SearchQuery::parse("  "), SearchQuery::All);
    assert_eq!(SearchQuery::parse("#Ops"), SearchQuery::Tag("ops".into()));
    assert_eq!(SearchQuery::parse("mode: Replace"), SearchQuery::Mode("replace".into()));
    assert_eq!(
        SearchQuery::parse("category:NONE"),
        SearchQuery::Category(CategoryFilter::Uncategorized)
    );
    assert_eq!(SearchQuery::parse("Hello"), SearchQuery::Text("hello".into()));
}

#[test]
fn contains_ignore_case_handles_unicode() {
    assert!(contains_ignore_case("Größe", "grö"));
    assert!(contains_ignore_case("Deploy", "ploy"));
    assert!(!contains_ignore_case("ab", "abc"));
}
