//! End-to-end command runs against temporary stores.

use super::helpers::{Workspace, run_cli};
use super::*;
use forkful_core::{Facet, PreferenceSet};
use rstest::{fixture, rstest};
use serde_json::Value;

#[fixture]
fn workspace() -> Workspace {
    Workspace::new()
}

fn store_flags(workspace: &Workspace, backend: &str) -> Vec<String> {
    vec![
        format!("--{ARG_STORE_DIR}"),
        workspace.store_dir().into_string(),
        format!("--{ARG_BACKEND}"),
        backend.to_owned(),
    ]
}

fn run_ok(argv: Vec<String>) -> String {
    let (result, stdout) = run_cli(argv);
    result.expect("command should succeed");
    stdout
}

fn command(name: &str, workspace: &Workspace, backend: &str) -> Vec<String> {
    let mut argv = vec!["forkful".to_owned(), name.to_owned()];
    argv.extend(store_flags(workspace, backend));
    argv
}

#[rstest]
#[case("file")]
#[case("sqlite")]
fn record_then_show_round_trips(workspace: Workspace, #[case] backend: &str) {
    let mut record = command("record", &workspace, backend);
    record.extend(["--category", "Pizza", "--price", "€€"].map(str::to_owned));
    run_ok(record.clone());
    let recorded = PreferenceSet::from_json(&run_ok(record)).expect("record JSON");
    assert_eq!(recorded.weight(Facet::Category, "Pizza"), 2);
    assert_eq!(recorded.weight(Facet::PriceRange, "€€"), 2);

    let shown: Value =
        serde_json::from_str(&run_ok(command("show", &workspace, backend))).expect("show JSON");
    assert_eq!(
        shown,
        serde_json::json!({"categories": {"Pizza": 2}, "priceRanges": {"€€": 2}})
    );
}

#[rstest]
fn show_on_a_fresh_store_prints_empty_maps(workspace: Workspace) {
    let shown: Value =
        serde_json::from_str(&run_ok(command("show", &workspace, "file"))).expect("show JSON");
    assert_eq!(shown, serde_json::json!({"categories": {}, "priceRanges": {}}));
}

#[rstest]
fn show_surfaces_corrupt_records(workspace: Workspace) {
    std::fs::create_dir_all(workspace.store_dir()).expect("store dir");
    super::helpers::write_utf8(&workspace.store_dir().join("user_preferences.json"), "[]");
    let (result, _) = run_cli(command("show", &workspace, "file"));
    match result {
        Err(CliError::LoadPreferences(_)) => {}
        other => panic!("expected LoadPreferences, found {other:?}"),
    }
}

#[rstest]
fn reset_forgets_everything(workspace: Workspace) {
    let mut record = command("record", &workspace, "file");
    record.extend(["--category", "Sushi"].map(str::to_owned));
    run_ok(record);
    let reset: Value =
        serde_json::from_str(&run_ok(command("reset", &workspace, "file"))).expect("reset JSON");
    assert_eq!(reset, serde_json::json!({"categories": {}, "priceRanges": {}}));
}

#[rstest]
fn record_without_facets_fails(workspace: Workspace) {
    let (result, stdout) = run_cli(command("record", &workspace, "file"));
    assert!(matches!(result, Err(CliError::NothingToRecord)));
    assert!(stdout.is_empty());
}

#[rstest]
fn rank_orders_by_learned_preferences(workspace: Workspace) {
    let listing = workspace.write_restaurants();
    let mut record = command("record", &workspace, "file");
    record.extend(["--category", "Pizza", "--price", "€€"].map(str::to_owned));
    run_ok(record.clone());
    let mut record_pizza = command("record", &workspace, "file");
    record_pizza.extend(["--category", "Pizza"].map(str::to_owned));
    run_ok(record_pizza);

    let mut rank = command("rank", &workspace, "file");
    rank.push(listing.into_string());
    let ranked: Vec<Value> = serde_json::from_str(&run_ok(rank)).expect("rank JSON");
    let order: Vec<_> = ranked
        .iter()
        .map(|row| (row["id"].as_str().unwrap_or_default().to_owned(), row["score"].as_u64()))
        .collect();
    assert_eq!(
        order,
        [
            ("1".to_owned(), Some(3)),
            ("3".to_owned(), Some(2)),
            ("2".to_owned(), Some(1)),
        ]
    );
    let top = ranked.first().expect("ranked rows");
    assert_eq!(top["name"], "Da Michele");
}

#[rstest]
fn rank_tolerates_rows_with_mistyped_fields(workspace: Workspace) {
    let listing = workspace.path("mixed.json");
    super::helpers::write_utf8(
        &listing,
        r#"[
            {"id": 1, "name": "Forno", "price": 12.99, "category": "Pizza"},
            {"id": "2", "name": "Koi", "price": "€€", "category": "Sushi"}
        ]"#,
    );
    let mut record = command("record", &workspace, "file");
    record.extend(["--category", "Pizza"].map(str::to_owned));
    run_ok(record);

    let mut rank = command("rank", &workspace, "file");
    rank.push(listing.into_string());
    let ranked: Vec<Value> = serde_json::from_str(&run_ok(rank)).expect("rank JSON");
    let order: Vec<_> = ranked
        .iter()
        .map(|row| (row["id"].as_str().unwrap_or_default().to_owned(), row["score"].as_u64()))
        .collect();
    assert_eq!(order, [("1".to_owned(), Some(1)), ("2".to_owned(), Some(0))]);
}

#[rstest]
fn rank_applies_text_and_price_filters(workspace: Workspace) {
    let listing = workspace.write_restaurants();
    let mut rank = command("rank", &workspace, "file");
    rank.extend([listing.into_string(), "--query".to_owned(), "PIZ".to_owned()]);
    rank.extend(["--price", "€"].map(str::to_owned));
    let ranked: Vec<Value> = serde_json::from_str(&run_ok(rank)).expect("rank JSON");
    let [only] = ranked.as_slice() else {
        panic!("expected one match, found {ranked:?}");
    };
    assert_eq!(only["id"], "3");
}

#[rstest]
fn rank_reports_missing_listing(workspace: Workspace) {
    let mut rank = command("rank", &workspace, "file");
    rank.push(workspace.path("absent.json").into_string());
    let (result, _) = run_cli(rank);
    match result {
        Err(CliError::MissingSourceFile { field, .. }) => assert_eq!(field, ARG_RESTAURANTS),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn reservations_filter_by_status(workspace: Workspace) {
    let listing = workspace.write_reservations();
    let argv = vec![
        "forkful".to_owned(),
        "reservations".to_owned(),
        listing.into_string(),
        "--query".to_owned(),
        "pend".to_owned(),
    ];
    let matching: Vec<Value> = serde_json::from_str(&run_ok(argv)).expect("reservations JSON");
    let [only] = matching.as_slice() else {
        panic!("expected one match, found {matching:?}");
    };
    assert_eq!(only["id"], "b");
    assert_eq!(only["restaurants"]["name"], "Sorbillo");
}

#[rstest]
fn unknown_backend_is_rejected_by_clap(workspace: Workspace) {
    let (result, _) = run_cli(command("show", &workspace, "postgres"));
    assert!(matches!(result, Err(CliError::ArgumentParsing(_))));
}
