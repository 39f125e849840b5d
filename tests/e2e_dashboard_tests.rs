//! End-to-end tests for the dashboard pipeline
//!
//! CSV file -> loader -> snapshot -> executor -> normalizer -> aggregator ->
//! renderer.

mod common;

use catalog_insights::catalog::{load_catalog, CsvSource, LoadError};
use catalog_insights::config::SourceKind;
use catalog_insights::dashboard::{
    run, CatalogSnapshot, DashboardOutcome, DashboardSession, PipelineSettings, SelectionChange,
};
use catalog_insights::query::{
    execute, CountrySelectionDefault, Dimension, FilterSelection, Predicate,
};
use catalog_insights::render::{present, JsonRenderer, PresentOptions, Section};
use common::*;

fn snapshot(data: &TestData) -> CatalogSnapshot {
    let config = stock_config(data, SourceKind::Csv);
    let catalog = load_catalog(config.titles_source().as_ref(), &config.columns).unwrap();
    CatalogSnapshot::new(catalog)
}

fn results(outcome: &DashboardOutcome) -> &catalog_insights::dashboard::DashboardResults {
    outcome.results().expect("Expected results, got no matches")
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_load_drops_duplicate_ids_keeping_the_first() {
    let data = write_data_dir().unwrap();
    let snapshot = snapshot(&data);
    let catalog = snapshot.catalog();

    assert_eq!(catalog.len(), TITLE_COUNT);
    assert_eq!(catalog.duplicates_dropped(), RAW_ROW_COUNT - TITLE_COUNT);

    let s1: Vec<_> = catalog.iter().filter(|r| r.id == "s1").collect();
    assert_eq!(s1.len(), 1);
    assert_eq!(s1[0].title, "Dick Johnson Is Dead");
    assert_eq!(s1[0].release_year, Some(2020));
}

#[test]
fn test_loading_twice_yields_the_same_catalog() {
    let data = write_data_dir().unwrap();
    let first = snapshot(&data);
    let second = snapshot(&data);
    assert_eq!(first.catalog(), second.catalog());
}

#[test]
fn test_missing_primary_key_aborts_the_load() {
    let data = write_data_dir().unwrap();
    let path = data.data_dir.join("no_ids.csv");
    std::fs::write(&path, "type,title\nMovie,Nameless\n").unwrap();

    let result = load_catalog(&CsvSource::new(&path), &Default::default());

    match result {
        Err(LoadError::MissingPrimaryKey { field, available }) => {
            assert_eq!(field, "show_id");
            assert_eq!(available, vec!["type".to_string(), "title".to_string()]);
        }
        other => panic!("Expected MissingPrimaryKey, got {:?}", other),
    }
}

#[test]
fn test_missing_csv_file_is_an_io_error() {
    let data = write_data_dir().unwrap();
    let result = load_catalog(
        &CsvSource::new(data.data_dir.join("nope.csv")),
        &Default::default(),
    );
    assert!(matches!(result, Err(LoadError::Io(_))));
}

// =============================================================================
// Options and selection
// =============================================================================

#[test]
fn test_options_cover_the_whole_catalog() {
    let data = write_data_dir().unwrap();
    let snapshot = snapshot(&data);
    let options = snapshot.options();

    assert_eq!(options.kinds, KINDS.map(String::from).to_vec());
    assert_eq!(options.years, YEARS.to_vec());
    assert_eq!(options.countries, COUNTRIES.map(String::from).to_vec());
}

#[test]
fn test_unconstrained_selection_returns_every_title() {
    let data = write_data_dir().unwrap();
    let snapshot = snapshot(&data);

    let rows = execute(snapshot.catalog(), &Predicate::accept_all());
    assert_eq!(rows.len(), TITLE_COUNT);
    let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["s1", "s2", "s3", "s4", "s5", "s6", "s7"]);

    let outcome = run(
        &snapshot,
        &FilterSelection::unconstrained(),
        &PipelineSettings::default(),
    );
    let aggregates = &results(&outcome).aggregates;

    assert_eq!(aggregates.total_count, TITLE_COUNT);
    assert_eq!(aggregates.headline_kind_counts[0].count, MOVIE_COUNT);
    assert_eq!(aggregates.headline_kind_counts[1].count, SHOW_COUNT);
    assert_eq!(aggregates.distinct_country_count, 3);
    let mean = aggregates.mean_duration_minutes.unwrap();
    assert!((mean - MEAN_DURATION_MINUTES).abs() < 1e-9);

    let top: Vec<(&str, usize)> = aggregates
        .top_countries
        .iter()
        .map(|g| (g.key.as_str(), g.count))
        .collect();
    assert_eq!(
        top,
        vec![("United States", 3), ("India", 2), ("South Africa", 1)]
    );
}

#[test]
fn test_movies_only() {
    let data = write_data_dir().unwrap();
    let outcome = run(
        &snapshot(&data),
        &FilterSelection::unconstrained().with_kinds(["Movie"]),
        &PipelineSettings::default(),
    );
    let results = results(&outcome);

    assert_eq!(results.aggregates.total_count, MOVIE_COUNT);
    assert!(results
        .rows
        .iter()
        .all(|r| r.record.kind.as_deref() == Some("Movie")));
    assert_eq!(results.aggregates.by_kind.len(), 1);
}

#[test]
fn test_durations_are_normalized_to_minutes() {
    let data = write_data_dir().unwrap();
    let outcome = run(
        &snapshot(&data),
        &FilterSelection::unconstrained(),
        &PipelineSettings::default(),
    );
    let minutes = |id: &str| {
        results(&outcome)
            .rows
            .iter()
            .find(|r| r.record.id == id)
            .and_then(|r| r.duration_minutes)
    };

    assert_eq!(minutes("s1"), Some(90.0));
    assert_eq!(minutes("s2"), Some(900.0));
    assert_eq!(minutes("s3"), Some(450.0));
    assert_eq!(minutes("s7"), None);
}

#[test]
fn test_country_filter_uses_the_primary_country() {
    let data = write_data_dir().unwrap();
    let outcome = run(
        &snapshot(&data),
        &FilterSelection::unconstrained().with_countries(["India"]),
        &PipelineSettings::default(),
    );
    let results = results(&outcome);

    let ids: Vec<&str> = results.rows.iter().map(|r| r.record.id.as_str()).collect();
    assert_eq!(ids, vec!["s6", "s7"]);
    // s7 has no duration
    assert_eq!(results.aggregates.mean_duration_minutes, Some(166.0));

    // Ghana is listed by s4, but never first
    let outcome = run(
        &snapshot(&data),
        &FilterSelection::unconstrained().with_countries(["Ghana"]),
        &PipelineSettings::default(),
    );
    assert_eq!(outcome, DashboardOutcome::NoMatches);
}

#[test]
fn test_no_matches_renders_only_a_notice() {
    let data = write_data_dir().unwrap();
    let outcome = run(
        &snapshot(&data),
        &FilterSelection::unconstrained()
            .with_kinds(["TV Show"])
            .with_years([1993]),
        &PipelineSettings::default(),
    );
    assert_eq!(outcome, DashboardOutcome::NoMatches);

    let mut renderer = JsonRenderer::new();
    present(&outcome, PresentOptions { show_detail: true }, &mut renderer).unwrap();
    assert_eq!(renderer.sections().len(), 1);
    assert!(matches!(renderer.sections()[0], Section::Notice { .. }));
}

// =============================================================================
// Sessions
// =============================================================================

#[test]
fn test_session_follows_selection_changes() {
    let data = write_data_dir().unwrap();
    let mut session = DashboardSession::new(
        snapshot(&data),
        PipelineSettings::default(),
        CountrySelectionDefault::None,
    );
    let total = |session: &DashboardSession| {
        session
            .refresh()
            .results()
            .map(|r| r.aggregates.total_count)
            .unwrap_or(0)
    };
    assert_eq!(total(&session), TITLE_COUNT);

    session
        .apply(SelectionChange::Select(
            Dimension::Country,
            vec!["United States".to_string()],
        ))
        .unwrap();
    assert_eq!(total(&session), 3);

    session
        .apply(SelectionChange::Deselect(
            Dimension::Year,
            vec!["2021".to_string(), "1993".to_string()],
        ))
        .unwrap();
    assert_eq!(total(&session), 1);

    assert!(session
        .apply(SelectionChange::Select(
            Dimension::Country,
            vec!["Atlantis".to_string()]
        ))
        .is_err());
    assert_eq!(total(&session), 1);

    session.apply(SelectionChange::Reset).unwrap();
    assert_eq!(total(&session), TITLE_COUNT);
}

#[test]
fn test_all_countries_default_hides_titles_without_country() {
    let data = write_data_dir().unwrap();
    let session = DashboardSession::new(
        snapshot(&data),
        PipelineSettings::default(),
        CountrySelectionDefault::All,
    );

    let outcome = session.refresh();
    // s3 has no country, so selecting every country excludes it
    assert_eq!(results(&outcome).aggregates.total_count, TITLE_COUNT - 1);
}

#[test]
fn test_json_dashboard_sections() {
    let data = write_data_dir().unwrap();
    let outcome = run(
        &snapshot(&data),
        &FilterSelection::unconstrained(),
        &PipelineSettings::default(),
    );

    let mut renderer = JsonRenderer::new();
    present(&outcome, PresentOptions::default(), &mut renderer).unwrap();
    let mut out = Vec::new();
    renderer.write_to(&mut out).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

    assert_eq!(json[0]["label"], "Titles");
    assert_eq!(json[0]["display"], "7");
    assert_eq!(json[1]["label"], "Movie count");
    assert_eq!(json[4]["display"], "306 min");
    assert_eq!(json[5]["section"], "line_chart");
    assert_eq!(json[7]["title"], "Top 3 countries by titles");
}
