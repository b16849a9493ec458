mod common;

use common::{SharedBuffer, TestResult, fixture, seeded_source, seeded_source_with, table};
use std::fs;
use tally::{PipelineBuilder, PipelineError, QueryId, ReportConfig, StaticDataSource};

fn config_in(dir: &std::path::Path) -> ReportConfig {
    ReportConfig {
        charts_dir: dir.join("charts"),
        exports_dir: dir.join("exports"),
        ..ReportConfig::default()
    }
}

#[test]
fn run_all_writes_every_chart_and_one_workbook() -> TestResult {
    common::init_logger();
    let dir = tempfile::tempdir()?;
    let console = SharedBuffer::default();

    let mut pipeline = PipelineBuilder::new()
        .with_config(config_in(dir.path()))
        .with_data_source(seeded_source())
        .with_console(console.clone())
        .with_viewer(false)
        .build()?;
    let summary = pipeline.run_all()?;

    assert_eq!(summary.records.len(), 6);
    for record in &summary.records {
        assert!(record.artifact_path.is_file(), "{:?}", record.artifact_path);
        assert_eq!(record.artifact_path.extension().and_then(|e| e.to_str()), Some("svg"));
    }
    assert_eq!(summary.records[0].row_count, 12);

    assert_eq!(summary.workbook.sheet_count, 6);
    assert_eq!(summary.workbook.path, dir.path().join("exports/olist_summary.xlsx"));
    assert!(summary.workbook.path.is_file());

    let output = console.contents();
    assert!(output.contains("Generated 12 rows → pie 'GMV Share by Category' → saved to"));
    assert!(output.contains("→ Which sellers generate most revenue"));
    assert!(output.contains("Created file olist_summary.xlsx, 6 sheets,"));
    Ok(())
}

#[test]
fn rerunning_overwrites_artifacts_in_place() -> TestResult {
    let dir = tempfile::tempdir()?;
    let build = || {
        PipelineBuilder::new()
            .with_config(config_in(dir.path()))
            .with_data_source(seeded_source())
            .with_console(SharedBuffer::default())
            .build()
    };

    let first = build()?.run_all()?;
    let second = build()?.run_all()?;
    let first_paths: Vec<_> = first.records.iter().map(|r| r.artifact_path.clone()).collect();
    let second_paths: Vec<_> = second.records.iter().map(|r| r.artifact_path.clone()).collect();
    assert_eq!(first_paths, second_paths);
    assert_eq!(fs::read_dir(dir.path().join("charts"))?.count(), 6);
    assert_eq!(fs::read_dir(dir.path().join("exports"))?.count(), 1);
    Ok(())
}

#[test]
fn a_failing_query_stops_before_the_workbook() -> TestResult {
    let dir = tempfile::tempdir()?;
    // Only the first two sections have canned results.
    let registry = tally::QueryRegistry::builtin();
    let mut source = StaticDataSource::new();
    for id in [QueryId::PieGmvByCategory, QueryId::BarTopStatesGmv] {
        source.insert(registry.definition(id).sql, fixture(id));
    }

    let mut pipeline = PipelineBuilder::new()
        .with_config(config_in(dir.path()))
        .with_data_source(source)
        .with_console(SharedBuffer::default())
        .build()?;
    let err = pipeline.run_all().unwrap_err();

    assert!(matches!(err, PipelineError::DataSource(_)));
    assert_eq!(err.stage(), "query");
    assert!(dir.path().join("charts/pie_gmv_by_category.svg").is_file());
    assert!(dir.path().join("charts/bar_top_states_gmv.svg").is_file());
    assert!(!dir.path().join("exports/olist_summary.xlsx").exists());
    Ok(())
}

#[test]
fn interactive_writes_page_and_faceted_chart() -> TestResult {
    let dir = tempfile::tempdir()?;
    let mut pipeline = PipelineBuilder::new()
        .with_config(config_in(dir.path()))
        .with_data_source(seeded_source())
        .with_console(SharedBuffer::default())
        .with_viewer(false)
        .build()?;

    let output = pipeline.interactive()?;
    let page = output.page.ok_or("no page written")?;
    assert_eq!(page, dir.path().join("charts/interactive_gmv_by_category.html"));
    let html = fs::read_to_string(&page)?;
    assert!(html.contains("plotly"));
    assert!(html.contains("bed_bath_table"));
    assert!(output.faceted.ok_or("no faceted chart")?.is_file());
    Ok(())
}

#[test]
fn interactive_without_rows_writes_nothing() -> TestResult {
    common::init_logger();
    let dir = tempfile::tempdir()?;
    let source = seeded_source_with(|id| match id {
        QueryId::MonthlyCategoryGmv => table(&["month", "category", "gmv"], vec![]),
        other => fixture(other),
    });

    let console = SharedBuffer::default();

    let mut pipeline = PipelineBuilder::new()
        .with_config(config_in(dir.path()))
        .with_data_source(source)
        .with_console(console.clone())
        .with_viewer(false)
        .build()?;
    let output = pipeline.interactive()?;

    assert_eq!(console.contents().trim_end(), "No data for interactive slider.");
    assert_eq!(output.page, None);
    assert_eq!(output.faceted, None);
    assert!(!dir.path().join("charts/interactive_gmv_by_category.html").exists());
    Ok(())
}

#[test]
fn snapshot_writes_one_csv_per_query() -> TestResult {
    let dir = tempfile::tempdir()?;
    let console = SharedBuffer::default();
    let mut pipeline = PipelineBuilder::new()
        .with_config(config_in(dir.path()))
        .with_data_source(seeded_source())
        .with_console(console.clone())
        .build()?;

    let files = pipeline.snapshot()?;
    let names: Vec<_> = files.iter().map(|f| f.query).collect();
    assert_eq!(names, vec!["monthly_revenue", "payment_mix", "top_categories"]);

    let payment_mix = fs::read_to_string(dir.path().join("exports/payment_mix.csv"))?;
    assert_eq!(payment_mix.lines().next(), Some("payment_type,cnt,pct"));
    assert_eq!(payment_mix.lines().count(), 4);

    let output = console.contents();
    assert!(output.contains("=== payment_mix ==="));
    assert!(output.contains("payment_mix.csv (3 rows)"));
    Ok(())
}

#[test]
fn unknown_query_names_are_rejected() {
    let registry = tally::QueryRegistry::builtin();
    let err = registry.get("pie_gmv_by_region").unwrap_err();
    assert_eq!(err.stage(), "registry");
    assert_eq!(err.to_string(), "Unknown query: pie_gmv_by_region");
}
