mod bootstrap;

use anyhow::Result;
use caseload_core::formatting::{format_count, format_slope};
use caseload_core::models::{Bucket, Granularity};
use caseload_core::settings::Settings;
use caseload_core::trend::TrendDirection;
use caseload_data::analysis::{run_report, ReportResult};
use caseload_data::movers::{Mover, MoversConfig};
use caseload_data::reader::load_report_input;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("caseload-report v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Granularity: {}, window: {}, top: {}",
        settings.granularity,
        settings.window,
        settings.top
    );

    let granularity: Granularity = settings.granularity.parse()?;
    let data_path = settings
        .data_path
        .as_ref()
        .map(|p| p.to_string_lossy().to_string());

    let input = load_report_input(data_path.as_deref())?;
    let result = run_report(
        &input,
        granularity,
        MoversConfig {
            window: settings.window,
            top_n: settings.top,
        },
    );

    print_report(&result, granularity);

    Ok(())
}

// ── Output ─────────────────────────────────────────────────────────────────────

fn print_report(result: &ReportResult, granularity: Granularity) {
    println!("Period table ({granularity})");
    for summary in &result.periods.summaries {
        let cells: Vec<String> = summary
            .totals_by_period
            .iter()
            .map(|(period, count)| format!("{period}={}", format_count(*count)))
            .collect();
        println!(
            "  {:<30} {}  total {}",
            summary.operator_key,
            cells.join("  "),
            format_count(summary.grand_total)
        );
    }
    let columns: Vec<String> = result
        .periods
        .column_totals
        .iter()
        .map(|(period, count)| format!("{period}={}", format_count(*count)))
        .collect();
    println!(
        "  {:<30} {}  total {}",
        "TOTAL",
        columns.join("  "),
        format_count(result.periods.grand_total)
    );

    println!("\nReconciliation");
    for bucket in [Bucket::General, Bucket::PorRevisar, Bucket::Otros] {
        let names: Vec<&str> = result
            .operators
            .iter()
            .filter(|o| o.classification.bucket == bucket)
            .map(|o| o.operator_key.as_str())
            .collect();
        println!("  {bucket:<12} {:>4}  {}", names.len(), names.join(", "));
    }

    println!("\nTrends");
    for t in &result.trends {
        let badge = match t.trend.direction {
            TrendDirection::Up => "increasing",
            TrendDirection::Down => "decreasing",
            TrendDirection::Flat => "stable",
        };
        let slope = t
            .trend
            .slope
            .map(format_slope)
            .unwrap_or_else(|| "n/a".to_string());
        println!("  {:<30} {badge:<10} slope {slope}", t.operator_key);
    }

    println!("\nTop increasing backlog (attention)");
    print_movers(&result.movers.top_increasing);
    println!("Top decreasing backlog (recovering)");
    print_movers(&result.movers.top_decreasing);

    println!(
        "\n{} rows processed, {} skipped ({} snapshot entries skipped)",
        format_count(result.metadata.rows_supplied as u64),
        result.metadata.rows_skipped,
        result.metadata.snapshot_entries_skipped
    );
}

fn print_movers(movers: &[Mover]) {
    if movers.is_empty() {
        println!("  (no operators with sufficient activity)");
        return;
    }
    for m in movers {
        println!("  {:<30} slope {}", m.operator_key, format_slope(m.slope));
    }
}
