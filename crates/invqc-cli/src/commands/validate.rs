//! Validate command - run QC over a batch of extracted invoices.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use invqc_core::ingest::records_from_json;
use invqc_core::models::report::BatchReport;
use invqc_core::{validate_parsed, InMemoryIndex, QcConfig, ValidationVerdict, VerdictStatus};

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Input JSON file (array of extracted invoice records)
    #[arg(required = true)]
    input: PathBuf,

    /// Write the full report to this file (default: summary to stdout only)
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Order of report details
    #[arg(long, value_enum, default_value = "input")]
    sort: SortOrder,

    /// Validation date (YYYY-MM-DD) for reproducible runs; default: today
    #[arg(long)]
    now: Option<NaiveDate>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON report
    Json,
    /// CSV, one row per record
    Csv,
    /// Plain text summary
    Text,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum SortOrder {
    /// Keep the engine's input order
    Input,
    /// Worst statuses first
    Status,
}

pub fn run(args: ValidateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = if let Some(path) = config_path {
        QcConfig::from_file(std::path::Path::new(path))?
    } else {
        QcConfig::default()
    };

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let now: DateTime<Utc> = match args.now {
        Some(date) => {
            let midnight = date
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| anyhow::anyhow!("invalid --now date"))?;
            midnight.and_utc()
        }
        None => Utc::now(),
    };

    info!("Validating batch from {}", args.input.display());
    let content = fs::read_to_string(&args.input)?;
    let batch: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse JSON from {}: {}", args.input.display(), e))?;

    let parsed = records_from_json(&batch)?;

    let pb = ProgressBar::new(parsed.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} records")
            .unwrap()
            .progress_chars("=>-"),
    );

    let index = InMemoryIndex::new();
    let mut verdicts = Vec::with_capacity(parsed.len());
    for record in parsed {
        verdicts.push(validate_parsed(record, now, &config, &index));
        pb.inc(1);
    }
    pb.finish_and_clear();

    let mut report = BatchReport::from_verdicts(verdicts);
    if let SortOrder::Status = args.sort {
        // Presentation-only reordering; summary counts are unaffected.
        report
            .details
            .sort_by_key(|v| std::cmp::Reverse(v.status.severity()));
    }

    print_summary(&report);

    if let Some(path) = &args.report {
        let content = match args.format {
            OutputFormat::Json => serde_json::to_string_pretty(&report)?,
            OutputFormat::Csv => format_report_csv(&report)?,
            OutputFormat::Text => format_report_text(&report),
        };
        fs::write(path, content)?;
        println!(
            "\n{} Full validation report saved to {}",
            style("✓").green(),
            path.display()
        );
    }

    debug!("validated batch in {:?}", start.elapsed());

    if report.summary.rejected > 0 || report.summary.duplicate > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn print_summary(report: &BatchReport) {
    let summary = &report.summary;
    println!();
    println!("{}", style("--- Validation Summary ---").bold());
    println!("Total Processed: {}", summary.total);
    println!("Approved:        {}", style(summary.approved).green());
    println!("Warnings:        {}", style(summary.warning).yellow());
    println!("Manual Review:   {}", style(summary.manual_review).yellow());
    println!("Rejected:        {}", style(summary.rejected).red());
    println!("Duplicates:      {}", style(summary.duplicate).red());
    println!("--------------------------");

    let blocked: Vec<&ValidationVerdict> = report
        .details
        .iter()
        .filter(|v| {
            matches!(
                v.status,
                VerdictStatus::Rejected | VerdictStatus::Duplicate
            )
        })
        .collect();

    if !blocked.is_empty() {
        println!();
        println!("{}", style("Rejections:").red());
        for verdict in blocked {
            let number = if verdict.invoice_number.is_empty() {
                "Unknown"
            } else {
                verdict.invoice_number.as_str()
            };
            println!("  - Invoice {}: {}", number, verdict.errors.join(", "));
        }
    }
}

fn format_report_csv(report: &BatchReport) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "invoice_number",
        "status",
        "is_valid",
        "errors",
        "warnings",
    ])?;

    for verdict in &report.details {
        let errors = verdict.errors.join("; ");
        let warnings = verdict.warnings.join("; ");
        wtr.write_record([
            verdict.invoice_number.as_str(),
            verdict.status.label(),
            if verdict.is_valid { "true" } else { "false" },
            errors.as_str(),
            warnings.as_str(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_report_text(report: &BatchReport) -> String {
    let mut output = String::new();
    let summary = &report.summary;

    output.push_str(&format!(
        "Total: {} | Approved: {} | Warnings: {} | Manual Review: {} | Rejected: {} | Duplicates: {}\n\n",
        summary.total,
        summary.approved,
        summary.warning,
        summary.manual_review,
        summary.rejected,
        summary.duplicate,
    ));

    for verdict in &report.details {
        let number = if verdict.invoice_number.is_empty() {
            "(no number)"
        } else {
            verdict.invoice_number.as_str()
        };
        output.push_str(&format!("{} [{}]\n", number, verdict.status.label()));
        for error in &verdict.errors {
            output.push_str(&format!("  error: {}\n", error));
        }
        for warning in &verdict.warnings {
            output.push_str(&format!("  warning: {}\n", warning));
        }
    }

    output
}
