//! CLI binary for pdf2plan.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use pdf2plan::{extract, extract_to_file, ExtractionConfig, PageSelection};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract to a spreadsheet
  pdf2plan cronograma.pdf -o tareas.xlsx

  # Print the structured records to stdout
  pdf2plan cronograma.pdf

  # JSON output for scripting
  pdf2plan --json cronograma.pdf > tareas.json

  # Schedule table headed by a different marker, pages 2-4 only
  pdf2plan --marker RUBRO --pages 2-4 plan.pdf -o plan.xlsx

  # Extract from a URL
  pdf2plan https://example.com/cronograma.pdf -o tareas.xlsx

OUTPUT COLUMNS (in order):
  Numero de OT, Rubro Principal, Detalle Rubro, Numero de Actividad,
  Detalle de Rubro, Fecha inicio, Fecha fin

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to an existing libpdfium shared library
"#;

/// Extract work-breakdown schedules from tabular PDFs into XLSX.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2plan",
    version,
    about = "Extract work-breakdown schedules from tabular PDFs into XLSX",
    long_about = "Extract a tabular work-breakdown schedule (tasks, subtasks, start/end dates) \
from a PDF, re-derive the two-level task/subtask numbering from layout cues, and write a \
structured XLSX spreadsheet.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Write the XLSX to this file instead of listing records on stdout.
    #[arg(short, long, env = "PDF2PLAN_OUTPUT")]
    output: Option<PathBuf>,

    /// Header marker cell that anchors the schedule table.
    #[arg(long, env = "PDF2PLAN_MARKER", default_value = "ITEM")]
    marker: String,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "PDF2PLAN_PAGES", default_value = "all")]
    pages: String,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2PLAN_PASSWORD")]
    password: Option<String>,

    /// Vertical row-clustering tolerance in PDF points.
    #[arg(long, env = "PDF2PLAN_ROW_TOLERANCE", default_value_t = 5.0)]
    row_tolerance: f32,

    /// Horizontal column-clustering tolerance in PDF points.
    #[arg(long, env = "PDF2PLAN_COLUMN_TOLERANCE", default_value_t = 10.0)]
    column_tolerance: f32,

    /// Output structured JSON (records + stats) instead of the listing.
    #[arg(long, env = "PDF2PLAN_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2PLAN_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2PLAN_QUIET")]
    quiet: bool,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDF2PLAN_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;

    // ── Run extraction ───────────────────────────────────────────────────
    if let Some(ref output_path) = cli.output {
        let stats = extract_to_file(&cli.input, output_path, &config)
            .await
            .context("Extraction failed")?;

        if !cli.quiet {
            eprintln!(
                "{}  {} tasks / {} subtasks  {}ms  →  {}",
                green("✔"),
                stats.tasks,
                stats.subtasks,
                stats.total_duration_ms,
                bold(&output_path.display().to_string()),
            );
            eprintln!(
                "   {} pages scanned, {} grid rows, {} data rows",
                dim(&stats.pages_scanned.to_string()),
                dim(&stats.grid_rows.to_string()),
                dim(&stats.data_rows.to_string()),
            );
        }
    } else {
        let schedule = extract(&cli.input, &config)
            .await
            .context("Extraction failed")?;

        if cli.json {
            let json = serde_json::to_string_pretty(&schedule)
                .context("Failed to serialise schedule")?;
            println!("{json}");
        } else {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            for row in &schedule.rows {
                if row.subtask_number.is_empty() {
                    writeln!(
                        handle,
                        "{:>4}  {:<40} {:>10}  {:>10}",
                        row.task_number, row.task_name, row.start_date, row.end_date
                    )
                } else {
                    writeln!(
                        handle,
                        "{:>4}  {:<40} {:>10}  {:>10}",
                        row.subtask_number,
                        format!("  {}", row.subtask_name),
                        row.start_date,
                        row.end_date
                    )
                }
                .context("Failed to write to stdout")?;
            }
        }

        if !cli.quiet && !cli.json {
            eprintln!(
                "Extracted {} records ({} tasks, {} subtasks) in {}ms",
                schedule.rows.len(),
                schedule.stats.tasks,
                schedule.stats.subtasks,
                schedule.stats.total_duration_ms
            );
        }
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli) -> Result<ExtractionConfig> {
    let pages = parse_pages(&cli.pages)?;

    let mut builder = ExtractionConfig::builder()
        .marker(&cli.marker)
        .row_tolerance(cli.row_tolerance)
        .column_tolerance(cli.column_tolerance)
        .pages(pages)
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--pages` string into `PageSelection`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageSelection::All);
    }

    // Range: "3-15"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start
            .trim()
            .parse()
            .context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;

        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", start);
        }
        if start > end {
            anyhow::bail!(
                "Invalid page range '{}-{}': start must be <= end",
                start,
                end
            );
        }

        return Ok(PageSelection::Range(start, end));
    }

    // Set: "1,3,5,7"
    if s.contains(',') {
        let pages: Vec<usize> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .context(format!("Invalid page number: '{}'", p.trim()))
            })
            .collect::<Result<Vec<_>>>()?;

        for &p in &pages {
            if p < 1 {
                anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", p);
            }
        }

        return Ok(PageSelection::Set(pages));
    }

    // Single page: "5"
    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", page);
    }

    Ok(PageSelection::Single(page))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pages_variants() {
        assert!(matches!(parse_pages("all").unwrap(), PageSelection::All));
        assert!(matches!(
            parse_pages("5").unwrap(),
            PageSelection::Single(5)
        ));
        assert!(matches!(
            parse_pages("3-15").unwrap(),
            PageSelection::Range(3, 15)
        ));
        assert!(matches!(
            parse_pages("1,3,5").unwrap(),
            PageSelection::Set(_)
        ));
    }

    #[test]
    fn parse_pages_rejects_nonsense() {
        assert!(parse_pages("0").is_err());
        assert!(parse_pages("9-3").is_err());
        assert!(parse_pages("x").is_err());
    }
}
