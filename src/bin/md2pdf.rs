//! CLI binary for edgequake-md2pdf.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `RenderConfig` / `ReportMetadata`, renders, and writes the PDF.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_md2pdf::prompts::ANALYSIS_PROMPT;
use edgequake_md2pdf::{render_async, ImageOutcome, RenderConfig, ReportMetadata};
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Render a report next to the scan
  md2pdf report.md --image chest.png --name "Jane Doe" --age 42 --sex F

  # Read markdown from stdin, choose the output file
  cat report.md | md2pdf - --image knee.jpg -o knee_report.pdf

  # Enhance the scan and print a JSON summary
  md2pdf report.md --image scan.png --enhance --json

  # Print the analysis prompt that produces compatible markdown
  md2pdf --print-prompt

MARKDOWN DIALECT:
  # .. ####     headings (bold 16 / 14 / 12 / 11 pt)
  - item        bullets (also "* item")
  1. item       numbered items, kept verbatim (also "1) item")
  blank line    small vertical gap
  anything else paragraph text

  Inline markup, tables and nested lists are printed as plain text.

ENVIRONMENT VARIABLES:
  RUST_LOG      Override the log filter (e.g. edgequake_md2pdf=debug)"#;

/// Render a markdown imaging report with one scan into a PDF.
#[derive(Parser, Debug)]
#[command(
    name = "md2pdf",
    version,
    about = "Render a markdown imaging report with one embedded scan into a PDF",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Markdown report file, or `-` to read stdin.
    #[arg(required_unless_present = "print_prompt")]
    input: Option<String>,

    /// Image to embed below the metadata (PNG or JPEG).
    #[arg(short, long, env = "MD2PDF_IMAGE", required_unless_present = "print_prompt")]
    image: Option<PathBuf>,

    /// Patient name.
    #[arg(long, default_value = "")]
    name: String,

    /// Patient age.
    #[arg(long, default_value = "")]
    age: String,

    /// Patient sex.
    #[arg(long, default_value = "")]
    sex: String,

    /// Study date. Defaults to today (local time, YYYY-MM-DD).
    #[arg(long)]
    study_date: Option<String>,

    /// Output PDF path. Default: report_<name>_<study date>.pdf
    #[arg(short, long, env = "MD2PDF_OUTPUT")]
    output: Option<PathBuf>,

    /// Autocontrast and sharpen the image before embedding.
    #[arg(long, env = "MD2PDF_ENHANCE")]
    enhance: bool,

    /// Page margin on all sides, in mm.
    #[arg(long, env = "MD2PDF_MARGIN", default_value_t = 15.0)]
    margin: f32,

    /// Print a JSON summary (RenderOutput without the PDF bytes) to stdout.
    #[arg(long, env = "MD2PDF_JSON")]
    json: bool,

    /// Print the analysis prompt and exit.
    #[arg(long)]
    print_prompt: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MD2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MD2PDF_QUIET")]
    quiet: bool,
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

    if cli.print_prompt {
        println!("{ANALYSIS_PROMPT}");
        return Ok(());
    }

    let input = cli.input.clone().context("Missing markdown input")?;
    let image = cli.image.clone().context("Missing --image")?;

    // ── Inputs ───────────────────────────────────────────────────────────
    let markdown = read_markdown(&input).await?;
    let metadata = ReportMetadata::new(
        cli.name.clone(),
        cli.age.clone(),
        cli.sex.clone(),
        cli.study_date
            .clone()
            .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string()),
    );
    let config = RenderConfig::builder()
        .margin_mm(cli.margin)
        .enhance_image(cli.enhance)
        .build()
        .context("Invalid configuration")?;

    // ── Render ───────────────────────────────────────────────────────────
    let output = render_async(metadata.clone(), markdown, image, config)
        .await
        .context("Render failed")?;

    let path = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.pdf", metadata.suggested_file_stem())));
    write_atomic(&path, &output.pdf).await?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    }

    if !cli.quiet {
        if let ImageOutcome::Skipped { error } = &output.image {
            eprintln!("{}  image left out: {}", yellow("⚠"), error);
        }
        eprintln!(
            "{}  {} page{}  {}ms  →  {}",
            green("✔"),
            output.page_count,
            if output.page_count == 1 { "" } else { "s" },
            output.stats.duration_ms,
            bold(&path.display().to_string()),
        );
    }

    Ok(())
}

/// Read the markdown body from a file, or from stdin for `-`.
async fn read_markdown(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("Failed to read markdown from stdin")?;
        return Ok(buf);
    }
    tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read markdown from {:?}", input))
}

/// Write to a temp file next to `path`, then rename, so a failed write never
/// leaves a truncated PDF behind.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {:?}", parent))?;
    }
    let tmp_path = path.with_extension("pdf.tmp");
    tokio::fs::write(&tmp_path, bytes)
        .await
        .with_context(|| format!("Failed to write {:?}", tmp_path))?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .with_context(|| format!("Failed to move output into place at {:?}", path))?;
    Ok(())
}
