//! Process command - extract data from a single receipt.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};

use rcpt_core::models::config::RcptConfig;
use rcpt_core::models::receipt::ReceiptExtractionResult;
use rcpt_core::receipt::{extract_from_image, ExtractionReport, ReceiptParser};
use rcpt_core::TesseractEngine;

use super::config::load_config;

/// Extensions read as OCR text.
const TEXT_EXTENSIONS: &[&str] = &["txt", "text"];

/// Extensions sent through the OCR engine.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tiff", "tif", "bmp", "webp"];

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (OCR text or image), or '-' to read text from stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Show extraction confidence and warnings
    #[arg(long)]
    show_confidence: bool,

    /// Validate extracted data
    #[arg(long)]
    validate: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per line item
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension for outputs in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// How an input file is turned into receipt text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Image,
}

/// Classify an input path by extension.
pub fn input_kind(path: &Path) -> Option<InputKind> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if TEXT_EXTENSIONS.contains(&extension.as_str()) {
        Some(InputKind::Text)
    } else if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        Some(InputKind::Image)
    } else {
        None
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let parser = ReceiptParser::new().with_config(config.extraction.clone());

    let report = if args.input.as_os_str() == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read receipt text from stdin")?;
        parser.parse_with_report(&text)
    } else {
        if !args.input.exists() {
            anyhow::bail!("Input file not found: {}", args.input.display());
        }

        info!("Processing file: {}", args.input.display());

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap(),
        );
        pb.set_message(format!("Extracting {}", args.input.display()));

        let path = args.input.clone();
        let task_config = config.clone();
        let report =
            tokio::task::spawn_blocking(move || extract_file(&path, &parser, &task_config))
                .await??;

        pb.finish_and_clear();
        report
    };

    let result = &report.result;

    if args.validate {
        let issues = result.validate(config.extraction.consistency_tolerance);
        if !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    let output = format_result(result, args.format, args.pretty)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        eprintln!(
            "{} Extraction confidence: {:.1}%",
            style("ℹ").blue(),
            result.confidence * 100.0
        );
        for warning in &report.warnings {
            eprintln!("{} {}", style("!").yellow(), warning);
        }
        eprintln!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            report.processing_time_ms
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Extract a receipt from a text or image file.
///
/// Blocking: image inputs run the external OCR engine.
pub fn extract_file(
    path: &Path,
    parser: &ReceiptParser,
    config: &RcptConfig,
) -> anyhow::Result<ExtractionReport> {
    match input_kind(path) {
        Some(InputKind::Text) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(parser.parse_with_report(&text))
        }
        Some(InputKind::Image) => {
            let image =
                fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
            let engine = TesseractEngine::from_config(&config.ocr);

            let report = extract_from_image(&engine, parser, &image, &config.ocr.languages)
                .with_context(|| format!("OCR failed for {}", path.display()))?;

            if report.result.raw_text.trim().is_empty() {
                warn!("No text detected in {}", path.display());
            }

            Ok(report)
        }
        None => {
            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            anyhow::bail!("Unsupported file format: '{}'", extension)
        }
    }
}

/// Render a result in the requested format.
pub fn format_result(
    result: &ReceiptExtractionResult,
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Json => Ok(serde_json::to_string(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_csv(result: &ReceiptExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "vendor",
        "date",
        "total",
        "confidence",
        "item_name",
        "item_quantity",
        "item_price",
    ])?;

    let total = result.total.to_string();
    let confidence = format!("{:.2}", result.confidence);

    if result.items.is_empty() {
        wtr.write_record([
            result.vendor.as_str(),
            result.date.as_str(),
            &total,
            &confidence,
            "",
            "",
            "",
        ])?;
    }

    for item in &result.items {
        wtr.write_record([
            result.vendor.as_str(),
            result.date.as_str(),
            &total,
            &confidence,
            &item.name,
            &item.quantity.to_string(),
            &item.price.to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ReceiptExtractionResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Vendor: {}\n", or_dash(&result.vendor)));
    match result.parsed_date() {
        Some(date) => output.push_str(&format!("Date: {} ({})\n", result.date, date)),
        None => output.push_str(&format!("Date: {}\n", or_dash(&result.date))),
    }
    output.push_str(&format!("Total: {:.2}\n", result.total));
    output.push('\n');

    output.push_str("Items:\n");
    if result.items.is_empty() {
        output.push_str("  (none)\n");
    }
    for item in &result.items {
        output.push_str(&format!(
            "  {:<30} {} x {:.2}\n",
            item.name, item.quantity, item.price
        ));
    }
    output.push('\n');

    output.push_str(&format!("Confidence: {:.0}%\n", result.confidence * 100.0));

    output
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECEIPT: &str = "SuperMart LLC\n12.03.2024\nMilk          3.50\nBread         2.20\nTotal: 5.70";

    #[test]
    fn test_input_kind() {
        assert_eq!(input_kind(Path::new("a.TXT")), Some(InputKind::Text));
        assert_eq!(input_kind(Path::new("scan.jpeg")), Some(InputKind::Image));
        assert_eq!(input_kind(Path::new("doc.pdf")), None);
        assert_eq!(input_kind(Path::new("noext")), None);
    }

    #[test]
    fn test_format_csv_rows_per_item() {
        let result = ReceiptParser::new().parse(RECEIPT);
        let csv = format_result(&result, OutputFormat::Csv, false).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "SuperMart LLC,12.03.2024,5.70,1.00,Milk,1,3.50");
    }

    #[test]
    fn test_format_text() {
        let result = ReceiptParser::new().parse(RECEIPT);
        let text = format_result(&result, OutputFormat::Text, false).unwrap();

        assert!(text.contains("Vendor: SuperMart LLC"));
        assert!(text.contains("Date: 12.03.2024 (2024-03-12)"));
        assert!(text.contains("Total: 5.70"));
        assert!(text.contains("Confidence: 100%"));
    }

    #[test]
    fn test_format_text_empty() {
        let result = ReceiptParser::new().parse("");
        let text = format_result(&result, OutputFormat::Text, false).unwrap();

        assert!(text.contains("Vendor: -"));
        assert!(text.contains("(none)"));
    }
}
