//! Analyze command - classify extracted text, extract fields, plan and
//! apply renames.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use docsift_core::{
    Classifier, DocumentReport, PipelineConfig, RenamePlanner, RuleSet, analyze_text,
};

/// Arguments for the analyze command.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input text file or directory of text files
    #[arg(required = true)]
    input: PathBuf,

    /// Path to the rules file
    #[arg(short, long, default_value = "rules.json")]
    rules: PathBuf,

    /// Recurse into subdirectories
    #[arg(long)]
    recursive: bool,

    /// Rename source files according to the plan
    #[arg(long)]
    rename: bool,

    /// Destination directory for renamed files (default: alongside input)
    #[arg(long)]
    dest: Option<PathBuf>,

    /// Threshold for the top class (overrides config)
    #[arg(long)]
    min_confidence: Option<f64>,

    /// Softmax temperature default (overrides config)
    #[arg(long)]
    temperature: Option<f64>,

    /// Optional CSV report path
    #[arg(long)]
    report: Option<PathBuf>,
}

pub fn run(args: AnalyzeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = if let Some(path) = config_path {
        PipelineConfig::from_file(Path::new(path))?
    } else {
        PipelineConfig::default()
    };
    if let Some(temperature) = args.temperature {
        config.temperature = temperature;
    }
    if let Some(min_confidence) = args.min_confidence {
        config.min_confidence = min_confidence;
    }

    let rules = RuleSet::from_file(&args.rules, &config)?;
    let classifier = Classifier::new(rules, &config);

    let files = collect_inputs(&args.input, args.recursive)?;
    if files.is_empty() {
        anyhow::bail!("no text files found under {}", args.input.display());
    }

    let progress = if files.len() > 1 {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    // One planner per destination directory, so collision resolution for
    // documents landing in the same directory goes through one authority.
    let mut planners: HashMap<PathBuf, RenamePlanner> = HashMap::new();

    let mut reports = Vec::with_capacity(files.len());
    for file in &files {
        let report = analyze_one(file, &classifier, &args, &mut planners);
        println!("{}", serde_json::to_string(&report)?);
        reports.push(report);
        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    if let Some(report_path) = &args.report {
        write_csv_report(report_path, &reports)?;
        eprintln!(
            "{} Report written to {}",
            style("✓").green(),
            report_path.display()
        );
    }

    Ok(())
}

fn analyze_one(
    file: &Path,
    classifier: &Classifier,
    args: &AnalyzeArgs,
    planners: &mut HashMap<PathBuf, RenamePlanner>,
) -> DocumentReport {
    // A text-extraction failure is reported per document; classification
    // still runs on empty text and yields a fallback-eligible result.
    let (text, mut error) = match fs::read_to_string(file) {
        Ok(text) => (text, None),
        Err(e) => {
            warn!(path = %file.display(), "failed to read text: {e}");
            (String::new(), Some(format!("read_error: {e}")))
        }
    };

    let analysis = analyze_text(classifier, &text);
    let mut report = DocumentReport {
        path_in: file.display().to_string(),
        path_out: None,
        top_class: analysis.classification.top_class,
        confidence: analysis.classification.confidence,
        probabilities: analysis.classification.probabilities,
        extracted: analysis.extracted,
        proposed_path: None,
        error: None,
    };

    if let Some(fields) = &report.extracted {
        let dest_dir = args
            .dest
            .clone()
            .or_else(|| file.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));

        let planner = planners
            .entry(dest_dir.clone())
            .or_insert_with(|| match RenamePlanner::scan(&dest_dir) {
                Ok(planner) => planner,
                Err(e) => {
                    debug!(dir = %dest_dir.display(), "directory not scannable yet: {e}");
                    RenamePlanner::with_existing(&dest_dir, [])
                }
            });

        match planner.plan(file, fields) {
            Ok(plan) => {
                report.proposed_path = Some(plan.proposed.display().to_string());
                if args.rename {
                    match apply_rename(file, &plan.proposed) {
                        Ok(()) => report.path_out = Some(plan.proposed.display().to_string()),
                        Err(e) => append_error(&mut error, &format!("rename_error: {e}")),
                    }
                }
            }
            Err(e) => append_error(&mut error, &format!("rename_error: {e}")),
        }
    }

    report.error = error;
    report
}

fn apply_rename(from: &Path, to: &Path) -> std::io::Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::rename(from, to)
}

fn append_error(error: &mut Option<String>, message: &str) {
    match error {
        Some(existing) => {
            existing.push_str(" | ");
            existing.push_str(message);
        }
        None => *error = Some(message.to_string()),
    }
}

fn collect_inputs(input: &Path, recursive: bool) -> anyhow::Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        anyhow::bail!("input not found: {}", input.display());
    }

    let mut files = Vec::new();
    let mut dirs = vec![input.to_path_buf()];
    while let Some(dir) = dirs.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                if recursive {
                    dirs.push(path);
                }
            } else if path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("txt"))
            {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

fn write_csv_report(path: &Path, reports: &[DocumentReport]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "path_in",
        "path_out",
        "top_class",
        "confidence",
        "invoice_number",
        "customer_name",
        "invoice_date",
        "total_value",
        "currency",
        "proposed_path",
        "error",
    ])?;

    for report in reports {
        let fields = report.extracted.clone().unwrap_or_default();
        writer.write_record([
            report.path_in.clone(),
            report.path_out.clone().unwrap_or_default(),
            report.top_class.clone(),
            format!("{:.4}", report.confidence),
            fields.invoice_number.unwrap_or_default(),
            fields.customer_name.unwrap_or_default(),
            fields
                .invoice_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            fields
                .total_value
                .map(|v| format!("{v:.2}"))
                .unwrap_or_default(),
            fields.currency.unwrap_or_default(),
            report.proposed_path.clone().unwrap_or_default(),
            report.error.clone().unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
