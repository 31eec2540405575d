//! staywise CLI Module
//!
//! Command-line interface for serving the booking form, predicting single
//! bookings or whole tables, and inspecting the loaded artifacts.

mod prompts;

use clap::{Args, Parser, Subcommand};
use colored::*;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::artifacts::EncoderArtifact;
use crate::booking::BookingRecord;
use crate::config::{AppConfig, DEFAULT_PREVIEW_ROWS};
use crate::dataset::{load_table, DatasetPreview};
use crate::encoding::UnknownCategoryPolicy;
use crate::inference::{CancellationPredictor, PredictionOutcome};
use crate::samples;

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }
fn alert(s: &str) -> ColoredString  { s.truecolor(235, 100, 100) }

fn line_box_top()    { println!("  {}", dim("┌─────────────────────────────────────────────────────────┐")); }
fn line_box_bottom() { println!("  {}", dim("└─────────────────────────────────────────────────────────┘")); }
fn line_box_sep()    { println!("  {}", dim("├─────────────────────────────────────────────────────────┤")); }

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let pad = W.saturating_sub(visible_len);
    println!("  {}  {}{} {}", dim("│"), content, " ".repeat(pad), dim("│"));
}

fn line_box_center(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let total_pad = W.saturating_sub(visible_len);
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("  {}  {}{}{} {}", dim("│"), " ".repeat(left), content, " ".repeat(right), dim("│"));
}

fn line_box_empty() { line_box(""); }

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' { in_escape = true; continue; }
        if in_escape { if c == 'm' { in_escape = false; } continue; }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn wait_enter() {
    println!();
    println!("  {}", dim("press enter to continue"));
    let mut input = String::new();
    let _ = std::io::stdin().read_line(&mut input);
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "staywise")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Hotel booking cancellation predictor")]
#[command(long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub artifacts: ArtifactArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Artifact selection shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct ArtifactArgs {
    /// Model artifact (JSON)
    #[arg(long, global = true, env = "MODEL_PATH")]
    pub model: Option<PathBuf>,

    /// Encoder artifact (JSON)
    #[arg(long, global = true, env = "ENCODER_PATH")]
    pub encoder: Option<PathBuf>,

    /// Unseen category handling (reject, zero_fill); overrides the encoder artifact
    #[arg(long = "unknown-categories", global = true, env = "UNKNOWN_CATEGORY_POLICY")]
    pub unknown_categories: Option<UnknownCategoryPolicy>,
}

impl ArtifactArgs {
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(ref path) = self.model {
            config = config.with_model_path(path.clone());
        }
        if let Some(ref path) = self.encoder {
            config = config.with_encoder_path(path.clone());
        }
        if let Some(policy) = self.unknown_categories {
            config = config.with_unknown_category_policy(policy);
        }
        config
    }
}

/// Booking fields as flags; unset flags take the default booking's values
#[derive(Args, Debug, Clone)]
pub struct RecordArgs {
    #[arg(long, default_value_t = 0)]
    pub lead_time: u32,
    #[arg(long, default_value_t = 2)]
    pub adults: u32,
    #[arg(long, default_value_t = 0)]
    pub children: u32,
    #[arg(long, default_value_t = 0)]
    pub weekend_nights: u32,
    #[arg(long, default_value_t = 1)]
    pub week_nights: u32,
    #[arg(long, default_value = "Meal Plan 1")]
    pub meal_plan: String,
    #[arg(long, default_value = "Room_Type 1")]
    pub room_type: String,
    #[arg(long, default_value = "Online")]
    pub market_segment: String,
    /// Car parking space required (0 or 1)
    #[arg(long, default_value_t = 0)]
    pub parking: u8,
    /// Repeated guest (0 or 1)
    #[arg(long, default_value_t = 0)]
    pub repeated_guest: u8,
    #[arg(long, default_value_t = 0)]
    pub previous_cancellations: u32,
    #[arg(long, default_value_t = 0)]
    pub previous_kept: u32,
    #[arg(long, default_value_t = 100.0)]
    pub price: f64,
    #[arg(long, default_value_t = 0)]
    pub special_requests: u32,
}

impl RecordArgs {
    pub fn into_record(self) -> BookingRecord {
        BookingRecord {
            lead_time: self.lead_time,
            no_of_adults: self.adults,
            no_of_children: self.children,
            no_of_weekend_nights: self.weekend_nights,
            no_of_week_nights: self.week_nights,
            type_of_meal_plan: self.meal_plan,
            room_type_reserved: self.room_type,
            market_segment_type: self.market_segment,
            required_car_parking_space: self.parking,
            repeated_guest: self.repeated_guest,
            no_of_previous_cancellations: self.previous_cancellations,
            no_of_previous_bookings_not_canceled: self.previous_kept,
            avg_price_per_room: self.price,
            no_of_special_requests: self.special_requests,
            arrival_year: None,
            arrival_month: None,
            arrival_date: None,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the booking form server
    Serve {
        /// Server port
        #[arg(short, long, env = "API_PORT")]
        port: Option<u16>,

        /// Server host
        #[arg(long, env = "API_HOST")]
        host: Option<String>,

        /// Reference dataset shown next to the form
        #[arg(long, env = "DATASET_PATH")]
        dataset: Option<PathBuf>,
    },

    /// Predict one booking (flags, sample or JSON) or a whole table
    Predict {
        #[command(flatten)]
        record: RecordArgs,

        /// Use a built-in sample case
        #[arg(long, conflicts_with_all = ["json", "input"])]
        sample: Option<String>,

        /// Read the booking from a JSON file
        #[arg(long, conflicts_with = "input")]
        json: Option<PathBuf>,

        /// Batch mode: CSV, JSON or Parquet table of bookings
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Batch mode: write the table with predictions to this CSV file
        #[arg(short, long, requires = "input")]
        output: Option<PathBuf>,

        /// Print the outcome as JSON
        #[arg(long)]
        print_json: bool,
    },

    /// Fill in a booking interactively
    Form,

    /// Show the encoder schema
    Schema {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the first rows of the reference dataset
    Preview {
        /// Table to preview
        #[arg(short, long, env = "DATASET_PATH")]
        data: Option<PathBuf>,

        /// Number of rows
        #[arg(short, long, default_value_t = DEFAULT_PREVIEW_ROWS)]
        rows: usize,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

fn load_predictor(config: &AppConfig) -> anyhow::Result<CancellationPredictor> {
    step_run("Loading artifacts");
    let start = Instant::now();
    let predictor = CancellationPredictor::load(config)?;
    let detail = match predictor.info() {
        Some(info) => format!("{} ({}, {} scheme) in {:?}", info.model_name, info.model_kind, info.scheme, start.elapsed()),
        None => format!("{:?}", start.elapsed()),
    };
    step_done(&detail);
    Ok(predictor)
}

fn print_outcome(outcome: &PredictionOutcome) {
    section("Prediction");
    let label = outcome.label.to_string();
    let label = if outcome.label.is_cancelled() { alert(&label).bold() } else { ok(&label).bold() };
    println!("  {:<16} {}", muted("Outcome"), label);
    if let Some(p) = outcome.probability {
        println!("  {:<16} {}", muted("P(cancel)"), format!("{:.1}%", p * 100.0).white());
    }
    println!();
    for (name, value) in outcome.record.entries() {
        println!("  {:<40} {}", muted(name), value);
    }
    println!();
}

fn read_record_json(path: &Path) -> anyhow::Result<BookingRecord> {
    let text = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin())?
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&text)?)
}

pub fn cmd_predict_one(config: &AppConfig, record: BookingRecord, print_json: bool) -> anyhow::Result<()> {
    if !print_json {
        section("Predict");
    }
    let predictor = if print_json {
        CancellationPredictor::load(config)?
    } else {
        load_predictor(config)?
    };
    let outcome = predictor.predict(&record)?;

    if print_json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }
    Ok(())
}

pub fn cmd_predict_batch(config: &AppConfig, input: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    section("Batch predict");
    let predictor = load_predictor(config)?;

    step_run("Loading bookings");
    let mut df = load_table(input)?;
    step_done(&format!("{} rows × {} cols", df.height(), df.width()));

    step_run("Predicting");
    let start = Instant::now();
    let verdicts = predictor.predict_frame(&df)?;
    step_done(&format!("{:?}", start.elapsed()));

    let labels: Vec<String> = verdicts.iter().map(|v| v.label.to_string()).collect();
    let probabilities: Vec<Option<f64>> = verdicts.iter().map(|v| v.probability).collect();
    df.with_column(Series::new("predicted_status".into(), labels))?;
    df.with_column(Series::new("cancel_probability".into(), probabilities))?;

    let cancelled = verdicts.iter().filter(|v| v.label.is_cancelled()).count();
    println!();
    println!("  {:<16} {}", muted("Bookings"), verdicts.len());
    println!("  {:<16} {}", muted("Cancelled"), alert(&cancelled.to_string()));
    println!("  {:<16} {}", muted("Kept"), ok(&(verdicts.len() - cancelled).to_string()));

    match output {
        Some(path) => {
            step_run(&format!("Saving → {}", path.display()));
            let mut file = std::fs::File::create(path)?;
            CsvWriter::new(&mut file).finish(&mut df)?;
            step_done(&format!("{} rows", df.height()));
        }
        None => {
            println!();
            for (i, verdict) in verdicts.iter().enumerate().take(20) {
                let probability = verdict
                    .probability
                    .map(|p| format!("{:.3}", p))
                    .unwrap_or_else(|| "-".to_string());
                println!("  {:>5}  {:<16} {}", dim(&i.to_string()), verdict.label.to_string(), probability);
            }
            if verdicts.len() > 20 {
                println!("  {}", dim(&format!("… {} more, use --output to save all", verdicts.len() - 20)));
            }
        }
    }
    println!();
    Ok(())
}

pub fn cmd_predict(
    config: &AppConfig,
    record: RecordArgs,
    sample: Option<&str>,
    json: Option<&Path>,
    input: Option<&Path>,
    output: Option<&Path>,
    print_json: bool,
) -> anyhow::Result<()> {
    if let Some(input) = input {
        return cmd_predict_batch(config, input, output);
    }

    let record = if let Some(path) = json {
        read_record_json(path)?
    } else if let Some(name) = sample {
        let names: Vec<&str> = samples::sample_cases().iter().map(|c| c.name).collect();
        samples::find(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown sample '{}', available: {}", name, names.join(", ")))?
            .record
    } else {
        record.into_record()
    };

    cmd_predict_one(config, record, print_json)
}

pub fn cmd_form(config: &AppConfig) -> anyhow::Result<()> {
    section("Booking form");
    let predictor = load_predictor(config)?;
    let theme = prompts::theme();

    let mut record = BookingRecord::default();
    loop {
        println!();
        record = prompts::booking_form(&theme, &record)?;
        match predictor.predict(&record) {
            Ok(outcome) => print_outcome(&outcome),
            Err(e) => println!("  {} {}", alert("error"), e),
        }
        if !prompts::confirm(&theme, "Predict another booking?", true)? {
            break;
        }
    }
    Ok(())
}

pub fn cmd_schema(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let (pipeline, digest) = EncoderArtifact::load(&config.encoder_path)?;
    let pipeline = match config.unknown_category_policy {
        Some(policy) => pipeline.with_unknown_policy(policy),
        None => pipeline,
    };
    let report = pipeline.schema_report();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    section("Encoder schema");
    println!("  {:<20} {}", muted("File"), config.encoder_path.display());
    println!("  {:<20} {}", muted("SHA-256"), dim(&digest));
    println!("  {:<20} {}", muted("Scheme"), report.scheme);
    println!("  {:<20} {}", muted("Unknown categories"), report.unknown_category_policy);
    println!("  {:<20} {}", muted("Categorical"), report.categorical_fields.join(", "));
    if !report.label_fields.is_empty() {
        println!("  {:<20} {}", muted("Label encoded"), report.label_fields.join(", "));
    }
    println!();
    println!("  {:>4}  {}", muted("#"), muted("Expected column"));
    println!("  {}", dim(&"─".repeat(50)));
    for (i, column) in report.expected_columns.iter().enumerate() {
        println!("  {:>4}  {}", dim(&i.to_string()), column);
    }
    println!();
    Ok(())
}

pub fn cmd_preview(config: &AppConfig, data: Option<&Path>, rows: usize) -> anyhow::Result<()> {
    let path = data
        .map(Path::to_path_buf)
        .or_else(|| config.dataset_path.clone())
        .ok_or_else(|| anyhow::anyhow!("No dataset given; pass --data or set DATASET_PATH"))?;

    section("Dataset preview");
    let preview = DatasetPreview::load(&path, rows)?;
    println!("  {:<12} {}", muted("File"), path.display());
    println!("  {:<12} {} of {}", muted("Rows"), preview.rows, preview.total_rows);
    println!();

    let widths: Vec<usize> = preview
        .columns
        .iter()
        .enumerate()
        .map(|(j, c)| {
            preview
                .row_cells()
                .iter()
                .map(|row| row[j].chars().count())
                .chain(std::iter::once(c.name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = preview
        .columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:<w$}", c.name, w = *w))
        .collect();
    println!("  {}", muted(&header.join("  ")));
    for row in preview.row_cells() {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<w$}", cell, w = *w))
            .collect();
        println!("  {}", cells.join("  "));
    }
    println!();
    Ok(())
}

// ─── Serve ─────────────────────────────────────────────────────────────────────

pub async fn cmd_serve(config: AppConfig) -> anyhow::Result<()> {
    use crate::server::run_server;

    let base = format!("http://{}", config.bind_address());
    println!();
    line_box_top();
    line_box_empty();
    line_box_center(&format!("{}", "staywise".white().bold()));
    line_box_center(&format!("{}", dim(&format!("v{}", env!("CARGO_PKG_VERSION")))));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box(&kv("Form   ", &base));
    line_box(&kv("API    ", &format!("{}/api/predict", base)));
    line_box(&kv("Health ", &format!("{}/api/health", base)));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box_center(&format!("{}", dim("ctrl+c to stop")));
    line_box_empty();
    line_box_bottom();
    println!();

    run_server(config).await
}

// ─── Interactive mode ──────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("       {}", "staywise".truecolor(120, 170, 255).bold());
    println!("       {}", dim(&format!("hotel booking cancellation predictor  ·  v{}", env!("CARGO_PKG_VERSION"))));
    println!();
}

fn show_help() {
    section("Commands");

    let cmds: &[(&str, &str)] = &[
        ("staywise", "Interactive launcher (default)"),
        ("staywise serve", "Start booking form + API server"),
        ("staywise serve -p 3000", "Serve on custom port"),
        ("staywise predict --sample likely-cancelled", "Predict a sample case"),
        ("staywise predict --lead-time 120 --price 90", "Predict from flags"),
        ("staywise predict -i bookings.csv -o out.csv", "Predict a whole table"),
        ("staywise form", "Fill in a booking interactively"),
        ("staywise schema", "Show the encoder schema"),
        ("staywise preview -r 20", "Show the reference dataset"),
    ];

    for (cmd, desc) in cmds {
        println!("  {:<46} {}", cmd.white(), muted(desc));
    }

    section("Endpoints");

    let endpoints: &[(&str, &str)] = &[
        ("/", "Booking form"),
        ("/api/predict", "JSON prediction"),
        ("/api/predict/batch", "JSON batch prediction"),
        ("/api/schema", "Encoder schema"),
        ("/api/dataset/preview?rows=10", "Reference dataset"),
        ("/api/health", "Health check"),
    ];

    for (url, desc) in endpoints {
        println!("  {:<46} {}", accent(url), muted(desc));
    }

    println!();
}

pub async fn cmd_interactive(config: AppConfig) -> anyhow::Result<()> {
    use dialoguer::Select;

    print_banner();
    let theme = prompts::theme();

    loop {
        let items = &[
            "Start Server          booking form + api",
            "Booking Form          predict in the terminal",
            "Schema                encoder columns",
            "Dataset Preview       reference table",
            "Help                  commands & endpoints",
            "Exit",
        ];

        println!();
        let sel = Select::with_theme(&theme)
            .with_prompt("What would you like to do")
            .items(items)
            .default(0)
            .interact_opt()?;

        match sel {
            Some(0) => {
                cmd_serve(config.clone()).await?;
                break;
            }
            Some(1) => {
                if let Err(e) = cmd_form(&config) {
                    println!("  {} {}", alert("error"), e);
                }
            }
            Some(2) => {
                if let Err(e) = cmd_schema(&config, false) {
                    println!("  {} {}", alert("error"), e);
                }
                wait_enter();
            }
            Some(3) => {
                if let Err(e) = cmd_preview(&config, None, config.preview_rows) {
                    println!("  {} {}", alert("error"), e);
                }
                wait_enter();
            }
            Some(4) => {
                show_help();
                wait_enter();
            }
            Some(5) | None => {
                println!();
                println!("  {}", dim("goodbye"));
                println!();
                break;
            }
            _ => {}
        }
    }

    Ok(())
}
