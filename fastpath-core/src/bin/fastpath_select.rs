//! FastPath Select CLI - see which experience would fire for an input
//!
//! Usage:
//!     fastpath-select --experiences experiences.json "refund order 42"
//!     fastpath-select --experiences experiences/ --metadata lang=en "hello"
//!     fastpath-select -e exp.json --state stage=checkout --json "pay now"
//!
//! Exit codes: 0 when an experience matched, 2 when none did, 1 on errors.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use fastpath_core::{
    Experience, ExperienceCatalog, FastIntentSelector, FastPathConfig, MatchContext,
};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "fastpath-select")]
#[command(about = "Select the fast-intent experience that matches an input")]
#[command(version)]
struct Args {
    /// The user input to match
    input: String,

    /// Experience JSON file or directory of JSON files
    #[arg(short, long, default_value = "experiences")]
    experiences: PathBuf,

    /// Engine config JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Configuration metadata entry (key=value, repeatable)
    #[arg(long = "metadata", value_parser = parse_key_value)]
    metadata: Vec<(String, Value)>,

    /// State entry (key=value, repeatable)
    #[arg(long = "state", value_parser = parse_key_value)]
    state: Vec<(String, Value)>,

    /// Pending tool-call argument (key=value, repeatable)
    #[arg(long = "tool-arg", value_parser = parse_key_value)]
    tool_args: Vec<(String, Value)>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output (show every matching candidate)
    #[arg(short, long)]
    verbose: bool,
}

/// `key=value`; the value is parsed as JSON when it can be, else kept as a string
fn parse_key_value(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    if key.trim().is_empty() {
        return Err(format!("empty key in '{}'", raw));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fastpath_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &args.config {
        Some(path) => match FastPathConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                return ExitCode::from(1);
            }
        },
        None => FastPathConfig::default(),
    };

    let mut catalog = ExperienceCatalog::new();
    if let Err(e) = catalog.load_path(&args.experiences) {
        eprintln!("Error loading experiences: {}", e);
        return ExitCode::from(1);
    }

    if args.verbose {
        eprintln!("Experiences: {} loaded from {}", catalog.len(), args.experiences.display());
        eprintln!("Input: \"{}\"", args.input);
        eprintln!();
    }

    let state: HashMap<String, Value> = args.state.into_iter().collect();
    let context = MatchContext::new(args.input)
        .with_metadata(args.metadata.into_iter().collect())
        .with_state(Arc::new(state))
        .with_tool_args(args.tool_args.into_iter().collect());

    let selector = FastIntentSelector::with_config(Vec::new(), &config);

    if args.verbose {
        for exp in selector.matching(catalog.experiences(), &context) {
            eprintln!("  matched: {} (priority {})", exp.id, exp.priority());
        }
    }

    let best = selector.select_best_match(catalog.experiences(), &context);

    if args.json {
        output_json(best);
    } else {
        output_text(best);
    }

    if best.is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}

fn output_json(best: Option<&Experience>) {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        matched: bool,
        experience: Option<&'a Experience>,
    }

    let output = JsonOutput {
        matched: best.is_some(),
        experience: best,
    };
    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing output: {}", e),
    }
}

fn output_text(best: Option<&Experience>) {
    let Some(exp) = best else {
        println!("No fast-intent match.");
        return;
    };

    println!("Matched: {} [{}]", exp.id, exp.kind);
    println!("Title:   {}", exp.title);
    println!("Priority: {}", exp.priority());
    if let Some(cfg) = &exp.fast_intent_config {
        println!("On match: {:?} / fallback {:?}", cfg.on_match.mode, cfg.on_match.fallback);
    }
}
