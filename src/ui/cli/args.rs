use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use serde_json::{Map, Value};

use crate::ui::types::KnnParams;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Nearest-neighbour classification over ARFF data"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Train on one ARFF file and score predictions on held-out data
    Evaluate(EvaluateArgs),
    /// Train on one ARFF file and print a label for every row of another
    Predict(PredictArgs),
    /// Describe the learner parameters accepted by --learner-param
    Schema(SchemaArgs),
}

#[derive(Debug, Args)]
pub struct LearnerArgs {
    /// Override learner parameters (key=value, e.g. k=5 or metric=euclidean)
    #[arg(long = "learner-param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub learner_params: Vec<KeyValue>,
}

impl LearnerArgs {
    /// Applies the overrides onto the default parameters.
    pub fn knn_params(&self) -> Result<KnnParams> {
        let mut params = KnnParams::default_value();
        apply_overrides(&mut params, &self.learner_params)?;
        KnnParams::from_value(params).context("invalid learner parameters")
    }
}

#[derive(Debug, Args)]
pub struct EvaluateArgs {
    /// ARFF file with the training data
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub train: PathBuf,

    /// ARFF file with the test data (omit to split the training file)
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub test: Option<PathBuf>,

    /// Share of the training file used for training when no test file is given
    #[arg(long, default_value_t = 0.66, value_name = "RATIO")]
    pub split_ratio: f64,

    /// Seed for the train/test shuffle
    #[arg(long, default_value_t = 42, value_name = "SEED")]
    pub seed: u64,

    /// Zero-based index of the class attribute (omit for the last attribute)
    #[arg(long, value_name = "INDEX")]
    pub class_index: Option<usize>,

    /// Stop after scoring this many test instances (omit for all)
    #[arg(long, value_name = "N")]
    pub max_test_instances: Option<u64>,

    #[command(flatten)]
    pub learner: LearnerArgs,

    /// File to write the evaluation report to, as JSON
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub dump_file: Option<PathBuf>,

    /// Print the report as JSON instead of a summary line
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct PredictArgs {
    /// ARFF file with the training data
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub train: PathBuf,

    /// ARFF file with the rows to label (class values may be '?')
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub query: PathBuf,

    /// Zero-based index of the class attribute (omit for the last attribute)
    #[arg(long, value_name = "INDEX")]
    pub class_index: Option<usize>,

    #[command(flatten)]
    pub learner: LearnerArgs,

    /// Print predictions as a JSON array
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Print the raw JSON schema instead of a field table
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeyValue {
    key: String,
    value: Value,
}

fn apply_overrides(target: &mut Value, overrides: &[KeyValue]) -> Result<()> {
    for kv in overrides {
        set_path(target, &kv.key, kv.value.clone())
            .with_context(|| format!("failed to set '{}'", kv.key))?;
    }
    Ok(())
}

fn set_path(target: &mut Value, path: &str, new_value: Value) -> Result<()> {
    let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
    let Some((last, parents)) = segments.split_last() else {
        bail!("empty key is not allowed");
    };

    let mut current = target;
    for seg in parents {
        current = ensure_object(current)?
            .entry((*seg).to_string())
            .or_insert(Value::Null);
    }

    ensure_object(current)?.insert((*last).to_string(), new_value);
    Ok(())
}

fn ensure_object(value: &mut Value) -> Result<&mut Map<String, Value>> {
    if value.is_null() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => Ok(map),
        other => bail!("cannot set nested field on non-object value: {other:?}"),
    }
}

fn parse_key_value(raw: &str) -> Result<KeyValue, String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| "expected KEY=VALUE".to_string())?;
    let key = key.trim();
    if key.is_empty() {
        return Err("key cannot be empty".to_string());
    }

    Ok(KeyValue {
        key: key.to_string(),
        value: parse_literal(value.trim()),
    })
}

/// JSON literal when it parses as one, plain string otherwise.
fn parse_literal(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::String(String::new());
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
