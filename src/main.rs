use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use kenn::classifiers::Classifier;
use kenn::classifiers::lazy::{KNearestNeighbors, KnnConfig};
use kenn::core::instance_header::InstanceHeader;
use kenn::logging;
use kenn::streams::{ArffFileStream, MemoryStream, Stream, read_all};
use kenn::tasks::{HoldoutEvaluator, predict_rows, split_instances};
use kenn::ui::cli::args::{Cli, Command, EvaluateArgs, PredictArgs, SchemaArgs};
use kenn::ui::types::KnnParams;
use kenn::ui::types::schema::{field_specs, render_field_table, root_schema};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const FG_CYAN: &str = "\x1b[36m";
const FG_GREY: &str = "\x1b[90m";

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Evaluate(args) => evaluate(args),
        Command::Predict(args) => predict(args),
        Command::Schema(args) => schema(args),
    }
}

fn evaluate(args: EvaluateArgs) -> Result<()> {
    let params = args.learner.knn_params()?;
    let config = params.clone().into_config().context("invalid learner configuration")?;

    let train_stream = open_arff(&args.train, args.class_index)?;
    let header = train_stream.header();

    let (train, test): (Box<dyn Stream>, Box<dyn Stream>) = match &args.test {
        Some(path) => (
            Box::new(train_stream) as Box<dyn Stream>,
            Box::new(open_arff(path, args.class_index)?) as Box<dyn Stream>,
        ),
        None => {
            let mut train_stream = train_stream;
            let all = read_all(&mut train_stream);
            let (train, test) = split_instances(all, args.split_ratio, args.seed)
                .context("failed to split the training file")?;
            info!(
                train = train.len(),
                test = test.len(),
                seed = args.seed,
                "split training file"
            );
            (
                Box::new(MemoryStream::new(Arc::clone(&header), train)) as Box<dyn Stream>,
                Box::new(MemoryStream::new(Arc::clone(&header), test)) as Box<dyn Stream>,
            )
        }
    };

    let learner = build_learner(Arc::clone(&header), config)?;
    let mut runner = HoldoutEvaluator::new(learner, train, test, args.max_test_instances)
        .context("failed to construct HoldoutEvaluator")?;

    if !args.json {
        print_header(&header, &params);
    }

    let report = runner
        .run()
        .context("evaluation failed")?
        .with_extra("k", params.k as f64);

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{report}");
    }

    if let Some(path) = args.dump_file
        && !path.as_os_str().is_empty()
    {
        report
            .export(&path)
            .with_context(|| format!("failed to export report to {}", path.display()))?;
    }

    Ok(())
}

fn predict(args: PredictArgs) -> Result<()> {
    let config = args
        .learner
        .knn_params()?
        .into_config()
        .context("invalid learner configuration")?;

    let mut train_stream = open_arff(&args.train, args.class_index)?;
    let mut query_stream = open_arff(&args.query, args.class_index)?;
    let header = train_stream.header();

    let mut learner = build_learner(Arc::clone(&header), config)?;
    learner
        .train(read_all(&mut train_stream))
        .context("training failed")?;

    let predictions = predict_rows(learner.as_ref(), &mut query_stream)
        .with_context(|| format!("failed to label {}", args.query.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&predictions)?);
    } else {
        for p in &predictions {
            println!("{}", p.prediction);
        }
    }
    Ok(())
}

fn schema(args: SchemaArgs) -> Result<()> {
    let root = root_schema::<KnnParams>();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&root)?);
        return Ok(());
    }

    let specs = field_specs(&root)?;
    print!("{}", render_field_table(&specs, &KnnParams::default_value()));
    Ok(())
}

fn open_arff(path: &std::path::Path, class_index: Option<usize>) -> Result<ArffFileStream> {
    ArffFileStream::new(path, class_index)
        .with_context(|| format!("failed to open ARFF file {}", path.display()))
}

fn build_learner(header: Arc<InstanceHeader>, config: KnnConfig) -> Result<Box<dyn Classifier>> {
    let learner = KNearestNeighbors::new(header, config).context("failed to build learner")?;
    Ok(Box::new(learner))
}

fn print_header(header: &InstanceHeader, params: &KnnParams) {
    println!("{BOLD}{FG_CYAN}▶ Holdout Evaluation{RESET}");
    println!(
        "{DIM}relation={}{RESET}  {DIM}k={} metric={} weighting={} normalize={}{RESET}  {}",
        header.relation_name(),
        params.k,
        params.metric,
        params.weighting,
        params.normalize,
        timestamp_now()
    );
    println!(
        "{FG_GREY}────────────────────────────────────────────────────────────────────────{RESET}"
    );
}

fn timestamp_now() -> String {
    use chrono::{Local, SecondsFormat};
    let now = Local::now();
    format!(
        "{DIM}{}{}",
        now.to_rfc3339_opts(SecondsFormat::Secs, true),
        RESET
    )
}
