use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use trout::behavior::{parse_sequence, BehaviorSource, BehaviorStore};
use trout::cli::{flag_override, Cli, Command, OutputFormat};
use trout::config::TroutConfig;
use trout::features::load_features;
use trout::json_output::{to_json, JsonBehaviors, JsonDiff, JsonFeatures, JsonInjection};
use trout::sequence::{BehaviorInjector, TraceComparator};
use trout::trace::{load_trace, save_trace};

/// Initialize tracing subscriber
///
/// Warnings and errors always go out; `--debug` raises the level to TRACE.
/// With a log file configured, events are appended there instead of stderr.
fn init_tracing(debug: bool, log_file: Option<&Path>) -> Result<()> {
    let default_level = if debug {
        LevelFilter::TRACE
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

fn open_store(
    config: &TroutConfig,
    store: Option<PathBuf>,
    definitions: Option<PathBuf>,
) -> BehaviorStore {
    BehaviorStore::open(store.unwrap_or_else(|| config.store_path.clone()))
        .with_definitions(definitions.unwrap_or_else(|| config.definitions_path.clone()))
}

fn run_diff(
    config: &TroutConfig,
    format: OutputFormat,
    trace_x: &Path,
    trace_y: &Path,
    keep_arguments: bool,
    ignore_arguments: bool,
) -> Result<()> {
    let x = load_trace(trace_x)?;
    let y = load_trace(trace_y)?;

    let ignore =
        flag_override(ignore_arguments, keep_arguments).unwrap_or(config.ignore_arguments);
    let comparator = TraceComparator::new(ignore);
    let diff = comparator
        .compare(&x, &y)
        .context("Failed to diff traces")?;

    match format {
        OutputFormat::Text => println!("{}", diff.count()),
        OutputFormat::Json => println!(
            "{}",
            to_json(&JsonDiff::new(&diff, comparator.ignore_arguments()))?
        ),
    }
    Ok(())
}

struct InjectArgs {
    trace: PathBuf,
    probability: Option<f64>,
    multiple: bool,
    single: bool,
    seed: Option<u64>,
    store: Option<PathBuf>,
    definitions: Option<PathBuf>,
    output: Option<PathBuf>,
}

fn run_inject(config: &TroutConfig, format: OutputFormat, args: InjectArgs) -> Result<()> {
    let target = load_trace(&args.trace)?;
    let probability = args.probability.unwrap_or(config.insertion_probability);
    let multiple =
        flag_override(args.multiple, args.single).unwrap_or(config.multiple_behaviors);

    let store = open_store(config, args.store, args.definitions);
    let injector =
        BehaviorInjector::from_source(&store).context("Failed to load malicious behaviors")?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let injected = injector
        .inject(&target, probability, multiple, &mut rng)
        .context("Failed to inject behaviors")?;

    eprintln!(
        "Injected {} behaviors ({} calls) into {} ({} -> {} calls)",
        injected.insertions.len(),
        injected.injected_calls(),
        args.trace.display(),
        target.len(),
        injected.trace.len()
    );

    if let Some(output) = &args.output {
        save_trace(output, &injected.trace)?;
    }

    match format {
        OutputFormat::Text => {
            if args.output.is_none() {
                for call in &injected.trace {
                    println!("{}", call);
                }
            }
        }
        OutputFormat::Json => {
            let record = JsonInjection {
                insertion_probability: probability,
                multiple_behaviors: multiple,
                seed: args.seed,
                original_length: target.len(),
                insertions: injected.insertions,
                trace: injected.trace,
            };
            println!("{}", to_json(&record)?);
        }
    }
    Ok(())
}

fn run_behaviors(
    config: &TroutConfig,
    format: OutputFormat,
    store: Option<PathBuf>,
    definitions: Option<PathBuf>,
) -> Result<()> {
    let store = open_store(config, store, definitions);
    let behaviors = store.load_behaviors()?;

    if behaviors.is_empty() {
        tracing::warn!("No malicious behaviors available in {}", store.path().display());
    }

    match format {
        OutputFormat::Text => {
            for behavior in &behaviors {
                println!("{}: {}", behavior.description, behavior.sequence.join(" -> "));
            }
        }
        OutputFormat::Json => {
            let record = JsonBehaviors {
                total: behaviors.len(),
                behaviors,
            };
            println!("{}", to_json(&record)?);
        }
    }
    Ok(())
}

fn run_add_behavior(
    config: &TroutConfig,
    description: &str,
    calls: &str,
    store: Option<PathBuf>,
) -> Result<()> {
    let sequence = parse_sequence(calls);

    let store = BehaviorStore::open(store.unwrap_or_else(|| config.store_path.clone()));
    let behavior = store.insert_sequence(description, sequence)?;

    eprintln!(
        "Stored behavior '{}' ({} calls) in {}",
        behavior.description,
        behavior.len(),
        store.path().display()
    );
    Ok(())
}

fn run_features(
    config: &TroutConfig,
    format: OutputFormat,
    file: &Path,
    delimiter: Option<String>,
) -> Result<()> {
    let delimiter = delimiter.unwrap_or_else(|| config.feature_delimiter.clone());
    let features = load_features(file, &delimiter)?;

    match format {
        OutputFormat::Text => {
            let rendered: Vec<String> = features.iter().map(|f| f.to_string()).collect();
            println!("{}", rendered.join(&delimiter));
        }
        OutputFormat::Json => {
            let record = JsonFeatures {
                count: features.len(),
                features,
            };
            println!("{}", to_json(&record)?);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let config = TroutConfig::load(args.config.as_deref())?;

    init_tracing(args.debug, config.log_file.as_deref())?;

    match args.command {
        Command::Diff {
            trace_x,
            trace_y,
            keep_arguments,
            ignore_arguments,
        } => run_diff(
            &config,
            args.format,
            &trace_x,
            &trace_y,
            keep_arguments,
            ignore_arguments,
        ),
        Command::Inject {
            trace,
            probability,
            multiple,
            single,
            seed,
            store,
            definitions,
            output,
        } => run_inject(
            &config,
            args.format,
            InjectArgs {
                trace,
                probability,
                multiple,
                single,
                seed,
                store,
                definitions,
                output,
            },
        ),
        Command::Behaviors { store, definitions } => {
            run_behaviors(&config, args.format, store, definitions)
        }
        Command::AddBehavior {
            description,
            calls,
            store,
        } => run_add_behavior(&config, &description, &calls, store),
        Command::Features { file, delimiter } => {
            run_features(&config, args.format, &file, delimiter)
        }
    }
}
