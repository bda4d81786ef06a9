use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::Serialize;
use tracing::info;

use eventree_grading::roc_auc_score;
use eventree_io::{Channel, ChannelReader};
use eventree_tree::{FeatureReuse, Forest, ForestConfig, ThresholdSweep, frame_labels};

#[derive(Parser)]
#[command(name = "eventree")]
#[command(about = "Best-first decision trees for detecting events in EEG channel recordings")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Train one tree per channel against an event channel and report training AUC
    Train {
        /// Path to the channel samples CSV file
        #[arg(long)]
        data: PathBuf,

        /// Path to the event markers CSV file
        #[arg(long)]
        events: PathBuf,

        /// Event column to learn
        #[arg(long)]
        event: String,

        /// Data channel to train on (repeatable; defaults to every channel)
        #[arg(long)]
        channel: Vec<String>,

        /// Number of consecutive samples per frame
        #[arg(long)]
        frame_size: usize,

        /// Number of trees (only 1 is supported)
        #[arg(long, default_value_t = 1)]
        trees: usize,

        /// Stop growing once the best leaf misclassifies fewer frames than this
        #[arg(long, default_value_t = 0)]
        min_misclassified: usize,

        /// Threshold sweep: "every" (each sorted position) or "distinct" (value boundaries)
        #[arg(long, default_value = "every")]
        sweep: String,

        /// Forbid a node from reusing features already split on by its ancestors
        #[arg(long, default_value_t = false)]
        exclude_ancestor_features: bool,

        /// Directory to save one model per channel as <channel>.bin
        #[arg(long)]
        model_dir: Option<PathBuf>,
    },

    /// Score a saved model on a channel and report its AUC
    Score {
        /// Path to the trained model binary
        #[arg(long)]
        model: PathBuf,

        /// Path to the channel samples CSV file
        #[arg(long)]
        data: PathBuf,

        /// Path to the event markers CSV file
        #[arg(long)]
        events: PathBuf,

        /// Data channel to score
        #[arg(long)]
        channel: String,

        /// Event column to grade against
        #[arg(long)]
        event: String,
    },

    /// Print the shape of a saved model
    Inspect {
        /// Path to the trained model binary
        #[arg(long)]
        model: PathBuf,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct TrainOutput {
    event: String,
    frame_size: usize,
    n_samples: usize,
    channels: Vec<ChannelOutput>,
}

#[derive(Debug, Serialize)]
struct ChannelOutput {
    channel: String,
    node_count: usize,
    average_error: f64,
    training_auc: f64,
    model: Option<PathBuf>,
}

#[derive(Serialize)]
struct ScoreOutput {
    channel: String,
    event: String,
    n_frames: usize,
    auc: f64,
}

#[derive(Serialize)]
struct InspectOutput {
    n_trees: usize,
    frame_size: usize,
    n_frames: usize,
    node_count: usize,
    n_leaves: usize,
    depth: usize,
    average_error: f64,
    min_misclassified: usize,
    threshold_sweep: ThresholdSweep,
    feature_reuse: FeatureReuse,
}

fn parse_sweep(s: &str) -> Result<ThresholdSweep> {
    match s {
        "every" => Ok(ThresholdSweep::EveryPosition),
        "distinct" => Ok(ThresholdSweep::DistinctValues),
        other => anyhow::bail!("unknown threshold sweep: {other} (expected every or distinct)"),
    }
}

/// Training AUC of `forest` on `samples`, graded against end-aligned frame labels.
fn grade(forest: &Forest, samples: &[i64], labels: &[u8]) -> Result<f64> {
    let scores = forest.score_series(samples).context("scoring failed")?;
    let truth = frame_labels(labels, forest.frame_size());
    roc_auc_score(&truth, &scores).context("AUC grading failed")
}

/// Fit and grade one channel. Nothing is written to disk.
fn fit_channel(config: &ForestConfig, channel: &Channel, labels: &[u8]) -> Result<(Forest, f64)> {
    let forest = config
        .fit(channel.samples(), labels)
        .with_context(|| format!("training failed for channel {}", channel.name()))?;
    let training_auc = grade(&forest, channel.samples(), labels)
        .with_context(|| format!("grading failed for channel {}", channel.name()))?;

    info!(
        channel = channel.name(),
        node_count = forest.node_count(),
        average_error = forest.average_error(),
        training_auc,
        "channel trained"
    );
    Ok((forest, training_auc))
}

/// Train and grade every channel in parallel, then save the models.
///
/// Models are written only once every channel has trained and graded, so a
/// failing channel leaves `model_dir` untouched.
fn train_channels(
    config: &ForestConfig,
    channels: &[&Channel],
    labels: &[u8],
    model_dir: Option<&Path>,
) -> Result<Vec<ChannelOutput>> {
    let fitted = channels
        .par_iter()
        .map(|c| fit_channel(config, c, labels))
        .collect::<Result<Vec<_>>>()?;

    if let Some(dir) = model_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("cannot create model directory {}", dir.display()))?;
    }

    channels
        .iter()
        .zip(fitted)
        .map(|(channel, (forest, training_auc))| -> Result<ChannelOutput> {
            let model = match model_dir {
                Some(dir) => {
                    let path = dir.join(format!("{}.bin", channel.name()));
                    forest
                        .save(&path)
                        .with_context(|| format!("failed to save model for channel {}", channel.name()))?;
                    Some(path)
                }
                None => None,
            };
            Ok(ChannelOutput {
                channel: channel.name().to_string(),
                node_count: forest.node_count(),
                average_error: forest.average_error(),
                training_auc,
                model,
            })
        })
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Train {
            data,
            events,
            event,
            channel,
            frame_size,
            trees,
            min_misclassified,
            sweep,
            exclude_ancestor_features,
            model_dir,
        } => {
            // 1. Read channels and events
            let data_set = ChannelReader::new(&data)
                .read()
                .context("failed to read channel CSV")?;
            let event_set = ChannelReader::new(&events)
                .read()
                .context("failed to read events CSV")?;
            let labels = event_set.channel(&event)?.as_labels()?;

            let selected: Vec<&Channel> = if channel.is_empty() {
                data_set.channels().iter().collect()
            } else {
                channel
                    .iter()
                    .map(|name| data_set.channel(name))
                    .collect::<Result<_, _>>()?
            };
            info!(
                n_channels = selected.len(),
                n_samples = data_set.n_samples(),
                event = %event,
                "inputs loaded"
            );

            // 2. Build config
            let feature_reuse = if exclude_ancestor_features {
                FeatureReuse::ExcludeAncestors
            } else {
                FeatureReuse::Allowed
            };
            let config = ForestConfig::new(frame_size)?
                .with_tree_count(trees)
                .with_min_misclassified(min_misclassified)
                .with_threshold_sweep(parse_sweep(&sweep)?)
                .with_feature_reuse(feature_reuse);

            // 3. Train and grade every channel, then save
            let channels = train_channels(&config, &selected, &labels, model_dir.as_deref())?;

            // 4. Print summary
            let output = TrainOutput {
                event,
                frame_size,
                n_samples: data_set.n_samples(),
                channels,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Score {
            model,
            data,
            events,
            channel,
            event,
        } => {
            let forest = Forest::load(&model).context("failed to load model")?;
            info!(
                frame_size = forest.frame_size(),
                node_count = forest.node_count(),
                "model loaded"
            );

            let data_set = ChannelReader::new(&data)
                .read()
                .context("failed to read channel CSV")?;
            let event_set = ChannelReader::new(&events)
                .read()
                .context("failed to read events CSV")?;
            let samples = data_set.channel(&channel)?.samples();
            let labels = event_set.channel(&event)?.as_labels()?;
            anyhow::ensure!(
                samples.len() == labels.len(),
                "channel {channel} has {} samples but event {event} has {}",
                samples.len(),
                labels.len()
            );

            let auc = grade(&forest, samples, &labels)?;
            let output = ScoreOutput {
                n_frames: samples.len() + 1 - forest.frame_size(),
                channel,
                event,
                auc,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Inspect { model } => {
            let forest = Forest::load(&model).context("failed to load model")?;
            let config = forest.config();
            let output = InspectOutput {
                n_trees: forest.n_trees(),
                frame_size: forest.frame_size(),
                n_frames: forest.n_frames(),
                node_count: forest.node_count(),
                n_leaves: forest.trees().iter().map(|t| t.n_leaves()).sum(),
                depth: forest.trees().iter().map(|t| t.depth()).max().unwrap_or(0),
                average_error: forest.average_error(),
                min_misclassified: config.min_misclassified(),
                threshold_sweep: config.threshold_sweep(),
                feature_reuse: config.feature_reuse(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
