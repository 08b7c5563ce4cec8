use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use olymbits_autopilot::config::{CoefficientSource, EngineConfig, WeightingPolicy, DEFAULT_MAX_TURNS};
use olymbits_autopilot::costs::CostVector;
use olymbits_autopilot::curve::CurveSet;
use olymbits_autopilot::decider::decide;
use olymbits_autopilot::protocol::run_session;
use olymbits_autopilot::replay::{run_replays, ReplayConfig};
use olymbits_autopilot::strategies::describe_strategies;
use olymbits_autopilot::util::{parse_input_list, timestamp_suffix};
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::filter::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "olymbits-autopilot")]
#[command(about = "Vote-aggregating autopilot for the four-event Olymbits arcade")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a session over stdin/stdout
    Play {
        /// Log per-strategy cost tables to stderr
        #[arg(long)]
        debug: bool,
        /// Log per-strategy and per-turn timings to stderr
        #[arg(long)]
        timing: bool,
        /// Read curve coefficients from stdin after the header and reply INITIALIZED
        #[arg(long, conflicts_with = "curves")]
        tunables: bool,
        /// Load curve coefficients from a JSON curve set
        #[arg(long)]
        curves: Option<PathBuf>,
        #[arg(long, value_enum)]
        weighting: Option<CliWeighting>,
        #[arg(long, default_value_t = DEFAULT_MAX_TURNS)]
        max_turns: u32,
    },
    /// Pick the action for a net cost vector
    Decide {
        #[arg(allow_negative_numbers = true)]
        up: f64,
        #[arg(allow_negative_numbers = true)]
        down: f64,
        #[arg(allow_negative_numbers = true)]
        left: f64,
        #[arg(allow_negative_numbers = true)]
        right: f64,
    },
    /// Export the built-in curve set as JSON
    Curves {
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List the per-event strategies in roster order
    ListStrategies,
    /// Replay recorded referee transcripts offline
    Replay {
        #[arg(long, num_args = 1..)]
        inputs: Vec<PathBuf>,
        /// File listing transcript paths, one per line
        #[arg(long)]
        input_list: Option<PathBuf>,
        #[arg(long)]
        curves: Option<PathBuf>,
        #[arg(long, value_enum)]
        weighting: Option<CliWeighting>,
        #[arg(long, default_value_t = DEFAULT_MAX_TURNS)]
        max_turns: u32,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        jobs: Option<usize>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliWeighting {
    SelfWeighted,
    Normalized,
}

impl From<CliWeighting> for WeightingPolicy {
    fn from(value: CliWeighting) -> Self {
        match value {
            CliWeighting::SelfWeighted => WeightingPolicy::SelfWeighted,
            CliWeighting::Normalized => WeightingPolicy::Normalized,
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let Cli { command } = Cli::parse();

    match command {
        Commands::Play {
            debug,
            timing,
            tunables,
            curves,
            weighting,
            max_turns,
        } => {
            // subscriber first so env parsing warnings are not dropped
            let env_verbose = ["OLYMBITS_DEBUG", "OLYMBITS_TIMING"]
                .iter()
                .any(|name| env::var_os(name).is_some());
            init_tracing(debug || timing || env_verbose);

            let mut config = EngineConfig::from_env();
            config.debug |= debug;
            config.timing |= timing;
            if let Some(path) = curves {
                config.coefficients_source = CoefficientSource::File(path);
            } else if tunables {
                config.coefficients_source = CoefficientSource::External;
            }
            if let Some(weighting) = weighting {
                config.weighting = weighting.into();
            }

            let stdin = io::stdin();
            let stdout = io::stdout();
            let summary = run_session(stdin.lock(), stdout.lock(), &config, max_turns)?;
            tracing::info!(
                player_idx = summary.player_idx,
                turns = summary.turns,
                "session complete"
            );
        }
        Commands::Decide {
            up,
            down,
            left,
            right,
        } => {
            let net = CostVector::new(up, down, left, right);
            if let Some(action) = net.first_non_finite() {
                return Err(anyhow!("cost for {action} is not finite"));
            }
            println!("{}", decide(&net));
        }
        Commands::Curves { output } => {
            let encoded = serde_json::to_vec_pretty(&CurveSet::builtin())?;
            if let Some(path) = output {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&path, encoded)?;
                println!("wrote={}", path.display());
            } else {
                println!("{}", String::from_utf8_lossy(&encoded));
            }
        }
        Commands::ListStrategies => {
            for (slot, (id, description)) in describe_strategies().into_iter().enumerate() {
                println!("{slot} {id:10} {description}");
            }
        }
        Commands::Replay {
            mut inputs,
            input_list,
            curves,
            weighting,
            max_turns,
            out_dir,
            jobs,
        } => {
            init_tracing(false);
            if let Some(list) = input_list {
                inputs.extend(parse_input_list(&list)?);
            }
            let mut engine = EngineConfig::default();
            if let Some(path) = curves {
                engine.coefficients_source = CoefficientSource::File(path);
            }
            if let Some(weighting) = weighting {
                engine.weighting = weighting.into();
            }
            let out_dir = out_dir
                .unwrap_or_else(|| PathBuf::from(format!("replays/{}", timestamp_suffix())));

            let report = run_replays(ReplayConfig {
                inputs,
                engine,
                max_turns,
                out_dir: Some(out_dir.clone()),
                jobs,
            })?;

            println!("replays={}", report.replay_count);
            println!("turns={}", report.total_turns);
            println!("weighting={}", report.weighting);
            println!(
                "jobs={}",
                report
                    .jobs
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "auto".to_string())
            );
            println!("out_dir={}", out_dir.display());
            for (action, count) in &report.action_counts {
                println!("  {action:5} {count}");
            }
        }
    }

    Ok(())
}
