//! Offline replays: feed recorded referee transcripts through the session
//! driver and summarize what the engine would have played.

use crate::action::Action;
use crate::config::EngineConfig;
use crate::protocol::run_session;
use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Debug)]
pub struct ReplayConfig {
    pub inputs: Vec<PathBuf>,
    pub engine: EngineConfig,
    pub max_turns: u32,
    pub out_dir: Option<PathBuf>,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ReplayRecord {
    pub path: String,
    pub player_idx: usize,
    pub turns: u32,
    pub actions: Vec<Action>,
    pub action_counts: BTreeMap<Action, u32>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ReplayReport {
    pub generated_unix_s: u64,
    pub weighting: &'static str,
    pub max_turns: u32,
    pub jobs: Option<usize>,
    pub replay_count: usize,
    pub total_turns: u64,
    pub action_counts: BTreeMap<Action, u32>,
    pub replays: Vec<ReplayRecord>,
}

/// Replays one transcript, discarding the protocol output.
pub fn replay_file(path: &Path, engine: &EngineConfig, max_turns: u32) -> Result<ReplayRecord> {
    let file =
        File::open(path).with_context(|| format!("failed opening transcript {}", path.display()))?;
    let summary = run_session(BufReader::new(file), io::sink(), engine, max_turns)
        .with_context(|| format!("replay failed for {}", path.display()))?;
    Ok(ReplayRecord {
        path: path.display().to_string(),
        player_idx: summary.player_idx,
        turns: summary.turns,
        actions: summary.actions,
        action_counts: summary.action_counts,
    })
}

pub fn run_replays(config: ReplayConfig) -> Result<ReplayReport> {
    if config.inputs.is_empty() {
        return Err(anyhow!("replay requires at least one transcript"));
    }
    if let Some(jobs) = config.jobs {
        if jobs == 0 {
            return Err(anyhow!("replay --jobs must be >= 1 when provided"));
        }
    }

    let run_one = |path: &PathBuf| replay_file(path, &config.engine, config.max_turns);
    let results: Vec<Result<ReplayRecord>> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| config.inputs.par_iter().map(run_one).collect())
    } else {
        config.inputs.par_iter().map(run_one).collect()
    };

    let mut replays = Vec::with_capacity(results.len());
    for result in results {
        replays.push(result?);
    }

    let mut action_counts: BTreeMap<Action, u32> = BTreeMap::new();
    for record in &replays {
        for (action, count) in &record.action_counts {
            *action_counts.entry(*action).or_default() += count;
        }
    }
    let total_turns = replays.iter().map(|r| u64::from(r.turns)).sum();

    let report = ReplayReport {
        generated_unix_s: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
        weighting: config.engine.weighting.as_str(),
        max_turns: config.max_turns,
        jobs: config.jobs,
        replay_count: replays.len(),
        total_turns,
        action_counts,
        replays,
    };

    if let Some(out_dir) = &config.out_dir {
        fs::create_dir_all(out_dir)
            .with_context(|| format!("failed creating {}", out_dir.display()))?;
        let report_path = out_dir.join("summary.json");
        fs::write(
            &report_path,
            serde_json::to_vec_pretty(&report).context("failed to serialize summary json")?,
        )
        .with_context(|| format!("failed writing {}", report_path.display()))?;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(inputs: Vec<PathBuf>, jobs: Option<usize>) -> ReplayConfig {
        ReplayConfig {
            inputs,
            engine: EngineConfig::default(),
            max_turns: 100,
            out_dir: None,
            jobs,
        }
    }

    #[test]
    fn rejects_empty_inputs_and_zero_jobs() {
        assert!(run_replays(config(Vec::new(), None)).is_err());
        let err = run_replays(config(vec![PathBuf::from("x")], Some(0))).unwrap_err();
        assert!(err.to_string().contains("--jobs"));
    }

    #[test]
    fn missing_transcript_names_the_path() {
        let err = replay_file(
            Path::new("/nonexistent/olymbits.txt"),
            &EngineConfig::default(),
            10,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/olymbits.txt"));
    }
}
