use std::{io::ErrorKind, process::Stdio, time::Duration};

use anyhow::{bail, Context};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::{io::AsyncWriteExt, process::Command};
use tracing::{debug, instrument};

use super::screening::ModelFeatures;
use crate::config::EstimatorConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub probability: f64,
    pub model_version: String,
}

/// Out-of-band probability estimate. Any error makes the caller fall back to
/// the rule-based table.
#[async_trait]
pub trait Estimator: Send + Sync {
    async fn predict(&self, features: &ModelFeatures) -> anyhow::Result<Prediction>;
}

#[derive(Debug, Deserialize)]
struct EstimatorOutput {
    pcos_probability: f64,
    model_version: String,
}

/// Runs a model scorer as a child process: features as JSON on stdin, one
/// JSON object on stdout. The child is killed when the timeout elapses.
#[derive(Debug, Clone)]
pub struct SubprocessEstimator {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl SubprocessEstimator {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn from_config(cfg: &EstimatorConfig) -> Self {
        Self::new(
            cfg.python.clone(),
            vec![cfg.script.clone(), "--model".into(), cfg.model_path.clone()],
            cfg.timeout(),
        )
    }

    async fn run(&self, input: Vec<u8>) -> anyhow::Result<std::process::Output> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("spawn estimator `{}`", self.program))?;

        let mut stdin = child.stdin.take().context("estimator stdin unavailable")?;
        let writer = async move {
            let res = stdin.write_all(&input).await;
            drop(stdin);
            res
        };
        let (written, output) = tokio::join!(writer, child.wait_with_output());
        match written {
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                debug!("estimator closed stdin early");
            }
            other => other.context("write estimator stdin")?,
        }
        output.context("wait for estimator")
    }
}

#[async_trait]
impl Estimator for SubprocessEstimator {
    #[instrument(skip_all, fields(program = %self.program))]
    async fn predict(&self, features: &ModelFeatures) -> anyhow::Result<Prediction> {
        let input = serde_json::to_vec(features)?;

        let output = tokio::time::timeout(self.timeout, self.run(input))
            .await
            .map_err(|_| anyhow::anyhow!("estimator timed out after {:?}", self.timeout))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "estimator exited with {}: {}",
                output.status,
                stderr.trim().chars().take(200).collect::<String>()
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let parsed: EstimatorOutput = serde_json::from_str(stdout.trim()).with_context(|| {
            format!(
                "estimator returned malformed output: {}",
                stdout.chars().take(200).collect::<String>()
            )
        })?;

        let p = parsed.pcos_probability;
        if !(0.0..=1.0).contains(&p) {
            bail!("estimator probability {p} outside [0, 1]");
        }
        if parsed.model_version.trim().is_empty() {
            bail!("estimator returned an empty model_version");
        }

        debug!(probability = p, model_version = %parsed.model_version, "estimator prediction");
        Ok(Prediction {
            probability: p,
            model_version: parsed.model_version,
        })
    }
}
