use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::{mpsc::Sender, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{info, warn};

use crate::runtime::GameEvent;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Best/average/last completion times in seconds, as owned by the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub best: f64,
    pub average: f64,
    pub last: f64,
}

/// Payload posted once per completed session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub time_taken: f64,
    pub grid_size: u32,
}

/// The remote collaborator holding statistics
pub trait StatsBackend: Send + Sync + 'static {
    fn fetch(&self) -> Result<Stats>;
    fn submit(&self, score: &ScoreSubmission) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct HttpStatsClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpStatsClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("building http client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

impl StatsBackend for HttpStatsClient {
    fn fetch(&self) -> Result<Stats> {
        let resp = self
            .client
            .get(self.url("stats"))
            .send()
            .context("GET /stats")?;
        if !resp.status().is_success() {
            return Err(anyhow!("GET /stats returned HTTP {}", resp.status()));
        }
        resp.json::<Stats>().context("decoding /stats response")
    }

    fn submit(&self, score: &ScoreSubmission) -> Result<()> {
        let resp = self
            .client
            .post(self.url("submit-score"))
            .json(score)
            .send()
            .context("POST /submit-score")?;
        if !resp.status().is_success() {
            return Err(anyhow!("POST /submit-score returned HTTP {}", resp.status()));
        }
        Ok(())
    }
}

/// Fire-and-forget synchronisation: every call runs on its own thread and
/// reports fresh stats back into the event queue. Failures are only logged.
#[derive(Clone)]
pub struct StatsSync {
    backend: Arc<dyn StatsBackend>,
    events: Sender<GameEvent>,
}

impl StatsSync {
    pub fn new(backend: Arc<dyn StatsBackend>, events: Sender<GameEvent>) -> Self {
        Self { backend, events }
    }

    pub fn refresh(&self) -> JoinHandle<()> {
        let this = self.clone();
        spawn_logged(move || this.fetch_and_publish())
    }

    /// Post the score, then refresh on success. No retry.
    pub fn submit(&self, score: ScoreSubmission) -> JoinHandle<()> {
        let this = self.clone();
        spawn_logged(move || match this.backend.submit(&score) {
            Ok(()) => {
                info!(
                    time_taken = score.time_taken,
                    grid_size = score.grid_size,
                    "score submitted"
                );
                this.fetch_and_publish();
            }
            Err(e) => warn!("score submit failed: {e:#}"),
        })
    }

    fn fetch_and_publish(&self) {
        match self.backend.fetch() {
            Ok(stats) => {
                // receiver gone means the app is shutting down
                let _ = self.events.send(GameEvent::Stats(stats));
            }
            Err(e) => warn!("stats fetch failed: {e:#}"),
        }
    }
}

/// Spawn a worker that logs through the caller's subscriber
fn spawn_logged<F>(f: F) -> JoinHandle<()>
where
    F: FnOnce() + Send + 'static,
{
    let dispatch = tracing::dispatcher::get_default(|d| d.clone());
    thread::spawn(move || tracing::dispatcher::with_default(&dispatch, f))
}
