//! Shared command context: config, store, engine and acting role.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use tradeflow_core::account;
use tradeflow_core::config::Config;
use tradeflow_core::notifier::WebNotifier;
use tradeflow_core::{Actor, Engine, Role};
use tradeflow_store::{init_pool, BroadcastReceiver, StorePool};

pub struct Runtime {
    pub project_dir: PathBuf,
    pub config: Config,
    pub engine: Engine,
    role_override: Option<Role>,
    events: BroadcastReceiver,
    notifier: WebNotifier,
}

impl Runtime {
    pub async fn open(project_dir: &Path, as_role: Option<&str>) -> Result<Self> {
        let config = Config::load(project_dir)?;
        let kind = config.backend_kind(project_dir);
        let pool = init_pool(&kind)
            .await
            .with_context(|| format!("Failed to open store ({})", kind))?;

        let engine = Engine::new(pool).with_latency(config.latency());
        let events = engine.subscribe();
        let notifier = WebNotifier::with_url(&config.web_url);
        let role_override = as_role.map(str::parse::<Role>).transpose()?;

        debug!(backend = %kind, role = ?role_override, "Runtime ready");
        Ok(Self {
            project_dir: project_dir.to_path_buf(),
            config,
            engine,
            role_override,
            events,
            notifier,
        })
    }

    pub fn pool(&self) -> &StorePool {
        self.engine.pool()
    }

    pub fn role_override(&self) -> Option<Role> {
        self.role_override
    }

    /// The acting party: `--as` if given, otherwise the session.
    pub async fn actor(&self) -> Result<Actor> {
        Ok(account::resolve_actor(self.pool(), self.role_override).await?)
    }

    /// Run a workflow call, showing a spinner when latency is simulated.
    pub async fn run<T, F>(&self, message: &str, fut: F) -> T
    where
        F: Future<Output = T>,
    {
        if self.engine.latency().is_zero() {
            return fut.await;
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        let out = fut.await;
        spinner.finish_and_clear();
        out
    }

    /// Relay this process's workflow events to a running web server.
    pub async fn finish(mut self) {
        let forwarded = self.notifier.drain(&mut self.events).await;
        if forwarded > 0 {
            debug!(forwarded, "Forwarded events to web server");
        }
    }

    /// Hand the engine to a long-running server.
    pub fn into_engine(self) -> Engine {
        self.engine
    }
}
