//! The bootstrap pipeline.
//!
//! Runs the steps in order:
//!
//! ```text
//! Start → DependenciesInstalled → SourceFetched → ConfigResolved
//!       → ServiceRegistered → ServiceStarted(Verified | Unverified)
//! ```
//!
//! Every step before verification is fatal on failure. Nothing after a
//! failed step runs, so a failed resolution never leaves an env file or a
//! unit behind.

use std::path::PathBuf;

use tracing::info;

use crate::core::config::Config;
use crate::core::domain::{Stage, Step, Verification};
use crate::core::host::{packages, service, source, CommandRunner};
use crate::core::journal::Journal;
use crate::core::resolve::{self, Resolution};
use crate::core::retry::Sleeper;
use crate::core::store::ConfigStore;
use crate::error::Result;

/// Switches for a pipeline run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Skip steps the journal records as done.
    pub resume: bool,
    pub skip_install: bool,
    pub skip_fetch: bool,
}

/// What a finished run produced.
#[derive(Debug)]
pub struct Outcome {
    pub stage: Stage,
    pub verification: Verification,
    pub env_file: PathBuf,
    /// SHA-256 of the env file contents.
    pub fingerprint: String,
    pub report: Vec<Resolution>,
}

/// Drives one bootstrap.
pub struct Provisioner<'a> {
    config: &'a Config,
    store: &'a dyn ConfigStore,
    runner: &'a dyn CommandRunner,
    sleeper: &'a dyn Sleeper,
    region: String,
    options: RunOptions,
}

impl<'a> Provisioner<'a> {
    pub fn new(
        config: &'a Config,
        store: &'a dyn ConfigStore,
        runner: &'a dyn CommandRunner,
        sleeper: &'a dyn Sleeper,
        region: &str,
    ) -> Self {
        Self {
            config,
            store,
            runner,
            sleeper,
            region: region.to_string(),
            options: RunOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// Run every step.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing step. An inactive service after
    /// start is not an error; see [`Outcome::verification`].
    pub fn run(&self) -> Result<Outcome> {
        let mut journal = Journal::load(&self.config.journal_path());
        if !self.options.resume {
            journal.reset();
        }

        let mut stage = Stage::Start;
        info!(app = %self.config.app.name, region = %self.region, "bootstrap started");

        if self.should_run(Step::InstallDependencies, self.options.skip_install, &journal) {
            packages::install_dependencies(&self.config.runtime, self.runner)?;
            journal.record(Step::InstallDependencies);
        }
        advance(&mut stage, Step::InstallDependencies);

        if self.should_run(Step::FetchSource, self.options.skip_fetch, &journal) {
            source::fetch_source(
                &self.config.source,
                &self.config.runtime,
                &self.config.app.install_dir,
                self.runner,
            )?;
            journal.record(Step::FetchSource);
        }
        advance(&mut stage, Step::FetchSource);

        let resolved =
            resolve::resolve_environment(self.config, self.store, self.sleeper, &self.region)?;
        let env_file = self.config.env_file();
        resolved.env.save(&env_file)?;
        let fingerprint = resolved.env.fingerprint();
        journal.record(Step::ResolveConfig);
        advance(&mut stage, Step::ResolveConfig);

        service::register(self.config, self.runner)?;
        journal.record(Step::RegisterService);
        advance(&mut stage, Step::RegisterService);

        service::start(self.config, self.runner)?;
        let verification = service::verify(self.config, self.runner, self.sleeper)?;
        journal.record(Step::StartService);
        stage = Stage::ServiceStarted(verification);
        info!(stage = %stage, "bootstrap finished");

        Ok(Outcome {
            stage,
            verification,
            env_file,
            fingerprint,
            report: resolved.report,
        })
    }

    fn should_run(&self, step: Step, skipped: bool, journal: &Journal) -> bool {
        if skipped {
            info!(step = %step, "skipped");
            return false;
        }
        if self.options.resume && step.is_resumable() && journal.is_done(step) {
            info!(step = %step, "already done, skipping");
            return false;
        }
        true
    }
}

fn advance(stage: &mut Stage, step: Step) {
    if let Some(next) = step.reaches() {
        info!(from = %stage, to = %next, "stage complete");
        *stage = next;
    }
}
