//! Pipeline stages and steps.
//!
//! A bootstrap walks linearly through [`Stage`]s; each transition is made by
//! completing one [`Step`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result of the post-start status query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// The service manager reports the unit active.
    Verified,
    /// The unit was not active after the settle interval. Not fatal.
    Unverified,
}

/// Where a bootstrap run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    DependenciesInstalled,
    SourceFetched,
    ConfigResolved,
    ServiceRegistered,
    ServiceStarted(Verification),
}

impl Stage {
    /// Whether the run has finished. Both verification outcomes are
    /// terminal; only failures before this point abort the run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::ServiceStarted(_))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::DependenciesInstalled => write!(f, "dependencies-installed"),
            Self::SourceFetched => write!(f, "source-fetched"),
            Self::ConfigResolved => write!(f, "config-resolved"),
            Self::ServiceRegistered => write!(f, "service-registered"),
            Self::ServiceStarted(Verification::Verified) => write!(f, "service-started (verified)"),
            Self::ServiceStarted(Verification::Unverified) => {
                write!(f, "service-started (unverified)")
            }
        }
    }
}

/// A discrete provisioning step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    InstallDependencies,
    FetchSource,
    ResolveConfig,
    RegisterService,
    StartService,
}

impl Step {
    /// All steps in execution order.
    pub const ALL: [Step; 5] = [
        Step::InstallDependencies,
        Step::FetchSource,
        Step::ResolveConfig,
        Step::RegisterService,
        Step::StartService,
    ];

    /// Whether a completed step may be skipped on `--resume`.
    ///
    /// Configuration and service steps always re-run so that a resumed run
    /// picks up current store values.
    pub fn is_resumable(&self) -> bool {
        matches!(self, Self::InstallDependencies | Self::FetchSource)
    }

    /// Stage reached once this step completes. `StartService` resolves to a
    /// stage only together with its verification.
    pub fn reaches(&self) -> Option<Stage> {
        match self {
            Self::InstallDependencies => Some(Stage::DependenciesInstalled),
            Self::FetchSource => Some(Stage::SourceFetched),
            Self::ResolveConfig => Some(Stage::ConfigResolved),
            Self::RegisterService => Some(Stage::ServiceRegistered),
            Self::StartService => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InstallDependencies => "install dependencies",
            Self::FetchSource => "fetch source",
            Self::ResolveConfig => "resolve configuration",
            Self::RegisterService => "register service",
            Self::StartService => "start service",
        };
        write!(f, "{}", name)
    }
}
