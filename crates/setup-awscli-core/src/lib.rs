//! setup-awscli core
//!
//! Installs AWS CLI v2 into a runner's tool cache and exposes it to later
//! workflow steps.
//!
//! # Pipeline
//!
//! ```text
//! Validating -> ResolvingVersion -> ProbingCache -+-> Publishing -> Done
//!                                                 |        ^
//!                                                 +-> Fetching -> Extracting
//!                                                       -> Installing -> MarkingComplete
//! ```
//!
//! Every stage returns a [`SetupError`]; [`flow::SetupFlow`] tags it with the
//! stage that failed and the binary reports it once.
//!
//! # Cache Layout
//!
//! ```text
//! $RUNNER_TOOL_CACHE/
//! └── aws-cli/
//!     └── 2.15.30/
//!         ├── x64/            # --install-dir
//!         │   └── bin/aws     # --bin-dir
//!         └── x64.complete    # zero-byte completion marker
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod flow;
pub mod installer;
pub mod io;
pub mod platform;
pub mod publish;
pub mod resolve;
pub mod tags;
pub mod version;

pub use cache::{CacheEntry, CacheProbe, ToolCache};
pub use config::SetupConfig;
pub use error::SetupError;
pub use flow::{FlowError, SetupFlow, SetupOutcome, Stage};
pub use platform::{Arch, Os, Platform};
pub use publish::{ActionsPublisher, Publisher};
pub use tags::{GithubTags, TagSource};
pub use version::RequestedVersion;

/// Tool name used as the first tool-cache path component.
pub const TOOL_NAME: &str = "aws-cli";

/// User Agent string for outbound requests
pub const USER_AGENT: &str = concat!("setup-awscli/", env!("CARGO_PKG_VERSION"));
