//! Shared argument resolution for the reference, issues and delta commands.

use anyhow::{anyhow, bail, Context as _, Result};

use crate::cli::args::SelectionArgs;
use crate::cli::Context;
use crate::core::config::Config;
use crate::core::types::{BuildNumber, ToolId};
use crate::history::{Build, BuildHistory};
use crate::reference::{ByIdResultSelector, ReferenceFinder, ReferencePolicy};

/// Fully resolved inputs of one reference lookup.
pub(super) struct Selection {
    pub history: BuildHistory,
    pub tool: ToolId,
    pub baseline: Option<BuildNumber>,
    pub policy: ReferencePolicy,
    pub json: bool,
}

impl Selection {
    /// Resolve CLI flags against configuration and load the history.
    ///
    /// CLI flags override configuration.
    pub fn resolve(ctx: &Context, args: &SelectionArgs) -> Result<Self> {
        let project_dir = ctx.project_dir()?;
        let config = Config::load(Some(&project_dir))
            .context("Failed to load configuration")?
            .config;

        let tool = args
            .tool
            .clone()
            .or_else(|| config.tool())
            .ok_or_else(|| anyhow!("No tool given; pass --tool or set 'tool' in the config"))?;
        let tool = ToolId::new(tool)?;

        let baseline = args
            .build
            .as_deref()
            .map(str::parse::<BuildNumber>)
            .transpose()?;

        let use_stable = if args.stable {
            true
        } else if args.previous {
            false
        } else {
            config.use_stable_build_as_reference()
        };
        let use_overall = if args.overall_success {
            true
        } else if args.no_overall_success {
            false
        } else {
            config.use_overall_result_as_reference()
        };
        let policy = ReferencePolicy::from_flags(use_stable, use_overall);

        let history_path = project_dir.join(ctx.history.clone().unwrap_or_else(|| config.history()));
        let history = BuildHistory::load(&history_path)
            .with_context(|| format!("Failed to load history from {}", history_path.display()))?;

        log::debug!(
            "tool {}, baseline {}, policy '{}'",
            tool,
            baseline.map_or_else(|| "latest".to_string(), |b| b.to_string()),
            policy
        );

        Ok(Self {
            history,
            tool,
            baseline,
            policy,
            json: args.json,
        })
    }

    /// The baseline build; `None` only for an empty history.
    pub fn baseline_build(&self) -> Result<Option<Build<'_>>> {
        match self.baseline {
            Some(number) => match self.history.build(number) {
                Some(build) => Ok(Some(build)),
                None => bail!("Build {} not found in '{}'", number, self.history.job()),
            },
            None => Ok(self.history.latest()),
        }
    }

    pub fn selector(&self) -> ByIdResultSelector {
        ByIdResultSelector::new(self.tool.clone())
    }

    /// A finder for the resolved baseline, tool and policy.
    pub fn finder(&self) -> Result<ReferenceFinder<'_, ByIdResultSelector>> {
        Ok(ReferenceFinder::new(
            self.baseline_build()?,
            Some(self.selector()),
            self.policy,
        ))
    }
}
