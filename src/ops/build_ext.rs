//! Implementation of `stevedore build` and `stevedore plan`.
//!
//! This is the packaging hook: given an extension and the staging
//! directories chosen by the packaging tool, probe the environment once,
//! derive the plan, then run the platform's build sequence.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::builder::executor::{BuildExecutor, CommandRunner, SystemRunner};
use crate::builder::plan::BuildPlan;
use crate::builder::strategy::{BuildSequence, BuildStrategy};
use crate::core::environment::{BuildEnvironment, ProcessEnv, ToolOverrides};
use crate::core::extension::{Extension, StagingPaths};
use crate::ops::purity::{package_purity, PackagePurity};
use crate::util::fs::absolute_path;
use crate::util::shell::{Shell, Status};

/// Options for building one extension.
#[derive(Debug, Clone)]
pub struct BuildExtOptions {
    /// Root of the CMake project
    pub source_dir: PathBuf,
    /// Directories supplied by the packaging tool
    pub staging: StagingPaths,
    /// Interpreter and CMake given on the command line
    pub tools: ToolOverrides,
}

impl BuildExtOptions {
    /// The source directory is made absolute: the make-based sequence
    /// configures from inside the build tree.
    pub fn new(source_dir: &Path, staging: StagingPaths) -> Self {
        BuildExtOptions {
            source_dir: absolute_path(source_dir),
            staging,
            tools: ToolOverrides::default(),
        }
    }

    pub fn with_tools(mut self, tools: ToolOverrides) -> Self {
        self.tools = tools;
        self
    }
}

/// Everything `stevedore plan` reports.
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub plan: BuildPlan,
    /// Absolute directory the install stage writes into
    pub install_prefix: PathBuf,
    /// Arguments passed to the configure step
    pub configure_args: Vec<String>,
    pub sequence: BuildSequence,
    pub purity: PackagePurity,
}

/// Build `ext` against the real process environment.
pub fn build_extension(ext: &Extension, opts: &BuildExtOptions, shell: &Shell) -> Result<BuildPlan> {
    let env = BuildEnvironment::capture(ext, &ProcessEnv, &opts.tools)?;
    let mut runner = SystemRunner;

    build_with(
        ext,
        &env,
        &opts.source_dir,
        &opts.staging,
        &mut runner,
        shell,
    )
}

/// Build `ext` from an already probed environment.
///
/// The plan is derived before anything touches the disk, so input errors
/// leave no trace. Artifacts from a failed run are left in place.
pub fn build_with<R: CommandRunner>(
    ext: &Extension,
    env: &BuildEnvironment,
    source_dir: &Path,
    staging: &StagingPaths,
    runner: &mut R,
    shell: &Shell,
) -> Result<BuildPlan> {
    let plan = BuildPlan::derive(ext, env, source_dir, staging)?;
    let sequence = BuildStrategy::for_host(plan.host).sequence(&plan, &env.cmake);

    staging.ensure()?;

    tracing::info!("build command is:\n{}", sequence.listing());

    BuildExecutor::new(runner, shell, ext).execute(&sequence)?;

    shell.status(
        Status::Staged,
        format!("`{}` -> {}", ext.name, plan.install_prefix().display()),
    );

    Ok(plan)
}

/// Derive the plan for `ext` without running anything.
pub fn plan_extension(ext: &Extension, opts: &BuildExtOptions) -> Result<PlanReport> {
    let env = BuildEnvironment::capture(ext, &ProcessEnv, &opts.tools)?;
    plan_with(ext, &env, &opts.source_dir, &opts.staging)
}

/// Derive the plan for `ext` from an already probed environment.
pub fn plan_with(
    ext: &Extension,
    env: &BuildEnvironment,
    source_dir: &Path,
    staging: &StagingPaths,
) -> Result<PlanReport> {
    let plan = BuildPlan::derive(ext, env, source_dir, staging)?;
    let sequence = BuildStrategy::for_host(plan.host).sequence(&plan, &env.cmake);

    Ok(PlanReport {
        install_prefix: plan.install_prefix(),
        configure_args: plan.configuration().to_args(),
        purity: package_purity(env.public_distribution, env.host),
        sequence,
        plan,
    })
}
