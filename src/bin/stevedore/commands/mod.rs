//! Command implementations

pub mod build;
pub mod completions;
pub mod plan;
pub mod purity;

use std::path::Path;

use anyhow::Result;

use crate::cli::BuildArgs;
use stevedore::core::environment::ToolOverrides;
use stevedore::core::extension::{Extension, StagingPaths};
use stevedore::ops::BuildExtOptions;
use stevedore::util::config::Manifest;

/// Load the extension described by the manifest in `source`.
pub fn load_extension(source: &Path) -> Result<Extension> {
    let manifest = Manifest::find_in(source)?;
    Ok(Extension::from_config(&manifest.extension))
}

/// Extension and build options for `build` and `plan`.
pub fn build_inputs(args: BuildArgs) -> Result<(Extension, BuildExtOptions)> {
    let ext = load_extension(&args.source)?;

    let opts = BuildExtOptions::new(&args.source, StagingPaths::new(args.build_temp, args.build_lib))
        .with_tools(ToolOverrides {
            python: args.python,
            cmake: args.cmake,
        });

    Ok((ext, opts))
}
