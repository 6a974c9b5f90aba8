//! `stevedore plan` command
//!
//! Prints the derived plan as JSON. Nothing is created or run.

use anyhow::Result;

use crate::cli::BuildArgs;
use stevedore::ops::plan_extension;

pub fn execute(args: BuildArgs) -> Result<()> {
    let (ext, opts) = super::build_inputs(args)?;

    let report = plan_extension(&ext, &opts)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
