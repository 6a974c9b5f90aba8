//! `stevedore build` command

use anyhow::Result;

use crate::cli::BuildArgs;
use stevedore::ops::build_extension;
use stevedore::util::Shell;

pub fn execute(args: BuildArgs, shell: &Shell) -> Result<()> {
    let (ext, opts) = super::build_inputs(args)?;

    build_extension(&ext, &opts, shell)?;

    Ok(())
}
