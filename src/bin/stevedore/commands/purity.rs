//! `stevedore purity` command

use anyhow::Result;

use crate::cli::PurityArgs;
use stevedore::core::environment::ProcessEnv;
use stevedore::ops::purity_for;

pub fn execute(args: PurityArgs) -> Result<()> {
    let ext = super::load_extension(&args.source)?;

    println!("{}", purity_for(&ext, &ProcessEnv));

    Ok(())
}
