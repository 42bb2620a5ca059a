use std::process::exit;

use build::{Build, ProcessInvoker};
use env_logger::Env;
use log::error;
use opt::Opt;
use structopt::StructOpt;

mod opt;

fn main() -> eyre::Result<()> {
    stable_eyre::install()?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let opt = Opt::from_args();
    let config = opt.to_config()?;
    let report = Build::new(&config, &ProcessInvoker)
        .dry_run(opt.dry_run)
        .run()?;
    if !report.is_success() {
        for (path, error) in report.failures() {
            error!("{}: {}", path.display(), error);
        }
        error!("{} of {} files failed", report.failed(), report.entries().len());
        exit(1);
    }
    Ok(())
}
