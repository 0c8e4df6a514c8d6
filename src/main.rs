// src/main.rs

use taskcron::config::Settings;
use taskcron::{cli, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("taskcron error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    let settings = Settings::resolve(&args)?;
    let log_file = (!args.dry_run).then_some(settings.operational_log.as_path());
    logging::init_logging(args.log_level, log_file)?;
    run(args, settings).await
}
