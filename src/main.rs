// src/main.rs

use testrun::{cli, logging, run};

#[tokio::main]
async fn main() {
    let code = match run_main().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{}", err.diagnostic());
            err.exit_code()
        }
    };
    std::process::exit(code);
}

async fn run_main() -> testrun::errors::Result<i32> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await
}
