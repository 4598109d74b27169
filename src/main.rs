mod app;
mod config;

use clap::Parser;
use env_logger::Env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG still takes precedence over the default.
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let params = config::Params::parse();
    app::run(params)?;

    return Ok(());
}
