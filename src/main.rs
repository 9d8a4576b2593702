//! Metamob CLI - demo driver for the request manager
//!
//! Runs the standard batch against the live API: the archmonster
//! compendium, a server's kralamoure calendar, and one user's profile and
//! monster listing, then prints the resulting cache table.

use clap::Parser;
use log::warn;

use metamob::cli::Cli;
use metamob::manager::Manager;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut manager = Manager::new(cli.to_config());

    // Pre-flight the whole batch so a partially filled cache does not eat
    // half of it.
    if manager.can_handle(4) {
        println!("monsters       -> {}", manager.fetch_monsters().await?.code());
        println!("krala          -> {}", manager.fetch_krala(&cli.server).await?.code());
        println!(
            "user monsters  -> {}",
            manager.fetch_user_monsters(&cli.pseudo).await?.code()
        );
        println!("user           -> {}", manager.fetch_user(&cli.pseudo).await?.code());
    } else {
        warn!(
            "cache holds {} of {} requests, not enough room for the batch",
            manager.cached_len(),
            manager.capacity_limit()
        );
    }

    println!("{}", manager);

    Ok(())
}
