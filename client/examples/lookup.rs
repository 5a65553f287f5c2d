//! Look up Pokemon and moves from the command line.
//!
//! Usage:
//!   cargo run --example lookup -- [--verbose] id 6
//!   cargo run --example lookup -- name charizard-mega-x
//!   cargo run --example lookup -- move flamethrower
//!   cargo run --example lookup -- search char
//!
//! Configuration comes from the DEXCACHE_* environment variables.

use std::env;
use std::process;

use anyhow::{Context, Result};
use dexcache::{Matches, parse_id};
use dexcache_client::{Config, connect};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn usage() -> ! {
    eprintln!("Usage: lookup [--verbose] <id|name|move|search> <value>");
    process::exit(2);
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().skip(1).collect();
    let verbose = args.iter().any(|arg| arg == "--verbose" || arg == "-v");
    args.retain(|arg| arg != "--verbose" && arg != "-v");

    FmtSubscriber::builder()
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .compact()
        .init();

    let [command, value] = args.as_slice() else {
        usage();
    };

    let config = Config::from_env().context("Invalid DEXCACHE_* configuration")?;
    let cache = connect(config).await?;

    match command.as_str() {
        "id" => {
            let reply = cache.query_by_id(parse_id(value)?).await?;
            println!("{}", reply);
        }
        "name" => {
            let reply = cache.query_by_name(value).await?;
            println!("{}", reply);
        }
        "move" => {
            let reply = cache.query_move_by_name(value).await?;
            println!("{}", reply);
        }
        "search" => match Matches::from(cache.fuzzy_search(value).await?) {
            Matches::None => println!("No Pokemon matches '{}'.", value),
            Matches::One(key) => println!("{}", cache.query_by_name(&key).await?),
            Matches::Many(keys) => {
                println!("{} matches:", keys.len());
                for key in keys {
                    println!("  {}", key);
                }
            }
        },
        _ => usage(),
    }

    Ok(())
}
