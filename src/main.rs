#![allow(clippy::doc_markdown)]

mod cli;
mod db;
mod tables;

use clap::{Parser, crate_version};
use touprice::prelude::*;

use crate::cli::Args;

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");
    Args::parse().run()?;
    info!("done!");
    Ok(())
}
