mod composite;
mod db;
mod matrix;
mod tariff;

use clap::{Parser, Subcommand};
use touprice::prelude::*;

use crate::cli::{composite::CompositeArgs, matrix::MatrixArgs, tariff::TariffArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn run(self) -> Result {
        match self.command {
            Command::Matrix(args) => args.run(),
            Command::Tariff(args) => args.run(),
            Command::Composite(args) => args.run(),
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Compile and inspect the month-by-hour time period matrix of a province.
    #[clap(name = "matrix")]
    Matrix(Box<MatrixArgs>),

    /// Manage the tariff records.
    #[clap(name = "tariff")]
    Tariff(Box<TariffArgs>),

    /// Average price of a daily time window over the selected months.
    #[clap(name = "composite")]
    Composite(Box<CompositeArgs>),
}
