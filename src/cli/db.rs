use std::path::PathBuf;

use clap::Parser;
use touprice::prelude::*;

use crate::db::Db;

#[derive(Parser)]
pub struct DbArgs {
    /// JSON file with the tariffs, time configurations and saved composite results.
    #[clap(long = "store", env = "TOUPRICE_STORE", default_value = "tariffs.json")]
    path: PathBuf,
}

impl DbArgs {
    pub fn open(&self) -> Result<Db> {
        Db::open(&self.path)
    }
}
