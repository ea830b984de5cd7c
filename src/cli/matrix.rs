use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use clap::{Parser, Subcommand};
use serde::Deserialize;
use touprice::{
    core::{
        configuration::{MONTHS, MonthCoverage, matrix_of},
        grid::DayGrid,
        grouping::ConfigurationReplacement,
    },
    prelude::*,
};

use crate::{
    cli::db::DbArgs,
    tables::{build_configurations_table, build_matrix_table},
};

#[derive(Parser)]
pub struct MatrixArgs {
    #[command(subcommand)]
    command: MatrixCommand,
}

impl MatrixArgs {
    pub fn run(self) -> Result {
        match self.command {
            MatrixCommand::Compile(args) => args.run(),
            MatrixCommand::Show(args) => args.run(),
        }
    }
}

#[derive(Subcommand)]
enum MatrixCommand {
    /// Group the monthly grids into time configurations and replace those of the province.
    Compile(CompileArgs),

    /// Print the matrix rebuilt from the stored time configurations.
    Show(ShowArgs),
}

#[derive(Parser)]
struct CompileArgs {
    #[clap(flatten)]
    db: DbArgs,

    #[clap(long, env = "TOUPRICE_PROVINCE")]
    province: String,

    /// TOML file with the `default` grid and the `[months]` grids keyed by month number.
    #[clap(long)]
    input: PathBuf,

    /// Only print the configurations, do not save them.
    #[clap(long)]
    dry_run: bool,
}

impl CompileArgs {
    #[instrument(skip_all, fields(province = %self.province))]
    fn run(self) -> Result {
        let grids = MatrixFile::read(&self.input)?.into_grids()?;
        let mut db = self.db.open()?;
        let replacement =
            ConfigurationReplacement::new(&self.province, db.time_configurations(), &grids)?;
        println!("{}", build_configurations_table(&replacement.upserts));
        if self.dry_run {
            info!("dry run, not saving");
            return Ok(());
        }
        db.replace_configurations(replacement);
        db.save()
    }
}

#[derive(Parser)]
struct ShowArgs {
    #[clap(flatten)]
    db: DbArgs,

    #[clap(long, env = "TOUPRICE_PROVINCE")]
    province: String,
}

impl ShowArgs {
    #[instrument(skip_all, fields(province = %self.province))]
    fn run(self) -> Result {
        let db = self.db.open()?;
        let configurations = db.time_configurations();
        let coverage = MonthCoverage::check(configurations, &self.province);
        if !coverage.is_partition() {
            warn!(
                overlapping = ?coverage.overlapping,
                missing = ?coverage.missing,
                "the month patterns do not partition the year",
            );
        }
        println!("{}", build_matrix_table(&matrix_of(configurations, &self.province)?));
        Ok(())
    }
}

/// Grids exported from the matrix editor.
#[derive(Deserialize)]
struct MatrixFile {
    /// Grid of the months absent from `months`.
    default: Option<DayGrid>,

    #[serde(default)]
    months: BTreeMap<String, DayGrid>,
}

impl MatrixFile {
    fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        toml::from_str(&text).with_context(|| format!("failed to parse `{}`", path.display()))
    }

    /// Grids of all twelve months.
    fn into_grids(self) -> Result<BTreeMap<u32, DayGrid>> {
        let mut grids = BTreeMap::new();
        for (key, grid) in self.months {
            let month: u32 = key.trim().parse().with_context(|| format!("invalid month `{key}`"))?;
            ensure!(MONTHS.contains(&month), "month {month} is outside of 1-12");
            grids.insert(month, grid);
        }
        for month in MONTHS {
            if !grids.contains_key(&month) {
                let grid = self
                    .default
                    .with_context(|| format!("month {month} has no grid and there is no default"))?;
                grids.insert(month, grid);
            }
        }
        Ok(grids)
    }
}
