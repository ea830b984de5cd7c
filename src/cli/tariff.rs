use clap::{Parser, Subcommand};
use itertools::Itertools;
use touprice::{
    core::{
        configuration::{MonthCoverage, configuration_for_month},
        tariff::{PriceSchema, TariffRecord, month_of_year},
    },
    prelude::*,
    quantity::rate::KilowattHourRate,
};

use crate::{cli::db::DbArgs, tables::build_tariffs_table};

#[derive(Parser)]
pub struct TariffArgs {
    #[command(subcommand)]
    command: TariffCommand,
}

impl TariffArgs {
    pub fn run(self) -> Result {
        match self.command {
            TariffCommand::Add(args) => args.run(),
            TariffCommand::List(args) => args.run(),
        }
    }
}

#[derive(Subcommand)]
enum TariffCommand {
    /// Add or replace a tariff, copying the time rules of the matching configuration.
    Add(AddArgs),

    /// List the stored tariffs.
    List(ListArgs),
}

#[derive(Parser)]
struct AddArgs {
    #[clap(flatten)]
    db: DbArgs,

    #[clap(long, env = "TOUPRICE_PROVINCE")]
    province: String,

    /// Month in `YYYY-MM` format.
    #[clap(long)]
    month: String,

    #[clap(long)]
    category: String,

    #[clap(long)]
    voltage_level: String,

    #[clap(flatten)]
    prices: PriceArgs,
}

/// Unit prices per kilowatt-hour, omitted ones are charged at zero.
#[derive(Copy, Clone, Parser)]
struct PriceArgs {
    /// Critical peak price.
    #[clap(long = "tip")]
    tip: Option<KilowattHourRate>,

    #[clap(long = "peak")]
    peak: Option<KilowattHourRate>,

    #[clap(long = "flat")]
    flat: Option<KilowattHourRate>,

    #[clap(long = "valley")]
    valley: Option<KilowattHourRate>,

    /// Deep valley price.
    #[clap(long = "deep")]
    deep: Option<KilowattHourRate>,
}

impl From<PriceArgs> for PriceSchema {
    fn from(args: PriceArgs) -> Self {
        Self {
            tip: args.tip,
            peak: args.peak,
            flat: args.flat,
            valley: args.valley,
            deep: args.deep,
        }
    }
}

impl AddArgs {
    #[instrument(skip_all, fields(province = %self.province, month = %self.month))]
    fn run(self) -> Result {
        let mut db = self.db.open()?;
        let month = month_of_year(&self.month)?;

        let coverage = MonthCoverage::check(db.time_configurations(), &self.province);
        if coverage.overlapping.contains(&month) {
            warn!(month, "several configurations apply to the month, taking the first one");
        }
        let time_rules = configuration_for_month(db.time_configurations(), &self.province, month)
            .with_context(|| {
                format!("no time configuration of `{}` applies to month {month}", self.province)
            })?
            .time_rules
            .clone();

        let existing_id = db
            .tariffs()
            .iter()
            .find(|record| {
                record.matches(&self.province, &self.category, &self.voltage_level, &self.month)
            })
            .map(|record| record.id.clone());
        let record = TariffRecord::builder()
            .maybe_id(existing_id)
            .province(self.province)
            .month(self.month)
            .category(self.category)
            .voltage_level(self.voltage_level)
            .prices(self.prices.into())
            .time_rules(time_rules)
            .build();
        record.validate()?;

        println!("{}", build_tariffs_table([&record]));
        if db.tariffs_mut().upsert(record).is_some() {
            info!("replaced the existing tariff");
        }
        db.save()
    }
}

#[derive(Parser)]
struct ListArgs {
    #[clap(flatten)]
    db: DbArgs,

    /// Only list the tariffs of the province.
    #[clap(long, env = "TOUPRICE_PROVINCE")]
    province: Option<String>,
}

impl ListArgs {
    fn run(self) -> Result {
        let db = self.db.open()?;
        let tariffs = db
            .tariffs()
            .iter()
            .filter(|record| {
                self.province.as_ref().is_none_or(|province| &record.province == province)
            })
            .sorted_by(|lhs, rhs| (&lhs.province, &lhs.month).cmp(&(&rhs.province, &rhs.month)))
            .collect_vec();
        info!(n_tariffs = tariffs.len(), "found tariffs");
        println!("{}", build_tariffs_table(tariffs));
        Ok(())
    }
}
