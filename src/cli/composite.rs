use clap::Parser;
use touprice::{
    core::composite::{CompositeCalculator, SavedCompositeResult},
    prelude::*,
};

use crate::{cli::db::DbArgs, tables::build_composite_table};

#[derive(Parser)]
pub struct CompositeArgs {
    #[clap(flatten)]
    db: DbArgs,

    #[clap(long, env = "TOUPRICE_PROVINCE")]
    province: String,

    #[clap(long)]
    category: String,

    #[clap(long)]
    voltage_level: String,

    /// Months in `YYYY-MM` format.
    #[clap(long = "month", value_delimiter = ',', num_args = 1..)]
    months: Vec<String>,

    /// Start of the daily window, `HH:MM`.
    #[clap(long = "start")]
    start_time: String,

    /// End of the daily window, `HH:MM`, exclusive. Earlier than the start wraps around midnight.
    #[clap(long = "end")]
    end_time: String,

    /// Keep the result in the store.
    #[clap(long)]
    save: bool,
}

impl CompositeArgs {
    #[instrument(skip_all, fields(province = %self.province))]
    pub fn run(self) -> Result {
        let mut db = self.db.open()?;
        let calculator = CompositeCalculator::builder()
            .tariffs(db.tariffs())
            .province(&self.province)
            .category(&self.category)
            .voltage_level(&self.voltage_level)
            .months(&self.months)
            .start_time(&self.start_time)
            .end_time(&self.end_time)
            .build();
        let summary = calculator.calculate().context("failed to calculate the composite price")?;
        println!("{}", build_composite_table(&summary));

        let Some(overall_avg_price) = summary.overall_avg_price else {
            warn!("no data: none of the selected months has a tariff that intersects the window");
            return Ok(());
        };
        println!("Overall: {overall_avg_price} over {:.2} h", summary.total_hours());

        if self.save {
            let saved = SavedCompositeResult::from_summary(&calculator, &summary)
                .context("the summary has no data to save")?;
            info!(id = %saved.id, "saving the composite result…");
            db.composite_results_mut().upsert(saved);
            info!(n_saved = db.composite_results().len(), "saved");
            db.save()?;
        }
        Ok(())
    }
}
