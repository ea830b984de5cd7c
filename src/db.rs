//! File-backed record store: one JSON document holding every collection.

use std::{
    fs,
    mem,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use touprice::{
    core::{
        composite::SavedCompositeResult,
        configuration::TimeConfiguration,
        grouping::ConfigurationReplacement,
        tariff::TariffRecord,
    },
    prelude::*,
};

/// Stored record addressable by its identifier.
pub trait Record {
    fn id(&self) -> &str;
}

impl Record for TariffRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for TimeConfiguration {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for SavedCompositeResult {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    #[serde(default)]
    tariffs: Vec<TariffRecord>,

    #[serde(default)]
    time_configurations: Vec<TimeConfiguration>,

    #[serde(default)]
    composite_results: Vec<SavedCompositeResult>,
}

#[must_use]
pub struct Db {
    path: PathBuf,
    document: Document,
}

impl Db {
    /// Read the store, a missing file is an empty store.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        let document = if path.is_file() {
            info!("reading the store…");
            serde_json::from_slice(&fs::read(path)?)
                .with_context(|| format!("failed to parse `{}`", path.display()))?
        } else {
            info!("the store does not exist yet, starting empty");
            Document::default()
        };
        Ok(Self { path: path.to_path_buf(), document })
    }

    /// Write all collections at once, replacing the file only when the write succeeded.
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn save(&self) -> Result {
        let temporary_path = self.path.with_extension("json.tmp");
        fs::write(&temporary_path, serde_json::to_vec_pretty(&self.document)?)
            .with_context(|| format!("failed to write `{}`", temporary_path.display()))?;
        fs::rename(&temporary_path, &self.path).context("failed to replace the store")?;
        info!("saved the store");
        Ok(())
    }

    pub fn tariffs(&self) -> &[TariffRecord] {
        &self.document.tariffs
    }

    pub fn tariffs_mut(&mut self) -> Collection<'_, TariffRecord> {
        Collection(&mut self.document.tariffs)
    }

    pub fn time_configurations(&self) -> &[TimeConfiguration] {
        &self.document.time_configurations
    }

    pub fn time_configurations_mut(&mut self) -> Collection<'_, TimeConfiguration> {
        Collection(&mut self.document.time_configurations)
    }

    pub fn composite_results(&self) -> &[SavedCompositeResult] {
        &self.document.composite_results
    }

    pub fn composite_results_mut(&mut self) -> Collection<'_, SavedCompositeResult> {
        Collection(&mut self.document.composite_results)
    }

    /// Drop the prior province configurations and store the new ones in one go.
    #[instrument(skip_all)]
    pub fn replace_configurations(&mut self, replacement: ConfigurationReplacement) {
        let mut configurations = self.time_configurations_mut();
        let n_removed = configurations.remove(&replacement.deletions);
        configurations.bulk_upsert(replacement.upserts);
        info!(n_removed, "replaced the configurations");
    }
}

/// Mutable view of a single collection.
pub struct Collection<'a, R>(&'a mut Vec<R>);

impl<R: Record> Collection<'_, R> {
    /// Insert or replace the record and return the replaced one.
    pub fn upsert(&mut self, record: R) -> Option<R> {
        if let Some(existing) = self.0.iter_mut().find(|existing| existing.id() == record.id()) {
            Some(mem::replace(existing, record))
        } else {
            self.0.push(record);
            None
        }
    }

    pub fn bulk_upsert(&mut self, records: impl IntoIterator<Item = R>) {
        for record in records {
            self.upsert(record);
        }
    }

    /// Remove the records with the identifiers and return how many were removed.
    pub fn remove(&mut self, ids: &[String]) -> usize {
        let n_records = self.0.len();
        self.0.retain(|record| !ids.iter().any(|id| id == record.id()));
        n_records - self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use touprice::core::{
        configuration::MonthPattern,
        label::TimePeriodLabel,
        rule::TimeRule,
        tariff::PriceSchema,
    };

    use super::*;

    fn configuration(province: &str) -> TimeConfiguration {
        TimeConfiguration::new(
            province,
            MonthPattern::All,
            vec![TimeRule::new("00:00", "00:00", TimePeriodLabel::Flat)],
        )
    }

    #[test]
    fn test_open_missing_file() -> Result {
        let directory = tempfile::tempdir()?;
        let db = Db::open(&directory.path().join("tariffs.json"))?;
        assert!(db.tariffs().is_empty());
        assert!(db.time_configurations().is_empty());
        assert!(db.composite_results().is_empty());
        Ok(())
    }

    #[test]
    fn test_save_and_reopen() -> Result {
        let directory = tempfile::tempdir()?;
        let path = directory.path().join("tariffs.json");

        let mut db = Db::open(&path)?;
        let record = TariffRecord::builder()
            .province("Hubei")
            .month("2024-01")
            .category("commercial")
            .voltage_level("<1kV")
            .prices(PriceSchema { flat: Some(0.6.into()), ..PriceSchema::default() })
            .time_rules(vec![TimeRule::new("00:00", "00:00", TimePeriodLabel::Flat)])
            .build();
        assert!(db.tariffs_mut().upsert(record.clone()).is_none());
        db.save()?;

        let db = Db::open(&path)?;
        assert_eq!(db.tariffs(), [record]);
        assert!(!path.with_extension("json.tmp").exists());
        Ok(())
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let mut records = Vec::new();
        let mut collection = Collection(&mut records);
        let mut first = configuration("Hubei");
        assert!(collection.upsert(first.clone()).is_none());

        first.province = "Hunan".to_owned();
        let replaced = collection.upsert(first.clone());
        assert_eq!(replaced.map(|it| it.province), Some("Hubei".to_owned()));
        assert_eq!(records, [first]);
    }

    #[test]
    fn test_replace_configurations() -> Result {
        let directory = tempfile::tempdir()?;
        let mut db = Db::open(&directory.path().join("tariffs.json"))?;
        let old = configuration("Hubei");
        let other = configuration("Hunan");
        db.time_configurations_mut().bulk_upsert([old.clone(), other.clone()]);

        let new = configuration("Hubei");
        db.replace_configurations(ConfigurationReplacement {
            upserts: vec![new.clone()],
            deletions: vec![old.id],
        });
        assert_eq!(db.time_configurations(), [other, new]);
        Ok(())
    }
}
