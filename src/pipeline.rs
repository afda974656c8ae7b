//! Load, enrich, filter and summarize one city selection
//!
//! The stages are exposed separately so the interactive session can report
//! row counts and preview rows between them; [`Pipeline::run_once`] chains
//! them for batch use.

use crate::data_loader::DataLoader;
use bikeshare_core::{
    City, DatasetEnricher, EnrichedDataset, FilterSpec, Result, TabularDataset, TripFilter,
};
use bikeshare_stats::{StatResult, StatisticsEngine};
use bikeshare_terminal::StatisticsReport;
use tracing::{debug, info};

/// Everything produced by one run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub city: City,
    pub filter: FilterSpec,
    /// Rows in the file before filtering
    pub loaded_rows: usize,
    pub filtered: EnrichedDataset,
    pub results: Vec<StatResult>,
}

impl RunReport {
    pub fn filtered_rows(&self) -> usize {
        self.filtered.row_count()
    }

    /// View for the output formatters
    pub fn statistics(&self) -> StatisticsReport<'_> {
        StatisticsReport::new(self.city, self.filter, self.filtered_rows(), &self.results)
    }
}

/// The processing stages, wired together
#[derive(Debug, Clone)]
pub struct Pipeline {
    loader: DataLoader,
    enricher: DatasetEnricher,
    engine: StatisticsEngine,
}

impl Pipeline {
    pub fn new(loader: DataLoader) -> Self {
        Self {
            loader,
            enricher: DatasetEnricher::new(),
            engine: StatisticsEngine::new(),
        }
    }

    pub fn loader(&self) -> &DataLoader {
        &self.loader
    }

    pub fn load(&self, city: City) -> Result<TabularDataset> {
        self.loader.load(city)
    }

    /// Validate the schema, derive calendar columns and apply the filter
    pub fn prepare(&self, table: TabularDataset, filter: FilterSpec) -> Result<EnrichedDataset> {
        let enriched = self.enricher.enrich(table)?;
        let filtered = TripFilter::new(filter).apply(&enriched);
        debug!(
            "Filter kept {} of {} rows",
            filtered.row_count(),
            enriched.row_count()
        );
        Ok(filtered)
    }

    /// Compute the statistics battery
    pub fn summarize(&self, trips: &EnrichedDataset) -> Vec<StatResult> {
        let results = self.engine.run_all(trips);
        let failed = results.iter().filter(|r| r.is_failed()).count();
        info!(
            "Computed {} statistics over {} rows ({} failed)",
            results.len(),
            trips.row_count(),
            failed
        );
        results
    }

    /// All stages for one selection
    pub fn run_once(&self, city: City, filter: FilterSpec) -> Result<RunReport> {
        let table = self.load(city)?;
        let loaded_rows = table.row_count();
        let filtered = self.prepare(table, filter)?;
        let results = self.summarize(&filtered);
        Ok(RunReport {
            city,
            filter,
            loaded_rows,
            filtered,
            results,
        })
    }
}
