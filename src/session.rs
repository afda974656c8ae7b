//! The interactive question-and-answer loop
//!
//! One round asks for a selection, loads and filters the city file, offers a
//! paged preview of the raw rows, prints the statistics and finally asks
//! whether to start another round. Problems with the data file end the round
//! but not the session.

use crate::pipeline::Pipeline;
use bikeshare_core::{BikeshareError, City, FilterSpec, MonthChoice, Result, WeekdayChoice};
use bikeshare_terminal::{OutputFormatter, Prompter, RowPager, StatisticsReport};
use std::io::{BufRead, Write};
use tracing::{info, warn};

/// Settings that stay fixed across rounds
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// Month to use instead of asking
    pub month: Option<MonthChoice>,
    /// Weekday to use instead of asking
    pub weekday: Option<WeekdayChoice>,
    pub page_size: usize,
    pub preview: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            month: None,
            weekday: None,
            page_size: bikeshare_terminal::DEFAULT_PAGE_SIZE,
            preview: true,
        }
    }
}

/// Drives rounds until the user declines another one
pub struct Session<'a, R, W> {
    pipeline: &'a Pipeline,
    formatter: &'a dyn OutputFormatter,
    prompter: Prompter<R, W>,
    options: SessionOptions,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(
        pipeline: &'a Pipeline,
        formatter: &'a dyn OutputFormatter,
        prompter: Prompter<R, W>,
        options: SessionOptions,
    ) -> Self {
        Self {
            pipeline,
            formatter,
            prompter,
            options,
        }
    }

    pub fn into_prompter(self) -> Prompter<R, W> {
        self.prompter
    }

    /// Run rounds until the user is done
    ///
    /// Data problems are shown and lead to the "another calculation" question.
    /// Only I/O failures on the prompt itself end the session with an error.
    pub fn run(&mut self) -> Result<()> {
        let mut rounds = 0usize;
        loop {
            rounds += 1;
            info!("Starting round {}", rounds);

            match self.round() {
                Ok(()) => {}
                Err(e) if is_recoverable(&e) => {
                    warn!("Round {} ended early: {}", rounds, e);
                    self.prompter.say(&e.to_string())?;
                }
                Err(e) => return Err(e),
            }

            if !self.prompter.confirm("\nWould you like to do another calculation?")? {
                break;
            }
        }
        info!("Session finished after {} rounds", rounds);
        Ok(())
    }

    fn ask_selection(&mut self) -> Result<(City, FilterSpec)> {
        let city = self.prompter.ask_city()?;
        let month = match self.options.month {
            Some(month) => month,
            None => self.prompter.ask_month()?,
        };
        let weekday = match self.options.weekday {
            Some(weekday) => weekday,
            None => self.prompter.ask_weekday()?,
        };
        Ok((city, FilterSpec::new().with_month(month).with_weekday(weekday)))
    }

    fn round(&mut self) -> Result<()> {
        let (city, filter) = self.ask_selection()?;
        self.prompter.say(&format!("\nSelected city: {city} | {filter}"))?;

        let table = self.pipeline.load(city)?;
        self.prompter.say(&format!("Loaded {} records", table.row_count()))?;

        let trips = self.pipeline.prepare(table, filter)?;
        self.prompter
            .say(&format!("{} records match the filter", trips.row_count()))?;

        if self.options.preview {
            self.preview(&trips)?;
        }

        let results = self.pipeline.summarize(&trips);
        let report = StatisticsReport::new(city, filter, trips.row_count(), &results);
        self.prompter.say(&self.formatter.format_statistics(&report))?;
        Ok(())
    }

    fn preview(&mut self, trips: &bikeshare_core::TabularDataset) -> Result<()> {
        let mut pager = RowPager::new(trips, self.options.page_size);
        while !pager.is_exhausted() {
            let question = format!("Display up to {} next rows?", pager.next_page_len());
            if !self.prompter.confirm(&question)? {
                return Ok(());
            }
            if let Some(page) = pager.next_page() {
                self.prompter.say(&self.formatter.format_preview(&page))?;
            }
        }
        self.prompter.say("no more rows to preview")
    }
}

/// Errors that end a round but not the session
pub fn is_recoverable(error: &BikeshareError) -> bool {
    matches!(
        error,
        BikeshareError::NotFound { .. }
            | BikeshareError::Schema { .. }
            | BikeshareError::Parse { .. }
            | BikeshareError::Csv(_)
            | BikeshareError::InvalidData(_)
    )
}
