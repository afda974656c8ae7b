//! Locating and reading city trip files
//!
//! Each city's trips live in one CSV file inside the data directory, named
//! after the city (`chicago.csv`, `new_york_city.csv`, `washington.csv`).
//! The directory defaults to the working directory and can be set with
//! `--data-dir` or the `BIKESHARE_DATA_DIR` environment variable.
//!
//! # Examples
//!
//! ```no_run
//! use bikeshare::data_loader::DataLoader;
//! use bikeshare_core::City;
//!
//! # fn example() -> bikeshare_core::Result<()> {
//! let loader = DataLoader::new("data");
//! let trips = loader.load(City::Chicago)?;
//! println!("{} trips", trips.row_count());
//! # Ok(())
//! # }
//! ```

use bikeshare_core::{BikeshareError, City, Result, TabularDataset};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Reads the trip file of a city into a table
#[derive(Debug, Clone)]
pub struct DataLoader {
    data_dir: PathBuf,
    show_progress: bool,
}

impl DataLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            show_progress: false,
        }
    }

    /// Show a spinner while a file is parsed
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Where the city's trips are expected
    pub fn path_for(&self, city: City) -> PathBuf {
        self.data_dir.join(city.file_name())
    }

    /// Cities whose trip file is present in the data directory
    pub fn available_cities(&self) -> Vec<City> {
        City::ALL
            .into_iter()
            .filter(|city| self.path_for(*city).is_file())
            .collect()
    }

    /// Load the city's trip file
    ///
    /// # Errors
    ///
    /// * `NotFound` if the file does not exist
    /// * `Csv` or `Io` if it cannot be read or is malformed
    pub fn load(&self, city: City) -> Result<TabularDataset> {
        let path = self.path_for(city);
        info!("Loading trips for {} from {}", city, path.display());
        self.load_path(&path)
    }

    /// Load any trip file by path
    pub fn load_path(&self, path: &Path) -> Result<TabularDataset> {
        if !path.is_file() {
            return Err(BikeshareError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let progress = if self.show_progress {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} [{elapsed_precise}]")
            {
                pb.set_style(style);
            }
            pb.set_message(format!("Reading {}", path.display()));
            pb.enable_steady_tick(std::time::Duration::from_millis(100));
            Some(pb)
        } else {
            None
        };

        let started = Instant::now();
        let file = File::open(path)?;
        let table = TabularDataset::from_csv_reader(BufReader::new(file));

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        let table = table?;
        debug!(
            "Loaded {} rows from {} in {:.3}s",
            table.row_count(),
            path.display(),
            started.elapsed().as_secs_f64()
        );
        Ok(table)
    }
}
