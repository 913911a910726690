//! Storage for finalized user activity statistics.
//!
//! Writes the five artifacts consumed by downstream simulations as JSON
//! files in a statistics directory, and reads them back.
//!
//! # Artifacts
//!
//! | file | key | value |
//! |---|---|---|
//! | `user_ids.json` | user ID | first-pass action count |
//! | `object_ids.json` | object ID | first-pass action count |
//! | `user_action_rate.json` | active user ID | [`HourlyActionRate`] |
//! | `user_object_preference.json` | profiled user ID | [`ObjectPreference`] |
//! | `user_type_distribution.json` | active user ID | [`TypeDistribution`] |
//!
//! The three tables also hold [`SENTINEL_USER`], the entry for a user never
//! seen in the log. Object preference has no population fallback, so its
//! sentinel entry is an empty preference.
//!
//! Maps are written with sorted keys so that identical statistics produce
//! identical files.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use ua_core::{
    AnalysisError, HourlyActionRate, ObjectPreference, SENTINEL_USER, Statistics, TypeDistribution,
};

pub const USER_IDS_FILE: &str = "user_ids.json";
pub const OBJECT_IDS_FILE: &str = "object_ids.json";
pub const USER_ACTION_RATE_FILE: &str = "user_action_rate.json";
pub const USER_OBJECT_PREFERENCE_FILE: &str = "user_object_preference.json";
pub const USER_TYPE_DISTRIBUTION_FILE: &str = "user_type_distribution.json";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing an artifact failed.
    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// An artifact could not be encoded or decoded.
    #[error("invalid JSON in {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Statistics could not be queried while building a table.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Entry counts of a written statistics directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreSummary {
    pub users: usize,
    pub objects: usize,
    pub action_rates: usize,
    pub object_preferences: usize,
    pub type_distributions: usize,
}

/// A directory of statistics artifacts.
#[derive(Debug, Clone)]
pub struct StatsStore {
    dir: PathBuf,
}

impl StatsStore {
    /// Opens a statistics directory, creating it if necessary.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes all five artifacts.
    pub fn write_statistics(&self, stats: &Statistics) -> Result<StoreSummary, StoreError> {
        let users = id_counts(stats.user_ids());
        let objects = id_counts(stats.object_ids());
        let action_rates = action_rate_table(stats);
        let object_preferences = object_preference_table(stats)?;
        let type_distributions = type_distribution_table(stats);

        self.write(USER_IDS_FILE, &users)?;
        self.write(OBJECT_IDS_FILE, &objects)?;
        self.write(USER_ACTION_RATE_FILE, &action_rates)?;
        self.write(USER_OBJECT_PREFERENCE_FILE, &object_preferences)?;
        self.write(USER_TYPE_DISTRIBUTION_FILE, &type_distributions)?;

        let summary = StoreSummary {
            users: users.len(),
            objects: objects.len(),
            action_rates: action_rates.len(),
            object_preferences: object_preferences.len(),
            type_distributions: type_distributions.len(),
        };
        tracing::info!(dir = %self.dir.display(), ?summary, "wrote statistics");
        Ok(summary)
    }

    pub fn read_user_ids(&self) -> Result<BTreeMap<String, u64>, StoreError> {
        self.read(USER_IDS_FILE)
    }

    pub fn read_object_ids(&self) -> Result<BTreeMap<String, u64>, StoreError> {
        self.read(OBJECT_IDS_FILE)
    }

    pub fn read_action_rates(&self) -> Result<BTreeMap<String, HourlyActionRate>, StoreError> {
        self.read(USER_ACTION_RATE_FILE)
    }

    pub fn read_object_preferences(
        &self,
    ) -> Result<BTreeMap<String, ObjectPreference>, StoreError> {
        self.read(USER_OBJECT_PREFERENCE_FILE)
    }

    pub fn read_type_distributions(
        &self,
    ) -> Result<BTreeMap<String, TypeDistribution>, StoreError> {
        self.read(USER_TYPE_DISTRIBUTION_FILE)
    }

    fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StoreError> {
        let path = self.dir.join(name);
        let io_error = |source| StoreError::Io {
            path: path.clone(),
            source,
        };

        let file = File::create(&path).map_err(io_error)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        writer.write_all(b"\n").map_err(io_error)?;
        writer.flush().map_err(io_error)?;
        Ok(())
    }

    fn read<T: DeserializeOwned>(&self, name: &str) -> Result<T, StoreError> {
        let path = self.dir.join(name);
        let file = File::open(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|source| StoreError::Json { path, source })
    }
}

fn id_counts<'a>(ids: impl Iterator<Item = (&'a str, u64)>) -> BTreeMap<String, u64> {
    ids.map(|(id, count)| (id.to_string(), count)).collect()
}

/// Active users with their own profile, plus the sentinel.
fn action_rate_table(stats: &Statistics) -> BTreeMap<String, HourlyActionRate> {
    let mut table: BTreeMap<_, _> = stats
        .profiled_users()
        .filter(|user| stats.is_active(user))
        .map(|user| (user.to_string(), stats.hourly_action_rate(user)))
        .collect();
    table.insert(
        SENTINEL_USER.to_string(),
        stats.hourly_action_rate(SENTINEL_USER),
    );
    table
}

/// Users with their own profile, plus an empty sentinel entry.
fn object_preference_table(
    stats: &Statistics,
) -> Result<BTreeMap<String, ObjectPreference>, StoreError> {
    let mut table = BTreeMap::new();
    for user in stats.profiled_users() {
        table.insert(user.to_string(), stats.object_preference(user)?);
    }
    table.insert(
        SENTINEL_USER.to_string(),
        ObjectPreference::empty(SENTINEL_USER),
    );
    Ok(table)
}

/// Active users with their own profile, plus the sentinel.
fn type_distribution_table(stats: &Statistics) -> BTreeMap<String, TypeDistribution> {
    let mut table: BTreeMap<_, _> = stats
        .profiled_users()
        .filter(|user| stats.is_active(user))
        .map(|user| (user.to_string(), stats.type_distribution(user)))
        .collect();
    table.insert(
        SENTINEL_USER.to_string(),
        stats.type_distribution(SENTINEL_USER),
    );
    table
}
