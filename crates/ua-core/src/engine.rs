//! The two-pass analysis.
//!
//! 1. First pass: discover users and objects, count their actions, and
//!    accumulate the population hourly/type counts.
//! 2. Classify every discovered user into a [`Tier`].
//! 3. Second pass: accumulate per-user hourly/type counts (inactive users
//!    feed the inactive cluster instead) and per-user object touches.
//! 4. Normalize everything into a read-only [`Statistics`].
//!
//! The log must not change between the passes. A second pass that meets an
//! identifier the first pass did not see, or a different number of
//! recognized events, fails with [`AnalysisError::LogChanged`].

use crate::distribution::DistributionAccumulator;
use crate::error::{AggregateKind, AnalysisError};
use crate::event::EventRecord;
use crate::identity::IdTable;
use crate::normalize::{AggregateProfile, Normalized, normalize_touches};
use crate::preference::ObjectPreferenceTracker;
use crate::reader::{EventLogReader, ScanError};
use crate::statistics::{ScanReport, Statistics};
use crate::tier::{Tier, classify};
use crate::types::AnalysisSettings;

/// Runs both passes over the log and returns the finalized statistics.
pub fn analyze(
    reader: &EventLogReader,
    settings: &AnalysisSettings,
) -> Result<Statistics, AnalysisError> {
    let mut session = AnalysisSession::new(reader, settings);
    session.first_pass()?;
    session.classify_users();
    session.second_pass()?;
    session.finalize()
}

/// Mutable state of one analysis run.
struct AnalysisSession<'a> {
    reader: &'a EventLogReader,
    settings: &'a AnalysisSettings,
    users: IdTable,
    objects: IdTable,
    tiers: Vec<Tier>,
    distributions: DistributionAccumulator,
    preferences: ObjectPreferenceTracker,
    report: ScanReport,
}

impl<'a> AnalysisSession<'a> {
    fn new(reader: &'a EventLogReader, settings: &'a AnalysisSettings) -> Self {
        Self {
            reader,
            settings,
            users: IdTable::new(),
            objects: IdTable::new(),
            tiers: Vec::new(),
            distributions: DistributionAccumulator::new(),
            preferences: ObjectPreferenceTracker::new(),
            report: ScanReport::default(),
        }
    }

    fn first_pass(&mut self) -> Result<(), AnalysisError> {
        tracing::info!(path = %self.reader.path().display(), "starting first pass");

        let mut scan = self.reader.scan()?;
        let mut malformed = 0;
        for outcome in scan.by_ref() {
            let Some(event) = self.accept(outcome, &mut malformed)? else {
                continue;
            };
            self.objects.record(&event.object_id);
            self.users.record(&event.user_id);
            self.distributions.record_population(&event);
        }

        let counts = scan.counts();
        self.report.lines_read = counts.lines_read;
        self.report.recognized_events = counts.recognized;
        self.report.unrecognized_lines = counts.unrecognized;
        self.report.malformed_lines = malformed;

        if malformed > 0 {
            tracing::warn!(malformed, "skipped malformed lines");
        }
        tracing::info!(
            users = self.users.len(),
            objects = self.objects.len(),
            events = counts.recognized,
            "first pass complete"
        );
        Ok(())
    }

    fn classify_users(&mut self) {
        let thresholds = &self.settings.thresholds;
        self.tiers = (0..self.users.len())
            .map(|idx| classify(self.users.count(idx), thresholds))
            .collect();

        let inactive = self.tiers.iter().filter(|t| **t == Tier::Inactive).count();
        let active = self.tiers.iter().filter(|t| **t == Tier::Active).count();
        tracing::debug!(
            active,
            inactive,
            regular = self.tiers.len() - active - inactive,
            "classified users"
        );
    }

    fn second_pass(&mut self) -> Result<(), AnalysisError> {
        tracing::info!("starting second pass");

        let mut scan = self.reader.scan()?;
        let mut malformed = 0;
        for outcome in scan.by_ref() {
            let Some(event) = self.accept(outcome, &mut malformed)? else {
                continue;
            };
            let user_idx = self.users.index_of(&event.user_id).ok_or_else(|| {
                AnalysisError::LogChanged(format!("unknown user {}", event.user_id))
            })?;
            let object_idx = self.objects.index_of(&event.object_id).ok_or_else(|| {
                AnalysisError::LogChanged(format!("unknown object {}", event.object_id))
            })?;

            if self.tiers[user_idx] == Tier::Inactive {
                self.distributions.record_inactive(&event);
            } else {
                self.distributions.record_user(user_idx, &event);
            }
            self.preferences.record(user_idx, object_idx);
        }

        let recognized = scan.counts().recognized;
        if recognized != self.report.recognized_events {
            return Err(AnalysisError::LogChanged(format!(
                "first pass saw {} recognized events, second pass saw {recognized}",
                self.report.recognized_events
            )));
        }

        tracing::info!(
            tracked_users = self.distributions.users().count(),
            inactive_events = self.distributions.inactive().total(),
            "second pass complete"
        );
        Ok(())
    }

    /// Applies the malformed-line policy to one scan outcome.
    fn accept(
        &self,
        outcome: Result<EventRecord, ScanError>,
        malformed: &mut usize,
    ) -> Result<Option<EventRecord>, AnalysisError> {
        match outcome {
            Ok(event) => Ok(Some(event)),
            Err(ScanError::Io(source)) => Err(self.reader.resource_error(source)),
            Err(ScanError::Format { line, issue }) if self.settings.fail_fast => {
                Err(AnalysisError::Format { line, issue })
            }
            Err(ScanError::Format { line, issue }) => {
                tracing::debug!(line, %issue, "skipping malformed line");
                *malformed += 1;
                Ok(None)
            }
        }
    }

    fn finalize(mut self) -> Result<Statistics, AnalysisError> {
        let general = AggregateProfile::from_counts(self.distributions.population());
        // The cluster is divided by its members' first-pass total.
        let inactive_total = self
            .tiers
            .iter()
            .enumerate()
            .filter(|(_, tier)| **tier == Tier::Inactive)
            .map(|(idx, _)| self.users.count(idx))
            .sum();
        let inactive = AggregateProfile::with_total(self.distributions.inactive(), inactive_total);

        for (kind, profile) in [
            (AggregateKind::General, &general),
            (AggregateKind::Inactive, &inactive),
        ] {
            if !profile.is_undefined() {
                continue;
            }
            if self.settings.strict_aggregates {
                return Err(AnalysisError::EmptyAggregate(kind));
            }
            tracing::warn!(aggregate = %kind, "aggregate has no actions, leaving it undefined");
            self.report.undefined_aggregates.push(kind);
        }

        // Per-user aggregates are divided by the first-pass count, which is
        // at least one for every discovered user.
        let mut user_profiles = vec![None; self.users.len()];
        for (idx, counts) in self.distributions.users() {
            user_profiles[idx] = Some(AggregateProfile::with_total(counts, self.users.count(idx)));
        }

        let mut user_preferences = vec![None; self.users.len()];
        for (idx, touches) in self.preferences.users() {
            if let Normalized::Defined(preference) = normalize_touches(touches, self.users.count(idx))
            {
                user_preferences[idx] = Some(preference);
            }
        }

        Ok(Statistics {
            thresholds: self.settings.thresholds,
            users: self.users,
            objects: self.objects,
            tiers: self.tiers,
            general,
            inactive,
            user_profiles,
            user_preferences,
            report: self.report,
        })
    }
}
