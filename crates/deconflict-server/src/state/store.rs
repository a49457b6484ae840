//! In-memory state store.
//!
//! The engine sits behind a read/write lock: registrations take the write
//! side, checks the read side, so a check never sees a half-applied
//! registration while independent checks still run in parallel.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use deconflict_core::{
    sample_count, CheckResult, ConflictEngine, Mission, MissionRequest, ValidationError,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::config::Config;

/// A completed check, kept for later retrieval by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRecord {
    pub check_id: String,
    pub mission_id: String,
    pub checked_at: DateTime<Utc>,
    pub time_step: f64,
    pub safety_radius: f64,
    /// Traffic registered when the check ran
    pub traffic_count: usize,
    pub result: CheckResult,
}

/// Outcome of a successful traffic registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredTraffic {
    pub mission_id: String,
    pub traffic_count: usize,
}

struct StoredCheck {
    sequence: u64,
    record: CheckRecord,
}

/// Application state shared by all handlers.
pub struct AppState {
    engine: RwLock<ConflictEngine>,
    checks: DashMap<String, StoredCheck>,
    check_counter: AtomicU64,
    config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, ValidationError> {
        let engine = ConflictEngine::new(config.engine_config())?;
        Ok(Self {
            engine: RwLock::new(engine),
            checks: DashMap::new(),
            check_counter: AtomicU64::new(0),
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn engine_read(&self) -> RwLockReadGuard<'_, ConflictEngine> {
        self.engine.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn engine_write(&self) -> RwLockWriteGuard<'_, ConflictEngine> {
        self.engine.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validate and register a traffic mission.
    pub fn register_traffic(
        &self,
        request: MissionRequest,
    ) -> Result<RegisteredTraffic, ValidationError> {
        let mission = Mission::try_from(request)?;
        let mission_id = mission.id().to_string();

        let mut engine = self.engine_write();
        engine.register_traffic(mission);
        let traffic_count = engine.traffic_count();
        drop(engine);

        tracing::info!("Registered traffic {} ({} total)", mission_id, traffic_count);
        Ok(RegisteredTraffic {
            mission_id,
            traffic_count,
        })
    }

    /// Registered traffic in registration order, trajectories included.
    pub fn traffic(&self) -> Vec<Mission> {
        self.engine_read().traffic().to_vec()
    }

    pub fn traffic_count(&self) -> usize {
        self.engine_read().traffic_count()
    }

    /// Check a primary mission and store the outcome.
    pub fn check_mission(
        &self,
        request: MissionRequest,
        time_step: Option<f64>,
    ) -> Result<CheckRecord, ValidationError> {
        let primary = Mission::try_from(request)?;
        let time_step = time_step.unwrap_or(self.config.default_time_step_s);

        let requested = sample_count(primary.t_start(), primary.t_end(), time_step);
        if requested > self.config.max_samples_per_check {
            return Err(ValidationError::TooManySamples {
                requested,
                limit: self.config.max_samples_per_check,
            });
        }

        let (result, safety_radius, traffic_count) = {
            let engine = self.engine_read();
            let result = engine.check_mission(&primary, time_step)?;
            (result, engine.safety_radius(), engine.traffic_count())
        };

        if !result.is_clear() {
            tracing::warn!(
                "Mission {} conflicts with {:?} ({} sample(s))",
                primary.id(),
                result.conflicting_ids(),
                result.details.len()
            );
        }

        let record = CheckRecord {
            check_id: Uuid::new_v4().to_string(),
            mission_id: primary.id().to_string(),
            checked_at: Utc::now(),
            time_step,
            safety_radius,
            traffic_count,
            result,
        };
        self.store_check(record.clone());
        Ok(record)
    }

    fn store_check(&self, record: CheckRecord) {
        let sequence = self.check_counter.fetch_add(1, Ordering::SeqCst);
        self.checks
            .insert(record.check_id.clone(), StoredCheck { sequence, record });

        // The record just stored always survives so its id can be fetched.
        let capacity = self.config.max_check_history.max(1);
        while self.checks.len() > capacity {
            let oldest = self
                .checks
                .iter()
                .min_by_key(|entry| entry.value().sequence)
                .map(|entry| entry.key().clone());
            match oldest {
                Some(key) => {
                    self.checks.remove(&key);
                }
                None => break,
            }
        }
    }

    pub fn get_check(&self, check_id: &str) -> Option<CheckRecord> {
        self.checks.get(check_id).map(|r| r.value().record.clone())
    }

    /// Stored checks, newest first.
    pub fn list_checks(&self) -> Vec<CheckRecord> {
        let mut stored: Vec<(u64, CheckRecord)> = self
            .checks
            .iter()
            .map(|r| (r.value().sequence, r.value().record.clone()))
            .collect();
        stored.sort_by(|a, b| b.0.cmp(&a.0));
        stored.into_iter().map(|(_, record)| record).collect()
    }
}
