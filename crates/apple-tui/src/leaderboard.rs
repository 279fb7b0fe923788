//! Ranking backend abstraction
//!
//! Supports different backends based on environment:
//! - Local: File-based storage for development and normal play
//! - Test: In-memory mock for testing

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// How many entries the ranking screen shows
pub const RANKING_LIMIT: usize = 20;

/// How many entries the store keeps at most
const STORED_LIMIT: usize = 1000;

/// Environment configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Normal play - file-based storage
    Local,
    /// Testing - in-memory mock
    Test,
}

impl Environment {
    /// Detect environment from APPLE_GAME_ENV
    pub fn detect() -> Self {
        match std::env::var("APPLE_GAME_ENV").as_deref() {
            Ok("test") | Ok("testing") => Environment::Test,
            _ => Environment::Local,
        }
    }
}

/// Ranking entry for submission and retrieval
///
/// Carries the three values the session reports at game over plus the
/// externally supplied nickname and a submission timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankEntry {
    pub nickname: String,
    pub final_score: u32,
    pub match_count: u32,
    pub time_remaining: u32,
    pub timestamp: u64,
    /// Assigned on retrieval, 1-based
    #[serde(default)]
    pub rank: Option<usize>,
}

/// Result type for ranking operations
pub type LeaderboardResult<T> = Result<T, LeaderboardError>;

/// Errors that can occur during ranking operations
#[derive(Debug, Clone)]
pub enum LeaderboardError {
    /// Local storage error
    StorageError(String),
    /// Backend is switched off or unreachable
    Unavailable,
}

impl std::fmt::Display for LeaderboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StorageError(e) => write!(f, "Storage error: {}", e),
            Self::Unavailable => write!(f, "Ranking backend unavailable"),
        }
    }
}

/// Trait for ranking backends
pub trait LeaderboardBackend: Send + Sync {
    /// Submit a finished round
    fn submit_score(&self, entry: RankEntry) -> LeaderboardResult<()>;

    /// Top entries ordered by final score descending, ranks populated
    fn top_scores(&self, limit: usize) -> LeaderboardResult<Vec<RankEntry>>;

    /// Check if backend is available/connected
    fn is_available(&self) -> bool;

    /// Get backend name for display
    fn backend_name(&self) -> &'static str;
}

// ==================== Local File Backend ====================

/// Local file-based ranking store
pub struct LocalLeaderboard {
    path: std::path::PathBuf,
    cache: Mutex<Option<RankingData>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RankingData {
    entries: Vec<RankEntry>,
}

impl LocalLeaderboard {
    pub fn new() -> Self {
        let path = dirs::data_local_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("apple_game_ranking.json");

        Self {
            path,
            cache: Mutex::new(None),
        }
    }

    /// Point the store at a specific file (used by tests)
    pub fn with_path(path: std::path::PathBuf) -> Self {
        Self {
            path,
            cache: Mutex::new(None),
        }
    }

    fn load(&self) -> RankingData {
        let mut cache = self.cache.lock().unwrap();
        if let Some(ref data) = *cache {
            return data.clone();
        }

        let data = match std::fs::read_to_string(&self.path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_default(),
            Err(_) => RankingData::default(),
        };

        *cache = Some(data.clone());
        data
    }

    fn save(&self, data: &RankingData) -> LeaderboardResult<()> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| LeaderboardError::StorageError(e.to_string()))?;

        std::fs::write(&self.path, json)
            .map_err(|e| LeaderboardError::StorageError(e.to_string()))?;

        *self.cache.lock().unwrap() = Some(data.clone());
        Ok(())
    }
}

impl Default for LocalLeaderboard {
    fn default() -> Self {
        Self::new()
    }
}

impl LeaderboardBackend for LocalLeaderboard {
    fn submit_score(&self, entry: RankEntry) -> LeaderboardResult<()> {
        let mut data = self.load();

        // Insert in sorted position (by final score descending - higher is better)
        let pos = data
            .entries
            .iter()
            .position(|e| e.final_score < entry.final_score)
            .unwrap_or(data.entries.len());

        data.entries.insert(pos, entry);
        data.entries.truncate(STORED_LIMIT);

        self.save(&data)
    }

    fn top_scores(&self, limit: usize) -> LeaderboardResult<Vec<RankEntry>> {
        let data = self.load();

        let ranked: Vec<RankEntry> = data
            .entries
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(i, mut e)| {
                e.rank = Some(i + 1);
                e
            })
            .collect();

        Ok(ranked)
    }

    fn is_available(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "Local"
    }
}

// ==================== Mock Backend for Testing ====================

/// In-memory mock ranking store for testing
pub struct MockLeaderboard {
    data: Mutex<Vec<RankEntry>>,
    available: Mutex<bool>,
}

impl MockLeaderboard {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(Vec::new()),
            available: Mutex::new(true),
        }
    }

    /// Set whether the backend should report as available
    pub fn set_available(&self, available: bool) {
        *self.available.lock().unwrap() = available;
    }

    /// Clear all entries
    pub fn clear(&self) {
        self.data.lock().unwrap().clear();
    }

    /// Get entry count
    pub fn count(&self) -> usize {
        self.data.lock().unwrap().len()
    }
}

impl Default for MockLeaderboard {
    fn default() -> Self {
        Self::new()
    }
}

impl LeaderboardBackend for MockLeaderboard {
    fn submit_score(&self, entry: RankEntry) -> LeaderboardResult<()> {
        if !*self.available.lock().unwrap() {
            return Err(LeaderboardError::Unavailable);
        }

        let mut data = self.data.lock().unwrap();
        let pos = data
            .iter()
            .position(|e| e.final_score < entry.final_score)
            .unwrap_or(data.len());
        data.insert(pos, entry);
        data.truncate(STORED_LIMIT);
        Ok(())
    }

    fn top_scores(&self, limit: usize) -> LeaderboardResult<Vec<RankEntry>> {
        if !*self.available.lock().unwrap() {
            return Err(LeaderboardError::Unavailable);
        }

        let data = self.data.lock().unwrap();
        let ranked: Vec<RankEntry> = data
            .iter()
            .take(limit)
            .cloned()
            .enumerate()
            .map(|(i, mut e)| {
                e.rank = Some(i + 1);
                e
            })
            .collect();

        Ok(ranked)
    }

    fn is_available(&self) -> bool {
        *self.available.lock().unwrap()
    }

    fn backend_name(&self) -> &'static str {
        "Mock"
    }
}

// ==================== Backend Factory ====================

/// Create the appropriate backend based on environment
pub fn create_backend(env: Environment) -> Arc<dyn LeaderboardBackend> {
    match env {
        Environment::Local => Arc::new(LocalLeaderboard::new()),
        Environment::Test => Arc::new(MockLeaderboard::new()),
    }
}

/// Create backend with automatic environment detection
pub fn create_backend_auto() -> Arc<dyn LeaderboardBackend> {
    create_backend(Environment::detect())
}
