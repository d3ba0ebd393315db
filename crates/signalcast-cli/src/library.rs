//! Locally persisted user state built on [`JsonStore`].
//!
//! | Key | Contents |
//! |-----|----------|
//! | `signalHistory` | `Vec<SavedSignal>`, newest first |
//! | `featuredSites` | `Vec<FeaturedSite>`, one per hostname |
//! | `watchlist` | `Vec<String>` of asset names |
//! | `userProfile` | [`UserProfile`] |
//! | `chat.<id>` | `Vec<ChatTurn>` for one saved signal |
//!
//! Unreadable documents are logged and replaced by defaults, so a damaged
//! file never blocks a command.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use time::Duration;
use url::Url;
use uuid::Uuid;

use signalcast_core::{ChatTurn, SignalSource, SignalStatus, TradingSignal, UserProfile, UtcDateTime};

use crate::store::{JsonStore, StoreError};

const HISTORY_KEY: &str = "signalHistory";
const FEATURED_KEY: &str = "featuredSites";
const WATCHLIST_KEY: &str = "watchlist";
const PROFILE_KEY: &str = "userProfile";

/// Redirect host used by web grounding; never a useful featured source.
const EXCLUDED_HOSTS: &[&str] = &["vertexaisearch.cloud.google.com"];

pub const DEFAULT_WATCHLIST: &[&str] = &[
    "Gold (XAU/USD)",
    "EUR/USD",
    "Bitcoin (BTCUSDT)",
    "Apple (AAPL)",
    "S&P 500 (INX)",
];

/// Age after which a live signal is shown as expired.
pub fn signal_lifetime() -> Duration {
    Duration::hours(24)
}

/// A signal in history, addressable by id for chat transcripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSignal {
    pub id: String,
    #[serde(flatten)]
    pub signal: TradingSignal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturedSite {
    pub name: String,
    pub url: String,
}

pub struct Library {
    store: JsonStore,
}

impl Library {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    /// History with stale live signals flipped to expired and persisted.
    pub fn history(&self, now: UtcDateTime) -> Result<Vec<SavedSignal>, StoreError> {
        let mut history: Vec<SavedSignal> = self.load_or_default(HISTORY_KEY)?;
        if expire_stale(&mut history, now) {
            self.store.set(HISTORY_KEY, &history)?;
        }
        Ok(history)
    }

    /// Prepends `signal` to history and folds its sources into the featured sites.
    pub fn save_signal(&self, signal: TradingSignal) -> Result<SavedSignal, StoreError> {
        let saved = SavedSignal {
            id: Uuid::new_v4().to_string(),
            signal,
        };

        let mut history: Vec<SavedSignal> = self.load_or_default(HISTORY_KEY)?;
        history.insert(0, saved.clone());
        self.store.set(HISTORY_KEY, &history)?;

        let existing: Vec<FeaturedSite> = self.load_or_default(FEATURED_KEY)?;
        let merged = merge_featured_sites(&existing, &saved.signal.sources);
        if merged.len() > existing.len() {
            self.store.set(FEATURED_KEY, &merged)?;
        }

        Ok(saved)
    }

    /// Looks a saved signal up by history index (0 = newest) or id.
    pub fn find_signal(
        &self,
        reference: &str,
        now: UtcDateTime,
    ) -> Result<Option<SavedSignal>, StoreError> {
        let history = self.history(now)?;
        let reference = reference.trim();
        let found = match reference.parse::<usize>() {
            Ok(index) => history.into_iter().nth(index),
            Err(_) => history.into_iter().find(|saved| saved.id == reference),
        };
        Ok(found)
    }

    pub fn featured_sites(&self) -> Result<Vec<FeaturedSite>, StoreError> {
        self.load_or_default(FEATURED_KEY)
    }

    /// Watchlist, seeded with [`DEFAULT_WATCHLIST`] the first time it is read.
    pub fn watchlist(&self) -> Result<Vec<String>, StoreError> {
        if let Some(watchlist) = self.load(WATCHLIST_KEY)? {
            return Ok(watchlist);
        }

        let seeded: Vec<String> = DEFAULT_WATCHLIST.iter().map(|name| (*name).to_owned()).collect();
        self.store.set(WATCHLIST_KEY, &seeded)?;
        Ok(seeded)
    }

    pub fn add_to_watchlist(&self, asset: &str) -> Result<Vec<String>, StoreError> {
        let mut watchlist = self.watchlist()?;
        if !watchlist.iter().any(|name| name == asset) {
            watchlist.push(asset.to_owned());
            self.store.set(WATCHLIST_KEY, &watchlist)?;
        }
        Ok(watchlist)
    }

    pub fn remove_from_watchlist(&self, asset: &str) -> Result<Vec<String>, StoreError> {
        let mut watchlist = self.watchlist()?;
        let before = watchlist.len();
        watchlist.retain(|name| name != asset);
        if watchlist.len() != before {
            self.store.set(WATCHLIST_KEY, &watchlist)?;
        }
        Ok(watchlist)
    }

    pub fn profile(&self) -> Result<UserProfile, StoreError> {
        self.load_or_default(PROFILE_KEY)
    }

    pub fn set_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        self.store.set(PROFILE_KEY, profile)
    }

    pub fn transcript(&self, signal_id: &str) -> Result<Vec<ChatTurn>, StoreError> {
        self.load_or_default(&transcript_key(signal_id))
    }

    pub fn set_transcript(&self, signal_id: &str, turns: &[ChatTurn]) -> Result<(), StoreError> {
        self.store.set(&transcript_key(signal_id), &turns)
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.store.get(key) {
            Err(StoreError::Corrupt { path, source }) => {
                tracing::error!(path = %path.display(), error = %source, "ignoring unreadable store entry");
                Ok(None)
            }
            other => other,
        }
    }

    fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, StoreError> {
        Ok(self.load(key)?.unwrap_or_default())
    }
}

fn transcript_key(signal_id: &str) -> String {
    format!("chat.{signal_id}")
}

/// Marks live signals older than [`signal_lifetime`] as expired. Returns
/// whether anything changed. Expired signals never become live again.
pub fn expire_stale(history: &mut [SavedSignal], now: UtcDateTime) -> bool {
    let mut changed = false;
    for saved in history.iter_mut() {
        let signal = &mut saved.signal;
        if signal.status == SignalStatus::Live
            && signal.update_time.elapsed_until(now) > signal_lifetime()
        {
            signal.status = SignalStatus::Expired;
            changed = true;
        }
    }
    changed
}

/// Existing sites followed by new sources, one entry per hostname (ignoring a
/// leading `www.`); the first occurrence wins. Unparseable URLs and excluded
/// redirect hosts are dropped.
pub fn merge_featured_sites(existing: &[FeaturedSite], sources: &[SignalSource]) -> Vec<FeaturedSite> {
    let incoming = sources.iter().filter_map(|source| {
        let host = hostname(&source.uri)?;
        (!EXCLUDED_HOSTS.contains(&host.as_str())).then(|| FeaturedSite {
            name: source.title.clone(),
            url: source.uri.clone(),
        })
    });

    let mut seen = Vec::new();
    let mut merged = Vec::new();
    for site in existing.iter().cloned().chain(incoming) {
        let Some(host) = hostname(&site.url) else {
            continue;
        };
        let key = host.strip_prefix("www.").unwrap_or(&host).to_owned();
        if !seen.contains(&key) {
            seen.push(key);
            merged.push(site);
        }
    }
    merged
}

fn hostname(raw: &str) -> Option<String> {
    Url::parse(raw).ok()?.host_str().map(str::to_owned)
}
