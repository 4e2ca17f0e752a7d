use std::borrow::Borrow;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::config::{Config, SimulationDefaults};
use crate::errors::FetchError;
use crate::models::profile::{GeoLocation, IrradianceProfile};
use crate::services::geocoding::{Geocoder, NominatimClient};
use crate::services::pvgis::{IrradianceSource, PvgisClient};

const DEFAULT_MAX_ENTRIES: usize = 1024;

/// Bit patterns of (latitude, longitude, losses).
type ProfileKey = (u64, u64, u64);

/// Map holding at most `capacity` entries; the oldest insertion is evicted
/// first. A capacity of zero stores nothing.
#[derive(Debug)]
struct BoundedMap<K, V> {
    entries: HashMap<K, V>,
    order: VecDeque<K>,
    capacity: usize,
}

impl<K: Eq + Hash + Clone, V> BoundedMap<K, V> {
    fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key)
    }

    fn insert(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.insert(key.clone(), value).is_some() {
            return;
        }
        self.order.push_back(key);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Successful upstream answers, keyed by their request.
#[derive(Debug)]
pub struct ResponseCache {
    locations: RwLock<BoundedMap<String, GeoLocation>>,
    profiles: RwLock<BoundedMap<ProfileKey, IrradianceProfile>>,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }
}

impl ResponseCache {
    /// `max_entries` bounds each map separately.
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            locations: RwLock::new(BoundedMap::new(max_entries)),
            profiles: RwLock::new(BoundedMap::new(max_entries)),
        }
    }

    fn location(&self, key: &str) -> Option<GeoLocation> {
        self.locations.read().ok()?.get(key).copied()
    }

    fn store_location(&self, key: String, location: GeoLocation) {
        if let Ok(mut map) = self.locations.write() {
            map.insert(key, location);
        }
    }

    fn profile(&self, key: &ProfileKey) -> Option<IrradianceProfile> {
        self.profiles.read().ok()?.get(key).cloned()
    }

    fn store_profile(&self, key: ProfileKey, profile: IrradianceProfile) {
        if let Ok(mut map) = self.profiles.write() {
            map.insert(key, profile);
        }
    }

    /// (cached locations, cached profiles)
    pub fn entry_counts(&self) -> (usize, usize) {
        let locations = self.locations.read().map(|m| m.len()).unwrap_or(0);
        let profiles = self.profiles.read().map(|m| m.len()).unwrap_or(0);
        (locations, profiles)
    }
}

fn profile_key(location: GeoLocation, system_losses_pct: f64) -> ProfileKey {
    (
        location.latitude.to_bits(),
        location.longitude.to_bits(),
        system_losses_pct.to_bits(),
    )
}

/// Memoising wrapper around a collaborator. Misses and failures are not
/// stored, so the next call retries upstream.
#[derive(Clone, Debug)]
pub struct Cached<S> {
    inner: S,
    cache: Arc<ResponseCache>,
}

impl<S> Cached<S> {
    pub fn new(inner: S, cache: Arc<ResponseCache>) -> Self {
        Self { inner, cache }
    }
}

impl<S: Geocoder + Sync> Geocoder for Cached<S> {
    async fn geocode(&self, place_name: &str) -> Result<Option<GeoLocation>, FetchError> {
        let key = place_name.trim().to_string();
        if let Some(hit) = self.cache.location(&key) {
            debug!("[CACHE] Location hit for '{}'", key);
            return Ok(Some(hit));
        }

        let found = self.inner.geocode(place_name).await?;
        if let Some(location) = found {
            self.cache.store_location(key, location);
        }
        Ok(found)
    }
}

impl<S: IrradianceSource + Sync> IrradianceSource for Cached<S> {
    async fn fetch_profile(&self, location: GeoLocation, system_losses_pct: f64) -> Result<IrradianceProfile, FetchError> {
        let key = profile_key(location, system_losses_pct);
        if let Some(hit) = self.cache.profile(&key) {
            debug!(
                "[CACHE] Profile hit for {:.4}, {:.4} (losses {}%)",
                location.latitude, location.longitude, system_losses_pct
            );
            return Ok(hit);
        }

        let profile = self.inner.fetch_profile(location, system_losses_pct).await?;
        self.cache.store_profile(key, profile.clone());
        Ok(profile)
    }
}

#[derive(Clone, Debug)]
pub struct AppState {
    pub geocoder: Cached<NominatimClient>,
    pub irradiance: Cached<PvgisClient>,
    pub defaults: Arc<SimulationDefaults>,
    pub cache: Arc<ResponseCache>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let cache = Arc::new(ResponseCache::with_capacity(config.cache.max_entries));
        Ok(Self {
            geocoder: Cached::new(NominatimClient::new(&config.geocoding)?, cache.clone()),
            irradiance: Cached::new(PvgisClient::new(&config.pvgis)?, cache.clone()),
            defaults: Arc::new(config.defaults.clone()),
            cache,
        })
    }
}
