//! Slippy-map tile plumbing: coordinates, sources, cache, and loader
//!
//! Tiles are fetched on detached threads with a shared blocking client
//! and delivered back to the UI thread over an `mpsc` channel. Raw bytes
//! are kept in an LRU cache so re-entering an area does not refetch.

use crate::core::geo::LatLng;
use crate::map::viewport::MAX_LATITUDE;
use crate::Result;
use lru::LruCache;
use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread;

/// Shared blocking HTTP client with a custom User-Agent so that public
/// tile servers (e.g. OpenStreetMap) don't reject the request.
static TILE_HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent("fencewatch/0.1 (+https://github.com/example/fencewatch)")
        .build()
        .expect("failed to build reqwest blocking client")
});

/// A tile coordinate in the slippy map tile scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoord {
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Tile containing the given coordinate at a zoom level.
    pub fn from_lat_lng(lat_lng: &LatLng, zoom: u8) -> Self {
        let lat_rad = lat_lng.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let n = 2_f64.powi(zoom as i32);

        let x = ((lat_lng.lon + 180.0) / 360.0 * n).floor() as u32;
        let y = ((1.0 - lat_rad.tan().asinh() / std::f64::consts::PI) / 2.0 * n).floor() as u32;

        Self::new(x.min(n as u32 - 1), y.min(n as u32 - 1), zoom)
    }

    /// Whether the x/y indices exist at this zoom level.
    pub fn is_valid(&self) -> bool {
        let max_coord = 2_u32.pow(self.z as u32);
        self.x < max_coord && self.y < max_coord
    }
}

/// Anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    fn url(&self, coord: TileCoord) -> String;

    /// Attribution line shown on the map.
    fn attribution(&self) -> &str;
}

/// Default OpenStreetMap tile server with subdomain rotation.
pub struct OpenStreetMapSource {
    subdomains: Vec<&'static str>,
}

impl OpenStreetMapSource {
    pub fn new() -> Self {
        Self {
            subdomains: vec!["a", "b", "c"],
        }
    }
}

impl Default for OpenStreetMapSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TileSource for OpenStreetMapSource {
    fn url(&self, coord: TileCoord) -> String {
        let idx = ((coord.x + coord.y) as usize) % self.subdomains.len();
        format!(
            "https://{}.tile.openstreetmap.org/{}/{}/{}.png",
            self.subdomains[idx], coord.z, coord.x, coord.y
        )
    }

    fn attribution(&self) -> &str {
        "© OpenStreetMap contributors"
    }
}

/// In-memory tile byte cache with LRU eviction
#[derive(Debug, Clone)]
pub struct TileCache {
    cache: Arc<Mutex<LruCache<TileCoord, Arc<Vec<u8>>>>>,
}

impl TileCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .unwrap_or_else(|| NonZeroUsize::new(512).expect("nonzero"));
        Self {
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    pub fn get(&self, coord: &TileCoord) -> Option<Arc<Vec<u8>>> {
        self.cache.lock().ok()?.get(coord).cloned()
    }

    pub fn insert(&self, coord: TileCoord, data: Vec<u8>) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(coord, Arc::new(data));
        }
    }

    pub fn contains(&self, coord: &TileCoord) -> bool {
        self.cache
            .lock()
            .ok()
            .map(|cache| cache.contains(coord))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.cache.lock().ok().map(|cache| cache.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TileCache {
    fn default() -> Self {
        Self::new(512)
    }
}

/// Fetches tiles on detached threads and reports completed downloads
/// over an `mpsc` channel.
pub struct TileLoader {
    tx: Sender<(TileCoord, Vec<u8>)>,
}

impl TileLoader {
    pub fn new(tx: Sender<(TileCoord, Vec<u8>)>) -> Self {
        Self { tx }
    }

    /// Start downloading a tile. Runs on a detached thread so the caller
    /// never blocks; the sender receives the bytes on success. A failed
    /// tile is retried once, then given up on (it will be re-requested
    /// if it scrolls into view again).
    pub fn start_download(&self, source: &dyn TileSource, coord: TileCoord) {
        let url = source.url(coord);
        let tx = self.tx.clone();

        thread::spawn(move || {
            const MAX_ATTEMPTS: usize = 2;
            for attempt in 1..=MAX_ATTEMPTS {
                let result: Result<Vec<u8>> = (|| {
                    let response = TILE_HTTP_CLIENT.get(&url).send()?;
                    let response = response.error_for_status()?;
                    Ok(response.bytes()?.to_vec())
                })();

                match result {
                    Ok(data) => {
                        log::debug!("downloaded tile {coord:?} ({} bytes)", data.len());
                        let _ = tx.send((coord, data));
                        return;
                    }
                    Err(e) => {
                        log::warn!("tile {coord:?} download failed on attempt {attempt}: {e}");
                        if attempt < MAX_ATTEMPTS {
                            thread::sleep(std::time::Duration::from_millis(100));
                        }
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_coord_from_lat_lng() {
        // Greenwich at zoom 1 lands in the north-east quadrant.
        let coord = TileCoord::from_lat_lng(&LatLng::new(51.5074, -0.1278), 1);
        assert_eq!(coord, TileCoord::new(0, 0, 1));

        let coord = TileCoord::from_lat_lng(&LatLng::new(37.7749, -122.4194), 10);
        assert!(coord.is_valid());
        assert_eq!(coord.z, 10);
    }

    #[test]
    fn test_tile_coord_validity() {
        assert!(TileCoord::new(0, 0, 0).is_valid());
        assert!(!TileCoord::new(1, 0, 0).is_valid());
        assert!(TileCoord::new(1023, 1023, 10).is_valid());
        assert!(!TileCoord::new(1024, 0, 10).is_valid());
    }

    #[test]
    fn test_osm_source_url() {
        let source = OpenStreetMapSource::new();
        let url = source.url(TileCoord::new(163, 395, 10));
        assert!(url.ends_with("/10/163/395.png"));
        assert!(url.contains(".tile.openstreetmap.org"));
    }

    #[test]
    fn test_tile_cache_lru_eviction() {
        let cache = TileCache::new(2);
        let a = TileCoord::new(1, 1, 1);
        let b = TileCoord::new(2, 2, 2);
        let c = TileCoord::new(3, 3, 3);

        cache.insert(a, vec![1]);
        cache.insert(b, vec![2]);
        assert_eq!(cache.len(), 2);

        // Third insert evicts the least recently used entry.
        cache.insert(c, vec![3]);
        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(&a));
        assert!(cache.contains(&b));
        assert!(cache.contains(&c));

        assert_eq!(*cache.get(&b).unwrap(), vec![2]);
    }
}
