//! Cache-first asset shim that keeps the app usable offline.
//!
//! Assets from a fixed manifest are cached under a version tag at install
//! time. Activation drops caches under any other tag. Lookups hit the cache
//! first and only go to the network on a miss.

use hashbrown::HashMap;

/// Version tag of the current asset cache.
pub const CACHE_VERSION: &str = "book-tracker-v1";

/// Static assets cached at install time.
pub const OFFLINE_FILES: [&str; 6] = [
    "/",
    "/index.html",
    "/css/style.css",
    "/js/app.js",
    "/manifest.json",
    "/icons/icon-192.png",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("fetching {url}: {message}")]
pub struct FetchError {
    pub url: String,
    pub message: String,
}

/// Network collaborator.
pub trait Fetcher {
    fn fetch(&mut self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Where a response body came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Network,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub body: Vec<u8>,
    pub source: Source,
}

#[derive(Debug, Default)]
pub struct AssetCache {
    version: String,
    caches: HashMap<String, HashMap<String, Vec<u8>>>,
}

impl AssetCache {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            caches: HashMap::new(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Switches to a new version tag. Caches under earlier tags stay until
    /// [`AssetCache::activate`] runs.
    pub fn upgrade(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    /// Caches every manifest entry under the current version.
    ///
    /// All or nothing: if any entry fails to fetch, nothing is cached.
    pub fn install(&mut self, manifest: &[&str], fetcher: &mut dyn Fetcher) -> Result<(), FetchError> {
        let mut fresh = HashMap::with_capacity(manifest.len());
        for url in manifest {
            let body = fetcher.fetch(url)?;
            fresh.insert((*url).to_string(), body);
        }

        tracing::info!(version = %self.version, assets = fresh.len(), "offline cache installed");
        self.caches
            .entry(self.version.clone())
            .or_default()
            .extend(fresh);
        Ok(())
    }

    /// Deletes caches whose tag is not the current version. Returns the
    /// deleted tags.
    pub fn activate(&mut self) -> Vec<String> {
        let stale: Vec<String> = self
            .caches
            .keys()
            .filter(|tag| **tag != self.version)
            .cloned()
            .collect();
        for tag in &stale {
            self.caches.remove(tag);
            tracing::info!(version = %tag, "deleted stale offline cache");
        }
        stale
    }

    /// Cached body for `url` in any cache, else a network fetch.
    /// Network responses are not cached.
    pub fn fetch(&self, url: &str, fetcher: &mut dyn Fetcher) -> Result<Response, FetchError> {
        if let Some(body) = self.lookup(url) {
            return Ok(Response {
                body: body.to_vec(),
                source: Source::Cache,
            });
        }
        let body = fetcher.fetch(url)?;
        Ok(Response {
            body,
            source: Source::Network,
        })
    }

    pub fn lookup(&self, url: &str) -> Option<&[u8]> {
        self.caches
            .values()
            .find_map(|cache| cache.get(url))
            .map(Vec::as_slice)
    }

    /// Tags of all caches currently held.
    pub fn cached_versions(&self) -> Vec<&str> {
        self.caches.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingFetcher {
        calls: Vec<String>,
        fail_on: Option<&'static str>,
    }

    impl Fetcher for CountingFetcher {
        fn fetch(&mut self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.calls.push(url.to_string());
            if self.fail_on == Some(url) {
                return Err(FetchError {
                    url: url.to_string(),
                    message: "offline".to_string(),
                });
            }
            Ok(format!("body of {url}").into_bytes())
        }
    }

    #[test]
    fn installed_assets_are_served_from_cache() {
        let mut net = CountingFetcher::default();
        let mut cache = AssetCache::new(CACHE_VERSION);
        cache.install(&OFFLINE_FILES, &mut net).unwrap();
        assert_eq!(net.calls.len(), OFFLINE_FILES.len());

        let resp = cache.fetch("/index.html", &mut net).unwrap();
        assert_eq!(resp.source, Source::Cache);
        assert_eq!(resp.body, b"body of /index.html");
        assert_eq!(net.calls.len(), OFFLINE_FILES.len());
    }

    #[test]
    fn misses_go_to_network_without_caching() {
        let mut net = CountingFetcher::default();
        let cache = AssetCache::new(CACHE_VERSION);

        for _ in 0..2 {
            let resp = cache.fetch("/covers/a.png", &mut net).unwrap();
            assert_eq!(resp.source, Source::Network);
        }
        assert_eq!(net.calls.len(), 2);
    }

    #[test]
    fn failed_install_caches_nothing() {
        let mut net = CountingFetcher {
            fail_on: Some("/js/app.js"),
            ..CountingFetcher::default()
        };
        let mut cache = AssetCache::new(CACHE_VERSION);
        assert!(cache.install(&OFFLINE_FILES, &mut net).is_err());
        assert!(cache.lookup("/").is_none());
    }

    #[test]
    fn activation_drops_other_versions() {
        let mut net = CountingFetcher::default();
        let mut cache = AssetCache::new("book-tracker-v0");
        cache.install(&["/", "/old.css"], &mut net).unwrap();
        assert!(cache.activate().is_empty());

        cache.upgrade(CACHE_VERSION);
        assert_eq!(cache.version(), CACHE_VERSION);
        cache.install(&OFFLINE_FILES, &mut net).unwrap();
        // Old assets are still served until activation.
        assert!(cache.lookup("/old.css").is_some());
        assert_eq!(cache.cached_versions().len(), 2);

        assert_eq!(cache.activate(), vec!["book-tracker-v0".to_string()]);
        assert_eq!(cache.cached_versions(), vec![CACHE_VERSION]);
        assert!(cache.lookup("/old.css").is_none());
        assert!(cache.lookup("/index.html").is_some());
    }
}
