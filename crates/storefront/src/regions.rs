//! Region resolution with an explicit, TTL-bound cache.
//!
//! A country code maps to at most one region. The first miss loads the full
//! region list and caches an entry for every country of every region, so
//! later lookups for any known country are served without a backend call.
//!
//! Countries no region serves are remembered for a short while, so repeated
//! lookups for them do not queue behind the refresh lock.

use std::sync::Arc;
use std::time::Duration;

use harbor_core::{CountryCode, RegionId};
use moka::future::Cache;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::backend::{BackendClient, BackendError, Query, Region, RegionList, RegionResponse};

/// Regions requested per backend page.
const REGION_PAGE_SIZE: u64 = 100;

/// Upper bound on cached country entries.
const REGION_CACHE_CAPACITY: u64 = 1000;

/// How long a country with no region is remembered.
const ABSENT_COUNTRY_TTL: Duration = Duration::from_secs(30);

/// Resolves country codes to regions.
///
/// Cheaply cloneable; clones share the cache.
#[derive(Clone)]
pub struct RegionResolver {
    inner: Arc<RegionResolverInner>,
}

struct RegionResolverInner {
    backend: BackendClient,
    cache: Cache<CountryCode, Region>,
    absent: Cache<CountryCode, ()>,
    /// Serializes region-list refreshes so concurrent misses fetch once.
    refresh: Mutex<()>,
}

impl RegionResolver {
    #[must_use]
    pub fn new(backend: BackendClient, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(REGION_CACHE_CAPACITY)
            .time_to_live(ttl)
            .build();
        let absent = Cache::builder()
            .max_capacity(REGION_CACHE_CAPACITY)
            .time_to_live(ttl.min(ABSENT_COUNTRY_TTL))
            .build();

        Self {
            inner: Arc::new(RegionResolverInner {
                backend,
                cache,
                absent,
                refresh: Mutex::new(()),
            }),
        }
    }

    /// Resolve a country code to its region.
    ///
    /// Returns `Ok(None)` when no region contains the country.
    ///
    /// # Errors
    ///
    /// Returns an error if the region list has to be fetched and the request fails.
    #[instrument(skip(self), fields(country = %country))]
    pub async fn get_region(&self, country: &CountryCode) -> Result<Option<Region>, BackendError> {
        if let Some(region) = self.inner.cache.get(country).await {
            debug!("Cache hit for region");
            return Ok(Some(region));
        }
        if self.inner.absent.contains_key(country) {
            debug!("Country recently found to have no region");
            return Ok(None);
        }

        let _guard = self.inner.refresh.lock().await;

        // Another request may have refreshed while we waited
        if let Some(region) = self.inner.cache.get(country).await {
            debug!("Cache filled while waiting for refresh");
            return Ok(Some(region));
        }
        if self.inner.absent.contains_key(country) {
            return Ok(None);
        }

        let regions = self.fetch_all().await?;
        self.populate(&regions).await;

        let found = find_region(&regions, country).cloned();
        if found.is_none() {
            debug!("No region serves this country");
            self.inner.absent.insert(country.clone(), ()).await;
        }
        Ok(found)
    }

    /// List every region, refreshing the country cache on the way.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn list_regions(&self) -> Result<Vec<Region>, BackendError> {
        let regions = self.fetch_all().await?;
        self.populate(&regions).await;
        Ok(regions)
    }

    /// Retrieve a single region by ID. Not cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails for a reason other than 404.
    #[instrument(skip(self), fields(region_id = %id))]
    pub async fn retrieve_region(&self, id: &RegionId) -> Result<Option<Region>, BackendError> {
        match self
            .inner
            .backend
            .get::<RegionResponse>(&["store", "regions", id.as_str()], &Query::new(), None)
            .await
        {
            Ok(response) => Ok(Some(response.region)),
            Err(BackendError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Drop every cached country entry.
    pub async fn invalidate(&self) {
        self.inner.cache.invalidate_all();
        self.inner.absent.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
        self.inner.absent.run_pending_tasks().await;
        debug!("Region cache invalidated");
    }

    async fn fetch_all(&self) -> Result<Vec<Region>, BackendError> {
        let mut regions = Vec::new();
        let mut offset = 0;

        loop {
            let query = Query::new()
                .param("limit", REGION_PAGE_SIZE)
                .param("offset", offset);
            let page: RegionList = self
                .inner
                .backend
                .get(&["store", "regions"], &query, None)
                .await?;

            let fetched = page.regions.len() as u64;
            regions.extend(page.regions);
            offset += fetched;

            if fetched == 0 || offset >= page.count {
                break;
            }
        }

        debug!(count = regions.len(), "Fetched regions");
        Ok(regions)
    }

    async fn populate(&self, regions: &[Region]) {
        for region in regions {
            for country in &region.countries {
                match CountryCode::parse(&country.iso_2) {
                    Ok(code) => self.inner.cache.insert(code, region.clone()).await,
                    Err(e) => warn!(
                        region_id = %region.id,
                        iso_2 = %country.iso_2,
                        error = %e,
                        "Skipping region country with invalid code"
                    ),
                }
            }
        }
    }
}

/// The region whose country list contains `country`.
#[must_use]
pub fn find_region<'a>(regions: &'a [Region], country: &CountryCode) -> Option<&'a Region> {
    regions.iter().find(|region| {
        region
            .countries
            .iter()
            .any(|c| c.iso_2.eq_ignore_ascii_case(country.as_str()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::RegionCountry;

    fn region(id: &str, countries: &[&str]) -> Region {
        Region {
            id: RegionId::new(id),
            name: id.to_uppercase(),
            currency_code: "eur".to_string(),
            countries: countries
                .iter()
                .map(|iso| RegionCountry {
                    iso_2: (*iso).to_string(),
                    display_name: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_find_region_matches_any_country() {
        let regions = vec![region("reg_eu", &["de", "fr"]), region("reg_na", &["us", "CA"])];

        let fr = CountryCode::parse("fr").unwrap();
        assert_eq!(find_region(&regions, &fr).unwrap().id.as_str(), "reg_eu");

        let ca = CountryCode::parse("ca").unwrap();
        assert_eq!(find_region(&regions, &ca).unwrap().id.as_str(), "reg_na");
    }

    #[test]
    fn test_find_region_absent_country() {
        let regions = vec![region("reg_eu", &["de"])];
        let jp = CountryCode::parse("jp").unwrap();
        assert!(find_region(&regions, &jp).is_none());
    }
}
