//! Storefront-side sorting and pagination.
//!
//! The backend cannot order by region-computed prices, so sorted listings
//! collect the matching records in batches, sort them in memory and cut the
//! requested page out of the sorted sequence.
//!
//! Collection stops when the backend's `count` is reached or
//! `sort_max_records` records are held. A catalog larger than that bound is
//! truncated (logged at `warn`) and `count` reports the records actually
//! sorted, so `next_page` never points past the reachable window.

use std::cmp::Reverse;

use harbor_core::SortOption;
use tracing::{debug, instrument, warn};

use super::{ProductListQuery, ProductLister, ProductPage, localize};
use crate::backend::{AuthToken, BackendError, Product};

impl ProductLister {
    /// List one page of products ordered by `sort`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` when a country selector resolves to
    /// no region, or the first error from any backend batch.
    #[instrument(
        skip(self, query, auth),
        fields(page = query.page.page(), limit = query.page.limit(), sort = %sort)
    )]
    pub async fn list_products_with_sort(
        &self,
        query: &ProductListQuery,
        sort: SortOption,
        auth: Option<&AuthToken>,
    ) -> Result<ProductPage, BackendError> {
        let region_id = self.resolve_region_id(&query.region).await?;

        let batch_size = u64::from(self.sort_fetch_limit);
        let max_records = u64::from(self.sort_max_records);

        let mut products: Vec<Product> = Vec::new();
        let mut offset = 0;
        let mut backend_count;

        loop {
            let remaining = max_records.saturating_sub(products.len() as u64);
            let limit = batch_size.min(remaining);
            let batch = self
                .fetch_batch(&region_id, query, limit, offset, auth)
                .await?;

            backend_count = batch.count;
            let fetched = batch.products.len() as u64;
            products.extend(batch.products);
            offset += fetched;

            if fetched == 0 || offset >= backend_count || products.len() as u64 >= max_records {
                break;
            }
        }

        if backend_count > products.len() as u64 {
            warn!(
                backend_count,
                sorted = products.len(),
                max_records,
                "Sorted listing truncated, later records are not reachable"
            );
        }

        sort_products(&mut products, sort);

        let count = products.len() as u64;
        let window = query.page.window(products.len());
        debug!(count, start = window.start, end = window.end, "Slicing sorted products");

        let page_products: Vec<Product> = products.drain(window).collect();

        Ok(ProductPage {
            products: localize(page_products, query.locale()),
            count,
            page: query.page.page(),
            next_page: query.page.next_page(count),
        })
    }
}

/// Order products in place. The sort is stable: ties keep backend order.
///
/// - `PriceAsc` / `PriceDesc` compare the cheapest variant price, unpriced
///   products counting as zero
/// - `CreatedAt` puts the newest first and undated products last
pub fn sort_products(products: &mut [Product], sort: SortOption) {
    match sort {
        SortOption::PriceAsc => products.sort_by_key(Product::sort_price),
        SortOption::PriceDesc => products.sort_by_key(|p| Reverse(p.sort_price())),
        SortOption::CreatedAt => products.sort_by_key(|p| Reverse(p.created_at)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use harbor_core::PageRequest;
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: &str, price: Option<i64>, created_day: Option<u32>) -> Product {
        let variants = price.map_or_else(Vec::new, |amount| {
            vec![serde_json::json!({
                "id": format!("variant_{id}"),
                "calculated_price": { "calculated_amount": amount, "currency_code": "usd" }
            })]
        });
        let created_at = created_day.map(|d| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap());

        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": id,
            "handle": id,
            "created_at": created_at,
            "variants": variants,
        }))
        .unwrap()
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_price_asc_is_stable() {
        let mut products = vec![
            product("a", Some(30), None),
            product("b", Some(10), None),
            product("c", Some(30), None),
            product("d", Some(20), None),
        ];
        sort_products(&mut products, SortOption::PriceAsc);
        assert_eq!(ids(&products), ["b", "d", "a", "c"]);
    }

    #[test]
    fn test_price_desc_is_stable() {
        let mut products = vec![
            product("a", Some(30), None),
            product("b", Some(10), None),
            product("c", Some(30), None),
            product("d", Some(20), None),
        ];
        sort_products(&mut products, SortOption::PriceDesc);
        assert_eq!(ids(&products), ["a", "c", "d", "b"]);
    }

    #[test]
    fn test_unpriced_products_sort_as_zero() {
        let mut products = vec![product("priced", Some(5), None), product("free", None, None)];
        sort_products(&mut products, SortOption::PriceAsc);
        assert_eq!(ids(&products), ["free", "priced"]);
    }

    #[test]
    fn test_created_at_newest_first_undated_last() {
        let mut products = vec![
            product("old", None, Some(1)),
            product("undated", None, None),
            product("new", None, Some(20)),
            product("mid", None, Some(10)),
        ];
        sort_products(&mut products, SortOption::CreatedAt);
        assert_eq!(ids(&products), ["new", "mid", "old", "undated"]);
    }

    #[test]
    fn test_sorted_window_is_contiguous_ranks() {
        // 30 products priced 30, 29, ... 1
        let mut products: Vec<Product> = (1..=30)
            .rev()
            .map(|price| product(&format!("p{price:02}"), Some(price), None))
            .collect();
        sort_products(&mut products, SortOption::PriceAsc);

        let page = PageRequest::new(2, 12).unwrap();
        let window = page.window(products.len());
        let slice = products.get(window).unwrap();

        let prices: Vec<Decimal> = slice.iter().map(Product::sort_price).collect();
        let expected: Vec<Decimal> = (13..=24).map(Decimal::from).collect();
        assert_eq!(prices, expected);
        assert_eq!(page.next_page(30), Some(3));
    }
}
