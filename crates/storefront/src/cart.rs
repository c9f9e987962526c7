//! Cart and checkout pass-through operations.
//!
//! Carts are mutable backend state and are never cached. The cart ID lives in
//! a cookie (see [`crate::cookies`]); every call here is a direct API call.

use harbor_core::{CartId, LineItemId, RegionId, VariantId};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, instrument};

use crate::backend::{
    AuthToken, BackendClient, BackendError, Cart, CartResponse, LineItemDeleteResponse,
    PaymentProvider, PaymentProviderList, Query, Region,
};

/// Fields requested whenever a cart is returned.
pub const CART_FIELDS: &str =
    "*items,*region,*items.product,*items.variant,+items.thumbnail,*promotions";

/// Line item payload for adding merchandise.
#[derive(Debug, Clone, Serialize)]
struct AddLineItem<'a> {
    variant_id: &'a VariantId,
    quantity: u32,
}

/// Client for cart operations.
#[derive(Clone)]
pub struct CartService {
    backend: BackendClient,
}

impl CartService {
    #[must_use]
    pub const fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    /// Retrieve a cart. A cart the backend no longer knows yields `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails for a reason other than 404.
    #[instrument(skip(self, auth), fields(cart_id = %cart_id))]
    pub async fn retrieve_cart(
        &self,
        cart_id: &CartId,
        auth: Option<&AuthToken>,
    ) -> Result<Option<Cart>, BackendError> {
        match self
            .backend
            .get::<CartResponse>(&["store", "carts", cart_id.as_str()], &cart_query(), auth)
            .await
        {
            Ok(response) => Ok(Some(response.cart)),
            Err(BackendError::NotFound(_)) => {
                debug!("Cart no longer exists");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Return the cart for `cart_id`, creating one for `region` when there is
    /// none, and moving an existing cart to `region` when it belongs elsewhere.
    ///
    /// # Errors
    ///
    /// Returns an error if any backend request fails.
    #[instrument(skip(self, cart_id, region, auth), fields(region_id = %region.id))]
    pub async fn get_or_create_cart(
        &self,
        cart_id: Option<&CartId>,
        region: &Region,
        auth: Option<&AuthToken>,
    ) -> Result<Cart, BackendError> {
        let existing = match cart_id {
            Some(id) => self.retrieve_cart(id, auth).await?,
            None => None,
        };

        match existing {
            Some(cart) if cart.region_id.as_ref() == Some(&region.id) => Ok(cart),
            Some(cart) => {
                info!(cart_id = %cart.id, "Moving cart to requested region");
                self.update_region(&cart.id, &region.id, auth).await
            }
            None => self.create_cart(&region.id, auth).await,
        }
    }

    /// Add merchandise to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self, auth), fields(cart_id = %cart_id, variant_id = %variant_id))]
    pub async fn add_line_item(
        &self,
        cart_id: &CartId,
        variant_id: &VariantId,
        quantity: u32,
        auth: Option<&AuthToken>,
    ) -> Result<Cart, BackendError> {
        let path = ["store", "carts", cart_id.as_str(), "line-items"];
        let body = AddLineItem {
            variant_id,
            quantity,
        };
        let response: CartResponse = self.backend.post(&path, &cart_query(), &body, auth).await?;
        Ok(response.cart)
    }

    /// Change the quantity of a line.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self, auth), fields(cart_id = %cart_id, line_id = %line_id))]
    pub async fn update_line_item(
        &self,
        cart_id: &CartId,
        line_id: &LineItemId,
        quantity: u32,
        auth: Option<&AuthToken>,
    ) -> Result<Cart, BackendError> {
        let path = line_item_path(cart_id, line_id);
        let body = json!({ "quantity": quantity });
        let response: CartResponse = self.backend.post(&path, &cart_query(), &body, auth).await?;
        Ok(response.cart)
    }

    /// Remove a line from a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self, auth), fields(cart_id = %cart_id, line_id = %line_id))]
    pub async fn delete_line_item(
        &self,
        cart_id: &CartId,
        line_id: &LineItemId,
        auth: Option<&AuthToken>,
    ) -> Result<Cart, BackendError> {
        let path = line_item_path(cart_id, line_id);
        let response: LineItemDeleteResponse = self.backend.delete(&path, auth).await?;
        Ok(response.parent)
    }

    /// Apply promotion codes to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails or rejects a code.
    #[instrument(skip(self, codes, auth), fields(cart_id = %cart_id))]
    pub async fn apply_promotions(
        &self,
        cart_id: &CartId,
        codes: &[String],
        auth: Option<&AuthToken>,
    ) -> Result<Cart, BackendError> {
        let path = ["store", "carts", cart_id.as_str(), "promotions"];
        let codes: Vec<&str> = codes
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect();
        let body = json!({ "promo_codes": codes });
        let response: CartResponse = self.backend.post(&path, &cart_query(), &body, auth).await?;
        Ok(response.cart)
    }

    /// List payment providers enabled for a region.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self), fields(region_id = %region_id))]
    pub async fn list_payment_providers(
        &self,
        region_id: &RegionId,
    ) -> Result<Vec<PaymentProvider>, BackendError> {
        let query = Query::new().param("region_id", region_id);
        let list: PaymentProviderList = self
            .backend
            .get(&["store", "payment-providers"], &query, None)
            .await?;

        let mut providers: Vec<PaymentProvider> = list
            .payment_providers
            .into_iter()
            .filter(|p| p.is_enabled)
            .collect();
        providers.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(providers)
    }

    async fn create_cart(
        &self,
        region_id: &RegionId,
        auth: Option<&AuthToken>,
    ) -> Result<Cart, BackendError> {
        let body = json!({ "region_id": region_id });
        let response: CartResponse = self
            .backend
            .post(&["store", "carts"], &cart_query(), &body, auth)
            .await?;
        info!(cart_id = %response.cart.id, "Created cart");
        Ok(response.cart)
    }

    /// Move a cart to another region.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self, auth), fields(cart_id = %cart_id, region_id = %region_id))]
    pub async fn update_region(
        &self,
        cart_id: &CartId,
        region_id: &RegionId,
        auth: Option<&AuthToken>,
    ) -> Result<Cart, BackendError> {
        let path = ["store", "carts", cart_id.as_str()];
        let body = json!({ "region_id": region_id });
        let response: CartResponse = self.backend.post(&path, &cart_query(), &body, auth).await?;
        Ok(response.cart)
    }
}

fn line_item_path<'a>(cart_id: &'a CartId, line_id: &'a LineItemId) -> [&'a str; 5] {
    ["store", "carts", cart_id.as_str(), "line-items", line_id.as_str()]
}

fn cart_query() -> Query {
    Query::new().param("fields", CART_FIELDS)
}
