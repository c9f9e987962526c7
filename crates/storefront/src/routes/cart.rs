//! Cart route handlers.
//!
//! The cart ID lives in the `_harbor_cart_id` cookie. Adding merchandise
//! creates a cart on demand; the other mutations need an existing one.

use axum::{
    Json,
    extract::{Path, State},
};
use axum_extra::extract::cookie::CookieJar;
use harbor_core::{CartId, CountryCode, LineItemId, VariantId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::backend::{AuthToken, Cart, PaymentProvider, Region};
use crate::cookies;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Cart response body. `cart` is `null` when the browser has none yet.
#[derive(Debug, Serialize)]
pub struct CartBody {
    pub cart: Option<Cart>,
}

impl CartBody {
    const fn some(cart: Cart) -> Json<Self> {
        Json(Self { cart: Some(cart) })
    }
}

/// Add-to-cart request.
#[derive(Debug, Deserialize)]
pub struct AddLineItemRequest {
    pub variant_id: VariantId,
    pub quantity: u32,
}

/// Quantity change request.
#[derive(Debug, Deserialize)]
pub struct UpdateLineItemRequest {
    pub quantity: u32,
}

/// Promotion codes request.
#[derive(Debug, Deserialize)]
pub struct PromotionsRequest {
    pub codes: Vec<String>,
}

/// Payment providers response body.
#[derive(Debug, Serialize)]
pub struct PaymentProvidersBody {
    pub payment_providers: Vec<PaymentProvider>,
}

/// Show the browser's cart, moving it to the country's region if needed.
#[instrument(skip(state, jar))]
pub async fn show(
    State(state): State<AppState>,
    Path(country_code): Path<String>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<CartBody>)> {
    let region = region_for(&state, &country_code).await?;
    let auth = cookies::auth_token(&jar);

    let Some(cart_id) = cookies::cart_id(&jar) else {
        return Ok((jar, Json(CartBody { cart: None })));
    };

    let Some(cart) = state.carts().retrieve_cart(&cart_id, auth.as_ref()).await? else {
        return Ok((cookies::remove_cart_id(jar), Json(CartBody { cart: None })));
    };

    if cart.region_id.as_ref() == Some(&region.id) {
        return Ok((jar, CartBody::some(cart)));
    }

    let cart = state
        .carts()
        .update_region(&cart.id, &region.id, auth.as_ref())
        .await?;
    Ok((jar, CartBody::some(cart)))
}

/// Add merchandise, creating a cart for the country's region when needed.
#[instrument(skip(state, jar, request))]
pub async fn add_line_item(
    State(state): State<AppState>,
    Path(country_code): Path<String>,
    jar: CookieJar,
    Json(request): Json<AddLineItemRequest>,
) -> Result<(CookieJar, Json<CartBody>)> {
    validate_quantity(request.quantity)?;
    let region = region_for(&state, &country_code).await?;
    let auth = cookies::auth_token(&jar);
    let cart_id = cookies::cart_id(&jar);

    let cart = state
        .carts()
        .get_or_create_cart(cart_id.as_ref(), &region, auth.as_ref())
        .await?;
    let jar = cookies::set_cart_id(jar, &cart.id, state.cookie_settings());

    let cart = state
        .carts()
        .add_line_item(&cart.id, &request.variant_id, request.quantity, auth.as_ref())
        .await?;
    Ok((jar, CartBody::some(cart)))
}

/// Change a line's quantity.
#[instrument(skip(state, jar, request))]
pub async fn update_line_item(
    State(state): State<AppState>,
    Path(line_id): Path<String>,
    jar: CookieJar,
    Json(request): Json<UpdateLineItemRequest>,
) -> Result<Json<CartBody>> {
    validate_quantity(request.quantity)?;
    let (cart_id, auth) = existing_cart(&jar)?;

    let cart = state
        .carts()
        .update_line_item(
            &cart_id,
            &LineItemId::new(line_id),
            request.quantity,
            auth.as_ref(),
        )
        .await?;
    Ok(CartBody::some(cart))
}

/// Remove a line.
#[instrument(skip(state, jar))]
pub async fn delete_line_item(
    State(state): State<AppState>,
    Path(line_id): Path<String>,
    jar: CookieJar,
) -> Result<Json<CartBody>> {
    let (cart_id, auth) = existing_cart(&jar)?;

    let cart = state
        .carts()
        .delete_line_item(&cart_id, &LineItemId::new(line_id), auth.as_ref())
        .await?;
    Ok(CartBody::some(cart))
}

/// Apply promotion codes.
#[instrument(skip(state, jar, request))]
pub async fn apply_promotions(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<PromotionsRequest>,
) -> Result<Json<CartBody>> {
    let (cart_id, auth) = existing_cart(&jar)?;

    let cart = state
        .carts()
        .apply_promotions(&cart_id, &request.codes, auth.as_ref())
        .await?;
    Ok(CartBody::some(cart))
}

/// List payment providers for the country's region.
pub async fn payment_providers(
    State(state): State<AppState>,
    Path(country_code): Path<String>,
) -> Result<Json<PaymentProvidersBody>> {
    let region = region_for(&state, &country_code).await?;
    let payment_providers = state.carts().list_payment_providers(&region.id).await?;
    Ok(Json(PaymentProvidersBody { payment_providers }))
}

async fn region_for(state: &AppState, country_code: &str) -> Result<Region> {
    let country = CountryCode::parse(country_code)?;
    state
        .regions()
        .get_region(&country)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no region serves country {country}")))
}

fn existing_cart(jar: &CookieJar) -> Result<(CartId, Option<AuthToken>)> {
    let cart_id = cookies::cart_id(jar).ok_or_else(|| AppError::NotFound("cart".to_string()))?;
    Ok((cart_id, cookies::auth_token(jar)))
}

fn validate_quantity(quantity: u32) -> Result<()> {
    if quantity == 0 {
        return Err(AppError::BadRequest(
            "quantity must be at least 1".to_string(),
        ));
    }
    Ok(())
}
