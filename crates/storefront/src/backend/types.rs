//! Wire types for the store API.
//!
//! These records are owned by the backend. The storefront reads them and
//! passes mutations through; it never enforces invariants of its own on them.

use chrono::{DateTime, Utc};
use harbor_core::{
    CartId, CategoryId, CollectionId, LineItemId, Price, ProductId, RegionId, VariantId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Region Types
// =============================================================================

/// A country that belongs to a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionCountry {
    /// ISO 3166-1 alpha-2 code, lowercase.
    pub iso_2: String,
    /// Human-readable name.
    #[serde(default)]
    pub display_name: Option<String>,
}

/// A backend-defined group of countries sharing currency, tax and shipping settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    /// ISO 4217 currency code, lowercase.
    pub currency_code: String,
    #[serde(default)]
    pub countries: Vec<RegionCountry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegionList {
    pub regions: Vec<Region>,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegionResponse {
    pub region: Region,
}

// =============================================================================
// Product Types
// =============================================================================

/// Price of a variant as computed by the backend for a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatedPrice {
    pub calculated_amount: Decimal,
    #[serde(default)]
    pub original_amount: Option<Decimal>,
    pub currency_code: String,
}

impl CalculatedPrice {
    /// Whether the calculated amount is below the original amount.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.original_amount
            .is_some_and(|original| self.calculated_amount < original)
    }

    #[must_use]
    pub fn price(&self) -> Price {
        Price::new(self.calculated_amount, self.currency_code.clone())
    }
}

/// A purchasable variant of a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: VariantId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    /// Only present when requested through the field selection.
    #[serde(default)]
    pub calculated_price: Option<CalculatedPrice>,
    #[serde(default)]
    pub inventory_quantity: Option<i64>,
    #[serde(default)]
    pub manage_inventory: bool,
    #[serde(default)]
    pub allow_backorder: bool,
}

impl ProductVariant {
    /// Whether the variant can currently be added to a cart.
    #[must_use]
    pub fn is_in_stock(&self) -> bool {
        !self.manage_inventory
            || self.allow_backorder
            || self.inventory_quantity.is_some_and(|q| q > 0)
    }
}

/// Product image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductImage {
    #[serde(default)]
    pub id: Option<String>,
    pub url: String,
}

/// Product tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductTag {
    #[serde(default)]
    pub id: Option<String>,
    pub value: String,
}

/// Localized product copy, present when a locale was requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductTranslation {
    pub locale_code: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub handle: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub collection_id: Option<CollectionId>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub tags: Vec<ProductTag>,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    #[serde(default)]
    pub translations: Vec<ProductTranslation>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl Product {
    /// The cheapest calculated price across variants, if any variant is priced.
    #[must_use]
    pub fn cheapest_price(&self) -> Option<&CalculatedPrice> {
        self.variants
            .iter()
            .filter_map(|v| v.calculated_price.as_ref())
            .min_by(|a, b| a.calculated_amount.cmp(&b.calculated_amount))
    }

    /// Amount used when ordering by price; unpriced products count as zero.
    #[must_use]
    pub fn sort_price(&self) -> Decimal {
        self.cheapest_price()
            .map_or(Decimal::ZERO, |p| p.calculated_amount)
    }

    /// Replace title, subtitle and description with the translation for
    /// `locale`, when one exists. Untranslated fields keep their default copy.
    pub fn apply_translation(&mut self, locale: &str) {
        let Some(translation) = self
            .translations
            .iter()
            .find(|t| t.locale_code.eq_ignore_ascii_case(locale))
            .cloned()
        else {
            return;
        };

        if let Some(title) = translation.title {
            self.title = title;
        }
        if translation.subtitle.is_some() {
            self.subtitle = translation.subtitle;
        }
        if translation.description.is_some() {
            self.description = translation.description;
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductList {
    pub products: Vec<Product>,
    #[serde(default)]
    pub count: u64,
}

// =============================================================================
// Collection & Category Types
// =============================================================================

/// A merchandising collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub title: String,
    pub handle: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionList {
    pub collections: Vec<Collection>,
    #[serde(default)]
    pub count: u64,
}

/// A product category; categories form a tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub handle: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_category_id: Option<CategoryId>,
    #[serde(default)]
    pub category_children: Vec<Category>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryList {
    pub product_categories: Vec<Category>,
    #[serde(default)]
    pub count: u64,
}

// =============================================================================
// Cart Types
// =============================================================================

/// A line in a cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub title: String,
    pub quantity: u32,
    #[serde(default)]
    pub variant_id: Option<VariantId>,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub product_handle: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub unit_price: Decimal,
    #[serde(default)]
    pub total: Option<Decimal>,
}

/// A promotion applied to a cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartPromotion {
    pub id: String,
    #[serde(default)]
    pub code: Option<String>,
}

/// A backend cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    #[serde(default)]
    pub region_id: Option<RegionId>,
    pub currency_code: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub promotions: Vec<CartPromotion>,
    #[serde(default)]
    pub subtotal: Option<Decimal>,
    #[serde(default)]
    pub total: Option<Decimal>,
}

impl Cart {
    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartResponse {
    pub cart: Cart,
}

/// Response of a line-item deletion.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItemDeleteResponse {
    pub id: LineItemId,
    #[serde(default)]
    pub deleted: bool,
    pub parent: Cart,
}

// =============================================================================
// Payment Types
// =============================================================================

/// A payment provider enabled for a region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentProvider {
    pub id: String,
    #[serde(default = "default_true")]
    pub is_enabled: bool,
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentProviderList {
    pub payment_providers: Vec<PaymentProvider>,
    #[serde(default)]
    pub count: u64,
}
