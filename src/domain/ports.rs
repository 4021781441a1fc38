use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::analytics::RestaurantAnalytics;
use super::catalog::{ProductView, RestaurantSummary, RestaurantWithProducts};
use super::errors::DomainError;
use super::filter::OrderFilter;
use super::order::{LifecycleEvent, NewOrderRecord, OrderChanges, OrderDetail, OrderView};

/// Read-only access to the restaurant/product catalog. The order core never
/// writes these entities; a separate staff surface owns them.
pub trait CatalogReader: Send + Sync + 'static {
    fn list_restaurants(&self) -> Result<Vec<RestaurantSummary>, DomainError>;

    fn restaurant_by_id(&self, id: Uuid) -> Result<Option<RestaurantSummary>, DomainError>;

    fn restaurant_with_products(
        &self,
        id: Uuid,
    ) -> Result<Option<RestaurantWithProducts>, DomainError>;

    /// Resolve the requested product ids; unknown ids are simply missing from
    /// the result, which is how the validation layer detects them.
    fn products_by_ids(&self, ids: &[Uuid]) -> Result<Vec<ProductView>, DomainError>;
}

/// Persistence for orders and their lines. Every mutation is a single
/// transaction: all rows commit or none do.
pub trait OrderRepository: Send + Sync + 'static {
    fn create(&self, record: NewOrderRecord) -> Result<OrderDetail, DomainError>;

    /// Replace-by-full-set: drops every existing line and inserts the new
    /// set. Conflicts unless the order is still pending.
    fn update(&self, order_id: Uuid, changes: OrderChanges) -> Result<OrderDetail, DomainError>;

    /// Deletes the order; lines go with it via the storage-level cascade.
    /// Conflicts unless the order is still pending.
    fn delete(&self, order_id: Uuid) -> Result<(), DomainError>;

    /// Header only, no expansions. Used for pre-mutation checks.
    fn find_header(&self, order_id: Uuid) -> Result<Option<OrderView>, DomainError>;

    /// Full detail with restaurant and line/product expansion.
    fn find_by_id(&self, order_id: Uuid) -> Result<Option<OrderDetail>, DomainError>;

    fn list_for_restaurant(
        &self,
        restaurant_id: Uuid,
        filter: &OrderFilter,
    ) -> Result<Vec<OrderDetail>, DomainError>;

    /// Customer's own orders, newest first, restaurant expanded.
    fn list_for_customer(
        &self,
        customer_id: Uuid,
        filter: &OrderFilter,
    ) -> Result<Vec<OrderDetail>, DomainError>;

    /// Stamps the event's timestamp if the order is in the right stage; on
    /// delivery also recomputes the restaurant's average service duration.
    fn apply_transition(
        &self,
        order_id: Uuid,
        event: LifecycleEvent,
        now: DateTime<Utc>,
    ) -> Result<OrderView, DomainError>;

    fn analytics(
        &self,
        restaurant_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<RestaurantAnalytics, DomainError>;
}
