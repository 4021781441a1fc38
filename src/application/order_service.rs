use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::analytics::RestaurantAnalytics;
use crate::domain::catalog::{ProductView, RestaurantSummary, RestaurantWithProducts};
use crate::domain::errors::DomainError;
use crate::domain::filter::OrderFilter;
use crate::domain::order::{
    LifecycleEvent, LineDraft, NewOrderLineRecord, NewOrderRecord, OrderChanges, OrderDetail,
    OrderDraft, OrderUpdate, OrderView,
};
use crate::domain::ports::{CatalogReader, OrderRepository};
use crate::domain::pricing;

/// Orchestrates the order core: validation first (reject before any
/// transaction opens), then pricing, then the repository transaction.
pub struct OrderService<S> {
    store: S,
}

impl<S: OrderRepository + CatalogReader> OrderService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    // ── Restaurant catalog (read-only) ───────────────────────────────────────

    pub fn list_restaurants(&self) -> Result<Vec<RestaurantSummary>, DomainError> {
        self.store.list_restaurants()
    }

    pub fn restaurant_detail(&self, id: Uuid) -> Result<RestaurantWithProducts, DomainError> {
        self.store
            .restaurant_with_products(id)?
            .ok_or(DomainError::NotFound)
    }

    // ── Order mutations ──────────────────────────────────────────────────────

    pub fn create_order(
        &self,
        customer_id: Uuid,
        draft: OrderDraft,
    ) -> Result<OrderDetail, DomainError> {
        let mut failures = Vec::new();

        let address = normalized_address(&draft.address, &mut failures);
        let restaurant = self.store.restaurant_by_id(draft.restaurant_id)?;
        if restaurant.is_none() {
            failures.push("The restaurant does not exist".to_string());
        }

        let products = self.resolve_products(&draft.lines, &mut failures)?;
        check_lines(
            &draft.lines,
            &products,
            restaurant.as_ref().map(|r| r.id),
            "the restaurant",
            &mut failures,
        );

        let Some(restaurant) = restaurant else {
            return Err(DomainError::Validation(failures));
        };
        if !failures.is_empty() {
            return Err(DomainError::Validation(failures));
        }

        let lines = priced_lines(&draft.lines, &products);
        let quote = pricing::quote_order(&lines, &restaurant.shipping_costs);

        self.store.create(NewOrderRecord {
            customer_id,
            restaurant_id: restaurant.id,
            address,
            price: quote.total,
            shipping_costs: quote.shipping_costs,
            lines,
        })
    }

    pub fn update_order(
        &self,
        customer_id: Uuid,
        order_id: Uuid,
        update: OrderUpdate,
    ) -> Result<OrderDetail, DomainError> {
        let header = self
            .store
            .find_header(order_id)?
            .ok_or(DomainError::NotFound)?;
        if header.customer_id != customer_id {
            return Err(DomainError::Forbidden);
        }
        // First enforcement layer; the repository re-checks inside the
        // transaction.
        if !header.status().is_pending() {
            return Err(DomainError::conflict(
                "Order cannot be modified as it is already in progress",
            ));
        }

        let mut failures = Vec::new();
        if update.restaurant_id.is_some() {
            failures.push("The restaurant of an existing order cannot be changed".to_string());
        }
        let address = normalized_address(&update.address, &mut failures);

        let products = self.resolve_products(&update.lines, &mut failures)?;
        check_lines(
            &update.lines,
            &products,
            Some(header.restaurant_id),
            "the original restaurant",
            &mut failures,
        );
        if !failures.is_empty() {
            return Err(DomainError::Validation(failures));
        }

        let restaurant = self
            .store
            .restaurant_by_id(header.restaurant_id)?
            .ok_or_else(|| {
                DomainError::internal(format!(
                    "restaurant {} referenced by order {} is missing",
                    header.restaurant_id, order_id
                ))
            })?;

        let lines = priced_lines(&update.lines, &products);
        let quote = pricing::quote_order(&lines, &restaurant.shipping_costs);

        self.store.update(
            order_id,
            OrderChanges {
                address,
                price: quote.total,
                shipping_costs: quote.shipping_costs,
                lines,
            },
        )
    }

    pub fn delete_order(&self, customer_id: Uuid, order_id: Uuid) -> Result<(), DomainError> {
        let header = self
            .store
            .find_header(order_id)?
            .ok_or(DomainError::NotFound)?;
        if header.customer_id != customer_id {
            return Err(DomainError::Forbidden);
        }
        if !header.status().is_pending() {
            return Err(DomainError::conflict(
                "Cannot delete an order that is already in progress",
            ));
        }
        self.store.delete(order_id)
    }

    // ── State transitions ────────────────────────────────────────────────────

    pub fn confirm_order(&self, order_id: Uuid) -> Result<OrderView, DomainError> {
        self.store
            .apply_transition(order_id, LifecycleEvent::Confirm, Utc::now())
    }

    pub fn send_order(&self, order_id: Uuid) -> Result<OrderView, DomainError> {
        self.store
            .apply_transition(order_id, LifecycleEvent::Send, Utc::now())
    }

    pub fn deliver_order(&self, order_id: Uuid) -> Result<OrderView, DomainError> {
        self.store
            .apply_transition(order_id, LifecycleEvent::Deliver, Utc::now())
    }

    // ── Reads ────────────────────────────────────────────────────────────────

    /// Full detail. `requester` scopes the read to the owning customer; staff
    /// reads pass `None`.
    pub fn order_detail(
        &self,
        order_id: Uuid,
        requester: Option<Uuid>,
    ) -> Result<OrderDetail, DomainError> {
        let detail = self
            .store
            .find_by_id(order_id)?
            .ok_or(DomainError::NotFound)?;
        if let Some(customer_id) = requester {
            if detail.order.customer_id != customer_id {
                return Err(DomainError::Forbidden);
            }
        }
        Ok(detail)
    }

    pub fn customer_orders(
        &self,
        customer_id: Uuid,
        filter: &OrderFilter,
    ) -> Result<Vec<OrderDetail>, DomainError> {
        self.store.list_for_customer(customer_id, filter)
    }

    pub fn restaurant_orders(
        &self,
        restaurant_id: Uuid,
        filter: &OrderFilter,
    ) -> Result<Vec<OrderDetail>, DomainError> {
        self.store.list_for_restaurant(restaurant_id, filter)
    }

    pub fn restaurant_analytics(
        &self,
        restaurant_id: Uuid,
    ) -> Result<RestaurantAnalytics, DomainError> {
        if self.store.restaurant_by_id(restaurant_id)?.is_none() {
            return Err(DomainError::NotFound);
        }
        self.store.analytics(restaurant_id, Utc::now())
    }

    // ── Validation helpers ───────────────────────────────────────────────────

    fn resolve_products(
        &self,
        lines: &[LineDraft],
        failures: &mut Vec<String>,
    ) -> Result<HashMap<Uuid, ProductView>, DomainError> {
        if lines.is_empty() {
            failures.push("The array of products is empty".to_string());
            return Ok(HashMap::new());
        }
        let ids: Vec<Uuid> = lines.iter().map(|l| l.product_id).collect();
        let products = self.store.products_by_ids(&ids)?;
        Ok(products.into_iter().map(|p| (p.id, p)).collect())
    }
}

fn normalized_address(raw: &str, failures: &mut Vec<String>) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().count() > 255 {
        failures.push("The address must be between 1 and 255 characters".to_string());
    }
    trimmed.to_string()
}

fn check_lines(
    lines: &[LineDraft],
    products: &HashMap<Uuid, ProductView>,
    restaurant_id: Option<Uuid>,
    restaurant_scope: &str,
    failures: &mut Vec<String>,
) {
    for line in lines {
        if line.quantity < 1 {
            failures.push(format!(
                "The quantity for product {} must be at least 1",
                line.product_id
            ));
        }
        match products.get(&line.product_id) {
            None => failures.push(format!("The product {} does not exist", line.product_id)),
            Some(product) => {
                if !product.availability {
                    failures.push(format!("The product {} is not available", product.id));
                }
                if let Some(restaurant_id) = restaurant_id {
                    if product.restaurant_id != restaurant_id {
                        failures.push(format!(
                            "The product {} does not belong to {}",
                            product.id, restaurant_scope
                        ));
                    }
                }
            }
        }
    }
}

/// Join request lines with their resolved products, capturing each product's
/// current price as the line's unit price. Only called after validation, so
/// every product is present.
fn priced_lines(
    lines: &[LineDraft],
    products: &HashMap<Uuid, ProductView>,
) -> Vec<NewOrderLineRecord> {
    lines
        .iter()
        .filter_map(|line| {
            products.get(&line.product_id).map(|p| NewOrderLineRecord {
                product_id: p.id,
                quantity: line.quantity,
                unit_price: p.price.clone(),
            })
        })
        .collect()
}
