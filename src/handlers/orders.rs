use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{AuthenticatedUser, Role};
use crate::domain::analytics::RestaurantAnalytics;
use crate::domain::filter::{OrderFilter, StatusFilter};
use crate::domain::order::{
    LineDraft, OrderDetail, OrderDraft, OrderLineView, OrderUpdate, OrderView,
};
use crate::errors::AppError;
use crate::handlers::restaurants::RestaurantResponse;
use crate::AppService;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderLineRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub restaurant_id: Uuid,
    pub address: String,
    pub products: Vec<OrderLineRequest>,
}

/// Update payload. `restaurant_id` is accepted so the validation layer can
/// reject it with a reason; orders never move between restaurants.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub restaurant_id: Option<Uuid>,
    pub address: String,
    pub products: Vec<OrderLineRequest>,
}

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<StatusFilter>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub unit_price: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub restaurant_id: Uuid,
    pub status: String,
    pub address: String,
    pub price: String,
    pub shipping_costs: String,
    pub started_at: Option<String>,
    pub sent_at: Option<String>,
    pub delivered_at: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<RestaurantResponse>,
    pub products: Vec<OrderLineResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyticsResponse {
    pub restaurant_id: Uuid,
    pub num_yesterday_orders: i64,
    pub num_pending_orders: i64,
    pub num_delivered_today_orders: i64,
    pub invoiced_today: String,
}

impl OrderLineRequest {
    fn into_line(self) -> LineDraft {
        LineDraft {
            product_id: self.product_id,
            quantity: self.quantity,
        }
    }
}

impl CreateOrderRequest {
    fn into_draft(self) -> OrderDraft {
        OrderDraft {
            restaurant_id: self.restaurant_id,
            address: self.address,
            lines: self
                .products
                .into_iter()
                .map(OrderLineRequest::into_line)
                .collect(),
        }
    }
}

impl UpdateOrderRequest {
    fn into_update(self) -> OrderUpdate {
        OrderUpdate {
            restaurant_id: self.restaurant_id,
            address: self.address,
            lines: self
                .products
                .into_iter()
                .map(OrderLineRequest::into_line)
                .collect(),
        }
    }
}

impl From<OrderListQuery> for OrderFilter {
    fn from(query: OrderListQuery) -> Self {
        OrderFilter {
            status: query.status,
            from: query.from,
            to: query.to,
        }
    }
}

impl From<OrderLineView> for OrderLineResponse {
    fn from(line: OrderLineView) -> Self {
        OrderLineResponse {
            id: line.id,
            product_id: line.product_id,
            product_name: line.product_name,
            quantity: line.quantity,
            unit_price: line.unit_price.to_string(),
        }
    }
}

impl From<OrderView> for OrderResponse {
    fn from(view: OrderView) -> Self {
        OrderResponse {
            id: view.id,
            customer_id: view.customer_id,
            restaurant_id: view.restaurant_id,
            status: view.status().to_string(),
            address: view.address,
            price: view.price.to_string(),
            shipping_costs: view.shipping_costs.to_string(),
            started_at: view.started_at.map(|t| t.to_rfc3339()),
            sent_at: view.sent_at.map(|t| t.to_rfc3339()),
            delivered_at: view.delivered_at.map(|t| t.to_rfc3339()),
            created_at: view.created_at.to_rfc3339(),
            restaurant: None,
            products: vec![],
        }
    }
}

impl From<OrderDetail> for OrderResponse {
    fn from(detail: OrderDetail) -> Self {
        let mut response = OrderResponse::from(detail.order);
        response.restaurant = detail.restaurant.map(RestaurantResponse::from);
        response.products = detail.lines.into_iter().map(Into::into).collect();
        response
    }
}

impl From<RestaurantAnalytics> for AnalyticsResponse {
    fn from(analytics: RestaurantAnalytics) -> Self {
        AnalyticsResponse {
            restaurant_id: analytics.restaurant_id,
            num_yesterday_orders: analytics.num_yesterday_orders,
            num_pending_orders: analytics.num_pending_orders,
            num_delivered_today_orders: analytics.num_delivered_today_orders,
            invoiced_today: analytics.invoiced_today.to_string(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Creates an order for the authenticated customer. The request is validated
/// as a whole (all failures are reported together), priced server-side, and
/// persisted atomically with its lines.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = OrderResponse),
        (status = 401, description = "Missing or malformed identity headers"),
        (status = 403, description = "Caller is not a customer"),
        (status = 422, description = "Validation failed"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<AppService>,
    user: AuthenticatedUser,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    user.require_customer()?;
    let draft = body.into_inner().into_draft();

    let detail = web::block(move || service.create_order(user.id, draft))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(OrderResponse::from(detail)))
}

/// GET /orders
///
/// Lists the authenticated customer's own orders, newest first, with the
/// restaurant expanded. Supports `status`, `from` and `to` query filters.
#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("status" = Option<String>, Query, description = "pending | in process | sent | delivered"),
        ("from" = Option<String>, Query, description = "Creation date lower bound, e.g. 2025-08-18"),
        ("to" = Option<String>, Query, description = "Creation date upper bound (inclusive day)"),
    ),
    responses(
        (status = 200, description = "The customer's orders", body = [OrderResponse]),
        (status = 401, description = "Missing or malformed identity headers"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_my_orders(
    service: web::Data<AppService>,
    user: AuthenticatedUser,
    query: web::Query<OrderListQuery>,
) -> Result<HttpResponse, AppError> {
    user.require_customer()?;
    let filter: OrderFilter = query.into_inner().into();

    let details = web::block(move || service.customer_orders(user.id, &filter))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let orders: Vec<OrderResponse> = details.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(orders))
}

/// GET /orders/{id}
///
/// Full order detail with restaurant and product expansions. Customers only
/// see their own orders; owners see any.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 401, description = "Missing or malformed identity headers"),
        (status = 403, description = "Order belongs to another customer"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<AppService>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let requester = match user.role {
        Role::Customer => Some(user.id),
        Role::Owner => None,
    };

    let detail = web::block(move || service.order_detail(order_id, requester))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(detail)))
}

/// PUT /orders/{id}
///
/// Replaces the address and the full product set of a pending order and
/// re-prices it. Conflicts once the restaurant has started preparation.
#[utoipa::path(
    put,
    path = "/orders/{id}",
    request_body = UpdateOrderRequest,
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 401, description = "Missing or malformed identity headers"),
        (status = 403, description = "Order belongs to another customer"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order is no longer pending"),
        (status = 422, description = "Validation failed"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn update_order(
    service: web::Data<AppService>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    user.require_customer()?;
    let order_id = path.into_inner();
    let update = body.into_inner().into_update();

    let detail = web::block(move || service.update_order(user.id, order_id, update))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(detail)))
}

/// DELETE /orders/{id}
///
/// Deletes a pending order and its lines. Conflicts once the restaurant has
/// started preparation.
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order deleted"),
        (status = 401, description = "Missing or malformed identity headers"),
        (status = 403, description = "Order belongs to another customer"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order is no longer pending"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn delete_order(
    service: web::Data<AppService>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    user.require_customer()?;
    let order_id = path.into_inner();

    web::block(move || service.delete_order(user.id, order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Successfully deleted order {order_id}")
    })))
}

/// PATCH /orders/{id}/confirm
///
/// Restaurant accepts a pending order and starts preparing it.
#[utoipa::path(
    patch,
    path = "/orders/{id}/confirm",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order confirmed", body = OrderResponse),
        (status = 401, description = "Missing or malformed identity headers"),
        (status = 403, description = "Caller is not an owner"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order is not pending"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn confirm_order(
    service: web::Data<AppService>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    user.require_owner()?;
    let order_id = path.into_inner();

    let view = web::block(move || service.confirm_order(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(view)))
}

/// PATCH /orders/{id}/send
///
/// Marks an in-process order as on its way to the customer.
#[utoipa::path(
    patch,
    path = "/orders/{id}/send",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order sent", body = OrderResponse),
        (status = 401, description = "Missing or malformed identity headers"),
        (status = 403, description = "Caller is not an owner"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order is not in process"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn send_order(
    service: web::Data<AppService>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    user.require_owner()?;
    let order_id = path.into_inner();

    let view = web::block(move || service.send_order(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(view)))
}

/// PATCH /orders/{id}/deliver
///
/// Marks a sent order as delivered and refreshes the restaurant's average
/// service time.
#[utoipa::path(
    patch,
    path = "/orders/{id}/deliver",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order delivered", body = OrderResponse),
        (status = 401, description = "Missing or malformed identity headers"),
        (status = 403, description = "Caller is not an owner"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order is not sent"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn deliver_order(
    service: web::Data<AppService>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    user.require_owner()?;
    let order_id = path.into_inner();

    let view = web::block(move || service.deliver_order(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(view)))
}

/// GET /restaurants/{id}/orders
///
/// Lists a restaurant's incoming orders for its staff, with the same
/// `status`/`from`/`to` filters as the customer listing.
#[utoipa::path(
    get,
    path = "/restaurants/{id}/orders",
    params(
        ("id" = Uuid, Path, description = "Restaurant UUID"),
        ("status" = Option<String>, Query, description = "pending | in process | sent | delivered"),
        ("from" = Option<String>, Query, description = "Creation date lower bound, e.g. 2025-08-18"),
        ("to" = Option<String>, Query, description = "Creation date upper bound (inclusive day)"),
    ),
    responses(
        (status = 200, description = "The restaurant's orders", body = [OrderResponse]),
        (status = 401, description = "Missing or malformed identity headers"),
        (status = 403, description = "Caller is not an owner"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn restaurant_orders(
    service: web::Data<AppService>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    query: web::Query<OrderListQuery>,
) -> Result<HttpResponse, AppError> {
    user.require_owner()?;
    let restaurant_id = path.into_inner();
    let filter: OrderFilter = query.into_inner().into();

    let details = web::block(move || service.restaurant_orders(restaurant_id, &filter))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let orders: Vec<OrderResponse> = details.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(orders))
}

/// GET /restaurants/{id}/analytics
///
/// Daily dashboard counters for a restaurant: yesterday's order count,
/// current pending count, today's delivered count and today's invoiced total.
#[utoipa::path(
    get,
    path = "/restaurants/{id}/analytics",
    params(
        ("id" = Uuid, Path, description = "Restaurant UUID"),
    ),
    responses(
        (status = 200, description = "Dashboard counters", body = AnalyticsResponse),
        (status = 401, description = "Missing or malformed identity headers"),
        (status = 403, description = "Caller is not an owner"),
        (status = 404, description = "Restaurant not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "analytics"
)]
pub async fn restaurant_analytics(
    service: web::Data<AppService>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    user.require_owner()?;
    let restaurant_id = path.into_inner();

    let analytics = web::block(move || service.restaurant_analytics(restaurant_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(AnalyticsResponse::from(analytics)))
}
