use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::catalog::{ProductView, RestaurantSummary, RestaurantWithProducts};
use crate::errors::AppError;
use crate::AppService;

// ── Response DTOs ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub postal_code: String,
    pub url: Option<String>,
    /// Decimal price as a string to avoid floating-point issues, e.g. "2.50"
    pub shipping_costs: String,
    pub average_service_minutes: Option<f64>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub availability: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantDetailResponse {
    #[serde(flatten)]
    pub restaurant: RestaurantResponse,
    pub products: Vec<ProductResponse>,
}

impl From<RestaurantSummary> for RestaurantResponse {
    fn from(restaurant: RestaurantSummary) -> Self {
        RestaurantResponse {
            id: restaurant.id,
            name: restaurant.name,
            description: restaurant.description,
            address: restaurant.address,
            postal_code: restaurant.postal_code,
            url: restaurant.url,
            shipping_costs: restaurant.shipping_costs.to_string(),
            average_service_minutes: restaurant.average_service_minutes,
            email: restaurant.email,
            phone: restaurant.phone,
        }
    }
}

impl From<ProductView> for ProductResponse {
    fn from(product: ProductView) -> Self {
        ProductResponse {
            id: product.id,
            restaurant_id: product.restaurant_id,
            name: product.name,
            description: product.description,
            price: product.price.to_string(),
            availability: product.availability,
        }
    }
}

impl From<RestaurantWithProducts> for RestaurantDetailResponse {
    fn from(detail: RestaurantWithProducts) -> Self {
        RestaurantDetailResponse {
            restaurant: detail.restaurant.into(),
            products: detail.products.into_iter().map(Into::into).collect(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /restaurants
///
/// Public listing of every restaurant, for the ordering apps to browse.
#[utoipa::path(
    get,
    path = "/restaurants",
    responses(
        (status = 200, description = "All restaurants", body = [RestaurantResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "restaurants"
)]
pub async fn list_restaurants(service: web::Data<AppService>) -> Result<HttpResponse, AppError> {
    let restaurants = web::block(move || service.list_restaurants())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<RestaurantResponse> = restaurants.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /restaurants/{id}
///
/// One restaurant with its product catalog, available and not.
#[utoipa::path(
    get,
    path = "/restaurants/{id}",
    params(
        ("id" = Uuid, Path, description = "Restaurant UUID"),
    ),
    responses(
        (status = 200, description = "Restaurant found", body = RestaurantDetailResponse),
        (status = 404, description = "Restaurant not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "restaurants"
)]
pub async fn get_restaurant(
    service: web::Data<AppService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let restaurant_id = path.into_inner();

    let detail = web::block(move || service.restaurant_detail(restaurant_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(RestaurantDetailResponse::from(detail)))
}
