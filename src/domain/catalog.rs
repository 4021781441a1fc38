use bigdecimal::BigDecimal;
use uuid::Uuid;

/// Restaurant fields the order core and the customer app need; the staff
/// management surface owns the rest.
#[derive(Debug, Clone)]
pub struct RestaurantSummary {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub postal_code: String,
    pub url: Option<String>,
    /// Default delivery fee, waived above the free-shipping threshold.
    pub shipping_costs: BigDecimal,
    /// Mean minutes from creation to delivery over all delivered orders;
    /// `None` until the first delivery.
    pub average_service_minutes: Option<f64>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Product as the order core sees it: read-only, priced, flagged available
/// or not.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub availability: bool,
}

#[derive(Debug, Clone)]
pub struct RestaurantWithProducts {
    pub restaurant: RestaurantSummary,
    pub products: Vec<ProductView>,
}
