pub mod application;
pub mod auth;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::order_service::OrderService;
use infrastructure::order_repo::DieselOrderRepository;

pub use db::{create_pool, DbPool};

/// The concrete service handlers resolve from app data.
pub type AppService = OrderService<DieselOrderRepository>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::orders::create_order,
        handlers::orders::list_my_orders,
        handlers::orders::get_order,
        handlers::orders::update_order,
        handlers::orders::delete_order,
        handlers::orders::confirm_order,
        handlers::orders::send_order,
        handlers::orders::deliver_order,
        handlers::orders::restaurant_orders,
        handlers::orders::restaurant_analytics,
        handlers::restaurants::list_restaurants,
        handlers::restaurants::get_restaurant,
    ),
    components(schemas(
        handlers::orders::OrderLineRequest,
        handlers::orders::CreateOrderRequest,
        handlers::orders::UpdateOrderRequest,
        handlers::orders::OrderLineResponse,
        handlers::orders::OrderResponse,
        handlers::orders::AnalyticsResponse,
        handlers::restaurants::RestaurantResponse,
        handlers::restaurants::ProductResponse,
        handlers::restaurants::RestaurantDetailResponse,
    )),
    tags(
        (name = "orders", description = "Customer ordering and staff fulfilment"),
        (name = "restaurants", description = "Public restaurant catalog"),
        (name = "analytics", description = "Restaurant dashboard counters"),
    )
)]
pub struct ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        let service = web::Data::new(AppService::new(DieselOrderRepository::new(pool.clone())));
        App::new()
            .app_data(service)
            .wrap(Logger::default())
            .service(
                web::scope("/orders")
                    .route("", web::post().to(handlers::orders::create_order))
                    .route("", web::get().to(handlers::orders::list_my_orders))
                    .route("/{id}", web::get().to(handlers::orders::get_order))
                    .route("/{id}", web::put().to(handlers::orders::update_order))
                    .route("/{id}", web::delete().to(handlers::orders::delete_order))
                    .route(
                        "/{id}/confirm",
                        web::patch().to(handlers::orders::confirm_order),
                    )
                    .route("/{id}/send", web::patch().to(handlers::orders::send_order))
                    .route(
                        "/{id}/deliver",
                        web::patch().to(handlers::orders::deliver_order),
                    ),
            )
            .service(
                web::scope("/restaurants")
                    .route("", web::get().to(handlers::restaurants::list_restaurants))
                    .route(
                        "/{id}",
                        web::get().to(handlers::restaurants::get_restaurant),
                    )
                    .route(
                        "/{id}/orders",
                        web::get().to(handlers::orders::restaurant_orders),
                    )
                    .route(
                        "/{id}/analytics",
                        web::get().to(handlers::orders::restaurant_analytics),
                    ),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
