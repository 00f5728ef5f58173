#[macro_use]
extern crate diesel;

mod account;
mod appointment;
mod booking;
mod database;
mod dispense;
mod ehr;
mod events;
mod models;
mod password;
mod protocol;
mod schema;
mod utils;

use actix_web::{web, App, HttpServer};
use diesel::r2d2::ConnectionManager;
use diesel::SqliteConnection;
use tracing::info;
use tracing_subscriber::EnvFilter;

type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let conn_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| "clinic.db".to_string());
    let manager = ConnectionManager::<SqliteConnection>::new(&conn_url);
    let pool = r2d2::Pool::builder()
        .build(manager)
        .expect("Failed to create pool");

    {
        let conn = pool.get().expect("Failed to get a connection");
        database::init::init_schema(&conn).expect("Failed to init schema");
        database::init::ensure_default_admin(&conn).expect("Failed to seed admin account");
    }

    let events = web::Data::new(events::EventBus::new());
    events.subscribe(|event| info!(?event, "notification"));

    let bind = std::env::var("CLINIC_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    info!(%bind, database = %conn_url, "clinic server starting");

    HttpServer::new(move || {
        App::new()
            .data(pool.clone())
            .app_data(events.clone())
            // management surface (the desktop forms)
            .service(web::scope("/manage/appointment").configure(appointment::config))
            .service(web::scope("/manage/account").configure(account::config))
            .service(web::scope("/manage/dispense").configure(dispense::config))
            // public surface
            .service(web::scope("/booking").configure(booking::config))
            .service(web::scope("/ehr").configure(ehr::config))
    })
    .bind(&bind)?
    .run()
    .await
}
