use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};
use std::process;

use employee_directory_backend::config::Config;
use employee_directory_backend::db::{self, users::NewUserCursor};
use employee_directory_backend::errors::describe_db_error;
use employee_directory_backend::routes;
use employee_directory_backend::utils::upload::UploadStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().unwrap_or_else(|e| {
        error!("Configuration error: {}", e);
        process::exit(1);
    });

    // Initialize the database pool
    let pool = db::create_pool(&config.database).await.unwrap_or_else(|e| {
        error!("Database connection error: {}", describe_db_error(&e));
        process::exit(1);
    });

    // The schema must be verified before any request touches employees
    if let Err(e) = db::schema::bootstrap(&pool).await {
        error!("Error initializing database: {}", describe_db_error(&e));
        process::exit(1);
    }

    let uploads = UploadStore::init(config.upload_dir.clone()).await?;
    let cursor = web::Data::new(NewUserCursor::starting_now());
    let pool = web::Data::new(pool);
    let uploads = web::Data::new(uploads);
    let bind_addr = (config.host.clone(), config.port);
    let config = web::Data::new(config);

    info!("Employee server running on {}:{}", bind_addr.0, bind_addr.1);

    // Start the HTTP server
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(routes::cors(&config.cors_allowed_origins))
            .app_data(pool.clone())
            .app_data(uploads.clone())
            .app_data(cursor.clone())
            .app_data(config.clone())
            .configure(routes::configure)
            .configure(routes::static_files(
                config.upload_dir.clone(),
                config.public_dir.clone(),
            ))
    })
    .bind(bind_addr)?
    .run()
    .await
}
