use actix_cors::Cors;
use actix_files::Files;
use actix_web::http::header::ContentType;
use actix_web::{guard, web};
use std::path::PathBuf;

use crate::handlers;
use crate::utils::upload::PUBLIC_PREFIX;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/health")
            .route(web::get().to(handlers::health::health_check)),
    )
    .service(
        web::resource("/employees")
            .route(web::get().to(handlers::pages::employees_page)),
    )
    .service(
        web::resource("/api/new-users")
            .route(web::get().to(handlers::user::get_new_users)),
    )
    .service(
        web::resource("/api/all-users")
            .route(web::get().to(handlers::user::get_all_users)),
    )
    .service(
        web::resource("/api/add-employee")
            .app_data(web::JsonConfig::default().error_handler(handlers::employee::json_body_error))
            .app_data(web::FormConfig::default().error_handler(handlers::employee::form_body_error))
            .route(
                web::post()
                    .guard(content_type_is("application/json"))
                    .to(handlers::employee::add_employee_json),
            )
            .route(
                web::post()
                    .guard(content_type_is("application/x-www-form-urlencoded"))
                    .to(handlers::employee::add_employee_urlencoded),
            )
            .route(web::post().to(handlers::employee::add_employee)),
    )
    .service(
        web::resource("/api/employees")
            .route(web::get().to(handlers::employee::get_employees)),
    )
    .service(
        web::resource("/api/delete-employee/{id}")
            .route(web::delete().to(handlers::employee::delete_employee)),
    );
}

/// Matches on the media type only, so `; charset=...` parameters still route.
fn content_type_is(essence: &'static str) -> impl guard::Guard {
    guard::fn_guard(move |ctx| {
        ctx.header::<ContentType>()
            .map_or(false, |content_type| content_type.0.essence_str() == essence)
    })
}

/// Uploaded images under `/uploads`, then the public directory at the root.
/// Register after `configure` so the API routes win.
pub fn static_files(upload_dir: PathBuf, public_dir: PathBuf) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.service(Files::new(&format!("/{}", PUBLIC_PREFIX), upload_dir))
            .service(Files::new("/", public_dir).index_file("index.html"));
    }
}

pub fn cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}
