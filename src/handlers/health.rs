use actix_web::{web, HttpResponse};
use log::error;
use serde_json::json;

use crate::db;
use crate::errors::describe_db_error;

pub async fn health_check(pool: web::Data<sqlx::PgPool>) -> HttpResponse {
    match db::health_check(&pool).await {
        Ok(()) => HttpResponse::Ok().json(json!({ "status": "Database connection OK" })),
        Err(e) => {
            error!("Health check error: {}", describe_db_error(&e));
            HttpResponse::InternalServerError().json(json!({
                "error": "Database connection failed",
                "details": e.to_string(),
            }))
        }
    }
}
