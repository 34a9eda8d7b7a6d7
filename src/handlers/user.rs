use actix_web::{web, HttpResponse};
use log::error;

use crate::db::users::{self, NewUserCursor};
use crate::errors::{describe_db_error, AppError};

pub async fn get_new_users(
    pool: web::Data<sqlx::PgPool>,
    cursor: web::Data<NewUserCursor>,
) -> Result<HttpResponse, actix_web::Error> {
    let new_users = users::list_new_since(&pool, &cursor).await.map_err(|e| {
        error!("Error in GET /api/new-users: {}", describe_db_error(&e));
        AppError::from(e)
    })?;

    Ok(HttpResponse::Ok().json(new_users))
}

pub async fn get_all_users(
    pool: web::Data<sqlx::PgPool>,
) -> Result<HttpResponse, actix_web::Error> {
    let all_users = users::list_all(&pool).await.map_err(|e| {
        error!("Error in GET /api/all-users: {}", describe_db_error(&e));
        AppError::from(e)
    })?;

    Ok(HttpResponse::Ok().json(all_users))
}
