use actix_multipart::{Field, Multipart};
use actix_web::error::{JsonPayloadError, UrlencodedError};
use actix_web::{web, HttpRequest, HttpResponse};
use futures_util::StreamExt;
use log::{debug, error, info};
use serde::Serialize;
use serde_json::json;

use crate::config::Config;
use crate::db::employees::{self, UpsertKind};
use crate::errors::{describe_db_error, is_unique_violation, AppError};
use crate::models::employee::EmployeeForm;
use crate::utils::upload::{PendingImage, UploadStore, PROFILE_IMAGE_FIELD};
use crate::utils::validation::validate_employee_form;

/// Cap on a single text field, matching common form-parser defaults.
const MAX_TEXT_FIELD_BYTES: usize = 1024 * 1024;

#[derive(Serialize)]
struct UpsertResponse {
    message: &'static str,
    profile_image: Option<String>,
}

fn map_multipart_error(err: actix_multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Invalid form data: {}", err))
}

async fn read_text_field(field: &mut Field) -> Result<String, AppError> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(map_multipart_error)?;
        if buf.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
            return Err(AppError::Validation("Field value too long".to_string()));
        }
        buf.extend_from_slice(&chunk);
    }
    String::from_utf8(buf).map_err(|_| AppError::Validation("Form fields must be UTF-8 text".to_string()))
}

async fn read_image_field(field: &mut Field, file_name: &str) -> Result<Option<PendingImage>, AppError> {
    let content_type = field.content_type().map(|mime| mime.essence_str().to_string());

    // Browsers submit an empty, nameless part when no file was picked. A
    // nameless part that does carry bytes goes through the usual checks.
    let mut image = if file_name.is_empty() {
        None
    } else {
        Some(PendingImage::begin(file_name, content_type.as_deref())?)
    };
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(map_multipart_error)?;
        if chunk.is_empty() {
            continue;
        }
        if image.is_none() {
            image = Some(PendingImage::begin(file_name, content_type.as_deref())?);
        }
        if let Some(image) = image.as_mut() {
            image.push_chunk(&chunk)?;
        }
    }
    Ok(image)
}

/// Drains the multipart body into the text form and at most one image.
pub async fn read_employee_form(
    mut payload: Multipart,
) -> Result<(EmployeeForm, Option<PendingImage>), AppError> {
    let mut form = EmployeeForm::default();
    let mut image: Option<PendingImage> = None;
    let mut image_seen = false;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(map_multipart_error)?;
        let disposition = field.content_disposition();
        let name = disposition.get_name().unwrap_or_default().to_string();
        let file_name = disposition.get_filename().map(|f| f.to_string());

        match file_name {
            Some(file_name) => {
                if name != PROFILE_IMAGE_FIELD || image_seen {
                    return Err(AppError::Upload("Unexpected field".to_string()));
                }
                image_seen = true;
                image = read_image_field(&mut field, &file_name).await?;
            }
            None => {
                let value = read_text_field(&mut field).await?;
                if !form.set(&name, value) {
                    debug!("Ignoring unknown form field {:?}", name);
                }
            }
        }
    }

    Ok((form, image))
}

pub async fn add_employee(
    pool: web::Data<sqlx::PgPool>,
    uploads: web::Data<UploadStore>,
    config: web::Data<Config>,
    payload: Multipart,
) -> Result<HttpResponse, actix_web::Error> {
    let (form, image) = read_employee_form(payload).await?;
    save_employee(&pool, &uploads, &config, form, image).await
}

/// Same upsert from a JSON body. No image can be attached this way.
pub async fn add_employee_json(
    pool: web::Data<sqlx::PgPool>,
    uploads: web::Data<UploadStore>,
    config: web::Data<Config>,
    form: web::Json<EmployeeForm>,
) -> Result<HttpResponse, actix_web::Error> {
    save_employee(&pool, &uploads, &config, form.into_inner(), None).await
}

/// Same upsert from an `application/x-www-form-urlencoded` body.
pub async fn add_employee_urlencoded(
    pool: web::Data<sqlx::PgPool>,
    uploads: web::Data<UploadStore>,
    config: web::Data<Config>,
    form: web::Form<EmployeeForm>,
) -> Result<HttpResponse, actix_web::Error> {
    save_employee(&pool, &uploads, &config, form.into_inner(), None).await
}

pub fn json_body_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(format!("Invalid form data: {}", err)).into()
}

pub fn form_body_error(err: UrlencodedError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(format!("Invalid form data: {}", err)).into()
}

/// Database errors from the upsert, with a duplicate key reported as a client error.
pub fn map_upsert_error(err: sqlx::Error) -> AppError {
    if is_unique_violation(&err) {
        return AppError::Conflict("Employee ID already exists".to_string());
    }
    AppError::from(err)
}

async fn save_employee(
    pool: &sqlx::PgPool,
    uploads: &UploadStore,
    config: &Config,
    form: EmployeeForm,
    image: Option<PendingImage>,
) -> Result<HttpResponse, actix_web::Error> {
    let new_employee = validate_employee_form(form)?;

    let profile_image = match &image {
        Some(image) => Some(uploads.persist(image).await?),
        None => None,
    };

    let outcome = match employees::upsert(
        pool,
        &new_employee,
        profile_image.as_deref(),
        config.image_policy,
    )
    .await
    {
        Ok(outcome) => outcome,
        Err(err) => {
            error!("Error in POST /api/add-employee: {}", describe_db_error(&err));
            if let Some(stored) = &profile_image {
                uploads.discard(stored).await;
            }
            return Err(map_upsert_error(err).into());
        }
    };

    match outcome.kind {
        UpsertKind::Created => {
            info!("Employee {} created", new_employee.id);
            Ok(HttpResponse::Created().json(UpsertResponse {
                message: "Employee added successfully",
                profile_image: outcome.profile_image,
            }))
        }
        UpsertKind::Updated => {
            info!("Employee {} updated", new_employee.id);
            Ok(HttpResponse::Ok().json(UpsertResponse {
                message: "Employee updated successfully",
                profile_image: outcome.profile_image,
            }))
        }
    }
}

pub async fn get_employees(
    pool: web::Data<sqlx::PgPool>,
) -> Result<HttpResponse, actix_web::Error> {
    let all_employees = employees::list(&pool).await.map_err(|err| {
        error!("Error in GET /api/employees: {}", describe_db_error(&err));
        AppError::from(err)
    })?;

    Ok(HttpResponse::Ok().json(all_employees))
}

pub async fn delete_employee(
    pool: web::Data<sqlx::PgPool>,
    id: web::Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    let id = id.into_inner();

    let removed = employees::delete(&pool, &id).await.map_err(|err| {
        error!("Error in DELETE /api/delete-employee: {}", describe_db_error(&err));
        AppError::from(err)
    })?;

    if removed == 0 {
        return Err(AppError::NotFound("Employee not found".to_string()).into());
    }

    info!("Employee {} deleted", id);
    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee deleted successfully",
    })))
}
