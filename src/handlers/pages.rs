use actix_files::NamedFile;
use actix_web::web;

use crate::config::Config;

pub async fn employees_page(config: web::Data<Config>) -> actix_web::Result<NamedFile> {
    Ok(NamedFile::open_async(config.public_dir.join("employees.html")).await?)
}
