#[macro_use]
mod common;

use actix_web::http::{header, StatusCode};
use actix_web::test;

use common::{unreachable_pool, TestState};
use employee_directory_backend::config::ImagePolicy;
use employee_directory_backend::routes;

const ALLOWED_ORIGIN: &str = "http://127.0.0.1:5500";

/// The full app as `main` assembles it: CORS around the API and static mounts.
macro_rules! served_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(routes::cors(&$state.config.cors_allowed_origins))
                .app_data($state.pool.clone())
                .app_data($state.uploads.clone())
                .app_data($state.cursor.clone())
                .app_data($state.config.clone())
                .configure(routes::configure)
                .configure(routes::static_files(
                    $state.config.upload_dir.clone(),
                    $state.config.public_dir.clone(),
                )),
        )
        .await
    };
}

async fn state_with_files() -> TestState {
    let state = TestState::new(unreachable_pool(), ImagePolicy::Keep).await;
    std::fs::write(state.uploads.dir().join("x.png"), b"\x89PNG fake").unwrap();
    std::fs::write(
        state.config.public_dir.join("employees.html"),
        "<html><body>Employees</body></html>",
    )
    .unwrap();
    state
}

#[actix_web::test]
async fn uploads_are_served() {
    let state = state_with_files().await;
    let app = served_app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/uploads/x.png").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap(),
        "image/png"
    );
    assert_eq!(test::read_body(resp).await.as_ref(), b"\x89PNG fake");

    let resp = test::call_service(&app, test::TestRequest::get().uri("/uploads/missing.png").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn management_page_is_served() {
    let state = state_with_files().await;
    let app = served_app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/employees").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("Employees"));

    // The same file is also reachable through the public directory mount.
    let resp = test::call_service(&app, test::TestRequest::get().uri("/employees.html").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn allowed_origins_are_echoed() {
    let state = state_with_files().await;
    let app = served_app!(state);

    let req = test::TestRequest::get()
        .uri("/employees")
        .insert_header((header::ORIGIN, ALLOWED_ORIGIN))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        ALLOWED_ORIGIN
    );

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/api/add-employee")
        .insert_header((header::ORIGIN, ALLOWED_ORIGIN))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success(), "{}", resp.status());
    assert_eq!(
        resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        ALLOWED_ORIGIN
    );
}

#[actix_web::test]
async fn other_origins_get_no_cors_headers() {
    let state = state_with_files().await;
    let app = served_app!(state);

    let req = test::TestRequest::get()
        .uri("/employees")
        .insert_header((header::ORIGIN, "http://evil.example"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}
