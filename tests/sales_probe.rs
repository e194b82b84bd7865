use chrono::NaiveDate;
use serde_json::json;
use wiremock::{
    matchers::{header, method, path},
    Mock, ResponseTemplate,
};

mod common;
use common::TestContext;

use portal_client::AppError;

async fn mount(ctx: &TestContext, route: &str, template: ResponseTemplate, calls: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(template)
        .expect(calls)
        .mount(&ctx.server)
        .await;
}

#[tokio::test]
async fn first_successful_path_wins_and_the_rest_are_skipped() {
    let ctx = TestContext::logged_in("tok-1").await;

    mount(&ctx, "/api/sales-integration/ventas-hoy/7", ResponseTemplate::new(500), 1).await;
    mount(
        &ctx,
        "/api/sales-integration/sales-today/7",
        ResponseTemplate::new(200).set_body_json(json!({ "total": 10 })),
        1,
    )
    .await;
    mount(&ctx, "/api/sales-integration/today/7", ResponseTemplate::new(200), 0).await;
    mount(&ctx, "/api/sales-integration/reporte-hoy/7", ResponseTemplate::new(200), 0).await;

    let today = ctx.state.sales_service.sales_today(7).await.unwrap();
    assert_eq!(today.path, "/sales-integration/sales-today/7");
    assert_eq!(today.payload, json!({ "total": 10 }));
}

#[tokio::test]
async fn unauthorized_stops_probing() {
    let ctx = TestContext::logged_in("tok-1").await;

    mount(&ctx, "/api/sales-integration/ventas-hoy/7", ResponseTemplate::new(401), 1).await;
    mount(&ctx, "/api/sales-integration/sales-today/7", ResponseTemplate::new(200), 0).await;

    let err = ctx.state.sales_service.sales_today(7).await.unwrap_err();
    assert!(err.is_session_expired());
    assert_eq!(ctx.state.session.token().await.unwrap(), None);
}

#[tokio::test]
async fn all_paths_failing_returns_the_last_error() {
    let ctx = TestContext::logged_in("tok-1").await;

    mount(&ctx, "/api/sales-integration/ventas-hoy/7", ResponseTemplate::new(404), 1).await;
    mount(&ctx, "/api/sales-integration/sales-today/7", ResponseTemplate::new(404), 1).await;
    mount(&ctx, "/api/sales-integration/today/7", ResponseTemplate::new(404), 1).await;
    mount(
        &ctx,
        "/api/sales-integration/reporte-hoy/7",
        ResponseTemplate::new(503).set_body_json(json!({ "message": "Sincronizando" })),
        1,
    )
    .await;

    let err = ctx.state.sales_service.sales_today(7).await.unwrap_err();
    assert!(matches!(err, AppError::Server { status: 503, .. }));
    assert_eq!(err.user_message(), "Sincronizando");
}

#[tokio::test]
async fn report_detail_for_a_day() {
    let ctx = TestContext::logged_in("tok-1").await;

    Mock::given(method("GET"))
        .and(path("/api/sales-integration/reporte/7/2024-03-02"))
        .and(header("Authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "reporte": { "fecha": "2024-03-02", "total_ventas": "99.5", "numero_ventas": "3" }
        })))
        .mount(&ctx.server)
        .await;

    let fecha = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
    let report = ctx.state.sales_service.report_detail(7, fecha).await.unwrap().unwrap();
    assert_eq!(report.total_ventas, 99.5);
    assert_eq!(report.numero_ventas, 3.0);
}

#[tokio::test]
async fn request_sync_needs_a_session() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/api/sales-integration/request-sync/7"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.server)
        .await;

    let err = ctx.state.sales_service.request_sync(7).await.unwrap_err();
    assert!(matches!(err, AppError::MissingToken));
}
