use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_categories(ctx: &TestContext) {
    let response = ctx.client.get("/api/categories").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.body.as_ref().unwrap(),
        &json!([
            { "id": 1, "name": "Soup" },
            { "id": 2, "name": "Dessert" },
            { "id": 3, "name": "Salad" }
        ])
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_surface_category_backend_failure(ctx: &TestContext) {
    ctx.provider.fail_categories();

    let response = ctx.client.get("/api/categories").await.unwrap();

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_error_message("backend unavailable");
}
