//! Categories API endpoints.

use api_types::category::{CategoryNew, CategoryView};
use axum::{Json, extract::State, http::StatusCode};
use engine::NewCategory;

use crate::{
    ServerError,
    extract::{ApiJson, ApiPath},
    server::ServerState,
};

fn map_category(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        icon: category.icon,
        color: category.color,
    }
}

pub async fn list(State(state): State<ServerState>) -> Json<Vec<CategoryView>> {
    Json(
        state
            .engine
            .categories()
            .await
            .into_iter()
            .map(map_category)
            .collect(),
    )
}

pub async fn get(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<CategoryView>, ServerError> {
    state
        .engine
        .category(id)
        .await
        .map(|category| Json(map_category(category)))
        .ok_or_else(|| ServerError::NotFound("Category not found".to_string()))
}

pub async fn create(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let category = state
        .engine
        .create_category(NewCategory::new(&payload.name, &payload.icon, &payload.color))
        .await?;
    Ok((StatusCode::CREATED, Json(map_category(category))))
}
