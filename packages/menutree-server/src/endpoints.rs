//! Menu endpoints.
//!
//! - `GET /api/ping`
//! - `GET /api/menus` - whole forest
//! - `POST /api/menus`
//! - `GET /api/menus/:id` - node with its subtree
//! - `PUT /api/menus/:id`
//! - `DELETE /api/menus/:id` - node and subtree
//! - `PATCH /api/menus/:id/move`
//! - `PATCH /api/menus/:id/reorder`
//!
//! Each handler holds the tree lock for its whole read-validate-write sequence.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch},
    Router,
};
use serde::Serialize;

use menutree_core::{
    CreateMenu, Error, MenuId, MenuNode, MenuView, MoveMenu, ReorderMenu, UpdateMenu,
};

use crate::http_error::ApiError;
use crate::AppState;

/// Success envelope.
#[derive(Debug, Serialize)]
pub struct Data<T> {
    pub data: T,
}

impl<T> Data<T> {
    fn json(data: T) -> Json<Self> {
        Json(Self { data })
    }
}

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub message: String,
}

type ApiResult<T> = Result<Json<Data<T>>, ApiError>;

async fn ping(State(state): State<AppState>) -> Json<PingResponse> {
    Json(PingResponse {
        message: state.ping_message.to_string(),
    })
}

async fn list_menus(State(state): State<AppState>) -> ApiResult<Vec<MenuView>> {
    let tree = state.tree.lock().await;
    Ok(Data::json(tree.list_as_tree()?))
}

async fn get_menu(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<MenuView> {
    let id = MenuId::from(id);
    let tree = state.tree.lock().await;
    let view = tree
        .get_with_children(&id)?
        .ok_or(Error::NotFound(id))?;
    Ok(Data::json(view))
}

async fn create_menu(
    State(state): State<AppState>,
    payload: Result<Json<CreateMenu>, JsonRejection>,
) -> Result<(StatusCode, Json<Data<MenuNode>>), ApiError> {
    let Json(input) = payload?;
    input.validate()?;
    let mut tree = state.tree.lock().await;
    let created = tree.create(input)?;
    Ok((StatusCode::CREATED, Data::json(created)))
}

async fn update_menu(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateMenu>, JsonRejection>,
) -> ApiResult<MenuNode> {
    let Json(input) = payload?;
    input.validate()?;
    let mut tree = state.tree.lock().await;
    Ok(Data::json(tree.update(&MenuId::from(id), input)?))
}

async fn delete_menu(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = MenuId::from(id);
    let mut tree = state.tree.lock().await;
    if tree.delete(&id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::NotFound(id).into())
    }
}

async fn move_menu(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<MoveMenu>, JsonRejection>,
) -> ApiResult<MenuNode> {
    let Json(input) = payload?;
    input.validate()?;
    let mut tree = state.tree.lock().await;
    Ok(Data::json(tree.move_node(&MenuId::from(id), input.parent_id)?))
}

async fn reorder_menu(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ReorderMenu>, JsonRejection>,
) -> ApiResult<MenuNode> {
    let Json(input) = payload?;
    input.validate()?;
    let mut tree = state.tree.lock().await;
    Ok(Data::json(tree.reorder(&MenuId::from(id), input.position())?))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/ping", get(ping))
        .route("/api/menus", get(list_menus).post(create_menu))
        .route(
            "/api/menus/:id",
            get(get_menu).put(update_menu).delete(delete_menu),
        )
        .route("/api/menus/:id/move", patch(move_menu))
        .route("/api/menus/:id/reorder", patch(reorder_menu))
        .with_state(state)
}
