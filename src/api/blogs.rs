//! Blog endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::api::middleware::OptionalUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::infrastructure::services::{
    BlogStatsView, BlogView, CreateBlogRequest, UpdateBlogRequest,
};

/// Identifier fields a client may send but never gets to choose
const CLIENT_IDENTIFIER_FIELDS: [&str; 3] = ["id", "_id", "__v"];

/// Create the blog router
pub fn create_blogs_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_blogs).post(create_blog))
        .route("/stats", get(blog_stats))
        .route("/{id}", get(get_blog).put(update_blog).delete(delete_blog))
}

/// Request to create a blog
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBlogApiRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
    /// Anything else in the body, dropped after logging
    #[serde(flatten)]
    pub ignored: Map<String, Value>,
}

impl CreateBlogApiRequest {
    fn client_identifiers(&self) -> Vec<&'static str> {
        CLIENT_IDENTIFIER_FIELDS
            .into_iter()
            .filter(|field| self.ignored.contains_key(*field))
            .collect()
    }
}

/// Request to update a blog
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBlogApiRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

/// GET /api/blogs
pub async fn list_blogs(State(state): State<AppState>) -> Result<Json<Vec<BlogView>>, ApiError> {
    debug!("Listing blogs");

    let blogs = state.resources.list_blogs().await?;

    Ok(Json(blogs))
}

/// POST /api/blogs
pub async fn create_blog(
    State(state): State<AppState>,
    OptionalUser(owner): OptionalUser,
    Json(request): Json<CreateBlogApiRequest>,
) -> Result<(StatusCode, Json<BlogView>), ApiError> {
    let discarded = request.client_identifiers();
    if !discarded.is_empty() {
        debug!(fields = ?discarded, "Discarding client-supplied identifier fields");
    }

    debug!(authenticated = owner.is_some(), "Creating blog");

    let create_request = CreateBlogRequest {
        title: request.title,
        author: request.author,
        url: request.url,
        likes: request.likes,
    };

    let blog = state.resources.create_blog(create_request, owner).await?;

    Ok((StatusCode::CREATED, Json(blog)))
}

/// GET /api/blogs/stats
pub async fn blog_stats(State(state): State<AppState>) -> Result<Json<BlogStatsView>, ApiError> {
    debug!("Computing blog stats");

    Ok(Json(state.resources.blog_stats().await?))
}

/// GET /api/blogs/{id}
pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BlogView>, ApiError> {
    debug!(blog_id = %id, "Getting blog");

    Ok(Json(state.resources.get_blog(&id).await?))
}

/// PUT /api/blogs/{id}
pub async fn update_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateBlogApiRequest>,
) -> Result<Json<BlogView>, ApiError> {
    debug!(blog_id = %id, "Updating blog");

    let update_request = UpdateBlogRequest {
        title: request.title,
        author: request.author,
        url: request.url,
        likes: request.likes,
    };

    Ok(Json(state.resources.update_blog(&id, update_request).await?))
}

/// DELETE /api/blogs/{id}
///
/// Responds 204 whether or not the blog existed.
pub async fn delete_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let removed = state.resources.delete_blog(&id).await?;
    debug!(blog_id = %id, removed, "Deleted blog");

    Ok(StatusCode::NO_CONTENT)
}
