//! Posts handlers.
//!
//! Validation failures and save anomalies answer 200 with an `{"error": ...}`
//! body. A create body that cannot be decoded is treated as empty, so it
//! lands on the missing-content answer rather than an extractor error.

use actix_web::{HttpRequest, HttpResponse, http::header, web};
use serde_json::json;

use quill_core::{CreateOutcome, PostDraft};
use quill_shared::ErrorBody;
use quill_shared::dto::{CreatePostRequest, PostResponse};

use crate::middleware::ALLOWED_METHODS;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET {base}/ - the whole collection keyed by post id, `{}` when empty.
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await?;
    tracing::debug!(count = posts.len(), "Listing posts");
    Ok(HttpResponse::Ok().json(posts))
}

/// GET {base}/{id} - one post's stored fields, `{}` (still 200) when absent.
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    match state.posts.get(&id).await? {
        Some(post) => Ok(HttpResponse::Ok().json(post)),
        None => {
            tracing::debug!(post_id = %id, "Post not found");
            Ok(HttpResponse::Ok().json(json!({})))
        }
    }
}

/// POST {base}/ - create a post. Accepts a JSON or urlencoded body.
pub async fn create_post(
    state: web::Data<AppState>,
    http: HttpRequest,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let req = decode_create_body(&http, &body);

    let draft = PostDraft {
        content: req.content,
        title: req.title,
        token: req.token,
    };

    match state.posts.create(draft).await? {
        CreateOutcome::Created { id, post } => {
            tracing::info!(post_id = %id, author = %post.author, "Post created");
            Ok(HttpResponse::Ok().json(PostResponse {
                id,
                author: post.author,
                title: post.title,
                content: post.content,
                created: post.created,
            }))
        }
        CreateOutcome::MissingContent => {
            Ok(HttpResponse::Ok().json(ErrorBody::missing_content()))
        }
        CreateOutcome::Unauthenticated(err) => {
            tracing::debug!(code = err.code(), "ID token rejected: {}", err);
            Err(AppError::Unauthenticated(err))
        }
        CreateOutcome::Forbidden { subject_id } => {
            tracing::warn!(subject_id = %subject_id, "Post rejected: author not allowed");
            Err(AppError::Forbidden)
        }
        CreateOutcome::NotSaved { id } => {
            tracing::error!(post_id = %id, "Post missing on read-back after write");
            Ok(HttpResponse::Ok().json(ErrorBody::unable_to_save()))
        }
    }
}

/// Decode a create body by its content type.
///
/// Unknown content types, missing bodies and bodies that do not fit
/// [`CreatePostRequest`] all decode to the empty request.
fn decode_create_body(http: &HttpRequest, body: &[u8]) -> CreatePostRequest {
    let content_type = http
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|essence| essence.trim().to_ascii_lowercase())
        .unwrap_or_default();

    let decoded = if content_type == "application/json" || content_type.ends_with("+json") {
        serde_json::from_slice::<CreatePostRequest>(body).map_err(|e| e.to_string())
    } else if content_type == "application/x-www-form-urlencoded" {
        std::str::from_utf8(body)
            .map_err(|e| e.to_string())
            .and_then(|form| {
                web::Query::<CreatePostRequest>::from_query(form)
                    .map(web::Query::into_inner)
                    .map_err(|e| e.to_string())
            })
    } else {
        return CreatePostRequest::default();
    };

    decoded.unwrap_or_else(|e| {
        tracing::debug!(content_type = %content_type, "Undecodable create body: {}", e);
        CreatePostRequest::default()
    })
}

/// OPTIONS {base}/ and {base}/{id} - CORS preflight.
pub async fn preflight() -> HttpResponse {
    HttpResponse::NoContent()
        .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS))
        .finish()
}
