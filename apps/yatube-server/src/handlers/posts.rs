//! Post create and edit pages.
//!
//! Anonymous callers are sent to the login page. A user who is not the author
//! of a post is sent back to the post instead of being shown an error.

use actix_web::{HttpResponse, web};

use yatube_core::DomainError;
use yatube_core::services::PostInput;
use yatube_shared::ApiResponse;
use yatube_shared::dto::{PostForm, PostFormResponse, PostFormValues};

use super::pages::group_response;
use super::redirect;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::urls;

fn post_input(form: PostForm) -> PostInput {
    PostInput {
        text: form.text,
        group: form.group,
    }
}

async fn form_page(
    state: &AppState,
    post_id: Option<i64>,
    form: PostFormValues,
) -> AppResult<HttpResponse> {
    let groups = state.posts.selectable_groups().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostFormResponse {
        is_edit: post_id.is_some(),
        post_id,
        form,
        groups: groups.iter().map(group_response).collect(),
    })))
}

/// GET /create/
pub async fn create_form(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    identity.require_login(urls::post_create())?;

    form_page(
        &state,
        None,
        PostFormValues {
            text: String::new(),
            group: None,
        },
    )
    .await
}

/// POST /create/
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let user = identity.require_login(urls::post_create())?;

    state
        .posts
        .create(user.user_id, post_input(form.into_inner()))
        .await?;

    Ok(redirect(urls::profile(&user.username)))
}

/// GET /posts/{post_id}/edit/
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let user = identity.require_login(urls::post_edit(post_id))?;

    let post = match state.posts.editable(user.user_id, post_id).await {
        Ok(post) => post,
        Err(DomainError::PermissionDenied) => return Ok(redirect(urls::post_detail(post_id))),
        Err(e) => return Err(e.into()),
    };

    form_page(
        &state,
        Some(post.id),
        PostFormValues {
            text: post.text,
            group: post.group_id,
        },
    )
    .await
}

/// POST /posts/{post_id}/edit/
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let user = identity.require_login(urls::post_edit(post_id))?;

    match state
        .posts
        .edit(user.user_id, post_id, post_input(form.into_inner()))
        .await
    {
        Ok(_) | Err(DomainError::PermissionDenied) => Ok(redirect(urls::post_detail(post_id))),
        Err(e) => Err(e.into()),
    }
}
