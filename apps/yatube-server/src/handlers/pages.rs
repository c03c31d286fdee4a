//! Read-only pages: the index, group feeds, profiles and single posts.

use actix_web::{HttpResponse, web};

use yatube_core::domain::{Group, User};
use yatube_core::pagination::Page;
use yatube_core::services::PostView;
use yatube_shared::ApiResponse;
use yatube_shared::dto::{
    GroupPageResponse, GroupResponse, PageQuery, PageResponse, PostDetailResponse, PostResponse,
    ProfileResponse, UserResponse,
};

use crate::middleware::error::AppResult;
use crate::state::AppState;

pub(crate) fn group_response(group: &Group) -> GroupResponse {
    GroupResponse {
        id: group.id,
        title: group.title.clone(),
        slug: group.slug.clone(),
        description: group.description.clone(),
    }
}

fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username.clone(),
    }
}

fn post_response(view: PostView) -> PostResponse {
    PostResponse {
        id: view.post.id,
        text: view.post.text,
        author: view.author.username,
        group: view.group.as_ref().map(group_response),
        pub_date: view.post.pub_date.to_rfc3339(),
    }
}

fn page_response(page: Page<PostView>) -> PageResponse<PostResponse> {
    let has_next = page.has_next();
    let has_previous = page.has_previous();
    let page = page.map(post_response);

    PageResponse {
        number: page.number,
        total_pages: page.total_pages,
        total_items: page.total_items,
        has_next,
        has_previous,
        items: page.items,
    }
}

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state.posts.index(query.number()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(page_response(page))))
}

/// GET /group/{slug}/
pub async fn group_posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let (group, page) = state.posts.group_feed(&path, query.number()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(GroupPageResponse {
        group: group_response(&group),
        page: page_response(page),
    })))
}

/// GET /profile/{username}/
pub async fn profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let (author, page) = state.posts.profile(&path, query.number()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(ProfileResponse {
        author: user_response(&author),
        post_count: page.total_items,
        page: page_response(page),
    })))
}

/// GET /posts/{post_id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let detail = state.posts.detail(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostDetailResponse {
        post: post_response(detail.view),
        author_post_count: detail.author_post_count,
    })))
}
