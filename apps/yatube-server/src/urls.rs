//! Reverse routing. Every path a handler redirects to is built here, and the
//! patterns in `handlers::configure_routes` must stay in step with it.
//!
//! Usernames and slugs are validated to URL-safe characters on the way in, so
//! they are interpolated without escaping.

use url::form_urlencoded;

pub fn index() -> String {
    "/".to_string()
}

pub fn group_list(slug: &str) -> String {
    format!("/group/{slug}/")
}

pub fn profile(username: &str) -> String {
    format!("/profile/{username}/")
}

pub fn post_detail(post_id: i64) -> String {
    format!("/posts/{post_id}/")
}

pub fn post_create() -> String {
    "/create/".to_string()
}

pub fn post_edit(post_id: i64) -> String {
    format!("/posts/{post_id}/edit/")
}

pub fn group_create() -> String {
    "/admin/groups/".to_string()
}

pub fn login() -> String {
    "/auth/login/".to_string()
}

/// The login page, coming back to `next` afterwards. `next` is form-encoded
/// with `/` left readable, so its own query string stays inside the value.
pub fn login_with_next(next: &str) -> String {
    let next: String = form_urlencoded::byte_serialize(next.as_bytes()).collect();
    format!("{}?next={}", login(), next.replace("%2F", "/"))
}

/// Only same-site paths are followed after login.
pub fn is_local(next: &str) -> bool {
    next.starts_with('/') && !next.starts_with("//") && !next.contains('\\')
}
