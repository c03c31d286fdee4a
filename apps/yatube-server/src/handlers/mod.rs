//! HTTP handlers and route configuration.

mod accounts;
mod groups;
mod health;
mod pages;
mod posts;

use actix_web::{HttpResponse, http::header, web};

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Unreadable form bodies get the same problem document as every other error.
    cfg.app_data(web::FormConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(err.to_string()).into()
    }))
    .route("/health", web::get().to(health::health_check))
        // Listings
        .route("/", web::get().to(pages::index))
        .route("/group/{slug}/", web::get().to(pages::group_posts))
        .route("/profile/{username}/", web::get().to(pages::profile))
        .route("/posts/{post_id}/", web::get().to(pages::post_detail))
        // Post submission
        .service(
            web::resource("/create/")
                .route(web::get().to(posts::create_form))
                .route(web::post().to(posts::create)),
        )
        .service(
            web::resource("/posts/{post_id}/edit/")
                .route(web::get().to(posts::edit_form))
                .route(web::post().to(posts::edit)),
        )
        // Accounts
        .service(
            web::scope("/auth")
                .service(
                    web::resource("/login/")
                        .route(web::get().to(accounts::login_page))
                        .route(web::post().to(accounts::login)),
                )
                .route("/logout/", web::post().to(accounts::logout))
                .route("/signup/", web::post().to(accounts::signup))
                .route("/me/", web::get().to(accounts::me)),
        )
        .route("/admin/groups/", web::post().to(groups::create_group));
}

/// `302 Found` to `location`.
pub(crate) fn redirect(location: String) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}
