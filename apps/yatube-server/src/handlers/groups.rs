//! Group administration. Only staff may create groups.

use actix_web::{HttpResponse, web};

use yatube_core::services::GroupInput;
use yatube_shared::dto::GroupForm;

use super::redirect;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::urls;

/// POST /admin/groups/
pub async fn create_group(
    state: web::Data<AppState>,
    identity: Identity,
    form: web::Form<GroupForm>,
) -> AppResult<HttpResponse> {
    let user = identity.require_login(urls::group_create())?;
    if !user.is_staff() {
        tracing::warn!(user_id = user.user_id, "Group creation refused: not staff");
        return Err(AppError::Forbidden);
    }

    let form = form.into_inner();
    let group = state
        .groups
        .create(GroupInput {
            title: form.title,
            slug: form.slug,
            description: form.description,
        })
        .await?;

    Ok(redirect(urls::group_list(&group.slug)))
}
