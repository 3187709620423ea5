use crate::models::*;
use crate::services::ProfileService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

pub async fn get_my_profile(
    profile_service: web::Data<ProfileService>,
    actor: Actor,
) -> Result<HttpResponse> {
    match profile_service.get_own(&actor).await {
        Ok(profile) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": profile
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn upsert_my_profile(
    profile_service: web::Data<ProfileService>,
    actor: Actor,
    request: web::Json<UpsertMemberProfileRequest>,
) -> Result<HttpResponse> {
    match profile_service.upsert_own(&actor, request.into_inner()).await {
        Ok(profile) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": profile
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn list_profiles(
    profile_service: web::Data<ProfileService>,
    actor: Actor,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    match profile_service.list(&actor, &query.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn member_profile_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/member-profiles")
            .route("", web::get().to(list_profiles))
            .route("/me", web::get().to(get_my_profile))
            .route("/me", web::put().to(upsert_my_profile)),
    );
}
