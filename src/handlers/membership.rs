use crate::models::*;
use crate::services::MembershipService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

pub async fn list_memberships(
    membership_service: web::Data<MembershipService>,
    actor: Actor,
    query: web::Query<MembershipQuery>,
) -> Result<HttpResponse> {
    match membership_service.list(&actor, &query.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn create_membership(
    membership_service: web::Data<MembershipService>,
    actor: Actor,
    request: web::Json<CreateMembershipRequest>,
) -> Result<HttpResponse> {
    match membership_service.create(&actor, request.into_inner()).await {
        Ok(membership) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": membership
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn get_membership(
    membership_service: web::Data<MembershipService>,
    actor: Actor,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match membership_service.get(&actor, path.into_inner()).await {
        Ok(membership) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": membership
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn cancel_membership(
    membership_service: web::Data<MembershipService>,
    actor: Actor,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match membership_service.cancel(&actor, path.into_inner()).await {
        Ok(membership) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": membership
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn membership_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/memberships")
            .route("", web::get().to(list_memberships))
            .route("", web::post().to(create_membership))
            .route("/{id}", web::get().to(get_membership))
            .route("/{id}/cancel", web::post().to(cancel_membership)),
    );
}
