use crate::models::*;
use crate::services::UserService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

/// 公开注册
pub async fn register(
    user_service: web::Data<UserService>,
    request: web::Json<RegisterUserRequest>,
) -> Result<HttpResponse> {
    match user_service.register(request.into_inner()).await {
        Ok(user) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": user
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn get_current_user(
    user_service: web::Data<UserService>,
    actor: Actor,
) -> Result<HttpResponse> {
    match user_service.get_current_user(&actor).await {
        Ok(user) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": user
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn update_current_user(
    user_service: web::Data<UserService>,
    actor: Actor,
    request: web::Json<UpdateCurrentUserRequest>,
) -> Result<HttpResponse> {
    match user_service
        .update_current_user(&actor, request.into_inner())
        .await
    {
        Ok(user) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": user
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn get_user(
    user_service: web::Data<UserService>,
    actor: Actor,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match user_service.get_user(&actor, path.into_inner()).await {
        Ok(user) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": user
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn admin_create_user(
    user_service: web::Data<UserService>,
    actor: Actor,
    request: web::Json<AdminCreateUserRequest>,
) -> Result<HttpResponse> {
    match user_service.admin_create(&actor, request.into_inner()).await {
        Ok(user) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": user
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn user_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::post().to(register))
            .route("/current-user", web::get().to(get_current_user))
            .route("/current-user", web::patch().to(update_current_user))
            .route("/{id}", web::get().to(get_user)),
    )
    .service(web::scope("/admin").route("/users", web::post().to(admin_create_user)));
}
