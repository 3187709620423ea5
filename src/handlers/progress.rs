use crate::models::*;
use crate::services::ProgressService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

pub async fn list_progress(
    progress_service: web::Data<ProgressService>,
    actor: Actor,
    query: web::Query<ProgressQuery>,
) -> Result<HttpResponse> {
    match progress_service.list(&actor, &query.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn create_progress(
    progress_service: web::Data<ProgressService>,
    actor: Actor,
    request: web::Json<CreateProgressRequest>,
) -> Result<HttpResponse> {
    match progress_service.create(&actor, request.into_inner()).await {
        Ok(record) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": record
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn update_progress(
    progress_service: web::Data<ProgressService>,
    actor: Actor,
    path: web::Path<i64>,
    request: web::Json<UpdateProgressRequest>,
) -> Result<HttpResponse> {
    match progress_service
        .update(&actor, path.into_inner(), request.into_inner())
        .await
    {
        Ok(record) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": record
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn delete_progress(
    progress_service: web::Data<ProgressService>,
    actor: Actor,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match progress_service.delete(&actor, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": null
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn progress_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/progress")
            .route("", web::get().to(list_progress))
            .route("", web::post().to(create_progress))
            .route("/{id}", web::patch().to(update_progress))
            .route("/{id}", web::delete().to(delete_progress)),
    );
}
