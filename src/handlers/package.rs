use crate::models::*;
use crate::services::PackageService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

pub async fn list_packages(
    package_service: web::Data<PackageService>,
    actor: Actor,
    query: web::Query<PackageQuery>,
) -> Result<HttpResponse> {
    match package_service.list(&actor, &query.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn create_package(
    package_service: web::Data<PackageService>,
    actor: Actor,
    request: web::Json<CreatePackageRequest>,
) -> Result<HttpResponse> {
    match package_service.create(&actor, request.into_inner()).await {
        Ok(package) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": package
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn get_package(
    package_service: web::Data<PackageService>,
    actor: Actor,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match package_service.get(&actor, path.into_inner()).await {
        Ok(package) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": package
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn update_package(
    package_service: web::Data<PackageService>,
    actor: Actor,
    path: web::Path<i64>,
    request: web::Json<UpdatePackageRequest>,
) -> Result<HttpResponse> {
    match package_service
        .update(&actor, path.into_inner(), request.into_inner())
        .await
    {
        Ok(package) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": package
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn delete_package(
    package_service: web::Data<PackageService>,
    actor: Actor,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match package_service.delete(&actor, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": null
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn package_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/packages")
            .route("", web::get().to(list_packages))
            .route("", web::post().to(create_package))
            .route("/{id}", web::get().to(get_package))
            .route("/{id}", web::patch().to(update_package))
            .route("/{id}", web::delete().to(delete_package)),
    );
}
