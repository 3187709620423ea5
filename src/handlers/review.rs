use crate::models::*;
use crate::services::ReviewService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

pub async fn list_reviews(
    review_service: web::Data<ReviewService>,
    actor: Actor,
    query: web::Query<ReviewQuery>,
) -> Result<HttpResponse> {
    match review_service.list(&actor, &query.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn create_review(
    review_service: web::Data<ReviewService>,
    actor: Actor,
    request: web::Json<CreateReviewRequest>,
) -> Result<HttpResponse> {
    match review_service.create(&actor, request.into_inner()).await {
        Ok(review) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": review
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn update_review(
    review_service: web::Data<ReviewService>,
    actor: Actor,
    path: web::Path<i64>,
    request: web::Json<UpdateReviewRequest>,
) -> Result<HttpResponse> {
    match review_service
        .update(&actor, path.into_inner(), request.into_inner())
        .await
    {
        Ok(review) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": review
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn delete_review(
    review_service: web::Data<ReviewService>,
    actor: Actor,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match review_service.delete(&actor, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": null
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn review_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reviews")
            .route("", web::get().to(list_reviews))
            .route("", web::post().to(create_review))
            .route("/{id}", web::patch().to(update_review))
            .route("/{id}", web::delete().to(delete_review)),
    );
}
