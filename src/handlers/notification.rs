use crate::models::*;
use crate::services::NotificationService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

pub async fn list_notifications(
    notification_service: web::Data<NotificationService>,
    actor: Actor,
    query: web::Query<NotificationQuery>,
) -> Result<HttpResponse> {
    match notification_service.list(&actor, &query.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn create_notification(
    notification_service: web::Data<NotificationService>,
    actor: Actor,
    request: web::Json<CreateNotificationRequest>,
) -> Result<HttpResponse> {
    match notification_service
        .create(&actor, request.into_inner())
        .await
    {
        Ok(notification) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": notification
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn mark_read(
    notification_service: web::Data<NotificationService>,
    actor: Actor,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match notification_service
        .mark_read(&actor, path.into_inner())
        .await
    {
        Ok(notification) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": notification
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn delete_notification(
    notification_service: web::Data<NotificationService>,
    actor: Actor,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match notification_service.delete(&actor, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": null
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn notification_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/notifications")
            .route("", web::get().to(list_notifications))
            .route("", web::post().to(create_notification))
            .route("/{id}/read", web::post().to(mark_read))
            .route("/{id}", web::delete().to(delete_notification)),
    );
}
