use crate::models::*;
use crate::services::PaymentService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

pub async fn list_payments(
    payment_service: web::Data<PaymentService>,
    actor: Actor,
    query: web::Query<PaymentQuery>,
) -> Result<HttpResponse> {
    match payment_service.list(&actor, &query.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn create_payment(
    payment_service: web::Data<PaymentService>,
    actor: Actor,
    request: web::Json<CreatePaymentRequest>,
) -> Result<HttpResponse> {
    match payment_service.create(&actor, request.into_inner()).await {
        Ok(payment) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": payment
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn update_payment_status(
    payment_service: web::Data<PaymentService>,
    actor: Actor,
    path: web::Path<i64>,
    request: web::Json<UpdatePaymentStatusRequest>,
) -> Result<HttpResponse> {
    match payment_service
        .update_status(&actor, path.into_inner(), request.status)
        .await
    {
        Ok(payment) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": payment
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn payment_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .route("", web::get().to(list_payments))
            .route("", web::post().to(create_payment))
            .route("/{id}/status", web::patch().to(update_payment_status)),
    );
}
