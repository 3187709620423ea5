use crate::models::*;
use crate::services::BookingService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

pub async fn list_bookings(
    booking_service: web::Data<BookingService>,
    actor: Actor,
    query: web::Query<BookingQuery>,
) -> Result<HttpResponse> {
    match booking_service.list(&actor, &query.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn create_booking(
    booking_service: web::Data<BookingService>,
    actor: Actor,
    request: web::Json<CreateBookingRequest>,
) -> Result<HttpResponse> {
    match booking_service.create(&actor, request.into_inner()).await {
        Ok(booking) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": booking
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn get_booking(
    booking_service: web::Data<BookingService>,
    actor: Actor,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match booking_service.get(&actor, path.into_inner()).await {
        Ok(booking) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": booking
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn update_booking(
    booking_service: web::Data<BookingService>,
    actor: Actor,
    path: web::Path<i64>,
    request: web::Json<UpdateBookingRequest>,
) -> Result<HttpResponse> {
    match booking_service
        .update(&actor, path.into_inner(), request.into_inner())
        .await
    {
        Ok(booking) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": booking
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn transition_booking(
    booking_service: web::Data<BookingService>,
    actor: Actor,
    path: web::Path<i64>,
    request: web::Json<TransitionBookingRequest>,
) -> Result<HttpResponse> {
    match booking_service
        .transition(&actor, path.into_inner(), request.status)
        .await
    {
        Ok(booking) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": booking
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub async fn delete_booking(
    booking_service: web::Data<BookingService>,
    actor: Actor,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match booking_service.delete(&actor, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": null
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn booking_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/bookings")
            .route("", web::get().to(list_bookings))
            .route("", web::post().to(create_booking))
            .route("/{id}", web::get().to(get_booking))
            .route("/{id}", web::patch().to(update_booking))
            .route("/{id}", web::delete().to(delete_booking))
            .route("/{id}/transition", web::post().to(transition_booking)),
    );
}
