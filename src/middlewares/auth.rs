use crate::error::AppError;
use crate::models::Actor;
use crate::utils::JwtService;
use actix_web::http::Method;
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

// 公开路由配置（按方法 + 路径完全匹配）
struct PublicRoutes {
    routes: Vec<(Method, &'static str)>,
}

impl PublicRoutes {
    fn new() -> Self {
        Self {
            routes: vec![
                (Method::POST, "/api/v1/auth/login"),
                // 会员注册
                (Method::POST, "/api/v1/users"),
            ],
        }
    }

    fn is_public(&self, method: &Method, path: &str) -> bool {
        // 放行所有 CORS 预检请求
        if method == Method::OPTIONS {
            return true;
        }
        let path = path.trim_end_matches('/');
        self.routes
            .iter()
            .any(|(m, p)| m == method && *p == path)
    }
}

pub struct AuthMiddleware {
    jwt_service: JwtService,
}

impl AuthMiddleware {
    pub fn new(jwt_service: JwtService) -> Self {
        Self { jwt_service }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            jwt_service: self.jwt_service.clone(),
            public_routes: PublicRoutes::new(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    jwt_service: JwtService,
    public_routes: PublicRoutes,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if self.public_routes.is_public(req.method(), req.path()) {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        // 提取Authorization header
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_owned);

        let Some(token) = token else {
            let error = AppError::AuthError("Missing access token".to_string());
            return Box::pin(async move { Err(error.into()) });
        };

        let actor = self
            .jwt_service
            .verify_access_token(&token)
            .and_then(|claims| {
                let user_id = claims
                    .sub
                    .parse::<i64>()
                    .map_err(|_| AppError::AuthError("Invalid token subject".to_string()))?;
                Ok(Actor::new(user_id, claims.role))
            });

        match actor {
            Ok(actor) => {
                // 将当前操作者写入请求扩展
                req.extensions_mut().insert(actor);
                let fut = self.service.call(req);
                Box::pin(fut)
            }
            Err(_) => {
                let error = AppError::AuthError("Invalid access token".to_string());
                Box::pin(async move { Err(error.into()) })
            }
        }
    }
}

/// 在 handler 中直接以参数形式获取当前操作者
impl FromRequest for Actor {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Actor>()
                .copied()
                .ok_or_else(|| AppError::AuthError("Missing access token".to_string())),
        )
    }
}
