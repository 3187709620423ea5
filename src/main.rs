use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use gym_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    tasks,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration");

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // 创建JWT服务
    let jwt_service = JwtService::new(&config.jwt.secret, config.jwt.access_token_expires_in);

    // 创建服务
    let auth_service = AuthService::new(pool.clone(), jwt_service.clone());
    let user_service = UserService::new(pool.clone());
    let profile_service = ProfileService::new(pool.clone());
    let package_service = PackageService::new(pool.clone());
    let membership_service = MembershipService::new(pool.clone());
    let booking_service = BookingService::new(pool.clone());
    let progress_service = ProgressService::new(pool.clone());
    let review_service = ReviewService::new(pool.clone());
    let payment_service = PaymentService::new(pool.clone());
    let notification_service = NotificationService::new(pool.clone());

    // 确保管理员账号存在
    if let Some(admin) = &config.bootstrap_admin
        && let Err(e) = user_service.ensure_admin(admin).await
    {
        log::error!("Failed to ensure bootstrap admin: {e}");
    }

    // 启动后台任务
    tasks::spawn_all(&config.tasks, membership_service.clone());

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .wrap(create_cors())
            .wrap(Logger::default())
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(profile_service.clone()))
            .app_data(web::Data::new(package_service.clone()))
            .app_data(web::Data::new(membership_service.clone()))
            .app_data(web::Data::new(booking_service.clone()))
            .app_data(web::Data::new(progress_service.clone()))
            .app_data(web::Data::new(review_service.clone()))
            .app_data(web::Data::new(payment_service.clone()))
            .app_data(web::Data::new(notification_service.clone()))
            .service(
                web::scope("/api/v1")
                    .configure(handlers::auth_config)
                    .configure(handlers::user_config)
                    .configure(handlers::member_profile_config)
                    .configure(handlers::package_config)
                    .configure(handlers::membership_config)
                    .configure(handlers::booking_config)
                    .configure(handlers::progress_config)
                    .configure(handlers::review_config)
                    .configure(handlers::payment_config)
                    .configure(handlers::notification_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
