mod common;

use common::*;
use gym_backend::config::BootstrapAdminConfig;
use gym_backend::entities::{NotificationType, PaymentMethod, PaymentStatus, UserRole};
use gym_backend::error::AppError;
use gym_backend::models::*;
use gym_backend::services::*;
use gym_backend::utils::JwtService;

#[tokio::test]
async fn test_register_login_and_update_current_user() {
    let db = setup_db().await;
    let users = UserService::new(db.clone());
    let auth = AuthService::new(db.clone(), JwtService::new("test-secret", 3600));

    let registered = users
        .register(RegisterUserRequest {
            username: "linh".to_string(),
            password: "Password123".to_string(),
            email: Some("linh@gym.test".to_string()),
            first_name: Some("Linh".to_string()),
            last_name: None,
            phone: Some("+84 901 234 567".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(registered.role, UserRole::Member);
    assert_eq!(registered.phone.as_deref(), Some("+84901234567"));
    assert!(registered.last_login.is_none());

    assert!(matches!(
        users
            .register(RegisterUserRequest {
                username: "linh".to_string(),
                password: "Password123".to_string(),
                email: None,
                first_name: None,
                last_name: None,
                phone: None,
            })
            .await,
        Err(AppError::Conflict(_))
    ));

    assert!(matches!(
        auth.login(LoginRequest {
            username: "linh".to_string(),
            password: "wrong-password1".to_string(),
        })
        .await,
        Err(AppError::AuthError(_))
    ));

    let login = auth
        .login(LoginRequest {
            username: "linh".to_string(),
            password: "Password123".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(login.token_type, "Bearer");
    assert!(login.user.last_login.is_some());

    let jwt = JwtService::new("test-secret", 3600);
    let claims = jwt.verify_access_token(&login.access_token).unwrap();
    assert_eq!(claims.sub, registered.id.to_string());
    assert_eq!(claims.role, UserRole::Member);

    let actor = Actor::new(registered.id, UserRole::Member);
    let updated = users
        .update_current_user(
            &actor,
            UpdateCurrentUserRequest {
                last_name: Some("Nguyen".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.last_name, "Nguyen");
    assert_eq!(updated.first_name, "Linh");

    assert!(matches!(
        users
            .update_current_user(&actor, UpdateCurrentUserRequest::default())
            .await,
        Err(AppError::ValidationError(_))
    ));
}

#[tokio::test]
async fn test_admin_user_management() {
    let db = setup_db().await;
    let users = UserService::new(db.clone());
    let member = seed_user(&db, "member", UserRole::Member).await;
    let other = seed_user(&db, "other", UserRole::Member).await;

    let bootstrap = BootstrapAdminConfig {
        username: "root".to_string(),
        password: "Password123".to_string(),
        email: String::new(),
    };
    assert!(users.ensure_admin(&bootstrap).await.unwrap());
    // 已存在时不重复创建
    assert!(!users.ensure_admin(&bootstrap).await.unwrap());

    let request = || AdminCreateUserRequest {
        username: "coach".to_string(),
        password: "Password123".to_string(),
        role: UserRole::Trainer,
        email: None,
        first_name: None,
        last_name: None,
        phone: None,
    };
    assert!(matches!(
        users.admin_create(&member, request()).await,
        Err(AppError::PermissionDenied(_))
    ));

    let admin = seed_user(&db, "admin", UserRole::Admin).await;
    let trainer = users.admin_create(&admin, request()).await.unwrap();
    assert_eq!(trainer.role, UserRole::Trainer);

    assert!(users.get_user(&member, member.user_id).await.is_ok());
    assert!(matches!(
        users.get_user(&member, other.user_id).await,
        Err(AppError::PermissionDenied(_))
    ));
    assert!(users.get_user(&admin, other.user_id).await.is_ok());
}

#[tokio::test]
async fn test_member_profile_bmi() {
    let db = setup_db().await;
    let admin = seed_user(&db, "admin", UserRole::Admin).await;
    let member = seed_user(&db, "member", UserRole::Member).await;
    let profiles = ProfileService::new(db.clone());

    assert!(matches!(
        profiles.get_own(&member).await,
        Err(AppError::NotFound(_))
    ));

    let created = profiles
        .upsert_own(
            &member,
            UpsertMemberProfileRequest {
                height: Some(175.0),
                weight: None,
                goal: Some("lose fat".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(created.bmi, None);

    let updated = profiles
        .upsert_own(
            &member,
            UpsertMemberProfileRequest {
                weight: Some(70.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.bmi, Some(22.86));
    assert_eq!(updated.goal.as_deref(), Some("lose fat"));

    assert!(matches!(
        profiles.list(&member, &PaginationParams::default()).await,
        Err(AppError::PermissionDenied(_))
    ));
    let all = profiles.list(&admin, &PaginationParams::default()).await.unwrap();
    assert_eq!(all.total, 1);
}

#[tokio::test]
async fn test_progress_records() {
    let db = setup_db().await;
    let admin = seed_user(&db, "admin", UserRole::Admin).await;
    let trainer = seed_user(&db, "coach", UserRole::Trainer).await;
    let other_trainer = seed_user(&db, "coach2", UserRole::Trainer).await;
    let member = seed_user(&db, "member", UserRole::Member).await;
    let progress = ProgressService::new(db.clone());

    let request = |weight: f64| CreateProgressRequest {
        member_id: member.user_id,
        weight: Some(weight),
        body_fat: Some(21.5),
        muscle_mass: None,
        note: None,
    };

    assert!(matches!(
        progress.create(&member, request(70.0)).await,
        Err(AppError::PermissionDenied(_))
    ));
    assert!(matches!(
        progress.create(&trainer, request(20.0)).await,
        Err(AppError::ValidationError(_))
    ));

    let record = progress.create(&trainer, request(72.0)).await.unwrap();
    assert_eq!(record.trainer_id, Some(trainer.user_id));

    assert!(matches!(
        progress
            .update(&other_trainer, record.id, UpdateProgressRequest::default())
            .await,
        Err(AppError::PermissionDenied(_))
    ));
    let updated = progress
        .update(
            &trainer,
            record.id,
            UpdateProgressRequest {
                weight: Some(71.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.weight, Some(71.0));
    assert_eq!(updated.body_fat, Some(21.5));

    let about_me = progress.list(&member, &ProgressQuery::default()).await.unwrap();
    assert_eq!(about_me.total, 1);
    let theirs = progress
        .list(&other_trainer, &ProgressQuery::default())
        .await
        .unwrap();
    assert_eq!(theirs.total, 0);

    assert!(matches!(
        progress.delete(&member, record.id).await,
        Err(AppError::PermissionDenied(_))
    ));
    progress.delete(&admin, record.id).await.unwrap();
}

#[tokio::test]
async fn test_reviews() {
    let db = setup_db().await;
    let admin = seed_user(&db, "admin", UserRole::Admin).await;
    let trainer = seed_user(&db, "coach", UserRole::Trainer).await;
    let member = seed_user(&db, "member", UserRole::Member).await;
    let other = seed_user(&db, "other", UserRole::Member).await;
    let reviews = ReviewService::new(db.clone());

    assert!(matches!(
        reviews
            .create(
                &trainer,
                CreateReviewRequest {
                    trainer_id: None,
                    gym_rating: 5,
                    trainer_rating: None,
                    comment: None,
                },
            )
            .await,
        Err(AppError::PermissionDenied(_))
    ));
    assert!(matches!(
        reviews
            .create(
                &member,
                CreateReviewRequest {
                    trainer_id: None,
                    gym_rating: 4,
                    trainer_rating: Some(5),
                    comment: None,
                },
            )
            .await,
        Err(AppError::ValidationError(_))
    ));
    // trainer_id 指向非教练用户
    assert!(matches!(
        reviews
            .create(
                &member,
                CreateReviewRequest {
                    trainer_id: Some(other.user_id),
                    gym_rating: 4,
                    trainer_rating: Some(5),
                    comment: None,
                },
            )
            .await,
        Err(AppError::ValidationError(_))
    ));

    let review = reviews
        .create(
            &member,
            CreateReviewRequest {
                trainer_id: Some(trainer.user_id),
                gym_rating: 4,
                trainer_rating: Some(5),
                comment: Some("great coach".to_string()),
            },
        )
        .await
        .unwrap();

    assert!(matches!(
        reviews
            .update(&other, review.id, UpdateReviewRequest::default())
            .await,
        Err(AppError::PermissionDenied(_))
    ));
    let updated = reviews
        .update(
            &member,
            review.id,
            UpdateReviewRequest {
                gym_rating: Some(3),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.gym_rating, 3);
    assert_eq!(updated.trainer_rating, Some(5));

    let about_trainer = reviews.list(&trainer, &ReviewQuery::default()).await.unwrap();
    assert_eq!(about_trainer.total, 1);
    let others = reviews.list(&other, &ReviewQuery::default()).await.unwrap();
    assert_eq!(others.total, 0);

    assert!(matches!(
        reviews.delete(&other, review.id).await,
        Err(AppError::PermissionDenied(_))
    ));
    reviews.delete(&admin, review.id).await.unwrap();
}

#[tokio::test]
async fn test_payments() {
    let db = setup_db().await;
    let admin = seed_user(&db, "admin", UserRole::Admin).await;
    let member = seed_user(&db, "member", UserRole::Member).await;
    let other = seed_user(&db, "other", UserRole::Member).await;
    let package = seed_package(&db, &admin, "monthly", 4).await;
    let membership = MembershipService::new(db.clone())
        .create(
            &member,
            CreateMembershipRequest {
                user_id: None,
                package_id: package.id,
                start_date: None,
            },
        )
        .await
        .unwrap();
    let payments = PaymentService::new(db.clone());

    let request = |amount: i64| CreatePaymentRequest {
        membership_id: membership.id,
        amount,
        method: PaymentMethod::Momo,
        receipt_url: None,
    };

    assert!(matches!(
        payments.create(&member, request(0)).await,
        Err(AppError::ValidationError(_))
    ));
    assert!(matches!(
        payments.create(&other, request(500_000)).await,
        Err(AppError::PermissionDenied(_))
    ));

    let payment = payments.create(&member, request(500_000)).await.unwrap();
    assert_eq!(payment.status, PaymentStatus::Pending);

    assert!(matches!(
        payments
            .update_status(&member, payment.id, PaymentStatus::Completed)
            .await,
        Err(AppError::PermissionDenied(_))
    ));
    let completed = payments
        .update_status(&admin, payment.id, PaymentStatus::Completed)
        .await
        .unwrap();
    assert_eq!(completed.status, PaymentStatus::Completed);
    assert!(matches!(
        payments
            .update_status(&admin, payment.id, PaymentStatus::Failed)
            .await,
        Err(AppError::ValidationError(_))
    ));

    let own = payments.list(&member, &PaymentQuery::default()).await.unwrap();
    assert_eq!(own.total, 1);
    let none = payments.list(&other, &PaymentQuery::default()).await.unwrap();
    assert_eq!(none.total, 0);
}

#[tokio::test]
async fn test_notifications() {
    let db = setup_db().await;
    let admin = seed_user(&db, "admin", UserRole::Admin).await;
    let member = seed_user(&db, "member", UserRole::Member).await;
    let other = seed_user(&db, "other", UserRole::Member).await;
    let notifications = NotificationService::new(db.clone());

    let request = |title: String| CreateNotificationRequest {
        user_id: member.user_id,
        title,
        message: "Your class starts at 9am".to_string(),
        notification_type: NotificationType::Reminder,
    };

    assert!(matches!(
        notifications.create(&member, request("Hi".to_string())).await,
        Err(AppError::PermissionDenied(_))
    ));
    assert!(matches!(
        notifications.create(&admin, request("x".repeat(101))).await,
        Err(AppError::ValidationError(_))
    ));

    let sent = notifications
        .create(&admin, request("Reminder".to_string()))
        .await
        .unwrap();
    assert!(!sent.is_read);

    let inbox = notifications
        .list(
            &member,
            &NotificationQuery {
                unread_only: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(inbox.total, 1);

    assert!(matches!(
        notifications.mark_read(&other, sent.id).await,
        Err(AppError::NotFound(_))
    ));
    let read = notifications.mark_read(&member, sent.id).await.unwrap();
    assert!(read.is_read);

    notifications.delete(&member, sent.id).await.unwrap();
    let empty = notifications
        .list(&member, &NotificationQuery::default())
        .await
        .unwrap();
    assert_eq!(empty.total, 0);
}
