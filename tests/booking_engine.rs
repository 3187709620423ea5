mod common;

use common::*;
use gym_backend::entities::{BookingStatus, UserRole};
use gym_backend::error::AppError;
use gym_backend::models::*;
use gym_backend::services::{BookingService, MembershipService};
use sea_orm::DatabaseConnection;
use tempfile::TempDir;

struct Fixture {
    _dir: Option<TempDir>,
    db: DatabaseConnection,
    admin: Actor,
    trainer: Actor,
    member: Actor,
    bookings: BookingService,
    memberships: MembershipService,
}

async fn fixture() -> Fixture {
    seed_fixture(setup_db().await, None).await
}

/// 多连接的文件库，两个请求可以真正并发
async fn concurrent_fixture() -> Fixture {
    let (dir, db) = setup_file_db().await;
    seed_fixture(db, Some(dir)).await
}

async fn seed_fixture(db: DatabaseConnection, dir: Option<TempDir>) -> Fixture {
    let admin = seed_user(&db, "admin", UserRole::Admin).await;
    let trainer = seed_user(&db, "coach", UserRole::Trainer).await;
    let member = seed_user(&db, "member", UserRole::Member).await;
    Fixture {
        bookings: BookingService::new(db.clone()),
        memberships: MembershipService::new(db.clone()),
        _dir: dir,
        db,
        admin,
        trainer,
        member,
    }
}

impl Fixture {
    async fn membership(&self, sessions: i32) -> MembershipResponse {
        let package = seed_package(&self.db, &self.admin, "monthly", sessions).await;
        self.memberships
            .create(
                &self.member,
                CreateMembershipRequest {
                    user_id: None,
                    package_id: package.id,
                    start_date: None,
                },
            )
            .await
            .unwrap()
    }

    async fn book(&self, membership_id: Option<i64>, day: i64) -> AppResultBooking {
        let (start_time, end_time) = slot(day);
        self.bookings
            .create(
                &self.member,
                CreateBookingRequest {
                    member_id: None,
                    trainer_id: Some(self.trainer.user_id),
                    membership_id,
                    start_time,
                    end_time,
                    note: None,
                },
            )
            .await
    }

    async fn remaining(&self, membership_id: i64) -> i32 {
        self.memberships
            .get(&self.admin, membership_id)
            .await
            .unwrap()
            .remaining_sessions
    }
}

type AppResultBooking = gym_backend::AppResult<BookingResponse>;

#[tokio::test]
async fn test_monthly_four_sessions_scenario() {
    let f = fixture().await;
    let package = seed_package(&f.db, &f.admin, "monthly", 4).await;
    let membership = f
        .memberships
        .create(
            &f.admin,
            CreateMembershipRequest {
                user_id: Some(f.member.user_id),
                package_id: package.id,
                start_date: Some(date(2024, 1, 1)),
            },
        )
        .await
        .unwrap();
    assert_eq!(membership.end_date, date(2024, 1, 31));
    assert_eq!(membership.remaining_sessions, 4);

    for day in 1..=4 {
        let booking = f.book(Some(membership.id), day).await.unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        let approved = f
            .bookings
            .transition(&f.trainer, booking.id, BookingStatus::Approved)
            .await
            .unwrap();
        assert_eq!(approved.status, BookingStatus::Approved);
        assert_eq!(f.remaining(membership.id).await, 4 - day as i32);
    }

    match f.book(Some(membership.id), 5).await {
        Err(AppError::NoSessionsRemaining { membership_id }) => {
            assert_eq!(membership_id, membership.id)
        }
        other => panic!("expected NoSessionsRemaining, got {other:?}"),
    }
}

#[tokio::test]
async fn test_reapproving_is_a_noop_for_the_balance() {
    let f = fixture().await;
    let membership = f.membership(3).await;
    let booking = f.book(Some(membership.id), 1).await.unwrap();

    f.bookings
        .transition(&f.trainer, booking.id, BookingStatus::Approved)
        .await
        .unwrap();
    assert_eq!(f.remaining(membership.id).await, 2);

    let again = f
        .bookings
        .transition(&f.admin, booking.id, BookingStatus::Approved)
        .await
        .unwrap();
    assert_eq!(again.status, BookingStatus::Approved);
    assert_eq!(f.remaining(membership.id).await, 2);
}

#[tokio::test]
async fn test_approval_fails_and_rolls_back_when_balance_is_exhausted() {
    let f = fixture().await;
    let membership = f.membership(1).await;
    let first = f.book(Some(membership.id), 1).await.unwrap();
    let second = f.book(Some(membership.id), 2).await.unwrap();

    f.bookings
        .transition(&f.trainer, first.id, BookingStatus::Approved)
        .await
        .unwrap();

    assert!(matches!(
        f.bookings
            .transition(&f.trainer, second.id, BookingStatus::Approved)
            .await,
        Err(AppError::NoSessionsRemaining { .. })
    ));
    // 整个流转回滚，预约仍为 pending
    let second = f.bookings.get(&f.member, second.id).await.unwrap();
    assert_eq!(second.status, BookingStatus::Pending);
    assert_eq!(f.remaining(membership.id).await, 0);
}

#[tokio::test]
async fn test_concurrent_approvals_of_one_booking_charge_once() {
    let f = concurrent_fixture().await;
    let membership = f.membership(3).await;
    let booking = f.book(Some(membership.id), 1).await.unwrap();

    let (first, second) = tokio::join!(
        f.bookings
            .transition(&f.trainer, booking.id, BookingStatus::Approved),
        f.bookings
            .transition(&f.admin, booking.id, BookingStatus::Approved),
    );

    let mut approved = 0;
    for outcome in [first, second] {
        match outcome {
            Ok(b) => {
                assert_eq!(b.status, BookingStatus::Approved);
                approved += 1;
            }
            // 条件写入失败的一方
            Err(AppError::Conflict(_)) => {}
            other => panic!("expected approval or Conflict, got {other:?}"),
        }
    }
    assert!(approved >= 1);
    assert_eq!(f.remaining(membership.id).await, 2);

    let stored = f.bookings.get(&f.member, booking.id).await.unwrap();
    assert_eq!(stored.status, BookingStatus::Approved);
}

#[tokio::test]
async fn test_concurrent_approvals_never_overdraw_the_balance() {
    let f = concurrent_fixture().await;
    let membership = f.membership(1).await;
    let left = f.book(Some(membership.id), 1).await.unwrap();
    let right = f.book(Some(membership.id), 2).await.unwrap();

    let (a, b) = tokio::join!(
        f.bookings
            .transition(&f.trainer, left.id, BookingStatus::Approved),
        f.bookings
            .transition(&f.trainer, right.id, BookingStatus::Approved),
    );

    let (winner, loser) = match (a, b) {
        (Ok(won), Err(lost)) => (won, (right.id, lost)),
        (Err(lost), Ok(won)) => (won, (left.id, lost)),
        other => panic!("expected exactly one approval, got {other:?}"),
    };
    assert_eq!(winner.status, BookingStatus::Approved);
    match loser.1 {
        AppError::NoSessionsRemaining { membership_id } => {
            assert_eq!(membership_id, membership.id)
        }
        other => panic!("expected NoSessionsRemaining, got {other:?}"),
    }

    // 失败方整体回滚，余额停在 0
    assert_eq!(f.remaining(membership.id).await, 0);
    let lost = f.bookings.get(&f.member, loser.0).await.unwrap();
    assert_eq!(lost.status, BookingStatus::Pending);
}

#[tokio::test]
async fn test_terminal_states_reject_transitions() {
    let f = fixture().await;
    let membership = f.membership(4).await;

    let completed = f.book(Some(membership.id), 1).await.unwrap();
    f.bookings
        .transition(&f.trainer, completed.id, BookingStatus::Approved)
        .await
        .unwrap();
    f.bookings
        .transition(&f.trainer, completed.id, BookingStatus::Completed)
        .await
        .unwrap();

    let rejected = f.book(Some(membership.id), 2).await.unwrap();
    f.bookings
        .transition(&f.trainer, rejected.id, BookingStatus::Rejected)
        .await
        .unwrap();

    for id in [completed.id, rejected.id] {
        for next in [BookingStatus::Pending, BookingStatus::Approved] {
            match f.bookings.transition(&f.admin, id, next).await {
                Err(AppError::InvalidTransition { booking_id, to, .. }) => {
                    assert_eq!(booking_id, id);
                    assert_eq!(to, next);
                }
                other => panic!("expected InvalidTransition, got {other:?}"),
            }
        }
    }
    // 完成和拒绝都不影响余额，只有一次批准扣减
    assert_eq!(f.remaining(membership.id).await, 3);
}

#[tokio::test]
async fn test_skipping_states_is_rejected() {
    let f = fixture().await;
    let booking = f.book(None, 1).await.unwrap();
    assert!(matches!(
        f.bookings
            .transition(&f.trainer, booking.id, BookingStatus::Completed)
            .await,
        Err(AppError::InvalidTransition { .. })
    ));
}

#[tokio::test]
async fn test_member_change_request_and_reapproval() {
    let f = fixture().await;
    let membership = f.membership(2).await;
    let booking = f.book(Some(membership.id), 1).await.unwrap();

    f.bookings
        .transition(&f.trainer, booking.id, BookingStatus::Approved)
        .await
        .unwrap();

    // 会员只能改回 pending
    assert!(matches!(
        f.bookings
            .transition(&f.member, booking.id, BookingStatus::Completed)
            .await,
        Err(AppError::PermissionDenied(_))
    ));
    let pending = f
        .bookings
        .transition(&f.member, booking.id, BookingStatus::Pending)
        .await
        .unwrap();
    assert_eq!(pending.status, BookingStatus::Pending);
    assert_eq!(f.remaining(membership.id).await, 1);

    // 再次批准视为重新进入 approved
    f.bookings
        .transition(&f.trainer, booking.id, BookingStatus::Approved)
        .await
        .unwrap();
    assert_eq!(f.remaining(membership.id).await, 0);
}

#[tokio::test]
async fn test_other_trainer_cannot_touch_booking() {
    let f = fixture().await;
    let stranger = seed_user(&f.db, "other-coach", UserRole::Trainer).await;
    let membership = f.membership(2).await;
    let booking = f.book(Some(membership.id), 1).await.unwrap();

    assert!(matches!(
        f.bookings
            .transition(&stranger, booking.id, BookingStatus::Approved)
            .await,
        Err(AppError::PermissionDenied(_))
    ));
    assert!(matches!(
        f.bookings.get(&stranger, booking.id).await,
        Err(AppError::PermissionDenied(_))
    ));
    assert_eq!(f.remaining(membership.id).await, 2);
}

#[tokio::test]
async fn test_booking_creation_rules() {
    let f = fixture().await;
    let other_member = seed_user(&f.db, "other", UserRole::Member).await;
    let membership = f.membership(0).await;
    let (start_time, end_time) = slot(1);

    // 零余额 + 教练 + 套餐
    assert!(matches!(
        f.book(Some(membership.id), 1).await,
        Err(AppError::NoSessionsRemaining { .. })
    ));
    // 不带教练的预约不占用课时
    let no_trainer = f
        .bookings
        .create(
            &f.member,
            CreateBookingRequest {
                member_id: None,
                trainer_id: None,
                membership_id: Some(membership.id),
                start_time,
                end_time,
                note: Some("open gym".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(no_trainer.trainer_id, None);

    // 时间区间非法
    assert!(matches!(
        f.bookings
            .create(
                &f.member,
                CreateBookingRequest {
                    member_id: None,
                    trainer_id: None,
                    membership_id: None,
                    start_time: end_time,
                    end_time: start_time,
                    note: None,
                },
            )
            .await,
        Err(AppError::ValidationError(_))
    ));

    // 套餐不属于该会员
    assert!(matches!(
        f.bookings
            .create(
                &f.admin,
                CreateBookingRequest {
                    member_id: Some(other_member.user_id),
                    trainer_id: None,
                    membership_id: Some(membership.id),
                    start_time,
                    end_time,
                    note: None,
                },
            )
            .await,
        Err(AppError::ValidationError(_))
    ));

    // trainer_id 必须是教练
    assert!(matches!(
        f.bookings
            .create(
                &f.member,
                CreateBookingRequest {
                    member_id: None,
                    trainer_id: Some(other_member.user_id),
                    membership_id: None,
                    start_time,
                    end_time,
                    note: None,
                },
            )
            .await,
        Err(AppError::ValidationError(_))
    ));

    // 教练创建时 trainer 固定为本人
    let proposed = f
        .bookings
        .create(
            &f.trainer,
            CreateBookingRequest {
                member_id: Some(f.member.user_id),
                trainer_id: Some(f.admin.user_id),
                membership_id: None,
                start_time,
                end_time,
                note: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(proposed.trainer_id, Some(f.trainer.user_id));
    assert_eq!(proposed.status, BookingStatus::Pending);

    // 会员创建时 member 固定为本人
    let own = f
        .bookings
        .create(
            &f.member,
            CreateBookingRequest {
                member_id: Some(other_member.user_id),
                trainer_id: None,
                membership_id: None,
                start_time,
                end_time,
                note: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(own.member_id, f.member.user_id);
}

#[tokio::test]
async fn test_update_booking() {
    let f = fixture().await;
    let membership = f.membership(3).await;
    let booking = f.book(Some(membership.id), 1).await.unwrap();

    // 教练修改并同时批准
    let (start_time, end_time) = slot(3);
    let approved = f
        .bookings
        .update(
            &f.trainer,
            booking.id,
            UpdateBookingRequest {
                start_time: Some(start_time),
                end_time: Some(end_time),
                note: Some("moved".to_string()),
                status: Some(BookingStatus::Approved),
            },
        )
        .await
        .unwrap();
    assert_eq!(approved.status, BookingStatus::Approved);
    assert_eq!(approved.note.as_deref(), Some("moved"));
    assert_eq!(f.remaining(membership.id).await, 2);

    // 会员修改后回到 pending
    let edited = f
        .bookings
        .update(
            &f.member,
            booking.id,
            UpdateBookingRequest {
                note: Some("can we do later?".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.status, BookingStatus::Pending);
    assert_eq!(f.remaining(membership.id).await, 2);

    // 管理员修改不指定状态时保持不变
    let kept = f
        .bookings
        .update(
            &f.admin,
            booking.id,
            UpdateBookingRequest {
                note: Some("ok".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(kept.status, BookingStatus::Pending);

    assert!(matches!(
        f.bookings
            .update(
                &f.member,
                booking.id,
                UpdateBookingRequest {
                    status: Some(BookingStatus::Approved),
                    ..Default::default()
                },
            )
            .await,
        Err(AppError::PermissionDenied(_))
    ));
}

#[tokio::test]
async fn test_list_and_delete_bookings() {
    let f = fixture().await;
    let other_member = seed_user(&f.db, "other", UserRole::Member).await;
    let later = f.book(None, 5).await.unwrap();
    let sooner = f.book(None, 2).await.unwrap();
    let (start_time, end_time) = slot(1);
    f.bookings
        .create(
            &other_member,
            CreateBookingRequest {
                member_id: None,
                trainer_id: None,
                membership_id: None,
                start_time,
                end_time,
                note: None,
            },
        )
        .await
        .unwrap();

    let own = f.bookings.list(&f.member, &BookingQuery::default()).await.unwrap();
    assert_eq!(own.total, 2);
    // 按开始时间升序
    assert_eq!(own.data[0].id, sooner.id);
    assert_eq!(own.data[1].id, later.id);

    let assigned = f.bookings.list(&f.trainer, &BookingQuery::default()).await.unwrap();
    assert_eq!(assigned.total, 2);

    let all = f.bookings.list(&f.admin, &BookingQuery::default()).await.unwrap();
    assert_eq!(all.total, 3);

    // 超大页码返回空页
    let beyond = f
        .bookings
        .list(
            &f.admin,
            &BookingQuery {
                page: Some(u64::MAX),
                page_size: Some(100),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(beyond.data.is_empty());
    assert_eq!(beyond.total, 3);

    f.bookings
        .transition(&f.trainer, later.id, BookingStatus::Rejected)
        .await
        .unwrap();
    let rejected = f
        .bookings
        .list(
            &f.admin,
            &BookingQuery {
                status: Some(BookingStatus::Rejected),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(rejected.total, 1);

    assert!(matches!(
        f.bookings.delete(&f.member, sooner.id).await,
        Err(AppError::PermissionDenied(_))
    ));
    f.bookings.delete(&f.trainer, sooner.id).await.unwrap();
    assert!(matches!(
        f.bookings.get(&f.admin, sooner.id).await,
        Err(AppError::NotFound(_))
    ));
}
