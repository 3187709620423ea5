pub mod auth_service;
pub mod booking_service;
pub mod membership_service;
pub mod notification_service;
pub mod package_service;
pub mod payment_service;
pub mod profile_service;
pub mod progress_service;
pub mod review_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use booking_service::BookingService;
pub use membership_service::MembershipService;
pub use notification_service::NotificationService;
pub use package_service::PackageService;
pub use payment_service::PaymentService;
pub use profile_service::ProfileService;
pub use progress_service::ProgressService;
pub use review_service::ReviewService;
pub use user_service::UserService;
