pub mod auth;
pub mod booking;
pub mod member_profile;
pub mod membership;
pub mod notification;
pub mod package;
pub mod payment;
pub mod progress;
pub mod review;
pub mod user;

pub use auth::auth_config;
pub use booking::booking_config;
pub use member_profile::member_profile_config;
pub use membership::membership_config;
pub use notification::notification_config;
pub use package::package_config;
pub use payment::payment_config;
pub use progress::progress_config;
pub use review::review_config;
pub use user::user_config;
