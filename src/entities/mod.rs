pub mod bookings;
pub mod member_profiles;
pub mod memberships;
pub mod notifications;
pub mod packages;
pub mod payments;
pub mod progress_records;
pub mod reviews;
pub mod users;

pub use bookings::BookingStatus;
pub use memberships::MembershipStatus;
pub use notifications::NotificationType;
pub use packages::DurationClass;
pub use payments::{PaymentMethod, PaymentStatus};
pub use users::UserRole;

pub use bookings as booking_entity;
pub use member_profiles as member_profile_entity;
pub use memberships as membership_entity;
pub use notifications as notification_entity;
pub use packages as package_entity;
pub use payments as payment_entity;
pub use progress_records as progress_record_entity;
pub use reviews as review_entity;
pub use users as user_entity;
