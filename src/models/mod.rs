pub mod actor;
pub mod booking;
pub mod member_profile;
pub mod membership;
pub mod notification;
pub mod package;
pub mod pagination;
pub mod payment;
pub mod progress;
pub mod review;
pub mod user;

pub use actor::*;
pub use booking::*;
pub use member_profile::*;
pub use membership::*;
pub use notification::*;
pub use package::*;
pub use pagination::*;
pub use payment::*;
pub use progress::*;
pub use review::*;
pub use user::*;
