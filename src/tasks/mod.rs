//! Background scheduled tasks for the application.
//!
//! Call `spawn_all` once during startup to launch them.

use crate::config::TasksConfig;
use crate::services::MembershipService;
use std::time::Duration;

/// Spawn all background tasks.
///
/// The membership expiry sweep only touches rows that no request reads again;
/// every read/write path already refreshes the status it sees.
pub fn spawn_all(config: &TasksConfig, membership_service: MembershipService) {
    // 会员过期扫描，间隔为 0 时关闭
    if config.expiry_sweep_interval_secs == 0 {
        log::info!("Membership expiry sweep disabled");
        return;
    }

    let interval = Duration::from_secs(config.expiry_sweep_interval_secs);
    tokio::spawn(async move {
        loop {
            match membership_service.expire_memberships().await {
                Ok(n) if n > 0 => log::info!("Expired memberships processed: {n}"),
                Ok(_) => {}
                Err(e) => log::error!("Failed to expire memberships: {e:?}"),
            }
            tokio::time::sleep(interval).await;
        }
    });
}
