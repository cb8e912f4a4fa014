//! Session observer that reports notices through `tracing`.

use chatrizz_core::{Notice, SessionObserver};
use tracing::{error, info, warn};

/// Logs each notice at a level matching its severity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSessionObserver;

impl SessionObserver for TracingSessionObserver {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::SessionExpired | Notice::ServerError => {
                error!(notice = ?notice, "{}", notice.message());
            }
            Notice::PermissionDenied => warn!(notice = ?notice, "{}", notice.message()),
            Notice::LoginSucceeded | Notice::LoggedOut => {
                info!(notice = ?notice, "{}", notice.message());
            }
        }
    }

    fn session_ended(&self) {
        info!("session ended; sign in again to continue");
    }
}
