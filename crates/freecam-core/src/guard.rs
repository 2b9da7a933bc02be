//! Block interaction filter for detached players.
//!
//! The avatar is left behind while the camera flies, so block break and
//! block damage events it raises are cancelled by the host's event systems
//! while freecam is active.

use tracing::trace;

use crate::service::FreecamService;
use crate::store::PlayerId;

/// Block events the host asks about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockAction {
    Break,
    Damage,
}

impl FreecamService {
    /// `true` when the host must cancel `action` raised by `id`.
    pub fn should_cancel_block_action(&self, id: PlayerId, action: BlockAction) -> bool {
        let cancel = self.is_active(id);
        if cancel {
            trace!(player = %id, ?action, "cancelled block action during freecam");
        }
        cancel
    }
}
