use soroban_sdk::Env;

use crate::{storage::DataKey, DropError};

/// Marks a withdrawal as in flight for as long as the value lives.
///
/// The marker sits in temporary storage and is cleared on drop, so the
/// lock's lifetime is the lexical scope that owns it. A second acquire while
/// the first is alive fails instead of starting another withdrawal.
pub struct WithdrawLock {
    env: Env,
}

impl WithdrawLock {
    pub fn acquire(env: &Env) -> Result<Self, DropError> {
        let storage = env.storage().temporary();
        if storage.has(&DataKey::WithdrawLock) {
            return Err(DropError::WithdrawInProgress);
        }
        storage.set(&DataKey::WithdrawLock, &true);
        Ok(Self { env: env.clone() })
    }
}

impl Drop for WithdrawLock {
    fn drop(&mut self) {
        self.env.storage().temporary().remove(&DataKey::WithdrawLock);
    }
}
