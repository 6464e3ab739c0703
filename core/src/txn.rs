//! The explicit transaction boundary wrapping every public operation.
//!
//! The execution environment promises fully serialized, atomic
//! operations. In-process that means: snapshot the state, run the
//! operation, and restore the snapshot on any error. A failure anywhere —
//! including after an endorsement nonce was consumed — rolls everything
//! back, so partial application is impossible by construction.

use crate::error::CoreError;
use crate::state::CoreState;

/// Run `op` against `state` with all-or-nothing semantics.
pub(crate) fn transactional<T>(
    state: &mut CoreState,
    op: impl FnOnce(&mut CoreState) -> Result<T, CoreError>,
) -> Result<T, CoreError> {
    let snapshot = state.clone();
    match op(state) {
        Ok(value) => Ok(value),
        Err(err) => {
            *state = snapshot;
            Err(err)
        }
    }
}
