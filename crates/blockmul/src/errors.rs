//! Error handling and exit codes.

use blockmul_core::constants::exit_codes;
use blockmul_core::error::BlockError;

/// Map a multiplication error to the process exit code.
pub fn handle_error(err: &BlockError) -> i32 {
    match err {
        BlockError::InvalidInput(_) => exit_codes::ERROR_INVALID_INPUT,
        BlockError::Config(_) => exit_codes::ERROR_CONFIG,
        BlockError::Mismatch => exit_codes::ERROR_MISMATCH,
        BlockError::Shape(_) | BlockError::Policy(_) | BlockError::Pool(_) | BlockError::Aborted => {
            exit_codes::ERROR_GENERIC
        }
    }
}

/// Exit code for an application error, looking through context layers.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<BlockError>())
        .map_or(exit_codes::ERROR_GENERIC, handle_error)
}
