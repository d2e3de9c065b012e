use {
    crate::CodecError,
    std::panic::{self, AssertUnwindSafe},
};

// Runs one codec stage and turns a panic from inside the codec into
// `CodecError::Internal`. Everything the stage allocated is owned by the
// closure, so unwinding out of it releases it before we return.
pub(crate) fn contain<T>(
    stage: &'static str,
    f: impl FnOnce() -> Result<T, CodecError>,
) -> Result<T, CodecError> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = if let Some(s) = payload.downcast_ref::<&str>() {
                (*s).to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic".to_string()
            };
            Err(CodecError::Internal { stage, message })
        }
    }
}
