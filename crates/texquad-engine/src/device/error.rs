use glutin::error::ErrorKind;

/// High-level response after a failed buffer swap.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SwapErrorAction {
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Context or surface is gone; terminate gracefully.
    Fatal,
}

pub(crate) fn classify_swap_error(kind: &ErrorKind) -> SwapErrorAction {
    match kind {
        ErrorKind::ContextLost
        | ErrorKind::BadContext
        | ErrorKind::BadSurface
        | ErrorKind::BadNativeWindow => SwapErrorAction::Fatal,
        _ => SwapErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lost_context_is_fatal() {
        assert_eq!(classify_swap_error(&ErrorKind::ContextLost), SwapErrorAction::Fatal);
        assert_eq!(classify_swap_error(&ErrorKind::BadSurface), SwapErrorAction::Fatal);
        assert_eq!(classify_swap_error(&ErrorKind::BadContext), SwapErrorAction::Fatal);
        assert_eq!(classify_swap_error(&ErrorKind::BadNativeWindow), SwapErrorAction::Fatal);
    }

    #[test]
    fn other_errors_skip_the_frame() {
        assert_eq!(classify_swap_error(&ErrorKind::BadAccess), SwapErrorAction::SkipFrame);
        assert_eq!(classify_swap_error(&ErrorKind::Misc), SwapErrorAction::SkipFrame);
        assert_eq!(classify_swap_error(&ErrorKind::OutOfMemory), SwapErrorAction::SkipFrame);
    }
}
