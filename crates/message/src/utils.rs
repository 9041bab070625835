//! Utility macros shared by the stream and protocol modules.

/// Returns early with an error if a condition is not met.
///
/// Works like `assert!`, but hands the error back to the caller instead of
/// panicking. Used for capability and lifecycle guards on [`Stream`] and for
/// header validation.
///
/// # Arguments
///
/// * `$predicate` - A boolean expression that should evaluate to true
/// * `$error` - The error value to return if the predicate is false
///
/// # Example
///
/// ```ignore
/// ensure!(self.capabilities.writable, StreamError::NotWritable);
/// ```
///
/// [`Stream`]: crate::stream::Stream
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
