use jni::JNIEnv;
use thiserror::Error;

/// Failures raised on the native side while servicing a JNI call.
#[derive(Debug, Error)]
pub(crate) enum NativeError {
    #[error("failed to allocate a Java string: {0}")]
    StringAlloc(#[from] jni::errors::Error),
}

/// Raises `java.lang.RuntimeException` on the calling thread.
///
/// Does nothing if an exception is already pending; the original exception is
/// the one the host should observe.
pub(crate) fn throw_runtime_exception(env: &mut JNIEnv, message: &str) {
    match env.exception_check() {
        Ok(true) => return,
        Ok(false) => {}
        Err(err) => {
            log::error!("could not query pending exception state: {err}");
            return;
        }
    }
    if let Err(err) = env.throw_new("java/lang/RuntimeException", message) {
        log::error!("could not raise RuntimeException `{message}`: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_alloc_message_names_the_operation() {
        let err = NativeError::from(jni::errors::Error::JavaException);
        assert!(err.to_string().starts_with("failed to allocate a Java string"));
    }
}
