//! The fixed greeting handed back to `NativeLib.stringFromJNI` callers.

/// Content of the greeting. Host-side callers assert on this exact value, so
/// it must not drift.
pub(crate) const GREETING: &str = "Hello from C++";

/// Builds a fresh owned copy of the greeting.
///
/// Each call allocates independently; ownership of the result moves to the
/// caller and nothing is retained here.
pub(crate) fn greeting() -> String {
    GREETING.to_owned()
}
