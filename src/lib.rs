//! JNI entry points for the kawakarpo `testing` native library.

mod error;
mod greeting;
mod logging;
mod native_lib;
