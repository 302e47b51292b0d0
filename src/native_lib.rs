//! JNI bindings for the host `NativeLib` class.

use std::ffi::c_void;
use std::panic::AssertUnwindSafe;
use std::ptr;

use jni::objects::JObject;
use jni::sys::{JNI_VERSION_1_6, jint, jstring};
use jni::{JNIEnv, JavaVM};

use crate::error::{NativeError, throw_runtime_exception};
use crate::greeting;
use crate::logging;

/// Runs when the host executes `System.loadLibrary("testing")`.
///
/// Only installs logging; the library keeps no other process state.
#[unsafe(no_mangle)]
pub extern "system" fn JNI_OnLoad(_vm: JavaVM, _reserved: *mut c_void) -> jint {
    logging::init_from_env();
    log::debug!("testing native library loaded");
    JNI_VERSION_1_6
}

/// Returns the fixed greeting as a new Java string.
///
/// The receiver object is unused. Ownership of the returned string moves to
/// the calling runtime; no reference is retained on the native side. On
/// failure a `java.lang.RuntimeException` is raised (unless the runtime
/// already has one pending) and null is returned.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_yeutsau_kawakarpo_core_testing_NativeLib_stringFromJNI<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jstring {
    let result = std::panic::catch_unwind(AssertUnwindSafe(|| new_greeting_string(&mut env)));
    match result {
        Ok(Ok(value)) => value,
        Ok(Err(err)) => {
            throw_runtime_exception(&mut env, &err.to_string());
            ptr::null_mut()
        }
        Err(_) => {
            throw_runtime_exception(&mut env, "panic while building the greeting");
            ptr::null_mut()
        }
    }
}

fn new_greeting_string(env: &mut JNIEnv) -> Result<jstring, NativeError> {
    let value = env.new_string(greeting::greeting())?;
    Ok(value.into_raw())
}
