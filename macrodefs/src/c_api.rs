use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};

use crate::config::RenderConfig;
use crate::macros::Macros;

/// Return code for a successful call
const OK: c_int = 0;
/// Return code for null pointers, invalid UTF-8, or an invalid macro
const INVALID: c_int = -1;

/// Borrow a C string as UTF-8, rejecting null and invalid input
///
/// # Safety
/// `ptr` must be null or point to a valid null-terminated C string.
unsafe fn str_from_c<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

/// Create a new, empty macro set for the C API
#[unsafe(no_mangle)]
pub extern "C" fn macrodefs_new() -> *mut Macros {
    Box::into_raw(Box::new(Macros::new()))
}

/// Free a macro set created by the C API
///
/// # Safety
/// The pointer must have been created by `macrodefs_new` and not already freed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn macrodefs_free(set: *mut Macros) {
    if !set.is_null() {
        unsafe {
            drop(Box::from_raw(set));
        }
    }
}

/// Define a macro; `value` may be null for a definition without a value
///
/// Returns 0 on success, -1 on invalid input.
///
/// # Safety
/// - `set` must be valid and created by `macrodefs_new`
/// - `name` and (if non-null) `value` must be valid null-terminated C strings
#[unsafe(no_mangle)]
pub unsafe extern "C" fn macrodefs_define(
    set: *mut Macros,
    name: *const c_char,
    value: *const c_char,
) -> c_int {
    if set.is_null() {
        return INVALID;
    }
    let Some(name) = (unsafe { str_from_c(name) }) else {
        return INVALID;
    };
    let definition = if value.is_null() {
        None
    } else {
        match unsafe { str_from_c(value) } {
            Some(v) => Some(v),
            None => return INVALID,
        }
    };

    let macros = unsafe { &mut *set };
    match macros.define(name, definition, false) {
        Ok(_) => OK,
        Err(_) => INVALID,
    }
}

/// Mark a macro as explicitly undefined
///
/// Returns 0 on success, -1 on invalid input.
///
/// # Safety
/// - `set` must be valid and created by `macrodefs_new`
/// - `name` must be a valid null-terminated C string
#[unsafe(no_mangle)]
pub unsafe extern "C" fn macrodefs_undefine(set: *mut Macros, name: *const c_char) -> c_int {
    if set.is_null() {
        return INVALID;
    }
    let Some(name) = (unsafe { str_from_c(name) }) else {
        return INVALID;
    };
    let macros = unsafe { &mut *set };
    match macros.undefine(name) {
        Ok(_) => OK,
        Err(_) => INVALID,
    }
}

/// Remove a macro. Returns 1 if it was present, 0 if not, -1 on invalid input.
///
/// # Safety
/// - `set` must be valid and created by `macrodefs_new`
/// - `name` must be a valid null-terminated C string
#[unsafe(no_mangle)]
pub unsafe extern "C" fn macrodefs_delete(set: *mut Macros, name: *const c_char) -> c_int {
    if set.is_null() {
        return INVALID;
    }
    let Some(name) = (unsafe { str_from_c(name) }) else {
        return INVALID;
    };
    let macros = unsafe { &mut *set };
    c_int::from(macros.delete(name))
}

/// Render the macro set; `separator` may be null for the default `" -"`
///
/// # Safety
/// - `set` must be valid and created by `macrodefs_new`
/// - `separator`, if non-null, must be a valid null-terminated C string
/// - The returned string must be freed with `macrodefs_free_string`
#[unsafe(no_mangle)]
pub unsafe extern "C" fn macrodefs_to_string(
    set: *const Macros,
    separator: *const c_char,
) -> *mut c_char {
    if set.is_null() {
        return std::ptr::null_mut();
    }
    let config = if separator.is_null() {
        RenderConfig::default()
    } else {
        match unsafe { str_from_c(separator) } {
            Some(sep) => RenderConfig::new().with_separator(sep),
            None => return std::ptr::null_mut(),
        }
    };

    let macros = unsafe { &*set };
    match CString::new(macros.render(&config)) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Free a string returned by `macrodefs_to_string`
///
/// # Safety
/// The pointer must have been returned by `macrodefs_to_string` and not already freed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn macrodefs_free_string(result: *mut c_char) {
    if !result.is_null() {
        unsafe {
            drop(CString::from_raw(result));
        }
    }
}
