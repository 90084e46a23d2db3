//! C FFI bindings for embedding the detector in device firmware or mobile apps.
//!
//! Memory Safety:
//! - Sessions must be freed with `crash_session_destroy()`
//! - Strings returned by `crash_session_last_reason()` are owned by the
//!   session and stay valid until the next detect/destroy call
//! - NULL checks are performed on all inputs
//!
//! Thread Safety:
//! - A session is NOT thread-safe. Use a single thread or mutex per session.

use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

use crate::session::DetectionSession;
use crate::types::{Outcome, VehicleProfile};

// ============================================================================
// OPAQUE HANDLE TYPES
// ============================================================================

/// Opaque handle to a detection session.
pub struct CrashSession {
    session: DetectionSession,
    last_reason: Option<CString>,
}

/// Result status codes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashStatus {
    /// Operation succeeded.
    Ok = 0,
    /// Null pointer provided.
    NullPointer = 1,
    /// Invalid parameter value (unknown vehicle code, non-finite reading).
    InvalidParameter = 2,
}

/// Vehicle codes accepted across the ABI.
pub const CRASH_VEHICLE_CAR: i32 = 0;
pub const CRASH_VEHICLE_SCOOTER: i32 = 1;

/// Verdict from `crash_session_detect()`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct CrashVerdict {
    /// 1 if an accident was detected, else 0.
    pub is_accident: i32,
    /// Danger in [0, 100].
    pub danger_percentage: i32,
    /// 0=Instantaneous, 1=InsufficientData, 2=Confirmed, 3=NoiseFiltered.
    pub outcome: i32,
    /// Severity band: 0=Moderate, 1=High, 2=Critical.
    pub level: i32,
}

fn vehicle_from_code(code: i32) -> Option<VehicleProfile> {
    match code {
        CRASH_VEHICLE_CAR => Some(VehicleProfile::Car),
        CRASH_VEHICLE_SCOOTER => Some(VehicleProfile::Scooter),
        _ => None,
    }
}

fn outcome_code(outcome: Outcome) -> i32 {
    match outcome {
        Outcome::Instantaneous => 0,
        Outcome::InsufficientData => 1,
        Outcome::Confirmed => 2,
        Outcome::NoiseFiltered => 3,
    }
}

// ============================================================================
// SESSION LIFECYCLE
// ============================================================================

/// Create a new session with default settings for the given vehicle.
///
/// # Returns
/// - Pointer to CrashSession on success.
/// - NULL if the vehicle code is unknown.
#[no_mangle]
pub extern "C" fn crash_session_create(vehicle: i32) -> *mut CrashSession {
    let Some(profile) = vehicle_from_code(vehicle) else {
        return ptr::null_mut();
    };

    let mut session = DetectionSession::new();
    session.set_vehicle_type(profile);

    Box::into_raw(Box::new(CrashSession {
        session,
        last_reason: None,
    }))
}

/// Destroy a session and free its memory.
///
/// # Safety
/// - `handle` must be a pointer returned by `crash_session_create()`, or NULL.
/// - `handle` must not be used after this call.
#[no_mangle]
pub unsafe extern "C" fn crash_session_destroy(handle: *mut CrashSession) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

/// Clear the reading window, keeping the vehicle.
///
/// # Safety
/// - `handle` must be a valid pointer from `crash_session_create()`.
#[no_mangle]
pub unsafe extern "C" fn crash_session_reset(handle: *mut CrashSession) -> CrashStatus {
    let Some(handle) = handle.as_mut() else {
        return CrashStatus::NullPointer;
    };
    handle.session.reset();
    CrashStatus::Ok
}

/// Switch vehicle; this also clears the reading window.
///
/// # Safety
/// - `handle` must be a valid pointer from `crash_session_create()`.
#[no_mangle]
pub unsafe extern "C" fn crash_session_set_vehicle(
    handle: *mut CrashSession,
    vehicle: i32,
) -> CrashStatus {
    let Some(handle) = handle.as_mut() else {
        return CrashStatus::NullPointer;
    };
    let Some(profile) = vehicle_from_code(vehicle) else {
        return CrashStatus::InvalidParameter;
    };
    handle.session.set_vehicle_type(profile);
    CrashStatus::Ok
}

// ============================================================================
// SAMPLE PROCESSING
// ============================================================================

/// Add one reading. Acceleration in g, angular velocity in deg/s.
///
/// # Safety
/// - `handle` must be a valid pointer from `crash_session_create()`.
#[no_mangle]
pub unsafe extern "C" fn crash_session_add_reading(
    handle: *mut CrashSession,
    acc_x: f64,
    acc_y: f64,
    acc_z: f64,
    gyro_x: f64,
    gyro_y: f64,
    gyro_z: f64,
) -> CrashStatus {
    let Some(handle) = handle.as_mut() else {
        return CrashStatus::NullPointer;
    };
    match handle
        .session
        .add_reading(acc_x, acc_y, acc_z, gyro_x, gyro_y, gyro_z)
    {
        Ok(()) => CrashStatus::Ok,
        Err(_) => CrashStatus::InvalidParameter,
    }
}

/// Evaluate the latest reading against recent history.
///
/// # Safety
/// - `handle` must be a valid pointer from `crash_session_create()`.
/// - `out` must be a valid pointer to a CrashVerdict.
#[no_mangle]
pub unsafe extern "C" fn crash_session_detect(
    handle: *mut CrashSession,
    out: *mut CrashVerdict,
) -> CrashStatus {
    let (Some(handle), Some(out)) = (handle.as_mut(), out.as_mut()) else {
        return CrashStatus::NullPointer;
    };

    let verdict = handle.session.detect_with_history();
    *out = CrashVerdict {
        is_accident: i32::from(verdict.is_accident),
        danger_percentage: i32::from(verdict.danger_percentage),
        outcome: outcome_code(verdict.outcome),
        level: verdict.level() as i32,
    };
    // Reasons never contain interior NULs; fall back to none if one did.
    handle.last_reason = CString::new(verdict.reason).ok();

    CrashStatus::Ok
}

/// Reason text of the most recent `crash_session_detect()` call.
///
/// # Safety
/// - `handle` must be a valid pointer from `crash_session_create()`.
///
/// # Returns
/// - NUL-terminated UTF-8 string owned by the session, or NULL if detect
///   has not been called since the session was created.
#[no_mangle]
pub unsafe extern "C" fn crash_session_last_reason(handle: *const CrashSession) -> *const c_char {
    match handle.as_ref().and_then(|h| h.last_reason.as_ref()) {
        Some(reason) => reason.as_ptr(),
        None => ptr::null(),
    }
}

/// Number of readings currently in the window, or -1 for a NULL handle.
///
/// # Safety
/// - `handle` must be a valid pointer from `crash_session_create()`.
#[no_mangle]
pub unsafe extern "C" fn crash_session_reading_count(handle: *const CrashSession) -> i32 {
    match handle.as_ref() {
        Some(h) => h.session.len() as i32,
        None => -1,
    }
}

// ============================================================================
// UTILITY FUNCTIONS
// ============================================================================

/// Get library version string.
#[no_mangle]
pub extern "C" fn crash_version() -> *const c_char {
    static VERSION: &[u8] = concat!("crash-sensing ", env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
