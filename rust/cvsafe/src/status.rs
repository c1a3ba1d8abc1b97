use cvsafe_common::{Result, error::Error, verify_range};
use cvsafe_sys::CV_STS_OK;
use libc::c_int;

/// Turns the status code returned by the native entry point `function` into a result.
#[inline]
pub(crate) fn check(status: c_int, function: &str) -> Result<()> {
    if status == CV_STS_OK {
        Ok(())
    } else {
        Err(Error::from_status(status, function))
    }
}

/// Narrows a wrapper-side size or index to the native integer width.
#[inline]
pub(crate) fn to_c_int(value: usize, name: &str) -> Result<c_int> {
    verify_range!(name, value <= c_int::MAX as usize);
    Ok(value as c_int)
}
