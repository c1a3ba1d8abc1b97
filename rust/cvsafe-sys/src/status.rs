//! Status codes returned by fallible engine calls.

use libc::{c_char, c_int};

pub const CV_STS_OK: c_int = 0;
pub const CV_STS_ERROR: c_int = -2;
pub const CV_STS_NO_MEM: c_int = -4;
pub const CV_STS_BAD_ARG: c_int = -5;
pub const CV_STS_NULL_PTR: c_int = -27;
pub const CV_STS_BAD_SIZE: c_int = -201;
pub const CV_STS_UNMATCHED_FORMATS: c_int = -205;
pub const CV_STS_UNMATCHED_SIZES: c_int = -209;
pub const CV_STS_UNSUPPORTED_FORMAT: c_int = -210;
pub const CV_STS_OUT_OF_RANGE: c_int = -211;

/// Returns a static, NUL-terminated description of a status code.
///
/// The returned pointer is never null and stays valid for the life of the process.
#[unsafe(no_mangle)]
pub extern "C" fn cv_error_str(status: c_int) -> *const c_char {
    let text: &'static [u8] = match status {
        CV_STS_OK => b"No Error\0",
        CV_STS_ERROR => b"Unspecified error\0",
        CV_STS_NO_MEM => b"Insufficient memory\0",
        CV_STS_BAD_ARG => b"Bad argument\0",
        CV_STS_NULL_PTR => b"Null pointer\0",
        CV_STS_BAD_SIZE => b"Incorrect size of input array\0",
        CV_STS_UNMATCHED_FORMATS => b"Formats of input arguments do not match\0",
        CV_STS_UNMATCHED_SIZES => b"Sizes of input arguments do not match\0",
        CV_STS_UNSUPPORTED_FORMAT => b"Unsupported format or combination of formats\0",
        CV_STS_OUT_OF_RANGE => b"One of arguments' values is out of range\0",
        _ => b"Unknown error code\0",
    };
    text.as_ptr().cast()
}
