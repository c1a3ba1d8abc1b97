use cvsafe_sys::status::{CV_STS_BAD_SIZE, CV_STS_ERROR, CV_STS_NULL_PTR, CV_STS_OUT_OF_RANGE};

use crate::{
    Result,
    error::{Error, ErrorKind},
    verify_arg, verify_range,
};

#[test]
fn test_status_mapping() {
    let err = Error::from_status(CV_STS_OUT_OF_RANGE, "cv_get_rows");
    assert!(err.is_out_of_range());
    assert!(err.to_string().starts_with("cv_get_rows: "));

    let err = Error::from_status(CV_STS_NULL_PTR, "cv_get_cols");
    assert!(matches!(err.kind(), ErrorKind::InvalidHandle { .. }));

    let err = Error::from_status(CV_STS_BAD_SIZE, "cv_reshape");
    assert!(matches!(
        err.kind(),
        ErrorKind::InvalidArgument { name, .. } if name == "cv_reshape"
    ));

    match Error::from_status(CV_STS_ERROR, "cv_clone_mat").into_kind() {
        ErrorKind::Native {
            status, message, ..
        } => {
            assert_eq!(status, CV_STS_ERROR);
            assert_eq!(message, "Unspecified error");
        }
        other => panic!("unexpected error kind: {other:?}"),
    }
}

#[test]
fn test_size_mismatch_message() {
    let err = Error::size_mismatch(5, 3);
    assert_eq!(
        err.to_string(),
        "size mismatch: 5 elements required, 3 available"
    );
}

#[test]
fn test_verify_arg() {
    fn check(len: usize) -> Result<usize> {
        verify_arg!(len, len <= 4);
        Ok(len)
    }
    assert_eq!(check(3).unwrap(), 3);
    let err = check(9).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));
}

#[test]
fn test_verify_range() {
    fn narrow(value: usize) -> Result<i32> {
        verify_range!("narrow", value <= i32::MAX as usize);
        Ok(value as i32)
    }
    assert_eq!(narrow(17).unwrap(), 17);
    let err = narrow(usize::MAX).unwrap_err();
    assert!(err.is_out_of_range());
    assert!(err.to_string().starts_with("narrow: "));
}
