use std::ptr;

use libc::c_int;

use crate::{
    CvDMatch, CvMat, CvRect, CvScalar, CV_32F, CV_32S, CV_8U, CV_STS_BAD_SIZE, CV_STS_NULL_PTR,
    CV_STS_OK, CV_STS_OUT_OF_RANGE, CV_STS_UNMATCHED_SIZES, cv_clone_mat, cv_create_mat,
    cv_create_mat_header, cv_debug_counters, cv_get_cols, cv_get_diag, cv_get_real_2d,
    cv_get_rows, cv_get_sub_rect, cv_make_type, cv_release_mat, cv_reinterpret, cv_reshape,
    cv_set, cv_set_real_2d, cv_vector_DMatch_copy, cv_vector_DMatch_delete,
    cv_vector_DMatch_new_array, cv_vector_DMatch_size, cv_vector_int_delete,
    cv_vector_int_iterator_delete, cv_vector_int_iterator_has_next, cv_vector_int_iterator_new,
    cv_vector_int_iterator_next, cv_vector_int_new, cv_vector_int_new_array,
    cv_vector_int_size,
};

fn real(mat: *const CvMat, row: i32, col: i32) -> f64 {
    let mut value = 0.0;
    assert_eq!(unsafe { cv_get_real_2d(mat, row, col, &mut value) }, CV_STS_OK);
    value
}

/// Creates a single-channel `f32` matrix with element (r, c) = r * 10 + c.
fn numbered(rows: i32, cols: i32) -> *mut CvMat {
    let mat = cv_create_mat(rows, cols, cv_make_type(CV_32F, 1));
    assert!(!mat.is_null());
    for r in 0..rows {
        for c in 0..cols {
            let status = unsafe { cv_set_real_2d(mat, r, c, (r * 10 + c) as f64) };
            assert_eq!(status, CV_STS_OK);
        }
    }
    mat
}

#[test]
fn test_create_and_release_balance() {
    let before = cv_debug_counters();
    let mut mat = cv_create_mat(3, 4, cv_make_type(CV_8U, 3));
    let mut header = cv_create_mat_header(3, 4, cv_make_type(CV_8U, 1));
    unsafe {
        assert_eq!((*mat).step, 12);
        assert!((*header).data.is_null());
        cv_release_mat(&mut mat);
        cv_release_mat(&mut header);
    }
    assert!(mat.is_null());
    assert!(header.is_null());

    // Releasing an already nulled pointer is a no-op.
    unsafe { cv_release_mat(&mut mat) };
    unsafe { cv_release_mat(ptr::null_mut()) };

    let delta = cv_debug_counters().since(&before);
    assert_eq!(delta.mat_headers_created, 2);
    assert_eq!(delta.mat_headers_released, 2);
    assert_eq!(delta.data_blocks_created, 1);
    assert_eq!(delta.data_blocks_released, 1);
}

#[test]
fn test_invalid_dimensions_rejected() {
    assert!(cv_create_mat(-1, 4, cv_make_type(CV_8U, 1)).is_null());
    assert!(cv_create_mat(1, 4, 7).is_null());
    assert!(cv_create_mat_header(2, -3, cv_make_type(CV_32F, 1)).is_null());
}

#[test]
fn test_rows_view_aliases_storage() {
    let mut mat = numbered(10, 4);
    let mut rows = CvMat::empty();
    assert_eq!(unsafe { cv_get_rows(mat, &mut rows, 2, 5, 1) }, CV_STS_OK);
    assert_eq!(rows.rows, 3);
    assert_eq!(rows.cols, 4);
    assert!(rows.refcount.is_null());
    assert_eq!(real(&rows, 0, 1), 21.0);

    unsafe { cv_set_real_2d(&rows, 1, 0, -1.0) };
    assert_eq!(real(mat, 3, 0), -1.0);

    let mut every_other = CvMat::empty();
    assert_eq!(unsafe { cv_get_rows(mat, &mut every_other, 0, 10, 3) }, CV_STS_OK);
    assert_eq!(every_other.rows, 4);
    assert_eq!(real(&every_other, 3, 2), 92.0);

    assert_eq!(
        unsafe { cv_get_rows(mat, &mut rows, 4, 11, 1) },
        CV_STS_OUT_OF_RANGE
    );
    assert_eq!(
        unsafe { cv_get_rows(mat, &mut rows, 5, 4, 1) },
        CV_STS_OUT_OF_RANGE
    );
    unsafe { cv_release_mat(&mut mat) };
}

#[test]
fn test_cols_and_sub_rect() {
    let mut mat = numbered(5, 6);
    let mut cols = CvMat::empty();
    assert_eq!(unsafe { cv_get_cols(mat, &mut cols, 2, 4) }, CV_STS_OK);
    assert_eq!((cols.rows, cols.cols), (5, 2));
    assert_eq!(real(&cols, 4, 1), 43.0);

    let mut rect = CvMat::empty();
    let area = CvRect {
        x: 1,
        y: 2,
        width: 3,
        height: 2,
    };
    assert_eq!(unsafe { cv_get_sub_rect(mat, &mut rect, area) }, CV_STS_OK);
    assert_eq!((rect.rows, rect.cols), (2, 3));
    assert_eq!(real(&rect, 1, 2), 33.0);

    let empty = CvRect {
        x: 6,
        y: 5,
        width: 0,
        height: 0,
    };
    assert_eq!(unsafe { cv_get_sub_rect(mat, &mut rect, empty) }, CV_STS_OK);
    assert_eq!((rect.rows, rect.cols), (0, 0));

    let outside = CvRect {
        x: 4,
        y: 0,
        width: 3,
        height: 1,
    };
    assert_eq!(
        unsafe { cv_get_sub_rect(mat, &mut rect, outside) },
        CV_STS_OUT_OF_RANGE
    );
    assert_eq!(
        unsafe { cv_get_sub_rect(ptr::null(), &mut rect, area) },
        CV_STS_NULL_PTR
    );
    unsafe { cv_release_mat(&mut mat) };
}

#[test]
fn test_diagonals() {
    let mut mat = numbered(3, 4);
    let mut diag = CvMat::empty();

    assert_eq!(unsafe { cv_get_diag(mat, &mut diag, 0) }, CV_STS_OK);
    assert_eq!((diag.rows, diag.cols), (3, 1));
    assert_eq!(real(&diag, 2, 0), 22.0);

    assert_eq!(unsafe { cv_get_diag(mat, &mut diag, -1) }, CV_STS_OK);
    assert_eq!(diag.rows, 3);
    assert_eq!(real(&diag, 0, 0), 1.0);
    assert_eq!(real(&diag, 2, 0), 23.0);

    assert_eq!(unsafe { cv_get_diag(mat, &mut diag, 2) }, CV_STS_OK);
    assert_eq!(diag.rows, 1);
    assert_eq!(real(&diag, 0, 0), 20.0);

    assert_eq!(
        unsafe { cv_get_diag(mat, &mut diag, 3) },
        CV_STS_OUT_OF_RANGE
    );
    assert_eq!(
        unsafe { cv_get_diag(mat, &mut diag, -4) },
        CV_STS_OUT_OF_RANGE
    );
    unsafe { cv_release_mat(&mut mat) };
}

#[test]
fn test_reshape_and_reinterpret() {
    let mut mat = cv_create_mat(4, 6, cv_make_type(CV_8U, 1));
    let mut out = CvMat::empty();

    assert_eq!(unsafe { cv_reshape(mat, &mut out, 3, 0) }, CV_STS_OK);
    assert_eq!((out.rows, out.cols, out.type_), (4, 2, cv_make_type(CV_8U, 3)));

    assert_eq!(unsafe { cv_reshape(mat, &mut out, 0, 8) }, CV_STS_OK);
    assert_eq!((out.rows, out.cols, out.step), (8, 3, 3));

    assert_eq!(unsafe { cv_reshape(mat, &mut out, 0, 5) }, CV_STS_BAD_SIZE);
    assert_eq!(unsafe { cv_reshape(mat, &mut out, 4, 0) }, CV_STS_BAD_SIZE);

    let mut ints = cv_create_mat(2, 3, cv_make_type(CV_32S, 1));
    assert_eq!(unsafe { cv_reinterpret(ints, &mut out, CV_8U) }, CV_STS_OK);
    assert_eq!((out.rows, out.cols), (2, 12));
    assert_eq!(unsafe { cv_reinterpret(mat, &mut out, CV_32S) }, CV_STS_BAD_SIZE);

    unsafe {
        cv_release_mat(&mut mat);
        cv_release_mat(&mut ints);
    }
}

#[test]
fn test_oversized_regions_rejected() {
    // A 50000 x 50000 byte matrix; the header is never used to touch elements.
    let large = CvMat {
        type_: cv_make_type(CV_8U, 1),
        step: 50_000,
        refcount: ptr::null_mut(),
        data: ptr::null_mut(),
        rows: 50_000,
        cols: 50_000,
    };
    let mut out = CvMat::empty();
    assert_eq!(
        unsafe { cv_reshape(&large, &mut out, 0, 1) },
        CV_STS_BAD_SIZE
    );
    assert_eq!(unsafe { cv_reshape(&large, &mut out, 0, 2) }, CV_STS_OK);
    assert_eq!((out.rows, out.cols), (2, 1_250_000_000));
    assert_eq!(unsafe { cv_reshape(&large, &mut out, 0, 50_000) }, CV_STS_OK);
    assert_eq!(
        unsafe { cv_get_rows(&large, &mut out, 0, 50_000, 50_000) },
        CV_STS_BAD_SIZE
    );

    let wide_step = CvMat {
        step: c_int::MAX,
        rows: 2,
        cols: 2,
        ..large
    };
    assert_eq!(
        unsafe { cv_get_diag(&wide_step, &mut out, 0) },
        CV_STS_BAD_SIZE
    );
    assert_eq!(unsafe { cv_get_diag(&wide_step, &mut out, 1) }, CV_STS_OK);
    assert_eq!((out.rows, out.step), (1, c_int::MAX));
}

#[test]
fn test_clone_is_independent() {
    let mut mat = numbered(3, 3);
    let mut rect = CvMat::empty();
    let area = CvRect {
        x: 1,
        y: 1,
        width: 2,
        height: 2,
    };
    unsafe { cv_get_sub_rect(mat, &mut rect, area) };
    let mut copy = unsafe { cv_clone_mat(&rect) };
    assert!(!copy.is_null());
    assert_eq!(unsafe { (*copy).step }, 8);
    assert_eq!(real(copy, 1, 1), 22.0);

    unsafe { cv_set_real_2d(copy, 1, 1, 5.0) };
    assert_eq!(real(mat, 2, 2), 22.0);
    unsafe {
        cv_release_mat(&mut copy);
        cv_release_mat(&mut mat);
    }
}

#[test]
fn test_set_with_and_without_mask() {
    let mut mat = cv_create_mat(2, 2, cv_make_type(CV_32S, 1));
    let mut mask = cv_create_mat(2, 2, cv_make_type(CV_8U, 1));
    let scalar = CvScalar {
        val: [7.0, 0.0, 0.0, 0.0],
    };

    unsafe { cv_set_real_2d(mask, 0, 1, 1.0) };
    assert_eq!(unsafe { cv_set(mat, scalar, mask) }, CV_STS_OK);
    assert_eq!(real(mat, 0, 0), 0.0);
    assert_eq!(real(mat, 0, 1), 7.0);

    assert_eq!(unsafe { cv_set(mat, scalar, ptr::null()) }, CV_STS_OK);
    assert_eq!(real(mat, 1, 0), 7.0);

    let mut small = cv_create_mat(1, 2, cv_make_type(CV_8U, 1));
    assert_eq!(unsafe { cv_set(mat, scalar, small) }, CV_STS_UNMATCHED_SIZES);
    unsafe {
        cv_release_mat(&mut small);
        cv_release_mat(&mut mask);
        cv_release_mat(&mut mat);
    }
}

#[test]
fn test_integer_writes_round_and_saturate() {
    let mut mat = cv_create_mat(1, 2, cv_make_type(CV_8U, 1));
    unsafe {
        cv_set_real_2d(mat, 0, 0, 300.0);
        cv_set_real_2d(mat, 0, 1, 2.6);
    }
    assert_eq!(real(mat, 0, 0), 255.0);
    assert_eq!(real(mat, 0, 1), 3.0);
    unsafe { cv_release_mat(&mut mat) };
}

#[test]
fn test_vector_iteration_protocol() {
    let data = [4, 8, 15, 16, 23, 42];
    let before = cv_debug_counters();
    unsafe {
        let vector = cv_vector_int_new_array(data.as_ptr(), data.len());
        assert_eq!(cv_vector_int_size(vector), 6);

        let iterator = cv_vector_int_iterator_new(vector);
        let mut seen = Vec::new();
        while cv_vector_int_iterator_has_next(iterator) {
            seen.push(cv_vector_int_iterator_next(iterator));
        }
        assert_eq!(seen, data);
        assert_eq!(cv_vector_int_iterator_next(iterator), 0);
        cv_vector_int_iterator_delete(iterator);
        cv_vector_int_delete(vector);

        let empty = cv_vector_int_new();
        assert_eq!(cv_vector_int_size(empty), 0);
        cv_vector_int_delete(empty);
    }
    let delta = cv_debug_counters().since(&before);
    assert_eq!(delta.vectors_created, 2);
    assert_eq!(delta.vectors_released, 2);
    assert_eq!(delta.iterators_created, 1);
    assert_eq!(delta.iterators_released, 1);
}

#[test]
fn test_vector_null_handles() {
    let before = cv_debug_counters();
    unsafe {
        assert_eq!(cv_vector_int_size(ptr::null()), 0);
        assert!(cv_vector_int_iterator_new(ptr::null()).is_null());
        assert!(!cv_vector_int_iterator_has_next(ptr::null()));
        cv_vector_int_iterator_delete(ptr::null_mut());
        cv_vector_int_delete(ptr::null_mut());
    }
    assert_eq!(cv_debug_counters(), before);
}

#[test]
fn test_dmatch_copy() {
    let matches = [
        CvDMatch {
            query_idx: 0,
            train_idx: 3,
            img_idx: 0,
            distance: 0.5,
        },
        CvDMatch {
            query_idx: 1,
            train_idx: 7,
            img_idx: 0,
            distance: 1.25,
        },
    ];
    unsafe {
        let vector = cv_vector_DMatch_new_array(matches.as_ptr(), matches.len());
        let mut out = [CvDMatch::default(); 2];
        assert_eq!(cv_vector_DMatch_size(vector), 2);
        cv_vector_DMatch_copy(vector, out.as_mut_ptr());
        assert_eq!(out, matches);
        cv_vector_DMatch_delete(vector);
    }
}
