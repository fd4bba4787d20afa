use super::*;

#[test]
fn position_bounds() {
    assert!(MatrixPosition::new(0, 0).is_some());
    assert!(MatrixPosition::new(15, 7).is_some());
    assert!(MatrixPosition::new(16, 0).is_none());
    assert!(MatrixPosition::new(0, 8).is_none());
}

#[test]
fn scan_code_encoding() {
    let p = MatrixPosition::new(15, 7).unwrap();
    assert_eq!(p.scan_code().value(), 127);
    assert_eq!(p.scan_code().position(), p);

    let p = MatrixPosition::new(1, 0).unwrap();
    assert_eq!(p.scan_code().value(), 8);

    assert!(ScanCode::new(127).is_some());
    assert!(ScanCode::new(128).is_none());
}

#[test]
fn from_fields_masks() {
    assert_eq!(ScanCode::from_fields(3, 2).value(), 26);
    assert_eq!(ScanCode::from_fields(0x13, 0x0a).value(), 26);
}

#[test]
fn row_and_column_sharing() {
    let a = MatrixPosition::new(1, 2).unwrap();
    let b = MatrixPosition::new(1, 3).unwrap();
    let c = MatrixPosition::new(4, 2).unwrap();

    assert!(a.same_row(&b));
    assert!(!a.same_column(&b));
    assert!(a.same_column(&c));
    assert!(!b.same_row(&c));
}
