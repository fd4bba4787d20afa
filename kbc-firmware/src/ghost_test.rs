use heapless::Vec;
use kbc_common::{keymap::Layer, matrix::MatrixPosition};

use super::*;

fn sample(keys: &[(u8, u8)]) -> Sample {
    Sample {
        keys: keys
            .iter()
            .map(|(r, c)| MatrixPosition::new(*r, *c).unwrap().scan_code())
            .collect::<Vec<_, 8>>(),
        layer: Layer::Primary,
    }
}

#[test]
fn fewer_than_three_keys_pass() {
    let filter = GhostFilter::new(true);
    let cases: [&[(u8, u8)]; 4] = [&[], &[(0, 0)], &[(0, 0), (0, 1)], &[(0, 0), (1, 0)]];
    for keys in cases {
        let s = sample(keys);
        assert_eq!(filter.filter(s.clone()), Some(s));
    }
}

#[test]
fn disabled_filter_is_identity() {
    let filter = GhostFilter::new(false);
    let s = sample(&[(0, 0), (0, 1), (1, 0)]);
    assert_eq!(filter.filter(s.clone()), Some(s));
}

#[test]
fn l_shape_is_dropped() {
    let filter = GhostFilter::new(true);
    for (r0, c0, r1, c1) in [(0, 0, 1, 1), (3, 7, 15, 2), (9, 4, 2, 0)] {
        let s = sample(&[(r0, c0), (r0, c1), (r1, c0)]);
        assert!(is_ghosted(&s.keys));
        assert_eq!(filter.filter(s), None);
    }
}

#[test]
fn collisions_from_different_pairs() {
    // (0,0)-(0,1) share a row and (2,5)-(3,5) share a column.
    assert!(is_ghosted(&sample(&[(0, 0), (0, 1), (2, 5), (3, 5)]).keys));
}

#[test]
fn row_only_or_column_only_passes() {
    assert!(!is_ghosted(&sample(&[(0, 0), (0, 1), (0, 2)]).keys));
    assert!(!is_ghosted(&sample(&[(0, 3), (1, 3), (2, 3)]).keys));
    assert!(!is_ghosted(&sample(&[(0, 0), (1, 1), (2, 2)]).keys));
}
