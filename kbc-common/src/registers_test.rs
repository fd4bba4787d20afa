use super::*;

#[test]
fn control_fields() {
    assert_eq!(control::debounce_cnt(2), 0x20);
    assert_eq!(control::debounce_cnt(0x3ff), 0x3ff0);
    assert_eq!(control::fifo_threshold(1), 0x4000);
}

#[test]
fn fifo_count() {
    assert_eq!(int::fifo_count(0x0000_0034), 3);
    assert_eq!(int::fifo_count(0x0000_0104), 0);
    assert_eq!(int::fifo_count(0x0000_00f0), 15);
}

#[test]
fn pin_cfg_locations() {
    assert_eq!(row_cfg_field(0), (0x08, 0));
    assert_eq!(row_cfg_field(5), (0x08, 25));
    assert_eq!(row_cfg_field(6), (0x0c, 0));
    assert_eq!(row_cfg_field(23), (0x14, 25));

    assert_eq!(col_cfg_field(7), (0x18, 28));
    assert_eq!(col_cfg_field(8), (0x1c, 0));
    assert_eq!(col_cfg_field(23), (0x20, 28));

    assert_eq!(pin_cfg_value(0), 1);
    assert_eq!(pin_cfg_value(7), 0x0f);
    assert_eq!(pin_cfg_value(15), 0x1f);
}

#[test]
fn row_masks() {
    assert_eq!(row_mask(0), 0x38);
    assert_eq!(row_mask(15), 0x74);
    assert_eq!(REGISTER_SPAN, 0x78);
}
