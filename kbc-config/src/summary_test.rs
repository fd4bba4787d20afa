use crate::description::parse;

use super::*;

const PAD: &str = "
row-pins = 0 1
col-pins = 2 3 9
debounce-delay = 2
repeat-delay = 5
wake-keys = 1:2 0:0
key 0 0 = a
key 1 2 = b
fn 0 0 = home
";

fn value(values: &[RegisterValue], name: &str) -> u32 {
    values
        .iter()
        .find(|v| v.name == name)
        .map(|v| v.value)
        .unwrap()
}

#[test]
fn registers_for_description() {
    let config = parse(PAD).unwrap();
    let timing = Timing::from_config(&config).unwrap();

    let values = register_values(&config, &timing);

    assert_eq!(values.len(), 11);
    assert_eq!(value(&values, "ROW_CFG0"), 1 | (3 << 5));
    assert_eq!(value(&values, "ROW_CFG1"), 0);
    assert_eq!(value(&values, "COL_CFG0"), (1 << 8) | (3 << 12));
    assert_eq!(value(&values, "COL_CFG1"), 5 << 4);
    assert_eq!(value(&values, "RPT_DLY"), 5);
    assert_eq!(value(&values, "INIT_DLY"), 5);
    assert_eq!(value(&values, "TO_CNT"), 87);
    assert_eq!(value(&values, "CONTROL"), 0x4000 | (2 << 4) | 0b1011);

    let to_cnt = values.iter().find(|v| v.name == "TO_CNT").unwrap();
    assert_eq!(to_cnt.offset, 0x24);
}

#[test]
fn wake_masks_leave_wake_keys_open() {
    let config = parse(PAD).unwrap();

    let masks = wake_masks(&config);

    assert_eq!(masks[0], !1);
    assert_eq!(masks[1], !(1 << 2));
    assert_eq!(masks[2], u32::MAX);

    let config = parse("row-pins = 0\ncol-pins = 1\n").unwrap();
    assert_eq!(wake_masks(&config), [0; MAX_ROW]);
}

#[test]
fn summary_counts() {
    let config = parse(PAD).unwrap();
    let timing = Timing::from_config(&config).unwrap();

    let summary = Summary::new(&config, timing);

    assert_eq!(summary.rows, 2);
    assert_eq!(summary.cols, 3);
    assert_eq!(summary.keys, 2);
    assert_eq!(summary.fn_keys, 1);
    assert_eq!(summary.wake_keys, 2);
    assert_eq!(
        summary.to_string(),
        "matrix:      2 rows x 3 columns\n\
         keys:        2\n\
         fn keys:     1\n\
         wake keys:   2\n\
         repoll:      2 ms"
    );
}
