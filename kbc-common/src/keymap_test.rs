use crate::keycodes::KEY_FN;

use super::*;

fn idx(row: u8, col: u8, layer: Layer) -> KeymapIndex {
    KeymapIndex::new(MatrixPosition::new(row, col).unwrap().scan_code(), layer)
}

#[test]
fn layer_addressing() {
    assert_eq!(idx(0, 0, Layer::Primary).value(), 0);
    assert_eq!(idx(1, 1, Layer::Primary).value(), 9);
    assert_eq!(idx(1, 1, Layer::Alternate).value(), 9 + MAX_KEY as u16);
}

#[test]
fn lookup_per_layer() {
    let keymap = Keymap::from_entries([
        (Layer::Primary, 0, 0, 30),
        (Layer::Primary, 0, 1, KEY_FN),
        (Layer::Alternate, 0, 0, 102),
    ])
    .unwrap();

    assert_eq!(keymap.get(idx(0, 0, Layer::Primary)), 30);
    assert_eq!(keymap.get(idx(0, 0, Layer::Alternate)), 102);
    assert_eq!(keymap.get(idx(0, 1, Layer::Primary)), KEY_FN);
    assert_eq!(keymap.get(idx(0, 1, Layer::Alternate)), KEY_RESERVED);
    assert!(keymap.has_alternate());
}

#[test]
fn rejects_out_of_range() {
    let mut keymap = Keymap::new();
    assert_eq!(
        keymap.insert(Layer::Primary, 16, 0, 30),
        Err(ConfigError::InvalidKeymapEntry { row: 16, col: 0 })
    );
    assert_eq!(
        keymap.insert(Layer::Primary, 0, 0, 0x300),
        Err(ConfigError::InvalidKeyCode(0x300))
    );
    assert!(!keymap.has_alternate());
}
