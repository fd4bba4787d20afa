//! Key mnemonics for the Linux input event codes. Names are matched ignoring case, dashes and
//! underscores, so `Left_Ctrl`, `left-ctrl` and `leftctrl` are the same key.

use std::collections::HashMap;

use kbc_common::keycodes::KEY_FN;
use lazy_static::lazy_static;

const DASH_USCORE: [char; 2] = ['_', '-'];

/// Runs of consecutive codes; each name may carry `/` separated aliases.
const CODE_RUNS: [(u16, &str); 9] = [
    (
        1,
        r#"
Esc/escape 1 2 3 4 5 6 7 8 9 0 Minus/- Equal/= Backspace/bksp Tab
Q W E R T Y U I O P LeftBrace/[ RightBrace/] Enter/return LeftCtrl/lctrl
A S D F G H J K L Semicolon/; Apostrophe/' Grave/` LeftShift/lshift Backslash/\
Z X C V B N M Comma/, Dot/./period Slash RightShift/rshift KpAsterisk LeftAlt/lalt
Space/spc CapsLock F1 F2 F3 F4 F5 F6 F7 F8 F9 F10 NumLock ScrollLock
Kp7 Kp8 Kp9 KpMinus Kp4 Kp5 Kp6 KpPlus Kp1 Kp2 Kp3 Kp0 KpDot
"#,
    ),
    (
        85,
        r#"
ZenkakuHankaku 102nd F11 F12 Ro Katakana Hiragana Henkan KatakanaHiragana Muhenkan
KpJpComma KpEnter RightCtrl/rctrl KpSlash SysRq/PrintScreen RightAlt/ralt/altgr LineFeed
Home Up PageUp/pgup Left Right End Down PageDown/pgdn Insert Delete/del
Macro Mute VolumeDown VolumeUp Power KpEqual KpPlusMinus Pause Scale
KpComma Hangeul Hanja Yen LeftMeta/lmeta/lgui RightMeta/rmeta/rgui Compose
Stop Again Props Undo Front Copy Open Paste Find Cut Help Menu Calc Setup
Sleep WakeUp File SendFile DeleteFile Xfer Prog1 Prog2 WWW MsDos ScreenLock/coffee
RotateDisplay CycleWindows Mail Bookmarks Computer Back Forward CloseCd EjectCd
EjectCloseCd NextSong PlayPause PreviousSong StopCd Record Rewind Phone Iso Config
HomePage Refresh Exit Move Edit ScrollUp ScrollDown KpLeftParen KpRightParen New Redo
F13 F14 F15 F16 F17 F18 F19 F20 F21 F22 F23 F24
"#,
    ),
    (
        200,
        r#"
PlayCd PauseCd Prog3 Prog4 Dashboard Suspend Close Play FastForward BassBoost Print
Hp Camera Sound Question Email Chat Search Connect Finance Sport Shop AltErase Cancel
BrightnessDown BrightnessUp Media SwitchVideoMode KbdIllumToggle KbdIllumDown KbdIllumUp
Send Reply ForwardMail Save Documents Battery Bluetooth Wlan Uwb Unknown VideoNext
VideoPrev BrightnessCycle BrightnessAuto DisplayOff Wwan RfKill MicMute
"#,
    ),
    (
        0x100,
        r#"
Btn0 Btn1 Btn2 Btn3 Btn4 Btn5 Btn6 Btn7 Btn8 Btn9
"#,
    ),
    (
        0x110,
        r#"
BtnLeft BtnRight BtnMiddle BtnSide BtnExtra BtnForward BtnBack BtnTask
"#,
    ),
    (
        0x160,
        r#"
Ok Select Goto Clear Power2 Option Info Time Vendor Archive Program Channel Favorites
Epg Pvr Mhp Language Title Subtitle Angle FullScreen Mode Keyboard AspectRatio Pc Tv
"#,
    ),
    (
        KEY_FN,
        r#"
Fn FnEsc FnF1 FnF2 FnF3 FnF4 FnF5 FnF6 FnF7 FnF8 FnF9 FnF10 FnF11 FnF12
Fn1 Fn2 FnD FnE FnF FnS FnB
"#,
    ),
    (
        0x1e5,
        r#"
FnRightShift
"#,
    ),
    (
        0x250,
        r#"
BrightnessMin BrightnessMax
"#,
    ),
];

lazy_static! {
    static ref KEY_NAMES: HashMap<String, u16> = {
        let mut m = HashMap::new();
        m.insert("reserved".into(), 0);
        m.insert("noop".into(), 0);
        m.insert("/".into(), 53);
        let mut ins = |a: &str, b: u16| {
            for a in a.split('/').filter(|a| !a.is_empty()) {
                let k = normalize(a);
                if m.contains_key(k.as_str()) {
                    panic!("key already added {a}");
                }
                m.insert(k, b);
            }
        };
        for (start, names) in CODE_RUNS {
            for (i, name) in names.split_whitespace().enumerate() {
                ins(name, start + i as u16);
            }
        }
        m
    };
}

fn normalize(name: &str) -> String {
    if name.len() > 1 {
        name.replace(DASH_USCORE, "").to_lowercase()
    } else {
        name.to_lowercase()
    }
}

/// Look up a mnemonic. A leading `\` escapes single punctuation names.
pub fn key_code(name: &str) -> Option<u16> {
    let name = match name.strip_prefix('\\') {
        Some(rest) if !rest.is_empty() => rest,
        _ => name,
    };
    KEY_NAMES.get(normalize(name).as_str()).copied()
}

/// Preferred name for `code`: the shortest mnemonic, ties broken alphabetically.
pub fn key_name(code: u16) -> Option<&'static str> {
    keycodes_iter()
        .filter(|k| k.code == code)
        .min_by(|a, b| a.name.len().cmp(&b.name.len()).then(a.name.cmp(b.name)))
        .map(|k| k.name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyName {
    pub name: &'static str,
    pub code: u16,
}

pub fn keycodes_iter() -> impl Iterator<Item = KeyName> {
    let names: &'static HashMap<String, u16> = &KEY_NAMES;
    names.iter().map(|(name, code)| KeyName {
        name: name.as_str(),
        code: *code,
    })
}

#[cfg(test)]
#[path = "keycodes_test.rs"]
mod test;
