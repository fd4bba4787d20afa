extern crate std;

use embassy_futures::{
    block_on,
    select::{select, Either},
    yield_now,
};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use kbc_common::{
    config::KbcConfig,
    keycodes::KEY_WAKEUP,
    keymap::{Keymap, Layer},
    registers::ROW0_MASK,
};
use std::vec::Vec;

use super::*;

use crate::{
    kbc_test_stub::KbcStub, key_reporter::KeyEventChannel, key_scanner::PollCommand,
    time_driver_test_stub,
};

type TestChannel = KeyEventChannel<NoopRawMutex, 16>;
type TestKbc<'a> = Kbc<NoopRawMutex, KbcStub, &'a TestChannel>;

fn drain(channel: &TestChannel) -> Vec<KeyEvent> {
    core::iter::from_fn(|| channel.try_receive()).collect()
}

fn pos(row: u8, col: u8) -> MatrixPosition {
    MatrixPosition::new(row, col).unwrap()
}

fn config(wake: bool) -> KbcConfig {
    let mut config = KbcConfig {
        repeat_cnt: 5,
        keymap: Keymap::from_entries([(Layer::Primary, 0, 0, crate::kc!("a"))]).unwrap(),
        ..Default::default()
    };
    config.set_pins(&[0, 1, 2], &[3, 4]).unwrap();
    config.wake.enabled = wake;
    config.wake.wakeup_key = KEY_WAKEUP;
    config.wake.add_key(0, 1).unwrap();
    config.wake.add_key(2, 0).unwrap();
    config
}

fn setup(channel: &TestChannel, config: KbcConfig) -> (KbcStub, TestKbc<'_>) {
    let stub = KbcStub::new();
    let kbc = Kbc::new(config, stub.clone(), channel).unwrap();
    time_driver_test_stub::set_time(1);
    block_on(kbc.open());
    (stub, kbc)
}

#[test]
fn wake_masks_without_filter() {
    let mut stub = KbcStub::new();
    stub.set_reg(ROW0_MASK, 0xff);

    setup_wake_keys(&mut stub, &[pos(0, 1)], false);

    for row in 0..MAX_ROW {
        assert_eq!(stub.reg(row_mask(row)), 0);
    }
}

#[test]
fn wake_masks_with_filter() {
    let mut stub = KbcStub::new();

    setup_wake_keys(&mut stub, &[pos(0, 1), pos(2, 0), pos(2, 7)], true);

    assert_eq!(stub.reg(row_mask(0)), !0b10);
    assert_eq!(stub.reg(row_mask(1)), u32::MAX);
    assert_eq!(stub.reg(row_mask(2)), !0b1000_0001);
    assert_eq!(stub.reg(row_mask(15)), u32::MAX);
}

#[test]
fn filter_with_no_wake_keys_blocks_nothing() {
    let mut stub = KbcStub::new();

    setup_wake_keys(&mut stub, &[], true);

    for row in 0..MAX_ROW {
        assert_eq!(stub.reg(row_mask(row)), 0);
    }
}

#[test]
fn suspend_arms_wake_keys() {
    let channel = TestChannel::default();
    let (stub, kbc) = setup(&channel, config(true));
    let timeout = stub.reg(TO_CNT);
    assert_ne!(timeout, 0);

    block_on(kbc.suspend());

    assert!(stub.irq());
    assert!(stub.irq_wake());
    assert!(stub.clock());
    assert_eq!(stub.reg(TO_CNT), 0);
    assert_eq!(stub.reg(CONTROL) & control::FIFO_CNT_INT_EN, 0);
    assert_ne!(stub.reg(CONTROL) & control::KEYPRESS_INT_EN, 0);
    assert_eq!(stub.reg(row_mask(0)), !0b10);
    assert_eq!(stub.reg(row_mask(1)), u32::MAX);
    assert!(!kbc.keypress_caused_wake());
    assert!(time_driver_test_stub::now() >= 1 + WAKE_SETTLE_MS * 1000);

    block_on(kbc.resume());

    assert!(!stub.irq_wake());
    assert_eq!(stub.reg(TO_CNT), timeout);
    assert_eq!(stub.reg(row_mask(1)), 0);
    assert_eq!(stub.reg(CONTROL) & control::KEYPRESS_INT_EN, 0);
    assert_ne!(stub.reg(CONTROL) & control::FIFO_CNT_INT_EN, 0);
    assert!(drain(&channel).is_empty());
    time_driver_test_stub::reset();
}

#[test]
fn resume_taps_wakeup_key_after_key_press_wake() {
    let channel = TestChannel::default();
    let (stub, kbc) = setup(&channel, config(true));

    block_on(kbc.suspend());
    stub.raise(int::KEYPRESS_STATUS);
    kbc.on_interrupt();
    block_on(kbc.resume());

    assert_eq!(
        drain(&channel),
        [
            KeyEvent::Key(KEY_WAKEUP, true),
            KeyEvent::Key(KEY_WAKEUP, false),
            KeyEvent::Sync
        ]
    );
    assert!(!kbc.keypress_caused_wake());

    // a second resume is a no-op
    block_on(kbc.resume());
    assert!(drain(&channel).is_empty());
    time_driver_test_stub::reset();
}

#[test]
fn no_wakeup_key_reports_nothing() {
    let channel = TestChannel::default();
    let mut config = config(true);
    config.wake.wakeup_key = KEY_RESERVED;
    let (stub, kbc) = setup(&channel, config);

    block_on(kbc.suspend());
    stub.raise(int::KEYPRESS_STATUS);
    kbc.on_interrupt();
    block_on(kbc.resume());

    assert!(drain(&channel).is_empty());
    time_driver_test_stub::reset();
}

#[test]
fn suspend_without_wake_stops_and_resume_restarts() {
    let channel = TestChannel::default();
    let (stub, kbc) = setup(&channel, config(false));

    block_on(kbc.suspend());

    assert!(!stub.clock());
    assert!(!stub.irq());
    assert!(!stub.irq_wake());
    assert_eq!(stub.reg(CONTROL) & control::KBC_EN, 0);

    block_on(kbc.resume());

    assert!(stub.clock());
    assert!(stub.irq());
    assert_eq!(stub.resets(), 2);
    assert_eq!(kbc.scan_mode(), ScanMode::IdleInterrupt);
}

#[test]
fn suspend_while_polling_cancels_poll() {
    let channel = TestChannel::default();
    let (stub, kbc) = setup(&channel, config(true));

    for _ in 0..3 {
        stub.push_keys(&[(0, 0)]);
    }

    let reads = block_on(async {
        let driver = async {
            stub.raise(int::FIFO_CNT_STATUS);
            kbc.on_interrupt();
            while stub.fifo_reads() == 0 {
                yield_now().await;
            }
            drain(&channel);
            kbc.suspend().await;
            let reads = stub.fifo_reads();
            for _ in 0..20 {
                yield_now().await;
            }
            reads
        };

        match select(kbc.run(), driver).await {
            Either::First(_) => unreachable!(),
            Either::Second(reads) => reads,
        }
    });

    assert_eq!(reads, 1);
    assert_eq!(stub.fifo_reads(), 1);
    assert_eq!(stub.pending(), 2);
    assert_eq!(kbc.scan_mode(), ScanMode::IdleInterrupt);
    assert_eq!(kbc.poll(), None);
    assert!(matches!(kbc.poll_signal.try_take(), None | Some(PollCommand::Stop)));
    assert!(drain(&channel).is_empty());
    assert!(stub.irq_wake());
    time_driver_test_stub::reset();
}

#[test]
fn suspend_without_wake_releases_held_keys() {
    let channel = TestChannel::default();
    let (stub, kbc) = setup(&channel, config(false));
    let a = crate::kc!("a");

    stub.push_keys(&[(0, 0)]);
    stub.raise(int::FIFO_CNT_STATUS);
    kbc.on_interrupt();
    kbc.poll();
    drain(&channel);

    block_on(kbc.suspend());

    assert_eq!(
        drain(&channel),
        [KeyEvent::Key(a, false), KeyEvent::Sync]
    );
    assert!(kbc.current_keys().is_empty());
    time_driver_test_stub::reset();
}

#[test]
fn close_after_wake_suspend_disarms_wake() {
    let channel = TestChannel::default();
    let (stub, kbc) = setup(&channel, config(true));

    block_on(kbc.suspend());
    assert!(stub.irq_wake());

    block_on(kbc.close());

    assert!(!stub.irq_wake());
    assert!(!stub.irq());
    assert!(!stub.clock());

    // nothing left to resume
    block_on(kbc.resume());
    assert!(!stub.clock());
    time_driver_test_stub::reset();
}

#[test]
fn resume_does_not_start_a_closed_device() {
    let channel = TestChannel::default();
    let stub = KbcStub::new();
    let kbc = TestKbc::new(config(false), stub.clone(), &channel).unwrap();

    block_on(async {
        kbc.suspend().await;
        kbc.resume().await;
    });

    assert!(!stub.clock());
    assert_eq!(stub.resets(), 0);
}
