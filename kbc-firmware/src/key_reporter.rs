use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Channel};
use heapless::Vec;
use kbc_common::matrix::MAX_KPENT;

use crate::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyEvent {
    /// Output code and whether it is now down.
    Key(u16, bool),
    /// Raw keymap index of the key about to be pressed.
    Scan(u16),
    /// End of a sample.
    Sync,
}

/// Consumer of key events. Called with the device lock held so it must not block.
pub trait EventSink {
    fn report(&mut self, event: KeyEvent);
}

pub struct KeyEventChannel<M: RawMutex, const N: usize>(Channel<M, KeyEvent, N>);
impl<M: RawMutex, const N: usize> Default for KeyEventChannel<M, N> {
    fn default() -> Self {
        Self(Channel::new())
    }
}
impl<M: RawMutex, const N: usize> KeyEventChannel<M, N> {
    pub async fn receive(&self) -> KeyEvent {
        self.0.receive().await
    }

    pub fn try_receive(&self) -> Option<KeyEvent> {
        self.0.try_receive().ok()
    }
}

impl<M: RawMutex, const N: usize> EventSink for &KeyEventChannel<M, N> {
    fn report(&mut self, event: KeyEvent) {
        if self.0.try_send(event).is_err() {
            warn!("key event dropped: {:?}", event);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PressedKey {
    /// Keymap index, reported in [`KeyEvent::Scan`].
    pub scan: u16,
    pub code: u16,
}

/// Remembers which output codes are down and turns samples into ordered events.
#[derive(Debug, Default)]
pub struct KeyTracker {
    current: Vec<u16, MAX_KPENT>,
}

impl KeyTracker {
    pub fn current(&self) -> &[u16] {
        &self.current
    }

    /// Report a sample: releases for keys no longer down, then a scan and press event for every
    /// key in `pressed` (held keys included), then a sync.
    pub fn report(&mut self, sink: &mut impl EventSink, pressed: &[PressedKey]) {
        for code in self.current.iter() {
            if !pressed.iter().any(|k| k.code == *code) {
                sink.report(KeyEvent::Key(*code, false));
            }
        }

        for key in pressed {
            sink.report(KeyEvent::Scan(key.scan));
            sink.report(KeyEvent::Key(key.code, true));
        }
        sink.report(KeyEvent::Sync);

        self.current = pressed.iter().map(|k| k.code).collect();
    }

    /// Release every key still down.
    pub fn release_all(&mut self, sink: &mut impl EventSink) {
        for code in self.current.iter() {
            sink.report(KeyEvent::Key(*code, false));
        }
        sink.report(KeyEvent::Sync);
        self.current.clear();
    }

    pub fn clear(&mut self) {
        self.current.clear();
    }
}

#[cfg(test)]
#[path = "key_reporter_test.rs"]
mod test;
