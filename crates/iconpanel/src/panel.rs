//! Terminal panel — an in-process device module rendering four icons as text.
//!
//! Button presses are queued and delivered one at a time by
//! [`TerminalPanel::deliver_next`], so the registered handler is never
//! entered reentrantly: codes pressed while a routine runs wait their turn.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io::Write;
use std::rc::Rc;

use iconpanel_lib::device::{self, Callback, ICON_COUNT, IconPanel};

struct Inner {
    icons: RefCell<[bool; ICON_COUNT]>,
    callbacks: RefCell<Vec<Callback>>,
    /// Bumped by every `clear_callbacks`.
    generation: Cell<u64>,
    queue: RefCell<VecDeque<i32>>,
    show_icons: bool,
    out: RefCell<Box<dyn Write>>,
}

/// Cloneable handle; clones drive the same panel.
#[derive(Clone)]
pub struct TerminalPanel {
    inner: Rc<Inner>,
}

impl TerminalPanel {
    /// Panel writing to stdout. All icons start on.
    pub fn new(show_icons: bool) -> Self {
        Self::with_writer(show_icons, Box::new(std::io::stdout()))
    }

    pub fn with_writer(show_icons: bool, out: Box<dyn Write>) -> Self {
        TerminalPanel {
            inner: Rc::new(Inner {
                icons: RefCell::new([true; ICON_COUNT]),
                callbacks: RefCell::new(Vec::new()),
                generation: Cell::new(0),
                queue: RefCell::new(VecDeque::new()),
                show_icons,
                out: RefCell::new(out),
            }),
        }
    }

    /// Queue a button press carrying `code`.
    pub fn press(&self, code: i32) {
        self.inner.queue.borrow_mut().push_back(code);
    }

    pub fn pending(&self) -> usize {
        self.inner.queue.borrow().len()
    }

    /// Deliver the oldest queued code to every registered handler.
    ///
    /// Returns `None` when the queue is empty. Delivery stops at the first
    /// handler error, which is returned unmodified.
    pub fn deliver_next(&self) -> Option<(i32, device::Result<()>)> {
        let code = self.inner.queue.borrow_mut().pop_front()?;
        let generation = self.inner.generation.get();
        let mut active = std::mem::take(&mut *self.inner.callbacks.borrow_mut());
        let mut result = Ok(());
        for cb in active.iter_mut() {
            if let Err(e) = cb(code) {
                result = Err(e);
                break;
            }
        }
        // Handlers detached above were cleared if the generation moved on
        if self.inner.generation.get() == generation {
            let mut slot = self.inner.callbacks.borrow_mut();
            let added = std::mem::take(&mut *slot);
            active.extend(added);
            *slot = active;
        }
        Some((code, result))
    }

    pub fn icons(&self) -> [bool; ICON_COUNT] {
        *self.inner.icons.borrow()
    }

    /// Icon row, e.g. `[#][ ][#][#]`.
    pub fn render(&self) -> String {
        self.icons()
            .iter()
            .map(|&on| if on { "[#]" } else { "[ ]" })
            .collect()
    }

    fn write_line(&self, line: &str) {
        let mut out = self.inner.out.borrow_mut();
        if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            log::warn!("panel output failed: {e}");
        }
    }
}

impl IconPanel for TerminalPanel {
    fn set_icon_state(&self, index: usize, on: bool) -> device::Result<()> {
        device::check_index(index)?;
        self.inner.icons.borrow_mut()[index] = on;
        if self.inner.show_icons {
            self.write_line(&self.render());
        }
        Ok(())
    }

    fn clear_callbacks(&self) -> device::Result<()> {
        self.inner.callbacks.borrow_mut().clear();
        self.inner
            .generation
            .set(self.inner.generation.get().wrapping_add(1));
        Ok(())
    }

    fn add_callback(&self, handler: Callback) -> device::Result<()> {
        self.inner.callbacks.borrow_mut().push(handler);
        Ok(())
    }

    fn log_line(&self, line: &str) {
        log::debug!("{line}");
        self.write_line(line);
    }
}

/// Shared in-memory sink so tests can read what a panel wrote.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct SharedBuf(Rc<RefCell<Vec<u8>>>);

#[cfg(test)]
impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
impl SharedBuf {
    pub(crate) fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iconpanel_lib::device::DeviceError;

    fn panel(show_icons: bool) -> (TerminalPanel, SharedBuf) {
        let buf = SharedBuf::default();
        let panel = TerminalPanel::with_writer(show_icons, Box::new(buf.clone()));
        (panel, buf)
    }

    #[test]
    fn starts_all_on() {
        let (p, _) = panel(false);
        assert_eq!(p.icons(), [true; 4]);
        assert_eq!(p.render(), "[#][#][#][#]");
    }

    #[test]
    fn set_icon_updates_and_renders() {
        let (p, buf) = panel(true);
        p.set_icon_state(1, false).unwrap();
        assert_eq!(p.icons(), [true, false, true, true]);
        assert_eq!(buf.text(), "[#][ ][#][#]\n");
    }

    #[test]
    fn hidden_icons_write_nothing() {
        let (p, buf) = panel(false);
        p.set_icon_state(0, false).unwrap();
        assert!(buf.text().is_empty());
    }

    #[test]
    fn invalid_index_rejected_without_change() {
        let (p, _) = panel(false);
        let err = p.set_icon_state(4, false).unwrap_err();
        assert!(matches!(err, DeviceError::InvalidIcon(4)));
        assert_eq!(p.icons(), [true; 4]);
    }

    #[test]
    fn log_line_goes_to_output() {
        let (p, buf) = panel(false);
        p.log_line("Setting all to on");
        assert_eq!(buf.text(), "Setting all to on\n");
    }

    #[test]
    fn deliver_next_empty_queue() {
        let (p, _) = panel(false);
        assert!(p.deliver_next().is_none());
    }

    #[test]
    fn queued_codes_delivered_fifo() {
        let (p, _) = panel(false);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        p.add_callback(Box::new(move |code| {
            sink.borrow_mut().push(code);
            Ok(())
        }))
        .unwrap();
        p.press(2);
        p.press(0);
        p.press(9);
        assert_eq!(p.pending(), 3);
        while p.deliver_next().is_some() {}
        assert_eq!(*seen.borrow(), vec![2, 0, 9]);
    }

    #[test]
    fn press_during_delivery_waits_its_turn() {
        let (p, _) = panel(false);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let handle = p.clone();
        p.add_callback(Box::new(move |code| {
            sink.borrow_mut().push(code);
            if code == 1 {
                handle.press(7);
                // Not delivered yet: still inside the first event
                assert_eq!(handle.pending(), 1);
            }
            Ok(())
        }))
        .unwrap();
        p.press(1);
        assert_eq!(p.deliver_next().map(|(c, _)| c), Some(1));
        assert_eq!(*seen.borrow(), vec![1]);
        assert_eq!(p.deliver_next().map(|(c, _)| c), Some(7));
        assert_eq!(*seen.borrow(), vec![1, 7]);
    }

    #[test]
    fn handler_error_returned_and_handler_kept() {
        let (p, _) = panel(false);
        let handle = p.clone();
        p.add_callback(Box::new(move |code| {
            handle.set_icon_state(code as usize, true)
        }))
        .unwrap();
        p.press(10);
        let (code, result) = p.deliver_next().unwrap();
        assert_eq!(code, 10);
        assert!(matches!(result, Err(DeviceError::InvalidIcon(10))));
        p.press(3);
        let (_, result) = p.deliver_next().unwrap();
        assert!(result.is_ok());
    }

    #[test]
    fn clear_during_delivery_drops_old_handlers() {
        let (p, _) = panel(false);
        let handle = p.clone();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        p.add_callback(Box::new(move |_| {
            counter.set(counter.get() + 1);
            handle.clear_callbacks()
        }))
        .unwrap();
        p.press(0);
        p.press(0);
        while p.deliver_next().is_some() {}
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn clear_callbacks_is_idempotent() {
        let (p, _) = panel(false);
        p.clear_callbacks().unwrap();
        p.clear_callbacks().unwrap();
        p.press(1);
        assert!(matches!(p.deliver_next(), Some((1, Ok(())))));
    }
}
