//! Cached State Cells
//!
//! A [`State<V>`] mirrors one piece of driver state. Assigning through
//! [`State::set`] only reaches the driver when the value actually changes or
//! the cell has been marked dirty.
//!
//! Dirty cells exist because other code can touch the driver behind the
//! cache's back (a foreign library sharing the context, a context loss). After
//! [`State::set_dirty`] the cached value is no longer trusted and the next
//! assignment is forwarded unconditionally.

use std::fmt;

use crate::driver::Driver;
use crate::value::Value;

pub struct State<V: Value> {
    current: V::Type,
    dirty: bool,
}

impl<V: Value> Default for State<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Value> State<V> {
    /// A clean cell holding the documented default.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: V::default_value(),
            dirty: false,
        }
    }

    /// Applies `value` if it differs from the cache or the cell is dirty.
    ///
    /// Returns `true` when a driver call was issued.
    pub fn set<D: Driver + ?Sized>(&mut self, driver: &mut D, value: V::Type) -> bool {
        if !self.differs(&value) {
            return false;
        }
        V::apply(driver, &value);
        self.current = value;
        self.dirty = false;
        true
    }

    /// Writes the default through the driver regardless of the cache.
    pub fn reset<D: Driver + ?Sized>(&mut self, driver: &mut D) {
        self.current = V::default_value();
        V::apply(driver, &self.current);
        self.dirty = false;
    }

    /// Records a value the driver is known to hold without issuing a call.
    pub fn set_current_value(&mut self, value: V::Type) {
        self.current = value;
        self.dirty = false;
    }

    #[inline]
    pub fn set_dirty(&mut self) {
        self.dirty = true;
    }

    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Last value applied. Untrustworthy while [`is_dirty`](Self::is_dirty).
    #[inline]
    #[must_use]
    pub fn current(&self) -> &V::Type {
        &self.current
    }

    /// Whether assigning `value` would reach the driver.
    #[inline]
    #[must_use]
    pub fn differs(&self, value: &V::Type) -> bool {
        self.dirty || self.current != *value
    }

    /// True when the cell is clean and holds `value`.
    #[inline]
    #[must_use]
    pub fn holds(&self, value: &V::Type) -> bool {
        !self.differs(value)
    }
}

impl<V: Value> fmt::Debug for State<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("current", &self.current)
            .field("dirty", &self.dirty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{DriverCall, HeadlessDriver};
    use crate::mode::{Capability, Viewport as ViewportRect};
    use crate::value::{DepthTest, LineWidth, Viewport};

    #[test]
    fn identical_value_is_elided() {
        let mut driver = HeadlessDriver::new();
        let mut width: State<LineWidth> = State::new();

        assert!(width.set(&mut driver, 2.0));
        assert!(!width.set(&mut driver, 2.0));
        assert!(width.set(&mut driver, 3.0));
        assert_eq!(driver.stats().count(DriverCall::LineWidth), 2);
    }

    #[test]
    fn default_value_is_elided_on_fresh_cell() {
        let mut driver = HeadlessDriver::new();
        let mut depth_test: State<DepthTest> = State::new();

        assert!(!depth_test.set(&mut driver, false));
        assert_eq!(
            driver.stats().count(DriverCall::Capability(Capability::DepthTest)),
            0
        );
    }

    #[test]
    fn dirty_cell_forces_driver_call() {
        let mut driver = HeadlessDriver::new();
        let mut viewport: State<Viewport> = State::new();
        let rect = ViewportRect::new(0, 0, 800, 600);

        viewport.set(&mut driver, rect);
        viewport.set_dirty();
        assert!(viewport.is_dirty());
        assert!(viewport.set(&mut driver, rect));
        assert!(!viewport.is_dirty());
        assert_eq!(driver.stats().count(DriverCall::Viewport), 2);
    }

    #[test]
    fn reset_always_reaches_driver() {
        let mut driver = HeadlessDriver::new();
        let mut width: State<LineWidth> = State::new();

        width.reset(&mut driver);
        width.reset(&mut driver);
        assert_eq!(*width.current(), 1.0);
        assert_eq!(driver.stats().count(DriverCall::LineWidth), 2);
    }

    #[test]
    fn set_current_value_skips_driver() {
        let mut driver = HeadlessDriver::new();
        let mut width: State<LineWidth> = State::new();

        width.set_dirty();
        width.set_current_value(4.0);
        assert!(!width.set(&mut driver, 4.0));
        assert_eq!(driver.stats().total(), 0);
    }
}
