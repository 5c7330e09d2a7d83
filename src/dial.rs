// Copyright (c) 2024 Mike Tsao. All rights reserved.

use crate::{
    attributes::{parse_float, AttributeError},
    events::{DialEvent, EventSink},
    traits::HasAttributes,
    types::Normal,
};

/// A rotary control for a single continuous value.
///
/// The value is stored as a [Normal] and scaled to `min..=max` on the way out.
/// Dragging vertically changes it: [Dial::PIXELS_PER_RANGE] pixels of travel
/// sweep the whole range.
#[derive(Debug)]
pub struct Dial {
    min: f64,
    max: f64,
    normal: Normal,
    drag_start: Option<(f32, Normal)>,
    sink: EventSink,
}
impl Default for Dial {
    fn default() -> Self {
        Self::new_with(0.0, 100.0, 0.0)
    }
}
impl Dial {
    /// Vertical drag distance that covers the full range.
    pub const PIXELS_PER_RANGE: f32 = 100.0;

    /// Angle of the pointer at the minimum value, in degrees clockwise from
    /// straight up.
    pub const MIN_ANGLE: f32 = -135.0;
    /// Angle of the pointer at the maximum value.
    pub const MAX_ANGLE: f32 = 135.0;

    /// Creates a dial. If `min > max`, the two are swapped. A non-finite bound
    /// falls back to the default range's.
    pub fn new_with(min: f64, max: f64, value: f64) -> Self {
        let min = if min.is_finite() { min } else { 0.0 };
        let max = if max.is_finite() { max } else { 100.0 };
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let mut r = Self {
            min,
            max,
            normal: Normal::default(),
            drag_start: None,
            sink: Default::default(),
        };
        r.set_value(value);
        r
    }

    #[allow(missing_docs)]
    pub fn attach(&mut self, sink: EventSink) {
        self.sink = sink;
    }

    #[allow(missing_docs)]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[allow(missing_docs)]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[allow(missing_docs)]
    pub fn normal(&self) -> Normal {
        self.normal
    }

    /// The current value, scaled to `min..=max`.
    pub fn value(&self) -> f64 {
        self.min + self.normal.get() * (self.max - self.min)
    }

    /// Sets the value, clamping it to `min..=max`. Doesn't emit anything. NaN
    /// is ignored.
    pub fn set_value(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        let span = self.max - self.min;
        self.normal = if span > 0.0 {
            Normal::new((value - self.min) / span)
        } else {
            Normal::minimum()
        };
    }

    /// Changes the lower bound, keeping the current value if it still fits.
    /// A bound above `max` is rejected.
    pub fn set_min(&mut self, min: f64) -> Result<(), AttributeError> {
        self.set_range(min, self.max)
    }

    /// Changes the upper bound, keeping the current value if it still fits.
    /// A bound below `min` is rejected.
    pub fn set_max(&mut self, max: f64) -> Result<(), AttributeError> {
        self.set_range(self.min, max)
    }

    fn set_range(&mut self, min: f64, max: f64) -> Result<(), AttributeError> {
        if let Some(bad) = [min, max].into_iter().find(|v| !v.is_finite()) {
            return Err(AttributeError::NotFinite(bad));
        }
        if min > max {
            return Err(AttributeError::EmptyRange { min, max });
        }
        let value = self.value();
        self.min = min;
        self.max = max;
        self.set_value(value);
        Ok(())
    }

    /// Where the pointer is drawn, in degrees clockwise from straight up.
    pub fn angle(&self) -> f32 {
        Self::angle_for(self.normal)
    }

    /// The pointer angle for any normalized value.
    pub fn angle_for(normal: Normal) -> f32 {
        Self::MIN_ANGLE + (Self::MAX_ANGLE - Self::MIN_ANGLE) * normal.get() as f32
    }

    #[allow(missing_docs)]
    pub fn is_dragging(&self) -> bool {
        self.drag_start.is_some()
    }

    /// Starts a drag at vertical screen position `y`.
    pub fn begin_drag(&mut self, y: f32) {
        self.drag_start = Some((y, self.normal));
    }

    /// Continues a drag. Moving up increases the value. Emits
    /// [DialEvent::Adjusted].
    pub fn drag_to(&mut self, y: f32) {
        let Some((start_y, start_normal)) = self.drag_start else {
            return;
        };
        if !y.is_finite() {
            return;
        }
        let delta = ((start_y - y) / Self::PIXELS_PER_RANGE).clamp(-1.0, 1.0);
        self.normal = Normal::new(start_normal.get() + delta as f64);
        self.sink.emit(DialEvent::Adjusted {
            value: self.value(),
        });
    }

    /// Finishes a drag. Emits [DialEvent::Changed] once.
    pub fn end_drag(&mut self) {
        if self.drag_start.take().is_some() {
            self.sink.emit(DialEvent::Changed {
                value: self.value(),
            });
        }
    }
}
impl HasAttributes for Dial {
    fn try_set_attribute(&mut self, name: &str, value: &str) -> Result<(), AttributeError> {
        match name {
            "min" => self.set_min(parse_float(value)?),
            "max" => self.set_max(parse_float(value)?),
            "value" => {
                self.set_value(parse_float(value)?);
                Ok(())
            }
            _ => Err(AttributeError::Unknown),
        }
    }

    fn remove_attribute(&mut self, _name: &str) {}
}
