//! Centering math.

use crate::dom::Size;

/// Wrapper offset inside its context.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub top: f64,
    pub left: f64,
}

/// Center `wrapper` inside `context`.
///
/// `base` is the vertical scroll offset the wrapper is placed against (zero
/// for fixed modals). A wrapper taller than its context is pinned to `base`
/// and one wider than its context to the left edge.
#[must_use]
pub fn center(wrapper: Size, context: Size, base: f64) -> Offset {
    let top = if wrapper.height < context.height {
        (context.height - wrapper.height) / 2.0 + base
    } else {
        base
    };
    let left = if wrapper.width < context.width {
        (context.width - wrapper.width) / 2.0
    } else {
        0.0
    };
    Offset { top, left }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centers_when_it_fits() {
        let offset = center(Size::new(200.0, 100.0), Size::new(800.0, 600.0), 0.0);
        assert_eq!(offset, Offset { top: 250.0, left: 300.0 });
    }

    #[test]
    fn test_adds_scroll_base() {
        let offset = center(Size::new(200.0, 100.0), Size::new(800.0, 600.0), 120.0);
        assert!((offset.top - 370.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pins_oversized_wrapper() {
        let offset = center(Size::new(900.0, 700.0), Size::new(800.0, 600.0), 40.0);
        assert_eq!(offset, Offset { top: 40.0, left: 0.0 });
    }

    #[test]
    fn test_equal_size_is_pinned() {
        let offset = center(Size::new(800.0, 600.0), Size::new(800.0, 600.0), 0.0);
        assert_eq!(offset, Offset::default());
    }
}
