//! The rendering seam: anything that can paint itself into a [`Buffer`].

use crate::buffer::Buffer;
use crate::geometry::Rect;

/// A renderable component. The only polymorphic seam in the crate — every
/// other type is a sealed sum type.
pub trait Widget {
    /// Paint this widget into `buffer`, confined to `area`.
    fn render(&self, area: Rect, buffer: &mut Buffer);
}

/// Adapts a closure into a [`Widget`], so tests and examples can exercise
/// the render pipeline without a companion widget library.
pub struct StaticWidget<F>
where
    F: Fn(Rect, &mut Buffer),
{
    render_fn: F,
}

impl<F> StaticWidget<F>
where
    F: Fn(Rect, &mut Buffer),
{
    /// Wrap `render_fn` as a widget.
    pub const fn new(render_fn: F) -> Self {
        Self { render_fn }
    }
}

impl<F> Widget for StaticWidget<F>
where
    F: Fn(Rect, &mut Buffer),
{
    fn render(&self, area: Rect, buffer: &mut Buffer) {
        (self.render_fn)(area, buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Style;

    #[test]
    fn static_widget_invokes_closure() {
        let widget = StaticWidget::new(|area, buffer: &mut Buffer| {
            buffer.set_string(area.x(), area.y(), "hi", Style::new());
        });
        let mut buffer = Buffer::empty(Rect::new(0, 0, 10, 1));
        widget.render(buffer.area(), &mut buffer);
        assert_eq!(buffer.get(0, 0).ch, 'h');
        assert_eq!(buffer.get(1, 0).ch, 'i');
    }
}
