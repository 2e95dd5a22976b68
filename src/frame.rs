//! The per-cycle render contract: size, layout, and widget dispatch.

use std::collections::VecDeque;

use crate::buffer::Buffer;
use crate::geometry::Rect;
use crate::layout::{split, Constraint, Direction};
use crate::widget::Widget;

const LAYOUT_CACHE_CAPACITY: usize = 8;

#[derive(Clone, PartialEq, Eq, Hash)]
struct LayoutCacheKey {
    area: Rect,
    direction: Direction,
    constraints: Vec<Constraint>,
}

/// A single render pass. Borrowed by `view(state, frame)`; writes land in
/// the buffer the harness or backend owns.
pub struct Frame<'a> {
    buffer: &'a mut Buffer,
    layout_cache: VecDeque<(LayoutCacheKey, Vec<Rect>)>,
}

impl<'a> Frame<'a> {
    /// Borrow `buffer` for one render pass.
    pub fn new(buffer: &'a mut Buffer) -> Self {
        Self {
            buffer,
            layout_cache: VecDeque::with_capacity(LAYOUT_CACHE_CAPACITY),
        }
    }

    /// The full drawable area for this frame.
    pub const fn size(&self) -> Rect {
        self.buffer.area()
    }

    /// Split `area` along `direction` per `constraints`, reusing a cached
    /// result for identical inputs. The cache holds a small fixed number of
    /// recent results and silently drops the oldest on overflow.
    pub fn layout(&mut self, area: Rect, direction: Direction, constraints: &[Constraint]) -> Vec<Rect> {
        let key = LayoutCacheKey {
            area,
            direction,
            constraints: constraints.to_vec(),
        };

        if let Some((_, rects)) = self.layout_cache.iter().find(|(k, _)| *k == key) {
            return rects.clone();
        }

        let rects = split(area, direction, constraints);
        if self.layout_cache.len() >= LAYOUT_CACHE_CAPACITY {
            self.layout_cache.pop_front();
        }
        self.layout_cache.push_back((key, rects.clone()));
        rects
    }

    /// Render `widget` confined to `area`.
    pub fn render(&mut self, widget: &dyn Widget, area: Rect) {
        widget.render(area, self.buffer);
    }
}
