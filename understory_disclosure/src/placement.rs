// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay placement relative to a target.
//!
//! [`OverlayPositioner`] does not pick placements itself. It asks a
//! [`PlacementStrategy`] and carries whatever placement the strategy
//! resolved through to class selection, so arrow styling follows the
//! computed position rather than the requested one.

use kurbo::{Rect, Size};

/// Side of the target the overlay appears on.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Above the target.
    Top,
    /// Right of the target.
    #[default]
    Right,
    /// Below the target.
    Bottom,
    /// Left of the target.
    Left,
}

impl Placement {
    /// Class name for this placement.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }

    /// Whether the overlay sits beside the target.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Computed overlay position.
///
/// Coordinates share the space of the target rectangle. Arrow offsets are
/// percentages along the overlay edge facing the target; only the offset
/// for that axis is set.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OverlayPosition {
    /// Top edge of the overlay.
    pub top: f64,
    /// Left edge of the overlay.
    pub left: f64,
    /// Arrow position along a left/right overlay, in percent.
    pub arrow_offset_top: Option<f64>,
    /// Arrow position along a top/bottom overlay, in percent.
    pub arrow_offset_left: Option<f64>,
    /// Placement actually used.
    pub placement: Placement,
}

/// Layout collaborator deciding where an overlay goes.
pub trait PlacementStrategy {
    /// Place an overlay of size `overlay` next to `target` inside `container`.
    ///
    /// `container` is the visible region: its origin is the container's
    /// scroll offset in target coordinates. The strategy may return a
    /// different placement than `requested`.
    fn place(&self, target: Rect, container: Rect, overlay: Size, requested: Placement) -> OverlayPosition;
}

/// Centers the overlay on the target's cross axis and shifts it back into
/// the container when it would overflow, moving the arrow by the same amount.
///
/// Never flips the placement.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CenteredStrategy {
    /// Minimum distance kept between the overlay and the container edges.
    pub padding: f64,
}

impl CenteredStrategy {
    /// A strategy keeping `padding` away from the container edges.
    pub const fn new(padding: f64) -> Self {
        Self { padding }
    }

    fn delta(&self, start: f64, extent: f64, lo: f64, len: f64) -> f64 {
        let leading = start - self.padding - lo;
        let trailing = start + self.padding - lo + extent;
        if leading < 0.0 {
            -leading
        } else if trailing > len {
            len - trailing
        } else {
            0.0
        }
    }
}

fn arrow_offset(delta: f64, extent: f64) -> f64 {
    if extent > 0.0 {
        50.0 * (1.0 - 2.0 * delta / extent)
    } else {
        50.0
    }
}

impl PlacementStrategy for CenteredStrategy {
    fn place(&self, target: Rect, container: Rect, overlay: Size, requested: Placement) -> OverlayPosition {
        if requested.is_horizontal() {
            let left = match requested {
                Placement::Left => target.x0 - overlay.width,
                _ => target.x1,
            };
            let top = target.y0 + (target.height() - overlay.height) / 2.0;
            let delta = self.delta(top, overlay.height, container.y0, container.height());
            OverlayPosition {
                top: top + delta,
                left,
                arrow_offset_top: Some(arrow_offset(delta, overlay.height)),
                arrow_offset_left: None,
                placement: requested,
            }
        } else {
            let top = match requested {
                Placement::Top => target.y0 - overlay.height,
                _ => target.y1,
            };
            let left = target.x0 + (target.width() - overlay.width) / 2.0;
            let delta = self.delta(left, overlay.width, container.x0, container.width());
            OverlayPosition {
                top,
                left: left + delta,
                arrow_offset_top: None,
                arrow_offset_left: Some(arrow_offset(delta, overlay.width)),
                placement: requested,
            }
        }
    }
}

/// Computes and remembers overlay positions through a [`PlacementStrategy`].
#[derive(Clone, Debug, Default)]
pub struct OverlayPositioner<S = CenteredStrategy> {
    strategy: S,
    last: Option<OverlayPosition>,
}

impl<S: PlacementStrategy> OverlayPositioner<S> {
    /// A positioner delegating to `strategy`.
    pub fn new(strategy: S) -> Self {
        Self { strategy, last: None }
    }

    /// The placement strategy.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Compute a position and remember it.
    pub fn compute_position(
        &mut self,
        target: Rect,
        container: Rect,
        overlay: Size,
        requested: Placement,
    ) -> OverlayPosition {
        let position = self.strategy.place(target, container, overlay, requested);
        if position.placement != requested {
            tracing::trace!(?requested, resolved = ?position.placement, "placement substituted");
        }
        self.last = Some(position);
        position
    }

    /// Most recently computed position.
    pub fn position(&self) -> Option<OverlayPosition> {
        self.last
    }

    /// Class name of the resolved placement.
    pub fn placement_class(&self) -> Option<&'static str> {
        self.last.map(|p| p.placement.class_name())
    }

    /// Forget the last position.
    pub fn clear(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER: Rect = Rect::new(0.0, 0.0, 400.0, 300.0);

    #[test]
    fn right_is_vertically_centered() {
        let s = CenteredStrategy::default();
        let target = Rect::new(100.0, 100.0, 160.0, 140.0);
        let pos = s.place(target, CONTAINER, Size::new(80.0, 20.0), Placement::Right);
        assert_eq!(pos.left, 160.0);
        assert_eq!(pos.top, 110.0);
        assert_eq!(pos.arrow_offset_top, Some(50.0));
        assert_eq!(pos.arrow_offset_left, None);
        assert_eq!(pos.placement, Placement::Right);
    }

    #[test]
    fn left_and_top_sit_before_the_target() {
        let s = CenteredStrategy::default();
        let target = Rect::new(100.0, 100.0, 160.0, 140.0);
        let overlay = Size::new(40.0, 20.0);

        let pos = s.place(target, CONTAINER, overlay, Placement::Left);
        assert_eq!(pos.left, 60.0);

        let pos = s.place(target, CONTAINER, overlay, Placement::Top);
        assert_eq!(pos.top, 80.0);
        assert_eq!(pos.left, 110.0);
        assert_eq!(pos.arrow_offset_left, Some(50.0));
    }

    #[test]
    fn overflow_shifts_overlay_and_arrow() {
        let s = CenteredStrategy::new(5.0);
        // Near the top edge: centered top would be -20.
        let target = Rect::new(100.0, 0.0, 140.0, 20.0);
        let pos = s.place(target, CONTAINER, Size::new(50.0, 60.0), Placement::Right);
        // Pushed down to the padding line.
        assert_eq!(pos.top, 5.0);
        // delta 25 over extent 60.
        let expected = 50.0 * (1.0 - 2.0 * 25.0 / 60.0);
        assert_eq!(pos.arrow_offset_top, Some(expected));

        // Near the right edge on a bottom placement.
        let target = Rect::new(380.0, 100.0, 400.0, 120.0);
        let pos = s.place(target, CONTAINER, Size::new(100.0, 30.0), Placement::Bottom);
        assert_eq!(pos.top, 120.0);
        assert_eq!(pos.left, 295.0);
        let arrow = pos.arrow_offset_left.unwrap();
        assert!(arrow > 50.0, "arrow moves toward the target: {arrow}");
    }

    #[test]
    fn scrolled_container_uses_its_origin() {
        let s = CenteredStrategy::default();
        let scrolled = Rect::new(0.0, 200.0, 400.0, 500.0);
        let target = Rect::new(100.0, 200.0, 140.0, 210.0);
        let pos = s.place(target, scrolled, Size::new(50.0, 40.0), Placement::Left);
        assert_eq!(pos.top, 200.0);
    }

    #[test]
    fn zero_extent_overlay_keeps_arrow_centered() {
        assert_eq!(arrow_offset(10.0, 0.0), 50.0);
    }

    struct FlipToBottom;

    impl PlacementStrategy for FlipToBottom {
        fn place(&self, target: Rect, container: Rect, overlay: Size, requested: Placement) -> OverlayPosition {
            let requested = if requested == Placement::Top && target.y0 - overlay.height < container.y0 {
                Placement::Bottom
            } else {
                requested
            };
            CenteredStrategy::default().place(target, container, overlay, requested)
        }
    }

    #[test]
    fn positioner_carries_resolved_placement() {
        let mut positioner = OverlayPositioner::new(FlipToBottom);
        assert_eq!(positioner.placement_class(), None);

        let target = Rect::new(100.0, 10.0, 140.0, 30.0);
        let pos = positioner.compute_position(target, CONTAINER, Size::new(40.0, 40.0), Placement::Top);
        assert_eq!(pos.placement, Placement::Bottom);
        assert_eq!(pos.top, 30.0);
        assert_eq!(positioner.placement_class(), Some("bottom"));

        positioner.clear();
        assert_eq!(positioner.position(), None);
    }
}
