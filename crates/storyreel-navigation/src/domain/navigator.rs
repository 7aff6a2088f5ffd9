//! Logical page ↔ physical offset synchronization.
//!
//! Positions are 1-based catalog positions. The page at position `n` sits at
//! offset `(n - 1) * extent`, and a settled offset maps back to
//! `round(offset / extent) + 1`, so the two conversions are exact inverses
//! for whole pages.

use std::sync::Arc;

use serde::Serialize;
use storyreel_core::error::DomainError;
use storyreel_core::ids::{Orientation, PageId};
use storyreel_graph::domain::graph::PageGraph;
use storyreel_graph::domain::page::{Page, PageKind};
use tracing::{debug, info};

use super::viewport::Viewport;

/// Physical scroll instruction for the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollCommand {
    /// Logical page the offset belongs to.
    pub page: PageId,
    pub x: f64,
    pub y: f64,
    pub animated: bool,
}

/// Where the view is in its per-page state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum ViewPhase {
    /// Resting exactly on an image page.
    Idle { page: PageId },
    /// A drag is in progress that started on `from`.
    Scrolling { from: PageId },
    /// Resting on a choice page; forward drags are reverted.
    LockedOnChoice { page: PageId },
}

/// Result of a settled drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettleOutcome {
    /// The logical page changed.
    Moved { from: PageId, to: PageId },
    /// A forward drag off a choice page was reverted.
    SnappedBack(ScrollCommand),
    /// A forward drag overshot a choice page and was held on it.
    HeldAtChoice {
        from: PageId,
        to: PageId,
        scroll: ScrollCommand,
    },
    /// The drag settled back on the same page.
    Stayed(PageId),
}

/// Keeps the logical current page and the physical offset consistent.
#[derive(Debug, Clone)]
pub struct Navigator {
    graph: Arc<PageGraph>,
    viewport: Viewport,
    orientation: Orientation,
    current: PageId,
    phase: ViewPhase,
}

impl Navigator {
    /// # Errors
    ///
    /// Returns `DomainError::PageNotFound` if `current` is not in the graph.
    pub fn new(
        graph: Arc<PageGraph>,
        current: PageId,
        orientation: Orientation,
        viewport: Viewport,
    ) -> Result<Self, DomainError> {
        let kind = graph.get_page(current)?.kind;
        Ok(Self {
            phase: resting_phase(current, kind),
            graph,
            viewport,
            orientation,
            current,
        })
    }

    #[must_use]
    pub fn current_page(&self) -> PageId {
        self.current
    }

    #[must_use]
    pub fn phase(&self) -> ViewPhase {
        self.phase
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// `true` while the current page is a choice page.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.kind_of(self.current) == Some(PageKind::Choice)
    }

    #[must_use]
    pub fn page_extent(&self) -> f64 {
        self.viewport.extent(self.orientation)
    }

    /// Offset of `page` along the scroll axis.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PageNotFound` if the page is not in the graph.
    pub fn offset_of(&self, page: PageId) -> Result<f64, DomainError> {
        let position = self
            .graph
            .position_of(page)
            .ok_or(DomainError::PageNotFound(page))?;
        Ok(self.offset_at(position))
    }

    /// Page nearest to a physical offset, clamped to the catalog.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn page_at_offset(&self, offset: f64) -> PageId {
        let steps = (offset / self.page_extent()).round();
        let position = if steps.is_nan() || steps < 0.0 {
            1
        } else {
            (steps as usize).saturating_add(1).min(self.graph.len())
        };
        self.graph
            .page_at(position)
            .map_or(self.current, |page| page.id)
    }

    /// The scroll instruction that shows the current page.
    #[must_use]
    pub fn current_command(&self, animated: bool) -> ScrollCommand {
        self.command_at(self.current_position(), animated)
    }

    /// Programmatic navigation. Bypasses the choice lock. Returns `None` if
    /// the view already rests on `page`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PageNotFound` if the page is not in the graph.
    pub fn scroll_to(
        &mut self,
        page: PageId,
        animated: bool,
    ) -> Result<Option<ScrollCommand>, DomainError> {
        let kind = self.graph.get_page(page)?.kind;
        let resting = !matches!(self.phase, ViewPhase::Scrolling { .. });
        if page == self.current && resting {
            debug!(page = %page, "skipping redundant scroll");
            return Ok(None);
        }
        self.current = page;
        self.phase = resting_phase(page, kind);
        debug!(page = %page, animated, "scrolling to page");
        Ok(Some(self.current_command(animated)))
    }

    /// A user drag has started.
    pub fn begin_drag(&mut self) {
        self.phase = ViewPhase::Scrolling { from: self.current };
    }

    /// Live drag position. Forward movement past the next choice page,
    /// or off the current one, is reverted immediately.
    pub fn drag_to(&mut self, offset: f64) -> Option<ScrollCommand> {
        if !matches!(self.phase, ViewPhase::Scrolling { .. }) {
            self.begin_drag();
        }
        let from_position = self.current_position();
        let barrier = self.forward_barrier(from_position)?;
        if offset <= self.offset_at(barrier) {
            return None;
        }
        if barrier == from_position {
            self.phase = ViewPhase::LockedOnChoice { page: self.current };
        }
        let revert = self.command_at(barrier, true);
        debug!(page = %revert.page, offset, "reverting forward drag past choice page");
        Some(revert)
    }

    /// A drag has come to rest at `offset`.
    pub fn settle(&mut self, offset: f64) -> SettleOutcome {
        let from = self.current;
        let from_position = self.current_position();
        let mut target_position = self
            .graph
            .position_of(self.page_at_offset(offset))
            .unwrap_or(from_position);

        let mut held = false;
        if target_position > from_position {
            if let Some(barrier) = self.forward_barrier(from_position) {
                if barrier == from_position {
                    self.phase = ViewPhase::LockedOnChoice { page: from };
                    info!(page = %from, "forward scroll blocked until a choice is made");
                    return SettleOutcome::SnappedBack(self.current_command(true));
                }
                if target_position > barrier {
                    target_position = barrier;
                    held = true;
                }
            }
        }

        let target = self
            .graph
            .page_at(target_position)
            .map_or(from, |page| page.id);
        let kind = self.kind_of(target).unwrap_or(PageKind::Image);
        self.phase = resting_phase(target, kind);
        if target == from {
            return SettleOutcome::Stayed(from);
        }
        self.current = target;
        if held {
            info!(from = %from, to = %target, "forward scroll held at choice page");
            return SettleOutcome::HeldAtChoice {
                from,
                to: target,
                scroll: self.current_command(true),
            };
        }
        debug!(from = %from, to = %target, "scroll settled on new page");
        SettleOutcome::Moved { from, to: target }
    }

    /// Switches orientation, keeping the logical page.
    pub fn set_orientation(&mut self, orientation: Orientation) -> ScrollCommand {
        self.orientation = orientation;
        self.current_command(false)
    }

    /// Applies a new screen size, keeping the logical page.
    pub fn set_viewport(&mut self, viewport: Viewport) -> ScrollCommand {
        self.viewport = viewport;
        self.current_command(false)
    }

    fn current_position(&self) -> usize {
        self.graph.position_of(self.current).unwrap_or(1)
    }

    #[allow(clippy::cast_precision_loss)]
    fn offset_at(&self, position: usize) -> f64 {
        position.saturating_sub(1) as f64 * self.page_extent()
    }

    fn command_at(&self, position: usize, animated: bool) -> ScrollCommand {
        let offset = self.offset_at(position);
        let page = self
            .graph
            .page_at(position)
            .map_or(self.current, |page| page.id);
        let (x, y) = match self.orientation {
            Orientation::Vertical => (0.0, offset),
            Orientation::Horizontal => (offset, 0.0),
        };
        ScrollCommand {
            page,
            x,
            y,
            animated,
        }
    }

    /// First choice page at or after `from` in catalog order.
    fn forward_barrier(&self, from: usize) -> Option<usize> {
        (from..=self.graph.len()).find(|&position| {
            self.graph
                .page_at(position)
                .is_some_and(Page::is_choice)
        })
    }

    fn kind_of(&self, page: PageId) -> Option<PageKind> {
        self.graph.get_page(page).ok().map(|page| page.kind)
    }
}

fn resting_phase(page: PageId, kind: PageKind) -> ViewPhase {
    match kind {
        PageKind::Choice => ViewPhase::LockedOnChoice { page },
        PageKind::Image => ViewPhase::Idle { page },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyreel_graph::application::builtin::forest_graph;

    const WIDTH: f64 = 400.0;
    const HEIGHT: f64 = 800.0;

    fn navigator_at(page: u32) -> Navigator {
        Navigator::new(
            Arc::new(forest_graph().unwrap()),
            PageId(page),
            Orientation::Vertical,
            Viewport::new(WIDTH, HEIGHT).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_offset_and_page_are_exact_inverses() {
        let mut navigator = navigator_at(0);
        let ids: Vec<PageId> = forest_graph().unwrap().pages().iter().map(|p| p.id).collect();

        for orientation in [Orientation::Vertical, Orientation::Horizontal] {
            navigator.set_orientation(orientation);
            for &id in &ids {
                let offset = navigator.offset_of(id).unwrap();
                assert_eq!(navigator.page_at_offset(offset), id);
            }
        }
    }

    #[test]
    fn test_page_at_offset_rounds_and_clamps() {
        let navigator = navigator_at(0);

        // Position 2 is page 1; 1.4 extents rounds down to it.
        assert_eq!(navigator.page_at_offset(1.4 * HEIGHT), PageId(1));
        // 1.6 extents rounds up to position 3, page 2.
        assert_eq!(navigator.page_at_offset(1.6 * HEIGHT), PageId(2));
        assert_eq!(navigator.page_at_offset(-500.0), PageId(0));
        assert_eq!(navigator.page_at_offset(1.0e9), PageId(15));
    }

    #[test]
    fn test_scroll_to_current_page_is_suppressed() {
        let mut navigator = navigator_at(2);

        assert_eq!(navigator.scroll_to(PageId(2), true).unwrap(), None);
    }

    #[test]
    fn test_scroll_to_emits_offset_on_scroll_axis() {
        let mut navigator = navigator_at(0);

        let command = navigator.scroll_to(PageId(7), true).unwrap().unwrap();

        // Page 7 sits at position 6.
        assert_eq!(command.page, PageId(7));
        assert!((command.y - 5.0 * HEIGHT).abs() < f64::EPSILON);
        assert!(command.x.abs() < f64::EPSILON);
        assert_eq!(navigator.phase(), ViewPhase::Idle { page: PageId(7) });
    }

    #[test]
    fn test_scroll_to_unknown_page_fails_without_moving() {
        let mut navigator = navigator_at(2);

        let result = navigator.scroll_to(PageId(99), true);

        assert!(matches!(result, Err(DomainError::PageNotFound(PageId(99)))));
        assert_eq!(navigator.current_page(), PageId(2));
    }

    #[test]
    fn test_forward_settle_on_choice_page_snaps_back() {
        // Arrange
        let mut navigator = navigator_at(3);
        let own_offset = navigator.offset_of(PageId(3)).unwrap();
        assert!(navigator.is_locked());

        // Act
        navigator.begin_drag();
        let outcome = navigator.settle(own_offset + HEIGHT);

        // Assert
        match outcome {
            SettleOutcome::SnappedBack(command) => {
                assert_eq!(command.page, PageId(3));
                assert!((command.y - own_offset).abs() < f64::EPSILON);
            }
            other => panic!("expected SnappedBack, got {other:?}"),
        }
        assert_eq!(navigator.current_page(), PageId(3));
        assert_eq!(navigator.phase(), ViewPhase::LockedOnChoice { page: PageId(3) });
    }

    #[test]
    fn test_forward_drag_on_choice_page_is_reverted_live() {
        let mut navigator = navigator_at(3);
        let own_offset = navigator.offset_of(PageId(3)).unwrap();

        assert!(navigator.drag_to(own_offset + 10.0).is_some());
        assert_eq!(navigator.phase(), ViewPhase::LockedOnChoice { page: PageId(3) });
        assert!(navigator.drag_to(own_offset - 10.0).is_none());
    }

    #[test]
    fn test_revert_restores_redundant_scroll_guard() {
        // Arrange
        let mut navigator = navigator_at(3);
        let own_offset = navigator.offset_of(PageId(3)).unwrap();

        // Act
        navigator.drag_to(own_offset + 10.0);

        // Assert
        assert_eq!(navigator.scroll_to(PageId(3), true).unwrap(), None);
    }

    #[test]
    fn test_forward_settle_cannot_skip_an_upcoming_choice_page() {
        // Arrange
        let mut navigator = navigator_at(2);
        let far = navigator.offset_of(PageId(10)).unwrap();
        let choice_offset = navigator.offset_of(PageId(3)).unwrap();

        // Act
        navigator.begin_drag();
        let outcome = navigator.settle(far);

        // Assert
        match outcome {
            SettleOutcome::HeldAtChoice { from, to, scroll } => {
                assert_eq!(from, PageId(2));
                assert_eq!(to, PageId(3));
                assert_eq!(scroll.page, PageId(3));
                assert!((scroll.y - choice_offset).abs() < f64::EPSILON);
            }
            other => panic!("expected HeldAtChoice, got {other:?}"),
        }
        assert_eq!(navigator.current_page(), PageId(3));
        assert_eq!(navigator.phase(), ViewPhase::LockedOnChoice { page: PageId(3) });
    }

    #[test]
    fn test_forward_drag_past_upcoming_choice_page_is_reverted_to_it() {
        // Arrange
        let mut navigator = navigator_at(1);
        let choice_offset = navigator.offset_of(PageId(3)).unwrap();

        // Act
        navigator.begin_drag();
        let within = navigator.drag_to(choice_offset);
        let past = navigator.drag_to(choice_offset + HEIGHT);

        // Assert
        assert!(within.is_none());
        let revert = past.unwrap();
        assert_eq!(revert.page, PageId(3));
        assert!((revert.y - choice_offset).abs() < f64::EPSILON);
        assert_eq!(navigator.current_page(), PageId(1));
    }

    #[test]
    fn test_backward_settle_on_choice_page_is_allowed() {
        let mut navigator = navigator_at(3);
        let back = navigator.offset_of(PageId(2)).unwrap();

        navigator.begin_drag();
        let outcome = navigator.settle(back);

        assert_eq!(
            outcome,
            SettleOutcome::Moved {
                from: PageId(3),
                to: PageId(2)
            }
        );
        assert_eq!(navigator.phase(), ViewPhase::Idle { page: PageId(2) });
    }

    #[test]
    fn test_programmatic_scroll_leaves_choice_page() {
        let mut navigator = navigator_at(3);

        let command = navigator.scroll_to(PageId(4), true).unwrap();

        assert!(command.is_some());
        assert_eq!(navigator.current_page(), PageId(4));
        assert!(!navigator.is_locked());
    }

    #[test]
    fn test_settle_onto_choice_page_locks() {
        let mut navigator = navigator_at(2);
        let forward = navigator.offset_of(PageId(3)).unwrap();

        navigator.begin_drag();
        navigator.settle(forward);

        assert_eq!(navigator.phase(), ViewPhase::LockedOnChoice { page: PageId(3) });
    }

    #[test]
    fn test_settle_on_same_page_reports_stayed() {
        let mut navigator = navigator_at(1);
        let own = navigator.offset_of(PageId(1)).unwrap();

        navigator.begin_drag();

        assert_eq!(navigator.settle(own + 0.2 * HEIGHT), SettleOutcome::Stayed(PageId(1)));
        assert_eq!(navigator.phase(), ViewPhase::Idle { page: PageId(1) });
    }

    #[test]
    fn test_orientation_switch_preserves_logical_page() {
        let mut navigator = navigator_at(10);

        let command = navigator.set_orientation(Orientation::Horizontal);

        // Page 10 sits at position 11.
        assert_eq!(navigator.current_page(), PageId(10));
        assert_eq!(command.page, PageId(10));
        assert!((command.x - 10.0 * WIDTH).abs() < f64::EPSILON);
        assert!(command.y.abs() < f64::EPSILON);
        assert!(!command.animated);
    }

    #[test]
    fn test_phase_serializes_with_tag() {
        let json = serde_json::to_value(ViewPhase::LockedOnChoice { page: PageId(3) }).unwrap();

        assert_eq!(json, serde_json::json!({ "phase": "locked_on_choice", "page": 3 }));
    }
}
