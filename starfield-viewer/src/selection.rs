//! Selection and hover tracking
//!
//! Hover and selection are two independent [`Marker`]s. A marker without a
//! dataset or index means "nothing", which is a normal state rather than an
//! error.

use starfield_algorithms::PickHit;
use starfield_core::{widen, Point3d, Point3f, PointDataset};
use std::sync::{Arc, Weak};

/// A highlighted point, or nothing
#[derive(Debug, Clone, Default)]
pub struct Marker {
    dataset: Option<Weak<PointDataset>>,
    index: Option<usize>,
    position: Point3f,
    pub visible: bool,
    pub suppressed_by_touch: bool,
}

impl Marker {
    /// The "nothing" marker
    pub fn none() -> Self {
        Self::default()
    }

    /// Point at `index` of `dataset`; out-of-range indices give nothing
    pub fn at(dataset: &Arc<PointDataset>, index: usize) -> Self {
        let mut marker = Self::none();
        marker.set(dataset, index);
        marker
    }

    pub fn set(&mut self, dataset: &Arc<PointDataset>, index: usize) {
        match dataset.point(index) {
            Some(position) => {
                self.dataset = Some(Arc::downgrade(dataset));
                self.index = Some(index);
                self.position = position;
            }
            None => {
                log::warn!(
                    "Index {} is out of range for '{}' ({} points)",
                    index,
                    dataset.title(),
                    dataset.len()
                );
                self.clear();
            }
        }
    }

    /// Forget the target; the cached position is kept
    pub fn clear(&mut self) {
        self.dataset = None;
        self.index = None;
    }

    pub fn set_position(&mut self, position: Point3f) {
        self.position = position;
    }

    pub fn position(&self) -> Point3f {
        self.position
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// The dataset pointed at, if it is still alive
    pub fn dataset(&self) -> Option<Arc<PointDataset>> {
        self.dataset.as_ref().and_then(Weak::upgrade)
    }

    /// Dataset and index, when both are present
    pub fn target(&self) -> Option<(Arc<PointDataset>, usize)> {
        Some((self.dataset()?, self.index?))
    }

    pub fn is_present(&self) -> bool {
        self.target().is_some()
    }
}

/// Result of a click on the view
#[derive(Debug, Clone)]
pub enum ClickOutcome {
    /// The hovered point (or nothing) became the selection
    Selected(Option<(Arc<PointDataset>, usize)>),
    /// Modifier click: only the hover marker was hidden
    HoverHidden,
}

/// Hover and selection markers plus the touch capture
#[derive(Debug, Default)]
pub struct SelectionState {
    selected: Marker,
    hovered: Marker,
    touch_capture: Option<Marker>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> &Marker {
        &self.selected
    }

    pub fn hovered(&self) -> &Marker {
        &self.hovered
    }

    /// Record the latest pick under the cursor
    pub fn update_hover(&mut self, hit: Option<&PickHit>) {
        match hit {
            Some(hit) => {
                self.hovered.dataset = Some(Arc::downgrade(&hit.dataset));
                self.hovered.index = Some(hit.index);
                self.hovered.set_position(hit.position);
                self.hovered.visible = !self.hovered.suppressed_by_touch;
            }
            None => {
                self.hovered.clear();
                self.hovered.visible = false;
            }
        }
    }

    /// Click on the view while not dragging
    pub fn click(&mut self, modifier: bool) -> ClickOutcome {
        self.hovered.visible = false;
        if modifier {
            return ClickOutcome::HoverHidden;
        }

        let target = self.hovered.target();
        self.select(target.as_ref().map(|(dataset, index)| (dataset, *index)));
        ClickOutcome::Selected(target)
    }

    /// Select a point directly, or deselect with `None`
    pub fn select(&mut self, target: Option<(&Arc<PointDataset>, usize)>) {
        match target {
            Some((dataset, index)) => {
                self.selected.set(dataset, index);
                self.selected.visible = self.selected.is_present();
                if let Some((dataset, index)) = self.selected.target() {
                    log::info!("Selected point {} of '{}'", index, dataset.title());
                }
            }
            None => {
                self.selected.clear();
                self.selected.visible = false;
                log::debug!("Selection cleared");
            }
        }
    }

    /// Touch began: hide hover and remember what it pointed at
    pub fn touch_start(&mut self) {
        self.hovered.suppressed_by_touch = true;
        self.hovered.visible = false;
        self.touch_capture = Some(self.hovered.clone());
    }

    /// Touch ended: bring back the hover captured at touch start
    ///
    /// Picking under a lifted finger is meaningless, so the capture wins over
    /// whatever was picked during the touch. Hover stays suppressed while
    /// touch input is in use.
    pub fn touch_end(&mut self) {
        if let Some(captured) = self.touch_capture.take() {
            self.hovered.dataset = captured.dataset;
            self.hovered.index = captured.index;
            self.hovered.set_position(captured.position);
        }
        self.hovered.visible = false;
    }

    /// Point the camera orbits, if something is selected
    pub fn pivot(&self) -> Option<Point3d> {
        if self.selected.is_present() {
            Some(widen(&self.selected.position))
        } else {
            None
        }
    }

    /// Pivot, falling back to the origin
    pub fn pivot_or_origin(&self) -> Point3d {
        self.pivot().unwrap_or_else(Point3d::origin)
    }
}
