//! The viewer session
//!
//! Bundles everything the frame loop touches: datasets, camera, markers,
//! picker, scale effects, lookups and the readout throttle. Input events
//! mutate the session between frames and [`Session::tick`] runs one frame.

use crate::camera::OrbitCamera;
use crate::config::ViewerConfig;
use crate::input::InputEvent;
use crate::lookup::{LookupCoordinator, LookupServices};
use crate::readout::ReadoutThrottle;
use crate::scheduler::FrameScheduler;
use crate::selection::{ClickOutcome, SelectionState};
use starfield_algorithms::{viewport_to_ndc, BruteForcePicker, IndexedPicker, PointPicker};
use starfield_core::{
    narrow, DatasetKind, DatasetRegistry, MarkerStyle, Point3d, PointDataset, Readout,
    ReadoutSink, Renderer, Result,
};
use starfield_io::{DatasetInbox, LoadOutcome};
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Handle;

/// All viewer state driven by one frame loop
pub struct Session {
    config: ViewerConfig,
    registry: DatasetRegistry,
    inboxes: Vec<DatasetInbox>,
    camera: OrbitCamera,
    selection: SelectionState,
    picker: Box<dyn PointPicker>,
    scheduler: FrameScheduler,
    lookup: LookupCoordinator,
    readout: ReadoutThrottle,

    /// Cursor in normalized device coordinates
    cursor: Option<(f64, f64)>,
    pressed: bool,
    dragged: bool,
    resized: Option<(u32, u32)>,
    readout_dirty: bool,
    pending_search: Option<String>,
}

impl Session {
    pub fn new(config: ViewerConfig, runtime: Handle, services: LookupServices) -> Self {
        let picker: Box<dyn PointPicker> = if config.use_spatial_index {
            Box::new(IndexedPicker::new())
        } else {
            Box::new(BruteForcePicker::new())
        };

        Self {
            registry: DatasetRegistry::new(),
            inboxes: Vec::new(),
            camera: OrbitCamera::from_config(&config),
            selection: SelectionState::new(),
            picker,
            scheduler: FrameScheduler::new(&config),
            lookup: LookupCoordinator::new(runtime, services, config.error_display()),
            readout: ReadoutThrottle::new(config.readout_period()),
            cursor: None,
            pressed: false,
            dragged: false,
            resized: None,
            readout_dirty: true,
            pending_search: config.initial_search.clone(),
            config,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn registry(&self) -> &DatasetRegistry {
        &self.registry
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn lookup(&self) -> &LookupCoordinator {
        &self.lookup
    }

    /// Receive datasets from a loader; drained at the start of every tick
    pub fn attach_inbox(&mut self, inbox: DatasetInbox) {
        self.inboxes.push(inbox);
    }

    /// Register a fully loaded dataset
    ///
    /// With an initial dataset configured, every other dataset starts hidden.
    pub fn insert_dataset(&mut self, dataset: PointDataset) -> Result<Arc<PointDataset>> {
        if let Some(initial) = &self.config.initial_dataset {
            dataset.set_visible(dataset.title() == initial);
        }
        let dataset = self.registry.insert(dataset)?;

        if dataset.kind() == DatasetKind::Simbad {
            if let Some(ident) = self.pending_search.take() {
                self.lookup.search(&ident);
            }
        }
        Ok(dataset)
    }

    /// Apply one input event
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown => {
                self.pressed = true;
                self.dragged = false;
                self.camera.begin_interaction();
                self.update_hover();
            }
            InputEvent::PointerUp => self.pressed = false,
            InputEvent::PointerDrag { dx, dy } => {
                if self.pressed {
                    self.dragged = true;
                    self.camera.rotate(dx, dy);
                }
            }
            InputEvent::PointerMove { x_frac, y_frac } => {
                self.cursor = Some(viewport_to_ndc(x_frac, y_frac));
                if !self.pressed {
                    self.update_hover();
                }
            }
            InputEvent::Zoom { delta } => {
                let pivot = self.selection.pivot();
                self.camera.zoom(delta, pivot.as_ref());
            }
            InputEvent::Click { modifier } => {
                if self.dragged {
                    log::debug!("Ignoring click at the end of a drag");
                    return;
                }
                if let ClickOutcome::Selected(target) = self.selection.click(modifier) {
                    self.after_selection(target);
                }
            }
            InputEvent::TouchStart => self.selection.touch_start(),
            InputEvent::TouchEnd => self.selection.touch_end(),
            InputEvent::Resize { width, height } => {
                self.camera.set_viewport(width, height);
                self.resized = Some((width, height));
            }
            InputEvent::ToggleDataset { title, visible } => {
                if let Err(e) = self.registry.set_visible(&title, visible) {
                    log::warn!("Cannot toggle dataset: {}", e);
                }
            }
            InputEvent::ToggleGrid(show) => self.scheduler.set_show_grid(show),
            InputEvent::Find(ident) => self.lookup.search(&ident),
        }
    }

    /// Select a point directly, or deselect with `None`
    pub fn select(&mut self, target: Option<(&Arc<PointDataset>, usize)>) {
        self.selection.select(target);
        let target = self.selection.selected().target();
        self.after_selection(target);
    }

    /// Run one frame
    pub fn tick(&mut self, now: Instant, renderer: &mut dyn Renderer, sink: &mut dyn ReadoutSink) {
        self.drain_inboxes();
        if let Some(index) = self.lookup.poll(now) {
            self.select_search_hit(index, now);
        }

        let pivot = self.selection.pivot();
        if let Some(pivot) = &pivot {
            self.camera.smooth_aim_at(pivot);
        }
        self.camera.apply_pending_rotation(pivot.as_ref());
        self.update_hover();

        let center = pivot.unwrap_or_else(Point3d::origin);
        let distance = self.camera.distance_to(&center);
        if self.scheduler.update_distance(distance, renderer) {
            self.readout_dirty = true;
        }

        if let Some((width, height)) = self.resized.take() {
            renderer.set_viewport(width, height);
        }
        renderer.set_camera(&self.camera.view_matrix(), &self.camera.projection_matrix());
        for dataset in self.registry.visible() {
            renderer.draw_dataset(dataset);
        }

        let center = narrow(&center);
        self.scheduler.update_grid(&center, now, renderer);

        let selected = self.selection.selected();
        if selected.visible {
            renderer.draw_marker(MarkerStyle::Selected, &selected.position());
        }
        let hovered = self.selection.hovered();
        if hovered.visible {
            renderer.draw_marker(MarkerStyle::Hovered, &hovered.position());
        }
        renderer.request_next_frame();

        if self.readout_dirty {
            self.readout_dirty = false;
            let readout = Readout {
                distance,
                orbit_center: center,
                grid_scale: self.scheduler.grid().current(),
            };
            self.readout.request(readout, now);
        }
        if let Some(readout) = self.readout.poll(now) {
            sink.show_readout(&readout);
        }
    }

    fn update_hover(&mut self) {
        let Some((ndc_x, ndc_y)) = self.cursor else {
            return;
        };
        let ray = self.camera.pick_ray(ndc_x, ndc_y);
        let hit = self.picker.pick(&ray, &self.registry);
        self.selection.update_hover(hit.as_ref());
    }

    fn after_selection(&mut self, target: Option<(Arc<PointDataset>, usize)>) {
        self.camera.begin_interaction();
        match target {
            Some((dataset, index)) => self.lookup.request_detail(dataset.kind(), index),
            None => self.lookup.clear_detail(),
        }
        self.readout_dirty = true;
    }

    fn select_search_hit(&mut self, index: usize, now: Instant) {
        let simbad = self
            .registry
            .iter()
            .find(|d| d.kind() == DatasetKind::Simbad)
            .cloned();

        match simbad {
            Some(dataset) if dataset.point(index).is_some() => {
                self.select(Some((&dataset, index)));
            }
            Some(dataset) => {
                log::warn!(
                    "Search matched point {} but '{}' has only {} points",
                    index,
                    dataset.title(),
                    dataset.len()
                );
                self.lookup.mark_search_failed(now);
            }
            None => {
                log::warn!("Search matched point {} but SIMBAD is not loaded", index);
                self.lookup.mark_search_failed(now);
            }
        }
    }

    fn drain_inboxes(&mut self) {
        let outcomes: Vec<LoadOutcome> = self.inboxes.iter_mut().flat_map(|i| i.drain()).collect();
        for outcome in outcomes {
            match outcome {
                LoadOutcome::Loaded(dataset) => {
                    if let Err(e) = self.insert_dataset(dataset) {
                        log::error!("Cannot register dataset: {}", e);
                    }
                }
                LoadOutcome::Failed { title, error } => {
                    log::error!("Failed to load '{}': {}", title, error);
                }
            }
        }
    }
}
