//! Touch-driven editor for a stack of polygons.
//!
//! The controller owns the polygons and turns pointer events into vertex
//! drags, whole-shape drags, taps and long presses:
//! - a press first looks for a vertex, then for a polygon body, scanning from
//!   the most recently added polygon backwards
//! - a press on a body starts a shape drag that is also a pending tap until
//!   the pointer leaves the slop radius
//! - long presses are deadlines polled on the interaction thread, so a release
//!   always clears them before any later poll can observe them

use crate::callbacks::Callbacks;
use crate::config::PolygonConfig;
use crate::input::{Instant, PointerEvent};
use crate::polygon::{Polygon, PolygonId};
use kurbo::{Point, Size, Vec2};

/// Minimum per-axis displacement before a shape drag moves the polygon.
const SHAPE_DRAG_MIN_STEP: f64 = 1.0;

/// What the current gesture is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// A vertex of `polygon` is being dragged.
    VertexDrag { polygon: usize, vertex: usize },
    /// The whole `polygon` is being dragged. While `click_pending` is set the
    /// gesture can still resolve to a tap.
    ShapeDrag { polygon: usize, click_pending: bool },
}

/// A long press waiting to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongPressTicket {
    /// Identifies the gesture the long press belongs to.
    pub token: u64,
    pub deadline: Instant,
}

#[derive(Debug, Clone, Copy)]
enum DragTarget {
    Vertex(usize),
    Shape,
}

/// Transient state of one press-move-release sequence.
#[derive(Debug, Clone)]
struct Gesture {
    token: u64,
    polygon: usize,
    target: DragTarget,
    press: Point,
    last: Point,
    /// Reference point for shape translation. Only advances once a step
    /// exceeds [`SHAPE_DRAG_MIN_STEP`], so slow drags still accumulate.
    anchor: Point,
    click_pending: bool,
    long_press: Option<Instant>,
}

/// Owns a polygon collection and edits it from pointer input.
#[derive(Debug)]
pub struct PolygonController {
    polygons: Vec<Polygon>,
    /// Selection used in single-select mode.
    selected_index: Option<usize>,
    config: PolygonConfig,
    surface: Size,
    gesture: Option<Gesture>,
    next_token: u64,
    callbacks: Callbacks,
    redraw_requested: bool,
}

impl Default for PolygonController {
    fn default() -> Self {
        Self::new(PolygonConfig::default())
    }
}

impl PolygonController {
    pub fn new(config: PolygonConfig) -> Self {
        Self {
            polygons: Vec::new(),
            selected_index: None,
            config,
            surface: Size::ZERO,
            gesture: None,
            next_token: 0,
            callbacks: Callbacks::new(),
            redraw_requested: false,
        }
    }

    pub fn config(&self) -> &PolygonConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut PolygonConfig {
        &mut self.config
    }

    pub fn callbacks_mut(&mut self) -> &mut Callbacks {
        &mut self.callbacks
    }

    /// Size of the drawing surface, used for edge clamping.
    pub fn set_surface_size(&mut self, size: Size) {
        self.surface = Size::new(size.width.max(0.0), size.height.max(0.0));
    }

    pub fn surface_size(&self) -> Size {
        self.surface
    }

    /// Return and clear the pending redraw request.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    // --- Gesture handling ---

    /// Current gesture state.
    pub fn state(&self) -> InteractionState {
        match &self.gesture {
            None => InteractionState::Idle,
            Some(g) => match g.target {
                DragTarget::Vertex(vertex) => InteractionState::VertexDrag {
                    polygon: g.polygon,
                    vertex,
                },
                DragTarget::Shape => InteractionState::ShapeDrag {
                    polygon: g.polygon,
                    click_pending: g.click_pending,
                },
            },
        }
    }

    /// Index of the polygon under the active gesture, if any.
    pub fn active_polygon(&self) -> Option<usize> {
        self.gesture.as_ref().map(|g| g.polygon)
    }

    /// Dispatch a pointer event. Returns whether the event was consumed.
    ///
    /// Multi-touch downs and moves pass through untouched; an up or cancel
    /// always ends the active gesture.
    pub fn handle_pointer_event(&mut self, event: PointerEvent, now: Instant) -> bool {
        if event.is_multi_touch() {
            return false;
        }
        match event {
            PointerEvent::Down { position, .. } => self.press_at(position, now),
            PointerEvent::Move { position, .. } => {
                self.move_to(position);
                self.gesture.is_some()
            }
            PointerEvent::Up { position } => self.release(position),
            PointerEvent::Cancel { .. } => self.cancel(),
        }
    }

    /// Press using the current time for the long-press deadline.
    pub fn press(&mut self, point: Point) -> bool {
        self.press_at(point, Instant::now())
    }

    /// Start a gesture at `point`. Returns `false` when nothing was hit and
    /// the event should pass through to the host.
    pub fn press_at(&mut self, point: Point, now: Instant) -> bool {
        if self.gesture.is_some() {
            // A previous gesture never saw its release.
            self.cancel();
        }

        for index in (0..self.polygons.len()).rev() {
            let polygon = &self.polygons[index];

            if self.config.vertex_editing {
                if let Some(vertex) = polygon.hit_vertex(point, self.config.vertex_tolerance) {
                    log::debug!("press on vertex {vertex} of polygon {index}");
                    self.begin_gesture(index, DragTarget::Vertex(vertex), point, None);
                    return true;
                }
            }

            if self.config.shape_dragging && polygon.contains(point) {
                let long_press = self
                    .callbacks
                    .has_long_click()
                    .then(|| now + self.config.long_press_timeout());
                log::debug!("press inside polygon {index}");
                self.begin_gesture(index, DragTarget::Shape, point, long_press);
                return true;
            }
        }

        false
    }

    fn begin_gesture(
        &mut self,
        polygon: usize,
        target: DragTarget,
        point: Point,
        long_press: Option<Instant>,
    ) {
        self.next_token = self.next_token.wrapping_add(1);
        self.gesture = Some(Gesture {
            token: self.next_token,
            polygon,
            target,
            press: point,
            last: point,
            anchor: point,
            click_pending: matches!(target, DragTarget::Shape),
            long_press,
        });
        self.callbacks.track_start(polygon);
        self.request_redraw();
    }

    /// Feed a move sample. Returns whether a polygon changed.
    pub fn move_to(&mut self, point: Point) -> bool {
        let slop = self.config.touch_slop;
        let jump_threshold = self.config.jump_threshold;

        let Some(gesture) = self.gesture.as_mut() else {
            return false;
        };

        if (gesture.click_pending || gesture.long_press.is_some())
            && point.distance(gesture.press) > slop
        {
            gesture.click_pending = false;
            gesture.long_press = None;
        }

        let jump = point.distance(gesture.last);
        gesture.last = point;
        if jump > jump_threshold {
            log::debug!("discarding move sample, jumped {jump:.1}px");
            gesture.anchor = point;
            return false;
        }

        let index = gesture.polygon;
        let target = gesture.target;
        let delta = point - gesture.anchor;
        let step = matches!(target, DragTarget::Shape)
            && (delta.x.abs() > SHAPE_DRAG_MIN_STEP || delta.y.abs() > SHAPE_DRAG_MIN_STEP);
        if step {
            gesture.anchor = point;
        }

        if index >= self.polygons.len() || !self.drag_allowed(index) {
            return false;
        }

        match target {
            DragTarget::Vertex(vertex) => {
                let target_point = if self.config.allow_drag_out_of_bounds {
                    point
                } else {
                    self.clamp_to_surface(point)
                };
                log::trace!("vertex {vertex} of polygon {index} -> {target_point:?}");
                self.polygons[index].set_vertex(vertex, target_point);
            }
            DragTarget::Shape => {
                if !step {
                    return false;
                }
                let (move_x, move_y) = self.free_axes(&self.polygons[index], delta);
                if !move_x && !move_y {
                    return false;
                }
                log::trace!("polygon {index} moved by {delta:?}");
                self.polygons[index].translate(delta, move_x, move_y);
            }
        }

        self.request_redraw();
        self.callbacks.changed(index, true);
        true
    }

    /// End the gesture at `point`, resolving a tap if one is still pending.
    /// Returns whether a gesture was active.
    pub fn release(&mut self, point: Point) -> bool {
        let Some(gesture) = self.gesture.take() else {
            return false;
        };
        let index = gesture.polygon;
        if index >= self.polygons.len() {
            return true;
        }

        if gesture.click_pending && point.distance(gesture.press) <= self.config.touch_slop {
            if self.config.click_toggles_selection {
                self.toggle_by_click(index);
            }
            log::debug!("click on polygon {index}");
            self.callbacks.click(index);
        }

        self.callbacks.track_stop(index);
        self.request_redraw();
        true
    }

    /// Abort the gesture without resolving a tap.
    pub fn cancel(&mut self) -> bool {
        let Some(gesture) = self.gesture.take() else {
            return false;
        };
        if gesture.polygon < self.polygons.len() {
            self.callbacks.track_stop(gesture.polygon);
        }
        self.request_redraw();
        true
    }

    /// The long press the host should schedule, if any.
    pub fn pending_long_press(&self) -> Option<LongPressTicket> {
        let gesture = self.gesture.as_ref()?;
        gesture.long_press.map(|deadline| LongPressTicket {
            token: gesture.token,
            deadline,
        })
    }

    /// Fire the long press once its deadline has passed.
    pub fn poll_long_press(&mut self, now: Instant) -> bool {
        match self.pending_long_press() {
            Some(ticket) if now >= ticket.deadline => self.fire_long_press(ticket.token),
            _ => false,
        }
    }

    /// Fire the long press for the gesture identified by `token`.
    ///
    /// Tickets from ended or cancelled gestures are ignored, so a host timer
    /// that fires late is harmless.
    pub fn fire_long_press(&mut self, token: u64) -> bool {
        let Some(gesture) = self.gesture.as_mut() else {
            return false;
        };
        if gesture.token != token || gesture.long_press.is_none() {
            return false;
        }
        gesture.long_press = None;
        gesture.click_pending = false;

        let index = gesture.polygon;
        if index >= self.polygons.len() {
            return false;
        }
        log::debug!("long click on polygon {index}");
        self.callbacks.long_click(index);
        true
    }

    fn drag_allowed(&self, index: usize) -> bool {
        !self.config.drag_requires_selection || self.is_selected(index)
    }

    fn clamp_to_surface(&self, point: Point) -> Point {
        Point::new(
            point.x.max(0.0).min(self.surface.width),
            point.y.max(0.0).min(self.surface.height),
        )
    }

    /// Which axes a shape may move along without its bounds crossing a
    /// surface edge.
    fn free_axes(&self, polygon: &Polygon, delta: Vec2) -> (bool, bool) {
        if self.config.allow_drag_out_of_bounds {
            return (true, true);
        }
        let Some(bounds) = polygon.bounds() else {
            return (false, false);
        };

        let move_x = !((delta.x > 0.0 && bounds.x1 + delta.x > self.surface.width)
            || (delta.x < 0.0 && bounds.x0 + delta.x < 0.0));
        let move_y = !((delta.y > 0.0 && bounds.y1 + delta.y > self.surface.height)
            || (delta.y < 0.0 && bounds.y0 + delta.y < 0.0));
        (move_x, move_y)
    }

    fn toggle_by_click(&mut self, index: usize) {
        if self.config.multiple_selection {
            let polygon = &mut self.polygons[index];
            polygon.selected = !polygon.selected;
        } else {
            self.selected_index = Some(index);
        }
    }

    // --- Selection ---

    /// Whether polygon `index` is selected in the current mode.
    pub fn is_selected(&self, index: usize) -> bool {
        if index >= self.polygons.len() {
            return false;
        }
        if self.config.multiple_selection {
            self.polygons[index].selected
        } else {
            self.selected_index == Some(index)
        }
    }

    /// Single selection, or the lowest selected index in multi-select mode.
    pub fn selected_index(&self) -> Option<usize> {
        if self.config.multiple_selection {
            self.polygons.iter().position(|p| p.selected)
        } else {
            self.selected_index
        }
    }

    /// All selected indices in ascending order.
    pub fn selected_indices(&self) -> Vec<usize> {
        if self.config.multiple_selection {
            self.polygons
                .iter()
                .enumerate()
                .filter(|(_, p)| p.selected)
                .map(|(i, _)| i)
                .collect()
        } else {
            self.selected_index.into_iter().collect()
        }
    }

    /// Select polygon `index`. In multi-select mode this adds to the selection.
    pub fn select(&mut self, index: usize) {
        if index >= self.polygons.len() {
            return;
        }
        if self.config.multiple_selection {
            self.polygons[index].selected = true;
        } else {
            self.selected_index = Some(index);
        }
        self.request_redraw();
    }

    /// Set the selection state of several polygons.
    ///
    /// In single-select mode only the first index is considered: it becomes
    /// the selection, or clears it when `selected` is false.
    pub fn set_selected(&mut self, indices: &[usize], selected: bool) {
        let Some(&first) = indices.first() else {
            return;
        };
        if self.config.multiple_selection {
            for &index in indices {
                if let Some(polygon) = self.polygons.get_mut(index) {
                    polygon.selected = selected;
                }
            }
        } else if first < self.polygons.len() {
            self.selected_index = selected.then_some(first);
        }
        self.request_redraw();
    }

    /// Select or deselect everything. Single-select mode can only select the
    /// first polygon.
    pub fn select_all(&mut self, selected: bool) {
        if self.polygons.is_empty() {
            return;
        }
        if self.config.multiple_selection {
            for polygon in &mut self.polygons {
                polygon.selected = selected;
            }
        } else {
            self.selected_index = selected.then_some(0);
        }
        self.request_redraw();
    }

    pub fn set_multiple_selection(&mut self, multiple: bool) {
        if self.config.multiple_selection != multiple {
            self.config.multiple_selection = multiple;
            self.request_redraw();
        }
    }

    // --- Collection ---

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn get(&self, index: usize) -> Option<&Polygon> {
        self.polygons.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Polygon> {
        self.polygons.get_mut(index)
    }

    pub fn position(&self, id: PolygonId) -> Option<usize> {
        self.polygons.iter().position(|p| p.id() == id)
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Append a polygon on top of the stack. Returns its index.
    pub fn add(&mut self, polygon: Polygon) -> usize {
        self.polygons.push(polygon);
        self.request_redraw();
        self.polygons.len() - 1
    }

    pub fn add_all(&mut self, polygons: impl IntoIterator<Item = Polygon>) {
        self.polygons.extend(polygons);
        self.request_redraw();
    }

    /// Remove the polygon at `index`, keeping the selection and any active
    /// gesture pointing at the same polygons.
    pub fn remove_at(&mut self, index: usize) -> Option<Polygon> {
        if index >= self.polygons.len() {
            return None;
        }
        let removed = self.polygons.remove(index);

        self.selected_index = match self.selected_index {
            Some(s) if s == index => None,
            Some(s) if s > index => Some(s - 1),
            other => other,
        };

        match self.gesture.as_ref().map(|g| g.polygon) {
            Some(active) if active == index => self.gesture = None,
            Some(active) if active > index => {
                if let Some(gesture) = self.gesture.as_mut() {
                    gesture.polygon -= 1;
                }
            }
            _ => {}
        }

        self.request_redraw();
        Some(removed)
    }

    pub fn remove(&mut self, id: PolygonId) -> Option<Polygon> {
        let index = self.position(id)?;
        self.remove_at(index)
    }

    pub fn remove_many(&mut self, ids: &[PolygonId]) -> Vec<Polygon> {
        ids.iter().filter_map(|&id| self.remove(id)).collect()
    }

    /// Replace the polygon at `index`. The new polygon inherits the old one's
    /// multi-select flag.
    pub fn replace(&mut self, index: usize, mut polygon: Polygon) -> Option<Polygon> {
        let slot = self.polygons.get_mut(index)?;
        polygon.selected = slot.selected;
        let old = std::mem::replace(slot, polygon);
        self.request_redraw();
        self.callbacks.changed(index, false);
        Some(old)
    }

    pub fn clear(&mut self) {
        self.polygons.clear();
        self.selected_index = None;
        self.gesture = None;
        self.request_redraw();
    }
}
