//! The render lifecycle.
//!
//! [`Renderer`] is the only writer to the [`SceneEngine`]. It walks the
//! shape tree to mount new shapes and unmount removed ones, batches every
//! resulting attribute write into the [`UpdateQueues`], and flushes them:
//! immediate writes synchronously, animated writes as a deferred pass that
//! starts on the next [`Renderer::tick`] and completes when the engine has
//! reported every transition ticket.
//!
//! A render pass therefore always reads *mount, hide (immediate), show
//! (animated)* for new shapes and *hide (animated), detach (on completion)*
//! for removed ones.

pub mod build;
pub mod flush;
pub mod global;
pub mod queue;

use std::{collections::VecDeque, time::Duration};

use indexmap::IndexMap;
use log::{debug, info, trace};

use easel_core::{
    attr::{AttrName, Attributes},
    geometry::{Bounds, Point, Size},
    shape::{MountState, NodeId, Shape},
    tree::ShapeTree,
};

use crate::{
    animation::{AnimationName, animation_props},
    config::{Adjust, AnimationConfig},
    engine::{AnimationTicket, Easing, SceneEngine},
    error::EaselError,
};

use flush::{FlushCycle, FlushState, UpdateCallback};
use global::GlobalShape;
use queue::{Completion, UpdateQueues};

/// Share of the container an oversized view is scaled down to.
const AUTO_SIZE_COEFFICIENT: f32 = 0.75;

/// Work postponed until the host advances the renderer.
enum DeferredTask {
    AnimatePass { callback: Option<UpdateCallback> },
}

/// Keeps the shape tree and the scene-graph engine in sync.
pub struct Renderer<E: SceneEngine> {
    engine: E,
    queues: UpdateQueues,
    global: GlobalShape,
    flush: FlushState,
    deferred: VecDeque<DeferredTask>,
    next_cycle: u64,
    duration: Duration,
    easing: Easing,
    container: Size,
    view_center: Option<Point>,
    first_render: bool,
}

impl<E: SceneEngine> Renderer<E> {
    /// Creates a renderer drawing through `engine`.
    ///
    /// The global group is created right away, attached to the engine root
    /// with its origin at the container centre.
    ///
    /// # Errors
    ///
    /// Returns [`EaselError::Engine`] if the global group cannot be created.
    pub fn new(mut engine: E, config: &AnimationConfig) -> Result<Self, EaselError> {
        let container = engine.container_size();
        let origin = Point::new(container.width() / 2.0, container.height() / 2.0);
        let global = GlobalShape::new(&mut engine, origin)?;
        info!(
            width = container.width(),
            height = container.height(),
            animations = config.enable_animation();
            "Renderer created"
        );

        Ok(Self {
            engine,
            queues: UpdateQueues::new(config.enable_animation()),
            global,
            flush: FlushState::Idle,
            deferred: VecDeque::new(),
            next_cycle: 0,
            duration: config.duration(),
            easing: config.easing(),
            container,
            view_center: None,
            first_render: true,
        })
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn global(&self) -> &GlobalShape {
        &self.global
    }

    pub fn queues(&self) -> &UpdateQueues {
        &self.queues
    }

    pub fn flush_state(&self) -> &FlushState {
        &self.flush
    }

    /// Container size as of the last resize.
    pub fn container_size(&self) -> Size {
        self.container
    }

    /// True until the first flush.
    pub fn is_first_render(&self) -> bool {
        self.first_render
    }

    /// True if animated work is queued, deferred or in flight.
    pub fn has_pending_animations(&self) -> bool {
        !self.queues.animated().is_empty() || !self.deferred.is_empty() || self.flush.is_flushing()
    }

    /// Queues attribute writes for a node.
    ///
    /// See [`UpdateQueues::set_attribute`].
    pub fn set_attribute(
        &mut self,
        node: NodeId,
        props: Attributes,
        animate: bool,
        completion: Option<Completion>,
    ) {
        self.queues.set_attribute(node, props, animate, completion);
    }

    /// Mounts new shapes, refreshes dirty ones and unmounts removed ones.
    ///
    /// Nothing reaches the engine's attributes until the next
    /// [`update_shapes`](Self::update_shapes), apart from node creation,
    /// attachment and z-order.
    ///
    /// # Errors
    ///
    /// Returns an error if a backing node cannot be created.
    pub fn render_shapes(&mut self, tree: &mut ShapeTree) -> Result<(), EaselError> {
        let mut mounted = 0;
        let mut refreshed = 0;
        for shape in tree.shapes_mut() {
            match shape.mount_state() {
                MountState::NeedMount => {
                    self.mount(shape)?;
                    mounted += 1;
                }
                MountState::Mounted if shape.is_dirty() => {
                    self.refresh(shape);
                    refreshed += 1;
                }
                _ => {}
            }
        }

        let mut unmounted = 0;
        for shape in tree.removed_mut() {
            if shape.mount_state() == MountState::NeedUnmount {
                self.unmount(shape)?;
                unmounted += 1;
            }
        }

        info!(mounted = mounted, refreshed = refreshed, unmounted = unmounted; "Render pass queued");
        Ok(())
    }

    fn mount(&mut self, shape: &mut Shape) -> Result<(), EaselError> {
        let node = match shape.node() {
            None => {
                let node = build::create_node(&mut self.engine, shape)?;
                shape.set_node(Some(node));
                node
            }
            Some(node) => {
                if shape.is_text() {
                    let content = shape.option().content().unwrap_or_default().to_string();
                    self.engine.attr(node, AttrName::Text, content.into());
                }
                node
            }
        };

        self.global.add(&mut self.engine, shape);
        self.engine.attr(
            node,
            AttrName::ZIndex,
            (shape.option().z_index() as f32).into(),
        );
        self.apply_animation(shape, AnimationName::Hide, false, None);
        shape.transition(MountState::Mounted)?;
        shape.set_visible(true);
        self.apply_animation(shape, AnimationName::Show, true, None);

        trace!(shape_id = shape.id().to_string(), node:% = node; "Shape mounted");
        Ok(())
    }

    fn refresh(&mut self, shape: &mut Shape) {
        self.apply_animation(shape, AnimationName::Update, true, None);
        self.global.update(shape);
        shape.set_dirty(false);
        if let Some(composite) = shape.composite_mut() {
            for sub_shape in composite.sub_shapes_mut() {
                sub_shape.set_dirty(false);
            }
        }
    }

    fn unmount(&mut self, shape: &mut Shape) -> Result<(), EaselError> {
        shape.transition(MountState::Unmounted)?;
        shape.set_visible(false);
        self.apply_animation(
            shape,
            AnimationName::Hide,
            true,
            Some(Completion::Detach { shape: shape.id() }),
        );
        trace!(shape_id = shape.id().to_string(); "Shape unmounting");
        Ok(())
    }

    /// Queues the targets of `name` for every node of `shape`. The
    /// completion, if any, rides on the shape's own node.
    fn apply_animation(
        &mut self,
        shape: &Shape,
        name: AnimationName,
        animate: bool,
        completion: Option<Completion>,
    ) {
        let mut completion = completion;
        for (node, props) in animation_props(shape, name) {
            self.queues
                .set_attribute(node, props, animate, completion.take());
        }
    }

    /// Flushes both queues.
    ///
    /// Immediate writes are applied now, followed by their completion
    /// actions. The animated queue is handed to a deferred pass that the
    /// next [`tick`](Self::tick) starts; `callback` fires once every
    /// transition of that pass completed. With animations disabled the
    /// callback fires right after the immediate writes.
    pub fn update_shapes(&mut self, tree: &mut ShapeTree, callback: Option<UpdateCallback>) {
        let mut callback = callback;
        let immediate = self.queues.take_immediate();
        if !immediate.is_empty() {
            debug!(entries = immediate.len(); "Applying immediate queue");
            for (node, entry) in immediate {
                let (props, completion) = entry.into_parts();
                for (name, value) in props {
                    self.engine.attr(node, name, value);
                }
                if let Some(completion) = completion {
                    self.run_completion(tree, completion);
                }
            }
        }

        if !self.queues.animations_enabled() {
            if let Some(callback) = callback.take() {
                callback();
            }
        }

        self.deferred.push_back(DeferredTask::AnimatePass { callback });
        self.first_render = false;
    }

    /// Force-finishes pending animated work.
    ///
    /// In-flight transitions are stopped at their final values, queued
    /// entries that never started are written directly, and every entry's
    /// completion action runs. `callback` then fires once in place of the
    /// interrupted passes' own callbacks; without one, each interrupted
    /// pass fires its own. Does nothing when no animated work is pending.
    pub fn skip_update_shapes(&mut self, tree: &mut ShapeTree, callback: Option<UpdateCallback>) {
        let queued = self.queues.take_animated();
        let in_flight = match std::mem::take(&mut self.flush) {
            FlushState::Flushing(cycles) => cycles,
            _ => IndexMap::new(),
        };
        if in_flight.is_empty() && queued.is_empty() {
            return;
        }
        info!(
            cycles = in_flight.len(),
            in_flight = in_flight.values().map(FlushCycle::total).sum::<usize>(),
            queued = queued.len();
            "Skipping animated pass"
        );

        self.flush = FlushState::Interrupted;
        let mut interrupted = Vec::new();
        for cycle in in_flight.into_values() {
            interrupted.extend(self.interrupt(tree, cycle));
        }
        for (node, entry) in queued {
            let (props, completion) = entry.into_parts();
            for (name, value) in props {
                self.engine.attr(node, name, value);
            }
            if let Some(completion) = completion {
                self.run_completion(tree, completion);
            }
        }
        for task in self.deferred.drain(..) {
            match task {
                DeferredTask::AnimatePass { callback } => interrupted.extend(callback),
            }
        }
        self.flush = FlushState::Idle;

        match callback {
            Some(callback) => callback(),
            None => interrupted.into_iter().for_each(|callback| callback()),
        }
    }

    /// Stops a running cycle and runs the completion actions of its
    /// unfinished entries. Returns the cycle's own callback.
    fn interrupt(&mut self, tree: &mut ShapeTree, cycle: FlushCycle) -> Option<UpdateCallback> {
        debug!(cycle = cycle.cycle(), completed = cycle.completed(); "Interrupting animated pass");
        let (pending, callback) = cycle.into_pending();
        for (node, completion) in pending {
            self.engine.stop_animation(node, true);
            if let Some(completion) = completion {
                self.run_completion(tree, completion);
            }
        }
        callback
    }

    /// Advances the renderer.
    ///
    /// Finished transitions reported by the engine are accounted for first,
    /// then deferred animated passes are started.
    pub fn tick(&mut self, tree: &mut ShapeTree) {
        for ticket in self.engine.drain_completed() {
            self.complete_transition(tree, ticket);
        }

        while let Some(task) = self.deferred.pop_front() {
            match task {
                DeferredTask::AnimatePass { callback } => self.start_animated_pass(callback),
            }
        }
    }

    fn start_animated_pass(&mut self, callback: Option<UpdateCallback>) {
        let entries = self.queues.take_animated();
        if entries.is_empty() {
            if let Some(callback) = callback {
                callback();
            }
            return;
        }

        self.next_cycle += 1;
        let cycle = self.next_cycle;
        debug!(
            cycle = cycle,
            transitions = entries.len(),
            running = self.flush.running();
            "Starting animated pass"
        );
        for (node, entry) in &entries {
            self.engine.animate_to(
                *node,
                entry.props(),
                self.duration,
                self.easing,
                AnimationTicket::new(cycle, *node),
            );
        }
        let started = FlushCycle::new(cycle, &entries, callback);
        if !self.flush.is_flushing() {
            self.flush = FlushState::Flushing(IndexMap::new());
        }
        if let FlushState::Flushing(cycles) = &mut self.flush {
            cycles.insert(cycle, started);
        }
    }

    fn complete_transition(&mut self, tree: &mut ShapeTree, ticket: AnimationTicket) {
        let FlushState::Flushing(cycles) = &mut self.flush else {
            trace!(cycle = ticket.cycle(); "Ignoring ticket outside a pass");
            return;
        };
        let Some(completion) = cycles
            .get_mut(&ticket.cycle())
            .and_then(|cycle| cycle.complete(ticket))
        else {
            trace!(cycle = ticket.cycle(), node:% = ticket.node(); "Ignoring stale ticket");
            return;
        };
        let done = cycles.get(&ticket.cycle()).is_some_and(FlushCycle::is_done);
        let finished = if done {
            cycles.shift_remove(&ticket.cycle())
        } else {
            None
        };
        if cycles.is_empty() {
            self.flush = FlushState::Idle;
        }

        if let Some(completion) = completion {
            self.run_completion(tree, completion);
        }

        if let Some(mut cycle) = finished {
            debug!(cycle = cycle.cycle(); "Animated pass finished");
            if let Some(callback) = cycle.take_callback() {
                callback();
            }
        }
    }

    fn run_completion(&mut self, tree: &mut ShapeTree, completion: Completion) {
        match completion {
            Completion::Detach { shape } => {
                let Some(shape) = tree.get_mut(shape) else {
                    return;
                };
                self.global.remove(&mut self.engine, shape);
                shape.clear_nodes();
                trace!(shape_id = shape.id().to_string(); "Shape detached");
            }
        }
    }

    /// Translates the view by `(dx, dy)`.
    pub fn translate_view(&mut self, dx: f32, dy: f32, animate: bool) {
        self.global.translate(&mut self.queues, dx, dy, animate);
    }

    /// Sets the view scale factors.
    pub fn scale_view(&mut self, sx: f32, sy: f32, animate: bool) {
        self.global.scale(&mut self.queues, sx, sy, animate);
    }

    /// Bounds of the content: the union of the listed shapes' bounds, or
    /// with `use_shape_bounds == false` the bounds recorded by the global
    /// shape.
    pub fn global_bound(&self, tree: &ShapeTree, use_shape_bounds: bool) -> Bounds {
        if use_shape_bounds {
            Bounds::union(tree.shapes().map(Shape::bounds)).unwrap_or_default()
        } else {
            self.global.bound()
        }
    }

    /// Re-centres the scaling origin on the content and applies the given
    /// translation and scale. Animated unless nothing was flushed yet.
    pub fn adjust_view(
        &mut self,
        tree: &ShapeTree,
        translate: Option<Adjust>,
        scale: Option<Adjust>,
    ) {
        let bound = self.global_bound(tree, true);
        let animate = !self.first_render;
        self.global.set_origin(&mut self.engine, bound.center());

        match translate {
            Some(Adjust::Fixed([dx, dy])) => self.translate_view(dx, dy, animate),
            Some(Adjust::Auto) => self.auto_global_center(bound, animate),
            None => {}
        }
        match scale {
            Some(Adjust::Fixed([sx, sy])) => self.scale_view(sx, sy, animate),
            Some(Adjust::Auto) => self.auto_global_size(bound, animate),
            None => {}
        }
    }

    /// Picks up a new container size.
    ///
    /// The view is shifted by half the size change so the content stays
    /// centred, `scale` is re-applied and the queues are flushed.
    pub fn resize_view(&mut self, tree: &mut ShapeTree, scale: Option<Adjust>) {
        let old = self.container;
        self.engine.resize();
        self.container = self.engine.container_size();
        info!(
            width = self.container.width(),
            height = self.container.height();
            "Container resized"
        );

        let dx = self.container.width() / 2.0 - old.width() / 2.0;
        let dy = self.container.height() / 2.0 - old.height() / 2.0;
        self.adjust_view(tree, Some(Adjust::Fixed([dx, dy])), scale);
        self.update_shapes(tree, None);
    }

    /// Translates the view so `bound` is centred.
    ///
    /// The first call centres the bound in the container. Later calls
    /// translate by the shift of the bound's centre since the previous call.
    pub fn auto_global_center(&mut self, bound: Bounds, animate: bool) {
        let center = bound.center();
        let target = self.view_center.unwrap_or(Point::new(
            self.container.width() / 2.0,
            self.container.height() / 2.0,
        ));
        let delta = target.sub_point(center);
        self.translate_view(delta.x(), delta.y(), animate);
        self.view_center = Some(center);
    }

    /// Scales the view down when `bound` does not fit in the container.
    ///
    /// The axis overflowing most decides the factor, which is applied to
    /// both axes.
    pub fn auto_global_size(&mut self, bound: Bounds, animate: bool) {
        if bound.to_size().fits_within(self.container) {
            return;
        }

        let d_width = bound.width() - self.container.width();
        let d_height = bound.height() - self.container.height();
        let (edge, bound_edge) = if d_width > d_height {
            (self.container.width(), bound.width())
        } else {
            (self.container.height(), bound.height())
        };

        let coefficient = edge / bound_edge * AUTO_SIZE_COEFFICIENT;
        debug!(coefficient = coefficient; "Fitting view to container");
        self.scale_view(coefficient, coefficient, animate);
    }

    /// Drops all pending work and empties the global shape.
    pub fn clear(&mut self) {
        self.queues.clear();
        self.deferred.clear();
        self.flush = FlushState::Idle;
        self.global.clear(&mut self.engine);
    }
}
