// SPDX-License-Identifier: MIT

//! The [`Worker`]: one OS thread running the event loop against its own
//! [`FactoryRegistry`] and [`Event`] (spec §3 "Worker state", §4.6, §5).

use crate::control::WorkerControl;
use crate::coordinator::ProcessorCoordinator;
use nucleus_core::{
    CallStack, Clock, DefaultTags, Event, FactoryRegistry, Frame, Heartbeat, NextEventError,
    ObjectId, ObjectIdGen, ProcessorId, ResolverHost, Supervisor, Tag, WorkerId, WorkerLoopError,
};
use std::sync::Arc;
use std::time::Duration;

const PAUSE_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// A Worker exclusively owns its [`Event`], [`FactoryRegistry`], and call
/// stack; everything else is a shared, read-mostly reference (spec §3
/// "Ownership summary").
pub struct Worker<C: Clock> {
    id: WorkerId,
    registry: FactoryRegistry<Self>,
    event: Event,
    idgen: ObjectIdGen,
    default_tags: DefaultTags,
    call_stack: CallStack,
    supervisor: Arc<dyn Supervisor>,
    coordinator: Arc<ProcessorCoordinator<Worker<C>>>,
    control: WorkerControl,
    heartbeat: Arc<Heartbeat>,
    clock: C,
    auto_free: bool,
}

impl<C: Clock> Worker<C> {
    pub fn new(
        id: WorkerId,
        supervisor: Arc<dyn Supervisor>,
        coordinator: Arc<ProcessorCoordinator<Worker<C>>>,
        control: WorkerControl,
        heartbeat: Arc<Heartbeat>,
        clock: C,
        default_tags: DefaultTags,
    ) -> Self {
        Self {
            id,
            registry: FactoryRegistry::new(),
            event: Event::new(nucleus_core::RunNumber(0), nucleus_core::EventNumber(0)),
            idgen: ObjectIdGen::default(),
            default_tags,
            call_stack: CallStack::new(),
            supervisor,
            coordinator,
            control,
            heartbeat,
            clock,
            auto_free: true,
        }
    }

    pub fn id(&self) -> &WorkerId {
        &self.id
    }

    pub fn registry(&self) -> &FactoryRegistry<Self> {
        &self.registry
    }

    pub fn add_factory(&mut self, factory: Box<dyn nucleus_core::FactoryBase<Self>>) -> usize {
        self.registry.add(factory)
    }

    pub fn control(&self) -> &WorkerControl {
        &self.control
    }

    /// Whether `OneEvent` frees the source payload after every event
    /// (spec §3 Worker state `auto_free`, original `SetAutoFree`,
    /// `JEventLoop.h:61`). Defaults to `true`.
    pub fn set_auto_free(&mut self, value: bool) {
        self.auto_free = value;
    }

    pub fn call_stack(&self) -> &CallStack {
        &self.call_stack
    }

    /// Drives the event loop until cooperative quit is observed or the
    /// source is exhausted (spec §4.6 `Loop`).
    pub fn run(&mut self) {
        loop {
            if self.control.is_quitting() || self.supervisor.is_quitting() {
                break;
            }
            self.heartbeat.ping(&self.clock);

            while self.control.is_paused() {
                self.heartbeat.ping(&self.clock);
                std::thread::sleep(PAUSE_POLL_INTERVAL);
                if self.control.is_quitting() {
                    break;
                }
            }
            if self.control.is_quitting() || self.supervisor.is_quitting() {
                break;
            }

            match self.one_event() {
                Ok(()) => {}
                Err(WorkerLoopError::NextEvent(NextEventError::NoMoreSources)) => {
                    tracing::info!(worker = %self.id, "no more event sources; worker stopping");
                    self.control.quit();
                }
                Err(err) => {
                    tracing::error!(worker = %self.id, error = %err, "event processing failed");
                }
            }
        }

        for slot in 0..self.registry.len() {
            if let Some(mut factory) = self.registry.remove(slot) {
                if let Err(err) = factory.fini() {
                    tracing::warn!(worker = %self.id, error = %err, "factory fini failed");
                }
            }
        }
    }

    /// One iteration of the event pump (spec §4.6 `OneEvent`). Only
    /// *no-more-sources* and other unrecoverable codes short-circuit here;
    /// *ok* and *event-not-in-memory* both fall through to the processor
    /// loop below (spec §4.6 step 2, §7: "logged at `OneEvent` and not
    /// raised further").
    fn one_event(&mut self) -> Result<(), WorkerLoopError> {
        self.registry.reset();
        self.control.clear_event_cancellation();

        match self.supervisor.next_event() {
            Ok(event) => self.event = event,
            Err(NextEventError::EventNotInMemory(event)) => {
                tracing::warn!(worker = %self.id, "event not in memory, processing anyway");
                self.event = event;
            }
            Err(other) => return Err(other.into()),
        }

        self.idgen.reset();

        let run_number = self.event.run_number();
        let event_number = self.event.event_number();

        let coordinator = self.coordinator.clone();
        for (idx, processor) in coordinator.processors().iter().enumerate() {
            if self.control.is_event_cancelled() || self.control.is_quitting() {
                return Err(NextEventError::NoMoreSources.into());
            }

            coordinator.ensure_run_transition(ProcessorId(idx), run_number, self)?;
            self.call_stack.clear();

            if let Err(err) = processor.evnt(event_number, self) {
                self.call_stack.push(Frame {
                    class_name: "OneEvent",
                    tag: Tag::empty(),
                    file: file!(),
                    line: line!(),
                });
                tracing::error!(
                    worker = %self.id,
                    run = %run_number,
                    event = %event_number,
                    "{}",
                    self.call_stack.render()
                );
                return Err(err.into());
            }
        }

        if self.auto_free {
            self.event.free_event();
        }
        Ok(())
    }
}

impl<C: Clock + 'static> ResolverHost for Worker<C> {
    fn registry(&self) -> &FactoryRegistry<Self> {
        &self.registry
    }

    fn registry_mut(&mut self) -> &mut FactoryRegistry<Self> {
        &mut self.registry
    }

    fn event(&self) -> &Event {
        &self.event
    }

    fn default_tags(&self) -> &DefaultTags {
        &self.default_tags
    }

    fn call_stack_mut(&mut self) -> &mut CallStack {
        &mut self.call_stack
    }

    fn supervisor(&self) -> &dyn Supervisor {
        self.supervisor.as_ref()
    }

    fn next_object_id(&mut self) -> ObjectId {
        self.idgen.next()
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
