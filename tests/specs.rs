// SPDX-License-Identifier: MIT

//! End-to-end scenarios driving the worker loop and resolver together
//! against in-memory fakes, one real OS thread per concurrent worker.

use nucleus_core::{
    Calibration, CalibrationError, DefaultTags, Event, EventNumber, Factory, FactoryError,
    FakeClock, FetchOutcome, Heartbeat, NextEventError, ObjectId, ParameterManager, Processor,
    ProcessorError, Resolve, RunNumber, SourceIoError, Supervisor, Tag, WorkerId,
};
use nucleus_runtime::{spawn_worker, ProcessorCoordinator, Worker, WorkerControl};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

struct Hit {
    channel: u32,
}
nucleus_core::data_type!(Hit, "Hit");

struct Track {
    n_hits: usize,
}
nucleus_core::data_type!(Track, "Track");

struct NoopParameterManager {
    auto_create: bool,
}

impl ParameterManager for NoopParameterManager {
    fn get_parameter(&self, name: &str) -> Option<String> {
        if name == "JANA:AUTOFACTORYCREATE" && self.auto_create {
            Some("1".to_string())
        } else {
            None
        }
    }

    fn get_parameters_with_prefix(&self, _prefix: &str) -> Vec<(String, String)> {
        Vec::new()
    }
}

enum Fetch {
    NotAvailable,
    Hits(Vec<u32>),
}

struct ScriptedSupervisor {
    queue: Mutex<VecDeque<(i64, i64)>>,
    params: NoopParameterManager,
    fetch: Fetch,
    quitting: AtomicBool,
}

impl ScriptedSupervisor {
    fn new(events: Vec<(i64, i64)>, auto_create: bool, fetch: Fetch) -> Arc<Self> {
        Arc::new(Self {
            queue: Mutex::new(events.into_iter().collect()),
            params: NoopParameterManager { auto_create },
            fetch,
            quitting: AtomicBool::new(false),
        })
    }
}

impl Supervisor for ScriptedSupervisor {
    fn next_event(&self) -> Result<Event, NextEventError> {
        match self.queue.lock().pop_front() {
            Some((run, evt)) => Ok(Event::new(RunNumber(run), EventNumber(evt))),
            None => Err(NextEventError::NoMoreSources),
        }
    }

    fn quit(&self) {
        self.quitting.store(true, Ordering::SeqCst);
    }

    fn is_quitting(&self) -> bool {
        self.quitting.load(Ordering::SeqCst)
    }

    fn fetch_objects(
        &self,
        _event: &Event,
        _class_name: &'static str,
        _tag: &Tag,
    ) -> Result<FetchOutcome, SourceIoError> {
        match &self.fetch {
            Fetch::NotAvailable => Ok(FetchOutcome::NotAvailable),
            Fetch::Hits(channels) => Ok(FetchOutcome::Objects(
                channels
                    .iter()
                    .map(|c| Box::new(Hit { channel: *c }) as Box<dyn std::any::Any + Send>)
                    .collect(),
            )),
        }
    }

    fn parameter_manager(&self) -> &dyn ParameterManager {
        &self.params
    }

    fn calibration(&self, _run_number: RunNumber) -> Result<Box<dyn Calibration>, CalibrationError> {
        Err(CalibrationError::Unavailable(0))
    }
}

struct RecordingProcessor {
    log: Mutex<Vec<String>>,
}

impl RecordingProcessor {
    fn new() -> Arc<Self> {
        Arc::new(Self { log: Mutex::new(Vec::new()) })
    }
}

impl<R> Processor<R> for RecordingProcessor {
    fn name(&self) -> &str {
        "RecordingProcessor"
    }

    fn brun(&self, run_number: RunNumber, _resolver: &mut R) -> Result<(), ProcessorError> {
        self.log.lock().push(format!("brun({})", run_number.0));
        Ok(())
    }

    fn evnt(&self, event_number: EventNumber, _resolver: &mut R) -> Result<(), ProcessorError> {
        self.log.lock().push(format!("evnt({})", event_number.0));
        Ok(())
    }

    fn erun(&self) -> Result<(), ProcessorError> {
        self.log.lock().push("erun".to_string());
        Ok(())
    }
}

fn make_worker(
    supervisor: Arc<dyn Supervisor>,
    coordinator: Arc<ProcessorCoordinator<Worker<FakeClock>>>,
) -> Worker<FakeClock> {
    Worker::new(
        WorkerId::generate(),
        supervisor,
        coordinator,
        WorkerControl::new(),
        Arc::new(Heartbeat::new()),
        FakeClock::new(),
        DefaultTags::new(),
    )
}

#[test]
fn empty_source_exits_cleanly_with_no_processor_hooks() {
    let recorder = RecordingProcessor::new();
    let coordinator = Arc::new(ProcessorCoordinator::new(vec![recorder.clone()]));
    let supervisor = ScriptedSupervisor::new(vec![], false, Fetch::NotAvailable);
    let mut worker = make_worker(supervisor, coordinator);

    worker.run();

    assert!(worker.control().is_quitting());
    assert!(recorder.log.lock().is_empty());
}

#[test]
fn single_event_single_processor_sees_brun_then_evnt() {
    let recorder = RecordingProcessor::new();
    let coordinator = Arc::new(ProcessorCoordinator::new(vec![recorder.clone()]));
    let supervisor = ScriptedSupervisor::new(vec![(5, 1)], false, Fetch::NotAvailable);
    let mut worker = make_worker(supervisor, coordinator);

    worker.run();

    assert_eq!(recorder.log.lock().as_slice(), ["brun(5)".to_string(), "evnt(1)".to_string()]);
}

#[test]
fn run_transition_emits_erun_before_next_brun() {
    let recorder = RecordingProcessor::new();
    let coordinator = Arc::new(ProcessorCoordinator::new(vec![recorder.clone()]));
    let supervisor = ScriptedSupervisor::new(vec![(5, 1), (5, 2), (7, 3)], false, Fetch::NotAvailable);
    let mut worker = make_worker(supervisor, coordinator);

    worker.run();

    assert_eq!(
        recorder.log.lock().as_slice(),
        [
            "brun(5)".to_string(),
            "evnt(1)".to_string(),
            "evnt(2)".to_string(),
            "erun".to_string(),
            "brun(7)".to_string(),
            "evnt(3)".to_string(),
        ]
    );
}

struct FetchRecord {
    first_len: usize,
    second_len: usize,
    same_ids: bool,
}

struct FetchingProcessor {
    record: Mutex<Option<FetchRecord>>,
}

impl FetchingProcessor {
    fn new() -> Arc<Self> {
        Arc::new(Self { record: Mutex::new(None) })
    }
}

impl<R: Resolve> Processor<R> for FetchingProcessor {
    fn name(&self) -> &str {
        "FetchingProcessor"
    }

    fn evnt(&self, _event_number: EventNumber, resolver: &mut R) -> Result<(), ProcessorError> {
        let first = resolver.get::<Hit>("").map_err(|e| ProcessorError::msg(e.to_string()))?;
        let second = resolver.get::<Hit>("").map_err(|e| ProcessorError::msg(e.to_string()))?;
        let same_ids = first.len() == second.len()
            && first.iter().zip(second.iter()).all(|(a, b)| a.id() == b.id());
        *self.record.lock() =
            Some(FetchRecord { first_len: first.len(), second_len: second.len(), same_ids });
        Ok(())
    }
}

#[test]
fn source_provides_factory_is_lazy_and_memoized() {
    let compute_calls = Arc::new(AtomicUsize::new(0));
    let compute_calls_in_closure = compute_calls.clone();

    let processor = FetchingProcessor::new();
    let coordinator = Arc::new(ProcessorCoordinator::new(vec![processor.clone()]));
    let supervisor = ScriptedSupervisor::new(vec![(5, 1)], false, Fetch::Hits(vec![10, 20, 30]));
    let mut worker = make_worker(supervisor, coordinator);

    worker.add_factory(Box::new(Factory::<Hit, Worker<FakeClock>>::with_compute(
        Tag::empty(),
        true,
        false,
        move |_ctx| -> Result<Vec<Hit>, FactoryError> {
            compute_calls_in_closure.fetch_add(1, Ordering::SeqCst);
            Err(FactoryError::msg("compute must never run when the source already answered"))
        },
    )));

    worker.run();

    let record = processor.record.lock().take().expect("evnt ran and recorded a fetch");
    assert_eq!(record.first_len, 3);
    assert_eq!(record.second_len, 3);
    assert!(record.same_ids, "repeated Get within one event must return the same objects");
    assert_eq!(compute_calls.load(Ordering::SeqCst), 0, "source-first policy must skip compute entirely");
}

struct DependencyProcessor {
    direct_hit_ids: Mutex<Vec<ObjectId>>,
}

impl DependencyProcessor {
    fn new() -> Arc<Self> {
        Arc::new(Self { direct_hit_ids: Mutex::new(Vec::new()) })
    }
}

impl<R: Resolve> Processor<R> for DependencyProcessor {
    fn name(&self) -> &str {
        "DependencyProcessor"
    }

    fn evnt(&self, _event_number: EventNumber, resolver: &mut R) -> Result<(), ProcessorError> {
        let _tracks = resolver.get::<Track>("").map_err(|e| ProcessorError::msg(e.to_string()))?;
        let hits = resolver.get::<Hit>("").map_err(|e| ProcessorError::msg(e.to_string()))?;
        *self.direct_hit_ids.lock() = hits.iter().map(|h| h.id()).collect();
        Ok(())
    }
}

#[test]
fn factory_computes_from_dependency_and_preserves_upstream_identity() {
    let hit_ids_seen_by_track = Arc::new(Mutex::new(Vec::new()));
    let hit_ids_seen_by_track_in_closure = hit_ids_seen_by_track.clone();

    let processor = DependencyProcessor::new();
    let coordinator = Arc::new(ProcessorCoordinator::new(vec![processor.clone()]));
    let supervisor = ScriptedSupervisor::new(vec![(5, 1)], false, Fetch::NotAvailable);
    let mut worker = make_worker(supervisor, coordinator);

    worker.add_factory(Box::new(Factory::<Hit, Worker<FakeClock>>::with_compute(
        Tag::empty(),
        false,
        false,
        |_ctx| Ok(vec![Hit { channel: 1 }, Hit { channel: 2 }]),
    )));
    worker.add_factory(Box::new(Factory::<Track, Worker<FakeClock>>::with_compute(
        Tag::empty(),
        false,
        false,
        move |ctx: &mut Worker<FakeClock>| {
            let hits = ctx.get::<Hit>("")?;
            hit_ids_seen_by_track_in_closure.lock().extend(hits.iter().map(|h| h.id()));
            Ok(vec![Track { n_hits: hits.len() }])
        },
    )));

    worker.run();

    let direct_ids = processor.direct_hit_ids.lock().clone();
    let track_ids = hit_ids_seen_by_track.lock().clone();
    assert_eq!(direct_ids.len(), 2);
    assert_eq!(direct_ids, track_ids, "the Track factory's dependency Get and the processor's direct Get must see identical objects");
}

struct MissingFactoryProcessor {
    saw_error: Mutex<Option<bool>>,
}

impl MissingFactoryProcessor {
    fn new() -> Arc<Self> {
        Arc::new(Self { saw_error: Mutex::new(None) })
    }
}

impl<R: Resolve> Processor<R> for MissingFactoryProcessor {
    fn name(&self) -> &str {
        "MissingFactoryProcessor"
    }

    fn evnt(&self, _event_number: EventNumber, resolver: &mut R) -> Result<(), ProcessorError> {
        let result = resolver.get::<Hit>("");
        *self.saw_error.lock() = Some(result.is_err());
        Ok(())
    }
}

#[test]
fn missing_factory_with_auto_create_off_requests_quit() {
    let processor = MissingFactoryProcessor::new();
    let coordinator = Arc::new(ProcessorCoordinator::new(vec![processor.clone()]));
    let supervisor = ScriptedSupervisor::new(vec![(5, 1)], false, Fetch::NotAvailable);
    let mut worker = make_worker(supervisor.clone(), coordinator);

    worker.run();

    assert_eq!(*processor.saw_error.lock(), Some(true));
    assert!(supervisor.is_quitting(), "a missing factory without auto-create must request program quit");
}

#[test]
fn concurrent_workers_on_the_same_processor_observe_one_brun_per_transition() {
    let recorder = RecordingProcessor::new();
    let coordinator = Arc::new(ProcessorCoordinator::new(vec![recorder.clone()]));

    let supervisor_a = ScriptedSupervisor::new(vec![(5, 1), (5, 2)], false, Fetch::NotAvailable);
    let supervisor_b = ScriptedSupervisor::new(vec![(5, 3), (7, 4)], false, Fetch::NotAvailable);

    let worker_a = make_worker(supervisor_a, coordinator.clone());
    let worker_b = make_worker(supervisor_b, coordinator);

    let handle_a = spawn_worker(worker_a).expect("spawn a");
    let handle_b = spawn_worker(worker_b).expect("spawn b");
    handle_a.join();
    handle_b.join();

    let log = recorder.log.lock();
    let brun5_count = log.iter().filter(|e| e.as_str() == "brun(5)").count();
    let evnt_count = log.iter().filter(|e| e.starts_with("evnt")).count();
    assert_eq!(brun5_count, 1, "both workers observing run 5 must share a single brun");
    assert_eq!(evnt_count, 4, "every event from both workers is still processed");
}
