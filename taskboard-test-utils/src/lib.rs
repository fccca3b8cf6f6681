//! Taskboard Test Utilities
//!
//! Centralized test infrastructure for the Taskboard workspace:
//! - Scripted and gated producers for exercising the query cache
//! - Proptest generators for task types
//! - Fixtures matching the dashboard's mock data set

pub use taskboard_cache::{Producer, ProducerError};
pub use taskboard_core::{DashboardMetrics, Task, TaskStatus, TaskType, Timestamp};

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::oneshot;

// ============================================================================
// CALL PROBE
// ============================================================================

/// Counts producer invocations and how many overlap.
#[derive(Debug, Default)]
pub struct CallProbe {
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl CallProbe {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Total invocations started.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Invocations currently running (aborted ones are not counted).
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of invocations ever running at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn enter(self: &Arc<Self>) -> InFlightGuard {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        InFlightGuard {
            probe: Arc::clone(self),
        }
    }
}

/// Decrements the in-flight count when the producer future completes or is dropped.
struct InFlightGuard {
    probe: Arc<CallProbe>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.probe.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

// ============================================================================
// MOCK PRODUCERS
// ============================================================================

/// One scripted producer response.
#[derive(Debug, Clone)]
pub struct Step<T> {
    pub delay: Duration,
    pub result: Result<T, ProducerError>,
}

impl<T> Step<T> {
    pub fn ok(value: T, delay: Duration) -> Self {
        Self {
            delay,
            result: Ok(value),
        }
    }

    pub fn err(message: &str, delay: Duration) -> Self {
        Self {
            delay,
            result: Err(ProducerError::new(message)),
        }
    }
}

/// Producer that replays a script of responses.
///
/// Once the script runs out, the last step repeats.
#[derive(Debug)]
pub struct ScriptedProducer<T> {
    steps: Mutex<VecDeque<Step<T>>>,
    last: Mutex<Option<Step<T>>>,
    probe: Arc<CallProbe>,
}

impl<T: Clone> ScriptedProducer<T> {
    pub fn new(steps: impl IntoIterator<Item = Step<T>>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            last: Mutex::new(None),
            probe: CallProbe::new(),
        }
    }

    /// Always succeed with `value` after `delay`.
    pub fn always(value: T, delay: Duration) -> Self {
        Self::new([Step::ok(value, delay)])
    }

    pub fn probe(&self) -> Arc<CallProbe> {
        Arc::clone(&self.probe)
    }

    fn next_step(&self) -> Step<T> {
        let next = self
            .steps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        match next {
            Some(step) => {
                *last = Some(step.clone());
                step
            }
            None => last.clone().unwrap_or_else(|| Step::err("script exhausted", Duration::ZERO)),
        }
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> Producer<T> for ScriptedProducer<T> {
    async fn produce(&self) -> Result<T, ProducerError> {
        let step = self.next_step();
        let _guard = self.probe.enter();
        tokio::time::sleep(step.delay).await;
        step.result
    }
}

type Pending<T> = Arc<Mutex<Vec<Option<oneshot::Sender<Result<T, ProducerError>>>>>>;

/// Producer whose calls stay pending until the test resolves them.
pub struct GatedProducer<T> {
    pending: Pending<T>,
    probe: Arc<CallProbe>,
}

/// Test-side handle for resolving [`GatedProducer`] calls.
#[derive(Clone)]
pub struct Gates<T> {
    pending: Pending<T>,
    probe: Arc<CallProbe>,
}

/// Create a gated producer and its controlling handle.
pub fn gated<T>() -> (GatedProducer<T>, Gates<T>) {
    let pending: Pending<T> = Arc::new(Mutex::new(Vec::new()));
    let probe = CallProbe::new();
    (
        GatedProducer {
            pending: Arc::clone(&pending),
            probe: Arc::clone(&probe),
        },
        Gates { pending, probe },
    )
}

impl<T> Gates<T> {
    /// Number of calls made so far.
    pub fn calls(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn probe(&self) -> Arc<CallProbe> {
        Arc::clone(&self.probe)
    }

    /// Settle call number `call` (0-based).
    ///
    /// Returns false if the call does not exist, was already settled, or its
    /// future has been dropped.
    pub fn resolve(&self, call: usize, result: Result<T, ProducerError>) -> bool {
        let sender = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(call)
            .and_then(Option::take);
        match sender {
            Some(sender) => sender.send(result).is_ok(),
            None => false,
        }
    }
}

#[async_trait]
impl<T: Send + 'static> Producer<T> for GatedProducer<T> {
    async fn produce(&self) -> Result<T, ProducerError> {
        let (sender, receiver) = oneshot::channel();
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Some(sender));
        let _guard = self.probe.enter();
        receiver
            .await
            .unwrap_or_else(|_| Err(ProducerError::new("gate dropped")))
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating Taskboard domain types.

    use super::*;
    use proptest::prelude::*;

    /// Generate a TaskType.
    pub fn arb_task_type() -> impl Strategy<Value = TaskType> {
        prop_oneof![
            Just(TaskType::Email),
            Just(TaskType::Notification),
            Just(TaskType::Report),
            Just(TaskType::Maintenance),
        ]
    }

    /// Generate a TaskStatus.
    pub fn arb_task_status() -> impl Strategy<Value = TaskStatus> {
        prop_oneof![
            Just(TaskStatus::Pending),
            Just(TaskStatus::Running),
            Just(TaskStatus::Completed),
            Just(TaskStatus::Failed),
        ]
    }

    /// Generate a Timestamp (DateTime<Utc>).
    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        // Generate timestamps within a reasonable range (2020-2030)
        (1577836800i64..1893456000i64).prop_map(|secs| {
            chrono::DateTime::from_timestamp(secs, 0).unwrap_or_else(chrono::Utc::now)
        })
    }

    /// Generate a Task with a schema-valid name and priority.
    pub fn arb_task() -> impl Strategy<Value = Task> {
        (
            1u32..10_000,
            "[A-Z][a-z]{2,11}( [A-Z][a-z]{2,11}){0,3}",
            arb_task_type(),
            arb_task_status(),
            1u8..=10,
            0u32..6,
            arb_timestamp(),
        )
            .prop_map(|(n, name, task_type, status, priority, retries, created_at)| Task {
                id: format!("ts_{}", n),
                name,
                task_type,
                status,
                priority,
                retries,
                created_at,
            })
    }

    /// Generate up to `max` tasks with unique ids.
    pub fn arb_tasks(max: usize) -> impl Strategy<Value = Vec<Task>> {
        prop::collection::vec(arb_task(), 0..=max).prop_map(|mut tasks| {
            for (index, task) in tasks.iter_mut().enumerate() {
                task.id = format!("ts_{}", index + 1);
            }
            tasks
        })
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built test fixtures mirroring the dashboard's mock data set.

    use super::*;

    /// The five tasks the mock source starts with.
    pub fn dummy_tasks() -> Vec<Task> {
        taskboard_core::sample_tasks()
    }

    /// Metrics derived from [`dummy_tasks`].
    pub fn dummy_metrics() -> DashboardMetrics {
        DashboardMetrics {
            total_tasks: 5,
            running: 1,
            completed_today: 2,
            failed: 1,
        }
    }
}
