use std::collections::HashMap;

use mesos_auth_model::{TaskId, TaskLifecycle};
use tracing::trace;

use crate::{Task, TaskState, response::GetTasks};

/// Lifecycle class of a raw Mesos task state.
///
/// `TASK_UNKNOWN` and values this build does not know about have no class.
pub fn lifecycle_of(state: i32) -> Option<TaskLifecycle> {
    match TaskState::try_from(state).ok()? {
        TaskState::TaskStaging
        | TaskState::TaskStarting
        | TaskState::TaskRunning
        | TaskState::TaskKilling => Some(TaskLifecycle::Active),

        TaskState::TaskFinished
        | TaskState::TaskFailed
        | TaskState::TaskKilled
        | TaskState::TaskError
        | TaskState::TaskGone
        | TaskState::TaskGoneByOperator => Some(TaskLifecycle::Terminated),

        TaskState::TaskLost | TaskState::TaskDropped | TaskState::TaskUnreachable => {
            Some(TaskLifecycle::Unreachable)
        }

        TaskState::TaskUnknown => None,
    }
}

/// A task as seen in one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredTask {
    pub id: TaskId,
    pub name: String,
    pub state: TaskState,
    pub lifecycle: TaskLifecycle,
}

/// Tasks reported by a single `GET_TASKS` call, indexed by task id.
///
/// Built per request and then dropped; never cached across requests.
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: HashMap<TaskId, RegisteredTask>,
}

impl TaskRegistry {
    /// Index the active, completed and unreachable collections.
    ///
    /// Pending tasks have not been accepted yet and orphan tasks are deprecated;
    /// neither is considered. If an id shows up more than once the most alive
    /// entry wins.
    pub fn from_get_tasks(resp: GetTasks) -> Self {
        let mut registry = Self::default();
        let GetTasks {
            tasks,
            completed_tasks,
            unreachable_tasks,
            ..
        } = resp;

        for task in tasks
            .into_iter()
            .chain(unreachable_tasks)
            .chain(completed_tasks)
        {
            registry.insert(task);
        }
        registry
    }

    fn insert(&mut self, task: Task) {
        let Some(id) = task.task_id.as_ref().map(|t| t.value.clone()) else {
            trace!("skipping task without id");
            return;
        };
        let Some(raw_state) = task.state else {
            trace!(task_id = %id, "skipping task without state");
            return;
        };
        let (Ok(state), Some(lifecycle)) = (TaskState::try_from(raw_state), lifecycle_of(raw_state))
        else {
            trace!(task_id = %id, state = raw_state, "skipping task in unknown state");
            return;
        };

        let id = TaskId::from(id);
        let entry = RegisteredTask {
            id: id.clone(),
            name: task.name.unwrap_or_default(),
            state,
            lifecycle,
        };

        match self.tasks.get(&id) {
            Some(existing) if existing.lifecycle >= lifecycle => {}
            _ => {
                self.tasks.insert(id, entry);
            }
        }
    }

    pub fn get(&self, task_id: &str) -> Option<&RegisteredTask> {
        self.tasks.get(task_id)
    }

    /// `true` iff the task is present and in the active lifecycle class.
    ///
    /// Missing, terminated and unreachable tasks are indistinguishable here.
    pub fn is_task_active(&self, task_id: &str) -> bool {
        self.get(task_id)
            .is_some_and(|task| task.lifecycle.is_active())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredTask> {
        self.tasks.values()
    }
}
