use super::instance::{lock, RunInstance, RunStatus, TaskResult};
use crate::task::TaskDescriptor;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Lifecycle event published after each status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEvent {
    /// All instances created, nothing started yet
    Scheduled,
    Started { index: usize },
    Finished { index: usize, success: bool },
}

/// Notified synchronously after every status change, with a consistent snapshot
pub trait RunObserver: Send + Sync {
    fn on_event(&self, event: &RunEvent, snapshot: &RunSnapshot);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub cwd: String,
    pub command: String,
    pub status: RunStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSnapshot {
    pub entries: Vec<SnapshotEntry>,
}

impl RunSnapshot {
    pub fn count(&self, status: RunStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    /// Entries grouped by working directory, groups in order of first appearance
    pub fn groups(&self) -> Vec<(&str, Vec<&SnapshotEntry>)> {
        let mut groups: Vec<(&str, Vec<&SnapshotEntry>)> = Vec::new();
        for entry in &self.entries {
            match groups.iter_mut().find(|(cwd, _)| *cwd == entry.cwd) {
                Some((_, members)) => members.push(entry),
                None => groups.push((entry.cwd.as_str(), vec![entry])),
            }
        }
        groups
    }
}

/// Shared state of one orchestration: the instances plus the observers watching them
pub struct RunBoard {
    instances: Vec<RunInstance>,
    skipped: Vec<SnapshotEntry>,
    observers: Vec<Arc<dyn RunObserver>>,
    publish: Mutex<()>,
}

impl RunBoard {
    pub fn new(
        instances: Vec<RunInstance>,
        skipped: &[TaskDescriptor],
        observers: Vec<Arc<dyn RunObserver>>,
    ) -> Self {
        let skipped = skipped
            .iter()
            .map(|task| SnapshotEntry {
                cwd: task.cwd.clone(),
                command: task
                    .cmd
                    .argv()
                    .map(|argv| argv.join(" "))
                    .unwrap_or_default(),
                status: RunStatus::Skipped,
            })
            .collect();

        Self {
            instances,
            skipped,
            observers,
            publish: Mutex::new(()),
        }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn instance(&self, index: usize) -> &RunInstance {
        &self.instances[index]
    }

    pub fn instances(&self) -> &[RunInstance] {
        &self.instances
    }

    pub fn snapshot(&self) -> RunSnapshot {
        let entries = self
            .instances
            .iter()
            .map(|instance| SnapshotEntry {
                cwd: instance.cwd.clone(),
                command: instance.command_line(),
                status: instance.status(),
            })
            .chain(self.skipped.iter().cloned())
            .collect();
        RunSnapshot { entries }
    }

    pub fn publish(&self, event: RunEvent) {
        let _guard = lock(&self.publish);
        self.notify(&event);
    }

    pub fn start(&self, index: usize) {
        let _guard = lock(&self.publish);
        self.instances[index].set_status(RunStatus::Running);
        self.notify(&RunEvent::Started { index });
    }

    pub fn finish(&self, index: usize, result: TaskResult) {
        let _guard = lock(&self.publish);
        let success = result.success;
        let instance = &self.instances[index];
        instance.set_result(result);
        instance.set_status(if success {
            RunStatus::Succeeded
        } else {
            RunStatus::Failed
        });
        self.notify(&RunEvent::Finished { index, success });
    }

    /// Mark an instance that never reached a terminal state as failed, without
    /// notifying observers. Used when its task unwinds or is dropped.
    pub fn abandon(&self, index: usize, reason: &str) {
        let _guard = lock(&self.publish);
        let instance = &self.instances[index];
        if instance.status().is_terminal() {
            return;
        }
        instance.set_result(TaskResult {
            success: false,
            output: reason.to_string(),
            ..Default::default()
        });
        instance.set_status(RunStatus::Failed);
    }

    // caller holds the publish lock
    fn notify(&self, event: &RunEvent) {
        debug!("{:?}", event);
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for observer in &self.observers {
            observer.on_event(event, &snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(cwd: &str, command: &str) -> SnapshotEntry {
        SnapshotEntry {
            cwd: cwd.to_string(),
            command: command.to_string(),
            status: RunStatus::Pending,
        }
    }

    #[test]
    fn test_groups_keep_first_appearance_order() {
        let snapshot = RunSnapshot {
            entries: vec![
                entry("web", "npm test"),
                entry(".", "cargo test"),
                entry("web", "npm run lint"),
            ],
        };

        let groups = snapshot.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "web");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[0].1[1].command, "npm run lint");
        assert_eq!(groups[1].0, ".");
    }

    #[test]
    fn test_skipped_entries_follow_instances() {
        let instances = vec![RunInstance::from_task(&TaskDescriptor::new("cargo test")).unwrap()];
        let skipped = vec![TaskDescriptor::new("npm test").in_dir("web")];
        let board = RunBoard::new(instances, &skipped, Vec::new());

        let snapshot = board.snapshot();
        assert_eq!(snapshot.entries.len(), 2);
        assert_eq!(snapshot.entries[0].status, RunStatus::Pending);
        assert_eq!(snapshot.entries[1].status, RunStatus::Skipped);
        assert_eq!(snapshot.entries[1].command, "npm test");
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_transitions_notify_observers() {
        struct Events(Mutex<Vec<(RunEvent, RunStatus)>>);
        impl RunObserver for Events {
            fn on_event(&self, event: &RunEvent, snapshot: &RunSnapshot) {
                lock(&self.0).push((*event, snapshot.entries[0].status));
            }
        }

        let events = Arc::new(Events(Mutex::new(Vec::new())));
        let instances = vec![RunInstance::from_task(&TaskDescriptor::new("true")).unwrap()];
        let observer: Arc<dyn RunObserver> = events.clone();
        let board = RunBoard::new(instances, &[], vec![observer]);

        board.publish(RunEvent::Scheduled);
        board.start(0);
        board.finish(
            0,
            TaskResult {
                success: false,
                ..Default::default()
            },
        );

        let seen = lock(&events.0).clone();
        assert_eq!(
            seen,
            vec![
                (RunEvent::Scheduled, RunStatus::Pending),
                (RunEvent::Started { index: 0 }, RunStatus::Running),
                (
                    RunEvent::Finished {
                        index: 0,
                        success: false
                    },
                    RunStatus::Failed
                ),
            ]
        );
    }

    #[test]
    fn test_abandon_only_fails_unfinished_instances() {
        let instances = vec![
            RunInstance::from_task(&TaskDescriptor::new("true")).unwrap(),
            RunInstance::from_task(&TaskDescriptor::new("true")).unwrap(),
        ];
        let board = RunBoard::new(instances, &[], Vec::new());
        board.start(0);
        board.finish(
            1,
            TaskResult {
                success: true,
                ..Default::default()
            },
        );

        board.abandon(0, "gone");
        board.abandon(1, "gone");

        assert_eq!(board.instance(0).status(), RunStatus::Failed);
        assert_eq!(board.instance(0).result().unwrap().output, "gone");
        assert_eq!(board.instance(1).status(), RunStatus::Succeeded);
    }
}
