use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub enum SchedulerCommand<K, E> {
    Debounce { key: K, delay: Duration, event: E },
    Cancel { key: K },
}

#[derive(Debug, Clone)]
struct Guard<K> {
    key: K,
    version: u64,
}

#[derive(Debug, Clone)]
struct DelayedTask<K, E> {
    due_at: Instant,
    guard: Guard<K>,
    event: E,
}

#[derive(Debug)]
pub struct Scheduler<K, E> {
    delayed: Vec<DelayedTask<K, E>>,
    key_versions: HashMap<K, u64>,
}

impl<K, E> Default for Scheduler<K, E> {
    fn default() -> Self {
        Self {
            delayed: Vec::new(),
            key_versions: HashMap::new(),
        }
    }
}

impl<K: Clone + Eq + Hash, E> Scheduler<K, E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, command: SchedulerCommand<K, E>, now: Instant) {
        match command {
            SchedulerCommand::Debounce { key, delay, event } => {
                let version = self.bump_version(&key);
                self.delayed.push(DelayedTask {
                    due_at: now + delay,
                    guard: Guard { key, version },
                    event,
                });
            }
            SchedulerCommand::Cancel { key } => {
                self.bump_version(&key);
            }
        }
    }

    pub fn cancel_matching(&mut self, mut predicate: impl FnMut(&K) -> bool) {
        let keys = self
            .delayed
            .iter()
            .filter(|task| predicate(&task.guard.key))
            .map(|task| task.guard.key.clone())
            .collect::<Vec<_>>();
        for key in keys {
            self.bump_version(&key);
        }
    }

    pub fn drain_ready(&mut self, now: Instant) -> Vec<E> {
        let mut due = Vec::new();
        let mut idx = 0usize;
        while idx < self.delayed.len() {
            if self.delayed[idx].due_at <= now {
                let task = self.delayed.swap_remove(idx);
                if self.task_is_valid(&task) {
                    due.push(task);
                }
            } else {
                idx += 1;
            }
        }
        due.sort_by_key(|task| task.due_at);
        due.into_iter().map(|task| task.event).collect()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.delayed
            .iter()
            .filter(|task| self.task_is_valid(task))
            .map(|task| task.due_at)
            .min()
    }

    pub fn pending(&self) -> usize {
        self.delayed
            .iter()
            .filter(|task| self.task_is_valid(task))
            .count()
    }

    fn task_is_valid(&self, task: &DelayedTask<K, E>) -> bool {
        let current = self.key_versions.get(&task.guard.key).copied().unwrap_or(0);
        current == task.guard.version
    }

    fn bump_version(&mut self, key: &K) -> u64 {
        let entry = self.key_versions.entry(key.clone()).or_insert(0);
        *entry = entry.saturating_add(1);
        *entry
    }
}
