//! Named, cancelable timers advanced by the tick loop.
//!
//! Every task is addressed by a key. Scheduling a key that is already pending
//! replaces it, so there is never more than one live timer per key and a
//! restarted delay or ramp cannot leak its predecessor.

/// How a scheduled task repeats.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Repeat {
    Once,
    Every(f32),
}

#[derive(Debug, Clone)]
struct Task<K> {
    key: K,
    remaining: f32,
    repeat: Repeat,
    /// Insertion order, used to break ties between tasks firing at the same instant.
    seq: u64,
}

/// Smallest accepted repeat period, in seconds.
const MIN_PERIOD: f32 = 1.0e-4;

/// A set of keyed one-shot and repeating timers on simulated time.
#[derive(Debug, Clone)]
pub struct Scheduler<K> {
    tasks: Vec<Task<K>>,
    next_seq: u64,
}

impl<K> Default for Scheduler<K> {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<K: Copy + PartialEq + std::fmt::Debug> Scheduler<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `key` once after `delay` seconds, replacing any pending task with the same key.
    pub fn schedule_once(&mut self, key: K, delay: f32) {
        self.insert(key, delay.max(0.0), Repeat::Once);
    }

    /// Fire `key` every `period` seconds until cancelled, replacing any pending task with the same key.
    /// The first firing happens one period from now.
    pub fn schedule_repeating(&mut self, key: K, period: f32) {
        let period = period.max(MIN_PERIOD);
        self.insert(key, period, Repeat::Every(period));
    }

    /// Cancel a pending task. Returns true if one was pending.
    pub fn cancel(&mut self, key: K) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.key != key);
        if self.tasks.len() != before {
            log::debug!("Cancelled timer {:?}", key);
            true
        } else {
            false
        }
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.tasks.iter().any(|t| t.key == key)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Advance all timers by `dt` seconds and return the keys that fired, in
    /// the order they fired within the step. A repeating task whose period is
    /// shorter than `dt` appears once per elapsed period.
    pub fn advance(&mut self, dt: f32) -> Vec<K> {
        if dt <= 0.0 {
            return Vec::new();
        }

        // (time into this step, seq, key)
        let mut fired: Vec<(f32, u64, K)> = Vec::new();
        for task in &mut self.tasks {
            task.remaining -= dt;
            match task.repeat {
                Repeat::Once => {
                    if task.remaining <= 0.0 {
                        fired.push((dt + task.remaining, task.seq, task.key));
                    }
                }
                Repeat::Every(period) => {
                    while task.remaining <= 0.0 {
                        fired.push((dt + task.remaining, task.seq, task.key));
                        task.remaining += period;
                    }
                }
            }
        }
        self.tasks
            .retain(|t| !(t.repeat == Repeat::Once && t.remaining <= 0.0));

        fired.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });
        fired.into_iter().map(|(_, _, key)| key).collect()
    }

    fn insert(&mut self, key: K, remaining: f32, repeat: Repeat) {
        self.tasks.retain(|t| t.key != key);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.push(Task {
            key,
            remaining,
            repeat,
            seq,
        });
    }
}
