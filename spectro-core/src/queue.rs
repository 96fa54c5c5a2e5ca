//! Blocking handoff queue between pipeline stages
use std::collections;
use std::sync;
use std::time;

#[derive(Debug)]
struct State<T> {
    items: collections::VecDeque<T>,
    closed: bool,
}

#[derive(Debug)]
struct Shared<T> {
    state: parking_lot::Mutex<State<T>>,
    not_empty: parking_lot::Condvar,
}

/// FIFO queue with a blocking `pop`
///
/// Cloning yields another handle to the same queue, so one clone can live in the producing
/// thread and one in the consuming thread.  The queue is unbounded; every stage of the
/// pipeline emits exactly one item per item it consumes, so no stage can outrun the next.
///
/// A queue can be closed.  Closing wakes every waiter; `pop` keeps returning the remaining
/// items and only yields `None` once the queue is both closed and drained.
#[derive(Debug)]
pub struct Queue<T> {
    shared: sync::Arc<Shared<T>>,
}

impl<T> Clone for Queue<T> {
    fn clone(&self) -> Self {
        Queue {
            shared: self.shared.clone(),
        }
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Queue::new()
    }
}

impl<T> Queue<T> {
    pub fn new() -> Queue<T> {
        Queue {
            shared: sync::Arc::new(Shared {
                state: parking_lot::Mutex::new(State {
                    items: collections::VecDeque::new(),
                    closed: false,
                }),
                not_empty: parking_lot::Condvar::new(),
            }),
        }
    }

    /// Append a value and wake one waiting consumer
    ///
    /// Values pushed after `close` are dropped.  Returns whether the value was queued.
    pub fn push(&self, value: T) -> bool {
        let mut state = self.shared.state.lock();
        if state.closed {
            return false;
        }
        state.items.push_back(value);
        self.shared.not_empty.notify_one();
        true
    }

    /// Remove the oldest value, blocking while the queue is empty
    ///
    /// Returns `None` only after the queue was closed and every queued value was popped.
    pub fn pop(&self) -> Option<T> {
        let mut state = self.shared.state.lock();
        loop {
            if let Some(value) = state.items.pop_front() {
                return Some(value);
            }
            if state.closed {
                return None;
            }
            self.shared.not_empty.wait(&mut state);
        }
    }

    /// Remove the oldest value if there is one, without blocking
    pub fn try_pop(&self) -> Option<T> {
        self.shared.state.lock().items.pop_front()
    }

    /// Block until a value is available, the queue is closed or `timeout` elapsed
    ///
    /// Does not remove anything.  Returns whether a value is available.
    pub fn wait(&self, timeout: time::Duration) -> bool {
        let deadline = time::Instant::now() + timeout;
        let mut state = self.shared.state.lock();
        while state.items.is_empty() && !state.closed {
            if self
                .shared
                .not_empty
                .wait_until(&mut state, deadline)
                .timed_out()
            {
                break;
            }
        }
        !state.items.is_empty()
    }

    /// Close the queue and wake all waiters
    pub fn close(&self) {
        let mut state = self.shared.state.lock();
        state.closed = true;
        self.shared.not_empty.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.shared.state.lock().closed
    }

    /// Number of queued values.  Only a snapshot, not usable for synchronization.
    pub fn count(&self) -> usize {
        self.shared.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.state.lock().items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_fifo() {
        let q = Queue::new();
        for i in 0..5 {
            q.push(i);
        }
        assert_eq!(q.count(), 5);
        assert_eq!((0..5).map(|_| q.pop().unwrap()).collect::<Vec<_>>(), &[0, 1, 2, 3, 4]);
        assert!(q.is_empty());
    }

    #[test]
    fn test_blocking_pop() {
        let q = Queue::new();
        let producer = {
            let q = q.clone();
            thread::spawn(move || {
                for i in 0..100 {
                    thread::sleep(time::Duration::from_micros(50));
                    q.push(i);
                }
                q.close();
            })
        };

        let mut received = Vec::new();
        while let Some(v) = q.pop() {
            received.push(v);
        }
        producer.join().unwrap();

        assert_eq!(received, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_wait_timeout() {
        let q: Queue<u32> = Queue::new();
        let start = time::Instant::now();
        assert!(!q.wait(time::Duration::from_millis(20)));
        assert!(start.elapsed() >= time::Duration::from_millis(20));

        q.push(7);
        assert!(q.wait(time::Duration::from_secs(10)));
        // wait must not remove anything
        assert_eq!(q.count(), 1);
    }

    #[test]
    fn test_wait_wakes_on_push() {
        let q = Queue::new();
        let producer = {
            let q = q.clone();
            thread::spawn(move || {
                thread::sleep(time::Duration::from_millis(20));
                q.push(1u8);
            })
        };

        let start = time::Instant::now();
        assert!(q.wait(time::Duration::from_secs(10)));
        println!("Woke after {:?}", start.elapsed());
        assert!(start.elapsed() < time::Duration::from_secs(5));
        assert_eq!(q.try_pop(), Some(1));
        producer.join().unwrap();
    }

    #[test]
    fn test_close_drains() {
        let q = Queue::new();
        q.push("a");
        q.push("b");
        q.close();

        assert!(!q.push("c"));
        assert_eq!(q.pop(), Some("a"));
        assert_eq!(q.pop(), Some("b"));
        assert_eq!(q.pop(), None);
        assert!(!q.wait(time::Duration::from_secs(10)));
    }

    #[test]
    fn test_close_wakes_consumer() {
        let q: Queue<u8> = Queue::new();
        let consumer = {
            let q = q.clone();
            thread::spawn(move || q.pop())
        };
        thread::sleep(time::Duration::from_millis(10));
        q.close();
        assert_eq!(consumer.join().unwrap(), None);
    }
}
