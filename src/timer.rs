use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crate::runtime::GameEvent;

pub const TICK_RATE_MS: u64 = 100;

/// Periodic tick source for one session. Ticks flow until the handle is
/// dropped; dropping it wakes the worker, which exits at once.
#[derive(Debug)]
pub struct TickHandle {
    cancel: Sender<()>,
}

impl TickHandle {
    pub fn spawn(interval: Duration, events: Sender<GameEvent>) -> Self {
        let (cancel, cancelled) = mpsc::channel::<()>();

        thread::spawn(move || loop {
            match cancelled.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if events.send(GameEvent::Tick).is_err() {
                        break;
                    }
                }
                // the handle dropped its sender
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });

        Self { cancel }
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        let _ = self.cancel.send(());
    }
}

/// The running clock of a session: start instant plus the optional tick handle
#[derive(Debug)]
pub struct RunningTimer {
    started_at: Instant,
    _ticks: Option<TickHandle>,
}

impl RunningTimer {
    pub fn start(now: Instant, ticks: Option<TickHandle>) -> Self {
        Self {
            started_at: now,
            _ticks: ticks,
        }
    }

    pub fn elapsed_secs(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.started_at).as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_arrive_until_dropped() {
        let (tx, rx) = mpsc::channel();
        let handle = TickHandle::spawn(Duration::from_millis(5), tx);

        assert!(matches!(
            rx.recv_timeout(Duration::from_millis(500)),
            Ok(GameEvent::Tick)
        ));

        drop(handle);
        // at most one tick can still be in flight; then the worker is gone
        let mut late = 0;
        loop {
            match rx.recv_timeout(Duration::from_millis(500)) {
                Ok(GameEvent::Tick) => late += 1,
                Ok(other) => panic!("unexpected event {other:?}"),
                Err(e) => {
                    assert_eq!(e, mpsc::RecvTimeoutError::Disconnected);
                    break;
                }
            }
        }
        assert!(late <= 1, "{late} ticks after drop");
    }

    #[test]
    fn drop_stops_the_worker_before_its_next_tick() {
        let (tx, rx) = mpsc::channel();
        let handle = TickHandle::spawn(Duration::from_secs(60), tx);

        let dropped_at = Instant::now();
        drop(handle);

        // a sleeping worker would hold its sender for the whole minute
        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(2)),
            Err(mpsc::RecvTimeoutError::Disconnected)
        ));
        assert!(dropped_at.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn elapsed_is_measured_from_start() {
        let start = Instant::now();
        let timer = RunningTimer::start(start, None);
        let later = start + Duration::from_millis(2500);
        assert!((timer.elapsed_secs(later) - 2.5).abs() < 1e-9);
        assert_eq!(timer.elapsed_secs(start), 0.0);
    }
}
