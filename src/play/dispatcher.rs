use std::io::Write;

use log::debug;

use crate::config::KeyMapping;
use crate::model::Schedule;
use crate::play::progress::Progress;
use crate::play::waiter::HybridWaiter;
use crate::traits::{SystemTimeProvider, TapSink, TimeProvider};
use crate::util::error::PlayError;

/// Drives a schedule against the playback clock, emitting tap
/// commands to the device channel.
pub struct Dispatcher {
    waiter: HybridWaiter,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            waiter: HybridWaiter::new(),
        }
    }

    pub fn with_waiter(waiter: HybridWaiter) -> Self {
        Self { waiter }
    }

    /// Play the schedule. The playback clock starts when this is
    /// called; each entry waits for its offset, then one tap line is
    /// written per key and the channel is flushed once per group.
    ///
    /// Progress goes to `out`; progress write failures never
    /// interrupt playback. Channel failures abort immediately with
    /// `PlayError::ChannelWrite`.
    pub fn run<S, W>(
        &self,
        schedule: &Schedule,
        mapping: &KeyMapping,
        sink: &mut S,
        out: &mut W,
    ) -> Result<(), PlayError>
    where
        S: TapSink + ?Sized,
        W: Write,
    {
        self.run_with_clock(&SystemTimeProvider::new(), schedule, mapping, sink, out)
    }

    /// Like `run`, but against an injected clock. Entries whose time
    /// has already passed are dispatched immediately; late steps are
    /// not compensated for, so drift across many late steps is carried
    /// through unchanged.
    pub fn run_with_clock<T, S, W>(
        &self,
        clock: &T,
        schedule: &Schedule,
        mapping: &KeyMapping,
        sink: &mut S,
        out: &mut W,
    ) -> Result<(), PlayError>
    where
        T: TimeProvider + ?Sized,
        S: TapSink + ?Sized,
        W: Write,
    {
        let progress = Progress::new(schedule.total_duration_ms());
        debug!(
            "dispatching {} schedule entries over {}ms",
            schedule.len(),
            schedule.total_duration_ms()
        );

        for entry in schedule.entries() {
            let elapsed = clock.now_ms();
            self.waiter.wait_ms(entry.time_ms as i64 - elapsed);

            // The actual send time may trail the target by scheduler
            // jitter; re-read the clock instead of pretending the
            // deadline was hit.
            let elapsed = clock.now_ms().max(0) as u64;
            let _ = progress.report(&mut *out, elapsed, &entry.keys);

            for key in &entry.keys {
                let (x, y) = mapping.coord(key);
                sink.send_tap(x, y)?;
            }
            sink.flush()?;
        }
        Ok(())
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Note, group_notes};
    use crate::traits::MockTimeProvider;
    use std::io;

    /// Records the sink call sequence so tests can assert write and
    /// flush ordering.
    #[derive(Debug, PartialEq, Eq)]
    enum SinkOp {
        Tap(i32, i32),
        Flush,
    }

    #[derive(Default)]
    struct RecordingSink {
        ops: Vec<SinkOp>,
        fail_writes: bool,
    }

    impl TapSink for RecordingSink {
        fn send_tap(&mut self, x: i32, y: i32) -> io::Result<()> {
            if self.fail_writes {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "device gone"));
            }
            self.ops.push(SinkOp::Tap(x, y));
            Ok(())
        }

        fn flush(&mut self) -> io::Result<()> {
            if self.fail_writes {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "device gone"));
            }
            self.ops.push(SinkOp::Flush);
            Ok(())
        }
    }

    fn note(time: u64, key: &str) -> Note {
        Note {
            time,
            key: key.to_string(),
        }
    }

    /// Clock pinned past the end of the schedule, so every wait is
    /// non-positive and the loop runs without blocking.
    fn finished_clock(schedule_end: u64) -> MockTimeProvider {
        let clock = MockTimeProvider::new();
        clock.set_time(schedule_end as i64 + 1);
        clock
    }

    #[test]
    fn one_write_per_key_one_flush_per_group() {
        let notes = vec![
            note(0, "1Key0"),
            note(0, "1Key1"),
            note(500, "1Key2"),
        ];
        let schedule = group_notes(&notes).unwrap();
        let mut mapping = KeyMapping::empty();
        mapping.insert("1Key0", 900, 220);

        let mut sink = RecordingSink::default();
        let mut out = Vec::new();
        Dispatcher::new()
            .run_with_clock(
                &finished_clock(500),
                &schedule,
                &mapping,
                &mut sink,
                &mut out,
            )
            .expect("dispatch failed");

        assert_eq!(
            sink.ops,
            vec![
                SinkOp::Tap(900, 220),
                SinkOp::Tap(0, 0),
                SinkOp::Flush,
                SinkOp::Tap(0, 0),
                SinkOp::Flush,
            ]
        );
    }

    #[test]
    fn missing_keys_resolve_to_origin_without_aborting() {
        let notes = vec![note(0, "unmapped")];
        let schedule = group_notes(&notes).unwrap();

        let mut sink = RecordingSink::default();
        let mut out = Vec::new();
        Dispatcher::new()
            .run_with_clock(
                &finished_clock(0),
                &schedule,
                &KeyMapping::empty(),
                &mut sink,
                &mut out,
            )
            .expect("missing mapping must not abort");

        assert_eq!(sink.ops, vec![SinkOp::Tap(0, 0), SinkOp::Flush]);
    }

    #[test]
    fn channel_failure_aborts_immediately() {
        let notes = vec![note(0, "1Key0"), note(100, "1Key1")];
        let schedule = group_notes(&notes).unwrap();

        let mut sink = RecordingSink {
            fail_writes: true,
            ..Default::default()
        };
        let mut out = Vec::new();
        let result = Dispatcher::new().run_with_clock(
            &finished_clock(100),
            &schedule,
            &KeyMapping::empty(),
            &mut sink,
            &mut out,
        );

        match result {
            Err(PlayError::ChannelWrite(e)) => {
                assert_eq!(e.kind(), io::ErrorKind::BrokenPipe);
            }
            other => panic!("expected ChannelWrite, got {other:?}"),
        }
        assert!(sink.ops.is_empty());
    }

    #[test]
    fn progress_is_reported_per_entry() {
        let notes = vec![note(0, "a"), note(200, "b")];
        let schedule = group_notes(&notes).unwrap();

        let mut sink = RecordingSink::default();
        let mut out = Vec::new();
        Dispatcher::new()
            .run_with_clock(
                &finished_clock(200),
                &schedule,
                &KeyMapping::empty(),
                &mut sink,
                &mut out,
            )
            .expect("dispatch failed");

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Progress:").count(), 2);
        assert!(text.contains("keys: a"));
        assert!(text.contains("keys: b"));
    }

    #[test]
    fn real_clock_timing_holds_lower_bound() {
        // Entries 30ms apart through the sleep path and 3ms apart
        // through the spin path; the whole run must take at least the
        // final entry's offset.
        let notes = vec![note(0, "a"), note(30, "b"), note(33, "c")];
        let schedule = group_notes(&notes).unwrap();

        let mut sink = RecordingSink::default();
        let mut out = Vec::new();
        let start = std::time::Instant::now();
        Dispatcher::new()
            .run(&schedule, &KeyMapping::empty(), &mut sink, &mut out)
            .expect("dispatch failed");

        assert!(start.elapsed() >= std::time::Duration::from_millis(33));
        assert_eq!(sink.ops.iter().filter(|op| **op == SinkOp::Flush).count(), 3);
    }
}
