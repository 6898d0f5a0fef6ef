use std::collections::BTreeMap;

use crate::model::note::Note;
use crate::util::error::PlayError;

/// One schedule step: every key struck at the same millisecond.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    /// Time in milliseconds from playback start.
    pub time_ms: u64,
    /// Keys active at this time, in first-occurrence order. Never empty.
    pub keys: Vec<String>,
}

/// Notes grouped by exact timestamp, ascending. Derived once per
/// playback session and discarded afterwards.
#[derive(Debug, Clone)]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
    total_ms: u64,
}

impl Schedule {
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// Time of the last entry, i.e. the chart duration in milliseconds.
    pub fn total_duration_ms(&self) -> u64 {
        self.total_ms
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Group notes by exact timestamp into an ascending schedule.
///
/// No quantization is applied: two notes share an entry only when
/// their millisecond times match exactly. Simultaneous keys keep the
/// order they first appear in the note list.
pub fn group_notes(notes: &[Note]) -> Result<Schedule, PlayError> {
    if notes.is_empty() {
        return Err(PlayError::EmptyChart);
    }

    let mut groups: BTreeMap<u64, Vec<String>> = BTreeMap::new();
    for note in notes {
        groups.entry(note.time).or_default().push(note.key.clone());
    }

    let total_ms = *groups.keys().next_back().expect("groups is non-empty");
    let entries = groups
        .into_iter()
        .map(|(time_ms, keys)| ScheduleEntry { time_ms, keys })
        .collect();

    Ok(Schedule { entries, total_ms })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn note(time: u64, key: &str) -> Note {
        Note {
            time,
            key: key.to_string(),
        }
    }

    #[test]
    fn groups_simultaneous_notes() {
        let notes = vec![
            note(0, "1Key0"),
            note(0, "1Key1"),
            note(500, "1Key2"),
        ];
        let schedule = group_notes(&notes).expect("grouping failed");

        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule.entries()[0].time_ms, 0);
        assert_eq!(schedule.entries()[0].keys, vec!["1Key0", "1Key1"]);
        assert_eq!(schedule.entries()[1].time_ms, 500);
        assert_eq!(schedule.entries()[1].keys, vec!["1Key2"]);
        assert_eq!(schedule.total_duration_ms(), 500);
    }

    #[test]
    fn entries_are_ascending_for_unsorted_input() {
        let notes = vec![note(300, "a"), note(100, "b"), note(200, "c")];
        let schedule = group_notes(&notes).expect("grouping failed");

        let times: Vec<u64> = schedule.entries().iter().map(|e| e.time_ms).collect();
        assert_eq!(times, vec![100, 200, 300]);
    }

    #[test]
    fn simultaneous_keys_keep_insertion_order() {
        let notes = vec![note(10, "z"), note(10, "a"), note(10, "m")];
        let schedule = group_notes(&notes).expect("grouping failed");

        assert_eq!(schedule.entries()[0].keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn no_quantization_between_adjacent_milliseconds() {
        let notes = vec![note(100, "a"), note(101, "b")];
        let schedule = group_notes(&notes).expect("grouping failed");

        assert_eq!(schedule.len(), 2);
    }

    #[test]
    fn empty_chart_is_an_error() {
        match group_notes(&[]) {
            Err(PlayError::EmptyChart) => {}
            other => panic!("expected EmptyChart, got {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn total_duration_is_max_note_time(
            times in proptest::collection::vec(0u64..100_000, 1..200)
        ) {
            let notes: Vec<Note> =
                times.iter().map(|&t| note(t, "1Key0")).collect();
            let schedule = group_notes(&notes).unwrap();
            prop_assert_eq!(
                schedule.total_duration_ms(),
                *times.iter().max().unwrap()
            );
        }

        #[test]
        fn every_distinct_timestamp_appears_exactly_once(
            times in proptest::collection::vec(0u64..1_000, 1..100)
        ) {
            let notes: Vec<Note> =
                times.iter().map(|&t| note(t, "1Key0")).collect();
            let schedule = group_notes(&notes).unwrap();

            let scheduled: Vec<u64> =
                schedule.entries().iter().map(|e| e.time_ms).collect();
            let distinct: BTreeSet<u64> = times.iter().copied().collect();
            prop_assert_eq!(scheduled, distinct.into_iter().collect::<Vec<_>>());
            prop_assert!(schedule.entries().iter().all(|e| !e.keys.is_empty()));
        }

        #[test]
        fn key_union_matches_input(
            notes_in in proptest::collection::vec(
                (0u64..500, "[a-d]"), 1..100
            )
        ) {
            let notes: Vec<Note> = notes_in
                .iter()
                .map(|(t, k)| note(*t, k))
                .collect();
            let schedule = group_notes(&notes).unwrap();

            let input_keys: BTreeSet<&str> =
                notes.iter().map(|n| n.key.as_str()).collect();
            let scheduled_keys: BTreeSet<&str> = schedule
                .entries()
                .iter()
                .flat_map(|e| e.keys.iter().map(|k| k.as_str()))
                .collect();
            prop_assert_eq!(input_keys, scheduled_keys);
        }
    }
}
