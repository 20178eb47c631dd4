//! Release behaviour observed through the recording page provider.

use std::panic::{self, AssertUnwindSafe};

use judgekit_guard::{
    run_on_ro_array_in, run_on_ro_matrix_in, run_on_ro_string_in, GuardError, RoBuffer, RoMatrix,
    RoString,
};
use judgekit_random::TestRng;
use judgekit_test_utils::{PageEvent, RecordingPages, ZeroSource};

// ── Helpers ─────────────────────────────────────────────────────

fn bases(events: &[PageEvent], pick: fn(&PageEvent) -> Option<usize>) -> Vec<usize> {
    events.iter().filter_map(pick).collect()
}

fn mapped(e: &PageEvent) -> Option<usize> {
    match *e {
        PageEvent::Map { base, .. } => Some(base),
        _ => None,
    }
}

fn unmapped(e: &PageEvent) -> Option<usize> {
    match *e {
        PageEvent::Unmap { base, .. } => Some(base),
        _ => None,
    }
}

// ── 1-D ─────────────────────────────────────────────────────────

#[test]
fn every_mapping_is_protected_then_released() {
    RecordingPages::take_events();
    {
        let mut rng = TestRng::new(1);
        let buf = RoBuffer::<i32, RecordingPages>::new_in(&[1, 2, 3, 4, 5], &mut rng).unwrap();
        assert_eq!(&buf[..], &[1, 2, 3, 4, 5]);
        assert_eq!(buf.mapping().allocated_bytes(), 4096);
    }
    let events = RecordingPages::take_events();
    let base = buf_base(&events);
    assert_eq!(
        events,
        vec![
            PageEvent::Map { base, len: 4096 },
            PageEvent::Protect { base, len: 4096 },
            PageEvent::Unmap { base, len: 4096 },
        ]
    );
}

fn buf_base(events: &[PageEvent]) -> usize {
    bases(events, mapped)[0]
}

#[test]
fn seeded_padding_is_not_zero_fill() {
    let mut rng = TestRng::new(12_345_678);
    let buf = RoBuffer::<i32, RecordingPages>::new_in(&[1, 2, 3, 4, 5], &mut rng).unwrap();
    let padding = buf.mapping().padding();
    assert_eq!(padding.len(), 4096 - 20);
    assert!(padding.iter().any(|&b| b != 0));

    let zeros = RoBuffer::<i32, RecordingPages>::new_in(&[1, 2, 3, 4, 5], &mut ZeroSource).unwrap();
    assert!(zeros.mapping().padding().iter().all(|&b| b == 0));
}

#[test]
fn padding_is_reproducible_per_seed() {
    let data = [7u8; 10];
    let a = RoBuffer::<u8, RecordingPages>::new_in(&data, &mut TestRng::new(99)).unwrap();
    let b = RoBuffer::<u8, RecordingPages>::new_in(&data, &mut TestRng::new(99)).unwrap();
    let c = RoBuffer::<u8, RecordingPages>::new_in(&data, &mut TestRng::new(100)).unwrap();
    assert_eq!(a.mapping().padding(), b.mapping().padding());
    assert_ne!(a.mapping().padding(), c.mapping().padding());
}

#[test]
fn protect_failure_releases_the_mapping() {
    RecordingPages::take_events();
    RecordingPages::fail_next_protect();
    let err = RoBuffer::<u8, RecordingPages>::new_in(b"abc", &mut TestRng::new(1)).unwrap_err();
    assert!(matches!(err, GuardError::ProtectFailed { bytes: 4096, .. }));
    assert!(err.is_environment());
    assert_eq!(RecordingPages::live_mappings(), 0);
}

#[test]
fn panicking_callback_still_releases() {
    RecordingPages::take_events();
    let mut rng = TestRng::new(3);
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        run_on_ro_array_in::<RecordingPages, _, _, _, _>(&[1u32, 2, 3], &mut rng, |view| {
            assert_eq!(view[0], 100, "solution returned the wrong value");
        })
    }));
    assert!(result.is_err());
    assert_eq!(RecordingPages::live_mappings(), 0);
    let events = RecordingPages::take_events();
    assert_eq!(bases(&events, mapped), bases(&events, unmapped));
}

#[test]
fn scoped_run_releases_before_returning() {
    RecordingPages::take_events();
    let mut rng = TestRng::new(4);
    let live_inside = run_on_ro_string_in::<RecordingPages, _, _, _>("abc", &mut rng, |s| {
        assert_eq!(s.as_bytes_with_nul(), b"abc\0");
        RecordingPages::live_mappings()
    });
    assert_eq!(live_inside, 1);
    assert_eq!(RecordingPages::live_mappings(), 0);
}

// ── 2-D ─────────────────────────────────────────────────────────

#[test]
fn matrix_rows_are_mapped_first_and_released_first() {
    RecordingPages::take_events();
    let mut rng = TestRng::new(5);
    let m = RoMatrix::<i32, RecordingPages>::new_in(&[vec![1, 2], vec![3, 4], vec![5, 6]], &mut rng)
        .unwrap();
    assert_eq!((m.rows(), m.cols()), (3, 2));
    assert_eq!(m[(1, 0)], 3);

    let row_bases: Vec<usize> = m.row_buffers().iter().map(|r| r.as_ptr() as usize).collect();
    let table_base = m.table_buffer().as_ptr() as usize;
    drop(m);

    let events = RecordingPages::take_events();
    let mut expected_maps = row_bases.clone();
    expected_maps.push(table_base);
    assert_eq!(bases(&events, mapped), expected_maps);
    // Rows 0, 1, 2, then the pointer table.
    assert_eq!(bases(&events, unmapped), expected_maps);
}

#[test]
fn matrix_read_back_matches_input() {
    let input: Vec<Vec<i64>> = (0..17)
        .map(|i| (0..9).map(|j| i * 100 + j).collect())
        .collect();
    let mut rng = TestRng::new(6);
    run_on_ro_matrix_in::<RecordingPages, _, _, _, _, _>(&input, &mut rng, |m| {
        for (i, row) in input.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                assert_eq!(m[(i, j)], v);
            }
        }
    });
}

#[test]
fn ragged_matrix_maps_nothing() {
    RecordingPages::take_events();
    let err = RoMatrix::<u8, RecordingPages>::new_in(&[vec![1, 2], vec![3]], &mut TestRng::new(7))
        .unwrap_err();
    assert!(!err.is_environment());
    assert!(RecordingPages::take_events().is_empty());
}

#[test]
fn repeated_cycles_do_not_leak() {
    RecordingPages::take_events();
    let mut rng = TestRng::new(8);
    for n in 1..50usize {
        let rows: Vec<Vec<u16>> = (0..n).map(|i| vec![i as u16; n]).collect();
        let m = RoMatrix::<u16, RecordingPages>::new_in(&rows, &mut rng).unwrap();
        assert_eq!(m.rows(), n);
        let s = RoString::<RecordingPages>::new_in(vec![b'a'; n], &mut rng).unwrap();
        assert_eq!(s.len(), n);
    }
    assert_eq!(RecordingPages::live_mappings(), 0);
}
