use super::*;
use xiangqi_core::{INF, MATE, Square};

fn entry(depth: u8, lower: i32, upper: i32) -> TtEntry {
    TtEntry {
        depth,
        best_move: Some(Move::new(Square::new(2, 1), Square::new(2, 4))),
        lower,
        upper,
    }
}

#[test]
fn test_entry_packing() {
    let e = entry(7, -INF, MATE - 3);
    let packed = e.pack();
    assert_eq!(packed & 0xffff, (-INF) as i16 as u16 as u64);
    assert_eq!((packed >> 32) & 0xffff, 0x2124);
    assert_eq!((packed >> 48) & 0xff, 7);
    assert_eq!(TtEntry::unpack(packed), Some(e));
    assert_eq!(TtEntry::unpack(0), None);

    let no_move = TtEntry {
        best_move: None,
        ..entry(0, -5, -5)
    };
    assert_eq!(TtEntry::unpack(no_move.pack()), Some(no_move));
    assert!(no_move.is_exact());
}

#[test]
fn test_bucket_store_and_lookup() {
    let mut tt = BucketTable::new(4);
    assert_eq!(tt.capacity(), 64);
    tt.store(0x1234_5678_9abc_def0, entry(3, 10, 20));
    assert_eq!(tt.lookup(0x1234_5678_9abc_def0), Some(entry(3, 10, 20)));
    assert_eq!(tt.lookup(0x1234_5678_9abc_def1), None);
    assert_eq!(tt.len(), 1);

    // Same key overwrites in place.
    tt.store(0x1234_5678_9abc_def0, entry(5, 15, 15));
    assert_eq!(tt.len(), 1);
    assert_eq!(tt.lookup(0x1234_5678_9abc_def0).map(|e| e.depth), Some(5));

    tt.remove(0x1234_5678_9abc_def0);
    assert!(tt.is_empty());
}

#[test]
fn test_bucket_evicts_shallowest() {
    let mut tt = BucketTable::new(2);
    // All of these land in bucket 1.
    let keys: Vec<u64> = (1..=5u64).map(|i| (i << 8) | 1).collect();
    for (i, &k) in keys.iter().take(WAYS).enumerate() {
        tt.store(k, entry(10 - i as u8, 0, 0));
    }
    assert_eq!(tt.len(), WAYS);

    // The depth-7 entry is the shallowest and gets replaced.
    tt.store(keys[4], entry(9, 1, 1));
    assert_eq!(tt.len(), WAYS);
    assert!(tt.lookup(keys[3]).is_none());
    assert!(tt.lookup(keys[0]).is_some());
    assert_eq!(tt.lookup(keys[4]), Some(entry(9, 1, 1)));
}

#[test]
fn test_bucket_rollback_is_byte_identical() {
    let mut tt = BucketTable::new(3);
    for k in 0..20u64 {
        tt.store(k * 0x9e37_79b9, entry((k % 6) as u8, k as i32, k as i32));
    }
    let before = tt.clone();

    tt.checkpoint();
    for k in 0..50u64 {
        tt.store(k * 0x85eb_ca6b, entry((k % 9) as u8, -1, 1));
        tt.remove((k / 2) * 0x9e37_79b9);
    }
    tt.restore(7, Some(entry(2, 3, 4)));
    tt.rollback();

    assert!(tt == before);
    assert_eq!(tt.entries(), before.entries());
}

#[test]
fn test_commit_keeps_writes() {
    let mut tt = BucketTable::new(3);
    tt.checkpoint();
    tt.store(42, entry(1, 0, 0));
    tt.commit();
    tt.rollback();
    assert_eq!(tt.lookup(42), Some(entry(1, 0, 0)));
}

#[test]
fn test_restore_removes_fresh_entries() {
    let mut tt = BucketTable::new(3);
    tt.store(99, entry(4, -3, 8));
    tt.restore(99, None);
    assert_eq!(tt.lookup(99), None);
    tt.restore(99, Some(entry(2, 1, 1)));
    assert_eq!(tt.lookup(99), Some(entry(2, 1, 1)));
}

#[test]
fn test_map_table_rollback() {
    let mut tt = MapTable::new(100);
    tt.store(1, entry(1, 0, 0));
    let before = tt.entries();

    tt.checkpoint();
    tt.store(1, entry(2, 5, 5));
    tt.store(2, entry(2, 5, 5));
    tt.remove(1);
    tt.rollback();

    assert_eq!(tt.entries(), before);
}

#[test]
fn test_map_table_clears_at_limit() {
    let mut tt = MapTable::new(3);
    for k in 0..3 {
        tt.store(k, entry(1, 0, 0));
    }
    assert_eq!(tt.len(), 3);
    // Overwriting an existing key never triggers the wipe.
    tt.store(2, entry(3, 0, 0));
    assert_eq!(tt.len(), 3);

    tt.store(10, entry(1, 0, 0));
    assert_eq!(tt.len(), 1);
    assert!(tt.lookup(0).is_none());
    assert!(tt.lookup(10).is_some());
}

#[test]
fn test_no_table_forgets() {
    let mut tt = NoTable;
    tt.store(5, entry(1, 0, 0));
    assert!(tt.lookup(5).is_none());
    assert!(tt.is_empty());
    assert!(tt.entries().is_empty());
}
