use video::{BufferPool, SlotState, VideoError};

fn pool(slots: usize) -> BufferPool<Vec<u8>> {
    let mut pool = BufferPool::new();
    for i in 0..slots {
        pool.push(vec![i as u8; 16]);
    }
    pool
}

#[test]
fn test_slot_lifecycle() {
    let mut pool = pool(2);
    assert_eq!(pool.state(0), Some(SlotState::Idle));

    pool.mark_queued(0).unwrap();
    assert_eq!(pool.state(0), Some(SlotState::Queued));
    pool.mark_dequeued(0).unwrap();
    assert_eq!(pool.state(0), Some(SlotState::Dequeued));
    assert_eq!(pool.frame(0, 4).unwrap(), &[0, 0, 0, 0]);
    pool.mark_queued(0).unwrap();

    pool.mark_all_idle();
    assert_eq!(pool.state(0), Some(SlotState::Idle));
}

#[test]
fn test_queued_slot_is_not_readable() {
    let mut pool = pool(1);
    pool.mark_queued(0).unwrap();

    assert!(matches!(pool.frame(0, 4), Err(VideoError::Buffer { index: 0, .. })));
    assert!(pool.mark_queued(0).is_err());
}

#[test]
fn test_dequeue_without_queue_fails() {
    let mut pool = pool(1);
    assert!(pool.mark_dequeued(0).is_err());
}

#[test]
fn test_index_out_of_range() {
    let mut pool = pool(2);
    assert!(pool.mark_queued(2).is_err());
    assert_eq!(pool.state(2), None);
    assert!(pool.frame(7, 1).is_err());
}

#[test]
fn test_bytes_used_beyond_mapping() {
    let mut pool = pool(2);
    pool.mark_queued(1).unwrap();
    pool.mark_dequeued(1).unwrap();

    assert_eq!(pool.frame(1, 16).unwrap().len(), 16);
    assert!(pool.frame(1, 17).is_err());
}

#[test]
fn test_clear_empties_pool() {
    let mut pool = pool(3);
    assert_eq!(pool.len(), 3);
    assert_eq!(pool.indices().collect::<Vec<_>>(), vec![0, 1, 2]);

    pool.clear();

    assert!(pool.is_empty());
}
