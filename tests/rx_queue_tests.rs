//! Receive queue tests

use serial_cw_keyer::rx_queue::{RxFull, RxQueue, RX_QUEUE_SIZE};

#[test]
fn test_fifo_up_to_capacity() {
    let q: RxQueue = RxQueue::new();
    let input: Vec<u8> = (0..RX_QUEUE_SIZE).map(|i| b'A' + (i % 26) as u8).collect();

    for &b in &input {
        q.push(b).unwrap();
    }
    assert!(q.is_full());
    assert_eq!(q.len(), RX_QUEUE_SIZE);

    let output: Vec<u8> = std::iter::from_fn(|| q.pop()).collect();
    assert_eq!(output, input);
    assert!(q.is_empty());
}

#[test]
fn test_overflow_refuses_and_returns_byte() {
    let q = RxQueue::<4>::new();
    for b in b"abcd" {
        q.push(*b).unwrap();
    }

    assert_eq!(q.push(b'e'), Err(RxFull(b'e')));
    assert_eq!(q.rejected(), 1);

    // Nothing queued was overwritten
    let out: Vec<u8> = std::iter::from_fn(|| q.pop()).collect();
    assert_eq!(out, b"ABCD");
}

#[test]
fn test_wraps_around() {
    let q = RxQueue::<4>::new();
    for round in 0..10u8 {
        q.push(b'a' + round).unwrap();
        q.push(b'0' + round).unwrap();
        q.push(b'/').unwrap();
        assert_eq!(q.pop(), Some(b'A' + round));
        assert_eq!(q.pop(), Some(b'0' + round));
        assert_eq!(q.pop(), Some(b'/'));
        assert_eq!(q.pop(), None);
    }
    assert_eq!(q.rejected(), 0);
}

#[test]
fn test_case_folding_only_touches_letters() {
    let q = RxQueue::<8>::new();
    for b in b"a Z?1" {
        q.push(*b).unwrap();
    }
    let out: Vec<u8> = std::iter::from_fn(|| q.pop()).collect();
    assert_eq!(out, b"A Z?1");
}

#[test]
fn test_threaded_producer_consumer_no_loss() {
    use std::sync::Arc;
    use std::thread;

    const COUNT: usize = 20_000;
    let q = Arc::new(RxQueue::<16>::new());

    let producer = {
        let q = Arc::clone(&q);
        thread::spawn(move || {
            for i in 0..COUNT {
                let mut b = b'0' + (i % 10) as u8;
                // Backpressure: retry until the consumer makes room
                while let Err(RxFull(refused)) = q.push(b) {
                    b = refused;
                    thread::yield_now();
                }
            }
        })
    };

    let mut received = Vec::with_capacity(COUNT);
    while received.len() < COUNT {
        match q.pop() {
            Some(b) => received.push(b),
            None => thread::yield_now(),
        }
    }
    producer.join().unwrap();

    for (i, &b) in received.iter().enumerate() {
        assert_eq!(b, b'0' + (i % 10) as u8, "byte {}", i);
    }
    assert!(q.is_empty());
}

#[test]
fn test_len_from_third_thread_never_overshoots() {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;

    const COUNT: usize = 50_000;
    const DEPTH: usize = 4;
    let q = Arc::new(RxQueue::<64>::new());
    let done = Arc::new(AtomicBool::new(false));

    // Producer never lets more than DEPTH bytes queue up
    let producer = {
        let q = Arc::clone(&q);
        thread::spawn(move || {
            for i in 0..COUNT {
                while q.len() >= DEPTH {
                    thread::yield_now();
                }
                q.push(b'A' + (i % 26) as u8).unwrap();
            }
        })
    };

    // Console-style reader
    let observer = {
        let q = Arc::clone(&q);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut max = 0;
            while !done.load(Ordering::Relaxed) {
                max = max.max(q.len());
            }
            max
        })
    };

    let mut popped = 0;
    while popped < COUNT {
        if q.pop().is_some() {
            popped += 1;
        }
    }
    producer.join().unwrap();
    done.store(true, Ordering::Relaxed);

    assert!(observer.join().unwrap() <= DEPTH);
    assert!(q.is_empty());
}
