//! Walks through every `RingBuffer` operation on a 256-slot byte ring, then
//! streams a few thousand items through a split producer / consumer pair.
//!
//! Run with `RUST_LOG=debug cargo run --example walkthrough` for per-step
//! detail.

use std::error::Error as StdError;
use std::thread;

use arrayring::{Error, RingBuffer};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const SLOTS: usize = 256;

/// Treats a partial transfer as a success and returns how much moved.
fn moved(result: Result<usize, Error>) -> Result<usize, Error> {
    match result {
        Err(Error::InsufficientItems(count)) => {
            debug!(count, "partial transfer");
            Ok(count)
        }
        other => other,
    }
}

fn single_threaded() -> Result<(), Error> {
    let mut ring = RingBuffer::new([0u8; SLOTS])?;
    info!(capacity = ring.capacity(), empty = ring.is_empty(), "ring created");

    let mut put_items = [0u8; SLOTS];
    for (i, item) in put_items.iter_mut().enumerate() {
        *item = (i + 1) as u8;
    }
    let mut get_items = [0u8; SLOTS];

    ring.put(b'a')?;
    info!(items = ring.item_count(), free = ring.free_count(), "put one item");

    let put = ring.put_many(&put_items[..10])?;
    info!(put, "put items");

    let put = moved(ring.put_many(&put_items[10..]))?;
    info!(put, full = ring.is_full(), "put more items than fit");

    let mut peek_items = [0u8; 10];
    let peeked = ring.peek(&mut peek_items, 10)?;
    debug!(?peek_items, "peeked");
    info!(peeked, items = ring.item_count(), "peek leaves the ring untouched");

    let item = ring.get()?;
    info!(item, "got one item");

    let got = ring.get_many(&mut get_items[..10])?;
    info!(got, "got items");

    let got = moved(ring.get_many(&mut get_items[10..]))?;
    info!(got, empty = ring.is_empty(), "got more items than were there");

    ring.reset();

    let block = ring.block_write();
    let block_write_size = block.len();
    block.copy_from_slice(&put_items[..block_write_size]);
    info!(block_write_size, "filled write block");
    let advanced = ring.advance(block_write_size)?;
    info!(advanced, "advanced write cursor");

    let block = ring.block_read();
    let block_read_size = block.len();
    get_items[..block_read_size].copy_from_slice(block);
    info!(block_read_size, "copied read block");
    let skipped = ring.skip(block_read_size)?;
    info!(skipped, empty = ring.is_empty(), "skipped read block");

    Ok(())
}

fn threaded(total: u32) -> Result<(), Error> {
    let mut ring = RingBuffer::<_, u16>::with_counter([0u32; 64])?;
    let (mut producer, mut consumer) = ring.split();

    let received = thread::scope(|s| {
        s.spawn(move || {
            let mut next = 0;
            while next < total {
                let block = producer.block_write();
                let len = block.len().min((total - next) as usize);
                if len == 0 {
                    thread::yield_now();
                    continue;
                }
                for slot in &mut block[..len] {
                    *slot = next;
                    next += 1;
                }
                if let Err(err) = producer.advance(len) {
                    warn!(%err, "advance fell short");
                }
            }
            debug!(sent = next, "producer done");
        });

        let mut received = 0u32;
        let mut out = [0u32; 16];
        while received < total {
            match moved(consumer.get_many(&mut out)) {
                Ok(n) => {
                    for &item in &out[..n] {
                        assert_eq!(item, received, "items out of order");
                        received += 1;
                    }
                }
                Err(Error::Empty) => thread::yield_now(),
                Err(err) => return Err(err),
            }
        }
        Ok(received)
    })?;

    info!(received, "threaded transfer complete");
    Ok(())
}

fn main() -> Result<(), Box<dyn StdError>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    single_threaded()?;
    threaded(5_000)?;
    Ok(())
}
