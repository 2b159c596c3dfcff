//! Background chunk generation on a configurable worker pool.
//!
//! Offloads the `O(chunk_size^2)` generation cost to worker threads so an
//! interactive consumer can keep querying already-cached terrain while new
//! chunks arrive. Completed chunks are delivered over a bounded channel and
//! are meant to be installed with [`World::insert_generated`].
//!
//! Generation of distinct coordinates has no shared mutable state, so any
//! number may run concurrently. A coordinate that is already pending is
//! rejected on re-submission, extending the world's at-most-once discipline
//! to the streaming path.
//!
//! [`World::insert_generated`]: crate::World::insert_generated

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, bounded};
use dashmap::DashMap;

use veld_terrain::{BuildSettings, Chunk, ChunkCoord, GenerateError};

/// A fully generated chunk (or its generation failure) ready for delivery.
#[derive(Debug)]
pub struct StreamedChunk {
    /// The coordinate this result answers for.
    pub coord: ChunkCoord,
    /// The generated chunk, or the error that stopped generation.
    pub result: Result<Chunk, GenerateError>,
    /// Time spent inside the generation algorithm, in microseconds.
    pub generation_time_us: u64,
}

/// Internal wrapper carrying a queued coordinate and its cancellation flag.
struct PendingTask {
    coord: ChunkCoord,
    cancelled: Arc<AtomicBool>,
}

/// Manages background chunk generation across a pool of worker threads.
///
/// Tasks are served in submission order; a caller that wants nearby chunks
/// first submits them first.
pub struct ChunkStreamer {
    task_sender: Sender<PendingTask>,
    result_receiver: Receiver<StreamedChunk>,
    /// Cancellation flag per pending coordinate.
    pending: Arc<DashMap<ChunkCoord, Arc<AtomicBool>>>,
    /// Current number of queued or executing tasks.
    in_flight: Arc<AtomicU64>,
}

impl ChunkStreamer {
    /// Create a streamer with the specified pool geometry.
    ///
    /// # Arguments
    /// - `settings`: build settings shared by every generated chunk.
    /// - `chunk_size`: edge length of generated chunks, matching the world
    ///   the results are installed into.
    /// - `thread_count`: number of worker threads.
    /// - `max_concurrent`: maximum in-flight tasks; excess submissions are
    ///   rejected.
    /// - `result_capacity`: bounded capacity of the completed-chunk channel.
    pub fn new(
        settings: BuildSettings,
        chunk_size: u32,
        thread_count: usize,
        max_concurrent: usize,
        result_capacity: usize,
    ) -> Self {
        let (task_sender, task_receiver) = bounded::<PendingTask>(max_concurrent.max(1) * 2);
        let (result_sender, result_receiver) = bounded::<StreamedChunk>(result_capacity.max(1));
        let in_flight = Arc::new(AtomicU64::new(0));

        for _ in 0..thread_count.max(1) {
            let receiver = task_receiver.clone();
            let sender = result_sender.clone();
            let in_flight = Arc::clone(&in_flight);

            std::thread::Builder::new()
                .name("chunk-stream-worker".into())
                .spawn(move || {
                    while let Ok(ptask) = receiver.recv() {
                        // Check cancellation before starting work.
                        if ptask.cancelled.load(Ordering::Relaxed) {
                            in_flight.fetch_sub(1, Ordering::Relaxed);
                            continue;
                        }

                        let start = Instant::now();
                        let result = Chunk::generate(ptask.coord, chunk_size, &settings);
                        let elapsed = start.elapsed().as_micros() as u64;

                        if let Err(ref err) = result {
                            tracing::error!(
                                cx = ptask.coord.x,
                                cz = ptask.coord.z,
                                %err,
                                "chunk generation failed"
                            );
                        }

                        // Check cancellation again after generation.
                        if !ptask.cancelled.load(Ordering::Relaxed) {
                            let _ = sender.send(StreamedChunk {
                                coord: ptask.coord,
                                result,
                                generation_time_us: elapsed,
                            });
                        }

                        in_flight.fetch_sub(1, Ordering::Relaxed);
                    }
                })
                .expect("failed to spawn chunk streaming worker thread");
        }

        Self {
            task_sender,
            result_receiver,
            pending: Arc::new(DashMap::new()),
            in_flight,
        }
    }

    /// Create a streamer with a thread count based on available CPU cores,
    /// leaving headroom for the caller's own threads.
    pub fn with_defaults(settings: BuildSettings, chunk_size: u32) -> Self {
        let cpus = num_cpus::get().max(2);
        let threads = (cpus - 2).max(1);
        Self::new(settings, chunk_size, threads, 64, 128)
    }

    /// Submit a coordinate for background generation.
    ///
    /// Returns `Err(coord)` without queueing if the coordinate is already
    /// pending or the task queue is full.
    pub fn submit(&self, coord: ChunkCoord) -> Result<(), ChunkCoord> {
        if self.pending.contains_key(&coord) {
            return Err(coord);
        }

        let cancelled = Arc::new(AtomicBool::new(false));
        self.pending.insert(coord, Arc::clone(&cancelled));
        self.in_flight.fetch_add(1, Ordering::Relaxed);

        let ptask = PendingTask { coord, cancelled };
        self.task_sender.try_send(ptask).map_err(|_| {
            self.in_flight.fetch_sub(1, Ordering::Relaxed);
            self.pending.remove(&coord);
            coord
        })
    }

    /// Cancel a pending or in-progress task.
    ///
    /// If the chunk has already been delivered, this is a no-op.
    pub fn cancel(&self, coord: &ChunkCoord) {
        if let Some((_, cancelled)) = self.pending.remove(coord) {
            cancelled.store(true, Ordering::Relaxed);
        }
    }

    /// Drain all completed chunks from the result channel.
    ///
    /// Never blocks; returns whatever has finished since the last drain.
    pub fn drain_results(&self) -> Vec<StreamedChunk> {
        let mut results = Vec::new();
        while let Ok(chunk) = self.result_receiver.try_recv() {
            self.pending.remove(&chunk.coord);
            results.push(chunk);
        }
        results
    }

    /// Number of tasks currently queued or executing.
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Whether a task for `coord` is currently pending.
    pub fn is_pending(&self, coord: &ChunkCoord) -> bool {
        self.pending.contains_key(coord)
    }
}
