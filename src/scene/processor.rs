//! Background scene processor for non-blocking geometry generation.
//!
//! Moves all CPU-heavy mesh generation off the caller's thread. Requests
//! go in over a channel; finished scenes come back through a triple
//! buffer, so the caller polls without ever blocking on the builder.
//!
//! Queued requests are coalesced: when several rebuilds pile up, only the
//! newest one is built. Each result carries the epoch token of the
//! request that produced it, letting the caller discard results that a
//! newer request has superseded.

use std::sync::mpsc;
use std::sync::Arc;

use log::debug;

use super::builder::{BuiltScene, SceneBuilder};
use super::DisplaySnapshot;
use crate::error::SceneError;
use crate::model::Structure;

/// Work item for the background thread.
#[derive(Debug, Clone)]
pub enum SceneRequest {
    /// Build a full scene for the structure under the given snapshot.
    Rebuild {
        /// Structure to build geometry for.
        structure: Arc<Structure>,
        /// Display parameters for this build.
        snapshot: DisplaySnapshot,
        /// Epoch token echoed back in [`PreparedScene`].
        epoch: u64,
    },
    /// Stop the background thread.
    Shutdown,
}

/// A finished build plus the epoch of the request that produced it.
#[derive(Debug, Clone)]
pub struct PreparedScene {
    /// The assembled scene graph and framing info.
    pub scene: BuiltScene,
    /// Epoch of the originating request.
    pub epoch: u64,
}

/// Background thread that generates scene graphs from structure data.
pub struct SceneProcessor {
    request_tx: mpsc::Sender<SceneRequest>,
    result: triple_buffer::Output<Option<PreparedScene>>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl SceneProcessor {
    /// Spawn the background scene processing thread.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::ThreadSpawn`] if the thread fails to spawn.
    pub fn new() -> Result<Self, SceneError> {
        let (request_tx, request_rx) = mpsc::channel::<SceneRequest>();
        let (result_input, result_output) = triple_buffer::triple_buffer(&None);

        let thread = std::thread::Builder::new()
            .name("scene-processor".into())
            .spawn(move || {
                Self::thread_loop(request_rx, result_input);
            })
            .map_err(SceneError::ThreadSpawn)?;

        Ok(Self {
            request_tx,
            result: result_output,
            thread: Some(thread),
        })
    }

    /// Submit a scene request (non-blocking send).
    pub fn submit(&self, request: SceneRequest) {
        let _ = self.request_tx.send(request);
    }

    /// Non-blocking check for a completed rebuild.
    pub fn try_recv(&mut self) -> Option<PreparedScene> {
        let _ = self.result.update();
        self.result.output_buffer_mut().take()
    }

    /// Shut down the background thread and wait for it to finish.
    pub fn shutdown(&mut self) {
        let _ = self.request_tx.send(SceneRequest::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }

    /// Background thread main loop. Owns its builder, so the geometry and
    /// ribbon caches live for the lifetime of the thread.
    fn thread_loop(
        request_rx: mpsc::Receiver<SceneRequest>,
        mut result_input: triple_buffer::Input<Option<PreparedScene>>,
    ) {
        let mut builder = SceneBuilder::new();

        while let Ok(request) = request_rx.recv() {
            match drain_latest(request, &request_rx) {
                SceneRequest::Shutdown => break,
                SceneRequest::Rebuild {
                    structure,
                    snapshot,
                    epoch,
                } => {
                    debug!(
                        "building scene for {} atoms (epoch {epoch})",
                        structure.atom_count()
                    );
                    let scene = builder.build(&structure, &snapshot);
                    result_input.write(Some(PreparedScene { scene, epoch }));
                }
            }
        }
    }
}

impl Drop for SceneProcessor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Collapse a backlog of queued requests down to the newest one.
/// Shutdown wins outright no matter where it sits in the queue.
fn drain_latest(
    initial: SceneRequest,
    rx: &mpsc::Receiver<SceneRequest>,
) -> SceneRequest {
    let mut latest = initial;
    if matches!(latest, SceneRequest::Shutdown) {
        return latest;
    }
    while let Ok(newer) = rx.try_recv() {
        let stop = matches!(newer, SceneRequest::Shutdown);
        latest = newer;
        if stop {
            break;
        }
    }
    latest
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use glam::Vec3;

    use super::*;
    use crate::model::{Atom, SecondaryStructure};

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn tiny_structure() -> Structure {
        let atom = |id: u32, x: f32| Atom {
            id,
            element: "C".to_owned(),
            name: "CA".to_owned(),
            chain: "A".to_owned(),
            residue_name: "ALA".to_owned(),
            residue_seq: id as i32,
            position: Vec3::new(x, 0.0, 0.0),
            secondary_structure: SecondaryStructure::Unknown,
            is_backbone: true,
            is_ligand: false,
            is_pocket: false,
        };
        Structure {
            atoms: (1..=4).map(|id| atom(id, id as f32 * 1.5)).collect(),
            ..Structure::default()
        }
    }

    fn poll_result(
        processor: &mut SceneProcessor,
        deadline: Duration,
    ) -> Option<PreparedScene> {
        let start = Instant::now();
        while start.elapsed() < deadline {
            if let Some(prepared) = processor.try_recv() {
                return Some(prepared);
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        None
    }

    #[test]
    fn rebuild_request_produces_a_scene() {
        init_logs();
        let mut processor = SceneProcessor::new().unwrap();
        processor.submit(SceneRequest::Rebuild {
            structure: Arc::new(tiny_structure()),
            snapshot: DisplaySnapshot::default(),
            epoch: 7,
        });

        let prepared = poll_result(&mut processor, Duration::from_secs(5))
            .expect("processor should deliver a scene");
        assert_eq!(prepared.epoch, 7);
        assert!(!prepared.scene.root.children.is_empty());
        processor.shutdown();
    }

    #[test]
    fn coalesced_requests_deliver_the_newest_epoch() {
        init_logs();
        let mut processor = SceneProcessor::new().unwrap();
        let structure = Arc::new(tiny_structure());
        for epoch in 1..=5 {
            processor.submit(SceneRequest::Rebuild {
                structure: Arc::clone(&structure),
                snapshot: DisplaySnapshot::default(),
                epoch,
            });
        }

        // The last result to arrive must be the newest epoch; earlier
        // epochs may or may not appear depending on drain timing.
        let mut last_seen = 0;
        let start = Instant::now();
        while start.elapsed() < Duration::from_secs(5) && last_seen < 5 {
            if let Some(prepared) = processor.try_recv() {
                assert!(prepared.epoch >= last_seen);
                last_seen = prepared.epoch;
            } else {
                std::thread::sleep(Duration::from_millis(5));
            }
        }
        assert_eq!(last_seen, 5);
        processor.shutdown();
    }

    #[test]
    fn shutdown_is_idempotent() {
        let mut processor = SceneProcessor::new().unwrap();
        processor.shutdown();
        processor.shutdown();
    }
}
