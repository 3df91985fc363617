use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use glbview_scene::SceneNode;

use crate::AssetError;
use crate::import::parse_model;

/// Bytes read per progress notification.
const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Transfer progress. `total` is zero when the size is not known up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    pub loaded: u64,
    pub total: u64,
}

impl LoadProgress {
    /// Completed fraction in `0.0..=1.0`, or `None` when the total is unknown.
    pub fn fraction(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some((self.loaded as f64 / self.total as f64).min(1.0))
    }

    pub fn percent(&self) -> Option<f64> {
        self.fraction().map(|f| f * 100.0)
    }
}

impl fmt::Display for LoadProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.percent() {
            Some(pct) => write!(f, "{pct:.1}% loaded"),
            None => write!(f, "{} bytes loaded", self.loaded),
        }
    }
}

/// Notifications from an in-flight load, in the order they happen.
/// A load ends with exactly one `Loaded` or `Failed`.
#[derive(Debug)]
pub enum LoadEvent {
    Progress(LoadProgress),
    Loaded(SceneNode),
    Failed(AssetError),
}

impl LoadEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LoadEvent::Progress(_))
    }
}

/// Loads model files off the calling thread.
#[derive(Debug, Clone)]
pub struct AssetLoader {
    chunk_size: usize,
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl AssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Start loading `path` on a background thread and return immediately.
    ///
    /// Events are delivered through the returned handle; nothing touches
    /// the caller's scene until the caller drains them.
    pub fn load(&self, path: impl Into<PathBuf>) -> LoadHandle {
        let path = path.into();
        let (tx, rx) = mpsc::channel();
        let loader = self.clone();
        let thread_path = path.clone();

        let spawned = thread::Builder::new()
            .name("glb-loader".into())
            .spawn(move || {
                let result = loader.load_blocking(&thread_path, |progress| {
                    // A dropped handle means nobody is listening any more.
                    let _ = tx.send(LoadEvent::Progress(progress));
                });
                let _ = tx.send(match result {
                    Ok(node) => LoadEvent::Loaded(node),
                    Err(err) => LoadEvent::Failed(err),
                });
            });

        let mut handle = LoadHandle {
            path,
            receiver: rx,
            pending_failure: None,
            finished: false,
        };
        if let Err(err) = spawned {
            tracing::error!("failed to spawn loader thread: {err}");
            handle.pending_failure = Some(AssetError::Io(err));
        }
        handle
    }

    /// Read and parse `path` on the current thread, reporting progress per chunk.
    pub fn load_blocking(
        &self,
        path: &Path,
        on_progress: impl FnMut(LoadProgress),
    ) -> Result<SceneNode, AssetError> {
        let _span = tracing::info_span!("load_model", path = %path.display()).entered();

        let file = File::open(path)?;
        let total = file.metadata().map(|m| m.len()).unwrap_or(0);
        let bytes = read_with_progress(file, total, self.chunk_size, on_progress)?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model");
        parse_model(&bytes, path.parent(), name)
    }
}

/// Read `reader` to the end in `chunk_size` pieces, reporting after each piece.
///
/// Pass `total = 0` when the length is unknown.
pub fn read_with_progress(
    mut reader: impl Read,
    total: u64,
    chunk_size: usize,
    mut on_progress: impl FnMut(LoadProgress),
) -> io::Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(total as usize);
    let mut chunk = vec![0u8; chunk_size.max(1)];
    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        bytes.extend_from_slice(&chunk[..n]);
        on_progress(LoadProgress {
            loaded: bytes.len() as u64,
            total,
        });
    }
    Ok(bytes)
}

/// Receiving end of a background load.
#[derive(Debug)]
pub struct LoadHandle {
    path: PathBuf,
    receiver: Receiver<LoadEvent>,
    pending_failure: Option<AssetError>,
    finished: bool,
}

impl LoadHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True once the terminal event has been handed out.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Drain every event that is ready without blocking.
    pub fn poll(&mut self) -> Vec<LoadEvent> {
        let mut events = Vec::new();
        if self.finished {
            return events;
        }
        if let Some(err) = self.pending_failure.take() {
            self.finished = true;
            events.push(LoadEvent::Failed(err));
            return events;
        }
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    let terminal = event.is_terminal();
                    events.push(event);
                    if terminal {
                        self.finished = true;
                        break;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.finished = true;
                    events.push(LoadEvent::Failed(AssetError::Disconnected));
                    break;
                }
            }
        }
        events
    }

    /// Block until the load finishes, forwarding progress along the way.
    pub fn wait(
        mut self,
        mut on_progress: impl FnMut(LoadProgress),
    ) -> Result<SceneNode, AssetError> {
        if self.finished {
            return Err(AssetError::Disconnected);
        }
        if let Some(err) = self.pending_failure.take() {
            return Err(err);
        }
        loop {
            match self.receiver.recv() {
                Ok(LoadEvent::Progress(p)) => on_progress(p),
                Ok(LoadEvent::Loaded(node)) => return Ok(node),
                Ok(LoadEvent::Failed(err)) => return Err(err),
                Err(_) => return Err(AssetError::Disconnected),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::box_glb;
    use glam::Vec3;
    use std::io::Write;
    use std::time::{Duration, Instant};

    fn write_box(dir: &Path) -> PathBuf {
        let path = dir.join("box.glb");
        let mut f = File::create(&path).unwrap();
        f.write_all(&box_glb(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(3.0, 1.0, 1.0)))
            .unwrap();
        path
    }

    fn poll_until_done(handle: &mut LoadHandle) -> Vec<LoadEvent> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut events = Vec::new();
        while !handle.is_finished() {
            assert!(Instant::now() < deadline, "load did not finish");
            events.extend(handle.poll());
            std::thread::sleep(Duration::from_millis(1));
        }
        events
    }

    #[test]
    fn unknown_total_has_no_fraction() {
        let p = LoadProgress {
            loaded: 1024,
            total: 0,
        };
        assert_eq!(p.fraction(), None);
        assert_eq!(p.to_string(), "1024 bytes loaded");
    }

    #[test]
    fn known_total_reports_percentage() {
        let p = LoadProgress {
            loaded: 50,
            total: 200,
        };
        assert_eq!(p.fraction(), Some(0.25));
        assert_eq!(p.to_string(), "25.0% loaded");
    }

    #[test]
    fn fraction_is_capped_when_total_was_understated() {
        let p = LoadProgress {
            loaded: 300,
            total: 200,
        };
        assert_eq!(p.fraction(), Some(1.0));
    }

    #[test]
    fn read_with_progress_reports_every_chunk() {
        let data = vec![7u8; 10];
        let mut seen = Vec::new();
        let bytes = read_with_progress(&data[..], 10, 4, |p| seen.push(p.loaded)).unwrap();
        assert_eq!(bytes, data);
        assert_eq!(seen, vec![4, 8, 10]);
    }

    #[test]
    fn read_with_unknown_total_never_reports_a_fraction() {
        let data = vec![1u8; 9];
        let mut fractions = Vec::new();
        read_with_progress(&data[..], 0, 3, |p| fractions.push(p.fraction())).unwrap();
        assert_eq!(fractions, vec![None, None, None]);
    }

    #[test]
    fn background_load_delivers_progress_then_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_box(dir.path());

        let mut handle = AssetLoader::with_chunk_size(64).load(&path);
        let events = poll_until_done(&mut handle);

        let progress: Vec<&LoadProgress> = events
            .iter()
            .filter_map(|e| match e {
                LoadEvent::Progress(p) => Some(p),
                _ => None,
            })
            .collect();
        assert!(progress.len() > 1);
        assert_eq!(progress.last().unwrap().fraction(), Some(1.0));

        match events.last().unwrap() {
            LoadEvent::Loaded(node) => {
                assert_eq!(node.name, "box");
                assert_eq!(node.mesh_count(), 1);
            }
            other => panic!("expected Loaded, got {other:?}"),
        }
        assert!(handle.poll().is_empty());
    }

    #[test]
    fn missing_file_fails_without_panicking() {
        let dir = tempfile::tempdir().unwrap();
        let mut handle = AssetLoader::new().load(dir.path().join("missing.glb"));
        let events = poll_until_done(&mut handle);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], LoadEvent::Failed(AssetError::Io(_))));
    }

    #[test]
    fn corrupt_file_fails_with_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.glb");
        std::fs::write(&path, b"glTF but not really").unwrap();
        let err = AssetLoader::new().load(&path).wait(|_| {}).unwrap_err();
        assert!(matches!(err, AssetError::Gltf(_)));
    }

    #[test]
    fn wait_returns_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_box(dir.path());
        let mut count = 0;
        let node = AssetLoader::new().load(&path).wait(|_| count += 1).unwrap();
        assert!(count >= 1);
        assert_eq!(node.triangle_count(), 12);
    }
}
