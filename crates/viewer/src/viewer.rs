use std::path::PathBuf;

use glbview_assets::{AssetLoader, LoadEvent, LoadHandle, LoadProgress};
use glbview_common::{NodeId, Viewport};
use glbview_input::{OrbitControls, PointerInput};
use glbview_render::{PerspectiveCamera, Renderer};
use glbview_scene::{FitConfig, FitReport, Scene, SceneNode, add_lighting, fit_to_origin};

use crate::config::ViewerConfig;

/// Where the single model load stands.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    /// No load has been started.
    Idle,
    /// A background load is running.
    Loading {
        /// Most recent progress report, if any arrived yet.
        last: Option<LoadProgress>,
    },
    /// The model is attached to the scene.
    Loaded {
        id: NodeId,
        /// `None` when the model had no geometry to fit.
        fit: Option<FitReport>,
    },
    /// The load failed; the scene keeps rendering lights only.
    Failed(String),
}

/// The viewer context: scene, camera, orbit controls and renderer, owned together.
///
/// Everything runs on the thread that owns the viewer. Model loading happens
/// elsewhere and arrives here as [`LoadEvent`]s.
pub struct Viewer<R: Renderer> {
    scene: Scene,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    renderer: R,
    viewport: Viewport,
    fit: FitConfig,
    status: LoadStatus,
    logged_decile: Option<u8>,
}

impl<R: Renderer> Viewer<R> {
    /// Build camera, renderer target, lighting and controls for `viewport`.
    ///
    /// A zero-sized viewport is accepted with a warning; the camera aspect
    /// falls back to a one-pixel height.
    pub fn bootstrap(viewport: Viewport, config: &ViewerConfig, mut renderer: R) -> Self {
        if viewport.is_empty() {
            tracing::warn!(
                width = viewport.width,
                height = viewport.height,
                "viewport is zero-sized at startup"
            );
        }

        let camera = PerspectiveCamera::new(&config.camera, viewport.aspect());
        renderer.set_size(viewport);

        let mut scene = Scene::new();
        add_lighting(&mut scene, &config.lighting);

        let mut controls = OrbitControls::new(config.controls);
        controls.target = config.camera.target;
        controls.set_viewport(viewport);

        let mut viewer = Self {
            scene,
            camera,
            controls,
            renderer,
            viewport,
            fit: config.fit,
            status: LoadStatus::Idle,
            logged_decile: None,
        };
        // Apply distance limits before the first frame is observed.
        viewer.advance_controls();

        tracing::info!(
            width = viewport.width,
            height = viewport.height,
            aspect = viewer.camera.aspect,
            lights = viewer.scene.light_count(),
            "viewer initialized"
        );
        viewer
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// The attached model, once a load has succeeded.
    pub fn model(&self) -> Option<&SceneNode> {
        match self.status {
            LoadStatus::Loaded { id, .. } => self.scene.model(id),
            _ => None,
        }
    }

    pub fn handle_input(&mut self, input: PointerInput) {
        self.controls.handle_input(input);
    }

    /// Ends any drag in progress. A button released while the window is
    /// unfocused is never reported, so the drag would otherwise stay held
    /// and keep auto-rotation paused.
    pub fn focus_lost(&mut self) {
        if self.controls.is_dragging() {
            tracing::debug!("focus lost during drag; releasing");
            self.controls.handle_input(PointerInput::DragEnd);
        }
    }

    /// Start loading the model in the background and return its handle.
    pub fn begin_load(&mut self, loader: &AssetLoader, path: impl Into<PathBuf>) -> LoadHandle {
        let handle = loader.load(path);
        tracing::info!(path = %handle.path().display(), "loading model");
        self.status = LoadStatus::Loading { last: None };
        self.logged_decile = None;
        handle
    }

    /// Apply every load event that is ready. Never blocks.
    pub fn poll_load(&mut self, handle: &mut LoadHandle) {
        for event in handle.poll() {
            self.on_load_event(event);
        }
    }

    pub fn on_load_event(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Progress(progress) => {
                self.log_progress(progress);
                if matches!(self.status, LoadStatus::Idle | LoadStatus::Loading { .. }) {
                    self.status = LoadStatus::Loading {
                        last: Some(progress),
                    };
                }
            }
            LoadEvent::Loaded(node) => {
                self.attach_model(node);
            }
            LoadEvent::Failed(err) => {
                tracing::error!("error loading model: {err}");
                self.status = LoadStatus::Failed(err.to_string());
            }
        }
    }

    /// Frame and attach a loaded model. Only the first model is kept.
    pub fn attach_model(&mut self, mut node: SceneNode) -> Option<NodeId> {
        if let LoadStatus::Loaded { id, .. } = self.status {
            tracing::warn!(existing = %id.short(), name = %node.name, "model already loaded; ignoring");
            return None;
        }

        let fit = fit_to_origin(&mut node, &self.fit);
        let name = node.name.clone();
        let id = self.scene.add_model(node);
        self.status = LoadStatus::Loaded { id, fit };
        tracing::info!(model = %name, id = %id.short(), "model loaded successfully");
        Some(id)
    }

    /// One tick of the render loop: advance the controls, then draw.
    pub fn frame(&mut self) -> R::Output {
        self.advance_controls();
        self.renderer.render(&self.scene, &self.camera)
    }

    /// Match camera and renderer to a new viewport. Returns false if nothing changed.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if viewport == self.viewport {
            return false;
        }
        if viewport.is_empty() {
            tracing::debug!("resized to zero; keeping a one-pixel target");
        }
        self.viewport = viewport;
        self.camera.aspect = viewport.aspect();
        self.camera.update_projection_matrix();
        self.renderer.set_size(viewport);
        self.controls.set_viewport(viewport);
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            aspect = self.camera.aspect,
            "viewport resized"
        );
        true
    }

    fn advance_controls(&mut self) {
        self.camera.position = self.controls.update(self.camera.position);
        self.camera.target = self.controls.target;
    }

    fn log_progress(&mut self, progress: LoadProgress) {
        match progress.percent() {
            Some(pct) => {
                let decile = (pct / 10.0).floor() as u8;
                if self.logged_decile != Some(decile) {
                    self.logged_decile = Some(decile);
                    tracing::info!("{progress}");
                } else {
                    tracing::trace!("{progress}");
                }
            }
            None => tracing::debug!("{progress} (total size unknown)"),
        }
    }
}
