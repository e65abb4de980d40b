use crate::alert::Alert;
use crate::gateway::TagGateway;
use crate::session::{Outcome, Session, Task};
use crate::store::SessionStore;
use crate::ui::theme::Theme;
use anyhow::Result;
use crossterm::event;
use lru::LruCache;
use ratatui_image::{picker::Picker, protocol::StatefulProtocol};
use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::mpsc::SyncSender;

mod actions;
mod config;
mod input;
mod previews;
mod runtime;

pub use config::Config;
pub use input::{Prompt, PromptKind};
pub use runtime::run_tui;

/// Request to decode a preview in background
pub struct PreviewRequest {
    pub path: PathBuf,
    pub generation: u64,
}

/// Decoded preview from the worker thread
pub struct PreviewResponse {
    pub path: PathBuf,
    pub image: image::DynamicImage,
    pub generation: u64,
}

/// Events from background threads and tasks
pub enum AppEvent {
    Key(event::KeyEvent),
    PreviewReady(PreviewResponse),
    PreviewFailed(PathBuf),
    Outcome(Outcome),
    Resize,
    Tick,
}

/// Protocol objects kept in memory; each holds an encoded terminal image.
const PREVIEW_CACHE_CAPACITY: usize = 16;

/// UI-related transient state (prompt, help, status line).
pub struct UiState {
    pub should_quit: bool,
    pub show_help: bool,
    pub prompt: Option<Prompt>,
    pub status_message: Option<String>,
    pub theme: Theme,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            should_quit: false,
            show_help: false,
            prompt: None,
            status_message: None,
            theme: Theme::default(),
        }
    }
}

/// Preview rendering state.
pub struct PreviewState {
    pub image_picker: Option<Picker>,
    pub cache: LruCache<PathBuf, Box<dyn StatefulProtocol>>,
    pub loading: HashSet<PathBuf>,
    /// Files that could not be decoded; not requested again.
    pub failed: HashSet<PathBuf>,
    request_tx: Option<SyncSender<PreviewRequest>>,
    generation: u64,
}

impl PreviewState {
    fn new(image_picker: Option<Picker>) -> Self {
        Self {
            image_picker,
            cache: LruCache::new(
                NonZeroUsize::new(PREVIEW_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            ),
            loading: HashSet::new(),
            failed: HashSet::new(),
            request_tx: None,
            generation: 0,
        }
    }
}

/// Where background tag and listing work gets sent.
struct TaskSink {
    runtime: tokio::runtime::Handle,
    events: SyncSender<AppEvent>,
}

pub struct App {
    pub config: Config,
    pub session: Session,
    pub ui: UiState,
    pub alert: Alert,
    pub previews: PreviewState,
    gateway: TagGateway,
    store: Box<dyn SessionStore>,
    sink: Option<TaskSink>,
    /// Tasks produced while no sink is attached.
    deferred: Vec<Task>,
    in_flight: usize,
}

impl App {
    /// Create the app, restoring the previous session from `store`.
    pub fn new(config: Config, gateway: TagGateway, store: Box<dyn SessionStore>) -> Result<Self> {
        let snapshot = store.load()?;
        let (session, effects) = Session::restore(snapshot);

        // from_termios() queries the terminal for font size,
        // guess_protocol() then picks the best graphics protocol.
        let image_picker = Picker::from_termios()
            .ok()
            .map(|mut p| {
                p.guess_protocol();
                p
            })
            .or_else(|| Some(Picker::new((8, 16))));

        let mut app = Self::with_parts(config, gateway, store, session, image_picker);
        app.run_effects(effects);
        Ok(app)
    }

    fn with_parts(
        config: Config,
        gateway: TagGateway,
        store: Box<dyn SessionStore>,
        session: Session,
        image_picker: Option<Picker>,
    ) -> Self {
        let alert = Alert::new(config.alert_duration());
        Self {
            config,
            session,
            ui: UiState::default(),
            alert,
            previews: PreviewState::new(image_picker),
            gateway,
            store,
            sink: None,
            deferred: Vec::new(),
            in_flight: 0,
        }
    }

    /// Route background work through `runtime`, reporting back on `events`.
    /// Work queued before the sink existed is started now.
    pub fn attach(&mut self, runtime: tokio::runtime::Handle, events: SyncSender<AppEvent>) {
        self.sink = Some(TaskSink { runtime, events });
        for task in std::mem::take(&mut self.deferred) {
            self.spawn_task(task);
        }
    }

    /// Whether tag or listing operations are still running.
    pub fn busy(&self) -> bool {
        self.in_flight > 0
    }
}
