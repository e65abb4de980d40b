use super::{App, AppEvent, Config, PreviewRequest, PreviewResponse};
use crate::gateway::TagGateway;
use crate::preview::{PreviewCache, PreviewSize};
use crate::session::Action;
use crate::store::SessionStore;
use crate::ui;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::thread;

const PREVIEW_REQUEST_QUEUE_CAPACITY: usize = 64;
const APP_EVENT_QUEUE_CAPACITY: usize = 1024;

pub async fn run_tui(
    config: Config,
    gateway: TagGateway,
    store: Box<dyn SessionStore>,
    start_dir: Option<PathBuf>,
) -> Result<()> {
    let size = PreviewSize {
        width: config.preview.width,
        height: config.preview.height,
        quality: config.preview.quality,
    };
    let mut app = App::new(config, gateway, store)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Bounded queue prevents unlimited backlog during rapid navigation.
    let (preview_tx, preview_rx) =
        mpsc::sync_channel::<PreviewRequest>(PREVIEW_REQUEST_QUEUE_CAPACITY);
    let (event_tx, event_rx) = mpsc::sync_channel::<AppEvent>(APP_EVENT_QUEUE_CAPACITY);

    app.set_preview_channel(preview_tx);

    let event_tx_preview = event_tx.clone();
    let disk_cache = PreviewCache::new(size);
    thread::spawn(move || {
        preview_worker(preview_rx, event_tx_preview, disk_cache);
    });

    let event_tx_input = event_tx.clone();
    thread::spawn(move || {
        input_worker(event_tx_input);
    });

    app.attach(tokio::runtime::Handle::current(), event_tx);
    if let Some(dir) = start_dir {
        app.dispatch(Action::ChangeDirectory(dir));
    }

    // The loop blocks on a std channel; keep it off the async workers.
    let res = tokio::task::block_in_place(|| run_app(&mut terminal, &mut app, event_rx));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

/// Background thread that decodes previews through the disk cache.
fn preview_worker(rx: Receiver<PreviewRequest>, tx: SyncSender<AppEvent>, disk_cache: PreviewCache) {
    while let Ok(first_request) = rx.recv() {
        let requests = collect_latest_requests(first_request, &rx);

        for request in requests {
            let event = match disk_cache.load(&request.path) {
                Ok(image) => AppEvent::PreviewReady(PreviewResponse {
                    path: request.path,
                    image,
                    generation: request.generation,
                }),
                Err(e) => {
                    tracing::warn!(path = %request.path.display(), error = %e, "preview failed");
                    AppEvent::PreviewFailed(request.path)
                }
            };
            if tx.send(event).is_err() {
                return;
            }
        }
    }
}

/// Drain queued requests, keeping only the newest generation once per path.
fn collect_latest_requests(
    first_request: PreviewRequest,
    rx: &Receiver<PreviewRequest>,
) -> Vec<PreviewRequest> {
    let mut latest_generation = first_request.generation;
    let mut order = vec![first_request.path.clone()];
    let mut latest_by_path: HashMap<PathBuf, PreviewRequest> = HashMap::new();
    latest_by_path.insert(first_request.path.clone(), first_request);

    while let Ok(request) = rx.try_recv() {
        if request.generation > latest_generation {
            latest_generation = request.generation;
            latest_by_path.clear();
            order.clear();
        }

        if request.generation == latest_generation {
            if !latest_by_path.contains_key(&request.path) {
                order.push(request.path.clone());
            }
            latest_by_path.insert(request.path.clone(), request);
        }
    }

    // Requests arrive current-file first; decode in that order.
    order
        .into_iter()
        .filter_map(|path| latest_by_path.remove(&path))
        .collect()
}

/// Background thread that polls for input events.
fn input_worker(tx: SyncSender<AppEvent>) {
    loop {
        if event::poll(std::time::Duration::from_millis(50)).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    if tx.send(AppEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    if tx.send(AppEvent::Resize).is_err() {
                        break;
                    }
                }
                _ => {}
            }
        } else {
            match tx.try_send(AppEvent::Tick) {
                Ok(()) | Err(TrySendError::Full(_)) => {}
                Err(TrySendError::Disconnected(_)) => break,
            }
        }
    }
}

/// Collapse a burst of events: ticks merge into one, and only the newest
/// preview generation survives.
fn coalesce_events(events: Vec<AppEvent>) -> Vec<AppEvent> {
    let mut coalesced = Vec::with_capacity(events.len());
    let mut latest_generation: Option<u64> = None;
    let mut previews: Vec<PreviewResponse> = Vec::new();
    let mut saw_tick = false;

    for event in events {
        match event {
            AppEvent::PreviewReady(response) => {
                match latest_generation {
                    None => latest_generation = Some(response.generation),
                    Some(gen) if response.generation > gen => {
                        latest_generation = Some(response.generation);
                        previews.clear();
                    }
                    Some(gen) if response.generation < gen => continue,
                    Some(_) => {}
                }
                previews.retain(|p| p.path != response.path);
                previews.push(response);
            }
            AppEvent::Tick => saw_tick = true,
            other => coalesced.push(other),
        }
    }

    coalesced.extend(previews.into_iter().map(AppEvent::PreviewReady));
    if saw_tick {
        coalesced.push(AppEvent::Tick);
    }
    coalesced
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_rx: Receiver<AppEvent>,
) -> Result<()> {
    let mut needs_redraw = true;

    loop {
        if needs_redraw {
            app.request_visible_previews();
            terminal.draw(|f| ui::draw(f, app))?;
            needs_redraw = false;
        }

        let events: Vec<AppEvent> =
            match event_rx.recv_timeout(std::time::Duration::from_millis(100)) {
                Ok(event) => {
                    let mut events = vec![event];
                    while let Ok(e) = event_rx.try_recv() {
                        events.push(e);
                    }
                    coalesce_events(events)
                }
                Err(mpsc::RecvTimeoutError::Timeout) => continue,
                Err(mpsc::RecvTimeoutError::Disconnected) => return Ok(()),
            };

        for event in events {
            match event {
                AppEvent::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    app.handle_key(key.code);
                    needs_redraw = true;
                }
                AppEvent::PreviewReady(response) => {
                    app.handle_preview_ready(response);
                    needs_redraw = true;
                }
                AppEvent::PreviewFailed(path) => {
                    app.handle_preview_failed(path);
                    needs_redraw = true;
                }
                AppEvent::Outcome(outcome) => {
                    app.handle_outcome(outcome);
                    needs_redraw = true;
                }
                AppEvent::Resize => {
                    app.handle_resize();
                    terminal.clear()?;
                    needs_redraw = true;
                }
                AppEvent::Tick => {
                    if app.tick() {
                        needs_redraw = true;
                    }
                }
            }
        }

        if app.ui.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{coalesce_events, collect_latest_requests};
    use crate::app::{AppEvent, PreviewRequest, PreviewResponse};
    use std::path::PathBuf;
    use std::sync::mpsc;

    fn request(name: &str, generation: u64) -> PreviewRequest {
        PreviewRequest {
            path: PathBuf::from(format!("/tmp/{name}.png")),
            generation,
        }
    }

    fn response(name: &str, generation: u64) -> PreviewResponse {
        PreviewResponse {
            path: PathBuf::from(format!("/tmp/{name}.png")),
            image: image::DynamicImage::new_rgba8(1, 1),
            generation,
        }
    }

    #[test]
    fn collect_latest_requests_keeps_newest_generation_only() {
        let (tx, rx) = mpsc::sync_channel(16);
        tx.send(request("old-a", 1)).expect("send old-a");
        tx.send(request("old-b", 1)).expect("send old-b");
        tx.send(request("new-a", 2)).expect("send new-a");
        tx.send(request("new-b", 2)).expect("send new-b");

        let first = rx.recv().expect("recv first");
        let batch = collect_latest_requests(first, &rx);

        let names: Vec<_> = batch.iter().map(|r| r.path.clone()).collect();
        assert_eq!(
            names,
            vec![PathBuf::from("/tmp/new-a.png"), PathBuf::from("/tmp/new-b.png")]
        );
    }

    #[test]
    fn collect_latest_requests_deduplicates_paths_in_order() {
        let (tx, rx) = mpsc::sync_channel(16);
        tx.send(request("current", 5)).expect("send current");
        tx.send(request("next", 5)).expect("send next");
        tx.send(request("current", 5)).expect("send duplicate");

        let first = rx.recv().expect("recv first");
        let batch = collect_latest_requests(first, &rx);

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].path, PathBuf::from("/tmp/current.png"));
        assert_eq!(batch[1].path, PathBuf::from("/tmp/next.png"));
    }

    #[test]
    fn coalesce_events_keeps_latest_previews_and_one_tick() {
        let events = vec![
            AppEvent::PreviewReady(response("a", 1)),
            AppEvent::Tick,
            AppEvent::Resize,
            AppEvent::PreviewReady(response("b", 2)),
            AppEvent::Tick,
            AppEvent::PreviewReady(response("b", 2)),
            AppEvent::PreviewReady(response("c", 1)),
        ];

        let mut previews = Vec::new();
        let mut ticks = 0;
        let mut resizes = 0;
        for event in coalesce_events(events) {
            match event {
                AppEvent::PreviewReady(r) => previews.push((r.path, r.generation)),
                AppEvent::Tick => ticks += 1,
                AppEvent::Resize => resizes += 1,
                _ => {}
            }
        }

        assert_eq!(previews, vec![(PathBuf::from("/tmp/b.png"), 2)]);
        assert_eq!(ticks, 1);
        assert_eq!(resizes, 1);
    }
}
