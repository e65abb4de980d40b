use super::{App, PreviewRequest, PreviewResponse};
use ratatui_image::{picker::Picker, protocol::StatefulProtocol};
use std::path::{Path, PathBuf};
use std::sync::mpsc::SyncSender;

/// Cap on decodes queued at once; navigation outruns the decoder easily.
const PREVIEW_MAX_IN_FLIGHT: usize = 4;

impl App {
    /// Ask the worker for the current file and its neighbours.
    pub fn request_visible_previews(&mut self) {
        let preload = self.config.preview.preload_count as isize;
        let mut paths: Vec<PathBuf> = Vec::new();
        if let Some(current) = self.session.current_path() {
            paths.push(current);
        }
        for offset in 1..=preload {
            for path in [
                self.session.path_at_offset(offset),
                self.session.path_at_offset(-offset),
            ]
            .into_iter()
            .flatten()
            {
                if !paths.contains(&path) {
                    paths.push(path);
                }
            }
        }

        for path in paths {
            self.request_preview(path);
        }
    }

    /// Request a preview to be decoded in background.
    pub fn request_preview(&mut self, path: PathBuf) {
        // Skip if already decoded, decoding or undecodable.
        if self.previews.cache.contains(&path)
            || self.previews.loading.contains(&path)
            || self.previews.failed.contains(&path)
        {
            return;
        }
        if self.previews.loading.len() >= PREVIEW_MAX_IN_FLIGHT {
            return;
        }

        if let Some(tx) = &self.previews.request_tx {
            let request = PreviewRequest {
                path: path.clone(),
                generation: self.previews.generation,
            };
            if tx.try_send(request).is_ok() {
                self.previews.loading.insert(path);
            }
        }
    }

    /// Store a decoded preview from the worker thread.
    pub fn handle_preview_ready(&mut self, response: PreviewResponse) {
        if response.generation != self.previews.generation {
            return;
        }
        self.previews.loading.remove(&response.path);

        if let Some(picker) = &mut self.previews.image_picker {
            let protocol = picker.new_resize_protocol(response.image);
            self.previews.cache.put(response.path, protocol);
        }
    }

    /// Remember a file that failed to decode so it is not retried every frame.
    pub fn handle_preview_failed(&mut self, path: PathBuf) {
        self.previews.loading.remove(&path);
        self.previews.failed.insert(path);
    }

    pub fn preview_failed(&self, path: &Path) -> bool {
        self.previews.failed.contains(path)
    }

    /// Decoded preview for `path`, if ready (also refreshes LRU order).
    pub fn get_preview(&mut self, path: &Path) -> Option<&mut Box<dyn StatefulProtocol>> {
        self.previews.cache.get_mut(path)
    }

    pub fn is_preview_loading(&self, path: &Path) -> bool {
        self.previews.loading.contains(path)
    }

    /// Set the preview request channel.
    pub fn set_preview_channel(&mut self, tx: SyncSender<PreviewRequest>) {
        self.previews.request_tx = Some(tx);
    }

    /// Handle terminal resize: protocol objects are sized for the old
    /// terminal and render garbled if reused.
    pub fn handle_resize(&mut self) {
        self.previews.cache.clear();
        self.previews.loading.clear();
        self.previews.failed.clear();
        self.previews.generation = self.previews.generation.wrapping_add(1);

        let mut picker = Picker::from_termios().unwrap_or_else(|_| Picker::new((8, 16)));
        picker.guess_protocol();
        self.previews.image_picker = Some(picker);
    }
}
