use super::App;
use crate::session::{parse_tag_input, Action, BrowseState};
use crate::utils::expand_tilde;
use crossterm::event::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Choose the working directory.
    Directory,
    /// Edit the working tag vocabulary.
    WorkingTags,
    /// Edit the tags on the current image.
    ImageTags,
}

impl PromptKind {
    pub fn label(&self) -> &'static str {
        match self {
            PromptKind::Directory => "Directory",
            PromptKind::WorkingTags => "Working tags",
            PromptKind::ImageTags => "Tags on this image",
        }
    }
}

/// Single-line text input shown in the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub buffer: String,
}

impl App {
    /// Open a prompt prefilled with the value it edits.
    pub fn open_prompt(&mut self, kind: PromptKind) {
        let buffer = match kind {
            PromptKind::Directory => self
                .session
                .working_dir()
                .map(|d| d.to_string_lossy().into_owned())
                .unwrap_or_default(),
            PromptKind::WorkingTags => self.session.working_tags().join(", "),
            PromptKind::ImageTags => {
                if self.session.state() == BrowseState::Empty {
                    return;
                }
                self.session.current_tags().join(", ")
            }
        };
        self.ui.prompt = Some(Prompt { kind, buffer });
    }

    /// Close the prompt, turning its contents into an action.
    pub fn submit_prompt(&mut self) {
        let Some(prompt) = self.ui.prompt.take() else {
            return;
        };

        match prompt.kind {
            PromptKind::Directory => {
                let answer = prompt.buffer.trim();
                // Empty answer counts as a cancelled pick.
                if !answer.is_empty() {
                    self.dispatch(Action::ChangeDirectory(expand_tilde(answer)));
                }
            }
            PromptKind::WorkingTags => {
                self.dispatch(Action::UpdateWorkingTags(parse_tag_input(&prompt.buffer)));
            }
            PromptKind::ImageTags => {
                self.dispatch(Action::SetImageTags(parse_tag_input(&prompt.buffer)));
            }
        }
    }

    /// Add or drop the n-th working tag (1-based) on the current image.
    pub fn toggle_working_tag(&mut self, n: usize) {
        if self.session.state() == BrowseState::Empty || n == 0 {
            return;
        }
        let Some(tag) = self.session.working_tags().get(n - 1).cloned() else {
            return;
        };

        let current = self.session.current_tags();
        let tags: Vec<String> = if current.contains(&tag) {
            current.iter().filter(|t| **t != tag).cloned().collect()
        } else {
            current.iter().cloned().chain(std::iter::once(tag)).collect()
        };
        self.dispatch(Action::SetImageTags(tags));
    }

    /// Route a key press to the prompt, the help popup or the browser.
    pub fn handle_key(&mut self, code: KeyCode) {
        if self.ui.show_help {
            if matches!(code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Enter) {
                self.ui.show_help = false;
            }
            return;
        }

        if self.ui.prompt.is_some() {
            match code {
                KeyCode::Esc => self.ui.prompt = None,
                KeyCode::Enter => self.submit_prompt(),
                KeyCode::Backspace => {
                    if let Some(prompt) = &mut self.ui.prompt {
                        prompt.buffer.pop();
                    }
                }
                KeyCode::Char(c) => {
                    if let Some(prompt) = &mut self.ui.prompt {
                        prompt.buffer.push(c);
                    }
                }
                _ => {}
            }
            return;
        }

        // Any key acknowledges the last status message.
        self.ui.status_message = None;

        let kb = &self.config.keybindings;
        if kb.matches(code, &kb.quit) || code == KeyCode::Esc {
            self.ui.should_quit = true;
        } else if kb.matches(code, &kb.next) || code == KeyCode::Right {
            self.dispatch(Action::Next);
        } else if kb.matches(code, &kb.prev) || code == KeyCode::Left {
            self.dispatch(Action::Previous);
        } else if kb.matches(code, &kb.add) || code == KeyCode::Up {
            self.dispatch(Action::AddWorkingTags);
        } else if kb.matches(code, &kb.remove) || code == KeyCode::Down {
            self.dispatch(Action::RemoveWorkingTags);
        } else if kb.matches(code, &kb.open_dir) {
            self.open_prompt(PromptKind::Directory);
        } else if kb.matches(code, &kb.edit_working) {
            self.open_prompt(PromptKind::WorkingTags);
        } else if kb.matches(code, &kb.edit_image) {
            self.open_prompt(PromptKind::ImageTags);
        } else if kb.matches(code, &kb.refresh) {
            self.dispatch(Action::RefreshTags);
        } else {
            match code {
                KeyCode::Char('?') => self.ui.show_help = true,
                KeyCode::Char(c @ '1'..='9') => {
                    self.toggle_working_tag(c as usize - '0' as usize);
                }
                _ => {}
            }
        }
    }
}
