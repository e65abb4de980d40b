use super::{App, AppEvent};
use crate::session::{Action, Effect, Outcome, Task};
use std::time::Instant;

impl App {
    /// Feed a user action through the session and carry out its effects.
    pub fn dispatch(&mut self, action: Action) {
        tracing::debug!(?action, "dispatch");
        let effects = self.session.dispatch(action);
        self.run_effects(effects);
    }

    /// Apply finished background work.
    pub fn handle_outcome(&mut self, outcome: Outcome) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let effects = self.session.apply(outcome);
        self.run_effects(effects);
    }

    pub(super) fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Run(task) => self.spawn_task(task),
                Effect::Persist { key, value } => {
                    if let Err(e) = self.store.save(key, &value) {
                        tracing::warn!(key = key.as_str(), error = %e, "cannot persist session");
                        self.ui.status_message = Some(format!("Saving session: {}", e));
                    }
                }
                Effect::Notify(notice) => {
                    self.alert.show(notice, Instant::now());
                }
                Effect::Report(message) => {
                    self.ui.status_message = Some(message);
                }
            }
        }
    }

    pub(super) fn spawn_task(&mut self, task: Task) {
        let Some(sink) = &self.sink else {
            self.deferred.push(task);
            return;
        };

        let runtime = sink.runtime.clone();
        let events = sink.events.clone();
        let gateway = self.gateway.clone();
        self.in_flight += 1;
        runtime.spawn(async move {
            let outcome = task.perform(&gateway).await;
            // The queue is bounded; wait for room on a blocking thread so a
            // full queue never parks a runtime worker.
            let delivered =
                tokio::task::spawn_blocking(move || events.send(AppEvent::Outcome(outcome))).await;
            // Receiver gone means the UI is shutting down.
            if let Err(e) = delivered {
                tracing::warn!(error = %e, "outcome delivery aborted");
            }
        });
    }

    /// Periodic housekeeping. Returns true if the screen needs a redraw.
    pub fn tick(&mut self) -> bool {
        self.alert.tick(Instant::now())
    }
}
