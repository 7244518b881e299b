use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::time::Instant;

use crate::engine::clipboard::ClipboardSink;
use crate::engine::controller::{ActivityProvider, InteractionController};
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::model::static_pool::IndexPicker;

/// Worker that owns the interaction controller. Runs until every command
/// sender is dropped.
pub struct Engine<P, K, C> {
    rx: Receiver<EngineCommand>,
    tx: Sender<EngineResponse>,
    controller: InteractionController<P, K>,
    clipboard: C,
}

impl<P, K, C> Engine<P, K, C>
where
    P: ActivityProvider,
    K: IndexPicker,
    C: ClipboardSink,
{
    pub fn new(
        rx: Receiver<EngineCommand>,
        tx: Sender<EngineResponse>,
        controller: InteractionController<P, K>,
        clipboard: C,
    ) -> Self {
        Self {
            rx,
            tx,
            controller,
            clipboard,
        }
    }

    pub fn run(&mut self) {
        tracing::info!("engine started");
        self.publish_snapshot();

        loop {
            // a pending confirmation reset bounds how long we may block
            let cmd = match self.controller.confirmation_deadline() {
                Some(deadline) => {
                    let wait = deadline.saturating_duration_since(Instant::now());
                    match self.rx.recv_timeout(wait) {
                        Ok(cmd) => cmd,
                        Err(RecvTimeoutError::Timeout) => {
                            if self.controller.expire_confirmation(Instant::now()) {
                                self.publish_snapshot();
                            }
                            continue;
                        }
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                None => match self.rx.recv() {
                    Ok(cmd) => cmd,
                    Err(_) => break,
                },
            };

            self.handle(cmd);
        }

        tracing::info!("engine stopped");
    }

    fn handle(&mut self, cmd: EngineCommand) {
        match cmd {
            EngineCommand::GenerateActivity => {
                tracing::debug!("generate activity");
                let notices = self.controller.request_new_activity();
                let _ = self
                    .tx
                    .send(EngineResponse::Generated(self.controller.snapshot()));
                for notice in notices {
                    let _ = self.tx.send(EngineResponse::Notice(notice));
                }
            }

            EngineCommand::SetMode(mode) => {
                tracing::debug!(?mode, "set mode");
                self.controller.set_mode(mode);
                self.publish_snapshot();
            }

            EngineCommand::IncrementPlayers => {
                self.controller.increment_players();
                self.publish_snapshot();
            }

            EngineCommand::DecrementPlayers => {
                self.controller.decrement_players();
                self.publish_snapshot();
            }

            EngineCommand::CopyToClipboard => {
                let notice = self
                    .controller
                    .copy_current_to_clipboard(&mut self.clipboard, Instant::now());
                self.publish_snapshot();
                if let Some(notice) = notice {
                    let _ = self.tx.send(EngineResponse::Notice(notice));
                }
            }
        }
    }

    fn publish_snapshot(&self) {
        let _ = self
            .tx
            .send(EngineResponse::Snapshot(self.controller.snapshot()));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::engine::activity_source::{ActivitySource, SourceConfig};
    use crate::engine::clipboard::ClipboardError;
    use crate::engine::llm_client::{GenerationError, GenerationRequest, TextGenerator};
    use crate::model::notice::Notice;
    use crate::model::session::{GameMode, InteractionSnapshot};

    struct Unreachable;

    impl TextGenerator for Unreachable {
        fn generate(&self, _: &GenerationRequest<'_>) -> Result<String, GenerationError> {
            Err(GenerationError::EmptyCompletion)
        }
    }

    struct MemoryClipboard;

    impl ClipboardSink for MemoryClipboard {
        fn write_text(&mut self, _: &str) -> Result<(), ClipboardError> {
            Ok(())
        }
    }

    fn first(_: usize) -> usize {
        0
    }

    fn spawn_engine(
        window: Duration,
    ) -> (mpsc::Sender<EngineCommand>, mpsc::Receiver<EngineResponse>, thread::JoinHandle<()>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            let source = ActivitySource::new(
                SourceConfig {
                    api_key: None,
                    model: "gpt-4o".into(),
                    temperature: 1.0,
                },
                Unreachable,
                first,
            );
            let controller =
                InteractionController::new(source, first).with_confirmation_window(window);
            Engine::new(cmd_rx, resp_tx, controller, MemoryClipboard).run();
        });

        (cmd_tx, resp_rx, handle)
    }

    fn next_snapshot(rx: &mpsc::Receiver<EngineResponse>) -> InteractionSnapshot {
        loop {
            match rx.recv_timeout(Duration::from_secs(5)).expect("engine response") {
                EngineResponse::Snapshot(snapshot) | EngineResponse::Generated(snapshot) => {
                    return snapshot
                }
                EngineResponse::Notice(_) => continue,
            }
        }
    }

    #[test]
    fn back_to_back_requests_are_serialized() {
        let (cmd_tx, resp_rx, handle) = spawn_engine(Duration::from_secs(2));
        let initial = next_snapshot(&resp_rx);
        assert_eq!(initial.current, None);

        cmd_tx.send(EngineCommand::SetMode(GameMode::Multiplayer)).unwrap();
        cmd_tx.send(EngineCommand::IncrementPlayers).unwrap();
        cmd_tx.send(EngineCommand::GenerateActivity).unwrap();
        cmd_tx.send(EngineCommand::GenerateActivity).unwrap();

        next_snapshot(&resp_rx);
        next_snapshot(&resp_rx);
        let after_first = next_snapshot(&resp_rx);
        let after_second = next_snapshot(&resp_rx);
        assert_eq!(after_first, after_second);

        for snapshot in [&after_first, &after_second] {
            assert!(!snapshot.busy);
            assert_eq!(snapshot.retry_count, 0);
            assert_eq!(snapshot.players.get(), 3);
            let current = snapshot.current.as_ref().unwrap();
            assert_eq!(current.title, "Reverse Order Day");
            // already mentions "people", so no prefix
            assert!(!current.description.starts_with("With 3 people"));
        }

        drop(cmd_tx);
        handle.join().unwrap();
    }

    #[test]
    fn copied_flag_is_cleared_by_the_worker() {
        let (cmd_tx, resp_rx, handle) = spawn_engine(Duration::from_millis(50));
        next_snapshot(&resp_rx);

        cmd_tx.send(EngineCommand::GenerateActivity).unwrap();
        next_snapshot(&resp_rx);

        cmd_tx.send(EngineCommand::CopyToClipboard).unwrap();
        let wait = Duration::from_secs(5);

        match resp_rx.recv_timeout(wait).unwrap() {
            EngineResponse::Snapshot(snapshot) => assert!(snapshot.copied),
            _ => panic!("expected snapshot first"),
        }
        match resp_rx.recv_timeout(wait).unwrap() {
            EngineResponse::Notice(notice) => assert_eq!(notice, Notice::copied()),
            _ => panic!("expected copy notice"),
        }
        // published by the worker once the window elapses, with no command sent
        match resp_rx.recv_timeout(wait).unwrap() {
            EngineResponse::Snapshot(snapshot) => assert!(!snapshot.copied),
            _ => panic!("expected reverted snapshot"),
        }

        drop(cmd_tx);
        handle.join().unwrap();
    }
}
