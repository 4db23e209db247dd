//! Application state and core logic.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use tokio::runtime::Handle;
use tracing::debug;

use crate::deck::Deck;
use crate::gemini::{GeminiClient, GenerateError};
use crate::panels::{PanelKind, PanelState};

/// Messages delivered back to the UI loop from in-flight request tasks.
pub enum AppMessage {
    GenerationDone {
        kind: PanelKind,
        result: Result<String, GenerateError>,
    },
}

/// Main application state.
pub struct App {
    pub deck: Deck,
    pub code_panel: PanelState,
    pub palette_panel: PanelState,
    /// Panel currently shown as an overlay, if any. Closing a panel does
    /// not cancel its request; the result still renders when it arrives.
    pub focused_panel: Option<PanelKind>,
    client: GeminiClient,
    runtime: Handle,
    message_tx: Sender<AppMessage>,
    message_rx: Receiver<AppMessage>,
}

impl App {
    pub fn new(deck: Deck, client: GeminiClient, runtime: Handle) -> Self {
        let (message_tx, message_rx) = mpsc::channel();
        Self {
            deck,
            code_panel: PanelState::new(PanelKind::Code),
            palette_panel: PanelState::new(PanelKind::Palette),
            focused_panel: None,
            client,
            runtime,
            message_tx,
            message_rx,
        }
    }

    pub fn panel(&self, kind: PanelKind) -> &PanelState {
        match kind {
            PanelKind::Code => &self.code_panel,
            PanelKind::Palette => &self.palette_panel,
        }
    }

    pub fn panel_mut(&mut self, kind: PanelKind) -> &mut PanelState {
        match kind {
            PanelKind::Code => &mut self.code_panel,
            PanelKind::Palette => &mut self.palette_panel,
        }
    }

    /// Open the given panel, or close it if it's already focused.
    pub fn toggle_panel(&mut self, kind: PanelKind) {
        self.focused_panel = if self.focused_panel == Some(kind) {
            None
        } else {
            Some(kind)
        };
    }

    /// Validate the panel's prompt and, if it passes, issue one request on
    /// the runtime. Empty input never reaches the network; a busy panel's
    /// trigger is a no-op.
    pub fn trigger_generation(&mut self, kind: PanelKind) {
        let Some(request) = self.panel_mut(kind).begin() else {
            return;
        };
        let client = self.client.clone();
        let tx = self.message_tx.clone();
        self.runtime.spawn(async move {
            let result = client.generate(&request).await;
            // A send failure means the app is shutting down
            let _ = tx.send(AppMessage::GenerationDone { kind, result });
        });
    }

    /// Drain completed generations and apply them to their panels.
    pub fn poll_generations(&mut self) {
        loop {
            match self.message_rx.try_recv() {
                Ok(AppMessage::GenerationDone { kind, result }) => {
                    debug!(panel = ?kind, ok = result.is_ok(), "generation_done");
                    self.panel_mut(kind).finish(result);
                }
                // App always holds a sender, so only Empty occurs
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
    }

    #[cfg(test)]
    fn test_sender(&self) -> Sender<AppMessage> {
        self.message_tx.clone()
    }
}
