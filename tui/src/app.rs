use std::time::Duration;

use crossterm::event::Event;
use crossterm::event::EventStream;
use crossterm::event::KeyEventKind;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::unbounded_channel;
use tokio_stream::StreamExt;
use toneshift_core::Config;
use toneshift_core::GenerationClient;
use toneshift_core::ToneCatalog;

use crate::app_event::AppEvent;
use crate::app_event::AppEventSender;
use crate::app_state::AppState;
use crate::app_state::Effect;
use crate::clipboard;
use crate::render;

/// How long the "Copied!" acknowledgment stays on screen.
const COPY_ACK_TTL: Duration = Duration::from_secs(2);

enum Input {
    App(AppEvent),
    Terminal(Event),
}

pub(crate) struct App {
    state: AppState,
    client: GenerationClient,
    tx: AppEventSender,
    rx: UnboundedReceiver<AppEvent>,
}

impl App {
    pub(crate) fn new(config: &Config) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            state: AppState::new(ToneCatalog::load(&config.toneshift_home)),
            client: GenerationClient::new(config),
            tx: AppEventSender::new(tx),
            rx,
        }
    }

    pub(crate) async fn run(&mut self, terminal: &mut DefaultTerminal) -> anyhow::Result<()> {
        let mut events = EventStream::new();
        while !self.state.should_exit {
            terminal.draw(|frame| render::draw(frame, &self.state))?;
            let input = tokio::select! {
                Some(event) = self.rx.recv() => Input::App(event),
                Some(event) = events.next() => Input::Terminal(event?),
            };
            match input {
                Input::App(event) => self.state.apply(event),
                Input::Terminal(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    for effect in self.state.handle_key(key) {
                        self.run_effect(effect);
                    }
                }
                Input::Terminal(Event::Paste(pasted)) => self.state.handle_paste(pasted),
                Input::Terminal(_) => {}
            }
        }
        Ok(())
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::StartGeneration { input, tone } => {
                let client = self.client.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = client.generate(&input, &tone).await;
                    tx.send(AppEvent::GenerationComplete(result));
                });
            }
            Effect::CopyToClipboard { text, seq } => match clipboard::copy(&text) {
                Ok(()) => {
                    let tx = self.tx.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(COPY_ACK_TTL).await;
                        tx.send(AppEvent::CopyAckExpired { seq });
                    });
                }
                Err(err) => {
                    tracing::warn!("clipboard copy failed: {err}");
                    self.state.copy_failed(format!("Could not copy to clipboard: {err}"));
                }
            },
        }
    }
}
