//! Application State
//!
//! `App` holds the latest [`SessionView`] published by the runtime and the
//! transient inline error. Everything else lives in the runtime thread.
//!
//! # MVU Loop
//!
//! 1. Drain updates from the runtime (non-blocking), clearing page inputs
//!    when the connection state changed
//! 2. Drop the inline error once it expired
//! 3. Render the page for the current connection state
//! 4. Handle the UI command the page returned, if any

use crate::components::InlineError;
use crate::config::AppConfig;
use crate::events::UiCommand;
use crate::pages::{self, Chat, Connecting, Start};
use logging::Logger;
use session::{Command, ConnectionState, SessionView, Update};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, channel};
use std::thread::JoinHandle;
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};

pub struct App {
    pub(super) logger: Logger,
    pub(super) view: SessionView,
    pub(super) inline_error: Option<InlineError>,

    // Session runtime communication
    pub(super) commands: UnboundedSender<Command>,
    pub(super) updates: Receiver<Update>,
    runtime_thread: Option<JoinHandle<()>>,
}

impl App {
    pub fn new(
        ctx: &egui::Context,
        config: &AppConfig,
        logger: Logger,
        launch_code: Option<String>,
    ) -> Self {
        logger.info("[APP] Initializing application...");
        logger.info(&format!(
            "[APP] Configuration loaded - relay: {}, log_level: {}",
            config.relay_url, config.log_level
        ));

        let (commands, command_rx) = unbounded_channel();
        let (update_tx, updates) = channel();

        let repaint_ctx = ctx.clone();
        let notify: session::Notify = Arc::new(move || repaint_ctx.request_repaint());
        let runtime_config = config.runtime_config();
        let runtime_logger = logger
            .for_component("Session")
            .unwrap_or_else(|_| logger.clone());

        logger.info("[APP] Starting session runtime thread...");
        let runtime_thread = std::thread::Builder::new()
            .name("session-runtime".to_string())
            .spawn(move || {
                let thread_logger = runtime_logger.clone();
                if let Err(e) = session::run(
                    runtime_config,
                    launch_code,
                    command_rx,
                    update_tx,
                    notify,
                    runtime_logger,
                ) {
                    thread_logger.error(&format!("[APP] Session runtime failed: {}", e));
                }
            });
        let runtime_thread = match runtime_thread {
            Ok(handle) => Some(handle),
            Err(e) => {
                logger.error(&format!("[APP] Cannot spawn session runtime: {}", e));
                None
            }
        };

        Self {
            logger,
            view: SessionView::placeholder(),
            inline_error: None,
            commands,
            updates,
            runtime_thread,
        }
    }

    pub(super) fn show_error(&mut self, message: String) {
        self.logger.warn(&format!("[APP] {}", message));
        self.inline_error = Some(InlineError::new(message));
    }

    fn render_view(&mut self, ctx: &egui::Context) -> Option<UiCommand> {
        let error = self.inline_error.as_ref();
        let view = &self.view;
        let mut command = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            command = match view.connection {
                ConnectionState::Idle => Start::show(ui, view, error),
                ConnectionState::Connecting => Connecting::show(ui, view, error),
                ConnectionState::Connected => Chat::show(ui, view, error),
            };
        });

        command
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let shown = self.view.connection;
        while let Ok(update) = self.updates.try_recv() {
            self.handle_logic_event(update);
        }
        if self.view.connection != shown {
            pages::reset_inputs(ctx);
        }

        if self.inline_error.as_ref().is_some_and(InlineError::is_expired) {
            self.inline_error = None;
        }

        if let Some(command) = self.render_view(ctx) {
            self.handle_ui_command(command);
        }

        if let Some(error) = &self.inline_error {
            ctx.request_repaint_after(error.remaining());
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.logger.info("[APP] Application shutting down...");
        let _ = self.commands.send(Command::Shutdown);
        if let Some(handle) = self.runtime_thread.take()
            && handle.join().is_err()
        {
            self.logger.error("[APP] Session runtime panicked");
        }
        self.logger.info("[APP] Cleanup complete, goodbye!");
    }
}
