//! Deezer Overlay - menu-bar now-playing companion
//!
//! Mirrors the Deezer desktop app's now-playing state in the menu bar and
//! forwards transport commands to the system media layer.
//!
//! Architecture:
//! - Main thread: runs the winit event loop for proper macOS menu handling
//! - Background thread: polls the window title, reconciles state, resolves
//!   artwork, and executes transport commands

#[cfg(target_os = "macos")]
mod app {
    use deezer_overlay::platform::{NativeTitleSource, TitleSource};
    use deezer_overlay::tray::{TrayAction, TrayManager};
    use deezer_overlay::{NowPlaying, Reconciler, TransportCommand, TransportSink};
    use log::{debug, info, warn};
    use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
    use std::thread;
    use std::time::{Duration, Instant};
    use tray_icon::menu::MenuEvent;
    use winit::application::ApplicationHandler;
    use winit::event::WindowEvent;
    use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
    use winit::window::WindowId;

    /// Steady-state polling interval
    const POLL_INTERVAL: Duration = Duration::from_millis(1500);

    /// Delay before the first tick, so the tray is not blank for a full
    /// interval after launch
    const INITIAL_DELAY: Duration = Duration::from_millis(500);

    /// Events delivered to the main-thread event loop
    #[derive(Debug)]
    enum UserEvent {
        /// A fresh snapshot from the polling worker
        Snapshot(NowPlaying),
        /// Deezer is gone; tear the overlay down
        Shutdown,
        /// Menu event from the tray
        Menu(MenuEvent),
    }

    /// Messages to the polling worker
    enum WorkerMsg {
        Command(TransportCommand),
        Shutdown,
    }

    /// Application state on the main thread
    struct App {
        tray: TrayManager,
        worker_tx: Sender<WorkerMsg>,
        interactive: bool,
    }

    impl App {
        fn handle_action(&mut self, action: TrayAction, event_loop: &ActiveEventLoop) {
            match action {
                TrayAction::Transport(cmd) => {
                    let _ = self.worker_tx.send(WorkerMsg::Command(cmd));
                }
                TrayAction::ToggleInteractive => {
                    self.interactive = !self.interactive;
                    self.tray.set_interactive(self.interactive);
                    info!("interactive mode: {}", self.interactive);
                }
                TrayAction::Quit => {
                    info!("Quit requested, shutting down...");
                    let _ = self.worker_tx.send(WorkerMsg::Shutdown);
                    event_loop.exit();
                }
            }
        }
    }

    impl ApplicationHandler<UserEvent> for App {
        fn resumed(&mut self, _event_loop: &ActiveEventLoop) {
            // Not used for tray-only app
        }

        fn window_event(
            &mut self,
            _event_loop: &ActiveEventLoop,
            _id: WindowId,
            _event: WindowEvent,
        ) {
            // No windows in tray-only app
        }

        fn user_event(&mut self, event_loop: &ActiveEventLoop, event: UserEvent) {
            match event {
                UserEvent::Snapshot(snapshot) => {
                    self.tray.show_snapshot(&snapshot);
                }
                UserEvent::Shutdown => {
                    info!("Deezer is gone, closing the overlay");
                    let _ = self.worker_tx.send(WorkerMsg::Shutdown);
                    event_loop.exit();
                }
                UserEvent::Menu(menu_event) => {
                    if let Some(action) = TrayManager::action_for(&menu_event) {
                        self.handle_action(action, event_loop);
                    }
                }
            }
        }
    }

    /// What ended a wait on the command channel.
    enum WaitOutcome {
        /// The interval elapsed; run the scheduled tick
        Tick,
        /// A play/pause flip needs an immediate out-of-cycle re-poll
        Repoll,
        /// Stop the worker
        Shutdown,
    }

    /// Wait out one polling interval, servicing transport commands as they
    /// arrive. Play/pause flips the reconciler's flag and cuts the wait
    /// short so the next snapshot reflects the flip immediately;
    /// next/previous only forward; the next scheduled tick picks up any
    /// track change.
    fn wait_for_next_tick(
        rx: &Receiver<WorkerMsg>,
        sink: &TransportSink,
        reconciler: &mut Reconciler,
        timeout: Duration,
    ) -> WaitOutcome {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Err(RecvTimeoutError::Timeout) => return WaitOutcome::Tick,
                Err(RecvTimeoutError::Disconnected) | Ok(WorkerMsg::Shutdown) => {
                    return WaitOutcome::Shutdown
                }
                Ok(WorkerMsg::Command(cmd)) => {
                    if !sink.send(cmd) {
                        warn!("transport command {cmd} was not accepted");
                    }
                    if cmd == TransportCommand::PlayPause {
                        reconciler.toggle_play_pause();
                        return WaitOutcome::Repoll;
                    }
                }
            }
        }
    }

    /// Polling worker: owns the reconciler, the title source and the
    /// transport sink, so all mutable state lives on this one thread.
    fn run_worker(proxy: EventLoopProxy<UserEvent>, rx: Receiver<WorkerMsg>) {
        let source = NativeTitleSource::new();
        let sink = TransportSink::new();
        let mut reconciler = Reconciler::new();

        // First tick fires early
        if let WaitOutcome::Shutdown =
            wait_for_next_tick(&rx, &sink, &mut reconciler, INITIAL_DELAY)
        {
            return;
        }

        loop {
            let tick = reconciler.tick(source.read_title());
            debug!("tick: {}", tick.snapshot.status_line());

            let shutdown = tick.shutdown;
            let _ = proxy.send_event(UserEvent::Snapshot(tick.snapshot));

            if shutdown {
                let _ = proxy.send_event(UserEvent::Shutdown);
                return;
            }

            match wait_for_next_tick(&rx, &sink, &mut reconciler, POLL_INTERVAL) {
                WaitOutcome::Shutdown => return,
                WaitOutcome::Tick | WaitOutcome::Repoll => {}
            }
        }
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .format_timestamp(None)
            .init();

        info!("🎵 Deezer Overlay starting...");

        let event_loop = EventLoop::<UserEvent>::with_user_event()
            .build()
            .expect("Failed to create event loop");

        // Wait: no busy loop, the tray only reacts to events
        event_loop.set_control_flow(ControlFlow::Wait);

        let proxy = event_loop.create_proxy();

        // Forward tray menu events into the event loop
        let menu_proxy = event_loop.create_proxy();
        MenuEvent::set_event_handler(Some(move |event| {
            let _ = menu_proxy.send_event(UserEvent::Menu(event));
        }));

        let tray = match TrayManager::new() {
            Ok(t) => t,
            Err(e) => {
                log::error!("Failed to create tray icon: {e}");
                std::process::exit(1);
            }
        };

        info!("✅ Tray initialized");

        let (worker_tx, worker_rx) = mpsc::channel::<WorkerMsg>();

        thread::spawn(move || {
            run_worker(proxy, worker_rx);
        });

        let mut app = App {
            tray,
            worker_tx,
            interactive: false,
        };

        info!("🔄 Running event loop...");
        let _ = event_loop.run_app(&mut app);
    }
}

#[cfg(target_os = "macos")]
fn main() {
    app::run();
}

#[cfg(not(target_os = "macos"))]
fn main() {
    eprintln!("deezer-overlay only runs on macOS (it reads the macOS Deezer app's window title)");
    std::process::exit(1);
}
