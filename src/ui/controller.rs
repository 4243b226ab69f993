use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::gate::{AccessWindow, Evaluation, GateEvent, GatePoller, PollerHandle, SessionContext};
use crate::ui::format;
use crate::ui::frame::EmbeddedFrame;
use crate::ui::keys::Action;
use crate::ui::notification::{Notification, NotificationBanner};
use crate::ui::shell::{Label, UiShell, View};

/// Timing knobs for the page controller
#[derive(Debug, Clone, Copy)]
pub struct ControllerSettings {
    pub poll_interval: Duration,
    pub notification_duration: Duration,
    /// Delay before the welcome page reappears after "back"
    pub back_transition: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            poll_interval: crate::gate::DEFAULT_POLL_INTERVAL,
            notification_duration: crate::ui::notification::DEFAULT_NOTIFICATION_DURATION,
            back_transition: Duration::from_millis(300),
        }
    }
}

/// Which page is in front
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Welcome,
    Dashboard,
}

/// Page controller: owns the session context and drives the shell.
///
/// The welcome/dashboard page switch is handled here directly. The
/// waiting/main switch inside the dashboard follows the gate poller, which
/// runs only while the dashboard page is in front.
pub struct Controller<S: UiShell> {
    shell: S,
    clock: Arc<dyn Clock>,
    window: AccessWindow,
    settings: ControllerSettings,
    session: watch::Sender<SessionContext>,
    page: Page,
    frame: EmbeddedFrame,
    banner: NotificationBanner,
    poller: Option<PollerHandle>,
    welcome_at: Option<Instant>,
}

impl<S: UiShell> Controller<S> {
    pub fn new(
        shell: S,
        clock: Arc<dyn Clock>,
        frame: EmbeddedFrame,
        session: SessionContext,
        settings: ControllerSettings,
    ) -> Self {
        let (session, _) = watch::channel(session);
        Self {
            shell,
            clock,
            window: AccessWindow::STANDARD,
            settings,
            session,
            page: Page::Welcome,
            frame,
            banner: NotificationBanner::new(settings.notification_duration),
            poller: None,
            welcome_at: None,
        }
    }

    pub fn session(&self) -> SessionContext {
        *self.session.borrow()
    }

    /// Put the initial page on screen
    pub fn start(&mut self) {
        self.shell.set_visible(View::Welcome, true);
        self.shell.replace_frame(&self.frame);
        self.update_clocks();
    }

    /// Run until `Quit` arrives or the input channel closes
    pub async fn run(mut self, mut actions: mpsc::Receiver<Action>) -> Result<()> {
        self.start();

        let mut clock_ticker = time::interval(self.settings.poll_interval);
        clock_ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let (gate_tx, mut gate_rx) = mpsc::channel(16);

        loop {
            let dismiss_at = self.banner.expires_at();
            let welcome_at = self.welcome_at;

            tokio::select! {
                _ = clock_ticker.tick() => self.update_clocks(),
                Some(event) = gate_rx.recv() => self.apply_gate_event(&event),
                _ = sleep_until(dismiss_at) => self.dismiss_notification(),
                _ = sleep_until(welcome_at) => self.finish_back(),
                action = actions.recv() => match action {
                    Some(Action::Quit) | None => break,
                    Some(action) => self.handle(action, &gate_tx).await?,
                },
            }
        }

        info!("Shutting down page controller");
        self.stop_poller().await
    }

    /// Apply one user action
    pub async fn handle(&mut self, action: Action, gate_tx: &mpsc::Sender<GateEvent>) -> Result<()> {
        debug!("Action: {:?}", action);
        match action {
            Action::Enter => self.enter(gate_tx),
            Action::Back => self.back().await?,
            Action::Refresh => self.refresh(),
            Action::ToggleOverride => self.toggle_override(),
            Action::Quit => {}
        }
        Ok(())
    }

    fn enter(&mut self, gate_tx: &mpsc::Sender<GateEvent>) {
        if self.page == Page::Dashboard {
            return;
        }
        self.page = Page::Dashboard;
        self.welcome_at = None;

        self.shell.set_visible(View::Welcome, false);
        self.shell.set_visible(View::Dashboard, true);
        self.shell.set_visible(View::BackButton, true);
        self.render_now();

        let poller = GatePoller::new(self.clock.clone(), self.settings.poll_interval).with_window(self.window);
        self.poller = Some(poller.spawn(self.session.subscribe(), gate_tx.clone()));
    }

    async fn back(&mut self) -> Result<()> {
        if self.page == Page::Welcome {
            return Ok(());
        }
        self.page = Page::Welcome;

        self.shell.set_visible(View::Dashboard, false);
        self.shell.set_visible(View::BackButton, false);
        self.welcome_at = Some(Instant::now() + self.settings.back_transition);

        self.stop_poller().await
    }

    /// Second half of "back", once the page transition has played
    pub fn finish_back(&mut self) {
        self.welcome_at = None;
        if self.page == Page::Welcome {
            self.shell.set_visible(View::Waiting, false);
            self.shell.set_visible(View::Main, false);
            self.shell.set_visible(View::Welcome, true);
        }
    }

    fn refresh(&mut self) {
        if self.page != Page::Dashboard {
            debug!("Refresh ignored outside the dashboard page");
            return;
        }
        self.frame = self.frame.refreshed(self.clock.now_utc().timestamp_millis());
        info!(
            "Refreshing visualization (reload #{}): {}",
            self.frame.generation(),
            self.frame.src()
        );
        self.shell.replace_frame(&self.frame);
    }

    fn toggle_override(&mut self) {
        let mut enabled = false;
        self.session.send_modify(|session| {
            enabled = session.toggle_override();
        });
        info!("Developer mode {}", if enabled { "enabled" } else { "disabled" });

        let notification = Notification::override_changed(enabled);
        self.shell.show_notification(&notification);
        self.banner.show(notification, Instant::now());

        if self.page == Page::Dashboard {
            self.render_now();
        }
    }

    /// Hide the notification if its time is up
    pub fn dismiss_notification(&mut self) {
        if self.banner.dismiss_if_due(Instant::now()) {
            self.shell.set_visible(View::Notification, false);
        }
    }

    /// Render a gate evaluation coming from the poller
    pub fn apply_gate_event(&mut self, event: &GateEvent) {
        // Late events from a poller stopped by "back"
        if self.page != Page::Dashboard {
            return;
        }
        self.render_evaluation(&event.evaluation);
    }

    fn render_now(&mut self) {
        let now = self.clock.now();
        let evaluation = self.window.evaluate(&now, &self.session());
        self.render_evaluation(&evaluation);
    }

    fn render_evaluation(&mut self, evaluation: &Evaluation) {
        match evaluation {
            Evaluation::Open => {
                self.shell.set_visible(View::Waiting, false);
                self.shell.set_visible(View::Main, true);
                self.update_status();
            }
            Evaluation::Waiting(countdown) => {
                self.shell.set_visible(View::Main, false);
                self.shell.set_visible(View::Waiting, true);
                self.shell.set_text(Label::Countdown, &countdown.to_string());
            }
        }
    }

    /// Welcome clock and status bar, refreshed every tick regardless of page
    pub fn update_clocks(&mut self) {
        let now = self.clock.now();
        let (time, period) = format::time_12h(&now);
        self.shell.set_text(Label::WelcomeClock, &time);
        self.shell.set_text(Label::WelcomePeriod, period);
        self.shell.set_text(Label::CurrentDate, &format::long_date(&now));
        self.update_status();
    }

    fn update_status(&mut self) {
        let now = self.clock.now();
        self.shell.set_text(Label::StatusTime, &format::status_time(&now));
        self.shell.set_text(Label::StatusDate, &format::long_date(&now));
    }

    async fn stop_poller(&mut self) -> Result<()> {
        if let Some(poller) = self.poller.take() {
            poller.stop().await?;
        }
        Ok(())
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
