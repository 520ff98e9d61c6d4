use std::sync::Arc;
use std::time::{Duration, Instant};

use iced::{widget::image, Element, Subscription, Task};
use receive::{
    Action, Address, AutoCollapse, Event, ReceiveSession, ShareChannel, SpacingChange,
    TransitionHandle,
};

use crate::{
    config::Config,
    share::{ClipboardOutbox, UrlShare},
    view,
    wallet::DemoWallet,
};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const IDLE_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub enum Message {
    CopyAddress,
    ToggleShare,
    Share(ShareChannel),
    TransitionFinished(TransitionHandle),
    AutoCollapseDue(AutoCollapse),
    Tick(Instant),
    Deposit,
}

/// Panel animation being rendered.
#[derive(Debug, Clone, Copy)]
pub struct Animation {
    pub handle: TransitionHandle,
    pub started: Instant,
    pub duration: Duration,
    pub spacing: Option<SpacingChange>,
}

impl Animation {
    /// Elapsed share of the animation, in `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }
}

pub struct ReceiveApp {
    session: ReceiveSession,
    wallet: Arc<DemoWallet>,
    clipboard: ClipboardOutbox,
    share: UrlShare,
    animation: Option<Animation>,
    now: Instant,
    qr: (Address, image::Handle),
    qr_size: u32,
    deposit_interval: Option<Duration>,
    deposit_amount: u64,
}

fn qr_handle(session: &ReceiveSession) -> (Address, image::Handle) {
    let encoding = session.current_encoding();
    (
        session.current_address().clone(),
        image::Handle::from_rgba(
            encoding.dimension(),
            encoding.dimension(),
            encoding.rgba().to_vec(),
        ),
    )
}

impl ReceiveApp {
    pub fn new(config: Config) -> (Self, Task<Message>) {
        let wallet = Arc::new(DemoWallet::new(
            config.addresses.clone(),
            config.panels.qr_size,
        ));
        let mut session = ReceiveSession::new(wallet.clone(), &config.panels);
        session.attach(wallet.balances());
        let qr = qr_handle(&session);
        tracing::info!("Receiving on {}", session.current_address());
        (
            Self {
                session,
                wallet,
                clipboard: ClipboardOutbox::default(),
                share: UrlShare,
                animation: None,
                now: Instant::now(),
                qr,
                qr_size: config.panels.qr_size,
                deposit_interval: config.deposit_interval_secs.map(Duration::from_secs),
                deposit_amount: config.deposit_amount,
            },
            Task::none(),
        )
    }

    pub fn title(&self) -> String {
        self.session.title().to_string()
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::CopyAddress => {
                let actions = self.session.copy_address(&self.clipboard);
                let copy = match self.clipboard.take() {
                    Some(text) => iced::clipboard::write(text),
                    None => Task::none(),
                };
                Task::batch([copy, self.perform(actions)])
            }
            Message::ToggleShare => {
                let actions = self.session.toggle_share();
                self.perform(actions)
            }
            Message::Share(channel) => {
                self.session.share_via(channel, &self.share);
                Task::none()
            }
            Message::TransitionFinished(handle) => {
                if self.animation.map(|a| a.handle) == Some(handle) {
                    self.animation = None;
                }
                let actions = self.session.handle(Event::TransitionFinished(handle));
                self.perform(actions)
            }
            Message::AutoCollapseDue(auto) => {
                let actions = self.session.handle(Event::AutoCollapseDue(auto));
                self.perform(actions)
            }
            Message::Tick(now) => {
                self.now = now;
                if self.session.poll_balance() > 0 && &self.qr.0 != self.session.current_address()
                {
                    self.qr = qr_handle(&self.session);
                }
                Task::none()
            }
            Message::Deposit => {
                self.wallet.deposit(self.deposit_amount);
                Task::none()
            }
        }
    }

    /// Turn the session actions into tasks reporting back when due.
    fn perform(&mut self, actions: Vec<Action>) -> Task<Message> {
        let mut tasks = Vec::with_capacity(actions.len());
        for action in actions {
            tasks.push(match action {
                Action::Animate {
                    handle,
                    duration,
                    spacing,
                } => {
                    self.animation = Some(Animation {
                        handle,
                        started: Instant::now(),
                        duration,
                        spacing,
                    });
                    Task::perform(
                        async move { tokio::time::sleep(duration).await },
                        move |_| Message::TransitionFinished(handle),
                    )
                }
                Action::ScheduleCollapse(auto) => Task::perform(
                    async move { tokio::time::sleep(auto.delay).await },
                    move |_| Message::AutoCollapseDue(auto),
                ),
            });
        }
        Task::batch(tasks)
    }

    pub fn view(&self) -> Element<Message> {
        view::receive(
            &self.session,
            &self.qr.1,
            self.qr_size,
            self.animation.as_ref(),
            self.now,
        )
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let ticks = if self.animation.is_some() {
            iced::time::every(FRAME_INTERVAL)
        } else {
            iced::time::every(IDLE_INTERVAL)
        }
        .map(Message::Tick);
        let deposits = match self.deposit_interval {
            Some(interval) => iced::time::every(interval).map(|_| Message::Deposit),
            None => Subscription::none(),
        };
        Subscription::batch([ticks, deposits])
    }
}
