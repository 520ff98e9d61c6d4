use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::{
    address::{Address, AddressSource, EncodedImage},
    coordinator::Action,
    session::{Clipboard, Event, ReceiveSession, ShareChannel, ShareSink},
};

/// Hands out `addr-0`, `addr-1`, ... one per call, like a wallet moving to a fresh address.
#[derive(Debug, Default)]
pub struct MockAddressSource {
    fetches: AtomicUsize,
}

impl MockAddressSource {
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl AddressSource for MockAddressSource {
    fn current_address(&self) -> Address {
        let index = self.fetches.fetch_add(1, Ordering::SeqCst);
        Address::new(format!("addr-{}", index))
    }

    fn encode(&self, address: &Address) -> EncodedImage {
        let mut rgba = address.as_str().as_bytes().to_vec();
        rgba.resize(16, 0);
        EncodedImage::from_rgba(2, rgba)
    }
}

#[derive(Debug, Default)]
pub struct RecordingClipboard {
    texts: Mutex<Vec<String>>,
}

impl RecordingClipboard {
    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

impl Clipboard for RecordingClipboard {
    fn set_text(&self, text: &str) {
        self.texts.lock().unwrap().push(text.to_string());
    }
}

#[derive(Debug, Default)]
pub struct RecordingShareSink {
    sent: Mutex<Vec<(ShareChannel, String, EncodedImage)>>,
}

impl RecordingShareSink {
    pub fn sent(&self) -> Vec<(ShareChannel, String, EncodedImage)> {
        self.sent.lock().unwrap().clone()
    }
}

impl ShareSink for RecordingShareSink {
    fn send_email(&self, address: &str, image: &EncodedImage) {
        self.sent
            .lock()
            .unwrap()
            .push((ShareChannel::Email, address.to_string(), image.clone()));
    }

    fn send_text(&self, address: &str, image: &EncodedImage) {
        self.sent
            .lock()
            .unwrap()
            .push((ShareChannel::Text, address.to_string(), image.clone()));
    }
}

/// Runs the actions emitted by a session on the tokio runtime and feeds the resulting events
/// back, the way the GUI does. Meant to be used with a paused clock.
pub struct Sandbox {
    session: ReceiveSession,
    sender: UnboundedSender<Event>,
    receiver: UnboundedReceiver<Event>,
    pending: usize,
}

impl Sandbox {
    pub fn new(session: ReceiveSession) -> Self {
        let (sender, receiver) = unbounded_channel();
        Self {
            session,
            sender,
            receiver,
            pending: 0,
        }
    }

    pub fn session(&self) -> &ReceiveSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ReceiveSession {
        &mut self.session
    }

    pub fn run(&mut self, actions: Vec<Action>) {
        for action in actions {
            let (delay, event) = match action {
                Action::Animate {
                    handle, duration, ..
                } => (duration, Event::TransitionFinished(handle)),
                Action::ScheduleCollapse(auto) => (auto.delay, Event::AutoCollapseDue(auto)),
            };
            let sender = self.sender.clone();
            self.pending += 1;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let _ = sender.send(event);
            });
        }
    }

    /// Handle the next event, in time order. `None` once nothing is scheduled anymore.
    pub async fn step(&mut self) -> Option<Event> {
        if self.pending == 0 {
            return None;
        }
        let event = self.receiver.recv().await?;
        self.pending -= 1;
        let actions = self.session.handle(event);
        self.run(actions);
        Some(event)
    }

    pub async fn settle(&mut self) {
        while self.step().await.is_some() {}
    }
}
