use std::sync::Mutex;

use receive::{Clipboard, EncodedImage, ShareSink};

const EMAIL_SUBJECT: &str = "Bitcoin receive address";

/// Hands the address over to the system mail and messaging apps through `mailto:` and `sms:`
/// links. URL schemes cannot carry the QR code, only the address goes through.
#[derive(Debug, Default)]
pub struct UrlShare;

impl UrlShare {
    fn open(&self, url: &str) {
        if let Err(e) = open::that(url) {
            tracing::error!("Failed to open '{}': {}", url, e);
        }
    }
}

impl ShareSink for UrlShare {
    fn send_email(&self, address: &str, image: &EncodedImage) {
        tracing::debug!("Sharing {} by email, dropping {:?}", address, image);
        self.open(&email_url(address));
    }

    fn send_text(&self, address: &str, image: &EncodedImage) {
        tracing::debug!("Sharing {} by text, dropping {:?}", address, image);
        self.open(&text_url(address));
    }
}

pub fn email_url(address: &str) -> String {
    format!(
        "mailto:?subject={}&body={}",
        urlencoding::encode(EMAIL_SUBJECT),
        urlencoding::encode(address)
    )
}

pub fn text_url(address: &str) -> String {
    format!("sms:?&body={}", urlencoding::encode(address))
}

/// Clipboard writes waiting to be turned into an `iced::clipboard::write` task.
#[derive(Debug, Default)]
pub struct ClipboardOutbox {
    pending: Mutex<Option<String>>,
}

impl ClipboardOutbox {
    pub fn take(&self) -> Option<String> {
        self.pending.lock().expect("poisoned").take()
    }
}

impl Clipboard for ClipboardOutbox {
    fn set_text(&self, text: &str) {
        *self.pending.lock().expect("poisoned") = Some(text.to_string());
    }
}
