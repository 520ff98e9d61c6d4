use std::time::Instant;

use iced::{
    alignment::Horizontal,
    widget::{button, column, container, image, row, text, Space},
    Alignment, Element, Length,
};
use receive::{PanelId, PanelState, ReceiveSession, ShareChannel};

use crate::app::{Animation, Message};

const COPIED_PANEL_HEIGHT: f32 = 32.0;
const SHARE_PANEL_HEIGHT: f32 = 56.0;
const BUTTON_HEIGHT: f32 = 65.0;

/// Current height of a panel, following the animation while it transitions.
fn panel_height(
    session: &ReceiveSession,
    id: PanelId,
    animation: Option<&Animation>,
    now: Instant,
    full: f32,
) -> f32 {
    match session.panels().panel(id).state() {
        PanelState::Collapsed => 0.0,
        PanelState::Expanded => full,
        PanelState::Expanding | PanelState::Collapsing => animation
            .filter(|a| a.handle.panel() == id)
            .map(|a| {
                let progress = a.progress(now);
                if a.handle.is_expanding() {
                    full * progress
                } else {
                    full * (1.0 - progress)
                }
            })
            .unwrap_or(0.0),
    }
}

fn share_spacing(session: &ReceiveSession, animation: Option<&Animation>, now: Instant) -> f32 {
    animation
        .and_then(|a| a.spacing.map(|s| s.at(a.progress(now))))
        .unwrap_or_else(|| session.panels().spacing().current())
}

pub fn receive<'a>(
    session: &'a ReceiveSession,
    qr: &'a image::Handle,
    qr_size: u32,
    animation: Option<&Animation>,
    now: Instant,
) -> Element<'a, Message> {
    let locked = session.panels().is_locked();
    let copied = session.panels().panel(PanelId::CopyConfirmation);
    let share = session.panels().panel(PanelId::Share);

    let copied_message: Element<'a, Message> = if copied.content_visible() {
        text("Copied to clipboard.").size(14).into()
    } else {
        Space::with_height(Length::Shrink).into()
    };

    let share_options: Element<'a, Message> = if share.content_visible() {
        let enabled = share.is_expanded();
        row![
            button(text("Email"))
                .on_press_maybe(enabled.then_some(Message::Share(ShareChannel::Email)))
                .style(button::secondary)
                .width(Length::Fill),
            text("or").size(16),
            button(text("Text"))
                .on_press_maybe(enabled.then_some(Message::Share(ShareChannel::Text)))
                .style(button::secondary)
                .width(Length::Fill),
        ]
        .spacing(16)
        .padding(5)
        .align_y(Alignment::Center)
        .into()
    } else {
        Space::with_height(Length::Shrink).into()
    };

    column![
        text(session.title()).size(20),
        Space::with_height(Length::Fixed(24.0)),
        button(
            column![
                image(qr.clone())
                    .width(Length::Fixed(qr_size as f32))
                    .height(Length::Fixed(qr_size as f32)),
                text(session.current_address().as_str()).size(14),
            ]
            .spacing(8)
            .align_x(Alignment::Center),
        )
        .on_press_maybe((!locked).then_some(Message::CopyAddress))
        .style(button::text),
        container(copied_message)
            .width(Length::Fill)
            .height(Length::Fixed(panel_height(
                session,
                PanelId::CopyConfirmation,
                animation,
                now,
                COPIED_PANEL_HEIGHT,
            )))
            .align_x(Horizontal::Center)
            .clip(true),
        Space::with_height(Length::Fill),
        button(text("Share").width(Length::Fill).align_x(Horizontal::Center))
            .on_press_maybe((!locked).then_some(Message::ToggleShare))
            .width(Length::Fill)
            .height(Length::Fixed(BUTTON_HEIGHT)),
        Space::with_height(Length::Fixed(share_spacing(session, animation, now))),
        container(share_options)
            .width(Length::Fill)
            .height(Length::Fixed(panel_height(
                session,
                PanelId::Share,
                animation,
                now,
                SHARE_PANEL_HEIGHT,
            )))
            .clip(true),
    ]
    .padding(20)
    .align_x(Alignment::Center)
    .into()
}
