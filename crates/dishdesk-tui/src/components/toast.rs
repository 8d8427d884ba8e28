//! New-order toasts and the terminal bell.
//!
//! [`ToastNotifier`] is the [`Notifier`] behind the realtime listener: each
//! new order becomes a toast in the top-right corner, and the audio cue is a
//! BEL written to the terminal.

use std::collections::VecDeque;
use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use dishdesk_core::notify::{Notifier, OrderNotification};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::styles::{Palette, dim_style};
use crate::layout::toast::{MAX_VISIBLE, TTL_SECS, WIDTH};

const BEL: &[u8] = b"\x07";

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub title: String,
    pub message: String,
    pub created: Instant,
}

pub struct ToastNotifier<W: Write = Stdout> {
    toasts: VecDeque<Toast>,
    ttl: Duration,
    bell: W,
}

impl Default for ToastNotifier<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastNotifier<Stdout> {
    pub fn new() -> Self {
        Self::with_bell(io::stdout())
    }
}

impl<W: Write> ToastNotifier<W> {
    /// Ring the bell on `writer` instead of stdout.
    pub fn with_bell(writer: W) -> Self {
        Self {
            toasts: VecDeque::new(),
            ttl: Duration::from_secs(TTL_SECS),
            bell: writer,
        }
    }

    #[cfg(test)]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn push(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.toasts.push_back(Toast {
            title: title.into(),
            message: message.into(),
            created: Instant::now(),
        });
    }

    /// Drop toasts older than the time-to-live.
    pub fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.toasts
            .retain(|toast| now.saturating_duration_since(toast.created) < ttl);
    }

    /// Toasts to draw, oldest first.
    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter().take(MAX_VISIBLE)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    #[cfg(test)]
    pub fn bell(&self) -> &W {
        &self.bell
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let width = WIDTH.min(area.width);
        let mut y = area.y + 1;

        for toast in self.visible() {
            let height = 4u16;
            if y + height > area.y + area.height {
                break;
            }
            let rect = Rect::new(area.x + area.width - width, y, width, height);
            frame.render_widget(Clear, rect);

            let paragraph = Paragraph::new(vec![
                Line::from(Span::styled(
                    toast.message.clone(),
                    Style::default().fg(palette.text),
                )),
                Line::from(Span::styled(
                    format!("{}s ago", toast.created.elapsed().as_secs()),
                    dim_style(palette),
                )),
            ])
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(format!(" {} ", toast.title))
                    .title_style(
                        Style::default()
                            .fg(palette.success)
                            .add_modifier(Modifier::BOLD),
                    )
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.success)),
            )
            .style(Style::default().bg(palette.background));

            frame.render_widget(paragraph, rect);
            y += height;
        }
    }
}

impl<W: Write> Notifier for ToastNotifier<W> {
    fn notify(&mut self, notification: &OrderNotification) {
        self.push("🛎 New order", notification.message());
    }

    fn play_sound(&mut self) -> io::Result<()> {
        self.bell.write_all(BEL)?;
        self.bell.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dishdesk_core::notify::{ChildAdded, OrderNotificationListener};
    use serde_json::json;

    #[test]
    fn test_one_toast_and_bell_per_order() {
        let mut listener = OrderNotificationListener::new(ToastNotifier::with_bell(Vec::new()));

        let first = ChildAdded::new("o-1", json!({"customerName": "Ada", "totalAmount": 12.5}));
        assert!(listener.handle(&first).is_some());
        assert!(listener.handle(&first).is_none());
        assert!(listener.handle(&ChildAdded::new("o-2", json!({}))).is_some());

        let notifier = listener.notifier();
        assert_eq!(notifier.len(), 2);
        assert_eq!(notifier.bell().as_slice(), b"\x07\x07");
        let first_toast = notifier.visible().next().unwrap();
        assert!(first_toast.message.contains("o-1"));
        assert!(first_toast.message.contains("Ada"));
    }

    #[test]
    fn test_sound_off_keeps_toasts() {
        let mut listener = OrderNotificationListener::new(ToastNotifier::with_bell(Vec::new())).with_sound(false);
        listener.handle(&ChildAdded::new("o-1", json!({})));
        assert_eq!(listener.notifier().len(), 1);
        assert!(listener.notifier().bell().is_empty());
    }

    #[test]
    fn test_prune_expires_old_toasts() {
        let mut notifier = ToastNotifier::with_bell(Vec::new()).with_ttl(Duration::from_secs(5));
        notifier.push("Info", "first");
        let later = Instant::now() + Duration::from_secs(10);
        notifier.push("Info", "second");
        notifier.prune(Instant::now());
        assert_eq!(notifier.len(), 2);
        notifier.prune(later);
        assert!(notifier.is_empty());
    }

    #[test]
    fn test_visible_is_capped() {
        let mut notifier = ToastNotifier::with_bell(Vec::new());
        for n in 0..5 {
            notifier.push("Info", format!("toast {}", n));
        }
        let shown: Vec<&str> = notifier.visible().map(|t| t.message.as_str()).collect();
        assert_eq!(shown, vec!["toast 0", "toast 1", "toast 2"]);
    }
}
