//! Notifier and confirmation gate backed by the UI's action channel.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::action::Action;
use crate::controller::{ConfirmationGate, Notice, Notifier};

/// Posts toasts to the UI loop.
#[derive(Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Action>,
}

impl ChannelNotifier {
    pub fn new(tx: mpsc::UnboundedSender<Action>) -> Self {
        Self { tx }
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        if self.tx.send(Action::Notify(notice)).is_err() {
            tracing::debug!("notice dropped, ui has shut down");
        }
    }
}

/// Opens the confirm modal and waits for the user's answer.
#[derive(Clone)]
pub struct ModalGate {
    tx: mpsc::UnboundedSender<Action>,
}

impl ModalGate {
    pub fn new(tx: mpsc::UnboundedSender<Action>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl ConfirmationGate for ModalGate {
    async fn confirm(&self, prompt: &str) -> bool {
        let (reply, answer) = oneshot::channel();
        let request = Action::RequestConfirm {
            prompt: prompt.to_string(),
            reply,
        };
        if self.tx.send(request).is_err() {
            return false;
        }
        // A modal closed without answering drops the sender.
        answer.await.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::NoticeLevel;

    #[tokio::test]
    async fn gate_resolves_with_modal_answer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let gate = ModalGate::new(tx);

        let pending = tokio::spawn(async move { gate.confirm("Delete?").await });
        match rx.recv().await {
            Some(Action::RequestConfirm { prompt, reply }) => {
                assert_eq!(prompt, "Delete?");
                reply.send(true).unwrap();
            }
            other => panic!("unexpected action: {:?}", other),
        }
        assert!(pending.await.unwrap());
    }

    #[tokio::test]
    async fn dropped_modal_counts_as_cancel() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let gate = ModalGate::new(tx);

        let pending = tokio::spawn(async move { gate.confirm("Delete?").await });
        let request = rx.recv().await;
        drop(request);
        assert!(!pending.await.unwrap());
    }

    #[tokio::test]
    async fn gate_without_ui_cancels() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        assert!(!ModalGate::new(tx).confirm("Delete?").await);
    }

    #[test]
    fn notifier_posts_notice_actions() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        ChannelNotifier::new(tx).error("Failed to delete");
        match rx.try_recv() {
            Ok(Action::Notify(notice)) => {
                assert_eq!(notice.level, NoticeLevel::Error);
                assert_eq!(notice.message, "Failed to delete");
            }
            other => panic!("unexpected action: {:?}", other),
        }
    }
}
