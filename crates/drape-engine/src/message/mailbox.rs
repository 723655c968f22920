use crossbeam_channel::{Receiver, Sender, TryRecvError};

/// Creates a connected poster / mailbox / closer triple.
///
/// The close signal is a separate zero-capacity channel whose sender lives in
/// the [`MailboxCloser`]; dropping it disconnects the signal, which every
/// poster and the mailbox observe, and wakes a receiver blocked in
/// [`Mailbox::recv`].
pub fn mailbox<M>() -> (Poster<M>, Mailbox<M>, MailboxCloser) {
    let (tx, rx) = crossbeam_channel::unbounded();
    let (close_tx, close_rx) = crossbeam_channel::bounded(0);

    (
        Poster {
            tx,
            closed: close_rx.clone(),
        },
        Mailbox {
            rx,
            closed: close_rx,
        },
        MailboxCloser { tx: Some(close_tx) },
    )
}

#[inline]
fn is_disconnected(signal: &Receiver<()>) -> bool {
    matches!(signal.try_recv(), Err(TryRecvError::Disconnected))
}

/// Sending side of a mailbox. Cheap to clone.
#[derive(Debug)]
pub struct Poster<M> {
    tx: Sender<M>,
    closed: Receiver<()>,
}

impl<M> Clone for Poster<M> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            closed: self.closed.clone(),
        }
    }
}

impl<M> Poster<M> {
    /// Enqueues `msg`. Hands the message back if the mailbox is closed or gone.
    pub fn post(&self, msg: M) -> Result<(), M> {
        if self.is_closed() {
            return Err(msg);
        }
        self.tx.send(msg).map_err(|e| e.into_inner())
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        is_disconnected(&self.closed)
    }
}

/// Receiving side of a mailbox. Owned by exactly one thread.
#[derive(Debug)]
pub struct Mailbox<M> {
    rx: Receiver<M>,
    closed: Receiver<()>,
}

impl<M> Mailbox<M> {
    /// Non-blocking receive. `None` when empty or closed.
    pub fn try_recv(&self) -> Option<M> {
        if self.is_closed() {
            return None;
        }
        self.rx.try_recv().ok()
    }

    /// Blocks until a message arrives or the mailbox is closed.
    ///
    /// Returns `None` once closed, even with messages still queued, and when
    /// every poster has been dropped.
    pub fn recv(&self) -> Option<M> {
        if self.is_closed() {
            return None;
        }
        crossbeam_channel::select! {
            recv(self.rx) -> msg => msg.ok(),
            recv(self.closed) -> _ => None,
        }
    }

    /// Drops every queued message, returning how many there were.
    pub fn drain(&self) -> usize {
        self.rx.try_iter().count()
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        is_disconnected(&self.closed)
    }
}

/// Owner of a mailbox's close signal.
#[derive(Debug)]
pub struct MailboxCloser {
    tx: Option<Sender<()>>,
}

impl MailboxCloser {
    /// Closes the mailbox. Idempotent.
    pub fn close(&mut self) {
        self.tx.take();
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.tx.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn messages_arrive_in_order() {
        let (poster, mailbox, _closer) = mailbox();
        poster.post(1).unwrap();
        poster.post(2).unwrap();
        assert_eq!(mailbox.pending(), 2);
        assert_eq!(mailbox.try_recv(), Some(1));
        assert_eq!(mailbox.recv(), Some(2));
        assert_eq!(mailbox.try_recv(), None);
    }

    #[test]
    fn post_after_close_returns_message() {
        let (poster, mailbox, mut closer) = mailbox::<String>();
        closer.close();
        closer.close();

        assert!(closer.is_closed());
        assert!(poster.is_closed());
        assert!(mailbox.is_closed());
        assert_eq!(poster.post("late".to_string()), Err("late".to_string()));
    }

    #[test]
    fn close_hides_queued_messages() {
        let (poster, mailbox, mut closer) = mailbox();
        poster.post(5).unwrap();
        closer.close();

        assert_eq!(mailbox.try_recv(), None);
        assert_eq!(mailbox.recv(), None);
        assert_eq!(mailbox.drain(), 1);
    }

    #[test]
    fn close_wakes_blocked_receiver() {
        let (_poster, mailbox, mut closer) = mailbox::<u32>();
        let (done_tx, done_rx) = crossbeam_channel::bounded(1);

        let receiver = thread::spawn(move || {
            let got = mailbox.recv();
            done_tx.send(got).unwrap();
        });

        // Make sure the receiver has nothing to return yet.
        assert!(done_rx.recv_timeout(Duration::from_millis(50)).is_err());

        closer.close();
        let got = done_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("receiver was not woken by close");
        assert_eq!(got, None);
        receiver.join().unwrap();
    }

    #[test]
    fn dropping_every_poster_ends_recv() {
        let (poster, mailbox, _closer) = mailbox::<u8>();
        drop(poster);
        assert_eq!(mailbox.recv(), None);
    }

    #[test]
    fn drain_counts_and_empties() {
        let (poster, mailbox, _closer) = mailbox();
        for i in 0..4 {
            poster.post(i).unwrap();
        }
        assert_eq!(mailbox.drain(), 4);
        assert_eq!(mailbox.pending(), 0);
    }
}
