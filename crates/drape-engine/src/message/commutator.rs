use std::sync::{PoisonError, RwLock};

use super::{Poster, RenderMessage, UploadMessage};

/// Thread roles a message can be addressed to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ThreadRole {
    /// Owns the graphics context and the tile geometry cache.
    Render,
    /// Builds tile geometry off the render thread.
    ResourceUpload,
}

/// Routes messages between threads by role.
///
/// Each role has at most one registered endpoint. Posting to a role with no
/// endpoint (not yet started, or already stopped) drops the message with a
/// warning; nothing is buffered for later registration.
///
/// `G` is the geometry buffer type carried by render-thread flushes.
#[derive(Debug)]
pub struct ThreadsCommutator<G> {
    render: RwLock<Option<Poster<RenderMessage<G>>>>,
    upload: RwLock<Option<Poster<UploadMessage>>>,
}

impl<G> Default for ThreadsCommutator<G> {
    fn default() -> Self {
        Self {
            render: RwLock::new(None),
            upload: RwLock::new(None),
        }
    }
}

impl<G> ThreadsCommutator<G> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the render thread's mailbox, replacing any previous one.
    pub fn register_render(&self, poster: Poster<RenderMessage<G>>) {
        *self.render.write().unwrap_or_else(PoisonError::into_inner) = Some(poster);
        log::debug!("commutator: render endpoint registered");
    }

    /// Registers the tile producer's mailbox, replacing any previous one.
    pub fn register_upload(&self, poster: Poster<UploadMessage>) {
        *self.upload.write().unwrap_or_else(PoisonError::into_inner) = Some(poster);
        log::debug!("commutator: resource-upload endpoint registered");
    }

    pub fn unregister(&self, role: ThreadRole) {
        match role {
            ThreadRole::Render => {
                self.render.write().unwrap_or_else(PoisonError::into_inner).take();
            }
            ThreadRole::ResourceUpload => {
                self.upload.write().unwrap_or_else(PoisonError::into_inner).take();
            }
        }
        log::debug!("commutator: {role:?} endpoint unregistered");
    }

    pub fn is_registered(&self, role: ThreadRole) -> bool {
        match role {
            ThreadRole::Render => self
                .render
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .as_ref()
                .is_some_and(|p| !p.is_closed()),
            ThreadRole::ResourceUpload => self
                .upload
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .as_ref()
                .is_some_and(|p| !p.is_closed()),
        }
    }

    /// Posts to the render thread. Returns `false` if the message was dropped.
    pub fn post_render(&self, msg: RenderMessage<G>) -> bool {
        let guard = self.render.read().unwrap_or_else(PoisonError::into_inner);
        deliver(guard.as_ref(), msg, ThreadRole::Render, RenderMessage::kind)
    }

    /// Posts to the tile producer. Returns `false` if the message was dropped.
    pub fn post_upload(&self, msg: UploadMessage) -> bool {
        let guard = self.upload.read().unwrap_or_else(PoisonError::into_inner);
        deliver(guard.as_ref(), msg, ThreadRole::ResourceUpload, |_| "update-coverage")
    }
}

fn deliver<M>(
    poster: Option<&Poster<M>>,
    msg: M,
    role: ThreadRole,
    kind: impl Fn(&M) -> &'static str,
) -> bool {
    let Some(poster) = poster else {
        log::warn!("dropping {} message: no {role:?} endpoint registered", kind(&msg));
        return false;
    };

    match poster.post(msg) {
        Ok(()) => true,
        Err(msg) => {
            log::warn!("dropping {} message: {role:?} mailbox is closed", kind(&msg));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{ScreenTransform, Viewport};
    use crate::message::mailbox;

    #[test]
    fn post_without_endpoint_is_dropped() {
        let commutator = ThreadsCommutator::<u32>::new();
        assert!(!commutator.post_render(RenderMessage::Rotate { angle: 1.0 }));
        assert!(!commutator.post_upload(UploadMessage::UpdateCoverage(ScreenTransform::new(
            Viewport::new(1, 1),
            0.0
        ))));
    }

    #[test]
    fn registered_render_endpoint_receives() {
        let commutator = ThreadsCommutator::<u32>::new();
        let (poster, mailbox, _closer) = mailbox();
        commutator.register_render(poster);

        assert!(commutator.is_registered(ThreadRole::Render));
        assert!(!commutator.is_registered(ThreadRole::ResourceUpload));
        assert!(commutator.post_render(RenderMessage::Resize { width: 3, height: 4 }));
        assert!(matches!(
            mailbox.try_recv(),
            Some(RenderMessage::Resize { width: 3, height: 4 })
        ));
    }

    #[test]
    fn unregister_and_close_stop_delivery() {
        let commutator = ThreadsCommutator::<u32>::new();
        let (poster, _mailbox, mut closer) = mailbox::<UploadMessage>();
        commutator.register_upload(poster);

        closer.close();
        assert!(!commutator.is_registered(ThreadRole::ResourceUpload));
        let msg = UploadMessage::UpdateCoverage(ScreenTransform::new(Viewport::new(2, 2), 0.5));
        assert!(!commutator.post_upload(msg.clone()));

        let (poster, mailbox, _closer) = mailbox::<UploadMessage>();
        commutator.register_upload(poster);
        assert!(commutator.post_upload(msg.clone()));
        assert_eq!(mailbox.try_recv(), Some(msg.clone()));

        commutator.unregister(ThreadRole::ResourceUpload);
        assert!(!commutator.post_upload(msg));
    }
}
