use std::sync::Arc;

use tracing::error;

use ode_catalog::Notifier;

/// A live 30-second preview. Dropping or stopping the handle ends playback.
pub trait PreviewHandle: Send {
    fn stop(&mut self);
}

/// Starts playback of a preview URL, returning the handle that owns it.
pub trait PreviewPlayer: Send + Sync {
    fn start(&self, url: &str) -> anyhow::Result<Box<dyn PreviewHandle>>;
}

/// Exclusive owner of the single active preview. Starting a new preview
/// always tears down the previous handle first, so at most one is ever live.
pub struct PlaybackSession {
    player: Arc<dyn PreviewPlayer>,
    notifier: Arc<dyn Notifier>,
    current: Option<Box<dyn PreviewHandle>>,
}

impl PlaybackSession {
    pub fn new(player: Arc<dyn PreviewPlayer>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            player,
            notifier,
            current: None,
        }
    }

    /// Play a song's preview, if it has one. A missing preview URL or a
    /// player failure becomes a notification, never an error to the caller;
    /// either way any earlier preview has already been stopped.
    pub fn play(&mut self, preview_url: Option<&str>) {
        self.stop();

        let Some(url) = preview_url else {
            self.notifier.notify(
                "Preview not available",
                "This song doesn't have a preview available",
            );
            return;
        };

        match self.player.start(url) {
            Ok(handle) => self.current = Some(handle),
            Err(e) => {
                error!("Error playing audio: {}", e);
                self.notifier.notify("Playback error", "Could not play the song preview");
            }
        }
    }

    pub fn stop(&mut self) {
        if let Some(mut handle) = self.current.take() {
            handle.stop();
        }
    }

    pub fn is_playing(&self) -> bool {
        self.current.is_some()
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakePlayer {
        started: Mutex<Vec<String>>,
        stops: Arc<AtomicUsize>,
    }

    struct FakeHandle {
        stops: Arc<AtomicUsize>,
    }

    impl PreviewHandle for FakeHandle {
        fn stop(&mut self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl PreviewPlayer for FakePlayer {
        fn start(&self, url: &str) -> anyhow::Result<Box<dyn PreviewHandle>> {
            self.started.lock().unwrap().push(url.to_string());
            Ok(Box::new(FakeHandle {
                stops: self.stops.clone(),
            }))
        }
    }

    #[derive(Default)]
    struct SilentNotifier {
        count: AtomicUsize,
    }

    impl Notifier for SilentNotifier {
        fn notify(&self, _title: &str, _description: &str) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn starting_a_preview_stops_the_previous_one() {
        let player = Arc::new(FakePlayer::default());
        let notifier = Arc::new(SilentNotifier::default());
        let mut session = PlaybackSession::new(player.clone(), notifier);

        session.play(Some("http://a/clip.mp3"));
        assert!(session.is_playing());
        assert_eq!(player.stops.load(Ordering::SeqCst), 0);

        session.play(Some("http://b/clip.mp3"));
        assert!(session.is_playing());
        assert_eq!(player.stops.load(Ordering::SeqCst), 1);
        assert_eq!(player.started.lock().unwrap().len(), 2);
    }

    #[test]
    fn missing_preview_notifies_and_stops_current() {
        let player = Arc::new(FakePlayer::default());
        let notifier = Arc::new(SilentNotifier::default());
        let mut session = PlaybackSession::new(player.clone(), notifier.clone());

        session.play(Some("http://a/clip.mp3"));
        session.play(None);

        assert!(!session.is_playing());
        assert_eq!(player.stops.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_the_session_releases_the_handle() {
        let player = Arc::new(FakePlayer::default());
        let notifier = Arc::new(SilentNotifier::default());
        {
            let mut session = PlaybackSession::new(player.clone(), notifier);
            session.play(Some("http://a/clip.mp3"));
        }
        assert_eq!(player.stops.load(Ordering::SeqCst), 1);
    }
}
