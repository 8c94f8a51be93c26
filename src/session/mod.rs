//! Client-side session: the one "now playing" track and the one track waiting to be minted.
//!
//! The session is built once by the application root and handed by reference
//! to every view, so there is no ambient global state. All mutation happens
//! on the caller's thread; nothing here blocks or reports errors to the caller.

use log::{debug, warn};
use serde::Serialize;

use crate::domain::track::Track;

pub mod output;

use output::{AudioOutput, Generation, PlaybackEvent};

/// Top-level views of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Create,
    Discover,
    Mint,
    Trade,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub track: Option<Track>,
    /// only meaningful while `track` is set
    pub is_playing: bool,
    pub position: f64,
    pub total: f64,
}

impl PlayerState {
    /// Progress in percent, 0 while the total length is unknown.
    pub fn progress_percent(&self) -> f64 {
        if self.total > 0.0 && self.position.is_finite() {
            (self.position / self.total * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        }
    }

    fn current_id(&self) -> Option<&str> {
        self.track.as_ref().map(|t| t.id.as_str())
    }
}

type Navigate = Box<dyn FnMut(View)>;

pub struct Session<O: AudioOutput> {
    output: O,
    /// generation of the source bound to `output`, `None` when nothing is bound
    bound: Option<Generation>,
    last_generation: Generation,
    player: PlayerState,
    mint_queue: Option<Track>,
    active_view: View,
    navigate: Navigate,
}

impl<O: AudioOutput> Session<O> {
    /// `navigate` is the only way the session switches views.
    pub fn new(output: O, navigate: impl FnMut(View) + 'static) -> Self {
        Self {
            output,
            bound: None,
            last_generation: Generation::default(),
            player: PlayerState::default(),
            mint_queue: None,
            active_view: View::Create,
            navigate: Box::new(navigate),
        }
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn active_view(&self) -> View {
        self.active_view
    }

    /// Plays `track`.
    ///
    /// The current track resumes where it stopped. Any other track replaces
    /// the bound source and starts from 0.
    pub fn play(&mut self, track: Track) {
        if self.bound.is_some() && self.player.current_id() == Some(track.id.as_str()) {
            match self.output.resume() {
                Ok(()) => self.player.is_playing = true,
                Err(e) => {
                    warn!("cannot resume {}: {e}", track.id);
                    self.player.is_playing = false;
                }
            }
            return;
        }

        if self.bound.take().is_some() {
            self.output.release();
        }

        let generation = self.last_generation.next();
        self.last_generation = generation;

        let is_playing = match self.output.load(&track.audio_url, generation) {
            Ok(()) => {
                self.bound = Some(generation);
                true
            }
            Err(e) => {
                warn!("playback of {} failed: {e}", track.id);
                false
            }
        };

        self.player = PlayerState {
            track: Some(track),
            is_playing,
            position: 0.0,
            total: 0.0,
        };
    }

    /// Keeps the track and its position so `play` can resume it.
    pub fn pause(&mut self) {
        if self.bound.is_some() {
            self.output.pause();
        }
        self.player.is_playing = false;
    }

    pub fn stop(&mut self) {
        if self.bound.take().is_some() {
            self.output.release();
        }
        self.player = PlayerState::default();
    }

    /// Pauses `track` if it is the one playing, plays it otherwise.
    pub fn toggle(&mut self, track: Track) {
        if self.player.is_playing && self.player.current_id() == Some(track.id.as_str()) {
            self.pause();
        } else {
            self.play(track);
        }
    }

    /// Feeds an event from the output back into the session.
    pub fn handle_event(&mut self, generation: Generation, event: PlaybackEvent) {
        if self.bound != Some(generation) {
            debug!("dropping {event:?} from stale source {generation:?}");
            return;
        }

        match event {
            PlaybackEvent::Progress { position, total } => {
                self.player.position = if position.is_finite() { position } else { 0.0 };
                self.player.total = if total.is_finite() { total } else { 0.0 };
            }
            PlaybackEvent::Ended => self.player.is_playing = false,
            PlaybackEvent::Failed(reason) => {
                warn!("playback failed: {reason}");
                self.player.is_playing = false;
            }
        }
    }

    /// Replaces whatever was queued and switches to the mint view.
    pub fn queue_for_mint(&mut self, track: Track) {
        self.mint_queue = Some(track);
        self.navigate(View::Mint);
    }

    /// Takes the queued track, leaving the slot empty.
    pub fn consume_mint_queue(&mut self) -> Option<Track> {
        self.mint_queue.take()
    }

    pub fn has_queued_mint(&self) -> bool {
        self.mint_queue.is_some()
    }

    pub fn navigate(&mut self, view: View) {
        self.active_view = view;
        (self.navigate)(view);
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::domain::track::TrackSource;
    use output::AudioError;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Load(String, Generation),
        Resume,
        Pause,
        Release,
    }

    #[derive(Default)]
    struct FakeOutput {
        calls: Vec<Call>,
        fail_load: bool,
        fail_resume: bool,
    }

    impl FakeOutput {
        fn loads(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Load(url, _) => Some(url.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn last_generation(&self) -> Generation {
            self.calls
                .iter()
                .rev()
                .find_map(|c| match c {
                    Call::Load(_, g) => Some(*g),
                    _ => None,
                })
                .unwrap()
        }
    }

    impl AudioOutput for FakeOutput {
        fn load(&mut self, url: &str, generation: Generation) -> Result<(), AudioError> {
            self.calls.push(Call::Load(url.to_string(), generation));
            if self.fail_load {
                return Err(AudioError::Load {
                    url: url.to_string(),
                    reason: "unsupported format".into(),
                });
            }
            Ok(())
        }

        fn resume(&mut self) -> Result<(), AudioError> {
            self.calls.push(Call::Resume);
            if self.fail_resume {
                return Err(AudioError::Output("device lost".into()));
            }
            Ok(())
        }

        fn pause(&mut self) {
            self.calls.push(Call::Pause);
        }

        fn release(&mut self) {
            self.calls.push(Call::Release);
        }
    }

    fn track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            title: format!("title {id}"),
            artist: "artist".to_string(),
            audio_url: format!("https://audio/{id}.mp3"),
            artwork_url: None,
            source: TrackSource::Upload,
            genre: None,
            duration: None,
            provider_track_id: None,
        }
    }

    fn session() -> (Session<FakeOutput>, Rc<RefCell<Vec<View>>>) {
        let views = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&views);
        let session = Session::new(FakeOutput::default(), move |v| sink.borrow_mut().push(v));
        (session, views)
    }

    #[test]
    fn playing_same_track_resumes_in_place() {
        let (mut s, _) = session();
        s.play(track("a"));
        let g = s.output.last_generation();
        s.handle_event(g, PlaybackEvent::Progress { position: 12.5, total: 100.0 });
        s.pause();

        s.play(track("a"));

        assert!(s.player().is_playing);
        assert_eq!(s.player().position, 12.5);
        assert_eq!(s.output.loads(), vec!["https://audio/a.mp3"]);
        assert_eq!(s.output.calls.last(), Some(&Call::Resume));
    }

    #[test]
    fn playing_other_track_stops_previous_and_starts_at_zero() {
        let (mut s, _) = session();
        s.play(track("a"));
        let g = s.output.last_generation();
        s.handle_event(g, PlaybackEvent::Progress { position: 40.0, total: 90.0 });

        s.play(track("b"));

        let calls = &s.output.calls;
        assert_eq!(calls[1], Call::Release);
        assert!(matches!(&calls[2], Call::Load(url, _) if url == "https://audio/b.mp3"));
        assert_eq!(s.player().track.as_ref().map(|t| t.id.as_str()), Some("b"));
        assert!(s.player().is_playing);
        assert_eq!(s.player().position, 0.0);
        assert_eq!(s.player().total, 0.0);
    }

    #[test]
    fn stop_resets_everything() {
        let (mut s, _) = session();
        s.play(track("a"));
        let g = s.output.last_generation();
        s.handle_event(g, PlaybackEvent::Progress { position: 3.0, total: 9.0 });

        s.stop();

        assert_eq!(*s.player(), PlayerState::default());
        assert_eq!(s.output.calls.last(), Some(&Call::Release));

        // stopping twice is harmless
        s.stop();
        assert_eq!(*s.player(), PlayerState::default());
    }

    #[test]
    fn play_after_stop_starts_over() {
        let (mut s, _) = session();
        s.play(track("a"));
        s.stop();
        s.play(track("a"));

        assert_eq!(s.output.loads().len(), 2);
        assert!(s.player().is_playing);
    }

    #[test]
    fn pause_keeps_track_and_position() {
        let (mut s, _) = session();
        s.play(track("a"));
        let g = s.output.last_generation();
        s.handle_event(g, PlaybackEvent::Progress { position: 7.0, total: 10.0 });

        s.pause();

        assert!(!s.player().is_playing);
        assert_eq!(s.player().position, 7.0);
        assert!(s.player().track.is_some());
    }

    #[test]
    fn end_and_failure_events_stop_playing() {
        let (mut s, _) = session();
        s.play(track("a"));
        let g = s.output.last_generation();
        s.handle_event(g, PlaybackEvent::Ended);
        assert!(!s.player().is_playing);

        s.play(track("b"));
        let g = s.output.last_generation();
        s.handle_event(g, PlaybackEvent::Failed("decode error".into()));
        assert!(!s.player().is_playing);
        assert!(s.player().track.is_some());
    }

    #[test]
    fn events_from_replaced_source_are_ignored() {
        let (mut s, _) = session();
        s.play(track("a"));
        let old = s.output.last_generation();
        s.play(track("b"));

        s.handle_event(old, PlaybackEvent::Progress { position: 50.0, total: 60.0 });
        s.handle_event(old, PlaybackEvent::Ended);

        assert!(s.player().is_playing);
        assert_eq!(s.player().position, 0.0);
    }

    #[test]
    fn events_after_stop_are_ignored() {
        let (mut s, _) = session();
        s.play(track("a"));
        let g = s.output.last_generation();
        s.stop();

        s.handle_event(g, PlaybackEvent::Progress { position: 5.0, total: 6.0 });

        assert_eq!(*s.player(), PlayerState::default());
    }

    #[test]
    fn load_failure_is_swallowed() {
        let views = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&views);
        let output = FakeOutput {
            fail_load: true,
            ..Default::default()
        };
        let mut s = Session::new(output, move |v| sink.borrow_mut().push(v));

        s.play(track("a"));

        assert!(!s.player().is_playing);
        assert_eq!(s.player().track.as_ref().map(|t| t.id.as_str()), Some("a"));

        // nothing bound, so playing again retries the load instead of resuming
        s.play(track("a"));
        assert_eq!(s.output.loads().len(), 2);
    }

    #[test]
    fn toggle_pauses_current_and_plays_others() {
        let (mut s, _) = session();
        s.toggle(track("a"));
        assert!(s.player().is_playing);

        s.toggle(track("a"));
        assert!(!s.player().is_playing);
        assert_eq!(s.output.calls.last(), Some(&Call::Pause));

        s.toggle(track("b"));
        assert!(s.player().is_playing);
        assert_eq!(s.player().track.as_ref().map(|t| t.id.as_str()), Some("b"));
    }

    #[test]
    fn mint_queue_is_last_write_wins() {
        let (mut s, views) = session();
        s.queue_for_mint(track("x"));
        s.queue_for_mint(track("y"));

        assert!(s.has_queued_mint());
        assert_eq!(s.consume_mint_queue().map(|t| t.id), Some("y".to_string()));
        assert_eq!(s.consume_mint_queue(), None);
        assert!(!s.has_queued_mint());

        assert_eq!(*views.borrow(), vec![View::Mint, View::Mint]);
        assert_eq!(s.active_view(), View::Mint);
    }

    #[test]
    fn consume_on_empty_queue_is_none() {
        let (mut s, views) = session();
        assert_eq!(s.consume_mint_queue(), None);
        assert!(views.borrow().is_empty());
        assert_eq!(s.active_view(), View::Create);
    }

    #[test]
    fn sessions_are_independent() {
        let (mut a, _) = session();
        let (b, _) = session();

        a.play(track("a"));
        a.queue_for_mint(track("a"));

        assert!(b.player().track.is_none());
        assert!(!b.has_queued_mint());
    }

    #[test]
    fn progress_percent() {
        let mut state = PlayerState::default();
        assert_eq!(state.progress_percent(), 0.0);

        state.position = 30.0;
        state.total = 120.0;
        assert_eq!(state.progress_percent(), 25.0);

        state.position = f64::NAN;
        assert_eq!(state.progress_percent(), 0.0);
    }

    #[test]
    fn resume_failure_is_swallowed() {
        let output = FakeOutput {
            fail_resume: true,
            ..Default::default()
        };
        let mut s = Session::new(output, |_| {});
        s.play(track("a"));
        let g = s.output.last_generation();
        s.handle_event(g, PlaybackEvent::Progress { position: 4.0, total: 8.0 });
        s.pause();

        s.play(track("a"));

        assert!(!s.player().is_playing);
        assert_eq!(s.player().position, 4.0);
        assert_eq!(s.output.calls.last(), Some(&Call::Resume));
        assert_eq!(s.output.loads().len(), 1);
    }

    #[test]
    fn non_finite_offsets_read_as_zero() {
        let (mut s, _) = session();
        s.play(track("a"));
        let g = s.output.last_generation();

        s.handle_event(g, PlaybackEvent::Progress { position: f64::NAN, total: f64::INFINITY });

        assert_eq!(s.player().position, 0.0);
        assert_eq!(s.player().total, 0.0);
        assert_eq!(s.player().progress_percent(), 0.0);

        s.handle_event(g, PlaybackEvent::Progress { position: f64::NAN, total: 100.0 });
        assert_eq!(s.player().progress_percent(), 0.0);
    }
}
