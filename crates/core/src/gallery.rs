//! Product gallery state.
//!
//! Tracks the active slide and, for every video in the gallery, its playback
//! state keyed by media id. The gallery owns no timers: callers pass `now` into
//! the events that schedule a control auto-hide and call [`Gallery::tick`] to
//! apply any deadline that has passed.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::types::{MediaId, VariantImage};

/// Controls hide this long after playback starts.
pub const HIDE_AFTER_PLAY: Duration = Duration::from_millis(3000);

/// Controls hide this long after the pointer leaves a playing video.
pub const HIDE_AFTER_LEAVE: Duration = Duration::from_millis(2000);

/// Playback state of one video.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoState {
    pub is_playing: bool,
    pub show_controls: bool,
    pub is_loading: bool,
    pub is_muted: bool,
    /// Seconds.
    pub duration: f64,
    /// Seconds.
    pub current_time: f64,
    hide_at: Option<Instant>,
}

impl Default for VideoState {
    fn default() -> Self {
        Self {
            is_playing: false,
            show_controls: true,
            is_loading: false,
            is_muted: true,
            duration: 0.0,
            current_time: 0.0,
            hide_at: None,
        }
    }
}

impl VideoState {
    /// Pending auto-hide deadline, if any.
    #[must_use]
    pub const fn hide_at(&self) -> Option<Instant> {
        self.hide_at
    }

    /// Playback progress in percent, 0 when the duration is unknown.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            (self.current_time / self.duration * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        }
    }

    fn pause(&mut self) {
        self.is_playing = false;
        self.show_controls = true;
        self.hide_at = None;
    }
}

/// What a click on a video asks the player to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The video was playing and is now paused.
    Paused,
    /// Playback should start; report the result with
    /// [`Gallery::play_started`] or [`Gallery::play_failed`].
    PlayRequested,
}

/// Gallery of variant media with per-video state.
#[derive(Debug, Clone)]
pub struct Gallery {
    media: Vec<VariantImage>,
    active: usize,
    videos: HashMap<MediaId, VideoState>,
}

impl Gallery {
    /// Build a gallery. Only `VIDEO` items get playback state.
    #[must_use]
    pub fn new(media: Vec<VariantImage>) -> Self {
        let videos = media
            .iter()
            .filter(|m| m.is_video())
            .map(|m| (m.id.clone(), VideoState::default()))
            .collect();
        Self {
            media,
            active: 0,
            videos,
        }
    }

    /// Replace the media (variant switch). Resets to the first slide.
    pub fn set_media(&mut self, media: Vec<VariantImage>) {
        *self = Self::new(media);
    }

    #[must_use]
    pub fn media(&self) -> &[VariantImage] {
        &self.media
    }

    #[must_use]
    pub const fn active_index(&self) -> usize {
        self.active
    }

    #[must_use]
    pub fn active(&self) -> Option<&VariantImage> {
        self.media.get(self.active)
    }

    /// State of the video with `id`.
    #[must_use]
    pub fn video(&self, id: &MediaId) -> Option<&VideoState> {
        self.videos.get(id)
    }

    /// Whether the slide at `index` is close enough to the active one to load eagerly.
    #[must_use]
    pub const fn should_load(&self, index: usize) -> bool {
        self.active.abs_diff(index) <= 1
    }

    /// Make `index` the active slide. Leaving a playing video pauses it.
    pub fn select(&mut self, index: usize) {
        if index >= self.media.len() || index == self.active {
            return;
        }
        if let Some(state) = self
            .media
            .get(self.active)
            .and_then(|leaving| self.videos.get_mut(&leaving.id))
        {
            if state.is_playing {
                state.pause();
            }
        }
        self.active = index;
    }

    /// Advance one slide, wrapping to the start.
    pub fn next(&mut self) {
        if !self.media.is_empty() {
            self.select((self.active + 1) % self.media.len());
        }
    }

    /// Go back one slide, wrapping to the end.
    pub fn prev(&mut self) {
        if !self.media.is_empty() {
            let len = self.media.len();
            self.select((self.active + len - 1) % len);
        }
    }

    /// Click on the video surface or play button.
    pub fn click(&mut self, id: &MediaId) -> Option<ClickOutcome> {
        let state = self.videos.get_mut(id)?;
        if state.is_playing {
            state.pause();
            Some(ClickOutcome::Paused)
        } else {
            state.is_loading = true;
            Some(ClickOutcome::PlayRequested)
        }
    }

    /// The player started after a [`ClickOutcome::PlayRequested`].
    pub fn play_started(&mut self, id: &MediaId, now: Instant) {
        if let Some(state) = self.videos.get_mut(id) {
            state.is_playing = true;
            state.show_controls = true;
            state.is_loading = false;
            state.hide_at = Some(now + HIDE_AFTER_PLAY);
        }
    }

    /// The player refused to start (autoplay policy, network error).
    pub fn play_failed(&mut self, id: &MediaId) {
        if let Some(state) = self.videos.get_mut(id) {
            state.is_loading = false;
        }
    }

    pub fn mouse_enter(&mut self, id: &MediaId) {
        if let Some(state) = self.videos.get_mut(id) {
            state.show_controls = true;
            state.hide_at = None;
        }
    }

    pub fn mouse_leave(&mut self, id: &MediaId, now: Instant) {
        if let Some(state) = self.videos.get_mut(id) {
            if state.is_playing {
                state.hide_at = Some(now + HIDE_AFTER_LEAVE);
            }
        }
    }

    /// Playback reached the end.
    pub fn ended(&mut self, id: &MediaId) {
        if let Some(state) = self.videos.get_mut(id) {
            state.pause();
        }
    }

    pub fn time_update(&mut self, id: &MediaId, current_time: f64, duration: f64) {
        if let Some(state) = self.videos.get_mut(id) {
            state.current_time = current_time;
            state.duration = duration;
        }
    }

    /// Seek to `percentage` (clamped to 0-100) of the duration. Returns the new time.
    pub fn seek(&mut self, id: &MediaId, percentage: f64) -> Option<f64> {
        let state = self.videos.get_mut(id)?;
        state.current_time = percentage.clamp(0.0, 100.0) / 100.0 * state.duration;
        Some(state.current_time)
    }

    /// Flip mute. Returns the new muted flag.
    pub fn toggle_mute(&mut self, id: &MediaId) -> Option<bool> {
        let state = self.videos.get_mut(id)?;
        state.is_muted = !state.is_muted;
        Some(state.is_muted)
    }

    /// Hide controls on every video whose deadline is at or before `now`.
    pub fn tick(&mut self, now: Instant) {
        for state in self.videos.values_mut() {
            if state.hide_at.is_some_and(|at| at <= now) {
                state.show_controls = false;
                state.hide_at = None;
            }
        }
    }

    /// Earliest pending auto-hide deadline, for scheduling the next tick.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.videos.values().filter_map(VideoState::hide_at).min()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use crate::types::MediaType;

    use super::*;

    fn media(id: &str, media_type: MediaType) -> VariantImage {
        VariantImage {
            id: MediaId::new(id),
            url: format!("https://cdn.example/{id}"),
            media_type,
        }
    }

    fn gallery() -> Gallery {
        Gallery::new(vec![
            media("img-1", MediaType::Image),
            media("vid-1", MediaType::Video),
            media("img-2", MediaType::Image),
        ])
    }

    fn vid() -> MediaId {
        MediaId::new("vid-1")
    }

    fn play(g: &mut Gallery, now: Instant) {
        assert_eq!(g.click(&vid()), Some(ClickOutcome::PlayRequested));
        g.play_started(&vid(), now);
    }

    #[test]
    fn test_only_videos_get_state() {
        let g = gallery();
        assert!(g.video(&MediaId::new("img-1")).is_none());
        let state = g.video(&vid()).unwrap();
        assert!(state.is_muted);
        assert!(state.show_controls);
        assert!(!state.is_playing);
    }

    #[test]
    fn test_click_while_paused_requests_play() {
        let mut g = gallery();
        assert_eq!(g.click(&vid()), Some(ClickOutcome::PlayRequested));
        assert!(g.video(&vid()).unwrap().is_loading);

        g.play_failed(&vid());
        let state = g.video(&vid()).unwrap();
        assert!(!state.is_loading);
        assert!(!state.is_playing);
    }

    #[test]
    fn test_controls_hide_three_seconds_after_play() {
        let mut g = gallery();
        let now = Instant::now();
        play(&mut g, now);

        let state = g.video(&vid()).unwrap();
        assert!(state.is_playing && !state.is_loading);
        assert_eq!(state.hide_at(), Some(now + HIDE_AFTER_PLAY));

        g.tick(now + Duration::from_millis(2999));
        assert!(g.video(&vid()).unwrap().show_controls);

        g.tick(now + HIDE_AFTER_PLAY);
        assert!(!g.video(&vid()).unwrap().show_controls);
        assert!(g.next_deadline().is_none());
    }

    #[test]
    fn test_click_while_playing_pauses_and_cancels_hide() {
        let mut g = gallery();
        let now = Instant::now();
        play(&mut g, now);

        assert_eq!(g.click(&vid()), Some(ClickOutcome::Paused));
        let state = g.video(&vid()).unwrap();
        assert!(!state.is_playing);
        assert!(state.show_controls);
        assert!(state.hide_at().is_none());
    }

    #[test]
    fn test_mouse_leave_schedules_hide_only_while_playing() {
        let mut g = gallery();
        let now = Instant::now();

        g.mouse_leave(&vid(), now);
        assert!(g.video(&vid()).unwrap().hide_at().is_none());

        play(&mut g, now);
        g.mouse_enter(&vid());
        assert!(g.video(&vid()).unwrap().hide_at().is_none());

        g.mouse_leave(&vid(), now);
        assert_eq!(g.next_deadline(), Some(now + HIDE_AFTER_LEAVE));
    }

    #[test]
    fn test_ended_shows_controls() {
        let mut g = gallery();
        let now = Instant::now();
        play(&mut g, now);
        g.ended(&vid());
        let state = g.video(&vid()).unwrap();
        assert!(!state.is_playing);
        assert!(state.show_controls);
        assert!(state.hide_at().is_none());
    }

    #[test]
    fn test_seek_and_progress() {
        let mut g = gallery();
        assert_eq!(g.seek(&vid(), 50.0), Some(0.0));

        g.time_update(&vid(), 3.0, 12.0);
        assert_eq!(g.video(&vid()).unwrap().progress(), 25.0);

        assert_eq!(g.seek(&vid(), 50.0), Some(6.0));
        assert_eq!(g.seek(&vid(), 150.0), Some(12.0));
        assert_eq!(g.seek(&MediaId::new("img-1"), 50.0), None);
    }

    #[test]
    fn test_toggle_mute() {
        let mut g = gallery();
        assert_eq!(g.toggle_mute(&vid()), Some(false));
        assert_eq!(g.toggle_mute(&vid()), Some(true));
    }

    #[test]
    fn test_navigation_wraps_and_pauses_leaving_video() {
        let mut g = gallery();
        g.prev();
        assert_eq!(g.active_index(), 2);
        g.next();
        assert_eq!(g.active_index(), 0);

        g.select(1);
        play(&mut g, Instant::now());
        g.next();
        assert_eq!(g.active_index(), 2);
        assert!(!g.video(&vid()).unwrap().is_playing);
    }

    #[test]
    fn test_should_load_neighbours() {
        let mut g = gallery();
        assert!(g.should_load(0));
        assert!(g.should_load(1));
        assert!(!g.should_load(2));
        g.select(2);
        assert!(!g.should_load(0));
    }

    #[test]
    fn test_set_media_resets() {
        let mut g = gallery();
        g.select(2);
        g.set_media(vec![media("img-9", MediaType::Image)]);
        assert_eq!(g.active_index(), 0);
        assert!(g.video(&vid()).is_none());
        assert_eq!(g.active().unwrap().id.as_str(), "img-9");
    }
}
