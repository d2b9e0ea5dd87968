//! Fade lifecycle: decides when the city may be rebuilt.
//!
//! ```text
//! Idle → FadeOut → FadeWait → FadeIn → Idle
//! ```
//!
//! The grid is only rewritten while the scene is fully obscured (`FadeWait`),
//! or on an explicit second rebuild request during `FadeOut`.
//! [`FadeLifecycle`] is plain data advanced with a millisecond clock, so it
//! can be driven from tests without an `App`; [`drive_lifecycle`] feeds it
//! Bevy's `Time` once per frame.

use bevy::prelude::*;

use crate::config::CityConfig;
use crate::events::{CityCleared, CityRegenerated, RegenerateRequested};
use crate::layout::CityLayout;
use crate::readiness::SceneReadiness;
use crate::regenerate::{run_regeneration, CityState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeState {
    /// Showing the current city.
    Idle,
    /// Opacity ramping 0 → 1 since `start_ms`.
    FadeOut { start_ms: u64 },
    /// Fully obscured, waiting on collaborators.
    FadeWait,
    /// Opacity ramping 1 → 0 since `start_ms`.
    FadeIn { start_ms: u64 },
}

#[derive(Resource, Debug, Clone)]
pub struct FadeLifecycle {
    state: FadeState,
    opacity: f32,
    scene_begin_ms: Option<u64>,
    /// The current fade cycle already rebuilt the grid.
    regenerated: bool,
    fade_time_ms: u64,
    reset_interval_ms: u64,
}

impl FadeLifecycle {
    /// Showing a city, nothing pending.
    pub fn idle(fade_time_ms: u64, reset_interval_ms: u64) -> Self {
        Self {
            state: FadeState::Idle,
            opacity: 0.0,
            scene_begin_ms: None,
            regenerated: false,
            fade_time_ms,
            reset_interval_ms,
        }
    }

    /// Fully obscured with a freshly built city behind the fade. This is
    /// where the app starts.
    pub fn obscured(config: &CityConfig) -> Self {
        Self {
            state: FadeState::FadeWait,
            opacity: 1.0,
            regenerated: true,
            ..Self::idle(config.fade_time_ms, config.reset_interval_ms)
        }
    }

    pub fn state(&self) -> FadeState {
        self.state
    }

    /// 0 shows the city, 1 hides it completely.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn scene_begin_ms(&self) -> Option<u64> {
        self.scene_begin_ms
    }

    /// How long the current city has been on display, never below 1.
    pub fn scene_elapsed_ms(&self, now_ms: u64, entities_ready: bool) -> u64 {
        match self.scene_begin_ms {
            Some(begin) if entities_ready => now_ms.saturating_sub(begin).max(1),
            _ => 1,
        }
    }

    fn set_state(&mut self, next: FadeState) {
        if self.state != next {
            debug!("fade lifecycle: {:?} -> {:?}", self.state, next);
        }
        self.state = next;
    }

    fn begin_regeneration(&mut self) {
        self.regenerated = true;
        self.scene_begin_ms = None;
    }

    /// Start fading the current city out. Returns true when the grid must be
    /// rebuilt right now: a repeated request while already fading out.
    pub fn request_regeneration(&mut self, now_ms: u64) -> bool {
        let immediate = matches!(self.state, FadeState::FadeOut { .. });
        if immediate {
            self.begin_regeneration();
        } else {
            self.regenerated = false;
        }
        self.set_state(FadeState::FadeOut { start_ms: now_ms });
        immediate
    }

    fn ramp(&self, start_ms: u64, now_ms: u64) -> f32 {
        (now_ms.saturating_sub(start_ms) as f32 / self.fade_time_ms as f32).clamp(0.0, 1.0)
    }

    /// Advance one frame. Returns true when the grid must be rebuilt now.
    pub fn advance(&mut self, now_ms: u64, readiness: SceneReadiness) -> bool {
        let mut regenerate = false;

        if self.state != FadeState::Idle {
            if self.state == FadeState::FadeWait {
                if !self.regenerated {
                    self.begin_regeneration();
                    regenerate = true;
                } else if readiness.is_ready() {
                    self.set_state(FadeState::FadeIn { start_ms: now_ms });
                    self.opacity = 1.0;
                }
            }

            match self.state {
                FadeState::FadeOut { start_ms }
                    if now_ms.saturating_sub(start_ms) > self.fade_time_ms =>
                {
                    self.set_state(FadeState::FadeWait);
                    self.opacity = 1.0;
                    if !self.regenerated {
                        self.begin_regeneration();
                        regenerate = true;
                    }
                }
                FadeState::FadeIn { start_ms }
                    if now_ms.saturating_sub(start_ms) > self.fade_time_ms =>
                {
                    self.set_state(FadeState::Idle);
                    self.opacity = 0.0;
                    self.scene_begin_ms = Some(now_ms);
                }
                FadeState::FadeOut { start_ms } => self.opacity = self.ramp(start_ms, now_ms),
                FadeState::FadeIn { start_ms } => self.opacity = 1.0 - self.ramp(start_ms, now_ms),
                FadeState::FadeWait => self.opacity = 1.0,
                FadeState::Idle => {}
            }

            if !readiness.textures {
                self.opacity = 1.0;
            }
        }

        if self.state == FadeState::Idle && !readiness.textures {
            self.set_state(FadeState::FadeIn { start_ms: now_ms });
        }

        if self.state == FadeState::Idle
            && self.scene_elapsed_ms(now_ms, readiness.entities) > self.reset_interval_ms
        {
            info!("city on display for {} ms, regenerating", self.reset_interval_ms);
            regenerate |= self.request_regeneration(now_ms);
        }

        regenerate
    }
}

// ---------------------------------------------------------------------------
// ECS system
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
pub(crate) fn drive_lifecycle(
    time: Res<Time>,
    config: Res<CityConfig>,
    mut requests: EventReader<RegenerateRequested>,
    mut lifecycle: ResMut<FadeLifecycle>,
    mut state: ResMut<CityState>,
    mut layout: ResMut<CityLayout>,
    mut readiness: ResMut<SceneReadiness>,
    mut cleared: EventWriter<CityCleared>,
    mut regenerated: EventWriter<CityRegenerated>,
) {
    let now_ms = time.elapsed().as_millis() as u64;

    let mut rebuild = false;
    for _ in requests.read() {
        rebuild |= lifecycle.request_regeneration(now_ms);
    }
    if rebuild {
        run_regeneration(
            &mut state,
            &mut layout,
            &mut readiness,
            &config,
            &mut cleared,
            &mut regenerated,
        );
    }

    if lifecycle.advance(now_ms, *readiness) {
        run_regeneration(
            &mut state,
            &mut layout,
            &mut readiness,
            &config,
            &mut cleared,
            &mut regenerated,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FADE: u64 = 1500;

    fn ready() -> SceneReadiness {
        SceneReadiness::default()
    }

    fn not_ready() -> SceneReadiness {
        SceneReadiness {
            textures: false,
            entities: false,
        }
    }

    fn idle() -> FadeLifecycle {
        FadeLifecycle::idle(FADE, 60_000)
    }

    #[test]
    fn test_full_cycle() {
        let mut life = idle();
        assert!(!life.request_regeneration(1000));
        assert_eq!(life.state(), FadeState::FadeOut { start_ms: 1000 });

        assert!(!life.advance(1750, ready()));
        assert!((life.opacity() - 0.5).abs() < 1e-6);

        // Past the fade: obscured and rebuild requested exactly once.
        assert!(life.advance(2501, ready()));
        assert_eq!(life.state(), FadeState::FadeWait);
        assert_eq!(life.opacity(), 1.0);

        // Collaborators still rebuilding.
        assert!(!life.advance(2600, not_ready()));
        assert_eq!(life.state(), FadeState::FadeWait);
        assert_eq!(life.opacity(), 1.0);

        assert!(!life.advance(2700, ready()));
        assert_eq!(life.state(), FadeState::FadeIn { start_ms: 2700 });
        assert_eq!(life.opacity(), 1.0);

        assert!(!life.advance(3450, ready()));
        assert!((life.opacity() - 0.5).abs() < 1e-6);

        assert!(!life.advance(4201, ready()));
        assert_eq!(life.state(), FadeState::Idle);
        assert_eq!(life.opacity(), 0.0);
        assert_eq!(life.scene_begin_ms(), Some(4201));
    }

    #[test]
    fn test_second_request_during_fade_out_rebuilds_now() {
        let mut life = idle();
        assert!(!life.request_regeneration(0));
        assert!(life.request_regeneration(500));
        assert_eq!(life.state(), FadeState::FadeOut { start_ms: 500 });
        // The grid was already rebuilt, so reaching the wait does not do it again.
        assert!(!life.advance(2001, ready()));
        assert_eq!(life.state(), FadeState::FadeWait);
    }

    #[test]
    fn test_unready_textures_force_full_opacity() {
        let mut life = idle();
        life.request_regeneration(0);
        let readiness = SceneReadiness {
            textures: false,
            entities: true,
        };
        life.advance(300, readiness);
        assert_eq!(life.opacity(), 1.0);
    }

    #[test]
    fn test_idle_without_textures_fades_back_in() {
        let mut life = idle();
        assert!(!life.advance(100, not_ready()));
        assert_eq!(life.state(), FadeState::FadeIn { start_ms: 100 });
    }

    #[test]
    fn test_scene_elapsed_floor() {
        let mut life = idle();
        assert_eq!(life.scene_elapsed_ms(5000, true), 1);
        life.scene_begin_ms = Some(5000);
        assert_eq!(life.scene_elapsed_ms(5000, true), 1);
        assert_eq!(life.scene_elapsed_ms(7000, true), 2000);
        assert_eq!(life.scene_elapsed_ms(7000, false), 1);
    }

    #[test]
    fn test_auto_regeneration_after_interval() {
        let mut life = FadeLifecycle::idle(FADE, 10_000);
        life.scene_begin_ms = Some(1000);
        assert!(!life.advance(11_000, ready()));
        assert_eq!(life.state(), FadeState::Idle);
        assert!(!life.advance(11_001, ready()));
        assert_eq!(life.state(), FadeState::FadeOut { start_ms: 11_001 });
    }

    #[test]
    fn test_regeneration_clears_scene_begin() {
        let mut life = idle();
        life.scene_begin_ms = Some(10);
        life.request_regeneration(100);
        assert!(life.advance(100 + FADE + 1, ready()));
        assert_eq!(life.scene_begin_ms(), None);
    }

    #[test]
    fn test_obscured_start_waits_for_collaborators() {
        let config = CityConfig::default();
        let mut life = FadeLifecycle::obscured(&config);
        assert_eq!(life.opacity(), 1.0);
        assert!(!life.advance(0, not_ready()));
        assert_eq!(life.state(), FadeState::FadeWait);
        assert!(!life.advance(16, ready()));
        assert_eq!(life.state(), FadeState::FadeIn { start_ms: 16 });
    }
}
