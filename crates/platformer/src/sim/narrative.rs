//! Proximity-driven dialogue and the scroll drop.
//!
//! Both triggers fire when their close timer crosses its threshold, not while
//! it sits above it, so a trigger can only repeat after the player and the
//! companion drift apart (resetting the timer) and come back together.

use super::body::Body;
use super::events::SimEvent;
use super::world::{ScrollItem, World};
use crate::tuning::Tuning;

pub const COMPANION_LINE: &str = "Thanks for waiting for me. Let's keep going together!";
pub const SCROLL_TITLE: &str = "A note for you";
pub const SCROLL_BODY: &str = "You found every box and never left me behind.\n\
    This little world was built for the two of us to wander.\n\
    \n\
    Whatever comes next, I'll be right there next to you.";

/// Close enough horizontally, and neither actor rising or falling.
pub(crate) fn close_and_settled(player: &Body, companion: &Body, tuning: &Tuning) -> bool {
    let close = (player.center_x() - companion.center_x()).abs() <= tuning.close_distance;
    close && player.is_settled(tuning.settled_speed) && companion.is_settled(tuning.settled_speed)
}

/// Accumulates `timer` while `close` holds and reports the step it crosses
/// `threshold`.
fn advance_close_timer(timer: &mut f32, close: bool, dt: f32, threshold: f32) -> bool {
    if !close {
        *timer = 0.0;
        return false;
    }
    let before = *timer;
    *timer += dt;
    before < threshold && *timer >= threshold
}

impl World {
    pub(super) fn step_narrative(&mut self, dt: f32) {
        self.narrative.prompt_phase += dt;

        let Some(companion) = self.companion.as_ref() else {
            self.narrative.clear_timers();
            return;
        };
        let companion_body = companion.body;
        let close = close_and_settled(&self.player.body, &companion_body, &self.tuning);

        if !self.narrative.dialogue_active
            && advance_close_timer(
                &mut self.narrative.dialogue_close_timer,
                close,
                dt,
                self.tuning.dialogue_close_seconds,
            )
        {
            self.narrative.dialogue_active = true;
            self.narrative.dialogue_remaining = self.tuning.dialogue_seconds;
            self.events.emit(SimEvent::DialogueStarted);
        }

        if self.narrative.dialogue_active {
            self.narrative.dialogue_remaining -= dt;
            if self.narrative.dialogue_remaining <= 0.0 {
                self.narrative.dialogue_active = false;
                self.narrative.dialogue_remaining = 0.0;
                self.events.emit(SimEvent::DialogueEnded);
            }
        }

        if self.scroll.is_none()
            && !self.narrative.scroll_panel_open
            && advance_close_timer(
                &mut self.narrative.scroll_close_timer,
                close,
                dt,
                self.tuning.scroll_close_seconds,
            )
        {
            self.drop_scroll(&companion_body);
        }
    }

    fn drop_scroll(&mut self, companion: &Body) {
        let size = self.tuning.scroll_size;
        let body = Body::new(
            companion.center_x() - size * 0.5,
            companion.position.y - self.tuning.scroll_drop_height,
            size,
            size,
        );
        self.scroll = Some(ScrollItem {
            body,
            picked: false,
        });
        self.events.emit(SimEvent::ScrollDropped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_timer_fires_on_crossing_only() {
        let mut timer = 0.0;
        assert!(!advance_close_timer(&mut timer, true, 0.6, 1.0));
        assert!(advance_close_timer(&mut timer, true, 0.6, 1.0));
        assert!(!advance_close_timer(&mut timer, true, 0.6, 1.0));
        assert!(!advance_close_timer(&mut timer, false, 0.6, 1.0));
        assert_eq!(timer, 0.0);
        assert!(!advance_close_timer(&mut timer, true, 0.6, 1.0));
        assert!(advance_close_timer(&mut timer, true, 0.6, 1.0));
    }

    #[test]
    fn airborne_actor_is_not_settled() {
        let tuning = Tuning::default();
        let player = Body::new(100.0, 0.0, 50.0, 60.0);
        let mut companion = Body::new(150.0, 0.0, 50.0, 60.0);
        assert!(close_and_settled(&player, &companion, &tuning));
        companion.velocity.y = -300.0;
        assert!(!close_and_settled(&player, &companion, &tuning));
        companion.velocity.y = 0.0;
        companion.position.x = 400.0;
        assert!(!close_and_settled(&player, &companion, &tuning));
    }
}
