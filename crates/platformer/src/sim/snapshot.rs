use super::body::{Body, Facing};
use super::geometry::Rect;
use super::narrative::{COMPANION_LINE, SCROLL_BODY, SCROLL_TITLE};
use super::world::{PetOwner, ViewportSize, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
    Player,
    Companion,
    Pet(PetOwner),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorView {
    pub kind: ActorKind,
    pub rect: Rect,
    pub facing: Facing,
    /// Derived from horizontal speed; nothing stores an animation state.
    pub walking: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxView {
    pub rect: Rect,
    pub hits_left: u32,
    pub bounce_offset: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LootView {
    pub rect: Rect,
    pub collectable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollView {
    pub rect: Rect,
    pub picked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelView {
    pub title: &'static str,
    pub body: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudView {
    pub score: u32,
    pub loot: u32,
    pub box_hits_left: Vec<u32>,
}

/// Read-only view of one frame, for whatever draws it.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub viewport: ViewportSize,
    pub solids: Vec<Rect>,
    pub actors: Vec<ActorView>,
    pub boxes: Vec<BoxView>,
    pub loot: Vec<LootView>,
    pub scroll: Option<ScrollView>,
    pub dialogue: Option<&'static str>,
    pub panel: Option<PanelView>,
    pub pickup_prompt_visible: bool,
    pub prompt_phase: f32,
    pub hud: HudView,
}

impl World {
    pub fn snapshot(&self) -> FrameSnapshot {
        let walk_speed = self.tuning.friction_stop_speed;
        let actor = |kind: ActorKind, body: &Body| ActorView {
            kind,
            rect: body.rect(),
            facing: body.facing,
            walking: body.velocity.x.abs() > walk_speed,
        };

        let mut actors = Vec::with_capacity(2 + self.pets.len());
        actors.push(actor(ActorKind::Player, &self.player.body));
        if let Some(companion) = &self.companion {
            actors.push(actor(ActorKind::Companion, &companion.body));
        }
        actors.extend(
            self.pets
                .iter()
                .map(|pet| actor(ActorKind::Pet(pet.owner), &pet.body)),
        );

        FrameSnapshot {
            viewport: self.viewport,
            solids: self.solids.clone(),
            actors,
            boxes: self
                .boxes
                .iter()
                .map(|loot_box| BoxView {
                    rect: loot_box.rect,
                    hits_left: loot_box.hits_left,
                    bounce_offset: loot_box.bounce_offset(&self.tuning),
                })
                .collect(),
            loot: self
                .loot
                .iter()
                .filter(|item| !item.collected)
                .map(|item| LootView {
                    rect: item.body.rect(),
                    collectable: item.collectable,
                })
                .collect(),
            scroll: self.scroll.as_ref().map(|scroll| ScrollView {
                rect: scroll.body.rect(),
                picked: scroll.picked,
            }),
            dialogue: self.narrative.dialogue_active.then_some(COMPANION_LINE),
            panel: self.narrative.scroll_panel_open.then_some(PanelView {
                title: SCROLL_TITLE,
                body: SCROLL_BODY,
            }),
            pickup_prompt_visible: self.pickup_available(),
            prompt_phase: self.narrative.prompt_phase,
            hud: HudView {
                score: self.score,
                loot: self.loot_collected,
                box_hits_left: self.boxes.iter().map(|b| b.hits_left).collect(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn fresh_world_snapshot_lists_player_and_pet() {
        let world = World::new(Tuning::default(), ViewportSize::new(1280.0, 720.0), 1);
        let snapshot = world.snapshot();
        assert_eq!(snapshot.actors.len(), 2);
        assert_eq!(snapshot.actors[0].kind, ActorKind::Player);
        assert_eq!(snapshot.actors[1].kind, ActorKind::Pet(PetOwner::Player));
        assert!(!snapshot.actors[0].walking);
        assert_eq!(snapshot.hud.box_hits_left, vec![3, 3, 3]);
        assert_eq!(snapshot.dialogue, None);
        assert_eq!(snapshot.panel, None);
        assert!(!snapshot.pickup_prompt_visible);
    }
}
