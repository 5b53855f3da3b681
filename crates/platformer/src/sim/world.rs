use std::f32::consts::PI;

use engine::{Vec2, Viewport};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::body::{Body, Facing, JumpLatch};
use super::events::{SimEvent, SimEventBus};
use super::geometry::{overlaps, Rect};
use super::step::SimStage;
use crate::tuning::Tuning;

/// Left edge of the ground slab; wide enough that nothing walks off it.
const GROUND_X: f32 = -99_999.0;
const GROUND_WIDTH: f32 = 199_999.0;
const PLATFORM_THICKNESS: f32 = 26.0;

/// `(x, height above ground, width)` for each fixed platform.
const PLATFORM_LAYOUT: [(f32, f32, f32); 5] = [
    (140.0, 270.0, 140.0),
    (340.0, 130.0, 140.0),
    (580.0, 240.0, 180.0),
    (880.0, 360.0, 140.0),
    (1100.0, 120.0, 140.0),
];

/// `(x, height above ground)` for each breakable box.
const BOX_LAYOUT: [(f32, f32); 3] = [(185.0, 420.0), (920.0, 540.0), (1140.0, 310.0)];

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl ViewportSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl From<Viewport> for ViewportSize {
    fn from(viewport: Viewport) -> Self {
        Self::new(viewport.width as f32, viewport.height as f32)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LootBox {
    pub rect: Rect,
    pub hits_left: u32,
    pub bounce_timer: f32,
}

impl LootBox {
    /// Upward draw offset while the hit animation plays.
    pub fn bounce_offset(&self, tuning: &Tuning) -> f32 {
        if self.bounce_timer <= 0.0 {
            return 0.0;
        }
        let phase = (self.bounce_timer / tuning.box_bounce_seconds).clamp(0.0, 1.0);
        (phase * PI).sin() * tuning.box_bounce_height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Loot {
    pub body: Body,
    pub age: f32,
    pub collectable: bool,
    pub collected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub body: Body,
    pub jump: JumpLatch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Companion {
    pub body: Body,
    pub stuck_timer: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PetOwner {
    Player,
    Companion,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PetMode {
    #[default]
    FollowOwner,
    SeekLoot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pet {
    pub body: Body,
    pub owner: PetOwner,
    pub mode: PetMode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollItem {
    pub body: Body,
    pub picked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collector {
    Player,
    Pet(usize),
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Narrative {
    pub dialogue_close_timer: f32,
    pub dialogue_active: bool,
    pub dialogue_remaining: f32,
    pub scroll_close_timer: f32,
    pub scroll_panel_open: bool,
    /// Free-running clock for the pickup prompt pulse.
    pub prompt_phase: f32,
}

impl Narrative {
    pub(crate) fn clear_timers(&mut self) {
        self.dialogue_close_timer = 0.0;
        self.dialogue_active = false;
        self.dialogue_remaining = 0.0;
        self.scroll_close_timer = 0.0;
    }
}

/// The whole simulation state. Every stage of [`World::step`] mutates it in
/// place, in the fixed order of `SIM_STAGE_ORDER`.
#[derive(Debug, Clone)]
pub struct World {
    pub(crate) tuning: Tuning,
    pub(crate) viewport: ViewportSize,
    pub(crate) solids: Vec<Rect>,
    pub(crate) boxes: Vec<LootBox>,
    pub(crate) loot: Vec<Loot>,
    pub(crate) player: Player,
    pub(crate) companion: Option<Companion>,
    pub(crate) pets: Vec<Pet>,
    pub(crate) scroll: Option<ScrollItem>,
    pub(crate) narrative: Narrative,
    pub(crate) score: u32,
    pub(crate) loot_collected: u32,
    pub(crate) rng: StdRng,
    pub(crate) events: SimEventBus,
    pub(crate) last_step_order: Vec<SimStage>,
}

impl World {
    pub fn new(tuning: Tuning, viewport: ViewportSize, seed: u64) -> Self {
        let player = Player {
            body: Body::new(0.0, 0.0, tuning.player_width, tuning.player_height),
            jump: JumpLatch::default(),
        };
        let mut world = Self {
            tuning,
            viewport,
            solids: Vec::new(),
            boxes: Vec::new(),
            loot: Vec::new(),
            player,
            companion: None,
            pets: Vec::new(),
            scroll: None,
            narrative: Narrative::default(),
            score: 0,
            loot_collected: 0,
            rng: StdRng::seed_from_u64(seed),
            events: SimEventBus::default(),
            last_step_order: Vec::new(),
        };
        world.build_layout();
        world
    }

    /// Rebuilds geometry and entities and zeroes every counter and timer.
    pub fn reset(&mut self) {
        self.build_layout();
        self.events.emit(SimEvent::WorldReset);
    }

    /// Applies new viewport dimensions. The layout hangs off the viewport
    /// height, so any change rebuilds the world.
    pub fn resize(&mut self, viewport: ViewportSize) -> bool {
        if viewport == self.viewport {
            return false;
        }
        self.viewport = viewport;
        self.reset();
        true
    }

    fn build_layout(&mut self) {
        let ground_y = self.ground_y();
        let tuning = &self.tuning;

        self.solids.clear();
        self.solids.push(Rect::new(
            GROUND_X,
            ground_y,
            GROUND_WIDTH,
            tuning.ground_height,
        ));
        self.solids
            .extend(PLATFORM_LAYOUT.iter().map(|&(x, above, width)| {
                Rect::new(x, ground_y - above, width, PLATFORM_THICKNESS)
            }));

        self.boxes = BOX_LAYOUT
            .iter()
            .map(|&(x, above)| LootBox {
                rect: Rect::new(x, ground_y - above, tuning.box_size, tuning.box_size),
                hits_left: tuning.box_hits_required,
                bounce_timer: 0.0,
            })
            .collect();

        let mut body = Body::new(
            tuning.player_spawn_x,
            ground_y - tuning.player_height,
            tuning.player_width,
            tuning.player_height,
        );
        body.grounded = true;
        self.player = Player {
            body,
            jump: JumpLatch::default(),
        };

        self.loot.clear();
        self.companion = None;
        self.pets.clear();
        self.scroll = None;
        self.narrative = Narrative::default();
        self.score = 0;
        self.loot_collected = 0;

        let player_body = self.player.body;
        for slot in 0..self.tuning.pets_per_player {
            self.spawn_pet(PetOwner::Player, &player_body, slot, ground_y);
        }
    }

    pub(crate) fn ground_y(&self) -> f32 {
        self.viewport.height - self.tuning.ground_height
    }

    /// Horizontal bounds for actors, inset by the viewport margin.
    pub(crate) fn actor_x_bounds(&self, width: f32) -> (f32, f32) {
        let margin = self.tuning.viewport_margin;
        (margin, self.viewport.width - width - margin)
    }

    /// Places a pet behind its owner, staggered by slot.
    fn spawn_pet(&mut self, owner: PetOwner, owner_body: &Body, slot: u32, y_bottom: f32) {
        let tuning = &self.tuning;
        let behind = tuning.pet_trail_offset + slot as f32 * tuning.pet_width;
        let x = owner_body.center_x() - owner_body.facing.sign() * behind - tuning.pet_width * 0.5;
        let mut body = Body::new(
            x,
            y_bottom - tuning.pet_height,
            tuning.pet_width,
            tuning.pet_height,
        );
        body.facing = owner_body.facing;
        let (min_x, max_x) = self.actor_x_bounds(body.size.x);
        body.clamp_x(min_x, max_x);

        self.pets.push(Pet {
            body,
            owner,
            mode: PetMode::FollowOwner,
        });
        self.events.emit(SimEvent::PetSpawned { owner });
    }

    pub(crate) fn spawn_loot(&mut self, box_index: usize) {
        let Some(source) = self.boxes.get(box_index) else {
            return;
        };
        let tuning = &self.tuning;
        let size = tuning.loot_size;
        let spread = tuning.loot_spread_speed;
        let mut body = Body::new(
            source.rect.center().x - size * 0.5,
            source.rect.y - tuning.loot_spawn_lift,
            size,
            size,
        );
        body.velocity = Vec2::new(
            self.rng.gen_range(-spread..=spread),
            -tuning.loot_launch_speed,
        );
        self.loot.push(Loot {
            body,
            age: 0.0,
            collectable: false,
            collected: false,
        });
        self.events.emit(SimEvent::LootSpawned { box_index });
    }

    /// Registers a box strike from below. Depleted boxes still bounce.
    pub(crate) fn strike_box(&mut self, box_index: usize) {
        let Some(struck) = self.boxes.get_mut(box_index) else {
            return;
        };
        struck.bounce_timer = self.tuning.box_bounce_seconds;
        if struck.hits_left == 0 {
            return;
        }
        struck.hits_left -= 1;
        let hits_left = struck.hits_left;
        self.score = self.score.saturating_add(self.tuning.box_hit_score);
        self.events.emit(SimEvent::BoxHit {
            box_index,
            hits_left,
        });
        self.spawn_loot(box_index);
    }

    /// Collects one loot item if it is still up for grabs.
    ///
    /// Returns false when the item was already collected or has not settled,
    /// so overlapping collectors racing in the same step count it once.
    pub(crate) fn try_collect_loot(&mut self, loot_index: usize, collector: Collector) -> bool {
        let Some(item) = self.loot.get_mut(loot_index) else {
            return false;
        };
        if item.collected || !item.collectable {
            return false;
        }
        item.collected = true;
        self.loot_collected = self.loot_collected.saturating_add(1);
        self.score = self.score.saturating_add(self.tuning.loot_score);
        self.events.emit(SimEvent::LootCollected {
            collector,
            loot_total: self.loot_collected,
        });

        if self.loot_collected >= self.tuning.companion_trigger_loot && self.companion.is_none()
        {
            self.spawn_companion();
        }
        true
    }

    /// Drops the companion in from above at a random column. No-op while one
    /// already exists.
    pub(crate) fn spawn_companion(&mut self) {
        if self.companion.is_some() {
            return;
        }
        let tuning = &self.tuning;
        let span = (self.viewport.width - tuning.player_width).max(0.0);
        let x = if span > 0.0 {
            self.rng.gen_range(0.0..span)
        } else {
            0.0
        };
        let body = Body::new(
            x,
            tuning.companion_spawn_y,
            tuning.player_width,
            tuning.player_height,
        );
        self.companion = Some(Companion {
            body,
            stuck_timer: 0.0,
        });
        self.narrative.clear_timers();
        self.scroll = None;
        self.narrative.scroll_panel_open = false;
        self.events.emit(SimEvent::CompanionSpawned { x });

        let y_bottom = body.feet_y();
        for slot in 0..self.tuning.pets_per_companion {
            self.spawn_pet(PetOwner::Companion, &body, slot, y_bottom);
        }
    }

    /// Opens the scroll panel if the player is standing on an unread scroll.
    pub fn request_pickup(&mut self) -> bool {
        if self.narrative.scroll_panel_open || !self.pickup_available() {
            return false;
        }
        if let Some(scroll) = self.scroll.as_mut() {
            scroll.picked = true;
        }
        self.narrative.scroll_panel_open = true;
        self.events.emit(SimEvent::ScrollPicked);
        true
    }

    pub fn request_close_panel(&mut self) -> bool {
        if !self.narrative.scroll_panel_open {
            return false;
        }
        self.narrative.scroll_panel_open = false;
        self.events.emit(SimEvent::ScrollPanelClosed);
        true
    }

    pub fn pickup_available(&self) -> bool {
        !self.narrative.scroll_panel_open
            && self.scroll.as_ref().is_some_and(|scroll| {
                !scroll.picked
                    && overlaps(&self.player.body.rect(), &scroll.body.rect())
            })
    }

    /// Body a pet should follow; companion pets fall back to the player
    /// while no companion exists.
    pub(crate) fn owner_body(&self, owner: PetOwner) -> Body {
        match (owner, self.companion.as_ref()) {
            (PetOwner::Companion, Some(companion)) => companion.body,
            _ => self.player.body,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn solids(&self) -> &[Rect] {
        &self.solids
    }

    pub fn boxes(&self) -> &[LootBox] {
        &self.boxes
    }

    pub fn loot(&self) -> &[Loot] {
        &self.loot
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn companion(&self) -> Option<&Companion> {
        self.companion.as_ref()
    }

    pub fn pets(&self) -> &[Pet] {
        &self.pets
    }

    pub fn scroll(&self) -> Option<&ScrollItem> {
        self.scroll.as_ref()
    }

    pub fn narrative(&self) -> &Narrative {
        &self.narrative
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn loot_collected(&self) -> u32 {
        self.loot_collected
    }

    pub fn events(&self) -> &SimEventBus {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.events.drain()
    }

    pub fn last_step_order(&self) -> &[SimStage] {
        &self.last_step_order
    }

    pub fn player_facing(&self) -> Facing {
        self.player.body.facing
    }
}
