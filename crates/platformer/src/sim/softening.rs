use super::body::Body;
use super::geometry::{overlaps, Rect};
use super::world::World;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActorSlot {
    Player,
    Companion,
    Pet(usize),
}

#[derive(Debug, Clone, Copy)]
struct SoftBody {
    slot: ActorSlot,
    rect: Rect,
    grounded: bool,
    min_x: f32,
    max_x: f32,
}

impl SoftBody {
    fn pinned(&self) -> bool {
        self.slot == ActorSlot::Player
    }

    /// Whether this body refuses a push of `amount` along the chosen axis.
    fn holds(&self, vertical: bool, amount: f32) -> bool {
        self.pinned() || (vertical && amount > 0.0 && self.grounded)
    }

    /// Applies a push, keeping x inside the viewport bounds. A push that
    /// would land the body inside a solid is dropped.
    fn nudge(&mut self, vertical: bool, amount: f32, solids: &[Rect]) {
        let mut moved = self.rect;
        if vertical {
            moved.y += amount;
        } else {
            moved.x = (moved.x + amount).min(self.max_x).max(self.min_x);
        }
        if solids.iter().any(|solid| overlaps(&moved, solid)) {
            return;
        }
        self.rect = moved;
    }
}

/// Nudges overlapping actors apart after collision resolution.
///
/// Only positions change. Grounded flags and velocities are left alone, and a
/// pair can still overlap afterwards when the per-pass push cap is hit or a
/// push is refused. Grounded bodies are never pushed down and no body is
/// pushed into a solid.
fn soften(bodies: &mut [SoftBody], solids: &[Rect], tuning: &Tuning) {
    for _ in 0..tuning.softening_passes {
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                separate_pair(bodies, i, j, solids, tuning);
            }
        }
    }
}

fn separate_pair(
    bodies: &mut [SoftBody],
    i: usize,
    j: usize,
    solids: &[Rect],
    tuning: &Tuning,
) {
    let (a, b) = (bodies[i], bodies[j]);
    let overlap_x = a.rect.right().min(b.rect.right()) - a.rect.x.max(b.rect.x);
    let overlap_y = a.rect.bottom().min(b.rect.bottom()) - a.rect.y.max(b.rect.y);
    if overlap_x <= 0.0 || overlap_y <= 0.0 {
        return;
    }

    let vertical = overlap_y < overlap_x * tuning.softening_vertical_bias;
    let (overlap, a_first) = if vertical {
        (overlap_y, a.rect.center().y <= b.rect.center().y)
    } else {
        (overlap_x, a.rect.center().x <= b.rect.center().x)
    };
    let push = overlap.min(tuning.softening_max_push);
    // `a` moves toward negative coordinates when it sits first on the axis.
    let direction = if a_first { -1.0 } else { 1.0 };
    let (push_a, push_b) = match (a.holds(vertical, direction), b.holds(vertical, -direction)) {
        (true, true) => return,
        (true, false) => (0.0, push),
        (false, true) => (push, 0.0),
        (false, false) => (push * 0.5, push * 0.5),
    };

    if push_a > 0.0 {
        bodies[i].nudge(vertical, direction * push_a, solids);
    }
    if push_b > 0.0 {
        bodies[j].nudge(vertical, -direction * push_b, solids);
    }
}

impl World {
    pub(super) fn soften_overlaps(&mut self) {
        let soft = |slot: ActorSlot, body: &Body| {
            let (min_x, max_x) = self.actor_x_bounds(body.size.x);
            SoftBody {
                slot,
                rect: body.rect(),
                grounded: body.grounded,
                min_x,
                max_x,
            }
        };
        let mut bodies = Vec::with_capacity(2 + self.pets.len());
        bodies.push(soft(ActorSlot::Player, &self.player.body));
        if let Some(companion) = &self.companion {
            bodies.push(soft(ActorSlot::Companion, &companion.body));
        }
        bodies.extend(
            self.pets
                .iter()
                .enumerate()
                .map(|(index, pet)| soft(ActorSlot::Pet(index), &pet.body)),
        );

        soften(&mut bodies, &self.solids, &self.tuning);

        for separated in bodies {
            let body = match separated.slot {
                ActorSlot::Player => continue,
                ActorSlot::Companion => match self.companion.as_mut() {
                    Some(companion) => &mut companion.body,
                    None => continue,
                },
                ActorSlot::Pet(index) => match self.pets.get_mut(index) {
                    Some(pet) => &mut pet.body,
                    None => continue,
                },
            };
            body.position.x = separated.rect.x;
            body.position.y = separated.rect.y;
        }
    }
}
