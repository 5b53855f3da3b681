//! Axis-aligned rectangles and the single-obstacle collision resolver.
//!
//! Coordinates are screen pixels with +y pointing down, so a body standing on
//! a platform touches the platform's *top* face.

use engine::Vec2;

use super::body::Body;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }
}

/// Face of the obstacle the mover struck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactSide {
    Top,
    Bottom,
    Left,
    Right,
}

/// Strict overlap: rectangles that only share an edge do not overlap.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Pushes `mover` out of `obstacle` and reports the struck face.
///
/// `prior` is the mover's position before this step's integration. If the
/// mover was clear of the obstacle along some axis at `prior`, that axis and
/// direction decide the face (top, bottom, left, right, in that order).
/// Otherwise it was already inside, and it leaves along the axis of least
/// penetration; ties go to the vertical axis.
///
/// Only a top contact sets `grounded`; the matching velocity component is
/// zeroed for every face.
pub fn resolve(mover: &mut Body, obstacle: &Rect, prior: Vec2) -> Option<ContactSide> {
    if !overlaps(&mover.rect(), obstacle) {
        return None;
    }

    let w = mover.size.x;
    let h = mover.size.y;

    if prior.y + h <= obstacle.y {
        return Some(push_out(mover, obstacle, ContactSide::Top));
    }
    if prior.y >= obstacle.bottom() {
        return Some(push_out(mover, obstacle, ContactSide::Bottom));
    }
    if prior.x + w <= obstacle.x {
        return Some(push_out(mover, obstacle, ContactSide::Left));
    }
    if prior.x >= obstacle.right() {
        return Some(push_out(mover, obstacle, ContactSide::Right));
    }

    Some(push_out(mover, obstacle, min_penetration_side(mover, obstacle)))
}

fn min_penetration_side(mover: &Body, obstacle: &Rect) -> ContactSide {
    let rect = mover.rect();
    let into_left = rect.right() - obstacle.x;
    let into_right = obstacle.right() - rect.x;
    let into_top = rect.bottom() - obstacle.y;
    let into_bottom = obstacle.bottom() - rect.y;

    let min_x = into_left.min(into_right);
    let min_y = into_top.min(into_bottom);

    if min_x < min_y {
        if into_left < into_right {
            ContactSide::Left
        } else {
            ContactSide::Right
        }
    } else if into_top < into_bottom {
        ContactSide::Top
    } else {
        ContactSide::Bottom
    }
}

fn push_out(mover: &mut Body, obstacle: &Rect, side: ContactSide) -> ContactSide {
    match side {
        ContactSide::Top => {
            mover.position.y = obstacle.y - mover.size.y;
            mover.velocity.y = 0.0;
            mover.grounded = true;
        }
        ContactSide::Bottom => {
            mover.position.y = obstacle.bottom();
            mover.velocity.y = 0.0;
        }
        ContactSide::Left => {
            mover.position.x = obstacle.x - mover.size.x;
            mover.velocity.x = 0.0;
        }
        ContactSide::Right => {
            mover.position.x = obstacle.right();
            mover.velocity.x = 0.0;
        }
    }
    side
}
