//! Contact detection and classification
//!
//! Bodies carry exactly one category bit and a mask of categories they
//! report contacts with. A contact is raised only when a touch begins and
//! both bodies accept each other at that moment. The tracker remembers every
//! overlapping pair, filtered or not, so a pair that began while filtered is
//! not reported later just because a mask changed mid-touch.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::player::Player;
use super::powerup::PowerUpController;
use super::spikes::{SpikeWalls, WallSide};
use crate::tuning::Tuning;

/// Category bits
#[derive(Debug, Clone, Copy)]
pub struct Category;

impl Category {
    pub const NONE: u32 = 0;
    pub const PLAYER: u32 = 1 << 0;
    pub const SPIKE: u32 = 1 << 1;
    pub const EDGE: u32 = 1 << 2;
    pub const POWER_UP: u32 = 1 << 3;
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Overlap test, touching edges count
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// Permanent spike rows along the top and bottom of the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum KillZone {
    Top,
    Bottom,
}

/// Every body that can take part in a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Body {
    Player,
    Edge(WallSide),
    WallSpike { side: WallSide, index: usize },
    KillZone(KillZone),
    PowerUp,
}

impl Body {
    pub fn category(&self) -> u32 {
        match self {
            Body::Player => Category::PLAYER,
            Body::Edge(_) => Category::EDGE,
            Body::WallSpike { .. } | Body::KillZone(_) => Category::SPIKE,
            Body::PowerUp => Category::POWER_UP,
        }
    }

    /// Categories this body reports contacts with.
    /// Only the player's mask varies; everything else listens for the player.
    pub fn contact_mask(&self, player_mask: u32) -> u32 {
        match self {
            Body::Player => player_mask,
            _ => Category::PLAYER,
        }
    }
}

/// Two bodies that started touching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contact {
    pub a: Body,
    pub b: Body,
}

impl Contact {
    pub fn new(a: Body, b: Body) -> Self {
        Self { a, b }
    }

    /// The body paired with a body of `category`, checking both orderings
    fn other_than(&self, category: u32) -> Option<Body> {
        if self.a.category() == category {
            Some(self.b)
        } else if self.b.category() == category {
            Some(self.a)
        } else {
            None
        }
    }

    /// Whether both bodies accept each other given the player's current mask
    pub fn is_reported(&self, player_mask: u32) -> bool {
        accepts(
            self.a.category(),
            self.a.contact_mask(player_mask),
            self.b.category(),
            self.b.contact_mask(player_mask),
        )
    }

    /// Order-independent key for tracking touching pairs
    fn key(&self) -> (Body, Body) {
        if self.a <= self.b {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }
}

/// What a contact means for the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    /// Player touched a side edge (informational)
    PlayerEdge(WallSide),
    /// Player touched a wall spike or a kill zone
    PlayerSpike(Body),
    /// Player touched the power-up
    PlayerPowerUp,
    /// Any other pairing
    Ignored,
}

/// Classify a contact regardless of body order
pub fn classify(contact: &Contact) -> ContactKind {
    let Some(other) = contact.other_than(Category::PLAYER) else {
        return ContactKind::Ignored;
    };
    match other {
        Body::Edge(side) => ContactKind::PlayerEdge(side),
        Body::WallSpike { .. } | Body::KillZone(_) => ContactKind::PlayerSpike(other),
        Body::PowerUp => ContactKind::PlayerPowerUp,
        Body::Player => ContactKind::Ignored,
    }
}

/// Whether two bodies report contacts with each other
pub fn accepts(a_category: u32, a_mask: u32, b_category: u32, b_mask: u32) -> bool {
    (a_category & b_mask) != 0 && (b_category & a_mask) != 0
}

/// Remembers touching pairs so each touch is reported once
#[derive(Debug, Clone, Default)]
pub struct ContactTracker {
    touching: HashSet<(Body, Body)>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the touching set with `overlapping` and return the pairs that
    /// just began and pass mask filtering under `player_mask`
    pub fn update(&mut self, overlapping: Vec<Contact>, player_mask: u32) -> Vec<Contact> {
        let mut next = HashSet::with_capacity(overlapping.len());
        let mut began = Vec::new();
        for contact in overlapping {
            let key = contact.key();
            let is_new = !self.touching.contains(&key) && !next.contains(&key);
            if is_new && contact.is_reported(player_mask) {
                began.push(contact);
            }
            next.insert(key);
        }
        self.touching = next;
        began
    }
}

/// Bounds of a kill zone
pub fn kill_zone_bounds(zone: KillZone, tuning: &Tuning) -> Aabb {
    let w = tuning.field_width;
    let h = tuning.field_height;
    let margin = tuning.kill_margin;
    match zone {
        KillZone::Top => Aabb::new(Vec2::new(0.0, h - margin), Vec2::new(w, h + margin)),
        KillZone::Bottom => Aabb::new(Vec2::new(0.0, -margin), Vec2::new(w, margin)),
    }
}

/// Bounds of a side edge (just outside the field)
pub fn edge_bounds(side: WallSide, tuning: &Tuning) -> Aabb {
    let h = tuning.field_height;
    let w = tuning.field_width;
    match side {
        WallSide::Left => Aabb::new(Vec2::new(-10.0, 0.0), Vec2::new(0.0, h)),
        WallSide::Right => Aabb::new(Vec2::new(w, 0.0), Vec2::new(w + 10.0, h)),
    }
}

/// Every body the player currently overlaps, before mask filtering
pub fn overlapping_contacts(
    player: &Player,
    walls: &SpikeWalls,
    power_up: &PowerUpController,
    tuning: &Tuning,
) -> Vec<Contact> {
    let mut contacts = Vec::new();
    let body = player.body_bounds(tuning);
    let sprite = player.sprite_bounds(tuning);

    let mut check = |other: Body, overlap: bool| {
        if overlap {
            contacts.push(Contact::new(Body::Player, other));
        }
    };

    for side in WallSide::BOTH {
        check(Body::Edge(side), sprite.intersects(&edge_bounds(side, tuning)));
    }

    for side in WallSide::BOTH {
        let wall = walls.wall(side);
        for index in 0..wall.len() {
            if let Some(bounds) = wall.slot_bounds(index, tuning) {
                check(Body::WallSpike { side, index }, body.intersects(&bounds));
            }
        }
    }

    for zone in [KillZone::Top, KillZone::Bottom] {
        check(
            Body::KillZone(zone),
            body.intersects(&kill_zone_bounds(zone, tuning)),
        );
    }

    if let Some(bounds) = power_up.bounds(tuning) {
        check(Body::PowerUp, body.intersects(&bounds));
    }

    contacts
}
