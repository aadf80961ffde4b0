//! Per-gesture state and the edge policy
//!
//! A [`Gesture`] is created on start and owned by the engine's state enum
//! until release, so nothing from one gesture leaks into the next.

use flipdeck_platform::DeviceFamily;

/// Drags at or under this distance (px) are treated as taps
pub const DEAD_ZONE: f32 = 10.0;

/// Locked drag direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Finger moves up: advance to the next slide
    Up,
    /// Finger moves down: go back to the previous slide
    Down,
}

impl Direction {
    /// Direction of a non-zero displacement
    pub fn from_delta(delta: f32) -> Option<Self> {
        if delta > 0.0 {
            Some(Direction::Down)
        } else if delta < 0.0 {
            Some(Direction::Up)
        } else {
            None
        }
    }

    /// +1 for `Down`, -1 for `Up`
    pub fn sign(self) -> f32 {
        match self {
            Direction::Down => 1.0,
            Direction::Up => -1.0,
        }
    }

    /// Resting offset of the candidate slide before it slides in
    pub fn entry_offset(self, height: f32) -> f32 {
        -self.sign() * height
    }
}

/// One continuous interaction, start to release
#[derive(Clone, Debug, PartialEq)]
pub struct Gesture {
    /// Family the gesture bound to on start
    pub family: DeviceFamily,
    /// Start coordinate (page y)
    pub start_y: f32,
    /// Most recent accepted coordinate
    pub last_y: f32,
    /// Locked direction, once a candidate was found
    pub lock: Option<Direction>,
    /// Candidate slide, once locked
    pub next: Option<usize>,
}

impl Gesture {
    pub fn new(family: DeviceFamily, y: f32) -> Self {
        Self {
            family,
            start_y: y,
            last_y: y,
            lock: None,
            next: None,
        }
    }

    /// Signed displacement from the start
    pub fn delta(&self) -> f32 {
        self.last_y - self.start_y
    }

    /// Absolute displacement, whichever way the drag went
    pub fn distance(&self) -> f32 {
        self.delta().abs()
    }

    /// Whether release should animate rather than count as a tap
    pub fn is_drag(&self) -> bool {
        self.next.is_some() && self.delta().abs() > DEAD_ZONE
    }
}

/// Which slide a drag reveals from a given position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgePolicy {
    pub len: usize,
    /// Wrap forward from the last slide to the first
    pub cycle: bool,
    /// Also wrap backward from the first slide to the last
    pub first_change: bool,
}

impl EdgePolicy {
    /// Candidate index for a drag from `now` in `direction`
    pub fn candidate(&self, now: usize, direction: Direction) -> Option<usize> {
        if self.len < 2 || now >= self.len {
            return None;
        }
        let last = self.len - 1;
        match direction {
            Direction::Up if now == last => self.cycle.then_some(0),
            Direction::Up => Some(now + 1),
            Direction::Down if now == 0 => (self.cycle && self.first_change).then_some(last),
            Direction::Down => Some(now - 1),
        }
    }
}
