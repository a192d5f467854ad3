//! Room names and positions.
//!
//! Rooms are 50x50 tile squares laid out on a global grid. A room name such
//! as `W3N7` addresses one square: `E0`/`S0` are the first columns/rows on
//! the positive side, `W0`/`N0` the first on the negative side.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Side length of a room in tiles.
pub const ROOM_SIZE: i32 = 50;

/// Grid coordinates of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomName {
    pub x: i32,
    pub y: i32,
}

impl RoomName {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Rooms to cross to get from `self` to `other`, diagonals counting one.
    pub fn distance(&self, other: &RoomName) -> u32 {
        (self.x - other.x)
            .unsigned_abs()
            .max((self.y - other.y).unsigned_abs())
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, hn) = if self.x >= 0 { ('E', self.x) } else { ('W', -self.x - 1) };
        let (v, vn) = if self.y >= 0 { ('S', self.y) } else { ('N', -self.y - 1) };
        write!(f, "{}{}{}{}", h, hn, v, vn)
    }
}

/// Error returned when a room name does not match `[WE]<n>[NS]<n>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoomNameError(pub String);

impl fmt::Display for ParseRoomNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid room name '{}'", self.0)
    }
}

impl std::error::Error for ParseRoomNameError {}

impl FromStr for RoomName {
    type Err = ParseRoomNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseRoomNameError(s.to_string());
        let upper = s.to_ascii_uppercase();
        let split = upper.find(['N', 'S']).ok_or_else(err)?;
        let (horizontal, vertical) = upper.split_at(split);

        let axis = |part: &str, positive: char, negative: char| -> Option<i32> {
            let mut chars = part.chars();
            let dir = chars.next()?;
            let n: i32 = chars.as_str().parse().ok()?;
            if dir == positive {
                Some(n)
            } else if dir == negative {
                Some(-n - 1)
            } else {
                None
            }
        };

        let x = axis(horizontal, 'E', 'W').ok_or_else(err)?;
        let y = axis(vertical, 'S', 'N').ok_or_else(err)?;
        Ok(RoomName { x, y })
    }
}

impl Serialize for RoomName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RoomName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// A tile inside a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub room: RoomName,
    pub x: u8,
    pub y: u8,
}

impl Position {
    pub fn new(room: RoomName, x: u8, y: u8) -> Self {
        Self { room, x, y }
    }

    /// Coordinates on the global tile grid.
    pub fn world_coords(&self) -> (i32, i32) {
        (
            self.room.x * ROOM_SIZE + self.x as i32,
            self.room.y * ROOM_SIZE + self.y as i32,
        )
    }

    pub fn from_world_coords(wx: i32, wy: i32) -> Self {
        let rx = wx.div_euclid(ROOM_SIZE);
        let ry = wy.div_euclid(ROOM_SIZE);
        Self {
            room: RoomName::new(rx, ry),
            x: wx.rem_euclid(ROOM_SIZE) as u8,
            y: wy.rem_euclid(ROOM_SIZE) as u8,
        }
    }

    /// Chebyshev distance in tiles; diagonal steps cost one like straight ones.
    pub fn range_to(&self, other: &Position) -> u32 {
        let (ax, ay) = self.world_coords();
        let (bx, by) = other.world_coords();
        (ax - bx).unsigned_abs().max((ay - by).unsigned_abs())
    }

    pub fn in_range_to(&self, other: &Position, range: u32) -> bool {
        self.range_to(other) <= range
    }

    /// The neighbouring tile one step closer to `target`.
    pub fn step_toward(&self, target: &Position) -> Position {
        let (ax, ay) = self.world_coords();
        let (bx, by) = target.world_coords();
        Position::from_world_coords(ax + (bx - ax).signum(), ay + (by - ay).signum())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {},{}]", self.room, self.x, self.y)
    }
}
