//! Display colors per grouping key.
//!
//! Every placement sharing a `source_key` renders in one color; distinct keys
//! get distinct colors for as long as the palette lasts.

use std::collections::HashMap;
use std::fmt;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Field, ScheduleError, ScheduleResult};

/// Fixed palette, handed out in order.
pub const PALETTE: [&str; 16] = [
    "#4285f4", "#ea4335", "#fbbc05", "#34a853", "#8b5cf6", "#ec4899", "#06b6d4", "#84cc16",
    "#f59e0b", "#3b82f6", "#ef4444", "#10b981", "#6366f1", "#14b8a6", "#f97316", "#a855f7",
];

/// A `#rrggbb` color, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    pub fn parse(text: &str) -> ScheduleResult<Color> {
        let hex = text.trim();
        let valid = hex.len() == 7
            && hex.starts_with('#')
            && hex[1..].chars().all(|c| c.is_ascii_hexdigit());
        if !valid {
            return Err(ScheduleError::validation(
                Field::Color,
                format!("'{text}' is not a #rrggbb color"),
            ));
        }
        Ok(Color(hex.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Red, green and blue channels.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let channel = |i: usize| u8::from_str_radix(&self.0[i..i + 2], 16).unwrap_or(0);
        (channel(1), channel(3), channel(5))
    }

    fn from_palette(entry: &str) -> Color {
        Color(entry.to_string())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse(&value).map_err(|e| e.to_string())
    }
}

impl From<Color> for String {
    fn from(color: Color) -> String {
        color.0
    }
}

/// Remembers which color each grouping key was given.
///
/// At most one color per key. Owned by a [`Schedule`](crate::schedule::Schedule),
/// so independent schedules never share assignments.
#[derive(Debug, Clone, Default)]
pub struct ColorRegistry {
    assigned: HashMap<String, Color>,
}

impl ColorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The key's color, assigning the first free palette entry on first use.
    ///
    /// Once every palette entry is taken, a random entry is reused.
    pub fn color_for(&mut self, key: &str) -> Color {
        if let Some(color) = self.assigned.get(key) {
            return color.clone();
        }

        let color = match PALETTE
            .iter()
            .find(|entry| !self.assigned.values().any(|c| c.as_str() == **entry))
        {
            Some(entry) => Color::from_palette(entry),
            None => {
                warn!(key, "Color palette exhausted, reusing a random color");
                self.random_color()
            }
        };

        debug!(key, color = %color, "Assigned color");
        self.assigned.insert(key.to_string(), color.clone());
        color
    }

    /// Pin a key to a specific color (used when the user picks one).
    pub fn assign(&mut self, key: &str, color: Color) {
        self.assigned.insert(key.to_string(), color);
    }

    /// Forget the key so its color can be handed out again.
    pub fn release(&mut self, key: &str) -> Option<Color> {
        let released = self.assigned.remove(key);
        if let Some(ref color) = released {
            debug!(key, color = %color, "Released color");
        }
        released
    }

    /// A palette color with no bookkeeping, for placements without a key.
    pub fn random_color(&self) -> Color {
        let entry = PALETTE
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(PALETTE[0]);
        Color::from_palette(entry)
    }

    pub fn get(&self, key: &str) -> Option<&Color> {
        self.assigned.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.assigned.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }

    pub fn clear(&mut self) {
        self.assigned.clear();
    }
}
