use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dates::CalendarDate;

pub const MIN_STICKER_SCALE: f64 = 0.5;
pub const MAX_STICKER_SCALE: f64 = 2.0;
pub const STICKER_SCALE_STEP: f64 = 0.1;
pub const STICKER_ROTATE_STEP: f64 = 15.0;
pub const MAX_CAPTION_CHARS: usize = 100;

/// One emoji sticker on a polaroid. Position is normalized to the photo area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StickerState {
    pub emoji: String,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub rotate: f64,
    pub z: i32,
}

impl StickerState {
    /// A sticker dropped at the center, stacked above `existing` stickers
    pub fn placed(emoji: impl Into<String>, existing: usize) -> Self {
        Self {
            emoji: emoji.into(),
            x: 0.5,
            y: 0.5,
            scale: 1.0,
            rotate: 0.0,
            z: existing as i32 + 1,
        }
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.x = clamp_unit(x);
        self.y = clamp_unit(y);
    }

    pub fn grow(&mut self) {
        self.scale = (self.scale + STICKER_SCALE_STEP).min(MAX_STICKER_SCALE);
    }

    pub fn shrink(&mut self) {
        self.scale = (self.scale - STICKER_SCALE_STEP).max(MIN_STICKER_SCALE);
    }

    pub fn rotate_step(&mut self) {
        self.rotate += STICKER_ROTATE_STEP;
    }

    /// Clamp position and scale into their valid ranges
    pub fn normalized(mut self) -> Self {
        self.x = clamp_unit(self.x);
        self.y = clamp_unit(self.y);
        self.scale = if self.scale.is_finite() {
            self.scale.clamp(MIN_STICKER_SCALE, MAX_STICKER_SCALE)
        } else {
            1.0
        };
        if !self.rotate.is_finite() {
            self.rotate = 0.0;
        }
        self
    }
}

/// One change to a card's sticker list. Indexes are positions in the stored list.
#[derive(Debug, Clone, PartialEq)]
pub enum StickerEdit {
    Add(String),
    Move { index: usize, x: f64, y: f64 },
    Grow(usize),
    Shrink(usize),
    Rotate(usize),
    Remove(usize),
}

impl StickerEdit {
    /// Apply the edit to `stickers`, returning the new list
    pub fn apply(&self, stickers: &[StickerState]) -> Result<Vec<StickerState>, String> {
        let mut next = stickers.to_vec();

        match self {
            StickerEdit::Add(emoji) => {
                let emoji = emoji.trim();
                if emoji.is_empty() {
                    return Err("Sticker emoji cannot be empty".to_string());
                }
                next.push(StickerState::placed(emoji, stickers.len()));
            }
            StickerEdit::Move { index, x, y } => sticker_at(&mut next, *index)?.move_to(*x, *y),
            StickerEdit::Grow(index) => sticker_at(&mut next, *index)?.grow(),
            StickerEdit::Shrink(index) => sticker_at(&mut next, *index)?.shrink(),
            StickerEdit::Rotate(index) => sticker_at(&mut next, *index)?.rotate_step(),
            StickerEdit::Remove(index) => {
                sticker_at(&mut next, *index)?;
                next.remove(*index);
            }
        }
        Ok(next)
    }
}

fn sticker_at(stickers: &mut [StickerState], index: usize) -> Result<&mut StickerState, String> {
    stickers
        .get_mut(index)
        .ok_or_else(|| format!("No sticker at position {}", index + 1))
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.5
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayCard {
    pub id: i64,
    pub user_id: Uuid,
    pub card_date: CalendarDate,
    pub photo_url: Option<String>,
    pub thumb_url: Option<String>,
    pub caption: Option<String>,
    pub sticker_state: Vec<StickerState>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for a day card. `None` keeps the stored value.
///
/// `Some(None)` on the nullable fields clears them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayCardUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub photo_url: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub thumb_url: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub caption: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticker_state: Option<Vec<StickerState>>,
}

impl DayCardUpdate {
    /// Validate the update and normalize stickers and caption
    pub fn normalized(mut self) -> Result<Self, String> {
        if let Some(caption) = self.caption.as_mut() {
            let trimmed = caption.as_deref().map(str::trim).unwrap_or_default();
            if trimmed.chars().count() > MAX_CAPTION_CHARS {
                return Err(format!("Caption must be at most {} characters", MAX_CAPTION_CHARS));
            }
            // A blank caption clears the stored one
            *caption = (!trimmed.is_empty()).then(|| trimmed.to_string());
        }
        if let Some(stickers) = self.sticker_state.take() {
            if stickers.iter().any(|s| s.emoji.trim().is_empty()) {
                return Err("Sticker emoji cannot be empty".to_string());
            }
            self.sticker_state = Some(stickers.into_iter().map(StickerState::normalized).collect());
        }
        Ok(self)
    }

    /// Merge onto an existing card (or nothing), producing the stored field values
    pub fn merge_onto(&self, existing: Option<&DayCard>) -> MergedCard {
        MergedCard {
            photo_url: pick(&self.photo_url, existing.and_then(|c| c.photo_url.clone())),
            thumb_url: pick(&self.thumb_url, existing.and_then(|c| c.thumb_url.clone())),
            caption: pick(&self.caption, existing.and_then(|c| c.caption.clone())),
            sticker_state: self
                .sticker_state
                .clone()
                .or_else(|| existing.map(|c| c.sticker_state.clone()))
                .unwrap_or_default(),
        }
    }
}

fn pick(update: &Option<Option<String>>, current: Option<String>) -> Option<String> {
    match update {
        Some(value) => value.clone(),
        None => current,
    }
}

/// Field values to write after merging an update
#[derive(Debug, Clone, PartialEq)]
pub struct MergedCard {
    pub photo_url: Option<String>,
    pub thumb_url: Option<String>,
    pub caption: Option<String>,
    pub sticker_state: Vec<StickerState>,
}

/// Card fields needed for calendar thumbnails
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CardSummary {
    pub card_date: CalendarDate,
    pub photo_url: Option<String>,
    pub thumb_url: Option<String>,
}

impl CardSummary {
    /// Thumbnail when present, otherwise the full photo
    pub fn thumbnail_ref(&self) -> Option<String> {
        self.thumb_url.clone().or_else(|| self.photo_url.clone())
    }
}

// Distinguishes an absent field from an explicit `null`
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S, T>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
