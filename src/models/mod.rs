pub mod day_card;
pub mod praise;
pub mod stamp;

pub use day_card::{CardSummary, DayCard, DayCardUpdate, MergedCard, StickerEdit, StickerState};
pub use praise::{Praise, PraiseInput};
pub use stamp::{DayStamp, DayStampWithAsset, StampAsset, StampInput};
