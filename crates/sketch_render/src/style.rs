//! Drawing style state

use sketch_core::math::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl StrokeCap {
    pub const ALL: [StrokeCap; 3] = [StrokeCap::Butt, StrokeCap::Round, StrokeCap::Square];

    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn name(self) -> &'static str {
        match self {
            StrokeCap::Butt => "Butt",
            StrokeCap::Round => "Round",
            StrokeCap::Square => "Square",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl StrokeJoin {
    pub const ALL: [StrokeJoin; 3] = [StrokeJoin::Miter, StrokeJoin::Round, StrokeJoin::Bevel];

    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn name(self) -> &'static str {
        match self {
            StrokeJoin::Miter => "Miter",
            StrokeJoin::Round => "Round",
            StrokeJoin::Bevel => "Bevel",
        }
    }
}

/// Text alignment anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Center,
    Right,
    Top,
    Bottom,
    Baseline,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Left,
        Direction::Center,
        Direction::Right,
        Direction::Top,
        Direction::Bottom,
        Direction::Baseline,
    ];

    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Left => "Left",
            Direction::Center => "Center",
            Direction::Right => "Right",
            Direction::Top => "Top",
            Direction::Bottom => "Bottom",
            Direction::Baseline => "Baseline",
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Center | Direction::Right)
    }
}

/// Everything `pushStyle`/`popStyle` saves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub color: Color,
    pub fill: bool,
    pub stroke: bool,
    pub stroke_weight: f32,
    pub cap: StrokeCap,
    pub join: StrokeJoin,
    pub align_h: Direction,
    pub align_v: Direction,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            fill: true,
            stroke: false,
            stroke_weight: 1.0,
            cap: StrokeCap::default(),
            join: StrokeJoin::default(),
            align_h: Direction::Left,
            align_v: Direction::Baseline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_indices_round_trip_through_all() {
        for (i, cap) in StrokeCap::ALL.iter().enumerate() {
            assert_eq!(StrokeCap::from_index(i as i32), Some(*cap));
        }
        assert_eq!(StrokeJoin::from_index(3), None);
        assert_eq!(Direction::from_index(-1), None);
        assert!(Direction::Center.is_horizontal());
        assert!(!Direction::Top.is_horizontal());
    }
}
