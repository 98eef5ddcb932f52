//! 基本型

mod color;
mod cube;
mod dice;
mod moves;
mod point;

pub use color::Color;
pub use cube::DoublingCube;
pub use dice::{Dice, DicePool, distinct as distinct_dice, without as dice_without};
pub use moves::{Hop, Hops, Move};
pub use point::{Location, NUM_POINTS, Point};
