pub mod combos;
pub mod deck;
pub mod hand;
pub mod history;
pub mod player;
pub mod rank;
pub mod round;
pub mod rules;
pub mod tax;
pub mod trick;
