pub mod draw;
pub mod history;
pub mod pages;
pub mod roster;
