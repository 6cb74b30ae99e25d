pub mod history;
pub mod map;
pub mod observations;
pub mod view;

pub use self::{history::*, map::*, observations::*, view::*};
