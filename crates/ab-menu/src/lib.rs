// Sound test menu: two cyclic selections wired to an audio service and a menu host.

pub mod catalog;
pub mod menu;
pub mod selection;

pub use catalog::{EffectCatalog, TrackCatalog};
pub use menu::SelectionMenu;
pub use selection::Selection;
