pub mod tiles;
pub mod view;
pub mod viewport;
