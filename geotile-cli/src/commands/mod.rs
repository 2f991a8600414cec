pub mod info;
pub mod locate;
pub mod render;
