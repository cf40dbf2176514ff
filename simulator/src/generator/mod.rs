pub mod scene;
pub mod template;
