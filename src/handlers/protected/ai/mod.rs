pub mod image;
pub mod multipart;
pub mod resume;
pub mod text;

// Re-export handler functions for use in routing
pub use image::generate_image;
pub use image::remove_background;
pub use image::remove_object;
pub use resume::review_resume;
pub use text::generate_article;
pub use text::generate_blog_title;
