mod fill_template;
mod import_images;
mod import_objects;

pub use fill_template::fill_template;
pub use import_images::import_images;
pub use import_objects::import_objects;
