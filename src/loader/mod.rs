//! Model loading.

pub use self::obj::{load_model, load_model_buf, load_model_or_cuboid};

mod obj;
