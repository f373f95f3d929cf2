pub mod classification;
pub mod models;
pub mod store;

pub use classification::{ClassifierProvider, PostClassifier};
pub use models::{NewPost, Post, PostType};
pub use store::{PostStore, StoreError};
