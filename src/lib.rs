pub mod config;
pub mod logger;
pub mod error;
pub mod slug;
pub mod content;
pub mod catalog;
pub mod post_list;
pub mod reconciler;
mod text_utils;
mod test_data;
