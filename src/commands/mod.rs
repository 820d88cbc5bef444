pub mod compose;
pub mod decode;
pub mod encode;
pub mod enqueue;
pub mod flush;
pub mod render;
pub mod send;
