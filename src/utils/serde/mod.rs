mod duration_deserializer;
pub use duration_deserializer::*;
