pub mod cases;

pub use cases::{kebab_to_camel, kebab_to_pascal, kebab_to_snake, pascal_to_kebab, upper_first};
