pub mod call;
pub mod generate;
pub mod list;
pub mod source;
pub mod tools;

pub use call::call_resource;
pub use generate::{GenerateConfig, generate_document};
pub use list::{list_operations, list_resources};
pub use tools::print_tools;
