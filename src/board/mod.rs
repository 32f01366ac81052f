mod registry;

pub use registry::{BoardRegistry, RegistryOptions};
