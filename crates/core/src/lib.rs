pub mod backend;

pub use backend::{Backend, BackendError, ObjectReader, ObjectSource};
