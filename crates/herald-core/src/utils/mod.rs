pub mod fs;

pub use fs::{files_with_extensions, subdirectory_names};

#[cfg(test)]
mod tests;
