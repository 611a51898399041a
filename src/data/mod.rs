mod loader;
mod types;

pub(crate) use loader::load_usage_file;
