pub(crate) mod config;
pub(crate) mod fetch;
pub(crate) mod rated;
