pub(crate) mod generator;
pub(crate) mod request;
pub(crate) mod service;
pub(crate) mod settings;
