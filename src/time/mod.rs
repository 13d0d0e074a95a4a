pub(crate) mod clock;
pub(crate) mod duration;
pub(crate) mod resolver;
