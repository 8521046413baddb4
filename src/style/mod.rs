pub(crate) mod color;
pub(crate) mod options;
pub(crate) mod preset;
