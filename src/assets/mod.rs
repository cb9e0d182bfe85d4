pub(crate) mod art_cache;
pub(crate) mod decode;
pub(crate) mod loader;
