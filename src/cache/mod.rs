pub(crate) mod hires_lru;
