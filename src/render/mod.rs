pub(crate) mod backend;
pub(crate) mod blur;
pub(crate) mod composer;
pub(crate) mod cpu;
pub(crate) mod pool;
pub(crate) mod projection;
pub(crate) mod text;
pub(crate) mod texture;
