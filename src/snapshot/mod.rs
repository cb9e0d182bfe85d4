pub(crate) mod dom;
pub(crate) mod markup;
pub(crate) mod raster;
