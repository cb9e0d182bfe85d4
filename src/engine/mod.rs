pub(crate) mod context;
pub(crate) mod card_engine;
pub(crate) mod jobs;
pub(crate) mod ticker;
