pub(crate) mod button;
pub(crate) mod card;
pub(crate) mod input;
