pub(crate) mod health;
pub(crate) mod portfolio;
pub(crate) mod prices;
