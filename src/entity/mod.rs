pub mod checklists;
pub mod pdv_items;
pub mod pdvs;
pub mod problems;
pub mod status_history;
pub mod status_types;
pub mod stores;
pub mod users;
