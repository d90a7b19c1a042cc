mod models;
mod reset;
mod schema;
mod store;
mod trait_def;

pub use models::*;
pub use reset::reset_schema;
pub use schema::WAREHOUSE_SCHEMA;
pub use store::{SqliteWarehouseStore, WarehouseCounts};
pub use trait_def::WarehouseStore;
