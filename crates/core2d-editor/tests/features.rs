#[path = "features/async_slot.rs"]
mod async_slot;
#[path = "features/connect.rs"]
mod connect;
#[path = "features/grouping.rs"]
mod grouping;
#[path = "features/paths.rs"]
mod paths;
