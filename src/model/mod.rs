// File: ./src/model/mod.rs
// Aggregates the wire types shared by the client and the views
pub mod list;
pub mod request;

pub use list::{Item, ListSummary, ToDoList};
pub use request::{CheckedStateUpdate, NewItem, NewList, NewListResponse};
