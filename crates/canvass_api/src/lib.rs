//! Request-handler boundary for the canvassing record service.
//! Translates transport-shaped input into core service calls and back.

pub mod api;

pub use api::{
    create_person, export_people_csv, health, init_logging, list_people, search_people,
    update_person_notes, HttpReply, SearchParams, UpdateNotesBody,
};
