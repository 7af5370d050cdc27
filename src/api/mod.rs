//! Resource APIs.
//!
//! Each resource builds a request path, query and JSON:API body and hands it
//! to [`crate::Client`]; retrying and error mapping happen in the dispatcher.

mod accounts;
mod campaigns;
mod catalog;
mod content;
mod document;
mod flows;
mod images;
mod tags;
mod templates;

pub use accounts::Accounts;
pub use campaigns::{Campaigns, Channel};
pub use catalog::Catalog;
pub use content::{EmailContent, MessageContent, SmsContent};
pub use document::{
    CollectionDocument, Document, Links, PAGE_CURSOR_PARAM, Resource, ResourceDocument,
};
pub use flows::{FlowStatus, Flows};
pub use images::Images;
pub use tags::Tags;
pub use templates::{EditorType, Templates};
