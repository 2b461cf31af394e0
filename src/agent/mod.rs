//! Sales-agent collaborators layered on top of message triage: catalog
//! lookup, intent detection, pricing, reply assembly, and the
//! interaction log.

pub mod catalog;
pub mod intents;
pub mod logger;
pub mod pricing;
pub mod responses;

pub use catalog::{Catalog, CatalogError, Product, ProductMention};
pub use intents::{AdditionalIntents, GeneralIntent, LogisticsIntent, PurchaseIntent};
pub use logger::InteractionLogger;
pub use responses::AgentReply;
