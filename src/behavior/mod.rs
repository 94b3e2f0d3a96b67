// Malicious Behavior Catalog
//
// A behavior is a short, fixed sequence of call names that characterises a
// malicious routine (e.g. a ransomware encryption loop). Behaviors are seeded
// once from a plain-text definitions file into a persistent store and then
// read many times by the injector.
//
// Definitions file format, one behavior per line:
//
//   ransomware:encryptFile,deleteShadowCopy
//   smsFraud:getDeviceId, sendTextMessage
//
// The injector never talks to the store directly. It consumes a
// `BehaviorSource` and takes an immutable `BehaviorCatalog` snapshot for the
// duration of a call.

mod catalog;
mod definition;
mod store;

pub use catalog::{BehaviorCatalog, BehaviorSource};
pub use definition::{
    parse_definitions, parse_sequence, unix_timestamp, Behavior, BehaviorError,
};
pub use store::{BehaviorStore, StoreError};

#[cfg(test)]
mod tests;
